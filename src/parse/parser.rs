use tracing::trace;

use super::grammar::{self, Section};
use crate::{ExclusionRule, FindingsRuleSet, ParsedRuleSet, PriorityLists};

/// Accumulator threaded through the line fold. `section` is the cursor set
/// by the most recent header.
#[derive(Debug)]
struct Fold {
    section: Section,
    custom_rules: Vec<String>,
    exclusions: Vec<ExclusionRule>,
    keywords: Vec<String>,
}

impl Fold {
    fn new() -> Self {
        Self {
            section: Section::General,
            custom_rules: Vec::new(),
            exclusions: Vec::new(),
            keywords: Vec::new(),
        }
    }

    fn line(mut self, line: &str) -> Self {
        if let Some(section) = grammar::section_header(line) {
            trace!(?section, line, "section header");
            self.section = section;
            return self;
        }

        let content = grammar::strip_bullet(line);
        if content.is_empty() {
            return self;
        }

        match self.section {
            Section::Exclusions => self.exclusions.push(grammar::exclusion(content)),
            // Free text can only raise priority; low-priority lists come from
            // structured layers.
            Section::Priority => self.keywords.push(content.to_lowercase()),
            Section::General | Section::Custom => self.custom_rules.push(content.to_owned()),
        }
        self
    }

    fn finish(self) -> ParsedRuleSet {
        ParsedRuleSet {
            custom_rules: self.custom_rules,
            exclude_by_default: (!self.exclusions.is_empty()).then_some(self.exclusions),
            priority: (!self.keywords.is_empty()).then(|| PriorityLists {
                high_priority_keywords: self.keywords,
                ..PriorityLists::default()
            }),
        }
    }
}

/// Trimmed, non-blank, non-example lines.
fn directive_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !grammar::is_example(line))
}

pub(crate) fn parse_text(text: &str) -> ParsedRuleSet {
    directive_lines(text).fold(Fold::new(), Fold::line).finish()
}

pub(crate) fn flat_rules(text: &str) -> Vec<String> {
    directive_lines(text)
        .filter(|line| !grammar::is_colon_header(line))
        .map(grammar::strip_bullet)
        .filter(|rule| !rule.is_empty())
        .map(str::to_owned)
        .collect()
}

pub(crate) fn findings_rules(text: &str) -> FindingsRuleSet {
    let mut out = FindingsRuleSet::default();
    for rule in flat_rules(text) {
        match grammar::correction(&rule) {
            Some(correction) => out.corrections.push(correction),
            None => out.custom_rules.push(rule),
        }
    }
    out
}
