//! Rule Text Parser: free-text rule blocks to canonical rule sets.
//!
//! Parsing never fails. A line that fits no category becomes a custom rule.

mod grammar;
mod parser;

pub use grammar::Section;
use tracing::debug;

use crate::{FindingsRuleSet, ParsedRuleSet, RuleLayer};

/// Normalize a rule layer to a [`ParsedRuleSet`].
///
/// Structured layers are returned unchanged. Text layers are folded line by
/// line; see [`parse_text`].
#[must_use]
pub fn parse(layer: &RuleLayer) -> ParsedRuleSet {
    match layer {
        RuleLayer::Structured(parsed) => {
            debug!(directives = parsed.len(), "structured layer passed through");
            parsed.clone()
        }
        RuleLayer::Text(text) => parse_text(text),
    }
}

/// Parse free rule text.
///
/// Lines starting with `Example` are skipped. Section headers (`General
/// Rules:`, `Exclusions:`, `Priority Keywords:`, `Custom Rules:` and their
/// variants) move the cursor; other lines lose a leading bullet and are filed
/// under the current section.
#[must_use]
pub fn parse_text(text: &str) -> ParsedRuleSet {
    let parsed = parser::parse_text(text);
    debug!(
        custom = parsed.custom_rules.len(),
        exclusions = parsed.exclude_by_default.as_ref().map_or(0, Vec::len),
        priority = parsed.priority.is_some(),
        "parsed rule text"
    );
    parsed
}

/// Flatten a layer into a plain list of rules, dropping headers (lines
/// ending in `:`).
#[must_use]
pub fn parse_flat(layer: &RuleLayer) -> Vec<String> {
    match layer {
        RuleLayer::Structured(parsed) => parsed.custom_rules.clone(),
        RuleLayer::Text(text) => parser::flat_rules(text),
    }
}

/// Parse a global findings-rules block, pulling `Replace X with Y` lines out
/// as corrections.
#[must_use]
pub fn parse_findings_rules(layer: &RuleLayer) -> FindingsRuleSet {
    match layer {
        RuleLayer::Structured(parsed) => FindingsRuleSet {
            custom_rules: parsed.custom_rules.clone(),
            corrections: Vec::new(),
        },
        RuleLayer::Text(text) => {
            let parsed = parser::findings_rules(text);
            debug!(
                custom = parsed.custom_rules.len(),
                corrections = parsed.corrections.len(),
                "parsed findings rules"
            );
            parsed
        }
    }
}
