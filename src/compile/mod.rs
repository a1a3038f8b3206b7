//! Prompt Compiler: renders merged logic and findings into the instruction
//! document handed to the model.
//!
//! Rendering is a pure function of its inputs and cannot fail. Missing
//! configuration only removes lines; a section with no lines is left out.

mod report;

pub use report::{compile_report, ReportOptions, DEFAULT_REPORT_PROMPT};
use tracing::debug;

use crate::{
    CombinedLogic, ExclusionRule, FormatSpec, FormatStyle, GeneralRules, OpeningPhrase,
    PriorityLists, RuleLayer, SectionRules, Spacing,
};

/// Base prompt used when the host supplies none.
pub const DEFAULT_IMPRESSION_PROMPT: &str = "You are an expert radiologist generating a concise, clinically relevant impression based on imaging findings.";

const FINDINGS_HEADER: &str = "FINDINGS TO SUMMARIZE:";

const EXCLUSION_HEADER: &str = "Do not mention these findings in the impression:";
const PRIORITY_HEADER: &str = "FINDING PRIORITY ORDER:";

const HOUSE_STYLE: [&str; 3] = [
    "Prioritize findings that may require intervention, additional imaging, or result in significant pain",
    "Be concise - avoid redundant descriptions",
    "Use standard medical terminology",
];

/// Render an impression prompt.
///
/// `base_prompt` falls back to [`DEFAULT_IMPRESSION_PROMPT`] when absent or
/// empty. Custom rules from `global_rules` lead the section rules.
///
/// ```
/// use radlogic::{CombinedLogic, compile};
///
/// let prompt = compile("mild effusion", &CombinedLogic::default(), None, None);
/// assert!(prompt.contains("FINDINGS TO SUMMARIZE:\n\nmild effusion"));
/// ```
#[must_use]
pub fn compile(
    findings: &str,
    logic: &CombinedLogic,
    base_prompt: Option<&str>,
    global_rules: Option<&RuleLayer>,
) -> String {
    let section = logic.section_rules.as_ref();
    let global = global_rules
        .map(|layer| crate::parse::parse(layer).custom_rules)
        .unwrap_or_default();

    let formatting = section
        .and_then(|s| s.format.as_ref())
        .map(format_directives)
        .unwrap_or_default();
    let rules = section_directives(section, global);
    let guidelines = guidelines(logic.general.as_ref(), section);

    debug!(
        formatting = formatting.len(),
        section = rules.len(),
        guidelines = guidelines.len(),
        additional = logic.custom_instructions.len(),
        "compiled impression prompt"
    );

    let mut out = preamble(base_prompt, DEFAULT_IMPRESSION_PROMPT);
    out.push_str(FINDINGS_HEADER);
    out.push_str("\n\n");
    out.push_str(findings);
    out.push_str("\n\n");

    push_section(&mut out, "FORMATTING REQUIREMENTS:", &formatting);
    push_rules_section(&mut out, "IMPRESSION SECTION RULES:", &rules);
    push_section(&mut out, "GENERAL GUIDELINES:", &guidelines);
    push_section(&mut out, "ADDITIONAL INSTRUCTIONS:", &logic.custom_instructions);
    out
}

// -- Shared rendering -------------------------------------------------------

/// The base prompt, ending in exactly one blank line.
pub(crate) fn preamble(base_prompt: Option<&str>, default: &str) -> String {
    let base = base_prompt.filter(|p| !p.is_empty()).unwrap_or(default);
    let mut out = String::with_capacity(base.len() + 256);
    out.push_str(base);
    if !base.ends_with('\n') {
        out.push_str("\n\n");
    } else if !base.ends_with("\n\n") {
        out.push('\n');
    }
    out
}

/// Lines of the exclusion block pass through the numbering pass untouched.
fn is_unnumbered(line: &str) -> bool {
    line.is_empty() || line == EXCLUSION_HEADER || line == PRIORITY_HEADER || line.starts_with('•')
}

/// Write `header`, the numbered lines, and a closing blank line. Nothing is
/// written for an empty section.
pub(crate) fn push_section(out: &mut String, header: &str, lines: &[String]) {
    write_section(out, header, lines, |_| false);
}

/// Like [`push_section`], but the exclusion and priority block lines keep
/// their own layout.
pub(crate) fn push_rules_section(out: &mut String, header: &str, lines: &[String]) {
    write_section(out, header, lines, is_unnumbered);
}

fn write_section(out: &mut String, header: &str, lines: &[String], exempt: fn(&str) -> bool) {
    if lines.is_empty() {
        return;
    }
    out.push_str(header);
    out.push('\n');
    let mut n = 0;
    for line in lines {
        if exempt(line) {
            out.push_str(line);
        } else {
            n += 1;
            out.push_str(&format!("{n}. {line}"));
        }
        out.push('\n');
    }
    out.push('\n');
}

/// Blank line, header, one bullet per exclusion, blank line.
pub(crate) fn exclusion_block(exclusions: &[ExclusionRule]) -> Vec<String> {
    let bullets: Vec<String> = exclusions
        .iter()
        .filter(|rule| !rule.is_blank())
        .map(|rule| format!("• {rule}"))
        .collect();
    if bullets.is_empty() {
        return Vec::new();
    }
    let mut block = Vec::with_capacity(bullets.len() + 3);
    block.push(String::new());
    block.push(EXCLUSION_HEADER.to_owned());
    block.extend(bullets);
    block.push(String::new());
    block
}

pub(crate) fn opening_phrase(section: &SectionRules) -> Option<&str> {
    section
        .required_opening_phrase
        .as_ref()
        .and_then(OpeningPhrase::active)
}

pub(crate) fn tone_style(general: &GeneralRules) -> Option<&str> {
    general
        .tone
        .as_ref()
        .and_then(|t| t.style.as_deref())
        .filter(|s| !s.is_empty())
}

pub(crate) fn disallowed_directive(general: &GeneralRules) -> Option<String> {
    let items: Vec<String> = general.disallowed().collect();
    (!items.is_empty()).then(|| format!("Do NOT include: {}", items.join(", ")))
}

pub(crate) fn spacing_word(format: &FormatSpec) -> &'static str {
    match format.spacing.unwrap_or_default() {
        Spacing::Double => "DOUBLE",
        Spacing::Single => "single",
    }
}

// -- Impression sections ----------------------------------------------------

fn format_directives(format: &FormatSpec) -> Vec<String> {
    let spacing = spacing_word(format);
    match format.style {
        Some(FormatStyle::NumericallyItemized) => vec![
            "MANDATORY: The impression should be formatted as a short numbered list, but closely related findings (e.g., osteoarthritis + meniscal tear in the same compartment) should be combined into one item.".to_owned(),
            format!("Each numbered item should be on its own line with {spacing} spacing between items"),
        ],
        Some(FormatStyle::BulletPoints) => vec![
            "MANDATORY: Format as bullet points using • symbols".to_owned(),
            format!("Each bullet point should be on its own line with {spacing} spacing between items"),
        ],
        Some(FormatStyle::Paragraph | FormatStyle::Unformatted) => vec![
            "Format as prose paragraphs, not as a list".to_owned(),
            "Separate distinct findings with appropriate punctuation".to_owned(),
        ],
        Some(FormatStyle::Unrecognized) | None => Vec::new(),
    }
}

fn section_directives(section: Option<&SectionRules>, global: Vec<String>) -> Vec<String> {
    let mut lines = global;
    let Some(section) = section else {
        return lines;
    };
    lines.extend(exclusion_block(&section.exclude_by_default));
    if let Some(phrase) = opening_phrase(section) {
        lines.push(format!(
            "REQUIRED: The first impression item MUST begin with: \"{phrase}\""
        ));
    }
    if let Some(priority) = &section.priority {
        lines.extend(priority_block(priority));
    }
    lines
}

fn priority_block(priority: &PriorityLists) -> Vec<String> {
    let directives: Vec<String> = [
        (
            "List these findings FIRST if present",
            &priority.high_priority_findings,
        ),
        (
            "Prioritize findings containing these keywords",
            &priority.high_priority_keywords,
        ),
        (
            "List these findings LAST if included",
            &priority.low_priority_findings,
        ),
    ]
    .into_iter()
    .filter(|(_, list)| !list.is_empty())
    .map(|(lead, list)| format!("{lead}: {}", list.join(", ")))
    .collect();

    if directives.is_empty() {
        return directives;
    }
    let mut block = Vec::with_capacity(directives.len() + 1);
    block.push(PRIORITY_HEADER.to_owned());
    block.extend(directives);
    block
}

fn guidelines(general: Option<&GeneralRules>, section: Option<&SectionRules>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(general) = general {
        if let Some(corrections) = &general.corrections {
            lines.extend(corrections.active().map(|rule| rule.directive()));
        }
        if let Some(style) = tone_style(general) {
            lines.push(format!("Maintain a {style} tone"));
        }
        lines.extend(disallowed_directive(general));
    }

    lines.extend(HOUSE_STYLE.iter().map(|s| (*s).to_owned()));

    if let Some(section) = section {
        if section.include_recommendations == Some(true) {
            lines.push("Include follow-up recommendations when appropriate".to_owned());
        }
        if section.differential_diagnosis == Some(true) {
            lines.push("Provide differential diagnoses for ambiguous findings".to_owned());
        }
        lines.extend(section.custom_rules.iter().cloned());
    }
    lines
}
