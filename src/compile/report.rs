use tracing::debug;

use super::{
    disallowed_directive, exclusion_block, opening_phrase, preamble, push_rules_section,
    push_section, spacing_word, tone_style,
};
use crate::{
    CombinedLogic, CorrectionRule, FormatSpec, FormatStyle, GeneralRules, ReportRules, RuleLayer,
    SectionRules,
};

/// Base prompt used for full reports when the host supplies none.
pub const DEFAULT_REPORT_PROMPT: &str =
    "You are an expert radiologist generating a comprehensive radiology report.";

const CRITICAL_RULES: &str = "=== CRITICAL RULES ===\n\
• You must incorporate ALL findings provided above into the appropriate sections\n\
• The ONLY allowed sections are \"Findings\" and \"Impression\"\n\
• Do not add any other sections (no Technique, no Comparison, no Clinical Information, etc.)\n\n";

const CLOSING: &str = "Generate the complete radiology report now.\n";

/// Optional inputs to [`compile_report`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions<'a> {
    /// Report template whose section headers the model must keep.
    pub template: Option<&'a str>,
    /// Falls back to [`DEFAULT_REPORT_PROMPT`] when absent or empty.
    pub base_prompt: Option<&'a str>,
    /// Cross-study findings rules; `Replace X with Y` lines become corrections.
    pub global_findings_rules: Option<&'a RuleLayer>,
    /// Cross-study impression rules, flattened to a plain list.
    pub global_impression_rules: Option<&'a RuleLayer>,
}

/// Render a full-report prompt: template, findings, then the general,
/// findings-section, impression-section and custom instruction blocks.
#[must_use]
pub fn compile_report(findings: &str, logic: &CombinedLogic, options: &ReportOptions<'_>) -> String {
    let general = general_requirements(logic.general.as_ref());
    let findings_rules = findings_section(logic, options.global_findings_rules);
    let impression = impression_section(
        logic.section_rules.as_ref(),
        options
            .global_impression_rules
            .map(crate::parse::parse_flat)
            .unwrap_or_default(),
    );

    debug!(
        general = general.len(),
        findings = findings_rules.len(),
        impression = impression.len(),
        custom = logic.custom_instructions.len(),
        template = options.template.is_some(),
        "compiled report prompt"
    );

    let mut out = preamble(options.base_prompt, DEFAULT_REPORT_PROMPT);
    if let Some(template) = options.template.filter(|t| !t.is_empty()) {
        out.push_str("TEMPLATE STRUCTURE - MANDATORY COMPLIANCE:\n\n");
        out.push_str(template);
        out.push_str("\n\n");
        out.push_str("CRITICAL: Preserve ALL section headers (text ending with \":\") EXACTLY as shown above.\n\n");
        out.push_str("CRITICAL SPACING RULE: Always include a space after colons in section headers (e.g., \"Neurovascular structures: Unremarkable\" NOT \"Neurovascular structures:Unremarkable\"). This spacing is mandatory and must be preserved exactly as shown in the template.\n\n");
    }

    out.push_str("MANDATORY FINDINGS INCORPORATION:\n\n");
    out.push_str("=== FINDINGS TO INCORPORATE ===\n");
    out.push_str(findings);
    out.push_str("\n=== END OF FINDINGS ===\n\n");
    out.push_str(CRITICAL_RULES);

    push_section(&mut out, "GENERAL REQUIREMENTS:", &general);
    push_section(&mut out, "FINDINGS SECTION RULES:", &findings_rules);
    push_rules_section(&mut out, "IMPRESSION SECTION RULES:", &impression);
    push_section(&mut out, "CUSTOM INSTRUCTIONS:", &logic.custom_instructions);
    out.push_str(CLOSING);
    out
}

fn tone_directive(style: &str) -> String {
    match style {
        "definitive" => "Use definitive language throughout the report. When findings are clear, use direct terms like \"demonstrates\", \"shows\", \"is\", and \"confirms\". State diagnoses with confidence when imaging findings support them.".to_owned(),
        "cautious" => "Maintain a cautious tone throughout the report. Avoid making definitive diagnoses; instead suggest possibilities using terms like \"suggests\", \"likely represents\", \"appears to be\", \"may indicate\", and \"is concerning for\". Present findings as observations rather than conclusions.".to_owned(),
        "balanced" => "Maintain a balanced tone between cautious and definitive language. Use definitive terms for clear, unambiguous findings (e.g., \"demonstrates a fracture\") and cautious terms for uncertain or differential findings (e.g., \"likely represents\", \"suggests\"). Match the certainty of your language to the certainty of the imaging findings.".to_owned(),
        other => format!("Maintain a {other} tone throughout the report"),
    }
}

fn general_requirements(general: Option<&GeneralRules>) -> Vec<String> {
    let Some(general) = general else {
        return Vec::new();
    };
    let mut lines = Vec::new();
    lines.extend(tone_style(general).map(tone_directive));
    lines.extend(disallowed_directive(general));
    if let Some(symbols) = general.disallowed_symbols.as_ref().and_then(|s| s.active()) {
        lines.push(format!("Do NOT use these symbols: {}", symbols.join(", ")));
    }
    lines
}

fn corrections<'a>(rules: impl Iterator<Item = &'a CorrectionRule>) -> impl Iterator<Item = String> {
    rules.map(CorrectionRule::directive)
}

fn findings_section(logic: &CombinedLogic, global: Option<&RuleLayer>) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(c) = logic.general.as_ref().and_then(|g| g.corrections.as_ref()) {
        lines.extend(corrections(c.active()));
    }

    if let Some(global) = global {
        let parsed = crate::parse::parse_findings_rules(global);
        lines.extend(
            parsed
                .corrections
                .iter()
                .filter(|rule| rule.is_complete())
                .map(|rule| format!("[Global] {}", rule.directive())),
        );
        lines.extend(parsed.custom_rules);
    }

    if let Some(report) = &logic.report {
        lines.extend(report_rules(report));
    }
    lines
}

fn report_rules(report: &ReportRules) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(c) = &report.corrections {
        lines.extend(corrections(c.active()));
    }

    if let Some(formatting) = &report.formatting {
        if formatting.preserve_template_punctuation == Some(true) {
            lines.extend(
                [
                    "Preserve section headers EXACTLY as shown (including punctuation and spacing)",
                    "Within each section, prioritize natural clinical phrasing over template wording",
                    "When pathology is present, describe it directly without awkwardly negating template phrases",
                    "Omit template phrases that become redundant when combined with pathologic findings",
                ]
                .map(str::to_owned),
            );
        }
        if formatting.use_bullet_points == Some(true) {
            lines.push("Use bullet points for listing multiple findings within each section".to_owned());
        }
        if formatting.prevent_unnecessary_capitalization == Some(true) {
            lines.push("Avoid unnecessary capitalization - use standard case unless specified".to_owned());
        }
    }

    if let Some(language) = &report.language {
        if let Some(words) = language.avoid_words.as_ref().and_then(|l| l.active()) {
            lines.push(format!("Avoid using these words: {}", words.join(", ")));
        }
        if let Some(phrases) = language.avoid_phrases.as_ref().and_then(|l| l.active()) {
            lines.push(format!("Avoid these phrases: {}", phrases.join(", ")));
        }
        if language.expand_lesion_descriptions == Some(true) {
            lines.push("When the user describes a lesion finding without providing detailed imaging characteristics, please expand the description to include typical MRI or CT imaging features such as signal intensity/attenuation, margins (well-defined vs ill-defined), enhancement pattern, mass effect, and other relevant imaging characteristics commonly seen with such lesions. Add these descriptors naturally as would be typical in a radiology report.".to_owned());
        }
    }

    lines.extend(
        report
            .anatomic_routing_rules
            .iter()
            .filter(|r| !r.condition.is_empty() && !r.route_to.is_empty())
            .map(|r| format!("If finding contains \"{}\", route to \"{}\" section", r.condition, r.route_to)),
    );
    lines.extend(report.custom_rules.iter().cloned());

    lines.push("Do not invent findings. Only report what is explicitly stated in the provided findings".to_owned());
    lines.push("Incorporate ALL findings from the \"=== FINDINGS TO INCORPORATE ===\" section".to_owned());
    lines
}

fn impression_format(format: &FormatSpec) -> Vec<String> {
    let spacing = spacing_word(format);
    match format.style {
        Some(FormatStyle::NumericallyItemized) => vec![
            "The impression should be formatted as a short numbered list, but closely related findings (e.g., osteoarthritis + meniscal tear in the same compartment) should be combined into one item.".to_owned(),
            format!("Use {spacing} spacing between each numbered item"),
        ],
        Some(FormatStyle::BulletPoints) => vec![
            "Format the impression as a bullet point list using • symbols".to_owned(),
            format!("Use {spacing} spacing between each bullet point"),
        ],
        Some(FormatStyle::Unformatted) => vec![
            "Format the impression as continuous prose without bullets or numbers".to_owned(),
        ],
        Some(FormatStyle::Paragraph | FormatStyle::Unrecognized) | None => Vec::new(),
    }
}

/// Empty unless the logic carries impression section rules; global
/// impression rules alone do not open the section.
fn impression_section(section: Option<&SectionRules>, global: Vec<String>) -> Vec<String> {
    let Some(section) = section else {
        return Vec::new();
    };
    let mut lines = Vec::new();

    if let Some(format) = &section.format {
        lines.extend(impression_format(format));
    }
    lines.extend(global);

    if let Some(phrase) = opening_phrase(section) {
        lines.push(format!("The first impression item MUST start with: \"{phrase}\""));
    }
    if let Some(high) = section
        .priority
        .as_ref()
        .map(|p| &p.high_priority_findings)
        .filter(|l| !l.is_empty())
    {
        lines.push(format!("High priority findings to list first: {}", high.join(", ")));
    }
    lines.extend(section.custom_rules.iter().cloned());

    lines.push("Prioritize findings that may require intervention, additional imaging, or result in significant pain".to_owned());
    lines.push("Omit incidental findings unless relevant to provided clinical history or if they may require intervention, additional imaging, or any type of follow-up".to_owned());
    lines.push("Keep the impression concise and actionable".to_owned());

    lines.extend(exclusion_block(&section.exclude_by_default));
    lines
}
