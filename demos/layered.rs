use radlogic::{
    compile_report, review, AgentLogicDocument, CombinedLogic, ReportOptions, RuleLayer,
    ValidationReport,
};

const DOCUMENT: &str = r#"{
    "general": {
        "tone": {"style": "balanced"},
        "corrections": {"rules": [{"find": "chondral labral", "replace": "chondrolabral"}]},
        "disallowed_items": {"patient_name": true}
    },
    "report": {
        "anatomic_routing_rules": [{"condition": "ACL", "route_to": "Ligaments"}]
    },
    "impression": {
        "format": {"style": "numerically_itemized", "spacing": "single"},
        "exclude_by_default": ["joint_effusion"]
    },
    "study_impression": {
        "required_opening_phrase": {"enabled": true, "phrase": "No acute"}
    }
}"#;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let logic = AgentLogicDocument::from_json(DOCUMENT)
        .expect("failed to load logic document")
        .combine();

    let findings_rules = RuleLayer::text("Replace tiny with small\nUse metric units");
    let impression_rules = RuleLayer::text("Impression:\n- Keep it under five items");
    let options = ReportOptions {
        template: Some("FINDINGS:\nLigaments:\nMenisci:\n\nIMPRESSION:"),
        global_findings_rules: Some(&findings_rules),
        global_impression_rules: Some(&impression_rules),
        ..ReportOptions::default()
    };

    let findings = "ACL tear. Small joint effusion.";
    println!("{}", compile_report(findings, &logic, &options));

    // A model response, checked the way a host would check it.
    let output = "FINDINGS:\nLigaments: Complete ACL tear.\n\nIMPRESSION:\n1. Complete ACL tear. Small joint effusion.";
    let strip = |text: &str, _: &CombinedLogic| text.replace(" Small joint effusion.", "");
    let must_open = |text: &str, _: &str, logic: &CombinedLogic| {
        let phrase = logic
            .section_rules
            .as_ref()
            .and_then(|s| s.required_opening_phrase.as_ref())
            .and_then(|p| p.active());
        match phrase {
            Some(phrase) if !text.contains(phrase) => {
                ValidationReport::passing().violation(format!("missing opening phrase {phrase:?}"))
            }
            _ => ValidationReport::passing(),
        }
    };

    let (text, report) = review(output, findings, &logic, &strip, &must_open);
    println!("{text}\n\n{report}");
}
