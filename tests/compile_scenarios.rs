use radlogic::{
    compile, compile_report, AgentLogicDocument, CombinedLogic, ExclusionRule, FormatSpec,
    FormatStyle, LayerRole, LayerStack, ReportOptions, RuleLayer, SectionRules, Spacing,
    DEFAULT_IMPRESSION_PROMPT, DEFAULT_REPORT_PROMPT,
};

fn section(rules: SectionRules) -> CombinedLogic {
    CombinedLogic {
        section_rules: Some(rules),
        ..CombinedLogic::default()
    }
}

/// The lines between `header` and the next blank line.
fn section_lines<'a>(prompt: &'a str, header: &str) -> Vec<&'a str> {
    prompt
        .lines()
        .skip_while(|line| *line != header)
        .skip(1)
        .take_while(|line| !line.is_empty())
        .collect()
}

#[test]
fn minimal_document() {
    let prompt = compile("Small joint effusion.", &CombinedLogic::default(), None, None);
    assert!(prompt.starts_with(DEFAULT_IMPRESSION_PROMPT));
    assert!(prompt.contains("FINDINGS TO SUMMARIZE:\n\nSmall joint effusion.\n\n"));
    assert!(!prompt.contains("FORMATTING REQUIREMENTS:"));
    assert!(!prompt.contains("IMPRESSION SECTION RULES:"));
    assert!(!prompt.contains("ADDITIONAL INSTRUCTIONS:"));
    assert_eq!(section_lines(&prompt, "GENERAL GUIDELINES:").len(), 3);
}

#[test]
fn double_spacing_renders_two_format_lines() {
    let logic = section(SectionRules {
        format: Some(FormatSpec::styled(FormatStyle::NumericallyItemized).spaced(Spacing::Double)),
        ..SectionRules::default()
    });
    let prompt = compile("x", &logic, None, None);
    let lines = section_lines(&prompt, "FORMATTING REQUIREMENTS:");
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("1. MANDATORY: The impression should be formatted as a short numbered list"));
    assert_eq!(
        lines[1],
        "2. Each numbered item should be on its own line with DOUBLE spacing between items"
    );
}

#[test]
fn exclusion_block_is_exempt_from_numbering() {
    let logic = section(SectionRules {
        exclude_by_default: vec![
            ExclusionRule::finding("joint_effusion"),
            ExclusionRule::unless("Baker cyst", "ruptured"),
        ],
        custom_rules: vec!["Mention comparison".into()],
        ..SectionRules::default()
    });
    let global = RuleLayer::text("Custom Rules:\n- Lead with acute findings");
    let prompt = compile("x", &logic, Some("You are a radiologist."), Some(&global));

    assert!(prompt.starts_with("You are a radiologist.\n\nFINDINGS TO SUMMARIZE:"));
    assert!(prompt.contains(
        "IMPRESSION SECTION RULES:\n\
         1. Lead with acute findings\n\
         \n\
         Do not mention these findings in the impression:\n\
         • joint effusion\n\
         • Baker cyst UNLESS ruptured\n\
         \n\
         \n\
         GENERAL GUIDELINES:\n"
    ));
    let guidelines = section_lines(&prompt, "GENERAL GUIDELINES:");
    assert_eq!(guidelines.last(), Some(&"4. Mention comparison"));
}

#[test]
fn layered_text_rules_compile_end_to_end() {
    let logic = LayerStack::new()
        .rules(
            LayerRole::Global,
            &RuleLayer::text("Exclusions:\n- degenerative change\nPriority Keywords:\n- Fracture"),
        )
        .rules(
            LayerRole::StudyOverride,
            &RuleLayer::text("Exclusions:\n- small pneumothorax (unless tension)"),
        )
        .merge();
    let prompt = compile("Right pneumothorax.", &logic, None, None);

    assert!(prompt.contains(
        "• degenerative change\n\
         • small pneumothorax UNLESS tension\n"
    ));
    assert!(prompt.contains(
        "FINDING PRIORITY ORDER:\n1. Prioritize findings containing these keywords: fracture\n"
    ));
}

#[test]
fn compile_is_deterministic() {
    let logic = AgentLogicDocument::from_json(
        r#"{
            "general": {"disallowed_items": {"patient_name": true, "accession": true}},
            "impression": {"required_opening_phrase": {"enabled": true, "phrase": "No acute"}}
        }"#,
    )
    .unwrap()
    .combine();
    let first = compile("x", &logic, None, None);
    assert_eq!(first, compile("x", &logic, None, None));
    assert!(first.contains("Do NOT include: accession, patient name"));
    assert!(first.contains("1. REQUIRED: The first impression item MUST begin with: \"No acute\""));
}

#[test]
fn report_prompt_layout() {
    let logic = AgentLogicDocument::from_json(
        r#"{
            "general": {
                "tone": {"style": "cautious"},
                "corrections": {"rules": [{"find": "chondral labral", "replace": "chondrolabral"}]}
            },
            "report": {
                "anatomic_routing_rules": [{"condition": "ACL", "route_to": "Ligaments"}],
                "custom_rules": ["Describe effusion size"]
            },
            "impression": {
                "format": {"style": "none"},
                "exclude_by_default": ["osteophyte"]
            },
            "custom_instructions": ["Sign as the reading radiologist"]
        }"#,
    )
    .unwrap()
    .combine();
    let global = RuleLayer::text("Replace tiny with small\nUse metric units");
    let options = ReportOptions {
        template: Some("FINDINGS:\nLigaments:\nIMPRESSION:"),
        global_findings_rules: Some(&global),
        ..ReportOptions::default()
    };
    let prompt = compile_report("ACL tear. Small effusion.", &logic, &options);

    assert!(prompt.starts_with(DEFAULT_REPORT_PROMPT));
    assert!(prompt.contains("TEMPLATE STRUCTURE - MANDATORY COMPLIANCE:\n\nFINDINGS:\nLigaments:\nIMPRESSION:\n\n"));
    assert!(prompt.contains(
        "=== FINDINGS TO INCORPORATE ===\nACL tear. Small effusion.\n=== END OF FINDINGS ===\n"
    ));

    let findings = section_lines(&prompt, "FINDINGS SECTION RULES:");
    assert_eq!(
        &findings[..5],
        [
            "1. Replace \"chondral labral\" with \"chondrolabral\"",
            "2. [Global] Replace \"tiny\" with \"small\"",
            "3. Use metric units",
            "4. If finding contains \"ACL\", route to \"Ligaments\" section",
            "5. Describe effusion size",
        ]
    );

    let impression = section_lines(&prompt, "IMPRESSION SECTION RULES:");
    assert_eq!(
        impression[0],
        "1. Format the impression as continuous prose without bullets or numbers"
    );
    assert!(prompt.contains("• osteophyte\n"));
    assert!(prompt.contains("CUSTOM INSTRUCTIONS:\n1. Sign as the reading radiologist\n"));
    assert!(prompt.ends_with("Generate the complete radiology report now.\n"));

    let tone = section_lines(&prompt, "GENERAL REQUIREMENTS:");
    assert!(tone[0].starts_with("1. Maintain a cautious tone throughout the report."));
}

#[test]
fn report_without_report_rules_has_no_fixed_findings_rules() {
    let prompt = compile_report("x", &CombinedLogic::default(), &ReportOptions::default());
    assert!(!prompt.contains("FINDINGS SECTION RULES:"));
    assert!(!prompt.contains("TEMPLATE STRUCTURE"));
    assert!(!prompt.contains("IMPRESSION SECTION RULES:"));
    assert!(prompt.ends_with("etc.)\n\nGenerate the complete radiology report now.\n"));
}

#[test]
fn report_paragraph_style_has_no_format_line() {
    let logic = section(SectionRules {
        format: Some(FormatSpec::styled(FormatStyle::Paragraph)),
        ..SectionRules::default()
    });
    let prompt = compile_report("x", &logic, &ReportOptions::default());
    let impression = section_lines(&prompt, "IMPRESSION SECTION RULES:");
    assert!(impression[0].starts_with("1. Prioritize findings that may require intervention"));
    assert!(!prompt.contains("continuous prose"));
}

#[test]
fn bullet_lines_outside_section_rules_are_numbered() {
    let logic = CombinedLogic {
        section_rules: Some(SectionRules {
            custom_rules: vec!["• Use the template bullets".into()],
            ..SectionRules::default()
        }),
        custom_instructions: vec!["• Sign the report".into()],
        ..CombinedLogic::default()
    };
    let prompt = compile("x", &logic, None, None);
    let guidelines = section_lines(&prompt, "GENERAL GUIDELINES:");
    assert_eq!(guidelines.last(), Some(&"4. • Use the template bullets"));
    assert_eq!(
        section_lines(&prompt, "ADDITIONAL INSTRUCTIONS:"),
        ["1. • Sign the report"]
    );
}
