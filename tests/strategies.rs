#![allow(dead_code)]

use proptest::prelude::*;
use radlogic::{
    CombinedLogic, ExclusionRule, FormatSpec, FormatStyle, GeneralRules, LayerRole, LogicLayer,
    OpeningPhrase, PriorityLists, SectionRules, Spacing, Tone,
};

// --- Fixed vocabulary ---
// Findings, conditions and keywords are drawn from small pools so generated
// layers overlap and duplicates across layers are common.

pub const FINDINGS: &[&str] = &[
    "joint effusion",
    "Baker cyst",
    "osteophyte",
    "meniscal tear",
    "bone contusion",
    "small pneumothorax",
];
pub const CONDITIONS: &[&str] = &["larger than 2 cm", "tension", "new since prior", "symptomatic"];
pub const KEYWORDS: &[&str] = &["fracture", "tear", "acute", "hemorrhage"];
pub const RULES: &[&str] = &[
    "Be concise",
    "Mention comparison",
    "Use anatomic order",
    "Avoid hedging",
];
const TONES: &[&str] = &["balanced", "cautious", "definitive", "neutral"];
const OPENINGS: &[&str] = &["No acute", "Stable"];
const DISALLOWED: &[&str] = &["patient_name", "date", "history"];
const BULLETS: &[&str] = &["", "- ", "• ", "* "];

pub fn arb_exclusion() -> impl Strategy<Value = ExclusionRule> {
    prop_oneof![
        prop::sample::select(FINDINGS).prop_map(|f| ExclusionRule::finding(f)),
        (prop::sample::select(FINDINGS), prop::sample::select(CONDITIONS))
            .prop_map(|(f, c)| ExclusionRule::unless(f, c)),
    ]
}

fn arb_words(pool: &'static [&'static str], max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(pool).prop_map(str::to_owned), 0..=max)
}

pub fn arb_style() -> impl Strategy<Value = FormatStyle> {
    prop::sample::select(vec![
        FormatStyle::NumericallyItemized,
        FormatStyle::BulletPoints,
        FormatStyle::Paragraph,
        FormatStyle::Unformatted,
        FormatStyle::Unrecognized,
    ])
}

pub fn arb_format() -> impl Strategy<Value = Option<FormatSpec>> {
    prop::option::of(
        (
            prop::option::of(arb_style()),
            prop::option::of(prop::sample::select(vec![Spacing::Single, Spacing::Double])),
        )
            .prop_map(|(style, spacing)| FormatSpec { style, spacing }),
    )
}

pub fn arb_priority() -> impl Strategy<Value = Option<PriorityLists>> {
    prop::option::of(
        (
            arb_words(FINDINGS, 2),
            arb_words(KEYWORDS, 3),
            arb_words(FINDINGS, 2),
        )
            .prop_map(|(first, keywords, last)| PriorityLists {
                high_priority_findings: first,
                high_priority_keywords: keywords,
                low_priority_findings: last,
                ..PriorityLists::default()
            }),
    )
}

pub fn arb_section() -> impl Strategy<Value = SectionRules> {
    (
        arb_format(),
        prop::collection::vec(arb_exclusion(), 0..4),
        prop::option::of(prop::sample::select(OPENINGS)),
        arb_priority(),
        arb_words(RULES, 3),
        prop::option::of(any::<bool>()),
        prop::option::of(any::<bool>()),
    )
        .prop_map(
            |(format, exclusions, phrase, priority, custom, recommend, differential)| SectionRules {
                format,
                exclude_by_default: exclusions,
                required_opening_phrase: phrase.map(OpeningPhrase::required),
                priority,
                custom_rules: custom,
                include_recommendations: recommend,
                differential_diagnosis: differential,
            },
        )
}

pub fn arb_general() -> impl Strategy<Value = GeneralRules> {
    (
        prop::option::of(prop::sample::select(TONES)),
        prop::collection::btree_map(
            prop::sample::select(DISALLOWED).prop_map(str::to_owned),
            any::<bool>(),
            0..3,
        ),
    )
        .prop_map(|(tone, items)| GeneralRules {
            tone: tone.map(|s| Tone {
                style: Some(s.to_owned()),
            }),
            disallowed_items: items,
            ..GeneralRules::default()
        })
}

pub fn arb_logic() -> impl Strategy<Value = CombinedLogic> {
    (
        prop::option::of(arb_general()),
        prop::option::of(arb_section()),
        arb_words(RULES, 2),
    )
        .prop_map(|(general, section_rules, instructions)| CombinedLogic {
            general,
            section_rules,
            report: None,
            custom_instructions: instructions,
        })
}

/// A layer that never takes the lone-study-layer path.
pub fn arb_general_layer() -> impl Strategy<Value = LogicLayer> {
    arb_logic().prop_map(|logic| LogicLayer::new(LayerRole::General, logic))
}

pub fn arb_findings() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FINDINGS), 1..5).prop_map(|f| f.join(". "))
}

/// Free rule text mixing headers, bullets, examples and blank lines.
pub fn arb_rule_text() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        Just("Exclusions:".to_owned()),
        Just("Priority Keywords:".to_owned()),
        Just("Custom Rules:".to_owned()),
        Just("General Rules:".to_owned()),
        Just(String::new()),
        Just("•".to_owned()),
        Just("Example: cyst (unless large)".to_owned()),
        (prop::sample::select(BULLETS), prop::sample::select(FINDINGS))
            .prop_map(|(bullet, f)| format!("{bullet}{f}")),
        (prop::sample::select(FINDINGS), prop::sample::select(CONDITIONS))
            .prop_map(|(f, c)| format!("- {f} (unless {c})")),
        prop::sample::select(RULES).prop_map(str::to_owned),
    ];
    prop::collection::vec(line, 0..12).prop_map(|lines| lines.join("\n"))
}
