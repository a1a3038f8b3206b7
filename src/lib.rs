mod compile;
mod error;
mod merge;
pub mod parse;
mod review;
mod types;

pub use compile::{
    compile, compile_report, ReportOptions, DEFAULT_IMPRESSION_PROMPT, DEFAULT_REPORT_PROMPT,
};
pub use error::RadlogicError;
pub use merge::{merge, LayerStack};
pub use parse::{parse, parse_findings_rules, parse_flat};
pub use review::{review, PostProcessor, RuleValidator};
pub use types::{
    AgentLogicDocument, CombinedLogic, CorrectionRule, Corrections, ExclusionRule,
    FindingsRuleSet, FormatSpec, FormatStyle, GeneralRules, LayerRole, LogicLayer, OpeningPhrase,
    ParsedRuleSet, PriorityLists, ReportFormatting, ReportLanguage, ReportRules, RoutingRule,
    RuleLayer, SectionRules, Spacing, ToggledList, Tone, ValidationReport,
};
