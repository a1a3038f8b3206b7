mod document;
mod exclusion;
mod layer;
mod logic;
mod ruleset;
mod validation_report;

pub use document::AgentLogicDocument;
pub use exclusion::ExclusionRule;
pub use layer::{LayerRole, LogicLayer, RuleLayer};
pub use logic::{
    CombinedLogic, CorrectionRule, Corrections, FormatSpec, FormatStyle, GeneralRules,
    OpeningPhrase, PriorityLists, ReportFormatting, ReportLanguage, ReportRules, RoutingRule,
    SectionRules, Spacing, ToggledList, Tone,
};
pub use ruleset::{FindingsRuleSet, ParsedRuleSet};
pub use validation_report::ValidationReport;
