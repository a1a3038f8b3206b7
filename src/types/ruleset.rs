use serde::{Deserialize, Serialize};

use super::exclusion::ExclusionRule;
use super::logic::{CombinedLogic, CorrectionRule, PriorityLists, SectionRules};

/// The canonical result of parsing one rule layer.
///
/// `exclude_by_default` and `priority` are `None` rather than empty when the
/// layer had nothing for them. Past this boundary (in [`SectionRules`]) the
/// two states are no longer distinguished.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedRuleSet {
    #[serde(alias = "customRules")]
    pub custom_rules: Vec<String>,
    #[serde(alias = "excludeByDefault", skip_serializing_if = "Option::is_none")]
    pub exclude_by_default: Option<Vec<ExclusionRule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<PriorityLists>,
}

impl ParsedRuleSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.custom_rules.is_empty() && self.exclude_by_default.is_none() && self.priority.is_none()
    }

    /// Number of directives carried, across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        let priority = self
            .priority
            .as_ref()
            .map_or(0, |p| p.lists().iter().map(|l| l.len()).sum());
        self.custom_rules.len() + self.exclude_by_default.as_ref().map_or(0, Vec::len) + priority
    }
}

impl From<ParsedRuleSet> for SectionRules {
    fn from(parsed: ParsedRuleSet) -> Self {
        Self {
            exclude_by_default: parsed.exclude_by_default.unwrap_or_default(),
            priority: parsed.priority,
            custom_rules: parsed.custom_rules,
            ..Self::default()
        }
    }
}

impl From<ParsedRuleSet> for CombinedLogic {
    fn from(parsed: ParsedRuleSet) -> Self {
        Self {
            section_rules: Some(parsed.into()),
            ..Self::default()
        }
    }
}

/// Parse result of a global findings-rules block: free-standing rules plus
/// any `Replace X with Y` corrections found among them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindingsRuleSet {
    pub custom_rules: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub corrections: Vec<CorrectionRule>,
}
