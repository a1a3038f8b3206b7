use std::fmt;

use serde::{Deserialize, Serialize};

/// A finding the generated text should leave out.
///
/// Either a bare finding name or a finding paired with an `unless` condition.
/// The condition is carried through unevaluated; the compiler renders it as
/// `UNLESS <condition>` and leaves the judgement to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExclusionRule {
    Finding(String),
    Conditional {
        finding: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unless: Option<String>,
    },
}

impl ExclusionRule {
    pub fn finding(name: impl Into<String>) -> Self {
        Self::Finding(name.into())
    }

    pub fn unless(name: impl Into<String>, condition: impl Into<String>) -> Self {
        Self::Conditional {
            finding: name.into(),
            unless: Some(condition.into()),
        }
    }

    /// The excluded finding, as authored.
    #[must_use]
    pub fn finding_text(&self) -> &str {
        match self {
            Self::Finding(name) | Self::Conditional { finding: name, .. } => name,
        }
    }

    #[must_use]
    pub fn condition(&self) -> Option<&str> {
        match self {
            Self::Finding(_) => None,
            Self::Conditional { unless, .. } => unless.as_deref(),
        }
    }

    /// True when there is nothing to exclude.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.finding_text().trim().is_empty()
    }
}

/// Renders the bullet body used in the exclusion block.
///
/// Bare names are legacy identifiers (`joint_effusion`), so they are shown
/// lower-cased with underscores as spaces. Conditional entries keep their
/// authored text.
impl fmt::Display for ExclusionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finding(name) => write!(f, "{}", name.replace('_', " ").to_lowercase()),
            Self::Conditional {
                finding,
                unless: Some(condition),
            } if !condition.trim().is_empty() => write!(f, "{finding} UNLESS {condition}"),
            Self::Conditional { finding, .. } => write!(f, "{finding}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_finding_is_humanized() {
        let rule = ExclusionRule::finding("Joint_Effusion");
        assert_eq!(rule.to_string(), "joint effusion");
    }

    #[test]
    fn conditional_renders_unless() {
        let rule = ExclusionRule::unless("small pneumothorax", "tension");
        assert_eq!(rule.to_string(), "small pneumothorax UNLESS tension");
        assert_eq!(rule.condition(), Some("tension"));
    }

    #[test]
    fn conditional_without_condition_renders_finding_only() {
        let rule = ExclusionRule::Conditional {
            finding: "Baker cyst".into(),
            unless: None,
        };
        assert_eq!(rule.to_string(), "Baker cyst");
    }

    #[test]
    fn deserializes_both_shapes() {
        let rules: Vec<ExclusionRule> = serde_json::from_str(
            r#"["degenerative_changes", {"finding": "cyst", "unless": "larger than 2 cm"}, {"finding": "osteophyte"}]"#,
        )
        .unwrap();
        assert_eq!(rules[0], ExclusionRule::finding("degenerative_changes"));
        assert_eq!(rules[1], ExclusionRule::unless("cyst", "larger than 2 cm"));
        assert_eq!(rules[2].condition(), None);
        assert_eq!(rules[2].finding_text(), "osteophyte");
    }

    #[test]
    fn blank_detection() {
        assert!(ExclusionRule::finding("  ").is_blank());
        assert!(!ExclusionRule::finding("cyst").is_blank());
    }
}
