use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::exclusion::ExclusionRule;

/// The merged configuration a prompt is compiled from.
///
/// Every field is optional. A default (empty) value is valid input to the
/// compiler and renders a minimal document.
///
/// The section rules are read from either a `section_rules` or an
/// `impression` key, so stored impression logic loads as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinedLogic {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general: Option<GeneralRules>,
    #[serde(alias = "impression", skip_serializing_if = "Option::is_none")]
    pub section_rules: Option<SectionRules>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportRules>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub custom_instructions: Vec<String>,
}

impl CombinedLogic {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a logic object from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RadlogicError::Json`](crate::RadlogicError::Json) if the text
    /// is not a valid logic object.
    pub fn from_json(input: &str) -> Result<Self, crate::RadlogicError> {
        Ok(serde_json::from_str(input)?)
    }

    /// True when no section carries any configuration.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Rules that apply to every generated section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrections: Option<Corrections>,
    /// Item name to whether it is disallowed. Only `true` entries render.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub disallowed_items: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disallowed_symbols: Option<ToggledList>,
}

impl GeneralRules {
    /// Disallowed item names, underscores shown as spaces.
    pub fn disallowed(&self) -> impl Iterator<Item = String> + '_ {
        self.disallowed_items
            .iter()
            .filter(|(_, on)| **on)
            .map(|(name, _)| name.replace('_', " "))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tone {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Corrections {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<CorrectionRule>,
}

impl Corrections {
    /// Rules to render. An explicit `enabled: false` silences all of them;
    /// rules missing either side are skipped.
    pub fn active(&self) -> impl Iterator<Item = &CorrectionRule> {
        let on = self.enabled != Some(false);
        self.rules.iter().filter(move |r| on && r.is_complete())
    }
}

/// A find/replace terminology correction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionRule {
    pub find: String,
    pub replace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CorrectionRule {
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.find.is_empty() && !self.replace.is_empty()
    }

    /// `Replace "a" with "b"`, plus ` (description)` when one is set.
    #[must_use]
    pub fn directive(&self) -> String {
        match self.description.as_deref().filter(|d| !d.is_empty()) {
            Some(d) => format!(r#"Replace "{}" with "{}" ({d})"#, self.find, self.replace),
            None => format!(r#"Replace "{}" with "{}""#, self.find, self.replace),
        }
    }
}

/// A list that can be switched off without being cleared.
///
/// Stored documents name the list after its contents (`symbols`, `words`,
/// `phrases`, `sections`); all of them load into `items`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggledList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(
        alias = "symbols",
        alias = "words",
        alias = "phrases",
        alias = "sections",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub items: Vec<String>,
}

impl ToggledList {
    /// The items, if the list is switched on and non-empty.
    #[must_use]
    pub fn active(&self) -> Option<&[String]> {
        (self.enabled == Some(true) && !self.items.is_empty()).then_some(self.items.as_slice())
    }
}

/// Section-specific rules (impression by default).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_by_default: Vec<ExclusionRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_opening_phrase: Option<OpeningPhrase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<PriorityLists>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_rules: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_recommendations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub differential_diagnosis: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<FormatStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<Spacing>,
}

impl FormatSpec {
    #[must_use]
    pub fn styled(style: FormatStyle) -> Self {
        Self {
            style: Some(style),
            spacing: None,
        }
    }

    #[must_use]
    pub fn spaced(mut self, spacing: Spacing) -> Self {
        self.spacing = Some(spacing);
        self
    }
}

/// How list-like output should be laid out.
///
/// Unknown strings load as [`FormatStyle::Unrecognized`], which renders no
/// formatting directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FormatStyle {
    NumericallyItemized,
    BulletPoints,
    Paragraph,
    /// Stored as `"none"`: continuous prose.
    Unformatted,
    Unrecognized,
}

impl FormatStyle {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NumericallyItemized => "numerically_itemized",
            Self::BulletPoints => "bullet_points",
            Self::Paragraph => "paragraph",
            Self::Unformatted => "none",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl From<String> for FormatStyle {
    fn from(value: String) -> Self {
        match value.as_str() {
            "numerically_itemized" => Self::NumericallyItemized,
            "bullet_points" => Self::BulletPoints,
            "paragraph" => Self::Paragraph,
            "none" => Self::Unformatted,
            _ => Self::Unrecognized,
        }
    }
}

impl From<FormatStyle> for String {
    fn from(value: FormatStyle) -> Self {
        value.as_str().to_owned()
    }
}

/// Spacing between list items. Anything other than `"double"` is single.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Spacing {
    #[default]
    Single,
    Double,
}

impl From<String> for Spacing {
    fn from(value: String) -> Self {
        if value == "double" {
            Self::Double
        } else {
            Self::Single
        }
    }
}

impl From<Spacing> for String {
    fn from(value: Spacing) -> Self {
        match value {
            Spacing::Single => "single".to_owned(),
            Spacing::Double => "double".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpeningPhrase {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phrase: Option<String>,
}

impl OpeningPhrase {
    pub fn required(phrase: impl Into<String>) -> Self {
        Self {
            enabled: Some(true),
            phrase: Some(phrase.into()),
        }
    }

    /// The phrase, if enabled and non-empty.
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        if self.enabled != Some(true) {
            return None;
        }
        self.phrase.as_deref().filter(|p| !p.is_empty())
    }
}

/// Ordering hints for the generated list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityLists {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub high_priority_findings: Vec<String>,
    #[serde(alias = "highPriorityKeywords", skip_serializing_if = "Vec::is_empty")]
    pub high_priority_keywords: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mid_priority_findings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mid_priority_keywords: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub low_priority_findings: Vec<String>,
    #[serde(alias = "lowPriorityKeywords", skip_serializing_if = "Vec::is_empty")]
    pub low_priority_keywords: Vec<String>,
}

impl PriorityLists {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// The six lists in a fixed order, for field-wise operations.
    pub(crate) fn lists(&self) -> [&[String]; 6] {
        [
            &self.high_priority_findings,
            &self.high_priority_keywords,
            &self.mid_priority_findings,
            &self.mid_priority_keywords,
            &self.low_priority_findings,
            &self.low_priority_keywords,
        ]
    }

    pub(crate) fn lists_mut(&mut self) -> [&mut Vec<String>; 6] {
        [
            &mut self.high_priority_findings,
            &mut self.high_priority_keywords,
            &mut self.mid_priority_findings,
            &mut self.mid_priority_keywords,
            &mut self.low_priority_findings,
            &mut self.low_priority_keywords,
        ]
    }
}

/// Rules for the body (findings) of a full report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrections: Option<Corrections>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatting: Option<ReportFormatting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<ReportLanguage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub anatomic_routing_rules: Vec<RoutingRule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_rules: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportFormatting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_bullet_points: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_template_punctuation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prevent_unnecessary_capitalization: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLanguage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid_words: Option<ToggledList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid_phrases: Option<ToggledList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expand_lesion_descriptions: Option<bool>,
}

/// Sends findings that mention `condition` to a named report section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingRule {
    pub condition: String,
    pub route_to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accepts `"text"`, `["a", "b"]` or `null`.
pub(crate) fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}
