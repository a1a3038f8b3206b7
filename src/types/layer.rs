use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use super::logic::CombinedLogic;
use super::ruleset::ParsedRuleSet;

/// Keys whose presence marks a JSON object as an already-parsed rule set.
const STRUCTURED_KEYS: [&str; 5] = [
    "custom_rules",
    "exclude_by_default",
    "priority",
    "customRules",
    "excludeByDefault",
];

/// One rule fragment as the host supplies it: free text authored by a
/// clinician, or a rule set that is already structured.
///
/// [`parse`](crate::parse::parse) normalizes either form to a
/// [`ParsedRuleSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RuleLayer {
    Text(String),
    Structured(ParsedRuleSet),
}

impl RuleLayer {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Classify a JSON value from the configuration store.
    ///
    /// Strings and `{"text": ...}` objects are free text; objects carrying any
    /// rule-set key are structured. Anything else (`null`, `{}`, numbers) is an
    /// absent layer and yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if a structured object has fields of
    /// the wrong type.
    pub fn from_value(value: Json) -> Result<Option<Self>, serde_json::Error> {
        match value {
            Json::String(text) => Ok(Some(Self::Text(text))),
            Json::Object(map) => {
                if let Some(Json::String(text)) = map.get("text") {
                    return Ok(Some(Self::Text(text.clone())));
                }
                if STRUCTURED_KEYS.iter().any(|k| map.contains_key(*k)) {
                    let parsed = serde_json::from_value(Json::Object(map))?;
                    return Ok(Some(Self::Structured(parsed)));
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    /// Parse a layer from JSON text. See [`from_value`](Self::from_value).
    ///
    /// # Errors
    ///
    /// Returns [`RadlogicError::Json`](crate::RadlogicError::Json) on malformed
    /// JSON or a mistyped structured object.
    pub fn from_json(input: &str) -> Result<Option<Self>, crate::RadlogicError> {
        let value: Json = serde_json::from_str(input)?;
        Ok(Self::from_value(value)?)
    }

    /// Read a layer from disk. `.json` files go through
    /// [`from_json`](Self::from_json); any other file is free text.
    ///
    /// # Errors
    ///
    /// Returns [`RadlogicError`](crate::RadlogicError) on I/O or JSON failure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Option<Self>, crate::RadlogicError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
            Self::from_json(&input)
        } else {
            Ok(Some(Self::Text(input)))
        }
    }
}

impl From<&str> for RuleLayer {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for RuleLayer {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<ParsedRuleSet> for RuleLayer {
    fn from(parsed: ParsedRuleSet) -> Self {
        Self::Structured(parsed)
    }
}

/// Where a layer sits in the configuration hierarchy.
///
/// Merge precedence comes from declaration order, not from the role. The
/// role only decides whether the legacy single-study-layer path applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerRole {
    /// Cross-study defaults.
    Global,
    /// Base rules shared by report and impression.
    General,
    /// Rules for one output section, such as the impression.
    SectionSpecific,
    /// Rules for one study type.
    StudyOverride,
}

impl LayerRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::General => "general",
            Self::SectionSpecific => "section-specific",
            Self::StudyOverride => "study-override",
        }
    }
}

impl fmt::Display for LayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logic fragment tagged with its role, ready to merge.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicLayer {
    pub role: LayerRole,
    pub logic: CombinedLogic,
}

impl LogicLayer {
    #[must_use]
    pub fn new(role: LayerRole, logic: CombinedLogic) -> Self {
        Self { role, logic }
    }

    /// Parse a rule layer and lift it into the section rules.
    #[must_use]
    pub fn from_rules(role: LayerRole, layer: &RuleLayer) -> Self {
        Self::new(role, crate::parse::parse(layer).into())
    }

    /// Load a raw logic object from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RadlogicError::Json`](crate::RadlogicError::Json) if the text
    /// is not a valid logic object.
    pub fn from_json(role: LayerRole, input: &str) -> Result<Self, crate::RadlogicError> {
        Ok(Self::new(role, CombinedLogic::from_json(input)?))
    }
}
