use std::path::Path;

use serde::{Deserialize, Serialize};

use super::layer::{LayerRole, LogicLayer};
use super::logic::{one_or_many, CombinedLogic, GeneralRules, ReportRules, SectionRules};

/// A logic document as the configuration store keeps it.
///
/// Base rules live under `general`, `report` and `impression`; rules for one
/// study type live under `study_report` and `study_impression`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentLogicDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general: Option<GeneralRules>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportRules>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impression: Option<SectionRules>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_report: Option<ReportRules>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_impression: Option<SectionRules>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub custom_instructions: Vec<String>,
}

impl AgentLogicDocument {
    /// # Errors
    ///
    /// Returns [`RadlogicError::Json`](crate::RadlogicError::Json) if the text
    /// is not a valid logic document.
    pub fn from_json(input: &str) -> Result<Self, crate::RadlogicError> {
        Ok(serde_json::from_str(input)?)
    }

    /// # Errors
    ///
    /// Returns [`RadlogicError`](crate::RadlogicError) on I/O or JSON failure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, crate::RadlogicError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json(&input)
    }

    #[must_use]
    pub fn has_base_sections(&self) -> bool {
        self.general.is_some() || self.report.is_some() || self.impression.is_some()
    }

    #[must_use]
    pub fn has_study_sections(&self) -> bool {
        self.study_report.is_some() || self.study_impression.is_some()
    }

    /// Split the document into a base layer followed by a study layer.
    ///
    /// The base layer is left out when the document has no base sections, so
    /// a study-only document reaches the merger on its own.
    #[must_use]
    pub fn into_layers(self) -> Vec<LogicLayer> {
        let mut layers = Vec::with_capacity(2);
        let has_base = self.has_base_sections();
        let has_study = self.has_study_sections();

        let base = CombinedLogic {
            general: self.general,
            section_rules: self.impression,
            report: self.report,
            custom_instructions: self.custom_instructions,
        };

        if has_base || !has_study {
            layers.push(LogicLayer::new(LayerRole::General, base));
            if has_study {
                layers.push(LogicLayer::new(
                    LayerRole::StudyOverride,
                    CombinedLogic {
                        section_rules: self.study_impression,
                        report: self.study_report,
                        ..CombinedLogic::default()
                    },
                ));
            }
        } else {
            layers.push(LogicLayer::new(
                LayerRole::StudyOverride,
                CombinedLogic {
                    section_rules: self.study_impression,
                    report: self.study_report,
                    custom_instructions: base.custom_instructions,
                    ..CombinedLogic::default()
                },
            ));
        }

        layers
    }

    /// Merge the document's layers into one logic object.
    #[must_use]
    pub fn combine(self) -> CombinedLogic {
        crate::merge::merge(&self.into_layers())
    }
}
