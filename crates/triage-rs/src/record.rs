//! The `{symptoms, assessment}` pair persisted for every processed input.

use serde::{Deserialize, Serialize};

use crate::classifier::{Assessment, ClassificationError, ParsedAssessment, parse_assessment};

/// CSV column name for the symptom text.
pub const SYMPTOMS_COLUMN: &str = "Symptoms";
/// CSV column name for the model's assessment.
pub const ASSESSMENT_COLUMN: &str = "Triage Assessment";

/// One classified symptom description.
///
/// `assessment` holds either the verbatim model text or, when the call
/// failed, `"Error: <message>"`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ClassificationRecord {
    #[serde(rename = "Symptoms")]
    pub symptoms: String,
    #[serde(rename = "Triage Assessment")]
    pub assessment: String,
}

impl ClassificationRecord {
    pub fn new(symptoms: impl Into<String>, assessment: impl Into<String>) -> Self {
        Self {
            symptoms: symptoms.into(),
            assessment: assessment.into(),
        }
    }

    /// Record for a successful call.
    pub fn classified(symptoms: impl Into<String>, assessment: Assessment) -> Self {
        Self::new(symptoms, assessment.into_string())
    }

    /// Record for a failed call, carrying the error text as its assessment.
    pub fn failed(symptoms: impl Into<String>, error: &ClassificationError) -> Self {
        Self::new(symptoms, error.as_assessment())
    }

    /// Best-effort parse of the assessment into a level and reason.
    pub fn parsed(&self) -> Option<ParsedAssessment> {
        parse_assessment(&self.assessment)
    }
}
