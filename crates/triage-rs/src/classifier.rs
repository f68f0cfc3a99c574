//! Symptom classification: prompt rendering plus one backend call.
//!
//! [`Classifier::classify`] returns `Result<Assessment, ClassificationError>`
//! for every call. Callers decide what to do with the error; both front-ends
//! turn it into an `"Error: <message>"` assessment via
//! [`ClassificationError::as_assessment`] and keep going.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::api::CompletionBackend;
use crate::prompt::render_prompt;

// ── Errors ─────────────────────────────────────────────────────────

/// Failure of a single classification call.
#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    /// Transport-level failure (DNS, connect, TLS, timeout).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Non-2xx response from the completion API.
    #[error("API HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// The API answered 2xx but reported an error object.
    #[error("API error: {0}")]
    Api(String),
    /// The response body could not be decoded.
    #[error("failed to parse response: {0}")]
    MalformedResponse(String),
    /// The model returned no text.
    #[error("model returned an empty response")]
    EmptyResponse,
}

impl ClassificationError {
    /// The text stored in place of an assessment when a call fails.
    pub fn as_assessment(&self) -> String {
        format!("Error: {self}")
    }
}

// ── Triage levels ──────────────────────────────────────────────────

/// The five urgency levels the prompt template defines, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum TriageLevel {
    Immediate = 1,
    Emergent = 2,
    Urgent = 3,
    LessUrgent = 4,
    NonUrgent = 5,
}

impl TriageLevel {
    /// All levels in ascending number order.
    pub const ALL: [TriageLevel; 5] = [
        TriageLevel::Immediate,
        TriageLevel::Emergent,
        TriageLevel::Urgent,
        TriageLevel::LessUrgent,
        TriageLevel::NonUrgent,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.number() == n)
    }

    /// Label as it appears in the prompt template.
    pub fn label(self) -> &'static str {
        match self {
            TriageLevel::Immediate => "Immediate (life-threatening)",
            TriageLevel::Emergent => "Emergent (unstable vitals, severe symptoms)",
            TriageLevel::Urgent => "Urgent (abnormal but stable)",
            TriageLevel::LessUrgent => "Less Urgent (minor injuries)",
            TriageLevel::NonUrgent => "Non-Urgent (routine care)",
        }
    }
}

impl From<TriageLevel> for u8 {
    fn from(level: TriageLevel) -> u8 {
        level.number()
    }
}

impl fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.number(), self.label())
    }
}

// ── Assessment ─────────────────────────────────────────────────────

/// Verbatim (trimmed) model output for one symptom description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment(String);

/// An assessment that matched the `Triage Level: N - Reason` shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAssessment {
    pub level: TriageLevel,
    pub reason: String,
}

impl Assessment {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Best-effort parse of the expected response shape.
    ///
    /// Accepts `Triage Level: 3 - reason`, `Triage Level: [3] - reason`, and
    /// markdown-bolded variants. Returns `None` for anything else; the raw
    /// text is still the assessment of record.
    pub fn parse(&self) -> Option<ParsedAssessment> {
        parse_assessment(&self.0)
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn parse_assessment(text: &str) -> Option<ParsedAssessment> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    let line = line.trim_matches('*').trim();

    let (head, rest) = line.split_once(':')?;
    if !head.trim().eq_ignore_ascii_case("triage level") {
        return None;
    }

    let rest = rest.trim_start().trim_start_matches('*').trim_start();
    let rest = rest.strip_prefix('[').unwrap_or(rest);
    let mut chars = rest.chars();
    let digit = chars.next()?.to_digit(10)?;
    let level = TriageLevel::from_number(u8::try_from(digit).ok()?)?;

    let after = chars.as_str();
    if after.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let reason = after
        .trim_start_matches(']')
        .trim_start_matches('*')
        .trim_start()
        .trim_start_matches(['-', ':', '–', '—'])
        .trim()
        .trim_end_matches('*')
        .trim()
        .to_string();

    Some(ParsedAssessment { level, reason })
}

// ── Classifier ─────────────────────────────────────────────────────

/// Renders the triage prompt and sends it to a [`CompletionBackend`].
#[derive(Clone)]
pub struct Classifier {
    backend: Arc<dyn CompletionBackend>,
}

impl Classifier {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Classify one symptom description with a single backend call.
    pub async fn classify(&self, symptoms: &str) -> Result<Assessment, ClassificationError> {
        let prompt = render_prompt(symptoms);
        debug!("Classifying {} chars of symptoms", symptoms.len());

        let text = self.backend.complete(&prompt).await.inspect_err(|e| {
            warn!("Classification failed: {e}");
        })?;

        let text = text.trim();
        if text.is_empty() {
            warn!("Classification failed: empty model response");
            return Err(ClassificationError::EmptyResponse);
        }
        Ok(Assessment::new(text))
    }
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier").finish_non_exhaustive()
    }
}
