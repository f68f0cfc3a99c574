//! The fixed triage instruction template.
//!
//! The template enumerates the five [`TriageLevel`]s in urgency order and asks
//! the model to reply with a single `Triage Level: N - Reason` line. The only
//! variable part is the symptom text, which is inserted verbatim.

use crate::classifier::TriageLevel;

/// Placeholder replaced by the symptom text.
const SYMPTOMS_PLACEHOLDER: &str = "{symptoms}";

/// The answer shape the model is instructed to use.
pub const RESPONSE_FORMAT: &str = "Triage Level: [1-5] - Reason";

const PREAMBLE: &str =
    "You are a triage assistant classifying emergency patients into five levels:";

/// Render the template with the level list filled in and the
/// `{symptoms}` placeholder still in place.
fn template() -> String {
    let levels: Vec<String> = TriageLevel::ALL
        .iter()
        .map(|level| format!("{} - {}", level.number(), level.label()))
        .collect();

    format!(
        "{PREAMBLE}\n\n{}\n\nClassify the following:\n\nSymptoms: {SYMPTOMS_PLACEHOLDER}\n\n\
         Respond only like this:\n{RESPONSE_FORMAT}\n",
        levels.join("\n")
    )
}

/// Build the classification prompt for one symptom description.
///
/// The text is substituted as-is; rejecting blank input is the caller's job.
pub fn render_prompt(symptoms: &str) -> String {
    // Single substitution so placeholder-like text inside the symptoms is left alone.
    template().replacen(SYMPTOMS_PLACEHOLDER, symptoms, 1)
}
