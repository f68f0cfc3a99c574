//! Per-submission flow shared by both front-ends, and the console loop.
//!
//! Every submission goes through [`submit`]:
//!
//! ```text
//! Idle ──blank──▶ Rejected (no model call, no record)
//!   │
//!   └──text──▶ Classifying ──ok──▶ Classified(record)
//!                          └─err─▶ Failed { record: "Error: ...", error }
//! ```
//!
//! Storing the record is left to the front-end: the form appends each one
//! immediately, the console collects them and saves once at exit.

use std::borrow::Cow;
use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use crate::classifier::{ClassificationError, Classifier};
use crate::record::ClassificationRecord;
use crate::store::{ResultStore, StoreError};

/// Input that ends the console loop (case-insensitive).
pub const SENTINEL: &str = "done";

/// Prompt printed before each console read.
pub const INPUT_PROMPT: &str = "Enter symptoms: ";

/// Outcome of one submission.
#[derive(Debug)]
pub enum Submission {
    /// Blank or whitespace-only input.
    Rejected,
    Classified(ClassificationRecord),
    /// The model call failed; the record carries the error text.
    Failed {
        record: ClassificationRecord,
        error: ClassificationError,
    },
}

impl Submission {
    pub fn record(&self) -> Option<&ClassificationRecord> {
        match self {
            Submission::Rejected => None,
            Submission::Classified(record) | Submission::Failed { record, .. } => Some(record),
        }
    }

    pub fn into_record(self) -> Option<ClassificationRecord> {
        match self {
            Submission::Rejected => None,
            Submission::Classified(record) | Submission::Failed { record, .. } => Some(record),
        }
    }
}

/// Run one submission through the classifier.
///
/// Blank input never reaches the backend. The stored symptom text is the
/// input with surrounding whitespace removed.
pub async fn submit(classifier: &Classifier, input: &str) -> Submission {
    let symptoms = input.trim();
    if symptoms.is_empty() {
        return Submission::Rejected;
    }

    match classifier.classify(symptoms).await {
        Ok(assessment) => {
            Submission::Classified(ClassificationRecord::classified(symptoms, assessment))
        }
        Err(error) => Submission::Failed {
            record: ClassificationRecord::failed(symptoms, &error),
            error,
        },
    }
}

// ── Console loop ───────────────────────────────────────────────────

/// How the console persists its batch at exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    /// Replace the file with exactly this session's records.
    #[default]
    Overwrite,
    /// Append this session's records after whatever the file holds.
    Append,
}

/// Records collected during one console session.
#[derive(Debug, Default)]
pub struct SessionSummary {
    pub records: Vec<ClassificationRecord>,
    /// How many of `records` carry an error assessment.
    pub failures: usize,
    /// Console I/O error that ended the session early, if any. The records
    /// gathered before it are still in `records`.
    pub interrupted: Option<io::Error>,
}

/// Interactive console loop: read, classify, print, repeat until `done`.
pub struct InteractionLoop<'a, R, W> {
    classifier: &'a Classifier,
    input: R,
    output: W,
}

impl<'a, R, W> InteractionLoop<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(classifier: &'a Classifier, input: R, output: W) -> Self {
        Self {
            classifier,
            input,
            output,
        }
    }

    /// Run until the sentinel or end of input.
    ///
    /// Classification failures are printed and recorded. A console I/O error
    /// stops the loop and is returned in [`SessionSummary::interrupted`]
    /// alongside everything classified so far.
    pub async fn run(mut self) -> SessionSummary {
        let mut summary = SessionSummary::default();

        if let Err(e) = self.drive(&mut summary).await {
            warn!("Console I/O failed, ending session early: {e}");
            summary.interrupted = Some(e);
        }

        info!(
            "Session ended with {} record(s), {} failure(s)",
            summary.records.len(),
            summary.failures
        );
        summary
    }

    async fn drive(&mut self, summary: &mut SessionSummary) -> io::Result<()> {
        writeln!(
            self.output,
            "Enter patient symptoms one at a time. Type '{SENTINEL}' to finish.\n"
        )?;

        let mut buf = Vec::new();
        loop {
            write!(self.output, "{INPUT_PROMPT}")?;
            self.output.flush()?;

            buf.clear();
            if self.input.read_until(b'\n', &mut buf).await? == 0 {
                return Ok(());
            }
            let line = String::from_utf8_lossy(&buf);
            if let Cow::Owned(_) = line {
                warn!("Input line was not valid UTF-8; invalid bytes replaced");
            }
            let entry = line.trim();
            if entry.eq_ignore_ascii_case(SENTINEL) {
                return Ok(());
            }

            match submit(self.classifier, entry).await {
                Submission::Rejected => {}
                Submission::Classified(record) => {
                    let shown = format!("{}\n", record.assessment);
                    summary.records.push(record);
                    writeln!(self.output, "{shown}")?;
                }
                Submission::Failed { record, error } => {
                    summary.failures += 1;
                    summary.records.push(record);
                    writeln!(self.output, " Error: {error}")?;
                }
            }
        }
    }
}

/// Persist a finished session and report the outcome on `output`.
///
/// With no records nothing is written. A storage failure is reported and
/// returned; it never panics.
pub fn save_session(
    store: &ResultStore,
    mode: SaveMode,
    records: &[ClassificationRecord],
    output: &mut impl Write,
) -> Result<(), StoreError> {
    if records.is_empty() {
        let _ = writeln!(output, "\n No symptoms entered.");
        return Ok(());
    }

    let result = match mode {
        SaveMode::Overwrite => store.overwrite(records),
        SaveMode::Append => records.iter().try_for_each(|r| store.append(r)),
    };

    match &result {
        Ok(()) => {
            let _ = writeln!(
                output,
                "\n Triage results saved to {}",
                store.path().display()
            );
        }
        Err(e) => {
            warn!("Saving results failed: {e}");
            let _ = writeln!(output, "\n Failed to save results: {e}");
        }
    }
    result
}
