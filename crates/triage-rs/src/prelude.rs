//! Convenience re-exports for the types most front-ends need.
//!
//! ```ignore
//! use triage_rs::prelude::*;
//! ```

pub use crate::api::{ChatClient, CompletionBackend, CompletionFuture};
pub use crate::classifier::{
    Assessment, ClassificationError, Classifier, ParsedAssessment, TriageLevel,
};
pub use crate::config::{ConfigError, TriageConfig};
pub use crate::prompt::render_prompt;
pub use crate::record::ClassificationRecord;
pub use crate::session::{
    InteractionLoop, SaveMode, SessionSummary, Submission, save_session, submit,
};
pub use crate::store::{ResultStore, StoreError};
