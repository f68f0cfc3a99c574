//! Patient-symptom triage classifier backed by a hosted LLM.
//!
//! `triage-rs` sends free-text symptoms to an OpenAI-compatible chat
//! completion API (Groq by default) with a fixed instruction template, keeps
//! the model's one-line answer as the assessment, and persists
//! `{symptoms, assessment}` rows to a CSV file.
//!
//! # Getting started
//!
//! ```ignore
//! use std::sync::Arc;
//! use triage_rs::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TriageConfig::from_env()?;
//!     let classifier = Classifier::new(Arc::new(ChatClient::new(&config)?));
//!     let store = ResultStore::new(&config.results_path);
//!
//!     if let Some(record) = submit(&classifier, "fever and cough").await.into_record() {
//!         println!("{}", record.assessment);
//!         store.append(&record)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`prompt`] | Fixed triage template and [`render_prompt`](prompt::render_prompt) |
//! | [`api`] | [`CompletionBackend`](api::CompletionBackend) seam and the [`ChatClient`](api::ChatClient) HTTP client |
//! | [`classifier`] | [`Classifier`](classifier::Classifier), [`Assessment`](classifier::Assessment), [`TriageLevel`](classifier::TriageLevel), errors |
//! | [`record`] | [`ClassificationRecord`](record::ClassificationRecord) |
//! | [`store`] | [`ResultStore`](store::ResultStore) CSV persistence |
//! | [`session`] | Shared [`submit`](session::submit) step and the console [`InteractionLoop`](session::InteractionLoop) |
//! | [`config`] | [`TriageConfig`](config::TriageConfig) startup settings |
//! | [`logging`] | Tracing subscriber setup |

pub mod api;
pub mod classifier;
pub mod config;
pub mod logging;
pub mod prelude;
pub mod prompt;
pub mod record;
pub mod session;
pub mod store;

// ── Constants ──────────────────────────────────────────────────────

/// Groq's OpenAI-compatible API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

/// Default CSV result file, relative to the working directory.
pub const DEFAULT_RESULTS_PATH: &str = "triage_results.csv";

/// Sampling temperature for the console front-end.
pub const CONSOLE_TEMPERATURE: f32 = 0.3;

/// Sampling temperature for the form front-end.
pub const FORM_TEMPERATURE: f32 = 0.4;

pub const API_KEY_ENV: &str = "GROQ_API_KEY";
pub const MODEL_ENV: &str = "MODEL_NAME";
pub const API_URL_ENV: &str = "TRIAGE_API_URL";
pub const RESULTS_PATH_ENV: &str = "TRIAGE_RESULTS_PATH";
