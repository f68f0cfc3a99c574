//! Remote completion layer.
//!
//! - [`CompletionBackend`] — the seam between the classifier and whatever
//!   produces model text. Object-safe so front-ends can share an
//!   `Arc<dyn CompletionBackend>`.
//! - [`client`] — [`ChatClient`], the reqwest implementation for
//!   OpenAI-compatible chat completion endpoints (Groq by default).

pub mod client;

use std::future::Future;
use std::pin::Pin;

use crate::classifier::ClassificationError;

pub use client::{ChatClient, ChatRequest, Message, MessageRole};

/// Boxed future returned by [`CompletionBackend::complete`].
pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, ClassificationError>> + Send + 'a>>;

/// Something that turns a rendered prompt into model text.
///
/// Implementations make exactly one attempt per call. Retrying, if ever
/// wanted, belongs to the caller.
pub trait CompletionBackend: Send + Sync {
    fn complete(&self, prompt: &str) -> CompletionFuture<'_>;
}
