//! Single-page form UI for the triage classifier.
//!
//! `triage-web` serves one HTML page with a symptom textarea and a submit
//! button, plus a small JSON API the page talks to:
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /` | The form page |
//! | `POST /api/classify` | Classify `{"symptoms": "..."}` and append the record |
//! | `GET /api/results.csv` | Download the cumulative result file |
//! | `GET /api/health` | Liveness probe |
//!
//! # Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use triage_rs::prelude::*;
//! use triage_web::{WebConfig, spawn_web};
//!
//! let config = TriageConfig::from_env()?;
//! let classifier = Classifier::new(Arc::new(ChatClient::new(&config)?));
//! let store = ResultStore::new(&config.results_path);
//!
//! let addr = spawn_web(classifier, store, WebConfig::default()).await?;
//! println!("Triage form: http://{addr}");
//! ```
//!
//! Submissions are processed one at a time: classification and the CSV
//! append for a request finish before the next request starts classifying.

mod api;
mod page;
mod server;

pub use api::{ClassifyRequest, ClassifyResponse};

use std::net::SocketAddr;

use triage_rs::classifier::Classifier;
use triage_rs::store::ResultStore;

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:8501`.
    pub bind_addr: SocketAddr,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8501)),
        }
    }
}

/// Bind the server and run it on a Tokio task.
///
/// Returns the bound address (useful with port 0). The server runs until the
/// Tokio runtime shuts down.
pub async fn spawn_web(
    classifier: Classifier,
    store: ResultStore,
    config: WebConfig,
) -> std::io::Result<SocketAddr> {
    let router = server::build_router(classifier, store);
    server::start_server(router, config.bind_addr).await
}
