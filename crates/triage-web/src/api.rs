//! Form handlers.
//!
//! `POST /api/classify` is the form's submit action. Each call runs the
//! shared [`submit`] step and, unless the input was blank, appends the
//! resulting record (including error records) to the CSV file.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use triage_rs::classifier::Classifier;
use triage_rs::session::{Submission, submit};
use triage_rs::store::ResultStore;

use crate::page::INDEX_HTML;

/// File name offered for the CSV download.
pub const DOWNLOAD_FILE_NAME: &str = "triage_results.csv";

/// Warning shown for blank submissions.
pub const BLANK_INPUT_WARNING: &str = "Please enter some symptoms.";

/// Shared application state passed to all handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Classifier,
    pub store: ResultStore,
    /// Held for the whole classify-and-store step of one submission.
    pub submissions: Arc<tokio::sync::Mutex<()>>,
}

/// Request body for POST /api/classify.
#[derive(Deserialize, Serialize, Debug)]
pub struct ClassifyRequest {
    pub symptoms: String,
}

/// Response body for POST /api/classify.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct ClassifyResponse {
    /// `true` only when the model call succeeded and the record was stored.
    pub ok: bool,
    /// The assessment text, or `"Error: ..."` when the model call failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<String>,
    /// Parsed triage level, when the assessment has the expected shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    /// Whether a record was appended to the result file.
    pub stored: bool,
    /// User-facing message for warnings and failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET / — the form page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /api/health
pub async fn health() -> &'static str {
    "ok"
}

/// POST /api/classify — classify symptoms and append the record.
///
/// - 400: blank input, nothing classified or stored.
/// - 200: classified and stored.
/// - 502: the model call failed; the error record is still stored.
/// - 500: the record could not be written to the result file.
pub async fn post_classify(
    State(app): State<AppState>,
    Json(body): Json<ClassifyRequest>,
) -> (StatusCode, Json<ClassifyResponse>) {
    let _guard = app.submissions.lock().await;

    let (status, message, record) = match submit(&app.classifier, &body.symptoms).await {
        Submission::Rejected => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ClassifyResponse {
                    message: Some(BLANK_INPUT_WARNING.to_string()),
                    ..Default::default()
                }),
            );
        }
        Submission::Classified(record) => (StatusCode::OK, None, record),
        Submission::Failed { record, error } => (
            StatusCode::BAD_GATEWAY,
            Some(format!("Error during classification: {error}")),
            record,
        ),
    };

    let level = record.parsed().map(|p| p.level.number());

    match app.store.append(&record) {
        Ok(()) => {
            info!("Stored assessment for {} chars of symptoms", record.symptoms.len());
            (
                status,
                Json(ClassifyResponse {
                    ok: status == StatusCode::OK,
                    assessment: Some(record.assessment),
                    level,
                    stored: true,
                    message,
                }),
            )
        }
        Err(e) => {
            warn!("Failed to store record: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ClassifyResponse {
                    ok: false,
                    assessment: Some(record.assessment),
                    level,
                    stored: false,
                    message: Some(format!("Failed to save result: {e}")),
                }),
            )
        }
    }
}

/// GET /api/results.csv — cumulative result file as a download.
///
/// Waits for any in-flight submission so the file is never read mid-append.
pub async fn get_results_csv(State(app): State<AppState>) -> Response {
    let _guard = app.submissions.lock().await;
    match app.store.to_csv_string() {
        Ok(csv) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{DOWNLOAD_FILE_NAME}\""),
                ),
            ],
            csv,
        )
            .into_response(),
        Err(e) => {
            warn!("Failed to read results for download: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
