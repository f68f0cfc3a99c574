//! Axum server setup and router construction.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use triage_rs::classifier::Classifier;
use triage_rs::store::ResultStore;

use crate::api::{self, AppState};

/// Build the full axum router.
pub fn build_router(classifier: Classifier, store: ResultStore) -> Router {
    let state = AppState {
        classifier,
        store,
        submissions: Arc::new(tokio::sync::Mutex::new(())),
    };

    // Lets the JSON API be driven from a page served elsewhere.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(api::index))
        .route("/api/health", get(api::health))
        .route("/api/classify", post(api::post_classify))
        .route("/api/results.csv", get(api::get_results_csv))
        .with_state(state)
        .layer(cors)
}

/// Bind the listener, spawn the server, and return the bound address.
pub async fn start_server(router: Router, bind_addr: SocketAddr) -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;
    info!("Triage form listening on http://{addr}");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!("Web server stopped: {e}");
        }
    });

    Ok(addr)
}
