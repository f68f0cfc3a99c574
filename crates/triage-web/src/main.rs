//! Triage form server.
//!
//! Serves the single-page symptom form and appends every classification to
//! the result CSV.
//!
//! # Usage
//!
//! ```bash
//! GROQ_API_KEY=gsk_... cargo run -p triage-web
//! GROQ_API_KEY=gsk_... cargo run -p triage-web -- --port 8080 --output ward3.csv
//! ```
//!
//! Then open the printed URL in a browser, or:
//!
//! ```bash
//! curl -X POST http://127.0.0.1:8501/api/classify \
//!   -H 'content-type: application/json' \
//!   -d '{"symptoms": "Chest pain and shortness of breath"}'
//! ```

use std::net::IpAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use triage_rs::prelude::*;
use triage_rs::{FORM_TEMPERATURE, logging};
use triage_web::{WebConfig, spawn_web};

/// Browser form for the triage classifier.
#[derive(Parser)]
#[command(about = "Single-page triage form backed by a hosted LLM")]
struct Args {
    /// Model identifier (overrides MODEL_NAME).
    #[arg(long)]
    model: Option<String>,

    /// CSV file results are appended to (overrides TRIAGE_RESULTS_PATH).
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port for the web server.
    #[arg(long, default_value_t = 8501)]
    port: u16,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

async fn run(args: Args) -> Result<(), String> {
    let mut config = TriageConfig::from_env()
        .map_err(|e| e.to_string())?
        .with_temperature(FORM_TEMPERATURE);
    if let Some(model) = args.model {
        config = config.with_model(model);
    }
    if let Some(path) = args.output {
        config = config.with_results_path(path);
    }
    config.validate().map_err(|e| e.to_string())?;
    tracing::info!("Starting form server: {config:?}");

    let client =
        ChatClient::new(&config).map_err(|e| format!("failed to create API client: {e}"))?;
    let classifier = Classifier::new(Arc::new(client));
    let store = ResultStore::new(&config.results_path);

    let web_config = WebConfig {
        bind_addr: (args.host, args.port).into(),
    };
    let addr = spawn_web(classifier, store, web_config)
        .await
        .map_err(|e| format!("failed to start server: {e}"))?;
    println!("Triage form: http://{addr}");
    println!("Results file: {}", config.results_path.display());

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("failed to wait for shutdown signal: {e}"))?;
    println!("Shutting down.");
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
