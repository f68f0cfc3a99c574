//! Interactive console triage classifier.
//!
//! Reads the API key from `GROQ_API_KEY` (a `.env` file in the working
//! directory is honored) and the model from `MODEL_NAME`.
//!
//! # Examples
//!
//! ```sh
//! # Classify symptoms one at a time, type "done" to save and exit
//! triage
//!
//! # Different model and output file, keep earlier results
//! triage --model llama-3.1-8b-instant --output ward3.csv --append
//!
//! # Debug logging of API traffic on stderr
//! triage -vv
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use triage_rs::prelude::*;
use triage_rs::{CONSOLE_TEMPERATURE, logging};

/// Classify patient symptoms into triage levels 1-5 using a hosted LLM.
#[derive(Parser)]
#[command(name = "triage")]
struct Cli {
    /// Model identifier (overrides MODEL_NAME)
    #[arg(long)]
    model: Option<String>,

    /// CSV file to write results to (overrides TRIAGE_RESULTS_PATH)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Append to the results file instead of replacing it
    #[arg(long)]
    append: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_config(cli: &Cli) -> Result<TriageConfig, String> {
    let mut config = TriageConfig::from_env()
        .map_err(|e| e.to_string())?
        .with_temperature(CONSOLE_TEMPERATURE);
    if let Some(model) = &cli.model {
        config = config.with_model(model.clone());
    }
    if let Some(path) = &cli.output {
        config = config.with_results_path(path.clone());
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Save whatever the session collected. Returns `true` when the session
/// ended normally and its records were stored.
///
/// Runs even when the console failed mid-session. Each problem is reported
/// once on `output`.
fn finish_session(
    store: &ResultStore,
    mode: SaveMode,
    summary: &SessionSummary,
    output: &mut impl Write,
) -> bool {
    let saved = save_session(store, mode, &summary.records, output).is_ok();
    if let Some(e) = &summary.interrupted {
        let _ = writeln!(output, " Session ended early: {e}");
        return false;
    }
    saved
}

async fn run(cli: Cli) -> Result<ExitCode, String> {
    let config = load_config(&cli)?;
    tracing::info!("Starting console session: {config:?}");

    let client =
        ChatClient::new(&config).map_err(|e| format!("failed to create API client: {e}"))?;
    let classifier = Classifier::new(Arc::new(client));

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let summary = InteractionLoop::new(&classifier, stdin, std::io::stdout())
        .run()
        .await;

    let mode = if cli.append {
        SaveMode::Append
    } else {
        SaveMode::Overwrite
    };
    let store = ResultStore::new(&config.results_path);
    if finish_session(&store, mode, &summary, &mut std::io::stdout()) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
