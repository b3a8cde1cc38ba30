//! lotto-check - Binary Entry Point
//!
//! ```text
//! lotto-check <history-file> <kind> <n1,n2,...> [threshold]
//! ```
//!
//! Loads draw history into memory, checks the ticket and prints the result as
//! JSON. Settings come from the environment (see [`lotto_check::config`]);
//! log level from `RUST_LOG`.

use std::env;
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use lotto_check::error::EngineError;
use lotto_check::history;
use lotto_check::{EngineConfig, MatchEngine, RawValue};

const USAGE: &str = "usage: lotto-check <history-file> <kind> <n1,n2,...> [threshold]";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (path, kind, numbers, threshold) = match args.as_slice() {
        [path, kind, numbers] => (path, kind, numbers, None),
        [path, kind, numbers, threshold] => (path, kind, numbers, Some(threshold)),
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let store = match history::load_store(path) {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "could not load draw history");
            return ExitCode::FAILURE;
        }
    };

    let engine = match MatchEngine::with_config(store, config) {
        Ok(engine) => engine,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let kind = RawValue::from(kind.as_str());
    let numbers: Vec<RawValue> = numbers.split(',').map(RawValue::from).collect();
    let threshold = threshold.map(|t| RawValue::from(t.as_str()));

    let request = match engine.validate(&kind, &numbers, threshold.as_ref()) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Invalid input: {}", EngineError::from(e));
            return ExitCode::from(2);
        }
    };

    let result = match engine.run(&request) {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "could not fetch draws");
            eprintln!("Could not fetch draw history. Please try again later.");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!(error = %e, "could not encode result");
            return ExitCode::FAILURE;
        }
    }

    let receipt = request.receipt(&result);
    eprintln!(
        "{} of {} {} draws matched (digest {})",
        receipt.winning_draws,
        receipt.total_draws,
        request.kind(),
        receipt.digest_hex()
    );
    ExitCode::SUCCESS
}
