use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use zipfgen::{Config, generate};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();

    match generate(&config) {
        Ok(summary) => {
            tracing::info!(
                samples = summary.count,
                bytes = summary.file_len(),
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            // One plain line, whatever RUST_LOG says.
            eprintln!("zipfgen: {e}");
            ExitCode::FAILURE
        }
    }
}
