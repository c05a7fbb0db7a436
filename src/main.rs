use std::io::IsTerminal;
use std::process::ExitCode;
use suite_tally::cli;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the report.
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .with(EnvFilter::try_from_env("SUITE_TALLY_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    suite_tally::init();

    match cli::run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
