mod cli;
mod commands;
mod error;
mod metadata;
mod output;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::Cli;
use crate::error::{exit_code_for_failure, CliError};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

/// RUST_LOG wins over `--log-level`; logs go to stderr so stdout stays parseable.
fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let outcome = commands::run(&cli).await?;
    output::render(
        &mut std::io::stdout().lock(),
        &outcome.envelope,
        outcome.table.as_deref(),
        cli.format,
        cli.pretty,
    )?;

    // Errors next to data are fallback diagnostics; without data the command failed.
    if outcome.envelope.data.is_null() {
        if let Some(error) = outcome.envelope.final_error() {
            return Ok(ExitCode::from(exit_code_for_failure(error)));
        }
    }

    Ok(ExitCode::SUCCESS)
}
