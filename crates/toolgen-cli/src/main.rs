//! toolgen command-line interface
//!
//! Reads one schema, writes one tool-spec JSON document. Exit codes: 0 on
//! success (warnings included), 2 fetch failure, 3 parse failure, 4
//! unsupported construct, 1 anything else.

mod args;

use args::Cli;
use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use toolgen_core::loader::{self, FetchOptions, SchemaLocation};
use toolgen_core::{convert, ConvertOptions, ToolgenError, ToolgenResult};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout stays a clean JSON document.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(exit_code(&e))
        }
    }
}

async fn run(cli: Cli) -> ToolgenResult<()> {
    let location = SchemaLocation::parse(&cli.schema);
    let fetch = FetchOptions {
        timeout: Duration::from_secs(cli.timeout),
        headers: parse_headers(&cli.headers)?,
        bearer_token: cli.auth_token.clone(),
    };
    let input = loader::read_schema(&location, cli.source.into(), &fetch).await?;

    let options = ConvertOptions {
        dialect: cli.dialect.into(),
        max_depth: cli.max_depth,
        only_mutations: cli.only_mutations,
        services: cli.services.clone(),
    };
    let conversion = convert(&input, &options)?;
    for warning in &conversion.warnings {
        warn!("{warning}");
    }

    let document = conversion.to_json_pretty()?;
    match &cli.out {
        Some(path) => tokio::fs::write(path, &document)
            .await
            .map_err(|e| ToolgenError::Io(format!("failed to write {}: {e}", path.display())))?,
        None => print!("{document}"),
    }
    Ok(())
}

/// Parse repeated "Name: Value" headers.
fn parse_headers(raw: &[String]) -> ToolgenResult<Vec<(String, String)>> {
    raw.iter()
        .map(|header| {
            header
                .split_once(':')
                .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
                .ok_or_else(|| {
                    ToolgenError::invalid_input(format!(
                        "header `{header}` must be in `Name: Value` form"
                    ))
                })
        })
        .collect()
}

/// Distinct exit codes for the failure classes callers script against.
fn exit_code(error: &ToolgenError) -> u8 {
    match error {
        ToolgenError::SchemaFetch(_) => 2,
        ToolgenError::SchemaParse(_) => 3,
        ToolgenError::UnsupportedConstructs(_) => 4,
        _ => 1,
    }
}
