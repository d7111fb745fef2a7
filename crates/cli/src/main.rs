//! lcats entry point.
//!
//! Logging goes to stderr so stdout carries only command output.

use std::process::ExitCode;

use clap::Parser;
use lcats_cli::{App, Cli, gatherers};
use lcats_core::config::AppConfig;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = AppConfig::load()
        .map_err(anyhow::Error::from)
        .and_then(|config| App::new(config, gatherers::registry()).run(cli.command));

    match result {
        Ok(outcome) => {
            println!("{}", outcome.message);
            ExitCode::from(outcome.status)
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
