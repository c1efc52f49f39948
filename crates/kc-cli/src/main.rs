//! # Keycloak provisioning CLI
//!
//! Command-line tools for Keycloak user and group administration.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![allow(clippy::uninlined_format_args)]

use clap::Parser;
use kc_cli::{
    cli::{Cli, Command},
    commands::{connect, run_group, run_user},
    config::load_dotenv,
    output::error,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Must run before parsing so .env values act as argument fallbacks.
    let dotenv = load_dotenv();
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    match dotenv {
        Ok(Some(path)) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Failed to load .env file"),
    }

    let directory = match connect(&cli.connection).await {
        Ok(d) => d,
        Err(e) => {
            error(&format!("Failed to connect to Keycloak: {}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Command::User(cmd) => run_user(cmd, directory, cli.output).await,
        Command::Group(cmd) => run_group(cmd, directory, cli.output).await,
    };

    if let Err(e) = result {
        error(&e.to_string());
        std::process::exit(1);
    }
}

/// Installs the log subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "kc_cli=debug,kc_provision=debug,kc_directory=debug"
    } else {
        "kc_cli=info,kc_provision=info,kc_directory=info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
