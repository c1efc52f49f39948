//! CLI configuration.

use std::path::PathBuf;

use kc_directory::DirectoryConfig;

use crate::cli::ConnectionArgs;
use crate::error::{CliError, CliResult};

/// Loads a `.env` file from the working directory, if present.
///
/// Variables already set in the environment take precedence. Returns the
/// loaded path, or `None` when there is no `.env` file.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Builds the directory connection settings from parsed arguments.
///
/// Arguments already include their environment fallbacks.
pub fn directory_config(args: &ConnectionArgs) -> CliResult<DirectoryConfig> {
    let required = |value: &Option<String>, what: &str, env: &str| {
        value
            .clone()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| CliError::Config(format!("{what} is required (--{what} or {env})")))
    };

    let mut config = DirectoryConfig::new(
        required(&args.server, "server", kc_directory::config::ENV_SERVER_URL)?,
        required(&args.realm, "realm", kc_directory::config::ENV_REALM)?,
        required(&args.username, "username", kc_directory::config::ENV_ADMIN_USER)?,
        required(
            &args.admin_password,
            "admin-password",
            kc_directory::config::ENV_ADMIN_PASS,
        )?,
    )
    .with_client_id(args.client_id.clone())
    .with_verify_tls(!args.insecure);

    if let Some(realm) = args.auth_realm.as_ref().filter(|r| !r.is_empty()) {
        config = config.with_auth_realm(realm.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
    /// Quiet (minimal output).
    Quiet,
}
