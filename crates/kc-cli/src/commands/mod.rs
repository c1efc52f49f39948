//! Command implementations.

pub mod group;
pub mod user;

pub use group::run_group;
pub use user::run_user;

use std::sync::Arc;

use kc_directory::{DirectoryClient, HttpDirectoryClient};

use crate::cli::ConnectionArgs;
use crate::config::directory_config;

/// Authenticates against the admin API and returns a shared handle.
pub async fn connect(args: &ConnectionArgs) -> crate::CliResult<Arc<dyn DirectoryClient>> {
    let config = directory_config(args)?;
    let client = HttpDirectoryClient::connect(&config).await?;
    Ok(Arc::new(client))
}
