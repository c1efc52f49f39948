//! CLI argument parsing.

use clap::{Args, Parser, Subcommand};
use kc_directory::config::{
    DEFAULT_CLIENT_ID, ENV_ADMIN_PASS, ENV_ADMIN_USER, ENV_AUTH_REALM, ENV_CLIENT_ID, ENV_REALM,
    ENV_SERVER_URL,
};

use crate::config::OutputFormat;

/// Keycloak provisioning CLI - user and group membership administration.
#[derive(Debug, Parser)]
#[command(name = "kc-provision")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Connection settings.
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Admin API connection settings.
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Server URL.
    #[arg(short, long, env = ENV_SERVER_URL, global = true)]
    pub server: Option<String>,

    /// Realm to administer.
    #[arg(short, long, env = ENV_REALM, global = true)]
    pub realm: Option<String>,

    /// Realm the admin user logs into (defaults to --realm).
    #[arg(long, env = ENV_AUTH_REALM, global = true)]
    pub auth_realm: Option<String>,

    /// Admin username.
    #[arg(short = 'u', long, env = ENV_ADMIN_USER, global = true)]
    pub username: Option<String>,

    /// Admin password.
    #[arg(long, env = ENV_ADMIN_PASS, hide_env_values = true, global = true)]
    pub admin_password: Option<String>,

    /// OAuth client used for the admin login.
    #[arg(long, env = ENV_CLIENT_ID, default_value = DEFAULT_CLIENT_ID, global = true)]
    pub client_id: String,

    /// Skip TLS certificate verification.
    #[arg(long, global = true)]
    pub insecure: bool,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// User provisioning commands.
    #[command(subcommand)]
    User(UserCommand),

    /// Group membership commands.
    #[command(subcommand)]
    Group(GroupCommand),
}

/// User commands.
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a user unless one already exists for the email.
    Create {
        /// Email address (also used as username).
        email: String,

        /// First name.
        #[arg(long)]
        first_name: String,

        /// Last name.
        #[arg(long)]
        last_name: String,

        /// Permanent password (will prompt if not provided).
        #[arg(long)]
        password: Option<String>,

        /// Root-level group to join. Repeatable.
        #[arg(long = "group", value_name = "NAME")]
        groups: Vec<String>,
    },

    /// Delete a user.
    Delete {
        /// User ID.
        id: String,
    },
}

/// Group commands.
#[derive(Debug, Subcommand)]
pub enum GroupCommand {
    /// List groups in the realm.
    List {
        /// Search by name.
        #[arg(long)]
        search: Option<String>,
    },

    /// Resolve a group path to its ID.
    Resolve {
        /// Group path (e.g., /Parent/Child).
        path: String,
    },

    /// Add a user to a group.
    Add {
        /// User email.
        email: String,

        /// Group path.
        path: String,
    },

    /// Remove a user from a group.
    Remove {
        /// User email.
        email: String,

        /// Group path.
        path: String,
    },

    /// Move a user from one group to another.
    Move {
        /// User email.
        email: String,

        /// Path of the group to leave.
        from: String,

        /// Path of the group to join.
        to: String,
    },
}
