//! # kc-cli
//!
//! CLI tools for Keycloak user provisioning.
//!
//! This crate provides command-line utilities for:
//! - Creating users idempotently with a permanent password and group enrollment
//! - Deleting users
//! - Listing and resolving groups
//! - Adding, removing and moving users between groups

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use error::{CliError, CliResult};
