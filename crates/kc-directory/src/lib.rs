//! # kc-directory
//!
//! Client for the Keycloak admin REST API.
//!
//! This crate provides:
//! - The [`DirectoryClient`] trait the provisioning workflows are written against
//! - [`HttpDirectoryClient`], an authenticated `reqwest` implementation
//! - User and group representations
//! - Connection configuration read from parameters or the environment

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod model;

pub use client::DirectoryClient;
pub use config::DirectoryConfig;
pub use error::{DirectoryError, DirectoryResult};
pub use http::HttpDirectoryClient;
pub use model::{Group, GroupQuery, NewUser, PasswordCredential, User, UserQuery};
