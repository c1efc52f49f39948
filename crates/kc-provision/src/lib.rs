//! # kc-provision
//!
//! User provisioning and group membership workflows for Keycloak.
//!
//! This crate provides:
//! - [`UserProvisioner`]: create-if-absent users with a permanent password
//!   and best-effort root-group enrollment
//! - [`GroupMembershipManager`]: user and group resolution, membership
//!   add/remove, and moving users between groups
//!
//! Both work against any [`kc_directory::DirectoryClient`] and share nothing
//! else.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod membership;
pub mod provisioner;

pub use error::{MembershipError, MembershipResult, ProvisionError};
pub use membership::{AmbiguityPolicy, GroupMembershipManager};
pub use provisioner::UserProvisioner;
