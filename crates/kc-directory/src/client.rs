//! Directory client trait.

use async_trait::async_trait;

use crate::error::DirectoryResult;
use crate::model::{Group, GroupQuery, NewUser, User, UserQuery};

/// Operations the provisioning workflows need from the identity directory.
///
/// The directory is the only source of truth: implementations must not
/// cache users, groups or memberships between calls.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Searches users matching the query.
    async fn query_users(&self, query: &UserQuery) -> DirectoryResult<Vec<User>>;

    /// Creates a user and returns the assigned id.
    ///
    /// Returns `Ok(None)` when the directory accepted the request but did
    /// not report an identifier.
    async fn create_user(&self, user: &NewUser) -> DirectoryResult<Option<String>>;

    /// Overwrites the user's password.
    async fn set_password(
        &self,
        user_id: &str,
        password: &str,
        temporary: bool,
    ) -> DirectoryResult<()>;

    /// Deletes a user by id.
    async fn delete_user(&self, user_id: &str) -> DirectoryResult<()>;

    /// Lists groups, optionally filtered.
    async fn list_groups(&self, query: Option<&GroupQuery>) -> DirectoryResult<Vec<Group>>;

    /// Gets a group by its full path (e.g., "/Parent/Child").
    ///
    /// ## Errors
    ///
    /// Returns `DirectoryError::NotFound` if the group does not exist or
    /// the deployment does not support path lookup.
    async fn group_by_path(&self, path: &str) -> DirectoryResult<Group>;

    /// Lists the groups a user is a direct member of.
    async fn user_groups(&self, user_id: &str) -> DirectoryResult<Vec<Group>>;

    /// Adds a user to a group.
    async fn add_user_to_group(&self, user_id: &str, group_id: &str) -> DirectoryResult<()>;

    /// Removes a user from a group.
    async fn remove_user_from_group(&self, user_id: &str, group_id: &str) -> DirectoryResult<()>;
}
