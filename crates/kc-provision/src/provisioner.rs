//! Idempotent user provisioning.
//!
//! Every failure is caught at the [`UserProvisioner`] boundary and logged.
//! A `None` result from [`UserProvisioner::create_user`] means the caller
//! should verify the directory state manually.

use std::sync::Arc;

use kc_directory::{DirectoryClient, Group, NewUser, UserQuery};

use crate::error::ProvisionError;

/// Creates users with a permanent password and optional root-group enrollment.
pub struct UserProvisioner {
    directory: Arc<dyn DirectoryClient>,
}

impl UserProvisioner {
    /// Creates a provisioner over the given directory handle.
    pub fn new(directory: Arc<dyn DirectoryClient>) -> Self {
        Self { directory }
    }

    /// Creates the user if absent and returns its id.
    ///
    /// Returns `None` if the existence check, the creation or the password
    /// assignment failed. Group enrollment is best-effort and never turns a
    /// created user into `None`.
    pub async fn create_user(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
        groups: &[String],
    ) -> Option<String> {
        match self
            .try_create_user(email, first_name, last_name, password, groups)
            .await
        {
            Ok(user_id) => Some(user_id),
            Err(e) => {
                match e.orphaned_user_id() {
                    Some(user_id) => tracing::error!(
                        %email,
                        %user_id,
                        error = %e,
                        "User exists without a password; verify directory state"
                    ),
                    None => tracing::error!(%email, error = %e, "User provisioning failed"),
                }
                None
            }
        }
    }

    /// Same workflow as [`create_user`](Self::create_user), reporting the
    /// failing stage instead of `None`.
    pub async fn try_create_user(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
        groups: &[String],
    ) -> Result<String, ProvisionError> {
        if let Some(existing_id) = self.existing_user_id(email).await? {
            tracing::warn!(%email, user_id = %existing_id, "User already exists");
            return Ok(existing_id);
        }

        tracing::info!(%email, "Creating user");
        let user = NewUser::with_email(email, first_name, last_name);
        let user_id = self
            .directory
            .create_user(&user)
            .await
            .map_err(|source| ProvisionError::Creation {
                email: email.to_string(),
                source,
            })?
            .ok_or_else(|| ProvisionError::MissingId {
                email: email.to_string(),
            })?;
        tracing::info!(%email, %user_id, "User created");

        self.directory
            .set_password(&user_id, password, false)
            .await
            .map_err(|source| ProvisionError::Credential {
                user_id: user_id.clone(),
                source,
            })?;
        tracing::info!(%user_id, "Password set");

        if !groups.is_empty() {
            self.enroll(&user_id, groups).await;
        }

        tracing::info!(%email, %user_id, "User creation complete");
        Ok(user_id)
    }

    /// Deletes a user. Failures are logged, never returned.
    pub async fn delete_user(&self, user_id: &str) {
        match self.directory.delete_user(user_id).await {
            Ok(()) => tracing::info!(%user_id, "User deleted"),
            Err(e) => tracing::error!(%user_id, error = %e, "Error deleting user"),
        }
    }

    /// Looks up the user keyed by email. "Not found" counts as absent.
    ///
    /// Provisioned users carry their email as username, so the lookup matches
    /// on the exact username rather than the email attribute.
    async fn existing_user_id(&self, email: &str) -> Result<Option<String>, ProvisionError> {
        match self.directory.query_users(&UserQuery::by_username(email)).await {
            Ok(users) => Ok(users
                .into_iter()
                .find(|u| u.username.eq_ignore_ascii_case(email))
                .map(|u| u.id)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(source) => Err(ProvisionError::Lookup {
                email: email.to_string(),
                source,
            }),
        }
    }

    /// Adds the user to each named root-level group, skipping what cannot be done.
    async fn enroll(&self, user_id: &str, group_names: &[String]) {
        let all_groups = match self.directory.list_groups(None).await {
            Ok(groups) => groups,
            Err(e) => {
                tracing::error!(%user_id, error = %e, "Failed to fetch groups; skipping enrollment");
                return;
            }
        };

        for name in group_names {
            let Some(group) = find_root_group(&all_groups, name) else {
                tracing::warn!(group = %name, "Group not found, skipping");
                continue;
            };

            // A failed membership fetch is not fatal; the add below decides.
            if let Ok(current) = self.directory.user_groups(user_id).await {
                if current.iter().any(|g| g.id == group.id) {
                    tracing::info!(%user_id, group = %name, "User already in group");
                    continue;
                }
            }

            match self.directory.add_user_to_group(user_id, &group.id).await {
                Ok(()) => tracing::info!(%user_id, group = %name, "Added to group"),
                Err(e) => {
                    tracing::error!(%user_id, group = %name, error = %e, "Error adding to group");
                }
            }
        }
    }
}

/// Exact name match among root-level groups.
fn find_root_group<'a>(groups: &'a [Group], name: &str) -> Option<&'a Group> {
    groups.iter().find(|g| g.name == name && g.is_root())
}
