//! Group membership management.
//!
//! Unlike the provisioner, these operations propagate failures so callers
//! can tell which step went wrong.
//!
//! ## Consistency
//!
//! The admin API has no multi-resource transaction, so
//! [`GroupMembershipManager::move_user_between_groups`] is remove-then-add.
//! A failure between the two calls can leave the user in neither group or
//! in both.

use std::sync::Arc;

use kc_directory::{DirectoryClient, Group, GroupQuery, UserQuery};

use crate::error::{MembershipError, MembershipResult};

/// What to do when several users share an email.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AmbiguityPolicy {
    /// Take the first user in the order the directory returned them.
    #[default]
    FirstMatch,
    /// Fail with [`MembershipError::AmbiguousUser`].
    Reject,
}

/// Resolves users and groups and edits memberships.
pub struct GroupMembershipManager {
    directory: Arc<dyn DirectoryClient>,
    ambiguity: AmbiguityPolicy,
}

impl GroupMembershipManager {
    /// Creates a manager over the given directory handle.
    pub fn new(directory: Arc<dyn DirectoryClient>) -> Self {
        Self {
            directory,
            ambiguity: AmbiguityPolicy::default(),
        }
    }

    /// Sets how duplicate emails are handled.
    #[must_use]
    pub fn with_ambiguity_policy(mut self, policy: AmbiguityPolicy) -> Self {
        self.ambiguity = policy;
        self
    }

    /// Resolves a user id by exact email.
    pub async fn get_user_id_by_email(&self, email: &str) -> MembershipResult<String> {
        let users = self
            .directory
            .query_users(&UserQuery::by_email(email))
            .await
            .map_err(|source| MembershipError::Lookup {
                what: format!("user {email}"),
                source,
            })?;

        let count = users.len();
        let first = users
            .into_iter()
            .next()
            .ok_or_else(|| MembershipError::UserNotFound(email.to_string()))?;

        if count > 1 {
            if self.ambiguity == AmbiguityPolicy::Reject {
                return Err(MembershipError::AmbiguousUser {
                    email: email.to_string(),
                    count,
                });
            }
            tracing::warn!(%email, count, "Multiple users share this email; using the first");
        }

        Ok(first.id)
    }

    /// Resolves a group id by full path (e.g., "/Parent/Child").
    ///
    /// Tries the direct path lookup first. If that fails, searches groups by
    /// the last path segment and keeps only an exact path match.
    pub async fn get_group_id_by_path(&self, path: &str) -> MembershipResult<String> {
        match self.directory.group_by_path(path).await {
            Ok(group) => return Ok(group.id),
            Err(e) => {
                tracing::debug!(%path, error = %e, "Direct path lookup failed, searching by name");
            }
        }

        let term = last_segment(path);
        let groups = self
            .directory
            .list_groups(Some(&GroupQuery::search(term)))
            .await
            .map_err(|source| MembershipError::Lookup {
                what: format!("group {path}"),
                source,
            })?;

        find_by_path(&groups, &normalize_path(path))
            .map(|g| g.id.clone())
            .ok_or_else(|| MembershipError::GroupNotFound(path.to_string()))
    }

    /// Lists every group in the realm.
    pub async fn get_all_groups(&self) -> MembershipResult<Vec<Group>> {
        self.directory
            .list_groups(None)
            .await
            .map_err(MembershipError::ListGroups)
    }

    /// Adds a user to a group.
    pub async fn add_user_to_group(&self, user_id: &str, group_id: &str) -> MembershipResult<()> {
        self.directory
            .add_user_to_group(user_id, group_id)
            .await
            .map_err(|source| MembershipError::AddFailed {
                user_id: user_id.to_string(),
                group_id: group_id.to_string(),
                source,
            })
    }

    /// Removes a user from a group.
    pub async fn remove_user_from_group(
        &self,
        user_id: &str,
        group_id: &str,
    ) -> MembershipResult<()> {
        self.directory
            .remove_user_from_group(user_id, group_id)
            .await
            .map_err(|source| MembershipError::RemoveFailed {
                user_id: user_id.to_string(),
                group_id: group_id.to_string(),
                source,
            })
    }

    /// Moves a user from one group to another.
    ///
    /// All three lookups happen before any change. A failed removal is only
    /// logged, since the user may not have been a member; a failed addition
    /// is returned.
    pub async fn move_user_between_groups(
        &self,
        email: &str,
        old_group_path: &str,
        new_group_path: &str,
    ) -> MembershipResult<()> {
        let user_id = self.get_user_id_by_email(email).await?;
        let old_group_id = self.get_group_id_by_path(old_group_path).await?;
        let new_group_id = self.get_group_id_by_path(new_group_path).await?;

        match self.remove_user_from_group(&user_id, &old_group_id).await {
            Ok(()) => tracing::info!(%email, group = %old_group_path, "Removed user from group"),
            Err(e) => tracing::warn!(
                %email,
                group = %old_group_path,
                error = %e,
                "Could not remove user from group"
            ),
        }

        self.add_user_to_group(&user_id, &new_group_id).await?;
        tracing::info!(%email, group = %new_group_path, "Added user to group");
        Ok(())
    }
}

/// Last non-empty segment of a group path.
fn last_segment(path: &str) -> &str {
    path.trim_matches('/').rsplit('/').next().unwrap_or_default()
}

/// Full group paths always carry a leading slash.
fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Exact path match among search results and their nested children.
fn find_by_path<'a>(groups: &'a [Group], path: &str) -> Option<&'a Group> {
    groups.iter().flat_map(Group::flatten).find(|g| g.path == path)
}
