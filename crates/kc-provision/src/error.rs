//! Workflow error types.

use kc_directory::DirectoryError;
use thiserror::Error;

/// Stage at which user provisioning stopped.
///
/// [`UserProvisioner::create_user`](crate::UserProvisioner::create_user)
/// logs these and returns `None`; `try_create_user` hands them back.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Existence check failed for a reason other than "not found".
    #[error("failed to check for existing user {email}: {source}")]
    Lookup {
        /// Email being provisioned.
        email: String,
        /// Directory failure.
        #[source]
        source: DirectoryError,
    },

    /// The create request failed.
    #[error("failed to create user {email}: {source}")]
    Creation {
        /// Email being provisioned.
        email: String,
        /// Directory failure.
        #[source]
        source: DirectoryError,
    },

    /// The directory accepted the create request but returned no id.
    #[error("user creation for {email} returned no id")]
    MissingId {
        /// Email being provisioned.
        email: String,
    },

    /// The user exists but its password could not be set.
    #[error("failed to set password for user {user_id}: {source}")]
    Credential {
        /// Id of the user that was created.
        user_id: String,
        /// Directory failure.
        #[source]
        source: DirectoryError,
    },
}

impl ProvisionError {
    /// Returns the id of a user left behind in the directory, if any.
    ///
    /// Only a credential failure leaves a created user behind; callers
    /// should verify that account manually.
    #[must_use]
    pub fn orphaned_user_id(&self) -> Option<&str> {
        match self {
            Self::Credential { user_id, .. } => Some(user_id),
            _ => None,
        }
    }
}

/// Errors surfaced by group membership operations.
#[derive(Debug, Error)]
pub enum MembershipError {
    /// No user has the given email.
    #[error("no user found for email: {0}")]
    UserNotFound(String),

    /// More than one user has the given email.
    #[error("{count} users found for email: {email}")]
    AmbiguousUser {
        /// Email that was queried.
        email: String,
        /// Number of matches.
        count: usize,
    },

    /// No group has the given path.
    #[error("group not found for path: {0}")]
    GroupNotFound(String),

    /// A lookup call failed.
    #[error("lookup of {what} failed: {source}")]
    Lookup {
        /// What was being resolved.
        what: String,
        /// Directory failure.
        #[source]
        source: DirectoryError,
    },

    /// Listing groups failed.
    #[error("failed to get all groups: {0}")]
    ListGroups(#[source] DirectoryError),

    /// Adding a membership failed.
    #[error("failed to add user {user_id} to group {group_id}: {source}")]
    AddFailed {
        /// User id.
        user_id: String,
        /// Group id.
        group_id: String,
        /// Directory failure.
        #[source]
        source: DirectoryError,
    },

    /// Removing a membership failed.
    #[error("failed to remove user {user_id} from group {group_id}: {source}")]
    RemoveFailed {
        /// User id.
        user_id: String,
        /// Group id.
        group_id: String,
        /// Directory failure.
        #[source]
        source: DirectoryError,
    },
}

impl MembershipError {
    /// Checks if a user or group could not be resolved.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_) | Self::GroupNotFound(_))
    }
}

/// Result type for membership operations.
pub type MembershipResult<T> = Result<T, MembershipError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_credential_failure_orphans_a_user() {
        let err = ProvisionError::Credential {
            user_id: "u-1".to_string(),
            source: DirectoryError::api(400, "invalidPasswordMinLengthMessage"),
        };
        assert_eq!(err.orphaned_user_id(), Some("u-1"));

        let err = ProvisionError::MissingId {
            email: "a@x.com".to_string(),
        };
        assert_eq!(err.orphaned_user_id(), None);
    }

    #[test]
    fn add_failure_names_user_and_group() {
        let err = MembershipError::AddFailed {
            user_id: "u-1".to_string(),
            group_id: "g-2".to_string(),
            source: DirectoryError::api(403, "forbidden"),
        };
        let msg = err.to_string();
        assert!(msg.contains("u-1"));
        assert!(msg.contains("g-2"));
        assert!(msg.contains("403"));
        assert!(!err.is_not_found());
        assert!(MembershipError::GroupNotFound("/G1".to_string()).is_not_found());
    }
}
