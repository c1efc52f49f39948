//! Admin API representations.
//!
//! Field names follow Keycloak's `UserRepresentation` and
//! `GroupRepresentation` wire format (camelCase).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A user record as reported by the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Directory-assigned identifier.
    pub id: String,
    /// Login name. Provisioned users use their email.
    #[serde(default)]
    pub username: String,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Whether the account is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Whether the email is verified.
    #[serde(default)]
    pub email_verified: bool,
    /// Custom attributes.
    #[serde(default)]
    pub attributes: HashMap<String, Vec<String>>,
    /// Pending required actions.
    #[serde(default)]
    pub required_actions: Vec<String>,
}

/// Payload for creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Whether the account is enabled.
    pub enabled: bool,
    /// Whether the email is verified.
    pub email_verified: bool,
    /// Custom attributes.
    pub attributes: HashMap<String, Vec<String>>,
    /// Required actions.
    pub required_actions: Vec<String>,
}

impl NewUser {
    /// Builds an enabled, email-verified account keyed by email.
    #[must_use]
    pub fn with_email(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        let email = email.into();
        Self {
            username: email.clone(),
            email,
            first_name: first_name.into(),
            last_name: last_name.into(),
            enabled: true,
            email_verified: true,
            attributes: HashMap::new(),
            required_actions: Vec::new(),
        }
    }
}

/// A group record as reported by the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Directory-assigned identifier.
    pub id: String,
    /// Simple name.
    pub name: String,
    /// Hierarchical path, e.g. `/Parent/Child`.
    #[serde(default)]
    pub path: String,
    /// Children included by search responses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_groups: Vec<Group>,
}

impl Group {
    /// Returns `true` for a group directly under the realm root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        let trimmed = self.path.trim_start_matches('/');
        trimmed.is_empty() || !trimmed.contains('/')
    }

    /// Iterates over this group and all nested children, depth first.
    pub fn flatten(&self) -> Box<dyn Iterator<Item = &Group> + '_> {
        Box::new(std::iter::once(self).chain(self.sub_groups.iter().flat_map(Group::flatten)))
    }
}

/// Password credential sent to `reset-password`.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordCredential {
    /// Credential type, always `password`.
    #[serde(rename = "type")]
    pub type_: &'static str,
    /// The secret.
    pub value: String,
    /// Whether the user must change it on next login.
    pub temporary: bool,
}

impl PasswordCredential {
    /// Creates a password credential.
    #[must_use]
    pub fn new(value: impl Into<String>, temporary: bool) -> Self {
        Self {
            type_: "password",
            value: value.into(),
            temporary,
        }
    }
}

/// Filters for user search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    /// Filter by email.
    pub email: Option<String>,
    /// Filter by username.
    pub username: Option<String>,
    /// Require exact matches instead of substring search.
    pub exact: bool,
    /// Maximum results to return.
    pub max: Option<u32>,
}

impl UserQuery {
    /// Exact match on email.
    #[must_use]
    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            exact: true,
            ..Self::default()
        }
    }

    /// Exact match on username.
    #[must_use]
    pub fn by_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            exact: true,
            ..Self::default()
        }
    }

    /// Renders the query string (without the leading `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut query = Vec::new();

        if let Some(e) = &self.email {
            query.push(format!("email={}", urlencoding::encode(e)));
        }
        if let Some(u) = &self.username {
            query.push(format!("username={}", urlencoding::encode(u)));
        }
        if self.exact {
            query.push("exact=true".to_string());
        }
        if let Some(max) = self.max {
            query.push(format!("max={max}"));
        }

        query.join("&")
    }
}

/// Filters for group listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupQuery {
    /// Name search string.
    pub search: Option<String>,
}

impl GroupQuery {
    /// Searches groups by name.
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_wire_format() {
        let user = NewUser::with_email("a@x.com", "Ada", "Lovelace");
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["username"], "a@x.com");
        assert_eq!(json["email"], "a@x.com");
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["lastName"], "Lovelace");
        assert_eq!(json["enabled"], true);
        assert_eq!(json["emailVerified"], true);
        assert_eq!(json["attributes"], serde_json::json!({}));
        assert_eq!(json["requiredActions"], serde_json::json!([]));
    }

    #[test]
    fn user_tolerates_sparse_records() {
        let user: User = serde_json::from_str(r#"{"id":"u1","username":"a@x.com"}"#).unwrap();
        assert_eq!(user.id, "u1");
        assert!(user.email.is_none());
        assert!(user.attributes.is_empty());
        assert!(!user.enabled);
    }

    #[test]
    fn group_flatten_walks_children() {
        let group: Group = serde_json::from_value(serde_json::json!({
            "id": "g1",
            "name": "afis_stats",
            "path": "/afis_stats",
            "subGroups": [
                {"id": "g2", "name": "fire_stats", "path": "/afis_stats/fire_stats",
                 "subGroups": [{"id": "g3", "name": "daily", "path": "/afis_stats/fire_stats/daily"}]}
            ]
        }))
        .unwrap();

        let paths: Vec<_> = group.flatten().map(|g| g.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["/afis_stats", "/afis_stats/fire_stats", "/afis_stats/fire_stats/daily"]
        );
        assert!(group.is_root());
        assert!(!group.sub_groups[0].is_root());
    }

    #[test]
    fn password_credential_is_typed() {
        let json = serde_json::to_value(PasswordCredential::new("s3cret", false)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "password", "value": "s3cret", "temporary": false}));
    }

    #[test]
    fn user_query_encodes_values() {
        let query = UserQuery::by_email("a+b@x.com");
        assert_eq!(query.to_query_string(), "email=a%2Bb%40x.com&exact=true");

        let query = UserQuery {
            username: Some("kj".to_string()),
            max: Some(5),
            ..UserQuery::default()
        };
        assert_eq!(query.to_query_string(), "username=kj&max=5");
    }
}
