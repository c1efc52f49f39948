//! Directory connection configuration.

use std::fmt;

use crate::error::{DirectoryError, DirectoryResult};

/// Environment variable holding the server URL.
pub const ENV_SERVER_URL: &str = "KEYCLOAK_SERVER_URL";
/// Environment variable holding the realm to administer.
pub const ENV_REALM: &str = "KEYCLOAK_REALM";
/// Environment variable holding the realm the admin user lives in.
pub const ENV_AUTH_REALM: &str = "KEYCLOAK_AUTH_REALM";
/// Environment variable holding the admin username.
pub const ENV_ADMIN_USER: &str = "KEYCLOAK_ADMIN_USER";
/// Environment variable holding the admin password.
pub const ENV_ADMIN_PASS: &str = "KEYCLOAK_ADMIN_PASS";
/// Environment variable holding the OAuth client id.
pub const ENV_CLIENT_ID: &str = "KEYCLOAK_CLIENT_ID";
/// Environment variable toggling TLS certificate verification.
pub const ENV_VERIFY_TLS: &str = "KEYCLOAK_VERIFY_TLS";

/// Default OAuth client used for admin logins.
pub const DEFAULT_CLIENT_ID: &str = "admin-cli";

/// Connection settings for the admin API.
#[derive(Clone)]
pub struct DirectoryConfig {
    /// Server URL (e.g., https://keycloak.example.com).
    pub server_url: String,
    /// Realm whose users and groups are administered.
    pub realm: String,
    /// Realm the admin user authenticates against. Defaults to `realm`.
    pub auth_realm: Option<String>,
    /// Admin username.
    pub username: String,
    /// Admin password.
    pub password: String,
    /// OAuth client id for the password grant.
    pub client_id: String,
    /// Verify the server's TLS certificate.
    pub verify_tls: bool,
}

impl DirectoryConfig {
    /// Creates a configuration with default client id and TLS verification on.
    #[must_use]
    pub fn new(
        server_url: impl Into<String>,
        realm: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into().trim_end_matches('/').to_string(),
            realm: realm.into(),
            auth_realm: None,
            username: username.into(),
            password: password.into(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            verify_tls: true,
        }
    }

    /// Reads the configuration from already-loaded process environment.
    pub fn from_env() -> DirectoryResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> DirectoryResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| DirectoryError::config(format!("{key} is not set")))
        };

        let mut config = Self::new(
            required(ENV_SERVER_URL)?,
            required(ENV_REALM)?,
            required(ENV_ADMIN_USER)?,
            required(ENV_ADMIN_PASS)?,
        );

        if let Some(realm) = lookup(ENV_AUTH_REALM).filter(|v| !v.is_empty()) {
            config.auth_realm = Some(realm);
        }
        if let Some(client_id) = lookup(ENV_CLIENT_ID).filter(|v| !v.is_empty()) {
            config.client_id = client_id;
        }
        if let Some(flag) = lookup(ENV_VERIFY_TLS) {
            config.verify_tls = parse_bool(&flag).ok_or_else(|| {
                DirectoryError::config(format!("{ENV_VERIFY_TLS} must be a boolean, got '{flag}'"))
            })?;
        }

        Ok(config)
    }

    /// Sets the realm used for the admin login.
    #[must_use]
    pub fn with_auth_realm(mut self, realm: impl Into<String>) -> Self {
        self.auth_realm = Some(realm.into());
        self
    }

    /// Sets the OAuth client id.
    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Enables or disables TLS verification.
    #[must_use]
    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Returns the realm used for the admin login.
    #[must_use]
    pub fn effective_auth_realm(&self) -> &str {
        self.auth_realm.as_deref().unwrap_or(&self.realm)
    }

    /// Validates that all required settings are present.
    pub fn validate(&self) -> DirectoryResult<()> {
        if self.server_url.is_empty() {
            return Err(DirectoryError::config("server URL is required"));
        }
        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            return Err(DirectoryError::config(format!(
                "server URL must start with http:// or https://, got '{}'",
                self.server_url
            )));
        }
        if self.realm.is_empty() {
            return Err(DirectoryError::config("realm is required"));
        }
        if self.username.is_empty() {
            return Err(DirectoryError::config("admin username is required"));
        }
        if self.password.is_empty() {
            return Err(DirectoryError::config("admin password is required"));
        }
        if self.client_id.is_empty() {
            return Err(DirectoryError::config("client id is required"));
        }
        Ok(())
    }
}

impl fmt::Debug for DirectoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryConfig")
            .field("server_url", &self.server_url)
            .field("realm", &self.realm)
            .field("auth_realm", &self.auth_realm)
            .field("username", &self.username)
            .field("password", &"***")
            .field("client_id", &self.client_id)
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
