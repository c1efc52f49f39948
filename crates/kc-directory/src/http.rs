//! HTTP implementation of [`DirectoryClient`] for the Keycloak admin REST API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::client::DirectoryClient;
use crate::config::DirectoryConfig;
use crate::error::{DirectoryError, DirectoryResult};
use crate::model::{Group, GroupQuery, NewUser, PasswordCredential, User, UserQuery};

/// Request timeout applied to every admin call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Authenticated admin API client.
///
/// The bearer token is obtained once in [`HttpDirectoryClient::connect`]
/// and reused for the lifetime of the handle.
pub struct HttpDirectoryClient {
    client: reqwest::Client,
    base_url: String,
    realm: String,
    access_token: String,
}

impl HttpDirectoryClient {
    /// Authenticates with the admin credentials and returns a session.
    pub async fn connect(config: &DirectoryConfig) -> DirectoryResult<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        if !config.verify_tls {
            tracing::warn!(server = %config.server_url, "TLS certificate verification is disabled");
        }

        let access_token = fetch_token(&client, config).await?;
        tracing::info!(
            server = %config.server_url,
            realm = %config.realm,
            "Connected to Keycloak admin API"
        );

        Ok(Self {
            client,
            base_url: config.server_url.clone(),
            realm: config.realm.clone(),
            access_token,
        })
    }

    /// Gets the administered realm.
    pub fn realm(&self) -> &str {
        &self.realm
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/admin/realms/{}{}",
            self.base_url,
            urlencoding::encode(&self.realm),
            path
        )
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> DirectoryResult<T> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        handle_response(response).await
    }

    async fn put<B: serde::Serialize>(&self, path: &str, body: Option<&B>) -> DirectoryResult<()> {
        let mut request = self.client.put(self.url(path)).bearer_auth(&self.access_token);
        if let Some(body) = body {
            request = request.json(body);
        }
        handle_empty_response(request.send().await?).await
    }

    async fn delete(&self, path: &str) -> DirectoryResult<()> {
        let response = self
            .client
            .delete(self.url(path))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        handle_empty_response(response).await
    }
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn query_users(&self, query: &UserQuery) -> DirectoryResult<Vec<User>> {
        let qs = query.to_query_string();
        let path = if qs.is_empty() {
            "/users".to_string()
        } else {
            format!("/users?{qs}")
        };
        self.get(&path).await
    }

    async fn create_user(&self, user: &NewUser) -> DirectoryResult<Option<String>> {
        let response = self
            .client
            .post(self.url("/users"))
            .bearer_auth(&self.access_token)
            .json(user)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .and_then(id_from_location))
    }

    async fn set_password(
        &self,
        user_id: &str,
        password: &str,
        temporary: bool,
    ) -> DirectoryResult<()> {
        let credential = PasswordCredential::new(password, temporary);
        self.put(
            &format!("/users/{}/reset-password", urlencoding::encode(user_id)),
            Some(&credential),
        )
        .await
    }

    async fn delete_user(&self, user_id: &str) -> DirectoryResult<()> {
        self.delete(&format!("/users/{}", urlencoding::encode(user_id)))
            .await
            .map_err(|e| not_found_as("user", user_id, e))
    }

    async fn list_groups(&self, query: Option<&GroupQuery>) -> DirectoryResult<Vec<Group>> {
        let path = match query.and_then(|q| q.search.as_deref()) {
            Some(term) => format!("/groups?search={}", urlencoding::encode(term)),
            None => "/groups".to_string(),
        };
        self.get(&path).await
    }

    async fn group_by_path(&self, path: &str) -> DirectoryResult<Group> {
        self.get(&format!("/group-by-path/{}", encode_group_path(path)))
            .await
            .map_err(|e| not_found_as("group", path, e))
    }

    async fn user_groups(&self, user_id: &str) -> DirectoryResult<Vec<Group>> {
        self.get(&format!("/users/{}/groups", urlencoding::encode(user_id)))
            .await
            .map_err(|e| not_found_as("user", user_id, e))
    }

    async fn add_user_to_group(&self, user_id: &str, group_id: &str) -> DirectoryResult<()> {
        self.put::<()>(
            &format!(
                "/users/{}/groups/{}",
                urlencoding::encode(user_id),
                urlencoding::encode(group_id)
            ),
            None,
        )
        .await
    }

    async fn remove_user_from_group(&self, user_id: &str, group_id: &str) -> DirectoryResult<()> {
        self.delete(&format!(
            "/users/{}/groups/{}",
            urlencoding::encode(user_id),
            urlencoding::encode(group_id)
        ))
        .await
    }
}

/// Performs the resource-owner password grant for the admin user.
async fn fetch_token(client: &reqwest::Client, config: &DirectoryConfig) -> DirectoryResult<String> {
    let url = format!(
        "{}/realms/{}/protocol/openid-connect/token",
        config.server_url,
        urlencoding::encode(config.effective_auth_realm())
    );

    let form = [
        ("grant_type", "password"),
        ("client_id", config.client_id.as_str()),
        ("username", config.username.as_str()),
        ("password", config.password.as_str()),
    ];

    let response = client.post(&url).form(&form).send().await?;
    let status = response.status();

    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(DirectoryError::Auth(format!(
            "token request failed with {}: {}",
            status.as_u16(),
            message
        )));
    }

    let token: TokenResponse = response.json().await?;
    Ok(token.access_token)
}

/// Handles a response with a body.
async fn handle_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> DirectoryResult<T> {
    if response.status().is_success() {
        response.json().await.map_err(DirectoryError::Http)
    } else {
        Err(error_from_response(response).await)
    }
}

/// Handles a response without a body.
async fn handle_empty_response(response: reqwest::Response) -> DirectoryResult<()> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(error_from_response(response).await)
    }
}

async fn error_from_response(response: reqwest::Response) -> DirectoryError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    DirectoryError::api(status, message)
}

/// Maps a 404 to a typed not found error for the given resource.
fn not_found_as(resource: &'static str, id: &str, err: DirectoryError) -> DirectoryError {
    if err.is_not_found() {
        DirectoryError::not_found(resource, id)
    } else {
        err
    }
}

/// Extracts the trailing id from a `Location` header.
fn id_from_location(location: &str) -> Option<String> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty() && !id.contains(':'))
        .map(str::to_string)
}

/// Encodes each path segment while keeping the separators.
fn encode_group_path(path: &str) -> String {
    path.trim_start_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_header_yields_id() {
        assert_eq!(
            id_from_location("https://kc/admin/realms/r/users/9887633f-2f60-4c67-9c3d-a62d6604cf2d"),
            Some("9887633f-2f60-4c67-9c3d-a62d6604cf2d".to_string())
        );
        assert_eq!(id_from_location("/admin/realms/r/users/abc/"), Some("abc".to_string()));
        assert_eq!(id_from_location(""), None);
    }

    #[test]
    fn group_path_segments_are_encoded() {
        assert_eq!(encode_group_path("/afis_stats/fire stats"), "afis_stats/fire%20stats");
        assert_eq!(encode_group_path("/VIEWER"), "VIEWER");
    }

    #[test]
    fn not_found_mapping_keeps_other_errors() {
        let err = not_found_as("group", "/G1", DirectoryError::api(404, "Group path does not exist"));
        assert!(matches!(err, DirectoryError::NotFound { resource: "group", .. }));

        let err = not_found_as("group", "/G1", DirectoryError::api(403, "forbidden"));
        assert!(matches!(err, DirectoryError::Api { status: 403, .. }));
    }
}
