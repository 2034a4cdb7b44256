//! Identity provider client.
//!
//! This module provides a client for the external identity provider that
//! actually checks credentials. The Meetly backend never sees a password:
//! the client first authenticates here, then trades the verified identity
//! for a backend session cookie.
//!
//! Two sign-in paths are supported:
//! - email/password (`grant_type=password`)
//! - federated (`grant_type=id_token`, e.g. a Google-issued ID token)
//!
//! # Architecture
//!
//! [`IdentityClient`] holds a pooled `reqwest::Client` with a 5-second
//! request timeout and maps transport failures into the granular
//! [`IdentityError`] taxonomy so flows can distinguish "wrong password"
//! from "provider down".

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

/// Default timeout for identity provider requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur when interacting with the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider rejected the credentials or token.
    ///
    /// Covers unregistered users and wrong passwords; the provider does not
    /// distinguish the two and neither do we.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The request to the provider timed out.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The provider is unreachable.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    /// Failed to parse the response from the provider.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Client configuration error.
    #[error("client configuration error: {0}")]
    Configuration(String),
}

/// The authenticated user as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderUser {
    /// The unique identifier for the user.
    pub id: String,

    /// The user's email address, if available.
    pub email: Option<String>,
}

/// A successful sign-in result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSession {
    /// The provider's access token.
    pub access_token: String,

    /// The authenticated user.
    pub user: ProviderUser,
}

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct IdTokenGrant<'a> {
    provider: &'a str,
    id_token: &'a str,
}

/// Client for the external identity provider.
#[derive(Debug, Clone)]
pub struct IdentityClient {
    /// The underlying HTTP client.
    http_client: Client,

    /// Provider base URL, without trailing slash.
    base_url: String,

    /// Public API key sent with every request.
    api_key: String,
}

impl IdentityClient {
    /// Creates a new identity provider client.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Configuration`] if the HTTP client cannot be
    /// created.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let api_key = api_key.into();

        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                IdentityError::Configuration(format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            http_client,
            base_url,
            api_key,
        })
    }

    /// Signs in with an email and password.
    ///
    /// # Errors
    ///
    /// - [`IdentityError::InvalidCredentials`] - unregistered user or wrong
    ///   password
    /// - [`IdentityError::Timeout`] - the request timed out (5 second limit)
    /// - [`IdentityError::Unavailable`] - the provider is unreachable
    /// - [`IdentityError::InvalidResponse`] - unexpected response format
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, IdentityError> {
        let url = format!("{}/v1/token?grant_type=password", self.base_url);
        debug!(url = %url, "Signing in with password grant");

        self.token_request(&url, &PasswordGrant { email, password })
            .await
    }

    /// Signs in with a federated provider's ID token.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::sign_in`]; a rejected or expired ID token
    /// surfaces as [`IdentityError::InvalidCredentials`].
    pub async fn sign_in_with_provider(
        &self,
        provider: &str,
        id_token: &str,
    ) -> Result<ProviderSession, IdentityError> {
        let url = format!("{}/v1/token?grant_type=id_token", self.base_url);
        debug!(url = %url, provider = %provider, "Signing in with federated grant");

        self.token_request(&url, &IdTokenGrant { provider, id_token })
            .await
    }

    async fn token_request<B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<ProviderSession, IdentityError> {
        let response = self
            .http_client
            .post(url)
            .header("apikey", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    IdentityError::Timeout(REQUEST_TIMEOUT)
                } else if e.is_connect() {
                    IdentityError::Unavailable(format!("connection failed: {e}"))
                } else {
                    IdentityError::Unavailable(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            debug!(status = %status, "Sign-in rejected");
            return Err(IdentityError::InvalidCredentials);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Unexpected response from identity provider");
            return Err(IdentityError::InvalidResponse(format!(
                "unexpected status {status}: {body}"
            )));
        }

        let session: ProviderSession = response.json().await.map_err(|e| {
            IdentityError::InvalidResponse(format!("failed to parse session response: {e}"))
        })?;

        debug!(user_id = %session.user.id, "Sign-in succeeded");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_body(email: &str) -> serde_json::Value {
        json!({
            "access_token": "provider-token",
            "user": { "id": "user-1", "email": email }
        })
    }

    #[tokio::test]
    async fn sign_in_returns_session_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(header("apikey", "anon-key"))
            .and(body_partial_json(json!({ "email": "ada@example.com" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body("ada@example.com")))
            .mount(&server)
            .await;

        let client = IdentityClient::new(server.uri(), "anon-key").unwrap();
        let session = client.sign_in("ada@example.com", "hunter2").await.unwrap();

        assert_eq!(session.access_token, "provider-token");
        assert_eq!(session.user.email.as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn sign_in_maps_400_to_invalid_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/token"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "error": "invalid_grant" })),
            )
            .mount(&server)
            .await;

        let client = IdentityClient::new(server.uri(), "anon-key").unwrap();
        let result = client.sign_in("nobody@example.com", "wrong").await;

        assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn sign_in_maps_401_to_invalid_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/token"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = IdentityClient::new(server.uri(), "anon-key").unwrap();
        let result = client.sign_in("ada@example.com", "expired").await;

        assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn sign_in_surfaces_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/token"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = IdentityClient::new(server.uri(), "anon-key").unwrap();
        let result = client.sign_in("ada@example.com", "hunter2").await;

        assert!(matches!(result, Err(IdentityError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn sign_in_reports_unreachable_provider() {
        // Port 1 is never listening.
        let client = IdentityClient::new("http://127.0.0.1:1", "anon-key").unwrap();
        let result = client.sign_in("ada@example.com", "hunter2").await;

        assert!(matches!(result, Err(IdentityError::Unavailable(_))));
    }

    #[tokio::test]
    async fn federated_sign_in_uses_id_token_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/token"))
            .and(query_param("grant_type", "id_token"))
            .and(body_partial_json(json!({ "provider": "google" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body("ada@example.com")))
            .mount(&server)
            .await;

        let client = IdentityClient::new(server.uri(), "anon-key").unwrap();
        let session = client
            .sign_in_with_provider("google", "google-id-token")
            .await
            .unwrap();

        assert_eq!(session.user.id, "user-1");
    }

    #[tokio::test]
    async fn malformed_body_is_an_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = IdentityClient::new(server.uri(), "anon-key").unwrap();
        let result = client.sign_in("ada@example.com", "hunter2").await;

        assert!(matches!(result, Err(IdentityError::InvalidResponse(_))));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = IdentityClient::new("https://idp.example.com/", "key").unwrap();
        assert_eq!(client.base_url, "https://idp.example.com");
    }
}
