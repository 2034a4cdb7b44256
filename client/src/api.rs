//! Backend session calls.
//!
//! [`ApiClient`] talks to the Meetly backend. Its `reqwest` client keeps a
//! cookie store, so the HttpOnly `token` cookie installed by
//! [`request_token`](ApiClient::request_token) automatically rides every
//! subsequent request the same client makes - mirroring how the browser
//! carries the session.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default timeout for backend requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the session (401).
    #[error("unauthorized: no valid session")]
    Unauthorized,

    /// The backend is unreachable or the request failed in transit.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The backend returned an unexpected status.
    #[error("unexpected status {status}: {body}")]
    Unexpected {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// Failed to parse the response from the backend.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Client configuration error.
    #[error("client configuration error: {0}")]
    Configuration(String),
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    email: &'a str,
}

/// The authenticated identity reported by `GET /me`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionIdentity {
    /// The session's email address.
    pub email: String,
}

/// Client for the Meetly backend, with an in-process cookie store.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a new backend client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] if the HTTP client cannot be
    /// created.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// The underlying HTTP client, cookie store included.
    pub(crate) fn http(&self) -> &Client {
        &self.http_client
    }

    /// Builds an absolute URL for the given path.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Requests a session token for the given email via `POST /jwt`.
    ///
    /// On success the backend sets the HttpOnly `token` cookie, which lands
    /// in this client's cookie store.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unavailable`] if the backend cannot be reached or
    /// [`ApiError::Unexpected`] on a non-success status.
    pub async fn request_token(&self, email: &str) -> Result<(), ApiError> {
        let response = self
            .http_client
            .post(self.endpoint("/jwt"))
            .json(&TokenRequest { email })
            .send()
            .await
            .map_err(transport_error)?;

        expect_success(response).await?;
        debug!(email = %email, "Session token installed");
        Ok(())
    }

    /// Ends the session via `GET /logout`, clearing the cookie.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unavailable`] or [`ApiError::Unexpected`] as for
    /// [`Self::request_token`].
    pub async fn logout(&self) -> Result<(), ApiError> {
        let response = self
            .http_client
            .get(self.endpoint("/logout"))
            .send()
            .await
            .map_err(transport_error)?;

        expect_success(response).await?;
        debug!("Session ended");
        Ok(())
    }

    /// Fetches the authenticated identity via the protected `GET /me`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when no valid session cookie is
    /// held, and [`ApiError::InvalidResponse`] on a malformed body.
    pub async fn whoami(&self) -> Result<SessionIdentity, ApiError> {
        let response = self
            .http_client
            .get(self.endpoint("/me"))
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        let response = expect_success(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("failed to parse identity: {e}")))
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Unavailable(format!("request timed out after {REQUEST_TIMEOUT:?}"))
    } else if err.is_connect() {
        ApiError::Unavailable(format!("connection failed: {err}"))
    } else {
        ApiError::Unavailable(format!("request failed: {err}"))
    }
}

async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Unexpected {
        status: status.as_u16(),
        body,
    })
}
