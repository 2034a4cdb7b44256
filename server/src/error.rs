//! Error types for the Meetly server.
//!
//! Every failure that crosses the request boundary is converted to a JSON
//! error response here. The taxonomy is small:
//!
//! - [`ApiError::Unauthenticated`] - missing, tampered, or expired session
//!   token (401)
//! - [`ApiError::Persistence`] - event insert failed; the underlying store
//!   message is passed through to the caller (500)
//! - [`ApiError::TokenSigning`] - token issuance failed (500)
//!
//! No retries happen anywhere in the stack; errors are logged via `tracing`
//! and surfaced once.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;
use crate::token::TokenError;

/// Top-level request error for the Meetly API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No valid session token accompanied the request.
    ///
    /// Covers the missing-cookie, tampered-token, and expired-token cases;
    /// all three are indistinguishable to the caller.
    #[error("unauthorized access")]
    Unauthenticated,

    /// The event store rejected an insert.
    #[error("failed to create event: {details}")]
    Persistence {
        /// The underlying store error message, passed through verbatim.
        details: String,
    },

    /// Signing a session token failed.
    #[error("token signing failed: {0}")]
    TokenSigning(String),

    /// A generated header value was not valid HTTP.
    #[error("invalid header value: {0}")]
    Header(#[from] axum::http::header::InvalidHeaderValue),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Persistence {
            details: err.to_string(),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => Self::Unauthenticated,
            TokenError::Signing(e) => Self::TokenSigning(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "unauthorized access" })),
            )
                .into_response(),
            Self::Persistence { details } => {
                error!(details = %details, "Event creation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Failed to create event",
                        "details": details,
                    })),
                )
                    .into_response()
            }
            Self::TokenSigning(message) => {
                error!(error = %message, "Token signing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
            Self::Header(err) => {
                error!(error = %err, "Invalid header value");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
