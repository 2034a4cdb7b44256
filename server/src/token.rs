//! Session token issuance and verification.
//!
//! The Token Service turns an identity payload (at minimum an email) into a
//! signed HS256 JWT with a 365-day validity window. Verification is a plain
//! synchronous call returning a tagged result, so the session middleware can
//! compose it with `?`.
//!
//! No password check happens here: the server trusts that the caller already
//! authenticated against the external identity provider. The token only
//! asserts "someone who knew this email asked for a session".

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session token validity window.
const TOKEN_TTL_DAYS: i64 = 365;

/// Errors that can occur during token handling.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Encoding the token failed. Fatal to the issuing request.
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// The token is missing, malformed, tampered with, or expired.
    ///
    /// All verification failures collapse into this one variant; callers
    /// surface them uniformly as an authentication failure.
    #[error("invalid or expired token")]
    Invalid,
}

/// Identity payload submitted to `POST /jwt`.
///
/// Only `email` is interpreted; any extra fields the caller includes are
/// embedded in the token verbatim and come back out on verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityPayload {
    /// The authenticated user's email address.
    pub email: String,

    /// Additional caller-supplied fields, carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Claims encoded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user's email address.
    pub email: String,

    /// Additional caller-supplied fields from the identity payload.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,

    /// Issued-at (Unix timestamp).
    pub iat: i64,

    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// Issues a signed session token for the given identity payload.
///
/// The token expires [`TOKEN_TTL_DAYS`] days after issuance.
///
/// # Errors
///
/// Returns [`TokenError::Signing`] if encoding fails.
pub fn issue(identity: &IdentityPayload, secret: &str) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = Claims {
        email: identity.email.clone(),
        extra: identity.extra.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    Ok(encode(&Header::default(), &claims, &key)?)
}

/// Verifies a session token's signature and expiry.
///
/// # Errors
///
/// Returns [`TokenError::Invalid`] for any verification failure; expired and
/// tampered tokens are deliberately indistinguishable to the caller.
pub fn verify(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|_| TokenError::Invalid)
}
