//! Session cookie handling and authentication middleware.
//!
//! The session is a signed JWT carried in an HTTP-only cookie named
//! [`TOKEN_COOKIE`]. This module owns the three jobs around it:
//!
//! - building `Set-Cookie` values with flags appropriate to the deployment
//!   mode (development vs production)
//! - extracting the token from an incoming `Cookie` header
//! - the [`require_session`] middleware, which verifies the token and makes
//!   the decoded [`Claims`] available to handlers via the [`Identity`]
//!   extractor
//!
//! Every failure mode (no cookie, tampered token, expired token) collapses
//! into a single 401 response so callers learn nothing about why a token was
//! rejected.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::config::DeploymentEnv;
use crate::error::ApiError;
use crate::routes::AppState;
use crate::token::{self, Claims};

/// Name of the session cookie.
pub const TOKEN_COOKIE: &str = "token";

/// Builds the `Set-Cookie` value that installs a session token.
///
/// Development cookies omit `Secure` so they work over plain HTTP and use
/// `SameSite=Strict`; production cookies use `SameSite=None; Secure` so the
/// browser sends them from a cross-site frontend.
#[must_use]
pub fn build_token_cookie(token: &str, env: DeploymentEnv) -> String {
    if env.is_production() {
        format!("{TOKEN_COOKIE}={token}; Path=/; HttpOnly; SameSite=None; Secure")
    } else {
        format!("{TOKEN_COOKIE}={token}; Path=/; HttpOnly; SameSite=Strict")
    }
}

/// Builds the `Set-Cookie` value that clears the session cookie.
///
/// Flags mirror [`build_token_cookie`] so the browser matches the original
/// cookie; `Max-Age=0` makes it expire immediately.
#[must_use]
pub fn build_logout_cookie(env: DeploymentEnv) -> String {
    if env.is_production() {
        format!("{TOKEN_COOKIE}=; Path=/; HttpOnly; SameSite=None; Secure; Max-Age=0")
    } else {
        format!("{TOKEN_COOKIE}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0")
    }
}

/// Extracts the session token from the request's `Cookie` header, if present.
#[must_use]
pub fn extract_token_cookie(parts: &Parts) -> Option<String> {
    let header = parts.headers.get(COOKIE)?.to_str().ok()?;

    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == TOKEN_COOKIE).then(|| value.to_string())
    })
}

/// Middleware that rejects requests without a valid session token.
///
/// On success the decoded [`Claims`] are inserted into request extensions,
/// where the [`Identity`] extractor picks them up.
///
/// # Errors
///
/// Returns [`ApiError::Unauthenticated`] (401) when the cookie is missing or
/// the token fails verification.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();

    let token = extract_token_cookie(&parts).ok_or_else(|| {
        debug!("Request without session cookie");
        ApiError::Unauthenticated
    })?;

    let claims = token::verify(&token, &state.config.access_token_secret)?;

    parts.extensions.insert(claims);
    request = Request::from_parts(parts, body);

    Ok(next.run(request).await)
}

/// Extractor exposing the authenticated caller's claims to a handler.
///
/// Only usable behind [`require_session`]; elsewhere extraction fails with
/// the same 401 the middleware produces.
#[derive(Debug, Clone)]
pub struct Identity(pub Claims);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(Identity)
            .ok_or(ApiError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    fn parts_with_cookie(value: &str) -> Parts {
        let (parts, ()) = HttpRequest::builder()
            .header(COOKIE, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn dev_cookie_is_strict_without_secure() {
        let cookie = build_token_cookie("abc", DeploymentEnv::Development);
        assert_eq!(cookie, "token=abc; Path=/; HttpOnly; SameSite=Strict");
    }

    #[test]
    fn prod_cookie_is_none_with_secure() {
        let cookie = build_token_cookie("abc", DeploymentEnv::Production);
        assert_eq!(cookie, "token=abc; Path=/; HttpOnly; SameSite=None; Secure");
    }

    #[test]
    fn logout_cookie_expires_immediately() {
        let cookie = build_logout_cookie(DeploymentEnv::Development);
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.ends_with("Max-Age=0"));
    }

    #[test]
    fn extract_finds_token_among_other_cookies() {
        let parts = parts_with_cookie("theme=dark; token=abc123; lang=en");
        assert_eq!(extract_token_cookie(&parts), Some("abc123".to_string()));
    }

    #[test]
    fn extract_finds_lone_token() {
        let parts = parts_with_cookie("token=xyz");
        assert_eq!(extract_token_cookie(&parts), Some("xyz".to_string()));
    }

    #[test]
    fn extract_ignores_other_cookies() {
        let parts = parts_with_cookie("session=abc; theme=dark");
        assert_eq!(extract_token_cookie(&parts), None);
    }

    #[test]
    fn extract_handles_missing_header() {
        let (parts, ()) = HttpRequest::builder().body(()).unwrap().into_parts();
        assert_eq!(extract_token_cookie(&parts), None);
    }

    #[test]
    fn extract_does_not_match_prefixed_names() {
        let parts = parts_with_cookie("access_token=abc");
        assert_eq!(extract_token_cookie(&parts), None);
    }
}
