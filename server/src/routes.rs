//! HTTP route handlers for the Meetly server.
//!
//! This module provides the HTTP API endpoints:
//!
//! - `GET /` - Plain-text liveness banner
//! - `POST /jwt` - Issue a session token as an HTTP-only cookie
//! - `GET /logout` - Clear the session cookie
//! - `POST /events` - Create an event
//! - `GET /me` - Return the authenticated caller's identity (protected)
//!
//! # Architecture
//!
//! All routes share application state through [`AppState`], which carries the
//! configuration and the event store handle. The store is held behind the
//! [`EventStore`] trait so tests run against an in-memory double.
//!
//! Cross-origin access is limited to the two local frontend origins, with
//! credentials allowed so the browser sends the session cookie.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use meetly_server::routes::{create_router, AppState};
//! use meetly_server::config::Config;
//! use meetly_server::store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().expect("failed to load config");
//!     let state = AppState::new(config, Arc::new(MemoryStore::new()));
//!     let app = create_router(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::{CONTENT_TYPE, SET_COOKIE}, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::config::{Config, ALLOWED_ORIGINS};
use crate::error::ApiError;
use crate::events::{EventDocument, EventDraft};
use crate::session::{self, require_session, Identity};
use crate::store::EventStore;
use crate::token::{self, IdentityPayload};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for all route handlers.
///
/// Cloned per request; both members are cheap `Arc` handles.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<Config>,

    /// Event persistence backend.
    pub store: Arc<dyn EventStore>,
}

impl AppState {
    /// Creates application state from a configuration and a store handle.
    #[must_use]
    pub fn new(config: Config, store: Arc<dyn EventStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Response body for a successful event creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventResponse {
    /// Human-readable confirmation.
    pub message: String,

    /// Store-assigned identifier, as a hex string.
    pub event_id: String,

    /// The persisted document, identifier included.
    pub event: EventDocument,
}

// ============================================================================
// Router
// ============================================================================

/// Creates the application router with all routes and middleware layers.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use meetly_server::routes::{create_router, AppState};
/// use meetly_server::config::Config;
/// use meetly_server::store::MemoryStore;
///
/// let config = Config::from_env().expect("failed to load config");
/// let state = AppState::new(config, Arc::new(MemoryStore::new()));
/// let router = create_router(state);
/// ```
#[must_use]
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = ALLOWED_ORIGINS
        .into_iter()
        .map(HeaderValue::from_static)
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/me", get(get_me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ))
        .route("/", get(get_root))
        .route("/jwt", post(post_jwt))
        .route("/logout", get(get_logout))
        .route("/events", post(post_events))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Handles `GET /` - liveness banner.
async fn get_root() -> &'static str {
    "Event Management"
}

/// Handles `POST /jwt` - issues a session token.
///
/// Signs the submitted identity payload and installs it as an HTTP-only
/// cookie; the response body is `{ "success": true }`.
async fn post_jwt(
    State(state): State<AppState>,
    Json(identity): Json<IdentityPayload>,
) -> Result<Response, ApiError> {
    let token = token::issue(&identity, &state.config.access_token_secret)?;
    let cookie = session::build_token_cookie(&token, state.config.env);

    debug!(email = %identity.email, "Issued session token");

    let mut response = Json(json!({ "success": true })).into_response();
    response
        .headers_mut()
        .insert(SET_COOKIE, HeaderValue::from_str(&cookie)?);
    Ok(response)
}

/// Handles `GET /logout` - clears the session cookie.
async fn get_logout(State(state): State<AppState>) -> Result<Response, ApiError> {
    let cookie = session::build_logout_cookie(state.config.env);

    let mut response = Json(json!({ "success": true })).into_response();
    response
        .headers_mut()
        .insert(SET_COOKIE, HeaderValue::from_str(&cookie)?);
    Ok(response)
}

/// Handles `GET /me` - returns the authenticated caller's claims.
///
/// Mounted behind [`require_session`]; unauthenticated requests never reach
/// this handler.
async fn get_me(Identity(claims): Identity) -> Json<token::Claims> {
    Json(claims)
}

/// Handles `POST /events` - creates an event.
///
/// Applies the creation-time defaults, persists the document, and responds
/// `201` with the stored event. A store failure surfaces as
/// `500 { error, details }`.
async fn post_events(
    State(state): State<AppState>,
    Json(draft): Json<EventDraft>,
) -> Result<(StatusCode, Json<CreateEventResponse>), ApiError> {
    let mut event = EventDocument::from_draft(draft, Utc::now());
    let id = state.store.insert_event(event.clone()).await?;
    event.id = Some(id);

    info!(event_id = %id, event_name = %event.event_name, "Event created");

    Ok((
        StatusCode::CREATED,
        Json(CreateEventResponse {
            message: "Event created successfully".to_string(),
            event_id: id.to_hex(),
            event,
        }),
    ))
}

// ============================================================================
// Tests
// ============================================================================
