//! Integration tests for the full session and event-creation flow.
//!
//! These tests drive the assembled router end to end against the in-memory
//! event store:
//! - `POST /jwt` installs a cookie that authenticates a later `GET /me`
//! - `GET /logout` clears the cookie so the session ends client-side
//! - tampered or missing tokens are rejected with the uniform 401 body
//! - `POST /events` persists a fully-defaulted document

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use meetly_server::config::{Config, DeploymentEnv};
use meetly_server::routes::{create_router, AppState};
use meetly_server::store::MemoryStore;

const SECRET: &str = "integration-test-secret";

fn test_config() -> Config {
    Config {
        port: 5000,
        access_token_secret: SECRET.to_string(),
        db_uri: "mongodb://localhost:27017".to_string(),
        db_user: None,
        db_pass: None,
        env: DeploymentEnv::Development,
    }
}

fn test_app(store: Arc<MemoryStore>) -> Router {
    create_router(AppState::new(test_config(), store))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Extracts the `name=value` pair from a `Set-Cookie` header.
fn cookie_pair(response: &Response) -> String {
    response
        .headers()
        .get(SET_COOKIE)
        .expect("response should set a cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn sign_in_then_access_protected_route() {
    let store = Arc::new(MemoryStore::new());

    // Sign in: trade an identity for a session cookie.
    let response = test_app(store.clone())
        .oneshot(json_request(
            "POST",
            "/jwt",
            json!({ "email": "ada@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = cookie_pair(&response);
    assert!(cookie.starts_with("token="));

    // Use the cookie on a protected route.
    let response = test_app(store)
        .oneshot(
            Request::builder()
                .uri("/me")
                .header(COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let me = body_json(response).await;
    assert_eq!(me["email"], "ada@example.com");
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let store = Arc::new(MemoryStore::new());

    let response = test_app(store)
        .oneshot(
            Request::builder()
                .uri("/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);
}

#[tokio::test]
async fn cleared_cookie_no_longer_authenticates() {
    let store = Arc::new(MemoryStore::new());

    // The logout cookie carries an empty token value; a browser honoring
    // Max-Age=0 drops it entirely, and even a client that replays the empty
    // value must be rejected.
    let response = test_app(store.clone())
        .oneshot(
            Request::builder()
                .uri("/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let cleared = cookie_pair(&response);
    assert_eq!(cleared, "token=");

    let response = test_app(store)
        .oneshot(
            Request::builder()
                .uri("/me")
                .header(COOKIE, &cleared)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "unauthorized access");
}

#[tokio::test]
async fn tampered_cookie_is_rejected_with_uniform_body() {
    let store = Arc::new(MemoryStore::new());

    // Obtain a real cookie, then corrupt its signature segment.
    let response = test_app(store.clone())
        .oneshot(json_request(
            "POST",
            "/jwt",
            json!({ "email": "mallory@example.com" }),
        ))
        .await
        .unwrap();
    let cookie = cookie_pair(&response);
    let tampered = format!("{}XX", cookie);

    let response = test_app(store)
        .oneshot(
            Request::builder()
                .uri("/me")
                .header(COOKIE, &tampered)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "unauthorized access");
}

#[tokio::test]
async fn created_event_has_all_derived_properties() {
    let store = Arc::new(MemoryStore::new());

    let response = test_app(store.clone())
        .oneshot(json_request(
            "POST",
            "/events",
            json!({
                "eventName": "Tech Meetup",
                "description": "Monthly community gathering",
                "date": "2025-06-01",
                "time": "18:00",
                "location": "Hall A",
                "maxAttendees": "40",
                "category": "education",
                "isPublic": true
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;

    assert_eq!(json["message"], "Event created successfully");
    let event = &json["event"];
    assert_eq!(event["eventName"], "Tech Meetup");
    assert_eq!(event["description"], "Monthly community gathering");
    assert_eq!(event["time"], "18:00");
    assert_eq!(event["location"], "Hall A");
    assert_eq!(event["maxAttendees"], 40);
    assert_eq!(event["category"], "education");
    assert_eq!(event["isPublic"], true);
    assert_eq!(event["status"], "upcoming");
    assert_eq!(event["attendees"], json!([]));
    assert!(event["createdAt"].is_string());
    assert_eq!(event["createdAt"], event["updatedAt"]);
    assert_eq!(event["_id"], json["eventId"]);

    // The stored document matches what was returned.
    assert_eq!(store.len(), 1);
    let stored = &store.events()[0];
    assert_eq!(stored.event_name, "Tech Meetup");
    assert_eq!(stored.id.unwrap().to_hex(), json["eventId"].as_str().unwrap());
}

#[tokio::test]
async fn event_creation_does_not_require_a_session() {
    // Event submission is deliberately open; only /me is behind the session
    // middleware.
    let store = Arc::new(MemoryStore::new());

    let response = test_app(store)
        .oneshot(json_request(
            "POST",
            "/events",
            json!({
                "eventName": "Open submission",
                "date": "2025-07-15",
                "time": "10:00",
                "location": "Park"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}
