//! Meetly Server - Event management API.
//!
//! This crate provides the backend of Meetly, responsible for:
//! - Issuing and verifying cookie-based session tokens
//! - Persisting events to MongoDB
//! - Serving the HTTP API consumed by the browser frontends
//!
//! # Architecture
//!
//! The server sits between a browser frontend (which authenticates users
//! against an external identity provider) and MongoDB. It never checks
//! passwords itself: the frontend trades an authenticated identity for a
//! long-lived session cookie via `POST /jwt`, and the session middleware
//! verifies that cookie on protected routes.

pub mod config;
pub mod error;
pub mod events;
pub mod routes;
pub mod session;
pub mod store;
pub mod token;
