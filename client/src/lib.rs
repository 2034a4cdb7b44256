//! Meetly Client - Command-line frontend for the event API.
//!
//! This crate provides the pieces the `meetly` binary is built from:
//! sign-in against an external identity provider, cookie-based sessions with
//! the Meetly backend, and event submission.
//!
//! # Overview
//!
//! Authentication is split the way the browser frontend splits it: the
//! identity provider checks credentials, and the backend only ever sees a
//! verified email, which it trades for a long-lived session cookie.
//!
//! # Modules
//!
//! - [`config`]: Configuration from environment variables
//! - [`error`]: Top-level error type for client operations
//! - [`identity`]: Identity provider sign-in (password and federated)
//! - [`api`]: Backend session calls with an in-process cookie store
//! - [`form`]: Event form state and submission
//! - [`flow`]: Sign-in flows combining identity and backend steps

pub mod api;
pub mod config;
pub mod error;
pub mod flow;
pub mod form;
pub mod identity;
