//! Error types for the Meetly client.
//!
//! This module defines the top-level error type used by the command-line
//! flows, wrapping the per-module errors into one enum with clear,
//! human-readable messages.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::form::SubmitError;
use crate::identity::IdentityError;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Configuration-related error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Identity provider sign-in failed.
    #[error("sign-in error: {0}")]
    Identity(#[from] IdentityError),

    /// Backend session call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Event submission failed.
    #[error("event submission error: {0}")]
    Submit(#[from] SubmitError),
}
