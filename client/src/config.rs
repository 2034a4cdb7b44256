//! Configuration module for the Meetly client.
//!
//! This module handles parsing configuration from environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `MEETLY_API_URL` | No | `http://localhost:5000` | Meetly backend base URL |
//! | `MEETLY_IDP_URL` | For sign-in | - | Identity provider base URL |
//! | `MEETLY_IDP_API_KEY` | For sign-in | - | Identity provider public API key |
//!
//! The identity provider variables are only required by commands that
//! authenticate; token and event calls need just the backend URL.
//!
//! # Example
//!
//! ```no_run
//! use meetly_client::config::Config;
//!
//! let config = Config::from_env();
//! println!("API URL: {}", config.api_url);
//! ```

use std::env;

use thiserror::Error;

/// Default backend base URL for local development.
const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Errors that can occur during configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
}

/// Identity provider settings, required only for sign-in commands.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Identity provider base URL.
    pub url: String,

    /// Public API key sent with every provider request.
    pub api_key: String,
}

/// Configuration for the Meetly client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Meetly backend base URL.
    pub api_url: String,

    /// Identity provider settings, when configured.
    pub identity: Option<IdentityConfig>,
}

impl Config {
    /// Creates a new `Config` by parsing environment variables.
    ///
    /// The backend URL falls back to the local development default; the
    /// identity provider section is present only when both of its variables
    /// are set.
    #[must_use]
    pub fn from_env() -> Self {
        let api_url = env::var("MEETLY_API_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let identity = match (env::var("MEETLY_IDP_URL"), env::var("MEETLY_IDP_API_KEY")) {
            (Ok(url), Ok(api_key)) if !url.is_empty() && !api_key.is_empty() => {
                Some(IdentityConfig { url, api_key })
            }
            _ => None,
        };

        Self { api_url, identity }
    }

    /// Returns the identity provider settings or a descriptive error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming the first unset
    /// identity provider variable.
    pub fn identity(&self) -> Result<&IdentityConfig, ConfigError> {
        self.identity.as_ref().ok_or_else(|| {
            if env::var("MEETLY_IDP_URL").is_err() {
                ConfigError::MissingEnvVar("MEETLY_IDP_URL".to_string())
            } else {
                ConfigError::MissingEnvVar("MEETLY_IDP_API_KEY".to_string())
            }
        })
    }
}
