//! Server configuration module.
//!
//! Parses configuration from environment variables for the Meetly server.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `ACCESS_TOKEN_SECRET` | Yes | - | HMAC secret for session token signing |
//! | `PORT` | No | 5000 | HTTP server port |
//! | `DB_URI` | No | `mongodb://localhost:27017` | MongoDB connection string |
//! | `DB_USER` | No | - | MongoDB username |
//! | `DB_PASS` | No | - | MongoDB password |
//! | `APP_ENV` | No | development | `development` or `production`; controls cookie flags |

use std::env;
use std::fmt;

use thiserror::Error;

/// Default HTTP server port.
const DEFAULT_PORT: u16 = 5000;

/// Default MongoDB connection string.
const DEFAULT_DB_URI: &str = "mongodb://localhost:27017";

/// Browser origins allowed to call the API with credentials.
///
/// Restricted to the two local development frontends.
pub const ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:5174"];

/// Errors that can occur when parsing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable has invalid format.
    #[error("invalid format for {var}: {message}")]
    InvalidFormat { var: String, message: String },

    /// Port number is invalid.
    #[error("invalid port number: {0}")]
    InvalidPort(#[from] std::num::ParseIntError),
}

/// Deployment mode, controlling the session cookie's transport flags.
///
/// Development issues `SameSite=Strict` cookies without the `Secure` flag so
/// they work over plain HTTP; production issues `SameSite=None; Secure`
/// cookies suitable for a cross-site frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentEnv {
    /// Local development (`SameSite=Strict`, no `Secure`).
    Development,
    /// Production deployment (`SameSite=None; Secure`).
    Production,
}

impl DeploymentEnv {
    /// Parses the `APP_ENV` value. Anything other than `production`
    /// (case-insensitive) is treated as development.
    fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("production") => Self::Production,
            _ => Self::Development,
        }
    }

    /// Returns `true` in production mode.
    #[must_use]
    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for DeploymentEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Server configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port.
    pub port: u16,

    /// Shared secret used to sign and verify session tokens.
    pub access_token_secret: String,

    /// MongoDB connection string.
    pub db_uri: String,

    /// Optional MongoDB username.
    pub db_user: Option<String>,

    /// Optional MongoDB password.
    pub db_pass: Option<String>,

    /// Deployment mode (cookie flag selection).
    pub env: DeploymentEnv,
}

impl Config {
    /// Parse configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `ACCESS_TOKEN_SECRET` is missing or `PORT`
    /// is not a valid port number.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use meetly_server::config::Config;
    ///
    /// let config = Config::from_env().expect("Failed to load config");
    /// println!("Server will listen on port {}", config.port);
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_token_secret = env::var("ACCESS_TOKEN_SECRET")
            .map_err(|_| ConfigError::MissingEnvVar("ACCESS_TOKEN_SECRET".to_string()))?;

        let port = parse_port()?;
        let db_uri = env::var("DB_URI").unwrap_or_else(|_| DEFAULT_DB_URI.to_string());
        let db_user = env::var("DB_USER").ok().filter(|v| !v.is_empty());
        let db_pass = env::var("DB_PASS").ok().filter(|v| !v.is_empty());
        let env_value = env::var("APP_ENV").ok();
        let env = DeploymentEnv::from_env_value(env_value.as_deref());

        Ok(Self {
            port,
            access_token_secret,
            db_uri,
            db_user,
            db_pass,
            env,
        })
    }
}

/// Parse the PORT environment variable.
///
/// Returns the default port if not set.
fn parse_port() -> Result<u16, ConfigError> {
    match env::var("PORT") {
        Ok(port_str) => Ok(port_str.parse()?),
        Err(env::VarError::NotPresent) => Ok(DEFAULT_PORT),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidFormat {
            var: "PORT".to_string(),
            message: "contains invalid unicode".to_string(),
        }),
    }
}
