//! Meetly Server - Main entry point.
//!
//! This binary starts the Meetly event management API with:
//! - Structured JSON logging
//! - A MongoDB-backed event store
//! - Graceful shutdown handling (SIGTERM/SIGINT)
//!
//! # Configuration
//!
//! See [`meetly_server::config`] for environment variable configuration.
//!
//! # Example
//!
//! ```bash
//! ACCESS_TOKEN_SECRET="change-me" \
//! DB_USER=meetly DB_PASS=secret \
//! PORT=5000 \
//! cargo run --release --bin meetly-server
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use meetly_server::config::Config;
use meetly_server::routes::{create_router, AppState};
use meetly_server::store::MongoStore;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize structured logging
    init_logging();

    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Failed to load configuration");
            eprintln!("Error: {err}");
            eprintln!();
            eprintln!("Required environment variables:");
            eprintln!("  ACCESS_TOKEN_SECRET - HMAC secret for session token signing");
            eprintln!();
            eprintln!("Optional environment variables:");
            eprintln!("  PORT                - HTTP server port (default: 5000)");
            eprintln!("  DB_URI              - MongoDB connection string");
            eprintln!("  DB_USER             - MongoDB username");
            eprintln!("  DB_PASS             - MongoDB password");
            eprintln!("  APP_ENV             - 'development' or 'production'");
            eprintln!("  RUST_LOG            - Log level filter (default: info)");
            return ExitCode::from(1);
        }
    };

    info!(
        port = config.port,
        env = %config.env,
        "Meetly server starting"
    );

    // Connect the event store
    let store = match MongoStore::connect(&config).await {
        Ok(store) => {
            info!("Connected to MongoDB");
            Arc::new(store)
        }
        Err(err) => {
            error!(error = %err, "Failed to connect to MongoDB");
            return ExitCode::from(1);
        }
    };

    let port = config.port;
    let state = AppState::new(config, store);
    let app = create_router(state);

    // Bind to address
    let bind_addr = format!("0.0.0.0:{port}");
    let listener = match TcpListener::bind(&bind_addr).await {
        Ok(listener) => {
            info!(address = %bind_addr, "Server listening");
            listener
        }
        Err(err) => {
            error!(error = %err, address = %bind_addr, "Failed to bind to address");
            return ExitCode::from(1);
        }
    };

    // Start server with graceful shutdown
    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    info!("Server ready to accept connections");

    if let Err(err) = server.await {
        error!(error = %err, "Server error");
        return ExitCode::from(1);
    }

    info!("Server shutdown complete");
    ExitCode::SUCCESS
}

/// Initialize structured logging with tracing.
///
/// JSON output, filtered via `RUST_LOG` with an `info` default.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,axum::rejection=trace"));

    let json_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_level(true)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .init();
}

/// Creates a future that resolves when a shutdown signal is received.
///
/// Listens for SIGTERM (container orchestrator shutdown) and SIGINT (Ctrl+C).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
