//! Knowlift Web
//!
//! HTTP front end for the interval counting game. Serves the static pages,
//! hands out rounds, and evaluates answers while carrying the player's
//! progress in a signed session token.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod pages;
pub mod session;

use config::WebConfig;
use handlers::{create_router, AppState};
use knowlift_domain::{DomainError, LevelCatalog};
use knowlift_store::{SqliteStore, StoreError};
use session::SessionManager;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Web service error
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Level catalog failed validation
    #[error("Invalid game configuration: {0}")]
    Domain(#[from] DomainError),

    /// Database could not be prepared
    #[error("Database error: {0}")]
    Store(#[from] StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured log level. Calling this
/// more than once is harmless; later calls leave the first subscriber in
/// place.
pub fn init_tracing(config: &WebConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Create the database schema if it does not exist yet
pub fn init_database(config: &WebConfig) -> Result<(), WebError> {
    let store = SqliteStore::new(&config.database)?;
    store.ping()?;
    info!(path = %config.database.display(), "Database initialized");
    Ok(())
}

/// Build the shared state handlers run against
///
/// Fails if the level catalog does not pass validation.
pub fn app_state(config: &WebConfig) -> Result<AppState, WebError> {
    Ok(AppState {
        catalog: Arc::new(LevelCatalog::standard()?),
        session_manager: Arc::new(SessionManager::new(
            &config.secret_key,
            config.session_expiry_secs,
        )),
        database: config.database.clone(),
        answer_window: config.answer_window,
    })
}

/// Start the web server
///
/// Prepares the database, builds the routes, and serves until the process
/// is stopped.
pub async fn start_server(config: WebConfig) -> Result<(), WebError> {
    info!("Starting Knowlift");
    info!("Environment: {}", config.environment.as_str());
    info!("Bind address: {}", config.bind_addr());
    info!("Answer window: {}", config.answer_window);

    let state = app_state(&config)?;
    init_database(&config)?;

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Knowlift listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| WebError::Server(e.to_string()))?;

    Ok(())
}
