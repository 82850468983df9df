//! Calendar service binary.
//!
//! # Startup Sequence
//!
//! 1. Load `.env` if present
//! 2. Initialize structured logging (tracing)
//! 3. Read `host` and `port` (or `HOST`/`PORT`) from the environment
//! 4. Create the shared event store
//! 5. Bind the listener and serve until Ctrl-C or `SIGTERM`
//! 6. Drain in-flight requests for at most one second

use std::sync::Arc;

use calendar_api::{AppState, ServerConfig};
use calendar_store::EventStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point for the calendar service.
///
/// # Errors
///
/// Returns an error if configuration is missing, the listener cannot be
/// bound, or the server fails while serving.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. A missing .env file is fine; the variables may come from the shell.
    let dotenv = dotenvy::dotenv();

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!(env_file = dotenv.is_ok(), "calendar-server starting");

    // 3. Load configuration.
    let config = ServerConfig::from_env()?;
    info!(host = config.host, port = config.port, "Configuration loaded");

    // 4. Create the store shared by every handler.
    let store = Arc::new(EventStore::new());
    let state = Arc::new(AppState::with_store(store));

    // 5-6. Serve until a termination signal, then drain.
    let listener = calendar_api::bind(&config).await?;
    calendar_api::run(listener, state, calendar_api::shutdown_signal()).await?;

    info!("calendar-server exited cleanly");
    Ok(())
}
