//! Calendar HTTP server lifecycle management.
//!
//! The lifecycle is `starting -> serving -> draining -> stopped`:
//!
//! 1. [`ServerConfig::from_env`] reads `host` and `port` (or `HOST`/`PORT`); missing values
//!    abort startup.
//! 2. [`bind`] opens the TCP listener.
//! 3. [`run`] accepts connections on a background task until the
//!    shutdown future resolves. It then closes the listener, gives open
//!    connections up to [`SHUTDOWN_GRACE`] to finish their requests, and
//!    aborts whatever is left.
//!
//! Every connection is served on a task owned by the accept loop's
//! [`JoinSet`], so nothing outlives [`run`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::router::build_router;
use crate::state::AppState;

/// How long in-flight requests may keep running once shutdown begins.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Pause after a failed `accept` (e.g. file descriptor exhaustion).
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Environment variables holding the bind host, in lookup order.
pub const HOST_VARS: [&str; 2] = ["host", "HOST"];

/// Environment variables holding the bind port, in lookup order.
pub const PORT_VARS: [&str; 2] = ["port", "PORT"];

/// Configuration for the calendar server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0` or `localhost`).
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// Required variables (the lowercase name wins when both are set):
    /// - `host` or `HOST` -- address to bind
    /// - `port` or `PORT` -- TCP port (0-65535)
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (_, host) = required(&lookup, &HOST_VARS)?;
        let (port_key, port_raw) = required(&lookup, &PORT_VARS)?;
        let port = port_raw
            .parse::<u16>()
            .map_err(|e| ServerError::Config(format!("invalid {port_key} {port_raw:?}: {e}")))?;
        Ok(Self { host, port })
    }
}

/// First non-blank value among `keys`, with the key it came from.
fn required<'k, F>(lookup: &F, keys: &[&'k str]) -> Result<(&'k str, String), ServerError>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter()
        .find_map(|&key| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
                .map(|value| (key, value))
        })
        .ok_or_else(|| ServerError::Config(format!("{} is not set", keys.join(" or "))))
}

/// Bind a TCP listener on the configured host and port.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, ServerError> {
    TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|source| ServerError::Bind {
            addr: format!("{}:{}", config.host, config.port),
            source,
        })
}

/// Serve the calendar API on `listener` until `shutdown` resolves.
///
/// The accept loop runs on a background Tokio task. Once `shutdown`
/// completes the listener is closed and open connections get
/// [`SHUTDOWN_GRACE`] to finish; connections still open after that are
/// aborted, and their sockets closed, before this function returns.
pub async fn run<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send,
{
    let addr = listener.local_addr().map_err(ServerError::Serve)?;
    let router = build_router(state);
    let (drain_tx, drain_rx) = oneshot::channel::<()>();

    let mut server = tokio::spawn(serve_connections(listener, router, drain_rx));

    info!(%addr, "calendar server listening");

    tokio::select! {
        joined = &mut server => {
            error!(%addr, "calendar server exited before shutdown was requested");
            return joined.map_err(ServerError::from);
        }
        () = shutdown => {}
    }

    info!(%addr, "shutdown requested");
    if drain_tx.send(()).is_err() {
        debug!("accept loop already gone");
    }
    server.await?;

    info!(%addr, "calendar server stopped");
    Ok(())
}

/// Accept and serve connections until `drain` fires (or its sender is
/// dropped), then drain with a bounded grace period.
async fn serve_connections(
    listener: TcpListener,
    router: Router,
    mut drain: oneshot::Receiver<()>,
) {
    let service = TowerToHyperService::new(router);
    let builder = auto::Builder::new(TokioExecutor::new());
    let graceful = GracefulShutdown::new();
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            _ = &mut drain => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let connection = builder
                        .serve_connection_with_upgrades(TokioIo::new(stream), service.clone())
                        .into_owned();
                    let connection = graceful.watch(connection);
                    connections.spawn(async move {
                        if let Err(e) = connection.await {
                            debug!(%peer, error = %e, "connection closed with error");
                        }
                    });
                }
                Err(e) => {
                    warn!(error = %e, "failed to accept connection");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
        }
    }

    drop(listener);
    info!(
        open_connections = connections.len(),
        grace_ms = SHUTDOWN_GRACE.as_millis(),
        "listener closed, draining"
    );

    if tokio::time::timeout(SHUTDOWN_GRACE, graceful.shutdown())
        .await
        .is_err()
    {
        warn!(
            open_connections = connections.len(),
            "grace period elapsed, closing remaining connections"
        );
    }
    connections.shutdown().await;
}

/// Resolve when the process receives Ctrl-C or (on Unix) `SIGTERM`.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl-C"),
        () = terminate => info!("received SIGTERM"),
    }
}

/// Errors that can occur when starting or running the calendar server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Required configuration is missing or invalid.
    #[error("config error: {0}")]
    Config(String),

    /// Failed to bind to the network address.
    #[error("bind failed on {addr}: {source}")]
    Bind {
        /// The address that could not be bound.
        addr: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The listener's local address could not be read.
    #[error("serve error: {0}")]
    Serve(std::io::Error),

    /// The background accept loop panicked or was cancelled.
    #[error("server task failed: {0}")]
    Join(#[from] JoinError),
}
