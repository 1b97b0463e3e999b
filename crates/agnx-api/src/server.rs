//! HTTP server lifecycle management.
//!
//! A [`Server`] moves through `Idle -> Running -> (ShuttingDown -> Stopped) | Failed`:
//!
//! - [`Server::bind`] builds the router and binds the listener.
//! - [`BoundServer::serve`] runs the accept loop on a background task and
//!   waits for whichever comes first: the listener failing, or the
//!   [`ShutdownSignal`] firing.
//! - On shutdown, new connections are refused and in-flight requests get
//!   [`SHUTDOWN_GRACE`] to finish. If they do not, the serving task is
//!   aborted and [`ServerError::ShutdownTimeout`] is returned.
//!
//! Both steps consume the value, so a stopped server cannot be restarted;
//! build a new one instead.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use agnx_config::Config;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::catalog::AgentCatalog;
use crate::log::ErrorLog;
use crate::router::build_router;
use crate::shutdown::ShutdownSignal;
use crate::state::AppState;

/// Time allowed for in-flight requests to finish after shutdown begins.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Errors that can occur when starting or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind failed on {addr}: {source}")]
    Bind {
        /// The `host:port` that was requested.
        addr: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The listener failed while serving.
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),

    /// The serving task panicked or was cancelled.
    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The listener stopped although no shutdown was requested.
    #[error("server stopped before shutdown was requested")]
    Stopped,

    /// In-flight requests did not finish within the grace window.
    #[error("shutdown: in-flight requests did not finish within {}s", grace.as_secs())]
    ShutdownTimeout {
        /// The grace window that elapsed.
        grace: Duration,
    },
}

/// The HTTP API server, before it has bound a listener.
pub struct Server {
    config: Arc<Config>,
    state: AppState,
    grace: Duration,
}

impl Server {
    /// Create a server for `config`, reporting encode failures to `error_log`.
    pub fn new(config: Arc<Config>, error_log: Arc<dyn ErrorLog>) -> Self {
        Self {
            config,
            state: AppState::new(error_log),
            grace: SHUTDOWN_GRACE,
        }
    }

    /// Serve agents from `catalog` instead of the empty default.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn AgentCatalog>) -> Self {
        self.state = self.state.with_catalog(catalog);
        self
    }

    /// Override the shutdown grace window.
    #[must_use]
    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Build the router and bind the listener on `host:port`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound.
    pub async fn bind(self) -> Result<BoundServer, ServerError> {
        let server = &self.config.server;
        let addr = format!("{}:{}", server.host, server.port);

        let router = build_router(Arc::new(self.state), server);

        let listener = TcpListener::bind(addr.as_str())
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { addr, source })?;

        Ok(BoundServer {
            listener,
            router,
            local_addr,
            grace: self.grace,
        })
    }

    /// Bind and serve until `shutdown` fires or the listener fails.
    ///
    /// # Errors
    ///
    /// See [`Server::bind`] and [`BoundServer::serve`].
    pub async fn run(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        self.bind().await?.serve(shutdown).await
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("grace", &self.grace)
            .finish_non_exhaustive()
    }
}

/// A server with a bound listener, ready to accept connections.
#[derive(Debug)]
pub struct BoundServer {
    listener: TcpListener,
    router: Router,
    local_addr: SocketAddr,
    grace: Duration,
}

impl BoundServer {
    /// The address the listener is bound to.
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept connections until `shutdown` fires or the listener fails.
    ///
    /// Returns `Ok(())` once a requested shutdown has drained every
    /// in-flight request within the grace window.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Serve`], [`ServerError::Task`] or
    /// [`ServerError::Stopped`] if serving ends on its own, and
    /// [`ServerError::ShutdownTimeout`] if draining takes too long.
    pub async fn serve(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let Self {
            listener,
            router,
            local_addr,
            grace,
        } = self;

        let (drain_tx, drain_rx) = oneshot::channel::<()>();

        info!(%local_addr, "starting server");
        let mut serving = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    // A dropped sender also means stop.
                    drain_rx.await.ok();
                })
                .await
        });

        tokio::select! {
            joined = &mut serving => {
                joined??;
                return Err(ServerError::Stopped);
            }
            () = shutdown.cancelled() => {}
        }

        info!("shutting down server");
        if drain_tx.send(()).is_err() {
            warn!("server task exited before shutdown was delivered");
        }

        if let Ok(joined) = tokio::time::timeout(grace, &mut serving).await {
            joined??;
            info!("server stopped");
            Ok(())
        } else {
            // Second tier: drop the accept loop and listener outright.
            serving.abort();
            warn!(grace_secs = grace.as_secs(), "graceful shutdown timed out, serving task aborted");
            Err(ServerError::ShutdownTimeout { grace })
        }
    }
}
