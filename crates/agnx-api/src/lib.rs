//! HTTP API server for the agnx agent runtime.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Probe endpoints** (`/livez`, `/readyz`) answering `ok` while the
//!   process is alive
//! - **Build metadata** (`/version`) as JSON
//! - **Agent listing** (`/api/v1/agents`), backed by an [`AgentCatalog`]
//!
//! Successful responses are JSON with a uniform content type; failures are
//! RFC 7807 Problem Details produced by the [`response`] module.
//!
//! # Lifecycle
//!
//! [`Server`] binds the listener, runs the accept loop on a background
//! task, and waits for either a listener failure or a [`ShutdownSignal`].
//! On shutdown it drains in-flight requests within [`SHUTDOWN_GRACE`].
//!
//! [`AgentCatalog`]: catalog::AgentCatalog

pub mod buildinfo;
pub mod catalog;
pub mod handlers;
pub mod log;
pub mod response;
pub mod router;
pub mod server;
pub mod shutdown;
pub mod state;

// Re-export primary types for convenience.
pub use log::{ErrorLog, TracingErrorLog};
pub use router::build_router;
pub use server::{BoundServer, SHUTDOWN_GRACE, Server, ServerError};
pub use shutdown::ShutdownSignal;
pub use state::AppState;
