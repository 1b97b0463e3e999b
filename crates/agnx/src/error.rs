//! Error types for the agnx binary.

use agnx_api::ServerError;
use agnx_config::ConfigError;

/// Top-level error for the agnx binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `run` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("load config: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The HTTP server failed to start, failed while serving, or did not
    /// shut down in time.
    #[error("{source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: ServerError,
    },
}
