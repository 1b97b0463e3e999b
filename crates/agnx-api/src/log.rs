//! Minimal logging capability handed to the response encoder.
//!
//! The encoder only ever needs to report failures, so the seam is a single
//! error-level method. [`TracingErrorLog`] forwards to `tracing`; tests
//! substitute a recorder.

use std::error::Error;

/// Sink for errors that cannot be surfaced to the caller.
pub trait ErrorLog: Send + Sync {
    /// Record `error` with a short description of what was being attempted.
    fn error(&self, message: &str, error: &dyn Error);
}

/// [`ErrorLog`] that emits `tracing` events at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorLog;

impl ErrorLog for TracingErrorLog {
    fn error(&self, message: &str, error: &dyn Error) {
        tracing::error!(error = %error, "{message}");
    }
}
