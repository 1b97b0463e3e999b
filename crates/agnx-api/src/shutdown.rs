//! Cancellation source for the server lifecycle.
//!
//! A [`ShutdownSignal`] is cloneable; triggering any clone releases every
//! waiter. [`ShutdownSignal::with_os_signals`] bridges SIGINT and SIGTERM
//! into a trigger so the binary can hand the server a single token.
//!
//! ```rust,ignore
//! use agnx_api::ShutdownSignal;
//!
//! let shutdown = ShutdownSignal::with_os_signals();
//! server.run(shutdown).await?;
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

/// A signal that can be used to trigger and await graceful shutdown.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    sender: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    /// Creates a signal that has not been triggered.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Creates a signal that triggers on SIGINT or SIGTERM.
    ///
    /// Off Unix only Ctrl-C is observed. Must be called from within a
    /// Tokio runtime.
    pub fn with_os_signals() -> Self {
        let signal = Self::new();
        let trigger = signal.clone();

        tokio::spawn(async move {
            wait_for_os_signal().await;
            trigger.trigger();
        });

        signal
    }

    /// Triggers the signal. Calling this more than once has no further effect.
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }

    /// Returns `true` once the signal has been triggered.
    pub fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolves when the signal is triggered, immediately if it already was.
    pub fn cancelled(&self) -> impl Future<Output = ()> + Send + use<> {
        let mut receiver = self.sender.subscribe();
        async move {
            let closed = receiver.wait_for(|triggered| *triggered).await.is_err();
            if closed {
                // Every sender is gone, so nothing can trigger any more.
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Waits for an OS shutdown signal.
async fn wait_for_os_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler, waiting on Ctrl-C only");
                wait_for_ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                tracing::info!("received SIGTERM, initiating graceful shutdown");
            }
            () = wait_for_ctrl_c() => {}
        }
    }

    #[cfg(not(unix))]
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received SIGINT, initiating graceful shutdown"),
        Err(e) => {
            tracing::warn!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    }
}
