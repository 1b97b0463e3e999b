//! Server binary for the agnx agent runtime.
//!
//! # Startup Sequence
//!
//! 1. Parse command-line flags (`-version`/`--version` prints build metadata
//!    and exits)
//! 2. Load configuration from `--config`, or defaults when omitted
//! 3. Apply the `--port` override
//! 4. Initialize structured logging (tracing)
//! 5. Bridge SIGINT/SIGTERM into a shutdown signal
//! 6. Run the HTTP server until shutdown or a fatal listener error
//!
//! Exit code is `0` on clean shutdown and `1` on any error, which is
//! printed to stderr as `error: <message>`.

mod cli;
mod error;

use std::process::ExitCode;
use std::sync::Arc;

use agnx_api::{Server, ShutdownSignal, TracingErrorLog, buildinfo};
use agnx_config::{Config, LogFormat, LoggingConfig};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::AppError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse_from(cli::normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(e) => {
            // Help output is not a failure; usage errors are.
            let code = if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            if let Err(io) = e.print() {
                eprintln!("error: {io}");
            }
            return code;
        }
    };

    if cli.version {
        println!("{}", buildinfo::summary());
        return ExitCode::SUCCESS;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_logging(&config.logging);
    info!(
        host = config.server.host,
        port = config.server.port,
        read_timeout_secs = config.server.read_timeout,
        write_timeout_secs = config.server.write_timeout,
        data_dir = %config.data_dir.display(),
        agents_dir = %config.agents_dir.display(),
        "configuration loaded"
    );

    let shutdown = ShutdownSignal::with_os_signals();
    let server = Server::new(Arc::new(config), Arc::new(TracingErrorLog));
    server.run(shutdown).await?;

    info!("agnx shutdown complete");
    Ok(())
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the config.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
