//! Configuration loading and typed config structures for the agnx runtime.
//!
//! Configuration comes from an optional YAML file. Every key is optional:
//! after parsing, [`Config::apply_defaults`] fills each zero-valued field
//! with its documented default, and derives `agents_dir` from the resolved
//! `data_dir` when it was not set explicitly.
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 8080
//!   read_timeout: 30
//!   write_timeout: 30
//! data_dir: ./.agnx
//! agents_dir: ./.agnx/agents
//! logging:
//!   level: info
//!   format: text
//! ```
//!
//! Unknown keys are ignored. The loaded value is immutable for the life of
//! the process; the binary applies the `--port` override once before the
//! server starts and shares the result behind an `Arc`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default TCP port for the HTTP server.
pub const DEFAULT_PORT: u16 = 8080;

/// Default bind host. Binding to all interfaces mirrors a bare `:<port>`.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default read and write timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default data directory.
pub const DEFAULT_DATA_DIR: &str = "./.agnx";

/// Name of the agents directory beneath the data directory.
pub const AGENTS_SUBDIR: &str = "agents";

/// Default log level directive.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file is missing or unreadable.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for the config shape.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        #[from]
        source: serde_yml::Error,
    },
}

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// Root directory for runtime data.
    pub data_dir: PathBuf,

    /// Directory holding agent definitions. Derived from `data_dir` when unset.
    pub agents_dir: PathBuf,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to.
    pub host: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Seconds allowed for reading a request body.
    pub read_timeout: u64,

    /// Seconds allowed for producing a response.
    pub write_timeout: u64,
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level directive used when `RUST_LOG` is not set (e.g. `info`, `debug`).
    pub level: String,

    /// Output format for log lines.
    pub format: LogFormat,
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl Config {
    /// Load configuration from `path`, or pure defaults when there is no path.
    ///
    /// An empty path is treated the same as `None` and performs no file I/O.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) else {
            let mut config = Self::default();
            config.apply_defaults();
            return Ok(config);
        };

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string and apply defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_defaults();
        Ok(config)
    }

    /// Fill every zero-valued field with its default.
    ///
    /// Order matters: `agents_dir` is derived last, from the already
    /// resolved `data_dir`. Applying defaults twice is a no-op.
    pub fn apply_defaults(&mut self) {
        self.server.apply_defaults();

        if self.data_dir.as_os_str().is_empty() {
            self.data_dir = PathBuf::from(DEFAULT_DATA_DIR);
        }

        // Derived defaults (depend on other config values).
        if self.agents_dir.as_os_str().is_empty() {
            self.agents_dir = self.data_dir.join(AGENTS_SUBDIR);
        }

        if self.logging.level.is_empty() {
            self.logging.level = String::from(DEFAULT_LOG_LEVEL);
        }
    }
}

impl ServerConfig {
    fn apply_defaults(&mut self) {
        if self.port == 0 {
            self.port = DEFAULT_PORT;
        }
        if self.read_timeout == 0 {
            self.read_timeout = DEFAULT_TIMEOUT_SECS;
        }
        if self.write_timeout == 0 {
            self.write_timeout = DEFAULT_TIMEOUT_SECS;
        }
        if self.host.is_empty() {
            self.host = String::from(DEFAULT_HOST);
        }
    }
}
