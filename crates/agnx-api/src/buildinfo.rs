//! Build metadata injected at compile time.
//!
//! Release builds set `AGNX_VERSION`, `AGNX_COMMIT` and `AGNX_BUILD_DATE`
//! in the environment of `cargo build`:
//!
//! ```text
//! AGNX_VERSION=v0.1.0 AGNX_COMMIT=$(git rev-parse --short HEAD) \
//!   AGNX_BUILD_DATE=$(date -u +%Y-%m-%dT%H:%M:%SZ) cargo build --release
//! ```
//!
//! Unset (or empty) values fall back to placeholders so every field is
//! always non-empty.

/// Release version, `dev` for local builds.
pub const VERSION: &str = or_default(option_env!("AGNX_VERSION"), "dev");

/// Source commit the binary was built from.
pub const COMMIT: &str = or_default(option_env!("AGNX_COMMIT"), "none");

/// UTC build timestamp.
pub const DATE: &str = or_default(option_env!("AGNX_BUILD_DATE"), "unknown");

const RUSTC_VERSION: &str = or_default(option_env!("AGNX_RUSTC_VERSION"), "unknown");

/// Version of the Rust compiler that produced this binary.
pub const fn rustc_version() -> &'static str {
    RUSTC_VERSION
}

/// One-line summary printed by `agnx --version`.
pub fn summary() -> String {
    format!(
        "agnx {VERSION} (commit {COMMIT}) built {DATE} (rustc {})",
        rustc_version()
    )
}

const fn or_default(value: Option<&'static str>, fallback: &'static str) -> &'static str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => fallback,
    }
}
