//! Captures the compiler version so `/version` can report the runtime it
//! was built with.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo::rerun-if-env-changed=AGNX_VERSION");
    println!("cargo::rerun-if-env-changed=AGNX_COMMIT");
    println!("cargo::rerun-if-env-changed=AGNX_BUILD_DATE");

    let rustc = env::var("RUSTC").unwrap_or_else(|_| String::from("rustc"));
    let Ok(output) = Command::new(rustc).arg("--version").output() else {
        return;
    };
    if !output.status.success() {
        return;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = stdout.trim().trim_start_matches("rustc ").trim();
    if !version.is_empty() {
        println!("cargo::rustc-env=AGNX_RUSTC_VERSION={version}");
    }
}
