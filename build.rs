//! Embeds the build version as `NETPLATE_VERSION`.
//!
//! An explicit `NETPLATE_VERSION` in the build environment wins, then
//! `git describe`, then the package version.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");
    println!("cargo:rerun-if-env-changed=NETPLATE_VERSION");

    let version = env::var("NETPLATE_VERSION")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(describe)
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=NETPLATE_VERSION={}", version);
}

/// `v1.2.0-3-gabc1234+dirty` -> `1.2.0-3-gabc1234+dirty`
fn describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty=+dirty"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let described = String::from_utf8(output.stdout).ok()?;
    let described = described.trim();
    let version = described.strip_prefix('v').unwrap_or(described);
    (!version.is_empty()).then(|| version.to_string())
}
