//! # TokenForge CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test files (`render.rs`, `getopt.rs`,
//! ...). Each `.rs` file in `cli/tests/` is compiled as its own test crate
//! linked against the `tokenforge` binary.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

/// # Get TokenForge Command (`tokenforge_cmd`)
///
/// An `assert_cmd::Command` pointing at the compiled `tokenforge` binary,
/// with `RUST_LOG` cleared so log output only depends on `-v`.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn tokenforge_cmd() -> Command {
    let mut cmd =
        Command::cargo_bin("tokenforge").expect("Failed to find tokenforge binary for testing");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// # Sandbox Directory (`sandbox`)
///
/// A temporary directory marked as a repository root (it contains `.git`), so
/// the project configuration search never leaves it.
pub fn sandbox() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create sandbox directory");
    std::fs::create_dir(dir.path().join(".git")).expect("Failed to create .git marker");
    dir
}

/// # Sandboxed Command (`sandboxed_cmd`)
///
/// Runs `tokenforge` inside `dir` with the user configuration directory
/// redirected into it, so no real user configuration is picked up.
pub fn sandboxed_cmd(dir: &Path) -> Command {
    let mut cmd = tokenforge_cmd();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".xdg"));
    cmd
}
