//! # TokenForge Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! Aggregates the top-level commands of the `tokenforge` CLI. Each command
//! module defines its own `clap` argument struct and a `handle_*` function that
//! `main.rs` routes to.
//!
//! ## Commands
//!
//! - `render`: render one template from a file or stdin
//! - `render_dir`: render a directory tree of templates
//! - `getopt`: normalise a command line the way `getopt(1)` does
//!
use crate::core::error::{ForgeError, Result};
use anyhow::anyhow;

/// Renders a single template (`tokenforge render`).
pub mod render;
/// Renders a template directory tree (`tokenforge render-dir`).
pub mod render_dir;
/// Shell-oriented option normalisation (`tokenforge getopt`).
pub mod getopt;

/// Parses a `NAME=VALUE` pair given with `--set`.
///
/// The name is trimmed; the value is kept as written so that leading or
/// trailing spaces can be part of a token value.
pub(crate) fn parse_key_val(s: &str) -> Result<(String, String)> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| {
            anyhow!(ForgeError::ArgumentParsing(format!(
                "Invalid token format: '{}'. Expected format: NAME=VALUE",
                s
            )))
        })
}
