//! # TokenForge Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Thin wrappers around `std::fs` and the standard streams that add context to
//! I/O errors. `tokenforge render` reads its template through [`read_input`]
//! and writes the result through [`write_output`]; both treat a missing path or
//! `-` as the standard stream.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::io;
//!
//! let text = io::read_input(args.input.as_deref())?;   // file or stdin
//! io::write_output(args.output.as_deref(), &rendered)?; // file or stdout
//! ```
//!
use crate::core::error::{ForgeError, Result};
use anyhow::Context;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// `true` when `path` stands for the standard stream.
fn is_stdio(path: Option<&Path>) -> bool {
    path.map_or(true, |p| p.as_os_str() == "-")
}

/// Ensures that a directory exists at `path`, creating parents as needed.
///
/// # Errors
///
/// Returns an `Err` if the path exists but is not a directory, or if creating
/// it fails.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(ForgeError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Reads the entire content of a file into a string.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Writes `content` to `path`, creating the parent directory and overwriting
/// any existing file.
pub fn write_string_to_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir_exists(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write to file {:?}", path))?;
    info!("Wrote content to file: {:?}", path);
    Ok(())
}

/// Reads `path`, or standard input when `path` is `None` or `-`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if !is_stdio(Some(p)) => read_file_to_string(p),
        _ => {
            debug!("Reading input from stdin");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

/// Writes `content` to `path`, or standard output when `path` is `None` or `-`.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(p) if !is_stdio(Some(p)) => write_string_to_file(p, content),
        _ => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write to stdout")
        }
    }
}
