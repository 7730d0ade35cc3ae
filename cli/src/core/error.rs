//! # TokenForge CLI Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! Error types used by the `tokenforge` binary. Library errors
//! ([`ReplaceError`]) convert into [`ForgeError`]; everything is carried through
//! `anyhow` so handlers can attach context on the way up to `main`.
//!
//! ## Architecture
//!
//! - `ForgeError`: a `thiserror` enum for failures the CLI itself recognises.
//! - `Result<T>`: alias for `anyhow::Result<T>`.
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if !source.exists() {
//!     anyhow::bail!(ForgeError::FileSystem(format!("Path not found: {}", source.display())));
//! }
//!
//! // Engine errors convert with `?` and gain context
//! let rendered = replacer
//!     .execute(&text)
//!     .map_err(ForgeError::from)
//!     .with_context(|| format!("Failed to render '{}'", path.display()))?;
//! ```
//!
use thiserror::Error;
use tokenforge::replace::ReplaceError;

/// Custom error type for the TokenForge CLI.
#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Template rendering error: {source}")]
    Template {
        #[from]
        source: ReplaceError,
    },

    #[error("Argument parsing error: {0}")]
    ArgumentParsing(String),
}

/// Type alias for Result using anyhow::Error, so handlers can add context freely.
pub type Result<T> = anyhow::Result<T>;
