//! # TokenForge Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared helpers used by the command handlers, kept apart from command logic
//! (`commands::`) and core infrastructure (`core::`).
//!
//! - **`fs`**: reading input from files or stdin and writing output to files
//!   or stdout.
//!

/// Utilities for filesystem and standard stream I/O.
pub mod fs;
