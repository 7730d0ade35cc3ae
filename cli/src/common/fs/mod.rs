//! # TokenForge Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem helpers for the CLI. Functionality lives in submodules and is
//! imported from them directly (e.g. `crate::common::fs::io::read_input`).
//!
//! - **`io`**: directory creation, whole-file reads and writes, and the
//!   `-`-means-stdin/stdout convention used by `tokenforge render`.
//!

/// Basic file I/O operations (`ensure_dir_exists`, `read_input`, `write_output`, ...).
pub mod io;
