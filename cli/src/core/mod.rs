//! # TokenForge Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces shared by the command handlers:
//! - `config`: configuration loading, merging and validation, and building a
//!   configured `Replacer` from it
//! - `error`: error types and the crate-wide `Result` alias
//! - `templating`: rendering a directory tree of templates
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{ForgeError, Result}; // For error handling
//! use crate::core::templating; // For directory rendering
//! ```
//!
pub mod config;
pub mod error;
pub mod templating;
