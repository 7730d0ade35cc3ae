//! # TokenForge Library
//!
//! File: lib/src/lib.rs
//!
//! ## Overview
//!
//! Two small text-processing engines shared by the `tokenforge` binary:
//!
//! - [`replace`]: a configurable token replacement engine. It expands `{name}`
//!   and `{name(a,b)}` placeholders from static values or generators.
//! - [`getopt`]: a `getopt_long`-compatible command-line option scanner that
//!   supports short clusters, long options with abbreviations, argument
//!   permutation and long-only mode.
//!
//! Neither engine prints anything. Problems come back as typed errors
//! ([`replace::ReplaceError`], [`getopt::GetoptError`]) and diagnostics go
//! through `tracing`, so the embedding application chooses the subscriber.
//!
pub mod getopt;
pub mod replace;
