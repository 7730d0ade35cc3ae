//! # Built-in Generators
//!
//! File: lib/src/replace/generators.rs
//!
//! ## Overview
//!
//! Ready-made [`Value`] implementations for common dynamic tokens:
//!
//! | token | generator | arguments |
//! |-------|-----------|-----------|
//! | `counter` | [`Counter`] | optional start value, read on first use |
//! | `now` | [`Now`] | optional `strftime` pattern |
//! | `env` | [`EnvVar`] | variable name, optional fallback |
//!
//! [`register_builtins`] installs all three under those names.
//!
use super::error::ReplaceError;
use super::token::Value;
use super::Replacer;
use chrono::format::{Item, StrftimeItems};
use std::env;
use tracing::warn;

/// Default pattern used by [`Now`] when no argument is given.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Yields 1, 2, 3, … on successive evaluations.
///
/// Saturates at `i64::MAX`.
#[derive(Debug, Default, Clone)]
pub struct Counter {
    next: Option<i64>,
    current: i64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Value for Counter {
    fn inject(&mut self, args: &[String]) {
        let next = match self.next {
            Some(next) => next,
            None => match args.first() {
                Some(start) => start.trim().parse().unwrap_or_else(|_| {
                    warn!("Counter start '{}' is not a number, starting at 1", start);
                    1
                }),
                None => 1,
            },
        };
        self.current = next;
        self.next = Some(next.checked_add(1).unwrap_or_else(|| {
            warn!("Counter reached {}, it will not advance further", next);
            next
        }));
    }

    fn get(&mut self) -> String {
        self.current.to_string()
    }
}

/// Formats the current local time.
#[derive(Debug, Clone)]
pub struct Now {
    format: String,
}

impl Default for Now {
    fn default() -> Self {
        Self {
            format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl Value for Now {
    fn inject(&mut self, args: &[String]) {
        self.format = match args.first() {
            Some(pattern) if StrftimeItems::new(pattern).any(|item| item == Item::Error) => {
                warn!("Invalid time format '{}', using '{}'", pattern, DEFAULT_TIME_FORMAT);
                DEFAULT_TIME_FORMAT.to_string()
            }
            Some(pattern) => pattern.clone(),
            None => DEFAULT_TIME_FORMAT.to_string(),
        };
    }

    fn get(&mut self) -> String {
        chrono::Local::now().format(&self.format).to_string()
    }
}

/// Reads an environment variable, falling back to the second argument.
#[derive(Debug, Default, Clone)]
pub struct EnvVar {
    name: Option<String>,
    fallback: String,
}

impl Value for EnvVar {
    fn inject(&mut self, args: &[String]) {
        self.name = args.first().cloned();
        self.fallback = args.get(1).cloned().unwrap_or_default();
    }

    fn get(&mut self) -> String {
        match &self.name {
            Some(name) => env::var(name).unwrap_or_else(|_| self.fallback.clone()),
            None => self.fallback.clone(),
        }
    }
}

/// Registers `counter`, `now` and `env`, overwriting tokens with those names.
pub fn register_builtins(replacer: &mut Replacer) -> Result<&mut Replacer, ReplaceError> {
    replacer
        .register_generator("counter", Counter::new())?
        .register_generator("now", Now::default())?
        .register_generator("env", EnvVar::default())
}
