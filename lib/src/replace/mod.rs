//! # Token Replacement
//!
//! File: lib/src/replace/mod.rs
//!
//! ## Overview
//!
//! Substitutes `{name}` and `{name(arg1,arg2)}` placeholders in text with
//! static values or generated ones. The delimiters, strict/tolerant handling
//! of unknown tokens and per-call value caching are configurable.
//!
//! ## Architecture
//!
//! - `token`: [`Token`] and the [`Value`] generator contract.
//! - `parser`: the state machine and token table ([`Parser`]).
//! - `generators`: built-in `counter`, `now` and `env` generators.
//! - `error`: [`ReplaceError`].
//!
//! [`Replacer`] is the public facade. It delegates to a [`Parser`] and offers a
//! chainable configuration API.
//!
//! ## Examples
//!
//! ```rust
//! use tokenforge::replace::{FnValue, Replacer};
//!
//! let mut replacer = Replacer::new();
//! replacer
//!     .register("user", "alice")?
//!     .register_generator("sum", FnValue::new(|args: &[String]| {
//!         args.iter()
//!             .filter_map(|a| a.parse::<i64>().ok())
//!             .sum::<i64>()
//!             .to_string()
//!     }))?;
//!
//! assert_eq!(replacer.execute("{user}: {sum(1,2,3)}")?, "alice: 6");
//! # Ok::<(), tokenforge::replace::ReplaceError>(())
//! ```
//!
//! A replacer is not thread-safe; `execute` takes `&mut self` because
//! generators may carry state between calls.
//!
mod error;
pub mod generators;
mod parser;
mod token;

pub use error::ReplaceError;
pub use generators::register_builtins;
pub use parser::{
    Delimiters, Parser, ARGS_END, ARGS_SEPARATOR, ARGS_START, TOKEN_END, TOKEN_START,
};
pub use token::{FnValue, StaticValue, Token, Value};

/// Chainable front end to the token [`Parser`].
#[derive(Debug, Default)]
pub struct Replacer {
    delegate: Parser,
}

impl Replacer {
    /// A replacer with the default delimiters, strict mode and caching off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already configured parser.
    pub fn with_parser(parser: Parser) -> Self {
        Self { delegate: parser }
    }

    /// Unknown tokens fail the call.
    pub fn strict(&mut self) -> &mut Self {
        self.delegate.set_tolerant(false);
        self
    }

    /// Unknown tokens are copied to the output as written.
    pub fn tolerant(&mut self) -> &mut Self {
        self.delegate.set_tolerant(true);
        self
    }

    /// Evaluates each distinct token name at most once per `execute` call.
    pub fn enable_value_caching(&mut self) -> &mut Self {
        self.delegate.set_caching(true);
        self
    }

    pub fn disable_value_caching(&mut self) -> &mut Self {
        self.delegate.set_caching(false);
        self
    }

    pub fn token_start(&mut self, start: &str) -> Result<&mut Self, ReplaceError> {
        self.delegate.set_token_start(start)?;
        Ok(self)
    }

    pub fn token_end(&mut self, end: &str) -> Result<&mut Self, ReplaceError> {
        self.delegate.set_token_end(end)?;
        Ok(self)
    }

    pub fn argument_start(&mut self, start: &str) -> Result<&mut Self, ReplaceError> {
        self.delegate.set_argument_start(start)?;
        Ok(self)
    }

    pub fn argument_end(&mut self, end: &str) -> Result<&mut Self, ReplaceError> {
        self.delegate.set_argument_end(end)?;
        Ok(self)
    }

    pub fn argument_separator(&mut self, separator: &str) -> Result<&mut Self, ReplaceError> {
        self.delegate.set_argument_separator(separator)?;
        Ok(self)
    }

    /// Registers a token with a static value.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self, ReplaceError> {
        self.register_token(Token::new(name)?.with_value(value))
    }

    /// Registers a token whose value is produced by `generator`.
    pub fn register_generator(
        &mut self,
        name: impl Into<String>,
        generator: impl Value + 'static,
    ) -> Result<&mut Self, ReplaceError> {
        self.register_token(Token::new(name)?.with_generator(generator))
    }

    pub fn register_token(&mut self, token: Token) -> Result<&mut Self, ReplaceError> {
        self.delegate.register(token)?;
        Ok(self)
    }

    /// Registers each value under its position: `"0"`, `"1"`, `"2"`, …
    pub fn register_all<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for (position, value) in values.into_iter().enumerate() {
            self.delegate.insert(Token::positional(position, value.into()));
        }
        self
    }

    /// Replaces all tokens in `subject`.
    pub fn execute(&mut self, subject: &str) -> Result<String, ReplaceError> {
        self.delegate.execute(subject)
    }

    /// Like [`Replacer::execute`], passing `None` through unchanged.
    pub fn execute_optional(
        &mut self,
        subject: Option<&str>,
    ) -> Result<Option<String>, ReplaceError> {
        subject.map(|s| self.execute(s)).transpose()
    }

    pub fn is_tolerant(&self) -> bool {
        self.delegate.is_tolerant()
    }

    pub fn is_caching(&self) -> bool {
        self.delegate.is_caching()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.delegate.contains(name)
    }

    pub fn delimiters(&self) -> Delimiters {
        self.delegate.delimiters()
    }
}
