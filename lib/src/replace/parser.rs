//! # Token Parser
//!
//! File: lib/src/replace/parser.rs
//!
//! ## Overview
//!
//! The parser owns the delimiter configuration, the strict/tolerant and caching
//! flags, and the token table. [`Parser::execute`] runs a finite-state machine
//! over the input one character at a time and writes literal text and resolved
//! token values into the output.
//!
//! ## Architecture
//!
//! Recognised syntax, with the default delimiters:
//!
//! ```text
//! {name}                 token without arguments
//! {name(arg1,arg2,...)}  token with positional arguments
//! ```
//!
//! The machine has one accepting state, `ReadingInput`. The input is followed by
//! an end marker (`None`) that can never collide with a delimiter. Scanning that
//! finishes anywhere else, or that reaches the `Error` state, fails the whole
//! call; no partial output is returned.
//!
//! A stray token-end, argument-start or argument-end delimiter outside a token
//! is copied through unchanged.
//!
use super::error::ReplaceError;
use super::token::Token;
use std::collections::HashMap;
use std::iter;
use tracing::{debug, trace};

pub const TOKEN_START: char = '{';
pub const TOKEN_END: char = '}';
pub const ARGS_START: char = '(';
pub const ARGS_END: char = ')';
pub const ARGS_SEPARATOR: char = ',';

/// The five single-character delimiters that shape the token syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub token_start: char,
    pub token_end: char,
    pub argument_start: char,
    pub argument_end: char,
    pub argument_separator: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            token_start: TOKEN_START,
            token_end: TOKEN_END,
            argument_start: ARGS_START,
            argument_end: ARGS_END,
            argument_separator: ARGS_SEPARATOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ReadingInput,
    TokenStarted,
    ReadingToken,
    TokenArgsStarted,
    ReadingTokenArgs,
    TokenArgsEnd,
    Error,
}

/// State machine and token table behind [`super::Replacer`].
///
/// Not thread-safe: `execute` needs `&mut self` because generators may keep state.
#[derive(Debug, Default)]
pub struct Parser {
    delimiters: Delimiters,
    tolerant: bool,
    caching: bool,
    tokens: HashMap<String, Token>,
}

/// Parses a delimiter setting, which must be exactly one character long.
fn one_char(value: &str) -> Result<char, ReplaceError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ReplaceError::InvalidDelimiter {
            value: value.to_string(),
        }),
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delimiters(&self) -> Delimiters {
        self.delimiters
    }

    pub fn is_tolerant(&self) -> bool {
        self.tolerant
    }

    pub fn is_caching(&self) -> bool {
        self.caching
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tokens.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn set_tolerant(&mut self, tolerant: bool) {
        self.tolerant = tolerant;
    }

    pub fn set_caching(&mut self, caching: bool) {
        self.caching = caching;
    }

    pub fn set_token_start(&mut self, value: &str) -> Result<(), ReplaceError> {
        self.delimiters.token_start = one_char(value)?;
        Ok(())
    }

    pub fn set_token_end(&mut self, value: &str) -> Result<(), ReplaceError> {
        self.delimiters.token_end = one_char(value)?;
        Ok(())
    }

    pub fn set_argument_start(&mut self, value: &str) -> Result<(), ReplaceError> {
        self.delimiters.argument_start = one_char(value)?;
        Ok(())
    }

    pub fn set_argument_end(&mut self, value: &str) -> Result<(), ReplaceError> {
        self.delimiters.argument_end = one_char(value)?;
        Ok(())
    }

    pub fn set_argument_separator(&mut self, value: &str) -> Result<(), ReplaceError> {
        self.delimiters.argument_separator = one_char(value)?;
        Ok(())
    }

    /// Adds a token to the table, replacing any token with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`ReplaceError::MissingValue`] when the token has neither a
    /// static value nor a generator.
    pub fn register(&mut self, token: Token) -> Result<(), ReplaceError> {
        if !token.has_value() {
            return Err(ReplaceError::MissingValue {
                name: token.name().to_string(),
            });
        }
        self.insert(token);
        Ok(())
    }

    pub(crate) fn insert(&mut self, token: Token) {
        debug!("Registering token '{}'", token.name());
        self.tokens.insert(token.name().to_string(), token);
    }

    /// Any character that is not one of the four structural delimiters.
    fn is_ordinary(&self, c: char) -> bool {
        c != self.delimiters.token_start
            && c != self.delimiters.token_end
            && c != self.delimiters.argument_start
            && c != self.delimiters.argument_end
    }

    /// Replaces every token in `subject`.
    ///
    /// # Errors
    ///
    /// - [`ReplaceError::MalformedInput`] for unbalanced or misplaced delimiters.
    /// - [`ReplaceError::MalformedArguments`] for an argument list that starts or
    ///   ends with the separator.
    /// - [`ReplaceError::UnresolvedToken`] for an unknown token in strict mode.
    pub fn execute(&mut self, subject: &str) -> Result<String, ReplaceError> {
        debug!(
            "Executing replacement over {} bytes (tolerant: {}, caching: {})",
            subject.len(),
            self.tolerant,
            self.caching
        );

        let mut state = State::ReadingInput;
        let mut result = String::with_capacity(subject.len());
        let mut name = String::new();
        let mut args = String::new();
        let mut token_begin = 0;
        let mut error_at = subject.len();
        // Values resolved during this call, keyed by token name.
        let mut cache: HashMap<String, String> = HashMap::new();

        let input = subject
            .char_indices()
            .map(|(i, c)| (i, Some(c)))
            .chain(iter::once((subject.len(), None)));

        for (position, input_char) in input {
            let next = match state {
                State::ReadingInput => match input_char {
                    None => State::ReadingInput,
                    Some(c) if c == self.delimiters.token_start => {
                        name.clear();
                        args.clear();
                        token_begin = position;
                        State::TokenStarted
                    }
                    Some(c) => {
                        result.push(c);
                        State::ReadingInput
                    }
                },
                State::TokenStarted => match input_char {
                    Some(c) if self.is_ordinary(c) => {
                        name.push(c);
                        State::ReadingToken
                    }
                    _ => State::Error,
                },
                State::ReadingToken => match input_char {
                    Some(c) if self.is_ordinary(c) => {
                        name.push(c);
                        State::ReadingToken
                    }
                    Some(c) if c == self.delimiters.argument_start => State::TokenArgsStarted,
                    Some(c) if c == self.delimiters.token_end => {
                        let literal = &subject[token_begin..position + c.len_utf8()];
                        let value = self.eval(&name, &args, literal, &mut cache)?;
                        result.push_str(&value);
                        State::ReadingInput
                    }
                    _ => State::Error,
                },
                State::TokenArgsStarted | State::ReadingTokenArgs => match input_char {
                    Some(c) if c == self.delimiters.argument_end => State::TokenArgsEnd,
                    Some(c) if self.is_ordinary(c) => {
                        args.push(c);
                        State::ReadingTokenArgs
                    }
                    _ => State::Error,
                },
                State::TokenArgsEnd => match input_char {
                    Some(c) if c == self.delimiters.argument_end => State::TokenArgsEnd,
                    Some(c) if c == self.delimiters.token_end => {
                        let literal = &subject[token_begin..position + c.len_utf8()];
                        let value = self.eval(&name, &args, literal, &mut cache)?;
                        result.push_str(&value);
                        State::ReadingInput
                    }
                    _ => State::Error,
                },
                State::Error => return Err(ReplaceError::MalformedInput { position: error_at }),
            };
            if next == State::Error && state != State::Error {
                error_at = position;
            }
            state = next;
        }

        if state != State::ReadingInput {
            return Err(ReplaceError::MalformedInput { position: error_at });
        }
        Ok(result)
    }

    /// Resolves one token occurrence.
    ///
    /// `literal` is the token exactly as written in the input; tolerant mode
    /// echoes it back for unknown names.
    fn eval(
        &mut self,
        name: &str,
        raw_args: &str,
        literal: &str,
        cache: &mut HashMap<String, String>,
    ) -> Result<String, ReplaceError> {
        let arguments = self.arguments(name, raw_args)?;

        let Some(token) = self.tokens.get_mut(name) else {
            if self.tolerant {
                trace!("Token '{}' is not registered, keeping '{}'", name, literal);
                return Ok(literal.to_string());
            }
            return Err(ReplaceError::UnresolvedToken {
                name: name.to_string(),
            });
        };

        if self.caching {
            if let Some(cached) = cache.get(name) {
                trace!("Token '{}' served from cache", name);
                return Ok(cached.clone());
            }
        }

        let value = token
            .value_mut()
            .ok_or_else(|| ReplaceError::MissingValue {
                name: name.to_string(),
            })?;
        value.inject(&arguments);
        let text = value.get();
        trace!("Token '{}' with {} argument(s) resolved", name, arguments.len());

        if self.caching {
            cache.insert(name.to_string(), text.clone());
        }
        Ok(text)
    }

    /// Splits the raw argument text on the separator.
    ///
    /// Only a leading or trailing separator is rejected; empty arguments in the
    /// middle (`a,,b`) are passed through.
    fn arguments(&self, name: &str, raw: &str) -> Result<Vec<String>, ReplaceError> {
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        let separator = self.delimiters.argument_separator;
        if raw.starts_with(separator) || raw.ends_with(separator) {
            return Err(ReplaceError::MalformedArguments {
                token: name.to_string(),
                arguments: raw.to_string(),
            });
        }
        Ok(raw.split(separator).map(str::to_string).collect())
    }
}
