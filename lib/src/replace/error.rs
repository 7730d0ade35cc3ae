//! # Replace Error Types
//!
//! File: lib/src/replace/error.rs
//!
//! ## Overview
//!
//! Errors raised by the token replacement engine. Configuration errors are
//! reported by the setter that received the bad value; the remaining variants
//! abort a single `execute` call and no partial output is returned.
//!
use thiserror::Error;

/// Errors produced while configuring a replacer or substituting tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplaceError {
    #[error("the given string '{value}' must be exactly of size 1")]
    InvalidDelimiter { value: String },

    #[error("the token name must not be empty")]
    EmptyTokenName,

    #[error("please specify a value or a generator for the token '{name}'")]
    MissingValue { name: String },

    #[error("no value or generator for token '{name}' found")]
    UnresolvedToken { name: String },

    #[error(
        "Invalid input. The given string could not be parsed (offset {position}). \
         Please check if all tokens, brackets etc. are correct."
    )]
    MalformedInput { position: usize },

    #[error("the given arguments '{arguments}' for token '{token}' seem to be incorrect")]
    MalformedArguments { token: String, arguments: String },
}

impl ReplaceError {
    /// `true` for errors raised while configuring, as opposed to while substituting.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ReplaceError::InvalidDelimiter { .. }
                | ReplaceError::EmptyTokenName
                | ReplaceError::MissingValue { .. }
        )
    }
}
