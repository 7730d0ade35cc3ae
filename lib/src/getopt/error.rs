//! # Getopt Error Types
//!
//! File: lib/src/getopt/error.rs
//!
//! ## Overview
//!
//! Scanning problems are returned to the caller instead of being printed.
//! Each variant renders the diagnostic GNU `getopt` would print, prefixed with
//! the program name, so a front end only has to write `err` to stderr.
//!
use thiserror::Error;

/// A problem found while scanning one command-line element.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GetoptError {
    #[error("{program}: invalid option -- '{option}'")]
    InvalidOption { program: String, option: char },

    /// POSIX wording of [`GetoptError::InvalidOption`].
    #[error("{program}: illegal option -- '{option}'")]
    IllegalOption { program: String, option: char },

    #[error("{program}: unrecognized option '{option}'")]
    UnrecognizedOption { program: String, option: String },

    #[error("{program}: option requires an argument -- '{option}'")]
    MissingArgument { program: String, option: char },

    #[error("{program}: option '{option}' requires an argument")]
    MissingLongArgument { program: String, option: String },

    #[error("{program}: option '{option}' is ambiguous")]
    AmbiguousOption { program: String, option: String },

    #[error("{program}: option '{option}' doesn't allow an argument")]
    UnexpectedArgument { program: String, option: String },

    #[error("invalid option specification '{spec}': {reason}")]
    InvalidSpec { spec: String, reason: String },
}

impl GetoptError {
    /// `true` when an option was recognised but its argument was missing.
    pub fn is_missing_argument(&self) -> bool {
        matches!(
            self,
            GetoptError::MissingArgument { .. } | GetoptError::MissingLongArgument { .. }
        )
    }
}
