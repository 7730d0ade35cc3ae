//! # Option Tables
//!
//! File: lib/src/getopt/spec.rs
//!
//! ## Overview
//!
//! Describes which options a program accepts.
//!
//! Short options use the classic optstring:
//!
//! ```text
//! +      (first) stop at the first non-option
//! -      (first) return non-options in order
//! :      (after +/-) accepted for compatibility
//! x      option without argument
//! x:     option with a required argument
//! x::    option with an optional argument (must be attached: -xvalue)
//! W;     -W name[=value] is treated as --name[=value]
//! ```
//!
//! Long options are [`LongOption`] values; [`parse_long_options`] reads the
//! comma separated form used by `getopt(1)` (`file:,verbose,level::`).
//!
use super::error::GetoptError;

/// Whether an option takes an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HasArg {
    No,
    Required,
    Optional,
}

/// How non-option arguments are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    /// Options and non-options may be mixed; non-options are moved to the end.
    Permute,
    /// Scanning stops at the first non-option.
    RequireOrder,
    /// Non-options are returned in place as [`super::Opt::Free`].
    ReturnInOrder,
}

/// A named option such as `--output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongOption {
    pub name: String,
    pub has_arg: HasArg,
    /// Short option this long option stands for, if any.
    pub value: Option<char>,
}

impl LongOption {
    pub fn new(name: impl Into<String>, has_arg: HasArg) -> Self {
        Self {
            name: name.into(),
            has_arg,
            value: None,
        }
    }

    pub fn with_value(mut self, value: char) -> Self {
        self.value = Some(value);
        self
    }
}

/// Parsed short option string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ShortOptions {
    options: Vec<(char, HasArg)>,
    ordering: Option<Ordering>,
    long_escape: bool,
}

impl ShortOptions {
    pub(crate) fn parse(optstring: &str) -> Self {
        let mut chars = optstring.chars().peekable();
        let mut parsed = Self::default();

        match chars.peek() {
            Some('+') => {
                parsed.ordering = Some(Ordering::RequireOrder);
                chars.next();
            }
            Some('-') => {
                parsed.ordering = Some(Ordering::ReturnInOrder);
                chars.next();
            }
            _ => {}
        }
        if chars.peek() == Some(&':') {
            chars.next();
        }

        while let Some(c) = chars.next() {
            if c == ':' {
                continue;
            }
            if c == 'W' && chars.peek() == Some(&';') {
                chars.next();
                parsed.long_escape = true;
                parsed.options.push((c, HasArg::Required));
                continue;
            }
            let mut has_arg = HasArg::No;
            if chars.peek() == Some(&':') {
                chars.next();
                has_arg = HasArg::Required;
                if chars.peek() == Some(&':') {
                    chars.next();
                    has_arg = HasArg::Optional;
                }
            }
            parsed.options.push((c, has_arg));
        }
        parsed
    }

    pub(crate) fn get(&self, option: char) -> Option<HasArg> {
        self.options
            .iter()
            .find(|(c, _)| *c == option)
            .map(|(_, has_arg)| *has_arg)
    }

    pub(crate) fn ordering(&self) -> Option<Ordering> {
        self.ordering
    }

    pub(crate) fn long_escape(&self) -> bool {
        self.long_escape
    }
}

/// Parses `name`, `name:` and `name::` entries separated by commas or whitespace.
///
/// # Errors
///
/// Returns [`GetoptError::InvalidSpec`] for an entry without a name or with
/// more than two trailing colons.
pub fn parse_long_options(spec: &str) -> Result<Vec<LongOption>, GetoptError> {
    let invalid = |reason: &str| GetoptError::InvalidSpec {
        spec: spec.to_string(),
        reason: reason.to_string(),
    };

    spec.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let name = entry.trim_end_matches(':');
            let has_arg = match entry.len() - name.len() {
                0 => HasArg::No,
                1 => HasArg::Required,
                2 => HasArg::Optional,
                _ => return Err(invalid("too many ':' after option name")),
            };
            if name.is_empty() {
                return Err(invalid("empty long option name"));
            }
            Ok(LongOption::new(name, has_arg))
        })
        .collect()
}
