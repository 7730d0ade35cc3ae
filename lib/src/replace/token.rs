//! # Tokens and Value Generators
//!
//! File: lib/src/replace/token.rs
//!
//! ## Overview
//!
//! A [`Token`] is a named placeholder together with the source of its
//! replacement text. The source is anything implementing [`Value`]:
//! - [`StaticValue`] always yields the same string.
//! - [`FnValue`] adapts a closure that receives the token's arguments.
//! - Callers can implement [`Value`] themselves for stateful generators
//!   (counters, clocks, lookups).
//!
//! `Value` separates receiving the arguments (`inject`) from producing the
//! text (`get`), so one generator instance serves every occurrence of its
//! token with different arguments each time.
//!
use super::error::ReplaceError;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Source of a token's replacement text.
pub trait Value {
    /// Receives the positional arguments of the occurrence about to be evaluated.
    fn inject(&mut self, args: &[String]);

    /// Produces the replacement text for the most recently injected arguments.
    fn get(&mut self) -> String;
}

/// A value that ignores its arguments and always yields the same text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticValue(pub String);

impl Value for StaticValue {
    fn inject(&mut self, _args: &[String]) {}

    fn get(&mut self) -> String {
        self.0.clone()
    }
}

/// Adapts a closure over the injected arguments into a [`Value`].
pub struct FnValue<F>
where
    F: FnMut(&[String]) -> String,
{
    f: F,
    args: Vec<String>,
}

impl<F> FnValue<F>
where
    F: FnMut(&[String]) -> String,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            args: Vec::new(),
        }
    }
}

impl<F> Value for FnValue<F>
where
    F: FnMut(&[String]) -> String,
{
    fn inject(&mut self, args: &[String]) {
        self.args = args.to_vec();
    }

    fn get(&mut self) -> String {
        (self.f)(&self.args)
    }
}

/// A named placeholder and its value source.
///
/// Two tokens are equal when their names are equal; the value is not compared.
pub struct Token {
    name: String,
    value: Option<Box<dyn Value>>,
}

impl Token {
    /// Creates a token without a value.
    ///
    /// # Errors
    ///
    /// Returns [`ReplaceError::EmptyTokenName`] if `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, ReplaceError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ReplaceError::EmptyTokenName);
        }
        Ok(Self { name, value: None })
    }

    /// Token `"0"`, `"1"`, … carrying a static value.
    pub(crate) fn positional(position: usize, value: String) -> Self {
        Self {
            name: position.to_string(),
            value: Some(Box::new(StaticValue(value))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attaches a static replacement text, replacing any previous value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(Box::new(StaticValue(value.into())));
        self
    }

    /// Attaches a generator, replacing any previous value.
    pub fn with_generator(mut self, generator: impl Value + 'static) -> Self {
        self.value = Some(Box::new(generator));
        self
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub(crate) fn value_mut(&mut self) -> Option<&mut (dyn Value + 'static)> {
        self.value.as_deref_mut()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("name", &self.name)
            .field("has_value", &self.value.is_some())
            .finish()
    }
}
