//! Value protocol
//!
//! Everything that can sit behind a flag or a positional parameter is a
//! [`Value`] (one token at a time) or a [`VariadicValue`] (all remaining
//! tokens at once). Both traits have a small mandatory core and a set of
//! provided methods for the optional capabilities:
//!
//! - [`Value::mode`] decides whether a flag consumes a token, may take one,
//!   or never takes one
//! - `describe_argument` / [`Value::describe_value`] adjust help text
//! - `validate` runs once after the command is built, before parsing
//! - `prepare` runs once after parsing, before the command body
//!
//! Implementations are provided for the primitive types (see
//! [`primitive`]), for vectors of them, for [`Choice`], and for the file
//! values in [`files`]. Plain functions become values through [`Callback`].

pub mod callbacks;
pub mod choice;
pub mod primitive;

#[cfg(feature = "files")]
pub mod files;

pub use callbacks::{Callback, CallbackResult};
pub use choice::Choice;

#[cfg(feature = "files")]
pub use files::{InFile, OutFile};

use crate::error::{ParseResult, SpecResult};

/// How a flag relates to the token that may follow it.
///
/// A value is in exactly one of these modes; the parser never combines them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ArgumentMode {
    /// The flag needs a value, inline (`--x=1`) or as the next token (`--x 1`)
    #[default]
    Required,

    /// The flag may take an inline value; a bare flag is set from the fallback
    Optional(String),

    /// The flag never takes a value; a bare flag is set from the empty string
    NoArgument,
}

impl ArgumentMode {
    /// Optional mode with the given fallback token
    pub fn optional<S: Into<String>>(fallback: S) -> Self {
        Self::Optional(fallback.into())
    }
}

/// A settable value bound to a flag or a fixed positional parameter.
pub trait Value {
    /// Update the value from a single token.
    fn set(&mut self, token: &str) -> ParseResult<()>;

    /// Current value as text. Flags show this as their default in help.
    fn render(&self) -> String;

    /// Whether the flag consumes a token.
    fn mode(&self) -> ArgumentMode {
        ArgumentMode::Required
    }

    /// Adjust the description shown for the flag or parameter.
    fn describe_argument(&self, _is_flag: bool, descr: &str) -> String {
        descr.to_string()
    }

    /// Placeholder shown for the flag's value in help; `value` when `None`.
    fn describe_value(&self) -> Option<String> {
        None
    }

    /// Check the initial state before anything is parsed.
    fn validate(&self, _is_flag: bool) -> SpecResult<()> {
        Ok(())
    }

    /// Deferred side effects after parsing.
    fn prepare(&mut self) -> ParseResult<()> {
        Ok(())
    }
}

/// A value that takes all trailing positional tokens.
pub trait VariadicValue {
    /// Replace the value with the parsed tokens.
    fn set_all(&mut self, tokens: &[String]) -> ParseResult<()>;

    /// Adjust the description shown for the parameter.
    fn describe_argument(&self, descr: &str) -> String {
        descr.to_string()
    }

    /// Check the initial state before anything is parsed.
    fn validate(&self) -> SpecResult<()> {
        Ok(())
    }

    /// Deferred side effects after parsing.
    fn prepare(&mut self) -> ParseResult<()> {
        Ok(())
    }
}
