//! Values restricted to a fixed set of options

use super::Value;
use crate::error::{ParseError, ParseResult};

/// A string value that must be one of `options`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Choice {
    /// The current (default or parsed) choice
    pub choice: String,
    /// The accepted options, in display order
    pub options: Vec<String>,
}

impl Choice {
    /// Create a choice with a default and its options
    pub fn new<S, I, O>(choice: S, options: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = O>,
        O: Into<String>,
    {
        Self {
            choice: choice.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// The options as `{A,B,C}`
    pub fn options_text(&self) -> String {
        format!("{{{}}}", self.options.join(","))
    }
}

impl Value for Choice {
    fn set(&mut self, token: &str) -> ParseResult<()> {
        if !self.options.iter().any(|option| option == token) {
            return Err(ParseError::rejected(format!(
                "{} is not a valid choice, must be in {}",
                token,
                self.options_text()
            )));
        }
        token.clone_into(&mut self.choice);
        Ok(())
    }

    fn render(&self) -> String {
        self.choice.clone()
    }

    fn describe_argument(&self, is_flag: bool, descr: &str) -> String {
        // Flags show the options in the value placeholder instead.
        if is_flag {
            descr.to_string()
        } else {
            format!("{} (choose from {})", descr, self.options_text())
        }
    }

    fn describe_value(&self) -> Option<String> {
        Some(self.options_text())
    }
}
