//! Flag tokenizer
//!
//! Scans tokens from the front of the argument list until the first token
//! that is not a flag:
//!
//! - `--name` or `--name=value` is a long flag
//! - `-abc` is a run of short flags; only the last may consume a value,
//!   and only from the next token (`-a=x` is rejected)
//! - `--` is consumed and ends scanning; everything after it is positional
//! - `-`, and anything not starting with `-`, ends scanning unconsumed
//!
//! A flag with a required value takes it inline or from the next token,
//! unless that token starts with `-`. An optional-value flag uses its inline
//! value or its fallback and never looks at the next token.

use tracing::{debug, trace};

use super::FlagSet;
use crate::error::{ParseError, ParseResult};
use crate::values::ArgumentMode;

/// The next token, if it can serve as a flag's value
fn value_token(next: Option<&String>) -> Option<&str> {
    next.map(String::as_str).filter(|t| !t.starts_with('-'))
}

impl<A> FlagSet<A> {
    /// Parse flags from the front of `tokens`, writing values into `record`.
    ///
    /// Returns the index of the first positional token. Stops at the first
    /// failure; flags set before it keep their new values.
    pub fn parse(&mut self, record: &mut A, tokens: &[String]) -> ParseResult<usize> {
        let mut index = 0;
        while let Some(token) = tokens.get(index) {
            trace!(index = index, token = %token, "scanning");
            if token.len() < 2 || !token.starts_with('-') {
                break;
            }
            if token == "--" {
                index += 1;
                break;
            }

            let next = tokens.get(index + 1);
            let consumed = match token.strip_prefix("--") {
                Some(body) => self.parse_long(record, token, body, next)?,
                None => self.parse_short_run(record, token, &token[1..], next)?,
            };
            index += consumed;
        }
        Ok(index)
    }

    fn parse_long(
        &mut self,
        record: &mut A,
        token: &str,
        body: &str,
        next: Option<&String>,
    ) -> ParseResult<usize> {
        if body.starts_with('-') || body.starts_with('=') {
            return Err(ParseError::BadSyntax(token.to_string()));
        }
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let flag = format!("--{}", name);
        let index = self
            .index_of_long(name)
            .ok_or_else(|| ParseError::UndefinedFlag(flag.clone()))?;

        let (value, consumed) = match (self.flags[index].mode.clone(), inline) {
            (ArgumentMode::NoArgument, Some(value)) => {
                return Err(ParseError::UnexpectedArgument {
                    flag,
                    value: value.to_string(),
                })
            }
            (ArgumentMode::NoArgument, None) => (String::new(), 1),
            (ArgumentMode::Optional(_), Some(value)) => (value.to_string(), 1),
            (ArgumentMode::Optional(fallback), None) => (fallback, 1),
            (ArgumentMode::Required, Some(value)) => (value.to_string(), 1),
            (ArgumentMode::Required, None) => match value_token(next) {
                Some(value) => (value.to_string(), 2),
                None => return Err(ParseError::MissingArgument(flag)),
            },
        };

        self.set_flag(record, index, &flag, &value)
            .map_err(|err| ParseError::flag_value(flag.clone(), err))?;
        Ok(consumed)
    }

    fn parse_short_run(
        &mut self,
        record: &mut A,
        token: &str,
        body: &str,
        next: Option<&String>,
    ) -> ParseResult<usize> {
        if body.contains('=') {
            return Err(ParseError::BadSyntax(token.to_string()));
        }

        let count = body.chars().count();
        let mut consumed = 1;
        for (position, c) in body.chars().enumerate() {
            let flag = format!("-{}", c);
            let index = self
                .index_of_short(c)
                .ok_or_else(|| ParseError::UndefinedFlag(flag.clone()))?;
            let last = position + 1 == count;

            let value = match self.flags[index].mode.clone() {
                ArgumentMode::NoArgument => String::new(),
                ArgumentMode::Optional(fallback) => fallback,
                ArgumentMode::Required if last => match value_token(next) {
                    Some(value) => {
                        consumed = 2;
                        value.to_string()
                    }
                    None => return Err(ParseError::MissingArgument(flag)),
                },
                ArgumentMode::Required => return Err(ParseError::MissingArgument(flag)),
            };

            self.set_flag(record, index, &flag, &value).map_err(|err| {
                if last {
                    ParseError::flag_value(flag.clone(), err)
                } else {
                    ParseError::flag_run(flag.clone(), err)
                }
            })?;
        }
        Ok(consumed)
    }

    fn set_flag(
        &mut self,
        record: &mut A,
        index: usize,
        flag: &str,
        value: &str,
    ) -> ParseResult<()> {
        debug!(flag = %flag, value = %value, "setting flag");
        self.flags[index].binding.set(record, value)
    }
}
