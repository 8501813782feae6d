//! Parameter set
//!
//! Positional parameters of a command: a fixed list filled in order, then
//! optionally one variadic parameter that takes every remaining token and
//! needs at least `min` of them.
//!
//! Without a variadic parameter the number of tokens must match the number
//! of fixed parameters exactly.

use std::io::{self, Write};

use tracing::debug;

use crate::bind::{Binding, Role, VariadicBinding};
use crate::error::{ParseError, ParseResult, SpecError, SpecResult};

/// A fixed positional parameter
pub struct Param<A> {
    name: String,
    descr: String,
    binding: Binding<A>,
}

impl<A> Param<A> {
    /// Parameter name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description, as adjusted by the value
    pub fn descr(&self) -> &str {
        &self.descr
    }
}

/// The trailing variadic parameter
pub struct VariadicParam<A> {
    name: String,
    descr: String,
    min: usize,
    binding: VariadicBinding<A>,
}

impl<A> VariadicParam<A> {
    /// Parameter name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description, as adjusted by the value
    pub fn descr(&self) -> &str {
        &self.descr
    }

    /// Minimum number of tokens
    pub fn min(&self) -> usize {
        self.min
    }
}

/// Positional parameters of one command, for configuration record type `A`
pub struct ParamSet<A> {
    params: Vec<Param<A>>,
    variadic: Option<VariadicParam<A>>,
}

impl<A> Default for ParamSet<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> ParamSet<A> {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self {
            params: Vec::new(),
            variadic: None,
        }
    }

    /// Append a fixed parameter
    pub fn insert(
        &mut self,
        name: &str,
        descr: &str,
        mut binding: Binding<A>,
        record: &mut A,
    ) -> SpecResult<()> {
        binding.resolve(record, Role::Param)?;
        let descr = binding.describe_argument(record, false, descr);
        debug!(param = %name, position = self.params.len(), "registered parameter");
        self.params.push(Param {
            name: name.to_string(),
            descr,
            binding,
        });
        Ok(())
    }

    /// Install the variadic parameter; there can only be one
    pub fn insert_variadic(
        &mut self,
        name: &str,
        descr: &str,
        min: usize,
        mut binding: VariadicBinding<A>,
        record: &mut A,
    ) -> SpecResult<()> {
        if self.variadic.is_some() {
            return Err(SpecError::MultipleVariadic);
        }
        binding.resolve(record)?;
        let descr = binding.describe_argument(record, descr);
        debug!(param = %name, min = min, "registered variadic parameter");
        self.variadic = Some(VariadicParam {
            name: name.to_string(),
            descr,
            min,
            binding,
        });
        Ok(())
    }

    /// Number of fixed parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True when there are neither fixed nor variadic parameters
    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.variadic.is_none()
    }

    /// Fixed parameters in order
    pub fn iter(&self) -> impl Iterator<Item = &Param<A>> {
        self.params.iter()
    }

    /// The variadic parameter, if any
    pub fn variadic(&self) -> Option<&VariadicParam<A>> {
        self.variadic.as_ref()
    }

    /// Fewest tokens `parse` accepts
    pub fn minimum_arity(&self) -> usize {
        self.params.len() + self.variadic.as_ref().map_or(0, |v| v.min)
    }

    /// Assign all of `tokens` to the parameters.
    pub fn parse(&mut self, record: &mut A, tokens: &[String]) -> ParseResult<()> {
        if tokens.len() < self.minimum_arity() {
            return Err(ParseError::TooFewArguments);
        }
        if self.variadic.is_none() && tokens.len() > self.params.len() {
            return Err(ParseError::TooManyArguments);
        }

        let fixed = self.set_fixed(record, tokens)?;
        if let Some(variadic) = &mut self.variadic {
            let rest = &tokens[fixed..];
            debug!(param = %variadic.name, count = rest.len(), "setting variadic parameter");
            if let Err(err) = variadic.binding.set_all(record, rest) {
                return Err(ParseError::Variadic {
                    name: variadic.name.clone(),
                    tokens: rest.to_vec(),
                    source: Box::new(err),
                });
            }
        }
        Ok(())
    }

    /// Assign only the fixed parameters from the front of `tokens` and
    /// return how many tokens were used. The variadic parameter is ignored.
    pub fn parse_prefix(&mut self, record: &mut A, tokens: &[String]) -> ParseResult<usize> {
        if tokens.len() < self.params.len() {
            return Err(ParseError::TooFewArguments);
        }
        self.set_fixed(record, tokens)
    }

    fn set_fixed(&mut self, record: &mut A, tokens: &[String]) -> ParseResult<usize> {
        for (param, token) in self.params.iter_mut().zip(tokens) {
            debug!(param = %param.name, value = %token, "setting parameter");
            if let Err(err) = param.binding.set(record, token) {
                return Err(ParseError::Param {
                    name: param.name.clone(),
                    token: token.clone(),
                    source: Box::new(err),
                });
            }
        }
        Ok(self.params.len())
    }

    /// Validate every bound value before parsing
    pub fn validate(&mut self, record: &mut A) -> SpecResult<()> {
        for param in &mut self.params {
            param.binding.validate(record, false)?;
        }
        if let Some(variadic) = &mut self.variadic {
            variadic.binding.validate(record)?;
        }
        Ok(())
    }

    /// Prepare every bound value after parsing, fixed parameters first
    pub fn prepare(&mut self, record: &mut A) -> ParseResult<()> {
        for param in &mut self.params {
            if let Err(err) = param.binding.prepare(record) {
                return Err(ParseError::PrepareArgument {
                    name: param.name.clone(),
                    source: Box::new(err),
                });
            }
        }
        if let Some(variadic) = &mut self.variadic {
            if let Err(err) = variadic.binding.prepare(record) {
                return Err(ParseError::PrepareArgument {
                    name: variadic.name.clone(),
                    source: Box::new(err),
                });
            }
        }
        Ok(())
    }

    /// Parameter names for the `Usage:` line, e.g. `x y rest`
    pub fn short_usage(&self) -> String {
        self.params
            .iter()
            .map(|p| p.name.as_str())
            .chain(self.variadic.as_ref().map(|v| v.name.as_str()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Write the `Arguments:` section of a usage message
    pub fn write_usage<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        writeln!(out, "Arguments:")?;
        self.write_entries(out)
    }

    /// Write one entry per parameter, without the section header
    pub(crate) fn write_entries<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        for param in &self.params {
            write!(out, "  {}\n\t{}\n", param.name, param.descr)?;
        }
        if let Some(variadic) = &self.variadic {
            write!(out, "  {}\n\t{}\n", variadic.name, variadic.descr)?;
        }
        Ok(())
    }
}
