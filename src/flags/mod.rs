//! Flag set
//!
//! An ordered collection of named options, indexed by long name and by
//! single-character short name. Flags are registered once, with their
//! default text, argument mode, and help strings captured at that point,
//! and never removed. The tokenizer is in `parse.rs`.

mod parse;

use std::collections::HashMap;
use std::io::{self, Write};

use tracing::debug;

use crate::bind::{Binding, Role};
use crate::error::{ParseError, ParseResult, SpecError, SpecResult};
use crate::values::ArgumentMode;

/// A single registered flag
pub struct Flag<A> {
    long: Option<String>,
    short: Option<char>,
    descr: String,
    default: String,
    mode: ArgumentMode,
    placeholder: String,
    binding: Binding<A>,
}

impl<A> Flag<A> {
    /// Long name, without dashes
    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// Short name
    pub fn short(&self) -> Option<char> {
        self.short
    }

    /// Description, as adjusted by the value
    pub fn descr(&self) -> &str {
        &self.descr
    }

    /// The value's text at registration time
    pub fn default_text(&self) -> &str {
        &self.default
    }

    /// Argument mode at registration time
    pub fn mode(&self) -> &ArgumentMode {
        &self.mode
    }

    /// Names as shown in help and prepare errors, e.g. `-f,--flag`
    pub fn display_name(&self) -> String {
        match (self.short, &self.long) {
            (Some(s), Some(l)) => format!("-{},--{}", s, l),
            (Some(s), None) => format!("-{}", s),
            (None, Some(l)) => format!("--{}", l),
            (None, None) => String::new(),
        }
    }

    fn sort_key(&self) -> String {
        match (&self.long, self.short) {
            (Some(l), _) => l.clone(),
            (None, Some(s)) => s.to_string(),
            (None, None) => String::new(),
        }
    }

    fn write_usage<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        let value = match &self.mode {
            ArgumentMode::Required => format!(" {}", self.placeholder),
            ArgumentMode::Optional(fallback) => {
                format!(" [{}] (no value = {})", self.placeholder, fallback)
            }
            ArgumentMode::NoArgument => String::new(),
        };
        let default = if self.default.is_empty() {
            String::new()
        } else {
            format!(" (default {})", self.default)
        };
        write!(
            out,
            "  {}{}\n\t{}{}\n",
            self.display_name(),
            value,
            self.descr,
            default
        )
    }
}

/// Flags of one command, for configuration record type `A`
pub struct FlagSet<A> {
    flags: Vec<Flag<A>>,
    by_long: HashMap<String, usize>,
    by_short: HashMap<char, usize>,
}

impl<A> Default for FlagSet<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> FlagSet<A> {
    /// Create an empty flag set
    pub fn new() -> Self {
        Self {
            flags: Vec::new(),
            by_long: HashMap::new(),
            by_short: HashMap::new(),
        }
    }

    /// Register a flag.
    ///
    /// At least one of `long` and `short` must be given, and neither may
    /// already be in use. The binding's current value becomes the flag's
    /// default text.
    pub fn insert(
        &mut self,
        long: Option<&str>,
        short: Option<char>,
        descr: &str,
        mut binding: Binding<A>,
        record: &mut A,
    ) -> SpecResult<()> {
        let long = long.filter(|l| !l.is_empty());
        if long.is_none() && short.is_none() {
            return Err(SpecError::UnnamedFlag);
        }
        if let Some(l) = long {
            if self.by_long.contains_key(l) {
                return Err(SpecError::DuplicateFlag(l.to_string()));
            }
        }
        if let Some(s) = short {
            if self.by_short.contains_key(&s) {
                return Err(SpecError::DuplicateFlag(s.to_string()));
            }
        }

        binding.resolve(record, Role::Flag)?;

        let flag = Flag {
            long: long.map(str::to_string),
            short,
            descr: binding.describe_argument(record, true, descr),
            default: binding.render(record),
            mode: binding.mode(record),
            placeholder: binding
                .describe_value(record)
                .unwrap_or_else(|| "value".to_string()),
            binding,
        };
        debug!(flag = %flag.display_name(), default = %flag.default, "registered flag");

        let index = self.flags.len();
        if let Some(l) = long {
            self.by_long.insert(l.to_string(), index);
        }
        if let Some(s) = short {
            self.by_short.insert(s, index);
        }
        self.flags.push(flag);
        Ok(())
    }

    /// Find a flag by long name, or by short name for a single character
    pub fn lookup(&self, name: &str) -> Option<&Flag<A>> {
        self.index_of_long(name)
            .or_else(|| {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => self.index_of_short(c),
                    _ => None,
                }
            })
            .map(|i| &self.flags[i])
    }

    fn index_of_long(&self, name: &str) -> Option<usize> {
        self.by_long.get(name).copied()
    }

    fn index_of_short(&self, name: char) -> Option<usize> {
        self.by_short.get(&name).copied()
    }

    /// Number of registered flags
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// True when no flags are registered
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Flags in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Flag<A>> {
        self.flags.iter()
    }

    /// Validate every bound value before parsing
    pub fn validate(&mut self, record: &mut A) -> SpecResult<()> {
        for flag in &mut self.flags {
            flag.binding.validate(record, true)?;
        }
        Ok(())
    }

    /// Prepare every bound value after parsing
    pub fn prepare(&mut self, record: &mut A) -> ParseResult<()> {
        for flag in &mut self.flags {
            if let Err(err) = flag.binding.prepare(record) {
                return Err(ParseError::PrepareFlag {
                    flag: flag.display_name(),
                    source: Box::new(err),
                });
            }
        }
        Ok(())
    }

    /// Write the `Flags:` section of a usage message, sorted by name
    pub fn write_usage<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        if self.flags.is_empty() {
            return Ok(());
        }
        let mut sorted: Vec<&Flag<A>> = self.flags.iter().collect();
        sorted.sort_by_key(|f| f.sort_key());

        writeln!(out, "Flags:")?;
        for flag in sorted {
            flag.write_usage(&mut *out)?;
        }
        Ok(())
    }
}
