//! cmdspec - declarative command-line parsing
//!
//! A program describes its command line once, as a plain configuration
//! record. Each field is bound to a flag, a positional parameter, or the
//! trailing variadic parameter, and the record's initial field values are
//! the defaults shown in help. Parsing writes straight into the record.
//!
//! - **`values`** - the value protocol, primitive values, callbacks,
//!   choices and (with the `files` feature) lazily opened files
//! - **`bind`** - type-erased bindings between record fields and values
//! - **`flags`** - flag registration and the `-a`/`--flag=x` tokenizer
//! - **`params`** - fixed positional parameters and the variadic tail
//! - **`spec`** - the [`Arguments`] trait and the declaration builder
//! - **`command`** - runnable commands, menus of sub-commands, usage text
//! - **`config`** - command metadata from TOML (`config` feature)
//!
//! # Features
//!
//! ```toml
//! [dependencies]
//! cmdspec = "0.3"
//! # Without file values:
//! cmdspec = { version = "0.3", default-features = false }
//! # With TOML command metadata:
//! cmdspec = { version = "0.3", features = ["config"] }
//! ```
//!
//! # Example
//!
//! ```
//! use cmdspec::prelude::*;
//!
//! #[derive(Default)]
//! struct Grep {
//!     count: bool,
//!     max: u32,
//!     pattern: String,
//!     files: Vec<String>,
//! }
//!
//! impl Arguments for Grep {
//!     fn declare(spec: &mut Spec<Self>) {
//!         spec.flag("count", |g| &mut g.count).short('c').descr("only count matches");
//!         spec.flag("max", |g| &mut g.max).short('m').descr("stop after this many matches");
//!         spec.param("pattern", |g| &mut g.pattern).descr("text to look for");
//!         spec.variadic("files", |g| &mut g.files).descr("files to search");
//!     }
//! }
//!
//! let spec = CommandSpec::new("grep").error_handling(ErrorHandling::ContinueOnError);
//! let mut cmd = Command::new(spec, Grep { max: 10, ..Default::default() }).unwrap();
//!
//! let args: Vec<String> = ["-cm", "3", "needle", "a.txt", "b.txt"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! cmd.run_error(&args).unwrap();
//!
//! let grep = cmd.record();
//! assert!(grep.count);
//! assert_eq!(grep.max, 3);
//! assert_eq!(grep.pattern, "needle");
//! assert_eq!(grep.files, ["a.txt", "b.txt"]);
//! ```

#![warn(missing_docs)]

pub mod bind;
pub mod command;
pub mod error;
pub mod flags;
pub mod params;
pub mod spec;
pub mod values;

/// Command metadata from TOML (enabled with the `config` feature)
#[cfg(feature = "config")]
pub mod config;

pub use command::{Command, CommandSpec, ErrorHandling, Subcommand};
pub use error::{CommandError, CommandResult, ParseError, ParseResult, SpecError, SpecResult};
pub use spec::{Arguments, Spec};
pub use values::{ArgumentMode, Callback, CallbackResult, Choice, Value, VariadicValue};

#[cfg(feature = "files")]
pub use values::{InFile, OutFile};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bind::{Binding, VariadicBinding};
    pub use crate::command::{Command, CommandSpec, ErrorHandling, Subcommand};
    pub use crate::error::{CommandError, ParseError, ParseResult, SpecError};
    pub use crate::spec::{Arguments, Spec};
    pub use crate::values::{ArgumentMode, Callback, Choice, Value, VariadicValue};

    #[cfg(feature = "files")]
    pub use crate::values::{InFile, OutFile};

    #[cfg(feature = "config")]
    pub use crate::config::CommandInfo;
}
