//! Commands and sub-commands
//!
//! A [`Command`] owns a configuration record together with the flag and
//! parameter sets connected to it. Running the command parses a token list
//! into the record, prepares the bound values, and calls the command's
//! action with the populated record.
//!
//! A command with sub-commands is a menu: after its own flags and fixed
//! parameters, the next token names the sub-command that receives the rest
//! of the tokens. Sub-commands can use different record types; they are
//! held as [`Subcommand`] trait objects.
//!
//! ```
//! use cmdspec::command::{Command, CommandSpec, ErrorHandling};
//! use cmdspec::spec::{Arguments, Spec};
//!
//! #[derive(Default)]
//! struct Add {
//!     x: i64,
//!     y: i64,
//!     sum: i64,
//! }
//!
//! impl Arguments for Add {
//!     fn declare(spec: &mut Spec<Self>) {
//!         spec.param("x", |a| &mut a.x).descr("first term");
//!         spec.param("y", |a| &mut a.y).descr("second term");
//!     }
//! }
//!
//! let spec = CommandSpec::new("add")
//!     .short("adds two numbers")
//!     .error_handling(ErrorHandling::ContinueOnError)
//!     .action(|a: &mut Add| {
//!         a.sum = a.x + a.y;
//!         Ok(())
//!     });
//! let mut cmd = Command::new(spec, Add::default()).unwrap();
//! cmd.run_error(&["2".to_string(), "3".to_string()]).unwrap();
//! assert_eq!(cmd.record().sum, 5);
//! ```

mod usage;
pub mod wrap;

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::io::{self, Write};
use std::rc::Rc;

use tracing::{debug, info};

use crate::bind::Binding;
use crate::error::{CommandError, CommandResult, ParseError, ParseResult, SpecError, SpecResult};
use crate::flags::FlagSet;
use crate::params::ParamSet;
use crate::spec::{Arguments, Spec};
use crate::values::{ArgumentMode, Value};

/// Shared writer for usage and error messages
pub type Output = Rc<RefCell<dyn Write>>;

/// Action run after a successful parse
pub type Action<A> = Box<dyn FnMut(&mut A) -> anyhow::Result<()>>;

/// What `Command::run` does with an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ErrorHandling {
    /// Print the error and return it
    ContinueOnError,
    /// Print the error and exit the process with status 2
    #[default]
    ExitOnError,
    /// Print the error and panic
    PanicOnError,
}

/// A command that can sit in a menu
pub trait Subcommand {
    /// Name used to select the command
    fn name(&self) -> &str;

    /// One-line description shown in the menu's usage
    fn short_description(&self) -> &str;

    /// Parse `args` and run, returning any error
    fn run_error(&mut self, args: &[String]) -> CommandResult<()>;

    /// Write usage and errors to `out`
    fn share_output(&mut self, out: Output);

    /// Full usage text
    fn usage(&self) -> String;
}

/// Static description of a command
pub struct CommandSpec<A> {
    name: String,
    short: String,
    long: String,
    error_handling: ErrorHandling,
    action: Option<Action<A>>,
    subcommands: Vec<Box<dyn Subcommand>>,
}

impl<A: Arguments> CommandSpec<A> {
    /// A command called `name`
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            short: String::new(),
            long: String::new(),
            error_handling: ErrorHandling::default(),
            action: None,
            subcommands: Vec::new(),
        }
    }

    /// One-line description
    pub fn short<S: Into<String>>(mut self, short: S) -> Self {
        self.short = short.into();
        self
    }

    /// Longer description for the command's own usage
    pub fn long<S: Into<String>>(mut self, long: S) -> Self {
        self.long = long.into();
        self
    }

    /// Error policy for `Command::run`
    pub fn error_handling(mut self, error_handling: ErrorHandling) -> Self {
        self.error_handling = error_handling;
        self
    }

    /// Body of the command
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: FnMut(&mut A) -> anyhow::Result<()> + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// Add a sub-command, turning this command into a menu
    pub fn subcommand<S: Subcommand + 'static>(mut self, cmd: S) -> Self {
        self.subcommands.push(Box::new(cmd));
        self
    }

    /// Command name
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The built-in `--help` switch
struct HelpFlag(Rc<Cell<bool>>);

impl Value for HelpFlag {
    fn set(&mut self, _token: &str) -> ParseResult<()> {
        self.0.set(true);
        Ok(())
    }

    fn render(&self) -> String {
        String::new()
    }

    fn mode(&self) -> ArgumentMode {
        ArgumentMode::NoArgument
    }
}

/// A runnable command over configuration record `A`
pub struct Command<A> {
    name: String,
    short: String,
    long: String,
    error_handling: ErrorHandling,
    flags: FlagSet<A>,
    params: ParamSet<A>,
    help: Rc<Cell<bool>>,
    action: Option<Action<A>>,
    subcommands: Vec<Box<dyn Subcommand>>,
    record: A,
    out: Output,
}

impl<A: Arguments> Command<A> {
    /// Build a command from its spec and its initial record.
    ///
    /// The record's current field values become the defaults shown in
    /// usage. Fails if the record's declarations are inconsistent.
    pub fn new(spec: CommandSpec<A>, mut record: A) -> SpecResult<Self> {
        let mut names = HashSet::new();
        for sub in &spec.subcommands {
            if !names.insert(sub.name().to_string()) {
                return Err(SpecError::DuplicateSubcommand(sub.name().to_string()));
            }
        }

        let has_subcommands = !spec.subcommands.is_empty();
        let (mut flags, params) = Spec::<A>::declared().connect(&mut record, !has_subcommands)?;

        let help = Rc::new(Cell::new(false));
        flags.insert(
            Some("help"),
            Some('h'),
            &format!("show help for {}", spec.name),
            Binding::owned(HelpFlag(help.clone())),
            &mut record,
        )?;

        debug!(
            command = %spec.name,
            flags = flags.len(),
            params = params.len(),
            subcommands = spec.subcommands.len(),
            "built command"
        );

        let out: Output = Rc::new(RefCell::new(io::stdout()));
        let mut cmd = Self {
            name: spec.name,
            short: spec.short,
            long: spec.long,
            error_handling: spec.error_handling,
            flags,
            params,
            help,
            action: spec.action,
            subcommands: spec.subcommands,
            record,
            out,
        };
        let out = cmd.out.clone();
        cmd.share_output(out);
        Ok(cmd)
    }
}

impl<A: Default + Arguments> Command<A> {
    /// Build a command over a default record
    pub fn with_default(spec: CommandSpec<A>) -> SpecResult<Self> {
        Self::new(spec, A::default())
    }
}

impl<A> Command<A> {
    /// Command name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configuration record
    pub fn record(&self) -> &A {
        &self.record
    }

    /// The configuration record, mutably
    pub fn record_mut(&mut self) -> &mut A {
        &mut self.record
    }

    /// Give up the command and keep the record
    pub fn into_record(self) -> A {
        self.record
    }

    /// The command's flags, including `--help`
    pub fn flags(&self) -> &FlagSet<A> {
        &self.flags
    }

    /// The command's positional parameters
    pub fn params(&self) -> &ParamSet<A> {
        &self.params
    }

    /// The error policy used by `run`
    pub fn error_handling(&self) -> ErrorHandling {
        self.error_handling
    }

    /// Write usage and errors to `out` instead of standard output
    pub fn set_output<W: Write + 'static>(&mut self, out: W) {
        self.share_output(Rc::new(RefCell::new(out)));
    }

    fn share_output(&mut self, out: Output) {
        for sub in &mut self.subcommands {
            sub.share_output(out.clone());
        }
        self.out = out;
    }

    /// Parse `args` and run the command, returning the first error.
    ///
    /// `--help` prints usage and skips everything else.
    pub fn run_error(&mut self, args: &[String]) -> CommandResult<()> {
        info!(command = %self.name, args = args.len(), "running command");
        self.help.set(false);

        let first = self.flags.parse(&mut self.record, args)?;
        if self.help.get() {
            self.print_usage();
            return Ok(());
        }
        let rest = &args[first..];

        if self.subcommands.is_empty() {
            self.params.parse(&mut self.record, rest)?;
            self.prepare()?;
            return self.run_action();
        }

        let used = self.params.parse_prefix(&mut self.record, rest)?;
        let (selected, sub_args) = rest[used..]
            .split_first()
            .ok_or(ParseError::TooFewArguments)?;
        let index = self
            .subcommands
            .iter()
            .position(|sub| sub.name() == selected.as_str())
            .ok_or_else(|| ParseError::UnknownCommand {
                name: selected.clone(),
                parent: self.name.clone(),
            })?;

        self.prepare()?;
        self.run_action()?;
        debug!(command = %self.name, subcommand = %selected, "dispatching");
        let sub = &mut self.subcommands[index];
        match sub.run_error(sub_args) {
            Err(err) if err.as_parse().is_some() && err.usage().is_none() => {
                Err(CommandError::Subcommand {
                    command: sub.name().to_string(),
                    usage: sub.usage(),
                    source: Box::new(err),
                })
            }
            result => result,
        }
    }

    /// Parse `args` and run the command, applying the error policy.
    pub fn run(&mut self, args: &[String]) -> CommandResult<()> {
        let err = match self.run_error(args) {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };

        self.report(&err);
        match self.error_handling {
            ErrorHandling::ContinueOnError => Err(err),
            ErrorHandling::ExitOnError => std::process::exit(2),
            ErrorHandling::PanicOnError => panic!("{}", err),
        }
    }

    /// Run with the process arguments, minus the program name
    pub fn run_env(&mut self) -> CommandResult<()> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        self.run(&args)
    }

    fn report(&self, err: &CommandError) {
        let mut out = self.out.borrow_mut();
        // Nowhere left to report a failing writer.
        let _ = writeln!(out, "Error: {}.", err);
        if err.as_parse().is_none() {
            return;
        }
        let _ = writeln!(out);
        match err.usage() {
            Some(usage) => {
                let _ = out.write_all(usage.as_bytes());
            }
            None => {
                drop(out);
                self.print_usage();
            }
        }
    }

    fn prepare(&mut self) -> ParseResult<()> {
        self.flags.prepare(&mut self.record)?;
        self.params.prepare(&mut self.record)
    }

    fn run_action(&mut self) -> CommandResult<()> {
        if let Some(action) = &mut self.action {
            action(&mut self.record).map_err(|e| CommandError::Action(format!("{:#}", e)))?;
        }
        Ok(())
    }

    fn print_usage(&self) {
        let mut out = self.out.borrow_mut();
        let _ = self.write_usage(&mut *out);
    }
}

impl<A> Subcommand for Command<A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn short_description(&self) -> &str {
        &self.short
    }

    fn run_error(&mut self, args: &[String]) -> CommandResult<()> {
        Command::run_error(self, args)
    }

    fn share_output(&mut self, out: Output) {
        Command::share_output(self, out)
    }

    fn usage(&self) -> String {
        Command::usage(self)
    }
}
