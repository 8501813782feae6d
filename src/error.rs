//! Error types for command specification and parsing
//!
//! Two families of errors exist. [`SpecError`] reports a malformed command
//! specification and is raised while a command is being built. [`ParseError`]
//! reports a problem with the command line itself and is always returned to
//! the caller, who decides whether to print it, exit, or retry.

use thiserror::Error;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for specification (build-time) operations
pub type SpecResult<T> = Result<T, SpecError>;

/// Result type for running a command
pub type CommandResult<T> = Result<T, CommandError>;

/// Errors raised while parsing a command line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A token that looks like a flag but cannot be one
    #[error("bad flag syntax: {0}")]
    BadSyntax(String),

    /// The flag (with its dashes) is not part of the flag set
    #[error("flag provided but not defined: {0}")]
    UndefinedFlag(String),

    /// A flag that requires a value got none
    #[error("flag {0} needs an argument")]
    MissingArgument(String),

    /// A flag that never takes a value got one inline
    #[error("flag {flag} does not take an argument (got \"{value}\")")]
    UnexpectedArgument {
        /// Flag with its dashes
        flag: String,
        /// The inline value that was given
        value: String,
    },

    /// The value of a flag rejected its token
    #[error("parsing flag {flag}: {source}")]
    FlagValue {
        /// Flag with its dashes
        flag: String,
        /// Why the value was rejected
        source: Box<ParseError>,
    },

    /// A flag inside a run of short flags rejected its implicit token
    #[error("evaluating flag {flag}: {source}")]
    FlagRun {
        /// Flag with its dash
        flag: String,
        /// Why the value was rejected
        source: Box<ParseError>,
    },

    /// Fewer positional arguments than the parameters need
    #[error("too few arguments")]
    TooFewArguments,

    /// More positional arguments than there are parameters
    #[error("too many arguments")]
    TooManyArguments,

    /// A fixed positional parameter rejected its token
    #[error("error parsing parameter {name}='{token}': {source}")]
    Param {
        /// Parameter name
        name: String,
        /// The offending token
        token: String,
        /// Why the value was rejected
        source: Box<ParseError>,
    },

    /// The variadic parameter rejected its tokens
    #[error("error parsing parameters {name}='[{}]': {source}", .tokens.join(" "))]
    Variadic {
        /// Parameter name
        name: String,
        /// All tokens handed to the variadic parameter
        tokens: Vec<String>,
        /// Why the values were rejected
        source: Box<ParseError>,
    },

    /// A token could not be converted to the target type
    #[error("argument \"{token}\" cannot be parsed as {type_name}")]
    InvalidValue {
        /// The offending token
        token: String,
        /// Name of the target type
        type_name: &'static str,
    },

    /// A custom value or callback refused the token
    #[error("{0}")]
    Rejected(String),

    /// Preparing a flag's value after parsing failed
    #[error("error in flag {flag}: {source}")]
    PrepareFlag {
        /// Flag names as shown in usage, e.g. `-f,--flag`
        flag: String,
        /// What went wrong
        source: Box<ParseError>,
    },

    /// Preparing a positional value after parsing failed
    #[error("error in argument {name}: {source}")]
    PrepareArgument {
        /// Parameter name
        name: String,
        /// What went wrong
        source: Box<ParseError>,
    },

    /// The sub-command named on the command line does not exist
    #[error("'{name}' is not a valid command for {parent}")]
    UnknownCommand {
        /// Name given on the command line
        name: String,
        /// Name of the menu command
        parent: String,
    },
}

impl ParseError {
    /// Create a rejection with a free-form message
    pub fn rejected<S: Into<String>>(msg: S) -> Self {
        Self::Rejected(msg.into())
    }

    /// Create a conversion failure for `token` and the target type name
    pub fn invalid_value<S: Into<String>>(token: S, type_name: &'static str) -> Self {
        Self::InvalidValue {
            token: token.into(),
            type_name,
        }
    }

    /// Wrap a value error for a flag whose own token was rejected
    pub(crate) fn flag_value(flag: String, source: ParseError) -> Self {
        Self::FlagValue {
            flag,
            source: Box::new(source),
        }
    }

    /// Wrap a value error for a non-final flag of a short run
    pub(crate) fn flag_run(flag: String, source: ParseError) -> Self {
        Self::FlagRun {
            flag,
            source: Box::new(source),
        }
    }
}

impl From<anyhow::Error> for ParseError {
    fn from(err: anyhow::Error) -> Self {
        // Callbacks may return our own error through anyhow; keep it intact.
        match err.downcast::<ParseError>() {
            Ok(inner) => inner,
            Err(other) => ParseError::Rejected(format!("{:#}", other)),
        }
    }
}

/// Errors in a command specification, detected while building a command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// Two flags share a long or short name
    #[error("flag {0} is defined more than once")]
    DuplicateFlag(String),

    /// A flag was declared with neither a long nor a short name
    #[error("a flag must have a long or a short name")]
    UnnamedFlag,

    /// Two sub-commands share a name
    #[error("subcommand {0} is defined more than once")]
    DuplicateSubcommand(String),

    /// A callback field holds no function
    #[error("callbacks cannot be nil")]
    NilCallback,

    /// A callback's shape does not fit the role it is bound to
    #[error("incorrect signature for callbacks: \"{0}\"")]
    CallbackSignature(&'static str),

    /// More than one variadic parameter was declared
    #[error("a command spec cannot contain more than one variadic parameter")]
    MultipleVariadic,

    /// A variadic parameter was declared on a command with sub-commands
    #[error("a command with subcommands cannot have variadic parameters")]
    VariadicWithSubcommands,

    /// A value refused its default configuration
    #[error("{0}")]
    Invalid(String),
}

impl SpecError {
    /// Create a validation error with context
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Self::Invalid(msg.into())
    }
}

/// Errors returned from running a command
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command line could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The command's action failed
    #[error("{0}")]
    Action(String),

    /// A sub-command could not parse its own arguments
    #[error("{source}")]
    Subcommand {
        /// Name of the sub-command that failed
        command: String,
        /// The sub-command's usage text
        usage: String,
        /// The sub-command's error
        source: Box<CommandError>,
    },
}

impl CommandError {
    /// The parse error, if this is one
    pub fn as_parse(&self) -> Option<&ParseError> {
        match self {
            CommandError::Parse(err) => Some(err),
            CommandError::Action(_) => None,
            CommandError::Subcommand { source, .. } => source.as_parse(),
        }
    }

    /// Usage of the innermost sub-command that failed to parse
    pub fn usage(&self) -> Option<&str> {
        match self {
            CommandError::Subcommand { usage, source, .. } => {
                source.usage().or(Some(usage.as_str()))
            }
            _ => None,
        }
    }
}
