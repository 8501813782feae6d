//! Declarative command metadata
//!
//! Names, descriptions and the error policy of a command can live in a TOML
//! file next to the program instead of in code:
//!
//! ```toml
//! name = "calc"
//! short = "does calculations"
//! long = "A small calculator with one sub-command per operation."
//! error_handling = "continue_on_error"
//! ```
//!
//! Only the command's description is read this way. Flag and parameter
//! values always come from the command line.
//!
//! # Example
//!
//! ```
//! use cmdspec::command::{Command, CommandSpec};
//! use cmdspec::config::CommandInfo;
//!
//! let info = CommandInfo::from_toml_str("name = \"noop\"\nshort = \"does nothing\"").unwrap();
//! let cmd = Command::new(CommandSpec::from_info(info), ()).unwrap();
//! assert_eq!(cmd.name(), "noop");
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::command::{CommandSpec, ErrorHandling};
use crate::spec::Arguments;

/// Result type for loading command metadata
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading command metadata
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path of the file
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The text is not valid command metadata
    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Description of a command, as found in a configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInfo {
    /// Command name
    pub name: String,

    /// One-line description
    #[serde(default)]
    pub short: String,

    /// Longer description for the command's own usage
    #[serde(default)]
    pub long: String,

    /// What `Command::run` does with an error
    #[serde(default)]
    pub error_handling: ErrorHandling,
}

impl CommandInfo {
    /// Parse command metadata from TOML text
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let info: Self = toml::from_str(text)?;
        debug!(command = %info.name, "loaded command metadata");
        Ok(info)
    }

    /// Read command metadata from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

impl<A: Arguments> CommandSpec<A> {
    /// A command spec carrying the name, descriptions and error policy of `info`
    pub fn from_info(info: CommandInfo) -> Self {
        Self::new(info.name)
            .short(info.short)
            .long(info.long)
            .error_handling(info.error_handling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_info() {
        let info = CommandInfo::from_toml_str(
            r#"
            name = "calc"
            short = "does calculations"
            long = "A calculator."
            error_handling = "panic_on_error"
            "#,
        )
        .unwrap();

        assert_eq!(info.name, "calc");
        assert_eq!(info.short, "does calculations");
        assert_eq!(info.long, "A calculator.");
        assert_eq!(info.error_handling, ErrorHandling::PanicOnError);
    }

    #[test]
    fn test_defaults() {
        let info = CommandInfo::from_toml_str("name = \"bare\"").unwrap();
        assert_eq!(info.short, "");
        assert_eq!(info.long, "");
        assert_eq!(info.error_handling, ErrorHandling::ExitOnError);
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(
            CommandInfo::from_toml_str("short = \"no name\""),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            CommandInfo::from_toml_str("name = \"x\"\nerror_handling = \"sometimes\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = CommandInfo::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Failed to read config file /definitely/not/here.toml"));
    }

    #[test]
    fn test_spec_from_info() {
        let info = CommandInfo {
            name: "tool".to_string(),
            short: "a tool".to_string(),
            long: String::new(),
            error_handling: ErrorHandling::ContinueOnError,
        };
        let spec: CommandSpec<()> = CommandSpec::from_info(info);
        assert_eq!(spec.name(), "tool");

        let cmd = crate::command::Command::new(spec, ()).unwrap();
        assert_eq!(cmd.error_handling(), ErrorHandling::ContinueOnError);
        assert!(cmd.usage().contains("a tool"));
    }
}
