//! File-backed values
//!
//! [`InFile`] and [`OutFile`] take a file name on the command line and open
//! it after parsing has finished, in the prepare pass. A flag must start out
//! with either an open stream (`InFile::stdin()`, `OutFile::stdout()`) or a
//! default file name; a positional parameter always gets its name from the
//! command line.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use tracing::debug;

use super::Value;
use crate::error::{ParseError, ParseResult, SpecError, SpecResult};

enum Input {
    Stdin(io::Stdin),
    File(File),
}

enum Output {
    Stdout(io::Stdout),
    Stderr(io::Stderr),
    File(File),
}

fn not_open(name: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotConnected,
        format!("file \"{}\" has not been opened", name),
    )
}

fn open_error(name: &str, err: io::Error) -> ParseError {
    ParseError::rejected(format!("couldn't open file {}: {}", name, err))
}

/// A readable file argument.
#[derive(Default)]
pub struct InFile {
    name: String,
    input: Option<Input>,
}

impl InFile {
    /// Read from standard input unless a file name is given
    pub fn stdin() -> Self {
        Self {
            name: String::new(),
            input: Some(Input::Stdin(io::stdin())),
        }
    }

    /// Read from `name` unless another file name is given
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            input: None,
        }
    }

    /// The file name, empty for standard input
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True once a stream is attached
    pub fn is_open(&self) -> bool {
        self.input.is_some()
    }

    /// Open the named file now
    pub fn open(&mut self) -> ParseResult<()> {
        let file = File::open(Path::new(&self.name)).map_err(|e| open_error(&self.name, e))?;
        debug!(file = %self.name, "opened input file");
        self.input = Some(Input::File(file));
        Ok(())
    }

    /// Drop the stream; files are closed
    pub fn close(&mut self) {
        self.input = None;
    }
}

impl Value for InFile {
    fn set(&mut self, token: &str) -> ParseResult<()> {
        token.clone_into(&mut self.name);
        self.input = None;
        Ok(())
    }

    fn render(&self) -> String {
        match self.input {
            Some(Input::Stdin(_)) => "stdin".to_string(),
            _ => format!("\"{}\"", self.name),
        }
    }

    fn validate(&self, is_flag: bool) -> SpecResult<()> {
        if !is_flag || self.input.is_some() || !self.name.is_empty() {
            return Ok(());
        }
        Err(SpecError::invalid("infile does not have a valid default"))
    }

    fn prepare(&mut self) -> ParseResult<()> {
        if self.input.is_some() {
            return Ok(());
        }
        self.open()
    }
}

impl Read for InFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.input {
            Some(Input::Stdin(stdin)) => stdin.read(buf),
            Some(Input::File(file)) => file.read(buf),
            None => Err(not_open(&self.name)),
        }
    }
}

/// A writable file argument.
#[derive(Default)]
pub struct OutFile {
    name: String,
    output: Option<Output>,
}

impl OutFile {
    /// Write to standard output unless a file name is given
    pub fn stdout() -> Self {
        Self {
            name: String::new(),
            output: Some(Output::Stdout(io::stdout())),
        }
    }

    /// Write to standard error unless a file name is given
    pub fn stderr() -> Self {
        Self {
            name: String::new(),
            output: Some(Output::Stderr(io::stderr())),
        }
    }

    /// Write to `name` unless another file name is given
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            output: None,
        }
    }

    /// The file name, empty for the standard streams
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True once a stream is attached
    pub fn is_open(&self) -> bool {
        self.output.is_some()
    }

    /// Create (or truncate) the named file now
    pub fn open(&mut self) -> ParseResult<()> {
        let file = File::create(Path::new(&self.name)).map_err(|e| open_error(&self.name, e))?;
        debug!(file = %self.name, "created output file");
        self.output = Some(Output::File(file));
        Ok(())
    }

    /// Flush and drop the stream; files are closed
    pub fn close(&mut self) -> io::Result<()> {
        let result = self.flush();
        self.output = None;
        result
    }
}

impl Value for OutFile {
    fn set(&mut self, token: &str) -> ParseResult<()> {
        token.clone_into(&mut self.name);
        self.output = None;
        Ok(())
    }

    fn render(&self) -> String {
        match self.output {
            Some(Output::Stdout(_)) => "stdout".to_string(),
            Some(Output::Stderr(_)) => "stderr".to_string(),
            _ => format!("\"{}\"", self.name),
        }
    }

    fn validate(&self, is_flag: bool) -> SpecResult<()> {
        if !is_flag || self.output.is_some() || !self.name.is_empty() {
            return Ok(());
        }
        Err(SpecError::invalid("outfile does not have a valid default"))
    }

    fn prepare(&mut self) -> ParseResult<()> {
        if self.output.is_some() {
            return Ok(());
        }
        self.open()
    }
}

impl Write for OutFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.output {
            Some(Output::Stdout(out)) => out.write(buf),
            Some(Output::Stderr(err)) => err.write(buf),
            Some(Output::File(file)) => file.write(buf),
            None => Err(not_open(&self.name)),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.output {
            Some(Output::Stdout(out)) => out.flush(),
            Some(Output::Stderr(err)) => err.flush(),
            Some(Output::File(file)) => file.flush(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render() {
        assert_eq!(InFile::stdin().render(), "stdin");
        assert_eq!(InFile::named("in.txt").render(), "\"in.txt\"");
        assert_eq!(OutFile::stdout().render(), "stdout");
        assert_eq!(OutFile::stderr().render(), "stderr");
        assert_eq!(OutFile::named("out.txt").render(), "\"out.txt\"");
    }

    #[test]
    fn test_validate_defaults() {
        assert!(InFile::stdin().validate(true).is_ok());
        assert!(InFile::named("x").validate(true).is_ok());
        assert!(InFile::default().validate(false).is_ok());
        assert_eq!(
            InFile::default().validate(true).unwrap_err().to_string(),
            "infile does not have a valid default"
        );
        assert_eq!(
            OutFile::default().validate(true).unwrap_err().to_string(),
            "outfile does not have a valid default"
        );
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.txt");
        let path = path.to_str().unwrap();

        let mut out = OutFile::stdout();
        out.set(path).unwrap();
        assert!(!out.is_open());
        out.prepare().unwrap();
        out.write_all(b"hello").unwrap();
        out.close().unwrap();

        let mut input = InFile::stdin();
        input.set(path).unwrap();
        input.prepare().unwrap();
        let mut text = String::new();
        input.read_to_string(&mut text).unwrap();
        assert_eq!(text, "hello");
        assert_eq!(input.name(), path);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");
        let path = path.to_str().unwrap();

        let mut input = InFile::named(path);
        let err = input.prepare().unwrap_err();
        assert!(err
            .to_string()
            .starts_with(&format!("couldn't open file {}:", path)));

        let mut buf = [0u8; 4];
        assert!(input.read(&mut buf).is_err());
    }
}
