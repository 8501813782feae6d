//! Command integration tests
//!
//! These tests drive commands through the public API only, the way a
//! program would: declare a record, build a command, feed it tokens.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use cmdspec::prelude::*;

/// In-memory output shared with the command under test
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn tokens(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

#[derive(Default)]
struct Settings {
    aa: i64,
    bb: bool,
    ratio: f64,
    level: Choice,
    target: String,
    extra: Vec<u16>,
}

impl Arguments for Settings {
    fn declare(spec: &mut Spec<Self>) {
        spec.flag("aa", |s| &mut s.aa).short('a').descr("an a");
        spec.flag("bb", |s| &mut s.bb).short('b').descr("a b");
        spec.flag("ratio", |s| &mut s.ratio).descr("a ratio");
        spec.flag("level", |s| &mut s.level).short('l').descr("log level");
        spec.param("target", |s| &mut s.target).descr("where to go");
        spec.variadic("extra", |s| &mut s.extra).descr("extra ports");
    }
}

fn settings_command() -> Command<Settings> {
    let record = Settings {
        ratio: 0.5,
        level: Choice::new("info", ["debug", "info", "warn"]),
        ..Default::default()
    };
    let spec = CommandSpec::new("settings").error_handling(ErrorHandling::ContinueOnError);
    Command::new(spec, record).unwrap()
}

/// Test the canonical long-flag plus bool-flag command line
#[test]
fn test_long_and_short_flags() {
    let mut cmd = settings_command();
    cmd.run_error(&tokens(&["--aa=5", "-b", "home"])).unwrap();

    let s = cmd.record();
    assert_eq!(s.aa, 5);
    assert!(s.bb);
    assert_eq!(s.ratio, 0.5);
    assert_eq!(s.level.choice, "info");
    assert_eq!(s.target, "home");
    assert!(s.extra.is_empty());
}

/// Test that a short run hands the next token to its last flag
#[test]
fn test_short_run() {
    let mut cmd = settings_command();
    cmd.run_error(&tokens(&["-bl", "warn", "x", "80", "443"])).unwrap();

    let s = cmd.record();
    assert!(s.bb);
    assert_eq!(s.level.choice, "warn");
    assert_eq!(s.target, "x");
    assert_eq!(s.extra, [80, 443]);
}

/// Test that `--` ends flag parsing so dashed tokens become positionals
#[test]
fn test_double_dash() {
    let mut cmd = settings_command();
    cmd.run_error(&tokens(&["--ratio", "2.5", "--", "-b"])).unwrap();

    let s = cmd.record();
    assert_eq!(s.ratio, 2.5);
    assert!(!s.bb);
    assert_eq!(s.target, "-b");
}

/// Test the error text for common command-line mistakes
#[test]
fn test_parse_errors() {
    let cases: &[(&[&str], &str)] = &[
        (&["--zz", "x"], "flag provided but not defined: --zz"),
        (&["-z", "x"], "flag provided but not defined: -z"),
        (&["---aa", "x"], "bad flag syntax: ---aa"),
        (&["--aa"], "flag --aa needs an argument"),
        (&["--aa", "-3", "x"], "flag --aa needs an argument"),
        (&["--aa=many", "x"], "parsing flag --aa: argument \"many\" cannot be parsed as i64"),
        (
            &["-l", "loud", "x"],
            "parsing flag -l: loud is not a valid choice, must be in {debug,info,warn}",
        ),
        (&[], "too few arguments"),
        (
            &["x", "80", "http"],
            "error parsing parameters extra='[80 http]': argument \"http\" cannot be parsed as u16",
        ),
    ];

    for (args, expected) in cases {
        let mut cmd = settings_command();
        let err = cmd.run_error(&tokens(args)).unwrap_err();
        assert_eq!(err.to_string(), *expected, "args: {:?}", args);
        assert!(err.as_parse().is_some());
    }
}

/// Test that negative numbers pass with an inline value
#[test]
fn test_inline_negative_value() {
    let mut cmd = settings_command();
    cmd.run_error(&tokens(&["--aa=-3", "x"])).unwrap();
    assert_eq!(cmd.record().aa, -3);
}

/// Test the usage message shown after a parse error
#[test]
fn test_error_report() {
    let buffer = SharedBuffer::default();
    let mut cmd = settings_command();
    cmd.set_output(buffer.clone());

    assert!(cmd.run(&tokens(&["--nope"])).is_err());
    let text = buffer.text();
    assert!(text.starts_with(
        "Error: flag provided but not defined: --nope.\n\nUsage: settings [flags] target extra\n"
    ));
    assert!(text.contains("  -l,--level {debug,info,warn}\n\tlog level (default info)\n"));
    assert!(text.contains("  --ratio value\n\ta ratio (default 0.5)\n"));
    assert!(text.contains("Arguments:\n  target\n\twhere to go\n  extra\n\textra ports\n"));
}

#[derive(Default)]
struct Root {
    verbose: bool,
}

impl Arguments for Root {
    fn declare(spec: &mut Spec<Self>) {
        spec.flag("verbose", |r| &mut r.verbose).short('v').descr("say more");
    }
}

#[derive(Default)]
struct Sum {
    terms: Vec<i64>,
}

impl Arguments for Sum {
    fn declare(spec: &mut Spec<Self>) {
        spec.variadic("terms", |s| &mut s.terms).descr("numbers to add").min(1);
    }
}

#[derive(Default)]
struct Echo {
    upper: bool,
    text: String,
}

impl Arguments for Echo {
    fn declare(spec: &mut Spec<Self>) {
        spec.flag("upper", |e| &mut e.upper).short('u').descr("shout");
        spec.param("text", |e| &mut e.text).descr("what to say");
    }
}

fn tool(log: Rc<RefCell<Vec<String>>>) -> Command<Root> {
    let sum_log = log.clone();
    let sum = CommandSpec::new("sum")
        .short("add numbers")
        .action(move |s: &mut Sum| {
            let total: i64 = s.terms.iter().sum();
            sum_log.borrow_mut().push(format!("sum {}", total));
            Ok(())
        });

    let echo_log = log.clone();
    let echo = CommandSpec::new("echo")
        .short("repeat text")
        .action(move |e: &mut Echo| {
            let text = if e.upper { e.text.to_uppercase() } else { e.text.clone() };
            echo_log.borrow_mut().push(text);
            Ok(())
        });

    let spec = CommandSpec::new("tool")
        .short("a tool with sub-commands")
        .error_handling(ErrorHandling::ContinueOnError)
        .subcommand(Command::<Sum>::with_default(sum).unwrap())
        .subcommand(Command::<Echo>::with_default(echo).unwrap())
        .action(move |r: &mut Root| {
            log.borrow_mut().push(format!("tool verbose={}", r.verbose));
            Ok(())
        });
    Command::with_default(spec).unwrap()
}

/// Test dispatch to sub-commands with different record types
#[test]
fn test_menu_dispatch() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut cmd = tool(log.clone());

    cmd.run_error(&tokens(&["-v", "sum", "1", "2", "3"])).unwrap();
    cmd.run_error(&tokens(&["echo", "-u", "hi"])).unwrap();

    assert_eq!(
        *log.borrow(),
        ["tool verbose=true", "sum 6", "tool verbose=true", "HI"]
    );
}

/// Test menu errors
#[test]
fn test_menu_errors() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut cmd = tool(log.clone());

    let err = cmd.run_error(&tokens(&["mult", "2"])).unwrap_err();
    assert_eq!(err.to_string(), "'mult' is not a valid command for tool");

    let err = cmd.run_error(&tokens(&["sum"])).unwrap_err();
    assert_eq!(err.to_string(), "too few arguments");

    let err = cmd.run_error(&tokens(&["sum", "1", "x"])).unwrap_err();
    assert_eq!(
        err.to_string(),
        "error parsing parameters terms='[1 x]': argument \"x\" cannot be parsed as i64"
    );

    // The menu's own action ran before each failing sub-command.
    assert_eq!(log.borrow().len(), 2);
}

/// Test that a failing sub-command reports its own usage
#[test]
fn test_subcommand_error_report() {
    let buffer = SharedBuffer::default();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut cmd = tool(log);
    cmd.set_output(buffer.clone());

    assert!(cmd.run(&tokens(&["sum", "1", "x"])).is_err());
    let text = buffer.text();
    assert!(text.starts_with(
        "Error: error parsing parameters terms='[1 x]': argument \"x\" cannot be parsed as i64.\n\n\
         Usage: sum [flags]"
    ));
    assert!(text.contains("  terms\n\tnumbers to add\n"));
    assert!(!text.contains("Usage: tool"));
}

/// Test the menu's usage message
#[test]
fn test_menu_help() {
    let buffer = SharedBuffer::default();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut cmd = tool(log.clone());
    cmd.set_output(buffer.clone());

    cmd.run(&tokens(&["--help"])).unwrap();
    let text = buffer.text();
    assert!(text.starts_with("Usage: tool [flags] cmd ...\n\na tool with sub-commands\n\n"));
    assert!(text.ends_with("Commands:\n  echo\n\trepeat text\n  sum\n\tadd numbers\n\n"));
    assert!(log.borrow().is_empty());
}
