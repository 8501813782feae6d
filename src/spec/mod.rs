//! Spec connector
//!
//! A configuration record describes what a command accepts by implementing
//! [`Arguments`]. Its `declare` function lists the record's flags and
//! positional parameters on a [`Spec`]; [`Spec::connect`] then resolves every
//! declaration into a [`FlagSet`] and a [`ParamSet`] bound to the record.
//!
//! ```
//! use cmdspec::spec::{Arguments, Spec};
//!
//! #[derive(Default)]
//! struct Args {
//!     verbose: bool,
//!     count: u32,
//!     files: Vec<String>,
//! }
//!
//! impl Arguments for Args {
//!     fn declare(spec: &mut Spec<Self>) {
//!         spec.flag("verbose", |a| &mut a.verbose).short('v').descr("chatty output");
//!         spec.param("count", |a| &mut a.count).descr("how many");
//!         spec.variadic("files", |a| &mut a.files).min(1).descr("input files");
//!     }
//! }
//!
//! let mut args = Args::default();
//! let (mut flags, mut params) = Spec::<Args>::declared().connect(&mut args, true).unwrap();
//! let tokens: Vec<String> = ["-v", "3", "a.txt"].iter().map(|s| s.to_string()).collect();
//! let first = flags.parse(&mut args, &tokens).unwrap();
//! params.parse(&mut args, &tokens[first..]).unwrap();
//! assert!(args.verbose);
//! assert_eq!(args.count, 3);
//! assert_eq!(args.files, vec!["a.txt"]);
//! ```

use tracing::debug;

use crate::bind::{Binding, VariadicBinding};
use crate::error::{SpecError, SpecResult};
use crate::flags::FlagSet;
use crate::params::ParamSet;
use crate::values::{Callback, Value, VariadicValue};

/// A configuration record that can be bound to a command line
pub trait Arguments: Sized + 'static {
    /// List the record's flags and parameters, in order
    fn declare(spec: &mut Spec<Self>);
}

impl Arguments for () {
    fn declare(_spec: &mut Spec<Self>) {}
}

enum Target<A> {
    Flag(Binding<A>),
    Param(Binding<A>),
    Variadic(VariadicBinding<A>),
}

/// One declared flag or parameter; configure it with the builder methods
pub struct Decl<A> {
    name: String,
    short: Option<char>,
    descr: String,
    min: usize,
    target: Target<A>,
}

impl<A> Decl<A> {
    fn new(name: &str, target: Target<A>) -> Self {
        Self {
            name: name.to_string(),
            short: None,
            descr: String::new(),
            min: 0,
            target,
        }
    }

    /// Single-character alias for a flag
    pub fn short(&mut self, short: char) -> &mut Self {
        self.short = Some(short);
        self
    }

    /// Description shown in usage
    pub fn descr<S: Into<String>>(&mut self, descr: S) -> &mut Self {
        self.descr = descr.into();
        self
    }

    /// Minimum number of tokens for a variadic parameter
    pub fn min(&mut self, min: usize) -> &mut Self {
        self.min = min;
        self
    }
}

/// Declarations of a command's flags and parameters over record type `A`
pub struct Spec<A> {
    decls: Vec<Decl<A>>,
}

impl<A> Default for Spec<A> {
    fn default() -> Self {
        Self { decls: Vec::new() }
    }
}

impl<A: Arguments> Spec<A> {
    /// The declarations of `A`
    pub fn declared() -> Self {
        let mut spec = Self::default();
        A::declare(&mut spec);
        spec
    }
}

impl<A: 'static> Spec<A> {
    /// Create an empty spec
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, name: &str, target: Target<A>) -> &mut Decl<A> {
        self.decls.push(Decl::new(name, target));
        let last = self.decls.len() - 1;
        &mut self.decls[last]
    }

    /// A flag bound to a field. Use an empty name for a short-only flag.
    pub fn flag<T, F>(&mut self, name: &str, project: F) -> &mut Decl<A>
    where
        T: Value + 'static,
        F: Fn(&mut A) -> &mut T + 'static,
    {
        self.push(name, Target::Flag(Binding::field(project)))
    }

    /// A flag bound to a callback field
    pub fn flag_callback<F>(&mut self, name: &str, project: F) -> &mut Decl<A>
    where
        F: Fn(&mut A) -> &mut Callback<A> + 'static,
    {
        self.push(name, Target::Flag(Binding::callback(project)))
    }

    /// A flag with an arbitrary binding
    pub fn flag_binding(&mut self, name: &str, binding: Binding<A>) -> &mut Decl<A> {
        self.push(name, Target::Flag(binding))
    }

    /// A positional parameter bound to a field
    pub fn param<T, F>(&mut self, name: &str, project: F) -> &mut Decl<A>
    where
        T: Value + 'static,
        F: Fn(&mut A) -> &mut T + 'static,
    {
        self.push(name, Target::Param(Binding::field(project)))
    }

    /// A positional parameter bound to a callback field
    pub fn param_callback<F>(&mut self, name: &str, project: F) -> &mut Decl<A>
    where
        F: Fn(&mut A) -> &mut Callback<A> + 'static,
    {
        self.push(name, Target::Param(Binding::callback(project)))
    }

    /// A positional parameter with an arbitrary binding
    pub fn param_binding(&mut self, name: &str, binding: Binding<A>) -> &mut Decl<A> {
        self.push(name, Target::Param(binding))
    }

    /// The trailing variadic parameter, bound to a field
    pub fn variadic<T, F>(&mut self, name: &str, project: F) -> &mut Decl<A>
    where
        T: VariadicValue + 'static,
        F: Fn(&mut A) -> &mut T + 'static,
    {
        self.push(name, Target::Variadic(VariadicBinding::field(project)))
    }

    /// The trailing variadic parameter, bound to a list callback field
    pub fn variadic_callback<F>(&mut self, name: &str, project: F) -> &mut Decl<A>
    where
        F: Fn(&mut A) -> &mut Callback<A> + 'static,
    {
        self.push(name, Target::Variadic(VariadicBinding::callback(project)))
    }

    /// The trailing variadic parameter with an arbitrary binding
    pub fn variadic_binding(&mut self, name: &str, binding: VariadicBinding<A>) -> &mut Decl<A> {
        self.push(name, Target::Variadic(binding))
    }

    /// Number of declarations
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// True when nothing is declared
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Resolve all declarations against `record`.
    ///
    /// Declarations are registered in order; then every bound value is
    /// validated. Fails on the first problem. `allow_variadic` is false for
    /// commands with sub-commands, which need the trailing tokens.
    pub fn connect(
        self,
        record: &mut A,
        allow_variadic: bool,
    ) -> SpecResult<(FlagSet<A>, ParamSet<A>)> {
        debug!(declarations = self.decls.len(), "connecting spec");
        let mut flags = FlagSet::new();
        let mut params = ParamSet::new();

        for decl in self.decls {
            match decl.target {
                Target::Flag(binding) => {
                    let name = Some(decl.name.as_str());
                    flags.insert(name, decl.short, &decl.descr, binding, record)?;
                }
                Target::Param(binding) => {
                    params.insert(&decl.name, &decl.descr, binding, record)?;
                }
                Target::Variadic(binding) => {
                    if !allow_variadic {
                        return Err(SpecError::VariadicWithSubcommands);
                    }
                    params.insert_variadic(&decl.name, &decl.descr, decl.min, binding, record)?;
                }
            }
        }

        flags.validate(record)?;
        params.validate(record)?;
        Ok((flags, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::Choice;

    #[derive(Default)]
    struct Args {
        aa: i64,
        bb: bool,
        name: String,
        first: Vec<String>,
        second: Vec<i32>,
        hook: Callback<Args>,
        log: Vec<String>,
    }

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_connect_and_parse() {
        let mut spec = Spec::new();
        spec.flag("aa", |a: &mut Args| &mut a.aa).short('a').descr("an a");
        spec.flag("bb", |a: &mut Args| &mut a.bb).short('b').descr("a b");
        spec.param("name", |a: &mut Args| &mut a.name).descr("a name");

        let mut args = Args::default();
        let (mut flags, mut params) = spec.connect(&mut args, true).unwrap();
        assert_eq!(flags.len(), 2);
        assert_eq!(params.len(), 1);

        let input = tokens(&["--aa=5", "-b", "joe"]);
        let first = flags.parse(&mut args, &input).unwrap();
        params.parse(&mut args, &input[first..]).unwrap();
        assert_eq!(args.aa, 5);
        assert!(args.bb);
        assert_eq!(args.name, "joe");
    }

    #[test]
    fn test_two_variadics() {
        let mut spec = Spec::new();
        spec.variadic("first", |a: &mut Args| &mut a.first);
        spec.variadic("second", |a: &mut Args| &mut a.second);

        let err = spec.connect(&mut Args::default(), true).err().unwrap();
        assert!(err
            .to_string()
            .contains("more than one variadic parameter"));
    }

    #[test]
    fn test_variadic_with_subcommands() {
        let mut spec = Spec::new();
        spec.variadic("first", |a: &mut Args| &mut a.first);

        let err = spec.connect(&mut Args::default(), false).err().unwrap();
        assert_eq!(err, SpecError::VariadicWithSubcommands);
        assert_eq!(
            err.to_string(),
            "a command with subcommands cannot have variadic parameters"
        );
    }

    #[test]
    fn test_callback_errors() {
        let mut spec = Spec::new();
        spec.flag_callback("hook", |a: &mut Args| &mut a.hook);
        let err = spec.connect(&mut Args::default(), true).err().unwrap();
        assert_eq!(err.to_string(), "callbacks cannot be nil");

        let mut spec = Spec::new();
        spec.flag_callback("hook", |a: &mut Args| &mut a.hook);
        let mut args = Args {
            hook: Callback::list(|_| Ok(())),
            ..Default::default()
        };
        let err = spec.connect(&mut args, true).err().unwrap();
        assert_eq!(
            err.to_string(),
            "incorrect signature for callbacks: \"fn(&[String]) -> Result\""
        );
    }

    #[test]
    fn test_context_callback_changes_sibling() {
        let mut spec = Spec::new();
        spec.flag_callback("upper", |a: &mut Args| &mut a.hook);
        spec.param_binding(
            "word",
            Binding::owned_callback(Callback::text_with(|t, a: &mut Args| {
                a.log.push(t.to_string());
                Ok(())
            })),
        );

        let mut args = Args {
            hook: Callback::action_with(|a: &mut Args| a.name = "upper".to_string()),
            ..Default::default()
        };
        let (mut flags, mut params) = spec.connect(&mut args, true).unwrap();
        let input = tokens(&["--upper", "hi"]);
        let first = flags.parse(&mut args, &input).unwrap();
        params.parse(&mut args, &input[first..]).unwrap();
        assert_eq!(args.name, "upper");
        assert_eq!(args.log, vec!["hi"]);
    }

    #[cfg(feature = "files")]
    #[test]
    fn test_validation_runs_on_connect() {
        #[derive(Default)]
        struct Files {
            level: Choice,
            out: crate::values::OutFile,
        }

        let mut spec = Spec::new();
        spec.flag("level", |f: &mut Files| &mut f.level);
        spec.flag("out", |f: &mut Files| &mut f.out);
        let err = spec.connect(&mut Files::default(), true).err().unwrap();
        assert_eq!(err.to_string(), "outfile does not have a valid default");
    }

    #[test]
    fn test_duplicate_flag() {
        let mut spec = Spec::new();
        spec.flag("aa", |a: &mut Args| &mut a.aa);
        spec.flag("", |a: &mut Args| &mut a.bb).short('x');
        spec.flag("cc", |a: &mut Args| &mut a.name).short('x');
        let err = spec.connect(&mut Args::default(), true).err().unwrap();
        assert_eq!(err, SpecError::DuplicateFlag("x".to_string()));
    }

    #[test]
    fn test_unit_record() {
        let spec = Spec::<()>::declared();
        assert!(spec.is_empty());
        let (flags, params) = spec.connect(&mut (), false).unwrap();
        assert!(flags.is_empty());
        assert!(params.is_empty());
    }
}
