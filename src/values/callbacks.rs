//! Callback values
//!
//! A [`Callback`] lets a plain closure stand in for a value. The shape of
//! the closure is picked explicitly through a constructor, so there is no
//! signature detection at runtime:
//!
//! | constructor        | closure                                   | binds to      |
//! |--------------------|-------------------------------------------|---------------|
//! | `action`           | `FnMut()`                                 | flag          |
//! | `try_action`       | `FnMut() -> CallbackResult`               | flag          |
//! | `action_with`      | `FnMut(&mut A)`                           | flag          |
//! | `try_action_with`  | `FnMut(&mut A) -> CallbackResult`         | flag          |
//! | `text`             | `FnMut(&str) -> CallbackResult`           | flag, param   |
//! | `text_with`        | `FnMut(&str, &mut A) -> CallbackResult`   | flag, param   |
//! | `list`             | `FnMut(&[String]) -> CallbackResult`      | variadic      |
//! | `list_with`        | `FnMut(&[String], &mut A) -> CallbackResult` | variadic   |
//!
//! The `_with` variants receive the configuration record that owns the
//! callback, so one flag can change how later flags behave.

use std::fmt;

use super::ArgumentMode;

/// What a callback returns. Any error type that converts into
/// [`anyhow::Error`] can be returned with `?`.
pub type CallbackResult = anyhow::Result<()>;

type ActionFn<A> = Box<dyn FnMut(&mut A) -> CallbackResult>;
type TextFn<A> = Box<dyn FnMut(&str, &mut A) -> CallbackResult>;
type ListFn<A> = Box<dyn FnMut(&[String], &mut A) -> CallbackResult>;

/// A closure bound to a flag or parameter, over configuration record `A`.
pub enum Callback<A> {
    /// No function installed; fails validation
    Unset,

    /// Called without a token; the flag takes no argument
    Action(ActionFn<A>),

    /// Called with a single token
    Text(TextFn<A>),

    /// Called with all remaining positional tokens
    List(ListFn<A>),
}

impl<A> Callback<A> {
    /// A flag that runs `f` every time it appears
    pub fn action<F>(mut f: F) -> Self
    where
        F: FnMut() + 'static,
    {
        Self::Action(Box::new(move |_: &mut A| {
            f();
            Ok(())
        }))
    }

    /// Like [`Callback::action`], but the closure may fail
    pub fn try_action<F>(mut f: F) -> Self
    where
        F: FnMut() -> CallbackResult + 'static,
    {
        Self::Action(Box::new(move |_: &mut A| f()))
    }

    /// A flag that runs `f` on the configuration record
    pub fn action_with<F>(mut f: F) -> Self
    where
        F: FnMut(&mut A) + 'static,
    {
        Self::Action(Box::new(move |record: &mut A| {
            f(record);
            Ok(())
        }))
    }

    /// Like [`Callback::action_with`], but the closure may fail
    pub fn try_action_with<F>(f: F) -> Self
    where
        F: FnMut(&mut A) -> CallbackResult + 'static,
    {
        Self::Action(Box::new(f))
    }

    /// A flag or parameter that hands its token to `f`
    pub fn text<F>(mut f: F) -> Self
    where
        F: FnMut(&str) -> CallbackResult + 'static,
    {
        Self::Text(Box::new(move |token: &str, _: &mut A| f(token)))
    }

    /// Like [`Callback::text`], with the configuration record
    pub fn text_with<F>(f: F) -> Self
    where
        F: FnMut(&str, &mut A) -> CallbackResult + 'static,
    {
        Self::Text(Box::new(f))
    }

    /// A variadic parameter that hands all its tokens to `f`
    pub fn list<F>(mut f: F) -> Self
    where
        F: FnMut(&[String]) -> CallbackResult + 'static,
    {
        Self::List(Box::new(move |tokens: &[String], _: &mut A| f(tokens)))
    }

    /// Like [`Callback::list`], with the configuration record
    pub fn list_with<F>(f: F) -> Self
    where
        F: FnMut(&[String], &mut A) -> CallbackResult + 'static,
    {
        Self::List(Box::new(f))
    }

    /// True when no function is installed
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// The closure shape, as reported in signature errors
    pub fn signature(&self) -> &'static str {
        match self {
            Self::Unset => "nil",
            Self::Action(_) => "fn() -> Result",
            Self::Text(_) => "fn(&str) -> Result",
            Self::List(_) => "fn(&[String]) -> Result",
        }
    }

    /// Argument mode when bound to a flag
    pub fn mode(&self) -> ArgumentMode {
        match self {
            Self::Action(_) => ArgumentMode::NoArgument,
            _ => ArgumentMode::Required,
        }
    }

    /// Invoke a single-token callback. Actions ignore the token.
    pub(crate) fn call(&mut self, token: &str, record: &mut A) -> CallbackResult {
        match self {
            Self::Action(f) => f(record),
            Self::Text(f) => f(token, record),
            Self::List(_) | Self::Unset => {
                anyhow::bail!("incorrect signature for callbacks: \"{}\"", self.signature())
            }
        }
    }

    /// Invoke a list callback.
    pub(crate) fn call_list(&mut self, tokens: &[String], record: &mut A) -> CallbackResult {
        match self {
            Self::List(f) => f(tokens, record),
            _ => anyhow::bail!("incorrect signature for callbacks: \"{}\"", self.signature()),
        }
    }
}

impl<A> Default for Callback<A> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<A> fmt::Debug for Callback<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({})", self.signature())
    }
}
