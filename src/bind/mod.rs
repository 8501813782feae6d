//! Binding resolver
//!
//! A [`Binding`] connects one flag or positional parameter to the place its
//! value lives. Flag and parameter sets never hold references into the
//! configuration record; they hold a projection `Fn(&mut A) -> &mut T` and
//! receive the record again whenever they parse, validate, or prepare. This
//! keeps the record owned by the caller (or by a `Command`) while the sets
//! are alive.
//!
//! Three kinds of slot exist behind a binding:
//!
//! - a field of the record implementing [`Value`] (`Binding::field`)
//! - a [`Callback`] field of the record (`Binding::callback`)
//! - a value owned by the binding itself (`Binding::owned`,
//!   `Binding::owned_callback`)

use std::marker::PhantomData;
use std::mem;

use tracing::trace;

use crate::error::{ParseResult, SpecError, SpecResult};
use crate::values::{ArgumentMode, Callback, Value, VariadicValue};

/// Where a binding is used; callbacks must have a shape that fits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// A named flag
    Flag,
    /// A fixed positional parameter
    Param,
    /// The trailing variadic parameter
    Variadic,
}

trait Slot<A> {
    fn set(&mut self, record: &mut A, token: &str) -> ParseResult<()>;
    fn render(&mut self, record: &mut A) -> String;
    fn mode(&mut self, record: &mut A) -> ArgumentMode;
    fn describe_argument(&mut self, record: &mut A, is_flag: bool, descr: &str) -> String;
    fn describe_value(&mut self, record: &mut A) -> Option<String>;
    fn resolve(&mut self, record: &mut A, role: Role) -> SpecResult<()>;
    fn validate(&mut self, record: &mut A, is_flag: bool) -> SpecResult<()>;
    fn prepare(&mut self, record: &mut A) -> ParseResult<()>;
}

trait VariadicSlot<A> {
    fn set_all(&mut self, record: &mut A, tokens: &[String]) -> ParseResult<()>;
    fn describe_argument(&mut self, record: &mut A, descr: &str) -> String;
    fn resolve(&mut self, record: &mut A) -> SpecResult<()>;
    fn validate(&mut self, record: &mut A) -> SpecResult<()>;
    fn prepare(&mut self, record: &mut A) -> ParseResult<()>;
}

/// Check that a callback exists and that its shape fits the role.
fn resolve_callback<A>(callback: &Callback<A>, role: Role) -> SpecResult<()> {
    let fits = match (callback, role) {
        (Callback::Unset, _) => return Err(SpecError::NilCallback),
        (Callback::Action(_), Role::Flag) => true,
        (Callback::Text(_), Role::Flag | Role::Param) => true,
        (Callback::List(_), Role::Variadic) => true,
        _ => false,
    };
    if fits {
        Ok(())
    } else {
        Err(SpecError::CallbackSignature(callback.signature()))
    }
}

fn check_set<A>(callback: &Callback<A>) -> SpecResult<()> {
    if callback.is_unset() {
        Err(SpecError::NilCallback)
    } else {
        Ok(())
    }
}

/// Field of the record that implements `Value`
struct FieldSlot<T, F> {
    project: F,
    _value: PhantomData<fn() -> T>,
}

impl<A, T, F> Slot<A> for FieldSlot<T, F>
where
    T: Value,
    F: Fn(&mut A) -> &mut T,
{
    fn set(&mut self, record: &mut A, token: &str) -> ParseResult<()> {
        (self.project)(record).set(token)
    }

    fn render(&mut self, record: &mut A) -> String {
        (self.project)(record).render()
    }

    fn mode(&mut self, record: &mut A) -> ArgumentMode {
        (self.project)(record).mode()
    }

    fn describe_argument(&mut self, record: &mut A, is_flag: bool, descr: &str) -> String {
        (self.project)(record).describe_argument(is_flag, descr)
    }

    fn describe_value(&mut self, record: &mut A) -> Option<String> {
        (self.project)(record).describe_value()
    }

    fn resolve(&mut self, _record: &mut A, _role: Role) -> SpecResult<()> {
        Ok(())
    }

    fn validate(&mut self, record: &mut A, is_flag: bool) -> SpecResult<()> {
        (self.project)(record).validate(is_flag)
    }

    fn prepare(&mut self, record: &mut A) -> ParseResult<()> {
        (self.project)(record).prepare()
    }
}

impl<A, T, F> VariadicSlot<A> for FieldSlot<T, F>
where
    T: VariadicValue,
    F: Fn(&mut A) -> &mut T,
{
    fn set_all(&mut self, record: &mut A, tokens: &[String]) -> ParseResult<()> {
        (self.project)(record).set_all(tokens)
    }

    fn describe_argument(&mut self, record: &mut A, descr: &str) -> String {
        (self.project)(record).describe_argument(descr)
    }

    fn resolve(&mut self, _record: &mut A) -> SpecResult<()> {
        Ok(())
    }

    fn validate(&mut self, record: &mut A) -> SpecResult<()> {
        (self.project)(record).validate()
    }

    fn prepare(&mut self, record: &mut A) -> ParseResult<()> {
        (self.project)(record).prepare()
    }
}

/// `Callback` field of the record
struct CallbackSlot<F> {
    project: F,
}

impl<F> CallbackSlot<F> {
    // The callback is moved out of the record while it runs so that it can
    // receive the record itself. If the call installed a new callback in
    // the field, that one is kept.
    fn invoke<A, R>(
        &mut self,
        record: &mut A,
        call: impl FnOnce(&mut Callback<A>, &mut A) -> R,
    ) -> R
    where
        F: Fn(&mut A) -> &mut Callback<A>,
    {
        let mut callback = mem::take((self.project)(record));
        let result = call(&mut callback, record);
        let field = (self.project)(record);
        if field.is_unset() {
            *field = callback;
        }
        result
    }
}

impl<A, F> Slot<A> for CallbackSlot<F>
where
    F: Fn(&mut A) -> &mut Callback<A>,
{
    fn set(&mut self, record: &mut A, token: &str) -> ParseResult<()> {
        trace!(token = %token, "invoking callback");
        Ok(self.invoke(record, |callback, record| callback.call(token, record))?)
    }

    fn render(&mut self, _record: &mut A) -> String {
        String::new()
    }

    fn mode(&mut self, record: &mut A) -> ArgumentMode {
        (self.project)(record).mode()
    }

    fn describe_argument(&mut self, _record: &mut A, _is_flag: bool, descr: &str) -> String {
        descr.to_string()
    }

    fn describe_value(&mut self, _record: &mut A) -> Option<String> {
        None
    }

    fn resolve(&mut self, record: &mut A, role: Role) -> SpecResult<()> {
        resolve_callback((self.project)(record), role)
    }

    fn validate(&mut self, record: &mut A, _is_flag: bool) -> SpecResult<()> {
        check_set((self.project)(record))
    }

    fn prepare(&mut self, _record: &mut A) -> ParseResult<()> {
        Ok(())
    }
}

impl<A, F> VariadicSlot<A> for CallbackSlot<F>
where
    F: Fn(&mut A) -> &mut Callback<A>,
{
    fn set_all(&mut self, record: &mut A, tokens: &[String]) -> ParseResult<()> {
        trace!(count = tokens.len(), "invoking list callback");
        Ok(self.invoke(record, |callback, record| callback.call_list(tokens, record))?)
    }

    fn describe_argument(&mut self, _record: &mut A, descr: &str) -> String {
        descr.to_string()
    }

    fn resolve(&mut self, record: &mut A) -> SpecResult<()> {
        resolve_callback((self.project)(record), Role::Variadic)
    }

    fn validate(&mut self, record: &mut A) -> SpecResult<()> {
        check_set((self.project)(record))
    }

    fn prepare(&mut self, _record: &mut A) -> ParseResult<()> {
        Ok(())
    }
}

/// Value owned by the binding
struct OwnedSlot<T> {
    value: T,
}

impl<A, T: Value> Slot<A> for OwnedSlot<T> {
    fn set(&mut self, _record: &mut A, token: &str) -> ParseResult<()> {
        self.value.set(token)
    }

    fn render(&mut self, _record: &mut A) -> String {
        self.value.render()
    }

    fn mode(&mut self, _record: &mut A) -> ArgumentMode {
        self.value.mode()
    }

    fn describe_argument(&mut self, _record: &mut A, is_flag: bool, descr: &str) -> String {
        self.value.describe_argument(is_flag, descr)
    }

    fn describe_value(&mut self, _record: &mut A) -> Option<String> {
        self.value.describe_value()
    }

    fn resolve(&mut self, _record: &mut A, _role: Role) -> SpecResult<()> {
        Ok(())
    }

    fn validate(&mut self, _record: &mut A, is_flag: bool) -> SpecResult<()> {
        self.value.validate(is_flag)
    }

    fn prepare(&mut self, _record: &mut A) -> ParseResult<()> {
        self.value.prepare()
    }
}

impl<A, T: VariadicValue> VariadicSlot<A> for OwnedSlot<T> {
    fn set_all(&mut self, _record: &mut A, tokens: &[String]) -> ParseResult<()> {
        self.value.set_all(tokens)
    }

    fn describe_argument(&mut self, _record: &mut A, descr: &str) -> String {
        self.value.describe_argument(descr)
    }

    fn resolve(&mut self, _record: &mut A) -> SpecResult<()> {
        Ok(())
    }

    fn validate(&mut self, _record: &mut A) -> SpecResult<()> {
        self.value.validate()
    }

    fn prepare(&mut self, _record: &mut A) -> ParseResult<()> {
        self.value.prepare()
    }
}

/// Callback owned by the binding
struct OwnedCallbackSlot<A> {
    callback: Callback<A>,
}

impl<A> Slot<A> for OwnedCallbackSlot<A> {
    fn set(&mut self, record: &mut A, token: &str) -> ParseResult<()> {
        Ok(self.callback.call(token, record)?)
    }

    fn render(&mut self, _record: &mut A) -> String {
        String::new()
    }

    fn mode(&mut self, _record: &mut A) -> ArgumentMode {
        self.callback.mode()
    }

    fn describe_argument(&mut self, _record: &mut A, _is_flag: bool, descr: &str) -> String {
        descr.to_string()
    }

    fn describe_value(&mut self, _record: &mut A) -> Option<String> {
        None
    }

    fn resolve(&mut self, _record: &mut A, role: Role) -> SpecResult<()> {
        resolve_callback(&self.callback, role)
    }

    fn validate(&mut self, _record: &mut A, _is_flag: bool) -> SpecResult<()> {
        check_set(&self.callback)
    }

    fn prepare(&mut self, _record: &mut A) -> ParseResult<()> {
        Ok(())
    }
}

impl<A> VariadicSlot<A> for OwnedCallbackSlot<A> {
    fn set_all(&mut self, record: &mut A, tokens: &[String]) -> ParseResult<()> {
        Ok(self.callback.call_list(tokens, record)?)
    }

    fn describe_argument(&mut self, _record: &mut A, descr: &str) -> String {
        descr.to_string()
    }

    fn resolve(&mut self, _record: &mut A) -> SpecResult<()> {
        resolve_callback(&self.callback, Role::Variadic)
    }

    fn validate(&mut self, _record: &mut A) -> SpecResult<()> {
        check_set(&self.callback)
    }

    fn prepare(&mut self, _record: &mut A) -> ParseResult<()> {
        Ok(())
    }
}

/// A flag or fixed parameter bound to storage for record type `A`.
pub struct Binding<A> {
    slot: Box<dyn Slot<A>>,
}

impl<A: 'static> Binding<A> {
    /// Bind to a field of the record
    pub fn field<T, F>(project: F) -> Self
    where
        T: Value + 'static,
        F: Fn(&mut A) -> &mut T + 'static,
    {
        Self {
            slot: Box::new(FieldSlot {
                project,
                _value: PhantomData,
            }),
        }
    }

    /// Bind to a callback field of the record
    pub fn callback<F>(project: F) -> Self
    where
        F: Fn(&mut A) -> &mut Callback<A> + 'static,
    {
        Self {
            slot: Box::new(CallbackSlot { project }),
        }
    }

    /// Bind to a value that lives in the binding
    pub fn owned<T: Value + 'static>(value: T) -> Self {
        Self {
            slot: Box::new(OwnedSlot { value }),
        }
    }

    /// Bind to a callback that lives in the binding
    pub fn owned_callback(callback: Callback<A>) -> Self {
        Self {
            slot: Box::new(OwnedCallbackSlot { callback }),
        }
    }
}

impl<A> Binding<A> {
    /// Set the bound value from one token
    pub fn set(&mut self, record: &mut A, token: &str) -> ParseResult<()> {
        self.slot.set(record, token)
    }

    /// Current value as text
    pub fn render(&mut self, record: &mut A) -> String {
        self.slot.render(record)
    }

    /// How the bound value relates to a following token
    pub fn mode(&mut self, record: &mut A) -> ArgumentMode {
        self.slot.mode(record)
    }

    /// Description adjusted by the bound value
    pub fn describe_argument(&mut self, record: &mut A, is_flag: bool, descr: &str) -> String {
        self.slot.describe_argument(record, is_flag, descr)
    }

    /// Value placeholder for help text, if the value has its own
    pub fn describe_value(&mut self, record: &mut A) -> Option<String> {
        self.slot.describe_value(record)
    }

    /// Check that the binding can serve the given role
    pub fn resolve(&mut self, record: &mut A, role: Role) -> SpecResult<()> {
        self.slot.resolve(record, role)
    }

    /// Run the value's validation
    pub fn validate(&mut self, record: &mut A, is_flag: bool) -> SpecResult<()> {
        self.slot.validate(record, is_flag)
    }

    /// Run the value's deferred preparation
    pub fn prepare(&mut self, record: &mut A) -> ParseResult<()> {
        self.slot.prepare(record)
    }
}

/// The trailing variadic parameter bound to storage for record type `A`.
pub struct VariadicBinding<A> {
    slot: Box<dyn VariadicSlot<A>>,
}

impl<A: 'static> VariadicBinding<A> {
    /// Bind to a field of the record
    pub fn field<T, F>(project: F) -> Self
    where
        T: VariadicValue + 'static,
        F: Fn(&mut A) -> &mut T + 'static,
    {
        Self {
            slot: Box::new(FieldSlot {
                project,
                _value: PhantomData,
            }),
        }
    }

    /// Bind to a list callback field of the record
    pub fn callback<F>(project: F) -> Self
    where
        F: Fn(&mut A) -> &mut Callback<A> + 'static,
    {
        Self {
            slot: Box::new(CallbackSlot { project }),
        }
    }

    /// Bind to a value that lives in the binding
    pub fn owned<T: VariadicValue + 'static>(value: T) -> Self {
        Self {
            slot: Box::new(OwnedSlot { value }),
        }
    }

    /// Bind to a list callback that lives in the binding
    pub fn owned_callback(callback: Callback<A>) -> Self {
        Self {
            slot: Box::new(OwnedCallbackSlot { callback }),
        }
    }
}

impl<A> VariadicBinding<A> {
    /// Set the bound value from all trailing tokens
    pub fn set_all(&mut self, record: &mut A, tokens: &[String]) -> ParseResult<()> {
        self.slot.set_all(record, tokens)
    }

    /// Description adjusted by the bound value
    pub fn describe_argument(&mut self, record: &mut A, descr: &str) -> String {
        self.slot.describe_argument(record, descr)
    }

    /// Check that the binding can serve as a variadic parameter
    pub fn resolve(&mut self, record: &mut A) -> SpecResult<()> {
        self.slot.resolve(record)
    }

    /// Run the value's validation
    pub fn validate(&mut self, record: &mut A) -> SpecResult<()> {
        self.slot.validate(record)
    }

    /// Run the value's deferred preparation
    pub fn prepare(&mut self, record: &mut A) -> ParseResult<()> {
        self.slot.prepare(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    #[derive(Default)]
    struct Record {
        count: i32,
        names: Vec<String>,
        on_text: Callback<Record>,
        on_list: Callback<Record>,
        log: Vec<String>,
    }

    #[test]
    fn test_field_binding() {
        let mut record = Record {
            count: 3,
            ..Default::default()
        };
        let mut binding = Binding::field(|r: &mut Record| &mut r.count);

        assert_eq!(binding.render(&mut record), "3");
        assert_eq!(binding.mode(&mut record), ArgumentMode::Required);
        binding.set(&mut record, "42").unwrap();
        assert_eq!(record.count, 42);
        assert!(binding.set(&mut record, "x").is_err());
    }

    #[test]
    fn test_variadic_field_binding() {
        let mut record = Record::default();
        let mut binding = VariadicBinding::field(|r: &mut Record| &mut r.names);
        binding
            .set_all(&mut record, &["a".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(record.names, vec!["a", "b"]);
    }

    #[test]
    fn test_callback_sees_record_and_is_restored() {
        let mut record = Record {
            on_text: Callback::text_with(|token, r: &mut Record| {
                r.log.push(format!("got {}", token));
                Ok(())
            }),
            ..Default::default()
        };
        let mut binding = Binding::callback(|r: &mut Record| &mut r.on_text);

        binding.resolve(&mut record, Role::Flag).unwrap();
        binding.set(&mut record, "one").unwrap();
        binding.set(&mut record, "two").unwrap();
        assert_eq!(record.log, vec!["got one", "got two"]);
        assert!(!record.on_text.is_unset());
        assert_eq!(binding.render(&mut record), "");
    }

    #[test]
    fn test_callback_can_replace_itself() {
        let mut record = Record {
            on_text: Callback::text_with(|_, r: &mut Record| {
                r.on_text = Callback::text_with(|_, r: &mut Record| {
                    r.log.push("second".to_string());
                    Ok(())
                });
                r.log.push("first".to_string());
                Ok(())
            }),
            ..Default::default()
        };
        let mut binding = Binding::callback(|r: &mut Record| &mut r.on_text);
        binding.set(&mut record, "").unwrap();
        binding.set(&mut record, "").unwrap();
        binding.set(&mut record, "").unwrap();
        assert_eq!(record.log, vec!["first", "second", "second"]);
    }

    #[test]
    fn test_callback_errors_become_parse_errors() {
        let mut record = Record {
            on_list: Callback::list(|_| anyhow::bail!("bad list")),
            ..Default::default()
        };
        let mut binding = VariadicBinding::callback(|r: &mut Record| &mut r.on_list);
        let err = binding.set_all(&mut record, &[]).unwrap_err();
        assert_eq!(err, ParseError::rejected("bad list"));
    }

    #[test]
    fn test_resolve_checks_shape() {
        let mut record = Record {
            on_list: Callback::list(|_| Ok(())),
            ..Default::default()
        };

        let mut unset = Binding::callback(|r: &mut Record| &mut r.on_text);
        assert_eq!(
            unset.resolve(&mut record, Role::Flag).unwrap_err(),
            SpecError::NilCallback
        );
        assert_eq!(
            unset.validate(&mut record, true).unwrap_err().to_string(),
            "callbacks cannot be nil"
        );

        let mut list_as_flag = Binding::callback(|r: &mut Record| &mut r.on_list);
        assert_eq!(
            list_as_flag.resolve(&mut record, Role::Flag).unwrap_err(),
            SpecError::CallbackSignature("fn(&[String]) -> Result")
        );

        let mut action_as_variadic: VariadicBinding<Record> =
            VariadicBinding::owned_callback(Callback::action(|| {}));
        assert_eq!(
            action_as_variadic.resolve(&mut record).unwrap_err(),
            SpecError::CallbackSignature("fn() -> Result")
        );

        let mut action_as_param: Binding<Record> =
            Binding::owned_callback(Callback::action(|| {}));
        assert!(action_as_param.resolve(&mut record, Role::Param).is_err());
        assert!(action_as_param.resolve(&mut record, Role::Flag).is_ok());
    }

    #[test]
    fn test_owned_binding() {
        let mut binding: Binding<()> = Binding::owned(false);
        assert_eq!(binding.mode(&mut ()), ArgumentMode::optional("true"));
        binding.set(&mut (), "true").unwrap();
        assert_eq!(binding.render(&mut ()), "true");
    }
}
