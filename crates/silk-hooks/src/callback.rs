//! Callback wrapper with wrap-time arity
//!
//! A [`Callback`] is the user function a [`Hook`](crate::Hook) mediates. Every
//! callback exposes a single [`Callback::invoke`] capability and an arity that is
//! fixed when the callback is wrapped; the mediator uses the arity to truncate
//! the arguments the dispatcher hands it.
//!
//! Three kinds of callables are supported:
//!
//! * **Functions**: closures and fn items. Typed callables taking up to six
//!   [`Value`] parameters get their arity from the signature; variadic
//!   callables taking `&[Value]` have arity 0 and receive every argument.
//! * **Bound methods**: a method called on a shared receiver ([`Callback::bound`]).
//! * **Associated functions**: a function owned by a type but not called on an
//!   instance ([`Callback::associated`]).
//!
//! # Examples
//!
//! ```ignore
//! use serde_json::{json, Value};
//! use silk_hooks::Callback;
//!
//! let double = Callback::new(|v: Value| v.as_i64().unwrap_or(0) * 2);
//! assert_eq!(double.arity(), 1);
//! assert_eq!(double.invoke(&[json!(21)])?, json!(42));
//!
//! let count = Callback::new(|args: &[Value]| args.len() as i64);
//! assert_eq!(count.arity(), 0);
//! ```

use std::{any::type_name, fmt, sync::Arc};

use serde_json::Value;

use crate::{
    dispatcher::Listener,
    error::{BoxError, HooksError, Result},
};

/// Result of invoking a callback
pub type CallbackResult = Result<Value>;

type Invoker = Arc<dyn Fn(&[Value]) -> CallbackResult + Send + Sync>;

/// What sort of callable a [`Callback`] wraps
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackKind {
    /// A closure or free function
    Function {
        /// Type name of the callable
        name: String,
    },

    /// A method invoked on a shared receiver
    BoundMethod {
        /// Type name of the receiver
        receiver: String,
        /// Method name
        method: String,
    },

    /// A function associated with a type
    Associated {
        /// Type name of the owner
        owner: String,
        /// Function name
        function: String,
    },
}

impl CallbackKind {
    fn function<F>() -> Self {
        CallbackKind::Function {
            name: type_name::<F>().to_string(),
        }
    }
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackKind::Function { name } => write!(f, "{}", name),
            CallbackKind::BoundMethod { receiver, method } => write!(f, "{}->{}", receiver, method),
            CallbackKind::Associated { owner, function } => write!(f, "{}::{}", owner, function),
        }
    }
}

/// A user function together with its declared parameter count
#[derive(Clone)]
pub struct Callback {
    kind: CallbackKind,
    arity: usize,
    invoker: Invoker,
}

impl Callback {
    /// Wrap any supported callable
    pub fn new<F, M>(callable: F) -> Self
    where
        F: IntoCallback<M>,
    {
        callable.into_callback()
    }

    /// Wrap a slice-taking function and declare its arity explicitly
    ///
    /// The mediator passes at most `arity` arguments; an arity of 0 passes all.
    pub fn with_arity<F, R>(arity: usize, f: F) -> Self
    where
        F: Fn(&[Value]) -> R + Send + Sync + 'static,
        R: CallbackOutput,
    {
        Self {
            kind: CallbackKind::function::<F>(),
            arity,
            invoker: Arc::new(move |args: &[Value]| f(args).into_output()),
        }
    }

    /// Wrap a method called on a shared receiver
    pub fn bound<T, F, R>(receiver: Arc<T>, method: &str, arity: usize, f: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&T, &[Value]) -> R + Send + Sync + 'static,
        R: CallbackOutput,
    {
        Self {
            kind: CallbackKind::BoundMethod {
                receiver: type_name::<T>().to_string(),
                method: method.to_string(),
            },
            arity,
            invoker: Arc::new(move |args: &[Value]| f(&receiver, args).into_output()),
        }
    }

    /// Wrap a function associated with type `T`
    pub fn associated<T, F, R>(function: &str, arity: usize, f: F) -> Self
    where
        T: ?Sized,
        F: Fn(&[Value]) -> R + Send + Sync + 'static,
        R: CallbackOutput,
    {
        Self {
            kind: CallbackKind::Associated {
                owner: type_name::<T>().to_string(),
                function: function.to_string(),
            },
            arity,
            invoker: Arc::new(move |args: &[Value]| f(args).into_output()),
        }
    }

    /// Declared parameter count; 0 means the callback takes every argument
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Kind of callable wrapped
    pub fn kind(&self) -> &CallbackKind {
        &self.kind
    }

    /// Invoke the callback with exactly the given arguments
    pub fn invoke(&self, args: &[Value]) -> CallbackResult {
        (self.invoker)(args)
    }

    fn from_parts(kind: CallbackKind, arity: usize, invoker: Invoker) -> Self {
        Self {
            kind,
            arity,
            invoker,
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("kind", &self.kind)
            .field("arity", &self.arity)
            .finish()
    }
}

impl Listener for Callback {
    fn call(&self, args: &[Value]) -> CallbackResult {
        self.invoke(args)
    }

    fn label(&self) -> String {
        self.kind.to_string()
    }
}

/// Conversion of a callback's return value into a dispatch result
///
/// `()` becomes [`Value::Null`], errors are carried as [`HooksError::Callback`].
pub trait CallbackOutput {
    /// Convert into the value handed back to the dispatcher
    fn into_output(self) -> CallbackResult;
}

impl CallbackOutput for () {
    fn into_output(self) -> CallbackResult {
        Ok(Value::Null)
    }
}

impl CallbackOutput for Value {
    fn into_output(self) -> CallbackResult {
        Ok(self)
    }
}

impl CallbackOutput for bool {
    fn into_output(self) -> CallbackResult {
        Ok(Value::Bool(self))
    }
}

impl CallbackOutput for i64 {
    fn into_output(self) -> CallbackResult {
        Ok(Value::from(self))
    }
}

impl CallbackOutput for f64 {
    fn into_output(self) -> CallbackResult {
        Ok(Value::from(self))
    }
}

impl CallbackOutput for String {
    fn into_output(self) -> CallbackResult {
        Ok(Value::String(self))
    }
}

impl<E> CallbackOutput for std::result::Result<Value, E>
where
    E: Into<BoxError>,
{
    fn into_output(self) -> CallbackResult {
        self.map_err(HooksError::callback)
    }
}

impl<E> CallbackOutput for std::result::Result<(), E>
where
    E: Into<BoxError>,
{
    fn into_output(self) -> CallbackResult {
        self.map(|()| Value::Null).map_err(HooksError::callback)
    }
}

/// Callables that can be wrapped as a [`Callback`]
///
/// `Marker` only disambiguates the blanket implementations; it is inferred.
pub trait IntoCallback<Marker> {
    /// Wrap `self`, computing its arity
    fn into_callback(self) -> Callback;
}

impl IntoCallback<Callback> for Callback {
    fn into_callback(self) -> Callback {
        self
    }
}

impl<F, R> IntoCallback<fn(&[Value]) -> R> for F
where
    F: Fn(&[Value]) -> R + Send + Sync + 'static,
    R: CallbackOutput,
{
    fn into_callback(self) -> Callback {
        Callback::from_parts(
            CallbackKind::function::<F>(),
            0,
            Arc::new(move |args: &[Value]| (self)(args).into_output()),
        )
    }
}

impl<F, R> IntoCallback<fn() -> R> for F
where
    F: Fn() -> R + Send + Sync + 'static,
    R: CallbackOutput,
{
    fn into_callback(self) -> Callback {
        Callback::from_parts(
            CallbackKind::function::<F>(),
            0,
            Arc::new(move |_: &[Value]| (self)().into_output()),
        )
    }
}

macro_rules! value_ty {
    ($_arg:ident) => {
        Value
    };
}

macro_rules! impl_into_callback {
    ($arity:literal; $($arg:ident),+) => {
        impl<F, R> IntoCallback<fn($(value_ty!($arg)),+) -> R> for F
        where
            F: Fn($(value_ty!($arg)),+) -> R + Send + Sync + 'static,
            R: CallbackOutput,
        {
            fn into_callback(self) -> Callback {
                let invoker = move |args: &[Value]| -> CallbackResult {
                    match args {
                        [$($arg,)+ ..] => (self)($($arg.clone()),+).into_output(),
                        _ => Err(HooksError::ArgumentCount {
                            expected: $arity,
                            given: args.len(),
                        }),
                    }
                };
                Callback::from_parts(CallbackKind::function::<F>(), $arity, Arc::new(invoker))
            }
        }
    };
}

impl_into_callback!(1; a);
impl_into_callback!(2; a, b);
impl_into_callback!(3; a, b, c);
impl_into_callback!(4; a, b, c, d);
impl_into_callback!(5; a, b, c, d, e);
impl_into_callback!(6; a, b, c, d, e, f);

#[cfg(test)]
mod tests {
    use std::fmt;

    use serde_json::json;

    use super::*;

    fn a_normal_function() {}

    struct CallMy {
        greeting: String,
    }

    #[derive(Debug)]
    struct Failure;

    impl fmt::Display for Failure {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "callback failed")
        }
    }

    impl std::error::Error for Failure {}

    #[test]
    fn test_typed_closure_arity() {
        assert_eq!(Callback::new(|_a: Value| ()).arity(), 1);
        assert_eq!(Callback::new(|_a: Value, _b: Value| ()).arity(), 2);
        assert_eq!(Callback::new(|_a: Value, _b: Value, _c: Value| ()).arity(), 3);
    }

    #[test]
    fn test_no_parameter_callables_have_zero_arity() {
        assert_eq!(Callback::new(|| ()).arity(), 0);
        assert_eq!(Callback::new(|_args: &[Value]| ()).arity(), 0);
        assert_eq!(Callback::new(a_normal_function).arity(), 0);
    }

    #[test]
    fn test_fn_item_is_named_function() {
        let callback = Callback::new(a_normal_function);
        match callback.kind() {
            CallbackKind::Function { name } => assert!(name.ends_with("a_normal_function")),
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_typed_closure_receives_arguments_in_order() {
        let callback = Callback::new(|a: Value, b: Value| json!([b, a]));
        let result = callback.invoke(&[json!(1), json!(2)]).unwrap();

        assert_eq!(result, json!([2, 1]));
    }

    #[test]
    fn test_typed_closure_with_too_few_arguments() {
        let callback = Callback::new(|_a: Value, _b: Value| ());
        let err = callback.invoke(&[json!(1)]).unwrap_err();

        assert!(matches!(
            err,
            HooksError::ArgumentCount {
                expected: 2,
                given: 1
            }
        ));
    }

    #[test]
    fn test_variadic_closure_sees_everything() {
        let callback = Callback::new(|args: &[Value]| args.len() as i64);
        let result = callback
            .invoke(&[json!(1), json!(2), json!(3)])
            .unwrap();

        assert_eq!(result, json!(3));
    }

    #[test]
    fn test_unit_return_is_null() {
        let callback = Callback::new(|| ());
        assert_eq!(callback.invoke(&[]).unwrap(), Value::Null);
    }

    #[test]
    fn test_error_return_is_propagated() {
        let callback = Callback::new(|| -> std::result::Result<(), Failure> { Err(Failure) });
        let err = callback.invoke(&[]).unwrap_err();

        assert!(err.is_callback());
        assert_eq!(err.to_string(), "callback failed");
    }

    #[test]
    fn test_bound_method() {
        let receiver = Arc::new(CallMy {
            greeting: "howdy".to_string(),
        });
        let callback = Callback::bound(receiver, "greet", 1, |me: &CallMy, args: &[Value]| {
            format!("{} {}", me.greeting, args[0].as_str().unwrap_or_default())
        });

        assert_eq!(callback.arity(), 1);
        assert_eq!(callback.invoke(&[json!("partner")]).unwrap(), json!("howdy partner"));
        assert!(matches!(
            callback.kind(),
            CallbackKind::BoundMethod { method, .. } if method == "greet"
        ));
    }

    #[test]
    fn test_associated_function() {
        let callback =
            Callback::associated::<CallMy, _, _>("static_method", 0, |_args: &[Value]| ());

        assert_eq!(callback.arity(), 0);
        assert!(callback.kind().to_string().ends_with("CallMy::static_method"));
        assert_eq!(callback.invoke(&[]).unwrap(), Value::Null);
    }

    #[test]
    fn test_with_arity() {
        let callback = Callback::with_arity(2, |args: &[Value]| args.len() as i64);

        assert_eq!(callback.arity(), 2);
        // truncation is the mediator's job; invoke passes what it is given
        assert_eq!(callback.invoke(&[json!(1), json!(2), json!(3)]).unwrap(), json!(3));
    }
}
