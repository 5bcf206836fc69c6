pub mod errors;

use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

use crate::tree::{FlagRef, Value};
use errors::HandlerError;

type Invoke = dyn Fn(&[Option<Value>]) -> Result<(), HandlerError>;

/// A registered callback together with its declared parameter count.
#[derive(Clone)]
pub struct Callback {
    name: &'static str,
    arity: usize,
    invoke: Rc<Invoke>,
}

impl Callback {
    fn new(
        name: &'static str,
        arity: usize,
        invoke: impl Fn(&[Option<Value>]) -> Result<(), HandlerError> + 'static,
    ) -> Self {
        Self {
            name,
            arity,
            invoke: Rc::new(invoke),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Calls the callback with already resolved argument values.
    pub fn call(&self, values: &[Option<Value>]) -> Result<(), HandlerError> {
        if values.len() != self.arity {
            return Err(HandlerError::ArityMismatch {
                callback: self.name.to_string(),
                expected: self.arity,
                got: values.len(),
            });
        }
        (self.invoke)(values)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Conversion of a resolved argument into a callback parameter.
pub trait FromValue: Sized {
    fn from_value(value: Option<&Value>) -> Result<Self, HandlerError>;
}

fn present<'a>(
    value: Option<&'a Value>,
    expected: &'static str,
) -> Result<&'a Value, HandlerError> {
    value.ok_or(HandlerError::MissingValue { expected })
}

impl FromValue for Value {
    fn from_value(value: Option<&Value>) -> Result<Self, HandlerError> {
        present(value, "any value").cloned()
    }
}

impl FromValue for String {
    fn from_value(value: Option<&Value>) -> Result<Self, HandlerError> {
        match present(value, "string")? {
            Value::Str(v) => Ok(v.clone()),
            other => Ok(other.to_string()),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Option<&Value>) -> Result<Self, HandlerError> {
        match present(value, "int")? {
            Value::Int(v) => Ok(*v),
            other => Err(HandlerError::ValueType {
                expected: "int",
                found: other.type_name(),
            }),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Option<&Value>) -> Result<Self, HandlerError> {
        match present(value, "bool")? {
            Value::Bool(v) => Ok(*v),
            other => Err(HandlerError::ValueType {
                expected: "bool",
                found: other.type_name(),
            }),
        }
    }
}

impl FromValue for Vec<String> {
    fn from_value(value: Option<&Value>) -> Result<Self, HandlerError> {
        match present(value, "list")? {
            Value::List(items) => Ok(items.clone()),
            Value::Str(v) => Ok(vec![v.clone()]),
            other => Err(HandlerError::ValueType {
                expected: "list",
                found: other.type_name(),
            }),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Option<&Value>) -> Result<Self, HandlerError> {
        value.map(|v| T::from_value(Some(v))).transpose()
    }
}

fn convert<T: FromValue>(values: &[Option<Value>], position: usize) -> Result<T, HandlerError> {
    let value = values.get(position).and_then(|v| v.as_ref());
    T::from_value(value).map_err(|source| HandlerError::InArgument {
        position,
        source: Box::new(source),
    })
}

/// Registration of a plain function or closure as a handler callback.
///
/// `Params` is the parameter tuple; it only drives impl selection. Anything that is
/// not a function of up to six [`FromValue`] parameters is rejected at compile time.
pub trait IntoCallback<Params> {
    fn into_callback(self) -> Callback;
}

macro_rules! count {
    () => { 0usize };
    ($head:ident $($tail:ident)*) => { 1usize + count!($($tail)*) };
}

macro_rules! impl_into_callback {
    ($($param:ident),*) => {
        impl<F, $($param,)*> IntoCallback<($($param,)*)> for F
        where
            F: Fn($($param),*) + 'static,
            $($param: FromValue,)*
        {
            #[allow(non_snake_case, unused_variables, unused_mut, unused_assignments)]
            fn into_callback(self) -> Callback {
                Callback::new(
                    std::any::type_name::<F>(),
                    count!($($param)*),
                    move |values: &[Option<Value>]| {
                        let mut position = 0;
                        $(
                            let $param = convert::<$param>(values, position)?;
                            position += 1;
                        )*
                        (self)($($param),*);
                        Ok(())
                    },
                )
            }
        }
    };
}
impl_into_callback!();
impl_into_callback!(A);
impl_into_callback!(A, B);
impl_into_callback!(A, B, C);
impl_into_callback!(A, B, C, D);
impl_into_callback!(A, B, C, D, E);
impl_into_callback!(A, B, C, D, E, G);

/// A bound call-site value: either a reference to a flag resolved at call time, or a literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arg {
    Flag(FlagRef),
    Literal(Value),
}

impl From<FlagRef> for Arg {
    fn from(flag: FlagRef) -> Self {
        Arg::Flag(flag)
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Literal(value)
    }
}

macro_rules! impl_arg_from_literal {
    ($($t:ty),* $(,)?) => {$(
        impl From<$t> for Arg {
            fn from(v: $t) -> Self {
                Arg::Literal(Value::from(v))
            }
        }
    )*};
}
impl_arg_from_literal!(bool, i64, i32, u32, String, &str, Vec<String>);

/// Argument lists accepted by the second-stage binder.
pub trait IntoArgs {
    fn into_args(self) -> Vec<Arg>;
}

impl<T: Into<Arg>> IntoArgs for Vec<T> {
    fn into_args(self) -> Vec<Arg> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<Arg>, const N: usize> IntoArgs for [T; N] {
    fn into_args(self) -> Vec<Arg> {
        self.into_iter().map(Into::into).collect()
    }
}

macro_rules! impl_into_args {
    ($($arg:ident),*) => {
        impl<$($arg: Into<Arg>,)*> IntoArgs for ($($arg,)*) {
            #[allow(non_snake_case)]
            fn into_args(self) -> Vec<Arg> {
                let ($($arg,)*) = self;
                vec![$($arg.into()),*]
            }
        }
    };
}
impl_into_args!();
impl_into_args!(A);
impl_into_args!(A, B);
impl_into_args!(A, B, C);
impl_into_args!(A, B, C, D);
impl_into_args!(A, B, C, D, E);
impl_into_args!(A, B, C, D, E, G);

/// `Empty -> CallbackSet -> ArgsBound`.
#[derive(Debug, Clone, Default)]
pub enum HandlerState {
    #[default]
    Empty,
    CallbackSet(Callback),
    ArgsBound(Callback, Vec<Arg>),
}

/// Callback and bound arguments attached to a flag or command.
#[derive(Debug, Clone, Default)]
pub struct Handler {
    parent_label: String,
    state: HandlerState,
}

impl Handler {
    pub(crate) fn new(parent_label: String) -> Self {
        Self {
            parent_label,
            state: HandlerState::Empty,
        }
    }

    /// `command "name"` for commands, empty for the root and for flags.
    pub fn parent_label(&self) -> &str {
        &self.parent_label
    }

    pub fn state(&self) -> &HandlerState {
        &self.state
    }

    pub fn callback(&self) -> Option<&Callback> {
        match &self.state {
            HandlerState::Empty => None,
            HandlerState::CallbackSet(cb) | HandlerState::ArgsBound(cb, _) => Some(cb),
        }
    }

    pub fn args_bound(&self) -> bool {
        matches!(self.state, HandlerState::ArgsBound(..))
    }

    pub fn bound_args(&self) -> &[Arg] {
        match &self.state {
            HandlerState::ArgsBound(_, args) => args,
            _ => &[],
        }
    }

    /// Registering again replaces the previous callback and drops its arguments.
    pub(crate) fn set_callback(&mut self, callback: Callback) {
        self.state = HandlerState::CallbackSet(callback);
    }

    pub(crate) fn bind(&mut self, args: Vec<Arg>) -> Result<(), HandlerError> {
        let callback = match std::mem::take(&mut self.state) {
            HandlerState::CallbackSet(cb) | HandlerState::ArgsBound(cb, _) => cb,
            HandlerState::Empty => return Err(HandlerError::MissingHandler),
        };
        if args.len() != callback.arity() {
            let err = HandlerError::ArityMismatch {
                callback: callback.name().to_string(),
                expected: callback.arity(),
                got: args.len(),
            };
            self.state = HandlerState::CallbackSet(callback);
            return Err(err);
        }
        self.state = HandlerState::ArgsBound(callback, args);
        Ok(())
    }
}

impl Serialize for Handler {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Handler", 3)?;
        s.serialize_field("callback", &self.callback().map(Callback::name))?;
        s.serialize_field("args_bound", &self.args_bound())?;
        s.serialize_field("args", self.bound_args())?;
        s.end()
    }
}

/// Checks that a command's handler reached `ArgsBound`.
pub fn validate(handler: &Handler) -> Result<(), HandlerError> {
    match &handler.state {
        HandlerState::Empty => Err(HandlerError::MissingHandler),
        HandlerState::CallbackSet(cb) => Err(HandlerError::ArgsNotBound {
            callback: cb.name().to_string(),
        }),
        HandlerState::ArgsBound(..) => Ok(()),
    }
}
