use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Serialize, Serializer};

/// A value an author attaches to a flag (default) or binds to a handler.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<String>),
}

impl Value {
    /// Parses a textual setting: integers and booleans are recognised, anything else is a string.
    pub fn parse(raw: &str) -> Self {
        if let Ok(v) = raw.parse::<i64>() {
            return Value::Int(v);
        }
        match raw {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Str(raw.to_string()),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Str(v) => f.write_str(v),
            Value::List(items) => write!(f, "[{}]", items.join(" ")),
        }
    }
}

macro_rules! impl_value_from {
    ($($t:ty => $variant:ident),* $(,)?) => {$(
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::$variant(v.into())
            }
        }
    )*};
}
impl_value_from!(
    bool => Bool,
    i64 => Int,
    i32 => Int,
    u32 => Int,
    String => Str,
    &str => Str,
    Vec<String> => List,
);

/// Writable destination for a flag's resolved value.
///
/// Clones share the same cell: the author keeps one handle, the flag keeps another.
#[derive(Debug, Clone, Default)]
pub struct ValueSlot(Rc<RefCell<Option<Value>>>);

impl ValueSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Value> {
        self.0.borrow().clone()
    }

    pub fn set(&self, value: impl Into<Value>) {
        *self.0.borrow_mut() = Some(value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_none()
    }

    /// True when both handles point at the same cell.
    pub fn same_slot(&self, other: &ValueSlot) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Serialize for ValueSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.borrow().serialize(serializer)
    }
}
