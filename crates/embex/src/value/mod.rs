//! Value representation for runtime values

mod display;
mod impls;
#[cfg(feature = "json")]
mod json;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// String-keyed mapping stored inside [`Value::Map`].
pub type Map = IndexMap<String, Value>;

/// Runtime value representation for the expression evaluator.
///
/// Scalars are stored inline. Strings, lists and maps are `Arc`-wrapped so
/// that host-supplied data bound as a variable is shared with the
/// evaluator rather than copied, and so that cloning a value is cheap.
#[derive(Clone)]
pub enum Value {
    /// Absence of a value: `nil`
    Nil,

    /// Boolean: `true` or `false`
    Bool(bool),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit floating point
    Float(f64),

    /// Immutable UTF-8 string
    String(Arc<str>),

    /// Ordered sequence of values
    List(Arc<Vec<Value>>),

    /// String-keyed mapping of values
    Map(Arc<Map>),
}

/// The tag of a [`Value`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `nil`
    Nil,
    /// `bool`
    Bool,
    /// `int`
    Int,
    /// `float`
    Float,
    /// `string`
    String,
    /// `list`
    List,
    /// `map`
    Map,
}

impl ValueKind {
    /// Lowercase name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Nil => "nil",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Map => "map",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// The tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Nil => ValueKind::Nil,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
        }
    }
}
