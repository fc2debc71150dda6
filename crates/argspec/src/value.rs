use std::{fmt, path::PathBuf};

use thiserror::Error;

/// A parsed value, as stored in a [`Namespace`](crate::Namespace).
///
/// Scalar actions produce `Bool`, `Int`, `Float` or `Str`; list-shaped
/// arities and `append` actions produce `List`. Unset defaults are `None`.
#[derive(Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(it) => Some(*it),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(it) => Some(*it),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(it) => Some(*it),
            Value::Int(it) => Some(*it as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(it) => Some(it.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(it) => Some(it.as_slice()),
            _ => None,
        }
    }

    /// Name of the variant, used in [`ValueError`] messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
        }
    }
}

// Prints values the way they would be written as literals, so that
// namespace snapshots stay readable.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(it) => fmt::Debug::fmt(it, f),
            Value::Int(it) => fmt::Debug::fmt(it, f),
            Value::Float(it) => fmt::Debug::fmt(it, f),
            Value::Str(it) => fmt::Debug::fmt(it, f),
            Value::List(it) => f.debug_list().entries(it).finish(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(it) => fmt::Display::fmt(it, f),
            Value::Int(it) => fmt::Display::fmt(it, f),
            Value::Float(it) => fmt::Display::fmt(it, f),
            Value::Str(it) => f.write_str(it),
            Value::List(it) => {
                f.write_str("[")?;
                for (i, item) in it.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(item, f)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(it: bool) -> Value {
        Value::Bool(it)
    }
}

impl From<i32> for Value {
    fn from(it: i32) -> Value {
        Value::Int(it.into())
    }
}

impl From<i64> for Value {
    fn from(it: i64) -> Value {
        Value::Int(it)
    }
}

impl From<u32> for Value {
    fn from(it: u32) -> Value {
        Value::Int(it.into())
    }
}

impl From<f64> for Value {
    fn from(it: f64) -> Value {
        Value::Float(it)
    }
}

impl From<&str> for Value {
    fn from(it: &str) -> Value {
        Value::Str(it.to_string())
    }
}

impl From<String> for Value {
    fn from(it: String) -> Value {
        Value::Str(it)
    }
}

impl From<PathBuf> for Value {
    fn from(it: PathBuf) -> Value {
        Value::Str(it.to_string_lossy().into_owned())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(it: Vec<T>) -> Value {
        Value::List(it.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(it: Option<T>) -> Value {
        it.map_or(Value::None, Into::into)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("no value stored under `{0}`")]
    Missing(String),
    #[error("expected {expected}, found {found}")]
    Mismatch { expected: &'static str, found: &'static str },
}

fn mismatch(expected: &'static str, value: &Value) -> ValueError {
    ValueError::Mismatch { expected, found: value.type_name() }
}

impl TryFrom<Value> for bool {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<bool, ValueError> {
        value.as_bool().ok_or_else(|| mismatch("bool", &value))
    }
}

impl TryFrom<Value> for i64 {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<i64, ValueError> {
        value.as_int().ok_or_else(|| mismatch("int", &value))
    }
}

impl TryFrom<Value> for f64 {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<f64, ValueError> {
        value.as_float().ok_or_else(|| mismatch("float", &value))
    }
}

impl TryFrom<Value> for String {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<String, ValueError> {
        match value {
            Value::Str(it) => Ok(it),
            _ => Err(mismatch("string", &value)),
        }
    }
}

impl<T> TryFrom<Value> for Vec<T>
where
    T: TryFrom<Value, Error = ValueError>,
{
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Vec<T>, ValueError> {
        match value {
            Value::List(items) => items.into_iter().map(T::try_from).collect(),
            _ => Err(mismatch("list", &value)),
        }
    }
}

impl<T> TryFrom<Value> for Option<T>
where
    T: TryFrom<Value, Error = ValueError>,
{
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Option<T>, ValueError> {
        match value {
            Value::None => Ok(None),
            _ => T::try_from(value).map(Some),
        }
    }
}
