//! Dynamic values compared by the matching engine.
//!
//! ## Equality
//!
//! `Value` equality follows the loose numeric rules an assertion library
//! expects: `Int(1) == Float(1.0)`. Integers and floats are compared
//! exactly, without rounding the integer. Lists compare element-wise.
//!
//! ## Ordering
//!
//! `Value` is only *partially* ordered. Numbers order against numbers,
//! strings against strings, booleans against booleans and lists
//! lexicographically. Values of unrelated kinds have no ordering, which is
//! what the display helpers in [`crate::types::result`] rely on.

use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;

// ============================================================================
// ValueKind enum
// ============================================================================

/// Kind of a [`Value`], also usable as a type-check pattern.
///
/// `Numeric` and `Any` are never reported by [`Value::kind`]; they only
/// exist so a `Kind` pattern can accept more than one concrete kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// The absent value
    Nil,
    /// `true` or `false`
    Bool,
    /// 64-bit signed integer
    Integer,
    /// 64-bit float
    Float,
    /// Integer or float
    Numeric,
    /// UTF-8 string
    String,
    /// Ordered list of values
    List,
    /// Matches every kind
    Any,
}

impl ValueKind {
    /// Stable lowercase name, used in messages and configuration
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Nil => "nil",
            ValueKind::Bool => "bool",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Numeric => "numeric",
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Any => "any",
        }
    }

    /// Whether a value of concrete kind `other` satisfies this kind
    pub fn accepts(self, other: ValueKind) -> bool {
        match self {
            ValueKind::Any => true,
            ValueKind::Numeric => matches!(other, ValueKind::Integer | ValueKind::Float),
            kind => kind == other,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Value enum
// ============================================================================

/// An actual collection element (or a literal expected value).
///
/// ## Example
///
/// ```
/// use exact_match::types::{Value, ValueKind};
///
/// let list = Value::from(vec![1, 2, 3]);
/// assert_eq!(list.kind(), ValueKind::List);
/// assert_eq!(Value::from(1), Value::from(1.0));
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// The absent value
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    /// Concrete kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Nil => ValueKind::Nil,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::String,
            Value::List(_) => ValueKind::List,
        }
    }

    /// Borrow the string contents, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the elements, if this is a list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }

}

/// Exact ordering of an integer against a float.
///
/// `n as f64` rounds above 2^53, so the float is split into its integral
/// and fractional parts instead.
fn cmp_int_float(n: i64, x: f64) -> Option<Ordering> {
    // 2^63, the first float past i64::MAX
    const I64_END: f64 = 9_223_372_036_854_775_808.0;

    if x.is_nan() {
        return None;
    }
    if x >= I64_END {
        return Some(Ordering::Less);
    }
    if x < -I64_END {
        return Some(Ordering::Greater);
    }

    let whole = x.trunc();
    match n.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(x - whole)),
        unequal => Some(unequal),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Float(x), Value::Float(y)) => x == y,
            (Value::Int(n), Value::Float(x)) | (Value::Float(x), Value::Int(n)) => {
                cmp_int_float(*n, *x) == Some(Ordering::Equal)
            }
            _ => false,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Nil, Value::Nil) => Some(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
            (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b) {
                    match x.partial_cmp(y)? {
                        Ordering::Equal => continue,
                        unequal => return Some(unequal),
                    }
                }
                a.len().partial_cmp(&b.len())
            }
            (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
            (Value::Int(n), Value::Float(x)) => cmp_int_float(*n, *x),
            (Value::Float(x), Value::Int(n)) => cmp_int_float(*n, *x).map(Ordering::reverse),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(values) => {
                f.write_str("[")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("]")
            }
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Nil, Into::into)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
