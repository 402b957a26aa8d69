use core::fmt;

use crate::domain::{AbstractValue, BooleanSet, Interval};

/// Result of evaluating an expression on concrete inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
    /// No result, because an error was diagnosed while computing it.
    Undefined,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Undefined => "undefined",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The most precise abstract value describing `self`.
    ///
    /// Numbers that are not finite have no singleton interval and lift to
    /// the interval they belong to.
    pub fn to_abstract(&self) -> AbstractValue {
        match *self {
            Value::Number(n) if n.is_nan() => AbstractValue::Interval(Interval::entire()),
            Value::Number(n) if n == f64::INFINITY => {
                AbstractValue::Interval(Interval::new(f64::MAX, f64::INFINITY))
            }
            Value::Number(n) if n == f64::NEG_INFINITY => {
                AbstractValue::Interval(Interval::new(f64::NEG_INFINITY, f64::MIN))
            }
            Value::Number(n) => AbstractValue::Interval(Interval::singleton(n)),
            Value::Bool(b) => AbstractValue::Boolean(BooleanSet::from_bool(b)),
            Value::Undefined => AbstractValue::Undefined,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) if *n == 0.0 => write!(f, "0"),
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Undefined => write!(f, "undefined"),
        }
    }
}
