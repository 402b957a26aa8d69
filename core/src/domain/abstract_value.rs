use core::fmt;

use crate::domain::{BooleanSet, Interval};
use crate::evaluator::Value;

/// Result of evaluating an expression abstractly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbstractValue {
    Interval(Interval),
    Boolean(BooleanSet),
    /// No typed result, either because an error was diagnosed while
    /// computing it or because an input was itself undefined.
    Undefined,
}

impl AbstractValue {
    /// Name of the variant as shown in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            AbstractValue::Interval(_) => "number",
            AbstractValue::Boolean(_) => "boolean",
            AbstractValue::Undefined => "undefined",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, AbstractValue::Undefined)
    }

    pub fn as_interval(&self) -> Option<Interval> {
        match self {
            AbstractValue::Interval(interval) => Some(*interval),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<BooleanSet> {
        match self {
            AbstractValue::Boolean(set) => Some(*set),
            _ => None,
        }
    }

    /// Whether both values have the same variant.
    pub fn same_variant(&self, other: &AbstractValue) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }

    /// Join of two values of the same variant; anything else is undefined.
    pub fn union(&self, other: &AbstractValue) -> AbstractValue {
        match (self, other) {
            (AbstractValue::Interval(a), AbstractValue::Interval(b)) => {
                AbstractValue::Interval(a.union(b))
            }
            (AbstractValue::Boolean(a), AbstractValue::Boolean(b)) => {
                AbstractValue::Boolean(a.union(*b))
            }
            _ => AbstractValue::Undefined,
        }
    }

    /// Whether a concrete result is described by this abstract one.
    ///
    /// `Undefined` only describes `Undefined`.
    pub fn contains(&self, value: &Value) -> bool {
        match (self, value) {
            (AbstractValue::Interval(interval), Value::Number(n)) => interval.contains(*n),
            (AbstractValue::Boolean(set), Value::Bool(b)) => set.possibly(*b),
            (AbstractValue::Undefined, Value::Undefined) => true,
            _ => false,
        }
    }
}

impl From<Interval> for AbstractValue {
    fn from(interval: Interval) -> Self {
        AbstractValue::Interval(interval)
    }
}

impl From<BooleanSet> for AbstractValue {
    fn from(set: BooleanSet) -> Self {
        AbstractValue::Boolean(set)
    }
}

impl fmt::Display for AbstractValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbstractValue::Interval(interval) => write!(f, "{}", interval),
            AbstractValue::Boolean(set) => write!(f, "{}", set),
            AbstractValue::Undefined => write!(f, "undefined"),
        }
    }
}
