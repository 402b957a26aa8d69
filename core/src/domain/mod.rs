//! Abstract value domains.
//!
//! Numbers are approximated by closed intervals and booleans by non-empty
//! subsets of `{true, false}`. Both are immutable `Copy` values; every
//! operation returns a new one.

mod abstract_value;
mod boolean_set;
mod interval;

pub use abstract_value::AbstractValue;
pub use boolean_set::BooleanSet;
pub use interval::{Interval, IntervalError};
