//! Binary and comparison operators on concrete numbers.

use crate::parser::{BinaryOp, ComparisonOp};

/// Division by exactly zero is the one failing case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct DivisionByZero;

/// Follows IEEE 754 semantics except for division by zero, which is an
/// error instead of an infinity.
pub(super) fn eval_binary(op: BinaryOp, left: f64, right: f64) -> Result<f64, DivisionByZero> {
    match op {
        BinaryOp::Add => Ok(left + right),
        BinaryOp::Sub => Ok(left - right),
        BinaryOp::Mul => Ok(left * right),
        BinaryOp::Div => {
            if right == 0.0 {
                Err(DivisionByZero)
            } else {
                Ok(left / right)
            }
        }
    }
}

pub(super) fn eval_comparison(op: ComparisonOp, left: f64, right: f64) -> bool {
    match op {
        ComparisonOp::Lt => left < right,
        ComparisonOp::Le => left <= right,
        ComparisonOp::Gt => left > right,
        ComparisonOp::Ge => left >= right,
        ComparisonOp::Eq => left == right,
        ComparisonOp::Ne => left != right,
    }
}
