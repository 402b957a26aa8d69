//! Concrete evaluator.
//!
//! Runs a program on plain numbers and booleans. A `when` expression picks
//! the first clause whose predicate is `true`; only that branch is
//! evaluated.
//!
//! User mistakes never abort the pass: they are reported as diagnostics and
//! the offending expression becomes [`Value::Undefined`]. Only a
//! [`ContractViolation`] is returned as an error.
//!
//! ## Example
//!
//! ```
//! use bumpalo::Bump;
//! use tiny_core::{environment::Bindings, evaluator::{self, Value}, parser};
//!
//! let arena = Bump::new();
//! let program = parser::parse(&arena, "z: when this.x > 5 1 otherwise 0").unwrap();
//! let sources: Bindings<Value> = [("x", Value::Number(7.0))].into_iter().collect();
//!
//! let evaluation = evaluator::interpret(&program, &sources).unwrap();
//! assert_eq!(evaluation.sinks.get("z"), Some(&Value::Number(1.0)));
//! ```

mod eval;
mod operators;
mod value;

#[cfg(test)]
mod eval_test;

pub use value::Value;

use crate::{
    environment::{Bindings, Evaluation},
    errors::ContractViolation,
    parser::ParsedProgram,
};

/// Evaluate every statement of `program` against concrete `sources`.
pub fn interpret(
    program: &ParsedProgram<'_>,
    sources: &Bindings<Value>,
) -> Result<Evaluation<Value>, ContractViolation> {
    eval::Evaluator::new(program, sources).run()
}
