//! Abstract evaluator.
//!
//! Runs a program over abstract sources: intervals for numbers and boolean
//! sets for booleans. Every sink gets a value that contains every result a
//! concrete run could produce for sources drawn from those ranges, or
//! [`AbstractValue::Undefined`] when a type error was diagnosed for it.
//!
//! ## Example
//!
//! ```
//! use bumpalo::Bump;
//! use tiny_core::{
//!     analyzer,
//!     domain::{AbstractValue, Interval},
//!     environment::Bindings,
//!     parser,
//! };
//!
//! let arena = Bump::new();
//! let program = parser::parse(&arena, "z: this.x * 2").unwrap();
//! let sources: Bindings<AbstractValue> =
//!     [("x", AbstractValue::Interval(Interval::new(1.0, 3.0)))].into_iter().collect();
//!
//! let evaluation = analyzer::evaluate(&program, &sources).unwrap();
//! assert_eq!(
//!     evaluation.sinks.get("z"),
//!     Some(&AbstractValue::Interval(Interval::new(2.0, 6.0)))
//! );
//! ```

#[allow(clippy::module_inception)]
mod analyzer;


use crate::{
    domain::AbstractValue,
    environment::{Bindings, Evaluation},
    errors::ContractViolation,
    parser::ParsedProgram,
};

/// Optional diagnostics. Neither changes any computed value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzerOptions {
    /// Report an info diagnostic when a divisor may be zero.
    pub report_precision_loss: bool,
    /// Warn when an always-true predicate makes `otherwise` dead.
    pub warn_unreachable_otherwise: bool,
}

/// Evaluate every statement of `program` against abstract `sources` with
/// default options.
pub fn evaluate(
    program: &ParsedProgram<'_>,
    sources: &Bindings<AbstractValue>,
) -> Result<Evaluation<AbstractValue>, ContractViolation> {
    evaluate_with_options(program, sources, AnalyzerOptions::default())
}

pub fn evaluate_with_options(
    program: &ParsedProgram<'_>,
    sources: &Bindings<AbstractValue>,
    options: AnalyzerOptions,
) -> Result<Evaluation<AbstractValue>, ContractViolation> {
    analyzer::Analyzer::new(options, program, sources).run()
}
