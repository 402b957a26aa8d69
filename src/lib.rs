//! Tiny - a rule language with an abstract interpreter
//!
//! # Overview
//!
//! A tiny program computes named outputs (sinks) from named inputs
//! (sources) through arithmetic, comparisons and multi-branch `when`
//! expressions:
//!
//! ```text
//! limit = this.x * 2
//! z: when limit > 10 limit
//!    otherwise 10
//! ```
//!
//! Programs can be run two ways:
//!
//! 1. **Abstractly** ([`analyze`]): sources are ranges of values and every
//!    sink gets a range guaranteed to contain every possible result. Type
//!    errors and dead clauses are found without running the program.
//! 2. **Concretely** ([`interpret`]): sources are plain values.
//!
//! # Quick Start
//!
//! ```
//! use tiny::{AbstractValue, AnalyzerOptions, Bindings, Interval};
//!
//! let sources: Bindings<AbstractValue> =
//!     [("x", AbstractValue::from(Interval::new(0.0, 10.0)))].into_iter().collect();
//!
//! let evaluation = tiny::analyze(
//!     "z: when this.x > 5 this.x otherwise 5",
//!     &sources,
//!     AnalyzerOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(evaluation.sinks.get("z"), Some(&AbstractValue::from(Interval::new(0.0, 10.0))));
//! assert!(evaluation.diagnostics.is_empty());
//! ```
//!
//! Problems in the program text never abort a pass. They are returned as
//! [`Diagnostic`]s next to the sink values and can be rendered with
//! [`render_diagnostics_to_string`].

mod error_renderer;

use bumpalo::Bump;
use thiserror::Error;

// Re-export the core modules
pub use tiny_core::{analyzer, diagnostics, domain, environment, evaluator, parser};

// Re-export commonly used types
pub use tiny_core::analyzer::AnalyzerOptions;
pub use tiny_core::diagnostics::{Diagnostic, Diagnostics, Severity};
pub use tiny_core::domain::{AbstractValue, BooleanSet, Interval, IntervalError};
pub use tiny_core::environment::{Bindings, Evaluation, SinkMap};
pub use tiny_core::evaluator::Value;
pub use tiny_core::parser::{Location, ParseError, Span};

// Re-export errors
pub use tiny_core::ContractViolation;

pub use error_renderer::{
    format_sinks, render_diagnostics, render_diagnostics_to_string,
    render_diagnostics_to_string_no_color, render_error_to_string_no_color,
};

/// Failures that stop a pass before any sink is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Contract(#[from] ContractViolation),
}

impl Error {
    /// Convert to a diagnostic located in `source`, for rendering.
    pub fn to_diagnostic(&self, source: &str) -> Diagnostic {
        match self {
            Error::Parse(err) => err.to_diagnostic(),
            Error::Contract(err) => {
                let span = err.span().clone();
                Diagnostic {
                    severity: Severity::Error,
                    message: err.to_string(),
                    location: Location::of(source, span.0.start),
                    span,
                    help: vec![contract_help(err)],
                    code: "C001",
                }
            }
        }
    }
}

fn contract_help(err: &ContractViolation) -> String {
    match err {
        ContractViolation::UnboundSource { name, .. } => {
            format!("Bind `{}` in the sources passed to the pass", name)
        }
        ContractViolation::UnboundVariable { .. } => {
            "Run only programs built by the parser, which rejects reads before assignment"
                .to_string()
        }
        ContractViolation::NonFiniteLiteral { .. } => {
            "Run only programs built by the parser, which rejects non-finite literals".to_string()
        }
    }
}

/// Parse `source` and run it over abstract `sources`.
pub fn analyze(
    source: &str,
    sources: &Bindings<AbstractValue>,
    options: AnalyzerOptions,
) -> Result<Evaluation<AbstractValue>, Error> {
    let arena = Bump::new();
    let program = parser::parse(&arena, source)?;
    tracing::debug!(statements = program.statements.len(), "parsed program");
    Ok(analyzer::evaluate_with_options(&program, sources, options)?)
}

/// Parse `source` and run it over concrete `sources`.
pub fn interpret(source: &str, sources: &Bindings<Value>) -> Result<Evaluation<Value>, Error> {
    let arena = Bump::new();
    let program = parser::parse(&arena, source)?;
    tracing::debug!(statements = program.statements.len(), "parsed program");
    Ok(evaluator::interpret(&program, sources)?)
}
