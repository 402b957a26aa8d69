use crate::diagnostics::{Diagnostic, Severity};
use crate::parser::{Location, Span};

/// Problems the evaluators can detect in a program.
///
/// Each kind knows its severity, code and message; [`DiagnosticKind::at`]
/// attaches the source position.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    /// A `when` predicate evaluated to something other than a boolean.
    PredicateNotBoolean {
        predicate: String,
        found: &'static str,
    },
    /// Consequents of one `when` expression disagree on their type.
    ConsequentTypeMismatch {
        consequent: String,
        expected: &'static str,
        found: &'static str,
    },
    /// Arithmetic or comparison applied to a non-number.
    NonNumericOperand {
        operand: String,
        op: &'static str,
        found: &'static str,
    },
    /// A `when` predicate can never be true for the given sources.
    UnreachableWhenClause { predicate: String },
    /// An earlier predicate is always true, so `otherwise` is dead.
    UnreachableOtherwise { consequent: String },
    /// Division by an interval that contains zero.
    PrecisionLoss { divisor: String },
    /// Concrete division by zero.
    DivisionByZero { expr: String },
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::PredicateNotBoolean { .. }
            | DiagnosticKind::ConsequentTypeMismatch { .. }
            | DiagnosticKind::NonNumericOperand { .. }
            | DiagnosticKind::DivisionByZero { .. } => Severity::Error,
            DiagnosticKind::UnreachableWhenClause { .. }
            | DiagnosticKind::UnreachableOtherwise { .. } => Severity::Warning,
            DiagnosticKind::PrecisionLoss { .. } => Severity::Info,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::PredicateNotBoolean { .. } => "T001",
            DiagnosticKind::ConsequentTypeMismatch { .. } => "T002",
            DiagnosticKind::NonNumericOperand { .. } => "T003",
            DiagnosticKind::UnreachableWhenClause { .. } => "W001",
            DiagnosticKind::UnreachableOtherwise { .. } => "W002",
            DiagnosticKind::PrecisionLoss { .. } => "I001",
            DiagnosticKind::DivisionByZero { .. } => "R001",
        }
    }

    pub fn message(&self) -> String {
        match self {
            DiagnosticKind::PredicateNotBoolean { predicate, .. } => {
                format!("When clause predicate `{}` is not a boolean", predicate)
            }
            DiagnosticKind::ConsequentTypeMismatch { consequent, .. } => {
                format!("When clause consequent `{}` has wrong type", consequent)
            }
            DiagnosticKind::NonNumericOperand { operand, op, .. } => {
                format!("Operand `{}` of `{}` is not a number", operand, op)
            }
            DiagnosticKind::UnreachableWhenClause { predicate } => {
                format!("When clause predicate `{}` will never be true", predicate)
            }
            DiagnosticKind::UnreachableOtherwise { consequent } => {
                format!("Otherwise clause `{}` will never be reached", consequent)
            }
            DiagnosticKind::PrecisionLoss { divisor } => {
                format!("Divisor `{}` may be zero; result is unbounded", divisor)
            }
            DiagnosticKind::DivisionByZero { expr } => {
                format!("Division by zero in `{}`", expr)
            }
        }
    }

    pub fn help(&self) -> Vec<String> {
        match self {
            DiagnosticKind::PredicateNotBoolean { found, .. } => vec![format!(
                "found a {}; use a comparison such as `this.x > 0`",
                found
            )],
            DiagnosticKind::ConsequentTypeMismatch {
                expected, found, ..
            } => vec![format!(
                "the first consequent is a {}, this one is a {}",
                expected, found
            )],
            DiagnosticKind::NonNumericOperand { found, .. } => {
                vec![format!("found a {}", found)]
            }
            DiagnosticKind::UnreachableWhenClause { .. } => {
                vec!["remove the clause or widen the source ranges".to_string()]
            }
            DiagnosticKind::UnreachableOtherwise { .. }
            | DiagnosticKind::PrecisionLoss { .. }
            | DiagnosticKind::DivisionByZero { .. } => vec![],
        }
    }

    pub fn at(self, span: Span, location: Location) -> Diagnostic {
        Diagnostic {
            severity: self.severity(),
            message: self.message(),
            span,
            location,
            help: self.help(),
            code: self.code(),
        }
    }
}
