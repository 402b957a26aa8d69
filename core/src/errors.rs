use thiserror::Error;

use crate::parser::Span;

/// A program reached an evaluator in a state the parser should have ruled
/// out. These are bugs in the caller, not problems in the program text, so
/// they abort the pass instead of becoming diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractViolation {
    #[error("source `this.{name}` has no binding")]
    UnboundSource { name: String, span: Span },

    #[error("variable `{name}` is read before it is assigned")]
    UnboundVariable { name: String, span: Span },

    #[error("number literal {value} is not finite")]
    NonFiniteLiteral { value: f64, span: Span },
}

impl ContractViolation {
    pub fn span(&self) -> &Span {
        match self {
            ContractViolation::UnboundSource { span, .. }
            | ContractViolation::UnboundVariable { span, .. }
            | ContractViolation::NonFiniteLiteral { span, .. } => span,
        }
    }
}
