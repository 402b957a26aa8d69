//! Core evaluation logic.

use crate::{
    diagnostics::{DiagnosticKind, Diagnostics},
    environment::{Bindings, Environment, Evaluation},
    errors::ContractViolation,
    evaluator::{
        Value,
        operators::{self, DivisionByZero},
    },
    parser::{BinaryOp, ComparisonOp, Expr, Literal, ParsedProgram, Statement, WhenClause},
};

/// Evaluator for one pass of a program over concrete sources.
pub(super) struct Evaluator<'p, 'a, 's> {
    program: &'p ParsedProgram<'a>,
    env: Environment<'s, Value>,
    diagnostics: Diagnostics,
}

impl<'p, 'a, 's> Evaluator<'p, 'a, 's> {
    pub(super) fn new(program: &'p ParsedProgram<'a>, sources: &'s Bindings<Value>) -> Self {
        Self {
            program,
            env: Environment::new(sources),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Run every statement in order.
    pub(super) fn run(mut self) -> Result<Evaluation<Value>, ContractViolation> {
        let mut sinks = Bindings::new();
        for statement in self.program.statements {
            match *statement {
                Statement::Variable { name, expr } => {
                    let value = self.eval_expr(expr)?;
                    tracing::debug!(name, %value, "bound variable");
                    self.env.bind_local(name, value);
                }
                Statement::Sink { name, expr } => {
                    let value = self.eval_expr(expr)?;
                    tracing::debug!(sink = name, %value, "evaluated sink");
                    sinks.insert(name, value);
                }
            }
        }
        Ok(Evaluation {
            sinks,
            diagnostics: self.diagnostics,
        })
    }

    fn eval_expr(&mut self, expr: &'a Expr<'a>) -> Result<Value, ContractViolation> {
        match *expr {
            Expr::Literal(Literal::Number(n)) => Ok(Value::Number(n)),
            Expr::Literal(Literal::Bool(b)) => Ok(Value::Bool(b)),

            Expr::Source(name) => self.env.source(name).copied().ok_or_else(|| {
                ContractViolation::UnboundSource {
                    name: name.to_string(),
                    span: self.program.span_of(expr),
                }
            }),

            Expr::Variable(name) => self.env.local(name).copied().ok_or_else(|| {
                ContractViolation::UnboundVariable {
                    name: name.to_string(),
                    span: self.program.span_of(expr),
                }
            }),

            Expr::Binary { op, left, right } => self.eval_binary(expr, op, left, right),

            Expr::Comparison { op, left, right } => self.eval_comparison(op, left, right),

            Expr::When { clauses, otherwise } => self.eval_when(clauses, otherwise),
        }
    }

    fn eval_binary(
        &mut self,
        expr: &'a Expr<'a>,
        op: BinaryOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    ) -> Result<Value, ContractViolation> {
        let Some((l, r)) = self.numeric_operands(op.symbol(), left, right)? else {
            return Ok(Value::Undefined);
        };
        match operators::eval_binary(op, l, r) {
            Ok(n) => Ok(Value::Number(n)),
            Err(DivisionByZero) => {
                let text = self.program.text_of(expr).to_string();
                self.report(DiagnosticKind::DivisionByZero { expr: text }, expr);
                Ok(Value::Undefined)
            }
        }
    }

    fn eval_comparison(
        &mut self,
        op: ComparisonOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    ) -> Result<Value, ContractViolation> {
        Ok(match self.numeric_operands(op.symbol(), left, right)? {
            Some((l, r)) => Value::Bool(operators::eval_comparison(op, l, r)),
            None => Value::Undefined,
        })
    }

    /// Evaluates both operands and returns them if both are numbers.
    ///
    /// The first operand that is neither a number nor undefined is reported.
    fn numeric_operands(
        &mut self,
        op: &'static str,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    ) -> Result<Option<(f64, f64)>, ContractViolation> {
        let l = self.eval_expr(left)?;
        let r = self.eval_expr(right)?;
        if let (Value::Number(l), Value::Number(r)) = (l, r) {
            return Ok(Some((l, r)));
        }
        if l.is_undefined() || r.is_undefined() {
            return Ok(None);
        }
        let (value, operand) = if l.as_number().is_none() {
            (l, left)
        } else {
            (r, right)
        };
        let kind = DiagnosticKind::NonNumericOperand {
            operand: self.program.text_of(operand).to_string(),
            op,
            found: value.type_name(),
        };
        self.report(kind, operand);
        Ok(None)
    }

    /// Picks the first clause whose predicate holds, else `otherwise`.
    fn eval_when(
        &mut self,
        clauses: &'a [WhenClause<'a>],
        otherwise: &'a Expr<'a>,
    ) -> Result<Value, ContractViolation> {
        for clause in clauses {
            match self.eval_expr(clause.predicate)? {
                Value::Bool(true) => return self.eval_expr(clause.consequent),
                Value::Bool(false) => {}
                Value::Undefined => return Ok(Value::Undefined),
                other => {
                    let kind = DiagnosticKind::PredicateNotBoolean {
                        predicate: self.program.text_of(clause.predicate).to_string(),
                        found: other.type_name(),
                    };
                    self.report(kind, clause.predicate);
                    return Ok(Value::Undefined);
                }
            }
        }
        self.eval_expr(otherwise)
    }

    fn report(&mut self, kind: DiagnosticKind, expr: &'a Expr<'a>) {
        self.diagnostics.report(
            kind,
            self.program.span_of(expr),
            self.program.location_of(expr),
        );
    }
}
