use crate::{
    analyzer::AnalyzerOptions,
    diagnostics::{DiagnosticKind, Diagnostics},
    domain::{AbstractValue, BooleanSet, Interval},
    environment::{Bindings, Environment, Evaluation},
    errors::ContractViolation,
    parser::{BinaryOp, ComparisonOp, Expr, Literal, ParsedProgram, Statement, WhenClause},
};

/// Abstract evaluator for one pass of a program.
pub(super) struct Analyzer<'p, 'a, 's> {
    options: AnalyzerOptions,
    program: &'p ParsedProgram<'a>,
    env: Environment<'s, AbstractValue>,
    diagnostics: Diagnostics,
}

impl<'p, 'a, 's> Analyzer<'p, 'a, 's> {
    pub(super) fn new(
        options: AnalyzerOptions,
        program: &'p ParsedProgram<'a>,
        sources: &'s Bindings<AbstractValue>,
    ) -> Self {
        Self {
            options,
            program,
            env: Environment::new(sources),
            diagnostics: Diagnostics::new(),
        }
    }

    pub(super) fn run(mut self) -> Result<Evaluation<AbstractValue>, ContractViolation> {
        let mut sinks = Bindings::new();
        for statement in self.program.statements {
            match *statement {
                Statement::Variable { name, expr } => {
                    let value = self.analyze(expr)?;
                    tracing::debug!(name, %value, "bound variable");
                    self.env.bind_local(name, value);
                }
                Statement::Sink { name, expr } => {
                    let value = self.analyze(expr)?;
                    tracing::debug!(sink = name, %value, "analyzed sink");
                    sinks.insert(name, value);
                }
            }
        }
        Ok(Evaluation {
            sinks,
            diagnostics: self.diagnostics,
        })
    }

    fn analyze(&mut self, expr: &'a Expr<'a>) -> Result<AbstractValue, ContractViolation> {
        match *expr {
            Expr::Literal(Literal::Number(n)) => Interval::try_new(n, n)
                .map(AbstractValue::Interval)
                .map_err(|_| ContractViolation::NonFiniteLiteral {
                    value: n,
                    span: self.program.span_of(expr),
                }),

            Expr::Literal(Literal::Bool(b)) => Ok(AbstractValue::Boolean(BooleanSet::from_bool(b))),

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

            Expr::Binary { op, left, right } => self.analyze_binary(op, left, right),

            Expr::Comparison { op, left, right } => self.analyze_comparison(op, left, right),

            Expr::When { clauses, otherwise } => self.analyze_when(clauses, otherwise),
        }
    }

    fn analyze_binary(
        &mut self,
        op: BinaryOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    ) -> Result<AbstractValue, ContractViolation> {
        let Some((l, r)) = self.numeric_operands(op.symbol(), left, right)? else {
            return Ok(AbstractValue::Undefined);
        };
        let result = match op {
            BinaryOp::Add => l.add(&r),
            BinaryOp::Sub => l.sub(&r),
            BinaryOp::Mul => l.mul(&r),
            BinaryOp::Div => {
                if self.options.report_precision_loss && r.contains_zero() {
                    let divisor = self.program.text_of(right).to_string();
                    self.report(DiagnosticKind::PrecisionLoss { divisor }, right);
                }
                l.div(&r)
            }
        };
        Ok(AbstractValue::Interval(result))
    }

    fn analyze_comparison(
        &mut self,
        op: ComparisonOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    ) -> Result<AbstractValue, ContractViolation> {
        let Some((l, r)) = self.numeric_operands(op.symbol(), left, right)? else {
            return Ok(AbstractValue::Undefined);
        };
        let result = match op {
            ComparisonOp::Lt => l.lt(&r),
            ComparisonOp::Le => l.le(&r),
            ComparisonOp::Gt => l.gt(&r),
            ComparisonOp::Ge => l.ge(&r),
            ComparisonOp::Eq => l.equal(&r),
            ComparisonOp::Ne => l.not_equal(&r),
        };
        Ok(AbstractValue::Boolean(result))
    }

    /// Analyzes both operands and returns them if both are intervals.
    ///
    /// The first operand that is neither an interval nor undefined is
    /// reported; an undefined operand was already reported where it arose.
    fn numeric_operands(
        &mut self,
        op: &'static str,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    ) -> Result<Option<(Interval, Interval)>, ContractViolation> {
        let l = self.analyze(left)?;
        let r = self.analyze(right)?;
        if let (AbstractValue::Interval(l), AbstractValue::Interval(r)) = (l, r) {
            return Ok(Some((l, r)));
        }
        if l.is_undefined() || r.is_undefined() {
            return Ok(None);
        }
        let (value, operand) = if l.as_interval().is_none() {
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

    /// Multi-branch selection.
    ///
    /// 1. Every predicate must be a boolean set. Each one that is not is
    ///    reported and the whole expression is undefined.
    /// 2. A predicate that cannot be true makes its clause unreachable. This
    ///    is a warning; the consequent is still type checked.
    /// 3. All consequents, `otherwise` included, must share a variant. The
    ///    first one that differs from the first consequent is reported and
    ///    the whole expression is undefined.
    /// 4. The result joins the consequents of reachable clauses with
    ///    `otherwise`.
    fn analyze_when(
        &mut self,
        clauses: &'a [WhenClause<'a>],
        otherwise: &'a Expr<'a>,
    ) -> Result<AbstractValue, ContractViolation> {
        let mut predicates = Vec::with_capacity(clauses.len());
        let mut well_typed = true;
        for clause in clauses {
            match self.analyze(clause.predicate)? {
                AbstractValue::Boolean(set) => predicates.push(set),
                AbstractValue::Undefined => well_typed = false,
                other => {
                    let kind = DiagnosticKind::PredicateNotBoolean {
                        predicate: self.program.text_of(clause.predicate).to_string(),
                        found: other.type_name(),
                    };
                    self.report(kind, clause.predicate);
                    well_typed = false;
                }
            }
        }
        if !well_typed {
            return Ok(AbstractValue::Undefined);
        }

        let mut reachable = Vec::with_capacity(clauses.len());
        for (clause, predicate) in clauses.iter().zip(&predicates) {
            let possible = predicate.possibly(true);
            tracing::trace!(
                clause = self.program.text_of(clause.predicate),
                %predicate,
                possible,
                "when clause reachability"
            );
            if !possible {
                let predicate = self.program.text_of(clause.predicate).to_string();
                self.report(DiagnosticKind::UnreachableWhenClause { predicate }, clause.predicate);
            }
            reachable.push(possible);
        }
        if self.options.warn_unreachable_otherwise && predicates.contains(&BooleanSet::True) {
            let consequent = self.program.text_of(otherwise).to_string();
            self.report(DiagnosticKind::UnreachableOtherwise { consequent }, otherwise);
        }

        let mut consequents = Vec::with_capacity(clauses.len() + 1);
        for clause in clauses {
            consequents.push((self.analyze(clause.consequent)?, clause.consequent));
        }
        consequents.push((self.analyze(otherwise)?, otherwise));

        if consequents.iter().any(|(value, _)| value.is_undefined()) {
            return Ok(AbstractValue::Undefined);
        }
        let expected = consequents[0].0;
        if let Some(&(found, consequent)) = consequents
            .iter()
            .find(|(value, _)| !value.same_variant(&expected))
        {
            let kind = DiagnosticKind::ConsequentTypeMismatch {
                consequent: self.program.text_of(consequent).to_string(),
                expected: expected.type_name(),
                found: found.type_name(),
            };
            self.report(kind, consequent);
            return Ok(AbstractValue::Undefined);
        }

        // The last entry is `otherwise`, which always contributes.
        let (default, _) = consequents[clauses.len()];
        let result = consequents
            .iter()
            .zip(&reachable)
            .filter(|(_, reachable)| **reachable)
            .fold(default, |acc, ((value, _), _)| acc.union(value));
        Ok(result)
    }

    fn report(&mut self, kind: DiagnosticKind, expr: &'a Expr<'a>) {
        self.diagnostics.report(
            kind,
            self.program.span_of(expr),
            self.program.location_of(expr),
        );
    }
}
