use core::cell::{Cell, RefCell};

use bumpalo::Bump;
use hashbrown::HashSet;
use lazy_static::lazy_static;
use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;

use crate::parser::{
    AnnotatedSource, BinaryOp, ComparisonOp, Expr, Literal, ParsedProgram, Span, Statement,
    WhenClause,
    error::{ParseError, ParseErrorKind, convert_pest_error},
};

/// Default limit on the height of an expression tree. Operator chains,
/// parentheses and `when` expressions all count.
pub const DEFAULT_MAX_DEPTH: usize = 256;

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        // The grammar allows one comparison per expression, so associativity
        // never comes into play for these.
        .op(
            Op::infix(Rule::lt, Assoc::Left) |
            Op::infix(Rule::le, Assoc::Left) |
            Op::infix(Rule::gt, Assoc::Left) |
            Op::infix(Rule::ge, Assoc::Left) |
            Op::infix(Rule::eq, Assoc::Left) |
            Op::infix(Rule::ne, Assoc::Left)
        )                                               // `<`, `<=`, `>`, `>=`, `==`, `!=`
        .op(
            Op::infix(Rule::add, Assoc::Left) |
            Op::infix(Rule::sub, Assoc::Left)
        )                                               // `+`, `-`
        .op(
            Op::infix(Rule::mul, Assoc::Left) |
            Op::infix(Rule::div, Assoc::Left)
        )                                               // `*`, `/`
        // (highest precedence)
        ;
}

#[derive(Parser)]
#[grammar = "parser/tiny.pest"]
pub struct ProgramParser;

/// Parse a program into a tree allocated in `arena`.
pub fn parse<'a>(arena: &'a Bump, source: &'a str) -> Result<ParsedProgram<'a>, ParseError> {
    parse_with_max_depth(arena, source, DEFAULT_MAX_DEPTH)
}

/// Parse a program, rejecting expression trees taller than `max_depth`.
///
/// Both evaluators recurse once per tree level, so this bounds their stack
/// use.
pub fn parse_with_max_depth<'a>(
    arena: &'a Bump,
    source: &'a str,
    max_depth: usize,
) -> Result<ParsedProgram<'a>, ParseError> {
    let mut pairs = ProgramParser::parse(Rule::program, source)
        .map_err(|e| convert_pest_error(e, source, max_depth))?;
    let program = pairs.next().ok_or_else(|| {
        ParseError::new(
            ParseErrorKind::Other {
                message: "missing program".to_string(),
            },
            source,
            Span::new(0, 0),
        )
    })?;

    let builder = TreeBuilder {
        arena,
        ann: arena.alloc(AnnotatedSource::new(arena, source)),
        depth: Cell::new(0),
        deepest: Cell::new(0),
        max_depth,
        declared: RefCell::new(HashSet::new()),
        sinks: RefCell::new(HashSet::new()),
    };
    let statements = builder.build_statements(program)?;
    tracing::debug!(statements = statements.len(), "parsed program");

    Ok(ParsedProgram {
        statements,
        ann: builder.ann,
    })
}

/// Turns pest pairs into arena-allocated nodes, recording spans as it goes.
struct TreeBuilder<'a> {
    arena: &'a Bump,
    ann: &'a AnnotatedSource<'a, Expr<'a>>,
    depth: Cell<usize>,
    /// Deepest level reached so far, operator nodes included.
    deepest: Cell<usize>,
    max_depth: usize,
    /// Locals assigned so far, in statement order.
    declared: RefCell<HashSet<&'a str>>,
    sinks: RefCell<HashSet<&'a str>>,
}

impl<'a> TreeBuilder<'a> {
    fn build_statements(&self, program: Pair<'a, Rule>) -> Result<&'a [Statement<'a>], ParseError> {
        let mut statements = Vec::new();
        for pair in program.into_inner() {
            match pair.as_rule() {
                Rule::variable_assignment => {
                    let (name, expr) = self.build_assignment(pair)?;
                    // The right-hand side cannot see the name it is defining.
                    self.declared.borrow_mut().insert(name);
                    statements.push(Statement::Variable { name, expr });
                }
                Rule::sink_assignment => {
                    let span = Span::from(pair.as_span());
                    let (name, expr) = self.build_assignment(pair)?;
                    if !self.sinks.borrow_mut().insert(name) {
                        return Err(ParseError::new(
                            ParseErrorKind::DuplicateSink {
                                name: name.to_string(),
                            },
                            self.ann.source,
                            span,
                        ));
                    }
                    statements.push(Statement::Sink { name, expr });
                }
                Rule::EOI => {}
                _ => return Err(self.malformed("statement", &pair)),
            }
        }
        Ok(self.arena.alloc_slice_copy(&statements))
    }

    fn build_assignment(&self, pair: Pair<'a, Rule>) -> Result<(&'a str, &'a Expr<'a>), ParseError> {
        let mut inner = pair.clone().into_inner();
        let name = self.next_inner(&mut inner, &pair)?.as_str();
        let expr = self.build_expr(self.next_inner(&mut inner, &pair)?)?;
        Ok((name, expr))
    }

    fn build_expr(&self, pair: Pair<'a, Rule>) -> Result<&'a Expr<'a>, ParseError> {
        let depth = self.depth.get() + 1;
        if depth > self.max_depth {
            return Err(ParseError::new(
                ParseErrorKind::MaxDepthExceeded {
                    depth,
                    max_depth: self.max_depth,
                },
                self.ann.source,
                pair.as_span().into(),
            ));
        }

        self.depth.set(depth);
        self.deepest.set(self.deepest.get().max(depth));
        let result = self.build_expr_inner(pair);
        self.depth.set(depth - 1);

        result
    }

    fn build_expr_inner(&self, pair: Pair<'a, Rule>) -> Result<&'a Expr<'a>, ParseError> {
        let span = Span::from(pair.as_span());
        match pair.as_rule() {
            Rule::when_expr => {
                let mut clauses = Vec::new();
                let mut otherwise = None;
                for clause in pair.clone().into_inner() {
                    match clause.as_rule() {
                        Rule::when_clause => {
                            let mut inner = keywords_skipped(clause.clone().into_inner());
                            let predicate = self.build_expr(self.next_inner(&mut inner, &clause)?)?;
                            let consequent =
                                self.build_expr(self.next_inner(&mut inner, &clause)?)?;
                            clauses.push(WhenClause {
                                predicate,
                                consequent,
                            });
                        }
                        Rule::otherwise_clause => {
                            let mut inner = keywords_skipped(clause.clone().into_inner());
                            otherwise = Some(self.build_expr(self.next_inner(&mut inner, &clause)?)?);
                        }
                        _ => return Err(self.malformed("when clause", &clause)),
                    }
                }

                let otherwise = otherwise.ok_or_else(|| self.malformed("otherwise clause", &pair))?;
                if clauses.is_empty() {
                    return Err(self.malformed("when clause", &pair));
                }
                Ok(self.alloc(
                    Expr::When {
                        clauses: self.arena.alloc_slice_copy(&clauses),
                        otherwise,
                    },
                    span,
                ))
            }

            Rule::binary => {
                // Operator nodes are built here rather than through
                // `build_expr`, so their height is tracked by hand: a primary
                // reports how far below `base` it reached, and each operator
                // sits one level above its taller operand.
                let base = self.depth.get();
                PRATT_PARSER
                    .map_primary(|primary| {
                        let outer = self.deepest.replace(base);
                        let expr = self.build_expr(primary);
                        let height = self.deepest.get() - base;
                        self.deepest.set(self.deepest.get().max(outer));
                        Ok((expr?, height))
                    })
                    .map_infix(|lhs, op, rhs| {
                        let (left, left_height) = lhs?;
                        let (right, right_height) = rhs?;
                        let span = Span::combine(&self.span_of(left), &self.span_of(right));

                        let height = left_height.max(right_height) + 1;
                        let depth = base + height;
                        if depth > self.max_depth {
                            return Err(ParseError::new(
                                ParseErrorKind::MaxDepthExceeded {
                                    depth,
                                    max_depth: self.max_depth,
                                },
                                self.ann.source,
                                span,
                            ));
                        }
                        self.deepest.set(self.deepest.get().max(depth));

                        let expr = match op.as_rule() {
                            Rule::add => Expr::Binary { op: BinaryOp::Add, left, right },
                            Rule::sub => Expr::Binary { op: BinaryOp::Sub, left, right },
                            Rule::mul => Expr::Binary { op: BinaryOp::Mul, left, right },
                            Rule::div => Expr::Binary { op: BinaryOp::Div, left, right },
                            Rule::lt => Expr::Comparison { op: ComparisonOp::Lt, left, right },
                            Rule::le => Expr::Comparison { op: ComparisonOp::Le, left, right },
                            Rule::gt => Expr::Comparison { op: ComparisonOp::Gt, left, right },
                            Rule::ge => Expr::Comparison { op: ComparisonOp::Ge, left, right },
                            Rule::eq => Expr::Comparison { op: ComparisonOp::Eq, left, right },
                            Rule::ne => Expr::Comparison { op: ComparisonOp::Ne, left, right },
                            _ => return Err(self.malformed("operator", &op)),
                        };
                        Ok((self.alloc(expr, span), height))
                    })
                    .parse(pair.into_inner())
                    .map(|(expr, _)| expr)
            }

            Rule::grouped => {
                let mut inner = pair.clone().into_inner();
                let expr = self.build_expr(self.next_inner(&mut inner, &pair)?)?;
                // Quote the parentheses too when the group is reported.
                self.ann.add_span(expr, span);
                Ok(expr)
            }

            Rule::boolean => Ok(self.alloc(Expr::Literal(Literal::Bool(pair.as_str() == "true")), span)),

            Rule::number => {
                let text = pair.as_str();
                match text.parse::<f64>() {
                    Ok(value) if value.is_finite() => {
                        Ok(self.alloc(Expr::Literal(Literal::Number(value)), span))
                    }
                    _ => Err(ParseError::new(
                        ParseErrorKind::InvalidNumber {
                            text: text.to_string(),
                        },
                        self.ann.source,
                        span,
                    )),
                }
            }

            Rule::source_ref => {
                let mut inner = keywords_skipped(pair.clone().into_inner());
                let name = self.next_inner(&mut inner, &pair)?.as_str();
                Ok(self.alloc(Expr::Source(name), span))
            }

            Rule::variable_ref => {
                let name = pair.as_str();
                if !self.declared.borrow().contains(name) {
                    return Err(ParseError::new(
                        ParseErrorKind::UnboundVariable {
                            name: name.to_string(),
                        },
                        self.ann.source,
                        span,
                    ));
                }
                Ok(self.alloc(Expr::Variable(name), span))
            }

            _ => Err(self.malformed("expression", &pair)),
        }
    }

    fn alloc(&self, expr: Expr<'a>, span: Span) -> &'a Expr<'a> {
        let expr = self.arena.alloc(expr);
        self.ann.add_span(expr, span);
        expr
    }

    fn span_of(&self, expr: &Expr<'a>) -> Span {
        self.ann.span_of(expr).unwrap_or(Span::new(0, 0))
    }

    fn next_inner(
        &self,
        inner: &mut impl Iterator<Item = Pair<'a, Rule>>,
        parent: &Pair<'a, Rule>,
    ) -> Result<Pair<'a, Rule>, ParseError> {
        inner
            .next()
            .ok_or_else(|| self.malformed("missing expected pair in rule", parent))
    }

    fn malformed(&self, what: &str, pair: &Pair<'a, Rule>) -> ParseError {
        ParseError::new(
            ParseErrorKind::Other {
                message: format!("unexpected {:?} while reading {}", pair.as_rule(), what),
            },
            self.ann.source,
            pair.as_span().into(),
        )
    }
}

fn keywords_skipped<'a>(pairs: Pairs<'a, Rule>) -> impl Iterator<Item = Pair<'a, Rule>> {
    pairs.filter(|p| !matches!(p.as_rule(), Rule::kw_when | Rule::kw_otherwise | Rule::kw_this))
}
