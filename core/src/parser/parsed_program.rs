use crate::parser::{
    BinaryOp, ComparisonOp,
    syntax::{AnnotatedSource, Location, Span},
};

/// A parsed program: its statements in source order, plus the annotated
/// source used to quote and locate nodes in diagnostics.
#[derive(Debug)]
pub struct ParsedProgram<'a> {
    pub statements: &'a [Statement<'a>],
    pub ann: &'a AnnotatedSource<'a, Expr<'a>>,
}

impl<'a> ParsedProgram<'a> {
    pub fn source(&self) -> &'a str {
        self.ann.source
    }

    /// Span of a node of this program.
    ///
    /// Every node built by the parser has a span; a node built elsewhere
    /// falls back to an empty span at the start of the source.
    pub fn span_of(&self, expr: &Expr<'a>) -> Span {
        let span = self.ann.span_of(expr);
        debug_assert!(span.is_some(), "span not found for {:?}", expr);
        span.unwrap_or(Span::new(0, 0))
    }

    /// Source text of a node, as written.
    pub fn text_of(&self, expr: &Expr<'a>) -> &'a str {
        self.ann.snippet(&self.span_of(expr))
    }

    pub fn location_of(&self, expr: &Expr<'a>) -> Location {
        self.ann.location_of(&self.span_of(expr))
    }

    /// Names of the sinks in declaration order.
    pub fn sink_names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.statements.iter().filter_map(|statement| match statement {
            Statement::Sink { name, .. } => Some(*name),
            Statement::Variable { .. } => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Statement<'a> {
    /// `name = expr`
    Variable { name: &'a str, expr: &'a Expr<'a> },
    /// `name: expr`
    Sink { name: &'a str, expr: &'a Expr<'a> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    /// `when p1 c1 when p2 c2 ... otherwise d`
    When {
        // REQUIRES: !clauses.is_empty()
        clauses: &'a [WhenClause<'a>],
        otherwise: &'a Expr<'a>,
    },
    Comparison {
        op: ComparisonOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    },
    Binary {
        op: BinaryOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    },
    Literal(Literal),
    /// Reference to a local variable.
    Variable(&'a str),
    /// `this.name`
    Source(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhenClause<'a> {
    pub predicate: &'a Expr<'a>,
    pub consequent: &'a Expr<'a>,
}

#[derive(Clone, Copy, PartialEq)]
pub enum Literal {
    Number(f64),
    Bool(bool),
}

impl core::fmt::Debug for Literal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Literal::Number(value) => write!(f, "Number({value})"),
            Literal::Bool(b) => write!(f, "Bool({b})"),
        }
    }
}
