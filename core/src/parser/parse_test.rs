use bumpalo::Bump;
use indoc::indoc;
use pretty_assertions::assert_eq;

use crate::parser::{
    BinaryOp, ComparisonOp, Expr, Literal, Location, ParseErrorKind, ParsedProgram, Span,
    Statement, parse, parse_with_max_depth,
};

fn parse_ok<'a>(arena: &'a Bump, source: &'a str) -> ParsedProgram<'a> {
    parse(arena, source).unwrap_or_else(|e| panic!("parsing failed: {}\n{}", source, e))
}

fn sink_expr<'a>(program: &ParsedProgram<'a>, index: usize) -> &'a Expr<'a> {
    match program.statements[index] {
        Statement::Sink { expr, .. } => expr,
        other => panic!("statement {} is not a sink: {:?}", index, other),
    }
}

#[test]
fn test_empty_program() {
    let arena = Bump::new();
    let program = parse_ok(&arena, "");
    assert!(program.statements.is_empty());

    let program = parse_ok(&arena, "  // nothing here\n");
    assert!(program.statements.is_empty());
}

#[test]
fn test_sink_of_source() {
    let arena = Bump::new();
    let program = parse_ok(&arena, "z: this.x");
    assert_eq!(program.statements.len(), 1);
    assert_eq!(sink_expr(&program, 0), &Expr::Source("x"));
    assert_eq!(program.sink_names().collect::<Vec<_>>(), ["z"]);
}

#[test]
fn test_variable_then_sink() {
    let arena = Bump::new();
    let program = parse_ok(&arena, "limit = 10\nz: limit + 1.5");
    match program.statements[0] {
        Statement::Variable { name, expr } => {
            assert_eq!(name, "limit");
            assert_eq!(expr, &Expr::Literal(Literal::Number(10.0)));
        }
        other => panic!("expected a variable statement, got {:?}", other),
    }
    assert_eq!(
        sink_expr(&program, 1),
        &Expr::Binary {
            op: BinaryOp::Add,
            left: &Expr::Variable("limit"),
            right: &Expr::Literal(Literal::Number(1.5)),
        }
    );
}

#[test]
fn test_when_expression_structure() {
    let arena = Bump::new();
    let program = parse_ok(
        &arena,
        indoc! {"
            z: when this.x < 10 0
               when this.x > 10 20
               otherwise 10
        "},
    );

    let Expr::When { clauses, otherwise } = sink_expr(&program, 0) else {
        panic!("expected a when expression");
    };
    assert_eq!(clauses.len(), 2);
    assert_eq!(
        clauses[0].predicate,
        &Expr::Comparison {
            op: ComparisonOp::Lt,
            left: &Expr::Source("x"),
            right: &Expr::Literal(Literal::Number(10.0)),
        }
    );
    assert_eq!(clauses[0].consequent, &Expr::Literal(Literal::Number(0.0)));
    assert_eq!(
        clauses[1].predicate,
        &Expr::Comparison {
            op: ComparisonOp::Gt,
            left: &Expr::Source("x"),
            right: &Expr::Literal(Literal::Number(10.0)),
        }
    );
    assert_eq!(*otherwise, &Expr::Literal(Literal::Number(10.0)));
}

#[test]
fn test_spans_and_locations() {
    let arena = Bump::new();
    let source = "\n  z: when this.x < 5 10\n     when this.y 10\n     otherwise 20\n";
    let program = parse_ok(&arena, source);

    let Expr::When { clauses, otherwise } = sink_expr(&program, 0) else {
        panic!("expected a when expression");
    };
    assert_eq!(program.text_of(clauses[0].predicate), "this.x < 5");
    assert_eq!(program.text_of(clauses[1].predicate), "this.y");
    assert_eq!(program.location_of(clauses[1].predicate), Location::new(3, 11));
    assert_eq!(program.text_of(otherwise), "20");
    assert_eq!(program.location_of(otherwise), Location::new(4, 16));
}

#[test]
fn test_grouped_span_includes_parentheses() {
    let arena = Bump::new();
    let source = "z: (this.a + 1) * 2";
    let program = parse_ok(&arena, source);
    let Expr::Binary { left, .. } = sink_expr(&program, 0) else {
        panic!("expected a binary expression");
    };
    assert_eq!(program.text_of(left), "(this.a + 1)");
    assert_eq!(program.text_of(sink_expr(&program, 0)), "(this.a + 1) * 2");
}

#[test]
fn test_boolean_literals() {
    let arena = Bump::new();
    let program = parse_ok(&arena, "t: true\nf: false");
    assert_eq!(sink_expr(&program, 0), &Expr::Literal(Literal::Bool(true)));
    assert_eq!(sink_expr(&program, 1), &Expr::Literal(Literal::Bool(false)));
}

#[test]
fn test_redeclared_variable_is_allowed() {
    let arena = Bump::new();
    let program = parse_ok(&arena, "a = 1\na = a + 1\nz: a");
    assert_eq!(program.statements.len(), 3);
}

#[test]
fn test_unbound_variable_is_rejected() {
    let arena = Bump::new();
    let err = parse(&arena, "z: limit + 1").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::UnboundVariable {
            name: "limit".to_string()
        }
    );
    assert_eq!(err.span, Span::new(3, 8));
}

#[test]
fn test_self_reference_is_rejected() {
    let arena = Bump::new();
    let err = parse(&arena, "a = a + 1").unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::UnboundVariable { ref name } if name == "a"));
}

#[test]
fn test_sink_names_are_not_variables() {
    let arena = Bump::new();
    let err = parse(&arena, "z: 1\ny: z").unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::UnboundVariable { .. }));
}

#[test]
fn test_missing_otherwise_is_a_syntax_error() {
    let arena = Bump::new();
    let err = parse(&arena, "z: when this.b 1").unwrap_err();
    assert!(
        matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }),
        "got {:?}",
        err.kind
    );
}

#[test]
fn test_dangling_operator_is_a_syntax_error() {
    let arena = Bump::new();
    let err = parse(&arena, "z: 1 +").unwrap_err();
    let ParseErrorKind::UnexpectedToken { found, .. } = &err.kind else {
        panic!("expected UnexpectedToken, got {:?}", err.kind);
    };
    assert_eq!(found, "end of input");
    assert_eq!(err.location(), Location::new(1, 7));
}

#[test]
fn test_overflowing_number_is_invalid() {
    let arena = Bump::new();
    let source = arena.alloc_str(&format!("z: {}", "9".repeat(400)));
    let err = parse(&arena, source).unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::InvalidNumber { .. }));
}

#[test]
fn test_max_depth() {
    let arena = Bump::new();
    let nested = arena.alloc_str(&format!("z: {}1{}", "(".repeat(10), ")".repeat(10)));

    assert!(parse_with_max_depth(&arena, nested, 30).is_ok());

    let err = parse_with_max_depth(&arena, nested, 5).unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::MaxDepthExceeded {
            depth: 6,
            max_depth: 5
        }
    );
}

#[test]
fn test_long_operator_chain_exceeds_max_depth() {
    let arena = Bump::new();
    let short = arena.alloc_str(&format!("z: this.x{}", " + 1".repeat(100)));
    assert!(parse(&arena, short).is_ok());

    let long = arena.alloc_str(&format!("z: this.x{}", " + 1".repeat(300)));
    let err = parse(&arena, long).unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::MaxDepthExceeded {
            depth: 257,
            max_depth: 256
        }
    );
    assert_eq!(err.to_diagnostic().code, "P004");
}

#[test]
fn test_operator_depth_counts_grouped_operands() {
    let arena = Bump::new();
    // The group costs two levels and each operator one more than its
    // taller operand.
    let source = "z: (1 + 2) * 3";
    assert!(parse_with_max_depth(&arena, source, 6).is_ok());
    let err = parse_with_max_depth(&arena, source, 5).unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::MaxDepthExceeded {
            depth: 6,
            max_depth: 5
        }
    );
    assert_eq!(err.span, Span::new(3, 14));
}

#[test]
fn test_comparisons_do_not_chain() {
    let arena = Bump::new();
    let err = parse(&arena, "z: 1 < 2 < 3").unwrap_err();
    assert!(
        matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }),
        "got {:?}",
        err.kind
    );
    assert_eq!(err.location(), Location::new(1, 10));

    assert!(parse(&arena, "z: (1 < 2) == true").is_ok());
    assert!(parse(&arena, "z: 1 + 2 * 3 >= 4 - 5").is_ok());
}

#[test]
fn test_duplicate_sink_is_rejected() {
    let arena = Bump::new();
    let err = parse(&arena, "z: 1\nz: 2").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::DuplicateSink {
            name: "z".to_string()
        }
    );
    assert_eq!(err.location(), Location::new(2, 1));
    assert_eq!(err.to_diagnostic().code, "P005");
}
