//! Unit tests for the concrete evaluator.

use super::*;
use crate::{
    diagnostics::{Diagnostic, Severity},
    parser::{self, Location},
};
use bumpalo::Bump;
use indoc::indoc;
use pretty_assertions::assert_eq;

struct Runner {
    arena: Bump,
}

impl Runner {
    fn new() -> Self {
        Self { arena: Bump::new() }
    }

    fn run(&self, input: &str, sources: &[(&str, Value)]) -> Evaluation<Value> {
        let input = self.arena.alloc_str(input);
        let program = parser::parse(&self.arena, input).expect("parsing failed");
        let sources: Bindings<Value> = sources.iter().copied().collect();
        interpret(&program, &sources).expect("evaluation failed")
    }

    fn sink(&self, input: &str, sources: &[(&str, Value)], name: &str) -> Value {
        let evaluation = self.run(input, sources);
        assert!(
            evaluation.diagnostics.is_empty(),
            "unexpected diagnostics: {:?}",
            evaluation.diagnostics
        );
        *evaluation.sinks.get(name).expect("sink not found")
    }
}

fn messages(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics.iter().map(|d| d.to_string()).collect()
}

#[test]
fn test_literals_and_sources() {
    let runner = Runner::new();
    assert_eq!(runner.sink("z: 42", &[], "z"), Value::Number(42.0));
    assert_eq!(runner.sink("z: false", &[], "z"), Value::Bool(false));
    assert_eq!(
        runner.sink("z: this.x", &[("x", Value::Number(12.5))], "z"),
        Value::Number(12.5)
    );
}

#[test]
fn test_arithmetic_precedence() {
    let runner = Runner::new();
    assert_eq!(runner.sink("z: 1 + 2 * 3", &[], "z"), Value::Number(7.0));
    assert_eq!(runner.sink("z: (1 + 2) * 3", &[], "z"), Value::Number(9.0));
    assert_eq!(runner.sink("z: 10 - 4 - 3", &[], "z"), Value::Number(3.0));
    assert_eq!(runner.sink("z: 8 / 4 / 2", &[], "z"), Value::Number(1.0));
}

#[test]
fn test_comparisons() {
    let runner = Runner::new();
    let x = [("x", Value::Number(5.0))];
    assert_eq!(runner.sink("z: this.x < 5", &x, "z"), Value::Bool(false));
    assert_eq!(runner.sink("z: this.x <= 5", &x, "z"), Value::Bool(true));
    assert_eq!(runner.sink("z: this.x == 5", &x, "z"), Value::Bool(true));
    assert_eq!(runner.sink("z: this.x != 5", &x, "z"), Value::Bool(false));
    assert_eq!(runner.sink("z: this.x + 1 > 5", &x, "z"), Value::Bool(true));
}

#[test]
fn test_when_picks_first_true_clause() {
    let runner = Runner::new();
    let program = indoc! {"
        z: when this.x < 10 0
           when this.x > 10 20
           otherwise 10
    "};
    assert_eq!(runner.sink(program, &[("x", Value::Number(3.0))], "z"), Value::Number(0.0));
    assert_eq!(runner.sink(program, &[("x", Value::Number(30.0))], "z"), Value::Number(20.0));
    assert_eq!(runner.sink(program, &[("x", Value::Number(10.0))], "z"), Value::Number(10.0));

    let overlapping = "z: when this.x > 0 1 when this.x > 5 2 otherwise 3";
    assert_eq!(
        runner.sink(overlapping, &[("x", Value::Number(7.0))], "z"),
        Value::Number(1.0)
    );
}

#[test]
fn test_unselected_branches_are_not_evaluated() {
    let runner = Runner::new();
    // Division by zero in a branch that is not taken goes unnoticed.
    assert_eq!(
        runner.sink("z: when true 1 otherwise 1 / 0", &[], "z"),
        Value::Number(1.0)
    );
}

#[test]
fn test_variables_and_rebinding() {
    let runner = Runner::new();
    let program = indoc! {"
        a = this.x * 2
        first: a
        a = a + 1
        second: a
    "};
    let evaluation = runner.run(program, &[("x", Value::Number(4.0))]);
    assert_eq!(
        evaluation.sinks.iter().collect::<Vec<_>>(),
        [("first", &Value::Number(8.0)), ("second", &Value::Number(9.0))]
    );
}

#[test]
fn test_predicate_not_boolean() {
    let runner = Runner::new();
    let program = indoc! {"
        z: when this.y 1
           otherwise 2
        w: 3
    "};
    let evaluation = runner.run(program, &[("y", Value::Number(1.0))]);
    assert_eq!(evaluation.sinks.get("z"), Some(&Value::Undefined));
    assert_eq!(evaluation.sinks.get("w"), Some(&Value::Number(3.0)));
    assert_eq!(
        messages(evaluation.diagnostics.as_slice()),
        ["When clause predicate `this.y` is not a boolean at 1:9"]
    );
}

#[test]
fn test_non_numeric_operand() {
    let runner = Runner::new();
    let evaluation = runner.run("z: 1 + this.b", &[("b", Value::Bool(true))]);
    assert_eq!(evaluation.sinks.get("z"), Some(&Value::Undefined));

    let diagnostic = &evaluation.diagnostics.as_slice()[0];
    assert_eq!(diagnostic.message, "Operand `this.b` of `+` is not a number");
    assert_eq!(diagnostic.code, "T003");
    assert_eq!(diagnostic.location, Location::new(1, 8));
}

#[test]
fn test_undefined_propagates_without_more_diagnostics() {
    let runner = Runner::new();
    let program = indoc! {"
        a = 1 / 0
        z: a + 1
        w: when a > 0 1 otherwise 2
    "};
    let evaluation = runner.run(program, &[]);
    assert_eq!(evaluation.sinks.get("z"), Some(&Value::Undefined));
    assert_eq!(evaluation.sinks.get("w"), Some(&Value::Undefined));
    assert_eq!(
        messages(evaluation.diagnostics.as_slice()),
        ["Division by zero in `1 / 0` at 1:5"]
    );
    assert_eq!(evaluation.diagnostics.count(Severity::Error), 1);
}

#[test]
fn test_unbound_source_is_a_contract_violation() {
    let arena = Bump::new();
    let program = parser::parse(&arena, "z: this.missing").unwrap();
    let err = interpret(&program, &Bindings::new()).unwrap_err();
    assert!(matches!(
        err,
        ContractViolation::UnboundSource { ref name, .. } if name == "missing"
    ));
    assert_eq!(err.span().str_of(program.source()), "this.missing");
}
