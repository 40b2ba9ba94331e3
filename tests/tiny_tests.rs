// tests/tiny_tests.rs
//
// End-to-end behavior of the tiny example language: multi-error recovery
// across statement loops, panic-mode resynchronization, and word-boundary
// handling of keywords.

use yantra::tiny::{self, Node};

fn assign(target: &str, value: Node) -> Node {
    Node::Assign {
        target: target.to_string(),
        value: Box::new(value),
    }
}

fn num(digits: &str) -> Node {
    Node::Num(digits.to_string())
}

fn id(name: &str) -> Node {
    Node::Id(name.to_string())
}

#[test]
fn test_well_formed_program() {
    let input = "if foo then bar := 1 else baz := xxx end\nbar := 3";
    let run = tiny::engine().parse(input);
    assert!(run.is_complete());
    assert!(run.errors.is_empty());
    assert_eq!(
        run.root(),
        Some(&Node::Block(vec![
            Node::If {
                cond: Box::new(id("foo")),
                then_branch: vec![assign("bar", num("1"))],
                else_branch: vec![assign("baz", id("xxx"))],
            },
            assign("bar", num("3")),
        ]))
    );
}

#[test]
fn test_missing_rhs_recovers_inside_enclosing_if() {
    let input = "if foo then bar := \n foo := 3 else baz := xxx end\n bar := 3";
    let run = tiny::engine().parse(input);

    // The parse runs to completion despite the malformed assignment.
    assert!(run.is_complete());
    assert_eq!(run.cursor, input.len());

    // Exactly one recovered error, at the point where `bar :=` is missing
    // its right-hand expression.
    assert_eq!(run.errors.len(), 1);
    assert_eq!(run.errors[0].label, "assign");
    let expected_position = input.find(":=").expect("input has :=") + ":=".len();
    assert_eq!(run.errors[0].position, expected_position);

    // The enclosing `if` and the trailing assignment both survive; the
    // malformed statement contributes nothing.
    assert_eq!(
        run.root(),
        Some(&Node::Block(vec![
            Node::If {
                cond: Box::new(id("foo")),
                then_branch: vec![assign("foo", num("3"))],
                else_branch: vec![assign("baz", id("xxx"))],
            },
            assign("bar", num("3")),
        ]))
    );
}

#[test]
fn test_two_malformed_statements_around_a_valid_one() {
    let input = "foo := \nok := 1\nbar := ";
    let run = tiny::engine().parse(input);

    assert!(run.is_complete());
    assert_eq!(run.errors.len(), 2);
    assert!(run.errors.iter().all(|e| e.label == "assign"));
    assert!(run.errors[0].position < run.errors[1].position);

    // The valid statement in between parses normally.
    assert_eq!(run.root(), Some(&Node::Block(vec![assign("ok", num("1"))])));
}

#[test]
fn test_keyword_boundary_lets_prefixed_identifiers_through() {
    // `ifoo` starts with the `if` keyword but is an ordinary identifier.
    let run = tiny::engine().parse("ifoo := 2");
    assert!(run.is_complete());
    assert!(run.errors.is_empty());
    assert_eq!(run.root(), Some(&Node::Block(vec![assign("ifoo", num("2"))])));
}

#[test]
fn test_reserved_words_cannot_be_identifiers() {
    // `then := 1` cannot parse as an assignment; the statement loop reports
    // it and moves on.
    let input = "then := 1\nok := 2";
    let run = tiny::engine().parse(input);
    assert!(run.is_complete());
    assert_eq!(run.errors.len(), 1);
    assert_eq!(run.errors[0].label, "stat");
    assert_eq!(run.root(), Some(&Node::Block(vec![assign("ok", num("2"))])));
}

#[test]
fn test_empty_input_is_an_empty_program() {
    let run = tiny::engine().parse("");
    assert!(run.is_complete());
    assert!(run.errors.is_empty());
    assert_eq!(run.root(), Some(&Node::Block(vec![])));
}

#[test]
fn test_whitespace_only_input() {
    let run = tiny::engine().parse("  \n\t \n");
    assert!(run.is_complete());
    assert!(run.errors.is_empty());
    assert_eq!(run.root(), Some(&Node::Block(vec![])));
}

#[test]
fn test_independent_invocations_share_nothing() {
    let engine = tiny::engine();
    let broken = engine.parse("x := ");
    assert_eq!(broken.errors.len(), 1);

    // A later run on the same engine starts from a fresh state.
    let clean = engine.parse("x := 1");
    assert!(clean.errors.is_empty());
    assert_eq!(clean.root(), Some(&Node::Block(vec![assign("x", num("1"))])));
}
