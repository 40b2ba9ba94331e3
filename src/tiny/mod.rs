//! Tiny: an example imperative language built on the engine.
//!
//! Two statement forms - `if <exp> then <stmts> else <stmts> end` and
//! `<id> := <exp>` - are enough to exercise every engine feature: keyword
//! boundaries, reserved-word guards via negative lookahead, statement loops
//! that keep parsing past malformed statements, and panic-mode
//! resynchronization that skips to the next plausible statement start.
//!
//! Layout rules: statements and the `then`/`else`/`end` keywords may be
//! separated by any whitespace, but an assignment's `:=` and its right-hand
//! expression must stay on the statement's line. That keeps a missing
//! right-hand side from silently swallowing the next line's identifier.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::engine::ParserEngine;
use crate::grammar::builder::*;
use crate::grammar::{Grammar, RecoveryTable};
use crate::registry::ActionRegistry;
use crate::value::SemanticValue;

/// AST of the tiny language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Raw captured text, before a semantic action shapes it.
    Text(String),
    Num(String),
    Id(String),
    Assign {
        target: String,
        value: Box<Node>,
    },
    If {
        cond: Box<Node>,
        then_branch: Vec<Node>,
        else_branch: Vec<Node>,
    },
    Block(Vec<Node>),
}

impl SemanticValue for Node {
    fn from_text(text: &str) -> Self {
        Node::Text(text.to_string())
    }

    fn from_record(fields: Vec<(String, Self)>) -> Self {
        // The tiny grammar never emits records; fold unexpected ones into a block.
        Node::Block(fields.into_iter().map(|(_, value)| value).collect())
    }
}

/// The tiny grammar. `main` is a statement loop that recovers on the panic
/// label, so independent statements keep parsing past a malformed one.
pub fn grammar() -> Grammar {
    Grammar::new()
        .rule(
            "main",
            transform(
                many_recovering(
                    choice([rule("stat"), seq([rule("token"), error_point("stat")])]),
                    "panic",
                ),
                "stats",
            ),
        )
        .rule(
            "stats",
            transform(many_recovering(rule("stat"), "panic"), "stats"),
        )
        .rule("stat", choice([rule("sif"), rule("assign")]))
        .rule(
            "sif",
            transform(
                seq([
                    rule("IF"),
                    try_or(
                        seq([
                            rule("exp"),
                            rule("THEN"),
                            rule("stats"),
                            rule("ELSE"),
                            rule("stats"),
                            rule("END"),
                        ]),
                        "if",
                    ),
                ]),
                "sif",
            ),
        )
        .rule(
            "assign",
            transform(
                seq([rule("ID"), rule("ASSIGN"), try_or(rule("exp"), "assign")]),
                "assign",
            ),
        )
        .rule(
            "exp",
            choice([transform(rule("id"), "id"), transform(rule("num"), "num")]),
        )
        .rule("space", many(regexp("[ \\t\\r\\n]")))
        .rule("blank", many(regexp("[ \\t]")))
        .rule("IF", seq([rule("space"), keyword("if")]))
        .rule("THEN", seq([rule("space"), keyword("then")]))
        .rule("ELSE", seq([rule("space"), keyword("else")]))
        .rule("END", seq([rule("space"), keyword("end")]))
        .rule("ASSIGN", seq([rule("blank"), literal(":=")]))
        .rule(
            "ID",
            seq([not(rule("rws")), rule("space"), rule("ident")]),
        )
        .rule("id", seq([not(rule("rws")), rule("blank"), rule("ident")]))
        .rule(
            "ident",
            cap(seq([char_class("ident_start"), many(char_class("word"))])),
        )
        .rule("num", seq([rule("blank"), cap(plus(char_class("digit")))]))
        .rule(
            "rws",
            choice([rule("IF"), rule("THEN"), rule("ELSE"), rule("END")]),
        )
        .rule(
            "token",
            seq([rule("space"), plus(regexp("[^ \\t\\r\\n]"))]),
        )
}

/// Panic recovery: skip tokens until the next plausible statement start
/// (an `if` or an identifier).
pub fn recovery() -> RecoveryTable {
    RecoveryTable::new().panic(many(seq([
        not(choice([rule("IF"), rule("ID")])),
        rule("token"),
    ])))
}

/// Semantic actions turning capture scopes into [`Node`] values.
pub fn registry() -> ActionRegistry<Node> {
    ActionRegistry::new()
        .action("stats", Node::Block)
        .action("id", |values| match values.into_iter().next() {
            Some(Node::Text(name)) => Node::Id(name),
            _ => Node::Id(String::new()),
        })
        .action("num", |values| match values.into_iter().next() {
            Some(Node::Text(digits)) => Node::Num(digits),
            _ => Node::Num(String::new()),
        })
        .action("assign", |mut values| {
            let value = values.pop().unwrap_or(Node::Block(Vec::new()));
            let target = match values.pop() {
                Some(Node::Text(name)) => name,
                _ => String::new(),
            };
            Node::Assign {
                target,
                value: Box::new(value),
            }
        })
        .action("sif", |mut values| {
            let else_branch = match values.pop() {
                Some(Node::Block(items)) => items,
                _ => Vec::new(),
            };
            let then_branch = match values.pop() {
                Some(Node::Block(items)) => items,
                _ => Vec::new(),
            };
            let cond = values.pop().unwrap_or(Node::Block(Vec::new()));
            Node::If {
                cond: Box::new(cond),
                then_branch,
                else_branch,
            }
        })
}

/// The shared compiled engine for the tiny language.
///
/// The grammar, recovery table, and actions are fixed, so the engine is
/// compiled once and reused by every caller; each parse still runs on its
/// own fresh state.
pub fn engine() -> &'static ParserEngine<Node> {
    static ENGINE: Lazy<ParserEngine<Node>> = Lazy::new(|| {
        ParserEngine::compile(&grammar(), &recovery(), &registry())
            .expect("tiny grammar is well-formed")
    });
    &ENGINE
}
