//! Grammar assembler and the runnable parser unit.
//!
//! `ParserEngine::compile` binds a grammar, a recovery table, and an action
//! registry into one immutable unit: every rule reference is resolved to an
//! index in a single pass, so mutual and self recursion cost no lookups at
//! parse time. The compiled engine is shareable across invocations; each
//! call to [`ParserEngine::parse`] owns a fresh [`ParseState`] for its whole
//! duration and returns the final state as a [`ParseRun`].

use std::collections::HashMap;

use crate::compile::{Compiler, Op};
use crate::errors::{AssemblyContext, ErrorKind, ErrorReporting, SourceContext, YantraError};
use crate::grammar::{Grammar, RecoveryTable, ENTRY_RULE, SPACE_RULE};
use crate::registry::ActionRegistry;
use crate::runtime::machine::Machine;
use crate::runtime::state::{Failure, ParseState, SyntaxError};
use crate::value::SemanticValue;

/// Default budget for nested rule invocations. Left recursion is a
/// grammar-authoring error; the budget turns it into a fatal outcome
/// instead of an unbounded native stack.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// A compiled, immutable parser for one grammar.
pub struct ParserEngine<V> {
    rules: Vec<Op<V>>,
    main: usize,
    space: Option<usize>,
    max_depth: usize,
}

impl<V> ParserEngine<V> {
    /// Resolves and lowers every rule of `grammar`. Fails if the grammar has
    /// no `"main"` rule, defines a rule twice, or references a rule, action,
    /// predicate, or regex pattern that cannot be resolved.
    pub fn compile(
        grammar: &Grammar,
        recovery: &RecoveryTable,
        registry: &ActionRegistry<V>,
    ) -> Result<Self, YantraError> {
        let ctx = AssemblyContext::new();

        let mut indices = HashMap::new();
        for (index, (name, _)) in grammar.entries().iter().enumerate() {
            if indices.insert(name.clone(), index).is_some() {
                return Err(ctx.duplicate_rule(name));
            }
        }
        let main = *indices
            .get(ENTRY_RULE)
            .ok_or_else(|| ctx.missing_entry_rule())?;
        let space = indices.get(SPACE_RULE).copied();

        let compiler = Compiler::new(&indices, recovery, registry);
        let rules = grammar
            .entries()
            .iter()
            .map(|(_, pattern)| compiler.lower(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rules,
            main,
            space,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    /// Overrides the rule recursion budget.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl<V: SemanticValue> ParserEngine<V> {
    /// Runs the `"main"` rule against `input`, then the grammar's `"space"`
    /// rule if it has one, then requires the whole input to be consumed.
    ///
    /// Always returns the final state; a run that could not complete carries
    /// its failure class in [`ParseRun::failure`] alongside whatever partial
    /// cursor, captures, and recovered errors it produced.
    pub fn parse(&self, input: &str) -> ParseRun<V> {
        let mut state = ParseState::new(input, self.max_depth);
        let machine = Machine::new(&self.rules);

        let mut outcome = machine.run(&self.rules[self.main], &mut state);
        if outcome.is_ok() {
            if let Some(space) = self.space {
                outcome = machine.run(&self.rules[space], &mut state);
            }
        }
        if outcome.is_ok() && state.cursor() < input.len() {
            outcome = Err(Failure::Soft);
        }

        let (cursor, captures, errors) = state.into_parts();
        ParseRun {
            cursor,
            captures,
            errors,
            failure: outcome.err(),
        }
    }
}

/// Final state of one parse invocation.
#[derive(Debug)]
pub struct ParseRun<V> {
    /// Final byte cursor; equals input length on a complete run.
    pub cursor: usize,
    /// Root capture stack; index 0 holds the root result when the grammar
    /// is well-formed.
    pub captures: Vec<V>,
    /// Recovered syntax errors, in discovery order.
    pub errors: Vec<SyntaxError>,
    /// `None` on a complete run, the terminating failure class otherwise.
    pub failure: Option<Failure>,
}

impl<V> ParseRun<V> {
    /// Whether the run consumed the whole input without a fatal failure.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// The root semantic value, by convention the first root capture.
    pub fn root(&self) -> Option<&V> {
        self.captures.first()
    }

    /// Promotes a fatal failure into a diagnostic against `source`,
    /// passing complete runs through unchanged.
    pub fn into_result(self, source: &SourceContext) -> Result<Self, YantraError> {
        let Some(failure) = self.failure.clone() else {
            return Ok(self);
        };
        let span = source.span_at(self.cursor);
        Err(match failure {
            Failure::Soft => source.report(ErrorKind::UnexpectedInput, span),
            Failure::Panic => source.report(ErrorKind::ParseAborted, span),
            Failure::Labeled(label) => source.unrecovered_label(&label, span),
            Failure::Overflow => source.report(ErrorKind::RecursionLimit, span),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCategory;
    use crate::grammar::builder::*;
    use crate::value::Value;

    fn registry() -> ActionRegistry<Value> {
        ActionRegistry::new()
    }

    #[test]
    fn test_missing_main_rejected() {
        let grammar = Grammar::new().rule("other", literal("x"));
        let err = ParserEngine::compile(&grammar, &RecoveryTable::new(), &registry())
            .err()
            .expect("compile should fail");
        assert_eq!(err.kind, ErrorKind::MissingEntryRule);
        assert_eq!(err.category(), ErrorCategory::Assembly);
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let grammar = Grammar::new()
            .rule("main", literal("x"))
            .rule("main", literal("y"));
        let err = ParserEngine::compile(&grammar, &RecoveryTable::new(), &registry())
            .err()
            .expect("compile should fail");
        assert_eq!(err.kind, ErrorKind::DuplicateRule { name: "main".into() });
    }

    #[test]
    fn test_left_recursion_hits_depth_budget() {
        let grammar = Grammar::new().rule("main", choice([rule("main"), literal("x")]));
        let engine = ParserEngine::compile(&grammar, &RecoveryTable::new(), &registry())
            .expect("compile should succeed")
            .with_max_depth(32);
        let run = engine.parse("x");
        assert_eq!(run.failure, Some(Failure::Overflow));
    }

    #[test]
    fn test_into_result_maps_failure_classes() {
        let grammar = Grammar::new().rule("main", literal("x"));
        let engine =
            ParserEngine::compile(&grammar, &RecoveryTable::new(), &registry()).unwrap();

        let source = SourceContext::from_input("test", "xy");
        let err = engine.parse("xy").into_result(&source).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedInput);

        let source = SourceContext::from_input("test", "x");
        assert!(engine.parse("x").into_result(&source).is_ok());
    }
}
