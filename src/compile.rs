//! Lowering: grammar IR to executable ops.
//!
//! The compiler is a pure function of (pattern, context). The context
//! carries the rule index map, the recovery table, and the action registry
//! as explicit read-only parameters; nothing is captured from ambient
//! state. All name resolution happens here, once, so the machine never
//! does a string lookup:
//!
//! - rule names become indices into the lowered rule table,
//! - `CharClass`/`Transform` names become the registered fn/closure,
//! - `Regexp` patterns become compiled [`regex::Regex`] values,
//! - `ErrorPoint` labels become a [`RecoveryPlan`] chosen from the table.

use regex::Regex;
use std::collections::HashMap;

use crate::errors::{AssemblyContext, ErrorReporting, YantraError};
use crate::grammar::{Pattern, RecoveryTable, PANIC_LABEL};
use crate::registry::{Action, ActionRegistry, CharPredicate};

/// Executable form of one grammar node.
pub(crate) enum Op<V> {
    CharClass(CharPredicate),
    Regexp(Regex),
    Keyword(String),
    Literal(String),
    Sequence(Vec<Op<V>>),
    Choice(Vec<Op<V>>),
    Many {
        body: Box<Op<V>>,
        recover: Option<String>,
    },
    Rule(usize),
    Option(Box<Op<V>>),
    Capture(Box<Op<V>>),
    Transform {
        body: Box<Op<V>>,
        action: Action<V>,
    },
    Collect {
        body: Box<Op<V>>,
        fields: Vec<String>,
    },
    Not(Box<Op<V>>),
    Recover {
        label: String,
        plan: RecoveryPlan<V>,
    },
}

/// What a lowered `ErrorPoint` does when reached, fixed at assembly time.
pub(crate) enum RecoveryPlan<V> {
    /// The label has its own table entry: record, resynchronize, resume.
    Resync(Box<Op<V>>),
    /// Only the global panic entry applies: record, resynchronize, unwind.
    Panic(Box<Op<V>>),
    /// No recovery known: raise the label as a hard failure.
    Raise,
}

/// Read-only lowering context; see the module docs.
pub(crate) struct Compiler<'a, V> {
    rule_indices: &'a HashMap<String, usize>,
    recovery: &'a RecoveryTable,
    registry: &'a ActionRegistry<V>,
    ctx: AssemblyContext,
}

impl<'a, V> Compiler<'a, V> {
    pub fn new(
        rule_indices: &'a HashMap<String, usize>,
        recovery: &'a RecoveryTable,
        registry: &'a ActionRegistry<V>,
    ) -> Self {
        Self {
            rule_indices,
            recovery,
            registry,
            ctx: AssemblyContext::new(),
        }
    }

    pub fn lower(&self, pattern: &Pattern) -> Result<Op<V>, YantraError> {
        match pattern {
            Pattern::CharClass(name) => {
                let predicate = self
                    .registry
                    .lookup_predicate(name)
                    .ok_or_else(|| self.ctx.unknown_predicate(name))?;
                Ok(Op::CharClass(predicate))
            }
            Pattern::Regexp(pattern) => {
                let regex = Regex::new(pattern).map_err(|source| {
                    self.ctx.invalid_char_pattern(pattern, &source.to_string())
                })?;
                Ok(Op::Regexp(regex))
            }
            Pattern::Keyword(text) => Ok(Op::Keyword(text.clone())),
            Pattern::Literal(text) => Ok(Op::Literal(text.clone())),
            Pattern::Sequence(items) => Ok(Op::Sequence(self.lower_all(items)?)),
            Pattern::Choice(items) => Ok(Op::Choice(self.lower_all(items)?)),
            Pattern::Many { body, recover } => Ok(Op::Many {
                body: Box::new(self.lower(body)?),
                recover: recover.clone(),
            }),
            Pattern::Rule(name) => {
                let index = self
                    .rule_indices
                    .get(name)
                    .copied()
                    .ok_or_else(|| self.ctx.unknown_rule(name))?;
                Ok(Op::Rule(index))
            }
            Pattern::Option(body) => Ok(Op::Option(Box::new(self.lower(body)?))),
            Pattern::Capture(body) => Ok(Op::Capture(Box::new(self.lower(body)?))),
            Pattern::Transform { body, action } => {
                let action = self
                    .registry
                    .lookup_action(action)
                    .cloned()
                    .ok_or_else(|| self.ctx.unknown_action(action))?;
                Ok(Op::Transform {
                    body: Box::new(self.lower(body)?),
                    action,
                })
            }
            Pattern::Collect { body, fields } => Ok(Op::Collect {
                body: Box::new(self.lower(body)?),
                fields: fields.clone(),
            }),
            Pattern::Not(body) => Ok(Op::Not(Box::new(self.lower(body)?))),
            Pattern::ErrorPoint(label) => {
                let plan = if let Some(entry) = self.recovery.get(label) {
                    RecoveryPlan::Resync(Box::new(self.lower(entry)?))
                } else if let Some(entry) = self.recovery.get(PANIC_LABEL) {
                    RecoveryPlan::Panic(Box::new(self.lower(entry)?))
                } else {
                    RecoveryPlan::Raise
                };
                Ok(Op::Recover {
                    label: label.clone(),
                    plan,
                })
            }
        }
    }

    fn lower_all(&self, items: &[Pattern]) -> Result<Vec<Op<V>>, YantraError> {
        items.iter().map(|item| self.lower(item)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::grammar::builder::*;
    use crate::value::Value;

    fn compiler_fixture() -> (HashMap<String, usize>, RecoveryTable, ActionRegistry<Value>) {
        let mut indices = HashMap::new();
        indices.insert("main".to_string(), 0);
        (indices, RecoveryTable::new(), ActionRegistry::new())
    }

    #[test]
    fn test_unknown_rule_is_assembly_error() {
        let (indices, recovery, registry) = compiler_fixture();
        let compiler = Compiler::new(&indices, &recovery, &registry);
        let err = compiler.lower(&rule("nope")).err().expect("should fail");
        assert_eq!(err.kind, ErrorKind::UnknownRule { name: "nope".into() });
    }

    #[test]
    fn test_unknown_action_is_assembly_error() {
        let (indices, recovery, registry) = compiler_fixture();
        let compiler = Compiler::new(&indices, &recovery, &registry);
        let err = compiler
            .lower(&transform(literal("x"), "nope"))
            .err()
            .expect("should fail");
        assert_eq!(err.kind, ErrorKind::UnknownAction { name: "nope".into() });
    }

    #[test]
    fn test_invalid_regex_is_assembly_error() {
        let (indices, recovery, registry) = compiler_fixture();
        let compiler = Compiler::new(&indices, &recovery, &registry);
        let err = compiler.lower(&regexp("[unclosed")).err().expect("should fail");
        assert!(matches!(err.kind, ErrorKind::InvalidCharPattern { .. }));
    }

    #[test]
    fn test_error_point_plan_selection() {
        let (indices, _, registry) = compiler_fixture();
        let recovery = RecoveryTable::new()
            .on("stmt", many(literal("x")))
            .panic(many(literal("y")));
        let compiler = Compiler::new(&indices, &recovery, &registry);

        let specific = compiler.lower(&error_point("stmt")).unwrap();
        assert!(matches!(
            specific,
            Op::Recover {
                plan: RecoveryPlan::Resync(_),
                ..
            }
        ));

        let fallback = compiler.lower(&error_point("other")).unwrap();
        assert!(matches!(
            fallback,
            Op::Recover {
                plan: RecoveryPlan::Panic(_),
                ..
            }
        ));

        let bare_table = RecoveryTable::new();
        let bare = Compiler::<Value>::new(&indices, &bare_table, &registry)
            .lower(&error_point("other"))
            .unwrap();
        assert!(matches!(
            bare,
            Op::Recover {
                plan: RecoveryPlan::Raise,
                ..
            }
        ));
    }
}
