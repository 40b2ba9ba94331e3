//! Grammar intermediate representation.
//!
//! A [`Pattern`] is pure data: it says nothing about how matching happens,
//! only what the grammar author wrote. Patterns are immutable once built and
//! shareable; behavior is given to them by the compile pass. Authoring goes
//! through the constructor functions in [`builder`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod builder;

/// Name of the mandatory entry rule.
pub const ENTRY_RULE: &str = "main";

/// Name of the optional trailing-layout rule run after the entry rule.
pub const SPACE_RULE: &str = "space";

/// Reserved recovery-table key for the global panic resynchronization node.
pub const PANIC_LABEL: &str = "panic";

/// One node of the grammar IR.
///
/// Terminals consume input directly; combinators arrange child patterns.
/// `ErrorPoint` is the only node that can record a syntax error, and
/// `Many` with a recovery label is the only construct that can contain one
/// once it has escalated (see the compile module for the full semantics).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    /// Match one character satisfying the named registry predicate.
    CharClass(String),
    /// Match one character satisfying the regex pattern.
    Regexp(String),
    /// Match literal text followed by a word boundary.
    Keyword(String),
    /// Match literal text, no boundary check.
    Literal(String),
    /// Match children in order; the first failure aborts.
    Sequence(Vec<Pattern>),
    /// Ordered choice: first alternative to match wins.
    Choice(Vec<Pattern>),
    /// Zero or more repetitions, optionally resuming after recovered errors.
    Many {
        body: Box<Pattern>,
        recover: Option<String>,
    },
    /// Reference to a named rule of the enclosing grammar.
    Rule(String),
    /// Zero or one occurrence.
    Option(Box<Pattern>),
    /// Match the child and push the consumed substring as a capture.
    Capture(Box<Pattern>),
    /// Run the child in an isolated capture scope and fold its captures
    /// through the named semantic action.
    Transform {
        body: Box<Pattern>,
        action: String,
    },
    /// Run the child in an isolated capture scope and fold its captures
    /// into a record with the declared field names, paired positionally.
    Collect {
        body: Box<Pattern>,
        fields: Vec<String>,
    },
    /// Zero-width negative lookahead.
    Not(Box<Pattern>),
    /// Labeled failure point; behavior depends on the recovery table.
    ErrorPoint(String),
}

/// A named rule set. The rule `"main"` is the entry point and must exist by
/// the time the grammar is compiled; insertion order determines rule indices
/// in the compiled engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grammar {
    rules: Vec<(String, Pattern)>,
}

impl Grammar {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Adds a rule. Defining the same name twice is rejected at compile time,
    /// not here, so grammars can be assembled incrementally and checked once.
    pub fn rule(mut self, name: impl Into<String>, pattern: Pattern) -> Self {
        self.rules.push((name.into(), pattern));
        self
    }

    /// Looks up a rule body by name (first definition wins).
    pub fn get(&self, name: &str) -> Option<&Pattern> {
        self.rules
            .iter()
            .find(|(rule_name, _)| rule_name == name)
            .map(|(_, pattern)| pattern)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn entries(&self) -> &[(String, Pattern)] {
        &self.rules
    }
}

/// Resynchronization table: maps an `ErrorPoint` label to the pattern used to
/// skip past malformed input, with [`PANIC_LABEL`] as the global fallback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoveryTable {
    entries: BTreeMap<String, Pattern>,
}

impl RecoveryTable {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Maps `label` to a resynchronization pattern.
    pub fn on(mut self, label: impl Into<String>, pattern: Pattern) -> Self {
        self.entries.insert(label.into(), pattern);
        self
    }

    /// Installs the global panic resynchronization pattern.
    pub fn panic(self, pattern: Pattern) -> Self {
        self.on(PANIC_LABEL, pattern)
    }

    pub fn get(&self, label: &str) -> Option<&Pattern> {
        self.entries.get(label)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::builder::*;
    use super::*;

    #[test]
    fn test_grammar_lookup_is_first_definition() {
        let grammar = Grammar::new()
            .rule("main", literal("a"))
            .rule("main", literal("b"));
        assert_eq!(grammar.get("main"), Some(&literal("a")));
        assert_eq!(grammar.len(), 2);
    }

    #[test]
    fn test_recovery_table_panic_alias() {
        let table = RecoveryTable::new().panic(many(literal("x")));
        assert_eq!(table.get(PANIC_LABEL), Some(&many(literal("x"))));
    }
}
