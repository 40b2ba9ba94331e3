//! # Yantra Action Registry
//!
//! Client-supplied semantic actions and character predicates, resolved by
//! name at assembly time. The registry is a single source of truth: build it
//! once at the entrypoint and pass it by reference to `ParserEngine::compile`;
//! never construct a local/hidden registry per rule.
//!
//! A fresh registry pre-loads the standard character predicates so most
//! grammars can say `char_class("alpha")` without any setup.

use std::collections::HashMap;
use std::sync::Arc;

/// Semantic action: folds the ordered captures of an isolated scope into one value.
pub type Action<V> = Arc<dyn Fn(Vec<V>) -> V + Send + Sync>;

/// Character predicate backing a `CharClass` terminal.
pub type CharPredicate = fn(char) -> bool;

/// Named actions and predicates available to a grammar.
pub struct ActionRegistry<V> {
    actions: HashMap<String, Action<V>>,
    predicates: HashMap<String, CharPredicate>,
}

impl<V> ActionRegistry<V> {
    /// Creates a registry pre-loaded with the standard character predicates:
    /// `alpha`, `digit`, `alnum`, `space`, `word`, and `ident_start`.
    pub fn new() -> Self {
        let mut registry = Self {
            actions: HashMap::new(),
            predicates: HashMap::new(),
        };
        register_std_predicates(&mut registry);
        registry
    }

    /// Registers a semantic action under `name`, replacing any previous one.
    pub fn action(
        mut self,
        name: impl Into<String>,
        action: impl Fn(Vec<V>) -> V + Send + Sync + 'static,
    ) -> Self {
        self.actions.insert(name.into(), Arc::new(action));
        self
    }

    /// Registers a character predicate under `name`, replacing any previous one.
    pub fn predicate(mut self, name: impl Into<String>, predicate: CharPredicate) -> Self {
        self.predicates.insert(name.into(), predicate);
        self
    }

    pub(crate) fn lookup_action(&self, name: &str) -> Option<&Action<V>> {
        self.actions.get(name)
    }

    pub(crate) fn lookup_predicate(&self, name: &str) -> Option<CharPredicate> {
        self.predicates.get(name).copied()
    }
}

impl<V> Default for ActionRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn register_std_predicates<V>(registry: &mut ActionRegistry<V>) {
    let entries: &[(&str, CharPredicate)] = &[
        ("alpha", |c| c.is_alphabetic()),
        ("digit", |c| c.is_ascii_digit()),
        ("alnum", |c| c.is_alphanumeric()),
        ("space", |c| c.is_whitespace()),
        ("word", is_word_char),
        ("ident_start", |c| c.is_alphabetic() || c == '_'),
    ];
    for (name, predicate) in entries {
        registry.predicates.insert((*name).to_string(), *predicate);
    }
}

/// Word-constituent characters, as used by the `Keyword` boundary check.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
