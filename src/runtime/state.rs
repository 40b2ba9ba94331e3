//! Mutable state of a single parse invocation.
//!
//! The capture buffer is an explicit stack of scopes: `Transform`,
//! `Collect`, and `Not` push a fresh scope on entry and pop it on every
//! exit path, so isolation is structural rather than convention-enforced.
//! Checkpoints only ever refer to the scope that was current when they were
//! taken; scope pushes and pops are balanced by the machine before any
//! checkpoint is restored.

use serde::{Deserialize, Serialize};

use crate::grammar::PANIC_LABEL;

/// A recovered syntax error: where it was detected and which label saw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxError {
    pub position: usize,
    pub label: String,
}

/// The three failure classes of a matching operation, plus the defensive
/// recursion-budget abort which no grammar construct may catch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Ordinary backtrackable failure; the catching boundary restores state.
    Soft,
    /// Raised after panic-mode recovery has already run; unwinds to a
    /// `Many` recovering on the panic label, or to the top level.
    Panic,
    /// Hard failure tagged with the originating label; propagates like panic.
    Labeled(String),
    /// Rule recursion exceeded the engine's depth budget.
    Overflow,
}

impl Failure {
    /// Whether a `Many` recovering on `label` may absorb this failure.
    pub fn matches_label(&self, label: &str) -> bool {
        match self {
            Failure::Panic => label == PANIC_LABEL,
            Failure::Labeled(raised) => raised == label,
            Failure::Soft | Failure::Overflow => false,
        }
    }
}

/// Result of running one lowered node against the parse state.
pub type MatchResult = Result<(), Failure>;

/// A backtracking point: cursor plus length of the current capture scope.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    cursor: usize,
    captures: usize,
}

/// Owned state of one parse invocation.
pub struct ParseState<'src, V> {
    input: &'src str,
    cursor: usize,
    scopes: Vec<Vec<V>>,
    errors: Vec<SyntaxError>,
    depth: usize,
    max_depth: usize,
}

impl<'src, V> ParseState<'src, V> {
    pub(crate) fn new(input: &'src str, max_depth: usize) -> Self {
        Self {
            input,
            cursor: 0,
            scopes: vec![Vec::new()],
            errors: Vec::new(),
            depth: 0,
            max_depth,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    // ------------------------------------------------------------------
    // Input access
    // ------------------------------------------------------------------

    pub(crate) fn rest(&self) -> &'src str {
        &self.input[self.cursor..]
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(crate) fn bump(&mut self, c: char) {
        self.cursor += c.len_utf8();
    }

    pub(crate) fn advance(&mut self, bytes: usize) {
        self.cursor += bytes;
    }

    pub(crate) fn reset_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    pub(crate) fn slice_from(&self, start: usize) -> &'src str {
        &self.input[start..self.cursor]
    }

    // ------------------------------------------------------------------
    // Captures and scopes
    // ------------------------------------------------------------------

    fn current_scope(&mut self) -> &mut Vec<V> {
        self.scopes
            .last_mut()
            .expect("capture scope stack is never empty")
    }

    pub(crate) fn push_capture(&mut self, value: V) {
        self.current_scope().push(value);
    }

    pub(crate) fn push_scope(&mut self) {
        self.scopes.push(Vec::new());
    }

    pub(crate) fn pop_scope(&mut self) -> Vec<V> {
        if self.scopes.len() > 1 {
            self.scopes.pop().unwrap_or_default()
        } else {
            // The root scope is never popped; a mismatched pop is a machine
            // bug, surfaced as an empty capture list rather than a crash.
            Vec::new()
        }
    }

    // ------------------------------------------------------------------
    // Backtracking
    // ------------------------------------------------------------------

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        let captures = self.scopes.last().map(Vec::len).unwrap_or(0);
        Checkpoint {
            cursor: self.cursor,
            captures,
        }
    }

    /// Restore cursor and captures to the checkpoint.
    pub(crate) fn rewind(&mut self, checkpoint: &Checkpoint) {
        self.cursor = checkpoint.cursor;
        self.restore_captures(checkpoint);
    }

    /// Restore captures only; the cursor stays where recovery left it.
    pub(crate) fn restore_captures(&mut self, checkpoint: &Checkpoint) {
        let captures = checkpoint.captures;
        self.current_scope().truncate(captures);
    }

    // ------------------------------------------------------------------
    // Errors and budgets
    // ------------------------------------------------------------------

    pub(crate) fn record_error(&mut self, label: &str) {
        self.errors.push(SyntaxError {
            position: self.cursor,
            label: label.to_string(),
        });
    }

    pub(crate) fn enter_rule(&mut self) -> bool {
        if self.depth >= self.max_depth {
            return false;
        }
        self.depth += 1;
        true
    }

    pub(crate) fn leave_rule(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Consumes the state into (cursor, root captures, errors).
    pub(crate) fn into_parts(self) -> (usize, Vec<V>, Vec<SyntaxError>) {
        let root = self.scopes.into_iter().next().unwrap_or_default();
        (self.cursor, root, self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewind_restores_cursor_and_captures() {
        let mut state: ParseState<&str> = ParseState::new("abcdef", 8);
        state.push_capture("kept");
        let checkpoint = state.checkpoint();
        state.advance(3);
        state.push_capture("dropped");
        state.rewind(&checkpoint);
        let (cursor, captures, _) = state.into_parts();
        assert_eq!(cursor, 0);
        assert_eq!(captures, vec!["kept"]);
    }

    #[test]
    fn test_restore_captures_keeps_cursor() {
        let mut state: ParseState<&str> = ParseState::new("abcdef", 8);
        let checkpoint = state.checkpoint();
        state.advance(4);
        state.push_capture("dropped");
        state.restore_captures(&checkpoint);
        let (cursor, captures, _) = state.into_parts();
        assert_eq!(cursor, 4);
        assert!(captures.is_empty());
    }

    #[test]
    fn test_scope_isolation() {
        let mut state: ParseState<&str> = ParseState::new("", 8);
        state.push_capture("outer");
        state.push_scope();
        state.push_capture("inner");
        let inner = state.pop_scope();
        assert_eq!(inner, vec!["inner"]);
        let (_, root, _) = state.into_parts();
        assert_eq!(root, vec!["outer"]);
    }

    #[test]
    fn test_rule_depth_budget() {
        let mut state: ParseState<&str> = ParseState::new("", 2);
        assert!(state.enter_rule());
        assert!(state.enter_rule());
        assert!(!state.enter_rule());
        state.leave_rule();
        assert!(state.enter_rule());
    }

    #[test]
    fn test_failure_label_matching() {
        assert!(Failure::Panic.matches_label(PANIC_LABEL));
        assert!(!Failure::Panic.matches_label("stmt"));
        assert!(Failure::Labeled("stmt".into()).matches_label("stmt"));
        assert!(!Failure::Soft.matches_label(PANIC_LABEL));
        assert!(!Failure::Overflow.matches_label(PANIC_LABEL));
    }
}
