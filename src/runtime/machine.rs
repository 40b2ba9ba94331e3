//! Execution of lowered ops against the parse state.
//!
//! Every op terminates in exactly one of three grammar-visible outcomes:
//! success, ordinary (backtrackable) failure, or a hard failure (panic or
//! labeled). Callers of a child op own any snapshot/restore the child's
//! ordinary failure requires; hard failures propagate unrestored until a
//! recovering `Many` or the top level. `Sequence` deliberately takes no
//! snapshot of its own - the enclosing construct does.

use crate::compile::{Op, RecoveryPlan};
use crate::registry::is_word_char;
use crate::runtime::state::{Failure, MatchResult, ParseState};
use crate::value::SemanticValue;

pub(crate) struct Machine<'e, V> {
    rules: &'e [Op<V>],
}

impl<'e, V: SemanticValue> Machine<'e, V> {
    pub fn new(rules: &'e [Op<V>]) -> Self {
        Self { rules }
    }

    pub fn run(&self, op: &Op<V>, state: &mut ParseState<'_, V>) -> MatchResult {
        match op {
            Op::CharClass(predicate) => eat_char(state, |c| predicate(c)),

            Op::Regexp(regex) => eat_char(state, |c| {
                let mut buf = [0u8; 4];
                regex.is_match(c.encode_utf8(&mut buf))
            }),

            Op::Keyword(text) => {
                if !state.rest().starts_with(text.as_str()) {
                    return Err(Failure::Soft);
                }
                state.advance(text.len());
                match state.peek() {
                    Some(c) if is_word_char(c) => Err(Failure::Soft),
                    _ => Ok(()),
                }
            }

            Op::Literal(text) => {
                if state.rest().starts_with(text.as_str()) {
                    state.advance(text.len());
                    Ok(())
                } else {
                    Err(Failure::Soft)
                }
            }

            Op::Sequence(items) => {
                for item in items {
                    self.run(item, state)?;
                }
                Ok(())
            }

            Op::Choice(items) => {
                let checkpoint = state.checkpoint();
                for item in items {
                    match self.run(item, state) {
                        Ok(()) => return Ok(()),
                        Err(Failure::Soft) => state.rewind(&checkpoint),
                        Err(hard) => return Err(hard),
                    }
                }
                Err(Failure::Soft)
            }

            Op::Many { body, recover } => loop {
                let checkpoint = state.checkpoint();
                match self.run(body, state) {
                    Ok(()) => continue,
                    Err(Failure::Soft) => {
                        state.rewind(&checkpoint);
                        return Ok(());
                    }
                    Err(failure) => match recover {
                        // Keep prior iterations, drop the failed attempt's
                        // captures, resume from wherever recovery stopped.
                        Some(label) if failure.matches_label(label) => {
                            state.restore_captures(&checkpoint);
                        }
                        _ => return Err(failure),
                    },
                }
            },

            // Indices are resolved at assembly time; out of range is impossible.
            Op::Rule(index) => {
                if !state.enter_rule() {
                    return Err(Failure::Overflow);
                }
                let result = self.run(&self.rules[*index], state);
                state.leave_rule();
                result
            }

            Op::Option(body) => {
                let checkpoint = state.checkpoint();
                match self.run(body, state) {
                    Ok(()) => Ok(()),
                    Err(Failure::Soft) => {
                        state.rewind(&checkpoint);
                        Ok(())
                    }
                    Err(hard) => Err(hard),
                }
            }

            Op::Capture(body) => {
                let start = state.cursor();
                self.run(body, state)?;
                let value = V::from_text(state.slice_from(start));
                state.push_capture(value);
                Ok(())
            }

            Op::Transform { body, action } => {
                state.push_scope();
                match self.run(body, state) {
                    Ok(()) => {
                        let values = state.pop_scope();
                        state.push_capture(action(values));
                        Ok(())
                    }
                    Err(failure) => {
                        state.pop_scope();
                        Err(failure)
                    }
                }
            }

            Op::Collect { body, fields } => {
                state.push_scope();
                match self.run(body, state) {
                    Ok(()) => {
                        let values = state.pop_scope();
                        let record = fields.iter().cloned().zip(values).collect();
                        state.push_capture(V::from_record(record));
                        Ok(())
                    }
                    Err(failure) => {
                        state.pop_scope();
                        Err(failure)
                    }
                }
            }

            Op::Not(body) => {
                let cursor = state.cursor();
                state.push_scope();
                let inner = self.run(body, state);
                state.pop_scope();
                match inner {
                    Ok(()) => {
                        state.reset_cursor(cursor);
                        Err(Failure::Soft)
                    }
                    Err(Failure::Soft) => {
                        state.reset_cursor(cursor);
                        Ok(())
                    }
                    Err(hard) => Err(hard),
                }
            }

            Op::Recover { label, plan } => match plan {
                RecoveryPlan::Resync(resync) => {
                    state.record_error(label);
                    self.run(resync, state)?;
                    Ok(())
                }
                RecoveryPlan::Panic(resync) => {
                    state.record_error(label);
                    self.run(resync, state)?;
                    Err(Failure::Panic)
                }
                RecoveryPlan::Raise => Err(Failure::Labeled(label.clone())),
            },
        }
    }
}

fn eat_char<V>(state: &mut ParseState<'_, V>, matches: impl Fn(char) -> bool) -> MatchResult {
    match state.peek() {
        Some(c) if matches(c) => {
            state.bump(c);
            Ok(())
        }
        _ => Err(Failure::Soft),
    }
}
