//! Yantra: a declarative PEG engine.
//!
//! Grammars are built as data with the constructors in [`grammar::builder`],
//! bound together with a [`grammar::RecoveryTable`] and an
//! [`registry::ActionRegistry`], and compiled by [`engine::ParserEngine`]
//! into a backtracking recursive-descent parser with ordered choice,
//! semantic-value capture, and explicit multi-error recovery.

pub use crate::errors::{ErrorCategory, ErrorKind, ErrorReporting, SourceContext, YantraError};

mod compile;
pub mod engine;
pub mod errors;
pub mod grammar;
pub mod registry;
pub mod runtime;
pub mod tiny;
pub mod value;

pub use crate::engine::{ParseRun, ParserEngine};
pub use crate::grammar::{Grammar, Pattern, RecoveryTable};
pub use crate::registry::ActionRegistry;
pub use crate::runtime::{Failure, SyntaxError};
pub use crate::value::{SemanticValue, Value};
