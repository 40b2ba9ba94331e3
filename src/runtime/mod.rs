//! Runtime parse state and the matching machine.
//!
//! One [`state::ParseState`] is created per invocation of the entry
//! operation and discarded at its end; nothing here is shared across
//! invocations. Backtracking is structured failure propagation through
//! nested machine calls, never a concurrent task.

pub mod machine;
pub mod state;

pub use state::{Failure, MatchResult, ParseState, SyntaxError};
