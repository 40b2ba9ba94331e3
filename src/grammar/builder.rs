//! Constructor functions for assembling [`Pattern`] trees.
//!
//! These are the whole authoring surface: a grammar is an ordinary Rust
//! expression built from these calls, handed to `Grammar::rule`.
//!
//! # Examples
//!
//! ```rust
//! use yantra::grammar::builder::*;
//! use yantra::grammar::Grammar;
//!
//! let grammar = Grammar::new()
//!     .rule("main", seq([keyword("let"), rule("space"), cap(plus(char_class("alpha")))]))
//!     .rule("space", many(regexp("[ \\t]")));
//! assert_eq!(grammar.len(), 2);
//! ```

use super::Pattern;

/// Match one character satisfying the named registry predicate.
pub fn char_class(name: impl Into<String>) -> Pattern {
    Pattern::CharClass(name.into())
}

/// Match one character satisfying the regex pattern.
pub fn regexp(pattern: impl Into<String>) -> Pattern {
    Pattern::Regexp(pattern.into())
}

/// Match `text` as a whole word: the following character, if any, must not
/// be a word constituent.
pub fn keyword(text: impl Into<String>) -> Pattern {
    Pattern::Keyword(text.into())
}

/// Match `text` exactly, with no boundary check.
pub fn literal(text: impl Into<String>) -> Pattern {
    Pattern::Literal(text.into())
}

/// Reference the named rule of the enclosing grammar.
pub fn rule(name: impl Into<String>) -> Pattern {
    Pattern::Rule(name.into())
}

/// Match every item in order.
pub fn seq(items: impl IntoIterator<Item = Pattern>) -> Pattern {
    Pattern::Sequence(items.into_iter().collect())
}

/// Ordered choice over the items.
pub fn choice(items: impl IntoIterator<Item = Pattern>) -> Pattern {
    Pattern::Choice(items.into_iter().collect())
}

/// Zero or more repetitions of `body`.
pub fn many(body: Pattern) -> Pattern {
    Pattern::Many {
        body: Box::new(body),
        recover: None,
    }
}

/// Zero or more repetitions that additionally survive failures resolved by
/// `label`'s recovery: the failed iteration's delta is discarded, prior
/// iterations are kept, and the loop continues.
pub fn many_recovering(body: Pattern, label: impl Into<String>) -> Pattern {
    Pattern::Many {
        body: Box::new(body),
        recover: Some(label.into()),
    }
}

/// One or more repetitions of `body`.
pub fn plus(body: Pattern) -> Pattern {
    seq([body.clone(), many(body)])
}

/// Zero or one occurrence of `body`.
pub fn opt(body: Pattern) -> Pattern {
    Pattern::Option(Box::new(body))
}

/// Match `body` and push the consumed substring as a capture.
pub fn cap(body: Pattern) -> Pattern {
    Pattern::Capture(Box::new(body))
}

/// Run `body` in an isolated capture scope and fold its captures through
/// the named semantic action.
pub fn transform(body: Pattern, action: impl Into<String>) -> Pattern {
    Pattern::Transform {
        body: Box::new(body),
        action: action.into(),
    }
}

/// Run `body` in an isolated capture scope and fold its captures into a
/// record with the given field names, paired positionally.
pub fn collect<I, S>(body: Pattern, fields: I) -> Pattern
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Pattern::Collect {
        body: Box::new(body),
        fields: fields.into_iter().map(Into::into).collect(),
    }
}

/// Zero-width negative lookahead on `body`.
pub fn not(body: Pattern) -> Pattern {
    Pattern::Not(Box::new(body))
}

/// Labeled failure point.
pub fn error_point(label: impl Into<String>) -> Pattern {
    Pattern::ErrorPoint(label.into())
}

/// Match `body`, else fail at this labeled point.
pub fn try_or(body: Pattern, label: impl Into<String>) -> Pattern {
    choice([body, error_point(label)])
}
