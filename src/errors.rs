//! Yantra Error Handling - Unified Encapsulated API
//!
//! One error type covers both failure surfaces of the engine: grammar
//! assembly (unresolved names, bad patterns) and fatal parse outcomes
//! (residual input, unrecovered labels, panic aborts). Recovered syntax
//! errors are not errors in this sense - they live on the parse state as
//! `(position, label)` records and only become diagnostics when a caller
//! asks for a report.

use miette::{Diagnostic, SourceSpan};
use miette::{LabeledSpan, NamedSource};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Represents source context for error reporting with explicit hierarchy
/// between real sources (preferred) and fallbacks (tolerated when necessary)
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Create a source context from real input text
    /// This is the preferred method for error reporting
    pub fn from_input(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Create a fallback when real source is unavailable
    /// Use only when real source cannot be obtained
    pub fn fallback(context: &str) -> Self {
        Self {
            name: "fallback".to_string(),
            content: format!("// {}", context),
        }
    }

    /// Convert to NamedSource for use with miette error reporting
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }

    /// A one-character span at the given byte offset, clamped to the content.
    pub fn span_at(&self, offset: usize) -> SourceSpan {
        if offset < self.content.len() {
            (offset, 1).into()
        } else {
            (self.content.len(), 0).into()
        }
    }
}

impl Default for SourceContext {
    fn default() -> Self {
        Self::fallback("default context")
    }
}

/// The single error type - no wrapper, no variants, just essential data
#[derive(Debug)]
pub struct YantraError {
    /// What went wrong (type-specific data)
    pub kind: ErrorKind,
    /// Where it happened (context-specific source information)
    pub source_info: SourceInfo,
    /// How to help (auto-populated based on context)
    pub diagnostic_info: DiagnosticInfo,
}

/// All error types as a clean enum - no duplicate fields
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    // Assembly errors - the grammar cannot be lowered
    MissingEntryRule,
    DuplicateRule {
        name: String,
    },
    UnknownRule {
        name: String,
    },
    UnknownAction {
        name: String,
    },
    UnknownPredicate {
        name: String,
    },
    InvalidCharPattern {
        pattern: String,
        reason: String,
    },

    // Parse errors - a run against real input could not complete
    UnexpectedInput,
    UnrecoveredLabel {
        label: String,
    },
    ParseAborted,
    RecursionLimit,

    // Recovered syntax errors, promoted to diagnostics on request
    Syntax {
        label: String,
    },
}

/// Context-specific source information
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
    pub phase: String,
}

/// Diagnostic enhancement data
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

/// Context-aware error creation - each context knows how to create appropriate errors
pub trait ErrorReporting {
    /// Create an error with context-appropriate enhancements
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> YantraError;

    /// Convenience methods for common error types
    fn missing_entry_rule(&self) -> YantraError {
        self.report(ErrorKind::MissingEntryRule, unspanned())
    }

    fn duplicate_rule(&self, name: &str) -> YantraError {
        self.report(ErrorKind::DuplicateRule { name: name.into() }, unspanned())
    }

    fn unknown_rule(&self, name: &str) -> YantraError {
        self.report(ErrorKind::UnknownRule { name: name.into() }, unspanned())
    }

    fn unknown_action(&self, name: &str) -> YantraError {
        self.report(ErrorKind::UnknownAction { name: name.into() }, unspanned())
    }

    fn unknown_predicate(&self, name: &str) -> YantraError {
        self.report(ErrorKind::UnknownPredicate { name: name.into() }, unspanned())
    }

    fn invalid_char_pattern(&self, pattern: &str, reason: &str) -> YantraError {
        self.report(
            ErrorKind::InvalidCharPattern {
                pattern: pattern.into(),
                reason: reason.into(),
            },
            unspanned(),
        )
    }

    fn unrecovered_label(&self, label: &str, span: SourceSpan) -> YantraError {
        self.report(
            ErrorKind::UnrecoveredLabel {
                label: label.into(),
            },
            span,
        )
    }

    fn syntax_error(&self, label: &str, span: SourceSpan) -> YantraError {
        self.report(ErrorKind::Syntax { label: label.into() }, span)
    }
}

/// Error-reporting context for grammar assembly, where no input text exists yet.
#[derive(Debug, Clone)]
pub struct AssemblyContext {
    pub source: SourceContext,
}

impl AssemblyContext {
    pub fn new() -> Self {
        Self {
            source: SourceContext::fallback("grammar assembly"),
        }
    }
}

impl Default for AssemblyContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorReporting for AssemblyContext {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> YantraError {
        YantraError {
            source_info: SourceInfo {
                source: self.source.to_named_source(),
                primary_span: span,
                phase: "assembly".to_string(),
            },
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code: format!("yantra::assembly::{}", kind.code_suffix()),
            },
            kind,
        }
    }
}

impl ErrorReporting for SourceContext {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> YantraError {
        YantraError {
            source_info: SourceInfo {
                source: self.to_named_source(),
                primary_span: span,
                phase: "parse".to_string(),
            },
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code: format!("yantra::parse::{}", kind.code_suffix()),
            },
            kind,
        }
    }
}

/// A span pointing nowhere, for errors that precede any input.
pub fn unspanned() -> SourceSpan {
    (0, 0).into()
}

impl ErrorKind {
    /// Get the error category for test assertions
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingEntryRule
            | Self::DuplicateRule { .. }
            | Self::UnknownRule { .. }
            | Self::UnknownAction { .. }
            | Self::UnknownPredicate { .. }
            | Self::InvalidCharPattern { .. } => ErrorCategory::Assembly,

            Self::UnexpectedInput
            | Self::UnrecoveredLabel { .. }
            | Self::ParseAborted
            | Self::RecursionLimit
            | Self::Syntax { .. } => ErrorCategory::Parse,
        }
    }

    /// Get error code suffix for diagnostic codes
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::MissingEntryRule => "missing_entry_rule",
            Self::DuplicateRule { .. } => "duplicate_rule",
            Self::UnknownRule { .. } => "unknown_rule",
            Self::UnknownAction { .. } => "unknown_action",
            Self::UnknownPredicate { .. } => "unknown_predicate",
            Self::InvalidCharPattern { .. } => "invalid_char_pattern",
            Self::UnexpectedInput => "unexpected_input",
            Self::UnrecoveredLabel { .. } => "unrecovered_label",
            Self::ParseAborted => "parse_aborted",
            Self::RecursionLimit => "recursion_limit",
            Self::Syntax { .. } => "syntax",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Assembly,
    Parse,
}

impl std::error::Error for YantraError {}

impl fmt::Display for YantraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::MissingEntryRule => {
                write!(f, "Assembly error: grammar has no \"main\" rule")
            }
            ErrorKind::DuplicateRule { name } => {
                write!(f, "Assembly error: rule '{}' is defined twice", name)
            }
            ErrorKind::UnknownRule { name } => {
                write!(f, "Assembly error: reference to undefined rule '{}'", name)
            }
            ErrorKind::UnknownAction { name } => {
                write!(f, "Assembly error: undefined semantic action '{}'", name)
            }
            ErrorKind::UnknownPredicate { name } => {
                write!(
                    f,
                    "Assembly error: undefined character predicate '{}'",
                    name
                )
            }
            ErrorKind::InvalidCharPattern { pattern, reason } => {
                write!(
                    f,
                    "Assembly error: invalid character pattern '{}': {}",
                    pattern, reason
                )
            }
            ErrorKind::UnexpectedInput => {
                write!(f, "Parse error: unexpected input")
            }
            ErrorKind::UnrecoveredLabel { label } => {
                write!(f, "Parse error: unrecovered failure at '{}'", label)
            }
            ErrorKind::ParseAborted => {
                write!(f, "Parse error: aborted during panic recovery")
            }
            ErrorKind::RecursionLimit => {
                write!(f, "Parse error: rule recursion limit exceeded")
            }
            ErrorKind::Syntax { label } => {
                write!(f, "Syntax error: malformed '{}'", label)
            }
        }
    }
}

impl Diagnostic for YantraError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.primary_label()),
            self.source_info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source_info.source)
    }
}

impl YantraError {
    fn primary_label(&self) -> String {
        match &self.kind {
            ErrorKind::MissingEntryRule
            | ErrorKind::DuplicateRule { .. }
            | ErrorKind::UnknownRule { .. }
            | ErrorKind::UnknownAction { .. }
            | ErrorKind::UnknownPredicate { .. }
            | ErrorKind::InvalidCharPattern { .. } => "in this grammar".into(),
            ErrorKind::UnexpectedInput => "parsing stopped here".into(),
            ErrorKind::UnrecoveredLabel { .. } => "failed here".into(),
            ErrorKind::ParseAborted => "abandoned here".into(),
            ErrorKind::RecursionLimit => "recursed here".into(),
            ErrorKind::Syntax { .. } => "recovered here".into(),
        }
    }

    /// Returns the error category, mirroring `ErrorKind::category`.
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Report;

    #[test]
    fn test_assembly_error_display() {
        let ctx = AssemblyContext::new();
        let err = ctx.unknown_rule("stmt");
        assert_eq!(err.category(), ErrorCategory::Assembly);
        assert!(err.to_string().contains("undefined rule 'stmt'"));
    }

    #[test]
    fn test_parse_error_report_carries_source() {
        let source = SourceContext::from_input("input", "a b c");
        let err = source.report(ErrorKind::UnexpectedInput, source.span_at(2));
        let report = Report::new(err);
        let output = format!("{report:?}");
        assert!(output.contains("unexpected input"));
    }

    #[test]
    fn test_span_at_clamps_to_content() {
        let source = SourceContext::from_input("input", "ab");
        let span = source.span_at(99);
        assert_eq!(span.offset(), 2);
        assert_eq!(span.len(), 0);
    }
}
