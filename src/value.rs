//! Semantic values produced while matching.
//!
//! The engine treats captured values as opaque: it only ever needs to turn a
//! matched substring into a value (`Capture`) and to fold a set of named
//! fields into a value (`Collect`). Everything else is the client's business,
//! expressed through the `SemanticValue` trait. The ready-made [`Value`] enum
//! covers grammars that do not want a custom AST.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Contract between the engine and client-defined value types.
pub trait SemanticValue: Sized {
    /// Build a value from the exact substring a `Capture` node consumed.
    fn from_text(text: &str) -> Self;

    /// Build a value from a `Collect` node's named fields, paired
    /// positionally from the node's declared field list.
    fn from_record(fields: Vec<(String, Self)>) -> Self;
}

/// General-purpose semantic value for grammars without a dedicated AST.
///
/// # Examples
///
/// ```rust
/// use yantra::value::{SemanticValue, Value};
/// let v = Value::from_text("hello");
/// assert_eq!(v.as_text(), Some("hello"));
/// assert_eq!(v.type_name(), "Text");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    List(Vec<Value>),
    Record(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the type name of the value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "Text",
            Value::List(_) => "List",
            Value::Record(_) => "Record",
        }
    }

    /// Returns the contained text if this is a Text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the contained items if this is a List value.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the contained fields if this is a Record value.
    pub fn as_record(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Looks up a record field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_record().and_then(|fields| fields.get(name))
    }
}

impl SemanticValue for Value {
    fn from_text(text: &str) -> Self {
        Value::Text(text.to_string())
    }

    fn from_record(fields: Vec<(String, Self)>) -> Self {
        Value::Record(fields.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_fields_by_name() {
        let record = Value::from_record(vec![
            ("lhs".to_string(), Value::from_text("x")),
            ("rhs".to_string(), Value::from_text("1")),
        ]);
        assert_eq!(record.field("lhs").and_then(Value::as_text), Some("x"));
        assert_eq!(record.field("rhs").and_then(Value::as_text), Some("1"));
        assert!(record.field("missing").is_none());
    }

    #[test]
    fn test_accessors_reject_other_variants() {
        let v = Value::List(vec![]);
        assert!(v.as_text().is_none());
        assert!(v.as_record().is_none());
        assert_eq!(v.type_name(), "List");
    }
}
