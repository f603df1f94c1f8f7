//! Record data structure and optional-field access
//!
//! Every field of a record is optional. Absent fields and explicit `null`
//! values are both reported as `None` by the accessors, so callers never
//! have to distinguish between the two.

use crate::{error::kind_of, Error, Result};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// A single record from a record collection
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// The field mapping for this record
    pub data: Map<String, Value>,
    /// 1-based position in the source (line for JSONL, element index otherwise)
    pub source_line: usize,
}

impl Record {
    /// Create a new record
    pub fn new(data: Map<String, Value>, source_line: usize) -> Self {
        Self { data, source_line }
    }

    /// Build a record from an arbitrary JSON value, which must be a mapping
    pub fn from_value(value: Value, source_line: usize) -> Result<Self> {
        match value {
            Value::Object(data) => Ok(Self::new(data, source_line)),
            other => Err(Error::NotAMapping {
                position: source_line,
                found: kind_of(&other),
            }),
        }
    }

    /// Look up a field, treating `null` the same as a missing field
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self.data.get(name) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    /// Look up a field and coerce it to its string form
    ///
    /// Strings are borrowed as-is; numbers, booleans and containers are
    /// rendered as compact JSON text.
    pub fn field_str(&self, name: &str) -> Option<Cow<'_, str>> {
        self.field(name).map(|value| match value {
            Value::String(s) => Cow::Borrowed(s.as_str()),
            other => Cow::Owned(other.to_string()),
        })
    }

    /// Field value as a string, only when the value is truthy
    pub fn truthy_str(&self, name: &str) -> Option<Cow<'_, str>> {
        self.field(name)
            .filter(|value| is_truthy(value))
            .and_then(|_| self.field_str(name))
    }

    /// Number of fields holding a truthy value
    pub fn truthy_field_count(&self) -> usize {
        self.data.values().filter(|v| is_truthy(v)).count()
    }
}

/// Truthiness of a field value
///
/// `null`, `false`, numeric zero, `""`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
