//! Error types for record readers

use thiserror::Error;

/// Record reader errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Invalid JSON at line {line}: {source}")]
    InvalidLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected a top-level sequence of records, found {0}")]
    NotASequence(String),

    #[error("Record #{position} is not a mapping (found {found})")]
    NotAMapping { position: usize, found: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for format operations
pub type Result<T> = std::result::Result<T, Error>;

/// Short human name of a JSON value's kind, used in error messages
pub(crate) fn kind_of(value: &serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
    .to_string()
}
