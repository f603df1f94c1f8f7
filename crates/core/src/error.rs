//! Error types for the duplicate resolution pass

use thiserror::Error;

/// Core resolution errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Record #{source_line} has no '{field}' field and cannot be scheduled for deletion")]
    MissingPath { source_line: usize, field: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Filter(#[from] rutdedup_filters::Error),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
