//! Record collection readers
//!
//! This crate loads exported record collections (JSON Lines, JSON arrays,
//! YAML sequences, optionally gzip-compressed) into memory as [`Record`]s
//! with uniform optional-field access.

pub mod document;
pub mod error;
pub mod jsonl;
pub mod reader;
pub mod record;

pub use error::{Error, Result};
pub use reader::{open_dataset, read_dataset, Format};
pub use record::{is_truthy, Record};
