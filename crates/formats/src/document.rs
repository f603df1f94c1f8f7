//! Whole-document readers for JSON arrays and YAML sequences
//!
//! Both formats hold the collection as a single top-level sequence whose
//! elements are mappings. An empty document is an empty collection.

use crate::{error::kind_of, Error, Record, Result};
use serde_json::Value;
use std::io::Read;
use tracing::debug;

/// Read a JSON document whose top level is an array of objects
pub fn read_json_array<R: Read>(mut reader: R) -> Result<Vec<Record>> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;

    if content.trim().is_empty() {
        debug!("Empty JSON document, no records");
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(&content)?;
    records_from_sequence(value)
}

/// Read a YAML document whose top level is a sequence of mappings
pub fn read_yaml_sequence<R: Read>(mut reader: R) -> Result<Vec<Record>> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;

    if content.trim().is_empty() {
        debug!("Empty YAML document, no records");
        return Ok(Vec::new());
    }

    let value: Value = serde_yaml::from_str(&content)?;
    match value {
        // A document holding only `~`
        Value::Null => Ok(Vec::new()),
        other => records_from_sequence(other),
    }
}

fn records_from_sequence(value: Value) -> Result<Vec<Record>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| Record::from_value(item, index + 1))
            .collect(),
        other => Err(Error::NotASequence(kind_of(&other))),
    }
}
