//! Import-batch provenance signal
//!
//! Records created by the bulk import carry ids like `import-42`. They are
//! lower quality than hand-entered records and are swept even when they
//! have no duplicate.

use crate::{Error, Result};
use rutdedup_formats::Record;

/// Default id prefix of the bulk import batch
pub const DEFAULT_IMPORT_PREFIX: &str = "import-";

/// Matches records whose id starts with the import-batch prefix
#[derive(Debug, Clone)]
pub struct ImportBatchFilter {
    prefix: String,
    field_name: String,
}

impl ImportBatchFilter {
    /// Create a filter over the `id` field
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        Self::with_field(prefix, "id")
    }

    /// Create a filter over a custom id field
    pub fn with_field(prefix: impl Into<String>, field_name: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            // An empty prefix would match every record
            return Err(Error::InvalidConfig(
                "import prefix must not be empty".to_string(),
            ));
        }

        Ok(Self {
            prefix,
            field_name: field_name.into(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// True when the id, in string form, starts with the prefix
    ///
    /// A missing id is the empty string and never matches.
    pub fn is_import_batch(&self, record: &Record) -> bool {
        record
            .field_str(&self.field_name)
            .map(|id| id.starts_with(self.prefix.as_str()))
            .unwrap_or(false)
    }
}

impl Default for ImportBatchFilter {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_IMPORT_PREFIX.to_string(),
            field_name: "id".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::from_value(value, 1).unwrap()
    }

    #[test]
    fn test_import_prefixed_ids() {
        let filter = ImportBatchFilter::default();

        assert!(filter.is_import_batch(&record(json!({"id": "import-1"}))));
        assert!(filter.is_import_batch(&record(json!({"id": "import-"}))));
        assert!(!filter.is_import_batch(&record(json!({"id": "x"}))));
        assert!(!filter.is_import_batch(&record(json!({"id": "my-import-1"}))));
    }

    #[test]
    fn test_missing_id_is_not_import() {
        let filter = ImportBatchFilter::default();

        assert!(!filter.is_import_batch(&record(json!({"rut": "1-9"}))));
        assert!(!filter.is_import_batch(&record(json!({"id": null}))));
    }

    #[test]
    fn test_numeric_id_uses_string_form() {
        let filter = ImportBatchFilter::new("12").unwrap();

        assert!(filter.is_import_batch(&record(json!({"id": 1234}))));
        assert!(!filter.is_import_batch(&record(json!({"id": 34}))));
    }

    #[test]
    fn test_empty_prefix_rejected() {
        assert!(matches!(
            ImportBatchFilter::new(""),
            Err(Error::InvalidConfig(_))
        ));
    }
}
