//! JSONL (JSON Lines) reader
//!
//! Reads one record per line. Blank lines are skipped; a line that fails
//! to parse, or is not a mapping, ends the read with an error.

use crate::{Error, Record, Result};
use std::io::{BufRead, BufReader, Read};
use tracing::debug;

/// Configuration for JSONL reader
#[derive(Debug, Clone)]
pub struct JsonlConfig {
    /// Buffer size for BufReader
    pub buffer_size: usize,
}

impl Default for JsonlConfig {
    fn default() -> Self {
        Self {
            buffer_size: 64 * 1024, // 64KB buffer
        }
    }
}

/// Line-by-line JSONL reader
pub struct JsonlReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    bytes_read: u64,
    records_read: usize,
    failed: bool,
}

impl<R: Read> JsonlReader<R> {
    /// Create a new JSONL reader from any Read source
    pub fn new(reader: R) -> Self {
        Self::new_with_config(reader, JsonlConfig::default())
    }

    /// Create a new JSONL reader with custom configuration
    pub fn new_with_config(reader: R, config: JsonlConfig) -> Self {
        Self {
            reader: BufReader::with_capacity(config.buffer_size, reader),
            line_number: 0,
            bytes_read: 0,
            records_read: 0,
            failed: false,
        }
    }

    /// Get the number of lines consumed, blank lines included
    pub fn lines_processed(&self) -> usize {
        self.line_number
    }

    /// Get the number of records produced
    pub fn records_processed(&self) -> usize {
        self.records_read
    }

    /// Get the number of bytes read
    pub fn bytes_processed(&self) -> u64 {
        self.bytes_read
    }
}

impl<R: Read> Iterator for JsonlReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let mut line = String::new();

        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None, // EOF
                Ok(n) => {
                    self.bytes_read += n as u64;
                    self.line_number += 1;

                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    let parsed = serde_json::from_str(trimmed)
                        .map_err(|source| Error::InvalidLine {
                            line: self.line_number,
                            source,
                        })
                        .and_then(|value| Record::from_value(value, self.line_number));

                    return Some(match parsed {
                        Ok(record) => {
                            self.records_read += 1;
                            Ok(record)
                        }
                        Err(e) => {
                            debug!("Stopping JSONL read at line {}", self.line_number);
                            self.failed = true;
                            Err(e)
                        }
                    });
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(Error::Io(e)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jsonl_reader_basic() {
        let data = r#"{"__path__": "employees/a", "rut": "1-9"}
{"__path__": "employees/b", "rut": "2-7"}
{"__path__": "employees/c"}"#;

        let reader = JsonlReader::new(data.as_bytes());
        let records: Vec<_> = reader.collect::<Result<Vec<_>>>().unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].data["__path__"], "employees/a");
        assert_eq!(records[1].data["rut"], "2-7");
        assert_eq!(records[2].source_line, 3);
    }

    #[test]
    fn test_jsonl_reader_with_empty_lines() {
        let data = "{\"__path__\": \"a\"}\n\n{\"__path__\": \"b\"}\n\n";

        let reader = JsonlReader::new(data.as_bytes());
        let records: Vec<_> = reader.collect::<Result<Vec<_>>>().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].source_line, 3);
    }

    #[test]
    fn test_jsonl_reader_fails_on_malformed_line() {
        let data = r#"{"__path__": "a"}
{invalid json}
{"__path__": "b"}"#;

        let result = JsonlReader::new(data.as_bytes()).collect::<Result<Vec<_>>>();

        assert!(matches!(result, Err(Error::InvalidLine { line: 2, .. })));
    }

    #[test]
    fn test_jsonl_reader_stops_after_error() {
        let data = "[1, 2]\n{\"__path__\": \"b\"}\n";

        let mut reader = JsonlReader::new(data.as_bytes());
        assert!(matches!(reader.next(), Some(Err(Error::NotAMapping { position: 1, .. }))));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_jsonl_reader_progress_tracking() {
        let data = "{\"__path__\": \"a\"}\n\n{\"__path__\": \"b\"}";

        let mut reader = JsonlReader::new(data.as_bytes());

        assert_eq!(reader.lines_processed(), 0);
        assert_eq!(reader.bytes_processed(), 0);

        let _ = reader.next();
        assert_eq!(reader.lines_processed(), 1);
        assert_eq!(reader.records_processed(), 1);
        assert!(reader.bytes_processed() > 0);

        let _ = reader.next();
        assert_eq!(reader.lines_processed(), 3);
        assert_eq!(reader.records_processed(), 2);
    }
}
