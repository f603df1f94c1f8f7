//! Unified record collection reader
//!
//! Picks a reader from the file extension (or an explicit [`Format`]) and
//! loads the whole collection into memory.

use crate::{
    document::{read_json_array, read_yaml_sequence},
    jsonl::JsonlReader,
    Error, Record, Result,
};
use flate2::read::GzDecoder;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Serialized layout of a record collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// One JSON object per line
    Jsonl,
    /// A JSON array of objects
    Json,
    /// A YAML sequence of mappings
    Yaml,
}

impl Format {
    /// Detect the format from a file name, looking through a trailing `.gz`
    ///
    /// Returns the format and whether the file is gzip-compressed.
    pub fn detect<P: AsRef<Path>>(path: P) -> Result<(Format, bool)> {
        let path = path.as_ref();
        let extension = extension_of(path)?;

        if extension == "gz" {
            let inner = path.file_stem().map(Path::new).unwrap_or(path);
            let format = extension_of(inner)?.parse()?;
            return Ok((format, true));
        }

        Ok((extension.parse()?, false))
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "jsonl" | "ndjson" => Ok(Format::Jsonl),
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => Err(Error::UnsupportedFormat(format!(
                "Unsupported record format: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Jsonl => "jsonl",
            Format::Json => "json",
            Format::Yaml => "yaml",
        };
        f.write_str(name)
    }
}

fn extension_of(path: &Path) -> Result<&str> {
    path.extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| Error::UnsupportedFormat("No file extension found".to_string()))
}

/// Read every record from an already opened source
pub fn read_dataset<R: Read>(reader: R, format: Format) -> Result<Vec<Record>> {
    match format {
        Format::Jsonl => JsonlReader::new(reader).collect(),
        Format::Json => read_json_array(reader),
        Format::Yaml => read_yaml_sequence(reader),
    }
}

/// Open a record collection file and load all of its records
///
/// Supported files:
/// - `.jsonl`, `.ndjson` - JSON Lines
/// - `.json` - JSON array
/// - `.yaml`, `.yml` - YAML sequence
/// - any of the above followed by `.gz` - gzip-compressed
///
/// `format` overrides the extension-based detection; compression is still
/// taken from a trailing `.gz`.
pub fn open_dataset<P: AsRef<Path>>(path: P, format: Option<Format>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let gzip = path.extension().and_then(|e| e.to_str()) == Some("gz");
    let format = match format {
        Some(format) => format,
        None => Format::detect(path)?.0,
    };

    info!("Opening records: {:?} (format: {}, gzip: {})", path, format, gzip);

    let file = File::open(path)?;
    let records = if gzip {
        debug!("Decompressing {:?}", path);
        read_dataset(GzDecoder::new(file), format)?
    } else {
        read_dataset(file, format)?
    };

    debug!("Loaded {} records from {:?}", records.len(), path);
    Ok(records)
}
