//! Field completeness signal

use rutdedup_formats::Record;

/// Count of fields holding a truthy value, bookkeeping fields included
pub fn completeness(record: &Record) -> usize {
    record.truthy_field_count()
}
