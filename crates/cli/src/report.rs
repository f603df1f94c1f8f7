//! Output writing and summary reporting for the CLI

use anyhow::{Context, Result};
use rutdedup_core::{DeletionSet, PassStats, Resolution};
use serde_json::{json, Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Open the report destination: a file when given, stdout otherwise
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(std::io::stdout().lock()))),
    }
}

/// Write deletion paths, one per line
pub fn write_paths<W: Write>(writer: &mut W, deletions: &DeletionSet) -> Result<()> {
    for path in deletions.paths() {
        writeln!(writer, "{}", path)?;
    }
    Ok(())
}

/// Machine-readable report of an `identify` run
pub fn deletion_report(input: &Path, resolution: &Resolution<'_>) -> Value {
    json!({
        "input": input.to_string_lossy().to_string(),
        "paths": resolution.deletions.paths().collect::<Vec<_>>(),
        "deletions": resolution.deletions.iter().collect::<Vec<_>>(),
        "stats": resolution.stats,
    })
}

/// Every natural key shared by more than one record, with the ranking outcome
pub fn duplicates_report(resolution: &Resolution<'_>, key_field: &str) -> Value {
    let groups = resolution
        .decisions
        .iter()
        .map(|decision| {
            let mut entry = Map::new();
            entry.insert(key_field.to_string(), json!(decision.key));
            entry.insert("count".to_string(), json!(decision.member_count()));
            entry.insert("kept".to_string(), json!(decision.kept.path));
            entry.insert(
                "deleted".to_string(),
                json!(decision.removed.iter().map(|m| &m.path).collect::<Vec<_>>()),
            );
            entry.insert(
                "docs".to_string(),
                Value::Array(
                    decision
                        .members()
                        .map(|m| Value::Object(m.record.data.clone()))
                        .collect(),
                ),
            );
            Value::Object(entry)
        })
        .collect();

    Value::Array(groups)
}

/// Log the keep/delete decision of every duplicate group
pub fn explain(resolution: &Resolution<'_>, key_field: &str, email_field: &str) {
    for decision in &resolution.decisions {
        info!(
            "Found {} docs for {} {}",
            decision.member_count(),
            key_field,
            decision.key
        );
        info!(
            "  Keeping: {} ({})",
            decision.kept.path,
            email_of(decision.kept.record, email_field)
        );
        for member in &decision.removed {
            info!(
                "  Deleting: {} ({})",
                member.path,
                email_of(member.record, email_field)
            );
        }
    }

    if resolution.decisions.is_empty() {
        info!("No duplicates found");
    }
}

fn email_of(record: &rutdedup_formats::Record, email_field: &str) -> String {
    record
        .field_str(email_field)
        .map(|email| email.into_owned())
        .unwrap_or_else(|| "no email".to_string())
}

/// Print a formatted summary report to stderr
pub fn print_summary_report(input: &Path, output: Option<&Path>, stats: &PassStats) {
    eprintln!("\n{}", "═".repeat(60));
    eprintln!("Duplicate Resolution Complete");
    eprintln!("{}", "═".repeat(60));
    eprintln!("Input:              {}", input.display());

    match output {
        Some(output_path) => eprintln!("Output:             {}", output_path.display()),
        None => eprintln!("Output:             (stdout)"),
    }

    eprintln!("Total records:      {}", format_with_commas(stats.total_records));

    if stats.skipped_missing_path > 0 {
        eprintln!(
            "Skipped (no path):  {}",
            format_with_commas(stats.skipped_missing_path)
        );
    }

    eprintln!(
        "Duplicate groups:   {} of {} keys",
        format_with_commas(stats.duplicate_groups),
        format_with_commas(stats.distinct_keys)
    );
    eprintln!(
        "Duplicates:         {}",
        format_with_commas(stats.deleted_duplicates)
    );
    eprintln!(
        "Import batch:       {}",
        format_with_commas(stats.deleted_import_batch)
    );
    eprintln!(
        "To delete:          {} ({:.1}%)",
        format_with_commas(stats.total_deleted()),
        percent(stats.total_deleted(), stats.total_records)
    );
    eprintln!("Retained:           {}", format_with_commas(stats.retained()));

    eprintln!("{}", "═".repeat(60));
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Format number with thousand separators
fn format_with_commas(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
