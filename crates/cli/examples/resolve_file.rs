use rutdedup_core::{resolve, DeletionReason, PassConfig};
use rutdedup_formats::open_dataset;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 rutdedup\n");

    let input_file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/tmp/employees.yaml".to_string());

    println!("Input: {}\n", input_file);

    println!("📖 Reading records...");
    let records = open_dataset(&input_file, None)?;
    println!("✓ Read {} records\n", records.len());

    println!("🔨 Resolving duplicates...");
    let resolution = resolve(&records, &PassConfig::default())?;

    for decision in &resolution.decisions {
        println!(
            "  rut {}: keeping {} over {} other record(s)",
            decision.key,
            decision.kept.path,
            decision.removed.len()
        );
    }

    println!("\n🗑  Paths to delete:");
    for deletion in resolution.deletions.iter() {
        let why = match &deletion.reason {
            DeletionReason::Duplicate { key } => format!("duplicate of rut {}", key),
            DeletionReason::ImportBatch => "import batch".to_string(),
        };
        println!("  {} ({})", deletion.path, why);
    }

    let stats = &resolution.stats;
    println!("\n📊 Summary:");
    println!("  Total records: {}", stats.total_records);
    println!("  Duplicate groups: {}", stats.duplicate_groups);
    println!("  Duplicates: {}", stats.deleted_duplicates);
    println!("  Import batch: {}", stats.deleted_import_batch);
    println!("  Retained: {}", stats.retained());

    Ok(())
}
