use serde_json::{json, Value};
use std::fs::File;
use std::io::{BufWriter, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/tmp/employees.yaml".to_string());

    println!("🔧 Generating test collection: {}\n", output_file);

    let mut records: Vec<Value> = Vec::new();

    // Hand-entered record and its bulk-imported twin
    println!("Adding imported duplicates...");
    records.push(json!({"__path__": "employees/a1", "rut": "11.111.111-1", "id": "a1", "email": "ana@cftestatal.cl", "nombre": "Ana"}));
    records.push(json!({"__path__": "employees/import-1", "rut": "11.111.111-1", "id": "import-1", "nombre": "Ana"}));

    // Two hand-entered copies; the more complete one survives
    println!("Adding incomplete duplicates...");
    records.push(json!({"__path__": "employees/b1", "rut": "22.222.222-2", "id": "b1", "nombre": "Bruno"}));
    records.push(json!({"__path__": "employees/b2", "rut": "22.222.222-2", "id": "b2", "nombre": "Bruno", "cargo": "Docente", "dias": 15}));

    // Institutional e-mail beats completeness
    println!("Adding trusted duplicates...");
    records.push(json!({"__path__": "employees/c1", "rut": "33.333.333-3", "id": "c1", "email": "carla@gmail.com", "nombre": "Carla", "cargo": "Jefa"}));
    records.push(json!({"__path__": "employees/c2", "rut": "33.333.333-3", "id": "c2", "email": "carla@cftestatalaricayparinacota.cl"}));

    // Import-batch junk without duplicates
    println!("Adding import-batch singletons...");
    records.push(json!({"__path__": "employees/import-7", "rut": "44.444.444-4", "id": "import-7"}));
    records.push(json!({"__path__": "employees/import-8", "id": "import-8"}));

    // Unique records
    println!("Adding unique records...");
    for i in 0..5 {
        records.push(json!({
            "__path__": format!("employees/u{}", i),
            "rut": format!("5{}.000.000-{}", i, i),
            "id": format!("u{}", i),
            "email": format!("user{}@cftestatal.cl", i),
        }));
    }

    let mut writer = BufWriter::new(File::create(&output_file)?);
    serde_yaml::to_writer(&mut writer, &records)?;
    writer.flush()?;

    println!("\n✓ Generated test collection with {} records", records.len());
    println!("  - Duplicate groups: 3");
    println!("  - Import-batch singletons: 2");
    println!("  - Unique records: 5");
    println!("\nResolve it with:");
    println!("  cargo run --example resolve_file {}", output_file);
    println!("  cargo run -- identify --explain --input {}", output_file);

    Ok(())
}
