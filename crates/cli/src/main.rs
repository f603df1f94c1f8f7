//! rutdedup CLI
//!
//! Identifies duplicate and bulk-imported identity records and prints the
//! paths to delete

mod config;
mod report;

use anyhow::{bail, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use rutdedup_core::resolve;
use rutdedup_formats::{open_dataset, read_dataset, Format, Record};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::{AppConfig, PassOverrides, Settings};

#[derive(Parser)]
#[command(name = "rutdedup")]
#[command(version, about = "Identify duplicate identity records for deletion", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors, skip the summary
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Output reports in JSON format
    #[arg(long, global = true)]
    json: bool,
}

/// Where the records come from
#[derive(Args, Debug, Clone)]
struct SourceArgs {
    /// Record collection (YAML, JSON or JSONL, optionally .gz); '-' reads stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Record format, overriding extension-based detection
    #[arg(short = 'F', long)]
    format: Option<Format>,

    /// Config file with input and ranking settings (YAML or TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Ranking settings that override the config file
#[derive(Args, Debug, Clone)]
struct RankingArgs {
    /// Institutional e-mail domain fragment marking trusted records
    #[arg(long, env = "RUTDEDUP_TRUST_DOMAIN")]
    trust_domain: Option<String>,

    /// Id prefix of the bulk import batch
    #[arg(long, env = "RUTDEDUP_IMPORT_PREFIX")]
    import_prefix: Option<String>,

    /// Natural-key field used to find duplicates
    #[arg(long)]
    key_field: Option<String>,

    /// Field holding the record path
    #[arg(long)]
    path_field: Option<String>,

    /// Fail on records without a path instead of skipping them
    #[arg(long)]
    strict: bool,
}

impl RankingArgs {
    fn overrides(&self) -> PassOverrides {
        PassOverrides {
            trust_domain: self.trust_domain.clone(),
            import_prefix: self.import_prefix.clone(),
            key_field: self.key_field.clone(),
            path_field: self.path_field.clone(),
            strict: self.strict,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the paths of records to delete, one per line
    Identify {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        ranking: RankingArgs,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Log which record is kept and which are deleted for every duplicate key
        #[arg(long)]
        explain: bool,
    },

    /// Report every natural key shared by more than one record
    Duplicates {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        ranking: RankingArgs,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Count records in a collection
    Count {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Write a starter config file
    InitConfig {
        /// Destination (.yaml, .yml or .toml)
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout is reserved for reports
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.json) // Disable colors if JSON output
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Identify {
            source,
            ranking,
            output,
            explain,
        } => {
            let settings = settings(&source, &ranking)?;
            identify(settings, output, explain, cli.json, cli.quiet)?;
        }
        Commands::Duplicates {
            source,
            ranking,
            output,
        } => {
            let settings = settings(&source, &ranking)?;
            find_duplicates(settings, output)?;
        }
        Commands::Count { source } => {
            let config = AppConfig::load_or_default(source.config.as_deref())?;
            let settings =
                config.into_settings(source.input, source.format, &PassOverrides::default())?;
            count_records(settings, cli.json)?;
        }
        Commands::InitConfig { path, force } => {
            init_config(&path, force)?;
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

fn settings(source: &SourceArgs, ranking: &RankingArgs) -> Result<Settings> {
    let config = AppConfig::load_or_default(source.config.as_deref())?;
    config.into_settings(source.input.clone(), source.format, &ranking.overrides())
}

fn load_records(input: &Path, format: Option<Format>) -> Result<Vec<Record>> {
    if input == Path::new("-") {
        let format = format.unwrap_or(Format::Yaml);
        info!("Reading records from stdin (format: {})", format);
        return read_dataset(std::io::stdin().lock(), format)
            .context("Failed to read records from stdin");
    }

    open_dataset(input, format)
        .with_context(|| format!("Failed to load records from {}", input.display()))
}

fn identify(
    settings: Settings,
    output: Option<PathBuf>,
    explain: bool,
    json_output: bool,
    quiet: bool,
) -> Result<()> {
    info!("Identifying records to delete");
    info!("  Input: {:?}", settings.input);
    if let Some(output) = &output {
        info!("  Output: {:?}", output);
    }

    let records = load_records(&settings.input, settings.format)?;
    let resolution = resolve(&records, &settings.pass)?;

    if explain {
        report::explain(
            &resolution,
            &settings.pass.key_field,
            &settings.pass.signals.email_field,
        );
    }

    // Nothing is written until the whole pass has succeeded
    let mut writer = report::open_output(output.as_deref())?;
    if json_output {
        let report = report::deletion_report(&settings.input, &resolution);
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        report::write_paths(&mut writer, &resolution.deletions)?;
    }
    writer.flush()?;

    if !json_output && !quiet {
        report::print_summary_report(&settings.input, output.as_deref(), &resolution.stats);
    }

    Ok(())
}

fn find_duplicates(settings: Settings, output: Option<PathBuf>) -> Result<()> {
    info!("Finding duplicate {} values in {:?}", settings.pass.key_field, settings.input);

    let records = load_records(&settings.input, settings.format)?;
    let resolution = resolve(&records, &settings.pass)?;

    let report = report::duplicates_report(&resolution, &settings.pass.key_field);
    let mut writer = report::open_output(output.as_deref())?;
    writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    writer.flush()?;

    info!(
        "Found {} duplicate groups among {} records",
        resolution.stats.duplicate_groups, resolution.stats.total_records
    );

    Ok(())
}

fn count_records(settings: Settings, json_output: bool) -> Result<()> {
    info!("Counting records in: {:?}", settings.input);

    let records = load_records(&settings.input, settings.format)?;

    if json_output {
        let report = serde_json::json!({
            "input": settings.input.to_string_lossy().to_string(),
            "total_records": records.len(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Total records: {}", records.len());
    }

    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }

    AppConfig::starter().save(path)?;
    info!("Wrote starter config to {:?}", path);

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_identify_flags() {
        let cli = Cli::try_parse_from([
            "rutdedup",
            "identify",
            "--input",
            "dump.yaml",
            "--trust-domain",
            "uni.cl",
            "--strict",
            "--explain",
        ])
        .unwrap();

        match cli.command {
            Commands::Identify {
                source,
                ranking,
                explain,
                ..
            } => {
                assert_eq!(source.input, Some(PathBuf::from("dump.yaml")));
                assert_eq!(ranking.trust_domain.as_deref(), Some("uni.cl"));
                assert!(ranking.strict);
                assert!(explain);
            }
            _ => panic!("expected identify"),
        }
    }

    #[test]
    fn test_parse_format_flag() {
        let cli =
            Cli::try_parse_from(["rutdedup", "count", "-i", "-", "--format", "jsonl"]).unwrap();

        match cli.command {
            Commands::Count { source } => assert_eq!(source.format, Some(Format::Jsonl)),
            _ => panic!("expected count"),
        }

        assert!(Cli::try_parse_from(["rutdedup", "count", "-i", "x", "--format", "csv"]).is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["rutdedup", "-v", "-q", "count", "-i", "x.yaml"]).is_err());
    }
}
