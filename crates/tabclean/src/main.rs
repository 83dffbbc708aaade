//! CLI entry point for tabclean.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use tabclean::storage::{DEFAULT_STORE_DIR, STORE_DIR_ENV};
use tabclean::{
    CleaningOptions, CleaningPipeline, CleaningReport, CleaningSummary, DatasetId, DatasetProfile,
    DatasetStore, ImputeStrategy, ProfileReport, QualityReport, ReaderRegistry, TabularDataset,
};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Profile, score and clean tabular datasets",
    long_about = "Profile, score and clean CSV, TSV, Parquet, JSON and JSON Lines datasets.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  TABCLEAN_STORE_DIR    Directory for stored datasets (default: .tabclean/datasets)\n  \
                  RUST_LOG              Overrides --log-level\n\n\
                  EXAMPLES:\n  \
                  tabclean profile data.csv\n  \
                  tabclean score data.parquet --json\n  \
                  tabclean clean data.csv --strategy mode --zscore 2.5 --output cleaned.csv\n  \
                  tabclean clean data.csv --no-outliers --options options.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the result)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output JSON to stdout instead of a human-readable summary
    ///
    /// Disables all logging so stdout holds only the JSON document.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print per-column statistics
    Profile {
        /// Input file, or the id of a stored dataset
        input: String,

        /// Directory of stored datasets
        #[arg(long)]
        store_dir: Option<PathBuf>,
    },

    /// Print quality metrics and the composite score
    Score {
        /// Input file, or the id of a stored dataset
        input: String,

        /// Directory of stored datasets
        #[arg(long)]
        store_dir: Option<PathBuf>,
    },

    /// Run the cleaning pipeline and store the result
    Clean {
        /// Input file, or the id of a stored dataset
        input: String,

        /// Keep duplicate rows
        #[arg(long)]
        no_dedup: bool,

        /// Leave missing cells as they are
        #[arg(long)]
        no_impute: bool,

        /// Imputation strategy (mean, median, mode, zero)
        #[arg(long)]
        strategy: Option<ImputeStrategy>,

        /// Keep z-score outliers
        #[arg(long)]
        no_outliers: bool,

        /// Z-score threshold for outlier removal
        #[arg(long)]
        zscore: Option<f64>,

        /// JSON file with cleaning options; flags override its values
        #[arg(long)]
        options: Option<PathBuf>,

        /// Directory of stored datasets
        #[arg(long)]
        store_dir: Option<PathBuf>,

        /// Also write the cleaned dataset to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // .env first so RUST_LOG and TABCLEAN_STORE_DIR can come from it
    dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.quiet, cli.json);

    let registry = ReaderRegistry::with_defaults();

    match &cli.command {
        Command::Profile { input, store_dir } => {
            let store = open_store(store_dir.as_deref())?;
            let (dataset_id, dataset) = resolve_input(input, &registry, &store)?;
            let profile = tabclean::profile(&dataset);
            if cli.json {
                let report = ProfileReport {
                    dataset_id,
                    profile,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_profile(input, &profile);
            }
        }
        Command::Score { input, store_dir } => {
            let store = open_store(store_dir.as_deref())?;
            let (dataset_id, dataset) = resolve_input(input, &registry, &store)?;
            let metrics = tabclean::score(&dataset);
            let report = QualityReport::new(dataset_id, &metrics);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_quality(&report);
            }
        }
        Command::Clean {
            input,
            no_dedup,
            no_impute,
            strategy,
            no_outliers,
            zscore,
            options,
            store_dir,
            output,
        } => {
            let mut cleaning_options = match options {
                Some(path) => CleaningOptions::from_json_file(path)?,
                None => CleaningOptions::default(),
            };
            if *no_dedup {
                cleaning_options.drop_duplicates = false;
            }
            if *no_impute {
                cleaning_options.impute_missing = false;
            }
            if let Some(strategy) = strategy {
                cleaning_options.impute_strategy = *strategy;
            }
            if *no_outliers {
                cleaning_options.remove_outliers = false;
            }
            if let Some(threshold) = zscore {
                cleaning_options.outlier_zscore_threshold = *threshold;
            }

            let store = open_store(store_dir.as_deref())?;
            let (source_label, dataset) = resolve_input(input, &registry, &store)?;
            let source_dataset_id = match source_label.parse::<DatasetId>() {
                Ok(id) if store.exists(&id) => id,
                _ => store.save(&dataset)?,
            };

            let pipeline = CleaningPipeline::builder()
                .options(cleaning_options)
                .on_progress(|update| {
                    debug!(
                        "[{:.0}%] {}: {}",
                        update.progress * 100.0,
                        update.stage.display_name(),
                        update.message
                    );
                })
                .build()?;
            let (cleaned, summary) = pipeline.clean(&dataset)?;
            let cleaned_dataset_id = store.save(&cleaned)?;

            if let Some(path) = output {
                DatasetStore::export_csv(&cleaned, path)?;
            }

            let report = CleaningReport {
                source_dataset_id: source_dataset_id.to_string(),
                cleaned_dataset_id: cleaned_dataset_id.to_string(),
                summary,
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_cleaning_summary(&report, output.as_deref());
            }
        }
    }

    Ok(())
}

/// Store directory from the flag, then the environment, then the default.
fn open_store(flag: Option<&Path>) -> Result<DatasetStore> {
    let root = match flag {
        Some(dir) => dir.to_path_buf(),
        None => std::env::var(STORE_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE_DIR)),
    };
    Ok(DatasetStore::open(root)?)
}

/// Load `input` as a stored dataset id if one matches, otherwise as a file.
///
/// Returns a label for the input (the id or the path) and the dataset.
fn resolve_input(
    input: &str,
    registry: &ReaderRegistry,
    store: &DatasetStore,
) -> Result<(String, TabularDataset)> {
    if let Ok(id) = input.parse::<DatasetId>() {
        if store.exists(&id) {
            info!("Loading stored dataset {}", id);
            return Ok((id.to_string(), store.load(&id)?));
        }
    }

    let path = Path::new(input);
    if !path.exists() {
        return Err(anyhow!("Input file not found: {}", input));
    }
    let dataset = registry
        .read(path)
        .with_context(|| format!("failed to load {}", input))?;
    Ok((input.to_string(), dataset))
}

/// Note: the print_* functions use `println!` intentionally; this is the
/// command's output, not logging.
fn print_profile(input: &str, profile: &DatasetProfile) {
    println!();
    println!("{}", "=".repeat(80));
    println!("PROFILE: {} ({} rows x {} columns)", input, profile.n_rows, profile.n_cols);
    println!("{}", "=".repeat(80));
    println!(
        "{:<24} {:<12} {:>9} {:>9} {:>9}  {}",
        "Column", "Type", "Missing", "Missing%", "Unique", "Samples"
    );
    println!("{}", "-".repeat(80));
    for column in &profile.columns {
        println!(
            "{:<24} {:<12} {:>9} {:>8.1}% {:>9}  {}",
            truncate_str(&column.name, 24),
            column.dtype,
            column.n_missing,
            column.pct_missing,
            column.n_unique,
            truncate_str(&column.sample_values.join(", "), 40)
        );
        if let Some(stats) = &column.numeric_summary {
            println!(
                "{:<24} min {:.4}  max {:.4}  mean {:.4}  std {:.4}",
                "", stats.min, stats.max, stats.mean, stats.std
            );
        }
    }
    println!("{}", "=".repeat(80));
}

fn print_quality(report: &QualityReport) {
    let metrics = &report.metrics;
    println!();
    println!("Quality of {}", report.dataset_id);
    println!("  Missing cells:     {:.1}%", metrics.missing_ratio * 100.0);
    println!("  Duplicate rows:    {:.1}%", metrics.duplicate_ratio * 100.0);
    println!("  Constant columns:  {:.1}%", metrics.constant_cols_ratio * 100.0);
    println!("  Quality score:     {:.1} / 100", report.quality_score);
}

fn print_cleaning_summary(report: &CleaningReport, output: Option<&Path>) {
    let summary: &CleaningSummary = &report.summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();
    println!("Source dataset:  {}", report.source_dataset_id);
    println!("Cleaned dataset: {}", report.cleaned_dataset_id);
    if let Some(path) = output {
        println!("Exported to:     {}", path.display());
    }
    println!();
    println!(
        "  Rows: {} -> {} ({} duplicates, {} outliers removed)",
        summary.n_rows_before,
        summary.n_rows_after,
        summary.duplicate_rows_removed,
        summary.outlier_rows_removed
    );
    println!(
        "  Missing cells: {} -> {}",
        summary.n_missing_before, summary.n_missing_after
    );

    if !summary.preview_rows.is_empty() {
        println!();
        println!("Preview:");
        for row in summary.preview_rows.iter().take(5) {
            let cells: Vec<String> = row
                .0
                .iter()
                .map(|(column, value)| format!("{}={}", column, truncate_str(value, 16)))
                .collect();
            println!("  {}", cells.join("  "));
        }
        if summary.preview_rows.len() > 5 {
            println!("  ... ({} preview rows total)", summary.preview_rows.len());
        }
    }
    println!("{}", "=".repeat(80));
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
