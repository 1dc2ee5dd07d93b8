//! CLI entry point for the data processor.

use anyhow::{Context, Result};
use clap::Parser;
use data_processor::{
    FillMethod, Pipeline, PipelineStage, ProcessingMetadata, ProcessorConfig, ProcessorError,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Clean a CSV or spreadsheet and report on it",
    long_about = "Loads one CSV or spreadsheet, normalizes column names, trims text, \
                  drops sparse columns, fills missing values, removes duplicate rows, \
                  and writes the cleaned data plus JSON, HTML and PNG reports.\n\n\
                  EXIT CODES:\n  \
                  0  success\n  \
                  1  unexpected failure\n  \
                  2  invalid option\n  \
                  3  input missing, unsupported or unreadable\n  \
                  4  output could not be written\n\n\
                  EXAMPLES:\n  \
                  processor data.csv\n  \
                  processor data.xlsx -o reports --fill-method zero\n  \
                  processor data.csv --drop-threshold 0.3 --dedup-cols id,email\n  \
                  processor legacy.csv --encoding windows-1252"
)]
struct Args {
    /// Path to the CSV, TXT, XLSX, XLS, XLSM, XLSB or ODS file to process
    input: PathBuf,

    /// Output directory for the cleaned data and reports
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Drop columns whose missing fraction is above this value (0.0 - 1.0)
    #[arg(long, default_value_t = 0.6)]
    drop_threshold: f64,

    /// How to fill remaining missing values: ffill or zero
    #[arg(long, default_value = "ffill")]
    fill_method: String,

    /// Comma-separated columns that identify duplicate rows (default: all)
    #[arg(long, value_delimiter = ',')]
    dedup_cols: Vec<String>,

    /// Encoding of a CSV/TXT input (e.g. latin1, windows-1252, utf-16le)
    #[arg(long)]
    encoding: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence over the command-line level.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(args: &Args) -> Result<ProcessorConfig, ProcessorError> {
    let fill_method: FillMethod = args.fill_method.parse()?;

    let mut builder = ProcessorConfig::builder()
        .drop_threshold(args.drop_threshold)
        .fill_method(fill_method)
        .dedup_columns(&args.dedup_cols)
        .output_dir(&args.output);
    if let Some(label) = &args.encoding {
        builder = builder.encoding(label);
    }

    Ok(builder.build()?)
}

fn run(args: &Args) -> Result<ProcessingMetadata> {
    let config = build_config(args)?;
    debug!("Effective configuration: {:?}", config);

    let pipeline = Pipeline::builder()
        .config(config)
        .on_progress(|update| {
            // failures are printed once, by main
            if update.stage == PipelineStage::Failed {
                return;
            }
            info!(
                "[{:>3.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        })
        .build()
        .map_err(ProcessorError::from)?;

    let metadata = pipeline
        .run(&args.input)
        .with_context(|| format!("processing {}", args.input.display()))?;
    Ok(metadata)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    match run(&args) {
        Ok(metadata) => {
            println!(
                "Done: {} rows x {} columns written to {}",
                metadata.final_rows,
                metadata.final_columns,
                metadata.output_dir.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = err
                .downcast_ref::<ProcessorError>()
                .map(ProcessorError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}
