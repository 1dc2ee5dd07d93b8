//! Data Processor Library
//!
//! Clean and profile a single tabular dataset built with Rust and Polars.
//!
//! # Overview
//!
//! One run goes through three stages, strictly in order:
//!
//! - **Loading**: CSV/TXT through polars, XLSX/XLS/XLSM/XLSB/ODS through calamine,
//!   with optional transcoding of legacy encodings
//! - **Cleaning**: column-name normalization, whitespace trimming, dropping
//!   columns over a missing-value threshold, forward or zero filling, and
//!   duplicate-row removal
//! - **Reporting**: `cleaned.csv`, `summary.json`, `meta.json`, `report.html`
//!   and one `hist_<column>.png` per numeric column
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use data_processor::{FillMethod, Pipeline, ProcessorConfig};
//!
//! let config = ProcessorConfig::builder()
//!     .drop_threshold(0.5)
//!     .fill_method(FillMethod::Zero)
//!     .dedup_columns(["id"])
//!     .output_dir("output")
//!     .build()?;
//!
//! let metadata = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| println!("{}", update.message))
//!     .build()?
//!     .run("data.csv")?;
//!
//! println!("{} duplicate rows removed", metadata.duplicates_removed);
//! ```
//!
//! The stages are also usable on their own:
//!
//! ```rust,ignore
//! use data_processor::{DataCleaner, LoadOptions, ProcessorConfig, load_table};
//!
//! let mut table = load_table("data.xlsx".as_ref(), &LoadOptions::default())?;
//! let report = DataCleaner::new(&ProcessorConfig::default()).clean(&mut table)?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod reporting;
pub mod table;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{DataCleaner, normalize_column_name, normalize_column_names};
pub use config::{ConfigValidationError, FillMethod, ProcessorConfig, ProcessorConfigBuilder};
pub use error::{ProcessorError, Result as ProcessorResult, ResultExt};
pub use loader::{InputFormat, LoadOptions, load_table};
pub use pipeline::{
    ClosureProgressReporter, Pipeline, PipelineBuilder, PipelineStage, ProgressReporter,
    ProgressUpdate,
};
pub use reporting::{ReportGenerator, ReportParams};
pub use table::{ColumnKind, ColumnMeta, Table};
pub use types::{CleaningReport, ColumnRename, ColumnStats, DatasetSummary, ProcessingMetadata};
