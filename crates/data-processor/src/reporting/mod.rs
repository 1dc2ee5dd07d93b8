//! Report generation module.
//!
//! Turns the cleaned table and the cleaning report into the run's artifacts:
//! - `cleaned.csv`: the cleaned dataset
//! - `summary.json`: per-column statistics and a row sample
//! - `hist_<column>.png`: one histogram per numeric column
//! - `report.html`: a readable page combining the above
//! - `meta.json`: what the run did and with which configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use data_processor::reporting::{ReportGenerator, ReportParams};
//!
//! let generator = ReportGenerator::new("output");
//! let metadata = generator.generate(&table, ReportParams {
//!     input_path: Path::new("data.csv"),
//!     config: &config,
//!     cleaning: &cleaning_report,
//!     original_rows,
//!     original_columns,
//! })?;
//! ```

mod generator;
mod histogram;
mod html;
mod summary;

pub use generator::{
    CLEANED_FILE, META_FILE, REPORT_FILE, ReportGenerator, ReportParams, SUMMARY_FILE,
};
pub use histogram::{BIN_COUNT, Bin, compute_bins, draw_histogram, histogram_file_name};
pub use html::{escape_html, render_report};
pub use summary::{SAMPLE_ROWS, build_summary, column_stats, mode_of, sample_rows};
