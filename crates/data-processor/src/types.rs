use crate::config::{FillMethod, ProcessorConfig};
use crate::table::ColumnKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One column name change made by normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRename {
    pub original: String,
    pub normalized: String,
}

/// What the cleaner did to the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Only names that actually changed.
    pub renamed_columns: Vec<ColumnRename>,
    /// Missing counts per column, measured after trimming and before any drop or fill.
    pub missing_before: BTreeMap<String, usize>,
    pub dropped_columns: Vec<String>,
    pub fill_method: FillMethod,
    /// Normalized columns compared for duplicates.
    pub dedup_columns: Vec<String>,
    pub duplicates_removed: usize,
    /// Human-readable log of each step.
    pub actions: Vec<String>,
}

// ============================================================================
// Summary Types
// ============================================================================

/// Descriptive statistics for one column of the cleaned table.
///
/// Numeric columns carry all of `min`, `max`, `mean` and `mode`; temporal
/// columns carry `min`, `max` and `mode`; text columns only `mode`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnStats {
    pub name: String,
    pub kind: ColumnKind,
    pub dtype: String,
    pub missing: usize,
    pub unique: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<serde_json::Value>,
}

/// Contents of `summary.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub generated_at: String,
    pub original_rows: usize,
    pub original_columns: usize,
    pub final_rows: usize,
    pub final_columns: usize,
    /// Duplicate rows still present under the dedup columns. Zero after a normal run.
    pub remaining_duplicates: usize,
    pub column_types: BTreeMap<String, ColumnKind>,
    pub missing: BTreeMap<String, usize>,
    pub columns: Vec<ColumnStats>,
    /// First rows of the cleaned table as JSON records.
    pub sample: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Contents of `meta.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    pub generated_at: String,
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub original_rows: usize,
    pub original_columns: usize,
    pub final_rows: usize,
    pub final_columns: usize,
    pub renamed_columns: Vec<ColumnRename>,
    pub dropped_columns: Vec<String>,
    pub drop_threshold: f64,
    pub fill_method: FillMethod,
    pub dedup_columns: Vec<String>,
    pub duplicates_removed: usize,
    pub missing_before: BTreeMap<String, usize>,
    pub actions: Vec<String>,
    /// File names of the histogram images, relative to `output_dir`.
    pub plots: Vec<String>,
    pub config: ProcessorConfig,
    pub summary: DatasetSummary,
}
