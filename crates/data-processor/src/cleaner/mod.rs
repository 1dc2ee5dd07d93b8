//! Data cleaning module.
//!
//! This module provides functionality for:
//! - Normalizing column names
//! - Trimming whitespace in text cells
//! - Dropping columns with high missing rates and filling the rest
//! - Removing duplicate rows

mod dedup;
mod missing;
mod names;
mod sanitizers;

pub use dedup::{count_duplicates, remove_duplicates, resolve_dedup_columns};
pub use missing::{drop_by_threshold, fill_missing, missing_fractions};
pub use names::{normalize_column_name, normalize_column_names};

use crate::config::ProcessorConfig;
use crate::error::{Result, ResultExt};
use crate::table::Table;
use crate::types::{CleaningReport, ColumnRename};
use tracing::{debug, info};

/// Applies the cleaning steps to a table, in order:
///
/// 1. Column-name normalization
/// 2. Text trimming, then re-typing text columns that now hold numbers or dates
/// 3. Dropping columns over the missing threshold, then filling
/// 4. Duplicate removal
pub struct DataCleaner<'a> {
    config: &'a ProcessorConfig,
}

impl<'a> DataCleaner<'a> {
    pub fn new(config: &'a ProcessorConfig) -> Self {
        Self { config }
    }

    /// Clean `table` in place and report what changed.
    ///
    /// # Errors
    ///
    /// `Config` when a dedup column does not survive the drop step.
    pub fn clean(&self, table: &mut Table) -> Result<CleaningReport> {
        let mut actions = Vec::new();
        info!("Performing data cleaning...");

        // 1. Column names
        let original = table.column_names();
        let normalized = normalize_column_names(&original);
        let renamed_columns: Vec<ColumnRename> = original
            .iter()
            .zip(&normalized)
            .filter(|(from, to)| from != to)
            .map(|(from, to)| ColumnRename {
                original: from.clone(),
                normalized: to.clone(),
            })
            .collect();
        table.rename_columns(&normalized)?;
        if renamed_columns.is_empty() {
            actions.push("Column names already normalized".to_string());
        } else {
            actions.push(format!("Normalized {} column names", renamed_columns.len()));
            debug!("Renamed columns: {:?}", renamed_columns);
        }

        // 2. Whitespace
        let trimmed = sanitizers::trim_text_columns(table).context("While trimming text")?;
        if trimmed > 0 {
            actions.push(format!("Trimmed whitespace in {} text cells", trimmed));
        }
        let retyped = sanitizers::retype_text_columns(table).context("While re-typing text")?;
        if !retyped.is_empty() {
            actions.push(format!(
                "Re-typed {} text columns after trimming: {:?}",
                retyped.len(),
                retyped
            ));
        }

        // 3. Missing values
        let missing_before = table.missing_counts();
        let threshold = self.config.drop_threshold;
        let dropped_columns = drop_by_threshold(table, threshold)?;
        if dropped_columns.is_empty() {
            actions.push(format!(
                "No columns with more than {:.0}% missing values",
                threshold * 100.0
            ));
        } else {
            actions.push(format!(
                "Removed {} columns with more than {:.0}% missing values: {:?}",
                dropped_columns.len(),
                threshold * 100.0,
                dropped_columns
            ));
        }

        let method = self.config.fill_method;
        let filled = fill_missing(table, method).context("While filling missing values")?;
        actions.push(format!("Filled {} missing values using {}", filled, method));

        // 4. Duplicates
        let dedup_columns = resolve_dedup_columns(table, self.config.dedup_columns.as_deref())?;
        let before_rows = table.height();
        let duplicates_removed = remove_duplicates(table, &dedup_columns)?;
        if duplicates_removed > 0 {
            let pct = (duplicates_removed as f64 / before_rows as f64) * 100.0;
            actions.push(format!(
                "Removed {} duplicate rows ({:.1}%)",
                duplicates_removed, pct
            ));
        } else {
            actions.push("No duplicate rows found".to_string());
        }

        info!(
            "Cleaning finished: {} rows x {} columns",
            table.height(),
            table.width()
        );

        Ok(CleaningReport {
            renamed_columns,
            missing_before,
            dropped_columns,
            fill_method: method,
            dedup_columns,
            duplicates_removed,
            actions,
        })
    }
}
