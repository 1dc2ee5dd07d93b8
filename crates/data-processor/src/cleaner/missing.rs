//! Missing-value handling: threshold-based column dropping and filling.

use crate::config::FillMethod;
use crate::error::Result;
use crate::table::{ColumnKind, Table};
use crate::utils::fill_string_nulls;
use polars::prelude::*;
use tracing::debug;

/// Fraction of missing entries per column, in column order.
///
/// A table with no rows reports 0 for every column.
pub fn missing_fractions(table: &Table) -> Vec<(String, f64)> {
    let height = table.height();
    table
        .column_meta()
        .into_iter()
        .map(|meta| {
            let fraction = if height == 0 {
                0.0
            } else {
                meta.missing as f64 / height as f64
            };
            (meta.name, fraction)
        })
        .collect()
}

/// Drop every column whose missing fraction is strictly above `threshold`.
///
/// Returns the dropped names in column order.
pub fn drop_by_threshold(table: &mut Table, threshold: f64) -> Result<Vec<String>> {
    let to_drop: Vec<String> = missing_fractions(table)
        .into_iter()
        .filter(|(_, fraction)| *fraction > threshold)
        .map(|(name, fraction)| {
            debug!(
                "Column '{}' is {:.1}% missing, above the {:.1}% threshold",
                name,
                fraction * 100.0,
                threshold * 100.0
            );
            name
        })
        .collect();

    table.drop_columns(&to_drop)?;
    Ok(to_drop)
}

/// Fill the remaining missing cells. Returns the number of cells filled.
///
/// `Ffill` leaves leading gaps in place. `Zero` fills numeric columns with 0
/// and everything else with the empty string; a temporal column with gaps
/// is rendered to text first and becomes a text column.
pub fn fill_missing(table: &mut Table, method: FillMethod) -> Result<usize> {
    let mut filled_total = 0;

    for (name, kind) in table.kinds() {
        let series = table.series(&name)?;
        let before = series.null_count();
        if before == 0 {
            continue;
        }

        let (filled, new_kind) = match (method, kind) {
            (FillMethod::Ffill, _) => (series.fill_null(FillNullStrategy::Forward(None))?, kind),
            (FillMethod::Zero, ColumnKind::Numeric) => {
                (series.fill_null(FillNullStrategy::Zero)?, kind)
            }
            (FillMethod::Zero, ColumnKind::Text | ColumnKind::Temporal) => {
                (fill_string_nulls(series, "")?, ColumnKind::Text)
            }
        };

        let filled_count = before - filled.null_count();
        if filled_count > 0 || new_kind != kind {
            debug!(
                "Filled {} missing values in '{}' using {}",
                filled_count, name, method
            );
            table.replace_column(&name, filled, new_kind)?;
        }
        filled_total += filled_count;
    }

    Ok(filled_total)
}
