//! Duplicate-row detection and removal.

use crate::error::{ProcessorError, Result};
use crate::table::{ColumnKind, Table};
use polars::prelude::*;
use std::collections::HashSet;

use super::names::normalize_column_name;

/// A cell reduced to something hashable. Missing equals missing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyCell {
    Missing,
    Int(i64),
    UInt(u64),
    /// Bits of a canonical f64.
    Number(u64),
    Text(String),
}

fn number_key(value: f64) -> KeyCell {
    // -0.0 and 0.0 compare equal, as do all NaNs
    let canonical = if value == 0.0 {
        0.0
    } else if value.is_nan() {
        f64::NAN
    } else {
        value
    };
    KeyCell::Number(canonical.to_bits())
}

/// Resolve the requested dedup columns against the table.
///
/// Each name is normalized first. `None` or an empty list selects every
/// column. A name with no matching column is a configuration error.
pub fn resolve_dedup_columns(table: &Table, requested: Option<&[String]>) -> Result<Vec<String>> {
    let requested = match requested {
        Some(names) if !names.is_empty() => names,
        _ => return Ok(table.column_names()),
    };

    let mut resolved = Vec::with_capacity(requested.len());
    for raw in requested {
        let name = normalize_column_name(raw);
        if !table.has_column(&name) {
            return Err(ProcessorError::Config(format!(
                "Dedup column '{}' does not match any column (available: {})",
                raw,
                table.column_names().join(", ")
            )));
        }
        if !resolved.contains(&name) {
            resolved.push(name);
        }
    }
    Ok(resolved)
}

fn column_keys(series: &Series, kind: ColumnKind) -> Result<Vec<KeyCell>> {
    if kind == ColumnKind::Numeric {
        // integers keep their exact value; f64 cannot tell 2^53 from 2^53 + 1
        if series.dtype().is_unsigned_integer() {
            let ints = series.cast(&DataType::UInt64)?;
            return Ok(ints
                .u64()?
                .into_iter()
                .map(|v| v.map(KeyCell::UInt).unwrap_or(KeyCell::Missing))
                .collect());
        }
        if series.dtype().is_integer() {
            let ints = series.cast(&DataType::Int64)?;
            return Ok(ints
                .i64()?
                .into_iter()
                .map(|v| v.map(KeyCell::Int).unwrap_or(KeyCell::Missing))
                .collect());
        }
        let floats = series.cast(&DataType::Float64)?;
        return Ok(floats
            .f64()?
            .into_iter()
            .map(|v| v.map(number_key).unwrap_or(KeyCell::Missing))
            .collect());
    }

    let strings = series.cast(&DataType::String)?;
    Ok(strings
        .str()?
        .into_iter()
        .map(|v| match v {
            Some(s) => KeyCell::Text(s.to_string()),
            None => KeyCell::Missing,
        })
        .collect())
}

/// Mask marking the first occurrence of every distinct key over `columns`.
pub fn first_occurrence_mask(table: &Table, columns: &[String]) -> Result<Vec<bool>> {
    let mut per_column = Vec::with_capacity(columns.len());
    for name in columns {
        let kind = table
            .kind(name)
            .ok_or_else(|| ProcessorError::ColumnNotFound(name.clone()))?;
        per_column.push(column_keys(table.series(name)?, kind)?);
    }

    let mut seen: HashSet<Vec<KeyCell>> = HashSet::with_capacity(table.height());
    Ok((0..table.height())
        .map(|row| {
            let key: Vec<KeyCell> = per_column.iter().map(|col| col[row].clone()).collect();
            seen.insert(key)
        })
        .collect())
}

/// Count rows that repeat an earlier row over `columns`.
pub fn count_duplicates(table: &Table, columns: &[String]) -> Result<usize> {
    Ok(first_occurrence_mask(table, columns)?
        .iter()
        .filter(|keep| !**keep)
        .count())
}

/// Remove rows that repeat an earlier row over `columns`, keeping the first
/// occurrence and the original order. Returns the number of rows removed.
pub fn remove_duplicates(table: &mut Table, columns: &[String]) -> Result<usize> {
    let mask = first_occurrence_mask(table, columns)?;
    let removed = mask.iter().filter(|keep| !**keep).count();
    if removed > 0 {
        table.retain_rows(&mask)?;
    }
    Ok(removed)
}
