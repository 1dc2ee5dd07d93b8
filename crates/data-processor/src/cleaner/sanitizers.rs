//! Cell-level text cleanup.

use crate::error::Result;
use crate::table::{ColumnKind, Table};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use tracing::debug;

static INTEGER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+$").expect("Invalid regex"));
static FLOAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("Invalid regex")
});
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid regex"));
static DATETIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(\.\d{1,9})?$").expect("Invalid regex")
});

/// Trim surrounding whitespace in every string cell of every text column.
///
/// Cells that end up empty become missing. Returns the number of cells changed.
pub(crate) fn trim_text_columns(table: &mut Table) -> Result<usize> {
    let mut changed = 0;

    for (name, kind) in table.kinds() {
        if kind != ColumnKind::Text {
            continue;
        }
        let series = table.series(&name)?;
        if series.dtype() != &DataType::String {
            continue;
        }

        let (trimmed, count) = trim_series(series)?;
        if count > 0 {
            debug!("Trimmed {} cells in column '{}'", count, name);
            table.replace_column(&name, trimmed, ColumnKind::Text)?;
            changed += count;
        }
    }

    Ok(changed)
}

/// Give text columns the dtype a CSV reader would infer for their values.
///
/// A column read as text only because of padding or blank cells is numeric
/// or temporal once trimmed. Casts are strict; a column that does not cast
/// cleanly stays text. Returns the columns whose kind changed.
pub(crate) fn retype_text_columns(table: &mut Table) -> Result<Vec<String>> {
    let mut retyped = Vec::new();

    for (name, kind) in table.kinds() {
        if kind != ColumnKind::Text {
            continue;
        }
        let series = table.series(&name)?;
        if series.dtype() != &DataType::String {
            continue;
        }

        if let Some(typed) = infer_from_strings(series) {
            let new_kind = ColumnKind::from_dtype(typed.dtype());
            debug!("Column '{}' re-typed from text to {}", name, typed.dtype());
            table.replace_column(&name, typed, new_kind)?;
            retyped.push(name);
        }
    }

    Ok(retyped)
}

fn infer_from_strings(series: &Series) -> Option<Series> {
    let strings = series.str().ok()?;
    let values: Vec<&str> = strings.into_iter().flatten().collect();
    if values.is_empty() {
        return None;
    }
    let all = |re: &Regex| values.iter().all(|v| re.is_match(v));

    let candidates = if all(&*INTEGER_RE) {
        vec![DataType::Int64, DataType::Float64]
    } else if all(&*FLOAT_RE) {
        vec![DataType::Float64]
    } else if all(&*DATE_RE) {
        vec![DataType::Date]
    } else if all(&*DATETIME_RE) {
        vec![DataType::Datetime(TimeUnit::Microseconds, None)]
    } else {
        return None;
    };

    candidates
        .iter()
        .find_map(|dtype| series.strict_cast(dtype).ok())
}

fn trim_series(series: &Series) -> Result<(Series, usize)> {
    let strings = series.str()?;
    let mut count = 0;
    let values: Vec<Option<String>> = strings
        .into_iter()
        .map(|value| {
            let value = value?;
            let trimmed = value.trim();
            if trimmed.len() != value.len() || trimmed.is_empty() {
                count += 1;
            }
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect();

    Ok((Series::new(series.name().clone(), values), count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_text_columns() {
        let mut table = Table::new(
            df![
                "name" => [Some(" Alice "), Some("Bob"), Some("   "), None],
                "age" => [1, 2, 3, 4],
            ]
            .unwrap(),
        );

        let changed = trim_text_columns(&mut table).unwrap();
        assert_eq!(changed, 2);

        let names = table.series("name").unwrap().str().unwrap().clone();
        assert_eq!(names.get(0), Some("Alice"));
        assert_eq!(names.get(1), Some("Bob"));
        assert_eq!(names.get(2), None);
        assert_eq!(names.null_count(), 2);
    }

    #[test]
    fn test_padded_numbers_become_numeric() {
        let mut table = Table::new(
            df![
                "code" => [Some("7"), Some("7.0"), Some("  ")],
                "count" => [Some(" 3"), None, Some("4 ")],
                "label" => [Some("a"), Some("7"), None],
            ]
            .unwrap(),
        );
        trim_text_columns(&mut table).unwrap();
        let retyped = retype_text_columns(&mut table).unwrap();

        assert_eq!(retyped, vec!["code", "count"]);
        assert_eq!(table.kind("code"), Some(ColumnKind::Numeric));
        assert_eq!(table.series("code").unwrap().dtype(), &DataType::Float64);
        assert_eq!(table.series("count").unwrap().dtype(), &DataType::Int64);
        assert_eq!(table.kind("label"), Some(ColumnKind::Text));
    }

    #[test]
    fn test_iso_dates_become_temporal() {
        let mut table = Table::new(df!["day" => [Some("2024-01-05"), None]].unwrap());
        let retyped = retype_text_columns(&mut table).unwrap();

        assert_eq!(retyped, vec!["day"]);
        assert_eq!(table.kind("day"), Some(ColumnKind::Temporal));
        assert_eq!(table.series("day").unwrap().null_count(), 1);
    }

    #[test]
    fn test_all_missing_text_stays_text() {
        let mut table = Table::new(df!["empty" => [None::<&str>, None]].unwrap());
        assert!(retype_text_columns(&mut table).unwrap().is_empty());
        assert_eq!(table.kind("empty"), Some(ColumnKind::Text));
    }

    #[test]
    fn test_clean_table_is_untouched() {
        let mut table = Table::new(df!["name" => ["a", "b"]].unwrap());
        assert_eq!(trim_text_columns(&mut table).unwrap(), 0);
    }
}
