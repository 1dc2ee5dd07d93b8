//! Descriptive statistics over the cleaned table.

use crate::cleaner::count_duplicates;
use crate::error::Result;
use crate::table::{ColumnKind, Table};
use crate::types::{ColumnStats, DatasetSummary};
use crate::utils::{any_value_to_json, display_value, numeric_values};
use chrono::Local;
use polars::prelude::*;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::hash::Hash;

/// Rows included in the summary sample.
pub const SAMPLE_ROWS: usize = 5;

/// Most frequent item; ties go to the one seen first.
pub fn mode_of<T, I>(values: I) -> Option<T>
where
    T: Hash + Eq + Clone,
    I: IntoIterator<Item = T>,
{
    let mut order: Vec<T> = Vec::new();
    let mut counts: HashMap<T, usize> = HashMap::new();
    for value in values {
        let count = counts.entry(value.clone()).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut best: Option<(T, usize)> = None;
    for value in order {
        let count = counts[&value];
        if best.as_ref().is_none_or(|(_, top)| count > *top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Min, max, mean and mode computed on exact integers.
fn integer_stats<T>(values: &[T], stats: &mut ColumnStats)
where
    T: Copy + Ord + Hash,
    i128: From<T>,
    Value: From<T>,
{
    if values.is_empty() {
        return;
    }
    let sum: i128 = values.iter().map(|v| i128::from(*v)).sum();

    stats.min = values.iter().min().map(|v| Value::from(*v));
    stats.max = values.iter().max().map(|v| Value::from(*v));
    stats.mean = Some(sum as f64 / values.len() as f64);
    stats.mode = mode_of(values.iter().copied()).map(Value::from);
}

fn numeric_stats(series: &Series, stats: &mut ColumnStats) -> Result<()> {
    if series.dtype().is_unsigned_integer() {
        let ints = series.cast(&DataType::UInt64)?;
        let values: Vec<u64> = ints.u64()?.into_iter().flatten().collect();
        integer_stats(&values, stats);
        return Ok(());
    }
    if series.dtype().is_integer() {
        let ints = series.cast(&DataType::Int64)?;
        let values: Vec<i64> = ints.i64()?.into_iter().flatten().collect();
        integer_stats(&values, stats);
        return Ok(());
    }

    let values = numeric_values(series)?;
    if values.is_empty() {
        return Ok(());
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let mode = mode_of(values.iter().map(|v| v.to_bits())).map(f64::from_bits);

    stats.min = Some(json!(min));
    stats.max = Some(json!(max));
    stats.mean = Some(mean);
    stats.mode = mode.map(|v| json!(v));
    Ok(())
}

fn temporal_stats(series: &Series, stats: &mut ColumnStats) -> Result<()> {
    let physical = series.to_physical_repr().cast(&DataType::Int64)?;
    let ticks = physical.i64()?;

    let mut min: Option<(usize, i64)> = None;
    let mut max: Option<(usize, i64)> = None;
    for (idx, tick) in ticks.into_iter().enumerate() {
        let Some(tick) = tick else { continue };
        if min.is_none_or(|(_, m)| tick < m) {
            min = Some((idx, tick));
        }
        if max.is_none_or(|(_, m)| tick > m) {
            max = Some((idx, tick));
        }
    }

    if let Some((idx, _)) = min {
        stats.min = Some(Value::String(display_value(&series.get(idx)?)));
    }
    if let Some((idx, _)) = max {
        stats.max = Some(Value::String(display_value(&series.get(idx)?)));
    }
    stats.mode = text_mode(series)?;
    Ok(())
}

fn text_mode(series: &Series) -> Result<Option<Value>> {
    let strings = series.cast(&DataType::String)?;
    Ok(mode_of(strings.str()?.into_iter().flatten()).map(|s| Value::String(s.to_string())))
}

/// Statistics for one column.
pub fn column_stats(name: &str, kind: ColumnKind, series: &Series) -> Result<ColumnStats> {
    let mut stats = ColumnStats {
        name: name.to_string(),
        kind,
        dtype: series.dtype().to_string(),
        missing: series.null_count(),
        unique: series.drop_nulls().n_unique()?,
        min: None,
        max: None,
        mean: None,
        mode: None,
    };

    match kind {
        ColumnKind::Numeric => numeric_stats(series, &mut stats)?,
        ColumnKind::Temporal => temporal_stats(series, &mut stats)?,
        ColumnKind::Text => stats.mode = text_mode(series)?,
    }
    Ok(stats)
}

/// The first `limit` rows as JSON records keyed by column name.
pub fn sample_rows(table: &Table, limit: usize) -> Result<Vec<Map<String, Value>>> {
    let df = table.data_frame();
    let rows = limit.min(table.height());
    let mut records = Vec::with_capacity(rows);

    for row in 0..rows {
        let mut record = Map::new();
        for column in df.get_columns() {
            record.insert(column.name().to_string(), any_value_to_json(&column.get(row)?));
        }
        records.push(record);
    }
    Ok(records)
}

/// Build the dataset summary for the cleaned table.
pub fn build_summary(
    table: &Table,
    original_rows: usize,
    original_columns: usize,
    dedup_columns: &[String],
) -> Result<DatasetSummary> {
    let mut columns = Vec::with_capacity(table.width());
    for (name, kind) in table.kinds() {
        columns.push(column_stats(&name, kind, table.series(&name)?)?);
    }

    Ok(DatasetSummary {
        generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        original_rows,
        original_columns,
        final_rows: table.height(),
        final_columns: table.width(),
        remaining_duplicates: count_duplicates(table, dedup_columns)?,
        column_types: table.kinds().into_iter().collect(),
        missing: table.missing_counts(),
        columns,
        sample: sample_rows(table, SAMPLE_ROWS)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mode_prefers_first_seen_on_tie() {
        assert_eq!(mode_of(["b", "a", "a", "b"]), Some("b"));
        assert_eq!(mode_of(["x", "y", "y"]), Some("y"));
        assert_eq!(mode_of(Vec::<i32>::new()), None);
    }

    #[test]
    fn test_numeric_stats() {
        let series = Series::new("age".into(), &[Some(30i64), Some(40), None, Some(30)]);
        let stats = column_stats("age", ColumnKind::Numeric, &series).unwrap();

        assert_eq!(stats.missing, 1);
        assert_eq!(stats.unique, 2);
        assert_eq!(stats.min, Some(json!(30)));
        assert_eq!(stats.max, Some(json!(40)));
        assert_eq!(stats.mode, Some(json!(30)));
        let mean = stats.mean.unwrap();
        assert!((mean - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_large_integer_stats_are_exact() {
        let series = Series::new(
            "id".into(),
            &[9_007_199_254_740_993i64, 9_007_199_254_740_992, 9_007_199_254_740_993],
        );
        let stats = column_stats("id", ColumnKind::Numeric, &series).unwrap();
        assert_eq!(stats.min, Some(json!(9_007_199_254_740_992i64)));
        assert_eq!(stats.max, Some(json!(9_007_199_254_740_993i64)));
        assert_eq!(stats.mode, Some(json!(9_007_199_254_740_993i64)));
    }

    #[test]
    fn test_float_stats_keep_fractions() {
        let series = Series::new("score".into(), &[1.5f64, 2.5]);
        let stats = column_stats("score", ColumnKind::Numeric, &series).unwrap();
        assert_eq!(stats.min, Some(json!(1.5)));
        assert_eq!(stats.mean, Some(2.0));
    }

    #[test]
    fn test_text_stats_only_mode() {
        let series = Series::new("city".into(), &[Some("Oslo"), Some("Rome"), Some("Rome"), None]);
        let stats = column_stats("city", ColumnKind::Text, &series).unwrap();

        assert_eq!(stats.mode, Some(json!("Rome")));
        assert_eq!(stats.unique, 2);
        assert!(stats.min.is_none());
        assert!(stats.mean.is_none());
    }

    #[test]
    fn test_temporal_stats() {
        let series = Series::new("when".into(), &[Some(86_400_000i64), Some(0), None])
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap();
        let stats = column_stats("when", ColumnKind::Temporal, &series).unwrap();

        let min = stats.min.unwrap();
        let max = stats.max.unwrap();
        assert!(min.as_str().unwrap().starts_with("1970-01-01"));
        assert!(max.as_str().unwrap().starts_with("1970-01-02"));
        assert!(stats.mean.is_none());
    }

    #[test]
    fn test_all_missing_numeric_column() {
        let series = Series::new("n".into(), &[None::<f64>, None]);
        let stats = column_stats("n", ColumnKind::Numeric, &series).unwrap();
        assert_eq!(stats.missing, 2);
        assert_eq!(stats.unique, 0);
        assert!(stats.min.is_none());
        assert!(stats.mode.is_none());
    }

    #[test]
    fn test_build_summary_and_sample() {
        let table = Table::new(
            df![
                "id" => [1i64, 2, 3, 4, 5, 6],
                "name" => ["a", "b", "c", "d", "e", "f"],
            ]
            .unwrap(),
        );
        let summary = build_summary(&table, 8, 3, &table.column_names()).unwrap();

        assert_eq!(summary.original_rows, 8);
        assert_eq!(summary.original_columns, 3);
        assert_eq!(summary.final_rows, 6);
        assert_eq!(summary.final_columns, 2);
        assert_eq!(summary.remaining_duplicates, 0);
        assert_eq!(summary.column_types.get("id"), Some(&ColumnKind::Numeric));
        assert_eq!(summary.sample.len(), SAMPLE_ROWS);
        assert_eq!(summary.sample[0].get("name"), Some(&json!("a")));
        assert_eq!(summary.sample[4].get("id"), Some(&json!(5)));
    }
}
