//! The in-memory table the pipeline operates on.
//!
//! A [`Table`] is a polars [`DataFrame`] paired with one [`ColumnKind`] tag
//! per column. The tag is decided once when the table is built and drives
//! every downstream decision (fill value, summary statistics, histograms).

use crate::error::{ProcessorError, Result};
use crate::utils::{is_numeric_dtype, is_temporal_dtype};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Logical type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Text,
    Temporal,
}

impl ColumnKind {
    /// Classify a polars dtype. Booleans and all-null columns count as text.
    pub fn from_dtype(dtype: &DataType) -> Self {
        if is_numeric_dtype(dtype) {
            Self::Numeric
        } else if is_temporal_dtype(dtype) {
            Self::Temporal
        } else {
            Self::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Text => "text",
            Self::Temporal => "temporal",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived per-column facts. Always computed from the current table contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
    pub kind: ColumnKind,
    pub dtype: String,
    pub missing: usize,
}

/// Ordered named columns with a shared row count.
#[derive(Debug, Clone)]
pub struct Table {
    df: DataFrame,
    kinds: Vec<ColumnKind>,
}

impl Table {
    /// Wrap a DataFrame, inferring each column's kind from its dtype.
    pub fn new(df: DataFrame) -> Self {
        let kinds = df
            .get_columns()
            .iter()
            .map(|col| ColumnKind::from_dtype(col.dtype()))
            .collect();
        Self { df, kinds }
    }

    /// Wrap a DataFrame with explicitly chosen kinds.
    pub fn with_kinds(df: DataFrame, kinds: Vec<ColumnKind>) -> Result<Self> {
        if kinds.len() != df.width() {
            return Err(ProcessorError::Internal(format!(
                "{} column kinds for {} columns",
                kinds.len(),
                df.width()
            )));
        }
        Ok(Self { df, kinds })
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn width(&self) -> usize {
        self.df.width()
    }

    pub fn data_frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_data_frame(self) -> DataFrame {
        self.df
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.df
            .get_column_names()
            .iter()
            .position(|col| col.as_str() == name)
    }

    /// Kind of the named column.
    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        self.position(name).map(|idx| self.kinds[idx])
    }

    /// `(name, kind)` pairs in column order.
    pub fn kinds(&self) -> Vec<(String, ColumnKind)> {
        self.column_names()
            .into_iter()
            .zip(self.kinds.iter().copied())
            .collect()
    }

    pub fn series(&self, name: &str) -> Result<&Series> {
        Ok(self.df.column(name)?.as_materialized_series())
    }

    /// Metadata for every column, in column order.
    pub fn column_meta(&self) -> Vec<ColumnMeta> {
        self.df
            .get_columns()
            .iter()
            .zip(&self.kinds)
            .map(|(col, kind)| ColumnMeta {
                name: col.name().to_string(),
                kind: *kind,
                dtype: col.dtype().to_string(),
                missing: col.null_count(),
            })
            .collect()
    }

    /// Missing-value count per column.
    pub fn missing_counts(&self) -> BTreeMap<String, usize> {
        self.df
            .get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect()
    }

    /// Total number of missing cells.
    pub fn total_missing(&self) -> usize {
        self.df.get_columns().iter().map(|col| col.null_count()).sum()
    }

    /// Replace every column name, in order.
    pub fn rename_columns(&mut self, names: &[String]) -> Result<()> {
        if names.len() != self.width() {
            return Err(ProcessorError::Internal(format!(
                "{} names for {} columns",
                names.len(),
                self.width()
            )));
        }
        let columns: Vec<Column> = self
            .df
            .get_columns()
            .iter()
            .zip(names)
            .map(|(col, name)| {
                Column::from(
                    col.as_materialized_series()
                        .clone()
                        .with_name(name.as_str().into()),
                )
            })
            .collect();
        self.df = DataFrame::new(columns)?;
        Ok(())
    }

    /// Remove the named columns. Unknown names are ignored.
    pub fn drop_columns(&mut self, names: &[String]) -> Result<()> {
        for name in names {
            if let Some(idx) = self.position(name) {
                self.df = self.df.drop(name)?;
                self.kinds.remove(idx);
            }
        }
        Ok(())
    }

    /// Swap in new contents for an existing column.
    pub fn replace_column(&mut self, name: &str, series: Series, kind: ColumnKind) -> Result<()> {
        let idx = self
            .position(name)
            .ok_or_else(|| ProcessorError::ColumnNotFound(name.to_string()))?;
        self.df.replace(name, series.with_name(name.into()))?;
        self.kinds[idx] = kind;
        Ok(())
    }

    /// Keep only the rows whose mask entry is `true`.
    pub fn retain_rows(&mut self, keep: &[bool]) -> Result<()> {
        let mask = Series::new("keep".into(), keep);
        self.df = self.df.filter(mask.bool()?)?;
        Ok(())
    }
}
