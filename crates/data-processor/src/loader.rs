//! Input loading.
//!
//! The format is chosen from the file extension: `.csv` / `.txt` go through
//! the polars CSV reader, workbooks through `calamine`. Both paths produce a
//! [`Table`] whose column kinds are fixed here.

use crate::error::{ProcessorError, Result};
use crate::table::{ColumnKind, Table};
use calamine::{Data, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info, warn};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma-delimited text with a header row.
    Delimited,
    /// Excel or OpenDocument workbook; the first sheet is read.
    Spreadsheet,
}

impl InputFormat {
    /// Detect the format from the path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" | "txt" => Ok(Self::Delimited),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Ok(Self::Spreadsheet),
            _ => Err(ProcessorError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: if extension.is_empty() {
                    "<none>".to_string()
                } else {
                    format!(".{extension}")
                },
            }),
        }
    }
}

/// Options controlling how the input is read.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Encoding label for delimited input; `None` means UTF-8.
    pub encoding: Option<String>,
}

/// Load `path` into a [`Table`].
///
/// # Errors
///
/// `FileNotFound` when the path does not exist, `UnsupportedFormat` for an
/// unknown extension and `Parse` when the content cannot be read.
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<Table> {
    if !path.exists() {
        return Err(ProcessorError::FileNotFound(path.to_path_buf()));
    }

    let format = InputFormat::from_path(path)?;
    info!("Loading {:?} input from: {}", format, path.display());

    let table = match format {
        InputFormat::Delimited => Table::new(read_delimited(path, options)?),
        InputFormat::Spreadsheet => {
            if options.encoding.is_some() {
                warn!("--encoding only applies to delimited input; ignoring it for a workbook");
            }
            read_spreadsheet(path)?
        }
    };

    info!(
        "Dataset loaded successfully: {} rows x {} columns",
        table.height(),
        table.width()
    );
    Ok(table)
}

fn csv_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
}

fn read_delimited(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    let result = match &options.encoding {
        Some(label) => {
            let utf8 = transcode_to_utf8(path, label)?;
            csv_options()
                .into_reader_with_file_handle(Cursor::new(utf8))
                .finish()
        }
        None => csv_options()
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .and_then(|reader| reader.finish()),
    };

    result.map_err(|e| ProcessorError::parse(path, e))
}

/// Decode the file with the labelled encoding and return UTF-8 bytes.
fn transcode_to_utf8(path: &Path, label: &str) -> Result<Vec<u8>> {
    let encoding = encoding_rs::Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ProcessorError::Config(format!("Unknown encoding label '{label}'")))?;

    let bytes = std::fs::read(path).map_err(|e| ProcessorError::parse(path, e))?;
    let (decoded, used, had_errors) = encoding.decode(&bytes);
    if had_errors {
        return Err(ProcessorError::parse(
            path,
            format!("invalid byte sequence for encoding {}", used.name()),
        ));
    }

    debug!("Decoded input as {}", used.name());
    Ok(decoded.into_owned().into_bytes())
}

// ============================================================================
// Spreadsheets
// ============================================================================

/// A workbook cell reduced to what column building cares about.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Missing,
    Int(i64),
    Float(f64),
    Temporal(NaiveDateTime),
    Text(String),
}

impl Cell {
    fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Cell::Missing,
            Data::Int(v) => Cell::Int(*v),
            Data::Float(v) => Cell::Float(*v),
            Data::Bool(v) => Cell::Text(v.to_string()),
            Data::String(s) if s.trim().is_empty() => Cell::Missing,
            Data::String(s) => Cell::Text(s.clone()),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(value) => Cell::Temporal(value),
                None => Cell::Text(data.to_string()),
            },
            Data::DateTimeIso(s) => parse_iso_datetime(s)
                .map(Cell::Temporal)
                .unwrap_or_else(|| Cell::Text(s.clone())),
            other => Cell::Text(other.to_string()),
        }
    }

    fn render(&self) -> Option<String> {
        match self {
            Cell::Missing => None,
            Cell::Int(v) => Some(v.to_string()),
            Cell::Float(v) => Some(v.to_string()),
            Cell::Temporal(v) => Some(v.format("%Y-%m-%d %H:%M:%S").to_string()),
            Cell::Text(s) => Some(s.clone()),
        }
    }
}

fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn read_spreadsheet(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path).map_err(|e| ProcessorError::parse(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ProcessorError::parse(path, "workbook contains no worksheets"))?
        .map_err(|e| ProcessorError::parse(path, e))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| ProcessorError::parse(path, "worksheet is empty"))?;
    let names = header_names(header);

    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (idx, column) in cells.iter_mut().enumerate() {
            column.push(row.get(idx).map(Cell::from_data).unwrap_or(Cell::Missing));
        }
    }

    let mut columns = Vec::with_capacity(names.len());
    let mut kinds = Vec::with_capacity(names.len());
    for (name, column_cells) in names.iter().zip(cells) {
        let (series, kind) = build_column(name, &column_cells)?;
        debug!("Sheet column '{}' read as {}", name, kind);
        columns.push(Column::from(series));
        kinds.push(kind);
    }

    Table::with_kinds(DataFrame::new(columns)?, kinds)
}

/// Header texts with blanks named `unnamed_<n>` and repeats suffixed `.<k>`.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen = HashSet::new();
    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = match Cell::from_data(cell).render() {
                Some(text) if !text.trim().is_empty() => text,
                _ => format!("unnamed_{idx}"),
            };
            let mut name = base.clone();
            let mut k = 1;
            while !seen.insert(name.clone()) {
                name = format!("{base}.{k}");
                k += 1;
            }
            name
        })
        .collect()
}

/// Pick the narrowest kind that holds every present cell.
fn build_column(name: &str, cells: &[Cell]) -> Result<(Series, ColumnKind)> {
    let present: Vec<&Cell> = cells.iter().filter(|c| **c != Cell::Missing).collect();
    let all = |pred: fn(&Cell) -> bool| !present.is_empty() && present.iter().all(|c| pred(*c));

    let is_whole = |c: &Cell| match c {
        Cell::Int(_) => true,
        Cell::Float(v) => v.fract() == 0.0 && v.abs() < i64::MAX as f64,
        _ => false,
    };

    if all(|c| matches!(c, Cell::Int(_) | Cell::Float(_))) {
        if present.iter().all(|c| is_whole(*c)) {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|c| match c {
                    Cell::Int(v) => Some(*v),
                    Cell::Float(v) => Some(*v as i64),
                    _ => None,
                })
                .collect();
            return Ok((Series::new(name.into(), values), ColumnKind::Numeric));
        }
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                Cell::Int(v) => Some(*v as f64),
                Cell::Float(v) => Some(*v),
                _ => None,
            })
            .collect();
        return Ok((Series::new(name.into(), values), ColumnKind::Numeric));
    }

    if all(|c| matches!(c, Cell::Temporal(_))) {
        let millis: Vec<Option<i64>> = cells
            .iter()
            .map(|c| match c {
                Cell::Temporal(v) => Some(v.and_utc().timestamp_millis()),
                _ => None,
            })
            .collect();
        let series = Series::new(name.into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        return Ok((series, ColumnKind::Temporal));
    }

    let values: Vec<Option<String>> = cells.iter().map(Cell::render).collect();
    Ok((Series::new(name.into(), values), ColumnKind::Text))
}
