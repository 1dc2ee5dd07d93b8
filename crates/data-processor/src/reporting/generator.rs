use super::histogram::{BIN_COUNT, compute_bins, draw_histogram, histogram_file_name};
use super::html::render_report;
use super::summary::build_summary;
use crate::config::ProcessorConfig;
use crate::error::{ProcessorError, Result};
use crate::table::{ColumnKind, Table};
use crate::types::{CleaningReport, ProcessingMetadata};
use crate::utils::numeric_values;
use chrono::Local;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CLEANED_FILE: &str = "cleaned.csv";
pub const SUMMARY_FILE: &str = "summary.json";
pub const META_FILE: &str = "meta.json";
pub const REPORT_FILE: &str = "report.html";

/// Inputs the reporter needs besides the cleaned table.
pub struct ReportParams<'a> {
    pub input_path: &'a Path,
    pub config: &'a ProcessorConfig,
    pub cleaning: &'a CleaningReport,
    pub original_rows: usize,
    pub original_columns: usize,
}

/// Writes every artifact of a run into one output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write `cleaned.csv`, the histograms, `summary.json`, `report.html`
    /// and `meta.json`, in that order.
    ///
    /// Files written before a failure are left in place.
    pub fn generate(&self, table: &Table, params: ReportParams<'_>) -> Result<ProcessingMetadata> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| ProcessorError::io_write(&self.output_dir, e))?;

        self.write_cleaned_csv(table)?;
        let plots = self.write_histograms(table)?;

        let summary = build_summary(
            table,
            params.original_rows,
            params.original_columns,
            &params.cleaning.dedup_columns,
        )?;
        self.write_json(SUMMARY_FILE, &summary)?;

        let title = format!("Data report: {}", params.input_path.display());
        let html = render_report(&title, &summary, params.cleaning, &plots);
        self.write_text(REPORT_FILE, &html)?;

        let cleaning = params.cleaning;
        let metadata = ProcessingMetadata {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_path: params.input_path.to_path_buf(),
            output_dir: self.output_dir.clone(),
            original_rows: params.original_rows,
            original_columns: params.original_columns,
            final_rows: table.height(),
            final_columns: table.width(),
            renamed_columns: cleaning.renamed_columns.clone(),
            dropped_columns: cleaning.dropped_columns.clone(),
            drop_threshold: params.config.drop_threshold,
            fill_method: cleaning.fill_method,
            dedup_columns: cleaning.dedup_columns.clone(),
            duplicates_removed: cleaning.duplicates_removed,
            missing_before: cleaning.missing_before.clone(),
            actions: cleaning.actions.clone(),
            plots,
            config: params.config.clone(),
            summary,
        };
        self.write_json(META_FILE, &metadata)?;

        info!("Reports saved to: {}", self.output_dir.display());
        Ok(metadata)
    }

    fn write_cleaned_csv(&self, table: &Table) -> Result<()> {
        let path = self.output_dir.join(CLEANED_FILE);
        let mut file = File::create(&path).map_err(|e| ProcessorError::io_write(&path, e))?;
        let mut df = table.data_frame().clone();

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut df)
            .map_err(|e| ProcessorError::io_write(&path, e))?;

        info!("Dataset saved: {}", path.display());
        Ok(())
    }

    /// One PNG per numeric column with at least one value. Returns the file names.
    fn write_histograms(&self, table: &Table) -> Result<Vec<String>> {
        let mut plots = Vec::new();
        for (name, kind) in table.kinds() {
            if kind != ColumnKind::Numeric {
                continue;
            }
            let values = numeric_values(table.series(&name)?)?;
            let bins = compute_bins(&values, BIN_COUNT);
            if bins.is_empty() {
                debug!("Skipping histogram for '{}': no values", name);
                continue;
            }

            let file_name = histogram_file_name(&name);
            draw_histogram(&self.output_dir.join(&file_name), &bins)?;
            debug!("Histogram saved: {}", file_name);
            plots.push(file_name);
        }
        Ok(plots)
    }

    fn write_json<T: serde::Serialize>(&self, file_name: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.write_text(file_name, &json)
    }

    fn write_text(&self, file_name: &str, contents: &str) -> Result<()> {
        let path = self.output_dir.join(file_name);
        fs::write(&path, contents).map_err(|e| ProcessorError::io_write(&path, e))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FillMethod;
    use std::collections::BTreeMap;

    fn cleaning() -> CleaningReport {
        CleaningReport {
            renamed_columns: Vec::new(),
            missing_before: BTreeMap::new(),
            dropped_columns: vec!["notes".to_string()],
            fill_method: FillMethod::Ffill,
            dedup_columns: vec!["id".to_string(), "name".to_string()],
            duplicates_removed: 0,
            actions: Vec::new(),
        }
    }

    fn table() -> Table {
        Table::new(
            df![
                "id" => [1i64, 2, 3],
                "name" => ["a", "b", "c"],
                "empty" => [None::<f64>, None, None],
            ]
            .unwrap(),
        )
    }

    #[test]
    fn test_generate_writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("out");
        let generator = ReportGenerator::new(&out);
        let config = ProcessorConfig::default();
        let cleaning = cleaning();

        let meta = generator
            .generate(
                &table(),
                ReportParams {
                    input_path: Path::new("data.csv"),
                    config: &config,
                    cleaning: &cleaning,
                    original_rows: 4,
                    original_columns: 4,
                },
            )
            .unwrap();

        for file in [CLEANED_FILE, SUMMARY_FILE, META_FILE, REPORT_FILE, "hist_id.png"] {
            assert!(out.join(file).exists(), "missing {file}");
        }
        assert!(!out.join("hist_empty.png").exists());
        assert_eq!(meta.plots, vec!["hist_id.png".to_string()]);
        assert_eq!(meta.dropped_columns, vec!["notes".to_string()]);
        assert_eq!(meta.final_rows, 3);

        let csv = fs::read_to_string(out.join(CLEANED_FILE)).unwrap();
        assert!(csv.starts_with("id,name,empty"));
    }

    #[test]
    fn test_unwritable_directory_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let config = ProcessorConfig::default();
        let cleaning = cleaning();
        let err = ReportGenerator::new(blocker.join("out"))
            .generate(
                &table(),
                ReportParams {
                    input_path: Path::new("data.csv"),
                    config: &config,
                    cleaning: &cleaning,
                    original_rows: 3,
                    original_columns: 3,
                },
            )
            .unwrap_err();

        assert!(matches!(err, ProcessorError::IoWrite { .. }));
        assert_eq!(err.exit_code(), 4);
    }
}
