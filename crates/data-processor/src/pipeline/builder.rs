//! The processing pipeline and its builder.

use crate::cleaner::DataCleaner;
use crate::config::{ConfigValidationError, ProcessorConfig};
use crate::error::Result;
use crate::loader::{LoadOptions, load_table};
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::reporting::{ReportGenerator, ReportParams};
use crate::types::ProcessingMetadata;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Runs Loader, Cleaner and Reporter over one input file.
///
/// Use [`Pipeline::builder()`] to create a pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use data_processor::{Pipeline, ProcessorConfig, FillMethod};
///
/// let metadata = Pipeline::builder()
///     .config(
///         ProcessorConfig::builder()
///             .fill_method(FillMethod::Zero)
///             .output_dir("reports")
///             .build()?,
///     )
///     .on_progress(|update| println!("{}", update.stage.display_name()))
///     .build()?
///     .run("data.csv")?;
///
/// println!("{} rows left", metadata.final_rows);
/// ```
pub struct Pipeline {
    config: ProcessorConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    reporter: ReportGenerator,
}

static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Process `input` and write every artifact into the configured output
    /// directory.
    ///
    /// Nothing is written when loading fails or a dedup column is unknown.
    pub fn run(&self, input: impl AsRef<Path>) -> Result<ProcessingMetadata> {
        match self.run_internal(input.as_ref()) {
            Ok(metadata) => {
                self.report_progress(ProgressUpdate::complete(format!(
                    "Processing complete: {} rows x {} columns",
                    metadata.final_rows, metadata.final_columns
                )));
                Ok(metadata)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                debug!(code = e.error_code(), "Run failed: {}", e);
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(&self, input: &Path) -> Result<ProcessingMetadata> {
        let start_time = Instant::now();

        // Step 1: Load
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Loading,
            0.0,
            format!("Loading {}", input.display()),
        ));
        let options = LoadOptions {
            encoding: self.config.encoding.clone(),
        };
        let mut table = load_table(input, &options)?;
        let original_rows = table.height();
        let original_columns = table.width();

        // Step 2: Clean
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Cleaning,
            0.0,
            format!("Cleaning {} rows x {} columns", original_rows, original_columns),
        ));
        let cleaning = DataCleaner::new(&self.config).clean(&mut table)?;

        // Step 3: Report
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Reporting,
            0.0,
            format!("Writing reports to {}", self.reporter.output_dir().display()),
        ));
        let metadata = self.reporter.generate(
            &table,
            ReportParams {
                input_path: input,
                config: &self.config,
                cleaning: &cleaning,
                original_rows,
                original_columns,
            },
        )?;

        info!(
            "Pipeline finished in {:.2}s",
            start_time.elapsed().as_secs_f64()
        );
        Ok(metadata)
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<ProcessorConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the processing configuration.
    pub fn config(mut self, config: ProcessorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving stage updates.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Receive progress updates through a closure.
    ///
    /// Convenience over [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Validates the configuration; nothing touches the filesystem yet.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let reporter = ReportGenerator::new(config.output_dir.clone());

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
            reporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FillMethod;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_pipeline_builder_default() {
        let pipeline = Pipeline::builder().build().unwrap();
        assert_eq!(pipeline.config(), &ProcessorConfig::default());
        assert!(pipeline.progress_reporter.is_none());
    }

    #[test]
    fn test_pipeline_builder_with_config() {
        let config = ProcessorConfig::builder()
            .fill_method(FillMethod::Zero)
            .build()
            .unwrap();
        let pipeline = Pipeline::builder().config(config).build().unwrap();
        assert_eq!(pipeline.config().fill_method, FillMethod::Zero);
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config = ProcessorConfig {
            drop_threshold: 2.0,
            ..ProcessorConfig::default()
        };
        assert!(Pipeline::builder().config(config).build().is_err());
    }

    #[test]
    fn test_pipeline_builder_with_progress_callback() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let pipeline = Pipeline::builder()
            .on_progress(move |_update| {
                call_count_clone.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        pipeline.report_progress(ProgressUpdate::new(PipelineStage::Cleaning, 0.5, "Test"));

        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_run_reports_failure_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let stages = Arc::new(Mutex::new(Vec::new()));
        let stages_clone = stages.clone();

        let pipeline = Pipeline::builder()
            .config(ProcessorConfig::builder().output_dir(&out).build().unwrap())
            .on_progress(move |update| stages_clone.lock().unwrap().push(update.stage))
            .build()
            .unwrap();

        let err = pipeline.run(dir.path().join("absent.csv")).unwrap_err();

        assert_eq!(err.exit_code(), 3);
        assert!(!out.exists());
        assert_eq!(
            *stages.lock().unwrap(),
            vec![PipelineStage::Loading, PipelineStage::Failed]
        );
    }
}
