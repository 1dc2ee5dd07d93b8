//! Configuration types for the data processor.
//!
//! This module provides configuration options using the builder pattern.
//! All validation happens in [`ProcessorConfigBuilder::build`], before the
//! pipeline touches the filesystem.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default fraction of missing values above which a column is dropped.
pub const DEFAULT_DROP_THRESHOLD: f64 = 0.6;

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Strategy for filling missing values in surviving columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FillMethod {
    /// Propagate the last valid value forward within the column.
    /// Leading gaps stay missing.
    #[default]
    Ffill,
    /// Numeric columns get 0, everything else the empty string.
    Zero,
}

impl FillMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ffill => "ffill",
            Self::Zero => "zero",
        }
    }
}

impl fmt::Display for FillMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FillMethod {
    type Err = ConfigValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ffill" => Ok(Self::Ffill),
            "zero" => Ok(Self::Zero),
            _ => Err(ConfigValidationError::UnknownFillMethod(s.to_string())),
        }
    }
}

/// Configuration for one processing run.
///
/// Use [`ProcessorConfig::builder()`] to create a validated configuration.
///
/// # Example
///
/// ```rust,ignore
/// use data_processor::config::{FillMethod, ProcessorConfig};
///
/// let config = ProcessorConfig::builder()
///     .drop_threshold(0.3)
///     .fill_method(FillMethod::Zero)
///     .dedup_columns(["id", "name"])
///     .output_dir("reports")
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Columns whose missing fraction is strictly above this value are dropped.
    /// Must lie in [0, 1]. Default: 0.6
    pub drop_threshold: f64,

    /// How remaining missing values are filled. Default: ffill
    pub fill_method: FillMethod,

    /// Columns compared when detecting duplicate rows.
    /// `None` compares every column. Default: None
    pub dedup_columns: Option<Vec<String>>,

    /// Directory receiving all artifacts. Default: "output"
    pub output_dir: PathBuf,

    /// Encoding label for delimited input (e.g. "latin1").
    /// `None` reads UTF-8. Default: None
    pub encoding: Option<String>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            drop_threshold: DEFAULT_DROP_THRESHOLD,
            fill_method: FillMethod::default(),
            dedup_columns: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            encoding: None,
        }
    }
}

impl ProcessorConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ProcessorConfigBuilder {
        ProcessorConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.drop_threshold.is_finite() || !(0.0..=1.0).contains(&self.drop_threshold) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "drop_threshold".to_string(),
                value: self.drop_threshold,
            });
        }

        if let Some(label) = &self.encoding
            && encoding_rs::Encoding::for_label(label.trim().as_bytes()).is_none()
        {
            return Err(ConfigValidationError::UnknownEncoding(label.clone()));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Unknown fill method '{0}' (expected 'ffill' or 'zero')")]
    UnknownFillMethod(String),

    #[error("Unknown encoding label '{0}'")]
    UnknownEncoding(String),
}

/// Builder for [`ProcessorConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ProcessorConfigBuilder {
    drop_threshold: Option<f64>,
    fill_method: Option<FillMethod>,
    dedup_columns: Option<Vec<String>>,
    output_dir: Option<PathBuf>,
    encoding: Option<String>,
}

impl ProcessorConfigBuilder {
    /// Set the missing fraction above which a column is dropped.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0 (e.g., 0.6 = 60%)
    pub fn drop_threshold(mut self, threshold: f64) -> Self {
        self.drop_threshold = Some(threshold);
        self
    }

    /// Set the fill strategy for remaining missing values.
    pub fn fill_method(mut self, method: FillMethod) -> Self {
        self.fill_method = Some(method);
        self
    }

    /// Restrict duplicate detection to these columns.
    ///
    /// Blank entries are ignored; an empty list means every column.
    pub fn dedup_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns: Vec<String> = columns
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        self.dedup_columns = if columns.is_empty() {
            None
        } else {
            Some(columns)
        };
        self
    }

    /// Set the output directory for the cleaned data and reports.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the input encoding label for delimited files.
    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ProcessorConfig` or an error if validation fails.
    pub fn build(self) -> Result<ProcessorConfig, ConfigValidationError> {
        let config = ProcessorConfig {
            drop_threshold: self.drop_threshold.unwrap_or(DEFAULT_DROP_THRESHOLD),
            fill_method: self.fill_method.unwrap_or_default(),
            dedup_columns: self.dedup_columns,
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            encoding: self.encoding,
        };

        config.validate()?;
        Ok(config)
    }
}
