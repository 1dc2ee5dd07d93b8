//! Pipeline module.
//!
//! This module provides the pipeline that runs load, clean and report in
//! sequence, plus its progress reporting types.

mod builder;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder};
pub use progress::{ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate};
