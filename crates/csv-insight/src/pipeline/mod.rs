//! Pipeline module.
//!
//! This module provides the analysis pipeline and progress reporting.

mod builder;
pub mod progress;

pub use builder::{NO_MODEL_CONFIGURED, Pipeline, PipelineBuilder};
pub use progress::{AnalysisStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate};
