//! Progress reporting for the analysis pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use csv_insight::Pipeline;
//!
//! let report = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run_path("data.csv")?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of an analysis run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    /// Decoding and parsing the upload
    Loading,
    /// Type inference, statistics and missing counts
    Profiling,
    /// Correlation matrix and ranking
    Correlating,
    /// Target inference and distribution plans
    Planning,
    /// Assembling the insight bundle
    Bundling,
    /// Waiting on the model service
    Summarizing,
    /// Run finished
    Complete,
    /// Run aborted by a load error
    Failed,
}

impl AnalysisStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading File",
            Self::Profiling => "Profiling Columns",
            Self::Correlating => "Computing Correlations",
            Self::Planning => "Planning Distributions",
            Self::Bundling => "Bundling Insights",
            Self::Summarizing => "Generating Summary",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of the whole run this stage usually takes.
    ///
    /// The model call dominates whenever it runs.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Loading => 0.10,
            Self::Profiling => 0.10,
            Self::Correlating => 0.05,
            Self::Planning => 0.05,
            Self::Bundling => 0.05,
            Self::Summarizing => 0.65,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Returns the cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Loading => 0.0,
            Self::Profiling => 0.10,
            Self::Correlating => 0.20,
            Self::Planning => 0.25,
            Self::Bundling => 0.30,
            Self::Summarizing => 0.35,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// One progress event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: AnalysisStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    pub message: String,
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

impl ProgressUpdate {
    pub fn new(stage: AnalysisStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: AnalysisStage::Complete,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: AnalysisStage::Failed,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

/// Receives progress updates from the pipeline.
///
/// Implementations must be `Send + Sync` so a pipeline can run on a worker
/// thread while a UI thread listens.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// [`ProgressReporter`] backed by a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_progress_update_new() {
        let update = ProgressUpdate::new(AnalysisStage::Profiling, 0.5, "Profiling...");
        assert_eq!(update.stage, AnalysisStage::Profiling);
        assert_eq!(update.stage_progress, 0.5);
        assert!((update.progress - 0.15).abs() < 1e-6);
        assert_eq!(update.message, "Profiling...");
    }

    #[test]
    fn test_progress_update_clamps() {
        let update = ProgressUpdate::new(AnalysisStage::Summarizing, 3.0, "overshoot");
        assert_eq!(update.stage_progress, 1.0);
        assert!(update.progress <= 1.0);
    }

    #[test]
    fn test_stage_weights_cover_run() {
        let stages = [
            AnalysisStage::Loading,
            AnalysisStage::Profiling,
            AnalysisStage::Correlating,
            AnalysisStage::Planning,
            AnalysisStage::Bundling,
            AnalysisStage::Summarizing,
        ];
        let total: f32 = stages.iter().map(|s| s.weight()).sum();
        assert!((total - 1.0).abs() < 1e-6);

        for pair in stages.windows(2) {
            let end = pair[0].base_progress() + pair[0].weight();
            assert!((end - pair[1].base_progress()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_progress_update_terminal_states() {
        let done = ProgressUpdate::complete("Done");
        assert_eq!(done.stage, AnalysisStage::Complete);
        assert_eq!(done.progress, 1.0);

        let failed = ProgressUpdate::failed("File is empty");
        assert_eq!(failed.stage, AnalysisStage::Failed);
        assert_eq!(failed.progress, 0.0);
    }

    #[test]
    fn test_closure_progress_reporter() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let reporter = ClosureProgressReporter::new(move |_update| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        reporter.report(ProgressUpdate::new(AnalysisStage::Loading, 0.0, "Test"));
        reporter.report(ProgressUpdate::complete("Done"));

        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_stage_display_name() {
        assert_eq!(AnalysisStage::Correlating.display_name(), "Computing Correlations");
        assert_eq!(AnalysisStage::Summarizing.display_name(), "Generating Summary");
    }
}
