//! The analysis pipeline and its builder.
//!
//! Each stage takes the previous stage's output by reference and returns a
//! fresh artifact; nothing is shared between runs.

use crate::ai::{ModelClient, ModelProvider, ModelResponse};
use crate::config::{ConfigValidationError, InsightConfig};
use crate::correlation::CorrelationAnalyzer;
use crate::error::{InsightError, Result, ResultExt};
use crate::insight::InsightBundle;
use crate::loader::TabularLoader;
use crate::pipeline::progress::{
    AnalysisStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::planner::DistributionPlanner;
use crate::profiler::Profiler;
use crate::prompt::PromptComposer;
use crate::reporting::{AnalysisReport, ReportGenerator};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Reason given when a question is asked of a pipeline without a model.
pub const NO_MODEL_CONFIGURED: &str = "no model provider configured";

/// Runs Loader → Profiler → Correlation Analyzer → Distribution Planner →
/// Insight Bundle → Prompt Composer → Model Client on one upload.
///
/// # Example
///
/// ```rust,ignore
/// use csv_insight::{InsightConfig, Pipeline};
/// use csv_insight::ai::OllamaProvider;
/// use std::sync::Arc;
///
/// let report = Pipeline::builder()
///     .config(InsightConfig::default())
///     .model_provider(Arc::new(OllamaProvider::new()?))
///     .on_progress(|update| println!("{}", update.message))
///     .build()?
///     .run_path("titanic.csv")?;
///
/// println!("{}", report.to_text());
/// ```
pub struct Pipeline {
    config: InsightConfig,
    model: Option<ModelClient>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Ensure Pipeline is Send (can be moved to another thread)
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    /// Whether the summary and question prompts will reach a model.
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Analyze raw upload bytes.
    ///
    /// # Errors
    ///
    /// Only load failures abort a run: [`InsightError::EmptyInput`] and
    /// [`InsightError::MalformedCsv`]. A failed model call ends up in
    /// [`AnalysisReport::summary`] instead.
    pub fn run(&self, source: &str, bytes: &[u8]) -> Result<AnalysisReport> {
        match self.run_internal(source, bytes) {
            Ok(report) => {
                self.report_progress(ProgressUpdate::complete("Analysis complete"));
                Ok(report)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Analysis of {} failed: {}", source, e);
                Err(e)
            }
        }
    }

    /// Read a file and analyze it.
    pub fn run_path(&self, path: impl AsRef<Path>) -> Result<AnalysisReport> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(InsightError::from)
            .context(format!("Reading {}", path.display()));
        match bytes {
            Ok(bytes) => self.run(&path.display().to_string(), &bytes),
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Send a free-form question to the model, with no table context.
    pub fn ask(&self, question: &str) -> ModelResponse {
        match &self.model {
            Some(client) => client.call(&PromptComposer::question(question)),
            None => ModelResponse::Failure {
                reason: NO_MODEL_CONFIGURED.to_string(),
            },
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(&self, source: &str, bytes: &[u8]) -> Result<AnalysisReport> {
        let start_time = Instant::now();
        info!("Analyzing {} ({} bytes)", source, bytes.len());

        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Loading,
            0.0,
            format!("Loading {}...", source),
        ));
        let table = TabularLoader::load_bytes(bytes)?;
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Loading,
            1.0,
            format!("Loaded {} rows x {} columns", table.height(), table.width()),
        ));

        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Profiling,
            0.0,
            "Profiling columns...",
        ));
        let profile = Profiler::profile(&table)?;
        info!(
            "Profiled {} columns, {} missing values",
            profile.columns.len(),
            profile.missing.total()
        );

        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Correlating,
            0.0,
            "Computing correlations...",
        ));
        let correlations =
            CorrelationAnalyzer::analyze(&table, self.config.top_correlation_count);
        info!(
            "Correlation set has {} columns, {} ranked pairs",
            correlations.matrix.columns.len(),
            correlations.top.len()
        );

        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Planning,
            0.0,
            "Planning distributions...",
        ));
        let plan = DistributionPlanner::plan(&table);

        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Bundling,
            0.0,
            "Bundling insights...",
        ));
        let bundle = InsightBundle::assemble(
            &table,
            &profile,
            &correlations,
            &plan,
            self.config.sample_rows,
        )
        .context("Bundling insights")?;

        let summary = self.model.as_ref().map(|client| {
            self.report_progress(ProgressUpdate::new(
                AnalysisStage::Summarizing,
                0.0,
                "Waiting for the model...",
            ));
            let response = client.call(&PromptComposer::summary(&bundle));
            self.report_progress(ProgressUpdate::new(
                AnalysisStage::Summarizing,
                1.0,
                if response.is_failure() {
                    "Model call failed"
                } else {
                    "Summary received"
                },
            ));
            response
        });

        let report = ReportGenerator::build_report(
            source,
            &table,
            profile,
            correlations,
            plan,
            bundle,
            summary,
        );

        info!(
            "Analysis of {} finished in {} ms",
            source,
            start_time.elapsed().as_millis()
        );
        Ok(report)
    }
}

/// Builder for creating a [`Pipeline`] instance.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<InsightConfig>,
    model_provider: Option<Arc<dyn ModelProvider>>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: InsightConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the provider used for the summary and for questions.
    ///
    /// Without one, runs skip the summary and [`Pipeline::ask`] answers
    /// with a failure.
    pub fn model_provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.model_provider = Some(provider);
        self
    }

    /// Set a progress reporter for receiving updates during a run.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            model: self.model_provider.map(ModelClient::new),
            progress_reporter: self.progress_reporter,
        })
    }
}
