//! Exploratory analysis for CSV uploads.
//!
//! A CSV file goes in; out comes everything an analyst looks at first,
//! plus a natural-language summary from a local language model.
//!
//! # Overview
//!
//! - **Loading**: BOM-tolerant decoding and header-row CSV parsing
//! - **Profiling**: per-column type inference, `describe`-style statistics,
//!   missing-value counts and a schema summary
//! - **Correlations**: pairwise-complete Pearson matrix and the strongest
//!   unordered column pairs
//! - **Distribution plans**: target-column inference and box-plot statistics,
//!   grouped by the target when there is one
//! - **Model summary**: a prompt built from all of the above, sent to an
//!   Ollama-style `/api/generate` endpoint; failures never abort a run
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use csv_insight::{InsightConfig, Pipeline};
//! use csv_insight::ai::OllamaProvider;
//! use std::sync::Arc;
//!
//! let config = InsightConfig::builder()
//!     .model_id("llama3.2")
//!     .sample_rows(20)
//!     .build()?;
//!
//! let pipeline = Pipeline::builder()
//!     .config(config)
//!     .model_provider(Arc::new(OllamaProvider::new()?))
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?;
//!
//! let report = pipeline.run_path("titanic.csv")?;
//! println!("{}", report.to_text());
//!
//! // Free-form follow-up, no table context
//! println!("{}", pipeline.ask("What does a negative correlation mean?").render());
//! ```
//!
//! # Error Handling
//!
//! Only the loader can fail a run ([`InsightError::EmptyInput`],
//! [`InsightError::MalformedCsv`]). Values that do not parse become missing,
//! unusable columns drop out of the correlation set, and a failed model call
//! becomes a [`ModelResponse::Failure`] inside the report.

pub mod ai;
pub mod config;
pub mod correlation;
pub mod error;
pub mod insight;
pub mod loader;
pub mod pipeline;
pub mod planner;
pub mod profiler;
pub mod prompt;
pub mod reporting;
pub mod table;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use ai::{ModelClient, ModelProvider, ModelResponse};
pub use config::{ConfigValidationError, InsightConfig, InsightConfigBuilder};
pub use correlation::{CorrelationAnalyzer, CorrelationMatrix, CorrelationReport};
pub use error::{InsightError, Result as InsightResult, ResultExt};
pub use insight::InsightBundle;
pub use loader::TabularLoader;
pub use pipeline::{
    AnalysisStage, ClosureProgressReporter, Pipeline, PipelineBuilder, ProgressReporter,
    ProgressUpdate,
};
pub use planner::{BoxStats, DistributionPlan, DistributionPlanner, DistributionView};
pub use profiler::{DatasetProfile, Profiler};
pub use prompt::PromptComposer;
pub use reporting::{AnalysisReport, ReportGenerator};
pub use table::Table;
pub use types::{
    ColumnKind, ColumnProfile, ColumnStatistics, CorrelationPair, MissingReport, SampleRows,
    TableInfo,
};
pub use utils::{CellValue, classify_value, format_number};
