//! Insight bundle: the digest handed to prompt construction.

use crate::correlation::CorrelationReport;
use crate::error::Result;
use crate::planner::DistributionPlan;
use crate::profiler::DatasetProfile;
use crate::table::Table;
use crate::types::{ColumnProfile, CorrelationPair, MissingReport, SampleRows};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything the summary prompt is built from.
///
/// Every field is always populated. Absence is explicit: an empty
/// correlation list, an empty missing report, or `target: None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightBundle {
    /// Leading rows of the table.
    pub sample: SampleRows,
    pub profiles: Vec<ColumnProfile>,
    pub missing: MissingReport,
    pub top_correlations: Vec<CorrelationPair>,
    pub target: Option<String>,
}

impl InsightBundle {
    /// Assemble a bundle from already computed artifacts.
    ///
    /// # Errors
    ///
    /// Fails only if the sample rows cannot be written as CSV.
    pub fn assemble(
        table: &Table,
        profile: &DatasetProfile,
        correlations: &CorrelationReport,
        plan: &DistributionPlan,
        sample_rows: usize,
    ) -> Result<Self> {
        let sample = table.head(sample_rows)?;
        debug!(
            "Bundled {} sample rows, {} profiles, {} correlation pairs",
            sample.rows.len(),
            profile.columns.len(),
            correlations.top.len()
        );

        Ok(Self {
            sample,
            profiles: profile.columns.clone(),
            missing: profile.missing.clone(),
            top_correlations: correlations.top.clone(),
            target: plan.target.clone(),
        })
    }
}
