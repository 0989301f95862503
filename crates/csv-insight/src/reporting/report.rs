use super::text::{render_correlations, render_describe, render_info, render_missing};
use crate::ai::ModelResponse;
use crate::correlation::CorrelationReport;
use crate::insight::InsightBundle;
use crate::planner::{BoxStats, DistributionPlan, DistributionView};
use crate::profiler::DatasetProfile;
use crate::table::Table;
use crate::types::{ColumnProfile, MissingReport, TableInfo};
use crate::utils::format_number;
use anyhow::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Every artifact of one analysis run.
///
/// Serves both the `--json` output and programmatic consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Where the data came from (path or label)
    pub source: String,
    pub info: TableInfo,
    pub profiles: Vec<ColumnProfile>,
    pub missing: MissingReport,
    /// Row-major missing mask for heatmaps
    pub missing_mask: Vec<Vec<bool>>,
    pub correlations: CorrelationReport,
    pub plan: DistributionPlan,
    pub bundle: InsightBundle,
    /// Model summary; absent when the model call was skipped
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub summary: Option<ModelResponse>,
}

impl AnalysisReport {
    /// Human-readable rendering, one titled section per artifact.
    pub fn to_text(&self) -> String {
        let mut sections = vec![
            ("Basic Info", render_info(&self.info)),
            ("Summary Statistics", render_describe(&self.profiles)),
            ("Missing Values", render_missing(&self.missing)),
            ("Distributions", render_plan(&self.plan)),
            (
                "Top Correlations",
                render_correlations(&self.correlations.top),
            ),
        ];
        if let Some(summary) = &self.summary {
            sections.push(("AI Insight", summary.render()));
        }

        sections
            .into_iter()
            .map(|(title, body)| format!("## {}\n\n{}\n", title, body.trim_end()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn render_plan(plan: &DistributionPlan) -> String {
    if plan.views.is_empty() {
        return "No numeric columns to plot".to_string();
    }

    let mut lines = Vec::new();
    match &plan.target {
        Some(target) => lines.push(format!("Target column: {}", target)),
        None => lines.push("No target column detected".to_string()),
    }
    for view in &plan.views {
        match view {
            DistributionView::Single { stats, .. } => {
                lines.push(format!("{}: {}", view.title(), box_line(stats.as_ref())));
            }
            DistributionView::Grouped { by, groups, .. } => {
                lines.push(format!("{}:", view.title()));
                for group in groups {
                    lines.push(format!(
                        "  {} = {}: {}",
                        by,
                        group.label,
                        box_line(group.stats.as_ref())
                    ));
                }
            }
        }
    }
    lines.join("\n")
}

fn box_line(stats: Option<&BoxStats>) -> String {
    match stats {
        Some(s) => format!(
            "n={}, median {}, IQR [{}, {}], {} outlier(s)",
            s.count,
            format_number(s.median),
            format_number(s.q1),
            format_number(s.q3),
            s.outliers.len()
        ),
        None => "no values".to_string(),
    }
}

/// Assembles and persists [`AnalysisReport`]s.
pub struct ReportGenerator;

impl ReportGenerator {
    /// Build a report from the artifacts of one run.
    pub fn build_report(
        source: &str,
        table: &Table,
        profile: DatasetProfile,
        correlations: CorrelationReport,
        plan: DistributionPlan,
        bundle: InsightBundle,
        summary: Option<ModelResponse>,
    ) -> AnalysisReport {
        AnalysisReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            source: source.to_string(),
            info: profile.info,
            profiles: profile.columns,
            missing: profile.missing,
            missing_mask: table.missing_mask(),
            correlations,
            plan,
            bundle,
            summary,
        }
    }

    /// Write a report as pretty JSON to `<dir>/<base_name>_report.json`.
    pub fn write_report_to_file(
        report: &AnalysisReport,
        dir: &Path,
        base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;

        let report_path = dir.join(format!("{}_report.json", base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation::CorrelationAnalyzer;
    use crate::loader::TabularLoader;
    use crate::planner::DistributionPlanner;
    use crate::profiler::Profiler;

    fn report_for(csv: &str, summary: Option<ModelResponse>) -> AnalysisReport {
        let table = TabularLoader::load_bytes(csv.as_bytes()).unwrap();
        let profile = Profiler::profile(&table).unwrap();
        let correlations = CorrelationAnalyzer::analyze(&table, 5);
        let plan = DistributionPlanner::plan(&table);
        let bundle = InsightBundle::assemble(&table, &profile, &correlations, &plan, 10).unwrap();
        ReportGenerator::build_report("memory", &table, profile, correlations, plan, bundle, summary)
    }

    #[test]
    fn test_text_sections() {
        let report = report_for(
            "age,fare,Survived\n22,7.25,0\n38,71.28,1\n,7.92,1\n",
            Some(ModelResponse::Failure {
                reason: "offline".to_string(),
            }),
        );
        let text = report.to_text();

        let order = [
            "## Basic Info",
            "## Summary Statistics",
            "## Missing Values",
            "## Distributions",
            "## Top Correlations",
            "## AI Insight",
        ];
        let positions: Vec<usize> = order.iter().map(|h| text.find(h).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.contains("age: 1"));
        assert!(text.contains("Target column: Survived"));
        assert!(text.contains("age by Survived:"));
        assert!(text.contains("LLM call failed: offline"));
    }

    #[test]
    fn test_summary_section_omitted_without_model() {
        let report = report_for("x\n1\n2\n", None);
        assert!(!report.to_text().contains("## AI Insight"));

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("summary").is_none());
        assert_eq!(json["source"], "memory");
        assert_eq!(json["missing_mask"], serde_json::json!([[false], [false]]));
    }

    #[test]
    fn test_write_report_to_file() {
        let report = report_for("a,b\n1,2\n2,1\n", None);
        let dir = std::env::temp_dir().join(format!("csv-insight-report-{}", std::process::id()));

        let path = ReportGenerator::write_report_to_file(&report, &dir, "sample").unwrap();
        assert!(path.ends_with("sample_report.json"));

        let written: AnalysisReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.info, report.info);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_report_with_infinite_cell_reads_back() {
        let report = report_for("a,b\n1,2\ninf,4\n3,7\n", None);
        assert!(report.correlations.top.is_empty());

        let json = serde_json::to_string(&report).unwrap();
        let parsed: AnalysisReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.plan, report.plan);
        assert!(parsed.correlations.matrix.get("a", "b").is_none());
        assert_eq!(parsed.info, report.info);
    }
}
