//! Report generation module.
//!
//! Two layers:
//! - plain-text renderers for individual artifacts (schema info, describe
//!   table, missing values, correlation ranking, sample rows as CSV), shared
//!   by the prompt composer and the CLI
//! - [`AnalysisReport`], the complete result of one run, with JSON output
//!   through [`ReportGenerator`]
//!
//! # Example
//!
//! ```rust,ignore
//! use csv_insight::reporting::ReportGenerator;
//!
//! let report = pipeline.run_path("data/train.csv")?;
//! println!("{}", report.to_text());
//! ReportGenerator::write_report_to_file(&report, "output".as_ref(), "train")?;
//! ```

mod report;
mod text;

pub use report::{AnalysisReport, ReportGenerator};
pub use text::{
    NO_CORRELATIONS, NO_MISSING_VALUES, render_correlations, render_describe, render_info,
    render_missing,
};
