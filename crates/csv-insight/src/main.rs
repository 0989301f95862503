//! CLI entry point for CSV insight.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use csv_insight::{
    AnalysisReport, InsightConfig, ModelResponse, Pipeline, PipelineBuilder, ReportGenerator,
};
use dotenv::dotenv;
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[cfg(feature = "ai")]
use csv_insight::ai::{OllamaConfig, OllamaProvider};
#[cfg(feature = "ai")]
use std::sync::Arc;

const ENV_ENDPOINT: &str = "CSV_INSIGHT_ENDPOINT";
const ENV_MODEL: &str = "CSV_INSIGHT_MODEL";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Exploratory analysis of a CSV file with an optional LLM summary",
    long_about = "Profiles a CSV file, ranks column correlations, plans distribution \
                  plots and asks a local language model to summarize the dataset.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  CSV_INSIGHT_ENDPOINT  Model endpoint (default http://localhost:11434/api/generate)\n  \
                  CSV_INSIGHT_MODEL     Model identifier (default deepseek-coder:6.7b)\n\n\
                  EXAMPLES:\n  \
                  # Full analysis with model summary\n  \
                  csv-insight -i titanic.csv\n\n  \
                  # Statistics only\n  \
                  csv-insight -i titanic.csv --no-ai\n\n  \
                  # Ask follow-up questions\n  \
                  csv-insight -i titanic.csv --ask \"Which features predict survival?\""
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long)]
    input: String,

    /// Skip the model summary (and any questions)
    #[arg(long, default_value = "false")]
    no_ai: bool,

    /// Question to send to the model after the analysis (repeatable)
    #[arg(long = "ask", value_name = "QUESTION")]
    questions: Vec<String>,

    /// Output JSON to stdout instead of human-readable sections
    ///
    /// Disables all logs; only the JSON document is written.
    #[arg(long)]
    json: bool,

    /// Model endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Model identifier
    #[arg(long)]
    model: Option<String>,

    /// Rows included in the summary prompt
    #[arg(long)]
    sample_rows: Option<usize>,

    /// Number of correlation pairs to keep
    #[arg(long)]
    top_correlations: Option<usize>,

    /// JSON configuration file (camelCase keys)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the JSON report to the output directory as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Output directory for --emit-report
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and results)
    #[arg(short, long)]
    quiet: bool,
}

/// One question and the model's reply.
#[derive(Debug, Serialize)]
struct Answer {
    question: String,
    response: ModelResponse,
}

/// Document printed by `--json`.
#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    report: &'a AnalysisReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    answers: Vec<Answer>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled so stdout
/// only carries the JSON document.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    dotenv().ok();

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = resolve_config(&args)?;
    let pipeline = build_pipeline(&args, config)?;

    let report = match pipeline.run_path(&args.input) {
        Ok(report) => report,
        Err(e) => {
            error!("Analysis failed: {}", e);
            return Err(anyhow!("[{}] {}", e.error_code(), e));
        }
    };

    let answers: Vec<Answer> = if pipeline.has_model() {
        args.questions
            .iter()
            .map(|question| Answer {
                question: question.clone(),
                response: pipeline.ask(question),
            })
            .collect()
    } else {
        if !args.questions.is_empty() {
            warn!("No model available; skipping {} question(s)", args.questions.len());
        }
        Vec::new()
    };

    if args.emit_report {
        let report_path = ReportGenerator::write_report_to_file(
            &report,
            Path::new(&args.output),
            &extract_file_stem(&args.input),
        )?;
        info!("Report written to: {}", report_path.display());
    }

    if args.json {
        let output = JsonOutput {
            report: &report,
            answers,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", report.to_text());
    for answer in &answers {
        println!("## Q: {}\n\n{}\n", answer.question, answer.response.render());
    }

    Ok(())
}

/// Defaults, then the config file, then environment, then flags.
fn resolve_config(args: &Args) -> Result<InsightConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Reading config file {}", path.display()))?;
            InsightConfig::from_json(&text)?
        }
        None => InsightConfig::default(),
    };

    if let Ok(endpoint) = env::var(ENV_ENDPOINT) {
        config.endpoint = endpoint;
    }
    if let Ok(model) = env::var(ENV_MODEL) {
        config.model_id = model;
    }

    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(model) = &args.model {
        config.model_id = model.clone();
    }
    if let Some(rows) = args.sample_rows {
        config.sample_rows = rows;
    }
    if let Some(count) = args.top_correlations {
        config.top_correlation_count = count;
    }

    config.validate()?;
    Ok(config)
}

fn with_progress(builder: PipelineBuilder, args: &Args) -> PipelineBuilder {
    if args.quiet || args.json {
        return builder;
    }
    builder.on_progress(|update| {
        info!(
            "[{:.0}%] {}: {}",
            update.progress * 100.0,
            update.stage.display_name(),
            update.message
        );
    })
}

#[cfg(feature = "ai")]
fn build_pipeline(args: &Args, config: InsightConfig) -> Result<Pipeline> {
    let mut builder = Pipeline::builder();

    if args.no_ai {
        info!("Model calls disabled");
    } else {
        info!("Using model {} at {}", config.model_id, config.endpoint);
        let provider = OllamaProvider::with_config(OllamaConfig::from(&config))?;
        builder = builder.model_provider(Arc::new(provider));
    }

    Ok(with_progress(builder.config(config), args).build()?)
}

/// Build the pipeline without a model (the "ai" feature is disabled).
#[cfg(not(feature = "ai"))]
fn build_pipeline(args: &Args, config: InsightConfig) -> Result<Pipeline> {
    if !args.no_ai {
        warn!("Model support not compiled in. Running statistics only.");
        warn!("Compile with --features ai to enable model calls.");
    }

    Ok(with_progress(Pipeline::builder().config(config), args).build()?)
}

fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("report")
        .to_string()
}
