//! Configuration for the analysis pipeline and the model client.
//!
//! Field names serialize in camelCase (`endpoint`, `modelId`, `sampleRows`,
//! `topCorrelationCount`); any field missing from a JSON document falls back
//! to its default.

use serde::{Deserialize, Serialize};

/// Default address of the local text-completion service.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";

/// Default model identifier sent with every request.
pub const DEFAULT_MODEL_ID: &str = "deepseek-coder:6.7b";

/// Default number of leading rows included in prompts.
pub const DEFAULT_SAMPLE_ROWS: usize = 10;

/// Default length of the top-correlation list.
pub const DEFAULT_TOP_CORRELATION_COUNT: usize = 5;

/// Configuration for an analysis run.
///
/// # Example
///
/// ```rust,ignore
/// use csv_insight::config::InsightConfig;
///
/// let config = InsightConfig::builder()
///     .model_id("llama3.2")
///     .sample_rows(20)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsightConfig {
    /// Address of the text-completion endpoint.
    /// Default: `http://localhost:11434/api/generate`
    pub endpoint: String,

    /// Which model the service should run.
    /// Default: `deepseek-coder:6.7b`
    pub model_id: String,

    /// Rows included in the sample block of the summary prompt.
    /// Default: 10
    pub sample_rows: usize,

    /// How many correlation pairs are kept after ranking.
    /// Default: 5
    pub top_correlation_count: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            sample_rows: DEFAULT_SAMPLE_ROWS,
            top_correlation_count: DEFAULT_TOP_CORRELATION_COUNT,
        }
    }
}

impl InsightConfig {
    /// Create a new configuration builder.
    pub fn builder() -> InsightConfigBuilder {
        InsightConfigBuilder::default()
    }

    /// Parse a configuration from a JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigValidationError> {
        let config: InsightConfig = serde_json::from_str(json)
            .map_err(|e| ConfigValidationError::Unparseable(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigValidationError::InvalidEndpoint(self.endpoint.clone()));
        }

        if self.model_id.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelId);
        }

        if self.sample_rows == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "sampleRows".to_string(),
                value: self.sample_rows,
            });
        }

        if self.top_correlation_count == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "topCorrelationCount".to_string(),
                value: self.top_correlation_count,
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid endpoint '{0}' (must start with http:// or https://)")]
    InvalidEndpoint(String),

    #[error("Model identifier must not be empty")]
    EmptyModelId,

    #[error("Invalid value for '{field}': {value} (must be at least 1)")]
    InvalidCount { field: String, value: usize },

    #[error("Could not parse configuration: {0}")]
    Unparseable(String),
}

impl From<ConfigValidationError> for crate::error::InsightError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::InsightError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`InsightConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct InsightConfigBuilder {
    endpoint: Option<String>,
    model_id: Option<String>,
    sample_rows: Option<usize>,
    top_correlation_count: Option<usize>,
}

impl InsightConfigBuilder {
    /// Set the text-completion endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the model identifier.
    pub fn model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Set how many leading rows go into the summary prompt.
    pub fn sample_rows(mut self, rows: usize) -> Self {
        self.sample_rows = Some(rows);
        self
    }

    /// Set how many correlation pairs are kept.
    pub fn top_correlation_count(mut self, count: usize) -> Self {
        self.top_correlation_count = Some(count);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `InsightConfig` or an error if validation fails.
    pub fn build(self) -> Result<InsightConfig, ConfigValidationError> {
        let config = InsightConfig {
            endpoint: self
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model_id: self
                .model_id
                .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            sample_rows: self.sample_rows.unwrap_or(DEFAULT_SAMPLE_ROWS),
            top_correlation_count: self
                .top_correlation_count
                .unwrap_or(DEFAULT_TOP_CORRELATION_COUNT),
        };

        config.validate()?;
        Ok(config)
    }
}
