//! The model-call boundary.
//!
//! [`ModelClient::call`] never fails: provider errors are logged and folded
//! into [`ModelResponse::Failure`], which renders with a prefix no genuine
//! answer carries.

use super::ModelProvider;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Prefix of a rendered failure.
pub const FAILURE_PREFIX: &str = "LLM call failed: ";

/// Outcome of one model call: an answer or a failure reason, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelResponse {
    Answer { text: String },
    Failure { reason: String },
}

impl ModelResponse {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Answer text, if the call succeeded.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Answer { text } => Some(text),
            Self::Failure { .. } => None,
        }
    }

    /// Text for display: the answer itself, or the prefixed failure reason.
    pub fn render(&self) -> String {
        match self {
            Self::Answer { text } => text.clone(),
            Self::Failure { reason } => format!("{}{}", FAILURE_PREFIX, reason),
        }
    }
}

/// Wraps a [`ModelProvider`] and absorbs its failures.
#[derive(Clone)]
pub struct ModelClient {
    provider: Arc<dyn ModelProvider>,
}

impl ModelClient {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &dyn ModelProvider {
        self.provider.as_ref()
    }

    /// Send one prompt and wait for the outcome.
    pub fn call(&self, prompt: &str) -> ModelResponse {
        info!(
            "Calling {} ({})",
            self.provider.name(),
            self.provider.model().unwrap_or("default model")
        );

        match self.provider.generate(prompt) {
            Ok(text) => ModelResponse::Answer { text },
            Err(e) => {
                warn!("Model call via {} failed: {:#}", self.provider.name(), e);
                ModelResponse::Failure {
                    reason: format!("{:#}", e),
                }
            }
        }
    }
}

impl std::fmt::Debug for ModelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelClient")
            .field("provider", &self.provider.name())
            .field("model", &self.provider.model())
            .finish()
    }
}
