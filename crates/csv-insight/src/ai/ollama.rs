//! Provider for Ollama-style `/api/generate` endpoints.
//!
//! Sends `{model, prompt, stream: false}` and reads the `response` field of
//! the reply. No authentication, no retry, and no client-side timeout: the
//! call blocks until the service answers or the transport gives up.

use super::ModelProvider;
use crate::config::{DEFAULT_ENDPOINT, DEFAULT_MODEL_ID, InsightConfig};
use crate::error::InsightError;
use anyhow::Result;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Text returned when the service answers without a `response` field.
pub const NO_RESPONSE: &str = "(No response from model)";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Configuration for the Ollama provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaConfig {
    /// Full URL of the generate endpoint.
    pub endpoint: String,
    /// Model the service should run.
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL_ID.to_string(),
        }
    }
}

impl OllamaConfig {
    /// Create a new configuration builder.
    pub fn builder() -> OllamaConfigBuilder {
        OllamaConfigBuilder::default()
    }
}

impl From<&InsightConfig> for OllamaConfig {
    fn from(config: &InsightConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            model: config.model_id.clone(),
        }
    }
}

/// Builder for [`OllamaConfig`].
#[derive(Default)]
pub struct OllamaConfigBuilder {
    endpoint: Option<String>,
    model: Option<String>,
}

impl OllamaConfigBuilder {
    /// Set the generate endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn build(self) -> OllamaConfig {
        OllamaConfig {
            endpoint: self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
        }
    }
}

/// Provider talking to a local Ollama-compatible service.
///
/// # Example
///
/// ```rust,ignore
/// use csv_insight::ai::{OllamaConfig, OllamaProvider};
///
/// let provider = OllamaProvider::with_config(
///     OllamaConfig::builder().model("llama3.2").build(),
/// )?;
/// ```
pub struct OllamaProvider {
    config: OllamaConfig,
    client: Client,
}

impl OllamaProvider {
    /// Create a provider for the default endpoint and model.
    pub fn new() -> Result<Self> {
        Self::with_config(OllamaConfig::default())
    }

    /// Create a provider with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_config(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| InsightError::from(e).with_context("Building HTTP client"))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn call_api(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        debug!(
            "POST {} (model {}, {} prompt chars)",
            self.config.endpoint,
            self.config.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .map_err(|e| {
                InsightError::from(e).with_context(format!("Reaching {}", self.config.endpoint))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let reason = format!("service returned {}: {}", status, body.trim());
            return Err(InsightError::ModelCall(reason).into());
        }

        let result: GenerateResponse = response
            .json()
            .map_err(|e| InsightError::from(e).with_context("Reading response body"))?;

        Ok(result.response.unwrap_or_else(|| NO_RESPONSE.to_string()))
    }
}

impl ModelProvider for OllamaProvider {
    fn generate(&self, prompt: &str) -> Result<String> {
        self.call_api(prompt)
    }

    fn name(&self) -> &str {
        "Ollama"
    }

    fn model(&self) -> Option<&str> {
        Some(&self.config.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serve exactly one HTTP response on a random local port and hand the
    /// raw request back through the channel.
    fn one_shot_server(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf);
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if buf.len() >= end + 4 + length {
                        break;
                    }
                }
            }
            tx.send(String::from_utf8_lossy(&buf).to_string()).unwrap();

            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(reply.as_bytes()).unwrap();
        });

        (format!("http://{}/api/generate", addr), rx)
    }

    fn provider_for(endpoint: String) -> OllamaProvider {
        OllamaProvider::with_config(OllamaConfig::builder().endpoint(endpoint).model("tiny").build())
            .unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = OllamaConfig::default();
        assert_eq!(config.endpoint, "http://localhost:11434/api/generate");
        assert_eq!(config.model, "deepseek-coder:6.7b");
    }

    #[test]
    fn test_config_from_insight_config() {
        let insight = InsightConfig::builder()
            .endpoint("http://10.0.0.2:11434/api/generate")
            .model_id("llama3.2")
            .build()
            .unwrap();
        let config = OllamaConfig::from(&insight);
        assert_eq!(config.endpoint, "http://10.0.0.2:11434/api/generate");
        assert_eq!(config.model, "llama3.2");
    }

    #[test]
    fn test_generate_returns_response_field() {
        let (endpoint, requests) = one_shot_server("200 OK", r#"{"response":"Looks like passenger data."}"#);
        let provider = provider_for(endpoint);

        let text = provider.generate("Describe this").unwrap();
        assert_eq!(text, "Looks like passenger data.");

        let request = requests.recv().unwrap();
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let json: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(json["model"], "tiny");
        assert_eq!(json["prompt"], "Describe this");
        assert_eq!(json["stream"], false);
        assert!(request.starts_with("POST /api/generate"));
    }

    #[test]
    fn test_missing_response_field_yields_marker() {
        let (endpoint, _requests) = one_shot_server("200 OK", r#"{"done":true}"#);
        let provider = provider_for(endpoint);

        assert_eq!(provider.generate("hi").unwrap(), NO_RESPONSE);
    }

    #[test]
    fn test_error_status_is_failure() {
        let (endpoint, _requests) =
            one_shot_server("404 Not Found", r#"{"error":"model 'tiny' not found"}"#);
        let provider = provider_for(endpoint);

        let err = provider.generate("hi").unwrap_err().to_string();
        assert!(err.contains("404"), "unexpected error: {}", err);
        assert!(err.contains("not found"));
    }

    #[test]
    fn test_unparseable_body_is_failure() {
        let (endpoint, _requests) = one_shot_server("200 OK", "not json");
        let provider = provider_for(endpoint);

        assert!(provider.generate("hi").is_err());
    }

    #[test]
    fn test_provider_metadata() {
        let provider = OllamaProvider::new().unwrap();
        assert_eq!(provider.name(), "Ollama");
        assert_eq!(provider.model(), Some("deepseek-coder:6.7b"));
    }
}
