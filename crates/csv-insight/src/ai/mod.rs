//! Model client for the summary and question prompts.
//!
//! # Feature Flag
//!
//! The [`ModelProvider`] trait, [`ModelClient`] and [`ModelResponse`] are
//! always available. The HTTP-backed [`OllamaProvider`] requires the `ai`
//! feature (enabled by default).
//!
//! ```toml
//! # Without the HTTP provider
//! csv-insight = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use csv_insight::ai::{ModelClient, OllamaProvider};
//! use std::sync::Arc;
//!
//! let client = ModelClient::new(Arc::new(OllamaProvider::new()?));
//! println!("{}", client.call("What is a box plot?").render());
//! ```

mod client;
mod provider;

pub use client::{FAILURE_PREFIX, ModelClient, ModelResponse};
pub use provider::ModelProvider;

#[cfg(feature = "ai")]
mod ollama;

#[cfg(feature = "ai")]
pub use ollama::{NO_RESPONSE, OllamaConfig, OllamaConfigBuilder, OllamaProvider};
