//! Model provider trait for abstracting text-completion services.
//!
//! A provider turns one prompt into one completion. It may fail in any way it
//! likes through `anyhow::Result`; the [`ModelClient`](super::ModelClient)
//! wrapping it is what guarantees that no failure escapes.
//!
//! # Implementing a New Provider
//!
//! 1. Create a new file in `src/ai/`
//! 2. Implement [`ModelProvider`] for your provider struct
//! 3. Export the provider in `src/ai/mod.rs`

use anyhow::Result;

/// Trait for services that complete a prompt.
///
/// Implementations must be `Send + Sync` so a pipeline holding one can be
/// moved to a worker thread.
pub trait ModelProvider: Send + Sync {
    /// Send `prompt` and return the completion text.
    ///
    /// One call is one request. Implementations should not retry.
    fn generate(&self, prompt: &str) -> Result<String>;

    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Model identifier, if the provider exposes one.
    fn model(&self) -> Option<&str> {
        None
    }
}
