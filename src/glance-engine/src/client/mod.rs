//! Remote generation clients.
//!
//! Two narrow seams: text completion and single-image generation. The
//! orchestrator only sees the traits so tests can substitute deterministic
//! fakes.

mod openrouter;

pub use openrouter::OpenRouterClient;

use std::time::Duration;

use async_trait::async_trait;

use crate::config::ReasoningEffort;
use crate::error::Result;

/// Options for one completion call. Every call carries its own deadline;
/// the deadline firing cancels only that call.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub reasoning_effort: Option<ReasoningEffort>,
    pub timeout: Duration,
}

/// Trait for text-generation clients.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a (system prompt, user message) pair and return the generated
    /// text, or fail with an upstream/timeout error.
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
        options: &GenerationOptions,
    ) -> Result<String>;
}

/// Trait for image-generation clients.
#[async_trait]
pub trait ImageClient: Send + Sync {
    /// Send a single prompt and return one image as a data URL.
    async fn generate_image(&self, prompt: &str, timeout: Duration) -> Result<String>;
}
