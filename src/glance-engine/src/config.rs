//! Engine configuration: endpoint settings and the detail-level table.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Default OpenRouter-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Flat per-image generation deadline, independent of detail level.
pub const IMAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Preview answer deadline.
pub const PREVIEW_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote endpoint configuration for the completion and image clients.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the chat-completions endpoint.
    pub base_url: String,
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Model used by the rendering stage.
    pub model: String,
    /// Faster model used by the planning stage and the preview answer.
    pub fast_model: String,
    /// Model used for image generation.
    pub image_model: String,
}

impl EngineConfig {
    /// Load the configuration from the environment.
    ///
    /// `OPENROUTER_API_KEY` and `OPENROUTER_MODEL` are required;
    /// `OPENROUTER_FAST_MODEL` and `OPENROUTER_IMAGE_MODEL` fall back to the
    /// main model, `OPENROUTER_BASE_URL` to the public endpoint.
    pub fn from_env() -> Result<Self> {
        let api_key = require_env("OPENROUTER_API_KEY")?;
        let model = require_env("OPENROUTER_MODEL")?;
        let fast_model = std::env::var("OPENROUTER_FAST_MODEL").unwrap_or_else(|_| model.clone());
        let image_model = std::env::var("OPENROUTER_IMAGE_MODEL").unwrap_or_else(|_| model.clone());
        let base_url =
            std::env::var("OPENROUTER_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            base_url,
            api_key,
            model,
            fast_model,
            image_model,
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| EngineError::MissingEnv { name: name.into() })
}

/// How much latency and output the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Short,
    #[default]
    Balanced,
    Detailed,
}

impl DetailLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Balanced => "balanced",
            Self::Detailed => "detailed",
        }
    }
}

/// Reasoning-effort hint forwarded to the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Medium,
    High,
}

/// Per-level stage budgets. A static lookup table, not a runtime entity:
/// it fully determines which pipeline shape executes.
#[derive(Debug, Clone, Copy)]
pub struct DetailConfig {
    pub planner_max_tokens: u32,
    pub planner_timeout: Duration,
    pub planner_reasoning: Option<ReasoningEffort>,
    pub renderer_max_tokens: u32,
    pub renderer_timeout: Duration,
    pub renderer_reasoning: Option<ReasoningEffort>,
    /// Short mode: the question goes straight to the short-form renderer.
    pub skip_planner: bool,
    /// Short mode: no image prompts are extracted regardless of plan text.
    pub skip_images: bool,
}

impl DetailConfig {
    /// Look up the stage budgets for a detail level.
    pub fn for_level(level: DetailLevel) -> Self {
        match level {
            DetailLevel::Short => Self {
                planner_max_tokens: 0,
                planner_timeout: Duration::ZERO,
                planner_reasoning: None,
                renderer_max_tokens: 12_000,
                renderer_timeout: Duration::from_secs(30),
                renderer_reasoning: None,
                skip_planner: true,
                skip_images: true,
            },
            DetailLevel::Balanced => Self {
                planner_max_tokens: 4_000,
                planner_timeout: Duration::from_secs(30),
                planner_reasoning: Some(ReasoningEffort::Medium),
                renderer_max_tokens: 24_576,
                renderer_timeout: Duration::from_secs(45),
                renderer_reasoning: Some(ReasoningEffort::Medium),
                skip_planner: false,
                skip_images: false,
            },
            DetailLevel::Detailed => Self {
                planner_max_tokens: 6_000,
                planner_timeout: Duration::from_secs(45),
                planner_reasoning: Some(ReasoningEffort::High),
                renderer_max_tokens: 32_000,
                renderer_timeout: Duration::from_secs(60),
                renderer_reasoning: Some(ReasoningEffort::High),
                skip_planner: false,
                skip_images: false,
            },
        }
    }
}
