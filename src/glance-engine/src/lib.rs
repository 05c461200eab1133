//! Core generation engine: style resolution, prompt construction, and the
//! staged LLM pipeline that turns a question into a styled HTML canvas.

pub mod client;
pub mod color;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod styles;

pub use client::{CompletionClient, GenerationOptions, ImageClient, OpenRouterClient};
pub use color::{build_custom_preset, derive_colors, CustomStyle, Mode};
pub use config::{DetailConfig, DetailLevel, EngineConfig, ReasoningEffort};
pub use error::{EngineError, Result};
pub use pipeline::{CanvasResult, Pipeline};
pub use styles::{StyleCatalog, StylePreset};
