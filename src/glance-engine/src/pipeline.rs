//! The staged generation pipeline.
//!
//! One invocation runs one fixed pipeline shape, selected by detail level:
//! either the short-circuit path (question straight to the short-form
//! renderer) or the full path (planner, then renderer and image generation
//! concurrently, then placeholder injection). No state survives across
//! invocations.
//!
//! Join discipline: the renderer branch is fail-fast — its failure fails the
//! whole run. The image branches are all-settle-then-filter — each owns its
//! own deadline, and a failure or timeout on one produces a missing result
//! for that id without touching the renderer or sibling images.

use std::sync::Arc;
use std::sync::LazyLock;

use futures::future::join_all;
use regex::Regex;

use crate::client::{CompletionClient, GenerationOptions, ImageClient};
use crate::color::{build_custom_preset, CustomStyle};
use crate::config::{DetailConfig, DetailLevel, EngineConfig, IMAGE_TIMEOUT, PREVIEW_TIMEOUT};
use crate::error::{EngineError, Result};
use crate::prompts::{
    build_planner_prompt, build_renderer_prompt, build_short_renderer_prompt, PREVIEW_PROMPT,
};
use crate::styles::StyleCatalog;

/// Upper bound on question length, enforced before any remote call.
pub const MAX_QUESTION_CHARS: usize = 500;

const PLANNER_TEMPERATURE: f32 = 0.5;
const RENDERER_TEMPERATURE: f32 = 0.2;
const PREVIEW_TEMPERATURE: f32 = 0.3;
const PREVIEW_MAX_TOKENS: u32 = 200;

/// An image request extracted from the plan text. Ephemeral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePrompt {
    pub id: String,
    pub prompt: String,
}

/// One generated image, keyed by its placeholder id. Ephemeral.
#[derive(Debug, Clone)]
pub struct ImageGenResult {
    pub id: String,
    pub data_url: String,
}

/// Final pipeline output.
#[derive(Debug, Clone)]
pub struct CanvasResult {
    pub html: String,
    pub preset_name: String,
}

/// The pipeline orchestrator. Pure and re-entrant; holds only clients and
/// configuration.
pub struct Pipeline {
    completion: Arc<dyn CompletionClient>,
    image: Arc<dyn ImageClient>,
    catalog: StyleCatalog,
    /// Rendering-stage model.
    model: String,
    /// Planning/preview model.
    fast_model: String,
}

impl Pipeline {
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        image: Arc<dyn ImageClient>,
        catalog: StyleCatalog,
        config: &EngineConfig,
    ) -> Self {
        Self {
            completion,
            image,
            catalog,
            model: config.model.clone(),
            fast_model: config.fast_model.clone(),
        }
    }

    /// Run the generation pipeline for one question.
    ///
    /// Fails on validation errors, planner/renderer failures, and timeouts.
    /// Image failures degrade to unfilled placeholders and never fail the
    /// run.
    pub async fn run(
        &self,
        question: &str,
        detail_level: DetailLevel,
        custom_style: Option<&CustomStyle>,
    ) -> Result<CanvasResult> {
        validate_question(question)?;
        if let Some(custom) = custom_style {
            validate_custom_style(custom)?;
        }

        let preset = match custom_style {
            Some(custom) => build_custom_preset(&self.catalog, custom),
            None => self.catalog.random_preset(),
        };
        let config = DetailConfig::for_level(detail_level);

        tracing::info!(detail_level = detail_level.as_str(), preset = %preset.name, "starting pipeline run");

        let html = if config.skip_planner {
            // Short-circuit path: no plan, no images.
            let options = GenerationOptions {
                model: self.model.clone(),
                temperature: RENDERER_TEMPERATURE,
                max_tokens: config.renderer_max_tokens,
                reasoning_effort: config.renderer_reasoning,
                timeout: config.renderer_timeout,
            };
            let raw = self
                .completion
                .complete(&build_short_renderer_prompt(&preset), question, &options)
                .await?;
            let html = strip_code_fences(&raw);
            tracing::info!(html_len = html.len(), "short mode render complete");
            html
        } else {
            self.run_full(question, &preset, &config, detail_level).await?
        };

        Ok(CanvasResult {
            html,
            preset_name: preset.name,
        })
    }

    /// Full path: planner, then renderer and image generation concurrently.
    async fn run_full(
        &self,
        question: &str,
        preset: &crate::styles::StylePreset,
        config: &DetailConfig,
        detail_level: DetailLevel,
    ) -> Result<String> {
        // Stage 1: planning. The plan is load-bearing for the renderer, so
        // failure here fails the run.
        let planner_options = GenerationOptions {
            model: self.fast_model.clone(),
            temperature: PLANNER_TEMPERATURE,
            max_tokens: config.planner_max_tokens,
            reasoning_effort: config.planner_reasoning,
            timeout: config.planner_timeout,
        };
        let plan = self
            .completion
            .complete(
                &build_planner_prompt(detail_level),
                question,
                &planner_options,
            )
            .await?;
        tracing::info!(plan_len = plan.len(), "planner done");

        let image_prompts = if config.skip_images {
            Vec::new()
        } else {
            parse_image_prompts(&plan)
        };
        tracing::info!(count = image_prompts.len(), "image prompts extracted");

        // Stage 2: renderer + image generation run concurrently. The
        // renderer consumes the plan text, not the original question.
        let renderer_options = GenerationOptions {
            model: self.model.clone(),
            temperature: RENDERER_TEMPERATURE,
            max_tokens: config.renderer_max_tokens,
            reasoning_effort: config.renderer_reasoning,
            timeout: config.renderer_timeout,
        };
        let renderer_prompt = build_renderer_prompt(preset);
        let render_fut = self
            .completion
            .complete(&renderer_prompt, &plan, &renderer_options);

        let image_futs = image_prompts.iter().map(|ip| {
            let image = Arc::clone(&self.image);
            async move {
                match image.generate_image(&ip.prompt, IMAGE_TIMEOUT).await {
                    Ok(data_url) => Some(ImageGenResult {
                        id: ip.id.clone(),
                        data_url,
                    }),
                    Err(err) => {
                        tracing::warn!(id = %ip.id, error = %err, "image generation failed");
                        None
                    }
                }
            }
        });

        let (render_result, image_results) = tokio::join!(render_fut, join_all(image_futs));
        let raw_html = render_result?;
        let clean_html = strip_code_fences(&raw_html);

        // Stage 3: merge successful images into their placeholders.
        let successful: Vec<ImageGenResult> = image_results.into_iter().flatten().collect();
        let html = if successful.is_empty() {
            clean_html
        } else {
            inject_images(&clean_html, &successful)
        };

        tracing::info!(
            html_len = html.len(),
            images_injected = successful.len(),
            "pipeline run complete"
        );
        Ok(html)
    }

    /// Short textual preview answer (2-3 plain sentences).
    pub async fn preview(&self, question: &str) -> Result<String> {
        validate_question(question)?;
        let options = GenerationOptions {
            model: self.fast_model.clone(),
            temperature: PREVIEW_TEMPERATURE,
            max_tokens: PREVIEW_MAX_TOKENS,
            reasoning_effort: None,
            timeout: PREVIEW_TIMEOUT,
        };
        self.completion
            .complete(PREVIEW_PROMPT, question, &options)
            .await
    }
}

fn validate_question(question: &str) -> Result<()> {
    if question.trim().is_empty() {
        return Err(EngineError::invalid_input("Question is required"));
    }
    if question.chars().count() > MAX_QUESTION_CHARS {
        return Err(EngineError::invalid_input(
            "Question must be 500 characters or fewer",
        ));
    }
    Ok(())
}

static ACCENT_HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid regex"));

fn validate_custom_style(custom: &CustomStyle) -> Result<()> {
    if !ACCENT_HEX.is_match(&custom.accent_color) {
        return Err(EngineError::invalid_input(
            "accentColor must be a 6-digit hex color",
        ));
    }
    Ok(())
}

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```(?:html|htm)?[ \t]*\n?(.*?)\n?[ \t]*```$").expect("valid regex")
});

/// Unwrap a document fenced in a Markdown ```html block; pass anything else
/// through with outer whitespace trimmed. Idempotent.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    match CODE_FENCE.captures(trimmed) {
        Some(caps) => caps[1].trim().to_string(),
        None => trimmed.to_string(),
    }
}

static IMAGE_PROMPT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*img-(\d+):\*\*\s*(.+)").expect("valid regex"));

/// Scan plan text for `**img-<n>:** ...` lines in document order.
///
/// This is tolerant, best-effort parsing of free-form model output: any
/// non-conforming input yields zero matches rather than an error. Lines
/// whose prompt contains "no images needed" (any case) are dropped, and
/// only the first two survivors are kept.
pub fn parse_image_prompts(plan: &str) -> Vec<ImagePrompt> {
    IMAGE_PROMPT_LINE
        .captures_iter(plan)
        .filter_map(|caps| {
            let prompt = caps[2].trim().to_string();
            if prompt.to_lowercase().contains("no images needed") {
                return None;
            }
            Some(ImagePrompt {
                id: format!("img-{}", &caps[1]),
                prompt,
            })
        })
        .take(2)
        .collect()
}

static STALE_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\s*src="[^"]*""#).expect("valid regex"));

/// Default sizing appended when a placeholder carries no max-width of its
/// own. The "max-width" substring check can false-positive on an unrelated
/// property name; accepted heuristic.
const DEFAULT_IMG_STYLE: &str = r#" style="max-width:600px; width:100%; height:auto; object-fit:cover; border-radius:16px; display:block; margin:2rem auto;""#;

/// Substitute generated image data into `<img data-image-id="...">`
/// placeholders. Placeholders with no successful image are left exactly as
/// the renderer emitted them.
pub fn inject_images(html: &str, images: &[ImageGenResult]) -> String {
    let mut result = html.to_string();
    for img in images {
        let pattern = format!(
            r#"(?i)<img\s+data-image-id="{}"([^>]*?)\s*/?>"#,
            regex::escape(&img.id)
        );
        let Ok(placeholder) = Regex::new(&pattern) else {
            continue;
        };
        result = placeholder
            .replace_all(&result, |caps: &regex::Captures<'_>| {
                let mut attrs = STALE_SRC.replace_all(&caps[1], "").to_string();
                if !attrs.contains("max-width") {
                    attrs.push_str(DEFAULT_IMG_STYLE);
                }
                format!(r#"<img src="{}"{} />"#, img.data_url, attrs)
            })
            .into_owned();
    }
    result
}
