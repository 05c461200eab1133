//! Instruction text for the three pipeline roles.
//!
//! Pure functions of the detail level or the style preset. The renderer
//! prompts embed the palette hex values, font family names, and mood
//! verbatim so the generated document stays on-style.

use crate::config::DetailLevel;
use crate::styles::StylePreset;

/// System prompt for the preview answer.
pub const PREVIEW_PROMPT: &str = "You are a helpful assistant. Answer the question concisely in 2-3 sentences. Be accurate and direct. No markdown formatting, no bullet points, just plain flowing text.";

/// Google Fonts URL-encodes family names with `+`.
fn font_url(font_name: &str) -> String {
    font_name.replace(' ', "+")
}

fn fonts_link(preset: &StylePreset) -> String {
    format!(
        "https://fonts.googleapis.com/css2?family={}:wght@300;400;500;600;700&family={}:wght@300;400;500;600;700&display=swap",
        font_url(&preset.fonts.heading),
        font_url(&preset.fonts.body),
    )
}

/// Planner prompt: turns a question into a structured content plan plus
/// optional image prompts. Parameterized by detail level only, never style.
pub fn build_planner_prompt(level: DetailLevel) -> String {
    let (sections, diagrams) = match level {
        DetailLevel::Short => ("2-3", "2-3"),
        DetailLevel::Balanced => ("3-5", "3-4"),
        DetailLevel::Detailed => ("4-6", "4-6"),
    };

    format!(
        r#"You are an expert researcher and infographic content planner. Take any question and produce a structured content plan that a visual designer will use to create an infographic.

## YOUR TASK
Produce a structured content plan. Focus on factual accuracy, clear organization into {sections} distinct sections, identifying what visual diagrams best explain each concept, and concrete data points.

## OUTPUT FORMAT (follow this EXACTLY)

# [Compelling title for the infographic]

## Overview
[2-3 sentences summarizing the topic. This becomes the hero section.]

## Sections

### [Section Title]
**Key points:**
- [fact/insight with specific data]
- [fact/insight with specific data]
**Visual:** [the ideal diagram: "flowchart showing A -> B -> C", "bar chart comparing X=70%, Y=20%", "timeline with 4 dates", "cycle diagram with 5 steps", etc.]
**Data:** [specific numbers, percentages, dates, measurements]

[Repeat for each of the {sections} sections.]

## Key Takeaways
- [takeaway 1 - most important insight]
- [takeaway 2]
- [takeaway 3]

## Diagram Descriptions
1. **Hero diagram:** [detailed description of an overview visual for the whole topic]
2. **[Diagram type]:** [detailed description with labels, connections, values]
[Aim for {diagrams} diagrams.]

## Image Prompts
Include 1-2 image prompts for MOST topics. Images are AI-generated and add visual impact. Default to INCLUDING images unless the topic is purely abstract code/math (sorting algorithms, proofs, programming syntax) — in that case write "No images needed".

Format:
**img-1:** [Vivid, detailed image prompt: subject, scene, lighting, style, composition, colors. 2-3 sentences.]
**img-2:** [Second image if the topic warrants it. Otherwise omit.]

## RULES
- Always provide specific data. Never vague statements.
- Each section MUST have a Visual description with a concrete diagram type.
- Focus on WHAT to explain, not HOW to render it. Never mention HTML, CSS, SVG, or code.
- If the topic involves a process, use a flowchart; comparison, a versus layout; change over time, a timeline."#
    )
}

/// Common design-token block shared by both renderer prompts.
fn design_tokens(preset: &StylePreset) -> String {
    format!(
        r#"## DESIGN TOKENS
- Background: {bg}
- Text: {text}
- Accent: {accent}
- Surface: {surface}
- Heading font: "{heading}"
- Body font: "{body}"
- Mood: {mood}

## HEAD REQUIREMENTS
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<link href="{link}" rel="stylesheet">
All styles in a single <style> tag. No external CSS."#,
        bg = preset.colors.bg,
        text = preset.colors.text,
        accent = preset.colors.accent,
        surface = preset.colors.surface,
        heading = preset.fonts.heading,
        body = preset.fonts.body,
        mood = preset.mood,
        link = fonts_link(preset),
    )
}

/// Full renderer prompt: turns a content plan into a styled HTML document.
pub fn build_renderer_prompt(preset: &StylePreset) -> String {
    format!(
        r####"You are a world-class infographic designer and HTML/CSS/SVG developer. You receive a structured content plan and transform it into a stunning visual HTML document.

## YOUR TASK
Render the content plan you receive as a beautiful, designed HTML infographic. Do NOT add or change the factual content — render what you are given.

## OUTPUT FORMAT
Return ONLY a complete HTML document: <!DOCTYPE html> through </html>.
No markdown. No code fences. No commentary before or after.

{tokens}

## RULES
- NO JavaScript. No <script> tags. No event handlers (onclick, onload, etc.).
- No external resources except the single Google Fonts link above.
- Responsive from 400px to 1400px. Max content width: 1200px, centered with margin: 0 auto.
- Semantic HTML throughout. Strong text-background contrast.

## VISUAL-FIRST MANDATE
This is an INFOGRAPHIC CANVAS, not an article. At least 40-50% of the page MUST be visual: inline SVG diagrams, icon grids, stat blocks, timelines, comparison layouts. Minimum 3 substantial SVG diagrams per page; every major section gets at least one visual. Vary layouts — never stack plain paragraphs.

## SVG TECHNICAL REQUIREMENTS
- ALWAYS set viewBox and preserveAspectRatio="xMidYMid meet" on diagram SVGs.
- Use href, NOT xlink:href. width="100%" with a max-width via inline style.
- Compose basic shapes (rect, circle, line, polygon) over long path data.
- SMIL animations (<animate>, <animateTransform>) are allowed for subtle motion.
- SVGs must be self-contained — no external references, no <image> tags inside them.
- Give markers and defs unique ids per SVG to avoid cross-diagram conflicts.

## AI-GENERATED IMAGE PLACEHOLDERS
If the content plan includes a "## Image Prompts" section with img-1/img-2 entries, images are generated in parallel and injected afterwards. Place placeholders using the EXACT id from the plan:

<img data-image-id="img-1" alt="[descriptive alt text]"
     style="width:100%; max-width:600px; height:auto; object-fit:cover; border-radius:16px; display:block; margin:2rem auto;" />

Images supplement the SVG diagrams, never replace them. If the plan says "No images needed", include no <img> placeholders.

## CONTENT PLAN MAPPING
- "# Title" -> hero section with large heading
- "## Overview" -> hero text alongside or below a large overview SVG
- "### Section" with **Key points** -> designed section; **Visual:** descriptions become that section's SVG diagram; **Data:** values become stat blocks
- "## Key Takeaways" -> styled callout card at the end
- "## Diagram Descriptions" -> your blueprint for each SVG

Let the mood ({mood}) shape spacing, borders, shadows, and decoration. Apply subtle CSS entrance animations (opacity/transform only) wrapped in @media (prefers-reduced-motion: no-preference)."####,
        tokens = design_tokens(preset),
        mood = preset.mood,
    )
}

/// Short-form renderer prompt: the raw question goes straight in, no plan.
pub fn build_short_renderer_prompt(preset: &StylePreset) -> String {
    format!(
        r#"You are an expert explainer and HTML/CSS/SVG developer. You receive a question and answer it directly as a compact, visually designed HTML document.

## OUTPUT FORMAT
Return ONLY a complete HTML document: <!DOCTYPE html> through </html>.
No markdown. No code fences. No commentary.

{tokens}

## RULES
- NO JavaScript, no <script> tags, no event handlers.
- No external resources except the single Google Fonts link above.
- Keep it SHORT: a hero heading, a concise answer, and 1-2 small inline SVG diagrams or stat blocks where they genuinely help.
- Max content width 1200px, centered. Strong text-background contrast.
- No <img> placeholders — this mode has no generated images."#,
        tokens = design_tokens(preset),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::StyleCatalog;

    #[test]
    fn test_prompts_are_deterministic() {
        let catalog = StyleCatalog::default();
        let preset = catalog.preset_by_name("arctic-frost").unwrap();
        assert_eq!(build_renderer_prompt(preset), build_renderer_prompt(preset));
        assert_eq!(
            build_planner_prompt(DetailLevel::Balanced),
            build_planner_prompt(DetailLevel::Balanced)
        );
    }

    #[test]
    fn test_renderer_prompt_embeds_tokens_verbatim() {
        let catalog = StyleCatalog::default();
        let preset = catalog.preset_by_name("arctic-frost").unwrap();
        let prompt = build_renderer_prompt(preset);
        assert!(prompt.contains("#06b6d4"));
        assert!(prompt.contains("\"Outfit\""));
        assert!(prompt.contains("Work+Sans"));
        assert!(prompt.contains("crisp, airy, minimal"));
    }

    #[test]
    fn test_planner_prompt_scales_with_level() {
        let balanced = build_planner_prompt(DetailLevel::Balanced);
        let detailed = build_planner_prompt(DetailLevel::Detailed);
        assert_ne!(balanced, detailed);
        assert!(balanced.contains("3-5 distinct sections"));
        assert!(detailed.contains("4-6 distinct sections"));
    }

    #[test]
    fn test_renderer_prompt_names_plan_headings() {
        let catalog = StyleCatalog::default();
        let preset = catalog.preset_by_name("arctic-frost").unwrap();
        let prompt = build_renderer_prompt(preset);
        assert!(prompt.contains("\"## Image Prompts\""));
        assert!(prompt.contains("\"### Section\""));
        assert!(prompt.ends_with("(prefers-reduced-motion: no-preference)."));
    }

    #[test]
    fn test_short_prompt_forbids_placeholders() {
        let catalog = StyleCatalog::default();
        let preset = catalog.preset_by_name("terracotta").unwrap();
        let prompt = build_short_renderer_prompt(preset);
        assert!(prompt.contains("no generated images"));
        assert!(!prompt.contains("data-image-id"));
    }
}
