//! Textual surgery on the canvas document.
//!
//! The canvas is a full standalone HTML document. To capture it from inside
//! a host page, its pieces are re-assembled around a host container: font
//! links first, then style blocks with document-root selectors rewritten to
//! target the container, then the body markup itself. The container carries
//! the styles resolved in phase 1 inline, since inherited values do not
//! survive the move out of a real document root.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

/// Attribute marking the host container; rewritten root selectors target it.
pub const HOST_ATTR: &str = "data-export-host";
const HOST_SELECTOR: &str = "[data-export-host]";

/// Logical capture width in CSS pixels.
pub const CANVAS_WIDTH: u32 = 1200;

static FONT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<link[^>]*fonts\.googleapis\.com[^>]*>").expect("valid regex"));
static HEAD_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<head[^>]*>(.*?)</head>").expect("valid regex"));
static BODY_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body[^>]*>(.*)</body>").expect("valid regex"));
static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>(.*?)</style>").expect("valid regex"));
static FONT_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)fonts\.googleapis\.com|fonts\.gstatic\.com").expect("valid regex")
});

/// Computed styles read off the resolved document's body in phase 1.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolvedStyles {
    pub background_color: String,
    pub color: String,
    pub font_family: String,
    pub font_size: String,
    pub line_height: String,
    pub margin: String,
    pub padding: String,
}

impl Default for ResolvedStyles {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
            color: "#000000".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: "16px".to_string(),
            line_height: "normal".to_string(),
            margin: "0px".to_string(),
            padding: "0px".to_string(),
        }
    }
}

/// Google Fonts `<link>` tags, verbatim.
pub fn extract_font_links(html: &str) -> Vec<String> {
    FONT_LINK.find_iter(html).map(|m| m.as_str().to_string()).collect()
}

fn head_content(html: &str) -> &str {
    HEAD_BLOCK
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or("")
}

/// The body markup, or the whole input when no `<body>` element exists.
pub fn body_content(html: &str) -> &str {
    BODY_BLOCK
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(html)
}

/// Inner CSS of every `<style>` block in `fragment`, partitioned into
/// (font-import styles, other styles). Webfont `@import` rules must reach
/// the host head untouched; everything else gets the selector rewrite.
pub fn partition_styles(fragment: &str) -> (Vec<String>, Vec<String>) {
    let mut font_styles = Vec::new();
    let mut other_styles = Vec::new();
    for caps in STYLE_BLOCK.captures_iter(fragment) {
        let css = caps[1].to_string();
        if FONT_HOST.is_match(&css) {
            font_styles.push(css);
        } else {
            other_styles.push(css);
        }
    }
    (font_styles, other_styles)
}

/// `fragment` with every `<style>` block removed.
pub fn strip_style_blocks(fragment: &str) -> String {
    STYLE_BLOCK.replace_all(fragment, "").into_owned()
}

/// Rewrite selectors textually equal to `body`, `html` or `:root` to target
/// the host container instead. Those selectors are inert once the content
/// no longer is the real document root.
///
/// Compound selectors like `body h1` are left alone; the rewrite only
/// applies to whole comma-separated selector items.
pub fn rewrite_root_selectors(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut prelude = String::new();
    for ch in css.chars() {
        match ch {
            '{' => {
                out.push_str(&rewrite_prelude(&prelude));
                out.push('{');
                prelude.clear();
            }
            '}' | ';' => {
                out.push_str(&prelude);
                out.push(ch);
                prelude.clear();
            }
            _ => prelude.push(ch),
        }
    }
    out.push_str(&prelude);
    out
}

fn rewrite_prelude(prelude: &str) -> String {
    prelude
        .split(',')
        .map(|item| {
            let trimmed = item.trim();
            if trimmed.eq_ignore_ascii_case("body")
                || trimmed.eq_ignore_ascii_case("html")
                || trimmed == ":root"
            {
                item.replacen(trimmed, HOST_SELECTOR, 1)
            } else {
                item.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Assemble the host document for phase 2.
///
/// Ordering is load-bearing: font links, then font `@import` styles, then
/// rewritten layout styles, then the cloned body inside the host container.
pub fn build_host_document(sanitized_html: &str, resolved: &ResolvedStyles) -> String {
    let font_links = extract_font_links(sanitized_html);
    let head = head_content(sanitized_html);
    let body = body_content(sanitized_html);

    let (head_font_styles, head_other_styles) = partition_styles(head);
    let (_, body_styles) = partition_styles(body);
    let body_markup = strip_style_blocks(body);

    let mut doc = String::with_capacity(sanitized_html.len() + 1024);
    doc.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    for link in &font_links {
        doc.push_str(link);
    }
    for css in &head_font_styles {
        doc.push_str("<style>");
        doc.push_str(css);
        doc.push_str("</style>");
    }
    doc.push_str("<style>html,body{margin:0;padding:0;background:transparent;}</style>");
    for css in head_other_styles.iter().chain(body_styles.iter()) {
        doc.push_str("<style>");
        doc.push_str(&rewrite_root_selectors(css));
        doc.push_str("</style>");
    }
    doc.push_str("</head><body>");
    doc.push_str(&format!(
        "<div {HOST_ATTR} style=\"background-color:{bg};color:{color};font-family:{ff};font-size:{fs};line-height:{lh};margin:{m};padding:{p};width:{w}px;box-sizing:border-box;overflow:visible;\">",
        bg = resolved.background_color,
        color = resolved.color,
        ff = resolved.font_family,
        fs = resolved.font_size,
        lh = resolved.line_height,
        m = resolved.margin,
        p = resolved.padding,
        w = CANVAS_WIDTH,
    ));
    doc.push_str(&body_markup);
    doc.push_str("</div></body></html>");
    doc
}
