//! Two-phase browser capture.
//!
//! Phase 1 parses the sanitized document in its own tab, waits for webfonts
//! (5 s ceiling) and images (10 s each, pooled), and reads the computed
//! styles off the document body. Phase 2 navigates a second tab to the
//! re-assembled host document, re-waits for assets, and rasterizes the host
//! container at 2x scale.
//!
//! Each invocation launches its own browser and tears it down on every exit
//! path; concurrent exports never share offscreen state.

use base64::Engine as _;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::types::Bounds;
use headless_chrome::{Browser, LaunchOptions, Tab};
use tracing::{debug, info};

use crate::document::{build_host_document, ResolvedStyles, CANVAS_WIDTH, HOST_ATTR};
use crate::error::{ExportError, Result};
use crate::sanitize::sanitize_for_export;

/// Rasterization scale factor.
pub const CAPTURE_SCALE: f64 = 2.0;

/// Output of the capture step: a PNG bitmap at `CAPTURE_SCALE` times the
/// logical dimensions.
#[derive(Debug, Clone)]
pub struct Capture {
    pub png: Vec<u8>,
    pub logical_width: u32,
    pub logical_height: u32,
}

/// Run the full resolve-then-capture flow for one canvas document.
pub fn capture_canvas(raw_html: &str) -> Result<Capture> {
    let sanitized = sanitize_for_export(raw_html);

    let browser = Browser::new(LaunchOptions {
        window_size: Some((CANVAS_WIDTH + 80, 900)),
        ..Default::default()
    })?;

    // Phase 1: resolve. Cascade-dependent values only compute correctly
    // while the content is a real document root.
    let resolve_tab = browser.new_tab()?;
    navigate_to_html(&resolve_tab, &sanitized)?;
    wait_for_assets(&resolve_tab)?;
    let resolved = read_resolved_styles(&resolve_tab)?;
    debug!(background = %resolved.background_color, "resolved document styles");
    let _ = resolve_tab.close(true);

    // Phase 2: clone into host and capture.
    let host_doc = build_host_document(&sanitized, &resolved);
    let host_tab = browser.new_tab()?;
    navigate_to_html(&host_tab, &host_doc)?;
    wait_for_assets(&host_tab)?;

    let logical_height = content_height(&host_tab)?;
    host_tab.set_bounds(Bounds::Normal {
        left: None,
        top: None,
        width: Some(f64::from(CANVAS_WIDTH + 80)),
        height: Some(f64::from(logical_height + 100)),
    })?;

    let png = host_tab.capture_screenshot(
        Page::CaptureScreenshotFormatOption::Png,
        None,
        Some(Page::Viewport {
            x: 0.0,
            y: 0.0,
            width: f64::from(CANVAS_WIDTH),
            height: f64::from(logical_height),
            scale: CAPTURE_SCALE,
        }),
        true,
    )?;
    if png.is_empty() {
        return Err(ExportError::capture("screenshot returned no data"));
    }

    info!(
        width = CANVAS_WIDTH,
        height = logical_height,
        bytes = png.len(),
        "canvas captured"
    );
    Ok(Capture {
        png,
        logical_width: CANVAS_WIDTH,
        logical_height,
    })
}

fn navigate_to_html(tab: &Tab, html: &str) -> Result<()> {
    let encoded = base64::engine::general_purpose::STANDARD.encode(html);
    tab.navigate_to(&format!("data:text/html;base64,{encoded}"))?
        .wait_until_navigated()?;
    Ok(())
}

/// Wait for webfonts (bounded at 5 s) and for every image to load or error
/// (bounded at 10 s each, pooled concurrently).
fn wait_for_assets(tab: &Tab) -> Result<()> {
    tab.evaluate(
        r#"(async () => {
            await Promise.race([
                document.fonts.ready,
                new Promise((r) => setTimeout(r, 5000)),
            ]);
            const images = Array.from(document.querySelectorAll('img'));
            await Promise.all(images.map((img) => new Promise((resolve) => {
                if (img.complete && img.naturalWidth > 0) { resolve(); return; }
                const t = setTimeout(resolve, 10000);
                img.onload = () => { clearTimeout(t); resolve(); };
                img.onerror = () => { clearTimeout(t); resolve(); };
            })));
            return 'ready';
        })()"#,
        true,
    )?;
    Ok(())
}

/// Read the computed styles the host container must inherit. Falls back
/// from body to the document root, then to white.
fn read_resolved_styles(tab: &Tab) -> Result<ResolvedStyles> {
    let result = tab.evaluate(
        r#"(() => {
            const transparent = (c) => !c || c === 'transparent' || c === 'rgba(0, 0, 0, 0)';
            const body = document.body;
            const root = document.documentElement;
            const el = body || root;
            if (!el) return JSON.stringify({});
            const cs = getComputedStyle(el);
            let backgroundColor = cs.backgroundColor;
            if (transparent(backgroundColor) && root) {
                backgroundColor = getComputedStyle(root).backgroundColor;
            }
            if (transparent(backgroundColor)) {
                backgroundColor = '#ffffff';
            }
            return JSON.stringify({
                backgroundColor,
                color: cs.color,
                fontFamily: cs.fontFamily,
                fontSize: cs.fontSize,
                lineHeight: cs.lineHeight,
                margin: cs.margin,
                padding: cs.padding,
            });
        })()"#,
        false,
    )?;

    let json = result
        .value
        .as_ref()
        .and_then(|v| v.as_str())
        .ok_or_else(|| ExportError::capture("style resolution returned no value"))?
        .to_string();
    Ok(serde_json::from_str(&json).unwrap_or_default())
}

fn content_height(tab: &Tab) -> Result<u32> {
    let js = format!(
        r#"(() => {{
            const host = document.querySelector('[{HOST_ATTR}]');
            const h = host
                ? host.getBoundingClientRect().height
                : document.documentElement.scrollHeight;
            return Math.max(1, Math.ceil(h));
        }})()"#
    );
    let result = tab.evaluate(&js, false)?;
    let height = result
        .value
        .as_ref()
        .and_then(|v| v.as_f64())
        .ok_or_else(|| ExportError::capture("content measurement returned no value"))?;
    Ok(height as u32)
}
