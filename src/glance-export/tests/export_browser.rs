//! Browser integration tests for the capture and export flow.
//!
//! These launch a real headless Chrome, so they are ignored by default.
//! Run with: `cargo test -p glance-export --test export_browser -- --ignored`

use glance_export::{capture_canvas, export_canvas, ExportFormat, ExportOptions};

const CANVAS: &str = r#"<!DOCTYPE html>
<html>
<head>
<style>body { background: #0e1a25; color: #f0f0f0; font-family: serif; }</style>
<style>.hero { padding: 2rem; font-size: 2rem; }</style>
</head>
<body>
<div class="hero">Why is the sky blue?</div>
<p>Sunlight scatters off air molecules, and blue light scatters the most.</p>
</body>
</html>"#;

#[test]
#[ignore]
fn capture_produces_a_scaled_bitmap() {
    let capture = capture_canvas(CANVAS).expect("capture failed");
    assert!(!capture.png.is_empty());
    assert_eq!(capture.logical_width, 1200);
    assert!(capture.logical_height > 0);
    // PNG magic bytes.
    assert_eq!(&capture.png[..4], &[0x89, b'P', b'N', b'G']);
}

#[test]
#[ignore]
fn export_writes_png_and_pdf_artifacts() {
    let dir = tempfile::tempdir().expect("tempdir");

    let png = export_canvas(
        &ExportOptions {
            html: CANVAS.to_string(),
            format: ExportFormat::Png,
            filename: Some("sky".to_string()),
        },
        dir.path(),
    )
    .expect("png export failed");
    assert_eq!(png.file_name().and_then(|n| n.to_str()), Some("sky.png"));
    assert!(png.metadata().expect("metadata").len() > 0);

    let pdf = export_canvas(
        &ExportOptions {
            html: CANVAS.to_string(),
            format: ExportFormat::Pdf,
            filename: Some("sky".to_string()),
        },
        dir.path(),
    )
    .expect("pdf export failed");
    let bytes = std::fs::read(&pdf).expect("read pdf");
    assert_eq!(&bytes[..5], b"%PDF-");
}
