//! Glance export - renders a canvas document in headless Chrome and writes
//! it out as a PNG image or a paginated PDF.

pub mod capture;
pub mod document;
pub mod error;
pub mod pdf;
pub mod sanitize;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

pub use capture::{capture_canvas, Capture, CAPTURE_SCALE};
pub use document::{build_host_document, ResolvedStyles, CANVAS_WIDTH};
pub use error::{ExportError, Result};
pub use pdf::{page_slices, PageSlice};
pub use sanitize::sanitize_for_export;

/// Export target format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Pdf => "pdf",
        }
    }
}

/// One export request.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportOptions {
    pub html: String,
    pub format: ExportFormat,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Capture the canvas and write the artifact into `output_dir`. Returns the
/// written path. Blocks on the browser; callers on an async runtime should
/// move this onto a blocking thread.
pub fn export_canvas(options: &ExportOptions, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let stem = match &options.filename {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => format!("glance-{}", chrono::Utc::now().timestamp_millis()),
    };
    let path = output_dir.join(format!("{stem}.{}", options.format.extension()));

    let capture = capture_canvas(&options.html)?;
    match options.format {
        ExportFormat::Png => pdf::write_png(&capture, &path)?,
        ExportFormat::Pdf => pdf::write_pdf(&capture, &path)?,
    }

    info!(path = %path.display(), format = ?options.format, "export complete");
    Ok(path)
}
