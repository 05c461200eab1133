//! Error types for glance-export.

use thiserror::Error;

/// Export error types.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Browser launch, navigation or script evaluation failed.
    #[error("browser error: {0}")]
    Browser(#[from] anyhow::Error),

    /// The capture step produced no usable bitmap.
    #[error("capture failed: {0}")]
    Capture(String),

    /// Raster decode/encode failed.
    #[error("image error: {0}")]
    Image(#[from] printpdf::image_crate::ImageError),

    /// PDF assembly failed.
    #[error("PDF error: {0}")]
    Pdf(#[from] printpdf::Error),

    /// IO error writing the artifact.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
