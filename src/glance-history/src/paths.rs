//! OS-aware path detection for history storage.
//!
//! - **Windows**: `%APPDATA%\Glance\`
//! - **macOS**: `~/Library/Application Support/Glance/`
//! - **Linux**: `~/.local/share/Glance/`

use std::path::PathBuf;

use tracing::debug;

use crate::error::{HistoryError, Result};

/// Application name used for storage directories.
pub const APP_NAME: &str = "Glance";

/// File holding the full history list as one JSON document.
pub const HISTORY_FILE: &str = "history.json";

/// History storage paths container.
#[derive(Debug, Clone)]
pub struct HistoryPaths {
    /// Root data directory (platform-specific).
    pub data_dir: PathBuf,
    /// The history file inside it.
    pub history_file: PathBuf,
}

impl HistoryPaths {
    /// Create HistoryPaths with automatic OS detection.
    pub fn new() -> Result<Self> {
        let data_dir = glance_data_dir()?;
        Ok(Self::from_root(data_dir))
    }

    /// Create HistoryPaths from a custom root directory.
    pub fn from_root(data_dir: PathBuf) -> Self {
        Self {
            history_file: data_dir.join(HISTORY_FILE),
            data_dir,
        }
    }

    /// Ensure the data directory exists.
    pub async fn ensure_dirs(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        debug!(data_dir = %self.data_dir.display(), "history storage directory initialized");
        Ok(())
    }
}

/// Get the Glance data directory based on the current OS.
pub fn glance_data_dir() -> Result<PathBuf> {
    // Check environment variable override first
    if let Ok(val) = std::env::var("GLANCE_DATA_DIR") {
        if !val.is_empty() {
            let path = PathBuf::from(val);
            debug!(path = %path.display(), "Using GLANCE_DATA_DIR override");
            return Ok(path);
        }
    }

    let base = dirs::data_dir().ok_or(HistoryError::DataDirNotFound)?;
    Ok(base.join(APP_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_structure() {
        let paths = HistoryPaths::from_root(PathBuf::from("/tmp/glance-test"));
        assert!(paths.history_file.ends_with(HISTORY_FILE));
        assert_eq!(paths.data_dir, PathBuf::from("/tmp/glance-test"));
    }
}
