//! Server configuration.

use std::path::PathBuf;

use glance_engine::EngineConfig;

/// Default listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address, e.g. `0.0.0.0:8080`.
    pub listen_addr: String,
    /// Directory export artifacts are written into.
    pub export_dir: PathBuf,
    /// Generation engine configuration.
    pub engine: EngineConfig,
}

impl ServerConfig {
    /// Load configuration from the environment.
    ///
    /// `OPENROUTER_API_KEY` and `OPENROUTER_MODEL` are required; everything
    /// else has defaults.
    pub fn from_env() -> glance_engine::Result<Self> {
        let listen_addr = std::env::var("GLANCE_LISTEN_ADDR")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());

        let export_dir = std::env::var("GLANCE_EXPORT_DIR")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_export_dir);

        Ok(Self {
            listen_addr,
            export_dir,
            engine: EngineConfig::from_env()?,
        })
    }
}

fn default_export_dir() -> PathBuf {
    match glance_history::glance_data_dir() {
        Ok(data_dir) => data_dir.join("exports"),
        Err(_) => PathBuf::from("exports"),
    }
}
