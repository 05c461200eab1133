//! Application state shared across request handlers.

use std::sync::Arc;
use std::time::Instant;

use glance_engine::{OpenRouterClient, Pipeline, StyleCatalog};
use glance_history::HistoryStore;

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,
    /// The generation pipeline.
    pub pipeline: Pipeline,
    /// Local history store.
    pub history: HistoryStore,
    /// Start time, for the health report.
    pub start_time: Instant,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("start_time", &self.start_time)
            .finish()
    }
}

impl AppState {
    /// Create new application state from configuration.
    pub fn new(config: ServerConfig) -> AppResult<Self> {
        let client = OpenRouterClient::new(&config.engine)
            .map_err(|err| AppError::Internal(format!("HTTP client setup failed: {err}")))?;
        let client = Arc::new(client);
        let pipeline = Pipeline::new(
            client.clone(),
            client,
            StyleCatalog::default(),
            &config.engine,
        );
        let history = HistoryStore::new()
            .map_err(|err| AppError::Internal(format!("history storage unavailable: {err}")))?;

        Ok(Self {
            config,
            pipeline,
            history,
            start_time: Instant::now(),
        })
    }
}
