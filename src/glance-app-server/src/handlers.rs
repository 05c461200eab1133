//! Request handlers for the Glance API.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use glance_engine::{CustomStyle, DetailLevel};
use glance_export::{ExportFormat, ExportOptions};
use glance_history::{HistoryEntry, NewHistoryEntry, StorageUsage};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ============================================================================
// Generation
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainRequest {
    pub question: String,
    #[serde(default)]
    pub detail_level: DetailLevel,
    #[serde(default)]
    pub custom_style: Option<CustomStyle>,
}

#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub html: String,
    /// Name of the style preset the canvas was generated with.
    pub preset: String,
}

pub async fn explain(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExplainRequest>,
) -> AppResult<Json<ExplainResponse>> {
    let result = state
        .pipeline
        .run(
            &request.question,
            request.detail_level,
            request.custom_style.as_ref(),
        )
        .await?;
    Ok(Json(ExplainResponse {
        html: result.html,
        preset: result.preset_name,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub text: String,
}

pub async fn preview(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PreviewRequest>,
) -> AppResult<Json<PreviewResponse>> {
    let text = state.pipeline.preview(&request.question).await?;
    Ok(Json(PreviewResponse { text }))
}

// ============================================================================
// Export
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub html: String,
    pub format: ExportFormat,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub path: String,
}

pub async fn export(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExportRequest>,
) -> AppResult<Json<ExportResponse>> {
    if request.html.trim().is_empty() {
        return Err(AppError::BadRequest("html is required".to_string()));
    }

    let options = ExportOptions {
        html: request.html,
        format: request.format,
        filename: request.filename,
    };
    let export_dir = state.config.export_dir.clone();

    // The capture drives a real browser and blocks.
    let path = tokio::task::spawn_blocking(move || glance_export::export_canvas(&options, &export_dir))
        .await
        .map_err(|err| AppError::Internal(format!("export task failed: {err}")))??;

    info!(path = %path.display(), "export handled");
    Ok(Json(ExportResponse {
        path: path.display().to_string(),
    }))
}

// ============================================================================
// History
// ============================================================================

pub async fn list_history(State(state): State<Arc<AppState>>) -> Json<Vec<HistoryEntry>> {
    Json(state.history.list().await)
}

pub async fn add_history(
    State(state): State<Arc<AppState>>,
    Json(entry): Json<NewHistoryEntry>,
) -> Json<HistoryEntry> {
    Json(state.history.add(entry).await)
}

pub async fn delete_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<serde_json::Value> {
    state.history.delete(&id).await;
    Json(serde_json::json!({ "deleted": id }))
}

pub async fn clear_history(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    state.history.clear().await;
    Json(serde_json::json!({ "cleared": true }))
}

pub async fn history_usage(State(state): State<Arc<AppState>>) -> Json<StorageUsage> {
    Json(state.history.usage().await)
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explain_request_defaults() {
        let request: ExplainRequest =
            serde_json::from_str(r#"{"question":"Why is the sky blue?"}"#).unwrap();
        assert_eq!(request.detail_level, DetailLevel::Balanced);
        assert!(request.custom_style.is_none());
    }

    #[test]
    fn test_explain_request_with_custom_style() {
        let request: ExplainRequest = serde_json::from_str(
            r##"{
                "question": "q",
                "detailLevel": "detailed",
                "customStyle": {"accentColor": "#06B6D4", "fontPairing": "ocean-deep", "mode": "dark"}
            }"##,
        )
        .unwrap();
        assert_eq!(request.detail_level, DetailLevel::Detailed);
        let style = request.custom_style.unwrap();
        assert_eq!(style.accent_color, "#06B6D4");
    }

    #[test]
    fn test_export_request_format_parsing() {
        let request: ExportRequest =
            serde_json::from_str(r#"{"html":"<p>x</p>","format":"pdf"}"#).unwrap();
        assert_eq!(request.format, ExportFormat::Pdf);
        assert!(request.filename.is_none());
    }
}
