//! The history store: one JSON file holding every saved generation.
//!
//! History is a convenience layer. Every public operation swallows its own
//! failures (missing directory, corrupt file, full disk) and degrades to an
//! empty read or a dropped write, so a broken store can never fail a
//! generation request.

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use glance_engine::{CustomStyle, DetailLevel};

use crate::error::Result;
use crate::paths::HistoryPaths;

/// Hard budget for the serialized history file, in bytes.
pub const MAX_STORAGE_BYTES: usize = 4_500_000;

/// One saved generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub question: String,
    pub html: String,
    pub preview_text: String,
    pub preset_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_style: Option<CustomStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_level: Option<DetailLevel>,
    /// Unix milliseconds.
    pub timestamp: i64,
    pub html_size: usize,
}

/// Input for [`HistoryStore::add`]; the store assigns id, timestamp and
/// html_size.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHistoryEntry {
    pub question: String,
    pub html: String,
    #[serde(default)]
    pub preview_text: String,
    pub preset_name: String,
    #[serde(default)]
    pub custom_style: Option<CustomStyle>,
    #[serde(default)]
    pub detail_level: Option<DetailLevel>,
}

/// Storage usage report.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageUsage {
    pub used: usize,
    pub total: usize,
    pub entry_count: usize,
}

/// File-backed history store.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    paths: HistoryPaths,
}

impl HistoryStore {
    /// Create a store with automatic path detection.
    pub fn new() -> Result<Self> {
        let paths = HistoryPaths::new()?;
        Ok(Self { paths })
    }

    /// Create a store rooted at custom paths.
    pub fn with_paths(paths: HistoryPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &HistoryPaths {
        &self.paths
    }

    /// List all entries, newest first. Missing or corrupt files read as
    /// empty.
    pub async fn list(&self) -> Vec<HistoryEntry> {
        let mut entries = match self.load().await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "failed to read history, treating as empty");
                Vec::new()
            }
        };
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    /// Save one generation. Returns the entry with id and timestamp filled
    /// in, even when the write itself failed.
    pub async fn add(&self, new: NewHistoryEntry) -> HistoryEntry {
        let entry = HistoryEntry {
            id: Uuid::new_v4().to_string(),
            html_size: new.html.len(),
            question: new.question,
            html: new.html,
            preview_text: new.preview_text,
            preset_name: new.preset_name,
            custom_style: new.custom_style,
            detail_level: new.detail_level,
            timestamp: chrono::Utc::now().timestamp_millis(),
        };

        let mut entries = self.list().await;
        entries.insert(0, entry.clone());
        let entries = enforce_storage_budget(entries);
        if let Err(err) = self.persist(&entries).await {
            warn!(error = %err, "failed to persist history entry");
        }

        entry
    }

    /// Remove the entry with the given id, if present.
    pub async fn delete(&self, id: &str) {
        let mut entries = self.list().await;
        entries.retain(|e| e.id != id);
        if let Err(err) = self.persist(&entries).await {
            warn!(error = %err, "failed to persist history after delete");
        }
    }

    /// Remove the whole history file.
    pub async fn clear(&self) {
        match tokio::fs::remove_file(&self.paths.history_file).await {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!(error = %err, "failed to clear history"),
        }
    }

    /// Report how much of the budget the serialized file consumes.
    pub async fn usage(&self) -> StorageUsage {
        let (used, entry_count) = match tokio::fs::read_to_string(&self.paths.history_file).await {
            Ok(raw) => {
                let count = serde_json::from_str::<Vec<HistoryEntry>>(&raw)
                    .map(|entries| entries.len())
                    .unwrap_or(0);
                (raw.len(), count)
            }
            Err(_) => (0, 0),
        };
        StorageUsage {
            used,
            total: MAX_STORAGE_BYTES,
            entry_count,
        }
    }

    async fn load(&self) -> Result<Vec<HistoryEntry>> {
        let raw = match tokio::fs::read_to_string(&self.paths.history_file).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    async fn persist(&self, entries: &[HistoryEntry]) -> Result<()> {
        self.paths.ensure_dirs().await?;
        let serialized = serde_json::to_string(entries)?;
        tokio::fs::write(&self.paths.history_file, serialized).await?;
        Ok(())
    }
}

/// Drop entries from the tail (oldest, given newest-first order) until the
/// serialized list fits the byte budget.
pub fn enforce_storage_budget(mut entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    while !entries.is_empty() {
        let serialized_len = serde_json::to_string(&entries).map(|s| s.len()).unwrap_or(0);
        if serialized_len <= MAX_STORAGE_BYTES {
            break;
        }
        entries.pop();
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> HistoryStore {
        HistoryStore::with_paths(HistoryPaths::from_root(dir.path().to_path_buf()))
    }

    fn new_entry(question: &str, html: &str) -> NewHistoryEntry {
        NewHistoryEntry {
            question: question.to_string(),
            html: html.to_string(),
            preview_text: String::new(),
            preset_name: "midnight-scholar".to_string(),
            custom_style: None,
            detail_level: Some(DetailLevel::Balanced),
        }
    }

    #[tokio::test]
    async fn test_add_then_list_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let saved = store.add(new_entry("q1", "<html>one</html>")).await;
        assert!(!saved.id.is_empty());
        assert_eq!(saved.html_size, "<html>one</html>".len());

        let entries = store.list().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, saved.id);
        assert_eq!(entries[0].question, "q1");
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let a = store.add(new_entry("first", "<p>a</p>")).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let b = store.add(new_entry("second", "<p>b</p>")).await;

        let entries = store.list().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, b.id);
        assert_eq!(entries[1].id, a.id);
    }

    #[tokio::test]
    async fn test_delete_removes_only_the_target() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let a = store.add(new_entry("keep", "<p>a</p>")).await;
        let b = store.add(new_entry("drop", "<p>b</p>")).await;

        store.delete(&b.id).await;
        let entries = store.list().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, a.id);

        // Deleting an unknown id is a no-op.
        store.delete("not-a-real-id").await;
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_and_usage() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.add(new_entry("q", "<p>x</p>")).await;
        let usage = store.usage().await;
        assert_eq!(usage.entry_count, 1);
        assert!(usage.used > 0);
        assert_eq!(usage.total, MAX_STORAGE_BYTES);

        store.clear().await;
        assert!(store.list().await.is_empty());
        let usage = store.usage().await;
        assert_eq!(usage.entry_count, 0);
        assert_eq!(usage.used, 0);

        // Clearing an already-empty store is fine.
        store.clear().await;
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        tokio::fs::write(&store.paths().history_file, "{not json")
            .await
            .unwrap();
        assert!(store.list().await.is_empty());

        // A write through the public API recovers the file.
        store.add(new_entry("q", "<p>x</p>")).await;
        assert_eq!(store.list().await.len(), 1);
    }

    #[test]
    fn test_budget_evicts_from_the_tail() {
        let mk = |id: &str, size: usize| HistoryEntry {
            id: id.to_string(),
            question: "q".to_string(),
            html: "x".repeat(size),
            preview_text: String::new(),
            preset_name: "p".to_string(),
            custom_style: None,
            detail_level: None,
            timestamp: 0,
            html_size: size,
        };

        // Three entries of ~2MB each cannot all fit in 4.5MB.
        let entries = vec![
            mk("newest", 2_000_000),
            mk("middle", 2_000_000),
            mk("oldest", 2_000_000),
        ];
        let kept = enforce_storage_budget(entries);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].id, "newest");
        assert_eq!(kept[1].id, "middle");
    }

    #[test]
    fn test_budget_keeps_small_lists_intact() {
        let entries = vec![HistoryEntry {
            id: "only".to_string(),
            question: "q".to_string(),
            html: "<p>tiny</p>".to_string(),
            preview_text: String::new(),
            preset_name: "p".to_string(),
            custom_style: None,
            detail_level: None,
            timestamp: 0,
            html_size: 11,
        }];
        assert_eq!(enforce_storage_budget(entries).len(), 1);
    }
}
