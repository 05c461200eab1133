//! Glance history - local, OS-aware persistence of past generations.
//!
//! Entries live in a single JSON file under the platform data directory,
//! capped by a byte budget with oldest-first eviction. Storage failures
//! never propagate out of the public API.

pub mod error;
pub mod paths;
pub mod store;

pub use error::{HistoryError, Result};
pub use paths::{glance_data_dir, HistoryPaths};
pub use store::{
    enforce_storage_budget, HistoryEntry, HistoryStore, NewHistoryEntry, StorageUsage,
    MAX_STORAGE_BYTES,
};
