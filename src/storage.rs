//! Zone snapshot persistence.
//!
//! A **zone store** keeps the durable copy of the full zone set. The registry is the
//! only writer; it hands the complete, ordered set to [`ZoneStore::save`] after every
//! successful mutation and reads it back once at start-up with [`ZoneStore::load`].
//!
//! This module exports two implementations:
//! - [`JsonZoneStore`]: one pretty-printed JSON file, replaced atomically on save.
//! - [`InMemoryZoneStore`]: keeps the snapshot in memory (tests, ephemeral worlds).
//!
//! ## Design notes
//! - Stores never decide policy. A failed save is returned to the registry, which logs it
//!   and keeps its in-memory state ahead of disk until the next successful save.
//! - Implementations must be `Send + Sync`; the registry calls them from whichever thread
//!   holds its critical section.
mod in_memory;
mod json;

use std::path::PathBuf;
use crate::zone::Zone;

/// Single-file JSON store.
pub use json::JsonZoneStore;
/// Non-durable store.
pub use in_memory::InMemoryZoneStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed zone snapshot {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot encode zone snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable load/save of the full zone set.
pub trait ZoneStore: Send + Sync {
    /// Returns the persisted zones in their stored order.
    ///
    /// An absent snapshot is not an error and yields an empty list.
    fn load(&self) -> Result<Vec<Zone>, StoreError>;

    /// Replaces the snapshot with `zones`.
    ///
    /// A concurrent [`load`](Self::load) must observe either the old or the new
    /// snapshot, never a partial one.
    fn save(&self, zones: &[Zone]) -> Result<(), StoreError>;

    /// Makes a point-in-time copy of the current snapshot.
    ///
    /// Returns where the copy went, or `None` when there was nothing to copy.
    fn backup(&self) -> Result<Option<PathBuf>, StoreError>;
}
