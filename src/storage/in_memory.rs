use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use crate::storage::{StoreError, ZoneStore};
use crate::zone::Zone;

/// In-memory zone store (no persistence). Saves replace the held snapshot.
#[derive(Debug, Default)]
pub struct InMemoryZoneStore {
    zones: Mutex<Vec<Zone>>,
    saves: Mutex<usize>,
}

impl InMemoryZoneStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing snapshot, as if it had been loaded from disk.
    pub fn with_zones(zones: Vec<Zone>) -> Self {
        Self {
            zones: Mutex::new(zones),
            saves: Mutex::new(0),
        }
    }

    /// Last saved snapshot.
    pub fn snapshot(&self) -> Vec<Zone> {
        self.zones.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// How many times `save` was called.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ZoneStore for InMemoryZoneStore {
    fn load(&self) -> Result<Vec<Zone>, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, zones: &[Zone]) -> Result<(), StoreError> {
        *self.zones.lock().unwrap_or_else(PoisonError::into_inner) = zones.to_vec();
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }

    fn backup(&self) -> Result<Option<PathBuf>, StoreError> {
        Ok(None)
    }
}
