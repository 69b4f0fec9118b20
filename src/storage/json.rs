//! JSON-backed zone store.
//!
//! `JsonZoneStore` keeps the whole zone set in a single pretty-printed JSON array
//! (`<dir>/zones.json`). Each entry has exactly the keys
//! `id, name, owner, ownerName, world, minX, minY, minZ, maxX, maxY, maxZ, createdAt`.
//!
//! ### I/O characteristics
//! - `save` serializes into a temporary file next to the snapshot, syncs it, and renames
//!   it over `zones.json`. Readers see the old or the new file, never a torn one.
//! - `backup` copies the current snapshot to `zones_backup_<epoch-millis>.json`.
//! - Nothing here panics; every failure comes back as a [`StoreError`].
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use crate::storage::{StoreError, ZoneStore};
use crate::zone::{now_millis, Zone};

const ZONES_FILE: &str = "zones.json";

pub struct JsonZoneStore {
    /// Directory holding the snapshot and its backups
    dir: PathBuf,
    /// Path to the snapshot itself
    path: PathBuf,
}

impl JsonZoneStore {
    /// Opens a store rooted at `dir`, creating the directory when needed.
    ///
    /// A directory that cannot be created is only logged: later saves will report it.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(e) = fs::create_dir_all(&dir) {
            log::error!("Failed to create zone data directory {}: {}", dir.display(), e);
        }

        let path = dir.join(ZONES_FILE);
        Self { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn io_error(path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io { path: path.to_path_buf(), source }
    }
}

impl ZoneStore for JsonZoneStore {
    fn load(&self) -> Result<Vec<Zone>, StoreError> {
        if !self.exists() {
            log::info!("Zones file {} doesn't exist, starting with an empty set", self.path.display());
            return Ok(Vec::new());
        }

        let contents = fs::read(&self.path).map_err(|e| Self::io_error(&self.path, e))?;
        let zones: Vec<Zone> = serde_json::from_slice(&contents)
            .map_err(|source| StoreError::Malformed { path: self.path.clone(), source })?;

        log::info!("Loaded {} zones from {}", zones.len(), self.path.display());
        Ok(zones)
    }

    fn save(&self, zones: &[Zone]) -> Result<(), StoreError> {
        let contents = serde_json::to_vec_pretty(zones)?;

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| Self::io_error(&self.dir, e))?;
        tmp.write_all(&contents).map_err(|e| Self::io_error(tmp.path(), e))?;
        tmp.as_file().sync_all().map_err(|e| Self::io_error(tmp.path(), e))?;
        tmp.persist(&self.path).map_err(|e| Self::io_error(&self.path, e.error))?;

        log::debug!("Saved {} zones to {}", zones.len(), self.path.display());
        Ok(())
    }

    fn backup(&self) -> Result<Option<PathBuf>, StoreError> {
        if !self.exists() {
            return Ok(None);
        }

        let backup = self.dir.join(format!("zones_backup_{}.json", now_millis()));
        fs::copy(&self.path, &backup).map_err(|e| Self::io_error(&backup, e))?;

        log::info!("Created zone backup {}", backup.display());
        Ok(Some(backup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::{Actor, BlockPos, Region, ZoneId};

    fn zone(name: &str, a: (i32, i32, i32), b: (i32, i32, i32)) -> Zone {
        let alice = Actor::new("alice", "Alice");
        Zone::new(ZoneId::new(), name, &alice, "minecraft:overworld", Region::from_corners(a.into(), b.into()))
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonZoneStore::new(dir.path());
        assert!(!store.exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_preserves_order_and_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonZoneStore::new(dir.path());

        let zones = vec![
            zone("b", (0, 0, 0), (1, 1, 1)),
            zone("a", (10, 10, 10), (12, 12, 12)),
            zone("c", (-5, -5, -5), (-5, -5, -5)),
        ];
        store.save(&zones).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, zones);

        // and back again
        store.save(&loaded).unwrap();
        assert_eq!(store.load().unwrap(), zones);
    }

    #[test]
    fn save_leaves_no_temporary_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonZoneStore::new(dir.path());
        store.save(&[zone("a", (0, 0, 0), (1, 1, 1))]).unwrap();
        store.save(&[]).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![ZONES_FILE.to_string()]);
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonZoneStore::new(dir.path());
        fs::write(store.path(), b"{ not json").unwrap();

        match store.load() {
            Err(StoreError::Malformed { path, .. }) => assert_eq!(path, store.path()),
            other => panic!("expected StoreError::Malformed, got {:?}", other),
        }
    }

    #[test]
    fn reads_the_documented_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonZoneStore::new(dir.path());
        fs::write(
            store.path(),
            r#"[{
                "id": "6f1c8f5e-8a3b-4a57-9b3e-0f8d2a1c4e11",
                "name": "home",
                "owner": "alice",
                "ownerName": "Alice",
                "world": "minecraft:overworld",
                "minX": 0, "minY": 60, "minZ": 0,
                "maxX": 15, "maxY": 80, "maxZ": 15,
                "createdAt": 1719830400000
            }]"#,
        )
        .unwrap();

        let zones = store.load().unwrap();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].name, "home");
        assert_eq!(zones[0].owner_id, "alice");
        assert_eq!(zones[0].region.min(), BlockPos::new(0, 60, 0));
        assert_eq!(zones[0].volume(), 16 * 21 * 16);
        assert_eq!(zones[0].created_at, 1_719_830_400_000);
    }

    #[test]
    fn inverted_bounds_load_as_a_protecting_zone() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonZoneStore::new(dir.path());
        fs::write(
            store.path(),
            r#"[{
                "id": "6f1c8f5e-8a3b-4a57-9b3e-0f8d2a1c4e11",
                "name": "flipped",
                "owner": "alice",
                "ownerName": "Alice",
                "world": "w",
                "minX": 10, "minY": 10, "minZ": 10,
                "maxX": 0, "maxY": 0, "maxZ": 0,
                "createdAt": 0
            }]"#,
        )
        .unwrap();

        let zones = store.load().unwrap();
        assert!(zones[0].region.is_normalized());
        assert_eq!(zones[0].volume(), 11 * 11 * 11);
        assert!(zones[0].contains(BlockPos::new(5, 5, 5), "w"));

        // rewritten normalized
        store.save(&zones).unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.contains(r#""minX": 0"#), "{text}");
        assert!(text.contains(r#""maxX": 10"#), "{text}");
    }

    #[test]
    fn backup_copies_current_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonZoneStore::new(dir.path());
        assert!(store.backup().unwrap().is_none());

        store.save(&[zone("a", (0, 0, 0), (1, 1, 1))]).unwrap();
        let backup = store.backup().unwrap().expect("backup path");

        let name = backup.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("zones_backup_") && name.ends_with(".json"), "unexpected name {name}");
        assert_eq!(fs::read(&backup).unwrap(), fs::read(store.path()).unwrap());
    }

    #[test]
    fn save_into_missing_directory_fails_without_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonZoneStore::new(dir.path().join("gone"));
        fs::remove_dir(dir.path().join("gone")).unwrap();

        assert!(matches!(store.save(&[]), Err(StoreError::Io { .. })));
    }
}
