// src/zone/zone.rs
//! [`Zone`], [`ZoneId`] and the [`Actor`] that owns zones.
//!
use std::fmt::Display;
use std::time::{SystemTime, UNIX_EPOCH};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::zone::region::{BlockPos, Region};

/// A unique identifier for a zone, represented as a UUID.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneId(Uuid);

impl ZoneId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a textual id. Anything that is not a UUID can never name a zone.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(Self)
    }
}

impl Default for ZoneId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ZoneId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Somebody acting in the world: a stable id plus the name shown to other users.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Actor {
    pub id: String,
    pub name: String,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// A named, owned box in one world.
///
/// Serialized with the exact keys of the on-disk snapshot:
/// `id, name, owner, ownerName, world, minX..maxZ, createdAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    /// ID of the zone, assigned before approval and never changed afterwards
    pub id: ZoneId,
    /// Name chosen by the creator (unique per owner only)
    pub name: String,
    /// Id of the current owner
    #[serde(rename = "owner")]
    pub owner_id: String,
    /// Display name of the current owner
    pub owner_name: String,
    /// World the zone lives in
    pub world: String,
    /// Inclusive bounds
    #[serde(flatten)]
    pub region: Region,
    /// Creation time in milliseconds since the epoch
    pub created_at: i64,
}

impl Zone {
    pub fn new(id: ZoneId, name: &str, owner: &Actor, world: &str, region: Region) -> Self {
        Self {
            id,
            name: name.to_string(),
            owner_id: owner.id.clone(),
            owner_name: owner.name.clone(),
            world: world.to_string(),
            region,
            created_at: now_millis(),
        }
    }

    pub fn is_owner(&self, actor_id: &str) -> bool {
        self.owner_id == actor_id
    }

    pub fn contains(&self, pos: BlockPos, world: &str) -> bool {
        self.world == world && self.region.contains(pos)
    }

    /// Zones in different worlds never intersect, whatever their coordinates.
    pub fn intersects(&self, region: &Region, world: &str) -> bool {
        self.world == world && self.region.intersects(region)
    }

    pub fn volume(&self) -> u64 {
        self.region.volume()
    }

    pub(crate) fn set_owner(&mut self, owner_id: &str, owner_name: &str) {
        self.owner_id = owner_id.to_string();
        self.owner_name = owner_name.to_string();
    }
}

impl Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (x, y, z) = self.region.extents();
        write!(f, "Zone{{name='{}', owner='{}', size={}x{}x{}}}", self.name, self.owner_name, x, y, z)
    }
}

pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Zone {
        let alice = Actor::new("alice", "Alice");
        let region = Region::from_corners(BlockPos::new(0, 0, 0), BlockPos::new(10, 10, 10));
        Zone::new(ZoneId::new(), "home", &alice, "w", region)
    }

    #[test]
    fn parse_rejects_non_uuid_ids() {
        assert!(ZoneId::parse("abc").is_none());
        assert!(ZoneId::parse("").is_none());

        let id = ZoneId::new();
        assert_eq!(ZoneId::parse(&id.to_string()), Some(id));
        assert_eq!(ZoneId::parse(&format!("  {id} ")), Some(id));
    }

    #[test]
    fn containment_and_intersection_are_scoped_to_the_world() {
        let zone = sample();
        assert!(zone.contains(BlockPos::new(5, 5, 5), "w"));
        assert!(!zone.contains(BlockPos::new(5, 5, 5), "nether"));

        let overlapping = Region::from_corners(BlockPos::new(5, 5, 5), BlockPos::new(15, 15, 15));
        assert!(zone.intersects(&overlapping, "w"));
        assert!(!zone.intersects(&overlapping, "nether"));
    }

    #[test]
    fn snapshot_keys_match_the_file_format() {
        let zone = sample();
        let json = serde_json::to_value(&zone).unwrap();
        let obj = json.as_object().unwrap();

        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["createdAt", "id", "maxX", "maxY", "maxZ", "minX", "minY", "minZ", "name", "owner", "ownerName", "world"]
        );
        assert_eq!(obj["owner"], "alice");
        assert_eq!(obj["ownerName"], "Alice");
        assert_eq!(obj["id"], zone.id.to_string());

        let back: Zone = serde_json::from_value(json).unwrap();
        assert_eq!(back, zone);
    }

    #[test]
    fn set_owner_touches_only_owner_fields() {
        let mut zone = sample();
        let before = zone.clone();
        zone.set_owner("bob", "Bob");

        assert_eq!(zone.owner_id, "bob");
        assert_eq!(zone.owner_name, "Bob");
        assert_eq!(zone.id, before.id);
        assert_eq!(zone.name, before.name);
        assert_eq!(zone.world, before.world);
        assert_eq!(zone.region, before.region);
        assert_eq!(zone.created_at, before.created_at);
    }
}
