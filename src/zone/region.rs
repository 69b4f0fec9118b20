//! Block positions and the inclusive, axis-aligned boxes built from them.
//!
//! A [`Region`] is always normalized: each `min_*` is less than or equal to the
//! matching `max_*`. Both bounds are inclusive, so a region built from a single
//! point still covers exactly one block.
use std::fmt::Display;
use serde::{Deserialize, Serialize};

/// Integer position of a single block in a world.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl From<(i32, i32, i32)> for BlockPos {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self { x, y, z }
    }
}

impl Display for BlockPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Inclusive bounding box. Serialized flat as `minX .. maxZ`.
///
/// Deserialization normalizes: a stored box with `min > max` on some axis is read back
/// with those bounds swapped, so it keeps covering the same blocks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredRegion")]
pub struct Region {
    pub min_x: i32,
    pub min_y: i32,
    pub min_z: i32,
    pub max_x: i32,
    pub max_y: i32,
    pub max_z: i32,
}

impl Region {
    /// Builds the smallest region covering both corners, in any order.
    pub fn from_corners(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            min_z: a.z.min(b.z),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
            max_z: a.z.max(b.z),
        }
    }

    pub fn min(&self) -> BlockPos {
        BlockPos::new(self.min_x, self.min_y, self.min_z)
    }

    pub fn max(&self) -> BlockPos {
        BlockPos::new(self.max_x, self.max_y, self.max_z)
    }

    /// Per-axis size in blocks as `(x, y, z)`.
    pub fn extents(&self) -> (u64, u64, u64) {
        (
            extent(self.min_x, self.max_x),
            extent(self.min_y, self.max_y),
            extent(self.min_z, self.max_z),
        )
    }

    /// Number of blocks covered. Saturates instead of overflowing for huge boxes.
    pub fn volume(&self) -> u64 {
        let (x, y, z) = self.extents();
        x.saturating_mul(y).saturating_mul(z)
    }

    pub fn contains(&self, pos: BlockPos) -> bool {
        (self.min_x..=self.max_x).contains(&pos.x)
            && (self.min_y..=self.max_y).contains(&pos.y)
            && (self.min_z..=self.max_z).contains(&pos.z)
    }

    /// Closed-interval overlap on all three axes at once.
    pub fn intersects(&self, other: &Region) -> bool {
        let apart_x = self.max_x < other.min_x || self.min_x > other.max_x;
        let apart_y = self.max_y < other.min_y || self.min_y > other.max_y;
        let apart_z = self.max_z < other.min_z || self.min_z > other.max_z;

        !(apart_x || apart_y || apart_z)
    }

    /// `min <= max` on every axis.
    pub fn is_normalized(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y && self.min_z <= self.max_z
    }
}

/// Bounds exactly as found in a snapshot.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRegion {
    min_x: i32,
    min_y: i32,
    min_z: i32,
    max_x: i32,
    max_y: i32,
    max_z: i32,
}

impl From<StoredRegion> for Region {
    fn from(r: StoredRegion) -> Self {
        let region = Region::from_corners(
            BlockPos::new(r.min_x, r.min_y, r.min_z),
            BlockPos::new(r.max_x, r.max_y, r.max_z),
        );
        if r.min_x > r.max_x || r.min_y > r.max_y || r.min_z > r.max_z {
            log::warn!("Stored region has inverted bounds, normalized to {} .. {}", region.min(), region.max());
        }
        region
    }
}

#[inline]
fn extent(min: i32, max: i32) -> u64 {
    (i64::from(max) - i64::from(min) + 1).max(0) as u64
}
