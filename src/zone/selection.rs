use crate::zone::region::{BlockPos, Region};

/// Which corner of a pending selection a point is written to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SelectionSlot {
    First,
    Second,
}

/// Two in-progress corner points of an actor. Never persisted.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct PendingSelection {
    pub first: Option<BlockPos>,
    pub second: Option<BlockPos>,
}

impl PendingSelection {
    pub fn set(&mut self, slot: SelectionSlot, pos: BlockPos) {
        match slot {
            SelectionSlot::First => self.first = Some(pos),
            SelectionSlot::Second => self.second = Some(pos),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.first.is_some() && self.second.is_some()
    }

    /// The normalized region, once both corners are known.
    pub fn region(&self) -> Option<Region> {
        match (self.first, self.second) {
            (Some(a), Some(b)) => Some(Region::from_corners(a, b)),
            _ => None,
        }
    }
}
