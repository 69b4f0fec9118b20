//! Protection gate consulted by the host before every potentially mutating world action.
//!
//! The host intercepts block breaks, block uses, item uses, entity uses and block
//! attacks, describes them as a [`WorldAction`] and asks [`ProtectionGate::check`].
//! A [`Decision::Deny`] must suppress the action; [`Decision::message`] gives the text
//! to show the actor. Actions performed with the selection tool are never intercepted.
use std::sync::Arc;
use crate::zone::{BlockPos, Zone, ZoneRegistry};

/// Kind of intercepted world action.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ActionKind {
    BlockBreak,
    BlockUse,
    ItemUse,
    EntityUse,
    BlockAttack,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldAction {
    pub kind: ActionKind,
    /// Position acted upon
    pub pos: BlockPos,
    /// World the action happens in
    pub world: String,
    /// The actor is holding the zone selection tool
    pub with_selection_tool: bool,
}

impl WorldAction {
    pub fn new(kind: ActionKind, pos: BlockPos, world: impl Into<String>) -> Self {
        Self { kind, pos, world: world.into(), with_selection_tool: false }
    }

    pub fn with_selection_tool(mut self) -> Self {
        self.with_selection_tool = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Blocked by `zone`, which belongs to somebody else
    Deny { zone: Zone },
}

impl Decision {
    pub fn is_denied(&self) -> bool {
        matches!(self, Decision::Deny { .. })
    }

    /// Text for the actor, `None` when the action is allowed.
    pub fn message(&self) -> Option<String> {
        match self {
            Decision::Allow => None,
            Decision::Deny { zone } => Some(format!(
                "This area is protected! Zone '{}' belongs to {}. Only the zone owner can perform actions here.",
                zone.name, zone.owner_name
            )),
        }
    }
}

/// Read-only view over the registry answering "may this actor act here?".
#[derive(Clone)]
pub struct ProtectionGate {
    registry: Arc<ZoneRegistry>,
}

impl ProtectionGate {
    pub fn new(registry: Arc<ZoneRegistry>) -> Self {
        Self { registry }
    }

    /// True iff a zone covers `pos` in `world` and `actor_id` does not own it.
    pub fn is_blocked(&self, actor_id: &str, pos: BlockPos, world: &str) -> bool {
        self.blocking_zone(actor_id, pos, world).is_some()
    }

    pub fn check(&self, actor_id: &str, action: &WorldAction) -> Decision {
        if action.with_selection_tool {
            return Decision::Allow;
        }

        match self.blocking_zone(actor_id, action.pos, &action.world) {
            Some(zone) => {
                log::debug!("Denied {:?} by {} at {} in zone '{}'", action.kind, actor_id, action.pos, zone.name);
                Decision::Deny { zone }
            }
            None => Decision::Allow,
        }
    }

    fn blocking_zone(&self, actor_id: &str, pos: BlockPos, world: &str) -> Option<Zone> {
        self.registry
            .find_zone_containing(pos, world)
            .filter(|zone| !zone.is_owner(actor_id))
    }
}
