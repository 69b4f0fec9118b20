// src/zone/registry.rs
//! [`ZoneRegistry`]: the authoritative zone set and everybody's pending selections.
//!
//! ### Locking
//! - `zones` is the single critical section for *read current set / validate / mutate /
//!   persist*. Creation commits and ownership changes both run entirely inside it, and the
//!   snapshot is written before the lock is released.
//! - `selections` is a separate, short-lived lock. It is never taken while waiting for
//!   `zones`.
//! - No lock is held across an `.await`. The approval call in [`ZoneRegistry::create_zone`]
//!   runs unlocked, so the commit re-validates against the set as it is *then*.
//! - Poisoned locks are recovered; the data behind them is plain values that stay
//!   consistent between statements.
//!
//! Lookups are a linear scan over all zones. Zone counts are small (tens to low hundreds
//! per world); a per-world grid could replace the scan behind the same methods.
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use crate::approval::{ApprovalRequest, ApprovalService};
use crate::errors::RegistryError;
use crate::storage::ZoneStore;
use crate::zone::region::{BlockPos, Region};
use crate::zone::selection::{PendingSelection, SelectionSlot};
use crate::zone::zone::{Actor, Zone, ZoneId};

/// Longest zone name accepted, in characters.
pub const MAX_NAME_LEN: usize = 32;

pub struct ZoneRegistry {
    zones: Mutex<Vec<Zone>>,
    selections: Mutex<HashMap<String, PendingSelection>>,
    store: Arc<dyn ZoneStore>,
    approval: Arc<dyn ApprovalService>,
}

impl ZoneRegistry {
    /// Creates a registry seeded from `store`.
    ///
    /// A snapshot that cannot be read is logged and the registry starts empty.
    pub fn open(store: Arc<dyn ZoneStore>, approval: Arc<dyn ApprovalService>) -> Self {
        let zones = match store.load() {
            Ok(zones) => zones,
            Err(e) => {
                log::error!("Failed to load zones, starting with an empty set: {}", e);
                Vec::new()
            }
        };

        Self {
            zones: Mutex::new(zones),
            selections: Mutex::new(HashMap::new()),
            store,
            approval,
        }
    }

    fn lock_zones(&self) -> MutexGuard<'_, Vec<Zone>> {
        self.zones.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_selections(&self) -> MutexGuard<'_, HashMap<String, PendingSelection>> {
        self.selections.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ---------- Pending selections ----------

    /// Records one corner of `actor_id`'s selection, replacing any previous value.
    pub fn set_point(&self, actor_id: &str, slot: SelectionSlot, pos: BlockPos) {
        self.lock_selections()
            .entry(actor_id.to_string())
            .or_default()
            .set(slot, pos);
    }

    pub fn selection(&self, actor_id: &str) -> Option<PendingSelection> {
        self.lock_selections().get(actor_id).copied()
    }

    pub fn has_selection(&self, actor_id: &str) -> bool {
        self.selection(actor_id).is_some_and(|s| s.is_complete())
    }

    pub fn clear_selection(&self, actor_id: &str) {
        self.lock_selections().remove(actor_id);
    }

    // Corners picked while the approval call was in flight belong to the next zone.
    fn clear_selection_if_unchanged(&self, actor_id: &str, used: &PendingSelection) {
        let mut selections = self.lock_selections();
        if selections.get(actor_id) == Some(used) {
            selections.remove(actor_id);
        }
    }

    // ---------- Queries ----------

    /// The first zone, in stored order, covering `pos` in `world`.
    pub fn find_zone_containing(&self, pos: BlockPos, world: &str) -> Option<Zone> {
        self.lock_zones().iter().find(|z| z.contains(pos, world)).cloned()
    }

    /// The first zone in `world` overlapping `region`.
    pub fn find_intersecting(&self, region: &Region, world: &str) -> Option<Zone> {
        first_intersecting(&self.lock_zones(), region, world).cloned()
    }

    pub fn zones_owned_by(&self, actor_id: &str) -> Vec<Zone> {
        self.lock_zones().iter().filter(|z| z.is_owner(actor_id)).cloned().collect()
    }

    pub fn zone_by_owner_and_name(&self, actor_id: &str, name: &str) -> Option<Zone> {
        self.lock_zones()
            .iter()
            .find(|z| z.is_owner(actor_id) && z.name == name)
            .cloned()
    }

    pub fn zone(&self, id: &ZoneId) -> Option<Zone> {
        self.lock_zones().iter().find(|z| z.id == *id).cloned()
    }

    /// Copy of the full zone set in stored order.
    pub fn zones(&self) -> Vec<Zone> {
        self.lock_zones().clone()
    }

    pub fn len(&self) -> usize {
        self.lock_zones().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ---------- Mutations ----------

    /// Turns `actor`'s pending selection into a zone named `name` in `world`.
    ///
    /// Checks run in order: selection present, name length, name unused by this owner,
    /// no overlap in `world`, then external approval. Nothing is stored unless every
    /// check passes. Overlap and name are checked again at commit time, since other
    /// creations may have landed while the approval call was in flight.
    pub async fn create_zone(&self, name: &str, actor: &Actor, world: &str) -> Result<Zone, RegistryError> {
        let selection = self.selection(&actor.id).ok_or(RegistryError::NoSelection)?;
        let region = selection.region().ok_or(RegistryError::NoSelection)?;

        let name_len = name.chars().count();
        if name_len == 0 || name_len > MAX_NAME_LEN {
            return Err(RegistryError::InvalidName { max: MAX_NAME_LEN });
        }

        {
            let zones = self.lock_zones();
            check_candidate(&zones, name, &actor.id, &region, world)?;
        }

        let zone_id = ZoneId::new();
        let request = ApprovalRequest::for_zone(name, actor, zone_id);

        log::info!("Requesting approval for zone '{}' ({}) of {}", name, zone_id, actor.name);
        if let Err(e) = self.approval.approve(&request).await {
            log::warn!("Approval for zone '{}' ({}) failed: {}", name, zone_id, e);
            return Err(e.into());
        }

        let zone = Zone::new(zone_id, name, actor, world, region);
        {
            let mut zones = self.lock_zones();
            if let Err(e) = check_candidate(&zones, name, &actor.id, &region, world) {
                log::warn!("Zone '{}' ({}) was approved but lost the race at commit: {}", name, zone_id, e);
                return Err(e);
            }

            zones.push(zone.clone());
            self.persist(&zones);
        }

        self.clear_selection_if_unchanged(&actor.id, &selection);

        log::info!("Created {} ({}) in {}", zone, zone.id, zone.world);
        Ok(zone)
    }

    /// Reassigns the owner of zone `id`. Only owner id and name change.
    pub fn change_owner(&self, id: &ZoneId, new_owner_id: &str, new_owner_name: &str) -> Result<Zone, RegistryError> {
        let mut zones = self.lock_zones();
        let Some(zone) = zones.iter_mut().find(|z| z.id == *id) else {
            log::info!("Ownership change for unknown zone {}", id);
            return Err(RegistryError::NotFound);
        };

        let previous = std::mem::take(&mut zone.owner_id);
        zone.set_owner(new_owner_id, new_owner_name);
        let updated = zone.clone();

        self.persist(&zones);

        log::info!("Zone '{}' ({}) changed owner from {} to {}", updated.name, id, previous, new_owner_id);
        Ok(updated)
    }

    /// Best-effort copy of the current snapshot. Failures are logged.
    pub fn backup(&self) -> Option<PathBuf> {
        match self.store.backup() {
            Ok(path) => path,
            Err(e) => {
                log::error!("Failed to create zone backup: {}", e);
                None
            }
        }
    }

    // Saves while the caller still holds the zone lock. A failed save leaves memory ahead of disk.
    fn persist(&self, zones: &[Zone]) {
        if let Err(e) = self.store.save(zones) {
            log::error!("Failed to save {} zones: {}", zones.len(), e);
        }
    }
}

fn first_intersecting<'a>(zones: &'a [Zone], region: &Region, world: &str) -> Option<&'a Zone> {
    zones.iter().find(|z| z.intersects(region, world))
}

fn check_candidate(zones: &[Zone], name: &str, owner_id: &str, region: &Region, world: &str) -> Result<(), RegistryError> {
    if zones.iter().any(|z| z.is_owner(owner_id) && z.name == name) {
        return Err(RegistryError::DuplicateName(name.to_string()));
    }

    if let Some(existing) = first_intersecting(zones, region, world) {
        return Err(RegistryError::Overlap {
            zone: existing.name.clone(),
            owner: existing.owner_name.clone(),
        });
    }

    Ok(())
}
