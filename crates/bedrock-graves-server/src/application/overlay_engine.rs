//! OverlayEngine: keeps every restricted viewer's view of nearby graves in sync.
//!
//! Bridged clients cannot render the grave block or its floating text, so for
//! each (viewer, grave) pair the engine fabricates, client-side only:
//!
//! - a **label** (invisible armor stand with the grave description as name),
//! - a **prop** (invisible baby fox holding the grave's first item),
//! - a **disguise** (the grave block replaced by a skeleton skull).
//!
//! # State machine (for beginners)
//!
//! ```text
//!            eligible                 ineligible < hide delay
//!  ABSENT ─────────────►  VISIBLE  ◄────────────────────────┐
//!    ▲                      │  │                            │
//!    │   ineligible > hide  │  └────────────────────────────┘
//!    └──────────────────────┘
//! ```
//!
//! Only VISIBLE is stored (as an [`OverlayRecord`]).  "About to disappear" is
//! derived on every evaluation from `now - last_seen`, which absorbs brief
//! occlusion without destroying and respawning entities.
//!
//! # Threading
//!
//! The engine is driven from the host tick thread and mutates its maps through
//! `&mut self`; there is no internal locking.  The capability cache it shares
//! with the GUI interceptor is the only cross-thread state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bedrock_graves_core::domain::label::{build_label, LabelFormat};
use bedrock_graves_core::protocol::synthetic::{self, OverlayGeometry};
use bedrock_graves_core::{
    ClientboundPacket, EntityId, EntityIdAllocator, GraveState, ItemStack, ObjectKey, RegionPos,
    Text, ViewerId, WorldId,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use super::capability::CapabilityCache;
use super::ports::{Clock, GraveAccessor, GraveUiView, PacketSink, ViewerPose, WorldView};
use super::sight;

/// Tunables of the engine.  Built from `[overlay]` and `[label]` config.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySettings {
    /// Evaluate visibility only on ticks divisible by this.
    pub update_period_ticks: u64,
    /// How long a viewer may stay ineligible before its overlay is removed.
    pub hide_delay: Duration,
    /// Entities older than this are destroyed and spawned afresh.
    pub respawn_interval: Duration,
    /// Minimum spacing between disguise re-sends to the same viewer.
    pub disguise_interval: Duration,
    pub max_distance: f64,
    /// Within this distance line of sight is not checked.
    pub grace_distance: f64,
    /// Ticks between spawning a prop and equipping it.
    pub equip_delay_ticks: u64,
    pub geometry: OverlayGeometry,
    pub label: LabelFormat,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            update_period_ticks: 5,
            hide_delay: Duration::from_millis(200),
            respawn_interval: Duration::from_secs(30),
            disguise_interval: Duration::from_millis(1000),
            max_distance: 48.0,
            grace_distance: 2.0,
            equip_delay_ticks: 2,
            geometry: OverlayGeometry::default(),
            label: LabelFormat::default(),
        }
    }
}

/// The collaborators the engine talks to.
#[derive(Clone)]
pub struct OverlayPorts {
    pub graves: Arc<dyn GraveAccessor>,
    pub world: Arc<dyn WorldView>,
    pub sink: Arc<dyn PacketSink>,
    pub ui: Arc<dyn GraveUiView>,
    pub clock: Arc<dyn Clock>,
}

/// What one viewer currently sees of one grave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayRecord {
    pub label_id: Option<EntityId>,
    pub prop_id: Option<EntityId>,
    /// World of the grave, kept for region and world invalidation.
    pub world: WorldId,
    pub last_spawn: Instant,
    pub last_seen: Instant,
    pub last_disguise: Instant,
}

impl OverlayRecord {
    /// Ids of the entities currently spawned for this record.
    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> {
        self.label_id.into_iter().chain(self.prop_id)
    }
}

/// Equip-after-delay for a freshly spawned prop.
#[derive(Debug, Clone)]
struct DelayedEquip {
    viewer: ViewerId,
    key: ObjectKey,
    entity_id: EntityId,
    item: Option<ItemStack>,
    due_tick: u64,
}

/// The overlay synchronization engine.
pub struct OverlayEngine {
    settings: OverlaySettings,
    ports: OverlayPorts,
    capability: Arc<CapabilityCache>,
    ids: EntityIdAllocator,
    rng: StdRng,
    records: HashMap<ViewerId, HashMap<ObjectKey, OverlayRecord>>,
    delayed: Vec<DelayedEquip>,
}

impl OverlayEngine {
    pub fn new(
        settings: OverlaySettings,
        ports: OverlayPorts,
        capability: Arc<CapabilityCache>,
    ) -> Self {
        Self {
            settings,
            ports,
            capability,
            ids: EntityIdAllocator::new(),
            rng: StdRng::from_entropy(),
            records: HashMap::new(),
            delayed: Vec::new(),
        }
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    // ── Tick entry points ─────────────────────────────────────────────────────

    /// Called once per host tick; delivers every delayed equip that is due.
    pub fn on_host_tick(&mut self, tick: u64) {
        if self.delayed.is_empty() {
            return;
        }
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.delayed)
            .into_iter()
            .partition(|action| action.due_tick <= tick);
        self.delayed = pending;

        for action in due {
            trace!(
                "equipping prop {} for {} at {}",
                action.entity_id,
                action.viewer,
                action.key
            );
            self.send_all(
                action.viewer,
                synthetic::equip_and_hide(action.entity_id, action.item.as_ref()),
            );
        }
    }

    /// Evaluates one grave for every viewer in its world.
    ///
    /// A removed or unloaded grave is purged on every call; visibility is
    /// evaluated only on ticks that are a multiple of the update period.
    pub fn evaluate(&mut self, key: &ObjectKey, tick: u64) {
        if !self.capability.is_enabled() {
            return;
        }

        let snapshot = match self.ports.graves.grave_state(key) {
            Ok(GraveState::Live(snapshot)) => snapshot,
            Ok(GraveState::Removed) | Ok(GraveState::NotLoaded) => {
                if self.is_tracked(key) {
                    let purged = self.purge_object(key, true);
                    debug!("grave at {key} is gone; purged {purged} overlay(s)");
                }
                return;
            }
            Err(e) => {
                debug!("grave lookup at {key} failed: {e}; skipping this tick");
                return;
            }
        };

        if tick % self.settings.update_period_ticks.max(1) != 0 {
            return;
        }

        let viewers = match self.ports.world.viewers_in(&key.world) {
            Ok(viewers) => viewers,
            Err(e) => {
                debug!("listing viewers of {} failed: {e}", key.world);
                return;
            }
        };

        let now = self.ports.clock.now();
        let label = build_label(&snapshot, &self.settings.label);
        let display = snapshot.display_item();
        let mut any_eligible = false;

        for pose in &viewers {
            if self.is_eligible(pose, key) {
                any_eligible = true;
                self.show(pose.viewer, key, &label, display, now, tick);
            } else {
                self.hide_if_stale(pose.viewer, key, now);
            }
        }

        // Viewers that left the world age out like any other ineligible viewer.
        let departed: Vec<ViewerId> = self
            .records
            .iter()
            .filter(|(viewer, by_key)| {
                by_key.contains_key(key) && !viewers.iter().any(|p| p.viewer == **viewer)
            })
            .map(|(viewer, _)| *viewer)
            .collect();
        for viewer in departed {
            self.hide_if_stale(viewer, key, now);
        }

        if !any_eligible {
            self.reveal_real_block(key, &viewers);
        }
    }

    // ── Lifecycle events ──────────────────────────────────────────────────────

    /// Forgets everything about a disconnected viewer.  Sends nothing.
    pub fn remove_viewer(&mut self, viewer: ViewerId) {
        let dropped = self.records.remove(&viewer).map_or(0, |by_key| by_key.len());
        self.delayed.retain(|action| action.viewer != viewer);
        self.capability.forget(viewer);
        debug!("viewer {viewer} disconnected; dropped {dropped} overlay record(s)");
    }

    /// The grave at `key` was destroyed: tear down every overlay of it and
    /// show restricted viewers the real block again.
    pub fn object_destroyed(&mut self, key: &ObjectKey) {
        let purged = self.purge_object(key, true);
        info!("grave at {key} destroyed; removed {purged} overlay(s)");
    }

    /// Drops every overlay inside an unloaded chunk column.
    pub fn region_unloaded(&mut self, region: &RegionPos) -> usize {
        let purged = self.purge_where(|key, record| {
            record.world == region.world && key.pos.chunk() == (region.chunk_x, region.chunk_z)
        });
        if purged > 0 {
            debug!(
                "region ({}, {}) of {} unloaded; dropped {purged} overlay(s)",
                region.chunk_x, region.chunk_z, region.world
            );
        }
        purged
    }

    /// Drops every overlay in an unloaded world.
    pub fn world_unloaded(&mut self, world: &WorldId) -> usize {
        let purged = self.purge_where(|_, record| &record.world == world);
        if purged > 0 {
            debug!("world {world} unloaded; dropped {purged} overlay(s)");
        }
        purged
    }

    // ── Introspection ─────────────────────────────────────────────────────────

    pub fn record(&self, viewer: ViewerId, key: &ObjectKey) -> Option<&OverlayRecord> {
        self.records.get(&viewer)?.get(key)
    }

    pub fn records_for(&self, viewer: ViewerId) -> Vec<(&ObjectKey, &OverlayRecord)> {
        self.records
            .get(&viewer)
            .map(|by_key| by_key.iter().collect())
            .unwrap_or_default()
    }

    /// Total number of (viewer, grave) records.
    pub fn tracked_pairs(&self) -> usize {
        self.records.values().map(HashMap::len).sum()
    }

    pub fn pending_delayed_actions(&self) -> usize {
        self.delayed.len()
    }

    fn is_tracked(&self, key: &ObjectKey) -> bool {
        self.records.values().any(|by_key| by_key.contains_key(key))
    }

    // ── Eligibility ───────────────────────────────────────────────────────────

    fn is_eligible(&self, pose: &ViewerPose, key: &ObjectKey) -> bool {
        if !self.capability.is_restricted(pose.viewer) {
            return false;
        }

        let distance_sq = pose.position.distance_sq(&key.pos.center());
        if distance_sq > self.settings.max_distance.powi(2) {
            return false;
        }
        if distance_sq <= self.settings.grace_distance.powi(2) {
            return true;
        }

        if sight::has_line_of_sight(
            self.ports.world.as_ref(),
            key,
            pose.eye(),
            self.settings.geometry.label_offset_y,
        ) {
            return true;
        }

        match self.ports.ui.is_viewing_grave_ui(pose.viewer) {
            Ok(viewing) => viewing,
            Err(e) => {
                debug!("grave UI lookup for {} failed: {e}", pose.viewer);
                false
            }
        }
    }

    // ── Show / hide ───────────────────────────────────────────────────────────

    fn show(
        &mut self,
        viewer: ViewerId,
        key: &ObjectKey,
        label: &Text,
        display: Option<&ItemStack>,
        now: Instant,
        tick: u64,
    ) {
        let existing = self.record(viewer, key).cloned();

        let needs_disguise = existing.as_ref().map_or(true, |record| {
            now.saturating_duration_since(record.last_disguise) > self.settings.disguise_interval
        });
        if needs_disguise {
            let rotation = self.rng.gen_range(0..16u8);
            self.send_all(viewer, synthetic::disguise(key.pos, rotation));
        }

        let record = match existing {
            None => {
                let label_id = self.spawn_label(viewer, key, label.clone());
                let prop_id = self.spawn_prop(viewer, key, display, tick);
                debug!("overlay created for {viewer} at {key}");
                OverlayRecord {
                    label_id: Some(label_id),
                    prop_id: Some(prop_id),
                    world: key.world.clone(),
                    last_spawn: now,
                    last_seen: now,
                    last_disguise: now,
                }
            }
            Some(mut record) => {
                if now.saturating_duration_since(record.last_spawn) > self.settings.respawn_interval
                {
                    self.cancel_delayed(viewer, key);
                    self.destroy_entities(viewer, &record);
                    record.label_id = Some(self.spawn_label(viewer, key, label.clone()));
                    record.prop_id = Some(self.spawn_prop(viewer, key, display, tick));
                    record.last_spawn = now;
                    trace!("overlay respawned for {viewer} at {key}");
                } else {
                    match record.label_id {
                        Some(id) => self.send(viewer, synthetic::update_label(id, label.clone())),
                        None => {
                            record.label_id = Some(self.spawn_label(viewer, key, label.clone()))
                        }
                    }
                    match record.prop_id {
                        Some(id) => self.send_all(viewer, synthetic::equip_and_hide(id, display)),
                        None => record.prop_id = Some(self.spawn_prop(viewer, key, display, tick)),
                    }
                }
                record.last_seen = now;
                if needs_disguise {
                    record.last_disguise = now;
                }
                record
            }
        };

        self.records
            .entry(viewer)
            .or_default()
            .insert(key.clone(), record);
    }

    fn hide_if_stale(&mut self, viewer: ViewerId, key: &ObjectKey, now: Instant) {
        let hide_delay = self.settings.hide_delay;
        let removed = match self.records.get_mut(&viewer) {
            Some(by_key) => {
                let stale = by_key.get(key).map_or(false, |record| {
                    now.saturating_duration_since(record.last_seen) > hide_delay
                });
                if stale {
                    by_key.remove(key)
                } else {
                    None
                }
            }
            None => None,
        };
        let Some(record) = removed else {
            return;
        };

        self.drop_if_empty(viewer);
        self.cancel_delayed(viewer, key);
        self.destroy_entities(viewer, &record);
        debug!("overlay hidden for {viewer} at {key}");
    }

    /// Sends the real block (and block entity) to every restricted viewer in
    /// `viewers`.
    fn reveal_real_block(&self, key: &ObjectKey, viewers: &[ViewerPose]) {
        let restricted: Vec<ViewerId> = viewers
            .iter()
            .map(|pose| pose.viewer)
            .filter(|viewer| self.capability.is_restricted(*viewer))
            .collect();
        if restricted.is_empty() {
            return;
        }

        let state = match self.ports.world.block_state(key) {
            Ok(state) => state,
            Err(e) => {
                debug!("cannot read real block at {key}: {e}");
                return;
            }
        };
        let block_entity = match self.ports.world.block_entity_data(key) {
            Ok(data) => data,
            Err(e) => {
                debug!("cannot read block entity at {key}: {e}");
                None
            }
        };

        for viewer in restricted {
            self.send_all(
                viewer,
                synthetic::revert(key.pos, state.clone(), block_entity.clone()),
            );
        }
    }

    // ── Purging ───────────────────────────────────────────────────────────────

    /// Removes every record of `key`, destroying its entities; optionally
    /// reverts the block for restricted viewers in the world.
    fn purge_object(&mut self, key: &ObjectKey, revert: bool) -> usize {
        let purged = self.purge_where(|candidate, _| candidate == key);
        if revert {
            match self.ports.world.viewers_in(&key.world) {
                Ok(viewers) => self.reveal_real_block(key, &viewers),
                Err(e) => debug!("cannot revert {key}: {e}"),
            }
        }
        purged
    }

    fn purge_where<P>(&mut self, predicate: P) -> usize
    where
        P: Fn(&ObjectKey, &OverlayRecord) -> bool,
    {
        let sink = Arc::clone(&self.ports.sink);
        let mut removed: Vec<(ViewerId, ObjectKey)> = Vec::new();

        for (viewer, by_key) in self.records.iter_mut() {
            by_key.retain(|key, record| {
                if !predicate(key, record) {
                    return true;
                }
                deliver(
                    sink.as_ref(),
                    *viewer,
                    synthetic::destroy(record.entity_ids()),
                );
                removed.push((*viewer, key.clone()));
                false
            });
        }
        self.records.retain(|_, by_key| !by_key.is_empty());
        self.delayed.retain(|action| {
            !removed
                .iter()
                .any(|(viewer, key)| *viewer == action.viewer && *key == action.key)
        });
        removed.len()
    }

    fn cancel_delayed(&mut self, viewer: ViewerId, key: &ObjectKey) {
        self.delayed
            .retain(|action| !(action.viewer == viewer && &action.key == key));
    }

    fn drop_if_empty(&mut self, viewer: ViewerId) {
        if self.records.get(&viewer).is_some_and(HashMap::is_empty) {
            self.records.remove(&viewer);
        }
    }

    // ── Entity fabrication ────────────────────────────────────────────────────

    fn spawn_label(&mut self, viewer: ViewerId, key: &ObjectKey, label: Text) -> EntityId {
        let id = self.ids.next();
        self.send_all(
            viewer,
            synthetic::spawn_label(id, key.pos, label, &self.settings.geometry),
        );
        id
    }

    fn spawn_prop(
        &mut self,
        viewer: ViewerId,
        key: &ObjectKey,
        display: Option<&ItemStack>,
        tick: u64,
    ) -> EntityId {
        let id = self.ids.next();
        self.send_all(
            viewer,
            synthetic::spawn_prop(id, key.pos, &self.settings.geometry),
        );
        self.delayed.push(DelayedEquip {
            viewer,
            key: key.clone(),
            entity_id: id,
            item: display.cloned(),
            due_tick: tick + self.settings.equip_delay_ticks,
        });
        id
    }

    fn destroy_entities(&self, viewer: ViewerId, record: &OverlayRecord) {
        deliver(
            self.ports.sink.as_ref(),
            viewer,
            synthetic::destroy(record.entity_ids()),
        );
    }

    // ── Sending ───────────────────────────────────────────────────────────────

    fn send(&self, viewer: ViewerId, packet: ClientboundPacket) {
        deliver(self.ports.sink.as_ref(), viewer, packet);
    }

    fn send_all(&self, viewer: ViewerId, packets: Vec<ClientboundPacket>) {
        for packet in packets {
            self.send(viewer, packet);
        }
    }
}

/// Fire-and-forget send; failures are logged and swallowed.
fn deliver(sink: &dyn PacketSink, viewer: ViewerId, packet: ClientboundPacket) {
    if let ClientboundPacket::DestroyEntities { entity_ids } = &packet {
        if entity_ids.is_empty() {
            return;
        }
    }
    let name = packet.name();
    if let Err(e) = sink.send(viewer, packet) {
        debug!("dropping {name} for {viewer}: {e}");
    }
}
