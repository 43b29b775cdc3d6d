//! In-memory host world.
//!
//! Stands in for the game server: loaded worlds, viewer poses, grave blocks,
//! opaque obstructions, and open grave GUIs.  Implements the read-only ports
//! the engine needs, plus mutators that the binary and tests drive.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bedrock_graves_core::protocol::{BlockEntityData, BlockState};
use bedrock_graves_core::{
    BlockPos, GraveSnapshot, GraveState, ObjectKey, Vec3, ViewerId, WorldId,
};
use tracing::{debug, info};

use crate::application::deferred::TaskQueue;
use crate::application::ports::{
    GraveAccessor, GraveUiView, PortError, ViewerPose, WorldView,
};
use crate::application::retry::{run_with_retry, RetryPolicy};

/// Block id of a grave.
pub const GRAVE_BLOCK: &str = "universal_graves:grave";
/// Block-entity type of a grave.
pub const GRAVE_BLOCK_ENTITY: &str = "universal_graves:grave";
/// Block id of an obstruction.
pub const OBSTRUCTION_BLOCK: &str = "minecraft:stone";
pub const AIR_BLOCK: &str = "minecraft:air";

/// Standing eye height of a player.
pub const DEFAULT_EYE_HEIGHT: f64 = 1.62;

/// Spacing of the samples taken along a ray.
const RAY_STEP: f64 = 0.1;

#[derive(Debug, Default)]
struct HostState {
    worlds: HashSet<WorldId>,
    viewers: HashMap<ViewerId, (WorldId, ViewerPose)>,
    graves: HashMap<ObjectKey, GraveState>,
    obstructions: HashSet<ObjectKey>,
    open_grave_ui: HashSet<ViewerId>,
    fail_raycasts: bool,
}

/// A thread-safe in-memory world.
#[derive(Debug, Default)]
pub struct InMemoryWorld {
    state: RwLock<HostState>,
}

impl InMemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HostState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HostState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Worlds ────────────────────────────────────────────────────────────────

    pub fn load_world(&self, world: WorldId) {
        self.write().worlds.insert(world);
    }

    /// Unloads `world`.  Its graves stay stored but report `NotLoaded`.
    pub fn unload_world(&self, world: &WorldId) -> bool {
        self.write().worlds.remove(world)
    }

    pub fn is_loaded(&self, world: &WorldId) -> bool {
        self.read().worlds.contains(world)
    }

    // ── Viewers ───────────────────────────────────────────────────────────────

    /// Places `viewer` at `position` in `world`, replacing any previous pose.
    pub fn join(&self, viewer: ViewerId, world: WorldId, position: Vec3) {
        let pose = ViewerPose {
            viewer,
            position,
            eye_height: DEFAULT_EYE_HEIGHT,
        };
        self.write().viewers.insert(viewer, (world, pose));
    }

    /// Moves a joined viewer.  Returns `false` if the viewer is unknown.
    pub fn move_viewer(&self, viewer: ViewerId, position: Vec3) -> bool {
        match self.write().viewers.get_mut(&viewer) {
            Some((_, pose)) => {
                pose.position = position;
                true
            }
            None => false,
        }
    }

    pub fn leave(&self, viewer: ViewerId) {
        let mut state = self.write();
        state.viewers.remove(&viewer);
        state.open_grave_ui.remove(&viewer);
    }

    pub fn open_grave_ui(&self, viewer: ViewerId) {
        self.write().open_grave_ui.insert(viewer);
    }

    pub fn close_grave_ui(&self, viewer: ViewerId) {
        self.write().open_grave_ui.remove(&viewer);
    }

    // ── Blocks ────────────────────────────────────────────────────────────────

    /// Creates a live grave.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::WorldUnavailable`] if the grave's world is not
    /// loaded.
    pub fn place_grave(&self, key: ObjectKey, snapshot: GraveSnapshot) -> Result<(), PortError> {
        let mut state = self.write();
        if !state.worlds.contains(&key.world) {
            return Err(PortError::WorldUnavailable(key.world));
        }
        state.obstructions.remove(&key);
        state.graves.insert(key, GraveState::Live(snapshot));
        Ok(())
    }

    /// Replaces the stored state of an existing grave.  Returns `false` if
    /// there is no grave at `key`.
    pub fn set_grave_state(&self, key: &ObjectKey, grave: GraveState) -> bool {
        match self.write().graves.get_mut(key) {
            Some(slot) => {
                *slot = grave;
                true
            }
            None => false,
        }
    }

    /// Marks a grave as collected; the block stays until broken.
    pub fn mark_removed(&self, key: &ObjectKey) -> bool {
        self.set_grave_state(key, GraveState::Removed)
    }

    /// Replaces the block at `key` with air.
    ///
    /// A grave block is only replaced when its state permits removal.
    /// Returns whether the block was removed.
    pub fn break_block(&self, key: &ObjectKey) -> bool {
        let mut state = self.write();
        if let Some(grave) = state.graves.get(key) {
            if !grave.permits_block_removal() {
                debug!("refusing to break grave at {key}: grave is not removed");
                return false;
            }
            state.graves.remove(key);
            return true;
        }
        state.obstructions.remove(key)
    }

    pub fn add_obstruction(&self, key: ObjectKey) {
        self.write().obstructions.insert(key);
    }

    /// Keys of every stored grave, in a stable order.
    pub fn grave_keys(&self) -> Vec<ObjectKey> {
        let mut keys: Vec<ObjectKey> = self.read().graves.keys().cloned().collect();
        keys.sort_by(|a, b| {
            (&a.world, a.pos.x, a.pos.y, a.pos.z).cmp(&(&b.world, b.pos.x, b.pos.y, b.pos.z))
        });
        keys
    }

    /// Makes every raycast fail with a host error.
    pub fn set_fail_raycasts(&self, fail: bool) {
        self.write().fail_raycasts = fail;
    }
}

fn block_at(point: Vec3) -> BlockPos {
    BlockPos::new(
        point.x.floor() as i32,
        point.y.floor() as i32,
        point.z.floor() as i32,
    )
}

impl WorldView for InMemoryWorld {
    fn viewers_in(&self, world: &WorldId) -> Result<Vec<ViewerPose>, PortError> {
        let state = self.read();
        if !state.worlds.contains(world) {
            return Err(PortError::WorldUnavailable(world.clone()));
        }
        Ok(state
            .viewers
            .values()
            .filter(|(w, _)| w == world)
            .map(|(_, pose)| *pose)
            .collect())
    }

    fn raycast_clear(
        &self,
        world: &WorldId,
        from: Vec3,
        to: Vec3,
        target: BlockPos,
    ) -> Result<bool, PortError> {
        let state = self.read();
        if state.fail_raycasts {
            return Err(PortError::Host("raycast unavailable".into()));
        }
        if !state.worlds.contains(world) {
            return Err(PortError::WorldUnavailable(world.clone()));
        }

        let length = from.distance_sq(&to).sqrt();
        let steps = (length / RAY_STEP).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let t = f64::from(i) / f64::from(steps);
            let point = Vec3::new(
                from.x + (to.x - from.x) * t,
                from.y + (to.y - from.y) * t,
                from.z + (to.z - from.z) * t,
            );
            let pos = block_at(point);
            if pos == target {
                continue;
            }
            if state
                .obstructions
                .contains(&ObjectKey::new(world.clone(), pos))
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn block_state(&self, key: &ObjectKey) -> Result<BlockState, PortError> {
        let state = self.read();
        if !state.worlds.contains(&key.world) {
            return Err(PortError::WorldUnavailable(key.world.clone()));
        }
        let block = if state.graves.contains_key(key) {
            GRAVE_BLOCK
        } else if state.obstructions.contains(key) {
            OBSTRUCTION_BLOCK
        } else {
            AIR_BLOCK
        };
        Ok(BlockState::new(block))
    }

    fn block_entity_data(&self, key: &ObjectKey) -> Result<Option<BlockEntityData>, PortError> {
        let state = self.read();
        if !state.worlds.contains(&key.world) {
            return Err(PortError::WorldUnavailable(key.world.clone()));
        }
        Ok(state.graves.contains_key(key).then(|| BlockEntityData {
            type_id: GRAVE_BLOCK_ENTITY.to_string(),
            payload: Vec::new(),
        }))
    }
}

impl GraveAccessor for InMemoryWorld {
    fn grave_state(&self, key: &ObjectKey) -> Result<GraveState, PortError> {
        let state = self.read();
        if !state.worlds.contains(&key.world) {
            return Ok(GraveState::NotLoaded);
        }
        Ok(state.graves.get(key).cloned().unwrap_or(GraveState::Removed))
    }
}

impl GraveUiView for InMemoryWorld {
    fn is_viewing_grave_ui(&self, viewer: ViewerId) -> Result<bool, PortError> {
        Ok(self.read().open_grave_ui.contains(&viewer))
    }
}

/// Creates a grave now, retrying through `queue` while its world is not yet
/// available.
pub fn place_grave_with_retry(
    queue: &TaskQueue,
    world: Arc<InMemoryWorld>,
    key: ObjectKey,
    snapshot: GraveSnapshot,
    policy: RetryPolicy,
) {
    let name = format!("create grave at {key}");
    run_with_retry(queue, name, policy, move || {
        world.place_grave(key.clone(), snapshot.clone())?;
        info!("grave created at {key}");
        Ok(())
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn overworld() -> WorldId {
        WorldId::new("minecraft:overworld")
    }

    fn key(x: i32, y: i32, z: i32) -> ObjectKey {
        ObjectKey::new(overworld(), BlockPos::new(x, y, z))
    }

    fn loaded() -> InMemoryWorld {
        let world = InMemoryWorld::new();
        world.load_world(overworld());
        world
    }

    #[test]
    fn test_place_grave_requires_loaded_world() {
        // Arrange
        let world = InMemoryWorld::new();

        // Act
        let result = world.place_grave(key(0, 64, 0), GraveSnapshot::default());

        // Assert
        assert_eq!(result, Err(PortError::WorldUnavailable(overworld())));
    }

    #[test]
    fn test_grave_state_reports_not_loaded_for_unloaded_world() {
        let world = loaded();
        world
            .place_grave(key(0, 64, 0), GraveSnapshot::default())
            .expect("place");

        world.unload_world(&overworld());

        assert_eq!(
            world.grave_state(&key(0, 64, 0)),
            Ok(GraveState::NotLoaded)
        );
    }

    #[test]
    fn test_missing_grave_reports_removed() {
        let world = loaded();
        assert_eq!(world.grave_state(&key(5, 64, 5)), Ok(GraveState::Removed));
    }

    #[test]
    fn test_break_block_refuses_live_and_loading_graves() {
        // Arrange
        let world = loaded();
        world
            .place_grave(key(0, 64, 0), GraveSnapshot::default())
            .expect("place");

        // Act / Assert – live grave
        assert!(!world.break_block(&key(0, 64, 0)));

        // loading grave
        world.set_grave_state(&key(0, 64, 0), GraveState::NotLoaded);
        assert!(!world.break_block(&key(0, 64, 0)));

        // removed grave
        world.mark_removed(&key(0, 64, 0));
        assert!(world.break_block(&key(0, 64, 0)));
        assert!(world.grave_keys().is_empty());
    }

    #[test]
    fn test_raycast_blocked_by_obstruction_between_points() {
        let world = loaded();
        world.add_obstruction(key(5, 65, 0));

        let clear = world
            .raycast_clear(
                &overworld(),
                Vec3::new(10.5, 65.5, 0.5),
                Vec3::new(0.5, 65.5, 0.5),
                BlockPos::new(0, 64, 0),
            )
            .expect("raycast");

        assert!(!clear);
    }

    #[test]
    fn test_raycast_ignores_target_block() {
        let world = loaded();
        world.add_obstruction(key(0, 64, 0));

        let clear = world
            .raycast_clear(
                &overworld(),
                Vec3::new(10.5, 64.5, 0.5),
                Vec3::new(0.5, 64.5, 0.5),
                BlockPos::new(0, 64, 0),
            )
            .expect("raycast");

        assert!(clear);
    }

    #[test]
    fn test_viewers_in_filters_by_world() {
        let world = loaded();
        world.load_world(WorldId::new("minecraft:the_nether"));
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        world.join(a, overworld(), Vec3::new(0.0, 64.0, 0.0));
        world.join(b, WorldId::new("minecraft:the_nether"), Vec3::ZERO);

        let viewers = world.viewers_in(&overworld()).expect("viewers");

        assert_eq!(viewers.len(), 1);
        assert_eq!(viewers[0].viewer, a);
        assert_eq!(viewers[0].eye_height, DEFAULT_EYE_HEIGHT);
    }

    #[test]
    fn test_grave_block_has_block_entity() {
        let world = loaded();
        world
            .place_grave(key(0, 64, 0), GraveSnapshot::default())
            .expect("place");

        assert_eq!(
            world.block_state(&key(0, 64, 0)).expect("state").block,
            "universal_graves:grave"
        );
        assert!(world
            .block_entity_data(&key(0, 64, 0))
            .expect("data")
            .is_some());
        assert!(world
            .block_entity_data(&key(1, 64, 0))
            .expect("data")
            .is_none());
    }

    #[test]
    fn test_leave_closes_grave_ui() {
        let world = loaded();
        let viewer = Uuid::new_v4();
        world.join(viewer, overworld(), Vec3::ZERO);
        world.open_grave_ui(viewer);

        world.leave(viewer);

        assert_eq!(world.is_viewing_grave_ui(viewer), Ok(false));
    }

    #[test]
    fn test_place_grave_with_retry_succeeds_once_world_loads() {
        // Arrange – world not loaded yet
        let world = Arc::new(InMemoryWorld::new());
        let queue = TaskQueue::new();
        place_grave_with_retry(
            &queue,
            Arc::clone(&world),
            key(0, 64, 0),
            GraveSnapshot::default(),
            RetryPolicy::default(),
        );
        assert!(world.grave_keys().is_empty());

        // Act
        world.load_world(overworld());
        queue.drain();

        // Assert
        assert_eq!(world.grave_keys(), vec![key(0, 64, 0)]);
    }
}
