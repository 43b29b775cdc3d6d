//! Collaborator contracts the application layer depends on.
//!
//! The host server, its world, and its connections are out of scope for this
//! crate.  They are reached only through the traits below, which the host
//! adapter implements (see `infrastructure::host` for the in-memory one).
//!
//! Every call returns a `Result`.  The engine never lets a [`PortError`]
//! escape a tick: it logs and falls back to the safe default for that call.

use std::time::Instant;

use bedrock_graves_core::protocol::{BlockEntityData, BlockState};
use bedrock_graves_core::{
    BlockPos, ClientboundPacket, GraveState, ObjectKey, Vec3, ViewerId, WorldId,
};
use thiserror::Error;

/// Failure reported by a collaborator.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PortError {
    #[error("viewer {0} is not connected")]
    ViewerGone(ViewerId),

    #[error("world {0} is not loaded")]
    WorldUnavailable(WorldId),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("host error: {0}")]
    Host(String),
}

/// Where a viewer is standing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerPose {
    pub viewer: ViewerId,
    /// Feet position.
    pub position: Vec3,
    /// Eye height above the feet.
    pub eye_height: f64,
}

impl ViewerPose {
    pub fn eye(&self) -> Vec3 {
        self.position.offset(0.0, self.eye_height, 0.0)
    }
}

/// Answers whether a viewer is a restricted (bridged) client.
#[cfg_attr(test, mockall::automock)]
pub trait CapabilityOracle: Send + Sync {
    fn is_restricted(&self, viewer: ViewerId) -> Result<bool, PortError>;
}

/// Per-viewer, fire-and-forget packet injection.
#[cfg_attr(test, mockall::automock)]
pub trait PacketSink: Send + Sync {
    fn send(&self, viewer: ViewerId, packet: ClientboundPacket) -> Result<(), PortError>;
}

/// Read-only view of the host world.
#[cfg_attr(test, mockall::automock)]
pub trait WorldView: Send + Sync {
    /// Every viewer currently in `world`.
    fn viewers_in(&self, world: &WorldId) -> Result<Vec<ViewerPose>, PortError>;

    /// Whether a visual ray from `from` to `to` reaches its end without
    /// hitting opaque geometry.  The block at `target` itself never counts as
    /// an obstruction.
    fn raycast_clear(
        &self,
        world: &WorldId,
        from: Vec3,
        to: Vec3,
        target: BlockPos,
    ) -> Result<bool, PortError>;

    /// The real block state at `key`.
    fn block_state(&self, key: &ObjectKey) -> Result<BlockState, PortError>;

    /// The real block-entity payload at `key`, if the block has one.
    fn block_entity_data(&self, key: &ObjectKey) -> Result<Option<BlockEntityData>, PortError>;
}

/// Read-only access to the grave mod's data.
#[cfg_attr(test, mockall::automock)]
pub trait GraveAccessor: Send + Sync {
    fn grave_state(&self, key: &ObjectKey) -> Result<GraveState, PortError>;
}

/// Whether a viewer currently has a grave GUI open.
#[cfg_attr(test, mockall::automock)]
pub trait GraveUiView: Send + Sync {
    fn is_viewing_grave_ui(&self, viewer: ViewerId) -> Result<bool, PortError>;
}

/// Monotonic time source.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}
