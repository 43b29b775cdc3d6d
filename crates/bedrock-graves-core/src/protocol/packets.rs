//! Clientbound packets injected or rewritten by the shim.
//!
//! These mirror the subset of the host protocol the shim touches.  Turning
//! them into real wire bytes is the host adapter's job; inside this workspace
//! they are encoded with [`super::codec`] for the connection sink.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity_ids::EntityId;
use crate::domain::geometry::{BlockPos, Vec3};
use crate::domain::text::Text;
use crate::item::ItemStack;

// ── Entity building blocks ────────────────────────────────────────────────────

/// Entity types the shim spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityType {
    /// Carries the floating label.
    ArmorStand,
    /// Holds the display item in its mouth.
    Fox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentSlot {
    MainHand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusEffect {
    Invisibility,
}

/// Tracked entity flags sent in a metadata update.
///
/// Every flag is explicit so the cosmetic state of a synthetic entity never
/// depends on reaching into host internals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub invisible: bool,
    pub no_gravity: bool,
    pub silent: bool,
    pub custom_name: Option<Text>,
    pub custom_name_visible: bool,
    /// Armor stand: zero-size hitbox, not collidable.
    pub marker: bool,
    /// Armor stand: half-size model.
    pub small: bool,
    pub baby: bool,
    pub sitting: bool,
    pub ai_disabled: bool,
    pub invulnerable: bool,
}

impl EntityMetadata {
    pub fn builder() -> EntityMetadataBuilder {
        EntityMetadataBuilder::default()
    }
}

/// Builder for [`EntityMetadata`].
#[derive(Debug, Default)]
pub struct EntityMetadataBuilder {
    inner: EntityMetadata,
}

impl EntityMetadataBuilder {
    pub fn invisible(mut self, value: bool) -> Self {
        self.inner.invisible = value;
        self
    }

    pub fn no_gravity(mut self, value: bool) -> Self {
        self.inner.no_gravity = value;
        self
    }

    pub fn silent(mut self, value: bool) -> Self {
        self.inner.silent = value;
        self
    }

    /// Sets a visible floating name.
    pub fn name(mut self, name: Text) -> Self {
        self.inner.custom_name = Some(name);
        self.inner.custom_name_visible = true;
        self
    }

    pub fn marker(mut self, value: bool) -> Self {
        self.inner.marker = value;
        self
    }

    pub fn small(mut self, value: bool) -> Self {
        self.inner.small = value;
        self
    }

    pub fn baby(mut self, value: bool) -> Self {
        self.inner.baby = value;
        self
    }

    pub fn sitting(mut self, value: bool) -> Self {
        self.inner.sitting = value;
        self
    }

    pub fn ai_disabled(mut self, value: bool) -> Self {
        self.inner.ai_disabled = value;
        self
    }

    pub fn invulnerable(mut self, value: bool) -> Self {
        self.inner.invulnerable = value;
        self
    }

    pub fn build(self) -> EntityMetadata {
        self.inner
    }
}

// ── Block building blocks ─────────────────────────────────────────────────────

/// Registry id of the skeleton skull block used as the disguise.
pub const SKELETON_SKULL_BLOCK: &str = "minecraft:skeleton_skull";

/// Block-entity type of a skull.
pub const SKULL_BLOCK_ENTITY: &str = "minecraft:skull";

/// A block state: block id plus the rotation property skulls and signs use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockState {
    pub block: String,
    /// 0..16 sixteenths of a full turn, when the block has a rotation.
    pub rotation: Option<u8>,
}

impl BlockState {
    pub fn new(block: impl Into<String>) -> Self {
        Self {
            block: block.into(),
            rotation: None,
        }
    }

    /// A standing skeleton skull; `rotation` is reduced modulo 16.
    pub fn skeleton_skull(rotation: u8) -> Self {
        Self {
            block: SKELETON_SKULL_BLOCK.to_string(),
            rotation: Some(rotation % 16),
        }
    }
}

/// Opaque block-entity payload as produced by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEntityData {
    pub type_id: String,
    pub payload: Vec<u8>,
}

impl BlockEntityData {
    /// An empty skull block entity (no owner texture).
    pub fn skull() -> Self {
        Self {
            type_id: SKULL_BLOCK_ENTITY.to_string(),
            payload: Vec::new(),
        }
    }
}

// ── Packets ───────────────────────────────────────────────────────────────────

/// Packets flowing from the server to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientboundPacket {
    SpawnEntity {
        entity_id: EntityId,
        uuid: Uuid,
        entity_type: EntityType,
        position: Vec3,
        pitch: f32,
        yaw: f32,
    },
    EntityMetadata {
        entity_id: EntityId,
        metadata: EntityMetadata,
    },
    EntityEquipment {
        entity_id: EntityId,
        slot: EquipmentSlot,
        item: ItemStack,
    },
    EntityStatusEffect {
        entity_id: EntityId,
        effect: StatusEffect,
        amplifier: u8,
        /// Duration in ticks; `i32::MAX` is effectively permanent.
        duration_ticks: i32,
        ambient: bool,
        show_particles: bool,
        show_icon: bool,
    },
    DestroyEntities {
        entity_ids: Vec<EntityId>,
    },
    BlockUpdate {
        pos: BlockPos,
        state: BlockState,
    },
    BlockEntityUpdate {
        pos: BlockPos,
        data: BlockEntityData,
    },
    /// A single GUI slot changed.
    SlotUpdate {
        sync_id: i32,
        revision: i32,
        slot: i16,
        stack: ItemStack,
    },
    /// Full contents of an open GUI.
    InventoryContents {
        sync_id: i32,
        revision: i32,
        contents: Vec<ItemStack>,
        cursor: ItemStack,
    },
}

impl ClientboundPacket {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ClientboundPacket::SpawnEntity { .. } => "spawn_entity",
            ClientboundPacket::EntityMetadata { .. } => "entity_metadata",
            ClientboundPacket::EntityEquipment { .. } => "entity_equipment",
            ClientboundPacket::EntityStatusEffect { .. } => "entity_status_effect",
            ClientboundPacket::DestroyEntities { .. } => "destroy_entities",
            ClientboundPacket::BlockUpdate { .. } => "block_update",
            ClientboundPacket::BlockEntityUpdate { .. } => "block_entity_update",
            ClientboundPacket::SlotUpdate { .. } => "slot_update",
            ClientboundPacket::InventoryContents { .. } => "inventory_contents",
        }
    }
}
