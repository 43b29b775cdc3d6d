//! Builders for the packets that fabricate and tear down an overlay.
//!
//! An overlay is two client-only entities standing in for a grave block:
//!
//! - a **label**: an invisible marker armor stand whose custom name is the
//!   multi-line grave description;
//! - a **prop**: an invisible, silent, sitting baby fox holding the grave's
//!   display item in its mouth.
//!
//! The grave block itself is *disguised* as a skeleton skull while an overlay
//! is visible and *reverted* to the real block state otherwise.
//!
//! Every function here is pure apart from the random entity UUIDs; nothing is
//! sent.  The engine decides when and to whom.

use uuid::Uuid;

use super::entity_ids::EntityId;
use super::packets::{
    BlockEntityData, BlockState, ClientboundPacket, EntityMetadata, EntityType, EquipmentSlot,
    StatusEffect,
};
use crate::domain::geometry::{BlockPos, Vec3};
use crate::domain::text::Text;
use crate::item::{ItemKind, ItemStack};

/// Lifts the label just clear of the grave's top face.
pub const LABEL_EPSILON: f64 = 0.01;

/// Effect duration meaning "until removed".
pub const INFINITE_DURATION: i32 = i32::MAX;

/// Placement of the overlay entities relative to the grave block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayGeometry {
    /// Label height above the block centre.
    pub label_offset_y: f64,
    /// Prop offset from the block's bottom centre.
    pub prop_offset: Vec3,
}

impl Default for OverlayGeometry {
    fn default() -> Self {
        Self {
            label_offset_y: 1.0,
            prop_offset: Vec3::new(0.45, -0.14, 0.0),
        }
    }
}

impl OverlayGeometry {
    pub fn label_position(&self, pos: BlockPos) -> Vec3 {
        pos.center().offset(0.0, self.label_offset_y + LABEL_EPSILON, 0.0)
    }

    pub fn prop_position(&self, pos: BlockPos) -> Vec3 {
        Vec3::new(
            pos.x as f64 + 0.5 + self.prop_offset.x,
            pos.y as f64 + self.prop_offset.y,
            pos.z as f64 + 0.5 + self.prop_offset.z,
        )
    }
}

// ── Label ─────────────────────────────────────────────────────────────────────

fn label_metadata(text: Text) -> EntityMetadata {
    EntityMetadata::builder()
        .invisible(true)
        .no_gravity(true)
        .marker(true)
        .small(false)
        .name(text)
        .build()
}

/// Spawn + metadata for a new label.
pub fn spawn_label(
    entity_id: EntityId,
    pos: BlockPos,
    text: Text,
    geometry: &OverlayGeometry,
) -> Vec<ClientboundPacket> {
    vec![
        ClientboundPacket::SpawnEntity {
            entity_id,
            uuid: Uuid::new_v4(),
            entity_type: EntityType::ArmorStand,
            position: geometry.label_position(pos),
            pitch: 0.0,
            yaw: 0.0,
        },
        ClientboundPacket::EntityMetadata {
            entity_id,
            metadata: label_metadata(text),
        },
    ]
}

/// Metadata-only refresh of an existing label's text.
pub fn update_label(entity_id: EntityId, text: Text) -> ClientboundPacket {
    ClientboundPacket::EntityMetadata {
        entity_id,
        metadata: label_metadata(text),
    }
}

// ── Prop ──────────────────────────────────────────────────────────────────────

fn prop_metadata() -> EntityMetadata {
    EntityMetadata::builder()
        .invisible(true)
        .no_gravity(true)
        .ai_disabled(true)
        .invulnerable(true)
        .sitting(true)
        .silent(true)
        .baby(true)
        .build()
}

/// Spawn + metadata for a new prop.  Equipment follows later, see
/// [`equip_and_hide`].
pub fn spawn_prop(
    entity_id: EntityId,
    pos: BlockPos,
    geometry: &OverlayGeometry,
) -> Vec<ClientboundPacket> {
    vec![
        ClientboundPacket::SpawnEntity {
            entity_id,
            uuid: Uuid::new_v4(),
            entity_type: EntityType::Fox,
            position: geometry.prop_position(pos),
            pitch: 0.0,
            yaw: 0.0,
        },
        ClientboundPacket::EntityMetadata {
            entity_id,
            metadata: prop_metadata(),
        },
    ]
}

/// The item a prop holds: a single copy of the display item, or a compass
/// when the grave has nothing to show.
pub fn held_item(display: Option<&ItemStack>) -> ItemStack {
    match display {
        Some(stack) if !stack.is_empty() => stack.single(),
        _ => ItemStack::new(ItemKind::Compass, 1),
    }
}

/// Main-hand equipment plus a permanent, hidden invisibility effect.
pub fn equip_and_hide(entity_id: EntityId, display: Option<&ItemStack>) -> Vec<ClientboundPacket> {
    vec![
        ClientboundPacket::EntityEquipment {
            entity_id,
            slot: EquipmentSlot::MainHand,
            item: held_item(display),
        },
        ClientboundPacket::EntityStatusEffect {
            entity_id,
            effect: StatusEffect::Invisibility,
            amplifier: 0,
            duration_ticks: INFINITE_DURATION,
            ambient: true,
            show_particles: false,
            show_icon: false,
        },
    ]
}

// ── Teardown and block appearance ─────────────────────────────────────────────

/// Destroys every given entity in one packet.
pub fn destroy(entity_ids: impl IntoIterator<Item = EntityId>) -> ClientboundPacket {
    ClientboundPacket::DestroyEntities {
        entity_ids: entity_ids.into_iter().collect(),
    }
}

/// Replaces the grave block with a skeleton skull facing `rotation`
/// (sixteenths of a turn).
pub fn disguise(pos: BlockPos, rotation: u8) -> Vec<ClientboundPacket> {
    vec![
        ClientboundPacket::BlockUpdate {
            pos,
            state: BlockState::skeleton_skull(rotation),
        },
        ClientboundPacket::BlockEntityUpdate {
            pos,
            data: BlockEntityData::skull(),
        },
    ]
}

/// Restores the real block, and its block entity when the world has one.
pub fn revert(
    pos: BlockPos,
    state: BlockState,
    block_entity: Option<BlockEntityData>,
) -> Vec<ClientboundPacket> {
    let mut packets = vec![ClientboundPacket::BlockUpdate { pos, state }];
    if let Some(data) = block_entity {
        packets.push(ClientboundPacket::BlockEntityUpdate { pos, data });
    }
    packets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::text::Text;

    const POS: BlockPos = BlockPos::new(10, 64, -20);

    fn metadata_of(packet: &ClientboundPacket) -> &EntityMetadata {
        match packet {
            ClientboundPacket::EntityMetadata { metadata, .. } => metadata,
            other => panic!("expected metadata, got {}", other.name()),
        }
    }

    #[test]
    fn test_label_spawns_above_block_centre() {
        // Arrange
        let geometry = OverlayGeometry::default();

        // Act
        let packets = spawn_label(-7, POS, Text::literal("Grave"), &geometry);

        // Assert
        assert_eq!(packets.len(), 2);
        match &packets[0] {
            ClientboundPacket::SpawnEntity {
                entity_id,
                entity_type,
                position,
                ..
            } => {
                assert_eq!(*entity_id, -7);
                assert_eq!(*entity_type, EntityType::ArmorStand);
                assert!((position.x - 10.5).abs() < 1e-9);
                assert!((position.y - (64.5 + 1.0 + LABEL_EPSILON)).abs() < 1e-9);
                assert!((position.z - -19.5).abs() < 1e-9);
            }
            other => panic!("expected spawn, got {}", other.name()),
        }
        let meta = metadata_of(&packets[1]);
        assert!(meta.invisible && meta.no_gravity && meta.marker && meta.custom_name_visible);
        assert!(!meta.small);
    }

    #[test]
    fn test_label_update_is_single_metadata_packet() {
        let packet = update_label(-3, Text::literal("new"));
        assert_eq!(
            metadata_of(&packet).custom_name,
            Some(Text::literal("new"))
        );
    }

    #[test]
    fn test_prop_spawns_offset_from_bottom_centre() {
        let packets = spawn_prop(-9, POS, &OverlayGeometry::default());
        match &packets[0] {
            ClientboundPacket::SpawnEntity {
                entity_type,
                position,
                ..
            } => {
                assert_eq!(*entity_type, EntityType::Fox);
                assert!((position.x - 10.95).abs() < 1e-9);
                assert!((position.y - 63.86).abs() < 1e-9);
                assert!((position.z - -19.5).abs() < 1e-9);
            }
            other => panic!("expected spawn, got {}", other.name()),
        }
        let meta = metadata_of(&packets[1]);
        assert!(meta.baby && meta.sitting && meta.silent && meta.ai_disabled);
        assert!(meta.invulnerable && meta.invisible && meta.no_gravity);
        assert_eq!(meta.custom_name, None);
    }

    #[test]
    fn test_equip_uses_single_display_item() {
        let apples = ItemStack::new(ItemKind::Other("minecraft:apple".into()), 12);
        let packets = equip_and_hide(-1, Some(&apples));
        match &packets[0] {
            ClientboundPacket::EntityEquipment { slot, item, .. } => {
                assert_eq!(*slot, EquipmentSlot::MainHand);
                assert_eq!(item.kind, ItemKind::Other("minecraft:apple".into()));
                assert_eq!(item.count, 1);
            }
            other => panic!("expected equipment, got {}", other.name()),
        }
        assert!(matches!(
            packets[1],
            ClientboundPacket::EntityStatusEffect {
                effect: StatusEffect::Invisibility,
                duration_ticks: INFINITE_DURATION,
                ambient: true,
                show_particles: false,
                show_icon: false,
                ..
            }
        ));
    }

    #[test]
    fn test_equip_falls_back_to_compass() {
        assert_eq!(held_item(None).kind, ItemKind::Compass);
        assert_eq!(held_item(Some(&ItemStack::empty())).kind, ItemKind::Compass);
    }

    #[test]
    fn test_disguise_sends_skull_block_and_block_entity() {
        let packets = disguise(POS, 7);
        assert_eq!(
            packets[0],
            ClientboundPacket::BlockUpdate {
                pos: POS,
                state: BlockState::skeleton_skull(7),
            }
        );
        assert_eq!(
            packets[1],
            ClientboundPacket::BlockEntityUpdate {
                pos: POS,
                data: BlockEntityData::skull(),
            }
        );
    }

    #[test]
    fn test_revert_omits_block_entity_when_absent() {
        let state = BlockState::new("universal_graves:grave");
        assert_eq!(revert(POS, state.clone(), None).len(), 1);
        let data = BlockEntityData {
            type_id: "universal_graves:grave".into(),
            payload: vec![1, 2, 3],
        };
        assert_eq!(revert(POS, state, Some(data)).len(), 2);
    }

    #[test]
    fn test_destroy_collects_ids_in_order() {
        assert_eq!(
            destroy([-1, -2]),
            ClientboundPacket::DestroyEntities {
                entity_ids: vec![-1, -2]
            }
        );
    }
}
