//! # bedrock-graves-core
//!
//! Shared library for bedrock-graves containing the grave domain types, the
//! GUI item translation tables, and the clientbound packet model used to
//! fabricate overlay entities.
//!
//! This crate has zero dependencies on the host server, threads, or sockets.
//! Everything here is a pure function of its inputs.
//!
//! # Architecture overview (for beginners)
//!
//! Some clients connect to the game server through a protocol bridge and
//! cannot render the custom player-head buttons and grave blocks produced by
//! the grave mod.  bedrock-graves hides that gap in two ways:
//!
//! - **`translate`** – Converts custom head-shaped GUI buttons into plain
//!   vanilla items (stained glass, chests, TNT...) that every client renders.
//!
//! - **`protocol`** – The packets the shim injects: a floating text label and
//!   an invisible item-holding prop that stand in for the grave, plus the
//!   "disguise" block update and its revert.
//!
//! - **`domain`** – Positions, worlds, formatted text, and the read-only grave
//!   snapshot the label is rendered from.
//!
//! - **`item`** – The item stack model shared by the translator and packets.

pub mod domain;
pub mod item;
pub mod protocol;
pub mod translate;

pub use domain::geometry::{BlockPos, ObjectKey, RegionPos, Vec3, WorldId};
pub use domain::grave::{GraveSnapshot, GraveState};
pub use domain::text::{Text, TextColor};
pub use item::{IconTexture, ItemKind, ItemStack};
pub use protocol::codec::{decode_packet, encode_packet, CodecError};
pub use protocol::entity_ids::{EntityId, EntityIdAllocator};
pub use protocol::packets::ClientboundPacket;
pub use translate::GuiTranslator;

/// Unique identifier for a connected viewer (player), derived from their UUID.
pub type ViewerId = uuid::Uuid;
