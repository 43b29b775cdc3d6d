//! Protocol module containing the clientbound packet model, the synthetic
//! entity builders, the entity id allocator, and the frame codec.

pub mod codec;
pub mod entity_ids;
pub mod packets;
pub mod synthetic;

pub use codec::{decode_packet, encode_packet, CodecError};
pub use entity_ids::{EntityId, EntityIdAllocator};
pub use packets::*;
