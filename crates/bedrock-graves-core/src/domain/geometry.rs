//! World coordinates.
//!
//! Blocks are addressed by integer [`BlockPos`]; entities and rays use
//! floating-point [`Vec3`].  A block occupies the unit cube starting at its
//! integer corner, so its centre is `pos + 0.5` on every axis.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Namespaced world identifier, e.g. `minecraft:overworld`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldId(String);

impl WorldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Integer block coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the centre point of the block.
    pub fn center(&self) -> Vec3 {
        Vec3::new(
            f64::from(self.x) + 0.5,
            f64::from(self.y) + 0.5,
            f64::from(self.z) + 0.5,
        )
    }

    /// Returns the chunk column coordinates (16×16) containing this block.
    pub fn chunk(&self) -> (i32, i32) {
        (self.x >> 4, self.z >> 4)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A floating-point position or offset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns `self` shifted by the given deltas.
    pub fn offset(&self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Squared Euclidean distance; avoids the square root on the hot path.
    pub fn distance_sq(&self, other: &Vec3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }
}

/// Addresses one grave: the world it lives in plus its block position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectKey {
    pub world: WorldId,
    pub pos: BlockPos,
}

impl ObjectKey {
    pub fn new(world: WorldId, pos: BlockPos) -> Self {
        Self { world, pos }
    }

    /// Returns the region (chunk column) this object belongs to.
    pub fn region(&self) -> RegionPos {
        let (chunk_x, chunk_z) = self.pos.chunk();
        RegionPos {
            world: self.world.clone(),
            chunk_x,
            chunk_z,
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.world, self.pos)
    }
}

/// A loadable 16×16 column of a world.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionPos {
    pub world: WorldId,
    pub chunk_x: i32,
    pub chunk_z: i32,
}
