//! Line-of-sight check.
//!
//! Five rays are cast from the viewer's eye towards points around the label
//! anchor.  The grave counts as visible if *any* ray gets through, so a
//! partially covered grave keeps its overlay.

use bedrock_graves_core::{ObjectKey, Vec3};
use tracing::debug;

use super::ports::WorldView;

/// Offsets from the label anchor that the rays aim at.
pub const RAY_TARGET_OFFSETS: [Vec3; 5] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(0.4, 0.0, 0.4),
    Vec3::new(-0.4, 0.0, -0.4),
    Vec3::new(0.0, 0.5, 0.0),
    Vec3::new(0.0, -0.3, 0.0),
];

/// The points the rays aim at for a grave at `key`.
pub fn ray_targets(key: &ObjectKey, label_offset_y: f64) -> [Vec3; 5] {
    let anchor = key.pos.center().offset(0.0, label_offset_y, 0.0);
    RAY_TARGET_OFFSETS.map(|o| anchor.offset(o.x, o.y, o.z))
}

/// Whether any ray from `eye` reaches the grave's label anchor.
///
/// A raycast error counts as an obstructed ray.
pub fn has_line_of_sight(
    world: &dyn WorldView,
    key: &ObjectKey,
    eye: Vec3,
    label_offset_y: f64,
) -> bool {
    ray_targets(key, label_offset_y).into_iter().any(|target| {
        match world.raycast_clear(&key.world, eye, target, key.pos) {
            Ok(clear) => clear,
            Err(e) => {
                debug!("raycast towards {key} failed: {e}");
                false
            }
        }
    })
}
