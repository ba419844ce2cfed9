//! Sweeping an entity's bounding box through the blocks around it.

use geometry::aabb::Aabb;
use glam::{BVec3, DVec3, IVec3};

use crate::world::World;

/// Axis deltas smaller than this are not resolved at all.
const SKIP_EPSILON: f64 = 0.001;

/// Tolerance when comparing a clipped delta against the requested one.
const COLLIDED_EPSILON: f64 = 1e-6;

/// How far beyond the swept box blocks are considered.
const QUERY_MARGIN: f64 = 0.25;

/// Moves longer than this skip collision entirely.
pub const MAX_TRACKED_DISTANCE: f64 = 3.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Resolution {
    /// The part of the requested delta that can be travelled without entering a block.
    pub delta: DVec3,
    /// Axes along which the requested delta was cut short.
    pub blocked: BVec3,
    pub collided_horizontally: bool,
    pub collided_vertically: bool,
}

/// Every collision box within `region`, in world space.
#[must_use]
pub fn boxes_in(world: &dyn World, region: &Aabb) -> Vec<Aabb> {
    region
        .nearby_blocks()
        .iter()
        .flat_map(|pos| block_boxes(world, pos))
        .collect()
}

/// The collision boxes of the block at `pos`, in world space.
#[must_use]
pub fn block_boxes(world: &dyn World, pos: IVec3) -> Vec<Aabb> {
    let offset = pos.as_dvec3();
    world
        .block(pos)
        .collision_boxes(pos, world)
        .into_iter()
        .map(|bb| bb.move_by(offset))
        .collect()
}

/// Clips `delta` so that `bbox` (in world space) does not move into any block.
///
/// Axes are resolved in the order y, x, z, with the box advanced after each axis so later axes
/// see the already committed movement.
#[must_use]
pub fn resolve(world: &dyn World, bbox: &Aabb, delta: DVec3) -> Resolution {
    let region = bbox.extend(delta).expand(QUERY_MARGIN);
    let boxes = boxes_in(world, &region);

    let mut working = *bbox;
    let mut clipped = delta;

    if clipped.y.abs() > SKIP_EPSILON {
        for other in &boxes {
            clipped.y = working.y_offset(other, clipped.y);
        }
        working = working.move_by(DVec3::new(0.0, clipped.y, 0.0));
    }

    if clipped.x.abs() > SKIP_EPSILON {
        for other in &boxes {
            clipped.x = working.x_offset(other, clipped.x);
        }
        working = working.move_by(DVec3::new(clipped.x, 0.0, 0.0));
    }

    if clipped.z.abs() > SKIP_EPSILON {
        for other in &boxes {
            clipped.z = working.z_offset(other, clipped.z);
        }
    }

    let differs = |a: f64, b: f64| (a - b).abs() > COLLIDED_EPSILON;
    let blocked = BVec3::new(
        differs(delta.x, clipped.x),
        differs(delta.y, clipped.y),
        differs(delta.z, clipped.z),
    );

    Resolution {
        delta: clipped,
        blocked,
        collided_horizontally: blocked.x || blocked.z,
        collided_vertically: blocked.y,
    }
}
