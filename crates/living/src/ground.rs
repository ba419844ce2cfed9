use geometry::aabb::Aabb;
use glam::DVec3;

use crate::{collision::boxes_in, world::World};

/// Half the height of the slab checked under an entity's feet.
const SLAB_HALF_HEIGHT: f64 = 0.05;

/// Whether `bbox` (in world space) is standing on something.
///
/// Checks a thin slab around the bottom face of the box. Touching a wall with a side face never
/// counts. Pure: calling it twice without changing the world gives the same answer.
#[must_use]
pub fn on_ground(world: &dyn World, bbox: &Aabb) -> bool {
    let slab = Aabb::new(
        DVec3::new(bbox.min.x, bbox.min.y - SLAB_HALF_HEIGHT, bbox.min.z),
        DVec3::new(bbox.max.x, bbox.min.y + SLAB_HALF_HEIGHT, bbox.max.z),
    );

    boxes_in(world, &slab).iter().any(|other| other.intersects(&slab))
}
