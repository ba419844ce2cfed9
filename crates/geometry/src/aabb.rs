use std::fmt::{Debug, Display};

use glam::{DVec3, IVec3};
use serde::{Deserialize, Serialize};

/// Tolerance used by [`Aabb::intersects`]. Boxes that only touch along a face do not intersect.
pub const INTERSECT_EPSILON: f64 = 1e-5;

/// An axis-aligned bounding box in double precision.
///
/// Entity boxes are usually stored relative to the entity's feet and moved into world space
/// with [`Aabb::move_by`]. Block boxes are stored relative to the block's minimum corner.
#[derive(Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Debug for Aabb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl Display for Aabb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // write [0.000, 0.000, 0.000] -> [1.000, 1.000, 1.000]
        write!(
            f,
            "[{:.3}, {:.3}, {:.3}] -> [{:.3}, {:.3}, {:.3}]",
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z
        )
    }
}

impl Aabb {
    /// The unit cube occupied by a full block, relative to the block's minimum corner.
    pub const FULL_BLOCK: Self = Self {
        min: DVec3::ZERO,
        max: DVec3::ONE,
    };

    #[must_use]
    pub fn new(min: impl Into<DVec3>, max: impl Into<DVec3>) -> Self {
        let min = min.into();
        let max = max.into();
        Self { min, max }
    }

    /// A box of the given width and height standing on `feet`.
    #[must_use]
    pub fn create(feet: DVec3, width: f64, height: f64) -> Self {
        let half_width = width / 2.0;

        let min = DVec3::new(feet.x - half_width, feet.y, feet.z - half_width);
        let max = DVec3::new(feet.x + half_width, feet.y + height, feet.z + half_width);

        Self { min, max }
    }

    #[must_use]
    pub fn move_by(&self, offset: DVec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Grows the box by `amount` in every direction. Negative values shrink it.
    #[must_use]
    pub fn expand(self, amount: f64) -> Self {
        self.expand_vec(DVec3::splat(amount))
    }

    #[must_use]
    pub fn shrink(self, amount: f64) -> Self {
        self.expand(-amount)
    }

    /// Grows the box by `amount.x` along x on both sides, and likewise for y and z.
    #[must_use]
    pub fn expand_vec(mut self, amount: DVec3) -> Self {
        self.min -= amount;
        self.max += amount;
        self
    }

    /// The union of this box and the same box moved by `motion`; bounds every position the box
    /// passes through while sweeping along `motion`.
    #[must_use]
    pub fn extend(mut self, motion: DVec3) -> Self {
        for axis in 0..3 {
            let delta = motion[axis];
            if delta < 0.0 {
                self.min[axis] += delta;
            } else if delta > 0.0 {
                self.max[axis] += delta;
            }
        }
        self
    }

    /// Strict intersection: the boxes must overlap by more than [`INTERSECT_EPSILON`] on every axis.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        (0..3).all(|axis| {
            other.max[axis] - self.min[axis] > INTERSECT_EPSILON
                && self.max[axis] - other.min[axis] > INTERSECT_EPSILON
        })
    }

    /// How far this box may travel along x (up to `delta`) before it would enter `other`.
    ///
    /// Returns `delta` unchanged when the boxes do not overlap on the y and z axes, since
    /// travelling along x can then never make them touch.
    #[must_use]
    pub fn x_offset(&self, other: &Self, delta: f64) -> f64 {
        self.axis_offset(other, delta, 0)
    }

    /// See [`Aabb::x_offset`].
    #[must_use]
    pub fn y_offset(&self, other: &Self, delta: f64) -> f64 {
        self.axis_offset(other, delta, 1)
    }

    /// See [`Aabb::x_offset`].
    #[must_use]
    pub fn z_offset(&self, other: &Self, delta: f64) -> f64 {
        self.axis_offset(other, delta, 2)
    }

    fn axis_offset(&self, other: &Self, mut delta: f64, axis: usize) -> f64 {
        // overlaps within INTERSECT_EPSILON count as touching, same as `intersects`
        for cross in [(axis + 1) % 3, (axis + 2) % 3] {
            if self.max[cross] - other.min[cross] <= INTERSECT_EPSILON
                || other.max[cross] - self.min[cross] <= INTERSECT_EPSILON
            {
                return delta;
            }
        }

        if delta > 0.0 && self.max[axis] - other.min[axis] <= INTERSECT_EPSILON {
            delta = delta.min(other.min[axis] - self.max[axis]);
        }
        if delta < 0.0 && other.max[axis] - self.min[axis] <= INTERSECT_EPSILON {
            delta = delta.max(other.max[axis] - self.min[axis]);
        }
        delta
    }

    /// Every block coordinate the box covers, from `floor(min)` to `floor(max)`.
    #[must_use]
    pub fn covered_blocks(&self) -> BlockRange {
        BlockRange::new(self.min.floor().as_ivec3(), self.max.floor().as_ivec3())
    }

    /// Like [`Aabb::covered_blocks`] but rounding the maximum corner up, so blocks that merely
    /// touch the box are included as well.
    #[must_use]
    pub fn nearby_blocks(&self) -> BlockRange {
        BlockRange::new(self.min.floor().as_ivec3(), self.max.ceil().as_ivec3())
    }
}

/// An inclusive range of block coordinates, iterated y first, then x, then z.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockRange {
    pub min: IVec3,
    pub max: IVec3,
}

impl BlockRange {
    #[must_use]
    pub const fn new(min: IVec3, max: IVec3) -> Self {
        Self { min, max }
    }

    pub fn iter(self) -> impl Iterator<Item = IVec3> {
        let Self { min, max } = self;
        (min.y..=max.y).flat_map(move |y| {
            (min.x..=max.x).flat_map(move |x| (min.z..=max.z).map(move |z| IVec3::new(x, y, z)))
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{DVec3, IVec3};

    use crate::aabb::Aabb;

    #[test]
    fn create_stands_on_feet() {
        let aabb = Aabb::create(DVec3::new(0.5, 4.0, 0.5), 0.6, 1.8);
        assert_relative_eq!(aabb.min.x, 0.2);
        assert_relative_eq!(aabb.min.y, 4.0);
        assert_relative_eq!(aabb.max.y, 5.8);
        assert_relative_eq!(aabb.max.z, 0.8);
    }

    #[test]
    fn extend_only_grows_in_motion_direction() {
        let aabb = Aabb::new((0.0, 0.0, 0.0), (1.0, 1.0, 1.0));
        let extended = aabb.extend(DVec3::new(2.0, -0.5, 0.0));

        assert_eq!(extended.min, DVec3::new(0.0, -0.5, 0.0));
        assert_eq!(extended.max, DVec3::new(3.0, 1.0, 1.0));
    }

    #[test]
    fn expand_vec_is_per_axis() {
        let aabb = Aabb::new((0.0, 0.0, 0.0), (1.0, 1.0, 1.0)).expand_vec(DVec3::new(0.0, 0.05, 0.0));
        assert_relative_eq!(aabb.min.y, -0.05);
        assert_relative_eq!(aabb.max.y, 1.05);
        assert_relative_eq!(aabb.min.x, 0.0);
    }

    #[test]
    fn touching_faces_do_not_intersect() {
        let a = Aabb::new((0.0, 0.0, 0.0), (1.0, 1.0, 1.0));
        let b = Aabb::new((1.0, 0.0, 0.0), (2.0, 1.0, 1.0));

        assert!(!a.intersects(&b));
        assert!(a.intersects(&b.move_by(DVec3::new(-0.1, 0.0, 0.0))));
    }

    #[test]
    fn y_offset_stops_on_top_of_floor() {
        let floor = Aabb::new((0.0, 0.0, 0.0), (1.0, 1.0, 1.0));
        let entity = Aabb::create(DVec3::new(0.5, 1.5, 0.5), 0.6, 1.8);

        assert_relative_eq!(entity.y_offset(&floor, -2.0), -0.5);
        // moving away is never limited
        assert_relative_eq!(entity.y_offset(&floor, 2.0), 2.0);
    }

    #[test]
    fn offset_ignores_boxes_outside_the_path() {
        let wall = Aabb::new((2.0, 0.0, 0.0), (3.0, 1.0, 1.0));
        // entirely above the wall, so moving along x never touches it
        let entity = Aabb::new((0.0, 1.0, 0.0), (1.0, 2.0, 1.0));

        assert_relative_eq!(entity.x_offset(&wall, 5.0), 5.0);
        assert_relative_eq!(entity.move_by(DVec3::new(0.0, -0.5, 0.0)).x_offset(&wall, 5.0), 1.0);
    }

    #[test]
    fn negative_offsets_clip_towards_max_face() {
        let wall = Aabb::new((-1.0, 0.0, -1.0), (0.0, 1.0, 0.0));
        let entity = Aabb::new((0.25, 0.0, -0.75), (0.75, 1.0, -0.25));

        assert_relative_eq!(entity.x_offset(&wall, -1.0), -0.25);
        assert_relative_eq!(entity.z_offset(&wall, -1.0), -1.0);
    }

    #[test]
    fn slight_penetration_still_blocks() {
        let floor = Aabb::new((0.0, 0.0, 0.0), (1.0, 1.0, 1.0));
        let entity = Aabb::new((0.2, 1.0 - 1e-9, 0.2), (0.8, 2.8, 0.8));

        assert!(entity.y_offset(&floor, -0.5) >= 0.0);
        // resting on the floor does not catch on it when sliding sideways
        assert_relative_eq!(entity.x_offset(&floor.move_by(DVec3::X), 0.5), 0.5);
    }

    #[test]
    fn covered_blocks_floor_both_corners() {
        let aabb = Aabb::new((0.2, 4.0, 0.2), (0.8, 5.8, 0.8));
        let blocks: Vec<_> = aabb.covered_blocks().iter().collect();
        assert_eq!(blocks, vec![IVec3::new(0, 4, 0), IVec3::new(0, 5, 0)]);
    }

    #[test]
    fn nearby_blocks_round_max_up() {
        let aabb = Aabb::new((0.2, 4.0, 0.2), (0.8, 4.5, 0.8));
        let range = aabb.nearby_blocks();
        assert_eq!(range.min, IVec3::new(0, 4, 0));
        assert_eq!(range.max, IVec3::new(1, 5, 1));
        assert_eq!(range.iter().count(), 8);
    }

    #[test]
    fn display_uses_three_decimals() {
        let aabb = Aabb::new((0.0, 0.0, 0.0), (1.0, 1.0, 1.0));
        assert_eq!(
            aabb.to_string(),
            "[0.000, 0.000, 0.000] -> [1.000, 1.000, 1.000]"
        );
    }
}
