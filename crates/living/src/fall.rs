//! Fall distance bookkeeping and conversion to damage.

/// Falls up to this many blocks are harmless.
pub const SAFE_FALL_DISTANCE: f64 = 3.0;

/// Excess fall distance below this deals no damage.
const MIN_DAMAGING_EXCESS: f64 = 0.5;

/// Accumulated downward travel since the entity last stood on the ground.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FallTracker {
    distance: f64,
}

impl FallTracker {
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    pub fn set_distance(&mut self, distance: f64) {
        self.distance = distance.max(0.0);
    }

    pub const fn reset(&mut self) {
        self.distance = 0.0;
    }

    /// Feeds one committed move into the tracker. `dy` is the vertical part of the move, negative
    /// when falling.
    ///
    /// Returns the distance fallen when this move ends a fall by touching the ground.
    pub fn update(&mut self, on_ground: bool, dy: f64) -> Option<f64> {
        if on_ground && self.distance > 0.0 {
            let distance = self.distance;
            self.reset();
            return Some(distance);
        }

        if dy < self.distance {
            // falling grows the distance, rising eats into it
            self.distance -= dy;
        } else {
            self.reset();
        }
        None
    }
}

/// Damage dealt by landing after falling `distance` blocks, if any.
#[must_use]
pub fn fall_damage(distance: f64) -> Option<f64> {
    let excess = distance - SAFE_FALL_DISTANCE;
    (excess >= MIN_DAMAGING_EXCESS).then(|| excess.ceil())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn damage_formula() {
        assert_eq!(fall_damage(5.5), Some(3.0));
        assert_eq!(fall_damage(3.2), None);
        assert_eq!(fall_damage(3.5), Some(1.0));
        assert_eq!(fall_damage(0.0), None);
        assert_eq!(fall_damage(23.0), Some(20.0));
    }

    #[test]
    fn accumulates_while_falling() {
        let mut tracker = FallTracker::default();
        for _ in 0..4 {
            assert_eq!(tracker.update(false, -0.5), None);
        }
        assert_relative_eq!(tracker.distance(), 2.0);

        assert_eq!(tracker.update(true, -0.1), Some(2.0));
        assert_relative_eq!(tracker.distance(), 0.0);
    }

    #[test]
    fn rising_reduces() {
        let mut tracker = FallTracker::default();
        tracker.update(false, -2.0);
        tracker.update(false, 0.5);
        assert_relative_eq!(tracker.distance(), 1.5);
    }

    #[test]
    fn rising_past_the_fall_resets() {
        let mut tracker = FallTracker::default();
        tracker.update(false, -0.5);
        tracker.update(false, 1.0);
        assert_relative_eq!(tracker.distance(), 0.0);
    }

    #[test]
    fn grounded_without_distance_does_not_land() {
        let mut tracker = FallTracker::default();
        assert_eq!(tracker.update(true, 0.0), None);
        assert_relative_eq!(tracker.distance(), 0.0);
    }
}
