use std::time::Duration;

use glam::DVec3;

use crate::EntityId;

/// Below this an entity's health counts as zero.
pub const DEATH_THRESHOLD: f64 = 1e-6;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DamageSource {
    /// Hit by another entity standing at `position`.
    Attack { attacker: EntityId, position: DVec3 },
    Fall,
    Fire,
    Lava,
    Suffocation,
    Void,
    Explosion,
    Drowning,
    Poison,
}

impl DamageSource {
    #[must_use]
    pub const fn is_fire(&self) -> bool {
        matches!(self, Self::Fire | Self::Lava)
    }

    /// Sources that bypass the immunity window.
    #[must_use]
    pub const fn ignores_immunity(&self) -> bool {
        matches!(self, Self::Void)
    }

    #[must_use]
    pub const fn reduced_by_resistance(&self) -> bool {
        !matches!(self, Self::Void)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HealingSource {
    Regeneration,
    Food,
    Custom,
}

/// Current and maximum health. The current value stays within `[0, max]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Health {
    current: f64,
    max: f64,
}

impl Health {
    #[must_use]
    pub const fn new(max: f64) -> Self {
        Self { current: max, max }
    }

    #[must_use]
    pub const fn current(&self) -> f64 {
        self.current
    }

    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.current <= DEATH_THRESHOLD
    }

    pub fn set(&mut self, value: f64) {
        self.current = value.clamp(0.0, self.max);
    }

    /// Lowering the maximum below the current value lowers the current value too.
    pub fn set_max(&mut self, max: f64) {
        self.max = max.max(0.0);
        self.current = self.current.min(self.max);
    }

    pub fn damage(&mut self, amount: f64) {
        self.set(self.current - amount);
    }

    pub fn heal(&mut self, amount: f64) {
        self.set(self.current + amount);
    }
}

/// The invincibility window opened by the last accepted hit.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Immunity {
    /// Simulation time the window closes.
    pub until: Duration,
    /// The damage of the hit that opened the window, as adjusted by the hurt hook.
    pub last_damage: f64,
}

impl Immunity {
    #[must_use]
    pub fn is_active(&self, now: Duration) -> bool {
        now < self.until
    }

    /// Damage left to apply when `damage` lands inside the window. Only the part exceeding the hit
    /// that opened the window gets through.
    #[must_use]
    pub fn remaining(&self, damage: f64) -> f64 {
        damage - self.last_damage
    }
}
