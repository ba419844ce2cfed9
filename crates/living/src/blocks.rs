//! A few stock blocks covering every capability the core reacts to.

use std::time::Duration;

use geometry::aabb::Aabb;
use glam::IVec3;

use crate::{
    damage::DamageSource,
    living::Living,
    tx::Tx,
    world::{Block, DEFAULT_FRICTION, EntityInsider, EntityLander, Liquid, LiquidKind, World},
};

/// How long an entity keeps burning after leaving lava.
pub const LAVA_FIRE_DURATION: Duration = Duration::from_secs(15);

/// Damage dealt by lava for every tick an entity spends inside it.
pub const LAVA_DAMAGE: f64 = 4.0;

#[derive(Copy, Clone, Debug, Default)]
pub struct Air;

impl Block for Air {
    fn collision_boxes(&self, _pos: IVec3, _world: &dyn World) -> Vec<Aabb> {
        Vec::new()
    }
}

/// A full cube.
#[derive(Copy, Clone, Debug)]
pub struct Solid {
    friction: f64,
}

impl Default for Solid {
    fn default() -> Self {
        Self::new()
    }
}

impl Solid {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            friction: DEFAULT_FRICTION,
        }
    }

    /// A full cube with a custom surface friction, such as ice.
    #[must_use]
    pub const fn with_friction(friction: f64) -> Self {
        Self { friction }
    }
}

impl Block for Solid {
    fn collision_boxes(&self, _pos: IVec3, _world: &dyn World) -> Vec<Aabb> {
        vec![Aabb::FULL_BLOCK]
    }

    fn friction(&self) -> f64 {
        self.friction
    }
}

/// The bottom half of a block.
#[derive(Copy, Clone, Debug, Default)]
pub struct Slab;

impl Block for Slab {
    fn collision_boxes(&self, _pos: IVec3, _world: &dyn World) -> Vec<Aabb> {
        vec![Aabb::new((0.0, 0.0, 0.0), (1.0, 0.5, 1.0))]
    }
}

/// Cuts fall damage to a fifth.
#[derive(Copy, Clone, Debug, Default)]
pub struct HayBale;

impl Block for HayBale {
    fn collision_boxes(&self, _pos: IVec3, _world: &dyn World) -> Vec<Aabb> {
        vec![Aabb::FULL_BLOCK]
    }

    fn as_entity_lander(&self) -> Option<&dyn EntityLander> {
        Some(self)
    }
}

impl EntityLander for HayBale {
    fn entity_land(&self, _pos: IVec3, _world: &dyn World, _living: &Living, distance: f64) -> f64 {
        distance * 0.2
    }
}

/// Still water. Breaks falls and puts out fire.
#[derive(Copy, Clone, Debug, Default)]
pub struct Water;

impl Block for Water {
    fn collision_boxes(&self, _pos: IVec3, _world: &dyn World) -> Vec<Aabb> {
        Vec::new()
    }

    fn as_entity_insider(&self) -> Option<&dyn EntityInsider> {
        Some(self)
    }

    fn as_liquid(&self) -> Option<&dyn Liquid> {
        Some(self)
    }
}

impl Liquid for Water {
    fn kind(&self) -> LiquidKind {
        LiquidKind::Water
    }
}

impl EntityInsider for Water {
    fn entity_inside(&self, _pos: IVec3, tx: &mut Tx<'_>, living: &mut Living) {
        living.reset_fall_distance();
        if living.on_fire() {
            living.extinguish(tx);
        }
    }
}

/// Still lava. Burns and hurts anything inside it.
#[derive(Copy, Clone, Debug, Default)]
pub struct Lava;

impl Block for Lava {
    fn collision_boxes(&self, _pos: IVec3, _world: &dyn World) -> Vec<Aabb> {
        Vec::new()
    }

    fn friction(&self) -> f64 {
        0.5
    }

    fn as_entity_insider(&self) -> Option<&dyn EntityInsider> {
        Some(self)
    }

    fn as_liquid(&self) -> Option<&dyn Liquid> {
        Some(self)
    }
}

impl Liquid for Lava {
    fn kind(&self) -> LiquidKind {
        LiquidKind::Lava
    }
}

impl EntityInsider for Lava {
    fn entity_inside(&self, _pos: IVec3, tx: &mut Tx<'_>, living: &mut Living) {
        living.halve_fall_distance();
        living.hurt(tx, LAVA_DAMAGE, DamageSource::Lava);
        living.set_on_fire(tx, LAVA_FIRE_DURATION);
    }
}
