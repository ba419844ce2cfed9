//! Per-tick velocity integration.

use glam::{DVec3, IVec3};
use serde::{Deserialize, Serialize};

use crate::{config::MovementParams, world::World};

/// Yaw and pitch in degrees.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub yaw: f64,
    pub pitch: f64,
}

impl Rotation {
    #[must_use]
    pub const fn new(yaw: f64, pitch: f64) -> Self {
        Self { yaw, pitch }
    }

    /// Unit vector the entity is looking along.
    #[must_use]
    pub fn direction(&self) -> DVec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        DVec3::new(-yaw.sin() * pitch.cos(), -pitch.sin(), yaw.cos() * pitch.cos())
    }
}

/// The result of integrating one tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Movement {
    pub velocity: DVec3,
    /// Candidate position change before collisions.
    pub delta: DVec3,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MovementComputer {
    pub params: MovementParams,
}

impl MovementComputer {
    #[must_use]
    pub const fn new(params: MovementParams) -> Self {
        Self { params }
    }

    /// Applies gravity, drag and ground friction to `velocity`. Does not touch the entity.
    #[must_use]
    pub fn tick(&self, world: &dyn World, position: DVec3, velocity: DVec3, on_ground: bool) -> Movement {
        let MovementParams {
            gravity,
            drag,
            drag_before_gravity,
        } = self.params;

        let mut velocity = velocity;

        if drag_before_gravity {
            velocity.y *= 1.0 - drag;
        }
        velocity.y -= gravity;
        if !drag_before_gravity {
            velocity.y *= 1.0 - drag;
        }

        let mut friction = 1.0 - drag;
        if on_ground {
            friction *= world.block(below(position)).friction();
        }
        velocity.x *= friction;
        velocity.z *= friction;

        Movement {
            velocity,
            delta: velocity,
        }
    }
}

fn below(position: DVec3) -> IVec3 {
    let feet = position.floor().as_ivec3();
    feet - IVec3::Y
}
