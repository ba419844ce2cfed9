//! Physics and damage simulation for mobile, damageable entities in a voxel world.
//!
//! An entity ([`Living`]) integrates its own motion, sweeps its bounding box through the
//! surrounding blocks, tracks ground contact and fall distance, and routes every change to its
//! health through an immunity window and a cancellable [`Handler`]. All of this runs inside a
//! [`Tx`], a single tick's view of the [`World`]. [`Simulation`] owns the entities and drives
//! them at [`TICKS_PER_SECOND`].

use std::time::Duration;

pub mod blocks;
pub mod collision;
pub mod config;
pub mod damage;
pub mod drop;
pub mod effect;
pub mod fall;
pub mod grid;
pub mod ground;
pub mod handler;
pub mod living;
pub mod movement;
pub mod scheduled;
pub mod settings;
pub mod simulation;
pub mod tx;
pub mod values;
pub mod world;

pub use config::{Config, ConfigError, EntityType, MovementParams};
pub use damage::{DamageSource, HealingSource};
pub use handler::{Context, Handler, NopHandler};
pub use living::Living;
pub use simulation::Simulation;
pub use tx::Tx;
pub use world::{Block, Viewer, World};

slotmap::new_key_type! {
    /// Generational handle to an entity owned by a [`Simulation`]. Stays safe to hold after the
    /// entity is removed; lookups simply fail.
    pub struct EntityId;
}

pub const TICKS_PER_SECOND: u64 = 20;

/// Wall-clock length of one tick.
pub const TICK: Duration = Duration::from_millis(1000 / TICKS_PER_SECOND);

/// Ticks between death and removal, long enough for the death animation to play out.
pub const DEATH_REMOVAL_DELAY: u64 = 22;

/// Converts a tick count into simulation time.
#[must_use]
pub fn ticks(count: u64) -> Duration {
    TICK.saturating_mul(u32::try_from(count).unwrap_or(u32::MAX))
}
