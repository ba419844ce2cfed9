//! The interface the simulation core consumes from the surrounding world.
//!
//! Block storage, per-block collision shapes and the fan-out of entity updates to observers all
//! live outside this crate. The core only ever reads the world through [`World`] and reports
//! changes through [`Viewer`].

use geometry::aabb::Aabb;
use glam::{DVec3, IVec3};
use serde::{Deserialize, Serialize};

use crate::{EntityId, living::Living, movement::Rotation, tx::Tx};

/// Friction of a block's top surface when nothing more specific is known.
pub const DEFAULT_FRICTION: f64 = 0.6;

/// Read access to a voxel world for the duration of a tick.
pub trait World {
    /// The block at `pos`. Unloaded or empty positions return an air block.
    fn block(&self, pos: IVec3) -> &dyn Block;

    /// The liquid layered at `pos`, if any. Liquids may share a position with a solid block.
    fn liquid(&self, pos: IVec3) -> Option<&dyn Block>;

    fn raining_at(&self, pos: IVec3) -> bool;

    /// The lowest y coordinate of the world. Entities below it are in the void.
    fn floor(&self) -> i32;

    /// Everyone who should be told about changes to an entity at `position`.
    fn viewers(&self, position: DVec3) -> Vec<&dyn Viewer>;
}

/// A block type. Optional behaviour is exposed through the `as_*` capability accessors rather
/// than by downcasting.
pub trait Block {
    /// Collision boxes relative to the block's minimum corner. An empty list means entities pass
    /// through freely.
    fn collision_boxes(&self, pos: IVec3, world: &dyn World) -> Vec<Aabb>;

    /// Horizontal friction applied to entities standing on this block.
    fn friction(&self) -> f64 {
        DEFAULT_FRICTION
    }

    fn as_entity_insider(&self) -> Option<&dyn EntityInsider> {
        None
    }

    fn as_entity_lander(&self) -> Option<&dyn EntityLander> {
        None
    }

    fn as_liquid(&self) -> Option<&dyn Liquid> {
        None
    }
}

/// A block that acts on every entity whose bounding box overlaps it.
pub trait EntityInsider {
    fn entity_inside(&self, pos: IVec3, tx: &mut Tx<'_>, living: &mut Living);
}

/// A block that can soften (or worsen) a landing on top of it.
pub trait EntityLander {
    /// Returns the fall distance to use for damage after landing on the block at `pos`.
    fn entity_land(&self, pos: IVec3, world: &dyn World, living: &Living, distance: f64) -> f64;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiquidKind {
    Water,
    Lava,
}

pub trait Liquid {
    fn kind(&self) -> LiquidKind;
}

/// Visual actions performed by an entity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityAction {
    Hurt,
    Death,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sound {
    Burning,
    Drowning,
}

/// The observable state of an entity, sent whenever one of its flags changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub name_tag: String,
    pub variant: i32,
    pub scale: f64,
    pub on_fire: bool,
    pub invisible: bool,
    pub immobile: bool,
    pub health: f64,
    pub max_health: f64,
}

/// Receives entity updates. Every method defaults to doing nothing.
pub trait Viewer {
    fn view_movement(&self, _id: EntityId, _position: DVec3, _rotation: Rotation, _on_ground: bool) {}

    fn view_velocity(&self, _id: EntityId, _velocity: DVec3) {}

    fn view_state(&self, _id: EntityId, _state: &EntityState) {}

    fn view_action(&self, _id: EntityId, _action: EntityAction) {}

    fn view_sound(&self, _position: DVec3, _sound: Sound) {}
}
