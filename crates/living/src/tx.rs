use std::time::Duration;

use glam::DVec3;

use crate::{
    EntityId,
    drop::{ItemEntity, ItemStack},
    scheduled::Timeline,
    ticks,
    world::{Viewer, World},
};

/// One tick's access to the world.
///
/// The world itself is only ever read. Side effects that outlive the entity being ticked (spawned
/// items, deferred removals) are collected here and applied by whoever owns the entities.
pub struct Tx<'w> {
    world: &'w dyn World,
    tick: u64,
    items: &'w mut Vec<ItemEntity>,
    removals: &'w mut Timeline<EntityId>,
}

impl<'w> Tx<'w> {
    pub fn new(
        world: &'w dyn World,
        tick: u64,
        items: &'w mut Vec<ItemEntity>,
        removals: &'w mut Timeline<EntityId>,
    ) -> Self {
        Self {
            world,
            tick,
            items,
            removals,
        }
    }

    /// The world, borrowed for the whole transaction rather than for the call.
    #[must_use]
    pub fn world(&self) -> &'w dyn World {
        self.world
    }

    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Simulation time of the current tick.
    #[must_use]
    pub fn now(&self) -> Duration {
        ticks(self.tick)
    }

    #[must_use]
    pub fn viewers(&self, position: DVec3) -> Vec<&'w dyn Viewer> {
        self.world.viewers(position)
    }

    /// Places an item entity in the world at `position`.
    pub fn spawn_item(&mut self, stack: ItemStack, position: DVec3) {
        self.items.push(ItemEntity { stack, position });
    }

    /// Removes the entity `delay` ticks from now, if it is still present and dead by then.
    pub fn schedule_removal(&mut self, id: EntityId, delay: u64) {
        self.removals.schedule(self.tick + delay, id);
    }
}
