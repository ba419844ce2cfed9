use glam::DVec3;
use slotmap::SlotMap;
use tracing::{debug, instrument};

use crate::{
    EntityId,
    config::{Config, ConfigError},
    drop::ItemEntity,
    living::Living,
    scheduled::Timeline,
    tx::Tx,
    world::World,
};

/// Owns a world and every entity in it, and advances them one tick at a time.
pub struct Simulation<W> {
    world: W,
    entities: SlotMap<EntityId, Living>,
    removals: Timeline<EntityId>,
    items: Vec<ItemEntity>,
    tick: u64,
}

impl<W: World> Simulation<W> {
    pub fn new(world: W) -> Self {
        Self {
            world,
            entities: SlotMap::with_key(),
            removals: Timeline::new(),
            items: Vec::new(),
            tick: 0,
        }
    }

    pub const fn world(&self) -> &W {
        &self.world
    }

    /// Mutable access to the world between ticks, such as for placing or breaking blocks.
    pub const fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn spawn(&mut self, config: Config, position: DVec3) -> Result<EntityId, ConfigError> {
        let mut living = config.apply(position)?;
        let id = self.entities.insert_with_key(|id| {
            living.set_id(id);
            living
        });
        debug!("spawned {id:?} at {position}");
        Ok(id)
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Living> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Living> {
        self.entities.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Living> {
        self.entities.remove(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Removals scheduled by deaths and not yet carried out. Entities removed by hand before
    /// their deadline still count until the deadline passes.
    #[must_use]
    pub fn pending_removals(&self) -> usize {
        self.removals.len()
    }

    /// The tick at which the earliest scheduled removal happens.
    #[must_use]
    pub fn next_removal(&self) -> Option<u64> {
        self.removals.peek().map(|(at, _)| at)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Living)> {
        self.entities.iter()
    }

    /// Items dropped so far.
    #[must_use]
    pub fn items(&self) -> &[ItemEntity] {
        &self.items
    }

    pub fn take_items(&mut self) -> Vec<ItemEntity> {
        std::mem::take(&mut self.items)
    }

    /// Runs `f` against the entity inside a transaction for the current tick. Returns `None` when
    /// the entity no longer exists.
    pub fn update<R>(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut Living, &mut Tx<'_>) -> R,
    ) -> Option<R> {
        let Self {
            world,
            entities,
            removals,
            items,
            tick,
        } = self;

        let living = entities.get_mut(id)?;
        let mut tx = Tx::new(&*world, *tick, items, removals);
        Some(f(living, &mut tx))
    }

    /// Advances the clock, removes entities whose death delay ran out, then ticks every entity.
    #[instrument(skip_all, level = "trace", fields(tick = self.tick + 1))]
    pub fn tick(&mut self) {
        self.tick += 1;

        let Self {
            world,
            entities,
            removals,
            items,
            tick,
        } = self;

        for id in removals.pop_due(*tick) {
            // stale ids and entities removed by hand are skipped
            if entities.get(id).is_some_and(Living::dead) {
                entities.remove(id);
                debug!("removed {id:?}");
            }
        }

        let mut tx = Tx::new(&*world, *tick, items, removals);
        for (_, living) in entities.iter_mut() {
            living.tick(&mut tx, *tick);
        }
    }
}
