//! Hooks that let game logic observe and veto what happens to an entity.

use std::time::Duration;

use crate::{
    damage::{DamageSource, HealingSource},
    living::Living,
    tx::Tx,
};

/// What a hook gets to work with: the entity, the running transaction, and a way to cancel the
/// action that triggered the hook.
pub struct Context<'a, 'w> {
    living: &'a mut Living,
    tx: &'a mut Tx<'w>,
    cancelled: bool,
}

impl<'a, 'w> Context<'a, 'w> {
    pub(crate) fn new(living: &'a mut Living, tx: &'a mut Tx<'w>) -> Self {
        Self {
            living,
            tx,
            cancelled: false,
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    #[must_use]
    pub const fn cancelled(&self) -> bool {
        self.cancelled
    }

    #[must_use]
    pub fn living(&self) -> &Living {
        &*self.living
    }

    pub fn living_mut(&mut self) -> &mut Living {
        &mut *self.living
    }

    pub fn tx(&mut self) -> &mut Tx<'w> {
        &mut *self.tx
    }

    /// Both halves at once, for calling entity methods that need the transaction.
    pub fn split(&mut self) -> (&mut Living, &mut Tx<'w>) {
        (&mut *self.living, &mut *self.tx)
    }
}

/// Game logic attached to an entity. Every hook does nothing by default.
pub trait Handler {
    /// Runs first thing every tick. Cancelling skips the rest of the tick.
    fn handle_tick(&mut self, _ctx: &mut Context<'_, '_>, _current: u64) {}

    /// Runs before damage is applied, with the full requested `damage`. Both `damage` and the
    /// length of the immunity window the hit opens may be changed. `immune` tells whether the hit
    /// landed inside an active window; if so, only the part of `damage` above the previous hit is
    /// dealt, and nothing at all when that is not positive.
    fn handle_hurt(
        &mut self,
        _ctx: &mut Context<'_, '_>,
        _damage: &mut f64,
        _immune: bool,
        _immunity: &mut Duration,
        _source: &DamageSource,
    ) {
    }

    fn handle_heal(&mut self, _ctx: &mut Context<'_, '_>, _health: &mut f64, _source: &HealingSource) {}
}

#[derive(Copy, Clone, Debug, Default)]
pub struct NopHandler;

impl Handler for NopHandler {}
