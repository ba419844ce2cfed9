use std::{fmt, sync::Arc, time::Duration};

use geometry::aabb::Aabb;
use glam::{DVec3, IVec3};
use tracing::{debug, instrument, trace, warn};

use crate::{
    DEATH_REMOVAL_DELAY, EntityId, TICK,
    collision::{self, MAX_TRACKED_DISTANCE, block_boxes},
    config::{Config, EntityType},
    damage::{DamageSource, Health, HealingSource, Immunity},
    drop::Drop,
    effect::{Effect, EffectType, Effects},
    fall::{FallTracker, fall_damage},
    ground,
    handler::{Context, Handler, NopHandler},
    movement::{MovementComputer, Rotation},
    tx::Tx,
    values::Values,
    world::{EntityAction, EntityState, LiquidKind, Sound, Viewer, World},
};

/// Full air supply, in ticks.
pub const MAX_AIR: i32 = 300;

/// Air supply at which a drowning entity takes damage.
const DROWNING_AIR: i32 = -20;

/// Air regained per tick out of water.
const AIR_REFILL: i32 = 5;

/// Shrinks the box used to find the blocks an entity is inside of, so neighbours it merely
/// touches are left alone.
const INSIDER_SHRINK: f64 = 1e-4;

/// Moves with every component at or below this are ignored.
const MOTION_EPSILON: f64 = 1e-9;

/// Force and height of the knockback from an attack.
const ATTACK_KNOCKBACK: f64 = 0.4;

const VOID_DAMAGE: f64 = 4.0;

/// Ticks between two hits from the void.
const VOID_INTERVAL: u64 = 10;

/// A mobile, damageable entity.
pub struct Living {
    id: EntityId,
    entity_type: Arc<dyn EntityType>,
    handler: Option<Box<dyn Handler>>,
    drops: Vec<Drop>,

    position: DVec3,
    velocity: DVec3,
    rotation: Rotation,
    movement: MovementComputer,
    speed: f64,
    eye_height: f64,

    on_ground: bool,
    collided_horizontally: bool,
    collided_vertically: bool,
    fall: FallTracker,

    health: Health,
    immunity: Immunity,
    immune_duration: Duration,
    fire_ticks: u64,
    air: i32,
    effects: Effects,

    name_tag: String,
    variant: i32,
    scale: f64,
    invisible: bool,
    immobile: bool,

    values: Values,
    age: Duration,
}

impl fmt::Debug for Living {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Living")
            .field("id", &self.id)
            .field("type", &self.entity_type.encode_entity())
            .field("position", &self.position)
            .field("velocity", &self.velocity)
            .field("health", &self.health)
            .field("on_ground", &self.on_ground)
            .finish_non_exhaustive()
    }
}

impl Living {
    pub(crate) fn new(entity_type: Arc<dyn EntityType>, config: Config, position: DVec3) -> Self {
        let Config {
            handler,
            drops,
            max_health,
            movement,
            speed,
            eye_height,
            immune_duration,
            name_tag,
            ..
        } = config;

        Self {
            id: EntityId::default(),
            entity_type,
            handler: Some(handler.unwrap_or_else(|| Box::new(NopHandler))),
            drops,
            position,
            velocity: DVec3::ZERO,
            rotation: Rotation::default(),
            movement: MovementComputer::new(movement),
            speed,
            eye_height,
            on_ground: false,
            collided_horizontally: false,
            collided_vertically: false,
            fall: FallTracker::default(),
            health: Health::new(max_health),
            immunity: Immunity::default(),
            immune_duration,
            fire_ticks: 0,
            air: MAX_AIR,
            effects: Effects::default(),
            name_tag,
            variant: 0,
            scale: 1.0,
            invisible: false,
            immobile: false,
            values: Values::default(),
            age: Duration::ZERO,
        }
    }

    pub(crate) const fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    #[must_use]
    pub fn entity_type(&self) -> &dyn EntityType {
        &*self.entity_type
    }

    #[must_use]
    pub const fn position(&self) -> DVec3 {
        self.position
    }

    #[must_use]
    pub const fn velocity(&self) -> DVec3 {
        self.velocity
    }

    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Bounding box in world space.
    #[must_use]
    pub fn bbox(&self) -> Aabb {
        self.entity_type.bbox().move_by(self.position)
    }

    #[must_use]
    pub fn eye_position(&self) -> DVec3 {
        self.position + DVec3::new(0.0, self.eye_height, 0.0)
    }

    #[must_use]
    pub const fn on_ground(&self) -> bool {
        self.on_ground
    }

    #[must_use]
    pub const fn collided_horizontally(&self) -> bool {
        self.collided_horizontally
    }

    #[must_use]
    pub const fn collided_vertically(&self) -> bool {
        self.collided_vertically
    }

    #[must_use]
    pub const fn fall_distance(&self) -> f64 {
        self.fall.distance()
    }

    pub fn set_fall_distance(&mut self, distance: f64) {
        self.fall.set_distance(distance);
    }

    pub const fn reset_fall_distance(&mut self) {
        self.fall.reset();
    }

    pub fn halve_fall_distance(&mut self) {
        self.fall.set_distance(self.fall.distance() / 2.0);
    }

    #[must_use]
    pub const fn health(&self) -> f64 {
        self.health.current()
    }

    #[must_use]
    pub const fn max_health(&self) -> f64 {
        self.health.max()
    }

    pub fn set_max_health(&mut self, max: f64) {
        self.health.set_max(max);
    }

    #[must_use]
    pub fn dead(&self) -> bool {
        self.health.is_dead()
    }

    /// Whether a hit at simulation time `now` would land inside the immunity window.
    #[must_use]
    pub fn attack_immune(&self, now: Duration) -> bool {
        self.immunity.is_active(now)
    }

    #[must_use]
    pub const fn immunity(&self) -> &Immunity {
        &self.immunity
    }

    /// Movement speed after effects.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.effects.effective_speed(self.speed)
    }

    pub const fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    #[must_use]
    pub const fn air(&self) -> i32 {
        self.air
    }

    #[must_use]
    pub const fn fire_ticks(&self) -> u64 {
        self.fire_ticks
    }

    #[must_use]
    pub const fn on_fire(&self) -> bool {
        self.fire_ticks > 0
    }

    #[must_use]
    pub const fn effects(&self) -> &Effects {
        &self.effects
    }

    #[must_use]
    pub const fn values(&self) -> &Values {
        &self.values
    }

    pub const fn values_mut(&mut self) -> &mut Values {
        &mut self.values
    }

    /// Time since the entity was created.
    #[must_use]
    pub const fn age(&self) -> Duration {
        self.age
    }

    #[must_use]
    pub fn name_tag(&self) -> &str {
        &self.name_tag
    }

    /// Invisible either by [`Living::set_invisible`] or by an active invisibility effect. The two
    /// are independent: the effect wearing off leaves a manual setting in place.
    #[must_use]
    pub fn invisible(&self) -> bool {
        self.invisible || self.effects.has(EffectType::Invisibility)
    }

    #[must_use]
    pub const fn immobile(&self) -> bool {
        self.immobile
    }

    /// Replaces the handler. Safe to call from inside one of the handler's own hooks, in which case
    /// the new handler stays installed once the hook returns.
    pub fn handle(&mut self, handler: impl Handler + 'static) {
        self.handler = Some(Box::new(handler));
    }

    /// Runs `hook` against the current handler. Returns whether the hook cancelled.
    fn dispatch(
        &mut self,
        tx: &mut Tx<'_>,
        hook: impl FnOnce(&mut dyn Handler, &mut Context<'_, '_>),
    ) -> bool {
        // already inside a hook; nested actions run unobserved
        let Some(mut handler) = self.handler.take() else {
            return false;
        };

        let mut ctx = Context::new(self, tx);
        hook(&mut *handler, &mut ctx);
        let cancelled = ctx.cancelled();

        if self.handler.is_none() {
            self.handler = Some(handler);
        }
        cancelled
    }

    fn viewers<'w>(&self, tx: &Tx<'w>) -> Vec<&'w dyn Viewer> {
        tx.viewers(self.position)
    }

    #[must_use]
    pub fn state(&self) -> EntityState {
        EntityState {
            name_tag: self.name_tag.clone(),
            variant: self.variant,
            scale: self.scale,
            on_fire: self.on_fire(),
            invisible: self.invisible(),
            immobile: self.immobile,
            health: self.health.current(),
            max_health: self.health.max(),
        }
    }

    fn notify_state(&self, tx: &Tx<'_>) {
        let state = self.state();
        for viewer in self.viewers(tx) {
            viewer.view_state(self.id, &state);
        }
    }

    fn notify_action(&self, tx: &Tx<'_>, action: EntityAction) {
        for viewer in self.viewers(tx) {
            viewer.view_action(self.id, action);
        }
    }

    fn play_sound(&self, tx: &Tx<'_>, sound: Sound) {
        for viewer in self.viewers(tx) {
            viewer.view_sound(self.position, sound);
        }
    }

    pub fn set_name_tag(&mut self, tx: &Tx<'_>, name_tag: impl Into<String>) {
        self.name_tag = name_tag.into();
        self.notify_state(tx);
    }

    pub fn set_variant(&mut self, tx: &Tx<'_>, variant: i32) {
        self.variant = variant;
        self.notify_state(tx);
    }

    pub fn set_scale(&mut self, tx: &Tx<'_>, scale: f64) {
        self.scale = scale;
        self.notify_state(tx);
    }

    pub fn set_invisible(&mut self, tx: &Tx<'_>, invisible: bool) {
        self.invisible = invisible;
        self.notify_state(tx);
    }

    /// Immobile entities ignore gravity and drag, but can still be moved explicitly.
    pub fn set_immobile(&mut self, tx: &Tx<'_>, immobile: bool) {
        self.immobile = immobile;
        self.notify_state(tx);
    }

    /// Sets the entity on fire for `duration`, replacing any remaining burn time.
    pub fn set_on_fire(&mut self, tx: &Tx<'_>, duration: Duration) {
        let ticks = u64::try_from(duration.as_millis() / TICK.as_millis()).unwrap_or(u64::MAX);
        let was_on_fire = self.on_fire();
        self.fire_ticks = ticks;
        if was_on_fire != self.on_fire() {
            self.notify_state(tx);
        }
    }

    pub fn extinguish(&mut self, tx: &Tx<'_>) {
        if self.on_fire() {
            self.fire_ticks = 0;
            self.notify_state(tx);
        }
    }

    /// Adds a timed effect. Returns whether it replaced nothing stronger.
    pub fn add_effect(&mut self, tx: &Tx<'_>, effect: Effect) -> bool {
        let was_invisible = self.invisible();
        let added = self.effects.add(effect);
        if was_invisible != self.invisible() {
            self.notify_state(tx);
        }
        added
    }

    pub fn remove_effect(&mut self, tx: &Tx<'_>, kind: EffectType) -> Option<Effect> {
        let was_invisible = self.invisible();
        let removed = self.effects.remove(kind);
        if was_invisible != self.invisible() {
            self.notify_state(tx);
        }
        removed
    }

    pub fn set_velocity(&mut self, tx: &Tx<'_>, velocity: DVec3) {
        self.velocity = velocity;
        for viewer in self.viewers(tx) {
            viewer.view_velocity(self.id, velocity);
        }
    }

    /// Moves the entity to `position` without collision checks. Fall distance is forgotten.
    pub fn teleport(&mut self, tx: &Tx<'_>, position: DVec3) {
        self.position = position;
        self.fall.reset();
        self.on_ground = ground::on_ground(tx.world(), &self.bbox());
        for viewer in self.viewers(tx) {
            viewer.view_movement(self.id, self.position, self.rotation, self.on_ground);
        }
    }

    /// Deals `damage` from `source`. Returns the damage actually applied and whether the hit was
    /// accepted.
    pub fn hurt(&mut self, tx: &mut Tx<'_>, damage: f64, source: DamageSource) -> (f64, bool) {
        if self.dead() || damage.is_nan() || damage <= 0.0 {
            return (0.0, false);
        }
        if source.is_fire() && self.effects.has(EffectType::FireResistance) {
            return (0.0, false);
        }

        let now = tx.now();
        let immune = !source.ignores_immunity() && self.immunity.is_active(now);

        let mut requested = damage;
        let mut window = self.immune_duration;
        let cancelled = self.dispatch(tx, |handler, ctx| {
            handler.handle_hurt(ctx, &mut requested, immune, &mut window, &source);
        });
        if cancelled || self.dead() || requested.is_nan() || requested <= 0.0 {
            return (0.0, false);
        }

        // inside the window only the excess over the previous hit lands
        let mut applied = if immune {
            self.immunity.remaining(requested)
        } else {
            requested
        };
        if applied <= 0.0 {
            return (0.0, false);
        }

        self.immunity = Immunity {
            until: now + window,
            last_damage: requested,
        };

        if source.reduced_by_resistance() {
            applied *= self.effects.resistance_multiplier();
        }
        self.health.damage(applied);

        self.notify_action(tx, EntityAction::Hurt);
        if source.is_fire() {
            self.play_sound(tx, Sound::Burning);
        } else if source == DamageSource::Drowning {
            self.play_sound(tx, Sound::Drowning);
        }

        if let DamageSource::Attack { position, .. } = source {
            self.knock_back(tx, position, ATTACK_KNOCKBACK, ATTACK_KNOCKBACK);
        }

        if self.dead() {
            self.die(tx);
        }

        (applied, true)
    }

    fn die(&mut self, tx: &mut Tx<'_>) {
        self.health.set(0.0);
        self.notify_action(tx, EntityAction::Death);
        self.extinguish(tx);

        for drop in &self.drops {
            if let Some(stack) = drop.stack() {
                tx.spawn_item(stack, self.position);
            }
        }

        tx.schedule_removal(self.id, DEATH_REMOVAL_DELAY);
        debug!(
            "{} {:?} died at {:?}",
            self.entity_type.encode_entity(),
            self.id,
            self.position
        );
    }

    /// Restores up to `amount` health. Returns whether anything was healed.
    pub fn heal(&mut self, tx: &mut Tx<'_>, amount: f64, source: HealingSource) -> bool {
        if self.dead() || amount.is_nan() || amount <= 0.0 {
            return false;
        }

        let mut amount = amount;
        let cancelled = self.dispatch(tx, |handler, ctx| {
            handler.handle_heal(ctx, &mut amount, &source);
        });
        if cancelled || self.dead() || amount.is_nan() || amount <= 0.0 {
            return false;
        }

        self.health.heal(amount);
        true
    }

    /// Pushes the entity away from `source` horizontally with `force` and sets its vertical velocity
    /// to `height`.
    pub fn knock_back(&mut self, tx: &Tx<'_>, source: DVec3, force: f64, height: f64) {
        if self.dead() {
            return;
        }

        let mut away = self.position - source;
        away.y = 0.0;

        let mut velocity = if away.length_squared() > 0.0 {
            away.normalize() * force
        } else {
            DVec3::ZERO
        };
        velocity.y = height;

        self.set_velocity(tx, velocity);
    }

    /// Applies an explosion of `size` at `position`. `impact` is the exposure to the blast, from 0
    /// to 1.
    pub fn explode(&mut self, tx: &mut Tx<'_>, position: DVec3, impact: f64, size: f64) {
        let damage = ((impact * impact + impact) * 3.5 * size + 1.0).floor();
        self.hurt(tx, damage, DamageSource::Explosion);

        let diff = self.position - position;
        let distance = diff.length();
        let height = if distance > 0.0 { diff.y / distance * impact } else { 0.0 };
        self.knock_back(tx, position, impact, height);
    }

    /// Moves the entity by `delta`, sliding along whatever it runs into, and turns it by the given
    /// yaw and pitch.
    pub fn move_by(&mut self, tx: &mut Tx<'_>, delta: DVec3, dyaw: f64, dpitch: f64) {
        let still = delta.abs().max_element() <= MOTION_EPSILON
            && dyaw.abs() <= MOTION_EPSILON
            && dpitch.abs() <= MOTION_EPSILON;
        if self.dead() || still {
            return;
        }

        let world = tx.world();

        let committed = if delta.length() <= MAX_TRACKED_DISTANCE {
            self.check_insiders(tx);

            let resolution = collision::resolve(world, &self.bbox(), delta);
            self.collided_horizontally = resolution.collided_horizontally;
            self.collided_vertically = resolution.collided_vertically;

            // whatever ran into a block loses its speed along that axis
            let velocity = DVec3::select(resolution.blocked, DVec3::ZERO, self.velocity);
            if velocity != self.velocity {
                self.set_velocity(tx, velocity);
            }
            resolution.delta
        } else {
            warn!(
                "{:?} moved {:.2} blocks in one step, skipping collision",
                self.id,
                delta.length()
            );
            delta
        };

        self.position += committed;
        self.rotation.yaw += dyaw;
        self.rotation.pitch += dpitch;

        for viewer in self.viewers(tx) {
            viewer.view_movement(self.id, self.position, self.rotation, self.on_ground);
        }

        self.on_ground = ground::on_ground(world, &self.bbox());
        self.update_fall(tx, committed.y);
    }

    /// Invokes every block the entity is inside of.
    fn check_insiders(&mut self, tx: &mut Tx<'_>) {
        let world = tx.world();
        let region = self.bbox().shrink(INSIDER_SHRINK);

        for pos in region.covered_blocks().iter() {
            let block = world.block(pos);
            if let Some(insider) = block.as_entity_insider() {
                insider.entity_inside(pos, tx, self);
            }

            if block.as_liquid().is_some() {
                continue;
            }

            if let Some(insider) = world.liquid(pos).and_then(|liquid| liquid.as_entity_insider()) {
                insider.entity_inside(pos, tx, self);
            }
        }
    }

    fn update_fall(&mut self, tx: &mut Tx<'_>, dy: f64) {
        if let Some(distance) = self.fall.update(self.on_ground, dy) {
            self.land(tx, distance);
        }
    }

    fn land(&mut self, tx: &mut Tx<'_>, distance: f64) {
        let world = tx.world();

        let mut pos = self.position.floor().as_ivec3();
        if world.block(pos).collision_boxes(pos, world).is_empty() {
            pos -= IVec3::Y;
        }

        let distance = world
            .block(pos)
            .as_entity_lander()
            .map_or(distance, |lander| lander.entity_land(pos, world, self, distance));

        trace!("{:?} landed after falling {distance:.2} blocks", self.id);

        if let Some(damage) = fall_damage(distance) {
            self.hurt(tx, damage, DamageSource::Fall);
        }
    }

    /// Advances the entity by one tick. `current` is the simulation's tick counter.
    #[instrument(skip_all, level = "trace")]
    pub fn tick(&mut self, tx: &mut Tx<'_>, current: u64) {
        if self.dispatch(tx, |handler, ctx| handler.handle_tick(ctx, current)) {
            return;
        }

        self.age += TICK;
        if self.dead() {
            return;
        }

        self.tick_effects(tx);
        self.check_void(tx, current);
        self.tick_fire(tx);
        self.tick_air(tx);
        self.check_suffocation(tx);

        if self.dead() || self.immobile {
            return;
        }

        let movement = self
            .movement
            .tick(tx.world(), self.position, self.velocity, self.on_ground);
        if movement.velocity != self.velocity {
            self.set_velocity(tx, movement.velocity);
        }
        self.move_by(tx, movement.delta, 0.0, 0.0);
    }

    fn tick_effects(&mut self, tx: &mut Tx<'_>) {
        let (fired, expired) = self.effects.tick();

        for effect in fired {
            match effect.kind {
                EffectType::Regeneration => {
                    self.heal(tx, 1.0, HealingSource::Regeneration);
                }
                EffectType::Poison if self.health.current() > 1.0 => {
                    self.hurt(tx, 1.0, DamageSource::Poison);
                }
                _ => {}
            }
        }

        let invisibility_ended = expired.iter().any(|effect| effect.kind == EffectType::Invisibility);
        if invisibility_ended && !self.invisible() {
            self.notify_state(tx);
        }
    }

    fn check_void(&mut self, tx: &mut Tx<'_>, current: u64) {
        let floor = f64::from(tx.world().floor());
        if self.position.y < floor && current % VOID_INTERVAL == 0 {
            self.hurt(tx, VOID_DAMAGE, DamageSource::Void);
        }
    }

    fn tick_fire(&mut self, tx: &mut Tx<'_>) {
        if !self.on_fire() {
            return;
        }

        let world = tx.world();
        let feet = self.position.floor().as_ivec3();
        if self.in_liquid(world, LiquidKind::Water) || world.raining_at(feet) {
            self.extinguish(tx);
            return;
        }

        if self.fire_ticks % 20 == 0 {
            self.hurt(tx, 1.0, DamageSource::Fire);
        }

        self.fire_ticks = self.fire_ticks.saturating_sub(1);
        if self.fire_ticks == 0 {
            self.notify_state(tx);
        }
    }

    fn tick_air(&mut self, tx: &mut Tx<'_>) {
        let world = tx.world();
        let eyes = self.eye_position().floor().as_ivec3();

        let drowning = liquid_at(world, eyes) == Some(LiquidKind::Water)
            && !self.effects.has(EffectType::WaterBreathing);

        if drowning {
            self.air -= 1;
            if self.air <= DROWNING_AIR {
                self.air = 0;
                self.hurt(tx, 2.0, DamageSource::Drowning);
            }
        } else {
            self.air = (self.air + AIR_REFILL).min(MAX_AIR);
        }
    }

    fn check_suffocation(&mut self, tx: &mut Tx<'_>) {
        let eye = self.eye_position();
        let inside = block_boxes(tx.world(), eye.floor().as_ivec3())
            .iter()
            .any(|bb| eye.cmpgt(bb.min).all() && eye.cmplt(bb.max).all());

        if inside {
            self.hurt(tx, 1.0, DamageSource::Suffocation);
        }
    }

    fn in_liquid(&self, world: &dyn World, kind: LiquidKind) -> bool {
        self.bbox()
            .shrink(INSIDER_SHRINK)
            .covered_blocks()
            .iter()
            .any(|pos| liquid_at(world, pos) == Some(kind))
    }
}

/// The liquid at `pos`, whether it is the block itself or layered over it.
fn liquid_at(world: &dyn World, pos: IVec3) -> Option<LiquidKind> {
    if let Some(liquid) = world.block(pos).as_liquid() {
        return Some(liquid.kind());
    }
    world
        .liquid(pos)
        .and_then(|block| block.as_liquid())
        .map(|liquid| liquid.kind())
}
