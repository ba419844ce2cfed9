//! Timed status effects.

use rustc_hash::FxHashMap;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EffectType {
    Speed,
    Slowness,
    Regeneration,
    Poison,
    Resistance,
    FireResistance,
    WaterBreathing,
    Invisibility,
}

impl EffectType {
    /// Ticks between two heals or hits of a periodic effect at `level`.
    #[must_use]
    pub fn interval(self, level: u32) -> Option<u64> {
        let base: u64 = match self {
            Self::Regeneration => 50,
            Self::Poison => 25,
            _ => return None,
        };
        let shift = level.saturating_sub(1).min(63);
        Some((base >> shift).max(1))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Effect {
    pub kind: EffectType,
    /// Starts at 1.
    pub level: u32,
    /// Ticks left before the effect wears off.
    pub remaining: u64,
}

impl Effect {
    #[must_use]
    pub fn new(kind: EffectType, level: u32, remaining: u64) -> Self {
        Self {
            kind,
            level: level.max(1),
            remaining,
        }
    }

    /// Whether the periodic part of the effect fires this tick.
    #[must_use]
    pub fn fires(&self) -> bool {
        self.kind
            .interval(self.level)
            .is_some_and(|interval| self.remaining % interval == 0)
    }
}

/// At most one active effect per type.
#[derive(Clone, Debug, Default)]
pub struct Effects {
    active: FxHashMap<EffectType, Effect>,
}

impl Effects {
    /// Adds `effect` unless a stronger or longer one of the same type is already active. Returns
    /// whether the effect was stored.
    pub fn add(&mut self, effect: Effect) -> bool {
        if let Some(current) = self.active.get(&effect.kind) {
            let stronger = effect.level > current.level;
            let longer = effect.level == current.level && effect.remaining > current.remaining;
            if !stronger && !longer {
                return false;
            }
        }
        self.active.insert(effect.kind, effect);
        true
    }

    pub fn remove(&mut self, kind: EffectType) -> Option<Effect> {
        self.active.remove(&kind)
    }

    #[must_use]
    pub fn get(&self, kind: EffectType) -> Option<&Effect> {
        self.active.get(&kind)
    }

    #[must_use]
    pub fn has(&self, kind: EffectType) -> bool {
        self.active.contains_key(&kind)
    }

    /// Level of `kind`, or 0 when inactive.
    #[must_use]
    pub fn level(&self, kind: EffectType) -> u32 {
        self.get(kind).map_or(0, |effect| effect.level)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.active.values()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Counts every effect down by one tick and removes the expired ones. Returns the effects that
    /// fired their periodic action this tick and the ones that expired.
    pub fn tick(&mut self) -> (Vec<Effect>, Vec<Effect>) {
        let fired = self.active.values().filter(|e| e.fires()).copied().collect();

        let mut expired = Vec::new();
        self.active.retain(|_, effect| {
            effect.remaining = effect.remaining.saturating_sub(1);
            if effect.remaining == 0 {
                expired.push(*effect);
                false
            } else {
                true
            }
        });

        (fired, expired)
    }

    /// `base` scaled by Speed (+20% per level) and Slowness (-15% per level), never negative.
    #[must_use]
    pub fn effective_speed(&self, base: f64) -> f64 {
        let speed = f64::from(self.level(EffectType::Speed));
        let slowness = f64::from(self.level(EffectType::Slowness));
        (base * (1.0 + 0.2 * speed - 0.15 * slowness)).max(0.0)
    }

    /// Multiplier for incoming damage under Resistance (20% per level).
    #[must_use]
    pub fn resistance_multiplier(&self) -> f64 {
        let level = f64::from(self.level(EffectType::Resistance));
        (1.0 - 0.2 * level).max(0.0)
    }
}
