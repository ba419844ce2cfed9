use std::{fmt, sync::Arc, time::Duration};

use geometry::aabb::Aabb;
use glam::DVec3;
use thiserror::Error;

use crate::{drop::Drop, handler::Handler, living::Living, settings::Settings};

/// Describes a kind of entity.
pub trait EntityType: Send + Sync {
    /// Namespaced identifier, such as `minecraft:zombie`.
    fn encode_entity(&self) -> &str;

    /// Bounding box relative to the entity's feet.
    fn bbox(&self) -> Aabb;
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("entity type must be set before the config can be applied")]
    MissingEntityType,
    #[error("max health must be positive, got {0}")]
    InvalidMaxHealth(f64),
}

/// How velocity decays every tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MovementParams {
    pub gravity: f64,
    pub drag: f64,
    /// Apply drag to vertical velocity before gravity rather than after.
    pub drag_before_gravity: bool,
}

impl Default for MovementParams {
    fn default() -> Self {
        Self {
            gravity: 0.08,
            drag: 0.02,
            drag_before_gravity: true,
        }
    }
}

/// Everything needed to spawn a [`Living`].
pub struct Config {
    pub entity_type: Option<Arc<dyn EntityType>>,
    pub handler: Option<Box<dyn Handler>>,
    pub drops: Vec<Drop>,
    pub max_health: f64,
    pub movement: MovementParams,
    pub speed: f64,
    pub eye_height: f64,
    /// Length of the invincibility window opened by an accepted hit.
    pub immune_duration: Duration,
    pub name_tag: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "entity_type",
                &self.entity_type.as_ref().map(|kind| kind.encode_entity()),
            )
            .field("has_handler", &self.handler.is_some())
            .field("drops", &self.drops)
            .field("max_health", &self.max_health)
            .field("movement", &self.movement)
            .field("speed", &self.speed)
            .field("eye_height", &self.eye_height)
            .field("immune_duration", &self.immune_duration)
            .field("name_tag", &self.name_tag)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl Config {
    #[must_use]
    pub fn new(entity_type: Arc<dyn EntityType>) -> Self {
        Self {
            entity_type: Some(entity_type),
            ..Self::default()
        }
    }

    /// A config without an entity type, with every other field taken from `settings`.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            entity_type: None,
            handler: None,
            drops: Vec::new(),
            max_health: settings.max_health,
            movement: MovementParams {
                gravity: settings.gravity,
                drag: settings.drag,
                drag_before_gravity: settings.drag_before_gravity,
            },
            speed: settings.speed,
            eye_height: settings.eye_height,
            immune_duration: settings.immune_duration,
            name_tag: String::new(),
        }
    }

    #[must_use]
    pub fn with_handler(mut self, handler: impl Handler + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn with_drop(mut self, drop: Drop) -> Self {
        self.drops.push(drop);
        self
    }

    #[must_use]
    pub const fn with_max_health(mut self, max_health: f64) -> Self {
        self.max_health = max_health;
        self
    }

    #[must_use]
    pub const fn with_movement(mut self, movement: MovementParams) -> Self {
        self.movement = movement;
        self
    }

    #[must_use]
    pub fn with_name_tag(mut self, name_tag: impl Into<String>) -> Self {
        self.name_tag = name_tag.into();
        self
    }

    /// Builds the entity at `position` with full health.
    pub fn apply(self, position: DVec3) -> Result<Living, ConfigError> {
        let entity_type = self.entity_type.clone().ok_or(ConfigError::MissingEntityType)?;

        if self.max_health.is_nan() || self.max_health <= 0.0 {
            return Err(ConfigError::InvalidMaxHealth(self.max_health));
        }

        Ok(Living::new(entity_type, self, position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pig;

    impl EntityType for Pig {
        fn encode_entity(&self) -> &str {
            "minecraft:pig"
        }

        fn bbox(&self) -> Aabb {
            Aabb::new((-0.45, 0.0, -0.45), (0.45, 0.9, 0.45))
        }
    }

    #[test]
    fn missing_entity_type() {
        let result = Config::default().apply(DVec3::ZERO);
        assert!(matches!(result, Err(ConfigError::MissingEntityType)));
    }

    #[test]
    fn non_positive_max_health() {
        let result = Config::new(Arc::new(Pig))
            .with_max_health(0.0)
            .apply(DVec3::ZERO);
        assert!(matches!(result, Err(ConfigError::InvalidMaxHealth(_))));
    }

    #[test]
    fn defaults() {
        let config = Config::new(Arc::new(Pig));
        assert!((config.max_health - 20.0).abs() < f64::EPSILON);
        assert_eq!(config.immune_duration, Duration::from_millis(500));
        assert_eq!(config.movement, MovementParams::default());
        assert!(config.apply(DVec3::ZERO).is_ok());
    }
}
