//! Entity defaults loaded from a `toml` file.

use std::{fmt::Debug, path::Path, time::Duration};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Defaults applied to every [`Config`](crate::Config) built with
/// [`Config::from_settings`](crate::Config::from_settings).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub max_health: f64,
    pub gravity: f64,
    pub drag: f64,
    pub drag_before_gravity: bool,
    pub speed: f64,
    pub eye_height: f64,
    /// Written as a human readable duration, such as `500ms`.
    #[serde(with = "humantime_duration")]
    pub immune_duration: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_health: 20.0,
            gravity: 0.08,
            drag: 0.02,
            drag_before_gravity: true,
            speed: 0.1,
            eye_height: 1.62,
            immune_duration: Duration::from_millis(500),
        }
    }
}

impl Settings {
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).context("failed to parse entity settings")
    }

    /// Reads the settings at `path`. A missing file is created with the defaults.
    #[instrument]
    pub fn load<P: AsRef<Path> + Debug>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        info!("loading entity settings");

        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            return Self::from_toml_str(&contents);
        }

        info!("entity settings not found, using defaults");

        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(
                    "failed to create parent directories for {}: {e}, using defaults",
                    path.display()
                );
                return Ok(Self::default());
            }
        }

        let defaults = Self::default();
        let contents = toml::to_string(&defaults).context("failed to encode default settings")?;
        std::fs::write(path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;

        info!("wrote default entity settings to {}", path.display());

        Ok(defaults)
    }
}

mod humantime_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*duration))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn partial_file() {
        let settings = Settings::from_toml_str(
            r#"
            max_health = 40.0
            immune_duration = "1s 250ms"
            "#,
        )
        .unwrap();

        assert!((settings.max_health - 40.0).abs() < f64::EPSILON);
        assert_eq!(settings.immune_duration, Duration::from_millis(1250));
        assert!((settings.gravity - 0.08).abs() < f64::EPSILON);
    }

    #[test]
    fn bad_duration() {
        assert!(Settings::from_toml_str(r#"immune_duration = "soon""#).is_err());
    }

    #[test]
    fn defaults_survive_encoding() {
        let encoded = toml::to_string(&Settings::default()).unwrap();
        assert!(encoded.contains("immune_duration = \"500ms\""));
        assert_eq!(Settings::from_toml_str(&encoded).unwrap(), Settings::default());
    }
}
