use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WorldConfig {
    /// Minimum corner of the play-area, in world coordinates.
    pub origin_x: f32,
    pub origin_y: f32,
    pub width: f32,
    pub height: f32,
    pub agent_count: usize,
    /// Per-node bucket size of the spatial index.
    pub index_capacity: usize,
    /// Root RNG seed. `None` draws a fresh seed at startup.
    pub seed: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ForcesConfig {
    /// Neighbor gather radius.
    pub large_range: f32,
    /// Separation radius, a subset of `large_range`.
    pub close_range: f32,
    pub velocity_alignment: f32,
    pub position_alignment: f32,
    pub path_alignment: f32,
    pub avoid_strength: f32,
    pub random_strength: f32,
    pub velocity_decay: f32,
    pub acc_strength: f32,
    pub max_vel: f32,
    pub margin: f32,
    pub critical_margin: f32,
    pub margin_steer: f32,
    /// Path lookahead as a fraction of the curve's total arc length.
    pub lookahead_fraction: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FoodConfig {
    pub detection_radius: f32,
    pub eat_radius: f32,
    pub attraction_strength: f32,
    /// Ticks a marker stays alive after placement.
    pub lifetime: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SwarmConfig {
    pub world: WorldConfig,
    pub forces: ForcesConfig,
    pub food: FoodConfig,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig {
                origin_x: 0.0,
                origin_y: 0.0,
                width: 1920.0,
                height: 1080.0,
                agent_count: 500,
                index_capacity: 10,
                seed: None,
            },
            forces: ForcesConfig {
                large_range: 30.0,
                close_range: 15.0,
                velocity_alignment: 0.05,
                position_alignment: 0.05,
                path_alignment: 0.1,
                avoid_strength: 0.4,
                random_strength: 0.1,
                velocity_decay: 0.985,
                acc_strength: 0.2,
                max_vel: 2.0,
                margin: 10.0,
                critical_margin: 5.0,
                margin_steer: 2.0,
                lookahead_fraction: 0.03,
            },
            food: FoodConfig {
                detection_radius: 100.0,
                eat_radius: 10.0,
                attraction_strength: 0.2,
                lifetime: 3000,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("play area must have positive size, got {width}x{height}")]
    EmptyArea { width: f32, height: f32 },
    #[error("{name} must be non-negative, got {value}")]
    NegativeValue { name: &'static str, value: f32 },
    #[error("velocity_decay must be in (0, 1], got {0}")]
    BadDecay(f32),
    #[error("margin {margin} must be smaller than the play-area half-extent {half}")]
    MarginTooLarge { margin: f32, half: f32 },
    #[error("index_capacity must be at least 1")]
    ZeroCapacity,
}

impl SwarmConfig {
    /// Reads the configuration from `path`, falling back to the defaults on a
    /// missing or malformed file. A default file is written when none exists.
    pub fn load_or_default(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(err) => {
                    warn!(%err, path = %path.display(), "config parse failed, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                let default = Self::default();
                if let Ok(serialized) = toml::to_string(&default) {
                    let _ = fs::write(path, serialized);
                }
                default
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        if w.width <= 0.0 || w.height <= 0.0 {
            return Err(ConfigError::EmptyArea {
                width: w.width,
                height: w.height,
            });
        }
        if w.index_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        let f = &self.forces;
        for (name, value) in [
            ("large_range", f.large_range),
            ("close_range", f.close_range),
            ("velocity_alignment", f.velocity_alignment),
            ("position_alignment", f.position_alignment),
            ("path_alignment", f.path_alignment),
            ("avoid_strength", f.avoid_strength),
            ("random_strength", f.random_strength),
            ("acc_strength", f.acc_strength),
            ("max_vel", f.max_vel),
            ("margin", f.margin),
            ("critical_margin", f.critical_margin),
            ("margin_steer", f.margin_steer),
            ("lookahead_fraction", f.lookahead_fraction),
            ("detection_radius", self.food.detection_radius),
            ("eat_radius", self.food.eat_radius),
            ("attraction_strength", self.food.attraction_strength),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeValue { name, value });
            }
        }

        if f.velocity_decay <= 0.0 || f.velocity_decay > 1.0 {
            return Err(ConfigError::BadDecay(f.velocity_decay));
        }

        let half = (w.width.min(w.height)) * 0.5;
        if f.margin >= half {
            return Err(ConfigError::MarginTooLarge {
                margin: f.margin,
                half,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SwarmConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_empty_play_area() {
        let mut config = SwarmConfig::default();
        config.world.width = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyArea { .. })
        ));
    }

    #[test]
    fn rejects_negative_strength() {
        let mut config = SwarmConfig::default();
        config.forces.avoid_strength = -0.1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeValue { name: "avoid_strength", .. })
        ));
    }

    #[test]
    fn rejects_margin_wider_than_half_extent() {
        let mut config = SwarmConfig::default();
        config.world.width = 30.0;
        config.world.height = 30.0;
        config.forces.margin = 15.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MarginTooLarge { .. })
        ));
    }

    #[test]
    fn rejects_decay_outside_unit_interval() {
        let mut config = SwarmConfig::default();
        config.forces.velocity_decay = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::BadDecay(_))));
    }

    #[test]
    fn roundtrips_through_toml() {
        let config = SwarmConfig::default();
        let serialized = toml::to_string(&config).expect("serialize");
        let parsed: SwarmConfig = toml::from_str(&serialized).expect("parse");
        assert_eq!(parsed.world.agent_count, config.world.agent_count);
        assert_eq!(parsed.forces.max_vel, config.forces.max_vel);
        assert_eq!(parsed.food.lifetime, config.food.lifetime);
    }
}
