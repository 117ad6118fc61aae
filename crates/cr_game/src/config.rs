//! Tunable game constants.
//!
//! Defaults reproduce the classic feel: per-frame gravity and jump impulse at
//! 60 Hz, a 2 s spawn cadence and 2 s of invincibility after a hit. Any field
//! can be overridden from an optional JSON file; absent fields keep defaults.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Added to vertical velocity every frame.
    pub gravity: f32,
    /// Vertical velocity set on jump (negative is up).
    pub jump_force: f32,
    /// Carried for lateral control; nothing reads it yet.
    pub move_speed: f32,
    pub obstacle_base_speed: f32,
    pub obstacle_speed_step: f32,
    /// Seconds between obstacle speed increases.
    pub speed_up_interval: f32,
    /// Seconds between obstacle spawns.
    pub obstacle_spawn_interval: f32,
    pub obstacle_min_size: f32,
    pub obstacle_max_size: f32,
    pub invincibility_duration: f32,
    pub starting_lives: u32,
    /// Edge length of the square player hitbox and sprite.
    pub player_size: f32,
    pub player_start_x: f32,
    pub player_start_y: f32,
    /// Top of the ground platform; obstacles sit on this line.
    pub ground_y: f32,
    pub ground_thickness: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub ranking_path: PathBuf,
    pub ranking_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            jump_force: -15.0,
            move_speed: 5.0,
            obstacle_base_speed: 5.0,
            obstacle_speed_step: 0.1,
            speed_up_interval: 10.0,
            obstacle_spawn_interval: 2.0,
            obstacle_min_size: 50.0,
            obstacle_max_size: 150.0,
            invincibility_duration: 2.0,
            starting_lives: 3,
            player_size: 80.0,
            player_start_x: 100.0,
            player_start_y: 300.0,
            ground_y: 400.0,
            ground_thickness: 20.0,
            viewport_width: 1024.0,
            viewport_height: 768.0,
            ranking_path: PathBuf::from("rank.txt"),
            ranking_capacity: 10,
        }
    }
}

impl GameConfig {
    pub fn player_start(&self) -> Vec2 {
        Vec2::new(self.player_start_x, self.player_start_y)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // serde_json narrows out-of-range f32 values to infinity.
        let finite = [
            ("gravity", self.gravity),
            ("jump_force", self.jump_force),
            ("move_speed", self.move_speed),
            ("obstacle_base_speed", self.obstacle_base_speed),
            ("obstacle_speed_step", self.obstacle_speed_step),
            ("obstacle_max_size", self.obstacle_max_size),
            ("invincibility_duration", self.invincibility_duration),
            ("player_start_x", self.player_start_x),
            ("player_start_y", self.player_start_y),
            ("ground_y", self.ground_y),
            ("ground_thickness", self.ground_thickness),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be finite")));
            }
        }
        let positive = [
            ("obstacle_spawn_interval", self.obstacle_spawn_interval),
            ("speed_up_interval", self.speed_up_interval),
            ("obstacle_min_size", self.obstacle_min_size),
            ("player_size", self.player_size),
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be > 0")));
            }
        }
        if self.obstacle_min_size >= self.obstacle_max_size {
            return Err(ConfigError::Invalid(
                "obstacle_min_size must be < obstacle_max_size".to_string(),
            ));
        }
        if self.invincibility_duration < 0.0 {
            return Err(ConfigError::Invalid(
                "invincibility_duration must be >= 0".to_string(),
            ));
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::Invalid("starting_lives must be > 0".to_string()));
        }
        if self.ranking_capacity == 0 {
            return Err(ConfigError::Invalid(
                "ranking_capacity must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: GameConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// Config file is optional: a missing file means defaults, a broken one is
/// reported and also falls back to defaults.
pub fn load_or_default(path: &Path) -> GameConfig {
    if !path.exists() {
        log::info!("No config at '{}', using defaults", path.display());
        return GameConfig::default();
    }
    match load_config_from_path(path) {
        Ok(config) => {
            log::info!("Loaded config '{}'", path.display());
            config
        }
        Err(err) => {
            log::error!("{err}; using defaults");
            GameConfig::default()
        }
    }
}
