//! Simulation configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `wildlens.ron` file (if exists), or the file given on the command line
//! 3. Environment variables prefixed with `WILDLENS_`
//!
//! Nested keys are separated by `__`, for example
//! `WILDLENS_PLAYER__PHOTO_INTERVAL=2.5` sets `player.photo_interval`.

use std::path::Path;

use anyhow::{Context, Result, ensure};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use wildlens_core::{CameraRig, TerrainConfig};
use wildlens_creature::CreatureConfig;
use wildlens_photo::{CombineConfig, ScoringConfig};

/// Main simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub simulation: RunConfig,

    #[serde(default)]
    pub population: PopulationConfig,

    #[serde(default)]
    pub food: FoodSpawnConfig,

    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default)]
    pub terrain: TerrainConfig,

    #[serde(default)]
    pub camera: CameraRig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub combine: CombineConfig,

    #[serde(default = "CreatureConfig::ground")]
    pub ground_creature: CreatureConfig,

    #[serde(default = "CreatureConfig::airborne")]
    pub airborne_creature: CreatureConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            simulation: RunConfig::default(),
            population: PopulationConfig::default(),
            food: FoodSpawnConfig::default(),
            player: PlayerConfig::default(),
            terrain: TerrainConfig::default(),
            camera: CameraRig::default(),
            scoring: ScoringConfig::default(),
            combine: CombineConfig::default(),
            ground_creature: CreatureConfig::ground(),
            airborne_creature: CreatureConfig::airborne(),
        }
    }
}

/// Clock and determinism
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub seed: u64,
    /// Simulated seconds
    pub duration_secs: f32,
    /// Ticks per simulated second
    pub tick_rate: f32,
    /// Tick creatures on the rayon pool
    pub parallel: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            duration_secs: 120.0,
            tick_rate: 30.0,
            parallel: true,
        }
    }
}

/// Who lives in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub ground: usize,
    pub airborne: usize,
    /// Probability a spawned creature is Fearful
    pub fearful_share: f32,
    /// Probability a spawned creature is Hostile (checked after Fearful)
    pub hostile_share: f32,
    /// Creatures spawn inside this disk around the origin
    pub spawn_radius: f32,
    /// Airborne creatures spawn this far above the ground
    pub spawn_altitude: f32,
    pub max_creatures: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            ground: 12,
            airborne: 8,
            fearful_share: 0.3,
            hostile_share: 0.1,
            spawn_radius: 60.0,
            spawn_altitude: 6.0,
            max_creatures: 256,
        }
    }
}

/// How food appears
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodSpawnConfig {
    pub initial: usize,
    /// Seconds between new food drops
    pub respawn_interval: f32,
    pub lifetime: f32,
    pub scatter_radius: f32,
    /// No drops while this many sources are available
    pub max_available: usize,
}

impl Default for FoodSpawnConfig {
    fn default() -> Self {
        Self {
            initial: 10,
            respawn_interval: 4.0,
            lifetime: 45.0,
            scatter_radius: 60.0,
            max_available: 20,
        }
    }
}

/// The photographer, who is also the threat creatures react to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub walk_speed: f32,
    /// Radius of the circular walk around the origin
    pub path_radius: f32,
    pub photo_interval: f32,
    pub dart_interval: f32,
    pub dart_range: f32,
    pub stun_duration: f32,
    pub lure_interval: f32,
    pub lure_radius: f32,
    pub lure_duration: f32,
    /// Lures are dropped this far ahead of the player
    pub lure_throw: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 1.5,
            path_radius: 25.0,
            photo_interval: 3.0,
            dart_interval: 17.0,
            dart_range: 25.0,
            stun_duration: 6.0,
            lure_interval: 23.0,
            lure_radius: 25.0,
            lure_duration: 8.0,
            lure_throw: 6.0,
        }
    }
}

impl SimConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `wildlens.ron`, or `file` when given
    /// 3. Environment variables prefixed with `WILDLENS_` (highest priority)
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_layers(file, environment())
    }

    fn load_layers(file: Option<&Path>, env: Environment) -> Result<Self> {
        let file_source = match file {
            Some(path) => File::from(path).format(FileFormat::Ron).required(true),
            None => File::with_name("wildlens")
                .format(FileFormat::Ron)
                .required(false),
        };

        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("simulation.seed", 42_i64)?
            .set_default("simulation.duration_secs", 120.0)?
            .set_default("simulation.tick_rate", 30.0)?
            .set_default("simulation.parallel", true)?
            .set_default("population.ground", 12_i64)?
            .set_default("population.airborne", 8_i64)?
            .set_default("player.photo_interval", 3.0)?
            .set_default("ground_creature.kind", "Ground")?
            .set_default("airborne_creature.kind", "Airborne")?
            // Layer 2: Config file
            .add_source(file_source)
            // Layer 3: Environment variables (WILDLENS_PLAYER__WALK_SPEED, etc.)
            .add_source(env);

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let run = &self.simulation;
        ensure!(run.tick_rate > 0.0, "simulation.tick_rate must be positive");
        ensure!(
            run.duration_secs >= 0.0,
            "simulation.duration_secs must not be negative"
        );

        let player = &self.player;
        for (name, value) in [
            ("player.photo_interval", player.photo_interval),
            ("player.dart_interval", player.dart_interval),
            ("player.lure_interval", player.lure_interval),
            ("food.respawn_interval", self.food.respawn_interval),
        ] {
            ensure!(value > 0.0, "{name} must be positive, got {value}");
        }

        self.ground_creature
            .validate()
            .context("Invalid ground_creature")?;
        ensure!(
            !self.ground_creature.is_airborne(),
            "ground_creature must have kind Ground"
        );
        self.airborne_creature
            .validate()
            .context("Invalid airborne_creature")?;
        ensure!(
            self.airborne_creature.is_airborne(),
            "airborne_creature must have kind Airborne"
        );
        let camera = &self.camera;
        ensure!(
            camera.fov_y_degrees > 0.0 && camera.fov_y_degrees < 180.0,
            "camera.fov_y_degrees must be inside (0, 180), got {}",
            camera.fov_y_degrees
        );
        ensure!(
            camera.max_range > 0.0,
            "camera.max_range must be positive, got {}",
            camera.max_range
        );
        ensure!(
            camera.eye_height >= 0.0,
            "camera.eye_height must not be negative, got {}",
            camera.eye_height
        );

        self.scoring.validate().context("Invalid scoring")?;
        self.combine.validate().context("Invalid combine")?;
        Ok(())
    }
}

/// `WILDLENS_` prefix, `__` between nested keys
fn environment() -> Environment {
    Environment::with_prefix("WILDLENS")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.simulation.seed, 42);
        assert_eq!(config.population.ground, 12);
        assert!(config.airborne_creature.is_airborne());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_with_defaults() {
        // Should load defaults when no config file exists
        let config = SimConfig::load(None).expect("Failed to load config");
        assert_eq!(config.simulation.tick_rate, 30.0);
        assert_eq!(config.scoring.min_size_pct, 0.15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_ron_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".ron")
            .tempfile()
            .expect("temp file");
        write!(
            file,
            "(simulation: (seed: 7, duration_secs: 10.0), population: (ground: 3, airborne: 1))"
        )
        .expect("write config");

        let config = SimConfig::load(Some(file.path())).expect("Failed to load config");
        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.population.ground, 3);
        assert_eq!(config.population.airborne, 1);
        // Untouched sections keep their defaults
        assert_eq!(config.player.photo_interval, 3.0);
        assert!(config.airborne_creature.is_airborne());
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        assert!(SimConfig::load(Some(Path::new("does/not/exist.ron"))).is_err());
    }

    #[test]
    fn test_validate_rejects_swapped_kinds() {
        let config = SimConfig {
            ground_creature: CreatureConfig::airborne(),
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_environment_overrides_nested_keys() {
        let vars = config::Map::from([
            ("WILDLENS_PLAYER__PHOTO_INTERVAL".to_string(), "2.5".to_string()),
            ("WILDLENS_SIMULATION__SEED".to_string(), "9".to_string()),
        ]);
        let config = SimConfig::load_layers(None, environment().source(Some(vars)))
            .expect("Failed to load config");
        assert_eq!(config.player.photo_interval, 2.5);
        assert_eq!(config.simulation.seed, 9);
    }

    #[test]
    fn test_validate_rejects_bad_camera() {
        let mut config = SimConfig::default();
        config.camera.fov_y_degrees = 0.0;
        assert!(config.validate().is_err());

        config.camera.fov_y_degrees = 180.0;
        assert!(config.validate().is_err());

        config.camera.fov_y_degrees = 60.0;
        config.camera.max_range = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_viewport_fails_to_load() {
        let mut file = tempfile::Builder::new()
            .suffix(".ron")
            .tempfile()
            .expect("temp file");
        write!(file, "(camera: (viewport: (width: 0.0, height: 0.0)))").expect("write config");
        assert!(SimConfig::load(Some(file.path())).is_err());
    }
}
