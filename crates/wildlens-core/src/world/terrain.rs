//! Terrain height probe
//!
//! A square patch of ground centred on the origin. Heights come from
//! OpenSimplex2 noise, or are constant when `amplitude` is zero. Outside the
//! patch there is no navigable surface.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use serde::{Deserialize, Serialize};

use super::WorldError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Half the side length of the walkable square
    pub half_size: f32,
    pub base_height: f32,
    /// Peak deviation from `base_height`; zero gives flat ground
    pub amplitude: f32,
    pub frequency: f32,
    pub seed: i32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            half_size: 200.0,
            base_height: 0.0,
            amplitude: 3.0,
            frequency: 0.02,
            seed: 1337,
        }
    }
}

impl TerrainConfig {
    pub fn flat(half_size: f32) -> Self {
        Self {
            half_size,
            amplitude: 0.0,
            ..Self::default()
        }
    }
}

pub struct Terrain {
    config: TerrainConfig,
    noise: Option<FastNoiseLite>,
}

impl Terrain {
    pub fn new(config: TerrainConfig) -> Result<Self, WorldError> {
        if config.half_size <= 0.0 {
            return Err(WorldError::EmptyTerrain(config.half_size));
        }
        if config.frequency <= 0.0 {
            return Err(WorldError::InvalidFrequency(config.frequency));
        }

        let noise = (config.amplitude != 0.0).then(|| {
            let mut noise = FastNoiseLite::with_seed(config.seed);
            noise.set_noise_type(Some(NoiseType::OpenSimplex2));
            noise
        });

        Ok(Self { config, noise })
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        x.abs() <= self.config.half_size && z.abs() <= self.config.half_size
    }

    /// Surface height, or None outside the patch
    pub fn height(&self, x: f32, z: f32) -> Option<f32> {
        if !self.contains(x, z) {
            return None;
        }
        let relief = self.noise.as_ref().map_or(0.0, |noise| {
            let f = self.config.frequency;
            noise.get_noise_2d(x * f, z * f) * self.config.amplitude
        });
        Some(self.config.base_height + relief)
    }
}
