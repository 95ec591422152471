//! World state and queries

mod food;
mod raycasting;
mod terrain;
#[allow(clippy::module_inception)]
mod world;

pub use food::FoodSource;
pub use raycasting::{Obstacle, Raycasting};
pub use terrain::{Terrain, TerrainConfig};
pub use world::{ThreatId, World};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    #[error("terrain half_size must be positive, got {0}")]
    EmptyTerrain(f32),

    #[error("terrain frequency must be positive, got {0}")]
    InvalidFrequency(f32),
}
