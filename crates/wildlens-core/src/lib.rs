//! Reference world for Wildlens
//!
//! Implements the creature crate's [`WorldAccess`](wildlens_creature::WorldAccess)
//! seam with threats, lures, expiring food sources, tagged obstacles and a
//! terrain height probe, plus the glue that turns creatures into photo
//! subjects.

pub mod photography;
pub mod world;

pub use photography::{CameraRig, subject_bounds, subject_id, visible_subjects};
pub use world::{Obstacle, Terrain, TerrainConfig, ThreatId, World, WorldError};
