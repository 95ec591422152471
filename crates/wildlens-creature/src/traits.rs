//! World access traits for creature-world interaction
//!
//! These traits define the interface between creatures and the world,
//! allowing the creature module to be decoupled from the World implementation.
//! Every query takes `&self`: creature updates only read the world, and the
//! single mutating operation (claiming food) must be atomic on the world side.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::types::{FoodId, FoodType, TargetId};

/// Tag attached to every ray-castable world object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectTag {
    Ground,
    Food,
    Rock,
    Tree,
    Structure,
}

impl ObjectTag {
    /// Whether a flyer should climb over this object
    pub fn is_flight_obstacle(&self) -> bool {
        !matches!(self, Self::Ground | Self::Food)
    }
}

/// First object hit by a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub point: Vec3,
    pub tag: ObjectTag,
}

/// A food source seen by an overlap query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodSighting {
    pub id: FoodId,
    pub position: Vec3,
    pub food_type: FoodType,
}

/// Read-only access to world state for creature sensing
pub trait WorldAccess {
    /// Position of the nearest threat (typically the player), if any exists
    fn nearest_threat(&self, position: Vec3) -> Option<Vec3>;

    /// Food sources within `radius` of `center`, in scan order
    fn food_in_radius(&self, center: Vec3, radius: f32) -> Vec<FoodSighting>;

    /// Current position of a food source, or None once consumed or expired
    fn food_position(&self, id: FoodId) -> Option<Vec3>;

    /// Atomically claim (consume) a food source
    /// Returns false if another creature got there first or it is gone
    fn claim_food(&self, id: FoodId) -> bool;

    /// Ground height below the given horizontal position
    /// Returns None when the navigable surface query fails
    fn ground_height(&self, x: f32, z: f32) -> Option<f32>;

    /// Cast a ray and return the first object hit within max_distance
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;

    /// Current position of an attraction target, or None once it is gone
    fn locate_target(&self, id: TargetId) -> Option<Vec3>;
}
