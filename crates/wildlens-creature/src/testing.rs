//! In-memory world used by the unit tests of this crate

use std::collections::HashMap;
use std::sync::Mutex;

use glam::Vec3;

use crate::traits::{FoodSighting, ObjectTag, RayHit, WorldAccess};
use crate::types::{FoodId, FoodType, TargetId};

/// Flat world with point threats, point food and spherical obstacles
pub struct StubWorld {
    pub threats: Vec<Vec3>,
    pub food: Vec<FoodSighting>,
    pub claimed: Mutex<Vec<FoodId>>,
    /// None makes every surface query fail
    pub ground: Option<f32>,
    pub obstacles: Vec<(Vec3, f32)>,
    pub targets: HashMap<TargetId, Vec3>,
}

impl Default for StubWorld {
    fn default() -> Self {
        Self {
            threats: Vec::new(),
            food: Vec::new(),
            claimed: Mutex::new(Vec::new()),
            ground: Some(0.0),
            obstacles: Vec::new(),
            targets: HashMap::new(),
        }
    }
}

impl StubWorld {
    pub fn add_food(&mut self, id: u64, position: Vec3, food_type: FoodType) -> FoodId {
        let id = FoodId(id);
        self.food.push(FoodSighting {
            id,
            position,
            food_type,
        });
        id
    }

    fn is_claimed(&self, id: FoodId) -> bool {
        self.claimed.lock().expect("claim lock").contains(&id)
    }
}

impl WorldAccess for StubWorld {
    fn nearest_threat(&self, position: Vec3) -> Option<Vec3> {
        self.threats.iter().copied().min_by(|a, b| {
            a.distance(position)
                .partial_cmp(&b.distance(position))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    fn food_in_radius(&self, center: Vec3, radius: f32) -> Vec<FoodSighting> {
        self.food
            .iter()
            .filter(|f| !self.is_claimed(f.id) && f.position.distance(center) <= radius)
            .copied()
            .collect()
    }

    fn food_position(&self, id: FoodId) -> Option<Vec3> {
        if self.is_claimed(id) {
            return None;
        }
        self.food.iter().find(|f| f.id == id).map(|f| f.position)
    }

    fn claim_food(&self, id: FoodId) -> bool {
        if self.food_position(id).is_none() {
            return false;
        }
        self.claimed.lock().expect("claim lock").push(id);
        true
    }

    fn ground_height(&self, _x: f32, _z: f32) -> Option<f32> {
        self.ground
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        self.obstacles
            .iter()
            .filter_map(|&(center, radius)| {
                // Ray-sphere, nearest root only
                let oc = origin - center;
                let b = oc.dot(dir);
                let c = oc.length_squared() - radius * radius;
                let disc = b * b - c;
                if disc < 0.0 {
                    return None;
                }
                let t = -b - disc.sqrt();
                (t >= 0.0 && t <= max_distance).then(|| RayHit {
                    distance: t,
                    point: origin + dir * t,
                    tag: ObjectTag::Rock,
                })
            })
            .min_by(|a, b| {
                a.distance
                    .partial_cmp(&b.distance)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    fn locate_target(&self, id: TargetId) -> Option<Vec3> {
        self.targets.get(&id).copied()
    }
}
