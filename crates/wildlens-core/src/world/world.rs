//! World - threats, lures, food, obstacles and terrain

use std::fmt;

use ahash::HashMap;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use wildlens_creature::{FoodId, FoodSighting, FoodType, RayHit, TargetId, WorldAccess};

use super::WorldError;
use super::food::FoodSource;
use super::raycasting::{Obstacle, Raycasting};
use super::terrain::{Terrain, TerrainConfig};

/// Handle of a threat (usually the player)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreatId(pub u64);

impl fmt::Display for ThreatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Threat({})", self.0)
    }
}

/// The simulated environment creatures perceive
///
/// Creatures only ever see it through [`WorldAccess`]; everything mutable
/// here is driven by the caller between creature ticks.
pub struct World {
    terrain: Terrain,

    threats: HashMap<ThreatId, Vec3>,

    /// Attraction lures, resolvable by creatures as targets
    lures: HashMap<TargetId, Vec3>,

    /// Insertion order is the scan order seen by creatures
    food: Vec<FoodSource>,

    obstacles: Vec<Obstacle>,

    next_id: u64,

    /// Simulated seconds
    time: f32,
}

impl World {
    pub fn new(terrain: TerrainConfig) -> Result<Self, WorldError> {
        Ok(Self {
            terrain: Terrain::new(terrain)?,
            threats: HashMap::default(),
            lures: HashMap::default(),
            food: Vec::new(),
            obstacles: Vec::new(),
            next_id: 1,
            time: 0.0,
        })
    }

    /// Flat square world of the given half size
    pub fn flat(half_size: f32) -> Result<Self, WorldError> {
        Self::new(TerrainConfig::flat(half_size))
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_threat(&mut self, position: Vec3) -> ThreatId {
        let id = ThreatId(self.allocate_id());
        self.threats.insert(id, position);
        id
    }

    pub fn move_threat(&mut self, id: ThreatId, position: Vec3) -> bool {
        match self.threats.get_mut(&id) {
            Some(current) => {
                *current = position;
                true
            }
            None => false,
        }
    }

    pub fn remove_threat(&mut self, id: ThreatId) -> bool {
        self.threats.remove(&id).is_some()
    }

    pub fn threat_position(&self, id: ThreatId) -> Option<Vec3> {
        self.threats.get(&id).copied()
    }

    pub fn add_lure(&mut self, position: Vec3) -> TargetId {
        let id = TargetId(self.allocate_id());
        self.lures.insert(id, position);
        log::debug!("Lure {} placed at {:?}", id.0, position);
        id
    }

    pub fn move_lure(&mut self, id: TargetId, position: Vec3) -> bool {
        match self.lures.get_mut(&id) {
            Some(current) => {
                *current = position;
                true
            }
            None => false,
        }
    }

    pub fn remove_lure(&mut self, id: TargetId) -> bool {
        self.lures.remove(&id).is_some()
    }

    /// Place food at an exact position
    pub fn add_food(&mut self, position: Vec3, food_type: FoodType, lifetime: f32) -> FoodId {
        let id = FoodId(self.allocate_id());
        self.food
            .push(FoodSource::new(id, position, food_type, lifetime));
        id
    }

    /// Place food on the terrain surface. None outside the terrain.
    pub fn drop_food(&mut self, x: f32, z: f32, food_type: FoodType, lifetime: f32) -> Option<FoodId> {
        let height = self.terrain.height(x, z)?;
        Some(self.add_food(Vec3::new(x, height, z), food_type, lifetime))
    }

    pub fn food(&self, id: FoodId) -> Option<&FoodSource> {
        self.food.iter().find(|f| f.id == id)
    }

    pub fn food_sources(&self) -> impl Iterator<Item = &FoodSource> {
        self.food.iter()
    }

    /// Sources creatures can still find
    pub fn available_food(&self) -> usize {
        self.food.iter().filter(|f| f.is_available()).count()
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Advance world time: age food and drop sources that were eaten or expired
    pub fn update(&mut self, dt: f32) {
        self.time += dt;

        for source in &mut self.food {
            source.age(dt);
        }

        self.food.retain(|source| {
            if source.is_claimed() {
                log::debug!("{} consumed", source.id);
                false
            } else if source.remaining() <= 0.0 {
                log::debug!("{} ({}) expired", source.id, source.food_type.name());
                false
            } else {
                true
            }
        });
    }
}

impl WorldAccess for World {
    fn nearest_threat(&self, position: Vec3) -> Option<Vec3> {
        self.threats
            .values()
            .copied()
            .min_by(|a, b| a.distance_squared(position).total_cmp(&b.distance_squared(position)))
    }

    fn food_in_radius(&self, center: Vec3, radius: f32) -> Vec<FoodSighting> {
        self.food
            .iter()
            .filter(|f| f.is_available() && f.position.distance(center) <= radius)
            .map(|f| FoodSighting {
                id: f.id,
                position: f.position,
                food_type: f.food_type,
            })
            .collect()
    }

    fn food_position(&self, id: FoodId) -> Option<Vec3> {
        self.food(id)
            .filter(|f| f.is_available())
            .map(|f| f.position)
    }

    fn claim_food(&self, id: FoodId) -> bool {
        self.food(id).is_some_and(FoodSource::claim)
    }

    fn ground_height(&self, x: f32, z: f32) -> Option<f32> {
        self.terrain.height(x, z)
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        Raycasting::raycast(&self.obstacles, origin, direction, max_distance)
    }

    fn locate_target(&self, id: TargetId) -> Option<Vec3> {
        self.lures.get(&id).copied()
    }
}
