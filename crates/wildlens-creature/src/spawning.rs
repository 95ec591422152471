//! Creature population management
//!
//! Owns every live creature, forwards stimuli by id and ticks the whole
//! population, either sequentially or across the rayon pool.

use std::collections::BTreeMap;

use glam::Vec3;

use crate::creature::Creature;
use crate::events::CreatureEvent;
use crate::traits::WorldAccess;
use crate::types::{EntityId, TargetId};

/// Manages creature population
pub struct CreatureManager {
    // Ordered so ticks and event streams are reproducible
    creatures: BTreeMap<EntityId, Creature>,
    max_creatures: usize,
}

impl CreatureManager {
    pub fn new(max_creatures: usize) -> Self {
        Self {
            creatures: BTreeMap::new(),
            max_creatures,
        }
    }

    /// Add a creature. Returns None when the population cap is reached.
    pub fn spawn(&mut self, creature: Creature) -> Option<EntityId> {
        if !self.can_spawn() {
            log::warn!(
                "Cannot spawn creature: max population reached ({})",
                self.max_creatures
            );
            return None;
        }

        let id = creature.id;
        let position = creature.position();
        self.creatures.insert(id, creature);

        log::info!(
            "Spawned {} at ({:.1}, {:.1}, {:.1}). Population: {}/{}",
            id,
            position.x,
            position.y,
            position.z,
            self.count(),
            self.max_creatures
        );

        Some(id)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Creature> {
        let removed = self.creatures.remove(&id);
        if removed.is_some() {
            log::info!(
                "Removed {}. Population: {}/{}",
                id,
                self.count(),
                self.max_creatures
            );
        }
        removed
    }

    pub fn count(&self) -> usize {
        self.creatures.len()
    }

    pub fn can_spawn(&self) -> bool {
        self.creatures.len() < self.max_creatures
    }

    pub fn get(&self, id: EntityId) -> Option<&Creature> {
        self.creatures.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Creature> {
        self.creatures.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.values()
    }

    /// Closest creature to `position` within `radius`
    pub fn nearest(&self, position: Vec3, radius: f32) -> Option<&Creature> {
        self.creatures
            .values()
            .map(|c| (c, c.position().distance(position)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(c, _)| c)
    }

    /// Queue a stun on one creature. False if the id is unknown.
    pub fn stun(&mut self, id: EntityId, duration: f32) -> bool {
        match self.creatures.get_mut(&id) {
            Some(creature) => {
                creature.stun(duration);
                true
            }
            None => false,
        }
    }

    /// Queue an attraction on one creature. False if the id is unknown.
    pub fn attract(&mut self, id: EntityId, target: TargetId, duration: f32) -> bool {
        match self.creatures.get_mut(&id) {
            Some(creature) => {
                creature.attract(target, duration);
                true
            }
            None => false,
        }
    }

    /// Tick every creature in id order
    pub fn update_all(&mut self, dt: f32, world: &impl WorldAccess) -> Vec<CreatureEvent> {
        let mut events = Vec::new();
        for creature in self.creatures.values_mut() {
            creature.update(dt, world, &mut events);
        }
        events
    }

    /// Tick every creature on the rayon pool. Creatures only read the world,
    /// so results match [`update_all`](Self::update_all) apart from food
    /// claim races, which the world resolves atomically.
    #[cfg(feature = "parallel")]
    pub fn update_all_parallel<W>(&mut self, dt: f32, world: &W) -> Vec<CreatureEvent>
    where
        W: WorldAccess + Sync,
    {
        use rayon::prelude::*;

        let per_creature: Vec<Vec<CreatureEvent>> = self
            .creatures
            .par_iter_mut()
            .map(|(_, creature)| {
                let mut events = Vec::new();
                creature.update(dt, world, &mut events);
                events
            })
            .collect();

        per_creature.into_iter().flatten().collect()
    }
}
