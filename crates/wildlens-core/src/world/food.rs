//! Food sources placed in the world

use std::sync::atomic::{AtomicBool, Ordering};

use glam::Vec3;
use wildlens_creature::{FoodId, FoodType};

/// A piece of food with a limited lifetime
///
/// Claiming is the single atomic consume: the first claim wins and the
/// source disappears from every query at that instant. The world drops
/// claimed and expired sources on its next update.
#[derive(Debug)]
pub struct FoodSource {
    pub id: FoodId,
    pub position: Vec3,
    pub food_type: FoodType,
    remaining: f32,
    claimed: AtomicBool,
}

impl FoodSource {
    pub fn new(id: FoodId, position: Vec3, food_type: FoodType, lifetime: f32) -> Self {
        Self {
            id,
            position,
            food_type,
            remaining: lifetime,
            claimed: AtomicBool::new(false),
        }
    }

    /// Seconds until the source expires
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }

    /// Visible to creatures: neither consumed nor expired
    pub fn is_available(&self) -> bool {
        self.remaining > 0.0 && !self.is_claimed()
    }

    /// True for exactly one caller, and only while the source is available
    pub fn claim(&self) -> bool {
        self.remaining > 0.0
            && self
                .claimed
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
    }

    pub(super) fn age(&mut self, dt: f32) {
        self.remaining -= dt;
    }
}
