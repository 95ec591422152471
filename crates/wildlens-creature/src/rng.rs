//! RNG trait abstraction for creature behavior
//!
//! Each creature owns its own seeded generator, so a creature update never
//! touches shared random state and runs replay exactly from a seed.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

/// Generator type owned by every creature
pub type CreatureRngImpl = Xoshiro256StarStar;

/// Create a creature generator from a seed
pub fn seeded(seed: u64) -> CreatureRngImpl {
    Xoshiro256StarStar::seed_from_u64(seed)
}

/// Random number generator trait for creature behavior
pub trait CreatureRng {
    /// Generate random f32 in [0.0, 1.0)
    fn gen_f32(&mut self) -> f32;

    /// Check if random value is less than probability threshold
    fn check_probability(&mut self, probability: f32) -> bool {
        self.gen_f32() < probability
    }

    /// Uniform value in [min, max]; returns min when the range is empty
    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            min
        } else {
            min + (max - min) * self.gen_f32()
        }
    }

    /// Uniform point inside a disk of `radius` on the XZ plane around `center`
    fn point_in_disk(&mut self, center: Vec3, radius: f32) -> Vec3 {
        // sqrt keeps the distribution uniform over area, not radius
        let r = radius * self.gen_f32().sqrt();
        let angle = self.gen_f32() * std::f32::consts::TAU;
        let offset = Vec2::from_angle(angle) * r;
        Vec3::new(center.x + offset.x, center.y, center.z + offset.y)
    }
}

// Covers Xoshiro256StarStar as well as thread_rng() in tools
impl<T: ?Sized + rand::Rng> CreatureRng for T {
    fn gen_f32(&mut self) -> f32 {
        rand::Rng::r#gen(self)
    }
}
