//! Wildlife behavior engine for Wildlens
//!
//! This crate implements:
//! - Stimulus overrides (stun darts, lures) that pre-empt all other behavior
//! - Wandering inside a home range, returning and escaping from threats
//! - Food seeking gated by temperament, with atomic claims
//! - Altitude control for flying creatures
//! - A fixed priority chain composing the layers into one creature
//!
//! The simulation never touches a concrete world type; everything a creature
//! perceives goes through [`WorldAccess`].

pub mod config;
pub mod creature;
pub mod error;
pub mod events;
pub mod flight;
pub mod food;
pub mod locomotion;
pub mod rng;
pub mod spawning;
pub mod stimulus;
pub mod traits;
pub mod types;
pub mod wander;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use config::CreatureConfig;
pub use creature::{BehaviorLayer, Creature};
pub use error::ConfigError;
pub use events::{CreatureEvent, Mode};
pub use flight::FlightState;
pub use food::{AbandonReason, FeedingState};
pub use spawning::CreatureManager;
pub use stimulus::{OverrideState, Stimulus};
pub use traits::{FoodSighting, ObjectTag, RayHit, WorldAccess};
pub use types::{CreatureKind, EntityId, FoodId, FoodType, TargetId, Temperament};
pub use wander::WanderState;

/// Countdowns within this of zero count as expired, so accumulated float
/// error never costs an extra tick
pub(crate) const TIMER_EPSILON: f32 = 1e-4;
