//! Identifiers and shared value types
//!
//! Creatures only ever hold these handles, never references into the world,
//! so a referenced object can vanish between ticks without dangling.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for creatures in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

impl EntityId {
    /// Generate a new unique entity ID
    pub fn new() -> Self {
        EntityId(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw u64 value (useful for debugging/serialization)
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Create an EntityId from a raw u64 (for deserialization)
    pub fn from_raw(id: u64) -> Self {
        // Keep the generator ahead of any restored id
        NEXT_ENTITY_ID.fetch_max(id.saturating_add(1), Ordering::Relaxed);
        EntityId(id)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Creature({})", self.0)
    }
}

/// Weak handle to a food source owned by the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FoodId(pub u64);

impl std::fmt::Display for FoodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Food({})", self.0)
    }
}

/// Weak handle to an attraction target (a lure, a call, another actor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u64);

/// Food-type tag carried by every food source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodType {
    Berries,
    Seeds,
    Fish,
    Meat,
    Nectar,
}

impl FoodType {
    /// All food types, in declaration order
    pub const ALL: [FoodType; 5] = [
        FoodType::Berries,
        FoodType::Seeds,
        FoodType::Fish,
        FoodType::Meat,
        FoodType::Nectar,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Berries => "berries",
            Self::Seeds => "seeds",
            Self::Fish => "fish",
            Self::Meat => "meat",
            Self::Nectar => "nectar",
        }
    }
}

/// Behavioral class gating food approach relative to threat proximity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Temperament {
    /// Approaches food regardless of threats
    #[default]
    Neutral,
    /// Approaches only while the nearest threat is far from the food
    Fearful,
    /// Approaches only while the nearest threat is close to the food
    Hostile,
}

impl Temperament {
    /// Whether a creature of this temperament approaches food whose nearest
    /// threat is `threat_distance` away. `None` means no threat exists.
    pub fn will_approach(&self, threat_distance: Option<f32>, safe_distance: f32) -> bool {
        match self {
            Self::Neutral => true,
            Self::Fearful => threat_distance.is_none_or(|d| d >= safe_distance),
            Self::Hostile => threat_distance.is_some_and(|d| d < safe_distance),
        }
    }
}

/// Locomotion class of a creature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreatureKind {
    Ground,
    Airborne,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ids_are_unique() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }

    #[test]
    fn test_from_raw_advances_counter() {
        let restored = EntityId::from_raw(1_000_000);
        assert_eq!(restored.raw(), 1_000_000);
        assert!(EntityId::new().raw() > 1_000_000);
    }

    #[test]
    fn test_fearful_gate() {
        let fearful = Temperament::Fearful;
        assert!(!fearful.will_approach(Some(15.0), 20.0));
        assert!(fearful.will_approach(Some(25.0), 20.0));
        assert!(fearful.will_approach(None, 20.0));
    }

    #[test]
    fn test_hostile_gate() {
        let hostile = Temperament::Hostile;
        assert!(hostile.will_approach(Some(15.0), 20.0));
        assert!(!hostile.will_approach(Some(25.0), 20.0));
        assert!(!hostile.will_approach(None, 20.0));
    }

    #[test]
    fn test_neutral_always_approaches() {
        assert!(Temperament::Neutral.will_approach(Some(0.5), 20.0));
        assert!(Temperament::Neutral.will_approach(None, 20.0));
    }
}
