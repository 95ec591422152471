//! Events emitted by creature ticks
//!
//! Creatures append to a caller-owned buffer instead of reaching for a global
//! event bus, so independent creatures can tick on separate threads.

use serde::{Deserialize, Serialize};

use crate::food::AbandonReason;
use crate::stimulus::Stimulus;
use crate::types::{EntityId, FoodId};

/// High-level behavior mode. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Wander,
    Returning,
    Escaping,
    Stunned,
    Attracted,
}

impl Mode {
    /// Whether this mode is an external override
    pub fn is_override(&self) -> bool {
        matches!(self, Self::Stunned | Self::Attracted)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wander => write!(f, "Wandering"),
            Self::Returning => write!(f, "Returning"),
            Self::Escaping => write!(f, "Escaping"),
            Self::Stunned => write!(f, "Stunned"),
            Self::Attracted => write!(f, "Attracted"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CreatureEvent {
    ModeChanged { id: EntityId, from: Mode, to: Mode },
    StimulusApplied { id: EntityId, stimulus: Stimulus },
    FoodSpotted { id: EntityId, food: FoodId },
    FoodClaimed { id: EntityId, food: FoodId },
    FoodAbandoned { id: EntityId, food: FoodId, reason: AbandonReason },
    FinishedEating { id: EntityId },
    Landed { id: EntityId },
    TookOff { id: EntityId },
}

impl CreatureEvent {
    /// Creature that produced the event
    pub fn creature(&self) -> EntityId {
        match *self {
            Self::ModeChanged { id, .. }
            | Self::StimulusApplied { id, .. }
            | Self::FoodSpotted { id, .. }
            | Self::FoodClaimed { id, .. }
            | Self::FoodAbandoned { id, .. }
            | Self::FinishedEating { id }
            | Self::Landed { id }
            | Self::TookOff { id } => id,
        }
    }
}
