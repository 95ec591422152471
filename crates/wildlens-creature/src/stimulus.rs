//! Stimulus override layer
//!
//! Externally imposed conditions (a tranquilizer dart, a lure) that suspend
//! normal behavior. Requests are queued by collaborators between ticks and
//! resolved at the start of the next tick: a Stun requested in the same tick
//! as an Attract always wins, regardless of call order.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::TIMER_EPSILON;
use crate::traits::WorldAccess;
use crate::types::TargetId;

/// An override request from a collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Stimulus {
    Stun { duration: f32 },
    Attract { target: TargetId, duration: f32 },
}

/// Currently active override
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum OverrideState {
    #[default]
    Inactive,
    Stunned {
        remaining: f32,
    },
    Attracted {
        target: TargetId,
        remaining: f32,
    },
}

/// Result of advancing the override layer by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverrideTick {
    /// No override is active
    Inactive,
    /// Still stunned: all locomotion halts
    Stunned,
    /// Still attracted: head for the target's current position
    Attracted { target_position: Vec3 },
    /// Stun timer ran out this tick
    StunExpired,
    /// Attraction timer ran out or the target vanished this tick
    AttractionEnded,
}

/// Override state plus the queue of not-yet-applied requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StimulusLayer {
    state: OverrideState,
    pending: Option<Stimulus>,
}

impl StimulusLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> OverrideState {
        self.state
    }

    /// Whether an override currently suspends normal behavior
    pub fn is_active(&self) -> bool {
        !matches!(self.state, OverrideState::Inactive)
    }

    pub fn pending(&self) -> Option<Stimulus> {
        self.pending
    }

    /// Queue a request. A queued Stun is never displaced by an Attract;
    /// any other combination keeps the latest request.
    pub fn request(&mut self, stimulus: Stimulus) {
        self.pending = match (self.pending, stimulus) {
            (Some(stun @ Stimulus::Stun { .. }), Stimulus::Attract { .. }) => Some(stun),
            _ => Some(stimulus),
        };
    }

    pub fn take_pending(&mut self) -> Option<Stimulus> {
        self.pending.take()
    }

    /// Make a stimulus the active override, replacing whatever was active.
    /// Re-applying Attract simply resets its timer and target.
    pub fn apply(&mut self, stimulus: Stimulus) {
        self.state = match stimulus {
            Stimulus::Stun { duration } => OverrideState::Stunned {
                remaining: duration.max(0.0),
            },
            Stimulus::Attract { target, duration } => OverrideState::Attracted {
                target,
                remaining: duration.max(0.0),
            },
        };
    }

    /// Advance timers and re-validate the attraction target
    pub fn tick(&mut self, dt: f32, world: &impl WorldAccess) -> OverrideTick {
        match &mut self.state {
            OverrideState::Inactive => OverrideTick::Inactive,
            OverrideState::Stunned { remaining } => {
                *remaining -= dt;
                if *remaining <= TIMER_EPSILON {
                    self.state = OverrideState::Inactive;
                    OverrideTick::StunExpired
                } else {
                    OverrideTick::Stunned
                }
            }
            OverrideState::Attracted { target, remaining } => {
                *remaining -= dt;
                let running = *remaining > TIMER_EPSILON;
                match world.locate_target(*target) {
                    Some(target_position) if running => OverrideTick::Attracted { target_position },
                    _ => {
                        self.state = OverrideState::Inactive;
                        OverrideTick::AttractionEnded
                    }
                }
            }
        }
    }
}
