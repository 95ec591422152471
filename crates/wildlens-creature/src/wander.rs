//! Wander/escape controller
//!
//! Baseline behavior of every creature:
//! - Wander between random targets inside a disk around the home anchor
//! - Return toward home when drifting past the wander radius
//! - Escape from a threat inside the detection radius for at least a fixed time

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::TIMER_EPSILON;
use crate::config::CreatureConfig;
use crate::locomotion::{MoveIntent, arrived, horizontal_distance, planar};
use crate::rng::CreatureRng;
use crate::traits::WorldAccess;

/// Returning steers toward this fraction of the wander radius
pub const RETURN_TARGET_FRACTION: f32 = 0.8;
/// Returning clears once back inside this fraction of the wander radius
pub const RETURN_CLEAR_FRACTION: f32 = 0.9;

/// Wander/escape sub-state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum WanderState {
    #[default]
    Wandering,
    /// Too far from home, heading back
    Returning,
    /// Fleeing; `remaining` is the forced escape time still to run
    Escaping { remaining: f32, threat: Vec3 },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WanderController {
    state: WanderState,
    target: Option<Vec3>,
    retarget_timer: f32,
}

impl WanderController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WanderState {
        self.state
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    pub fn is_escaping(&self) -> bool {
        matches!(self.state, WanderState::Escaping { .. })
    }

    /// Drop escape/return state and force a fresh wander target next tick
    pub fn reset(&mut self) {
        self.state = WanderState::Wandering;
        self.target = None;
        self.retarget_timer = 0.0;
    }

    /// Threat guard of the priority chain. Enters (or refreshes) Escaping when a
    /// threat is inside the detection radius. Returns whether the creature is
    /// escaping after the check.
    pub fn detect_threat(
        &mut self,
        position: Vec3,
        world: &impl WorldAccess,
        config: &CreatureConfig,
    ) -> bool {
        let threat = world
            .nearest_threat(position)
            .filter(|t| t.distance(position) < config.escape.detection_radius);

        if let Some(t) = threat {
            if let WanderState::Escaping { remaining, threat } = &mut self.state {
                *remaining = config.escape.escape_duration;
                *threat = t;
            } else {
                log::debug!("Threat at {:.1}m, escaping", t.distance(position));
                self.state = WanderState::Escaping {
                    remaining: config.escape.escape_duration,
                    threat: t,
                };
            }
        }

        self.is_escaping()
    }

    /// Advance an active escape. `fallback_away` is used when the creature
    /// stands exactly on the threat and no flee direction can be derived.
    pub fn escape_tick(
        &mut self,
        dt: f32,
        position: Vec3,
        fallback_away: Vec3,
        home: Vec3,
        world: &impl WorldAccess,
        config: &CreatureConfig,
        rng: &mut impl CreatureRng,
    ) -> Option<MoveIntent> {
        let WanderState::Escaping { remaining, threat } = &mut self.state else {
            return None;
        };

        *remaining -= dt;
        // Keep fleeing from the last known position if the threat disappears
        if let Some(current) = world.nearest_threat(position) {
            *threat = current;
        }
        let threat = *threat;
        let forced_elapsed = *remaining <= TIMER_EPSILON;
        let safe_distance = config.escape.safe_distance;

        if forced_elapsed && position.distance(threat) >= safe_distance {
            log::debug!("Escape finished {:.1}m from threat", position.distance(threat));
            self.state = WanderState::Wandering;
            self.pick_target(home, world, config, rng);
            return None;
        }

        let away = planar(position - threat);
        let away = if away.length_squared() > 1e-6 {
            away.normalize()
        } else {
            planar(fallback_away).normalize_or_zero()
        };
        let destination = position + Vec3::new(away.x, 0.0, away.y) * safe_distance;

        Some(MoveIntent::new(
            destination,
            config.movement.escape_speed,
            config.movement.escape_turn_rate,
        ))
    }

    /// Home-boundary check plus wander target following
    pub fn wander_tick(
        &mut self,
        dt: f32,
        position: Vec3,
        home: Vec3,
        world: &impl WorldAccess,
        config: &CreatureConfig,
        rng: &mut impl CreatureRng,
    ) -> Option<MoveIntent> {
        let radius = config.wander.wander_radius;
        let from_home = horizontal_distance(position, home);

        match self.state {
            WanderState::Returning if from_home <= radius * RETURN_CLEAR_FRACTION => {
                log::debug!("Back inside home range ({:.1}m)", from_home);
                self.state = WanderState::Wandering;
                self.pick_target(home, world, config, rng);
            }
            WanderState::Wandering if from_home > radius => {
                log::debug!("Drifted {:.1}m from home, returning", from_home);
                self.state = WanderState::Returning;
            }
            _ => {}
        }

        let speed = config.movement.walk_speed;
        let turn_rate = config.movement.turn_rate;

        match self.state {
            WanderState::Returning => {
                let outward = planar(position - home).normalize_or_zero();
                let destination =
                    home + Vec3::new(outward.x, 0.0, outward.y) * radius * RETURN_TARGET_FRACTION;
                Some(MoveIntent::new(destination, speed, turn_rate))
            }
            WanderState::Wandering => {
                self.retarget_timer -= dt;
                let reached = self
                    .target
                    .is_some_and(|t| arrived(position, t, config.movement.arrive_tolerance));
                // A failed surface query leaves target None until the timer runs out
                let expired = self.retarget_timer <= TIMER_EPSILON;
                if reached || expired {
                    self.pick_target(home, world, config, rng);
                }
                self.target
                    .map(|target| MoveIntent::new(target, speed, turn_rate))
            }
            WanderState::Escaping { .. } => None,
        }
    }

    /// Pick a uniformly random point inside the wander disk and hold it for a
    /// random duration. If the surface probe fails the timer still resets, so
    /// the creature idles instead of retrying every tick.
    pub fn pick_target(
        &mut self,
        home: Vec3,
        world: &impl WorldAccess,
        config: &CreatureConfig,
        rng: &mut impl CreatureRng,
    ) {
        let candidate = rng.point_in_disk(home, config.wander.wander_radius);
        self.target = world
            .ground_height(candidate.x, candidate.z)
            .map(|height| Vec3::new(candidate.x, height, candidate.z));
        if self.target.is_none() {
            log::warn!(
                "No navigable surface at ({:.1}, {:.1}), idling",
                candidate.x,
                candidate.z
            );
        }
        self.retarget_timer = rng.range_f32(
            config.wander.min_wander_time,
            config.wander.max_wander_time,
        );
    }
}
