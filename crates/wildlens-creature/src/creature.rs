//! Creature composition root
//!
//! A creature is one aggregate holding explicit sub-state for every behavior
//! layer. Each tick resolves queued stimuli, then walks the fixed priority
//! chain Override -> Food -> Escape -> Wander and runs the first layer whose
//! guard claims the tick. Locomotion and (for flyers) altitude are applied
//! once afterwards, so no layer ever moves the creature directly.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::CreatureConfig;
use crate::error::Result;
use crate::events::{CreatureEvent, Mode};
use crate::flight::{FlightController, FlightEvent, FlightState};
use crate::food::{AbandonReason, FeedingEvent, FeedingState, FoodController};
use crate::locomotion::{MoveIntent, forward, planar, step_toward, step_toward_planar, turn_toward};
use crate::rng::{CreatureRngImpl, seeded};
use crate::stimulus::{OverrideState, OverrideTick, Stimulus, StimulusLayer};
use crate::traits::WorldAccess;
use crate::types::{EntityId, TargetId};
use crate::wander::{WanderController, WanderState};

/// Behavior layers, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorLayer {
    Override,
    Food,
    Escape,
    Wander,
}

impl BehaviorLayer {
    /// Evaluated in this order once per tick; the first claiming layer runs
    pub const PRIORITY_CHAIN: [BehaviorLayer; 4] = [
        BehaviorLayer::Override,
        BehaviorLayer::Food,
        BehaviorLayer::Escape,
        BehaviorLayer::Wander,
    ];
}

/// A simulated wild animal
#[derive(Debug, Clone)]
pub struct Creature {
    pub id: EntityId,
    config: CreatureConfig,
    position: Vec3,
    /// Facing around +Y, including the asset yaw offset
    yaw: f32,
    home: Vec3,
    velocity: Vec3,
    active_layer: BehaviorLayer,
    stimulus: StimulusLayer,
    wander: WanderController,
    food: FoodController,
    flight: Option<FlightController>,
    rng: CreatureRngImpl,
}

impl Creature {
    /// Create a creature homed at its spawn position
    ///
    /// Fails only for configurations no creature could run with.
    pub fn new(config: CreatureConfig, position: Vec3, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut rng = seeded(seed);
        // Spawn height stands in for the ground until the first probe
        let flight = config
            .is_airborne()
            .then(|| FlightController::new(&config.flight, position.y, &mut rng));
        let yaw = config.movement.yaw_offset;

        Ok(Self {
            id: EntityId::new(),
            config,
            position,
            yaw,
            home: position,
            velocity: Vec3::ZERO,
            active_layer: BehaviorLayer::Wander,
            stimulus: StimulusLayer::new(),
            wander: WanderController::new(),
            food: FoodController::new(),
            flight,
            rng,
        })
    }

    pub fn config(&self) -> &CreatureConfig {
        &self.config
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move the creature without simulating (placement, tests)
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn home(&self) -> Vec3 {
        self.home
    }

    pub fn set_home(&mut self, home: Vec3) {
        self.home = home;
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn is_airborne(&self) -> bool {
        self.flight.is_some()
    }

    /// Layer that ran during the last tick
    pub fn active_layer(&self) -> BehaviorLayer {
        self.active_layer
    }

    pub fn override_state(&self) -> OverrideState {
        self.stimulus.state()
    }

    pub fn wander_state(&self) -> WanderState {
        self.wander.state()
    }

    pub fn feeding_state(&self) -> FeedingState {
        self.food.state()
    }

    pub fn flight_state(&self) -> Option<FlightState> {
        self.flight.as_ref().map(|f| f.state())
    }

    /// Current high-level mode; overrides always pre-empt the wander states
    pub fn mode(&self) -> Mode {
        match self.stimulus.state() {
            OverrideState::Stunned { .. } => Mode::Stunned,
            OverrideState::Attracted { .. } => Mode::Attracted,
            OverrideState::Inactive => match self.wander.state() {
                WanderState::Wandering => Mode::Wander,
                WanderState::Returning => Mode::Returning,
                WanderState::Escaping { .. } => Mode::Escaping,
            },
        }
    }

    /// Knock the creature out for `duration` seconds (applied next tick)
    pub fn stun(&mut self, duration: f32) {
        self.stimulus.request(Stimulus::Stun { duration });
    }

    /// Lure the creature toward `target` for `duration` seconds (applied next tick)
    pub fn attract(&mut self, target: TargetId, duration: f32) {
        self.stimulus.request(Stimulus::Attract { target, duration });
    }

    /// World-space bounding box (min, max) of the body at its current facing
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let half = self.config.movement.body_half_extents;
        let (sin, cos) = self.yaw.sin_cos();
        let extent = Vec3::new(
            cos.abs() * half.x + sin.abs() * half.z,
            half.y,
            sin.abs() * half.x + cos.abs() * half.z,
        );
        // Position is at the feet
        let center = self.position + Vec3::new(0.0, half.y, 0.0);
        (center - extent, center + extent)
    }

    /// Advance the creature by `dt` seconds, appending events to `events`
    pub fn update(&mut self, dt: f32, world: &impl WorldAccess, events: &mut Vec<CreatureEvent>) {
        let before = self.mode();

        if let Some(stimulus) = self.stimulus.take_pending() {
            self.apply_stimulus(stimulus, events);
        }

        let intent = self.run_priority_chain(dt, world, events);
        self.apply_intent(intent, dt, world);
        self.update_flight(dt, world, events);

        let after = self.mode();
        if before != after {
            log::debug!("{} {} -> {}", self.id, before, after);
            events.push(CreatureEvent::ModeChanged {
                id: self.id,
                from: before,
                to: after,
            });
        }
    }

    fn run_priority_chain(
        &mut self,
        dt: f32,
        world: &impl WorldAccess,
        events: &mut Vec<CreatureEvent>,
    ) -> Option<MoveIntent> {
        for layer in BehaviorLayer::PRIORITY_CHAIN {
            if self.layer_claims(layer, world, events) {
                self.active_layer = layer;
                return self.run_layer(layer, dt, world, events);
            }
        }
        None
    }

    /// Guard predicate of each layer. Food and Escape guards also perform the
    /// detection that starts their behavior.
    fn layer_claims(
        &mut self,
        layer: BehaviorLayer,
        world: &impl WorldAccess,
        events: &mut Vec<CreatureEvent>,
    ) -> bool {
        match layer {
            BehaviorLayer::Override => self.stimulus.is_active(),
            BehaviorLayer::Food => {
                if self.food.is_engaged() {
                    return true;
                }
                match self.food.scan(self.position, world, &self.config) {
                    Some(food) => {
                        // Feeding supersedes any escape or return in progress
                        self.wander.reset();
                        events.push(CreatureEvent::FoodSpotted { id: self.id, food });
                        true
                    }
                    None => false,
                }
            }
            BehaviorLayer::Escape => self.wander.detect_threat(self.position, world, &self.config),
            BehaviorLayer::Wander => true,
        }
    }

    fn run_layer(
        &mut self,
        layer: BehaviorLayer,
        dt: f32,
        world: &impl WorldAccess,
        events: &mut Vec<CreatureEvent>,
    ) -> Option<MoveIntent> {
        match layer {
            BehaviorLayer::Override => match self.stimulus.tick(dt, world) {
                OverrideTick::Inactive | OverrideTick::Stunned => None,
                OverrideTick::Attracted { target_position } => Some(MoveIntent::new(
                    target_position,
                    self.config.movement.attract_speed,
                    self.config.movement.turn_rate,
                )),
                OverrideTick::StunExpired => {
                    self.resume_after_override();
                    None
                }
                OverrideTick::AttractionEnded => {
                    self.home = self.position;
                    self.resume_after_override();
                    None
                }
            },
            BehaviorLayer::Food => {
                let flight = self.flight_state();
                let step = self.food.tick(dt, self.position, world, &self.config, flight);
                if let Some(event) = step.event {
                    self.on_feeding_event(event, events);
                }
                step.intent
            }
            BehaviorLayer::Escape => {
                let behind = -forward(self.yaw - self.config.movement.yaw_offset);
                self.wander.escape_tick(
                    dt,
                    self.position,
                    behind,
                    self.home,
                    world,
                    &self.config,
                    &mut self.rng,
                )
            }
            BehaviorLayer::Wander => self.wander.wander_tick(
                dt,
                self.position,
                self.home,
                world,
                &self.config,
                &mut self.rng,
            ),
        }
    }

    fn apply_stimulus(&mut self, stimulus: Stimulus, events: &mut Vec<CreatureEvent>) {
        log::debug!("{} received {:?}", self.id, stimulus);
        self.stimulus.apply(stimulus);

        if let Some(food) = self.food.cancel() {
            events.push(CreatureEvent::FoodAbandoned {
                id: self.id,
                food,
                reason: AbandonReason::Interrupted,
            });
        }
        self.wander.reset();

        // A stunned flyer must come down
        if let (Stimulus::Stun { .. }, Some(flight)) = (stimulus, &mut self.flight) {
            flight.begin_landing();
        }

        events.push(CreatureEvent::StimulusApplied {
            id: self.id,
            stimulus,
        });
    }

    fn resume_after_override(&mut self) {
        self.wander.reset();
        if let Some(flight) = &mut self.flight
            && flight.is_grounded()
        {
            flight.begin_takeoff(&self.config.flight, &mut self.rng);
        }
    }

    fn on_feeding_event(&mut self, event: FeedingEvent, events: &mut Vec<CreatureEvent>) {
        match event {
            FeedingEvent::Claimed(food) => {
                log::debug!("{} claimed {}", self.id, food);
                if let Some(flight) = &mut self.flight {
                    flight.begin_landing();
                }
                events.push(CreatureEvent::FoodClaimed { id: self.id, food });
            }
            FeedingEvent::Abandoned { food, reason } => {
                log::debug!("{} abandoned {} ({:?})", self.id, food, reason);
                events.push(CreatureEvent::FoodAbandoned {
                    id: self.id,
                    food,
                    reason,
                });
            }
            FeedingEvent::BeganEating => {}
            FeedingEvent::Digested => {
                self.home = self.position;
                self.wander.reset();
                if let Some(flight) = &mut self.flight {
                    flight.begin_takeoff(&self.config.flight, &mut self.rng);
                }
                events.push(CreatureEvent::FinishedEating { id: self.id });
            }
        }
    }

    fn apply_intent(&mut self, intent: Option<MoveIntent>, dt: f32, world: &impl WorldAccess) {
        let Some(intent) = intent else {
            self.velocity = Vec3::ZERO;
            if self.flight.is_none()
                && let Some(height) = world.ground_height(self.position.x, self.position.z)
            {
                self.position.y = height;
            }
            return;
        };

        let previous = self.position;
        let next = match &self.flight {
            Some(flight) if !flight.allows_horizontal_movement() => previous,
            Some(_) => step_toward_planar(previous, intent.destination, intent.speed, dt),
            None => {
                let mut next = step_toward(previous, intent.destination, intent.speed, dt);
                if let Some(height) = world.ground_height(next.x, next.z) {
                    next.y = height;
                }
                next
            }
        };

        let moved = next - previous;
        self.velocity = if dt > 0.0 { moved / dt } else { Vec3::ZERO };
        let heading = if planar(moved).length_squared() > 1e-8 {
            moved
        } else {
            intent.destination - previous
        };
        self.yaw = turn_toward(
            self.yaw,
            heading,
            intent.turn_rate,
            self.config.movement.yaw_offset,
            dt,
        );
        self.position = next;
    }

    fn update_flight(&mut self, dt: f32, world: &impl WorldAccess, events: &mut Vec<CreatureEvent>) {
        let Some(flight) = &mut self.flight else {
            return;
        };
        let heading = forward(self.yaw - self.config.movement.yaw_offset);
        let event = flight.update(
            dt,
            &mut self.position,
            heading,
            world,
            &self.config.flight,
            &mut self.rng,
        );
        match event {
            Some(FlightEvent::Landed) => events.push(CreatureEvent::Landed { id: self.id }),
            Some(FlightEvent::TookOff) => events.push(CreatureEvent::TookOff { id: self.id }),
            None => {}
        }
    }
}
