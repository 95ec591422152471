//! Food interaction controller
//!
//! Feeding sub-machine layered above wander/escape:
//! Idle -> Approaching -> [Landing ->] Eating -> Grace -> Idle
//!
//! Food sources are owned by the world and held here only by id, so every
//! tick re-validates that the source still exists.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::TIMER_EPSILON;
use crate::config::CreatureConfig;
use crate::flight::FlightState;
use crate::locomotion::{MoveIntent, horizontal_distance};
use crate::traits::WorldAccess;
use crate::types::FoodId;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum FeedingState {
    #[default]
    Idle,
    Approaching {
        food: FoodId,
    },
    /// Airborne only: food claimed, waiting to touch down
    Landing,
    Eating {
        remaining: f32,
    },
    /// Digesting before normal behavior resumes
    Grace {
        remaining: f32,
    },
}

/// Why an approach was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbandonReason {
    /// Consumed by another creature or expired
    Vanished,
    /// Beyond the give-up distance
    TooFar,
    /// Reached it but another creature claimed it first
    ClaimLost,
    /// Cancelled by a stimulus override
    Interrupted,
}

/// Notable transition produced by a feeding tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedingEvent {
    Claimed(FoodId),
    Abandoned { food: FoodId, reason: AbandonReason },
    BeganEating,
    Digested,
}

/// Output of one feeding tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeedingStep {
    pub intent: Option<MoveIntent>,
    pub event: Option<FeedingEvent>,
}

impl FeedingStep {
    fn idle() -> Self {
        Self::default()
    }

    fn event(event: FeedingEvent) -> Self {
        Self {
            intent: None,
            event: Some(event),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodController {
    state: FeedingState,
}

impl FoodController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FeedingState {
        self.state
    }

    /// Whether the feeding sub-machine owns the creature this tick
    pub fn is_engaged(&self) -> bool {
        !matches!(self.state, FeedingState::Idle)
    }

    /// Scan for food while idle. The first qualifying source in scan order
    /// wins; there is deliberately no distance ranking.
    pub fn scan(
        &mut self,
        position: Vec3,
        world: &impl WorldAccess,
        config: &CreatureConfig,
    ) -> Option<FoodId> {
        if self.is_engaged() || config.food.preferences.is_empty() {
            return None;
        }

        let food = &config.food;
        let chosen = world
            .food_in_radius(position, food.detection_radius)
            .into_iter()
            .filter(|sighting| food.preferences.contains(&sighting.food_type))
            .find(|sighting| {
                let threat_distance = world
                    .nearest_threat(sighting.position)
                    .map(|threat| threat.distance(sighting.position));
                config
                    .temperament
                    .will_approach(threat_distance, food.player_safe_distance)
            })?;

        log::debug!(
            "Spotted {} ({}) {:.1}m away",
            chosen.id,
            chosen.food_type.name(),
            chosen.position.distance(position)
        );
        self.state = FeedingState::Approaching { food: chosen.id };
        Some(chosen.id)
    }

    /// Drop any feeding in progress. Returns the food being approached, if any.
    pub fn cancel(&mut self) -> Option<FoodId> {
        let approached = match self.state {
            FeedingState::Approaching { food } => Some(food),
            _ => None,
        };
        self.state = FeedingState::Idle;
        approached
    }

    /// Advance the feeding sub-machine. `flight` is None for ground creatures.
    pub fn tick(
        &mut self,
        dt: f32,
        position: Vec3,
        world: &impl WorldAccess,
        config: &CreatureConfig,
        flight: Option<FlightState>,
    ) -> FeedingStep {
        let food_config = &config.food;

        match &mut self.state {
            FeedingState::Idle => FeedingStep::idle(),
            FeedingState::Approaching { food } => {
                let food = *food;
                let Some(food_position) = world.food_position(food) else {
                    self.state = FeedingState::Idle;
                    return FeedingStep::event(FeedingEvent::Abandoned {
                        food,
                        reason: AbandonReason::Vanished,
                    });
                };

                let give_up = food_config.detection_radius * food_config.give_up_multiple;
                if position.distance(food_position) > give_up {
                    self.state = FeedingState::Idle;
                    return FeedingStep::event(FeedingEvent::Abandoned {
                        food,
                        reason: AbandonReason::TooFar,
                    });
                }

                if horizontal_distance(position, food_position) <= food_config.arrival_tolerance {
                    if !world.claim_food(food) {
                        self.state = FeedingState::Idle;
                        return FeedingStep::event(FeedingEvent::Abandoned {
                            food,
                            reason: AbandonReason::ClaimLost,
                        });
                    }
                    self.state = if flight.is_some() {
                        FeedingState::Landing
                    } else {
                        FeedingState::Eating {
                            remaining: food_config.eat_duration,
                        }
                    };
                    return FeedingStep::event(FeedingEvent::Claimed(food));
                }

                FeedingStep {
                    intent: Some(MoveIntent::new(
                        food_position,
                        config.movement.walk_speed,
                        config.movement.turn_rate,
                    )),
                    event: None,
                }
            }
            FeedingState::Landing => {
                if matches!(flight, None | Some(FlightState::OnGround)) {
                    self.state = FeedingState::Eating {
                        remaining: food_config.eat_duration,
                    };
                    FeedingStep::event(FeedingEvent::BeganEating)
                } else {
                    FeedingStep::idle()
                }
            }
            FeedingState::Eating { remaining } => {
                *remaining -= dt;
                if *remaining <= TIMER_EPSILON {
                    self.state = FeedingState::Grace {
                        remaining: food_config.grace_duration,
                    };
                }
                FeedingStep::idle()
            }
            FeedingState::Grace { remaining } => {
                *remaining -= dt;
                if *remaining <= TIMER_EPSILON {
                    self.state = FeedingState::Idle;
                    FeedingStep::event(FeedingEvent::Digested)
                } else {
                    FeedingStep::idle()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubWorld;
    use crate::types::{FoodType, Temperament};

    fn fearful() -> CreatureConfig {
        let mut config = CreatureConfig::ground().with_temperament(Temperament::Fearful);
        config.food.player_safe_distance = 20.0;
        config.food.detection_radius = 30.0;
        config
    }

    #[test]
    fn test_fearful_creature_avoids_food_near_threat() {
        let mut world = StubWorld::default();
        let food_pos = Vec3::new(10.0, 0.0, 0.0);
        world.add_food(1, food_pos, FoodType::Berries);
        world.threats.push(food_pos + Vec3::new(0.0, 0.0, 15.0));

        let mut controller = FoodController::new();
        assert_eq!(controller.scan(Vec3::ZERO, &world, &fearful()), None);
        assert_eq!(controller.state(), FeedingState::Idle);
    }

    #[test]
    fn test_fearful_creature_approaches_food_far_from_threat() {
        let mut world = StubWorld::default();
        let food_pos = Vec3::new(10.0, 0.0, 0.0);
        let id = world.add_food(1, food_pos, FoodType::Berries);
        world.threats.push(food_pos + Vec3::new(0.0, 0.0, 25.0));

        let mut controller = FoodController::new();
        assert_eq!(controller.scan(Vec3::ZERO, &world, &fearful()), Some(id));
        assert_eq!(controller.state(), FeedingState::Approaching { food: id });
    }

    #[test]
    fn test_ignores_unpreferred_food() {
        let mut world = StubWorld::default();
        world.add_food(1, Vec3::new(2.0, 0.0, 0.0), FoodType::Meat);
        let mut controller = FoodController::new();
        assert_eq!(
            controller.scan(Vec3::ZERO, &world, &CreatureConfig::ground()),
            None
        );
    }

    #[test]
    fn test_first_in_scan_order_wins() {
        let mut world = StubWorld::default();
        let far = world.add_food(1, Vec3::new(9.0, 0.0, 0.0), FoodType::Berries);
        world.add_food(2, Vec3::new(1.0, 0.0, 0.0), FoodType::Berries);

        let mut controller = FoodController::new();
        assert_eq!(
            controller.scan(Vec3::ZERO, &world, &CreatureConfig::ground()),
            Some(far)
        );
    }

    #[test]
    fn test_ground_creature_full_cycle() {
        let mut world = StubWorld::default();
        let id = world.add_food(1, Vec3::new(0.3, 0.0, 0.0), FoodType::Seeds);
        let config = CreatureConfig::ground();
        let mut controller = FoodController::new();

        controller.scan(Vec3::ZERO, &world, &config);
        let step = controller.tick(0.1, Vec3::ZERO, &world, &config, None);
        assert_eq!(step.event, Some(FeedingEvent::Claimed(id)));
        assert!(world.food_position(id).is_none());
        assert!(matches!(controller.state(), FeedingState::Eating { .. }));

        let mut elapsed = 0.0;
        while matches!(controller.state(), FeedingState::Eating { .. }) {
            controller.tick(0.5, Vec3::ZERO, &world, &config, None);
            elapsed += 0.5;
        }
        assert!((elapsed - config.food.eat_duration).abs() < 1e-3);
        assert!(matches!(controller.state(), FeedingState::Grace { .. }));

        let mut last = FeedingStep::default();
        while controller.is_engaged() {
            last = controller.tick(0.5, Vec3::ZERO, &world, &config, None);
        }
        assert_eq!(last.event, Some(FeedingEvent::Digested));
    }

    #[test]
    fn test_approach_moves_toward_food() {
        let mut world = StubWorld::default();
        let food_pos = Vec3::new(6.0, 0.0, 0.0);
        world.add_food(1, food_pos, FoodType::Berries);
        let config = CreatureConfig::ground();
        let mut controller = FoodController::new();

        controller.scan(Vec3::ZERO, &world, &config);
        let step = controller.tick(0.1, Vec3::ZERO, &world, &config, None);
        assert_eq!(step.intent.map(|i| i.destination), Some(food_pos));
        assert!(step.event.is_none());
    }

    #[test]
    fn test_vanished_food_abandons() {
        let mut world = StubWorld::default();
        let id = world.add_food(1, Vec3::new(6.0, 0.0, 0.0), FoodType::Berries);
        let config = CreatureConfig::ground();
        let mut controller = FoodController::new();
        controller.scan(Vec3::ZERO, &world, &config);

        world.food.clear();
        let step = controller.tick(0.1, Vec3::ZERO, &world, &config, None);
        assert_eq!(
            step.event,
            Some(FeedingEvent::Abandoned {
                food: id,
                reason: AbandonReason::Vanished
            })
        );
        assert_eq!(controller.state(), FeedingState::Idle);
    }

    #[test]
    fn test_gives_up_when_too_far() {
        let mut world = StubWorld::default();
        let id = world.add_food(1, Vec3::new(6.0, 0.0, 0.0), FoodType::Berries);
        let config = CreatureConfig::ground();
        let mut controller = FoodController::new();
        controller.scan(Vec3::ZERO, &world, &config);

        let far_away = Vec3::new(-100.0, 0.0, 0.0);
        let step = controller.tick(0.1, far_away, &world, &config, None);
        assert_eq!(
            step.event,
            Some(FeedingEvent::Abandoned {
                food: id,
                reason: AbandonReason::TooFar
            })
        );
    }

    #[test]
    fn test_lost_claim_falls_back_to_idle() {
        let mut world = StubWorld::default();
        let id = world.add_food(1, Vec3::new(0.2, 0.0, 0.0), FoodType::Berries);
        let config = CreatureConfig::ground();

        let mut first = FoodController::new();
        let mut second = FoodController::new();
        first.scan(Vec3::ZERO, &world, &config);
        second.scan(Vec3::ZERO, &world, &config);

        let won = first.tick(0.1, Vec3::ZERO, &world, &config, None);
        assert_eq!(won.event, Some(FeedingEvent::Claimed(id)));

        // Source vanished from queries the instant it was claimed
        let lost = second.tick(0.1, Vec3::ZERO, &world, &config, None);
        assert!(matches!(
            lost.event,
            Some(FeedingEvent::Abandoned { food, .. }) if food == id
        ));
        assert_eq!(second.state(), FeedingState::Idle);
    }

    #[test]
    fn test_airborne_waits_for_touchdown() {
        let mut world = StubWorld::default();
        world.add_food(1, Vec3::new(0.1, 0.0, 0.0), FoodType::Seeds);
        let config = CreatureConfig::airborne();
        let mut controller = FoodController::new();
        let above = Vec3::new(0.0, 5.0, 0.0);

        controller.scan(above, &world, &config);
        controller.tick(0.1, above, &world, &config, Some(FlightState::Flying));
        assert_eq!(controller.state(), FeedingState::Landing);

        controller.tick(0.1, above, &world, &config, Some(FlightState::Landing));
        assert_eq!(controller.state(), FeedingState::Landing);

        let step = controller.tick(0.1, above, &world, &config, Some(FlightState::OnGround));
        assert_eq!(step.event, Some(FeedingEvent::BeganEating));
    }

    #[test]
    fn test_cancel_reports_approached_food() {
        let mut world = StubWorld::default();
        let id = world.add_food(1, Vec3::new(5.0, 0.0, 0.0), FoodType::Berries);
        let mut controller = FoodController::new();
        controller.scan(Vec3::ZERO, &world, &CreatureConfig::ground());
        assert_eq!(controller.cancel(), Some(id));
        assert!(!controller.is_engaged());
        assert_eq!(controller.cancel(), None);
    }
}
