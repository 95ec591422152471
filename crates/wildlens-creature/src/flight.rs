//! Flight altitude controller for airborne creatures
//!
//! Heights in the controller are measured above the ground sampled below the
//! creature each tick, so a cruising flyer follows terrain elevation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::TIMER_EPSILON;
use crate::config::FlightConfig;
use crate::locomotion::{approach, planar};
use crate::rng::CreatureRng;
use crate::traits::WorldAccess;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FlightState {
    Flying,
    Landing,
    OnGround,
    TakingOff { elapsed: f32 },
}

/// Completed flight transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightEvent {
    Landed,
    TookOff,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightController {
    state: FlightState,
    /// Target cruise height above ground
    cruise_height: f32,
    /// Last successful ground probe
    ground_height: f32,
}

impl FlightController {
    /// Start cruising at a freshly rolled height above `ground_height`
    pub fn new(config: &FlightConfig, ground_height: f32, rng: &mut impl CreatureRng) -> Self {
        Self {
            state: FlightState::Flying,
            cruise_height: roll_cruise_height(config, rng),
            ground_height,
        }
    }

    pub fn state(&self) -> FlightState {
        self.state
    }

    pub fn cruise_height(&self) -> f32 {
        self.cruise_height
    }

    pub fn ground_height(&self) -> f32 {
        self.ground_height
    }

    /// Landing and takeoff suspend horizontal locomotion
    pub fn allows_horizontal_movement(&self) -> bool {
        matches!(self.state, FlightState::Flying | FlightState::OnGround)
    }

    pub fn is_grounded(&self) -> bool {
        matches!(self.state, FlightState::OnGround | FlightState::Landing)
    }

    /// Begin descending. Returns false if already landing or on the ground.
    pub fn begin_landing(&mut self) -> bool {
        match self.state {
            FlightState::Flying | FlightState::TakingOff { .. } => {
                log::debug!("Landing from cruise height {:.1}", self.cruise_height);
                self.state = FlightState::Landing;
                true
            }
            FlightState::Landing | FlightState::OnGround => false,
        }
    }

    /// Begin climbing back to a fresh cruise height. Returns false if already
    /// airborne.
    pub fn begin_takeoff(&mut self, config: &FlightConfig, rng: &mut impl CreatureRng) -> bool {
        match self.state {
            FlightState::OnGround | FlightState::Landing => {
                self.cruise_height = roll_cruise_height(config, rng);
                log::debug!("Taking off toward {:.1}", self.cruise_height);
                self.state = FlightState::TakingOff { elapsed: 0.0 };
                true
            }
            FlightState::Flying | FlightState::TakingOff { .. } => false,
        }
    }

    /// Probe the ground, run the altitude state machine and move `position.y`.
    /// `heading` is the direction the creature faces (used for the obstacle probe).
    pub fn update(
        &mut self,
        dt: f32,
        position: &mut Vec3,
        heading: Vec3,
        world: &impl WorldAccess,
        config: &FlightConfig,
        rng: &mut impl CreatureRng,
    ) -> Option<FlightEvent> {
        if let Some(ground) = world.ground_height(position.x, position.z) {
            self.ground_height = ground;
        }
        let ground = self.ground_height;

        match &mut self.state {
            FlightState::Flying => {
                if rng.check_probability(config.reroll_chance) {
                    self.cruise_height = roll_cruise_height(config, rng);
                }
                if obstacle_ahead(*position, heading, world, config.obstacle_lookahead) {
                    self.cruise_height =
                        (self.cruise_height + config.avoidance_nudge).min(config.max_flight_height);
                }
                position.y = approach(
                    position.y,
                    ground + self.cruise_height,
                    config.climb_rate * dt,
                );
                None
            }
            FlightState::Landing => {
                let target = ground + config.landing_offset;
                position.y = approach(position.y, target, config.descent_rate * dt);
                if (position.y - target).abs() <= config.altitude_tolerance {
                    position.y = target;
                    self.state = FlightState::OnGround;
                    Some(FlightEvent::Landed)
                } else {
                    None
                }
            }
            FlightState::OnGround => {
                position.y = ground + config.landing_offset;
                None
            }
            FlightState::TakingOff { elapsed } => {
                *elapsed += dt;
                let timed_out = *elapsed + TIMER_EPSILON >= config.takeoff_timeout;
                let target = ground + self.cruise_height;
                position.y = approach(position.y, target, config.climb_rate * dt);
                if timed_out || (position.y - target).abs() <= config.altitude_tolerance {
                    self.state = FlightState::Flying;
                    Some(FlightEvent::TookOff)
                } else {
                    None
                }
            }
        }
    }
}

fn roll_cruise_height(config: &FlightConfig, rng: &mut impl CreatureRng) -> f32 {
    rng.range_f32(config.min_flight_height, config.max_flight_height)
}

fn obstacle_ahead(position: Vec3, heading: Vec3, world: &impl WorldAccess, lookahead: f32) -> bool {
    let flat = planar(heading).normalize_or_zero();
    if flat == glam::Vec2::ZERO {
        return false;
    }
    world
        .raycast(position, Vec3::new(flat.x, 0.0, flat.y), lookahead)
        .is_some_and(|hit| hit.tag.is_flight_obstacle())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;
    use crate::testing::StubWorld;

    fn config() -> FlightConfig {
        FlightConfig {
            reroll_chance: 0.0,
            ..FlightConfig::default()
        }
    }

    #[test]
    fn test_cruise_height_within_band() {
        let config = config();
        let mut rng = seeded(1);
        for _ in 0..50 {
            let flight = FlightController::new(&config, 0.0, &mut rng);
            assert!(flight.cruise_height() >= config.min_flight_height);
            assert!(flight.cruise_height() <= config.max_flight_height);
        }
    }

    #[test]
    fn test_converges_to_cruise_height() {
        let world = StubWorld::default();
        let config = config();
        let mut rng = seeded(2);
        let mut flight = FlightController::new(&config, 0.0, &mut rng);
        let mut position = Vec3::ZERO;

        for _ in 0..200 {
            flight.update(0.1, &mut position, Vec3::Z, &world, &config, &mut rng);
        }
        assert!((position.y - flight.cruise_height()).abs() < 1e-4);
    }

    #[test]
    fn test_tracks_terrain_elevation() {
        let mut world = StubWorld::default();
        let config = config();
        let mut rng = seeded(3);
        let mut flight = FlightController::new(&config, 0.0, &mut rng);
        let mut position = Vec3::ZERO;

        world.ground = Some(12.0);
        for _ in 0..400 {
            flight.update(0.1, &mut position, Vec3::Z, &world, &config, &mut rng);
        }
        assert_eq!(flight.ground_height(), 12.0);
        assert!((position.y - (12.0 + flight.cruise_height())).abs() < 1e-4);
    }

    #[test]
    fn test_failed_probe_keeps_last_ground() {
        let mut world = StubWorld::default();
        world.ground = Some(3.0);
        let config = config();
        let mut rng = seeded(4);
        let mut flight = FlightController::new(&config, 0.0, &mut rng);
        let mut position = Vec3::new(0.0, 5.0, 0.0);
        flight.update(0.1, &mut position, Vec3::Z, &world, &config, &mut rng);

        world.ground = None;
        flight.update(0.1, &mut position, Vec3::Z, &world, &config, &mut rng);
        assert_eq!(flight.ground_height(), 3.0);
    }

    #[test]
    fn test_landing_reaches_ground() {
        let world = StubWorld::default();
        let config = config();
        let mut rng = seeded(5);
        let mut flight = FlightController::new(&config, 0.0, &mut rng);
        let mut position = Vec3::new(0.0, 8.0, 0.0);

        assert!(flight.begin_landing());
        assert!(!flight.allows_horizontal_movement());
        assert!(!flight.begin_landing());

        let mut landed = false;
        for _ in 0..100 {
            if flight.update(0.1, &mut position, Vec3::Z, &world, &config, &mut rng)
                == Some(FlightEvent::Landed)
            {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert_eq!(flight.state(), FlightState::OnGround);
        assert_eq!(position.y, config.landing_offset);
        assert!(flight.allows_horizontal_movement());
    }

    #[test]
    fn test_takeoff_completes_by_timeout() {
        let world = StubWorld::default();
        let config = FlightConfig {
            climb_rate: 0.01,
            ..config()
        };
        let mut rng = seeded(6);
        let mut flight = FlightController::new(&config, 0.0, &mut rng);
        let mut position = Vec3::ZERO;
        flight.begin_landing();
        flight.update(0.1, &mut position, Vec3::Z, &world, &config, &mut rng);
        assert_eq!(flight.state(), FlightState::OnGround);

        assert!(flight.begin_takeoff(&config, &mut rng));
        assert!(!flight.allows_horizontal_movement());

        let mut ticks = 0;
        while flight.state() != FlightState::Flying {
            flight.update(0.1, &mut position, Vec3::Z, &world, &config, &mut rng);
            ticks += 1;
            assert!(ticks <= 30, "takeoff exceeded its timeout");
        }
        // 30 steps of 0.1s reach the 3s timeout despite f32 accumulation
        assert_eq!(ticks, 30);
        // Far below cruise height: finished by timeout, not by altitude
        assert!(position.y < flight.cruise_height());
    }

    #[test]
    fn test_takeoff_completes_on_reaching_altitude() {
        let world = StubWorld::default();
        let config = FlightConfig {
            climb_rate: 50.0,
            ..config()
        };
        let mut rng = seeded(7);
        let mut flight = FlightController::new(&config, 0.0, &mut rng);
        let mut position = Vec3::ZERO;
        flight.begin_landing();
        flight.update(0.1, &mut position, Vec3::Z, &world, &config, &mut rng);
        flight.begin_takeoff(&config, &mut rng);

        let event = flight.update(0.5, &mut position, Vec3::Z, &world, &config, &mut rng);
        assert_eq!(event, Some(FlightEvent::TookOff));
        assert_eq!(flight.state(), FlightState::Flying);
    }

    #[test]
    fn test_obstacle_nudges_cruise_height_up() {
        let mut world = StubWorld::default();
        world.obstacles.push((Vec3::new(0.0, 5.0, 4.0), 1.5));
        let config = FlightConfig {
            min_flight_height: 4.0,
            max_flight_height: 20.0,
            ..config()
        };
        let mut rng = seeded(8);
        let mut flight = FlightController::new(&config, 0.0, &mut rng);
        let before = flight.cruise_height();
        let mut position = Vec3::new(0.0, 5.0, 0.0);

        flight.update(0.1, &mut position, Vec3::Z, &world, &config, &mut rng);
        assert!((flight.cruise_height() - (before + config.avoidance_nudge).min(20.0)).abs() < 1e-5);

        // Facing away from the obstacle: no nudge
        let after = flight.cruise_height();
        flight.update(0.1, &mut position, -Vec3::Z, &world, &config, &mut rng);
        assert_eq!(flight.cruise_height(), after);
    }

    #[test]
    fn test_takeoff_only_from_ground() {
        let config = config();
        let mut rng = seeded(9);
        let mut flight = FlightController::new(&config, 0.0, &mut rng);
        assert!(!flight.begin_takeoff(&config, &mut rng));
    }
}
