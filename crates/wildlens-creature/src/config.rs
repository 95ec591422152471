//! Creature tuning parameters
//!
//! All values are in world units (meters) and seconds. Defaults are tuned for
//! a deer-sized ground animal; airborne presets override flight and speeds.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::types::{CreatureKind, FoodType, Temperament};

/// Complete configuration for one creature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatureConfig {
    pub kind: CreatureKind,
    #[serde(default)]
    pub temperament: Temperament,
    #[serde(default)]
    pub movement: MovementConfig,
    #[serde(default)]
    pub wander: WanderConfig,
    #[serde(default)]
    pub escape: EscapeConfig,
    #[serde(default)]
    pub food: FoodConfig,
    /// Only consulted for airborne creatures
    #[serde(default)]
    pub flight: FlightConfig,
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self::ground()
    }
}

/// Speeds, turning and body size
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Patrol speed in m/s
    pub walk_speed: f32,
    /// Flee speed in m/s
    pub escape_speed: f32,
    /// Speed while following an attraction target
    pub attract_speed: f32,
    /// Facing interpolation rate while wandering (fraction per second)
    pub turn_rate: f32,
    /// Facing interpolation rate while escaping
    pub escape_turn_rate: f32,
    /// Static yaw offset in radians correcting the asset's forward axis
    pub yaw_offset: f32,
    /// Horizontal distance at which a wander target counts as reached
    pub arrive_tolerance: f32,
    /// Half extents of the body's bounding box
    pub body_half_extents: Vec3,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 2.5,
            escape_speed: 7.0,
            attract_speed: 3.5,
            turn_rate: 4.0,
            escape_turn_rate: 10.0,
            yaw_offset: 0.0,
            arrive_tolerance: 0.5,
            body_half_extents: Vec3::new(0.4, 0.6, 0.9),
        }
    }
}

/// Patrol around the home anchor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderConfig {
    /// Maximum allowed distance from home during normal patrol
    pub wander_radius: f32,
    /// Shortest time a wander target is held
    pub min_wander_time: f32,
    /// Longest time a wander target is held
    pub max_wander_time: f32,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            wander_radius: 20.0,
            min_wander_time: 3.0,
            max_wander_time: 8.0,
        }
    }
}

/// Threat detection and flight response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EscapeConfig {
    /// Distance within which a threat triggers escape
    pub detection_radius: f32,
    /// Distance from the threat at which the creature feels safe again
    pub safe_distance: f32,
    /// Minimum time spent fleeing once triggered
    pub escape_duration: f32,
}

impl Default for EscapeConfig {
    fn default() -> Self {
        Self {
            detection_radius: 10.0,
            safe_distance: 18.0,
            escape_duration: 3.0,
        }
    }
}

/// Feeding behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodConfig {
    /// Food types this creature eats; empty means it never feeds
    pub preferences: Vec<FoodType>,
    /// Radius scanned for food while idle
    pub detection_radius: f32,
    /// Approach is abandoned beyond this multiple of the detection radius
    pub give_up_multiple: f32,
    /// Horizontal distance at which the food is reached and consumed
    pub arrival_tolerance: f32,
    /// Time spent eating
    pub eat_duration: f32,
    /// Digestion time after eating before behavior resumes
    pub grace_duration: f32,
    /// Threat distance from the food that splits Fearful and Hostile approach
    pub player_safe_distance: f32,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            preferences: vec![FoodType::Berries, FoodType::Seeds],
            detection_radius: 12.0,
            give_up_multiple: 2.0,
            arrival_tolerance: 0.6,
            eat_duration: 4.0,
            grace_duration: 3.0,
            player_safe_distance: 20.0,
        }
    }
}

/// Altitude management for airborne creatures
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    /// Lowest cruise height above ground
    pub min_flight_height: f32,
    /// Highest cruise height above ground
    pub max_flight_height: f32,
    /// Per-tick probability of re-rolling the cruise height
    pub reroll_chance: f32,
    /// Vertical speed while cruising or taking off (m/s)
    pub climb_rate: f32,
    /// Vertical speed while landing (m/s)
    pub descent_rate: f32,
    /// Resting height above ground once landed
    pub landing_offset: f32,
    /// Altitude error at which landing/takeoff counts as complete
    pub altitude_tolerance: f32,
    /// Takeoff completes after this long even if cruise height is not reached
    pub takeoff_timeout: f32,
    /// Length of the forward obstacle probe
    pub obstacle_lookahead: f32,
    /// Cruise height added when an obstacle is ahead
    pub avoidance_nudge: f32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            min_flight_height: 4.0,
            max_flight_height: 10.0,
            reroll_chance: 0.005,
            climb_rate: 2.0,
            descent_rate: 3.0,
            landing_offset: 0.1,
            altitude_tolerance: 0.15,
            takeoff_timeout: 3.0,
            obstacle_lookahead: 6.0,
            avoidance_nudge: 2.0,
        }
    }
}

impl CreatureConfig {
    /// Default ground creature (grazer)
    pub fn ground() -> Self {
        Self {
            kind: CreatureKind::Ground,
            temperament: Temperament::Neutral,
            movement: MovementConfig::default(),
            wander: WanderConfig::default(),
            escape: EscapeConfig::default(),
            food: FoodConfig::default(),
            flight: FlightConfig::default(),
        }
    }

    /// Default airborne creature (songbird)
    pub fn airborne() -> Self {
        Self {
            kind: CreatureKind::Airborne,
            temperament: Temperament::Fearful,
            movement: MovementConfig {
                walk_speed: 4.0,
                escape_speed: 9.0,
                attract_speed: 5.0,
                body_half_extents: Vec3::new(0.3, 0.2, 0.3),
                ..MovementConfig::default()
            },
            wander: WanderConfig {
                wander_radius: 30.0,
                ..WanderConfig::default()
            },
            escape: EscapeConfig {
                detection_radius: 12.0,
                safe_distance: 22.0,
                ..EscapeConfig::default()
            },
            food: FoodConfig {
                preferences: vec![FoodType::Seeds, FoodType::Nectar],
                ..FoodConfig::default()
            },
            flight: FlightConfig::default(),
        }
    }

    pub fn with_temperament(mut self, temperament: Temperament) -> Self {
        self.temperament = temperament;
        self
    }

    pub fn is_airborne(&self) -> bool {
        self.kind == CreatureKind::Airborne
    }

    /// Reject parameter sets no creature could run with
    pub fn validate(&self) -> Result<()> {
        let m = &self.movement;
        positive("movement.walk_speed", m.walk_speed)?;
        positive("movement.escape_speed", m.escape_speed)?;
        positive("movement.attract_speed", m.attract_speed)?;
        positive("movement.turn_rate", m.turn_rate)?;
        positive("movement.escape_turn_rate", m.escape_turn_rate)?;
        positive("movement.arrive_tolerance", m.arrive_tolerance)?;

        let w = &self.wander;
        positive("wander.wander_radius", w.wander_radius)?;
        positive("wander.min_wander_time", w.min_wander_time)?;
        ordered(
            ("wander.min_wander_time", w.min_wander_time),
            ("wander.max_wander_time", w.max_wander_time),
        )?;

        let e = &self.escape;
        positive("escape.detection_radius", e.detection_radius)?;
        positive("escape.safe_distance", e.safe_distance)?;
        positive("escape.escape_duration", e.escape_duration)?;

        let f = &self.food;
        positive("food.detection_radius", f.detection_radius)?;
        positive("food.give_up_multiple", f.give_up_multiple)?;
        positive("food.arrival_tolerance", f.arrival_tolerance)?;
        positive("food.eat_duration", f.eat_duration)?;
        positive("food.grace_duration", f.grace_duration)?;
        positive("food.player_safe_distance", f.player_safe_distance)?;

        if self.is_airborne() {
            let fl = &self.flight;
            positive("flight.min_flight_height", fl.min_flight_height)?;
            ordered(
                ("flight.min_flight_height", fl.min_flight_height),
                ("flight.max_flight_height", fl.max_flight_height),
            )?;
            fraction("flight.reroll_chance", fl.reroll_chance)?;
            positive("flight.climb_rate", fl.climb_rate)?;
            positive("flight.descent_rate", fl.descent_rate)?;
            positive("flight.altitude_tolerance", fl.altitude_tolerance)?;
            positive("flight.takeoff_timeout", fl.takeoff_timeout)?;
            positive("flight.obstacle_lookahead", fl.obstacle_lookahead)?;
            if fl.landing_offset < 0.0 {
                return Err(ConfigError::NotPositive {
                    field: "flight.landing_offset",
                    value: fl.landing_offset,
                });
            }
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn fraction(field: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::NotAFraction { field, value })
    }
}

fn ordered(min: (&'static str, f32), max: (&'static str, f32)) -> Result<()> {
    if min.1 <= max.1 {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange {
            min_field: min.0,
            min: min.1,
            max_field: max.0,
            max: max.1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(CreatureConfig::ground().validate().is_ok());
        assert!(CreatureConfig::airborne().validate().is_ok());
    }

    #[test]
    fn test_inverted_flight_heights_rejected() {
        let mut config = CreatureConfig::airborne();
        config.flight.min_flight_height = 12.0;
        config.flight.max_flight_height = 5.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedRange {
                min_field: "flight.min_flight_height",
                min: 12.0,
                max_field: "flight.max_flight_height",
                max: 5.0,
            })
        );
    }

    #[test]
    fn test_flight_ignored_for_ground_creatures() {
        let mut config = CreatureConfig::ground();
        config.flight.max_flight_height = -1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_wander_times_rejected() {
        let mut config = CreatureConfig::ground();
        config.wander.min_wander_time = 9.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_zero_radius_rejected() {
        let mut config = CreatureConfig::ground();
        config.escape.detection_radius = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "escape.detection_radius",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_reroll_chance_must_be_fraction() {
        let mut config = CreatureConfig::airborne();
        config.flight.reroll_chance = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotAFraction { .. })
        ));
    }

    #[test]
    fn test_config_ron_round_trip_keeps_defaults() {
        let text = "(kind: Airborne, temperament: Hostile)";
        let config: CreatureConfig = ron::from_str(text).expect("parse");
        assert!(config.is_airborne());
        assert_eq!(config.temperament, Temperament::Hostile);
        assert_eq!(config.wander.wander_radius, 20.0);
        assert!(config.validate().is_ok());
    }
}
