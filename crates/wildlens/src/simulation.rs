//! Scenario runner
//!
//! A photographer walks a circle through the population. They are the only
//! threat creatures know about, and periodically fire stun darts, throw
//! lures and take photos of the closest creature.

use anyhow::{Context, Result};
use glam::Vec3;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use wildlens_core::{CameraRig, ThreatId, World, subject_bounds, visible_subjects};
use wildlens_creature::rng::CreatureRng;
use wildlens_creature::{
    Creature, CreatureConfig, CreatureEvent, CreatureManager, FoodType, TargetId, Temperament,
};
use wildlens_photo::Photo;

use crate::config::SimConfig;
use crate::report::RunReport;

/// Countdown that fires every `interval` seconds
#[derive(Debug, Clone, Copy)]
struct Cadence {
    interval: f32,
    remaining: f32,
}

impl Cadence {
    fn new(interval: f32) -> Self {
        Self {
            interval,
            remaining: interval,
        }
    }

    fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        // Absorbs float drift so a 1s cadence at 0.1s ticks fires on the 10th
        if self.remaining <= 1e-4 {
            self.remaining += self.interval;
            true
        } else {
            false
        }
    }
}

struct ActiveLure {
    id: TargetId,
    remaining: f32,
}

pub struct Simulation {
    config: SimConfig,
    world: World,
    creatures: CreatureManager,
    player: ThreatId,
    /// Angle along the circular walk
    player_angle: f32,
    rng: Xoshiro256StarStar,
    photo: Cadence,
    dart: Cadence,
    lure: Cadence,
    food: Cadence,
    active_lure: Option<ActiveLure>,
    report: RunReport,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;

        let mut world = World::new(config.terrain.clone()).context("Failed to build terrain")?;
        let mut rng = Xoshiro256StarStar::seed_from_u64(config.simulation.seed);

        let mut start = player_path(&config, 0.0);
        start.y = world.terrain().height(start.x, start.z).unwrap_or(0.0);
        let player = world.add_threat(start);

        let mut creatures = CreatureManager::new(config.population.max_creatures);
        let population = &config.population;
        let spawns = std::iter::repeat_n(&config.ground_creature, population.ground)
            .chain(std::iter::repeat_n(&config.airborne_creature, population.airborne));
        for template in spawns {
            if let Some(creature) = spawn_creature(&config, template, &world, &mut rng)? {
                creatures.spawn(creature);
            }
        }

        for _ in 0..config.food.initial {
            scatter_food(&config, &mut world, &mut rng);
        }

        log::info!(
            "Simulation ready: {} creatures, {} food sources, seed {}",
            creatures.count(),
            world.available_food(),
            config.simulation.seed
        );

        let report = RunReport {
            seed: config.simulation.seed,
            creatures: creatures.count(),
            ..RunReport::default()
        };

        Ok(Self {
            photo: Cadence::new(config.player.photo_interval),
            dart: Cadence::new(config.player.dart_interval),
            lure: Cadence::new(config.player.lure_interval),
            food: Cadence::new(config.food.respawn_interval),
            config,
            world,
            creatures,
            player,
            player_angle: 0.0,
            rng,
            active_lure: None,
            report,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn creatures(&self) -> &CreatureManager {
        &self.creatures
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    fn player_position(&self) -> Vec3 {
        self.world
            .threat_position(self.player)
            .unwrap_or(Vec3::ZERO)
    }

    /// Run for the configured duration and hand back the report
    pub fn run(mut self) -> RunReport {
        let dt = 1.0 / self.config.simulation.tick_rate;
        let ticks = (self.config.simulation.duration_secs / dt).round() as usize;
        log::info!("Running {} ticks of {:.3}s", ticks, dt);
        for _ in 0..ticks {
            self.step(dt);
        }
        self.report
    }

    /// One simulation tick: player actions, creatures, then world bookkeeping
    pub fn step(&mut self, dt: f32) {
        self.walk_player(dt);
        self.update_lure(dt);

        if self.dart.tick(dt) {
            self.fire_dart();
        }
        if self.lure.tick(dt) && self.active_lure.is_none() {
            self.throw_lure();
        }

        let events = if self.config.simulation.parallel {
            self.update_creatures_parallel(dt)
        } else {
            self.creatures.update_all(dt, &self.world)
        };
        for event in &events {
            self.record_event(event);
        }

        if self.photo.tick(dt) {
            self.take_photo();
        }
        if self.food.tick(dt) && self.world.available_food() < self.config.food.max_available {
            scatter_food(&self.config, &mut self.world, &mut self.rng);
        }

        self.world.update(dt);
        self.report.ticks += 1;
        self.report.simulated_secs += dt;
    }

    #[cfg(feature = "parallel")]
    fn update_creatures_parallel(&mut self, dt: f32) -> Vec<CreatureEvent> {
        self.creatures.update_all_parallel(dt, &self.world)
    }

    #[cfg(not(feature = "parallel"))]
    fn update_creatures_parallel(&mut self, dt: f32) -> Vec<CreatureEvent> {
        self.creatures.update_all(dt, &self.world)
    }

    fn record_event(&mut self, event: &CreatureEvent) {
        self.report.events.record(event);
        if let CreatureEvent::FoodClaimed { id, food } = event {
            log::debug!("{} is eating {}", id, food);
        }
    }

    fn walk_player(&mut self, dt: f32) {
        let player = &self.config.player;
        self.player_angle += player.walk_speed / player.path_radius * dt;
        let flat = player_path(&self.config, self.player_angle);
        let height = self.world.terrain().height(flat.x, flat.z).unwrap_or(0.0);
        self.world
            .move_threat(self.player, Vec3::new(flat.x, height, flat.z));
    }

    fn fire_dart(&mut self) {
        let from = self.player_position();
        let Some(id) = self
            .creatures
            .nearest(from, self.config.player.dart_range)
            .map(|c| c.id)
        else {
            log::debug!("No creature in dart range");
            return;
        };
        if self.creatures.stun(id, self.config.player.stun_duration) {
            log::info!("Dart hit {}", id);
            self.report.darts_fired += 1;
        }
    }

    fn throw_lure(&mut self) {
        let player = self.player_position();
        // Ahead along the walk, toward the inside of the circle
        let inward = (-player).normalize_or_zero();
        let spot = player + inward * self.config.player.lure_throw;
        let height = self.world.terrain().height(spot.x, spot.z).unwrap_or(player.y);
        let id = self.world.add_lure(Vec3::new(spot.x, height, spot.z));

        let radius = self.config.player.lure_radius;
        let duration = self.config.player.lure_duration;
        let lured: Vec<_> = self
            .creatures
            .iter()
            .filter(|c| c.position().distance(spot) <= radius)
            .map(|c| c.id)
            .collect();
        for creature in &lured {
            self.creatures.attract(*creature, id, duration);
        }

        log::info!("Lure thrown, {} creature(s) attracted", lured.len());
        self.report.lures_dropped += 1;
        self.active_lure = Some(ActiveLure {
            id,
            remaining: duration,
        });
    }

    fn update_lure(&mut self, dt: f32) {
        let Some(lure) = &mut self.active_lure else {
            return;
        };
        lure.remaining -= dt;
        if lure.remaining <= 0.0 {
            self.world.remove_lure(lure.id);
            self.active_lure = None;
        }
    }

    fn take_photo(&mut self) {
        self.report.photos_attempted += 1;
        let rig: &CameraRig = &self.config.camera;
        let feet = self.player_position();
        let eye = feet + Vec3::Y * rig.eye_height;

        let Some(target) = self.creatures.nearest(eye, rig.max_range) else {
            log::debug!("Nothing in range to photograph");
            return;
        };
        let camera = rig.aim(feet, subject_bounds(target).center());
        let subjects = visible_subjects(&camera, self.creatures.iter(), rig.max_range, eye);

        let Some(photo) = Photo::take(&camera, &subjects, &self.config.scoring, &self.config.combine)
        else {
            return;
        };

        log::info!(
            "Photo of {} subject(s): {} star(s)",
            photo.subjects.len(),
            photo.stars
        );
        self.report.photos_rated += 1;
        if let Some(slot) = self.report.star_histogram.get_mut(usize::from(photo.stars)) {
            *slot += 1;
        }
        photo.publish(&mut self.report.album);
    }
}

/// Point on the photographer's circular walk (y is filled in from terrain)
fn player_path(config: &SimConfig, angle: f32) -> Vec3 {
    let radius = config.player.path_radius;
    Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
}

fn pick_temperament(config: &SimConfig, rng: &mut Xoshiro256StarStar) -> Temperament {
    let population = &config.population;
    if rng.check_probability(population.fearful_share) {
        Temperament::Fearful
    } else if rng.check_probability(population.hostile_share) {
        Temperament::Hostile
    } else {
        Temperament::Neutral
    }
}

/// Place one creature on the terrain. None when the spot has no ground.
fn spawn_creature(
    config: &SimConfig,
    template: &CreatureConfig,
    world: &World,
    rng: &mut Xoshiro256StarStar,
) -> Result<Option<Creature>> {
    let spot = rng.point_in_disk(Vec3::ZERO, config.population.spawn_radius);
    let Some(ground) = world.terrain().height(spot.x, spot.z) else {
        log::warn!("No ground at ({:.1}, {:.1}), skipping spawn", spot.x, spot.z);
        return Ok(None);
    };
    let altitude = if template.is_airborne() {
        config.population.spawn_altitude
    } else {
        0.0
    };

    let creature_config = template.clone().with_temperament(pick_temperament(config, rng));
    let seed = rand::RngCore::next_u64(rng);
    let creature = Creature::new(
        creature_config,
        Vec3::new(spot.x, ground + altitude, spot.z),
        seed,
    )
    .context("Failed to create creature")?;
    Ok(Some(creature))
}

fn scatter_food(config: &SimConfig, world: &mut World, rng: &mut Xoshiro256StarStar) {
    let spot = rng.point_in_disk(Vec3::ZERO, config.food.scatter_radius);
    let index = (rng.gen_f32() * FoodType::ALL.len() as f32) as usize;
    let food_type = FoodType::ALL[index.min(FoodType::ALL.len() - 1)];
    if world
        .drop_food(spot.x, spot.z, food_type, config.food.lifetime)
        .is_none()
    {
        log::warn!("No ground for food at ({:.1}, {:.1})", spot.x, spot.z);
    }
}
