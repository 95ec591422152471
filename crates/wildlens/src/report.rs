//! Run summary

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use wildlens_creature::{CreatureEvent, Mode};
use wildlens_photo::{MAX_SCORE, PhotoAlbum};

/// Counts of notable creature events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventTally {
    pub stuns: usize,
    pub attractions: usize,
    pub escapes: usize,
    pub returns: usize,
    pub food_spotted: usize,
    pub food_claimed: usize,
    pub food_abandoned: usize,
    pub meals_finished: usize,
    pub landings: usize,
    pub takeoffs: usize,
}

impl EventTally {
    pub fn record(&mut self, event: &CreatureEvent) {
        match event {
            CreatureEvent::ModeChanged { to, .. } => match to {
                Mode::Stunned => self.stuns += 1,
                Mode::Attracted => self.attractions += 1,
                Mode::Escaping => self.escapes += 1,
                Mode::Returning => self.returns += 1,
                Mode::Wander => {}
            },
            CreatureEvent::StimulusApplied { .. } => {}
            CreatureEvent::FoodSpotted { .. } => self.food_spotted += 1,
            CreatureEvent::FoodClaimed { .. } => self.food_claimed += 1,
            CreatureEvent::FoodAbandoned { .. } => self.food_abandoned += 1,
            CreatureEvent::FinishedEating { .. } => self.meals_finished += 1,
            CreatureEvent::Landed { .. } => self.landings += 1,
            CreatureEvent::TookOff { .. } => self.takeoffs += 1,
        }
    }
}

/// Everything a run produced
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub seed: u64,
    pub simulated_secs: f32,
    pub ticks: usize,
    pub creatures: usize,
    /// Shutter presses, including ones with nothing in frame
    pub photos_attempted: usize,
    /// Photos with at least one subject
    pub photos_rated: usize,
    /// Index is the published star rating
    pub star_histogram: [usize; MAX_SCORE as usize + 1],
    pub darts_fired: usize,
    pub lures_dropped: usize,
    pub events: EventTally,
    pub album: PhotoAlbum,
}

impl RunReport {
    pub fn average_stars(&self) -> f32 {
        if self.photos_rated == 0 {
            return 0.0;
        }
        let total: usize = self
            .star_histogram
            .iter()
            .enumerate()
            .map(|(stars, count)| stars * count)
            .sum();
        total as f32 / self.photos_rated as f32
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "seed {} | {:.0}s in {} ticks | {} creatures\n\
             photos: {} taken, {} rated, avg {:.2} stars, histogram {:?}\n\
             album: {} subjects, {} stars total\n\
             darts: {} | lures: {} | escapes: {} | meals: {} | landings: {}",
            self.seed,
            self.simulated_secs,
            self.ticks,
            self.creatures,
            self.photos_attempted,
            self.photos_rated,
            self.average_stars(),
            self.star_histogram,
            self.album.subjects(),
            self.album.total_stars(),
            self.darts_fired,
            self.lures_dropped,
            self.events.escapes,
            self.events.meals_finished,
            self.events.landings,
        )
    }

    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<()> {
        let ron = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize report")?;
        std::fs::write(path.as_ref(), ron).with_context(|| {
            format!("Failed to write report to {}", path.as_ref().display())
        })?;
        log::info!("Report written to {}", path.as_ref().display());
        Ok(())
    }
}
