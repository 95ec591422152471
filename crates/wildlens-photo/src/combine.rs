//! Multi-subject combination policy
//!
//! When several subjects share one photo, the published rating is the best
//! subject score minus `(n - 1) * multi_target_penalty`, clamped to
//! `[min_score, max_score]`. This lives outside the per-subject scorer and
//! noticeably lowers ratings of crowded shots.

use serde::{Deserialize, Serialize};

use crate::error::{PhotoConfigError, Result};
use crate::scorer::MAX_SCORE;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombineConfig {
    pub multi_target_penalty: u8,
    pub min_score: u8,
    pub max_score: u8,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            multi_target_penalty: 1,
            min_score: 1,
            max_score: MAX_SCORE,
        }
    }
}

impl CombineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_score > self.max_score {
            return Err(PhotoConfigError::InvertedRange {
                min_field: "min_score",
                min: f32::from(self.min_score),
                max_field: "max_score",
                max: f32::from(self.max_score),
            });
        }
        Ok(())
    }
}

/// Published rating for one photo. None when there are no subjects.
///
/// Inverted clamp bounds are treated as the range between them, so an
/// unvalidated config never panics.
pub fn combine_scores(scores: &[u8], config: &CombineConfig) -> Option<u8> {
    let best = i32::from(*scores.iter().max()?);
    let extra = i32::try_from(scores.len() - 1).unwrap_or(i32::MAX);
    let penalty = extra.saturating_mul(i32::from(config.multi_target_penalty));
    let penalised = best.saturating_sub(penalty);
    let floor = config.min_score.min(config.max_score);
    let ceiling = config.min_score.max(config.max_score);
    let clamped = penalised.clamp(i32::from(floor), i32::from(ceiling));
    // Clamp bounds come from u8 values
    Some(clamped as u8)
}
