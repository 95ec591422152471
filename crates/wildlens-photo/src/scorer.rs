//! Photo framing scorer
//!
//! Scores one subject from 0 to 4 stars:
//! - size: 0-2, from the share of the image its projected rectangle covers
//! - position: 0-1, rectangle center near a rule-of-thirds point
//! - corners: 0-1, enough projected box corners strictly inside the image
//!
//! Scoring is a pure function of camera, bounds and config.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::bounds::Aabb;
use crate::camera::{Camera, Viewport};
use crate::error::{PhotoConfigError, Result};

/// Lower edge of the loose size band, as a multiple of `min_size_pct`
pub const LOOSE_MIN_FACTOR: f32 = 0.5;
/// Upper edge of the loose size band, as a multiple of `ideal_size_pct`
pub const LOOSE_IDEAL_FACTOR: f32 = 1.2;

/// Rule-of-thirds points as fractions of the image size
pub const THIRDS_POINTS: [Vec2; 4] = [
    Vec2::new(1.0 / 3.0, 1.0 / 3.0),
    Vec2::new(2.0 / 3.0, 1.0 / 3.0),
    Vec2::new(1.0 / 3.0, 2.0 / 3.0),
    Vec2::new(2.0 / 3.0, 2.0 / 3.0),
];

pub const MAX_SCORE: u8 = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Smallest screen share earning the full size score
    pub min_size_pct: f32,
    /// Largest screen share earning the full size score
    pub ideal_size_pct: f32,
    /// Max center distance to a thirds point, as a fraction of the diagonal
    pub center_tolerance: f32,
    /// Share of on-screen corners needed for the corner bonus
    pub corner_pct_needed: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_size_pct: 0.15,
            ideal_size_pct: 0.45,
            center_tolerance: 0.20,
            corner_pct_needed: 0.75,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        fraction("min_size_pct", self.min_size_pct)?;
        fraction("ideal_size_pct", self.ideal_size_pct)?;
        fraction("center_tolerance", self.center_tolerance)?;
        fraction("corner_pct_needed", self.corner_pct_needed)?;
        if self.min_size_pct > self.ideal_size_pct {
            return Err(PhotoConfigError::InvertedRange {
                min_field: "min_size_pct",
                min: self.min_size_pct,
                max_field: "ideal_size_pct",
                max: self.ideal_size_pct,
            });
        }
        Ok(())
    }
}

fn fraction(field: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PhotoConfigError::NotAFraction { field, value })
    }
}

/// Per-component result for one subject
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub size: u8,
    pub position: u8,
    pub corners: u8,
    /// Projected rectangle area over image area
    pub area_pct: f32,
    /// Rectangle center to nearest thirds point, over the image diagonal
    pub center_distance: f32,
    /// Share of projected corners strictly inside the image
    pub corner_fraction: f32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u8 {
        self.size + self.position + self.corners
    }
}

/// Stars for one subject; 0 when no corner lies in front of the camera
pub fn score(camera: &Camera, bounds: &Aabb, config: &ScoringConfig) -> u8 {
    breakdown(camera, bounds, config).map_or(0, |b| b.total())
}

/// Full breakdown, or None when the subject is entirely behind the camera
pub fn breakdown(camera: &Camera, bounds: &Aabb, config: &ScoringConfig) -> Option<ScoreBreakdown> {
    let projected: Vec<Vec2> = bounds
        .corners()
        .iter()
        .filter_map(|&corner| camera.project(corner))
        .collect();
    score_projected(&projected, camera.viewport(), config)
}

/// Score corners that are already in screen space (the survivors of projection)
pub fn score_projected(
    points: &[Vec2],
    viewport: Viewport,
    config: &ScoringConfig,
) -> Option<ScoreBreakdown> {
    let (&first, rest) = points.split_first()?;
    let (min, max) = rest
        .iter()
        .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));

    let rect = max - min;
    let area_pct = rect.x * rect.y / viewport.area();
    let size = size_score(area_pct, config);

    let center = (min + max) * 0.5;
    let dims = Vec2::new(viewport.width(), viewport.height());
    let center_distance = THIRDS_POINTS
        .iter()
        .map(|&third| center.distance(third * dims))
        .fold(f32::INFINITY, f32::min)
        / viewport.diagonal();
    let position = u8::from(center_distance <= config.center_tolerance);

    let inside = points
        .iter()
        .filter(|&&p| viewport.contains_strictly(p))
        .count();
    let corner_fraction = inside as f32 / points.len() as f32;
    let corners = u8::from(corner_fraction >= config.corner_pct_needed);

    Some(ScoreBreakdown {
        size,
        position,
        corners,
        area_pct,
        center_distance,
        corner_fraction,
    })
}

fn size_score(area_pct: f32, config: &ScoringConfig) -> u8 {
    if (config.min_size_pct..=config.ideal_size_pct).contains(&area_pct) {
        2
    } else if (config.min_size_pct * LOOSE_MIN_FACTOR..=config.ideal_size_pct * LOOSE_IDEAL_FACTOR)
        .contains(&area_pct)
    {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn hd() -> Viewport {
        Viewport::new(1920.0, 1080.0).expect("valid viewport")
    }

    /// Eight corners of a box whose projection is the given rectangle
    fn rect_points(center: Vec2, size: Vec2) -> Vec<Vec2> {
        let half = size * 0.5;
        let quad = [
            center + Vec2::new(-half.x, -half.y),
            center + Vec2::new(half.x, -half.y),
            center + Vec2::new(-half.x, half.y),
            center + Vec2::new(half.x, half.y),
        ];
        quad.iter().chain(quad.iter()).copied().collect()
    }

    fn forward_camera() -> Camera {
        Camera::look_at(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 60f32.to_radians(), hd())
    }

    #[test]
    fn test_thirds_rectangle_scores_four() {
        let points = rect_points(Vec2::new(1280.0, 360.0), Vec2::new(700.0, 500.0));
        let result = score_projected(&points, hd(), &ScoringConfig::default()).expect("visible");

        assert!((result.area_pct - 0.1688).abs() < 1e-3);
        assert_eq!(result.size, 2);
        assert_eq!(result.position, 1);
        assert_eq!(result.corners, 1);
        assert_eq!(result.total(), 4);
    }

    #[test]
    fn test_size_bands() {
        let config = ScoringConfig::default();
        assert_eq!(size_score(0.15, &config), 2);
        assert_eq!(size_score(0.45, &config), 2);
        assert_eq!(size_score(0.10, &config), 1);
        assert_eq!(size_score(0.075, &config), 1);
        assert_eq!(size_score(0.50, &config), 1);
        assert_eq!(size_score(0.06, &config), 0);
        assert_eq!(size_score(0.60, &config), 0);
    }

    #[test]
    fn test_far_from_thirds_loses_position_point() {
        let points = rect_points(Vec2::new(40.0, 1040.0), Vec2::new(60.0, 60.0));
        let result = score_projected(&points, hd(), &ScoringConfig::default()).expect("visible");
        assert_eq!(result.position, 0);
        assert!(result.center_distance > 0.2);
    }

    #[test]
    fn test_corner_bonus_needs_strictly_inside() {
        // Right half of the corners lies past the right edge
        let points = rect_points(Vec2::new(1900.0, 540.0), Vec2::new(200.0, 200.0));
        let result = score_projected(&points, hd(), &ScoringConfig::default()).expect("visible");
        assert!((result.corner_fraction - 0.5).abs() < 1e-6);
        assert_eq!(result.corners, 0);

        // Corners touching the edge do not count as inside
        let edge = rect_points(Vec2::new(960.0, 540.0), Vec2::new(1920.0, 200.0));
        let result = score_projected(&edge, hd(), &ScoringConfig::default()).expect("visible");
        assert_eq!(result.corner_fraction, 0.0);
    }

    #[test]
    fn test_no_points_is_unscored() {
        assert_eq!(score_projected(&[], hd(), &ScoringConfig::default()), None);
    }

    #[test]
    fn test_subject_behind_camera_scores_zero() {
        let bounds = Aabb::from_center_half_extents(Vec3::new(0.0, 0.0, 6.0), Vec3::splat(1.5));
        let camera = forward_camera();
        assert_eq!(breakdown(&camera, &bounds, &ScoringConfig::default()), None);
        assert_eq!(score(&camera, &bounds, &ScoringConfig::default()), 0);
    }

    #[test]
    fn test_corners_behind_camera_are_discarded() {
        // Back face sits behind the camera plane, front face 3m ahead
        let bounds = Aabb::new(Vec3::new(-1.0, -1.0, -3.0), Vec3::new(1.0, 1.0, 1.0));
        let camera = forward_camera();
        let config = ScoringConfig::default();

        let survivors: Vec<Vec2> = bounds
            .corners()
            .iter()
            .filter_map(|&corner| camera.project(corner))
            .collect();
        assert_eq!(survivors.len(), 4);

        let result = breakdown(&camera, &bounds, &config).expect("front face visible");
        assert_eq!(Some(result), score_projected(&survivors, hd(), &config));
        // Fraction is over the four surviving corners, all on screen
        assert_eq!(result.corner_fraction, 1.0);
        assert_eq!(result.corners, 1);
        assert_eq!(result.size, 2);
        assert_eq!(result.total(), 4);
    }

    #[test]
    fn test_well_framed_box_through_camera() {
        // 3m cube 6m ahead fills about 19% of a 60 degree frame
        let bounds = Aabb::from_center_half_extents(Vec3::new(0.0, 0.0, -6.0), Vec3::splat(1.5));
        let result =
            breakdown(&forward_camera(), &bounds, &ScoringConfig::default()).expect("visible");
        assert!(result.area_pct > 0.15 && result.area_pct < 0.25);
        assert_eq!(result.total(), 4);
    }

    #[test]
    fn test_score_is_pure() {
        let bounds = Aabb::from_center_half_extents(Vec3::new(2.0, 1.0, -8.0), Vec3::ONE);
        let camera = forward_camera();
        let config = ScoringConfig::default();
        assert_eq!(score(&camera, &bounds, &config), score(&camera, &bounds, &config));
    }

    #[test]
    fn test_validate() {
        assert!(ScoringConfig::default().validate().is_ok());

        let inverted = ScoringConfig {
            min_size_pct: 0.5,
            ideal_size_pct: 0.4,
            ..ScoringConfig::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(PhotoConfigError::InvertedRange { .. })
        ));

        let out_of_range = ScoringConfig {
            corner_pct_needed: 1.5,
            ..ScoringConfig::default()
        };
        assert!(out_of_range.validate().is_err());
    }

    #[test]
    fn test_config_from_ron_fills_defaults() {
        let config: ScoringConfig = ron::from_str("(center_tolerance: 0.1)").expect("parses");
        assert_eq!(config.center_tolerance, 0.1);
        assert_eq!(config.min_size_pct, 0.15);
    }
}
