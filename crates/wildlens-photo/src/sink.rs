//! Where finished photos go
//!
//! A progression system only ever sees `(subject, stars)` pairs.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bounds::Aabb;
use crate::camera::Camera;
use crate::combine::{CombineConfig, combine_scores};
use crate::scorer::{ScoringConfig, score};

/// Opaque id of a photographed subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub u64);

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Subject({})", self.0)
    }
}

/// Receives star ratings whenever a photo is finalized
pub trait PhotoSink {
    fn record(&mut self, subject: SubjectId, stars: u8);
}

/// A scored photograph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    /// Per-subject scores in the order subjects were given
    pub subjects: Vec<(SubjectId, u8)>,
    /// Combined, published rating
    pub stars: u8,
}

impl Photo {
    /// Score every visible subject and combine. None when nothing is in shot.
    pub fn take(
        camera: &Camera,
        subjects: &[(SubjectId, Aabb)],
        scoring: &ScoringConfig,
        combine: &CombineConfig,
    ) -> Option<Self> {
        let scored: Vec<(SubjectId, u8)> = subjects
            .iter()
            .map(|(id, bounds)| (*id, score(camera, bounds, scoring)))
            .collect();
        let raw: Vec<u8> = scored.iter().map(|(_, s)| *s).collect();
        let stars = combine_scores(&raw, combine)?;
        log::debug!("Photo of {} subject(s) rated {}", scored.len(), stars);
        Some(Self {
            subjects: scored,
            stars,
        })
    }

    /// Hand the combined rating to `sink` for every subject in the shot
    pub fn publish(&self, sink: &mut impl PhotoSink) {
        for (subject, _) in &self.subjects {
            sink.record(*subject, self.stars);
        }
    }
}

/// In-memory sink keeping the best rating per subject
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoAlbum {
    best: BTreeMap<SubjectId, u8>,
    photos: usize,
}

impl PhotoAlbum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn best(&self, subject: SubjectId) -> Option<u8> {
        self.best.get(&subject).copied()
    }

    /// Number of ratings received
    pub fn photos(&self) -> usize {
        self.photos
    }

    pub fn subjects(&self) -> usize {
        self.best.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SubjectId, u8)> + '_ {
        self.best.iter().map(|(id, stars)| (*id, *stars))
    }

    pub fn total_stars(&self) -> u32 {
        self.best.values().map(|&s| u32::from(s)).sum()
    }
}

impl PhotoSink for PhotoAlbum {
    fn record(&mut self, subject: SubjectId, stars: u8) {
        self.photos += 1;
        let best = self.best.entry(subject).or_insert(stars);
        if stars > *best {
            log::info!("New best for {}: {} stars", subject, stars);
            *best = stars;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Viewport;
    use glam::Vec3;

    #[test]
    fn test_album_keeps_best() {
        let mut album = PhotoAlbum::new();
        album.record(SubjectId(1), 2);
        album.record(SubjectId(1), 4);
        album.record(SubjectId(1), 3);
        album.record(SubjectId(2), 1);

        assert_eq!(album.best(SubjectId(1)), Some(4));
        assert_eq!(album.best(SubjectId(2)), Some(1));
        assert_eq!(album.best(SubjectId(3)), None);
        assert_eq!(album.photos(), 4);
        assert_eq!(album.total_stars(), 5);
    }

    #[test]
    fn test_take_and_publish() {
        let camera = Camera::look_at(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -1.0),
            60f32.to_radians(),
            Viewport::default(),
        );
        let subjects = [
            (
                SubjectId(7),
                Aabb::from_center_half_extents(Vec3::new(0.0, 0.0, -6.0), Vec3::splat(1.5)),
            ),
            (
                SubjectId(8),
                Aabb::from_center_half_extents(Vec3::new(0.0, 0.0, 10.0), Vec3::ONE),
            ),
        ];
        let photo = Photo::take(
            &camera,
            &subjects,
            &ScoringConfig::default(),
            &CombineConfig::default(),
        )
        .expect("has subjects");

        assert_eq!(photo.subjects, vec![(SubjectId(7), 4), (SubjectId(8), 0)]);
        assert_eq!(photo.stars, 3);

        let mut album = PhotoAlbum::new();
        photo.publish(&mut album);
        assert_eq!(album.best(SubjectId(7)), Some(3));
        assert_eq!(album.best(SubjectId(8)), Some(3));
    }

    #[test]
    fn test_empty_photo() {
        let camera = Camera::look_at(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -1.0),
            1.0,
            Viewport::default(),
        );
        assert!(
            Photo::take(
                &camera,
                &[],
                &ScoringConfig::default(),
                &CombineConfig::default()
            )
            .is_none()
        );
    }
}
