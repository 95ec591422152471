//! Photo framing scorer for Wildlens
//!
//! Projects a subject's world-space bounding box through a camera and rates
//! the framing from 0 to 4 stars. Combining several subjects into one
//! published rating is a separate caller-side policy, see [`combine_scores`].

pub mod bounds;
pub mod camera;
pub mod combine;
pub mod error;
pub mod scorer;
pub mod sink;

pub use bounds::Aabb;
pub use camera::{Camera, Viewport};
pub use combine::{CombineConfig, combine_scores};
pub use error::PhotoConfigError;
pub use scorer::{MAX_SCORE, ScoreBreakdown, ScoringConfig, breakdown, score, score_projected};
pub use sink::{Photo, PhotoAlbum, PhotoSink, SubjectId};
