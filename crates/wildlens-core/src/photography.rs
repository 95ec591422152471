//! Turning creatures into photo subjects

use glam::Vec3;
use serde::{Deserialize, Serialize};
use wildlens_creature::Creature;
use wildlens_photo::{Aabb, Camera, SubjectId, Viewport};

/// The player's camera: lens, sensor and how far subjects are detected
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraRig {
    pub fov_y_degrees: f32,
    /// Eye height above the photographer's feet
    pub eye_height: f32,
    /// Subjects further away are not detected
    pub max_range: f32,
    pub viewport: Viewport,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            eye_height: 1.7,
            max_range: 40.0,
            viewport: Viewport::default(),
        }
    }
}

impl CameraRig {
    /// Camera held by someone standing at `feet`, pointed at `target`
    pub fn aim(&self, feet: Vec3, target: Vec3) -> Camera {
        let eye = feet + Vec3::Y * self.eye_height;
        Camera::look_at(eye, target, self.fov_y_degrees.to_radians(), self.viewport)
    }
}

pub fn subject_id(creature: &Creature) -> SubjectId {
    SubjectId(creature.id.raw())
}

/// World-space box around the creature's body
pub fn subject_bounds(creature: &Creature) -> Aabb {
    let (min, max) = creature.bounds();
    Aabb::new(min, max)
}

/// Creatures the camera detects: in range, in front of the lens and with
/// their center inside the frame
pub fn visible_subjects<'a>(
    camera: &Camera,
    creatures: impl IntoIterator<Item = &'a Creature>,
    max_range: f32,
    eye: Vec3,
) -> Vec<(SubjectId, Aabb)> {
    let viewport = camera.viewport();
    creatures
        .into_iter()
        .filter_map(|creature| {
            let bounds = subject_bounds(creature);
            let center = bounds.center();
            if center.distance(eye) > max_range {
                return None;
            }
            let screen = camera.project(center)?;
            viewport
                .contains_strictly(screen)
                .then(|| (subject_id(creature), bounds))
        })
        .collect()
}
