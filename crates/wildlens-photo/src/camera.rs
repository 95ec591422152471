//! Pinhole camera model used to project subjects to screen space
//!
//! Screen coordinates are in pixels with the origin at the top-left corner
//! and y growing downward.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{PhotoConfigError, Result};

/// Output image size in pixels. Always positive; deserialization goes
/// through [`Viewport::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ViewportSize", into = "ViewportSize")]
pub struct Viewport {
    width: f32,
    height: f32,
}

/// Unchecked serialized form of [`Viewport`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ViewportSize {
    width: f32,
    height: f32,
}

impl TryFrom<ViewportSize> for Viewport {
    type Error = PhotoConfigError;

    fn try_from(size: ViewportSize) -> Result<Self> {
        Self::new(size.width, size.height)
    }
}

impl From<Viewport> for ViewportSize {
    fn from(viewport: Viewport) -> Self {
        Self {
            width: viewport.width,
            height: viewport.height,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        // Also rejects NaN and infinite sizes
        if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
            Ok(Self { width, height })
        } else {
            Err(PhotoConfigError::EmptyViewport { width, height })
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn diagonal(&self) -> f32 {
        self.width.hypot(self.height)
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Strictly inside the image, edges excluded
    pub fn contains_strictly(&self, point: Vec2) -> bool {
        point.x > 0.0 && point.x < self.width && point.y > 0.0 && point.y < self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    view: Mat4,
    projection: Mat4,
    viewport: Viewport,
}

impl Camera {
    pub fn from_matrices(view: Mat4, projection: Mat4, viewport: Viewport) -> Self {
        Self {
            view,
            projection,
            viewport,
        }
    }

    /// Right-handed perspective camera at `eye` looking at `target`
    pub fn look_at(eye: Vec3, target: Vec3, fov_y: f32, viewport: Viewport) -> Self {
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let projection = Mat4::perspective_rh(fov_y, viewport.aspect(), 0.1, 1000.0);
        Self::from_matrices(view, projection, viewport)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Distance in front of the camera along its view axis; negative behind
    pub fn depth(&self, world: Vec3) -> f32 {
        -self.view.transform_point3(world).z
    }

    /// Project to pixel coordinates. None for points at or behind the camera
    /// plane. Points outside the frustum still project, off-screen.
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let eye = self.view.transform_point3(world);
        if -eye.z <= 0.0 {
            return None;
        }

        let clip = self.projection * eye.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;

        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.width,
            (1.0 - ndc.y) * 0.5 * self.viewport.height,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::look_at(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -1.0),
            60f32.to_radians(),
            Viewport::default(),
        )
    }

    #[test]
    fn test_view_axis_projects_to_center() {
        let screen = camera().project(Vec3::new(0.0, 0.0, -10.0)).expect("in front");
        assert!((screen.x - 960.0).abs() < 1e-3);
        assert!((screen.y - 540.0).abs() < 1e-3);
    }

    #[test]
    fn test_screen_y_grows_downward() {
        let camera = camera();
        let up = camera.project(Vec3::new(0.0, 1.0, -10.0)).expect("in front");
        let right = camera.project(Vec3::new(1.0, 0.0, -10.0)).expect("in front");
        assert!(up.y < 540.0);
        assert!(right.x > 960.0);
    }

    #[test]
    fn test_points_behind_are_rejected() {
        let camera = camera();
        assert_eq!(camera.project(Vec3::new(0.0, 0.0, 5.0)), None);
        assert_eq!(camera.project(Vec3::ZERO), None);
        assert!(camera.depth(Vec3::new(0.0, 0.0, -3.0)) > 2.9);
    }

    #[test]
    fn test_viewport_rejects_empty() {
        assert!(Viewport::new(0.0, 1080.0).is_err());
        assert!(!Viewport::default().contains_strictly(Vec2::new(0.0, 10.0)));
        assert!(Viewport::default().contains_strictly(Vec2::new(1.0, 10.0)));
    }

    #[test]
    fn test_viewport_deserialize_is_checked() {
        let viewport: Viewport = ron::from_str("(width: 640.0, height: 480.0)").expect("parses");
        assert_eq!(viewport.width(), 640.0);
        assert_eq!(viewport.height(), 480.0);

        assert!(ron::from_str::<Viewport>("(width: 0.0, height: 0.0)").is_err());
        assert!(ron::from_str::<Viewport>("(width: 1920.0, height: -1.0)").is_err());
    }

    #[test]
    fn test_viewport_serializes_as_plain_size() {
        let text = ron::to_string(&Viewport::default()).expect("serializes");
        let back: Viewport = ron::from_str(&text).expect("parses");
        assert_eq!(back, Viewport::default());
    }
}
