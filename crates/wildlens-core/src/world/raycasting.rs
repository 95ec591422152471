//! Tagged box obstacles and ray queries against them

use glam::Vec3;
use serde::{Deserialize, Serialize};
use wildlens_creature::{ObjectTag, RayHit};
use wildlens_photo::Aabb;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub bounds: Aabb,
    pub tag: ObjectTag,
}

impl Obstacle {
    pub fn new(bounds: Aabb, tag: ObjectTag) -> Self {
        Self { bounds, tag }
    }

    /// Box standing on the ground at `base`
    pub fn standing(base: Vec3, half_width: f32, height: f32, tag: ObjectTag) -> Self {
        let min = base - Vec3::new(half_width, 0.0, half_width);
        let max = base + Vec3::new(half_width, height, half_width);
        Self::new(Aabb::new(min, max), tag)
    }
}

/// Raycasting utilities - stateless
pub struct Raycasting;

impl Raycasting {
    /// Slab test. Distance along the normalized ray to the first surface,
    /// 0 when the origin is inside the box. Faces count as part of the box,
    /// so a ray grazing a face hits it.
    pub fn ray_aabb(origin: Vec3, direction: Vec3, bounds: &Aabb) -> Option<f32> {
        let mut near = 0.0_f32;
        let mut far = f32::INFINITY;
        for axis in 0..3 {
            let (o, d) = (origin[axis], direction[axis]);
            let (lo, hi) = (bounds.min[axis], bounds.max[axis]);
            if d == 0.0 {
                // Parallel to this slab: never enters or leaves it
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let t1 = (lo - o) / d;
            let t2 = (hi - o) / d;
            near = near.max(t1.min(t2));
            far = far.min(t1.max(t2));
        }
        (far >= near).then_some(near)
    }

    /// Nearest obstacle hit within `max_distance`
    pub fn raycast(
        obstacles: &[Obstacle],
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        obstacles
            .iter()
            .filter_map(|obstacle| {
                let distance = Self::ray_aabb(origin, dir, &obstacle.bounds)?;
                (distance <= max_distance).then_some(RayHit {
                    distance,
                    point: origin + dir * distance,
                    tag: obstacle.tag,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
