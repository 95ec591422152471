//! Shared move/rotate/arrive helpers used by every behavior layer
//!
//! Y is up. "Horizontal" means the XZ plane. Yaw is measured around +Y with
//! yaw 0 facing +Z.

use glam::{Vec2, Vec3};

/// Where a behavior layer wants the creature to go this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveIntent {
    pub destination: Vec3,
    pub speed: f32,
    /// Facing interpolation rate used while following this intent
    pub turn_rate: f32,
}

impl MoveIntent {
    pub fn new(destination: Vec3, speed: f32, turn_rate: f32) -> Self {
        Self {
            destination,
            speed,
            turn_rate,
        }
    }
}

/// Horizontal (XZ) component of a vector
pub fn planar(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Horizontal distance between two points
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    planar(a - b).length()
}

/// Whether `position` is within `tolerance` of `target` on the XZ plane
pub fn arrived(position: Vec3, target: Vec3, tolerance: f32) -> bool {
    horizontal_distance(position, target) <= tolerance
}

/// Step from `position` toward `target` in full 3D without overshooting
pub fn step_toward(position: Vec3, target: Vec3, speed: f32, dt: f32) -> Vec3 {
    let to_target = target - position;
    let distance = to_target.length();
    let max_step = speed * dt;
    if distance <= max_step || distance <= f32::EPSILON {
        target
    } else {
        position + to_target / distance * max_step
    }
}

/// Step toward `target` on the XZ plane only, leaving height untouched
pub fn step_toward_planar(position: Vec3, target: Vec3, speed: f32, dt: f32) -> Vec3 {
    let flat_target = Vec3::new(target.x, position.y, target.z);
    step_toward(position, flat_target, speed, dt)
}

/// Move a scalar toward a target by at most `max_delta`
pub fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + max_delta.copysign(delta)
    }
}

/// Yaw facing along `direction`, or None for a (near) vertical/zero vector
pub fn yaw_of(direction: Vec3) -> Option<f32> {
    let flat = planar(direction);
    if flat.length_squared() <= 1e-8 {
        None
    } else {
        Some(flat.x.atan2(flat.y))
    }
}

/// Forward unit vector of a yaw angle
pub fn forward(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Wrap an angle to (-PI, PI]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + std::f32::consts::PI).rem_euclid(std::f32::consts::TAU)
        - std::f32::consts::PI;
    if wrapped <= -std::f32::consts::PI {
        wrapped + std::f32::consts::TAU
    } else {
        wrapped
    }
}

/// Interpolate `yaw` toward the heading of `direction` by `turn_rate * dt`
/// of the remaining angle (shortest way round). `offset` corrects for the
/// asset's forward axis and is added to the movement heading.
pub fn turn_toward(yaw: f32, direction: Vec3, turn_rate: f32, offset: f32, dt: f32) -> f32 {
    let Some(heading) = yaw_of(direction) else {
        return yaw;
    };
    let desired = heading + offset;
    let t = (turn_rate * dt).clamp(0.0, 1.0);
    wrap_angle(yaw + wrap_angle(desired - yaw) * t)
}
