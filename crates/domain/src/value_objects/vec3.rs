//! World-space vector used for positions and velocities.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

/// A 3D vector. `y` is up; gameplay distances are measured on the XZ ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Ground-plane vector (y = 0).
    pub const fn ground(x: f32, z: f32) -> Self {
        Self { x, y: 0.0, z }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Euclidean distance ignoring height.
    pub fn ground_distance(self, other: Vec3) -> f32 {
        (self.x - other.x).hypot(self.z - other.z)
    }

    /// Moves up to `max_step` toward `target` on the ground plane without overshooting.
    pub fn step_toward(self, target: Vec3, max_step: f32) -> Vec3 {
        let dist = self.ground_distance(target);
        if dist <= max_step || dist <= f32::EPSILON {
            return Vec3::new(target.x, self.y, target.z);
        }
        let scale = max_step / dist;
        Vec3::new(
            self.x + (target.x - self.x) * scale,
            self.y,
            self.z + (target.z - self.z) * scale,
        )
    }

    /// Component-wise clamp to `[-bound, bound]`.
    pub fn clamp_axes(self, bound: f32) -> Vec3 {
        Vec3::new(
            self.x.clamp(-bound, bound),
            self.y.clamp(-bound, bound),
            self.z.clamp(-bound, bound),
        )
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}
