use std::ops::Mul;

use super::vec3::Vec3;

/// A unit quaternion representing a rotation, stored as (x, y, z, w).
#[derive(Debug, Clone, Copy)]
pub struct Quat {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quat {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Rotation of `angle` radians about `axis`.
    pub fn from_angle_axis(angle: f64, axis: Vec3) -> Self {
        let a = axis.normalized();
        let (sin_half, cos_half) = (angle * 0.5).sin_cos();
        Self::new(a.x * sin_half, a.y * sin_half, a.z * sin_half, cos_half)
    }

    /// The rotation that takes unit vector `from` to unit vector `to`,
    /// with explicit handling of the 0° and 180° degenerate cases.
    pub fn from_two_unit_vectors(from: Vec3, to: Vec3) -> Self {
        const EPS: f64 = 1e-7;
        let cos_angle = from.dot(to);
        if cos_angle >= 1.0 - EPS {
            Self::identity()
        } else if cos_angle <= -1.0 + EPS {
            let mut t = Vec3::unit_y();
            if from.dot(t) >= 1.0 - EPS {
                t = Vec3::unit_x();
            }
            Self::from_angle_axis(std::f64::consts::PI, t.cross(from))
        } else {
            Self::from_angle_axis(cos_angle.acos(), from.cross(to))
        }
    }

    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Rotate a vector by this quaternion: q * v * q⁻¹, specialized to the
    /// pure-vector case (no temporary quaternion multiplication needed).
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let qv = Vec3::new(self.x, self.y, self.z);
        let uv = qv.cross(v);
        let uuv = qv.cross(uv);
        v + (uv * self.w + uuv) * 2.0
    }

    /// Spherical linear interpolation with shortest-arc correction (negate
    /// one side if the quaternions are more than 90° apart) and a fallback
    /// to linear interpolation near the degenerate angle≈0 / angle≈π cases,
    /// where `1/sin(half_angle)` would blow up.
    pub fn slerp(self, other: Self, alpha: f64) -> Self {
        let mut w = other;
        let mut cos_half_angle = self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w;
        if cos_half_angle < 0.0 {
            w = Self::new(-w.x, -w.y, -w.z, -w.w);
            cos_half_angle = -cos_half_angle;
        }
        let (tmp_q, tmp_w) = if cos_half_angle >= 1.0 {
            (1.0, 0.0)
        } else {
            let half_angle = cos_half_angle.acos();
            let sin_half_angle = (1.0 - cos_half_angle * cos_half_angle).sqrt();
            if sin_half_angle.abs() < f64::EPSILON {
                (0.5, 0.5)
            } else {
                (
                    ((1.0 - alpha) * half_angle).sin() / sin_half_angle,
                    (alpha * half_angle).sin() / sin_half_angle,
                )
            }
        };
        Self::new(
            self.x * tmp_q + w.x * tmp_w,
            self.y * tmp_q + w.y * tmp_w,
            self.z * tmp_q + w.z * tmp_w,
            self.w * tmp_q + w.w * tmp_w,
        )
    }
}

impl Mul for Quat {
    type Output = Quat;
    fn mul(self, q: Quat) -> Quat {
        Quat::new(
            self.w * q.x + self.x * q.w + self.y * q.z - self.z * q.y,
            self.w * q.y + self.y * q.w + self.z * q.x - self.x * q.z,
            self.w * q.z + self.z * q.w + self.x * q.y - self.y * q.x,
            self.w * q.w - self.x * q.x - self.y * q.y - self.z * q.z,
        )
    }
}
