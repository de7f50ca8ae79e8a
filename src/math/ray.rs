use super::vec3::{Point3, Vec3};

/// A parametric ray R(a) = origin + a·direction, carrying the precomputed
/// inverse direction used by AABB slab tests and the shutter time at which
/// it was spawned. The time is drawn once per primary ray and threaded
/// unchanged through every path segment.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vec3,
    pub inv_direction: Vec3,
    pub time: f64,
}

impl Ray {
    #[inline]
    pub fn new(origin: Point3, direction: Vec3, time: f64) -> Self {
        let inv_direction = Vec3::new(1.0 / direction.x, 1.0 / direction.y, 1.0 / direction.z);
        Self {
            origin,
            direction,
            inv_direction,
            time,
        }
    }

    #[inline(always)]
    pub fn at(self, a: f64) -> Point3 {
        self.origin + self.direction * a
    }
}
