use crate::animation::Animation;
use crate::hit::HitRecord;
use crate::math::{mix, Aabb, Point3, Vec2, Vec3};
use crate::sampler::uniform_in_triangle;

/// A single triangle with per-vertex normals, UVs and tangents. Meshes are
/// built in-process (no OBJ/MTL importer) and flattened into one `Triangle`
/// per face; [`compute_vertex_tangent`] mirrors the reference mesh builder's
/// Gram-Schmidt tangent derivation for callers that want shading tangents
/// from UVs instead of hand-specifying them.
#[derive(Debug, Clone)]
pub struct Triangle {
    pub p0: Point3,
    pub p1: Point3,
    pub p2: Point3,
    /// Per-vertex shading normals; `None` falls back to the flat face normal.
    pub normals: Option<[Vec3; 3]>,
    pub uvs: Option<[Vec2; 3]>,
    pub tangents: Option<[Vec3; 3]>,
    pub material_index: u32,
    pub animation: Option<Animation>,
}

impl Triangle {
    pub fn new(p0: Point3, p1: Point3, p2: Point3, material_index: u32) -> Self {
        Self {
            p0,
            p1,
            p2,
            normals: None,
            uvs: None,
            tangents: None,
            material_index,
            animation: None,
        }
    }

    pub fn with_normals(mut self, normals: [Vec3; 3]) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_uvs(mut self, uvs: [Vec2; 3]) -> Self {
        self.uvs = Some(uvs);
        self
    }

    pub fn with_tangents(mut self, tangents: [Vec3; 3]) -> Self {
        self.tangents = Some(tangents);
        self
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    /// World-space vertices at time `time`, after applying the mesh's
    /// animation (if any).
    fn resolve(&self, time: f64) -> (Point3, Point3, Point3) {
        match &self.animation {
            None => (self.p0, self.p1, self.p2),
            Some(anim) => {
                let t = anim.at(time);
                (t.apply(self.p0), t.apply(self.p1), t.apply(self.p2))
            }
        }
    }

    fn bounds_at(p0: Point3, p1: Point3, p2: Point3) -> Aabb {
        let lo = Vec3::new(p0.x.min(p1.x).min(p2.x), p0.y.min(p1.y).min(p2.y), p0.z.min(p1.z).min(p2.z));
        let hi = Vec3::new(p0.x.max(p1.x).max(p2.x), p0.y.max(p1.y).max(p2.y), p0.z.max(p1.z).max(p2.z));
        Aabb::new(lo, hi)
    }

    /// AABB over the shutter window `[t0, t1]`: a single box for a static
    /// triangle, or the union of 16 time-sampled snapshots for an animated
    /// one — the same strategy used for moving spheres.
    pub fn bounds(&self, t0: f64, t1: f64) -> Aabb {
        match &self.animation {
            None => Self::bounds_at(self.p0, self.p1, self.p2),
            Some(_) => {
                const STEPS: u32 = 16;
                let mut box_ = Aabb::empty();
                for i in 0..STEPS {
                    let alpha = i as f64 / (STEPS - 1) as f64;
                    let time = mix(t0, t1, alpha);
                    let (p0, p1, p2) = self.resolve(time);
                    box_ = Aabb::merge(box_, Self::bounds_at(p0, p1, p2));
                }
                box_
            }
        }
    }

    /// Möller-Trumbore intersection with barycentric interpolation of the
    /// shading normal, UV and tangent.
    pub fn hit(&self, ray: &crate::math::Ray, a_min: f64, a_max: f64) -> Option<HitRecord> {
        let (p0, p1, p2) = self.resolve(ray.time);
        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let c2 = ray.direction.cross(e2);

        let d_pre = c2.dot(e1);
        if d_pre.abs() < f64::EPSILON {
            return None;
        }
        let backside = d_pre < 0.0;
        let inv_d = 1.0 / d_pre;

        let t = ray.origin - p0;
        let c1 = t.cross(e1);

        let u = c2.dot(t) * inv_d;
        if u < 0.0 || u > 1.0 {
            return None;
        }
        let v = c1.dot(ray.direction) * inv_d;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let alpha = c1.dot(e2) * inv_d;
        if alpha < a_min || alpha > a_max {
            return None;
        }

        let w = 1.0 - u - v;
        let position = ray.at(alpha);

        let mut normal = match self.normals {
            Some([n0, n1, n2]) => n0 * w + n1 * u + n2 * v,
            None => e1.cross(e2),
        }
        .normalized();
        if backside {
            normal = -normal;
        }

        let uv = match self.uvs {
            Some([uv0, uv1, uv2]) => uv0 * w + uv1 * u + uv2 * v,
            None => Vec2::zero(),
        };

        let tangent = match self.tangents {
            Some([t0, t1, t2]) => (t0 * w + t1 * u + t2 * v).normalized(),
            None => e1.normalized(),
        };

        Some(HitRecord {
            t: alpha,
            position,
            normal,
            uv,
            tangent,
            backside,
            surface_index: 0,
            material_index: self.material_index,
        })
    }

    fn area_at(p0: Point3, p1: Point3, p2: Point3) -> f64 {
        0.5 * (p1 - p0).cross(p2 - p0).length()
    }

    fn face_normal_at(p0: Point3, p1: Point3, p2: Point3) -> Vec3 {
        (p1 - p0).cross(p2 - p0).normalized()
    }

    /// Sample a direction from `origin` at time `time` towards a uniformly
    /// chosen point on the triangle's area, for next-event estimation
    /// against flat-panel area lights (e.g. a quad light built from two
    /// triangles).
    pub fn sample_direction(&self, origin: Point3, time: f64, u0: f64, u1: f64) -> Vec3 {
        let (p0, p1, p2) = self.resolve(time);
        let (b0, b1, b2) = uniform_in_triangle(u0, u1);
        let point = p0 * b0 + p1 * b1 + p2 * b2;
        (point - origin).normalized()
    }

    /// Solid-angle sampling pdf of `ray` with respect to this triangle,
    /// converting the uniform-area pdf `1/area` via the standard
    /// `distance^2 / (area * |cos(theta_light)|)` Jacobian.
    pub fn pdf(&self, ray: &crate::math::Ray) -> f64 {
        match self.hit(ray, 1e-4, f64::MAX) {
            None => 0.0,
            Some(hr) => {
                let (p0, p1, p2) = self.resolve(ray.time);
                let distance_squared = (hr.position - ray.origin).dot(hr.position - ray.origin);
                let cos_theta_light = Self::face_normal_at(p0, p1, p2).dot(-ray.direction).abs();
                if cos_theta_light < 1e-9 {
                    0.0
                } else {
                    distance_squared / (Self::area_at(p0, p1, p2) * cos_theta_light)
                }
            }
        }
    }
}

/// Per-vertex tangent via the reference mesh builder's approach: accumulate
/// the UV-space tangent direction of each incident face, then Gram-Schmidt
/// orthogonalize against the shading normal. Falls back to +x when the
/// accumulated tangent degenerates (no UVs, or a UV-degenerate face).
pub fn compute_vertex_tangent(accumulated: Vec3, normal: Vec3) -> Vec3 {
    if accumulated.dot(accumulated) > 0.0 {
        (accumulated - normal * normal.dot(accumulated)).normalized()
    } else {
        Vec3::unit_x()
    }
}

/// Accumulates the UV-space tangent contribution of one face onto its three
/// vertices, for callers building a mesh's tangent array before constructing
/// per-triangle [`Triangle`] values.
pub fn face_tangent_contribution(
    p0: Point3,
    p1: Point3,
    p2: Point3,
    uv0: Vec2,
    uv1: Vec2,
    uv2: Vec2,
) -> Option<Vec3> {
    let e1 = p1 - p0;
    let e2 = p2 - p0;
    let s1 = uv1.x - uv0.x;
    let t1 = uv1.y - uv0.y;
    let s2 = uv2.x - uv0.x;
    let t2 = uv2.y - uv0.y;
    let det = s1 * t2 - s2 * t1;
    if det.abs() > f64::EPSILON {
        Some((e1 * t2 - e2 * t1) * (1.0 / det))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Ray;

    #[test]
    fn ray_through_centroid_hits_triangle() {
        let tri = Triangle::new(
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            0,
        );
        let ray = Ray::new(Point3::new(0.0, -0.33, -5.0), Vec3::unit_z(), 0.0);
        let hr = tri.hit(&ray, 1e-4, f64::MAX).unwrap();
        assert!((hr.t - 5.0).abs() < 1e-9);
    }

    #[test]
    fn ray_outside_triangle_bounds_misses() {
        let tri = Triangle::new(
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            0,
        );
        let ray = Ray::new(Point3::new(5.0, 5.0, -5.0), Vec3::unit_z(), 0.0);
        assert!(tri.hit(&ray, 1e-4, f64::MAX).is_none());
    }

    #[test]
    fn face_normal_fallback_matches_right_hand_rule() {
        let tri = Triangle::new(
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            0,
        );
        let ray = Ray::new(Point3::new(0.0, -0.33, -5.0), Vec3::unit_z(), 0.0);
        let hr = tri.hit(&ray, 1e-4, f64::MAX).unwrap();
        assert!((hr.normal - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-9);
    }
}
