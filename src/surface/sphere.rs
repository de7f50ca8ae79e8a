use std::f64::consts::PI;

use crate::animation::Animation;
use crate::hit::HitRecord;
use crate::math::{mix, Aabb, Point3, Quat, Ray, TangentSpace, Transformation, Vec2, Vec3};
use crate::sampler::{uniform_on_sphere, uniform_towards_sphere};

/// A sphere, optionally animated. Equirectangular UVs and a longitude
/// tangent are derived the same way as the reference renderer so checker
/// and image textures line up with it.
#[derive(Debug, Clone)]
pub struct Sphere {
    pub center: Point3,
    pub radius: f64,
    pub material_index: u32,
    pub animation: Option<Animation>,
}

impl Sphere {
    pub fn new(center: Point3, radius: f64, material_index: u32) -> Self {
        Self {
            center,
            radius,
            material_index,
            animation: None,
        }
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    fn resolve(&self, time: f64) -> (Point3, f64, Transformation) {
        match &self.animation {
            None => (self.center, self.radius, Transformation::identity()),
            Some(anim) => {
                let t = anim.at(time);
                let center = t.apply(self.center);
                let radius = t.scaling.x * self.radius;
                (center, radius, t)
            }
        }
    }

    pub fn bounds(&self, t0: f64, t1: f64) -> Aabb {
        match &self.animation {
            None => {
                let r = Vec3::splat(self.radius);
                Aabb::new(self.center - r, self.center + r)
            }
            Some(_) => {
                const STEPS: u32 = 16;
                let mut box_ = Aabb::empty();
                for i in 0..STEPS {
                    let alpha = i as f64 / (STEPS - 1) as f64;
                    let time = mix(t0, t1, alpha);
                    let (c, r, _) = self.resolve(time);
                    let rv = Vec3::splat(r);
                    box_ = Aabb::merge(box_, Aabb::new(c - rv, c + rv));
                }
                box_
            }
        }
    }

    fn construct_hit_record(&self, ray: &Ray, a: f64, center: Point3, rotation: Quat) -> HitRecord {
        let p = ray.at(a);
        let mut n = (p - center).normalized();

        let rn = rotation.rotate(n);
        let alpha = rn.x.atan2(rn.z);
        let beta = rn.y.clamp(-1.0, 1.0).asin();
        let u = (alpha + PI) / (2.0 * PI);
        let v = (beta + 0.5 * PI) / PI;

        let tangent = Vec3::new(alpha.cos(), 0.0, -alpha.sin());

        let mut backside = false;
        if n.dot(-ray.direction) < 0.0 {
            backside = true;
            n = -n;
        }

        HitRecord {
            t: a,
            position: p,
            normal: n,
            uv: Vec2::new(u, v),
            tangent,
            backside,
            surface_index: 0,
            material_index: self.material_index,
        }
    }

    fn hit_at(&self, center: Point3, radius: f64, rotation: Quat, ray: &Ray, a_min: f64, a_max: f64) -> Option<HitRecord> {
        let oc = ray.origin - center;
        let a_q = -oc.dot(ray.direction);
        let tmp = oc - oc.dot(ray.direction) * ray.direction;
        let discriminant = radius * radius - tmp.dot(tmp);
        if discriminant <= 0.0 {
            return None;
        }
        let sqrt_disc = discriminant.sqrt();
        let (a1, a2) = if a_q < 0.0 {
            let a2 = a_q - sqrt_disc;
            (2.0 * a_q - a2, a2)
        } else {
            let a1 = a_q + sqrt_disc;
            (a1, 2.0 * a_q - a1)
        };
        if a2 > a_min && a2 < a_max {
            Some(self.construct_hit_record(ray, a2, center, rotation))
        } else if a1 > a_min && a1 < a_max {
            Some(self.construct_hit_record(ray, a1, center, rotation))
        } else {
            None
        }
    }

    pub fn hit(&self, ray: &Ray, a_min: f64, a_max: f64) -> Option<HitRecord> {
        let (c, r, t) = self.resolve(ray.time);
        self.hit_at(c, r, t.rotation, ray, a_min, a_max)
    }

    /// Sample a direction from `origin` at time `time` that is guaranteed
    /// (barring float error) to hit this sphere, for next-event estimation.
    pub fn sample_direction(&self, origin: Point3, time: f64, u0: f64, u1: f64) -> Vec3 {
        let (c, r, _) = self.resolve(time);
        let cmo = c - origin;
        let distance_squared = cmo.dot(cmo);
        let radius_squared = r * r;
        if distance_squared <= radius_squared {
            uniform_on_sphere(u0, u1)
        } else {
            let discriminant = (1.0 - radius_squared / distance_squared).max(0.0);
            let cos_theta_max = discriminant.sqrt();
            let around_cmo = uniform_towards_sphere(cos_theta_max, u0, u1);
            TangentSpace::from_normal(cmo.normalized())
                .to_world(around_cmo)
                .normalized()
        }
    }

    /// Solid-angle sampling pdf of `ray` with respect to this sphere, for
    /// use in the power-heuristic MIS weight against BSDF sampling.
    pub fn pdf(&self, ray: &Ray) -> f64 {
        let (c, r, rotation) = self.resolve(ray.time);
        let cmo = c - ray.origin;
        let distance_squared = cmo.dot(cmo);
        let radius_squared = r * r;
        if distance_squared <= radius_squared {
            1.0 / (4.0 * PI)
        } else if self.hit_at(c, r, rotation, ray, 0.0, f64::MAX).is_some() {
            let discriminant = (1.0 - radius_squared / distance_squared).max(0.0);
            let cos_theta_max = discriminant.sqrt();
            let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);
            1.0 / solid_angle
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_through_center_hits_at_near_and_far_points() {
        let sphere = Sphere::new(Point3::zero(), 1.0, 0);
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::unit_z(), 0.0);
        let hr = sphere.hit(&ray, 1e-4, f64::MAX).unwrap();
        assert!((hr.t - 4.0).abs() < 1e-9);
        assert!((hr.position - Point3::new(0.0, 0.0, -1.0)).length() < 1e-9);
        assert!(!hr.backside);
    }

    #[test]
    fn ray_missing_sphere_reports_no_hit() {
        let sphere = Sphere::new(Point3::zero(), 1.0, 0);
        let ray = Ray::new(Point3::new(5.0, 5.0, -5.0), Vec3::unit_z(), 0.0);
        assert!(sphere.hit(&ray, 1e-4, f64::MAX).is_none());
    }

    #[test]
    fn ray_from_inside_reports_backside() {
        let sphere = Sphere::new(Point3::zero(), 1.0, 0);
        let ray = Ray::new(Point3::zero(), Vec3::unit_z(), 0.0);
        let hr = sphere.hit(&ray, 1e-4, f64::MAX).unwrap();
        assert!(hr.backside);
    }

    #[test]
    fn pdf_from_inside_sphere_is_full_sphere_solid_angle() {
        let sphere = Sphere::new(Point3::zero(), 1.0, 0);
        let ray = Ray::new(Point3::zero(), Vec3::unit_z(), 0.0);
        assert!((sphere.pdf(&ray) - 1.0 / (4.0 * PI)).abs() < 1e-12);
    }
}
