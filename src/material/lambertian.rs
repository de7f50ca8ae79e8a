use std::f64::consts::PI;

use crate::hit::{HitRecord, ScatterRecord};
use crate::math::TangentSpace;
use crate::sampler::{cosine_weighted_on_hemisphere, Sampler};
use crate::texture::Texture;

/// A diffuse material sampled with the optimal cosine-weighted hemisphere
/// strategy around the shading normal, so `pdf == cos(theta)/pi` exactly
/// cancels the `cos(theta)/pi` in the BRDF's attenuation.
#[derive(Debug, Clone)]
pub struct Lambertian {
    pub albedo: u32,
}

impl Lambertian {
    pub fn scatter(&self, hr: &HitRecord, time: f64, sampler: &mut Sampler, textures: &[Texture]) -> ScatterRecord {
        if hr.backside {
            return ScatterRecord::None;
        }
        let u0 = sampler.uniform01();
        let u1 = sampler.uniform01();
        let around_n = cosine_weighted_on_hemisphere(u0, u1);
        let direction = TangentSpace::from_normal(hr.normal).to_world(around_n).normalized();
        let cos_theta = hr.normal.dot(direction).max(0.0);
        let pdf = cos_theta / PI;
        let albedo = textures[self.albedo as usize].value(hr.uv, time, textures);
        let attenuation = albedo * (1.0 / PI) * cos_theta;
        ScatterRecord::Random { direction, pdf, attenuation }
    }

    pub fn scatter_to_direction(
        &self,
        hr: &HitRecord,
        direction: crate::math::Vec3,
        time: f64,
        textures: &[Texture],
    ) -> ScatterRecord {
        let cos_theta = hr.normal.dot(direction);
        if cos_theta <= 0.0 {
            return ScatterRecord::None;
        }
        let p = cos_theta / PI;
        let albedo = textures[self.albedo as usize].value(hr.uv, time, textures);
        let attenuation = albedo * (1.0 / PI) * cos_theta;
        ScatterRecord::Random { direction, pdf: p, attenuation }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vec2, Vec3};

    fn hr(normal: Vec3) -> HitRecord {
        HitRecord {
            t: 1.0,
            position: Point3::zero(),
            normal,
            uv: Vec2::zero(),
            tangent: Vec3::unit_x(),
            backside: false,
            surface_index: 0,
            material_index: 0,
        }
    }

    #[test]
    fn scattered_direction_stays_in_hemisphere() {
        let lambertian = Lambertian { albedo: 0 };
        let textures = vec![Texture::Constant(Vec3::new(0.8, 0.8, 0.8))];
        let mut sampler = Sampler::for_pixel(5);
        for _ in 0..256 {
            match lambertian.scatter(&hr(Vec3::unit_y()), 0.0, &mut sampler, &textures) {
                ScatterRecord::Random { direction, .. } => assert!(direction.dot(Vec3::unit_y()) >= -1e-9),
                _ => panic!("expected a random scatter"),
            }
        }
    }

    #[test]
    fn backside_hit_terminates_the_path() {
        let lambertian = Lambertian { albedo: 0 };
        let textures = vec![Texture::Constant(Vec3::new(0.8, 0.8, 0.8))];
        let mut sampler = Sampler::for_pixel(5);
        let mut h = hr(Vec3::unit_y());
        h.backside = true;
        assert!(lambertian.scatter(&h, 0.0, &mut sampler, &textures).is_none());
    }
}
