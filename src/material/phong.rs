use std::f64::consts::PI;

use crate::hit::{HitRecord, ScatterRecord};
use crate::math::{Color, TangentSpace, Vec3};
use crate::sampler::{cosine_weighted_on_hemisphere, phong_weighted_on_hemisphere, Sampler};
use crate::texture::Texture;

/// A modified-Phong BRDF blending a diffuse lobe and a cosine-power
/// specular lobe, with optional alpha-tested opacity and tangent-space
/// normal mapping.
#[derive(Debug, Clone)]
pub struct Phong {
    pub kd: u32,
    pub ks: u32,
    pub shininess: u32,
    pub opacity: Option<u32>,
    pub normal_map: Option<u32>,
}

impl Phong {
    fn brdf(&self, n: Vec3, l: Vec3, v: Vec3, kd: Color, ks: Color, shininess: f64) -> Color {
        let diffuse = kd * (1.0 / PI);
        let cos_rv = (-l).reflect(n).dot(v).max(0.0);
        let specular = ks * ((shininess + 2.0) / (2.0 * PI)) * cos_rv.powf(shininess);
        diffuse + specular
    }

    fn shading_normal(&self, hr: &HitRecord, time: f64, textures: &[Texture]) -> Vec3 {
        let mut n = hr.normal;
        if let Some(map) = self.normal_map {
            let raw = textures[map as usize].value(hr.uv, time, textures);
            let mapped = raw * 2.0 - Vec3::ones();
            if mapped.dot(mapped) > f64::EPSILON && hr.tangent.dot(hr.tangent) > f64::EPSILON {
                let ts = TangentSpace::from_normal_and_tangent(hr.normal, hr.tangent);
                n = ts.to_world(mapped).normalized();
            }
        }
        n
    }

    pub fn scatter(
        &self,
        ray_direction: Vec3,
        ray_time: f64,
        hr: &HitRecord,
        sampler: &mut Sampler,
        textures: &[Texture],
    ) -> ScatterRecord {
        if let Some(opacity) = self.opacity {
            let alpha = textures[opacity as usize].value(hr.uv, ray_time, textures).x;
            if alpha < sampler.uniform01() {
                return ScatterRecord::Specular { direction: ray_direction, attenuation: Vec3::ones() };
            }
        }

        if hr.backside {
            return ScatterRecord::None;
        }

        let kd = textures[self.kd as usize].value(hr.uv, ray_time, textures);
        let ks = textures[self.ks as usize].value(hr.uv, ray_time, textures);
        let shininess = textures[self.shininess as usize].value(hr.uv, ray_time, textures).x;

        let n = self.shading_normal(hr, ray_time, textures);
        let v = -ray_direction;
        let r = ray_direction.reflect(n);

        let sum_kd = kd.x + kd.y + kd.z;
        let sum_ks = ks.x + ks.y + ks.z;
        let sum = sum_kd + sum_ks + 1e-4;
        let specular_probability = (sum_ks / sum).clamp(0.1, 0.9);

        let u0 = sampler.uniform01();
        let u1 = sampler.uniform01();
        let l = if sampler.uniform01() < specular_probability {
            let around_r = phong_weighted_on_hemisphere(shininess, u0, u1);
            TangentSpace::from_normal(r).to_world(around_r).normalized()
        } else {
            let around_n = cosine_weighted_on_hemisphere(u0, u1);
            TangentSpace::from_normal(n).to_world(around_n).normalized()
        };

        let cos_theta = l.dot(n);
        if cos_theta <= 0.0 {
            return ScatterRecord::None;
        }

        let diffuse_pdf = cos_theta / PI;
        let specular_pdf = 0.5 / PI * (shininess + 1.0) * r.dot(l).max(0.0).powf(shininess);
        let pdf = crate::math::mix(diffuse_pdf, specular_pdf, specular_probability);

        let attenuation = self.brdf(n, l, v, kd, ks, shininess) * cos_theta;
        ScatterRecord::Random { direction: l, pdf, attenuation }
    }

    pub fn scatter_to_direction(
        &self,
        ray_direction: Vec3,
        ray_time: f64,
        hr: &HitRecord,
        direction: Vec3,
        textures: &[Texture],
    ) -> ScatterRecord {
        let n = self.shading_normal(hr, ray_time, textures);
        let cos_theta = n.dot(direction);
        if cos_theta <= 0.0 {
            return ScatterRecord::None;
        }
        let kd = textures[self.kd as usize].value(hr.uv, ray_time, textures);
        let ks = textures[self.ks as usize].value(hr.uv, ray_time, textures);
        let shininess = textures[self.shininess as usize].value(hr.uv, ray_time, textures).x;

        let sum_kd = kd.x + kd.y + kd.z;
        let sum_ks = ks.x + ks.y + ks.z;
        let sum = sum_kd + sum_ks + 1e-4;
        let specular_probability = (sum_ks / sum).clamp(0.1, 0.9);

        let r = ray_direction.reflect(n);
        let diffuse_pdf = cos_theta / PI;
        let specular_pdf = 0.5 / PI * (shininess + 1.0) * r.dot(direction).max(0.0).powf(shininess);
        let pdf = crate::math::mix(diffuse_pdf, specular_pdf, specular_probability);

        let attenuation = self.brdf(n, direction, -ray_direction, kd, ks, shininess) * cos_theta;
        ScatterRecord::Random { direction, pdf, attenuation }
    }
}
