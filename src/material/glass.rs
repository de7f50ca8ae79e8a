use crate::hit::{HitRecord, ScatterRecord};
use crate::math::{Color, Vec3};
use crate::sampler::Sampler;

/// Exact unpolarized Fresnel reflectance, averaging the s- and p-polarized
/// components.
fn fresnel_unpolarized(cos_i: f64, cos_t: f64, n1: f64, n2: f64) -> f64 {
    let fs = (n1 * cos_i - n2 * cos_t) / (n1 * cos_i + n2 * cos_t);
    let fp = (n1 * cos_t - n2 * cos_i) / (n1 * cos_t + n2 * cos_i);
    0.5 * (fs * fs + fp * fp)
}

/// A dielectric (glass) volume with Beer-Lambert absorption on exit and
/// Fresnel-weighted reflect/refract choice.
#[derive(Debug, Clone)]
pub struct Glass {
    pub absorption: Color,
    pub refractive_index: f64,
}

impl Glass {
    pub fn scatter(&self, ray_direction: Vec3, hr: &HitRecord, sampler: &mut Sampler) -> ScatterRecord {
        let mut attenuation = Vec3::ones();
        let mut n2 = self.refractive_index;
        let mut n1 = 1.0;
        if hr.backside {
            std::mem::swap(&mut n1, &mut n2);
            let dist_in_volume = hr.t;
            attenuation = Vec3::new(
                (-self.absorption.x * dist_in_volume).exp(),
                (-self.absorption.y * dist_in_volume).exp(),
                (-self.absorption.z * dist_in_volume).exp(),
            );
        }

        let refracted = ray_direction.refract(hr.normal, n1 / n2);

        let mut do_reflection = true;
        if refracted.dot(refracted) > 0.0 {
            let cos_incident = (-ray_direction).dot(hr.normal);
            let cos_transmitted = -refracted.dot(hr.normal);
            let fresnel = fresnel_unpolarized(cos_incident, cos_transmitted, n1, n2);
            do_reflection = sampler.uniform01() < fresnel;
        }

        let direction = if do_reflection {
            ray_direction.reflect(hr.normal).normalized()
        } else {
            refracted.normalized()
        };
        ScatterRecord::Specular { direction, attenuation }
    }
}
