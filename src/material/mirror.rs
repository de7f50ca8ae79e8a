use crate::hit::{HitRecord, ScatterRecord};
use crate::math::Vec3;
use crate::texture::Texture;

/// A perfect specular reflector, tinted by `color`.
#[derive(Debug, Clone)]
pub struct Mirror {
    pub color: u32,
}

impl Mirror {
    pub fn scatter(&self, ray_direction: Vec3, ray_time: f64, hr: &HitRecord, textures: &[Texture]) -> ScatterRecord {
        if hr.backside {
            return ScatterRecord::None;
        }
        let direction = ray_direction.reflect(hr.normal).normalized();
        let attenuation = textures[self.color as usize].value(hr.uv, ray_time, textures);
        ScatterRecord::Specular { direction, attenuation }
    }
}
