//! BSDF abstraction. Materials are resolved through the scene's material
//! arena (by index) rather than boxed trait objects, so `TwoSided` can
//! recurse into its two child materials without indirection on the hot
//! path, mirroring how [`crate::texture::Texture`] resolves child textures.

pub mod glass;
pub mod lambertian;
pub mod light;
pub mod mirror;
pub mod phong;
pub mod two_sided;

pub use glass::Glass;
pub use lambertian::Lambertian;
pub use light::Light;
pub use mirror::Mirror;
pub use phong::Phong;
pub use two_sided::TwoSided;

use crate::hit::{HitRecord, ScatterRecord};
use crate::math::{Color, Vec3};
use crate::sampler::Sampler;
use crate::texture::Texture;

#[derive(Debug, Clone)]
pub enum Material {
    Lambertian(Lambertian),
    Phong(Phong),
    Mirror(Mirror),
    Glass(Glass),
    Light(Light),
    TwoSided(TwoSided),
}

impl Material {
    /// Emitted radiance towards `-w_out` (the direction the ray arrived
    /// from). Zero for every non-emissive variant.
    pub fn le(&self, hr: &HitRecord, materials: &[Material]) -> Color {
        match self {
            Material::Light(m) => m.le(hr),
            Material::TwoSided(m) => m.le(hr, materials),
            _ => Color::zero(),
        }
    }

    pub fn scatter(
        &self,
        ray_direction: Vec3,
        ray_time: f64,
        hr: &HitRecord,
        sampler: &mut Sampler,
        textures: &[Texture],
        materials: &[Material],
    ) -> ScatterRecord {
        match self {
            Material::Lambertian(m) => m.scatter(hr, ray_time, sampler, textures),
            Material::Phong(m) => m.scatter(ray_direction, ray_time, hr, sampler, textures),
            Material::Mirror(m) => m.scatter(ray_direction, ray_time, hr, textures),
            Material::Glass(m) => m.scatter(ray_direction, hr, sampler),
            Material::Light(m) => m.scatter(),
            Material::TwoSided(m) => m.scatter(ray_direction, ray_time, hr, sampler, textures, materials),
        }
    }

    /// Forced-direction variant used by the integrator's MIS next-event
    /// estimation: evaluate the BSDF and its pdf towards an externally
    /// chosen `direction` (e.g. one sampled from a light surface), rather
    /// than sampling a direction from the BSDF itself. Specular materials
    /// have zero support off their single deterministic direction, so they
    /// are not called this way by the integrator (it only invokes this for
    /// `ScatterRecord::Random` segments).
    pub fn scatter_to_direction(
        &self,
        ray_direction: Vec3,
        ray_time: f64,
        hr: &HitRecord,
        direction: Vec3,
        textures: &[Texture],
        materials: &[Material],
    ) -> ScatterRecord {
        match self {
            Material::Lambertian(m) => m.scatter_to_direction(hr, direction, ray_time, textures),
            Material::Phong(m) => m.scatter_to_direction(ray_direction, ray_time, hr, direction, textures),
            Material::Mirror(_) | Material::Glass(_) => ScatterRecord::None,
            Material::Light(_) => ScatterRecord::None,
            Material::TwoSided(m) => {
                m.scatter_to_direction(ray_direction, ray_time, hr, direction, textures, materials)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vec2};

    #[test]
    fn light_emits_and_never_scatters_through_the_enum() {
        let materials = vec![Material::Light(Light { color: Vec3::new(1.0, 1.0, 1.0) })];
        let hr = HitRecord {
            t: 1.0,
            position: Point3::zero(),
            normal: Vec3::unit_y(),
            uv: Vec2::zero(),
            tangent: Vec3::unit_x(),
            backside: false,
            surface_index: 0,
            material_index: 0,
        };
        assert_eq!(materials[0].le(&hr, &materials), Vec3::ones());
        let textures = vec![Texture::Constant(Color::zero())];
        let mut sampler = Sampler::for_pixel(0);
        assert!(materials[0]
            .scatter(Vec3::unit_z(), 0.0, &hr, &mut sampler, &textures, &materials)
            .is_none());
    }
}
