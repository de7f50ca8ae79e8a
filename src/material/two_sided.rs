use crate::hit::{HitRecord, ScatterRecord};
use crate::math::{Color, Vec3};
use crate::sampler::Sampler;
use crate::texture::Texture;

use super::Material;

/// Wraps two materials, one per side of the surface. A back hit is
/// presented to `back` as a front hit (the geometric normal already faces
/// the incoming ray), letting e.g. a light emit only from its interior
/// while the exterior behaves like an ordinary diffuse shell.
#[derive(Debug, Clone)]
pub struct TwoSided {
    pub front: u32,
    pub back: u32,
}

impl TwoSided {
    pub fn le(&self, hr: &HitRecord, materials: &[Material]) -> Color {
        if hr.backside {
            materials[self.back as usize].le(&hr.as_front_facing(), materials)
        } else {
            materials[self.front as usize].le(hr, materials)
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn scatter(
        &self,
        ray_direction: Vec3,
        ray_time: f64,
        hr: &HitRecord,
        sampler: &mut Sampler,
        textures: &[Texture],
        materials: &[Material],
    ) -> ScatterRecord {
        if hr.backside {
            materials[self.back as usize].scatter(
                ray_direction,
                ray_time,
                &hr.as_front_facing(),
                sampler,
                textures,
                materials,
            )
        } else {
            materials[self.front as usize].scatter(ray_direction, ray_time, hr, sampler, textures, materials)
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn scatter_to_direction(
        &self,
        ray_direction: Vec3,
        ray_time: f64,
        hr: &HitRecord,
        direction: Vec3,
        textures: &[Texture],
        materials: &[Material],
    ) -> ScatterRecord {
        if hr.backside {
            materials[self.back as usize].scatter_to_direction(
                ray_direction,
                ray_time,
                &hr.as_front_facing(),
                direction,
                textures,
                materials,
            )
        } else {
            materials[self.front as usize]
                .scatter_to_direction(ray_direction, ray_time, hr, direction, textures, materials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::light::Light;
    use crate::math::{Point3, Vec2};

    fn hr(backside: bool) -> HitRecord {
        HitRecord {
            t: 1.0,
            position: Point3::zero(),
            normal: Vec3::unit_y(),
            uv: Vec2::zero(),
            tangent: Vec3::unit_x(),
            backside,
            surface_index: 0,
            material_index: 0,
        }
    }

    #[test]
    fn emits_from_back_material_on_backside_hit() {
        let materials = vec![
            Material::Light(Light { color: Color::zero() }),
            Material::Light(Light { color: Vec3::new(2.0, 2.0, 2.0) }),
        ];
        let two_sided = TwoSided { front: 0, back: 1 };
        assert_eq!(two_sided.le(&hr(true), &materials), Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(two_sided.le(&hr(false), &materials), Vec3::zero());
    }
}
