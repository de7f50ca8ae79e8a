//! Background radiance for rays that escape the scene.

use std::f64::consts::PI;

use crate::math::{Color, Vec2, Vec3};
use crate::texture::Texture;

#[derive(Debug, Clone)]
pub enum EnvMap {
    /// A single equirectangular panorama, indexed by (v = elevation, u = azimuth).
    Equirect { map: u32 },
    /// Six independent textures, one per cube face, indexed +x/-x/+y/-y/+z/-z.
    Cube { faces: [u32; 6] },
}

impl EnvMap {
    pub fn value(&self, direction: Vec3, time: f64, textures: &[Texture]) -> Color {
        match self {
            EnvMap::Equirect { map } => {
                let theta = direction.y.clamp(-1.0, 1.0).asin();
                let phi = (-direction.x).atan2(direction.z);
                let u = phi / (2.0 * PI);
                let v = theta / PI + 0.5;
                textures[*map as usize].value(Vec2::new(u, v), time, textures)
            }
            EnvMap::Cube { faces } => {
                let (face, uv) = cube_face_and_uv(direction);
                textures[faces[face] as usize].value(uv, time, textures)
            }
        }
    }
}

fn cube_face_and_uv(direction: Vec3) -> (usize, Vec2) {
    let ax = direction.x.abs();
    let ay = direction.y.abs();
    let az = direction.z.abs();
    if ax > ay && ax > az {
        let u = 0.5 * (direction.z / -direction.x + 1.0);
        let v = 0.5 * (direction.y / ax + 1.0);
        (if direction.x < 0.0 { 1 } else { 0 }, Vec2::new(u, v))
    } else if ay > az {
        let u = 0.5 * (direction.x / ay + 1.0);
        let v = 0.5 * (direction.z / -direction.y + 1.0);
        (if direction.y < 0.0 { 3 } else { 2 }, Vec2::new(u, v))
    } else {
        let u = 0.5 * (direction.x / direction.z + 1.0);
        let v = 0.5 * (direction.y / az + 1.0);
        (if direction.z < 0.0 { 5 } else { 4 }, Vec2::new(u, v))
    }
}
