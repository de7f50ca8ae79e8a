//! Texture lookups, resolved through the scene's texture arena so textures
//! can reference each other by index (checker-of-checkers, transformed
//! checkers, and so on) without boxed trait objects.

use crate::math::{Color, Vec2};

#[derive(Debug, Clone)]
pub enum Texture {
    Constant(Color),
    /// An (n, m)-tiled checkerboard alternating between two child textures.
    Checker { t0: u32, t1: u32, n: i32, m: i32 },
    /// Remaps incoming texture coordinates: `child.value(uv * factor + offset)`.
    Transformer { texture: u32, factor: Vec2, offset: Vec2 },
    /// A baked-in RGB image, sampled with bilinear filtering and wrapping
    /// UVs. Built in-process (no file decoding) from an explicit pixel
    /// buffer — see `Image::from_checker_pattern` and friends in demos.
    Image(Image),
}

#[derive(Debug, Clone)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl Image {
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> Self {
        assert_eq!(pixels.len(), (width * height) as usize);
        Self { width, height, pixels }
    }

    fn texel(&self, x: i64, y: i64) -> Color {
        let w = self.width as i64;
        let h = self.height as i64;
        let wrap = |v: i64, n: i64| ((v % n) + n) % n;
        self.pixels[(wrap(y, h) * w + wrap(x, w)) as usize]
    }

    fn sample(&self, uv: Vec2) -> Color {
        let fx = uv.x * self.width as f64 - 0.5;
        let fy = uv.y * self.height as f64 - 0.5;
        let x0 = fx.floor() as i64;
        let y0 = fy.floor() as i64;
        let tx = fx - x0 as f64;
        let ty = fy - y0 as f64;
        let c00 = self.texel(x0, y0);
        let c10 = self.texel(x0 + 1, y0);
        let c01 = self.texel(x0, y0 + 1);
        let c11 = self.texel(x0 + 1, y0 + 1);
        let c0 = c00.lerp(c10, tx);
        let c1 = c01.lerp(c11, tx);
        c0.lerp(c1, ty)
    }
}

impl Texture {
    /// Evaluate this texture, resolving child-texture references through
    /// `textures`. `time` is accepted (and ignored by every current
    /// variant) so animated textures can be added without changing the
    /// call sites in materials.
    pub fn value(&self, uv: Vec2, time: f64, textures: &[Texture]) -> Color {
        match self {
            Texture::Constant(c) => *c,
            Texture::Checker { t0, t1, n, m } => {
                let col = (uv.x * *n as f64).floor() as i64;
                let row = (uv.y * *m as f64).floor() as i64;
                let idx = if row.rem_euclid(2) == col.rem_euclid(2) { *t0 } else { *t1 };
                textures[idx as usize].value(uv, time, textures)
            }
            Texture::Transformer { texture, factor, offset } => {
                let remapped = Vec2::new(uv.x * factor.x + offset.x, uv.y * factor.y + offset.y);
                textures[*texture as usize].value(remapped, time, textures)
            }
            Texture::Image(image) => image.sample(uv),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    #[test]
    fn checker_alternates_with_parity() {
        let textures = vec![
            Texture::Constant(Vec3::new(1.0, 1.0, 1.0)),
            Texture::Constant(Vec3::zero()),
            Texture::Checker { t0: 0, t1: 1, n: 2, m: 2 },
        ];
        let white = textures[2].value(Vec2::new(0.1, 0.1), 0.0, &textures);
        let black = textures[2].value(Vec2::new(0.6, 0.1), 0.0, &textures);
        assert_eq!(white, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(black, Vec3::zero());
    }

    #[test]
    fn constant_texture_ignores_uv() {
        let textures = vec![Texture::Constant(Vec3::new(0.2, 0.3, 0.4))];
        assert_eq!(
            textures[0].value(Vec2::new(0.0, 0.0), 0.0, &textures),
            textures[0].value(Vec2::new(0.9, 0.9), 0.0, &textures)
        );
    }
}
