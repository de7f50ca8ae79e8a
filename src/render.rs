//! Per-pixel stratified parallel driver. Mirrors `renderer.rs`'s
//! `Framebuffer`/`RenderStats`/`ProgressBar` trio, but drives the pixel loop
//! with `rayon` instead of a single sequential scan, and accumulates
//! [`crate::integrator::path_sample`] samples instead of a recursive tracer.

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use rayon::prelude::*;

use crate::camera::Camera;
use crate::error::RenderError;
use crate::integrator::{path_sample, IntegratorParams};
use crate::math::{Color, Vec2};
use crate::sampler::Sampler;
use crate::scene::Scene;

#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Stratified grid resolution per pixel; total samples per pixel is
    /// `sqrt_spp * sqrt_spp`.
    pub sqrt_spp: u32,
    pub integrator: IntegratorParams,
}

/// A flat `width * height` RGB32F image, linear radiance (no tone mapping
/// applied — that is a downstream concern per the scope boundary).
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl Framebuffer {
    fn new(width: u32, height: u32) -> Self {
        Self { width, height, pixels: vec![Color::zero(); (width * height) as usize] }
    }

    /// Write as 8-bit PPM (`P6`), gamma-corrected and saturated, rows
    /// flipped so row 0 of the file is the top of the image.
    pub fn write_ppm(&self, path: &str) -> Result<(), RenderError> {
        let mut file = std::fs::File::create(path).map_err(|source| RenderError::Io { path: path.to_string(), source })?;
        let header = format!("P6\n{} {}\n255\n", self.width, self.height);
        file.write_all(header.as_bytes()).map_err(|source| RenderError::Io { path: path.to_string(), source })?;
        let mut buf = Vec::with_capacity((self.width * self.height * 3) as usize);
        for y in 0..self.height {
            let row = self.height - 1 - y;
            for x in 0..self.width {
                let (r, g, b) = self.pixels[(row * self.width + x) as usize].gamma_correct().to_rgb8();
                buf.extend_from_slice(&[r, g, b]);
            }
        }
        file.write_all(&buf).map_err(|source| RenderError::Io { path: path.to_string(), source })
    }

    /// Write as floating-point HDR (`PF`), raw little-endian RGB triples,
    /// rows written bottom-to-top per the `PF` convention (negative scale
    /// signals little-endian).
    pub fn write_pfm(&self, path: &str) -> Result<(), RenderError> {
        let mut file = std::fs::File::create(path).map_err(|source| RenderError::Io { path: path.to_string(), source })?;
        let header = format!("PF\n{} {}\n-1.0\n", self.width, self.height);
        file.write_all(header.as_bytes()).map_err(|source| RenderError::Io { path: path.to_string(), source })?;
        let mut buf = Vec::with_capacity((self.width * self.height * 3 * 4) as usize);
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let c = self.pixels[(y * self.width + x) as usize];
                for component in [c.x, c.y, c.z] {
                    buf.extend_from_slice(&(component as f32).to_le_bytes());
                }
            }
        }
        file.write_all(&buf).map_err(|source| RenderError::Io { path: path.to_string(), source })
    }
}

/// Render every pixel of `config`'s resolution against `scene` and `camera`,
/// one independent [`Sampler`] per pixel seeded `pixel_index + 42` so the
/// image is bit-reproducible regardless of how `rayon` schedules work.
pub fn render_image(scene: &Scene, camera: &Camera, config: &RenderConfig) -> Framebuffer {
    let mut framebuffer = Framebuffer::new(config.width, config.height);
    let n = config.sqrt_spp;
    let inv_n2 = 1.0 / (n * n) as f64;

    let start = Instant::now();
    log::info!("render start: {}x{}, sqrt_spp={}", config.width, config.height, n);

    let completed = AtomicU64::new(0);
    let total_pixels = (config.width * config.height) as u64;

    framebuffer
        .pixels
        .par_iter_mut()
        .enumerate()
        .for_each(|(index, pixel)| {
            let x = index as u32 % config.width;
            let y = index as u32 / config.width;
            let mut sampler = Sampler::for_pixel(index as u64);

            let mut accum = Color::zero();
            for u in 0..n {
                for v in 0..n {
                    let sp = (u as f64 + sampler.uniform01()) / n as f64;
                    let sq = (v as f64 + sampler.uniform01()) / n as f64;
                    let (p, q) = Camera::pixel_coords(x, y, config.width, config.height, Vec2::new(sp, sq));
                    let ray = camera.get_ray(p, q, &mut sampler);
                    accum += path_sample(ray, scene, &mut sampler, &config.integrator);
                }
            }
            *pixel = accum * inv_n2;

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % (total_pixels / 20).max(1) == 0 {
                eprint!("\rrendering... {:>5.1}%", 100.0 * done as f64 / total_pixels as f64);
                let _ = std::io::stderr().flush();
            }
        });

    eprintln!("\rrendering... 100.0%  ");
    log::info!("render done in {:.2}s", start.elapsed().as_secs_f64());
    framebuffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraConfig;
    use crate::material::{Lambertian, Light, Material};
    use crate::math::{Point3, Vec3};
    use crate::surface::Sphere;
    use crate::texture::Texture;

    fn tiny_scene() -> Scene {
        let mut scene = Scene::new();
        let white = scene.add_texture(Texture::Constant(Vec3::ones()));
        let mat = scene.add_material(Material::Lambertian(Lambertian { albedo: white }));
        scene.add_surface(Sphere::new(Point3::new(0.0, 0.0, -2.0), 0.5, mat).into());
        let emissive = scene.add_material(Material::Light(Light { color: Vec3::ones() }));
        let light = scene.add_surface(Sphere::new(Point3::new(2.0, 2.0, 0.0), 0.3, emissive).into());
        scene.add_light(light);
        scene.build_bvh(0.0, 1.0).unwrap();
        scene
    }

    #[test]
    fn render_image_produces_no_nan_pixels() {
        let scene = tiny_scene();
        let camera = Camera::new(CameraConfig { vfov_degrees: 40.0, aspect: 1.0, ..Default::default() });
        let config = RenderConfig { width: 8, height: 8, sqrt_spp: 2, integrator: IntegratorParams::default() };
        let framebuffer = render_image(&scene, &camera, &config);
        for pixel in &framebuffer.pixels {
            assert!(pixel.x.is_finite() && pixel.y.is_finite() && pixel.z.is_finite());
        }
    }

    #[test]
    fn same_scene_renders_identically_regardless_of_thread_count() {
        let scene = tiny_scene();
        let camera = Camera::new(CameraConfig { vfov_degrees: 40.0, aspect: 1.0, ..Default::default() });
        let config = RenderConfig { width: 4, height: 4, sqrt_spp: 2, integrator: IntegratorParams::default() };
        let a = render_image(&scene, &camera, &config);
        let b = render_image(&scene, &camera, &config);
        for (pa, pb) in a.pixels.iter().zip(b.pixels.iter()) {
            assert_eq!(pa, pb);
        }
    }
}
