//! Deterministic per-pixel PRNG and the canonical direction/area warps used
//! by materials and area-light sampling.
//!
//! The original source seeds a 64-bit Mersenne Twister with `pixel + 42`;
//! we substitute `rand`'s `SmallRng` (already used throughout this crate)
//! seeded the same way. Only the statistical properties of the generator
//! matter for image quality — the seed scheme is what keeps renders
//! reproducible across thread counts.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

use crate::math::{Vec2, Vec3};

/// Per-pixel sample stream. Construct once per pixel with
/// `Sampler::for_pixel(index)` so renders are bit-reproducible regardless of
/// how pixels are scheduled across worker threads.
pub struct Sampler {
    rng: SmallRng,
}

impl Sampler {
    pub fn for_pixel(pixel_index: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(pixel_index + 42),
        }
    }

    #[inline]
    pub fn uniform01(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Uniformly distributed direction over the full sphere.
pub fn uniform_on_sphere(u0: f64, u1: f64) -> Vec3 {
    let z = 1.0 - 2.0 * u0;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u1;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Uniformly distributed direction over the hemisphere around +z.
pub fn uniform_on_hemisphere(u0: f64, u1: f64) -> Vec3 {
    let z = u0;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u1;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Shirley's concentric-disk mapping from the unit square to the unit disk.
pub fn uniform_in_disk(u0: f64, u1: f64) -> Vec2 {
    let ox = 2.0 * u0 - 1.0;
    let oy = 2.0 * u1 - 1.0;
    if ox == 0.0 && oy == 0.0 {
        return Vec2::zero();
    }
    let (r, theta) = if ox.abs() > oy.abs() {
        (ox, PI / 4.0 * (oy / ox))
    } else {
        (oy, 0.5 * PI - PI / 4.0 * (ox / oy))
    };
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Cosine-weighted direction over the hemisphere around +z: the optimal
/// importance-sampling strategy for a Lambertian BRDF.
pub fn cosine_weighted_on_hemisphere(u0: f64, u1: f64) -> Vec3 {
    let d = uniform_in_disk(u0, u1);
    let z = (1.0 - d.x * d.x - d.y * d.y).max(0.0).sqrt();
    Vec3::new(d.x, d.y, z)
}

/// Phong-lobe-weighted direction around +z with shininess exponent `s`.
pub fn phong_weighted_on_hemisphere(s: f64, u0: f64, u1: f64) -> Vec3 {
    let cos_theta = (1.0 - u0).powf(1.0 / (s + 1.0));
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * PI * u1;
    Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, cos_theta)
}

/// Direction uniformly distributed within the cone of half-angle
/// `acos(cos_theta_max)` around +z — used for sampling a sphere's subtended
/// solid angle from an exterior point.
pub fn uniform_towards_sphere(cos_theta_max: f64, u0: f64, u1: f64) -> Vec3 {
    let cos_theta = (1.0 - u0) + u0 * cos_theta_max;
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * PI * u1;
    Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, cos_theta)
}

/// Uniform barycentric coordinates (b0, b1, b2) over a triangle.
pub fn uniform_in_triangle(u0: f64, u1: f64) -> (f64, f64, f64) {
    let su0 = u0.sqrt();
    let b0 = 1.0 - su0;
    let b1 = u1 * su0;
    (b0, b1, 1.0 - b0 - b1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_weighted_hemisphere_integrates_cos_over_pi_to_one() {
        let mut sampler = Sampler::for_pixel(7);
        let n = 200_000u32;
        let mut sum = 0.0;
        for _ in 0..n {
            let u0 = sampler.uniform01();
            let u1 = sampler.uniform01();
            let d = cosine_weighted_on_hemisphere(u0, u1);
            // pdf = cos(theta)/pi, integrand cos(theta) -> estimator of
            // integral(cos/pi) is just 1 by importance-sampling construction,
            // but we instead verify against the directly-measurable cos(theta) mean.
            sum += d.z;
        }
        let mean_cos = sum / n as f64;
        // E[cos(theta)] under a cosine-weighted distribution is 2/3.
        assert!((mean_cos - 2.0 / 3.0).abs() < 0.02, "mean cos = {mean_cos}");
    }

    #[test]
    fn uniform_on_sphere_directions_are_unit_length() {
        let mut sampler = Sampler::for_pixel(1);
        for _ in 0..1000 {
            let u0 = sampler.uniform01();
            let u1 = sampler.uniform01();
            let d = uniform_on_sphere(u0, u1);
            assert!((d.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn uniform_in_disk_stays_within_unit_circle() {
        let mut sampler = Sampler::for_pixel(3);
        for _ in 0..10_000 {
            let u0 = sampler.uniform01();
            let u1 = sampler.uniform01();
            let p = uniform_in_disk(u0, u1);
            assert!(p.x * p.x + p.y * p.y <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn same_pixel_index_reproduces_identical_stream() {
        let mut a = Sampler::for_pixel(1234);
        let mut b = Sampler::for_pixel(1234);
        for _ in 0..16 {
            assert_eq!(a.uniform01(), b.uniform01());
        }
    }
}
