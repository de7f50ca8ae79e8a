//! Pinhole + thin-lens + motion-blur ray generation.
//!
//! Image-plane point `P = (mix(l,r,p), mix(b,t,q), -1)` sits on the frustum
//! derived from vertical fov and aspect ratio; a nonzero aperture samples a
//! point on the lens disk and refocuses through `focus_distance`, exactly as
//! `camera.rs`'s thin-lens `Camera` does it — only the frustum/origin
//! convention changes (frustum anchored at the origin looking down -z,
//! rather than a precomputed lower-left-corner basis).

use crate::animation::Animation;
use crate::math::{mix, Point3, Ray, Vec2, Vec3};
use crate::sampler::{uniform_in_disk, Sampler};

#[derive(Debug, Clone)]
pub struct Camera {
    left: f64,
    right: f64,
    bottom: f64,
    top: f64,
    lens_radius: f64,
    focus_distance: f64,
    t0: f64,
    t1: f64,
    animation: Option<Animation>,
}

/// Construction parameters for a [`Camera`]. Mirrors the builder-style
/// `CameraConfig` pattern: a flat struct of named tunables, defaulted where
/// the base renderer defaults them, consumed once by `Camera::new`.
#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    pub vfov_degrees: f64,
    pub aspect: f64,
    pub aperture: f64,
    pub focus_distance: f64,
    pub shutter_open: f64,
    pub shutter_close: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            vfov_degrees: 40.0,
            aspect: 16.0 / 9.0,
            aperture: 0.0,
            focus_distance: 1.0,
            shutter_open: 0.0,
            shutter_close: 0.0,
        }
    }
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        let theta = config.vfov_degrees.to_radians();
        let t = (theta * 0.5).tan();
        let b = -t;
        let r = t * config.aspect;
        let l = -r;
        Self {
            left: l,
            right: r,
            bottom: b,
            top: t,
            lens_radius: config.aperture * 0.5,
            focus_distance: config.focus_distance,
            t0: config.shutter_open,
            t1: config.shutter_close,
            animation: None,
        }
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    /// Generate a ray for image-plane coordinates `(p, q) ∈ [0,1]²`.
    pub fn get_ray(&self, p: f64, q: f64, sampler: &mut Sampler) -> Ray {
        let mut point = Vec3::new(mix(self.left, self.right, p), mix(self.bottom, self.top, q), -1.0);
        let mut origin = Point3::zero();

        if self.lens_radius > 0.0 {
            point *= self.focus_distance;
            let u0 = sampler.uniform01();
            let u1 = sampler.uniform01();
            let lens = uniform_in_disk(u0, u1) * self.lens_radius;
            origin = Point3::new(lens.x, lens.y, 0.0);
        }

        let mut direction = point - origin;
        let time = mix(self.t0, self.t1, sampler.uniform01());

        if let Some(animation) = &self.animation {
            let pose = animation.at(time);
            origin = pose.translation + pose.rotation.rotate(origin);
            direction = pose.rotation.rotate(direction);
        }

        Ray::new(origin, direction.normalized(), time)
    }

    /// Image-plane coordinates for pixel `(x, y)` of a `width × height`
    /// image, with the stratified sub-pixel offset `(sp, sq) ∈ [0,1)²`
    /// already applied by the caller.
    pub fn pixel_coords(x: u32, y: u32, width: u32, height: u32, offset: Vec2) -> (f64, f64) {
        let p = (x as f64 + offset.x) / width as f64;
        let q = (y as f64 + offset.y) / height as f64;
        (p, q)
    }
}
