//! Scene ownership: every entity lives in a flat arena and refers to its
//! dependencies by `u32` index rather than a pointer or trait object, so the
//! hot path (BVH traversal, material/texture lookup) never allocates and
//! never pays for dynamic dispatch.

use crate::animation::Animation;
use crate::bvh::Bvh;
use crate::envmap::EnvMap;
use crate::error::RenderError;
use crate::hit::HitRecord;
use crate::material::Material;
use crate::math::Ray;
use crate::surface::Surface;
use crate::texture::Texture;

/// A fully assembled scene: the entity arenas, the list of surfaces treated
/// as light sources for next-event estimation, an optional background, and
/// the BVH built over the surface arena. Built once per render and shared
/// read-only across worker threads.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub animations: Vec<Animation>,
    pub textures: Vec<Texture>,
    pub materials: Vec<Material>,
    pub surfaces: Vec<Surface>,
    /// Indices into `surfaces` that are sampled directly for next-event
    /// estimation. A surface can emit light without appearing here (it will
    /// simply never be explicitly sampled, only hit by chance).
    pub lights: Vec<u32>,
    pub env_map: Option<EnvMap>,
    bvh: Option<Bvh>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_texture(&mut self, texture: Texture) -> u32 {
        self.textures.push(texture);
        (self.textures.len() - 1) as u32
    }

    pub fn add_material(&mut self, material: Material) -> u32 {
        self.materials.push(material);
        (self.materials.len() - 1) as u32
    }

    pub fn add_animation(&mut self, animation: Animation) -> u32 {
        self.animations.push(animation);
        (self.animations.len() - 1) as u32
    }

    pub fn add_surface(&mut self, surface: Surface) -> u32 {
        self.surfaces.push(surface);
        (self.surfaces.len() - 1) as u32
    }

    /// Register an already-added surface as a light, sampled directly
    /// during next-event estimation.
    pub fn add_light(&mut self, surface_index: u32) {
        self.lights.push(surface_index);
    }

    pub fn set_env_map(&mut self, env_map: EnvMap) {
        self.env_map = Some(env_map);
    }

    /// Build the acceleration structure over every surface in the scene,
    /// using each surface's bound over the closed shutter window `[t0, t1]`.
    /// Must be called once before [`Scene::hit`].
    pub fn build_bvh(&mut self, t0: f64, t1: f64) -> Result<(), RenderError> {
        self.bvh = Some(Bvh::build(&self.surfaces, t0, t1)?);
        Ok(())
    }

    /// Closest intersection of `ray` against the scene's BVH within
    /// `[a_min, a_max]`. Panics (via `Option::unwrap` on the BVH field) if
    /// called before [`Scene::build_bvh`] — a programmer error, not a
    /// recoverable one.
    pub fn hit(&self, ray: &Ray, a_min: f64, a_max: f64) -> Option<HitRecord> {
        self.bvh
            .as_ref()
            .expect("Scene::build_bvh must run before Scene::hit")
            .hit(ray, a_min, a_max, &self.surfaces)
    }

    /// Background radiance for a ray that escapes every surface.
    pub fn background(&self, ray: &Ray) -> crate::math::Color {
        match &self.env_map {
            Some(env) => env.value(ray.direction.normalized(), ray.time, &self.textures),
            None => crate::math::Color::zero(),
        }
    }
}
