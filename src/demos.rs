//! Built-in scene presets, in the spirit of `presets.rs`'s
//! `SceneDescription`/`ScenePreset` pair — except scenes are built directly
//! against the arena-owned [`Scene`] rather than a `Vec<Box<dyn Hittable>>`,
//! and each preset also carries the camera and the suggested render
//! resolution/sample count for it.

use crate::camera::{Camera, CameraConfig};
use crate::envmap::EnvMap;
use crate::material::{Glass, Lambertian, Light, Material, Mirror, TwoSided};
use crate::math::{Point3, Transformation, Vec3};
use crate::mesh::Mesh;
use crate::render::RenderConfig;
use crate::scene::Scene;
use crate::texture::Texture;

pub struct DemoScene {
    pub name: &'static str,
    pub scene: Scene,
    pub camera_config: CameraConfig,
    pub eye: Point3,
    pub target: Point3,
    pub up: Vec3,
    pub render: RenderConfig,
}

impl DemoScene {
    /// Build a [`Camera`] from this preset's placement and `config`, letting
    /// a caller override `vfov_degrees`/`aspect`/`aperture`/`focus_distance`
    /// without touching the preset's eye/target/up.
    pub fn camera_with(&self, config: CameraConfig) -> Camera {
        Camera::new(config)
            .with_animation(crate::animation::Animation::Constant(Transformation::look_at(
                self.eye, self.target, self.up,
            )))
    }

    pub fn camera(&self) -> Camera {
        self.camera_with(self.camera_config)
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ScenePreset {
    /// A Lambertian sphere inside a uniformly emitting shell: every visible
    /// pixel should converge to the shell's radiance (energy conservation).
    Furnace,
    /// A small Cornell box: red/green side walls, a ceiling light panel,
    /// color bleed onto the floor.
    Cornell,
    /// A glass sphere over a Lambertian floor, producing a focused caustic.
    GlassCaustic,
    /// Two facing mirrors with a diffuse ball between them.
    MirrorHall,
    /// A sphere sweeping linearly across the frame over the open shutter.
    MotionBlur,
}

impl ScenePreset {
    pub fn build(self) -> DemoScene {
        match self {
            ScenePreset::Furnace => build_furnace(),
            ScenePreset::Cornell => build_cornell(),
            ScenePreset::GlassCaustic => build_glass_caustic(),
            ScenePreset::MirrorHall => build_mirror_hall(),
            ScenePreset::MotionBlur => build_motion_blur(),
        }
    }
}

fn default_render(width: u32, height: u32, sqrt_spp: u32) -> RenderConfig {
    RenderConfig { width, height, sqrt_spp, integrator: Default::default() }
}

/// S1 furnace test: a Lambertian sphere (albedo 1) inside a huge emissive
/// shell. `TwoSided` wraps a non-emitting outward face and an emitting
/// inward face so the shell radiates only into its own interior.
fn build_furnace() -> DemoScene {
    let mut scene = Scene::new();

    let white = scene.add_texture(Texture::Constant(Vec3::ones()));
    let lambertian = scene.add_material(Material::Lambertian(Lambertian { albedo: white }));
    scene.add_surface(crate::surface::Sphere::new(Point3::zero(), 0.5, lambertian).into());

    let dark = scene.add_material(Material::Light(Light { color: Vec3::zero() }));
    let bright = scene.add_material(Material::Light(Light { color: Vec3::ones() }));
    let shell = scene.add_material(Material::TwoSided(TwoSided { front: dark, back: bright }));
    let shell_surface = scene.add_surface(crate::surface::Sphere::new(Point3::zero(), 2000.0, shell).into());
    scene.add_light(shell_surface);

    scene.build_bvh(0.0, 1.0).unwrap();

    DemoScene {
        name: "furnace",
        scene,
        camera_config: CameraConfig { vfov_degrees: 30.0, aspect: 1.0, ..Default::default() },
        eye: Point3::new(0.0, 0.0, 3.0),
        target: Point3::zero(),
        up: Vec3::unit_y(),
        render: default_render(256, 256, 16),
    }
}

/// A rectangular quad light/wall built from two triangles sharing a plane,
/// matching `Quad::new(corner, u, v, ...)` from the base crate's scene
/// builder but fanned out into [`crate::surface::Triangle`]s via [`Mesh`].
fn quad_triangles(corner: Point3, u: Vec3, v: Vec3, material: u32) -> Vec<crate::surface::Triangle> {
    let p0 = corner;
    let p1 = corner + u;
    let p2 = corner + u + v;
    let p3 = corner + v;
    let mesh = Mesh::new(vec![p0, p1, p2, p3], vec![[0, 1, 2], [0, 2, 3]]);
    mesh.triangles(material, None)
}

/// S2 Cornell box: red/green side walls around a white box, a bright
/// ceiling panel as the only light source.
fn build_cornell() -> DemoScene {
    let mut scene = Scene::new();

    let white = scene.add_texture(Texture::Constant(Vec3::new(0.73, 0.73, 0.73)));
    let red = scene.add_texture(Texture::Constant(Vec3::new(0.65, 0.05, 0.05)));
    let green = scene.add_texture(Texture::Constant(Vec3::new(0.12, 0.45, 0.15)));

    let white_mat = scene.add_material(Material::Lambertian(Lambertian { albedo: white }));
    let red_mat = scene.add_material(Material::Lambertian(Lambertian { albedo: red }));
    let green_mat = scene.add_material(Material::Lambertian(Lambertian { albedo: green }));

    for tri in quad_triangles(Point3::new(-2.0, 0.0, -4.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 4.0), white_mat) {
        scene.add_surface(tri.into());
    }
    for tri in quad_triangles(Point3::new(-2.0, 4.0, -4.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 4.0), white_mat) {
        scene.add_surface(tri.into());
    }
    for tri in quad_triangles(Point3::new(-2.0, 0.0, -4.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 4.0, 0.0), white_mat) {
        scene.add_surface(tri.into());
    }
    for tri in quad_triangles(Point3::new(-2.0, 0.0, -4.0), Vec3::new(0.0, 0.0, 4.0), Vec3::new(0.0, 4.0, 0.0), red_mat) {
        scene.add_surface(tri.into());
    }
    for tri in quad_triangles(Point3::new(2.0, 0.0, -4.0), Vec3::new(0.0, 0.0, 4.0), Vec3::new(0.0, 4.0, 0.0), green_mat) {
        scene.add_surface(tri.into());
    }

    let light_mat = scene.add_material(Material::Light(Light { color: Vec3::new(1.0, 0.95, 0.85) * 15.0 }));
    for tri in quad_triangles(Point3::new(-0.5, 3.99, -2.5), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), light_mat) {
        let surface = scene.add_surface(tri.into());
        scene.add_light(surface);
    }

    scene.build_bvh(0.0, 1.0).unwrap();

    DemoScene {
        name: "cornell",
        scene,
        camera_config: CameraConfig { vfov_degrees: 50.0, aspect: 1.0, ..Default::default() },
        eye: Point3::new(0.0, 1.0, 3.2),
        target: Point3::new(0.0, 1.0, -1.0),
        up: Vec3::unit_y(),
        render: default_render(256, 256, 16),
    }
}

/// S3 glass caustic: a glass sphere above a Lambertian floor, lit by an
/// overhead light, focusing a bright disc onto the floor.
fn build_glass_caustic() -> DemoScene {
    let mut scene = Scene::new();

    let floor_albedo = scene.add_texture(Texture::Constant(Vec3::new(0.6, 0.6, 0.6)));
    let floor_mat = scene.add_material(Material::Lambertian(Lambertian { albedo: floor_albedo }));
    for tri in quad_triangles(Point3::new(-3.0, 0.0, -6.0), Vec3::new(6.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 6.0), floor_mat)
    {
        scene.add_surface(tri.into());
    }

    let glass_mat = scene.add_material(Material::Glass(Glass { absorption: Vec3::zero(), refractive_index: 1.5 }));
    scene.add_surface(crate::surface::Sphere::new(Point3::new(0.0, 0.8, -4.0), 0.5, glass_mat).into());

    let light_mat = scene.add_material(Material::Light(Light { color: Vec3::ones() * 20.0 }));
    let light_surface = scene.add_surface(crate::surface::Sphere::new(Point3::new(0.0, 4.0, -4.0), 0.3, light_mat).into());
    scene.add_light(light_surface);

    scene.build_bvh(0.0, 1.0).unwrap();

    DemoScene {
        name: "glass-caustic",
        scene,
        camera_config: CameraConfig { vfov_degrees: 40.0, aspect: 1.0, ..Default::default() },
        eye: Point3::new(0.0, 1.5, 0.0),
        target: Point3::new(0.0, 0.3, -4.0),
        up: Vec3::unit_y(),
        render: default_render(256, 256, 16),
    }
}

/// S4 mirror reciprocity: two facing mirror panels with a diffuse ball
/// between them, exercising deep recursion under Russian roulette.
fn build_mirror_hall() -> DemoScene {
    let mut scene = Scene::new();

    let mirror_tint = scene.add_texture(Texture::Constant(Vec3::new(0.95, 0.95, 0.95)));
    let mirror_mat = scene.add_material(Material::Mirror(Mirror { color: mirror_tint }));
    for tri in quad_triangles(Point3::new(-2.0, 0.0, -3.0), Vec3::new(0.0, 0.0, 6.0), Vec3::new(0.0, 4.0, 0.0), mirror_mat)
    {
        scene.add_surface(tri.into());
    }
    for tri in quad_triangles(Point3::new(2.0, 0.0, -3.0), Vec3::new(0.0, 0.0, 6.0), Vec3::new(0.0, 4.0, 0.0), mirror_mat)
    {
        scene.add_surface(tri.into());
    }

    let ball_albedo = scene.add_texture(Texture::Constant(Vec3::new(0.8, 0.3, 0.2)));
    let ball_mat = scene.add_material(Material::Lambertian(Lambertian { albedo: ball_albedo }));
    scene.add_surface(crate::surface::Sphere::new(Point3::new(0.0, 1.0, 0.0), 0.6, ball_mat).into());

    let light_mat = scene.add_material(Material::Light(Light { color: Vec3::ones() * 8.0 }));
    let light_surface = scene.add_surface(crate::surface::Sphere::new(Point3::new(0.0, 3.5, 0.0), 0.3, light_mat).into());
    scene.add_light(light_surface);

    scene.build_bvh(0.0, 1.0).unwrap();

    DemoScene {
        name: "mirror-hall",
        scene,
        camera_config: CameraConfig { vfov_degrees: 60.0, aspect: 1.0, ..Default::default() },
        eye: Point3::new(0.0, 1.0, 3.0),
        target: Point3::new(0.0, 1.0, 0.0),
        up: Vec3::unit_y(),
        render: default_render(256, 256, 16),
    }
}

/// S5 motion blur: a sphere translating linearly across the open shutter
/// `[0, 1]`, its footprint smeared into a streak.
fn build_motion_blur() -> DemoScene {
    let mut scene = Scene::new();

    let ground_albedo = scene.add_texture(Texture::Constant(Vec3::new(0.5, 0.5, 0.5)));
    let ground_mat = scene.add_material(Material::Lambertian(Lambertian { albedo: ground_albedo }));
    scene.add_surface(crate::surface::Sphere::new(Point3::new(0.0, -1000.5, -5.0), 1000.0, ground_mat).into());

    let sphere_albedo = scene.add_texture(Texture::Constant(Vec3::new(0.2, 0.4, 0.9)));
    let sphere_mat = scene.add_material(Material::Lambertian(Lambertian { albedo: sphere_albedo }));
    let motion = crate::animation::Animation::Linear {
        start: Transformation::from_translation(Vec3::new(-1.0, 0.0, -5.0)),
        end: Transformation::from_translation(Vec3::new(1.0, 0.0, -5.0)),
        t0: 0.0,
        t1: 1.0,
    };
    scene.add_surface(
        crate::surface::Sphere::new(Point3::zero(), 0.5, sphere_mat)
            .with_animation(motion)
            .into(),
    );

    let sky = scene.add_texture(Texture::Constant(Vec3::new(0.4, 0.6, 1.0)));
    scene.set_env_map(EnvMap::Equirect { map: sky });

    scene.build_bvh(0.0, 1.0).unwrap();

    DemoScene {
        name: "motion-blur",
        scene,
        camera_config: CameraConfig {
            vfov_degrees: 30.0,
            aspect: 1.0,
            shutter_open: 0.0,
            shutter_close: 1.0,
            ..Default::default()
        },
        eye: Point3::new(0.0, 0.0, 3.0),
        target: Point3::new(0.0, 0.0, -5.0),
        up: Vec3::unit_y(),
        render: default_render(256, 256, 16),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_builds_a_scene_with_at_least_one_surface() {
        for preset in [
            ScenePreset::Furnace,
            ScenePreset::Cornell,
            ScenePreset::GlassCaustic,
            ScenePreset::MirrorHall,
            ScenePreset::MotionBlur,
        ] {
            let demo = preset.build();
            assert!(!demo.scene.surfaces.is_empty(), "{} has no surfaces", demo.name);
        }
    }
}
