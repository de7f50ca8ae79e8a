//! Path-sampling integrator: Russian-roulette termination and multiple
//! importance sampling against the scene's area lights, in the spirit of
//! `renderer.rs`'s recursive `trace_ray` but reworked into an iterative loop
//! over `ScatterRecord`s so a path can run for hundreds of segments without
//! growing the call stack.

use crate::hit::ScatterRecord;
use crate::math::{Color, Ray};
use crate::sampler::Sampler;
use crate::scene::Scene;

/// Tunables threaded through every `path_sample` call; owned by the driver,
/// never mutated mid-render.
#[derive(Debug, Clone, Copy)]
pub struct IntegratorParams {
    pub max_segments: u32,
    pub min_hit: f64,
    pub rr_start_segment: u32,
    pub rr_cap: f64,
}

impl Default for IntegratorParams {
    fn default() -> Self {
        Self {
            max_segments: 128,
            min_hit: 1e-4,
            rr_start_segment: 5,
            rr_cap: 0.95,
        }
    }
}

/// The power heuristic with exponent 2, used to combine BSDF and
/// light-sampling strategies. Returns 0 when both pdfs are 0.
fn power_heuristic(pdf_a: f64, pdf_b: f64) -> f64 {
    let a2 = pdf_a * pdf_a;
    let b2 = pdf_b * pdf_b;
    if a2 + b2 <= 0.0 {
        0.0
    } else {
        a2 / (a2 + b2)
    }
}

/// Average pdf of `ray` with respect to every light surface in the scene,
/// the combined density the integrator's MIS weight treats the whole light
/// set as.
fn average_light_pdf(scene: &Scene, ray: &Ray) -> f64 {
    if scene.lights.is_empty() {
        return 0.0;
    }
    let sum: f64 = scene.lights.iter().map(|&i| scene.surfaces[i as usize].pdf(ray)).sum();
    sum / scene.lights.len() as f64
}

/// Trace a single primary ray through the scene and return one radiance
/// sample. Total and allocation-free: no heap traffic, no early panics —
/// every numerical corner case (zero pdf, degenerate scatter) resolves
/// locally by breaking the path.
pub fn path_sample(mut ray: Ray, scene: &Scene, sampler: &mut Sampler, params: &IntegratorParams) -> Color {
    let mut radiance = Color::zero();
    let mut throughput = Color::ones();

    for segment in 0..params.max_segments {
        let hit = match scene.hit(&ray, params.min_hit, f64::MAX) {
            Some(hit) => hit,
            None => {
                radiance += throughput.hadamard(scene.background(&ray));
                break;
            }
        };

        let material = &scene.materials[hit.material_index as usize];
        radiance += throughput.hadamard(material.le(&hit, &scene.materials));

        let sr = material.scatter(ray.direction, ray.time, &hit, sampler, &scene.textures, &scene.materials);
        let (direction, pdf, attenuation) = match sr {
            ScatterRecord::None => break,
            ScatterRecord::Specular { direction, attenuation } => (direction, 1.0, attenuation),
            ScatterRecord::Random { direction, pdf, attenuation } => (direction, pdf, attenuation),
        };

        let mut next_throughput = throughput.hadamard(attenuation) * (1.0 / pdf);

        if let ScatterRecord::Random { pdf: p_bsdf, .. } = sr {
            if !scene.lights.is_empty() {
                let bsdf_ray = Ray::new(hit.position, direction, ray.time);
                let p_bsdf_to_lights = average_light_pdf(scene, &bsdf_ray);
                next_throughput *= power_heuristic(p_bsdf, p_bsdf_to_lights);

                let light_index_in_list = (sampler.uniform01() * scene.lights.len() as f64) as usize;
                let light_index_in_list = light_index_in_list.min(scene.lights.len() - 1);
                let light_surface = scene.lights[light_index_in_list];

                let light_direction = scene.surfaces[light_surface as usize].direction(hit.position, ray.time, sampler);
                let light_ray = Ray::new(hit.position, light_direction, ray.time);
                let p_light = average_light_pdf(scene, &light_ray);

                if p_light > 0.0 {
                    let sr_light = material.scatter_to_direction(
                        ray.direction,
                        ray.time,
                        &hit,
                        light_direction,
                        &scene.textures,
                        &scene.materials,
                    );
                    if let ScatterRecord::Random { pdf: p_light_bsdf, attenuation: light_attenuation, .. } = sr_light {
                        if p_light_bsdf > 0.0 {
                            if let Some(light_hit) = scene.hit(&light_ray, params.min_hit, f64::MAX) {
                                if light_hit.surface_index == light_surface {
                                    let light_material = &scene.materials[light_hit.material_index as usize];
                                    let le = light_material.le(&light_hit, &scene.materials);
                                    let weight = power_heuristic(p_light, p_light_bsdf);
                                    radiance += throughput.hadamard(light_attenuation) * (weight / p_light) * le;
                                }
                            }
                        }
                    }
                }
            }
        }

        throughput = next_throughput;
        ray = Ray::new(hit.position, direction, ray.time);

        if segment + 1 >= params.rr_start_segment {
            let survival = throughput.max_component();
            if survival < 1.0 {
                let q = (1.0 - survival).clamp(0.0, params.rr_cap);
                if sampler.uniform01() < q {
                    break;
                }
                throughput *= 1.0 / (1.0 - q);
            }
        }
    }

    radiance
}
