//! Intersection records and the scatter-event representation that materials
//! produce — the interchange format between surfaces, materials and the
//! integrator.

use crate::math::{Point3, Vec2, Vec3};

/// Everything the integrator needs to know about a ray/surface intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    /// Ray parameter at the intersection.
    pub t: f64,
    pub position: Point3,
    /// Geometric normal, always oriented to face the incoming ray.
    pub normal: Vec3,
    pub uv: Vec2,
    pub tangent: Vec3,
    /// True if the geometric normal had to be flipped to face the ray,
    /// i.e. the ray hit the surface from its back side.
    pub backside: bool,
    pub surface_index: u32,
    pub material_index: u32,
}

impl HitRecord {
    /// Flip `geometric_normal` to face `ray_direction` if necessary and
    /// record whether the flip happened.
    pub fn face_forward(geometric_normal: Vec3, ray_direction: Vec3) -> (Vec3, bool) {
        if geometric_normal.dot(ray_direction) > 0.0 {
            (-geometric_normal, true)
        } else {
            (geometric_normal, false)
        }
    }

    /// The `TwoSided` material wrapper presents a back hit to its second
    /// material as if it were a front hit: the geometric normal already
    /// faces the incoming ray (per the struct invariant), so only the
    /// `backside` flag needs clearing.
    pub fn as_front_facing(&self) -> HitRecord {
        HitRecord { backside: false, ..*self }
    }
}

/// What a material does with an incoming ray at a hit point.
#[derive(Debug, Clone, Copy)]
pub enum ScatterRecord {
    /// The path terminates here (e.g. hit emission with no further bounce).
    None,
    /// A perfectly specular bounce (mirror, dielectric): no pdf, MIS does
    /// not apply to the next segment started from this vertex.
    Specular { direction: Vec3, attenuation: Vec3 },
    /// A randomly sampled bounce with an associated solid-angle pdf, used
    /// both to continue the path and to weight next-event estimation via
    /// MIS against the BSDF's own sampling strategy.
    Random {
        direction: Vec3,
        pdf: f64,
        attenuation: Vec3,
    },
}

impl ScatterRecord {
    pub fn is_none(&self) -> bool {
        matches!(self, ScatterRecord::None)
    }
}
