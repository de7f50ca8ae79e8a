use crate::hit::{HitRecord, ScatterRecord};
use crate::math::Color;

/// An emitter: radiates a constant radiance `color` from its front side
/// only and never scatters — the integrator terminates the path after
/// collecting `Le`.
#[derive(Debug, Clone)]
pub struct Light {
    pub color: Color,
}

impl Light {
    pub fn le(&self, hr: &HitRecord) -> Color {
        if hr.backside {
            Color::zero()
        } else {
            self.color
        }
    }

    pub fn scatter(&self) -> ScatterRecord {
        ScatterRecord::None
    }
}
