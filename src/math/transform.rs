use super::quat::Quat;
use super::vec3::Vec3;

/// A pose: translation, rotation, and non-uniform scale. Acting on a vector
/// is `t + r·(v∘s)` (∘ = component-wise product); composing `a.then(b)`
/// means "apply `self`, then `b`" in world space.
#[derive(Debug, Clone, Copy)]
pub struct Transformation {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scaling: Vec3,
}

impl Default for Transformation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transformation {
    pub const fn new(translation: Vec3, rotation: Quat, scaling: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scaling,
        }
    }

    pub const fn identity() -> Self {
        Self::new(Vec3::zero(), Quat::identity(), Vec3::ones())
    }

    pub const fn from_translation(t: Vec3) -> Self {
        Self::new(t, Quat::identity(), Vec3::ones())
    }

    /// A rigid pose at `eye` whose local -z axis points at `target`, with
    /// `up` resolving the remaining twist about that axis. Lets demo scenes
    /// place the camera by eye/target/up, the same way the base crate's
    /// `CameraConfig` does, while the camera itself only ever transforms by
    /// a [`super::super::animation::Animation`].
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (target - eye).normalized();
        let align = Quat::from_two_unit_vectors(Vec3::new(0.0, 0.0, -1.0), forward);
        let up_after_align = align.rotate(Vec3::unit_y());
        let desired_up = (up - forward * forward.dot(up)).normalized();
        let twist = Quat::from_two_unit_vectors(up_after_align, desired_up);
        Self::new(eye, twist * align, Vec3::ones())
    }

    #[inline]
    pub fn apply(&self, v: Vec3) -> Vec3 {
        self.translation + self.rotation.rotate(v.hadamard(self.scaling))
    }

    /// Combine two transformations: `a.compose(b)` applies `b` first, then `a`.
    pub fn compose(&self, b: &Transformation) -> Transformation {
        Transformation::new(
            self.apply(b.translation),
            self.rotation * b.rotation,
            self.scaling.hadamard(b.scaling),
        )
    }
}

/// Interpolate two transformations: translation/scale linearly, rotation via slerp.
pub fn mix(t0: &Transformation, t1: &Transformation, alpha: f64) -> Transformation {
    Transformation::new(
        t0.translation.lerp(t1.translation, alpha),
        t0.rotation.slerp(t1.rotation, alpha),
        t0.scaling.lerp(t1.scaling, alpha),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_noop() {
        let v = Vec3::new(1.0, 2.0, -3.0);
        assert_eq!(Transformation::identity().apply(v), v);
    }

    #[test]
    fn translation_then_rotation_order() {
        let t = Transformation::new(
            Vec3::new(0.0, 0.0, 5.0),
            Quat::from_angle_axis(std::f64::consts::FRAC_PI_2, Vec3::unit_y()),
            Vec3::ones(),
        );
        // rotate unit_x by 90deg about y -> -unit_z, then translate by +5 on z
        let out = t.apply(Vec3::unit_x());
        assert!((out - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-9);
    }

    #[test]
    fn mix_endpoints() {
        let a = Transformation::from_translation(Vec3::zero());
        let b = Transformation::from_translation(Vec3::new(2.0, 0.0, 0.0));
        let m0 = mix(&a, &b, 0.0);
        let m1 = mix(&a, &b, 1.0);
        assert!((m0.translation - a.translation).length() < 1e-12);
        assert!((m1.translation - b.translation).length() < 1e-12);
    }
}
