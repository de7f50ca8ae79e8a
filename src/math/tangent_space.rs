use super::vec3::Vec3;

/// An orthonormal frame at a surface point with z-axis = normal, used to map
/// locally sampled directions (from the canonical hemisphere warps) into
/// world space.
#[derive(Debug, Clone, Copy)]
pub struct TangentSpace {
    normal: Vec3,
    tangent: Vec3,
    bitangent: Vec3,
}

impl TangentSpace {
    /// Build a frame from a known (normalized) tangent: bitangent = n × t.
    pub fn from_normal_and_tangent(n: Vec3, t: Vec3) -> Self {
        Self {
            normal: n,
            tangent: t,
            bitangent: n.cross(t),
        }
    }

    /// Build a frame from just a normal, picking an arbitrary tangent via
    /// the largest-component heuristic: pick the axis least aligned with
    /// `n`, then cross to get an orthogonal vector.
    pub fn from_normal(n: Vec3) -> Self {
        let w = if n.x.abs() > n.y.abs() && n.x.abs() > n.z.abs() {
            Vec3::new(0.0, -n.z, n.y)
        } else if n.y.abs() > n.z.abs() {
            Vec3::new(-n.z, 0.0, n.x)
        } else {
            Vec3::new(-n.y, n.x, 0.0)
        };
        let tangent = w.normalized();
        Self {
            normal: n,
            tangent,
            bitangent: n.cross(tangent),
        }
    }

    /// Maps a vector (x, y, z) in tangent space to world space:
    /// x·t + y·b + z·n.
    pub fn to_world(&self, v: Vec3) -> Vec3 {
        self.tangent * v.x + self.bitangent * v.y + self.normal * v.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_is_orthonormal_for_arbitrary_normal() {
        for n in [
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.4, 0.3, 0.8).normalized(),
        ] {
            let ts = TangentSpace::from_normal(n);
            assert!((ts.tangent.length() - 1.0).abs() < 1e-9);
            assert!((ts.bitangent.length() - 1.0).abs() < 1e-9);
            assert!(ts.tangent.dot(n).abs() < 1e-9);
            assert!(ts.bitangent.dot(n).abs() < 1e-9);
            assert!(ts.tangent.dot(ts.bitangent).abs() < 1e-9);
        }
    }

    #[test]
    fn to_world_maps_z_to_normal() {
        let n = Vec3::new(0.3, 0.9, -0.1).normalized();
        let ts = TangentSpace::from_normal(n);
        let out = ts.to_world(Vec3::unit_z());
        assert!((out - n).length() < 1e-9);
    }
}
