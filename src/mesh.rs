//! Shared per-mesh vertex storage. A `Mesh` owns nothing beyond its vertex
//! arrays and fans out into one [`Triangle`](crate::surface::Triangle) per
//! face via [`Mesh::triangles`]; the scene builder calls this once per mesh
//! when assembling the surface arena. No OBJ/MTL importer is implemented
//! here (that importer is an external collaborator) — meshes are built
//! in-process from explicit vertex arrays.

use crate::animation::Animation;
use crate::math::{Point3, Vec2, Vec3};
use crate::surface::triangle::{compute_vertex_tangent, face_tangent_contribution};
use crate::surface::Triangle;

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<Point3>,
    pub normals: Option<Vec<Vec3>>,
    pub texcoords: Option<Vec<Vec2>>,
    pub indices: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new(positions: Vec<Point3>, indices: Vec<[u32; 3]>) -> Self {
        Self { positions, normals: None, texcoords: None, indices }
    }

    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        assert_eq!(normals.len(), self.positions.len());
        self.normals = Some(normals);
        self
    }

    pub fn with_texcoords(mut self, texcoords: Vec<Vec2>) -> Self {
        assert_eq!(texcoords.len(), self.positions.len());
        self.texcoords = Some(texcoords);
        self
    }

    /// Per-vertex tangents derived via the standard Lengyel construction:
    /// accumulate each incident face's UV-space tangent direction, then
    /// Gram-Schmidt orthonormalize against the vertex normal. Requires both
    /// normals and texcoords; returns `None` otherwise.
    fn derive_tangents(&self) -> Option<Vec<Vec3>> {
        let normals = self.normals.as_ref()?;
        let texcoords = self.texcoords.as_ref()?;
        let mut accum = vec![Vec3::zero(); self.positions.len()];
        for face in &self.indices {
            let [i0, i1, i2] = face.map(|i| i as usize);
            if let Some(t) = face_tangent_contribution(
                self.positions[i0],
                self.positions[i1],
                self.positions[i2],
                texcoords[i0],
                texcoords[i1],
                texcoords[i2],
            ) {
                accum[i0] += t;
                accum[i1] += t;
                accum[i2] += t;
            }
        }
        Some(
            accum
                .iter()
                .zip(normals.iter())
                .map(|(&a, &n)| compute_vertex_tangent(a, n))
                .collect(),
        )
    }

    /// Fan this mesh out into one [`Triangle`] surface per face, attaching
    /// `material_index` and an optional shared [`Animation`] to every face.
    pub fn triangles(&self, material_index: u32, animation: Option<Animation>) -> Vec<Triangle> {
        let tangents = self.derive_tangents();
        self.indices
            .iter()
            .map(|&[i0, i1, i2]| {
                let (i0, i1, i2) = (i0 as usize, i1 as usize, i2 as usize);
                let mut tri = Triangle::new(
                    self.positions[i0],
                    self.positions[i1],
                    self.positions[i2],
                    material_index,
                );
                if let Some(normals) = &self.normals {
                    tri = tri.with_normals([normals[i0], normals[i1], normals[i2]]);
                }
                if let Some(texcoords) = &self.texcoords {
                    tri = tri.with_uvs([texcoords[i0], texcoords[i1], texcoords[i2]]);
                }
                if let Some(tangents) = &tangents {
                    tri = tri.with_tangents([tangents[i0], tangents[i1], tangents[i2]]);
                }
                if let Some(animation) = animation {
                    tri = tri.with_animation(animation);
                }
                tri
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        Mesh::new(
            vec![
                Point3::new(-1.0, -1.0, 0.0),
                Point3::new(1.0, -1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(-1.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .with_normals(vec![Vec3::unit_z(); 4])
        .with_texcoords(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ])
    }

    #[test]
    fn fans_out_one_triangle_per_face() {
        let mesh = quad();
        let tris = mesh.triangles(0, None);
        assert_eq!(tris.len(), 2);
    }

    #[test]
    fn derives_unit_length_tangents_orthogonal_to_normal() {
        let mesh = quad();
        let tris = mesh.triangles(0, None);
        for tri in &tris {
            let tangents = tri.tangents.expect("tangents should be derived from UVs");
            for t in tangents {
                assert!((t.length() - 1.0).abs() < 1e-6);
                assert!(t.dot(Vec3::unit_z()).abs() < 1e-6);
            }
        }
    }
}
