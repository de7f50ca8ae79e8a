//! Bounding volume hierarchy: an SAH-split binary tree over the scene's
//! surfaces, linearized depth-first (left child first) into a flat array so
//! traversal needs no pointers — the first child of an internal node always
//! sits at `index + 1`, and the second child's index is packed into the
//! node alongside a leaf/internal parity flag.

use crate::error::RenderError;
use crate::hit::HitRecord;
use crate::math::{Aabb, Ray};
use crate::surface::Surface;

const MAX_DEPTH: u32 = 128;

/// One entry of the linearized tree. `packed`'s low bit is the leaf flag:
/// even encodes a leaf (`packed / 2` is the surface index), odd encodes an
/// internal node (`packed / 2` is the index of its second child; the first
/// child is always this node's successor in the array).
#[derive(Debug, Clone, Copy)]
struct LinearNode {
    bounds: Aabb,
    packed: u32,
}

impl LinearNode {
    #[inline(always)]
    fn is_leaf(&self) -> bool {
        self.packed & 1 == 0
    }

    #[inline(always)]
    fn leaf_surface(&self) -> u32 {
        self.packed >> 1
    }

    #[inline(always)]
    fn child2(&self) -> u32 {
        self.packed >> 1
    }
}

enum BuildNode {
    Leaf { bounds: Aabb, surface: u32 },
    Internal { bounds: Aabb, left: Box<BuildNode>, right: Box<BuildNode> },
}

impl BuildNode {
    fn bounds(&self) -> Aabb {
        match self {
            BuildNode::Leaf { bounds, .. } => *bounds,
            BuildNode::Internal { bounds, .. } => *bounds,
        }
    }
}

/// The linearized acceleration structure. Immutable and shared (read-only)
/// across all render worker threads once built.
#[derive(Debug, Clone)]
pub struct Bvh {
    nodes: Vec<LinearNode>,
}

impl Bvh {
    /// Build from every surface in `surfaces`, using each surface's AABB
    /// over the closed shutter window `[t0, t1]`.
    pub fn build(surfaces: &[Surface], t0: f64, t1: f64) -> Result<Bvh, RenderError> {
        if surfaces.is_empty() {
            return Err(RenderError::EmptyScene);
        }
        let boxes: Vec<Aabb> = surfaces.iter().map(|s| s.bounds(t0, t1)).collect();
        let mut indices: Vec<u32> = (0..surfaces.len() as u32).collect();
        let root = build_recursive(&mut indices, &boxes, 0)?;
        let mut nodes = Vec::with_capacity(surfaces.len() * 2);
        flatten(&root, &mut nodes);
        Ok(Bvh { nodes })
    }

    /// Iterative traversal with a fixed-capacity stack bounded by
    /// [`MAX_DEPTH`], returning the closest intersection (if any) within
    /// `[a_min, a_max]`.
    pub fn hit(&self, ray: &Ray, a_min: f64, a_max: f64, surfaces: &[Surface]) -> Option<HitRecord> {
        let mut stack = [0u32; MAX_DEPTH as usize];
        let mut sp = 0usize;
        let mut current = 0u32;
        let mut closest = a_max;
        let mut result: Option<HitRecord> = None;

        loop {
            let node = &self.nodes[current as usize];
            if node.bounds.hit(ray, a_min, closest) {
                if node.is_leaf() {
                    let surface_index = node.leaf_surface();
                    if let Some(mut hr) = surfaces[surface_index as usize].hit(ray, a_min, closest) {
                        closest = hr.t;
                        hr.surface_index = surface_index;
                        result = Some(hr);
                    }
                    if sp == 0 {
                        break;
                    }
                    sp -= 1;
                    current = stack[sp];
                } else {
                    stack[sp] = node.child2();
                    sp += 1;
                    current += 1;
                }
            } else if sp == 0 {
                break;
            } else {
                sp -= 1;
                current = stack[sp];
            }
        }

        result
    }
}

fn build_recursive(indices: &mut [u32], boxes: &[Aabb], depth: u32) -> Result<BuildNode, RenderError> {
    if depth > MAX_DEPTH {
        return Err(RenderError::BvhDepthExceeded { max: MAX_DEPTH, remaining: indices.len() });
    }
    if indices.len() == 1 {
        return Ok(BuildNode::Leaf { bounds: boxes[indices[0] as usize], surface: indices[0] });
    }

    let parent_bounds = indices
        .iter()
        .fold(Aabb::empty(), |acc, &i| Aabb::merge(acc, boxes[i as usize]));
    let axis = parent_bounds.longest_axis();
    indices.sort_by(|&a, &b| {
        let ca = boxes[a as usize].center()[axis];
        let cb = boxes[b as usize].center()[axis];
        ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
    });

    let n = indices.len();
    let mut prefix = vec![Aabb::empty(); n];
    let mut running = Aabb::empty();
    for (i, &idx) in indices.iter().enumerate() {
        running = Aabb::merge(running, boxes[idx as usize]);
        prefix[i] = running;
    }
    let mut suffix = vec![Aabb::empty(); n];
    let mut running = Aabb::empty();
    for i in (0..n).rev() {
        running = Aabb::merge(running, boxes[indices[i] as usize]);
        suffix[i] = running;
    }

    let mut best_k = 1usize;
    let mut best_cost = f64::INFINITY;
    for k in 1..n {
        let cost = k as f64 * prefix[k - 1].surface_area() + (n - k) as f64 * suffix[k].surface_area();
        if cost < best_cost {
            best_cost = cost;
            best_k = k;
        }
    }

    let (left_indices, right_indices) = indices.split_at_mut(best_k);
    let left = build_recursive(left_indices, boxes, depth + 1)?;
    let right = build_recursive(right_indices, boxes, depth + 1)?;
    Ok(BuildNode::Internal { bounds: parent_bounds, left: Box::new(left), right: Box::new(right) })
}

/// Depth-first, left-child-first flatten: pushing the left subtree
/// immediately after its parent guarantees `index + 1` is always the first
/// child, so only the second child's index needs to be stored explicitly.
fn flatten(node: &BuildNode, nodes: &mut Vec<LinearNode>) -> u32 {
    let index = nodes.len() as u32;
    match node {
        BuildNode::Leaf { bounds, surface } => {
            nodes.push(LinearNode { bounds: *bounds, packed: surface * 2 });
        }
        BuildNode::Internal { bounds, left, right } => {
            nodes.push(LinearNode { bounds: *bounds, packed: 0 });
            flatten(left, nodes);
            let right_index = flatten(right, nodes);
            nodes[index as usize].packed = right_index * 2 + 1;
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vec3};
    use crate::surface::Sphere;

    fn scene_of_spheres(n: u32) -> Vec<Surface> {
        (0..n)
            .map(|i| Surface::Sphere(Sphere::new(Point3::new(i as f64 * 3.0, 0.0, 0.0), 1.0, 0)))
            .collect()
    }

    #[test]
    fn single_surface_builds_one_leaf_node() {
        let surfaces = scene_of_spheres(1);
        let bvh = Bvh::build(&surfaces, 0.0, 1.0).unwrap();
        assert_eq!(bvh.nodes.len(), 1);
        assert!(bvh.nodes[0].is_leaf());
    }

    #[test]
    fn internal_node_bounds_contain_both_children() {
        let surfaces = scene_of_spheres(8);
        let bvh = Bvh::build(&surfaces, 0.0, 1.0).unwrap();
        for i in 0..bvh.nodes.len() {
            if !bvh.nodes[i].is_leaf() {
                let child1 = i + 1;
                let child2 = bvh.nodes[i].child2() as usize;
                let b = bvh.nodes[i].bounds;
                for &c in &[child1, child2] {
                    let cb = bvh.nodes[c].bounds;
                    assert!(b.lo.x <= cb.lo.x + 1e-9 && b.lo.y <= cb.lo.y + 1e-9 && b.lo.z <= cb.lo.z + 1e-9);
                    assert!(b.hi.x >= cb.hi.x - 1e-9 && b.hi.y >= cb.hi.y - 1e-9 && b.hi.z >= cb.hi.z - 1e-9);
                }
            }
        }
    }

    #[test]
    fn traversal_finds_closest_hit_among_many_spheres() {
        let surfaces = scene_of_spheres(20);
        let bvh = Bvh::build(&surfaces, 0.0, 1.0).unwrap();
        let ray = Ray::new(Point3::new(3.0, 0.0, -10.0), Vec3::unit_z(), 0.0);
        let hr = bvh.hit(&ray, 1e-4, f64::MAX, &surfaces).unwrap();
        assert_eq!(hr.surface_index, 1);
        assert!((hr.t - 9.0).abs() < 1e-6);
    }

    #[test]
    fn empty_scene_is_an_error() {
        let surfaces: Vec<Surface> = Vec::new();
        assert!(Bvh::build(&surfaces, 0.0, 1.0).is_err());
    }

    #[test]
    fn linear_scan_matches_bvh_traversal() {
        let surfaces = scene_of_spheres(30);
        let bvh = Bvh::build(&surfaces, 0.0, 1.0).unwrap();
        for i in 0..30 {
            let x = i as f64 * 3.0;
            let ray = Ray::new(Point3::new(x, 0.0, -10.0), Vec3::unit_z(), 0.0);
            let bvh_hit = bvh.hit(&ray, 1e-4, f64::MAX, &surfaces);
            let linear_hit = surfaces.iter().enumerate().filter_map(|(idx, s)| {
                s.hit(&ray, 1e-4, f64::MAX).map(|mut hr| {
                    hr.surface_index = idx as u32;
                    hr
                })
            }).min_by(|a, b| a.t.partial_cmp(&b.t).unwrap());
            match (bvh_hit, linear_hit) {
                (Some(a), Some(b)) => assert!((a.t - b.t).abs() < 1e-9),
                (None, None) => {}
                _ => panic!("bvh/linear-scan disagreement at sphere {i}"),
            }
        }
    }
}
