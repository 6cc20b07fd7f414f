// src/bvh.rs
use crate::mesh::TriMesh;
use crate::primitives::{ray_triangle, Aabb, Ray};
use glam::{vec3, Vec3};

// --- Per-mesh BVH ---
//
// Binned SAH build over the mesh triangles; traversal walks the tree with
// an explicit stack and reports the nearest triangle hit. Built once per
// mesh when a model is prepared, queried every pick.

#[derive(Clone, Copy, Debug, Default)]
struct BvhNode {
    aabb: Aabb,
    // Interior: index of the first child (children are adjacent).
    // Leaf: first slot in tri_order.
    left_first: u32,
    tri_count: u32,
}

impl BvhNode {
    fn is_leaf(&self) -> bool {
        self.tri_count > 0
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Bin {
    bounds: Aabb,
    count: u32,
}

#[derive(Clone, Debug, Default)]
pub struct MeshBvh {
    nodes: Vec<BvhNode>,
    tri_order: Vec<u32>,
}

const LEAF_SIZE: u32 = 4;
const BINS: usize = 16;

impl MeshBvh {
    pub fn build(mesh: &TriMesh) -> Self {
        let tri_count = mesh.triangle_count();
        let mut tri_aabbs = Vec::with_capacity(tri_count);
        let mut tri_centers = Vec::with_capacity(tri_count);

        for tri in 0..tri_count {
            let (v0, v1, v2) = mesh.triangle(tri);
            let min = v0.min(v1).min(v2);
            let max = v0.max(v1).max(v2);

            // 厚みゼロの三角形でAABBが潰れないように少し膨らませる
            let size = max - min;
            let eps = 1e-5;
            let pad = vec3(
                if size.x < eps { eps } else { 0.0 },
                if size.y < eps { eps } else { 0.0 },
                if size.z < eps { eps } else { 0.0 },
            );
            let aabb = Aabb {
                min: min - pad * 0.5,
                max: max + pad * 0.5,
            };
            tri_centers.push(aabb.center());
            tri_aabbs.push(aabb);
        }

        let mut bvh = Self {
            nodes: Vec::new(),
            tri_order: (0..tri_count as u32).collect(),
        };
        if tri_count == 0 {
            return bvh;
        }

        bvh.nodes.push(BvhNode {
            left_first: 0,
            tri_count: tri_count as u32,
            ..Default::default()
        });
        bvh.update_node_bounds(0, &tri_aabbs);
        bvh.subdivide(0, &tri_aabbs, &tri_centers);
        bvh
    }

    pub fn root_bounds(&self) -> Aabb {
        self.nodes.first().map(|n| n.aabb).unwrap_or_default()
    }

    fn update_node_bounds(&mut self, node_idx: usize, tri_aabbs: &[Aabb]) {
        let node = self.nodes[node_idx];
        let mut aabb = Aabb::empty();
        for i in 0..node.tri_count {
            let tri = self.tri_order[(node.left_first + i) as usize] as usize;
            aabb = aabb.union(&tri_aabbs[tri]);
        }
        self.nodes[node_idx].aabb = aabb;
    }

    fn subdivide(&mut self, node_idx: usize, tri_aabbs: &[Aabb], tri_centers: &[Vec3]) {
        let node = self.nodes[node_idx];
        if node.tri_count <= LEAF_SIZE {
            return;
        }

        let extent = node.aabb.max - node.aabb.min;
        let axis = if extent.y > extent.x {
            if extent.z > extent.y { 2 } else { 1 }
        } else if extent.z > extent.x {
            2
        } else {
            0
        };

        let split_len = extent[axis];
        let split_min = node.aabb.min[axis];
        if split_len < 1e-6 {
            return;
        }

        let first = node.left_first as usize;
        let count = node.tri_count as usize;
        let scale = BINS as f32 / split_len;
        let bin_of = |val: f32| -> usize { (((val - split_min) * scale) as usize).min(BINS - 1) };

        let mut bins = [Bin::default(); BINS];
        for i in 0..count {
            let tri = self.tri_order[first + i] as usize;
            let b = bin_of(tri_centers[tri][axis]);
            bins[b].count += 1;
            bins[b].bounds = bins[b].bounds.union(&tri_aabbs[tri]);
        }

        // Prefix/suffix sweeps for the SAH cost at each split plane
        let mut left_area = [0.0f32; BINS];
        let mut left_count = [0u32; BINS];
        let mut right_area = [0.0f32; BINS];
        let mut right_count = [0u32; BINS];

        let mut cur = Aabb::empty();
        let mut sum = 0;
        for i in 0..BINS {
            sum += bins[i].count;
            cur = cur.union(&bins[i].bounds);
            left_area[i] = cur.area();
            left_count[i] = sum;
        }
        cur = Aabb::empty();
        sum = 0;
        for i in (0..BINS).rev() {
            sum += bins[i].count;
            cur = cur.union(&bins[i].bounds);
            right_area[i] = cur.area();
            right_count[i] = sum;
        }

        let mut best_cost = f32::INFINITY;
        let mut best_split = usize::MAX;
        for i in 0..(BINS - 1) {
            if left_count[i] == 0 || right_count[i + 1] == 0 {
                continue;
            }
            let cost = left_area[i] * left_count[i] as f32
                + right_area[i + 1] * right_count[i + 1] as f32;
            if cost < best_cost {
                best_cost = cost;
                best_split = i;
            }
        }
        if best_split == usize::MAX {
            return;
        }

        // Partition tri_order around the chosen plane
        let mut i = first;
        let mut j = first + count;
        while i < j {
            let tri = self.tri_order[i] as usize;
            if bin_of(tri_centers[tri][axis]) <= best_split {
                i += 1;
            } else {
                j -= 1;
                self.tri_order.swap(i, j);
            }
        }

        let left_len = i - first;
        if left_len == 0 || left_len == count {
            return;
        }

        let left_child = self.nodes.len();
        self.nodes.push(BvhNode {
            left_first: first as u32,
            tri_count: left_len as u32,
            ..Default::default()
        });
        self.nodes.push(BvhNode {
            left_first: i as u32,
            tri_count: (count - left_len) as u32,
            ..Default::default()
        });
        self.nodes[node_idx].left_first = left_child as u32;
        self.nodes[node_idx].tri_count = 0;

        self.update_node_bounds(left_child, tri_aabbs);
        self.update_node_bounds(left_child + 1, tri_aabbs);
        self.subdivide(left_child, tri_aabbs, tri_centers);
        self.subdivide(left_child + 1, tri_aabbs, tri_centers);
    }

    /// Nearest triangle hit, as t along `ray` (mesh-local space).
    pub fn intersect(&self, mesh: &TriMesh, ray: &Ray) -> Option<f32> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut best: Option<f32> = None;
        let mut stack = [0usize; 64];
        let mut top = 0;
        stack[top] = 0;
        top += 1;

        while top > 0 {
            top -= 1;
            let node = self.nodes[stack[top]];

            match node.aabb.intersect_ray(ray) {
                Some(entry) if best.map_or(true, |b| entry < b) => {}
                _ => continue,
            }

            if node.is_leaf() {
                for i in 0..node.tri_count {
                    let tri = self.tri_order[(node.left_first + i) as usize] as usize;
                    let (v0, v1, v2) = mesh.triangle(tri);
                    if let Some(t) = ray_triangle(ray, v0, v1, v2) {
                        if best.map_or(true, |b| t < b) {
                            best = Some(t);
                        }
                    }
                }
            } else {
                stack[top] = node.left_first as usize;
                stack[top + 1] = node.left_first as usize + 1;
                top += 2;
            }
        }
        best
    }
}
