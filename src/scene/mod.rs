// src/scene/mod.rs
pub mod camera;
pub mod factory;
pub mod helpers;
pub mod node;
pub mod procedural;

pub use camera::CameraConfig;
pub use node::{Node, Skin};

use crate::bvh::MeshBvh;
use crate::mesh::TriMesh;
use crate::primitives::Aabb;
use glam::Vec3;
use std::collections::HashSet;

/// One loaded model: node arena plus everything derived from it when the
/// model became ready (pickable surfaces, rotatable targets, focus
/// sphere). Replaced wholesale when a different model is selected.
pub struct ModelScene {
    pub name: String,
    pub nodes: Vec<Node>,
    pub root: usize,
    pub meshes: Vec<TriMesh>,
    pub bvhs: Vec<MeshBvh>,
    pub skins: Vec<Skin>,

    /// Mesh-bearing node indices, collected recursively from the root.
    pub pickables: Vec<usize>,
    /// Node indices the interaction layer may rotate.
    pub rotatables: HashSet<usize>,

    pub focus_center: Vec3,
    pub focus_radius: f32,

    // Reused traversal stack (no per-frame allocation)
    walk: Vec<usize>,
}

impl ModelScene {
    /// New scene with a bare root node at index 0.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: vec![Node::named("root")],
            root: 0,
            meshes: Vec::new(),
            bvhs: Vec::new(),
            skins: Vec::new(),
            pickables: Vec::new(),
            rotatables: HashSet::new(),
            focus_center: Vec3::ZERO,
            focus_radius: 0.0,
            walk: Vec::new(),
        }
    }

    pub fn add_node(&mut self, parent: usize, mut node: Node) -> usize {
        let index = self.nodes.len();
        node.parent_index = Some(parent);
        self.nodes.push(node);
        self.nodes[parent].children_indices.push(index);
        index
    }

    pub fn add_mesh(&mut self, mesh: TriMesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn world_position(&self, index: usize) -> Vec3 {
        self.nodes[index].world_position()
    }

    /// Recompute every cached global transform, top-down from the root.
    /// Must run before any geometric query in a frame and again after the
    /// frame's mutations.
    pub fn update_world_transforms(&mut self) {
        let mut stack = std::mem::take(&mut self.walk);
        stack.clear();
        stack.push(self.root);
        while let Some(i) = stack.pop() {
            let local = self.nodes[i].local_matrix();
            self.nodes[i].global_transform = match self.nodes[i].parent_index {
                Some(p) => self.nodes[p].global_transform * local,
                None => local,
            };
            stack.extend(self.nodes[i].children_indices.iter().copied());
        }
        self.walk = stack;
    }

    /// Derive everything the interaction layer needs. Call once, after
    /// the node arena and meshes are fully populated.
    pub fn prepare(&mut self) {
        self.update_world_transforms();
        self.collect_pickables();
        self.bvhs = self.meshes.iter().map(MeshBvh::build).collect();
        self.compute_rotatables();
        self.compute_focus();
    }

    fn collect_pickables(&mut self) {
        self.pickables.clear();
        let mut stack = vec![self.root];
        while let Some(i) = stack.pop() {
            if self.nodes[i].mesh.is_some() {
                self.pickables.push(i);
            }
            stack.extend(self.nodes[i].children_indices.iter().copied());
        }
    }

    // ドラッグ対象の決定:
    //   基本はボーン階層 (親もボーンであるノード = スケルトンルートを除外)。
    //   ボーン階層が無いモデルはメッシュノードの直接の親で代用する。
    fn compute_rotatables(&mut self) {
        self.rotatables.clear();
        for (i, n) in self.nodes.iter().enumerate() {
            if !n.is_bone {
                continue;
            }
            if let Some(p) = n.parent_index {
                if self.nodes[p].is_bone {
                    self.rotatables.insert(i);
                }
            }
        }
        if !self.rotatables.is_empty() {
            return;
        }
        // Fallback: parents of mesh nodes, skipping mesh-to-mesh chains.
        // The root is never rotatable; its orientation belongs to the
        // move/placement path.
        for n in &self.nodes {
            if n.mesh.is_none() {
                continue;
            }
            if let Some(p) = n.parent_index {
                if p != self.root && self.nodes[p].mesh.is_none() {
                    self.rotatables.insert(p);
                }
            }
        }
    }

    fn compute_focus(&mut self) {
        let mut aabb = Aabb::empty();
        for &i in &self.pickables {
            if let Some(m) = self.nodes[i].mesh {
                let local = self.meshes[m].bounds();
                aabb = aabb.union(&local.transform(self.nodes[i].global_transform));
            }
        }
        if aabb.is_empty() {
            self.focus_center = Vec3::ZERO;
            self.focus_radius = 1.0;
        } else {
            self.focus_center = aabb.center();
            self.focus_radius = ((aabb.max - aabb.min).length() * 0.5).max(1e-3);
        }
    }

    /// Scale/recentre `pivot` so the model fits a ~2 unit box around the
    /// origin. The pivot sits between the root and the imported content;
    /// the root itself stays untouched for the move/placement path.
    pub fn normalize_into(&mut self, pivot: usize) {
        self.update_world_transforms();
        self.collect_pickables();

        let mut aabb = Aabb::empty();
        for &i in &self.pickables {
            if let Some(m) = self.nodes[i].mesh {
                let local = self.meshes[m].bounds();
                aabb = aabb.union(&local.transform(self.nodes[i].global_transform));
            }
        }
        if aabb.is_empty() {
            return;
        }
        let size = aabb.max - aabb.min;
        let max_dim = size.x.max(size.y).max(size.z);
        if max_dim <= 0.0 {
            return;
        }
        let s = 2.0 / max_dim;
        let node = &mut self.nodes[pivot];
        node.scale *= s;
        node.translation = (node.translation - aabb.center()) * s;
    }
}
