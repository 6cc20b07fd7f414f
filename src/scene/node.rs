// src/scene/node.rs
use glam::{Mat4, Quat, Vec3};

// --- Scene Graph Nodes ---

/// One node in the model's transform hierarchy. Nodes live in a flat
/// arena (`ModelScene::nodes`) and refer to each other by index; the
/// parent link is observational, only `children_indices` owns the shape.
#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub parent_index: Option<usize>,
    pub children_indices: Vec<usize>,

    // Local transform (the interaction target)
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    // Computed global transform; valid after update_world_transforms()
    pub global_transform: Mat4,

    // What this node carries
    pub mesh: Option<usize>,
    pub skin: Option<usize>,
    pub is_bone: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            name: "Node".to_string(),
            parent_index: None,
            children_indices: Vec::new(),
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            global_transform: Mat4::IDENTITY,
            mesh: None,
            skin: None,
            is_bone: false,
        }
    }
}

impl Node {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    pub fn world_position(&self) -> Vec3 {
        self.global_transform.w_axis.truncate()
    }
}

// --- Skinning ---

#[derive(Clone, Debug)]
pub struct Skin {
    pub joints: Vec<usize>, // node indices
    pub inverse_bind_matrices: Vec<Mat4>,
}
