// src/render_buffers.rs
use crate::scene::ModelScene;

/// Flat buffers the host renderer reads directly out of wasm memory:
/// one world matrix per node, and one skinning matrix (global ×
/// inverse-bind) per joint of each skin, in skin order.
#[derive(Default)]
pub struct RenderBuffers {
    pub(crate) node_transforms: Vec<f32>,
    pub(crate) joint_matrices: Vec<f32>,
}

impl RenderBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.node_transforms.clear();
        self.joint_matrices.clear();
    }

    pub fn pack(&mut self, scene: &ModelScene) {
        self.clear();
        for node in &scene.nodes {
            self.node_transforms
                .extend_from_slice(&node.global_transform.to_cols_array());
        }
        for skin in &scene.skins {
            for (&joint, inverse_bind) in skin.joints.iter().zip(&skin.inverse_bind_matrices) {
                let m = scene.nodes[joint].global_transform * *inverse_bind;
                self.joint_matrices.extend_from_slice(&m.to_cols_array());
            }
        }
    }
}
