// src/lib.rs
use crate::config::StageConfig;
use crate::engine::Engine;
use crate::interaction::{GizmoMode, Handedness, StageEvent};
use crate::render_buffers::RenderBuffers;
use crate::scene::CameraConfig;
use glam::{Quat, Vec3};
use wasm_bindgen::prelude::*;

pub mod bvh;
pub mod config;
pub mod engine;
pub mod interaction;
pub mod loader;
pub mod mesh;
pub mod primitives;
pub mod raycast;
pub mod render_buffers;
pub mod resolver;
pub mod scene;

#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// JS-facing handle. The host owns the renderer and the WebXR session;
/// it forwards input events and per-frame poses here, calls `update`
/// once per rendered frame, and reads the transform buffers back out of
/// wasm memory through the pointer accessors.
#[wasm_bindgen]
pub struct Stage {
    engine: Engine,
    buffers: RenderBuffers,
    camera_data: Vec<f32>,
    aspect_ratio: f32,
}

#[wasm_bindgen]
impl Stage {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Stage {
        let config = match config_json.as_deref() {
            Some(json) => StageConfig::from_json(json).unwrap_or_else(|e| {
                tracing::warn!("invalid stage config, using defaults: {e}");
                StageConfig::default()
            }),
            None => StageConfig::default(),
        };
        Stage {
            engine: Engine::new(config),
            buffers: RenderBuffers::new(),
            camera_data: vec![0.0; 16],
            aspect_ratio: 1.5,
        }
    }

    // --- Model selection ---

    /// GLBがあればそれを、無ければ model_id の組み込みモデルを読み込む。
    /// 選択し直すと進行中の操作は全て破棄される。
    pub fn select_model(&mut self, model_id: &str, glb_data: Option<Vec<u8>>) -> Result<(), JsValue> {
        let model = scene::factory::get_model(model_id, glb_data.as_deref())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.engine.select_model(model);
        self.refresh_camera();
        self.repack();
        Ok(())
    }

    pub fn selected_model(&self) -> Option<String> {
        self.engine.scene().map(|s| s.name.clone())
    }

    /// "Back" from the host UI. The host ends the XR session on its own
    /// side (best effort) before calling this.
    pub fn clear_selection(&mut self) {
        self.engine.clear_model();
        self.repack();
    }

    // --- Input events (queued; applied at the next update) ---

    pub fn controller_connected(&mut self, slot: usize, handedness: &str) {
        self.engine.push_event(StageEvent::Connected {
            slot,
            handedness: Handedness::from_str(handedness),
        });
    }

    pub fn controller_disconnected(&mut self, slot: usize) {
        self.engine.push_event(StageEvent::Disconnected { slot });
    }

    pub fn select_start(&mut self, slot: usize) {
        self.engine.push_event(StageEvent::SelectStart { slot });
    }

    pub fn select_end(&mut self, slot: usize) {
        self.engine.push_event(StageEvent::SelectEnd { slot });
    }

    pub fn squeeze_start(&mut self, slot: usize) {
        self.engine.push_event(StageEvent::SqueezeStart { slot });
    }

    pub fn squeeze_end(&mut self, slot: usize) {
        self.engine.push_event(StageEvent::SqueezeEnd { slot });
    }

    pub fn session_started(&mut self) {
        self.engine.push_event(StageEvent::SessionStart);
    }

    // --- Per-frame poses ---

    #[allow(clippy::too_many_arguments)]
    pub fn set_controller_pose(
        &mut self,
        slot: usize,
        px: f32,
        py: f32,
        pz: f32,
        qx: f32,
        qy: f32,
        qz: f32,
        qw: f32,
    ) {
        self.engine
            .set_controller_pose(slot, Vec3::new(px, py, pz), Quat::from_xyzw(qx, qy, qz, qw));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_head_pose(&mut self, px: f32, py: f32, pz: f32, qx: f32, qy: f32, qz: f32, qw: f32) {
        self.engine
            .set_head_pose(Vec3::new(px, py, pz), Quat::from_xyzw(qx, qy, qz, qw));
    }

    /// Frame tick. Call once per rendered frame, after the poses above.
    pub fn update(&mut self) {
        self.engine.update();
        self.repack();
    }

    // --- Renderer-facing output ---

    pub fn node_transforms_ptr(&self) -> *const f32 {
        self.buffers.node_transforms.as_ptr()
    }
    pub fn node_transforms_len(&self) -> usize {
        self.buffers.node_transforms.len()
    }
    pub fn joint_matrices_ptr(&self) -> *const f32 {
        self.buffers.joint_matrices.as_ptr()
    }
    pub fn joint_matrices_len(&self) -> usize {
        self.buffers.joint_matrices.len()
    }
    pub fn camera_ptr(&self) -> *const f32 {
        self.camera_data.as_ptr()
    }
    pub fn camera_len(&self) -> usize {
        self.camera_data.len()
    }

    pub fn update_camera(&mut self, width: f32, height: f32) {
        if height == 0.0 {
            return;
        }
        self.aspect_ratio = width / height;
        self.refresh_camera();
    }

    /// Node index of the active gizmo target, or -1.
    pub fn gizmo_target(&self) -> i32 {
        self.engine.gizmo().0.map_or(-1, |i| i as i32)
    }

    /// 0 = none, 1 = rotate, 2 = move.
    pub fn gizmo_mode(&self) -> u8 {
        match self.engine.gizmo().1 {
            GizmoMode::None => 0,
            GizmoMode::Rotate => 1,
            GizmoMode::Move => 2,
        }
    }

    /// Hovered joint for a controller, or -1. Highlight only; never
    /// mutates the model.
    pub fn hover_target(&self, slot: usize) -> i32 {
        self.engine.hover_target(slot).map_or(-1, |i| i as i32)
    }

    /// Length to draw the pointer ray for a controller.
    pub fn ray_length(&self, slot: usize) -> f32 {
        self.engine.ray_length(slot)
    }
}

impl Stage {
    fn repack(&mut self) {
        match self.engine.scene() {
            Some(scene) => self.buffers.pack(scene),
            None => self.buffers.clear(),
        }
    }

    fn refresh_camera(&mut self) {
        if let Some(scene) = self.engine.scene() {
            let camera = CameraConfig::frame_to(scene.focus_center, scene.focus_radius);
            self.camera_data = camera.create_buffer(self.aspect_ratio).to_vec();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_round_trip_without_a_host() {
        let mut stage = Stage::new(None);
        assert_eq!(stage.gizmo_target(), -1);
        assert_eq!(stage.node_transforms_len(), 0);

        stage.select_model("mannequin", None).expect("built-in model");
        assert_eq!(stage.selected_model().as_deref(), Some("mannequin"));
        assert!(stage.node_transforms_len() > 0);
        assert_eq!(stage.node_transforms_len() % 16, 0);

        stage.controller_connected(0, "left");
        stage.set_controller_pose(0, 0.0, 1.0, 1.5, 0.0, 0.0, 0.0, 1.0);
        stage.update();

        stage.clear_selection();
        assert!(stage.selected_model().is_none());
        assert_eq!(stage.node_transforms_len(), 0);
    }

    #[test]
    fn config_json_overrides_are_honoured() {
        let mut stage = Stage::new(Some(r#"{"ray_length": 9.0}"#.to_string()));
        stage.update();
        assert_eq!(stage.ray_length(0), 9.0);
    }
}
