// src/engine.rs
use crate::config::StageConfig;
use crate::interaction::{
    Controller, DragSession, GizmoMode, Handedness, MoveSession, StageEvent, CONTROLLER_SLOTS,
};
use crate::raycast;
use crate::resolver;
use crate::scene::ModelScene;
use glam::{EulerRot, Quat, Vec3};
use tracing::{debug, info};

/// The interaction engine proper: owns the loaded model, the controller
/// slots, the live drag/move sessions and the event inbox. Everything
/// runs on one logical thread; events queue up between frames and are
/// drained at the top of `update`.
pub struct Engine {
    config: StageConfig,
    scene: Option<ModelScene>,

    controllers: [Controller; CONTROLLER_SLOTS],
    drags: [Option<DragSession>; CONTROLLER_SLOTS],
    moves: [Option<MoveSession>; CONTROLLER_SLOTS],
    inbox: Vec<StageEvent>,

    head_position: Vec3,
    head_rotation: Quat,
    place_pending: bool,

    // Passive per-controller feedback, refreshed every frame
    hover: [Option<usize>; CONTROLLER_SLOTS],
    ray_lengths: [f32; CONTROLLER_SLOTS],
}

impl Engine {
    pub fn new(config: StageConfig) -> Self {
        Self {
            config,
            scene: None,
            controllers: [Controller::default(); CONTROLLER_SLOTS],
            drags: [None; CONTROLLER_SLOTS],
            moves: [None; CONTROLLER_SLOTS],
            inbox: Vec::new(),
            head_position: Vec3::ZERO,
            head_rotation: Quat::IDENTITY,
            place_pending: false,
            hover: [None; CONTROLLER_SLOTS],
            ray_lengths: [0.0; CONTROLLER_SLOTS],
        }
    }

    // --- Model lifecycle ---

    /// Swap in a freshly prepared model. All interaction state tied to
    /// the previous model dies with it; a pending placement request is
    /// kept, it belongs to the XR session rather than the model.
    pub fn select_model(&mut self, scene: ModelScene) {
        self.clear_sessions();
        info!(model = %scene.name, "model selected");
        self.scene = Some(scene);
    }

    /// Engine half of the "back" action. The host ends the XR session
    /// best-effort on its own side.
    pub fn clear_model(&mut self) {
        self.clear_sessions();
        self.scene = None;
    }

    fn clear_sessions(&mut self) {
        self.drags = [None; CONTROLLER_SLOTS];
        self.moves = [None; CONTROLLER_SLOTS];
        self.hover = [None; CONTROLLER_SLOTS];
    }

    pub fn scene(&self) -> Option<&ModelScene> {
        self.scene.as_ref()
    }

    // --- Platform inputs ---

    pub fn push_event(&mut self, event: StageEvent) {
        self.inbox.push(event);
    }

    pub fn set_controller_pose(&mut self, slot: usize, position: Vec3, rotation: Quat) {
        if let Some(c) = self.controllers.get_mut(slot) {
            c.position = position;
            c.rotation = rotation;
        }
    }

    pub fn set_head_pose(&mut self, position: Vec3, rotation: Quat) {
        self.head_position = position;
        self.head_rotation = rotation;
    }

    pub fn controller(&self, slot: usize) -> &Controller {
        &self.controllers[slot]
    }

    // --- Feedback outputs ---

    pub fn hover_target(&self, slot: usize) -> Option<usize> {
        self.hover.get(slot).copied().flatten()
    }

    pub fn ray_length(&self, slot: usize) -> f32 {
        self.ray_lengths.get(slot).copied().unwrap_or(0.0)
    }

    /// Active gizmo: the joint being rotated, or the root being moved.
    /// A live drag wins over a live move.
    pub fn gizmo(&self) -> (Option<usize>, GizmoMode) {
        if let Some(drag) = self.drags.iter().flatten().next() {
            return (Some(drag.target), GizmoMode::Rotate);
        }
        if self.moves.iter().any(Option::is_some) {
            if let Some(scene) = &self.scene {
                return (Some(scene.root), GizmoMode::Move);
            }
        }
        (None, GizmoMode::None)
    }

    // --- Frame update ---
    //
    // Fixed order; the steps read each other's results:
    //   transforms -> events -> placement -> hover -> move -> rotate -> transforms

    pub fn update(&mut self) {
        if let Some(scene) = self.scene.as_mut() {
            scene.update_world_transforms();
        }

        let mut events = std::mem::take(&mut self.inbox);
        for event in events.drain(..) {
            self.apply_event(event);
        }
        if self.inbox.is_empty() {
            self.inbox = events; // keep the capacity
        }

        self.apply_placement();
        self.update_hover();
        self.integrate_moves();
        self.integrate_drags();

        if let Some(scene) = self.scene.as_mut() {
            scene.update_world_transforms();
        }
    }

    fn apply_event(&mut self, event: StageEvent) {
        match event {
            StageEvent::Connected { slot, handedness } => {
                if let Some(c) = self.controllers.get_mut(slot) {
                    c.connected = true;
                    c.handedness = handedness;
                    debug!(slot, ?handedness, "controller connected");
                }
            }
            StageEvent::Disconnected { slot } => {
                if let Some(c) = self.controllers.get_mut(slot) {
                    c.connected = false;
                    // A gesture can't outlive its controller
                    self.drags[slot] = None;
                    self.moves[slot] = None;
                    debug!(slot, "controller disconnected");
                }
            }
            StageEvent::SelectStart { slot } => self.begin_drag(slot),
            StageEvent::SelectEnd { slot } => {
                if slot < CONTROLLER_SLOTS {
                    self.drags[slot] = None;
                }
            }
            StageEvent::SqueezeStart { slot } => self.begin_move(slot),
            StageEvent::SqueezeEnd { slot } => {
                if slot < CONTROLLER_SLOTS {
                    self.moves[slot] = None;
                }
            }
            StageEvent::SessionStart => {
                self.place_pending = true;
            }
        }
    }

    /// Select-start only becomes a session when the whole guard chain
    /// holds: a model with pickable surfaces and rotatable targets, a
    /// ray hit, and a resolved joint. Any miss is a silent no-op.
    fn begin_drag(&mut self, slot: usize) {
        if slot >= CONTROLLER_SLOTS || self.drags[slot].is_some() {
            return;
        }
        let Some(scene) = self.scene.as_ref() else {
            return;
        };
        if scene.pickables.is_empty() || scene.rotatables.is_empty() {
            return;
        }
        let controller = self.controllers[slot];
        let ray = raycast::controller_ray(&controller);
        let Some(hit) = raycast::pick(scene, &ray) else {
            return;
        };
        let Some(target) = resolver::resolve(scene, hit.node, hit.point) else {
            return;
        };

        let (rx, ry, rz) = scene.nodes[target].rotation.to_euler(EulerRot::XYZ);
        self.drags[slot] = Some(DragSession {
            target,
            start_controller_pos: controller.position,
            start_rotation_x: rx,
            start_rotation_y: ry,
            start_rotation_z: rz,
            allow_yaw: controller.handedness == Handedness::Left,
        });
        debug!(slot, target, "drag session started");
    }

    fn begin_move(&mut self, slot: usize) {
        if slot >= CONTROLLER_SLOTS || self.moves[slot].is_some() {
            return;
        }
        let Some(scene) = self.scene.as_ref() else {
            return;
        };
        self.moves[slot] = Some(MoveSession {
            start_controller_pos: self.controllers[slot].position,
            start_root_pos: scene.nodes[scene.root].translation,
        });
        debug!(slot, "move session started");
    }

    /// One-shot placement in front of the viewer. The pending flag is
    /// only consumed once a model exists; it survives empty frames.
    fn apply_placement(&mut self) {
        if !self.place_pending {
            return;
        }
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let forward = self.head_rotation * Vec3::Z;
        let root = scene.root;
        scene.nodes[root].translation = self.head_position
            + forward * self.config.place_forward
            - Vec3::new(0.0, self.config.place_drop, 0.0);
        // Yaw only; the model stays upright whatever the head does
        let yaw = forward.x.atan2(forward.z);
        scene.nodes[root].rotation = Quat::from_rotation_y(yaw);
        self.place_pending = false;
        scene.update_world_transforms();
        debug!("model placed in front of viewer");
    }

    fn update_hover(&mut self) {
        for slot in 0..CONTROLLER_SLOTS {
            self.hover[slot] = None;
            self.ray_lengths[slot] = self.config.ray_length;
            let Some(scene) = self.scene.as_ref() else {
                continue;
            };
            let controller = self.controllers[slot];
            if !controller.connected {
                continue;
            }
            let ray = raycast::controller_ray(&controller);
            if let Some(hit) = raycast::pick(scene, &ray) {
                self.ray_lengths[slot] = hit.distance;
                self.hover[slot] = resolver::resolve(scene, hit.node, hit.point);
            }
        }
    }

    fn integrate_moves(&mut self) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        for slot in 0..CONTROLLER_SLOTS {
            let Some(session) = self.moves[slot] else {
                continue;
            };
            let delta = self.controllers[slot].position - session.start_controller_pos;
            let root = scene.root;
            scene.nodes[root].translation = session.start_root_pos + delta;
        }
    }

    fn integrate_drags(&mut self) {
        let boost = self.config.rotation_boost;
        let limit = self.config.rotation_limit;
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        for slot in 0..CONTROLLER_SLOTS {
            let Some(session) = self.drags[slot] else {
                continue;
            };
            let delta = self.controllers[slot].position - session.start_controller_pos;
            let rx = (session.start_rotation_x + delta.y * boost).clamp(-limit, limit);
            let ry = if session.allow_yaw {
                (session.start_rotation_y + delta.x * boost).clamp(-limit, limit)
            } else {
                session.start_rotation_y
            };
            scene.nodes[session.target].rotation =
                Quat::from_euler(EulerRot::XYZ, rx, ry, session.start_rotation_z);
        }
    }
}
