// src/interaction.rs
use glam::{Quat, Vec3};

pub const CONTROLLER_SLOTS: usize = 2;

// --- Controllers ---

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Handedness {
    #[default]
    Unknown,
    Left,
    Right,
}

impl Handedness {
    pub fn from_str(s: &str) -> Self {
        match s {
            "left" => Self::Left,
            "right" => Self::Right,
            _ => Self::Unknown,
        }
    }
}

/// One tracked controller slot. The pose is fed in every frame by the
/// platform layer; handedness arrives asynchronously with the connect
/// event.
#[derive(Clone, Copy, Debug)]
pub struct Controller {
    pub connected: bool,
    pub handedness: Handedness,
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Controller {
    fn default() -> Self {
        Self {
            connected: false,
            handedness: Handedness::Unknown,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

// --- Sessions ---

/// Live state of one controller rotating one joint. Snapshot taken at
/// select-start; the per-frame integration works from the snapshot, so
/// there is no incremental drift.
#[derive(Clone, Copy, Debug)]
pub struct DragSession {
    pub target: usize,
    pub start_controller_pos: Vec3,
    pub start_rotation_x: f32,
    pub start_rotation_y: f32,
    pub start_rotation_z: f32,
    /// Yaw is only driven by the left-hand controller.
    pub allow_yaw: bool,
}

/// Live state of one controller translating the whole model.
#[derive(Clone, Copy, Debug)]
pub struct MoveSession {
    pub start_controller_pos: Vec3,
    pub start_root_pos: Vec3,
}

// --- Platform events ---

/// Discrete input events from the XR layer. They are queued into the
/// engine's inbox and drained at the start of the frame tick, so event
/// handling never interleaves with a half-applied frame update.
#[derive(Clone, Copy, Debug)]
pub enum StageEvent {
    Connected { slot: usize, handedness: Handedness },
    Disconnected { slot: usize },
    SelectStart { slot: usize },
    SelectEnd { slot: usize },
    SqueezeStart { slot: usize },
    SqueezeEnd { slot: usize },
    SessionStart,
}

// --- Feedback ---

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GizmoMode {
    #[default]
    None,
    Rotate,
    Move,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handedness_parses_platform_strings() {
        assert_eq!(Handedness::from_str("left"), Handedness::Left);
        assert_eq!(Handedness::from_str("right"), Handedness::Right);
        assert_eq!(Handedness::from_str("none"), Handedness::Unknown);
        assert_eq!(Handedness::from_str(""), Handedness::Unknown);
    }
}
