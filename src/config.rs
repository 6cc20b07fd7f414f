// src/config.rs
use serde::Deserialize;
use std::f32::consts::PI;

/// Interaction tuning. All fields have working defaults; hosts may
/// override any subset through a JSON blob at construction.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Meters of hand travel -> radians of joint rotation.
    pub rotation_boost: f32,
    /// Joint rotation saturates at ±this (radians).
    pub rotation_limit: f32,
    /// Placement: distance in front of the viewer head.
    pub place_forward: f32,
    /// Placement: drop below head height.
    pub place_drop: f32,
    /// Pointer ray length when nothing is hit.
    pub ray_length: f32,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            rotation_boost: 6.5,
            rotation_limit: 0.95 * PI,
            place_forward: 1.0,
            place_drop: 0.35,
            ray_length: 5.0,
        }
    }
}

impl StageConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
