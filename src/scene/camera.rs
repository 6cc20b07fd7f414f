// src/scene/camera.rs
use glam::{vec3, Vec3};

/// Preview camera for the non-XR model selection screen. Inside an XR
/// session the headset owns the view; this only frames the model while
/// browsing.
#[derive(Clone, Copy, Debug)]
pub struct CameraConfig {
    pub lookfrom: Vec3,
    pub lookat: Vec3,
    pub vup: Vec3,
    pub vfov: f32,
}

impl CameraConfig {
    /// Fit the whole focus sphere into the vertical field of view,
    /// looking slightly down from the front.
    pub fn frame_to(center: Vec3, radius: f32) -> Self {
        let vfov: f32 = 45.0;
        let dist = radius / (vfov.to_radians() / 2.0).sin();
        Self {
            lookfrom: center + vec3(0.0, radius * 0.25, dist),
            lookat: center,
            vup: vec3(0.0, 1.0, 0.0),
            vfov,
        }
    }

    /// Flat buffer for the host renderer:
    /// [eye, lower_left, horizontal, vertical] as vec4 rows.
    pub fn create_buffer(&self, aspect_ratio: f32) -> [f32; 16] {
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let focus_dist = (self.lookfrom - self.lookat).length();
        let viewport_height = 2.0 * h * focus_dist;
        let viewport_width = viewport_height * aspect_ratio;

        let w = (self.lookfrom - self.lookat).normalize();
        let u = self.vup.cross(w).normalize();
        let v = w.cross(u);

        let horizontal = u * viewport_width;
        let vertical = v * viewport_height;
        let lower_left = self.lookfrom - horizontal * 0.5 - vertical * 0.5 - w * focus_dist;

        [
            self.lookfrom.x,
            self.lookfrom.y,
            self.lookfrom.z,
            0.0,
            lower_left.x,
            lower_left.y,
            lower_left.z,
            0.0,
            horizontal.x,
            horizontal.y,
            horizontal.z,
            0.0,
            vertical.x,
            vertical.y,
            vertical.z,
            0.0,
        ]
    }
}
