// src/primitives.rs
use glam::{Mat4, Quat, Vec3};

// --- AABB ---

#[derive(Clone, Copy, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn grow(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    // 表面積 (SAH用)
    pub fn area(&self) -> f32 {
        let d = self.max - self.min;
        if d.x < 0.0 || d.y < 0.0 || d.z < 0.0 {
            0.0
        } else {
            2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
        }
    }

    // ワールド変換後のAABB (8頂点を変換して包み直す)
    pub fn transform(&self, m: Mat4) -> Aabb {
        if self.is_empty() {
            return Self::empty();
        }
        let mut out = Self::empty();
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            out.grow(m.transform_point3(corner));
        }
        out
    }

    /// Slab test. Returns the entry distance along the ray, or None.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv = ray.direction.recip();
        let t0 = (self.min - ray.origin) * inv;
        let t1 = (self.max - ray.origin) * inv;
        let t_min = t0.min(t1);
        let t_max = t0.max(t1);
        let near = t_min.x.max(t_min.y).max(t_min.z);
        let far = t_max.x.min(t_max.y).min(t_max.z);
        if near <= far && far >= 0.0 {
            Some(near.max(0.0))
        } else {
            None
        }
    }
}

// --- Ray ---

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Controller poses point down their local -Z axis.
    pub fn from_pose(position: Vec3, rotation: Quat) -> Self {
        Self::new(position, rotation * Vec3::NEG_Z)
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Ray re-expressed in another space. The direction is left
    /// unnormalized so t keeps the same parameterization.
    pub fn transform(&self, m: Mat4) -> Ray {
        Ray {
            origin: m.transform_point3(self.origin),
            direction: m.transform_vector3(self.direction),
        }
    }
}

// --- Ray / triangle ---

/// Moller-Trumbore. Returns t along the ray (direction need not be
/// normalized; t is in units of the direction vector).
pub fn ray_triangle(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPS: f32 = 1e-7;
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let p = ray.direction.cross(e2);
    let det = e1.dot(p);
    if det.abs() < EPS {
        return None; // 平行
    }
    let inv_det = 1.0 / det;
    let s = ray.origin - v0;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    if t > EPS { Some(t) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec3;

    #[test]
    fn aabb_slab_hit_and_miss() {
        let mut aabb = Aabb::empty();
        aabb.grow(vec3(-1.0, -1.0, -1.0));
        aabb.grow(vec3(1.0, 1.0, 1.0));

        let hit = Ray::new(vec3(0.0, 0.0, 5.0), vec3(0.0, 0.0, -1.0));
        let t = aabb.intersect_ray(&hit).expect("should hit");
        assert!((t - 4.0).abs() < 1e-5, "t={t}");

        let miss = Ray::new(vec3(3.0, 0.0, 5.0), vec3(0.0, 0.0, -1.0));
        assert!(aabb.intersect_ray(&miss).is_none());

        // Box entirely behind the origin
        let behind = Ray::new(vec3(0.0, 0.0, -5.0), vec3(0.0, 0.0, -1.0));
        assert!(aabb.intersect_ray(&behind).is_none());
    }

    #[test]
    fn aabb_ray_starting_inside() {
        let mut aabb = Aabb::empty();
        aabb.grow(vec3(-1.0, -1.0, -1.0));
        aabb.grow(vec3(1.0, 1.0, 1.0));
        let ray = Ray::new(Vec3::ZERO, vec3(0.0, 0.0, -1.0));
        assert_eq!(aabb.intersect_ray(&ray), Some(0.0));
    }

    #[test]
    fn triangle_hit() {
        let ray = Ray::new(vec3(0.25, 0.25, 1.0), vec3(0.0, 0.0, -1.0));
        let t = ray_triangle(
            &ray,
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
        )
        .expect("should hit");
        assert!((t - 1.0).abs() < 1e-5);
    }

    #[test]
    fn triangle_miss_outside_and_behind() {
        let outside = Ray::new(vec3(2.0, 2.0, 1.0), vec3(0.0, 0.0, -1.0));
        assert!(ray_triangle(
            &outside,
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
        )
        .is_none());

        let behind = Ray::new(vec3(0.25, 0.25, -1.0), vec3(0.0, 0.0, -1.0));
        assert!(ray_triangle(
            &behind,
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn pose_ray_points_down_neg_z() {
        let ray = Ray::from_pose(vec3(1.0, 2.0, 3.0), Quat::IDENTITY);
        assert!((ray.direction - vec3(0.0, 0.0, -1.0)).length() < 1e-6);

        let turned = Ray::from_pose(Vec3::ZERO, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        // 90 deg yaw turns -Z onto -X
        assert!((turned.direction - vec3(-1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn aabb_transform_covers_rotated_corners() {
        let mut aabb = Aabb::empty();
        aabb.grow(vec3(-1.0, 0.0, -1.0));
        aabb.grow(vec3(1.0, 0.0, 1.0));
        let m = Mat4::from_rotation_y(std::f32::consts::FRAC_PI_4);
        let out = aabb.transform(m);
        let expect = std::f32::consts::SQRT_2;
        assert!((out.max.x - expect).abs() < 1e-4, "max.x={}", out.max.x);
        assert!((out.min.z + expect).abs() < 1e-4);
    }
}
