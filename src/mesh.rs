// src/mesh.rs
use crate::primitives::Aabb;
use glam::Vec3;

/// Triangulated pickable geometry, in the owning node's local space.
#[derive(Clone, Debug, Default)]
pub struct TriMesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl TriMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_vertex(&mut self, v: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(v);
        index
    }

    pub fn push_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertices of triangle `tri` (index triple tri*3..).
    pub fn triangle(&self, tri: usize) -> (Vec3, Vec3, Vec3) {
        let base = tri * 3;
        (
            self.positions[self.indices[base] as usize],
            self.positions[self.indices[base + 1] as usize],
            self.positions[self.indices[base + 2] as usize],
        )
    }

    pub fn bounds(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        for v in &self.positions {
            aabb.grow(*v);
        }
        aabb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec3;

    #[test]
    fn bounds_cover_all_vertices() {
        let mut mesh = TriMesh::new();
        let a = mesh.push_vertex(vec3(-1.0, 0.0, 0.0));
        let b = mesh.push_vertex(vec3(2.0, 3.0, -4.0));
        let c = mesh.push_vertex(vec3(0.0, -1.0, 1.0));
        mesh.push_triangle(a, b, c);

        let bounds = mesh.bounds();
        assert_eq!(bounds.min, vec3(-1.0, -1.0, -4.0));
        assert_eq!(bounds.max, vec3(2.0, 3.0, 1.0));
        assert_eq!(mesh.triangle_count(), 1);
    }
}
