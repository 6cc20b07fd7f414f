// src/scene/helpers.rs
use crate::mesh::TriMesh;
use glam::{vec3, Vec3};

pub fn add_quad(mesh: &mut TriMesh, a: Vec3, b: Vec3, c: Vec3, d: Vec3) {
    let i0 = mesh.push_vertex(a);
    let i1 = mesh.push_vertex(b);
    let i2 = mesh.push_vertex(c);
    let i3 = mesh.push_vertex(d);
    mesh.push_triangle(i0, i1, i2);
    mesh.push_triangle(i0, i2, i3);
}

pub fn add_box(mesh: &mut TriMesh, size: Vec3, center: Vec3) {
    let dx = vec3(size.x / 2.0, 0.0, 0.0);
    let dy = vec3(0.0, size.y / 2.0, 0.0);
    let dz = vec3(0.0, 0.0, size.z / 2.0);
    let c = center;

    // Front
    add_quad(mesh, c - dx - dy + dz, c + dx - dy + dz, c + dx + dy + dz, c - dx + dy + dz);
    // Back
    add_quad(mesh, c + dx - dy - dz, c - dx - dy - dz, c - dx + dy - dz, c + dx + dy - dz);
    // Top
    add_quad(mesh, c - dx + dy + dz, c + dx + dy + dz, c + dx + dy - dz, c - dx + dy - dz);
    // Bottom
    add_quad(mesh, c - dx - dy - dz, c + dx - dy - dz, c + dx - dy + dz, c - dx - dy + dz);
    // Right
    add_quad(mesh, c + dx - dy + dz, c + dx - dy - dz, c + dx + dy - dz, c + dx + dy + dz);
    // Left
    add_quad(mesh, c - dx - dy - dz, c - dx - dy + dz, c - dx + dy + dz, c - dx + dy - dz);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_has_twelve_triangles() {
        let mut mesh = TriMesh::new();
        add_box(&mut mesh, vec3(2.0, 2.0, 2.0), Vec3::ZERO);
        assert_eq!(mesh.triangle_count(), 12);
        let bounds = mesh.bounds();
        assert_eq!(bounds.min, vec3(-1.0, -1.0, -1.0));
        assert_eq!(bounds.max, vec3(1.0, 1.0, 1.0));
    }
}
