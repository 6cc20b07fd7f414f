// src/raycast.rs
use crate::interaction::Controller;
use crate::primitives::Ray;
use crate::scene::ModelScene;
use glam::Vec3;

/// Nearest intersection between a pointer ray and the pickable surfaces.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    pub node: usize,
    pub point: Vec3,
    pub distance: f32,
}

pub fn controller_ray(controller: &Controller) -> Ray {
    Ray::from_pose(controller.position, controller.rotation)
}

/// Cast against every pickable surface of the scene and keep the nearest
/// hit. Pure query. Surfaces are tested in their own space (ray taken
/// through the inverse world transform), so node scaling is free; the
/// winner is chosen by world-space distance.
pub fn pick(scene: &ModelScene, ray: &Ray) -> Option<RayHit> {
    if scene.pickables.is_empty() {
        return None;
    }

    let mut best: Option<RayHit> = None;
    for &node_index in &scene.pickables {
        let node = &scene.nodes[node_index];
        let Some(mesh_index) = node.mesh else {
            continue;
        };
        let inverse = node.global_transform.inverse();
        let local_ray = ray.transform(inverse);

        let Some(t) = scene.bvhs[mesh_index].intersect(&scene.meshes[mesh_index], &local_ray)
        else {
            continue;
        };
        let world_point = node.global_transform.transform_point3(local_ray.at(t));
        let distance = (world_point - ray.origin).length();
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(RayHit {
                node: node_index,
                point: world_point,
                distance,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::TriMesh;
    use crate::scene::{helpers, Node};
    use glam::{vec3, Quat};

    fn scene_with_two_boxes() -> (ModelScene, usize, usize) {
        let mut scene = ModelScene::new("two-boxes");
        let mesh = {
            let mut m = TriMesh::new();
            helpers::add_box(&mut m, vec3(0.5, 0.5, 0.5), Vec3::ZERO);
            scene.add_mesh(m)
        };
        let near = scene.add_node(scene.root, Node::named("near"));
        scene.nodes[near].mesh = Some(mesh);
        scene.nodes[near].translation = vec3(0.0, 0.0, -1.0);
        let far = scene.add_node(scene.root, Node::named("far"));
        scene.nodes[far].mesh = Some(mesh);
        scene.nodes[far].translation = vec3(0.0, 0.0, -3.0);
        scene.nodes[far].scale = Vec3::splat(2.0); // wider than the near box
        scene.prepare();
        (scene, near, far)
    }

    #[test]
    fn nearest_surface_wins() {
        let (scene, near, _far) = scene_with_two_boxes();
        let ray = Ray::new(Vec3::ZERO, vec3(0.0, 0.0, -1.0));
        let hit = pick(&scene, &ray).expect("should hit");
        assert_eq!(hit.node, near);
        assert!((hit.distance - 0.75).abs() < 1e-4, "distance={}", hit.distance);
        assert!((hit.point - vec3(0.0, 0.0, -0.75)).length() < 1e-4);
    }

    #[test]
    fn ray_past_the_near_box_reaches_the_far_one() {
        let (scene, _near, far) = scene_with_two_boxes();
        // Offset sideways so the small near box is missed
        let ray = Ray::new(vec3(0.35, 0.0, 0.0), vec3(0.0, 0.0, -1.0));
        let hit = pick(&scene, &ray).expect("should hit far box");
        assert_eq!(hit.node, far);
    }

    #[test]
    fn empty_scene_short_circuits() {
        let mut scene = ModelScene::new("empty");
        scene.prepare();
        let ray = Ray::new(Vec3::ZERO, vec3(0.0, 0.0, -1.0));
        assert!(pick(&scene, &ray).is_none());
    }

    #[test]
    fn scaled_surfaces_report_world_distance() {
        let mut scene = ModelScene::new("scaled");
        let mesh = {
            let mut m = TriMesh::new();
            helpers::add_box(&mut m, vec3(1.0, 1.0, 1.0), Vec3::ZERO);
            scene.add_mesh(m)
        };
        let n = scene.add_node(scene.root, Node::named("big"));
        scene.nodes[n].mesh = Some(mesh);
        scene.nodes[n].translation = vec3(0.0, 0.0, -4.0);
        scene.nodes[n].scale = Vec3::splat(4.0); // world half-extent 2
        scene.prepare();

        let ray = Ray::new(Vec3::ZERO, vec3(0.0, 0.0, -1.0));
        let hit = pick(&scene, &ray).expect("should hit");
        assert!((hit.distance - 2.0).abs() < 1e-4, "distance={}", hit.distance);
    }

    #[test]
    fn controller_ray_follows_the_grip() {
        let ctrl = Controller {
            connected: true,
            position: vec3(1.0, 1.0, 1.0),
            rotation: Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
            ..Default::default()
        };
        let ray = controller_ray(&ctrl);
        assert!((ray.origin - vec3(1.0, 1.0, 1.0)).length() < 1e-6);
        // -90 deg pitch points the -Z forward axis straight down
        assert!((ray.direction - vec3(0.0, -1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn nested_child_surfaces_are_found() {
        let mut scene = ModelScene::new("nested");
        let mesh = {
            let mut m = TriMesh::new();
            helpers::add_box(&mut m, vec3(0.5, 0.5, 0.5), Vec3::ZERO);
            scene.add_mesh(m)
        };
        let outer = scene.add_node(scene.root, Node::named("outer"));
        scene.nodes[outer].mesh = Some(mesh);
        scene.nodes[outer].translation = vec3(0.0, 0.0, -1.0);
        // Pickable child nested inside another pickable surface
        let inner = scene.add_node(outer, Node::named("inner"));
        scene.nodes[inner].mesh = Some(mesh);
        scene.nodes[inner].translation = vec3(2.0, 0.0, 0.0);
        scene.prepare();

        let ray = Ray::new(vec3(2.0, 0.0, 0.0), vec3(0.0, 0.0, -1.0));
        let hit = pick(&scene, &ray).expect("should hit nested child");
        assert_eq!(hit.node, inner);
    }
}
