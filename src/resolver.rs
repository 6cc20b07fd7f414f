// src/resolver.rs
use crate::scene::ModelScene;
use glam::Vec3;

/// Map a raw pick (node + world hit point) to the joint the user meant
/// to grab, or None when nothing eligible is under the ray.
///
/// A skinned surface usually spans many bones, so the hit geometry says
/// little by itself; there the nearest eligible bone to the hit point
/// wins. Rigid models resolve through the ancestor chain instead.
pub fn resolve(scene: &ModelScene, hit_node: usize, hit_point: Vec3) -> Option<usize> {
    // 1. Skinned surface: nearest eligible bone by squared distance.
    if let Some(skin_index) = scene.nodes[hit_node].skin {
        if let Some(skin) = scene.skins.get(skin_index) {
            let mut best: Option<(usize, f32)> = None;
            for &joint in &skin.joints {
                if !scene.rotatables.contains(&joint) {
                    continue;
                }
                let d = scene.world_position(joint).distance_squared(hit_point);
                if best.map_or(true, |(_, bd)| d < bd) {
                    best = Some((joint, d));
                }
            }
            if let Some((joint, _)) = best {
                return Some(joint);
            }
        }
    }

    // 2. Ancestor chain (inclusive of the hit node, stopping before the
    //    model root): first member wins.
    let mut cursor = Some(hit_node);
    while let Some(i) = cursor {
        if i == scene.root {
            break;
        }
        if scene.rotatables.contains(&i) {
            return Some(i);
        }
        cursor = scene.nodes[i].parent_index;
    }

    // 3. Structural fallback: the first ancestor that is a bone or a
    //    non-mesh node (skipping mesh wrapper chains), taken only if it
    //    is itself a member.
    let mut cursor = Some(hit_node);
    while let Some(i) = cursor {
        if i == scene.root {
            break;
        }
        let n = &scene.nodes[i];
        if n.is_bone || n.mesh.is_none() {
            return scene.rotatables.contains(&i).then_some(i);
        }
        cursor = n.parent_index;
    }

    None
}
