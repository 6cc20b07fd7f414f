// src/scene/procedural.rs
use super::{helpers, ModelScene, Node, Skin};
use crate::mesh::TriMesh;
use glam::{vec3, Vec3};

fn bone(name: &str, translation: Vec3) -> Node {
    Node {
        translation,
        is_bone: true,
        ..Node::named(name)
    }
}

fn attach_segment(scene: &mut ModelScene, parent: usize, name: &str, size: Vec3, center: Vec3) {
    let mut m = TriMesh::new();
    helpers::add_box(&mut m, size, center);
    let mesh = scene.add_mesh(m);
    let node = scene.add_node(parent, Node::named(name));
    scene.nodes[node].mesh = Some(mesh);
}

// --- 1. Segmented mannequin ---
//
// 各ボーンに箱メッシュをぶら下げた組み立て済みの人形。スキンを持たない
// モデルの代表例で、ドラッグ対象は祖先ボーンから解決される。
pub fn create_mannequin() -> ModelScene {
    let mut scene = ModelScene::new("mannequin");
    let root = scene.root;

    let pelvis = scene.add_node(root, bone("pelvis", vec3(0.0, 0.95, 0.0)));
    let spine = scene.add_node(pelvis, bone("spine", vec3(0.0, 0.22, 0.0)));
    let chest = scene.add_node(spine, bone("chest", vec3(0.0, 0.22, 0.0)));
    let head = scene.add_node(chest, bone("head", vec3(0.0, 0.3, 0.0)));

    attach_segment(&mut scene, pelvis, "hips_mesh", vec3(0.32, 0.2, 0.18), vec3(0.0, 0.05, 0.0));
    attach_segment(&mut scene, spine, "belly_mesh", vec3(0.28, 0.22, 0.16), vec3(0.0, 0.1, 0.0));
    attach_segment(&mut scene, chest, "chest_mesh", vec3(0.32, 0.26, 0.18), vec3(0.0, 0.12, 0.0));
    attach_segment(&mut scene, head, "head_mesh", vec3(0.18, 0.22, 0.2), vec3(0.0, 0.1, 0.0));

    for side in [-1.0f32, 1.0] {
        let tag = if side < 0.0 { "l" } else { "r" };

        let shoulder = scene.add_node(
            chest,
            bone(&format!("shoulder_{tag}"), vec3(side * 0.22, 0.2, 0.0)),
        );
        let elbow = scene.add_node(
            shoulder,
            bone(&format!("elbow_{tag}"), vec3(side * 0.28, 0.0, 0.0)),
        );
        let wrist = scene.add_node(
            elbow,
            bone(&format!("wrist_{tag}"), vec3(side * 0.26, 0.0, 0.0)),
        );
        attach_segment(
            &mut scene,
            shoulder,
            &format!("upper_arm_mesh_{tag}"),
            vec3(0.26, 0.1, 0.1),
            vec3(side * 0.14, 0.0, 0.0),
        );
        attach_segment(
            &mut scene,
            elbow,
            &format!("forearm_mesh_{tag}"),
            vec3(0.24, 0.09, 0.09),
            vec3(side * 0.13, 0.0, 0.0),
        );
        attach_segment(
            &mut scene,
            wrist,
            &format!("hand_mesh_{tag}"),
            vec3(0.12, 0.08, 0.05),
            vec3(side * 0.06, 0.0, 0.0),
        );

        let hip = scene.add_node(
            pelvis,
            bone(&format!("hip_{tag}"), vec3(side * 0.1, -0.05, 0.0)),
        );
        let knee = scene.add_node(hip, bone(&format!("knee_{tag}"), vec3(0.0, -0.42, 0.0)));
        let ankle = scene.add_node(knee, bone(&format!("ankle_{tag}"), vec3(0.0, -0.4, 0.0)));
        attach_segment(
            &mut scene,
            hip,
            &format!("thigh_mesh_{tag}"),
            vec3(0.13, 0.4, 0.13),
            vec3(0.0, -0.21, 0.0),
        );
        attach_segment(
            &mut scene,
            knee,
            &format!("shin_mesh_{tag}"),
            vec3(0.11, 0.38, 0.11),
            vec3(0.0, -0.2, 0.0),
        );
        attach_segment(
            &mut scene,
            ankle,
            &format!("foot_mesh_{tag}"),
            vec3(0.1, 0.08, 0.22),
            vec3(0.0, -0.04, 0.05),
        );
    }

    scene.prepare();
    scene
}

// --- 2. Skinned arm ---
//
// 1枚のメッシュが3本のボーンに追従する最小のスキニング例。
// ヒットしたメッシュから最寄りボーンを探す経路を通す。
pub fn create_skinned_arm() -> ModelScene {
    let mut scene = ModelScene::new("skinned-arm");
    let root = scene.root;

    let shoulder = scene.add_node(root, bone("shoulder", vec3(0.0, 1.2, 0.0)));
    let elbow = scene.add_node(shoulder, bone("elbow", vec3(0.3, 0.0, 0.0)));
    let wrist = scene.add_node(elbow, bone("wrist", vec3(0.3, 0.0, 0.0)));

    scene.update_world_transforms();
    let skin = Skin {
        joints: vec![shoulder, elbow, wrist],
        inverse_bind_matrices: vec![
            scene.nodes[shoulder].global_transform.inverse(),
            scene.nodes[elbow].global_transform.inverse(),
            scene.nodes[wrist].global_transform.inverse(),
        ],
    };
    scene.skins.push(skin);

    let mut m = TriMesh::new();
    helpers::add_box(&mut m, vec3(0.7, 0.14, 0.14), vec3(0.3, 1.2, 0.0));
    let mesh = scene.add_mesh(m);
    let arm = scene.add_node(root, Node::named("arm_mesh"));
    scene.nodes[arm].mesh = Some(mesh);
    scene.nodes[arm].skin = Some(0);

    scene.prepare();
    scene
}
