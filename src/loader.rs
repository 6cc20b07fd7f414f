// src/loader.rs
use crate::mesh::TriMesh;
use crate::scene::{ModelScene, Node, Skin};
use glam::{Mat4, Quat, Vec3};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("glTF parse failed: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("model contains no triangle geometry")]
    EmptyModel,
}

/// Build a scene from an in-memory GLB. import_slice reads straight from
/// the byte slice, so no filesystem is needed under wasm.
pub fn load_glb(glb_data: &[u8]) -> Result<ModelScene, LoadError> {
    let (document, buffers, _images) = gltf::import_slice(glb_data)?;

    let mut scene = ModelScene::new("model");
    // root(0) -> content(1): 正規化用のピボット。ルートは設置・移動が
    // 書き換えるので、スケール調整はこのノードに入れる。
    let content = scene.add_node(scene.root, Node::named("content"));
    let base = scene.nodes.len(); // glTF node i = arena i + base

    // --- Meshes ---
    // glTF mesh 1つにつき全プリミティブを1枚の TriMesh へ統合する
    let mut mesh_map: Vec<Option<usize>> = vec![None; document.meshes().len()];
    for mesh in document.meshes() {
        let mut tri = TriMesh::new();
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<Vec3> = reader
                .read_positions()
                .map(|iter| iter.map(Vec3::from).collect())
                .unwrap_or_default();
            if positions.is_empty() {
                continue;
            }
            let vertex_count = positions.len();
            let offset = tri.positions.len() as u32;
            tri.positions.extend(positions);

            let indices: Vec<u32> = reader
                .read_indices()
                .map(|iter| iter.into_u32().collect())
                .unwrap_or_else(|| (0..vertex_count as u32).collect());
            for chunk in indices.chunks(3) {
                if chunk.len() == 3 {
                    tri.push_triangle(chunk[0] + offset, chunk[1] + offset, chunk[2] + offset);
                }
            }
        }
        if !tri.indices.is_empty() {
            mesh_map[mesh.index()] = Some(scene.add_mesh(tri));
        }
    }
    if scene.meshes.is_empty() {
        return Err(LoadError::EmptyModel);
    }

    // --- Nodes ---
    // まず glTF の並び順のまま平らに積む (arena index = base + glTF index)。
    // 親子はこの後で配線する。
    for node in document.nodes() {
        let (t, r, s) = node.transform().decomposed();
        let mut n = Node::named(node.name().unwrap_or("node"));
        n.translation = Vec3::from(t);
        n.rotation = Quat::from_array(r);
        n.scale = Vec3::from(s);
        n.mesh = node.mesh().and_then(|m| mesh_map[m.index()]);
        n.skin = node.skin().map(|s| s.index());
        scene.nodes.push(n);
    }
    for node in document.nodes() {
        let parent = base + node.index();
        for child in node.children() {
            let child = base + child.index();
            scene.nodes[child].parent_index = Some(parent);
            scene.nodes[parent].children_indices.push(child);
        }
    }
    // Scene roots hang off the content pivot
    let gltf_scene = document
        .default_scene()
        .or_else(|| document.scenes().next());
    if let Some(gltf_scene) = gltf_scene {
        for node in gltf_scene.nodes() {
            let index = base + node.index();
            scene.nodes[index].parent_index = Some(content);
            scene.nodes[content].children_indices.push(index);
        }
    }

    // --- Skins ---
    for skin in document.skins() {
        let joints: Vec<usize> = skin.joints().map(|j| base + j.index()).collect();
        for &j in &joints {
            scene.nodes[j].is_bone = true;
        }
        let reader = skin.reader(|buffer| Some(&buffers[buffer.index()]));
        let inverse_bind_matrices: Vec<Mat4> = reader
            .read_inverse_bind_matrices()
            .map(|iter| iter.map(|m| Mat4::from_cols_array_2d(&m)).collect())
            .unwrap_or_else(|| vec![Mat4::IDENTITY; joints.len()]);
        scene.skins.push(Skin {
            joints,
            inverse_bind_matrices,
        });
    }

    scene.normalize_into(content);
    scene.prepare();

    info!(
        nodes = scene.nodes.len(),
        meshes = scene.meshes.len(),
        skins = scene.skins.len(),
        "glTF model loaded"
    );
    Ok(scene)
}
