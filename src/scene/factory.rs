// src/scene/factory.rs
use super::{procedural, ModelScene};
use crate::loader::{self, LoadError};

/// Resolve a model identifier. Binary model data wins when supplied;
/// otherwise the id picks one of the built-in figures.
pub fn get_model(model_id: &str, glb_data: Option<&[u8]>) -> Result<ModelScene, LoadError> {
    if let Some(data) = glb_data {
        let mut scene = loader::load_glb(data)?;
        scene.name = model_id.to_string();
        return Ok(scene);
    }
    Ok(match model_id {
        "skinned-arm" => procedural::create_skinned_arm(),
        "mannequin" | _ => procedural::create_mannequin(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_fall_back_to_the_mannequin() {
        let scene = get_model("no-such-model", None).expect("built-ins never fail");
        assert_eq!(scene.name, "mannequin");
    }
}
