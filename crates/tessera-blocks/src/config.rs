use serde::Deserialize;
use std::collections::HashMap;

// Top-level textures file
#[derive(Deserialize, Debug, Default)]
pub struct TexturesConfig {
    #[serde(default)]
    pub textures: HashMap<String, TextureEntry>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum TextureEntry {
    // Simple: stone = "#7f7f7f"
    Hex(String),
    // Detailed: water_still = { color = "#3f76e4", alpha = 0.7 }
    Detail {
        color: String,
        #[serde(default)]
        alpha: Option<f32>,
    },
}

// Top-level models file, keyed by block id
#[derive(Deserialize, Debug, Default)]
pub struct ModelsConfig {
    #[serde(default)]
    pub blocks: HashMap<String, BlockModelDef>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct BlockModelDef {
    #[serde(default)]
    pub model: ModelKind,
    // Slot name -> texture name (`all`, `top`, `bottom`, `side`, `still`, `flow`, ...)
    #[serde(default)]
    pub textures: HashMap<String, String>,
    #[serde(default)]
    pub elements: Vec<ElementDef>,
    // Apply the biome tint to every face of a builtin cube
    #[serde(default)]
    pub tint: bool,
    // Property overrides; absent values use the defaults for the block state
    #[serde(default)]
    pub culling: Option<bool>,
    #[serde(default)]
    pub occluding: Option<bool>,
    #[serde(default)]
    pub always_waterlogged: Option<bool>,
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    #[default]
    Cube,
    Liquid,
    Elements,
    None,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ElementDef {
    pub from: [f32; 3],
    pub to: [f32; 3],
    #[serde(default)]
    pub faces: HashMap<crate::face::Face, ElementFaceDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ElementFaceDef {
    // `#slot` refers to the model's texture slots, anything else is a texture name
    pub texture: String,
    #[serde(default)]
    pub cullface: Option<crate::face::Face>,
    #[serde(default)]
    pub tint: bool,
}
