use tessera_blocks::{BlockState, Face, ModelCatalog, ModelKind, TextureCatalog};

const TEXTURES: &str = r##"
[textures]
stone = "#808080"
grass_top = "#5d9b3a"
dirt = "#866043"
water_still = { color = "#3f76e4", alpha = 0.5 }
water_flow = { color = "#3f76e4", alpha = 0.5 }
"##;

const MODELS: &str = r##"
[blocks.stone]
textures = { all = "stone" }

[blocks.grass_block]
textures = { top = "grass_top", bottom = "dirt", side = "#bottom" }
tint = true

[blocks.water]
model = "liquid"
textures = { still = "water_still", flow = "water_flow" }

[blocks.glass]
textures = { all = "stone" }
occluding = false

[blocks.slab]
model = "elements"
textures = { top = "stone" }

[[blocks.slab.elements]]
from = [0, 0, 0]
to = [16, 8, 16]
faces.up = { texture = "#top" }
faces.down = { texture = "#top", cullface = "down" }
faces.north = { texture = "nonexistent", cullface = "north" }
"##;

fn catalog() -> ModelCatalog {
    let textures = TextureCatalog::from_toml_str(TEXTURES).expect("textures");
    ModelCatalog::from_toml_str(textures, MODELS).expect("models")
}

#[test]
fn texture_ids_are_sorted_after_missing() {
    let t = TextureCatalog::from_toml_str(TEXTURES).unwrap();
    assert_eq!(t.get(0).unwrap().name, "missing");
    let names: Vec<&str> = t.textures.iter().skip(1).map(|t| t.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert_eq!(t.texture_or_missing("nope").id, 0);
}

#[test]
fn texture_colors_are_premultiplied() {
    let t = TextureCatalog::from_toml_str(TEXTURES).unwrap();
    let water = &t.texture("water_still").unwrap().color;
    assert!(water.premultiplied);
    assert!((water.a - 0.5).abs() < 1e-6);
    assert!((water.b - (0xe4 as f32 / 255.0) * 0.5).abs() < 1e-5);
}

#[test]
fn invalid_texture_color_is_an_error() {
    assert!(TextureCatalog::from_toml_str("[textures]\nbad = \"#zz0000\"").is_err());
    assert!(TextureCatalog::from_toml_str("[textures\n").is_err());
}

#[test]
fn cube_faces_resolve_slots() {
    let c = catalog();
    let grass = c.model_for(&BlockState::new("grass_block"));
    assert_eq!(grass.kind, ModelKind::Cube);
    let el = &grass.elements[0];
    assert_eq!(el.face(Face::PosY).unwrap().texture.name, "grass_top");
    assert_eq!(el.face(Face::NegY).unwrap().texture.name, "dirt");
    assert_eq!(el.face(Face::NegZ).unwrap().texture.name, "dirt");
    assert!(el.face(Face::PosX).unwrap().tint);
    assert_eq!(el.face(Face::PosX).unwrap().cullface, Some(Face::PosX));
}

#[test]
fn element_models_resolve_references() {
    let c = catalog();
    let slab = c.model_for(&BlockState::new("slab"));
    assert_eq!(slab.elements.len(), 1);
    let el = &slab.elements[0];
    assert_eq!(el.to.y, 8.0);
    assert_eq!(el.face(Face::PosY).unwrap().texture.name, "stone");
    assert_eq!(el.face(Face::PosY).unwrap().cullface, None);
    assert_eq!(el.face(Face::NegZ).unwrap().texture.id, 0);
    assert!(el.face(Face::PosX).is_none());
}

#[test]
fn liquid_model_has_still_and_flow() {
    let c = catalog();
    let water = c.model_for(&BlockState::with_properties("water", [("level", "3")]));
    assert!(water.is_liquid());
    assert_eq!(water.still.name, "water_still");
    assert_eq!(water.flow.name, "water_flow");
}

#[test]
fn unknown_blocks_fall_back() {
    let c = catalog();
    assert!(c.model_for(BlockState::air()).is_empty());
    let unknown = c.model_for(&BlockState::new("mystery"));
    assert_eq!(unknown.kind, ModelKind::Cube);
    assert_eq!(unknown.elements[0].face(Face::PosY).unwrap().texture.id, 0);
    // No entry for lava: default liquid textures, which are missing here.
    let lava = c.model_for(&BlockState::new("lava"));
    assert!(lava.is_liquid());
    assert_eq!(lava.still.id, 0);
}

#[test]
fn property_overrides_apply() {
    let c = catalog();
    let glass = c.properties_for(&BlockState::new("glass"));
    assert!(glass.culling);
    assert!(!glass.occluding);
    assert!(c.properties_for(&BlockState::new("stone")).occluding);
    assert!(!c.properties_for(BlockState::water()).culling);
}

#[test]
fn element_model_without_elements_is_rejected() {
    let textures = TextureCatalog::new();
    let err = ModelCatalog::from_toml_str(textures, "[blocks.x]\nmodel = \"elements\"\n");
    assert!(err.is_err());
}

#[test]
fn inverted_element_bounds_are_rejected() {
    let textures = TextureCatalog::new();
    let toml = r#"
[blocks.x]
model = "elements"
[[blocks.x.elements]]
from = [0, 8, 0]
to = [16, 4, 16]
"#;
    assert!(ModelCatalog::from_toml_str(textures, toml).is_err());
}
