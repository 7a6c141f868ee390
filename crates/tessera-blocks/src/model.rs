use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use tessera_geom::Vec3;

use super::config::{BlockModelDef, ElementDef, ModelKind, ModelsConfig};
use super::face::Face;
use super::state::{BlockProperties, BlockState};
use super::texture::{Texture, TextureCatalog};

const MAX_SLOT_DEPTH: usize = 8;

/// Unresolved block model as declared in a models file.
#[derive(Clone, Debug, Default)]
pub struct BlockModel {
    pub kind: ModelKind,
    pub textures: HashMap<String, String>,
    pub elements: Vec<ElementDef>,
    pub tint: bool,
    pub culling: Option<bool>,
    pub occluding: Option<bool>,
    pub always_waterlogged: Option<bool>,
}

impl From<BlockModelDef> for BlockModel {
    fn from(def: BlockModelDef) -> Self {
        Self {
            kind: def.model,
            textures: def.textures,
            elements: def.elements,
            tint: def.tint,
            culling: def.culling,
            occluding: def.occluding,
            always_waterlogged: def.always_waterlogged,
        }
    }
}

impl BlockModel {
    pub fn cube(texture: &str) -> Self {
        Self {
            kind: ModelKind::Cube,
            textures: HashMap::from([("all".to_string(), texture.to_string())]),
            ..Default::default()
        }
    }

    pub fn liquid(still: &str, flow: &str) -> Self {
        Self {
            kind: ModelKind::Liquid,
            textures: HashMap::from([
                ("still".to_string(), still.to_string()),
                ("flow".to_string(), flow.to_string()),
            ]),
            ..Default::default()
        }
    }

    /// Follows `#slot` references through the texture slots to a texture name.
    fn slot_texture(&self, slot: &str) -> Option<&str> {
        let mut name = self.textures.get(slot)?.as_str();
        for _ in 0..MAX_SLOT_DEPTH {
            match name.strip_prefix('#') {
                Some(next) => name = self.textures.get(next)?.as_str(),
                None => return Some(name),
            }
        }
        None
    }

    fn resolve_reference<'a>(&self, catalog: &'a TextureCatalog, reference: &str) -> &'a Texture {
        let name = match reference.strip_prefix('#') {
            Some(slot) => self.slot_texture(slot),
            None => Some(reference),
        };
        match name.and_then(|n| catalog.texture(n)) {
            Some(t) => t,
            None => {
                log::warn!("unresolved texture reference '{reference}'");
                catalog.missing()
            }
        }
    }

    fn cube_face_texture<'a>(&self, catalog: &'a TextureCatalog, face: Face) -> &'a Texture {
        let axis_slot = match face {
            Face::PosY => "top",
            Face::NegY => "bottom",
            _ => "side",
        };
        let name = [face.name(), axis_slot, "all"]
            .into_iter()
            .find_map(|slot| self.slot_texture(slot));
        match name {
            Some(n) => self.resolve_reference(catalog, n),
            None => catalog.missing(),
        }
    }

    pub fn resolve(&self, catalog: &TextureCatalog) -> ResolvedBlockModel {
        let slot = |name: &str| match self.slot_texture(name) {
            Some(n) => self.resolve_reference(catalog, n).clone(),
            None => catalog.missing().clone(),
        };
        let elements = match self.kind {
            ModelKind::Cube => {
                let mut faces: [Option<ResolvedFace>; 6] = Default::default();
                for face in Face::ALL {
                    faces[face.index()] = Some(ResolvedFace {
                        texture: self.cube_face_texture(catalog, face).clone(),
                        cullface: Some(face),
                        tint: self.tint,
                    });
                }
                vec![ResolvedElement {
                    from: Vec3::ZERO,
                    to: Vec3::new(16.0, 16.0, 16.0),
                    faces,
                }]
            }
            ModelKind::Elements => self
                .elements
                .iter()
                .map(|e| {
                    let mut faces: [Option<ResolvedFace>; 6] = Default::default();
                    for (face, f) in &e.faces {
                        faces[face.index()] = Some(ResolvedFace {
                            texture: self.resolve_reference(catalog, &f.texture).clone(),
                            cullface: f.cullface,
                            tint: f.tint,
                        });
                    }
                    ResolvedElement {
                        from: Vec3::new(e.from[0], e.from[1], e.from[2]),
                        to: Vec3::new(e.to[0], e.to[1], e.to[2]),
                        faces,
                    }
                })
                .collect(),
            ModelKind::Liquid | ModelKind::None => Vec::new(),
        };
        let (still, flow) = if self.kind == ModelKind::Liquid {
            (slot("still"), slot("flow"))
        } else {
            (catalog.missing().clone(), catalog.missing().clone())
        };
        ResolvedBlockModel {
            kind: self.kind,
            still,
            flow,
            elements,
            culling: self.culling,
            occluding: self.occluding,
            always_waterlogged: self.always_waterlogged,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedFace {
    pub texture: Texture,
    pub cullface: Option<Face>,
    pub tint: bool,
}

/// Axis-aligned box in 0..16 model units with up to six textured faces,
/// indexed by `Face::index`.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedElement {
    pub from: Vec3,
    pub to: Vec3,
    pub faces: [Option<ResolvedFace>; 6],
}

impl ResolvedElement {
    #[inline]
    pub fn face(&self, face: Face) -> Option<&ResolvedFace> {
        self.faces[face.index()].as_ref()
    }
}

/// Block model with every texture reference resolved against a catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedBlockModel {
    pub kind: ModelKind,
    /// Liquid still texture; `missing` for other kinds.
    pub still: Texture,
    /// Liquid flowing texture; `missing` for other kinds.
    pub flow: Texture,
    pub elements: Vec<ResolvedElement>,
    culling: Option<bool>,
    occluding: Option<bool>,
    always_waterlogged: Option<bool>,
}

impl ResolvedBlockModel {
    pub fn is_liquid(&self) -> bool {
        self.kind == ModelKind::Liquid
    }

    pub fn is_empty(&self) -> bool {
        self.kind == ModelKind::None || (self.kind != ModelKind::Liquid && self.elements.is_empty())
    }

    /// Defaults for `state` with this model's explicit overrides applied.
    pub fn properties(&self, state: &BlockState) -> BlockProperties {
        let mut props = if self.kind == ModelKind::None {
            BlockProperties {
                always_waterlogged: BlockProperties::defaults_for(state).always_waterlogged,
                ..BlockProperties::NONE
            }
        } else {
            BlockProperties::defaults_for(state)
        };
        if let Some(v) = self.culling {
            props.culling = v;
        }
        if let Some(v) = self.occluding {
            props.occluding = v;
        }
        if let Some(v) = self.always_waterlogged {
            props.always_waterlogged = v;
        }
        props
    }
}

/// Resolved models keyed by block id (or full id for per-state overrides).
#[derive(Clone, Debug)]
pub struct ModelCatalog {
    textures: TextureCatalog,
    models: HashMap<String, ResolvedBlockModel>,
    liquids: HashMap<String, ResolvedBlockModel>,
    empty: ResolvedBlockModel,
    missing: ResolvedBlockModel,
}

impl ModelCatalog {
    pub fn new(textures: TextureCatalog) -> Self {
        let empty = BlockModel {
            kind: ModelKind::None,
            ..Default::default()
        }
        .resolve(&textures);
        let missing = BlockModel::cube(super::texture::MISSING_TEXTURE).resolve(&textures);
        let liquids = ["water", "lava"]
            .into_iter()
            .map(|name| {
                let model = BlockModel::liquid(&format!("{name}_still"), &format!("{name}_flow"));
                (format!("minecraft:{name}"), model.resolve(&textures))
            })
            .collect();
        Self {
            textures,
            models: HashMap::new(),
            liquids,
            empty,
            missing,
        }
    }

    pub fn textures(&self) -> &TextureCatalog {
        &self.textures
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Resolves `model` and registers it under `id`. A bare id gets the default namespace.
    pub fn insert_model(&mut self, id: &str, model: &BlockModel) {
        let key = if id.contains(':') {
            id.to_string()
        } else {
            format!("minecraft:{id}")
        };
        self.models.insert(key, model.resolve(&self.textures));
    }

    /// Model for `state`: exact full id first, then the plain id. Water and lava
    /// without an entry use `<name>_still`/`<name>_flow` textures, air renders
    /// as nothing and anything else is a `missing` cube.
    pub fn model_for(&self, state: &BlockState) -> &ResolvedBlockModel {
        if let Some(m) = self
            .models
            .get(state.full_id())
            .or_else(|| self.models.get(state.id()))
        {
            return m;
        }
        if let Some(m) = self.liquids.get(state.id()) {
            m
        } else if state.is_air() {
            &self.empty
        } else {
            &self.missing
        }
    }

    pub fn properties_for(&self, state: &BlockState) -> BlockProperties {
        match self
            .models
            .get(state.full_id())
            .or_else(|| self.models.get(state.id()))
        {
            Some(m) => m.properties(state),
            None => BlockProperties::defaults_for(state),
        }
    }

    pub fn from_toml_str(textures: TextureCatalog, toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: ModelsConfig = toml::from_str(toml_str)?;
        let mut catalog = ModelCatalog::new(textures);
        let mut entries: Vec<(String, BlockModelDef)> = cfg.blocks.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        for (id, def) in entries {
            if def.model == ModelKind::Elements && def.elements.is_empty() {
                return Err(format!("block '{id}': elements model without elements").into());
            }
            for e in &def.elements {
                if (0..3).any(|i| e.from[i] > e.to[i]) {
                    return Err(format!("block '{id}': element from {:?} exceeds to {:?}", e.from, e.to).into());
                }
            }
            catalog.insert_model(&id, &BlockModel::from(def));
        }
        log::debug!("loaded {} block models", catalog.len());
        Ok(catalog)
    }

    pub fn from_paths(
        textures_path: impl AsRef<Path>,
        models_path: impl AsRef<Path>,
    ) -> Result<Self, Box<dyn Error>> {
        let textures = TextureCatalog::from_path(textures_path)?;
        let s = fs::read_to_string(models_path)?;
        Self::from_toml_str(textures, &s)
    }
}
