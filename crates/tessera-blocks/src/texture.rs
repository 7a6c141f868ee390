use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use tessera_geom::Color;

use super::config::{TextureEntry, TexturesConfig};

/// Name of the texture reserved at id 0 and used for unresolved references.
pub const MISSING_TEXTURE: &str = "missing";

#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub id: u32,
    pub name: String,
    /// Average color, premultiplied by alpha.
    pub color: Color,
}

#[derive(Clone, Debug)]
pub struct TextureCatalog {
    pub textures: Vec<Texture>,
    pub by_name: HashMap<String, u32>,
}

impl Default for TextureCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureCatalog {
    pub fn new() -> Self {
        let mut missing = Color::new(1.0, 0.0, 1.0, 1.0, false);
        missing.premultiplied();
        Self {
            textures: vec![Texture {
                id: 0,
                name: MISSING_TEXTURE.to_string(),
                color: missing,
            }],
            by_name: HashMap::from([(MISSING_TEXTURE.to_string(), 0)]),
        }
    }

    #[inline]
    pub fn get(&self, id: u32) -> Option<&Texture> {
        self.textures.get(id as usize)
    }

    #[inline]
    pub fn texture(&self, name: &str) -> Option<&Texture> {
        self.by_name.get(name).and_then(|&id| self.get(id))
    }

    #[inline]
    pub fn texture_or_missing(&self, name: &str) -> &Texture {
        self.texture(name).unwrap_or(&self.textures[0])
    }

    #[inline]
    pub fn missing(&self) -> &Texture {
        &self.textures[0]
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Adds a texture (or replaces the color of an existing one) and returns its id.
    /// `color` is stored premultiplied.
    pub fn insert(&mut self, name: &str, color: Color) -> u32 {
        let mut color = color;
        color.premultiplied();
        if let Some(&id) = self.by_name.get(name) {
            self.textures[id as usize].color = color;
            return id;
        }
        let id = self.textures.len() as u32;
        self.by_name.insert(name.to_string(), id);
        self.textures.push(Texture {
            id,
            name: name.to_string(),
            color,
        });
        id
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: TexturesConfig = toml::from_str(toml_str)?;
        let mut catalog = TextureCatalog::new();
        let mut entries: Vec<(String, TextureEntry)> = cfg.textures.into_iter().collect();
        // HashMap iteration order is nondeterministic; sort names so texture ids are stable.
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, entry) in entries {
            let (hex, alpha) = match entry {
                TextureEntry::Hex(hex) => (hex, None),
                TextureEntry::Detail { color, alpha } => (color, alpha),
            };
            let mut color = Color::from_rgb_hex(&hex)
                .ok_or_else(|| format!("texture '{name}': invalid color '{hex}'"))?;
            if let Some(a) = alpha {
                color.a = a.clamp(0.0, 1.0);
            }
            catalog.insert(&name, color);
        }
        log::debug!("loaded {} textures", catalog.len());
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
