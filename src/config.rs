use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;
use tessera_geom::Color;
use tessera_mesh::RenderSettings;
use thiserror::Error;

/// Errors raised while loading a map configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed map config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid map config: {0}")]
    Invalid(String),
}

const DEFAULT_SKY_COLOR: &str = "#7dabff";

/// Per-map render configuration, read from TOML with kebab-case keys.
/// Every key is optional.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MapConfig {
    pub name: String,
    pub sorting: i32,
    pub sky_color: String,
    pub ambient_light: f32,
    pub world_sky_light: i32,
    pub remove_caves_below_y: i32,
    pub cave_detection_uses_block_light: bool,
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    pub min_z: i32,
    pub max_z: i32,
    pub render_edges: bool,
    pub save_hires_layer: bool,
    pub storage: String,
    pub ignore_missing_light_data: bool,

    // Not part of the documented config, but honored when present.
    pub hires_tile_size: i32,
    pub lowres_tile_size: i32,
    pub lod_count: i32,
    pub lod_factor: i32,

    #[serde(skip)]
    pub(crate) min_pos: OnceLock<(i32, i32, i32)>,
    #[serde(skip)]
    pub(crate) max_pos: OnceLock<(i32, i32, i32)>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            name: "map".to_string(),
            sorting: 0,
            sky_color: DEFAULT_SKY_COLOR.to_string(),
            ambient_light: 0.0,
            world_sky_light: 15,
            remove_caves_below_y: 55,
            cave_detection_uses_block_light: false,
            min_x: i32::MIN,
            max_x: i32::MAX,
            min_y: i32::MIN,
            max_y: i32::MAX,
            min_z: i32::MIN,
            max_z: i32::MAX,
            render_edges: true,
            save_hires_layer: true,
            storage: "file".to_string(),
            ignore_missing_light_data: false,
            hires_tile_size: 32,
            lowres_tile_size: 500,
            lod_count: 3,
            lod_factor: 5,
            min_pos: OnceLock::new(),
            max_pos: OnceLock::new(),
        }
    }
}

impl MapConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_toml_str(&text)?;
        log::debug!("loaded map config '{}' from {}", cfg.name, path.display());
        Ok(cfg)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: MapConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, min, max) in [
            ('x', self.min_x, self.max_x),
            ('y', self.min_y, self.max_y),
            ('z', self.min_z, self.max_z),
        ] {
            if min > max {
                return Err(ConfigError::Invalid(format!(
                    "min-{axis} ({min}) is greater than max-{axis} ({max})"
                )));
            }
        }
        for (key, size) in [
            ("hires-tile-size", self.hires_tile_size),
            ("lowres-tile-size", self.lowres_tile_size),
        ] {
            if size <= 0 {
                return Err(ConfigError::Invalid(format!("{key} must be positive, got {size}")));
            }
        }
        if !(0.0..=1.0).contains(&self.ambient_light) {
            return Err(ConfigError::Invalid(format!(
                "ambient-light must be within 0..=1, got {}",
                self.ambient_light
            )));
        }
        Ok(())
    }

    /// The parsed sky color; unparsable values fall back to the default.
    pub fn sky_color(&self) -> Color {
        match Color::from_rgb_hex(&self.sky_color) {
            Some(c) => c,
            None => {
                log::warn!("sky-color '{}' is not #rrggbb, using {DEFAULT_SKY_COLOR}", self.sky_color);
                Color::from_rgb_hex(DEFAULT_SKY_COLOR).unwrap_or(Color::WHITE)
            }
        }
    }

    /// Sky light level of the world, clamped to `0..=15`.
    pub fn world_sky_light(&self) -> u8 {
        if !(0..=15).contains(&self.world_sky_light) {
            log::warn!("world-sky-light {} is out of range, clamping", self.world_sky_light);
        }
        self.world_sky_light.clamp(0, 15) as u8
    }
}

impl RenderSettings for MapConfig {
    fn remove_caves_below_y(&self) -> i32 {
        self.remove_caves_below_y
    }

    fn cave_detection_uses_block_light(&self) -> bool {
        self.cave_detection_uses_block_light
    }

    fn ambient_light(&self) -> f32 {
        self.ambient_light
    }

    fn save_hires_layer(&self) -> bool {
        self.save_hires_layer
    }

    fn min_pos(&self) -> (i32, i32, i32) {
        *self.min_pos.get_or_init(|| (self.min_x, self.min_y, self.min_z))
    }

    fn max_pos(&self) -> (i32, i32, i32) {
        *self.max_pos.get_or_init(|| (self.max_x, self.max_y, self.max_z))
    }

    fn render_edges(&self) -> bool {
        self.render_edges
    }
}
