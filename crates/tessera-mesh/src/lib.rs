//! CPU mesh building for hires map tiles.
//!
//! Every voxel of a tile is turned into triangles appended to a
//! [`HiresTileModel`] through a [`BlockModelView`] window. Liquids go through
//! [`LiquidModelBuilder`], everything else through [`ResourceModelBuilder`];
//! [`BlockStateModelRenderer`] picks between them and [`HiresTileRenderer`]
//! walks a whole tile.
#![forbid(unsafe_code)]

pub mod color;
pub mod constants;
pub mod hires;
pub mod liquid;
pub mod renderer;
pub mod resource;
pub mod settings;
pub mod tile_model;

pub use color::{BiomeColorCalculator, BlockColorCalculator, light_factor};
pub use constants::{BLOCK_SCALE, FLOWING_UV_SCALE};
pub use hires::{HiresTileRenderer, TileColors, TileRenderResult};
pub use liquid::LiquidModelBuilder;
pub use renderer::BlockStateModelRenderer;
pub use resource::ResourceModelBuilder;
pub use settings::{RenderSettings, RenderSettingsData};
pub use tile_model::{BlockModelView, HiresTileModel};
