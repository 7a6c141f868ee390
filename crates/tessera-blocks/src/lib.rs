//! Block states, block properties, textures and block models.
#![forbid(unsafe_code)]

pub mod config;
pub mod face;
pub mod model;
pub mod state;
pub mod texture;

// Re-exports for convenience
pub use config::ModelKind;
pub use face::Face;
pub use model::{BlockModel, ModelCatalog, ResolvedBlockModel, ResolvedElement, ResolvedFace};
pub use state::{BlockProperties, BlockState};
pub use texture::{Texture, TextureCatalog};
