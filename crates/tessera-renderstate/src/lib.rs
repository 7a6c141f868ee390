//! Per-tile render bookkeeping: when each map tile was last rendered and
//! with what outcome, grouped into fixed-size regions.
#![forbid(unsafe_code)]

mod map_state;
mod region;
mod tile_info;

pub use map_state::MapTileState;
pub use region::{MASK, REGION_LENGTH, SHIFT, TILES_PER_REGION, TileInfoRegion};
pub use tile_info::{TileInfo, TileState};
