use serde::{Deserialize, Serialize};

/// Outcome of the last render attempt of a tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TileState {
    Rendered = 1,
    /// Rendered, but the tile is cut by the configured map bounds.
    RenderedEdge = 2,
    OutOfBounds = 3,
    NotGenerated = 4,
    MissingLight = 5,
    LowInhabitedTime = 6,
    ChunkError = 7,
    /// Also read for any state name this version does not know.
    // serde requires `other` on the last variant; the discriminant keeps it first.
    #[default]
    #[serde(other)]
    Unknown = 0,
}

impl TileState {
    pub const ALL: [TileState; 8] = [
        TileState::Unknown,
        TileState::Rendered,
        TileState::RenderedEdge,
        TileState::OutOfBounds,
        TileState::NotGenerated,
        TileState::MissingLight,
        TileState::LowInhabitedTime,
        TileState::ChunkError,
    ];

    /// True if the tile has geometry from its last render.
    #[inline]
    pub fn is_rendered(self) -> bool {
        matches!(self, TileState::Rendered | TileState::RenderedEdge)
    }
}

/// Render time (seconds, caller defined epoch) and state of one tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TileInfo {
    pub render_time: i32,
    pub state: TileState,
}

impl TileInfo {
    #[inline]
    pub const fn new(render_time: i32, state: TileState) -> Self {
        Self { render_time, state }
    }
}
