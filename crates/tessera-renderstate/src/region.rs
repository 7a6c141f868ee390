use hashbrown::HashMap;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::tile_info::{TileInfo, TileState};

pub const SHIFT: u32 = 5;
pub const REGION_LENGTH: i32 = 1 << SHIFT;
pub const MASK: i32 = REGION_LENGTH - 1;
pub const TILES_PER_REGION: usize = (REGION_LENGTH * REGION_LENGTH) as usize;

/// Render state of a `REGION_LENGTH x REGION_LENGTH` block of tiles.
///
/// Coordinates are masked to the region, so any tile coordinate maps to a
/// slot; callers pick the region by `coord >> SHIFT`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "PersistedRegion")]
pub struct TileInfoRegion {
    #[serde(rename = "last-render-times")]
    last_render_times: Vec<i32>,
    #[serde(rename = "tile-states")]
    tile_states: Vec<TileState>,
    #[serde(skip)]
    modified: bool,
}

// Equal when the tile data is; the modified flag is bookkeeping.
impl PartialEq for TileInfoRegion {
    fn eq(&self, other: &Self) -> bool {
        self.last_render_times == other.last_render_times && self.tile_states == other.tile_states
    }
}

impl Eq for TileInfoRegion {}

// On-disk shape; either array may be missing, mistyped or have the wrong length.
#[derive(Deserialize)]
struct PersistedRegion {
    #[serde(rename = "last-render-times", default, deserialize_with = "lenient")]
    last_render_times: Option<Vec<i32>>,
    #[serde(rename = "tile-states", default, deserialize_with = "lenient")]
    tile_states: Option<Vec<TileState>>,
}

/// Reads a value of the wrong shape as `None` instead of failing the region.
fn lenient<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient<T> {
        Value(T),
        Other(IgnoredAny),
    }

    Ok(match Lenient::<T>::deserialize(de)? {
        Lenient::Value(v) => Some(v),
        Lenient::Other(_) => {
            log::debug!("discarding malformed tile region array");
            None
        }
    })
}

impl From<PersistedRegion> for TileInfoRegion {
    fn from(p: PersistedRegion) -> Self {
        TileInfoRegion::from_persisted(p.last_render_times, p.tile_states)
    }
}

#[inline]
fn index(x: i32, z: i32) -> usize {
    (((z & MASK) << SHIFT) | (x & MASK)) as usize
}

impl Default for TileInfoRegion {
    fn default() -> Self {
        Self::create()
    }
}

impl TileInfoRegion {
    /// A region with every tile `Unknown` at render time 0.
    pub fn create() -> Self {
        Self {
            last_render_times: vec![0; TILES_PER_REGION],
            tile_states: vec![TileState::Unknown; TILES_PER_REGION],
            modified: false,
        }
    }

    /// Builds a region from loaded arrays and repairs them.
    pub fn from_persisted(last_render_times: Option<Vec<i32>>, tile_states: Option<Vec<TileState>>) -> Self {
        let mut region = Self {
            last_render_times: last_render_times.unwrap_or_default(),
            tile_states: tile_states.unwrap_or_default(),
            modified: false,
        };
        region.init();
        region
    }

    /// Resets any array that does not hold exactly one entry per tile.
    pub fn init(&mut self) {
        if self.last_render_times.len() != TILES_PER_REGION {
            log::debug!(
                "resetting render times of tile region ({} entries, expected {TILES_PER_REGION})",
                self.last_render_times.len()
            );
            self.last_render_times = vec![0; TILES_PER_REGION];
        }
        if self.tile_states.len() != TILES_PER_REGION {
            log::debug!(
                "resetting tile states of tile region ({} entries, expected {TILES_PER_REGION})",
                self.tile_states.len()
            );
            self.tile_states = vec![TileState::Unknown; TILES_PER_REGION];
        }
    }

    pub fn get(&self, x: i32, z: i32) -> TileInfo {
        let i = index(x, z);
        TileInfo {
            render_time: self.last_render_times[i],
            state: self.tile_states[i],
        }
    }

    /// Stores `info` and returns the previous value.
    pub fn set(&mut self, x: i32, z: i32, info: TileInfo) -> TileInfo {
        let i = index(x, z);
        let previous = TileInfo {
            render_time: self.last_render_times[i],
            state: self.tile_states[i],
        };
        if previous != info {
            self.last_render_times[i] = info.render_time;
            self.tile_states[i] = info.state;
            self.modified = true;
        }
        previous
    }

    /// Most recent render time in the region, or -1 without any entries.
    pub fn find_latest_render_time(&self) -> i32 {
        self.last_render_times.iter().copied().max().unwrap_or(-1)
    }

    /// Adds the number of tiles per state to `map`.
    pub fn populate_summary_map(&self, map: &mut HashMap<TileState, u32>) {
        for state in &self.tile_states {
            *map.entry(*state).or_insert(0) += 1;
        }
    }

    #[inline]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clears the modified flag after the region was persisted.
    #[inline]
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }
}
