use hashbrown::HashMap;
use rayon::prelude::*;

use crate::region::{SHIFT, TileInfoRegion};
use crate::tile_info::{TileInfo, TileState};

/// Render state of every tile of a map, stored sparsely per region.
///
/// Not synchronized: one owner mutates it, reductions run in parallel over
/// the regions.
#[derive(Clone, Debug, Default)]
pub struct MapTileState {
    regions: HashMap<(i32, i32), TileInfoRegion>,
}

#[inline]
fn region_key(x: i32, z: i32) -> (i32, i32) {
    (x >> SHIFT, z >> SHIFT)
}

impl MapTileState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tile info, `Unknown` at time 0 for tiles in regions never touched.
    pub fn get(&self, x: i32, z: i32) -> TileInfo {
        match self.regions.get(&region_key(x, z)) {
            Some(r) => r.get(x, z),
            None => TileInfo::default(),
        }
    }

    /// Stores `info`, creating the region on first write, and returns the previous value.
    pub fn set(&mut self, x: i32, z: i32, info: TileInfo) -> TileInfo {
        self.regions
            .entry(region_key(x, z))
            .or_insert_with(TileInfoRegion::create)
            .set(x, z, info)
    }

    /// Latest render time over all regions, or -1 for an empty map.
    pub fn last_render_time(&self) -> i32 {
        self.regions
            .par_values()
            .map(TileInfoRegion::find_latest_render_time)
            .max()
            .unwrap_or(-1)
    }

    /// Number of tiles per state, counting every slot of every loaded region.
    pub fn summary(&self) -> HashMap<TileState, u32> {
        self.regions
            .par_values()
            .fold(HashMap::new, |mut map, region| {
                region.populate_summary_map(&mut map);
                map
            })
            .reduce(HashMap::new, |mut a, b| {
                for (state, n) in b {
                    *a.entry(state).or_insert(0) += n;
                }
                a
            })
    }

    /// Adds a loaded region at region coordinates `(rx, rz)`, replacing any existing one.
    pub fn insert_region(&mut self, rx: i32, rz: i32, region: TileInfoRegion) -> Option<TileInfoRegion> {
        self.regions.insert((rx, rz), region)
    }

    pub fn region(&self, rx: i32, rz: i32) -> Option<&TileInfoRegion> {
        self.regions.get(&(rx, rz))
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Regions changed since they were last saved.
    pub fn modified_regions(&self) -> impl Iterator<Item = ((i32, i32), &TileInfoRegion)> {
        self.regions
            .iter()
            .filter(|(_, r)| r.is_modified())
            .map(|(k, r)| (*k, r))
    }

    pub fn mark_all_saved(&mut self) {
        for region in self.regions.values_mut() {
            region.mark_saved();
        }
    }
}
