use tessera_blocks::{BlockProperties, BlockState};
use tessera_geom::Color;

/// Snapshot of one voxel seen from a neighborhood.
#[derive(Clone, Copy, Debug)]
pub struct ExtendedBlock<'a> {
    pub state: &'a BlockState,
    pub properties: BlockProperties,
    pub block_light: u8,
    pub sky_light: u8,
    /// Biome water tint of the voxel's column.
    pub water_color: Color,
}

impl ExtendedBlock<'_> {
    #[inline]
    pub fn is_air(&self) -> bool {
        self.state.is_air()
    }

    /// True only for the exact `minecraft:air` state; cave and void air do not count.
    #[inline]
    pub fn is_plain_air(&self) -> bool {
        self.state == BlockState::air()
    }
}

/// Read access to one voxel and the voxels around it.
///
/// Offsets are relative to [`position`](Self::position) and may leave the
/// tile or region the voxel belongs to; implementations resolve them
/// transparently.
pub trait BlockNeighborhood {
    fn position(&self) -> (i32, i32, i32);
    fn block_state(&self) -> &BlockState;
    fn properties(&self) -> BlockProperties;
    fn block_light(&self) -> u8;
    fn sky_light(&self) -> u8;
    fn water_color(&self) -> Color;
    fn neighbor(&self, dx: i32, dy: i32, dz: i32) -> ExtendedBlock<'_>;
}
