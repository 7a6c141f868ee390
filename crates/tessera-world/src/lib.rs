//! Voxel access for the mesh builders: the neighborhood capability and a dense
//! in-memory voxel grid that provides it.
#![forbid(unsafe_code)]

mod grid;
mod neighborhood;

pub use grid::{GridNeighborhood, VoxelGrid, DEFAULT_WATER_COLOR, MAX_LIGHT};
pub use neighborhood::{BlockNeighborhood, ExtendedBlock};
