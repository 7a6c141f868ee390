use std::collections::{HashMap, VecDeque};

use tessera_blocks::{BlockProperties, BlockState};
use tessera_geom::Color;

use crate::neighborhood::{BlockNeighborhood, ExtendedBlock};

pub const MAX_LIGHT: u8 = 15;

/// Plains biome water color (`#3f76e4`), premultiplied.
pub const DEFAULT_WATER_COLOR: Color = Color::new(
    0x3f as f32 / 255.0,
    0x76 as f32 / 255.0,
    0xe4 as f32 / 255.0,
    1.0,
    true,
);

const NEIGHBORS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

#[derive(Clone, Debug)]
struct PaletteEntry {
    state: BlockState,
    properties: BlockProperties,
}

/// Dense box of voxels with per-voxel light and per-column water color.
///
/// Coordinates passed to the accessors are world coordinates; the grid covers
/// `min .. min + (sx, sy, sz)`.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    pub min: (i32, i32, i32),
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    palette: Vec<PaletteEntry>,
    palette_lookup: HashMap<BlockState, u16>,
    blocks: Vec<u16>,
    block_light: Vec<u8>,
    sky_light: Vec<u8>,
    water_colors: Vec<Color>,
}

impl VoxelGrid {
    /// An all-air grid with no light.
    pub fn new(min: (i32, i32, i32), sx: usize, sy: usize, sz: usize) -> Self {
        let n = sx * sy * sz;
        let air = BlockState::air().clone();
        VoxelGrid {
            min,
            sx,
            sy,
            sz,
            palette: vec![PaletteEntry {
                state: air.clone(),
                properties: BlockProperties::NONE,
            }],
            palette_lookup: HashMap::from([(air, 0)]),
            blocks: vec![0; n],
            block_light: vec![0; n],
            sky_light: vec![0; n],
            water_colors: vec![DEFAULT_WATER_COLOR; sx * sz],
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    /// Local indices of a world position, if it lies inside the grid.
    #[inline]
    pub fn local(&self, wx: i32, wy: i32, wz: i32) -> Option<(usize, usize, usize)> {
        let lx = wx.checked_sub(self.min.0)?;
        let ly = wy.checked_sub(self.min.1)?;
        let lz = wz.checked_sub(self.min.2)?;
        if lx < 0 || ly < 0 || lz < 0 {
            return None;
        }
        let (lx, ly, lz) = (lx as usize, ly as usize, lz as usize);
        if lx >= self.sx || ly >= self.sy || lz >= self.sz {
            return None;
        }
        Some((lx, ly, lz))
    }

    #[inline]
    pub fn contains(&self, wx: i32, wy: i32, wz: i32) -> bool {
        self.local(wx, wy, wz).is_some()
    }

    /// Inclusive world y range covered by the grid.
    pub fn y_range(&self) -> (i32, i32) {
        (self.min.1, self.min.1 + self.sy as i32 - 1)
    }

    /// Inclusive world x/z bounds covered by the grid.
    pub fn xz_bounds(&self) -> ((i32, i32), (i32, i32)) {
        (
            (self.min.0, self.min.2),
            (self.min.0 + self.sx as i32 - 1, self.min.2 + self.sz as i32 - 1),
        )
    }

    // `None` once every u16 index is taken.
    fn palette_id(&mut self, state: &BlockState, properties: BlockProperties) -> Option<u16> {
        if let Some(&id) = self.palette_lookup.get(state) {
            return Some(id);
        }
        let Ok(id) = u16::try_from(self.palette.len()) else {
            log::warn!(
                "voxel palette is full ({} states), dropping write of {state}",
                self.palette.len()
            );
            return None;
        };
        self.palette.push(PaletteEntry {
            state: state.clone(),
            properties,
        });
        self.palette_lookup.insert(state.clone(), id);
        Some(id)
    }

    /// Stores `state` using its default properties. Positions outside the
    /// grid are ignored.
    pub fn set_block(&mut self, wx: i32, wy: i32, wz: i32, state: &BlockState) {
        self.set_block_with(wx, wy, wz, state, BlockProperties::defaults_for(state));
    }

    /// Stores `state`; `properties` only take effect the first time the state
    /// enters the palette.
    pub fn set_block_with(
        &mut self,
        wx: i32,
        wy: i32,
        wz: i32,
        state: &BlockState,
        properties: BlockProperties,
    ) {
        let Some((x, y, z)) = self.local(wx, wy, wz) else {
            return;
        };
        let Some(id) = self.palette_id(state, properties) else {
            return;
        };
        let i = self.idx(x, y, z);
        self.blocks[i] = id;
    }

    /// Re-derives the properties of every palette entry, e.g. from a model catalog.
    pub fn resolve_properties(&mut self, f: impl Fn(&BlockState) -> BlockProperties) {
        for entry in &mut self.palette {
            entry.properties = f(&entry.state);
        }
    }

    pub fn block(&self, wx: i32, wy: i32, wz: i32) -> &BlockState {
        match self.local(wx, wy, wz) {
            Some((x, y, z)) => &self.palette[self.blocks[self.idx(x, y, z)] as usize].state,
            None => BlockState::air(),
        }
    }

    pub fn set_block_light(&mut self, wx: i32, wy: i32, wz: i32, level: u8) {
        if let Some((x, y, z)) = self.local(wx, wy, wz) {
            let i = self.idx(x, y, z);
            self.block_light[i] = level.min(MAX_LIGHT);
        }
    }

    pub fn set_sky_light(&mut self, wx: i32, wy: i32, wz: i32, level: u8) {
        if let Some((x, y, z)) = self.local(wx, wy, wz) {
            let i = self.idx(x, y, z);
            self.sky_light[i] = level.min(MAX_LIGHT);
        }
    }

    pub fn water_color(&self, wx: i32, wz: i32) -> Color {
        match self.local(wx, self.min.1, wz) {
            Some((x, _, z)) => self.water_colors[z * self.sx + x],
            None => DEFAULT_WATER_COLOR,
        }
    }

    pub fn set_water_color(&mut self, wx: i32, wz: i32, color: Color) {
        if let Some((x, _, z)) = self.local(wx, self.min.1, wz) {
            let mut c = color;
            c.premultiplied();
            self.water_colors[z * self.sx + x] = c;
        }
    }

    /// Full view of one voxel. Outside the grid this is plain air, lit by the
    /// sky unless it lies below the grid.
    pub fn extended(&self, wx: i32, wy: i32, wz: i32) -> ExtendedBlock<'_> {
        match self.local(wx, wy, wz) {
            Some((x, y, z)) => {
                let i = self.idx(x, y, z);
                let entry = &self.palette[self.blocks[i] as usize];
                ExtendedBlock {
                    state: &entry.state,
                    properties: entry.properties,
                    block_light: self.block_light[i],
                    sky_light: self.sky_light[i],
                    water_color: self.water_colors[z * self.sx + x],
                }
            }
            None => ExtendedBlock {
                state: BlockState::air(),
                properties: BlockProperties::NONE,
                block_light: 0,
                sky_light: if wy < self.min.1 { 0 } else { MAX_LIGHT },
                water_color: self.water_color(wx, wz),
            },
        }
    }

    pub fn neighborhood(&self, wx: i32, wy: i32, wz: i32) -> GridNeighborhood<'_> {
        GridNeighborhood {
            grid: self,
            pos: (wx, wy, wz),
            center: self.extended(wx, wy, wz),
        }
    }

    fn passes_light(&self, i: usize) -> bool {
        let entry = &self.palette[self.blocks[i] as usize];
        !entry.properties.culling
    }

    /// Fills sky light: full light straight down each column until the first
    /// culling voxel, liquids dimming it by one level per voxel, then spreads
    /// it sideways and down into covered space, losing one level per step.
    pub fn compute_sky_light(&mut self) {
        self.sky_light.fill(0);
        let mut queue = VecDeque::new();
        for z in 0..self.sz {
            for x in 0..self.sx {
                let mut level = MAX_LIGHT;
                for y in (0..self.sy).rev() {
                    let i = self.idx(x, y, z);
                    if !self.passes_light(i) || level == 0 {
                        break;
                    }
                    let state = &self.palette[self.blocks[i] as usize].state;
                    if state.is_liquid() {
                        level -= 1;
                    }
                    self.sky_light[i] = level;
                    queue.push_back((x, y, z));
                }
            }
        }
        let spread = self.spread(&mut queue, |g| &mut g.sky_light);
        log::debug!("sky light: {spread} voxels lit by spreading");
    }

    /// Sets a light source and floods its light through non-culling voxels.
    pub fn add_light_source(&mut self, wx: i32, wy: i32, wz: i32, level: u8) {
        let Some((x, y, z)) = self.local(wx, wy, wz) else {
            return;
        };
        let i = self.idx(x, y, z);
        let level = level.min(MAX_LIGHT);
        if self.block_light[i] >= level {
            return;
        }
        self.block_light[i] = level;
        let mut queue = VecDeque::from([(x, y, z)]);
        self.spread(&mut queue, |g| &mut g.block_light);
    }

    fn spread(
        &mut self,
        queue: &mut VecDeque<(usize, usize, usize)>,
        channel: fn(&mut VoxelGrid) -> &mut Vec<u8>,
    ) -> usize {
        let mut lit = 0;
        while let Some((x, y, z)) = queue.pop_front() {
            let i = self.idx(x, y, z);
            let level = channel(self)[i];
            if level <= 1 {
                continue;
            }
            for (dx, dy, dz) in NEIGHBORS {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                let nz = z as i32 + dz;
                if nx < 0 || ny < 0 || nz < 0 {
                    continue;
                }
                let (nx, ny, nz) = (nx as usize, ny as usize, nz as usize);
                if nx >= self.sx || ny >= self.sy || nz >= self.sz {
                    continue;
                }
                let ni = self.idx(nx, ny, nz);
                if !self.passes_light(ni) {
                    continue;
                }
                let v = level - 1;
                let light = channel(self);
                if light[ni] < v {
                    light[ni] = v;
                    lit += 1;
                    queue.push_back((nx, ny, nz));
                }
            }
        }
        lit
    }
}

/// A [`VoxelGrid`] viewed from one voxel.
#[derive(Clone, Copy, Debug)]
pub struct GridNeighborhood<'a> {
    grid: &'a VoxelGrid,
    pos: (i32, i32, i32),
    center: ExtendedBlock<'a>,
}

impl<'a> GridNeighborhood<'a> {
    pub fn grid(&self) -> &'a VoxelGrid {
        self.grid
    }
}

impl BlockNeighborhood for GridNeighborhood<'_> {
    #[inline]
    fn position(&self) -> (i32, i32, i32) {
        self.pos
    }

    #[inline]
    fn block_state(&self) -> &BlockState {
        self.center.state
    }

    #[inline]
    fn properties(&self) -> BlockProperties {
        self.center.properties
    }

    #[inline]
    fn block_light(&self) -> u8 {
        self.center.block_light
    }

    #[inline]
    fn sky_light(&self) -> u8 {
        self.center.sky_light
    }

    #[inline]
    fn water_color(&self) -> Color {
        self.center.water_color
    }

    #[inline]
    fn neighbor(&self, dx: i32, dy: i32, dz: i32) -> ExtendedBlock<'_> {
        let (x, y, z) = self.pos;
        self.grid.extended(x + dx, y + dy, z + dz)
    }
}
