/// Triangle soup for one hires tile, stored as parallel per-face arrays.
///
/// Faces are only ever appended; [`clear`](Self::clear) resets the length but
/// keeps the allocations for the next tile.
#[derive(Default, Clone, Debug)]
pub struct HiresTileModel {
    positions: Vec<f32>,
    uvs: Vec<f32>,
    materials: Vec<u32>,
    colors: Vec<f32>,
    aos: Vec<f32>,
    block_light: Vec<u8>,
    sky_light: Vec<u8>,
    size: usize,
}

const POS_STRIDE: usize = 9;
const UV_STRIDE: usize = 6;
const COLOR_STRIDE: usize = 3;
const AO_STRIDE: usize = 3;

impl HiresTileModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(faces: usize) -> Self {
        let mut m = Self::default();
        m.reserve_faces(faces);
        m
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Appends `count` zeroed faces and returns the index of the first one.
    pub fn add(&mut self, count: usize) -> usize {
        let start = self.size;
        self.size += count;
        self.positions.resize(self.size * POS_STRIDE, 0.0);
        self.uvs.resize(self.size * UV_STRIDE, 0.0);
        self.materials.resize(self.size, 0);
        self.colors.resize(self.size * COLOR_STRIDE, 0.0);
        self.aos.resize(self.size * AO_STRIDE, 0.0);
        self.block_light.resize(self.size, 0);
        self.sky_light.resize(self.size, 0);
        start
    }

    /// Clears all arrays but retains capacity for reuse across tiles.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.uvs.clear();
        self.materials.clear();
        self.colors.clear();
        self.aos.clear();
        self.block_light.clear();
        self.sky_light.clear();
        self.size = 0;
    }

    pub fn reserve_faces(&mut self, faces: usize) {
        self.positions.reserve(faces * POS_STRIDE);
        self.uvs.reserve(faces * UV_STRIDE);
        self.materials.reserve(faces);
        self.colors.reserve(faces * COLOR_STRIDE);
        self.aos.reserve(faces * AO_STRIDE);
        self.block_light.reserve(faces);
        self.sky_light.reserve(faces);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_positions(
        &mut self,
        face: usize,
        x1: f32,
        y1: f32,
        z1: f32,
        x2: f32,
        y2: f32,
        z2: f32,
        x3: f32,
        y3: f32,
        z3: f32,
    ) {
        let i = face * POS_STRIDE;
        self.positions[i..i + POS_STRIDE].copy_from_slice(&[x1, y1, z1, x2, y2, z2, x3, y3, z3]);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_uvs(&mut self, face: usize, u1: f32, v1: f32, u2: f32, v2: f32, u3: f32, v3: f32) {
        let i = face * UV_STRIDE;
        self.uvs[i..i + UV_STRIDE].copy_from_slice(&[u1, v1, u2, v2, u3, v3]);
    }

    #[inline]
    pub fn set_material_index(&mut self, face: usize, material: u32) {
        self.materials[face] = material;
    }

    pub fn set_color(&mut self, face: usize, r: f32, g: f32, b: f32) {
        let i = face * COLOR_STRIDE;
        self.colors[i..i + COLOR_STRIDE].copy_from_slice(&[r, g, b]);
    }

    pub fn set_aos(&mut self, face: usize, ao1: f32, ao2: f32, ao3: f32) {
        let i = face * AO_STRIDE;
        self.aos[i..i + AO_STRIDE].copy_from_slice(&[ao1, ao2, ao3]);
    }

    #[inline]
    pub fn set_block_light(&mut self, face: usize, light: u8) {
        self.block_light[face] = light;
    }

    #[inline]
    pub fn set_sky_light(&mut self, face: usize, light: u8) {
        self.sky_light[face] = light;
    }

    pub fn positions(&self, face: usize) -> [f32; 9] {
        let i = face * POS_STRIDE;
        let mut out = [0.0; 9];
        out.copy_from_slice(&self.positions[i..i + POS_STRIDE]);
        out
    }

    pub fn uvs(&self, face: usize) -> [f32; 6] {
        let i = face * UV_STRIDE;
        let mut out = [0.0; 6];
        out.copy_from_slice(&self.uvs[i..i + UV_STRIDE]);
        out
    }

    #[inline]
    pub fn material_index(&self, face: usize) -> u32 {
        self.materials[face]
    }

    pub fn color(&self, face: usize) -> [f32; 3] {
        let i = face * COLOR_STRIDE;
        [self.colors[i], self.colors[i + 1], self.colors[i + 2]]
    }

    pub fn aos(&self, face: usize) -> [f32; 3] {
        let i = face * AO_STRIDE;
        [self.aos[i], self.aos[i + 1], self.aos[i + 2]]
    }

    #[inline]
    pub fn block_light(&self, face: usize) -> u8 {
        self.block_light[face]
    }

    #[inline]
    pub fn sky_light(&self, face: usize) -> u8 {
        self.sky_light[face]
    }

    /// Scales the vertex positions of faces `start..end`.
    pub fn scale_range(&mut self, start: usize, end: usize, sx: f32, sy: f32, sz: f32) {
        for v in self.positions[start * POS_STRIDE..end * POS_STRIDE].chunks_exact_mut(3) {
            v[0] *= sx;
            v[1] *= sy;
            v[2] *= sz;
        }
    }

    /// Offsets the vertex positions of faces `start..end`.
    pub fn translate_range(&mut self, start: usize, end: usize, dx: f32, dy: f32, dz: f32) {
        for v in self.positions[start * POS_STRIDE..end * POS_STRIDE].chunks_exact_mut(3) {
            v[0] += dx;
            v[1] += dy;
            v[2] += dz;
        }
    }
}

/// Window `[start, end)` over a [`HiresTileModel`] that one block's builders write into.
///
/// `add` always appends at the end of the underlying model and extends the
/// window; `initialize` moves `start` up to the current end so later
/// transforms only touch what follows.
#[derive(Debug)]
pub struct BlockModelView<'a> {
    model: &'a mut HiresTileModel,
    start: usize,
    end: usize,
}

impl<'a> BlockModelView<'a> {
    pub fn new(model: &'a mut HiresTileModel) -> Self {
        let end = model.size();
        Self {
            model,
            start: end,
            end,
        }
    }

    /// Empties the window, positioning it at the end of the model.
    pub fn initialize(&mut self) -> &mut Self {
        self.start = self.model.size();
        self.end = self.start;
        self
    }

    /// Re-opens the window to cover `start..` the end of the model.
    pub fn initialize_at(&mut self, start: usize) -> &mut Self {
        self.end = self.model.size();
        self.start = start.min(self.end);
        self
    }

    /// Appends `count` faces and returns the index of the first one.
    pub fn add(&mut self, count: usize) -> usize {
        let first = self.model.add(count);
        self.end = self.model.size();
        first
    }

    pub fn scale(&mut self, sx: f32, sy: f32, sz: f32) -> &mut Self {
        self.model.scale_range(self.start, self.end, sx, sy, sz);
        self
    }

    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) -> &mut Self {
        self.model.translate_range(self.start, self.end, dx, dy, dz);
        self
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn model(&mut self) -> &mut HiresTileModel {
        &mut *self.model
    }

    #[inline]
    pub fn model_ref(&self) -> &HiresTileModel {
        &*self.model
    }
}
