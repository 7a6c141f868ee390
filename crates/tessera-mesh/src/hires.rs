use tessera_blocks::ModelCatalog;
use tessera_geom::Color;
use tessera_renderstate::TileState;
use tessera_world::VoxelGrid;

use crate::color::BlockColorCalculator;
use crate::renderer::BlockStateModelRenderer;
use crate::settings::RenderSettings;
use crate::tile_model::{BlockModelView, HiresTileModel};

/// Per-column map colors of a tile and the height the color was taken from.
#[derive(Clone, Debug, Default)]
pub struct TileColors {
    width: usize,
    depth: usize,
    colors: Vec<Color>,
    heights: Vec<i32>,
}

impl TileColors {
    pub fn new(width: usize, depth: usize) -> Self {
        let mut c = Self::default();
        c.reset(width, depth);
        c
    }

    /// Resizes to `width * depth` columns, all transparent at height `i32::MIN`.
    pub fn reset(&mut self, width: usize, depth: usize) {
        self.width = width;
        self.depth = depth;
        self.colors.clear();
        self.colors.resize(width * depth, Color::TRANSPARENT);
        self.heights.clear();
        self.heights.resize(width * depth, i32::MIN);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn color(&self, x: usize, z: usize) -> Color {
        self.colors[z * self.width + x]
    }

    pub fn height(&self, x: usize, z: usize) -> i32 {
        self.heights[z * self.width + x]
    }

    pub fn set(&mut self, x: usize, z: usize, color: Color, height: i32) {
        let i = z * self.width + x;
        self.colors[i] = color;
        self.heights[i] = height;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRenderResult {
    /// Triangles emitted, counted before the hires layer is dropped.
    pub faces: usize,
    pub state: TileState,
}

/// Renders whole hires tiles. One per worker.
pub struct HiresTileRenderer<'a> {
    settings: &'a dyn RenderSettings,
    catalog: &'a ModelCatalog,
    renderer: BlockStateModelRenderer<'a>,
    block_color: Color,
}

impl<'a> HiresTileRenderer<'a> {
    pub fn new(
        settings: &'a dyn RenderSettings,
        catalog: &'a ModelCatalog,
        colors: &'a dyn BlockColorCalculator,
    ) -> Self {
        Self {
            settings,
            catalog,
            renderer: BlockStateModelRenderer::new(settings, colors),
            block_color: Color::TRANSPARENT,
        }
    }

    /// Renders the columns `min..=max` (x, z) of `world` into `model`,
    /// replacing its contents, and fills `lowres` with one color per column.
    /// Vertex positions are relative to `(min.x, 0, min.z)`.
    pub fn render(
        &mut self,
        world: &VoxelGrid,
        min: (i32, i32),
        max: (i32, i32),
        model: &mut HiresTileModel,
        lowres: &mut TileColors,
    ) -> TileRenderResult {
        model.clear();
        let width = (max.0 - min.0 + 1).max(0) as usize;
        let depth = (max.1 - min.1 + 1).max(0) as usize;
        lowres.reset(width, depth);

        let (bmin, bmax) = (self.settings.min_pos(), self.settings.max_pos());
        let outside = max.0 < bmin.0 || min.0 > bmax.0 || max.1 < bmin.2 || min.1 > bmax.2;
        let edge = min.0 < bmin.0 || max.0 > bmax.0 || min.1 < bmin.2 || max.1 > bmax.2;
        if outside || (edge && !self.settings.render_edges()) {
            return TileRenderResult {
                faces: 0,
                state: TileState::OutOfBounds,
            };
        }

        let (world_min_y, world_max_y) = world.y_range();
        let min_y = world_min_y.max(bmin.1);
        let max_y = world_max_y.min(bmax.1);

        let mut view = BlockModelView::new(model);
        for z in min.1..=max.1 {
            for x in min.0..=max.0 {
                if !self.settings.is_inside_xz(x, z) {
                    continue;
                }
                let mut column = Color::TRANSPARENT;
                let mut height = i32::MIN;
                for y in (min_y..=max_y).rev() {
                    let block = world.neighborhood(x, y, z);
                    self.renderer.render(&block, self.catalog, &mut view, &mut self.block_color);
                    view.translate((x - min.0) as f32, y as f32, (z - min.1) as f32);

                    if !self.block_color.is_transparent() && !column.is_opaque() {
                        if height == i32::MIN {
                            height = y;
                        }
                        // Colors above stay on top of what is found further down.
                        let mut below = self.block_color;
                        below.overlay(&column);
                        column = below;
                    }
                }
                lowres.set((x - min.0) as usize, (z - min.1) as usize, column, height);
            }
        }

        let faces = model.size();
        if !self.settings.save_hires_layer() {
            model.clear();
        }
        log::debug!("tile ({},{})..({},{}): {faces} faces", min.0, min.1, max.0, max.1);
        TileRenderResult {
            faces,
            state: if edge {
                TileState::RenderedEdge
            } else {
                TileState::Rendered
            },
        }
    }
}
