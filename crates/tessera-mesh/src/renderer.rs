use tessera_blocks::{BlockState, ModelCatalog};
use tessera_geom::Color;
use tessera_world::BlockNeighborhood;

use crate::color::BlockColorCalculator;
use crate::liquid::LiquidModelBuilder;
use crate::resource::ResourceModelBuilder;
use crate::settings::RenderSettings;
use crate::tile_model::BlockModelView;

/// Renders one voxel with the builder matching its model, adding the water
/// of waterlogged blocks on top.
pub struct BlockStateModelRenderer<'a> {
    liquid: LiquidModelBuilder<'a>,
    resource: ResourceModelBuilder<'a>,
    water_color: Color,
}

impl<'a> BlockStateModelRenderer<'a> {
    pub fn new(settings: &'a dyn RenderSettings, colors: &'a dyn BlockColorCalculator) -> Self {
        Self {
            liquid: LiquidModelBuilder::new(settings, colors),
            resource: ResourceModelBuilder::new(settings, colors),
            water_color: Color::TRANSPARENT,
        }
    }

    /// Appends the geometry of `block` to `view`, leaving the view covering
    /// exactly those faces, and writes the voxel's map color into `color`.
    pub fn render(
        &mut self,
        block: &dyn BlockNeighborhood,
        catalog: &ModelCatalog,
        view: &mut BlockModelView<'_>,
        color: &mut Color,
    ) {
        color.set_from(&Color::TRANSPARENT);
        view.initialize();
        let start = view.start();

        let state = block.block_state();
        if state.is_air() {
            return;
        }

        let model = catalog.model_for(state);
        if state.is_liquid() || model.is_liquid() {
            self.liquid.build(block, state, model, view, color);
        } else if !model.is_empty() {
            self.resource.build(block, model, view, color);
        }

        if state.is_waterlogged() || block.properties().always_waterlogged {
            let water = BlockState::water();
            self.water_color = Color::TRANSPARENT;
            view.initialize();
            self.liquid.build(block, water, catalog.model_for(water), view, &mut self.water_color);
            if !self.water_color.is_transparent() {
                color.overlay(&self.water_color);
            }
        }

        view.initialize_at(start);
    }
}
