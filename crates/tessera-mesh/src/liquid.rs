use tessera_blocks::{BlockState, Face, ResolvedBlockModel};
use tessera_geom::{Color, Mat3, Vec2, Vec3};
use tessera_world::{BlockNeighborhood, ExtendedBlock};

use crate::color::{BlockColorCalculator, apply_light, light_factor};
use crate::constants::{BLOCK_SCALE, FLOWING_UV_SCALE};
use crate::settings::RenderSettings;
use crate::tile_model::BlockModelView;

/// Returned by [`LiquidModelBuilder::flowing_angle`] for still liquids.
pub const NOT_FLOWING: i32 = -1;

// Corner height used when no neighbor contributes a height.
const FALLBACK_CORNER_HEIGHT: f32 = 3.0;

/// Corner indices per face, in emission order.
const FACES: [(Face, [usize; 4]); 6] = [
    (Face::NegY, [0, 2, 3, 1]),
    (Face::PosY, [5, 7, 6, 4]),
    (Face::NegZ, [2, 0, 4, 6]),
    (Face::PosZ, [1, 3, 7, 5]),
    (Face::NegX, [0, 1, 5, 4]),
    (Face::PosX, [3, 2, 6, 7]),
];

/// Builds the surface of one liquid voxel: up to six quads with a sloped top
/// that follows the neighboring liquid levels.
///
/// Holds scratch state between calls, so use one builder per worker.
pub struct LiquidModelBuilder<'a> {
    settings: &'a dyn RenderSettings,
    colors: &'a dyn BlockColorCalculator,
    corners: [Vec3; 8],
    uvs: [Vec2; 4],
    uv_transform: Mat3,
    flow: Vec2,
    tint: Color,
}

impl<'a> LiquidModelBuilder<'a> {
    pub fn new(settings: &'a dyn RenderSettings, colors: &'a dyn BlockColorCalculator) -> Self {
        Self {
            settings,
            colors,
            corners: Self::unit_corners(),
            uvs: [Vec2::ZERO; 4],
            uv_transform: Mat3::IDENTITY,
            flow: Vec2::ZERO,
            tint: Color::WHITE,
        }
    }

    fn unit_corners() -> [Vec3; 8] {
        [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 16.0),
            Vec3::new(16.0, 0.0, 0.0),
            Vec3::new(16.0, 0.0, 16.0),
            Vec3::new(0.0, 16.0, 0.0),
            Vec3::new(0.0, 16.0, 16.0),
            Vec3::new(16.0, 16.0, 0.0),
            Vec3::new(16.0, 16.0, 16.0),
        ]
    }

    /// Appends the liquid geometry of `state` at `block` to `view` and writes
    /// its map color into `color`.
    ///
    /// `state` is usually `block.block_state()`, but differs when rendering the
    /// water inside a waterlogged block. Voxels removed as caves leave `color`
    /// untouched.
    pub fn build(
        &mut self,
        block: &dyn BlockNeighborhood,
        state: &BlockState,
        model: &ResolvedBlockModel,
        view: &mut BlockModelView<'_>,
        color: &mut Color,
    ) {
        let (_, y, _) = block.position();
        if y < self.settings.remove_caves_below_y() {
            let light = if self.settings.cave_detection_uses_block_light() {
                block.block_light()
            } else {
                block.sky_light()
            };
            if light == 0 {
                return;
            }
        }

        self.corners = Self::unit_corners();
        let level = state.liquid_level();
        if level < 8 && !(level == 0 && is_same_liquid(state, &block.neighbor(0, 1, 0))) {
            self.corners[4].y = corner_height(block, state, -1, -1);
            self.corners[5].y = corner_height(block, state, -1, 0);
            self.corners[6].y = corner_height(block, state, 0, -1);
            self.corners[7].y = corner_height(block, state, 0, 0);
        }

        self.tint = Color::WHITE;
        if state.is_water() {
            self.tint = self.colors.water_average_color(block);
        }

        let still = model.still.id;
        let flow = model.flow.id;
        let model_start = view.end();
        let mut up_rendered = false;
        for (face, corners) in FACES {
            let rendered = self.create_face(block, state, view, face, corners, still, flow);
            if face == Face::PosY {
                up_rendered = rendered;
            }
        }

        view.initialize_at(model_start);
        view.scale(BLOCK_SCALE, BLOCK_SCALE, BLOCK_SCALE);

        if up_rendered {
            color.set_from(&model.still.color);
            color.multiply(&self.tint);
            let factor = light_factor(self.settings.ambient_light(), block.block_light(), block.sky_light());
            apply_light(color, factor);
        } else {
            color.set(0.0, 0.0, 0.0, 0.0, true);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn create_face(
        &mut self,
        block: &dyn BlockNeighborhood,
        state: &BlockState,
        view: &mut BlockModelView<'_>,
        face: Face,
        corners: [usize; 4],
        still: u32,
        flow: u32,
    ) -> bool {
        let (dx, dy, dz) = face.delta();
        let neighbor = block.neighbor(dx, dy, dz);
        if is_same_liquid(state, &neighbor) || (face != Face::PosY && neighbor.properties.culling) {
            return false;
        }
        let (nb_block_light, nb_sky_light) = (neighbor.block_light, neighbor.sky_light);

        view.initialize();
        let f1 = view.add(2);
        let f2 = f1 + 1;

        let [c0, c1, c2, c3] = corners.map(|i| self.corners[i]);
        let tile = view.model();
        tile.set_positions(f1, c0.x, c0.y, c0.z, c1.x, c1.y, c1.z, c2.x, c2.y, c2.z);
        tile.set_positions(f2, c0.x, c0.y, c0.z, c2.x, c2.y, c2.z, c3.x, c3.y, c3.z);

        self.uvs[0].set(0.0, 1.0);
        self.uvs[1].set(1.0, 1.0);
        self.uvs[2].set(1.0, 0.0);
        self.uvs[3].set(0.0, 0.0);

        let mut flowing = false;
        match face {
            Face::PosY => {
                let angle = flowing_angle(block, state, &mut self.flow);
                if angle != NOT_FLOWING {
                    flowing = true;
                    self.uv_transform
                        .identity()
                        .translate(-0.5, -0.5)
                        .scale(0.5, 0.5, 1.0)
                        .rotate(-angle as f32, 0.0, 0.0, 1.0)
                        .translate(0.5, 0.5);
                    for uv in &mut self.uvs {
                        uv.transform(&self.uv_transform);
                    }
                }
            }
            Face::NegY => {}
            _ => {
                flowing = true;
                for uv in &mut self.uvs {
                    uv.transform(&FLOWING_UV_SCALE);
                }
            }
        }

        let uv = self.uvs;
        let tile = view.model();
        tile.set_uvs(f1, uv[0].x, uv[0].y, uv[1].x, uv[1].y, uv[2].x, uv[2].y);
        tile.set_uvs(f2, uv[0].x, uv[0].y, uv[2].x, uv[2].y, uv[3].x, uv[3].y);

        let material = if flowing { flow } else { still };
        tile.set_material_index(f1, material);
        tile.set_material_index(f2, material);

        let t = self.tint;
        tile.set_color(f1, t.r, t.g, t.b);
        tile.set_color(f2, t.r, t.g, t.b);

        tile.set_aos(f1, 1.0, 1.0, 1.0);
        tile.set_aos(f2, 1.0, 1.0, 1.0);

        let (block_light, sky_light) = if face == Face::PosY {
            (block.block_light(), block.sky_light())
        } else {
            (nb_block_light, nb_sky_light)
        };
        tile.set_block_light(f1, block_light);
        tile.set_block_light(f2, block_light);
        tile.set_sky_light(f1, sky_light);
        tile.set_sky_light(f2, sky_light);

        true
    }
}

/// Same liquid type as `state` (any level), counting waterlogged blocks as water.
pub fn is_same_liquid(state: &BlockState, other: &ExtendedBlock<'_>) -> bool {
    if other.state.id() == state.id() {
        return true;
    }
    state.is_water() && (other.state.is_waterlogged() || other.properties.always_waterlogged)
}

/// Height of a liquid surface in model units for a given `level` property.
#[inline]
pub fn liquid_base_height(state: &BlockState) -> f32 {
    let level = state.liquid_level();
    if level >= 8 { 16.0 } else { 14.0 - level as f32 * 1.9 }
}

// Anything except plain air stops a liquid corner from sinking.
fn is_liquid_blocking(other: &ExtendedBlock<'_>) -> bool {
    !other.is_plain_air()
}

/// Height of the top corner shared by the four columns `x..=x+1, z..=z+1`.
fn corner_height(block: &dyn BlockNeighborhood, state: &BlockState, x: i32, z: i32) -> f32 {
    for ix in x..=x + 1 {
        for iz in z..=z + 1 {
            if is_same_liquid(state, &block.neighbor(ix, 1, iz)) {
                return 16.0;
            }
        }
    }

    let mut sum = 0.0f32;
    let mut count = 0u32;
    for ix in x..=x + 1 {
        for iz in z..=z + 1 {
            let neighbor = block.neighbor(ix, 0, iz);
            if is_same_liquid(state, &neighbor) {
                if neighbor.state.liquid_level() == 0 {
                    return 14.0;
                }
                sum += liquid_base_height(neighbor.state);
                count += 1;
            } else if !is_liquid_blocking(&neighbor) {
                count += 1;
            }
        }
    }

    if sum == 0.0 || count == 0 {
        log::trace!(
            "liquid corner ({x},{z}) at {:?} has no height source, using {FALLBACK_CORNER_HEIGHT}",
            block.position()
        );
        return FALLBACK_CORNER_HEIGHT;
    }
    sum / count as f32
}

/// Flow direction of the liquid surface in whole degrees, or [`NOT_FLOWING`].
pub fn flowing_angle(block: &dyn BlockNeighborhood, state: &BlockState, flow: &mut Vec2) -> i32 {
    let own = liquid_base_height(state) * BLOCK_SCALE;
    if own > 0.8 {
        return NOT_FLOWING;
    }

    flow.set(0.0, 0.0);
    flow.x += compare_heights(block, state, own, -1, 0);
    flow.x -= compare_heights(block, state, own, 1, 0);
    flow.y -= compare_heights(block, state, own, 0, -1);
    flow.y += compare_heights(block, state, own, 0, 1);

    if flow.x == 0.0 && flow.y == 0.0 {
        return NOT_FLOWING;
    }

    let angle = flow.angle_to(0.0, -1.0).to_degrees() as i32;
    if flow.x < 0.0 { angle } else { -angle }
}

fn compare_heights(block: &dyn BlockNeighborhood, state: &BlockState, own: f32, dx: i32, dz: i32) -> f32 {
    let neighbor = block.neighbor(dx, 0, dz);
    if neighbor.is_air() || !is_same_liquid(state, &neighbor) {
        return 0.0;
    }
    liquid_base_height(neighbor.state) * BLOCK_SCALE - own
}
