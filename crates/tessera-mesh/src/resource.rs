use tessera_blocks::{Face, ResolvedBlockModel, ResolvedElement, ResolvedFace};
use tessera_geom::{Color, Vec2, Vec3};
use tessera_world::BlockNeighborhood;

use crate::color::{BlockColorCalculator, apply_light, light_factor};
use crate::constants::{AO_LEVELS, BLOCK_SCALE};
use crate::settings::RenderSettings;
use crate::tile_model::BlockModelView;

/// Which element bound (`false` = from, `true` = to) each face corner takes per
/// axis, in the same winding the liquid builder uses.
const CORNERS: [[(bool, bool, bool); 4]; 6] = [
    // PosY
    [(false, true, true), (true, true, true), (true, true, false), (false, true, false)],
    // NegY
    [(false, false, false), (true, false, false), (true, false, true), (false, false, true)],
    // PosX
    [(true, false, true), (true, false, false), (true, true, false), (true, true, true)],
    // NegX
    [(false, false, false), (false, false, true), (false, true, true), (false, true, false)],
    // PosZ
    [(false, false, true), (true, false, true), (true, true, true), (false, true, true)],
    // NegZ
    [(true, false, false), (false, false, false), (false, true, false), (true, true, false)],
];

/// Builds block geometry from resolved model elements, with per-vertex
/// ambient occlusion on faces that sit on the block boundary.
///
/// Like [`LiquidModelBuilder`](crate::LiquidModelBuilder) it keeps scratch
/// buffers and is meant to be owned by a single worker.
pub struct ResourceModelBuilder<'a> {
    settings: &'a dyn RenderSettings,
    colors: &'a dyn BlockColorCalculator,
    corners: [Vec3; 4],
    uvs: [Vec2; 4],
    aos: [f32; 4],
}

impl<'a> ResourceModelBuilder<'a> {
    pub fn new(settings: &'a dyn RenderSettings, colors: &'a dyn BlockColorCalculator) -> Self {
        Self {
            settings,
            colors,
            corners: [Vec3::ZERO; 4],
            uvs: [Vec2::ZERO; 4],
            aos: [1.0; 4],
        }
    }

    pub fn build(
        &mut self,
        block: &dyn BlockNeighborhood,
        model: &ResolvedBlockModel,
        view: &mut BlockModelView<'_>,
        color: &mut Color,
    ) {
        let (_, y, _) = block.position();
        if y < self.settings.remove_caves_below_y() && !is_lit(block, self.settings.cave_detection_uses_block_light()) {
            return;
        }

        let model_start = view.end();
        // Highest emitted upward face: (top y, texture color, tint, block light, sky light).
        let mut top: Option<(f32, Color, Color, u8, u8)> = None;
        for element in &model.elements {
            for face in Face::ALL {
                let Some(rf) = element.face(face) else {
                    continue;
                };
                if let Some((top_y, tint, bl, sl)) = self.create_face(block, element, face, rf, view) {
                    if face == Face::PosY && top.as_ref().is_none_or(|t| top_y > t.0) {
                        top = Some((top_y, rf.texture.color, tint, bl, sl));
                    }
                }
            }
        }

        view.initialize_at(model_start);
        view.scale(BLOCK_SCALE, BLOCK_SCALE, BLOCK_SCALE);

        match top {
            Some((_, texture_color, tint, bl, sl)) => {
                color.set_from(&texture_color);
                color.multiply(&tint);
                apply_light(color, light_factor(self.settings.ambient_light(), bl, sl));
            }
            None => {
                color.set(0.0, 0.0, 0.0, 0.0, true);
            }
        }
    }

    /// Emits one element face. Returns the face's plane height, tint and light
    /// when it was not culled.
    fn create_face(
        &mut self,
        block: &dyn BlockNeighborhood,
        element: &ResolvedElement,
        face: Face,
        rf: &ResolvedFace,
        view: &mut BlockModelView<'_>,
    ) -> Option<(f32, Color, u8, u8)> {
        if let Some(cull) = rf.cullface {
            let (dx, dy, dz) = cull.delta();
            if block.neighbor(dx, dy, dz).properties.culling {
                return None;
            }
        }

        let (from, to) = (element.from, element.to);
        for (i, &(bx, by, bz)) in CORNERS[face.index()].iter().enumerate() {
            let p = Vec3::new(
                if bx { to.x } else { from.x },
                if by { to.y } else { from.y },
                if bz { to.z } else { from.z },
            );
            self.corners[i] = p;
            self.uvs[i] = face_uv(face, p);
        }

        let on_boundary = is_on_boundary(face, from, to);
        let (dx, dy, dz) = face.delta();
        let (block_light, sky_light) = if on_boundary {
            let n = block.neighbor(dx, dy, dz);
            (n.block_light, n.sky_light)
        } else {
            (block.block_light(), block.sky_light())
        };
        for i in 0..4 {
            self.aos[i] = if on_boundary {
                corner_ao(block, face, self.corners[i])
            } else {
                1.0
            };
        }

        let tint = if rf.tint {
            self.colors.foliage_color(block)
        } else {
            Color::WHITE
        };

        view.initialize();
        let f1 = view.add(2);
        let f2 = f1 + 1;
        let [c0, c1, c2, c3] = self.corners;
        let [u0, u1, u2, u3] = self.uvs;
        let ao = self.aos;
        let tile = view.model();
        tile.set_positions(f1, c0.x, c0.y, c0.z, c1.x, c1.y, c1.z, c2.x, c2.y, c2.z);
        tile.set_positions(f2, c0.x, c0.y, c0.z, c2.x, c2.y, c2.z, c3.x, c3.y, c3.z);
        tile.set_uvs(f1, u0.x, u0.y, u1.x, u1.y, u2.x, u2.y);
        tile.set_uvs(f2, u0.x, u0.y, u2.x, u2.y, u3.x, u3.y);
        tile.set_material_index(f1, rf.texture.id);
        tile.set_material_index(f2, rf.texture.id);
        tile.set_color(f1, tint.r, tint.g, tint.b);
        tile.set_color(f2, tint.r, tint.g, tint.b);
        tile.set_aos(f1, ao[0], ao[1], ao[2]);
        tile.set_aos(f2, ao[0], ao[2], ao[3]);
        tile.set_block_light(f1, block_light);
        tile.set_block_light(f2, block_light);
        tile.set_sky_light(f1, sky_light);
        tile.set_sky_light(f2, sky_light);

        Some((to.y.max(from.y), tint, block_light, sky_light))
    }
}

// A solid voxel carries no light of its own, so it counts as lit when any face neighbor is.
fn is_lit(block: &dyn BlockNeighborhood, use_block_light: bool) -> bool {
    let level = |bl: u8, sl: u8| if use_block_light { bl } else { sl };
    if level(block.block_light(), block.sky_light()) > 0 {
        return true;
    }
    Face::ALL.iter().any(|f| {
        let (dx, dy, dz) = f.delta();
        let n = block.neighbor(dx, dy, dz);
        level(n.block_light, n.sky_light) > 0
    })
}

fn is_on_boundary(face: Face, from: Vec3, to: Vec3) -> bool {
    match face {
        Face::PosY => to.y >= 16.0,
        Face::NegY => from.y <= 0.0,
        Face::PosX => to.x >= 16.0,
        Face::NegX => from.x <= 0.0,
        Face::PosZ => to.z >= 16.0,
        Face::NegZ => from.z <= 0.0,
    }
}

/// Texture coordinates of a face corner, from the two in-plane axes with v
/// pointing down the texture.
fn face_uv(face: Face, p: Vec3) -> Vec2 {
    let (x, y, z) = (p.x / 16.0, p.y / 16.0, p.z / 16.0);
    match face {
        Face::PosY => Vec2::new(x, z),
        Face::NegY => Vec2::new(x, 1.0 - z),
        Face::PosX => Vec2::new(1.0 - z, 1.0 - y),
        Face::NegX => Vec2::new(z, 1.0 - y),
        Face::PosZ => Vec2::new(x, 1.0 - y),
        Face::NegZ => Vec2::new(1.0 - x, 1.0 - y),
    }
}

/// Ambient occlusion of one face corner from the voxels in front of the face
/// touching that corner.
fn corner_ao(block: &dyn BlockNeighborhood, face: Face, corner: Vec3) -> f32 {
    let (dx, dy, dz) = face.delta();
    let step = |v: f32| if v >= 8.0 { 1 } else { -1 };
    // The two in-plane axis offsets for this corner.
    let (a, b) = match face {
        Face::PosY | Face::NegY => ((step(corner.x), 0, 0), (0, 0, step(corner.z))),
        Face::PosX | Face::NegX => ((0, step(corner.y), 0), (0, 0, step(corner.z))),
        Face::PosZ | Face::NegZ => ((step(corner.x), 0, 0), (0, step(corner.y), 0)),
    };
    let occludes = |ox: i32, oy: i32, oz: i32| block.neighbor(dx + ox, dy + oy, dz + oz).properties.occluding;
    let side1 = occludes(a.0, a.1, a.2);
    let side2 = occludes(b.0, b.1, b.2);
    if side1 && side2 {
        return AO_LEVELS[3];
    }
    let diagonal = occludes(a.0 + b.0, a.1 + b.1, a.2 + b.2);
    let count = side1 as usize + side2 as usize + diagonal as usize;
    AO_LEVELS[count]
}
