use tessera_blocks::{BlockModel, BlockProperties, BlockState, Face, ModelCatalog, TextureCatalog};
use tessera_geom::{Color, Vec2, Vec3};
use tessera_mesh::liquid::{NOT_FLOWING, flowing_angle, liquid_base_height};
use tessera_mesh::{
    BiomeColorCalculator, BlockModelView, HiresTileModel, LiquidModelBuilder, RenderSettingsData,
};
use tessera_world::{DEFAULT_WATER_COLOR, VoxelGrid};

fn catalog() -> ModelCatalog {
    let mut textures = TextureCatalog::new();
    textures.insert("water_still", Color::new(0.5, 0.5, 0.5, 1.0, false));
    textures.insert("water_flow", Color::new(0.5, 0.5, 0.5, 1.0, false));
    textures.insert("lava_still", Color::new(1.0, 0.5, 0.0, 1.0, false));
    textures.insert("lava_flow", Color::new(1.0, 0.5, 0.0, 1.0, false));
    textures.insert("stone", Color::new(0.5, 0.5, 0.5, 1.0, false));
    let mut catalog = ModelCatalog::new(textures);
    catalog.insert_model("stone", &BlockModel::cube("stone"));
    catalog
}

fn no_caves() -> RenderSettingsData {
    RenderSettingsData {
        remove_caves_below_y: i32::MIN,
        ..Default::default()
    }
}

fn water(level: i32) -> BlockState {
    BlockState::with_properties("water", [("level", level.to_string())])
}

fn grid() -> VoxelGrid {
    VoxelGrid::new((0, 0, 0), 3, 3, 3)
}

fn build(grid: &VoxelGrid, settings: &RenderSettingsData, pos: (i32, i32, i32), color: &mut Color) -> HiresTileModel {
    let colors = BiomeColorCalculator::default();
    let catalog = catalog();
    let mut builder = LiquidModelBuilder::new(settings, &colors);
    let mut model = HiresTileModel::new();
    let block = grid.neighborhood(pos.0, pos.1, pos.2);
    let state = grid.block(pos.0, pos.1, pos.2);
    let mut view = BlockModelView::new(&mut model);
    builder.build(&block, state, catalog.model_for(state), &mut view, color);
    model
}

fn vertices(model: &HiresTileModel, face: usize) -> [Vec3; 3] {
    let p = model.positions(face);
    [
        Vec3::new(p[0], p[1], p[2]),
        Vec3::new(p[3], p[4], p[5]),
        Vec3::new(p[6], p[7], p[8]),
    ]
}

/// Outward direction of each triangle, snapped to the dominant axis.
fn directions(model: &HiresTileModel) -> Vec<Face> {
    (0..model.size())
        .map(|f| {
            let [a, b, c] = vertices(model, f);
            let n = (b - a).cross(c - a);
            let (ax, ay, az) = (n.x.abs(), n.y.abs(), n.z.abs());
            if ay >= ax && ay >= az {
                if n.y > 0.0 { Face::PosY } else { Face::NegY }
            } else if ax >= az {
                if n.x > 0.0 { Face::PosX } else { Face::NegX }
            } else if n.z > 0.0 {
                Face::PosZ
            } else {
                Face::NegZ
            }
        })
        .collect()
}

fn top_vertices(model: &HiresTileModel) -> Vec<Vec3> {
    let dirs = directions(model);
    (0..model.size())
        .filter(|f| dirs[*f] == Face::PosY)
        .flat_map(|f| vertices(model, f))
        .collect()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn same_liquid_above_makes_every_corner_full_height() {
    let mut g = grid();
    g.set_block(1, 1, 1, &water(3));
    g.set_block(1, 2, 1, &water(5));
    let mut color = Color::WHITE;
    let model = build(&g, &no_caves(), (1, 1, 1), &mut color);

    // Top face hidden by the water above, the others open to air.
    assert_eq!(model.size(), 10);
    assert!(!directions(&model).contains(&Face::PosY));
    let max_y = (0..model.size())
        .flat_map(|f| vertices(&model, f))
        .map(|v| v.y)
        .fold(f32::MIN, f32::max);
    assert!(approx(max_y, 1.0));
    assert_eq!(color, Color::TRANSPARENT);
}

#[test]
fn lone_liquid_corner_is_average_with_air() {
    let mut g = grid();
    g.set_block(1, 1, 1, &water(3));
    let mut color = Color::TRANSPARENT;
    let model = build(&g, &no_caves(), (1, 1, 1), &mut color);

    assert_eq!(model.size(), 12);
    // Own height 14 - 3 * 1.9 averaged with three air columns.
    let expected = (14.0 - 3.0 * 1.9) / 4.0 / 16.0;
    for v in top_vertices(&model) {
        assert!(approx(v.y, expected), "{} != {expected}", v.y);
    }
}

#[test]
fn non_air_neighbors_do_not_dilute_corner_height() {
    let mut g = grid();
    for x in 0..3 {
        for z in 0..3 {
            g.set_block(x, 1, z, &BlockState::new("cave_air"));
        }
    }
    g.set_block(1, 1, 1, &water(3));
    let mut color = Color::TRANSPARENT;
    let model = build(&g, &no_caves(), (1, 1, 1), &mut color);
    let expected = (14.0 - 3.0 * 1.9) / 16.0;
    for v in top_vertices(&model) {
        assert!(approx(v.y, expected));
    }
}

#[test]
fn level_zero_neighbor_pins_corner_to_fourteen() {
    let mut g = grid();
    g.set_block(1, 1, 1, &water(2));
    g.set_block(2, 1, 1, &water(0));
    let mut color = Color::TRANSPARENT;
    let model = build(&g, &no_caves(), (1, 1, 1), &mut color);

    let low = (14.0 - 2.0 * 1.9) / 4.0 / 16.0;
    let top = top_vertices(&model);
    assert!(!top.is_empty());
    for v in top {
        if approx(v.x, 1.0) {
            assert!(approx(v.y, 14.0 / 16.0));
        } else {
            assert!(approx(v.y, low));
        }
    }
    // The east face is hidden by the neighboring water.
    assert!(!directions(&model).contains(&Face::PosX));
}

#[test]
fn base_height_is_decreasing_below_eight() {
    let mut previous = f32::MAX;
    for level in 0..8 {
        let h = liquid_base_height(&water(level));
        assert!(approx(h, 14.0 - level as f32 * 1.9));
        assert!(h < previous);
        previous = h;
    }
    for level in 8..16 {
        assert_eq!(liquid_base_height(&water(level)), 16.0);
    }
}

#[test]
fn high_or_level_liquid_does_not_flow() {
    let mut flow = Vec2::ZERO;
    let mut g = grid();
    g.set_block(1, 1, 1, &water(0));
    g.set_block(0, 1, 1, &water(7));
    assert_eq!(flowing_angle(&g.neighborhood(1, 1, 1), &water(0), &mut flow), NOT_FLOWING);

    // Same heights all around.
    let mut g = grid();
    for (x, z) in [(1, 1), (0, 1), (2, 1), (1, 0), (1, 2)] {
        g.set_block(x, 1, z, &water(3));
    }
    assert_eq!(flowing_angle(&g.neighborhood(1, 1, 1), &water(3), &mut flow), NOT_FLOWING);

    // Only air around.
    let mut g = grid();
    g.set_block(1, 1, 1, &water(3));
    assert_eq!(flowing_angle(&g.neighborhood(1, 1, 1), &water(3), &mut flow), NOT_FLOWING);
}

#[test]
fn flow_angle_for_single_higher_neighbor() {
    let mut flow = Vec2::ZERO;
    let mut g = grid();
    g.set_block(1, 1, 1, &water(2));
    g.set_block(2, 1, 1, &water(0));
    // Higher water to the east gives a flow vector along -x.
    assert_eq!(flowing_angle(&g.neighborhood(1, 1, 1), &water(2), &mut flow), 90);
    assert!(flow.x < 0.0 && flow.y == 0.0);

    let mut g = grid();
    g.set_block(1, 1, 1, &water(2));
    g.set_block(0, 1, 1, &water(1));
    assert_eq!(flowing_angle(&g.neighborhood(1, 1, 1), &water(2), &mut flow), -90);

    let mut g = grid();
    g.set_block(1, 1, 1, &water(2));
    g.set_block(1, 1, 0, &water(1));
    // Higher water to the north gives a flow vector along (0, -1) itself.
    assert_eq!(flowing_angle(&g.neighborhood(1, 1, 1), &water(2), &mut flow), 0);
    assert!(flow.x == 0.0 && flow.y < 0.0);
}

#[test]
fn flowing_top_uses_rotated_flow_texture() {
    let catalog = catalog();
    let flow_id = catalog.textures().texture("water_flow").unwrap().id;
    let still_id = catalog.textures().texture("water_still").unwrap().id;

    let mut g = grid();
    g.set_block(1, 1, 1, &water(2));
    g.set_block(2, 1, 1, &water(0));
    let mut color = Color::TRANSPARENT;
    let model = build(&g, &no_caves(), (1, 1, 1), &mut color);
    let dirs = directions(&model);
    for f in 0..model.size() {
        let uv = model.uvs(f);
        match dirs[f] {
            Face::PosY => {
                assert_eq!(model.material_index(f), flow_id);
                // Rotated by -90 degrees around the center of the half-size window.
                for i in 0..3 {
                    assert!((0.25 - 1e-5..=0.75 + 1e-5).contains(&uv[i * 2]));
                }
            }
            Face::NegY => {
                assert_eq!(model.material_index(f), still_id);
                assert!(uv.iter().all(|c| *c == 0.0 || *c == 1.0));
            }
            _ => {
                assert_eq!(model.material_index(f), flow_id);
                assert!(uv.iter().all(|c| approx(*c, 0.25) || approx(*c, 0.75)));
            }
        }
    }
    // First top triangle starts at corner c5 whose uv (0,1) rotates to (0.75, 0.75).
    let first_top = (0..model.size()).find(|f| dirs[*f] == Face::PosY).unwrap();
    let uv = model.uvs(first_top);
    assert!(approx(uv[0], 0.75) && approx(uv[1], 0.75));
}

#[test]
fn still_top_uses_plain_still_texture() {
    let catalog = catalog();
    let still_id = catalog.textures().texture("water_still").unwrap().id;
    let mut g = grid();
    g.set_block(1, 1, 1, &water(0));
    let mut color = Color::TRANSPARENT;
    let model = build(&g, &no_caves(), (1, 1, 1), &mut color);
    let dirs = directions(&model);
    let top: Vec<usize> = (0..model.size()).filter(|f| dirs[*f] == Face::PosY).collect();
    assert_eq!(top.len(), 2);
    assert_eq!(model.uvs(top[0]), [0.0, 1.0, 1.0, 1.0, 1.0, 0.0]);
    assert_eq!(model.uvs(top[1]), [0.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
    assert!(top.iter().all(|f| model.material_index(*f) == still_id));
}

#[test]
fn culling_neighbors_hide_side_faces_but_not_the_top() {
    let mut g = grid();
    g.set_block(1, 1, 1, &BlockState::new("lava"));
    let stone = BlockState::new("stone");
    g.set_block(1, 0, 1, &stone);
    g.set_block(2, 1, 1, &stone);
    g.set_block(1, 2, 1, &stone);
    g.set_sky_light(1, 1, 1, 15);
    let mut color = Color::TRANSPARENT;
    let model = build(&g, &no_caves(), (1, 1, 1), &mut color);

    let dirs = directions(&model);
    assert_eq!(model.size(), 8);
    assert!(!dirs.contains(&Face::NegY));
    assert!(!dirs.contains(&Face::PosX));
    assert!(dirs.contains(&Face::PosY));
    assert!(!color.is_transparent());
}

#[test]
fn waterlogged_neighbor_counts_as_water() {
    let mut g = grid();
    g.set_block(1, 1, 1, &water(0));
    let logged = BlockState::with_properties("oak_stairs", [("waterlogged", "true")]);
    g.set_block_with(1, 1, 0, &logged, BlockProperties::NONE);
    g.set_block(1, 1, 2, &BlockState::new("seagrass"));
    let mut color = Color::TRANSPARENT;
    let model = build(&g, &no_caves(), (1, 1, 1), &mut color);
    let dirs = directions(&model);
    assert!(!dirs.contains(&Face::NegZ));
    assert!(!dirs.contains(&Face::PosZ));
    assert!(dirs.contains(&Face::PosX));
}

#[test]
fn color_is_still_texture_times_tint_and_light() {
    let mut g = grid();
    g.set_block(1, 1, 1, &water(0));
    g.set_sky_light(1, 1, 1, 15);
    let mut color = Color::TRANSPARENT;
    build(&g, &no_caves(), (1, 1, 1), &mut color);
    assert!(approx(color.r, 0.5 * DEFAULT_WATER_COLOR.r));
    assert!(approx(color.b, 0.5 * DEFAULT_WATER_COLOR.b));
    assert!(approx(color.a, 1.0));

    // Half light with no ambient halves rgb only.
    g.set_sky_light(1, 1, 1, 0);
    g.set_block_light(1, 1, 1, 15);
    let settings = RenderSettingsData {
        ambient_light: 0.0,
        ..no_caves()
    };
    let mut lit = Color::TRANSPARENT;
    build(&g, &settings, (1, 1, 1), &mut lit);
    assert!(approx(lit.r, color.r));

    let mut g = grid();
    g.set_block(1, 1, 1, &water(0));
    let mut dark = Color::TRANSPARENT;
    let settings = RenderSettingsData {
        ambient_light: 1.0,
        ..no_caves()
    };
    build(&g, &settings, (1, 1, 1), &mut dark);
    assert!(approx(dark.r, color.r * 0.5));
    assert!(approx(dark.a, 1.0));
}

#[test]
fn faces_take_light_from_the_voxel_they_face() {
    let mut g = grid();
    g.set_block(1, 1, 1, &water(0));
    g.set_sky_light(1, 1, 1, 11);
    g.set_sky_light(0, 1, 1, 4);
    g.set_block_light(1, 0, 1, 9);
    let mut color = Color::TRANSPARENT;
    let model = build(&g, &no_caves(), (1, 1, 1), &mut color);
    let dirs = directions(&model);
    for f in 0..model.size() {
        match dirs[f] {
            Face::PosY => assert_eq!(model.sky_light(f), 11),
            Face::NegX => assert_eq!(model.sky_light(f), 4),
            Face::NegY => assert_eq!(model.block_light(f), 9),
            _ => assert_eq!(model.sky_light(f), 0),
        }
        assert_eq!(model.aos(f), [1.0, 1.0, 1.0]);
    }
}

#[test]
fn dark_liquid_below_cave_level_is_skipped() {
    let mut g = grid();
    g.set_block(1, 1, 1, &water(0));
    let settings = RenderSettingsData {
        remove_caves_below_y: 10,
        ..Default::default()
    };
    let mut color = Color::new(0.1, 0.2, 0.3, 0.4, true);
    let model = build(&g, &settings, (1, 1, 1), &mut color);
    assert!(model.is_empty());
    assert_eq!(color, Color::new(0.1, 0.2, 0.3, 0.4, true));

    // Lit by a torch, but detection looks at sky light.
    g.set_block_light(1, 1, 1, 12);
    assert!(build(&g, &settings, (1, 1, 1), &mut color).is_empty());

    let by_block_light = RenderSettingsData {
        cave_detection_uses_block_light: true,
        ..settings
    };
    assert_eq!(build(&g, &by_block_light, (1, 1, 1), &mut color).size(), 12);
}

#[test]
fn builder_is_reusable_across_calls() {
    let settings = no_caves();
    let colors = BiomeColorCalculator::default();
    let catalog = catalog();
    let mut builder = LiquidModelBuilder::new(&settings, &colors);

    let mut lone = grid();
    lone.set_block(1, 1, 1, &water(3));
    let mut stacked = grid();
    stacked.set_block(1, 1, 1, &water(3));
    stacked.set_block(1, 2, 1, &water(3));

    let model_for = catalog.model_for(&water(3));
    let mut model = HiresTileModel::new();
    let mut view = BlockModelView::new(&mut model);
    let mut color = Color::TRANSPARENT;
    builder.build(&lone.neighborhood(1, 1, 1), &water(3), model_for, &mut view, &mut color);
    assert_eq!(view.len(), 12);
    builder.build(&stacked.neighborhood(1, 1, 1), &water(3), model_for, &mut view, &mut color);
    // The second call covers only its own faces and starts from fresh corners.
    assert_eq!((view.start(), view.len()), (12, 10));
    let (start, end) = (view.start(), view.end());
    let max_y = (start..end)
        .flat_map(|f| vertices(&model, f))
        .map(|v| v.y)
        .fold(f32::MIN, f32::max);
    assert!(approx(max_y, 1.0));
}
