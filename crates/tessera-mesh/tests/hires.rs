use tessera_blocks::{BlockModel, BlockState, ModelCatalog, TextureCatalog};
use tessera_geom::Color;
use tessera_mesh::{BiomeColorCalculator, HiresTileModel, HiresTileRenderer, RenderSettingsData, TileColors};
use tessera_renderstate::TileState;
use tessera_world::VoxelGrid;

fn catalog() -> ModelCatalog {
    let mut textures = TextureCatalog::new();
    textures.insert("stone", Color::new(0.5, 0.5, 0.5, 1.0, false));
    textures.insert("water_still", Color::new(1.0, 1.0, 1.0, 0.5, false));
    textures.insert("water_flow", Color::new(1.0, 1.0, 1.0, 0.5, false));
    let mut catalog = ModelCatalog::new(textures);
    catalog.insert_model("stone", &BlockModel::cube("stone"));
    catalog
}

/// 4x4 columns: stone floor at y=0, still water at y=1 over x < 2.
fn world() -> VoxelGrid {
    let mut g = VoxelGrid::new((0, 0, 0), 4, 4, 4);
    for x in 0..4 {
        for z in 0..4 {
            g.set_block(x, 0, z, &BlockState::new("stone"));
            if x < 2 {
                g.set_block(x, 1, z, BlockState::water());
            }
        }
    }
    g.compute_sky_light();
    g
}

fn settings() -> RenderSettingsData {
    RenderSettingsData {
        remove_caves_below_y: i32::MIN,
        ..Default::default()
    }
}

fn render(settings: &RenderSettingsData, model: &mut HiresTileModel, lowres: &mut TileColors) -> tessera_mesh::TileRenderResult {
    let catalog = catalog();
    let colors = BiomeColorCalculator::default();
    let world = world();
    let mut renderer = HiresTileRenderer::new(settings, &catalog, &colors);
    renderer.render(&world, (0, 0), (3, 3), model, lowres)
}

#[test]
fn renders_columns_with_heights_and_colors() {
    let mut model = HiresTileModel::new();
    let mut lowres = TileColors::default();
    let result = render(&settings(), &mut model, &mut lowres);

    assert_eq!(result.state, TileState::Rendered);
    assert_eq!(result.faces, model.size());
    assert!(result.faces > 0);
    assert_eq!((lowres.width(), lowres.depth()), (4, 4));
    for z in 0..4 {
        for x in 0..4 {
            let expected = if x < 2 { 1 } else { 0 };
            assert_eq!(lowres.height(x, z), expected, "column {x},{z}");
            assert!((lowres.color(x, z).a - 1.0).abs() < 1e-5);
        }
    }
    // Translucent water is composited over the stone below it.
    let wet = lowres.color(0, 0);
    let dry = lowres.color(3, 0);
    assert_ne!(wet, dry);
    assert!(wet.b > wet.r);
}

#[test]
fn positions_are_relative_to_the_tile_origin() {
    let catalog = catalog();
    let colors = BiomeColorCalculator::default();
    let mut world = VoxelGrid::new((100, 0, -50), 2, 2, 2);
    world.set_block(101, 0, -49, &BlockState::new("stone"));
    world.compute_sky_light();
    let settings = settings();
    let mut renderer = HiresTileRenderer::new(&settings, &catalog, &colors);
    let mut model = HiresTileModel::new();
    let mut lowres = TileColors::default();
    let result = renderer.render(&world, (100, -50), (101, -49), &mut model, &mut lowres);
    assert_eq!(result.faces, 12);
    for f in 0..model.size() {
        let p = model.positions(f);
        for v in p.chunks_exact(3) {
            assert!((1.0..=2.0).contains(&v[0]));
            assert!((0.0..=1.0).contains(&v[1]));
            assert!((1.0..=2.0).contains(&v[2]));
        }
    }
    assert_eq!(lowres.height(1, 1), 0);
    assert!(lowres.color(0, 0).is_transparent());
}

#[test]
fn dropping_the_hires_layer_keeps_colors() {
    let s = RenderSettingsData {
        save_hires_layer: false,
        ..settings()
    };
    let mut model = HiresTileModel::new();
    let mut lowres = TileColors::default();
    let result = render(&s, &mut model, &mut lowres);
    assert!(result.faces > 0);
    assert!(model.is_empty());
    assert!(!lowres.color(2, 2).is_transparent());
}

#[test]
fn tile_outside_bounds_is_not_rendered() {
    let s = RenderSettingsData {
        min_pos: (100, i32::MIN, 100),
        ..settings()
    };
    let mut model = HiresTileModel::new();
    model.add(3);
    let mut lowres = TileColors::default();
    let result = render(&s, &mut model, &mut lowres);
    assert_eq!(result.state, TileState::OutOfBounds);
    assert_eq!(result.faces, 0);
    assert!(model.is_empty());
}

#[test]
fn tile_cut_by_bounds_is_an_edge() {
    let s = RenderSettingsData {
        max_pos: (1, i32::MAX, i32::MAX),
        ..settings()
    };
    let mut model = HiresTileModel::new();
    let mut lowres = TileColors::default();
    let result = render(&s, &mut model, &mut lowres);
    assert_eq!(result.state, TileState::RenderedEdge);
    assert!(!lowres.color(1, 0).is_transparent());
    assert!(lowres.color(2, 0).is_transparent());
    assert_eq!(lowres.height(3, 3), i32::MIN);

    let no_edges = RenderSettingsData {
        render_edges: false,
        ..s
    };
    let result = render(&no_edges, &mut model, &mut lowres);
    assert_eq!(result.state, TileState::OutOfBounds);
}

#[test]
fn vertical_bounds_clip_rendered_layers() {
    let s = RenderSettingsData {
        min_pos: (i32::MIN, 1, i32::MIN),
        ..settings()
    };
    let mut model = HiresTileModel::new();
    let mut lowres = TileColors::default();
    let result = render(&s, &mut model, &mut lowres);
    assert_eq!(result.state, TileState::Rendered);
    assert!(lowres.color(3, 3).is_transparent());
    assert_eq!(lowres.height(0, 0), 1);
    // Only water is left, and it is translucent.
    assert!((lowres.color(0, 0).a - 0.5).abs() < 1e-5);
}

#[test]
fn renderer_can_be_reused() {
    let catalog = catalog();
    let colors = BiomeColorCalculator::default();
    let world = world();
    let settings = settings();
    let mut renderer = HiresTileRenderer::new(&settings, &catalog, &colors);
    let mut model = HiresTileModel::new();
    let mut lowres = TileColors::default();
    let first = renderer.render(&world, (0, 0), (3, 3), &mut model, &mut lowres);
    let second = renderer.render(&world, (0, 0), (3, 3), &mut model, &mut lowres);
    assert_eq!(first, second);
    assert_eq!(model.size(), second.faces);
}
