//! Generates a small terrain, renders it tile by tile on a worker pool and
//! records the outcome of every tile.

use std::error::Error;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use crossbeam_channel::{Receiver, unbounded};
use fastnoise_lite::{FastNoiseLite, NoiseType};
use hashbrown::HashMap;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tessera_blocks::{BlockState, ModelCatalog, TextureCatalog};
use tessera_geom::Color;
use tessera_mesh::{BiomeColorCalculator, HiresTileModel, HiresTileRenderer, TileColors, TileRenderResult};
use tessera_renderstate::{MapTileState, TileInfo, TileState};
use tessera_world::{DEFAULT_WATER_COLOR, VoxelGrid};

use crate::config::MapConfig;

pub const WORLD_HEIGHT: usize = 64;
pub const SEA_LEVEL: i32 = 24;

const TEXTURES: &str = include_str!("../assets/textures.toml");
const MODELS: &str = include_str!("../assets/models.toml");

#[derive(Clone, Debug)]
pub struct DemoOptions {
    /// Edge length of the square world in blocks.
    pub size: usize,
    pub seed: i32,
    /// Worker count; `None` lets rayon decide.
    pub threads: Option<usize>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PassStats {
    pub rendered: usize,
    pub skipped: usize,
    pub faces: usize,
}

#[derive(Clone, Debug)]
pub struct DemoReport {
    pub first: PassStats,
    pub second: PassStats,
    pub state: MapTileState,
}

/// The block catalog bundled with the demo.
pub fn demo_catalog() -> Result<ModelCatalog, Box<dyn Error>> {
    let textures = TextureCatalog::from_toml_str(TEXTURES)?;
    ModelCatalog::from_toml_str(textures, MODELS)
}

struct Palette {
    stone: BlockState,
    dirt: BlockState,
    grass: BlockState,
    sand: BlockState,
    gravel: BlockState,
    water: BlockState,
    shore_water: BlockState,
    seagrass: BlockState,
    lantern: BlockState,
}

impl Palette {
    fn new() -> Self {
        Self {
            stone: BlockState::new("stone"),
            dirt: BlockState::new("dirt"),
            grass: BlockState::with_properties("grass_block", [("snowy", "false")]),
            sand: BlockState::new("sand"),
            gravel: BlockState::new("gravel"),
            water: BlockState::water().clone(),
            shore_water: BlockState::with_properties("water", [("level", "2")]),
            seagrass: BlockState::new("seagrass"),
            lantern: BlockState::with_properties("lantern", [("hanging", "false")]),
        }
    }
}

// Cheap per-column scatter for decorations.
fn column_hash(seed: i32, x: i32, z: i32) -> u32 {
    let mut h = (seed as u32) ^ 0x9E37_79B9;
    h = h.wrapping_mul(31).wrapping_add(x as u32);
    h = h.wrapping_mul(0x85EB_CA6B).wrapping_add(z as u32);
    h ^= h >> 15;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^ (h >> 13)
}

/// Builds a `size x WORLD_HEIGHT x size` world at the origin: noise hills of
/// grass over dirt and stone, sand beaches, a sea with seagrass, flowing water
/// along the shore and a few lanterns.
pub fn generate_world(catalog: &ModelCatalog, size: usize, seed: i32) -> VoxelGrid {
    let mut terrain = FastNoiseLite::with_seed(seed);
    terrain.set_noise_type(Some(NoiseType::OpenSimplex2));
    terrain.set_frequency(Some(0.02));
    let mut climate = FastNoiseLite::with_seed(seed ^ 0x1203_5F31);
    climate.set_noise_type(Some(NoiseType::OpenSimplex2));
    climate.set_frequency(Some(0.006));

    let n = size as i32;
    let max_surface = WORLD_HEIGHT as i32 - 8;
    let heights: Vec<i32> = (0..n * n)
        .map(|i| {
            let (x, z) = (i % n, i / n);
            let h = terrain.get_noise_2d(x as f32, z as f32);
            (SEA_LEVEL as f32 + h * 14.0) as i32
        })
        .map(|h| h.clamp(4, max_surface))
        .collect();
    let height = |x: i32, z: i32| -> Option<i32> {
        (x >= 0 && z >= 0 && x < n && z < n).then(|| heights[(z * n + x) as usize])
    };

    let p = Palette::new();
    let swamp = Color::from_rgb_hex("#617b64").unwrap_or(DEFAULT_WATER_COLOR);
    let mut grid = VoxelGrid::new((0, 0, 0), size, WORLD_HEIGHT, size);
    let mut lanterns = Vec::new();
    for z in 0..n {
        for x in 0..n {
            let Some(h) = height(x, z) else { continue };
            let beach = h <= SEA_LEVEL + 1;
            for y in 0..=h {
                let state = if y == h {
                    match (beach, h < SEA_LEVEL - 3) {
                        (_, true) => &p.gravel,
                        (true, false) => &p.sand,
                        (false, false) => &p.grass,
                    }
                } else if y >= h - 3 {
                    if beach { &p.sand } else { &p.dirt }
                } else {
                    &p.stone
                };
                grid.set_block(x, y, z, state);
            }

            if h < SEA_LEVEL {
                let shore = [(1, 0), (-1, 0), (0, 1), (0, -1)]
                    .iter()
                    .any(|(dx, dz)| height(x + dx, z + dz).is_some_and(|nh| nh >= SEA_LEVEL));
                for y in h + 1..=SEA_LEVEL {
                    let state = if shore && h == SEA_LEVEL - 1 { &p.shore_water } else { &p.water };
                    grid.set_block(x, y, z, state);
                }
                if SEA_LEVEL - h >= 4 && column_hash(seed, x, z) % 7 == 0 {
                    grid.set_block(x, h + 1, z, &p.seagrass);
                }
            } else if !beach && column_hash(seed, x, z) % 97 == 0 {
                grid.set_block(x, h + 1, z, &p.lantern);
                lanterns.push((x, h + 1, z));
            }

            let t = ((climate.get_noise_2d(x as f32, z as f32) + 1.0) * 0.5).clamp(0.0, 1.0);
            let mut water = DEFAULT_WATER_COLOR;
            water.r += (swamp.r - water.r) * t;
            water.g += (swamp.g - water.g) * t;
            water.b += (swamp.b - water.b) * t;
            grid.set_water_color(x, z, water);
        }
    }

    grid.resolve_properties(|s| catalog.properties_for(s));
    grid.compute_sky_light();
    for &(x, y, z) in &lanterns {
        grid.add_light_source(x, y, z, 15);
    }
    log::info!(
        "generated {size}x{WORLD_HEIGHT}x{size} world (seed {seed}, {} lanterns)",
        lanterns.len()
    );
    grid
}

/// Everything a tile worker reads.
struct PassContext<'a> {
    world: &'a VoxelGrid,
    catalog: &'a ModelCatalog,
    config: &'a MapConfig,
    colors: &'a BiomeColorCalculator,
    tile_size: i32,
}

struct TileOutput {
    tile: (i32, i32),
    result: TileRenderResult,
    map_color: Color,
}

struct TileWorker<'a> {
    ctx: &'a PassContext<'a>,
    renderer: HiresTileRenderer<'a>,
    model: HiresTileModel,
    lowres: TileColors,
}

impl<'a> TileWorker<'a> {
    fn new(ctx: &'a PassContext<'a>) -> Self {
        Self {
            ctx,
            renderer: HiresTileRenderer::new(ctx.config, ctx.catalog, ctx.colors),
            model: HiresTileModel::new(),
            lowres: TileColors::default(),
        }
    }

    fn render(&mut self, (tx, tz): (i32, i32)) -> TileOutput {
        let size = self.ctx.tile_size;
        let min = (tx * size, tz * size);
        let max = (min.0 + size - 1, min.1 + size - 1);
        let result = self
            .renderer
            .render(self.ctx.world, min, max, &mut self.model, &mut self.lowres);
        TileOutput {
            tile: (tx, tz),
            result,
            map_color: self.average_color(),
        }
    }

    // Mean of the low-res columns as seen against the sky.
    fn average_color(&self) -> Color {
        let sky = self.ctx.config.sky_color();
        let (w, d) = (self.lowres.width(), self.lowres.depth());
        let mut sum = Color::new(0.0, 0.0, 0.0, 0.0, true);
        for z in 0..d {
            for x in 0..w {
                let mut c = sky;
                c.overlay(&self.lowres.color(x, z));
                sum.r += c.r;
                sum.g += c.g;
                sum.b += c.b;
                sum.a += c.a;
            }
        }
        let n = (w * d).max(1) as f32;
        Color::new(sum.r / n, sum.g / n, sum.b / n, sum.a / n, true)
    }
}

fn tiles_covering(world: &VoxelGrid, tile_size: i32) -> Vec<(i32, i32)> {
    let ((min_x, min_z), (max_x, max_z)) = world.xz_bounds();
    let mut tiles = Vec::new();
    for tz in min_z.div_euclid(tile_size)..=max_z.div_euclid(tile_size) {
        for tx in min_x.div_euclid(tile_size)..=max_x.div_euclid(tile_size) {
            tiles.push((tx, tz));
        }
    }
    tiles
}

fn unix_seconds() -> i32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().min(i32::MAX as u64) as i32)
        .unwrap_or(0)
}

fn collect(rx: Receiver<TileOutput>, mut state: MapTileState, now: i32) -> (MapTileState, PassStats) {
    let mut stats = PassStats::default();
    for out in rx {
        let (tx, tz) = out.tile;
        let previous = state.set(tx, tz, TileInfo::new(now, out.result.state));
        stats.rendered += 1;
        stats.faces += out.result.faces;
        let c = out.map_color;
        log::debug!(
            "tile {tx},{tz}: {:?} -> {:?}, {} faces, color ({:.2},{:.2},{:.2})",
            previous.state,
            out.result.state,
            out.result.faces,
            c.r,
            c.g,
            c.b
        );
    }
    (state, stats)
}

/// Renders every tile whose content changed after its last render, on the
/// pool, while a single collector thread owns the tile state.
fn render_pass(
    pool: &ThreadPool,
    ctx: &PassContext<'_>,
    changed_at: &HashMap<(i32, i32), i32>,
    state: MapTileState,
    now: i32,
) -> Result<(MapTileState, PassStats), Box<dyn Error>> {
    let mut due = Vec::new();
    let mut skipped = 0;
    for (&(tx, tz), &changed) in changed_at {
        let info = state.get(tx, tz);
        if info.state == TileState::Unknown || info.render_time < changed {
            due.push((tx, tz));
        } else {
            skipped += 1;
        }
    }

    let (tx, rx) = unbounded::<TileOutput>();
    let joined = thread::scope(|s| {
        let collector = s.spawn(move || collect(rx, state, now));
        pool.install(|| {
            due.par_iter()
                .map_init(|| TileWorker::new(ctx), |worker, &tile| worker.render(tile))
                .for_each(|out| {
                    if tx.send(out).is_err() {
                        log::error!("tile collector stopped early");
                    }
                });
        });
        drop(tx);
        collector.join()
    });
    let (state, mut stats) = joined.map_err(|_| "tile collector panicked")?;
    stats.skipped = skipped;
    Ok((state, stats))
}

fn log_state(label: &str, state: &MapTileState, stats: &PassStats) {
    let mut summary: Vec<(TileState, u32)> = state.summary().into_iter().collect();
    summary.sort_by_key(|(s, _)| *s as u8);
    log::info!(
        "{label}: rendered {} tiles ({} faces), skipped {}",
        stats.rendered,
        stats.faces,
        stats.skipped
    );
    log::info!(
        "{label}: {} regions, latest render time {}, summary {:?}",
        state.region_count(),
        state.last_render_time(),
        summary
    );
}

/// Edits the middle of the world: a pond on land, a sand bar at sea.
/// Returns the columns touched.
fn edit_center(world: &mut VoxelGrid, catalog: &ModelCatalog) -> Vec<(i32, i32)> {
    let ((min_x, min_z), (max_x, max_z)) = world.xz_bounds();
    let (cx, cz) = ((min_x + max_x) / 2, (min_z + max_z) / 2);
    let (_, top) = world.y_range();
    let water = BlockState::water().clone();
    let sand = BlockState::new("sand");
    let mut touched = Vec::new();
    for z in cz - 2..=cz + 2 {
        for x in cx - 2..=cx + 2 {
            let Some(surface) = (0..=top).rev().find(|&y| !world.block(x, y, z).is_air()) else {
                continue;
            };
            let state = if world.block(x, surface, z).is_liquid() { &sand } else { &water };
            world.set_block(x, surface, z, state);
            touched.push((x, z));
        }
    }
    world.resolve_properties(|s| catalog.properties_for(s));
    world.compute_sky_light();
    touched
}

/// Runs the demo: a full render, a world edit, then an incremental render.
pub fn run(config: &MapConfig, opts: &DemoOptions) -> Result<DemoReport, Box<dyn Error>> {
    let catalog = demo_catalog()?;
    log::info!(
        "catalog: {} textures, {} block models",
        catalog.textures().len(),
        catalog.len()
    );
    let mut world = generate_world(&catalog, opts.size, opts.seed);
    let colors = BiomeColorCalculator::default();
    let tile_size = config.hires_tile_size;

    let pool = ThreadPoolBuilder::new()
        .num_threads(opts.threads.unwrap_or(0))
        .thread_name(|i| format!("tessera-render-{i}"))
        .build()?;
    log::info!(
        "rendering '{}' with {} workers, tiles of {tile_size}",
        config.name,
        pool.current_num_threads()
    );

    let generated = unix_seconds();
    let mut changed_at: HashMap<(i32, i32), i32> = tiles_covering(&world, tile_size)
        .into_iter()
        .map(|t| (t, generated))
        .collect();

    let state = MapTileState::new();
    let (mut state, first) = {
        let ctx = PassContext {
            world: &world,
            catalog: &catalog,
            config,
            colors: &colors,
            tile_size,
        };
        render_pass(&pool, &ctx, &changed_at, state, generated)?
    };
    log_state("first pass", &state, &first);
    let dirty = state.modified_regions().count();
    state.mark_all_saved();
    log::debug!("first pass touched {dirty} regions");

    let edited = state.last_render_time() + 1;
    for (x, z) in edit_center(&mut world, &catalog) {
        changed_at.insert((x.div_euclid(tile_size), z.div_euclid(tile_size)), edited);
    }
    let now = unix_seconds().max(edited + 1);
    let (state, second) = {
        let ctx = PassContext {
            world: &world,
            catalog: &catalog,
            config,
            colors: &colors,
            tile_size,
        };
        render_pass(&pool, &ctx, &changed_at, state, now)?
    };
    log_state("second pass", &state, &second);

    Ok(DemoReport {
        first,
        second,
        state,
    })
}
