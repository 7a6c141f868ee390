use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tessera_mesh::RenderSettingsData;

mod config;
mod demo;

use config::MapConfig;
use demo::DemoOptions;

#[derive(Parser, Debug)]
#[command(name = "tessera", version, about = "Voxel map tile renderer")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate a map config, then print the effective render settings
    CheckConfig { path: PathBuf },
    /// Render a generated world twice, the second time only re-rendering changed tiles
    Demo {
        /// Map config to render with; defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,
        /// World edge length in blocks
        #[arg(long, default_value_t = 96)]
        size: usize,
        #[arg(long, default_value_t = 1337)]
        seed: i32,
        /// Render workers (default: one per core)
        #[arg(long)]
        threads: Option<usize>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let outcome = match args.command {
        Command::CheckConfig { path } => check_config(&path),
        Command::Demo {
            config,
            size,
            seed,
            threads,
        } => run_demo(config, DemoOptions { size, seed, threads }),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn check_config(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = MapConfig::load(path)?;
    let settings = RenderSettingsData::from_settings(&cfg);
    println!("map '{}' ({})", cfg.name, path.display());
    println!("  sky color        {:?}", cfg.sky_color());
    println!("  world sky light  {}", cfg.world_sky_light());
    println!("  hires tile size  {}", cfg.hires_tile_size);
    println!("  lowres tile size {} ({} lods, factor {})", cfg.lowres_tile_size, cfg.lod_count, cfg.lod_factor);
    println!("  sorting          {}", cfg.sorting);
    println!("  storage          {}", cfg.storage);
    println!("  ignore missing light data {}", cfg.ignore_missing_light_data);
    println!("{settings:#?}");
    Ok(())
}

fn run_demo(config: Option<PathBuf>, opts: DemoOptions) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = match config {
        Some(path) => MapConfig::load(&path)?,
        None => MapConfig::default(),
    };
    if opts.size == 0 {
        return Err("--size must be positive".into());
    }
    let report = demo::run(&cfg, &opts)?;
    log::info!(
        "done: {} tiles rendered, then {} re-rendered and {} skipped ({} regions tracked)",
        report.first.rendered,
        report.second.rendered,
        report.second.skipped,
        report.state.region_count()
    );
    Ok(())
}
