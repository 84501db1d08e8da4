//! Headless world-streaming driver: loads a world, streams chunks around
//! a walked path, applies edits and saves the session.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use loam_blocks::{BlockCatalog, BlockKind};
use loam_chunk::Step;
use loam_runtime::{ChunkCoordinator, Progress, StepBudget};
use loam_world::{BlockPos, WorldConfig};

#[derive(Parser, Debug)]
#[command(name = "loam", about = "voxel world streaming core")]
struct Args {
    /// World config (TOML). Missing file means stock settings.
    #[arg(long, default_value = "world.toml")]
    config: PathBuf,

    /// Save file holding player position and edits.
    #[arg(long, default_value = "world.sav")]
    save: PathBuf,

    /// Block catalog (TOML) with hardness overrides.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Override the config's terrain seed.
    #[arg(long)]
    seed: Option<i32>,

    /// Override the config's render distance.
    #[arg(long)]
    render_distance: Option<i32>,

    /// Place a block: x,y,z,kind (kind by name or code). Repeatable.
    #[arg(long = "place", value_parser = parse_place)]
    places: Vec<(BlockPos, BlockKind)>,

    /// Walk the viewpoint to x,z (throttled streaming). Repeatable.
    #[arg(long = "walk", value_parser = parse_walk)]
    walks: Vec<(f32, f32)>,

    /// Skip writing the save file back on exit.
    #[arg(long)]
    no_save: bool,
}

fn parse_place(s: &str) -> Result<(BlockPos, BlockKind), String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 4 {
        return Err("expected x,y,z,kind".into());
    }
    let mut coords = [0i32; 3];
    for (slot, part) in coords.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse()
            .map_err(|_| format!("bad coordinate {part:?}"))?;
    }
    let kind_text = parts[3].trim();
    let kind = BlockKind::from_name(kind_text)
        .or_else(|| kind_text.parse::<u8>().ok().and_then(BlockKind::from_code))
        .ok_or_else(|| format!("unknown block kind {kind_text:?}"))?;
    Ok((BlockPos::new(coords[0], coords[1], coords[2]), kind))
}

fn parse_walk(s: &str) -> Result<(f32, f32), String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err("expected x,z".into());
    }
    let x = parts[0]
        .trim()
        .parse()
        .map_err(|_| format!("bad coordinate {:?}", parts[0]))?;
    let z = parts[1]
        .trim()
        .parse()
        .map_err(|_| format!("bad coordinate {:?}", parts[1]))?;
    Ok((x, z))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg = if args.config.exists() {
        WorldConfig::from_path(&args.config)?
    } else {
        log::info!("no config at {}; using defaults", args.config.display());
        WorldConfig::default()
    };
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if let Some(rd) = args.render_distance {
        cfg.render_distance = rd;
    }
    let cfg = cfg.validated()?;
    log::info!(
        "world: seed {} chunk_size {} render_distance {}",
        cfg.seed,
        cfg.chunk_size,
        cfg.render_distance
    );

    let catalog = match &args.catalog {
        Some(path) => BlockCatalog::from_path(path)?,
        None => BlockCatalog::builtin(),
    };
    let mut store = loam_io::load_store(&args.save)?;
    let mut player = store.player_position();

    let mut coord = ChunkCoordinator::new(cfg, catalog);
    coord.warm_up();
    while coord.step_warm_up(8) == Step::Yielded {}
    log::info!("pool warmed: {} instances", coord.pool_stats().available);

    // Startup runs immediately; the player should not watch terrain appear.
    coord.update_center(player, &store);
    coord.run_pass();
    report(&coord);

    for (pos, kind) in &args.places {
        if coord.place_block(*pos, *kind, &mut store) {
            log::info!(
                "placed {} at {pos} (hardness {})",
                kind.name(),
                coord.hardness_at(*pos)
            );
        }
    }

    for (x, z) in &args.walks {
        player = [*x, player[1], *z];
        if coord.update_center(player, &store) {
            let mut slices = 0usize;
            while coord.step(StepBudget::default()) == Progress::Working {
                slices += 1;
            }
            log::info!("walked to ({x}, {z}) in {slices} slices");
            report(&coord);
        } else {
            log::info!("walked to ({x}, {z}); same chunk, nothing to stream");
        }
    }

    store.set_player_position(player);
    if !args.no_save {
        loam_io::save_store(&args.save, &store)?;
    }
    Ok(())
}

fn report(coord: &ChunkCoordinator) {
    let chunks = coord.chunks().count();
    let renderable = coord.renderable().count();
    let faces: u32 = coord.renderable().map(|c| c.mesh().face_count()).sum();
    let voxels: usize = coord.chunks().map(|c| c.voxel_count()).sum();
    log::info!(
        "{chunks} chunks resident ({renderable} renderable), {voxels} voxels, {faces} faces"
    );
}
