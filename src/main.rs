//! Tile Collide demo
//!
//! Builds the seeded demo scene and runs it headless for a fixed number of
//! ticks, logging what happens.
//!
//! Usage: `tile-collide [settings.json] [ticks]`

use tile_collide::consts::SIM_DT;
use tile_collide::scene::{SceneConfig, build_scene, census};
use tile_collide::sim::{ObjectKind, tick};
use tile_collide::{CollisionSettings, WorldError};

const DEFAULT_TICKS: u32 = 600;

fn run() -> Result<(), WorldError> {
    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => CollisionSettings::load(path)?,
        None => CollisionSettings::default(),
    };
    let ticks = match args.next() {
        Some(n) => n
            .parse()
            .map_err(|e| WorldError::InvalidSettings(format!("bad tick count {n:?}: {e}")))?,
        None => DEFAULT_TICKS,
    };

    let mut world = build_scene(&SceneConfig::default(), settings)?;

    let mut responses = 0u64;
    let mut exhausted = 0usize;
    for frame in 0..ticks {
        let summary = tick(&mut world, SIM_DT);
        responses += u64::from(summary.responses);
        exhausted += summary.exhausted;
        if summary.exhausted > 0 {
            log::warn!(
                "Frame {}: {} entities hit the resolution cap",
                frame,
                summary.exhausted
            );
        }
        if summary.killed > 0 {
            log::info!("Frame {}: {} killed, {} left", frame, summary.killed, world.len());
        }
    }

    log::info!(
        "Ran {} ticks: {} responses, {} capped passes",
        ticks,
        responses,
        exhausted
    );
    for kind in ObjectKind::ALL {
        log::info!("{} left: {}", kind.name(), census(&world, kind).len());
    }

    world.teardown();
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Tile Collide starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
