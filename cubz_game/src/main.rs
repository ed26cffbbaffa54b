//! Voxel sandbox built on top of `cubz_ecs`.

use std::error::Error;
use std::process;
use std::time::Instant;

use log::LevelFilter;

use cubz_ecs::DeltaTime;

use crate::config::Config;
use crate::game::Game;
use crate::systems::{ChunkUpdateSystem, LightRenderSystem, MeshRenderSystem, SkyboxRenderSystem};

mod components;
mod config;
mod game;
mod logger;
mod systems;

/// Count of frames between two FPS reports.
const FPS_FREQUENCY: u32 = 250;

/// Simulated duration of one frame.
const FRAME_TIME: DeltaTime = DeltaTime::from_micros(16_667);

fn main() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _handle = match logger::init(level) {
        Ok(handle) => handle,
        Err(error) => {
            eprintln!("failed to initialize logger: {}", error);
            process::exit(1);
        }
    };
    log::info!("logger initialized successfully");

    if let Err(error) = run(Config::default()) {
        log::error!("{}", error);
        process::exit(1);
    }
}

fn run(config: Config) -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    let mut game = Game::new(&config)?;

    let mut frames = 0;
    let mut elapsed = DeltaTime::ZERO;
    for _ in 0..config.frames() {
        let frame_start = Instant::now();
        let stats = game.frame(FRAME_TIME)?;
        elapsed += frame_start.elapsed();

        frames += 1;
        if frames == FPS_FREQUENCY {
            let average = elapsed / FPS_FREQUENCY;
            let fps = 1.0 / average.as_secs_f64().max(f64::EPSILON);
            log::debug!(
                "fps: {:.0}; {} draw calls, {} vertices, {} entities",
                fps,
                stats.draw_calls,
                stats.vertices,
                game.world().entity_count(),
            );
            frames = 0;
            elapsed = DeltaTime::ZERO;
        }
    }

    let world = game.world();
    let chunks = world.system::<ChunkUpdateSystem>()?;
    let lights = world.system::<LightRenderSystem>()?;
    let meshes = world.system::<MeshRenderSystem>()?;
    let skyboxes = world.system::<SkyboxRenderSystem>()?;
    log::info!(
        "closing after {} frames ({:?} simulated) at {:?}",
        config.frames(),
        meshes.elapsed(),
        game.camera().position(),
    );
    log::info!(
        "{} chunk meshes rebuilt, {} light uploads ({} active, sun from {:?}), {} skyboxes drawn, last frame {:?}",
        chunks.rebuilt(),
        lights.uploads(),
        lights.active().len(),
        lights.sun().direction,
        skyboxes.drawn(),
        meshes.last(),
    );
    Ok(())
}
