//! Headless scene viewer
//!
//! Drives the scene engine with a fixed-rate frame loop and a logging
//! backend. Starts on the `box` scene, switches to `ojos` part way through,
//! and feeds a synthetic pointer path so the scene scripts have input.
//!
//! Usage: `scene_viewer [config.toml]`

mod backend;
mod scripts;

use std::path::Path;

use scene_engine::core::{Config, ConfigError, EngineConfig};
use scene_engine::foundation::logging;
use scene_engine::foundation::time::FrameClock;
use scene_engine::{EngineError, HostEvent, SceneEngine};
use thiserror::Error;

use crate::backend::LogBackend;

const FRAME_RATE: u32 = 30;
const RUN_FRAMES: u64 = 300;
const SWITCH_FRAME: u64 = 120;
const RESIZE_FRAME: u64 = 200;

#[derive(Error, Debug)]
enum ViewerError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Pointer position in normalized device coordinates at time `t`
fn pointer_at(t: f32) -> (f32, f32) {
    (t.sin() * 0.8, (t * 0.7).cos() * 0.5)
}

/// Read the config file if present; the flag says whether it was
fn load_config(path: &Path) -> Result<(EngineConfig, bool), ConfigError> {
    if path.exists() {
        Ok((EngineConfig::load_from_file(path)?, true))
    } else {
        Ok((EngineConfig::default(), false))
    }
}

fn run(config_path: &str) -> Result<(), ViewerError> {
    let path = Path::new(config_path);
    let (config, found) = load_config(path)?;
    // The log level comes from the config, so the fallback is reported after init
    logging::init_with_level(&config.log_level);
    if !found {
        log::info!("No config at {}, using defaults", path.display());
    }
    log::info!("Starting scene viewer");

    let mut engine = SceneEngine::with_filesystem(
        config,
        Box::new(LogBackend::new(u64::from(FRAME_RATE))),
        scripts::registry(),
    )?;
    engine.setup()?;
    engine.set_interactive(true);
    engine.request_scene("box");

    let mut clock = FrameClock::new(FRAME_RATE);

    while clock.frame_count() < RUN_FRAMES {
        match clock.begin_frame() {
            SWITCH_FRAME => engine.request_scene("ojos"),
            RESIZE_FRAME => engine.handle_event(HostEvent::WindowResized { width: 1920, height: 1080 }),
            _ => {}
        }

        let (x, y) = pointer_at(clock.elapsed_secs());
        engine.handle_event(HostEvent::MouseMoved { x, y });
        engine.tick();

        clock.wait_for_next_frame();
    }

    log::info!(
        "Ran {} frames over {:.1}s, final scene: {}",
        clock.frame_count(),
        clock.elapsed_secs(),
        engine.current_scene().unwrap_or("none")
    );
    engine.dispose();
    Ok(())
}

fn main() {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "engine.toml".to_string());

    if let Err(e) = run(&config_path) {
        // The logger may not be up if the config was unreadable
        eprintln!("scene_viewer: {}", e);
        std::process::exit(1);
    }
    log::info!("Scene viewer finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let (config, found) = load_config(Path::new("does/not/exist.toml")).unwrap();
        assert!(!found);
        assert_eq!(config.log_level, EngineConfig::default().log_level);
    }

    #[test]
    fn test_shipped_config_is_found() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("engine.toml");
        let (_, found) = load_config(&path).unwrap();
        assert!(found);
    }
}
