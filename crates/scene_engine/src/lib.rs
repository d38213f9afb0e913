//! # Scene Engine
//!
//! A declarative, hot-swappable 3D scene lifecycle engine.
//!
//! Scenes are described by JSON documents (camera, lights, objects) that are
//! fetched through an [`assets::AssetSource`], cached by name, and instantiated
//! into a [`scene::SceneGraph`]. Switching scenes disposes everything the
//! previous scene allocated. Each scene may be paired with a script hook that
//! receives per-frame updates and pointer/keyboard input.
//!
//! ## Features
//!
//! - **Last request wins**: overlapping scene requests never interleave
//! - **Config cache**: each scene document is fetched and parsed once
//! - **OBJ/MTL models**: multi-material models loaded asynchronously
//! - **Capability-checked scripts**: hooks only receive the events they declare
//! - **Pluggable rendering**: any [`render::RenderBackend`] can draw the frame
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn run(backend: Box<dyn RenderBackend>) -> Result<(), EngineError> {
//!     let config = EngineConfig::default().with_asset_root("assets");
//!     let mut engine = SceneEngine::with_filesystem(config, backend, ScriptRegistry::new())?;
//!     engine.setup()?;
//!     engine.request_scene("box");
//!     loop {
//!         engine.tick();
//!         if engine.current_scene() == Some("box") {
//!             break;
//!         }
//!     }
//!     engine.dispose();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;

pub mod foundation;
pub mod assets;
pub mod render;
pub mod scene;
pub mod scripting;

mod engine;
mod host;

#[cfg(test)]
mod testing;

pub use engine::{EngineError, SceneEngine};
pub use host::HostEvent;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        EngineError, HostEvent, SceneEngine,
        foundation::{
            math::{Vec3, Mat4, Transform},
            time::{FrameClock, Stopwatch},
        },
        assets::{AssetError, AssetSource, FsAssetSource},
        render::{Camera, FrameView, Light, RenderBackend, RenderError},
        scene::{NodeId, SceneDescription, SceneGraph, SceneManager},
        scripting::{
            ScriptCapabilities, ScriptContext, ScriptError, ScriptEvent, ScriptHook,
            ScriptRegistry,
        },
        core::{Config, EngineConfig},
    };
}
