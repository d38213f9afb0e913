//! # Core Engine Module
//!
//! Shared configuration types used by every subsystem of the scene engine.

pub mod config;

pub use config::{
    EngineConfig,
    AssetConfig,
    ViewportConfig,
    CameraConfig,
    RendererConfig,
};
pub use crate::config::{Config, ConfigError};
