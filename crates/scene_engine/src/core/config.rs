//! # Engine Configuration
//!
//! Settings for asset lookup, the initial viewport and camera, and the
//! render driver. Every section has working defaults so an empty file (or
//! no file at all) yields a usable engine.
//!
//! ```toml
//! log_level = "debug"
//!
//! [assets]
//! root = "assets"
//! scenes_dir = "scenes"
//!
//! [renderer]
//! show_stats = false
//! ```

use serde::{Serialize, Deserialize};
use std::path::PathBuf;

use crate::config::{Config, ConfigError};

/// # Asset Configuration
///
/// Where scene descriptions and model files are fetched from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Base directory for all assets
    pub root: PathBuf,
    /// Directory (relative to `root`) holding scene descriptions
    pub scenes_dir: String,
    /// File extension of scene descriptions
    pub scene_extension: String,
}

impl AssetConfig {
    /// Set assets directory
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Relative asset path of the description for a named scene
    pub fn scene_path(&self, scene_name: &str) -> String {
        format!("{}/{}.{}", self.scenes_dir, scene_name, self.scene_extension)
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            scenes_dir: "scenes".to_string(),
            scene_extension: "json".to_string(),
        }
    }
}

/// Initial drawing surface size
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ViewportConfig {
    /// Width / height
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { width: 1280, height: 720 }
    }
}

/// Default perspective camera created at engine construction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Starting position
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 0.0, 5.0],
        }
    }
}

/// # Render Driver Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Whether `setup()` finishes by enabling rendering
    pub start_visible: bool,
    /// Enable frame-timing instrumentation
    pub show_stats: bool,
    /// Frames between frame-timing log lines
    pub stats_log_interval: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            start_visible: true,
            show_stats: true,
            stats_log_interval: 300,
        }
    }
}

/// # Complete Engine Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
    /// Asset lookup
    pub assets: AssetConfig,
    /// Initial viewport
    pub viewport: ViewportConfig,
    /// Default camera
    pub camera: CameraConfig,
    /// Render driver
    pub renderer: RendererConfig,
}

impl EngineConfig {
    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the asset root directory
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.assets = self.assets.with_root(root);
        self
    }

    /// Enable or disable frame-timing instrumentation
    pub fn with_stats(mut self, enabled: bool) -> Self {
        self.renderer.show_stats = enabled;
        self
    }
    
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(ConfigError::Invalid("Viewport dimensions must be non-zero".to_string()));
        }
        if self.camera.fov <= 0.0 || self.camera.fov >= 180.0 {
            return Err(ConfigError::Invalid(format!("Camera fov out of range: {}", self.camera.fov)));
        }
        if self.camera.near <= 0.0 || self.camera.near >= self.camera.far {
            return Err(ConfigError::Invalid(format!(
                "Camera clip planes invalid: near {} far {}",
                self.camera.near, self.camera.far
            )));
        }
        if self.assets.scenes_dir.is_empty() {
            return Err(ConfigError::Invalid("Scenes directory cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            assets: AssetConfig::default(),
            viewport: ViewportConfig::default(),
            camera: CameraConfig::default(),
            renderer: RendererConfig::default(),
        }
    }
}

impl Config for EngineConfig {}
