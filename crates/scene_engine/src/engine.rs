//! Scene engine context
//!
//! One explicit object owns the scene manager and the render driver and
//! exposes the host-facing API. It is created once, set up once, and torn
//! down with [`SceneEngine::dispose`].

use std::rc::Rc;

use thiserror::Error;

use crate::assets::{AssetSource, FsAssetSource};
use crate::core::{ConfigError, EngineConfig};
use crate::foundation::math::vec3_from_array;
use crate::host::HostEvent;
use crate::render::{Camera, FrameStats, RenderBackend, RenderDriver, RenderError};
use crate::scene::SceneManager;
use crate::scripting::{ScriptEvent, ScriptRegistry};

/// Engine construction and setup errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The backend could not create its surface
    #[error("Renderer error: {0}")]
    Render(#[from] RenderError),
}

/// Host-facing scene engine
pub struct SceneEngine {
    config: EngineConfig,
    scenes: SceneManager,
    driver: RenderDriver,
    viewport: (u32, u32),
    initialized: bool,
}

impl SceneEngine {
    /// Create an engine reading assets from `source`
    pub fn new(
        config: EngineConfig,
        backend: Box<dyn RenderBackend>,
        source: Rc<dyn AssetSource>,
        scripts: ScriptRegistry,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let camera = Camera::perspective(
            vec3_from_array(config.camera.position),
            config.camera.fov,
            config.viewport.aspect(),
            config.camera.near,
            config.camera.far,
        );
        let scenes = SceneManager::new(source, config.assets.clone(), camera, scripts);
        let viewport = (config.viewport.width, config.viewport.height);

        Ok(Self {
            config,
            scenes,
            driver: RenderDriver::new(backend),
            viewport,
            initialized: false,
        })
    }

    /// Create an engine reading assets from `config.assets.root` on disk
    pub fn with_filesystem(
        config: EngineConfig,
        backend: Box<dyn RenderBackend>,
        scripts: ScriptRegistry,
    ) -> Result<Self, EngineError> {
        let source: Rc<dyn AssetSource> = Rc::new(FsAssetSource::new(config.assets.root.clone()));
        Self::new(config, backend, source, scripts)
    }

    /// One-time initialization: surface, instrumentation, initial visibility
    pub fn setup(&mut self) -> Result<(), EngineError> {
        if self.initialized {
            log::warn!("Scene engine already initialized");
            return Ok(());
        }

        log::info!("Initializing scene engine ({}x{})", self.viewport.0, self.viewport.1);
        self.driver.initialize(self.viewport.0, self.viewport.1)?;

        if self.config.renderer.show_stats {
            self.driver.set_stats(Some(FrameStats::new(self.config.renderer.stats_log_interval)));
            log::info!("Frame stats enabled");
        } else {
            log::warn!("Frame stats disabled");
        }

        self.initialized = true;
        if self.config.renderer.start_visible {
            self.show();
        }
        Ok(())
    }

    /// Ask for a scene by name; the last request wins
    pub fn request_scene(&mut self, name: &str) {
        self.scenes.request_scene(name);
    }

    /// Pump in-flight loads without rendering
    pub fn poll(&mut self) -> bool {
        self.scenes.poll()
    }

    /// Host frame entry point: pump loads, then render
    pub fn tick(&mut self) {
        self.scenes.poll();
        self.render();
    }

    /// Render one frame if enabled
    pub fn render(&mut self) {
        if !self.initialized {
            return;
        }
        self.driver.tick(&mut self.scenes);
    }

    /// Enable rendering and show the surface
    pub fn show(&mut self) {
        self.driver.show();
    }

    /// Disable rendering and hide the surface
    pub fn hide(&mut self) {
        self.driver.hide();
    }

    /// Toggle pointer-event capture on the surface
    pub fn set_interactive(&mut self, interactive: bool) {
        self.driver.set_interactive(interactive);
    }

    /// Pause or resume rendering when the host is hidden or shown
    ///
    /// Leaves surface visibility alone.
    pub fn on_visibility_changed(&mut self, hidden: bool) {
        self.driver.set_enabled(!hidden);
    }

    /// Pointer moved, in normalized [-1, 1] coordinates
    pub fn on_mouse_move(&mut self, x: f32, y: f32) {
        if !self.driver.is_enabled() {
            return;
        }
        self.scenes.dispatch_script(ScriptEvent::MouseMove { x, y });
    }

    /// Pointer dragged, in normalized [-1, 1] coordinates
    pub fn on_mouse_dragged(&mut self, x: f32, y: f32) {
        if !self.driver.is_enabled() {
            return;
        }
        self.scenes.dispatch_script(ScriptEvent::MouseDragged { x, y });
    }

    /// Key pressed; dispatched only while enabled
    pub fn key_pressed(&mut self, key: &str) {
        if !self.driver.is_enabled() {
            return;
        }
        self.scenes.dispatch_script(ScriptEvent::KeyPressed(key));
        log::debug!("Key pressed: {}", key);
    }

    /// Surface resized; ignored before `setup()`
    pub fn window_resized(&mut self, width: u32, height: u32) {
        if !self.initialized || width == 0 || height == 0 {
            return;
        }
        self.viewport = (width, height);
        self.scenes.camera_mut().set_aspect_ratio(width as f32 / height as f32);
        self.driver.resize(width, height);
        log::info!("Resized to {}x{}", width, height);
    }

    /// Route a host event to the matching handler
    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::WindowResized { width, height } => self.window_resized(width, height),
            HostEvent::VisibilityChanged { hidden } => self.on_visibility_changed(hidden),
            HostEvent::MouseMoved { x, y } => self.on_mouse_move(x, y),
            HostEvent::MouseDragged { x, y } => self.on_mouse_dragged(x, y),
            HostEvent::KeyPressed(key) => self.key_pressed(&key),
        }
    }

    /// Tear down the renderer, instrumentation and current scene
    pub fn dispose(&mut self) {
        // In-flight requests are dropped even when nothing was set up
        self.scenes.teardown();
        if !self.initialized {
            return;
        }
        self.driver.dispose();
        self.initialized = false;
        log::info!("Scene engine disposed");
    }

    /// Scene manager
    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    /// Scene manager, mutable
    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    /// Render driver
    pub fn driver(&self) -> &RenderDriver {
        &self.driver
    }

    /// Configuration the engine was built with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Name of the fully applied scene
    pub fn current_scene(&self) -> Option<&str> {
        self.scenes.current_scene()
    }

    /// Whether frames are rendered
    pub fn is_enabled(&self) -> bool {
        self.driver.is_enabled()
    }

    /// Whether pointer events are captured
    pub fn is_interactive(&self) -> bool {
        self.driver.is_interactive()
    }

    /// Whether `setup()` has run
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Current surface size
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }
}
