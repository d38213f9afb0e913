//! Per-frame render driver
//!
//! Gates everything on the enabled flag. When enabled, a frame is timed,
//! submitted to the backend, and then forwarded to the active script hook as
//! an update.

use crate::render::{FrameStats, RenderBackend, RenderError};
use crate::scene::SceneManager;
use crate::scripting::ScriptEvent;

/// Drives the backend once per host frame
pub struct RenderDriver {
    backend: Box<dyn RenderBackend>,
    enabled: bool,
    interactive: bool,
    stats: Option<FrameStats>,
    frames_submitted: u64,
}

impl RenderDriver {
    /// Wrap a backend; rendering starts disabled until shown
    pub fn new(backend: Box<dyn RenderBackend>) -> Self {
        Self {
            backend,
            enabled: false,
            interactive: false,
            stats: None,
            frames_submitted: 0,
        }
    }

    /// Attach or remove frame-timing instrumentation
    pub fn set_stats(&mut self, stats: Option<FrameStats>) {
        self.stats = stats;
    }

    /// Run one frame
    ///
    /// Does nothing at all while disabled, including timing.
    pub fn tick(&mut self, scenes: &mut SceneManager) {
        if !self.enabled {
            return;
        }

        if let Some(stats) = self.stats.as_mut() {
            stats.begin();
        }

        match self.backend.render(&scenes.frame_view()) {
            Ok(()) => self.frames_submitted += 1,
            Err(e) => log::error!("Frame submission failed: {}", e),
        }

        if let Some(stats) = self.stats.as_mut() {
            stats.end();
        }

        scenes.dispatch_script(ScriptEvent::Update);
    }

    /// Create the backend surface
    pub fn initialize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.backend.initialize(width, height)
    }

    /// Whether frames are currently being rendered
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Toggle rendering without touching surface visibility
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Enable rendering and show the surface
    pub fn show(&mut self) {
        self.enabled = true;
        self.backend.set_visible(true);
        log::info!("Renderer shown");
    }

    /// Disable rendering and hide the surface
    pub fn hide(&mut self) {
        self.enabled = false;
        self.backend.set_visible(false);
        log::info!("Renderer hidden");
    }

    /// Toggle pointer-event capture
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
        self.backend.set_pointer_events(interactive);
        log::info!("Interactive: {}", interactive);
    }

    /// Whether pointer events are captured
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Resize the backend surface
    pub fn resize(&mut self, width: u32, height: u32) {
        self.backend.resize(width, height);
    }

    /// Frames successfully submitted to the backend
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    /// Frame-timing instrumentation, if attached
    pub fn stats(&self) -> Option<&FrameStats> {
        self.stats.as_ref()
    }

    /// Stop rendering and release the backend and instrumentation
    pub fn dispose(&mut self) {
        self.enabled = false;
        self.stats = None;
        self.backend.dispose();
    }
}
