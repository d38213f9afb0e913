//! Headless backend that reports what it would draw

use scene_engine::render::{BackendResult, FrameView, RenderBackend, RenderError};

/// Logs surface changes and a frame summary every `report_interval` frames
pub struct LogBackend {
    size: Option<(u32, u32)>,
    visible: bool,
    pointer_events: bool,
    frames: u64,
    report_interval: u64,
}

impl LogBackend {
    pub fn new(report_interval: u64) -> Self {
        Self {
            size: None,
            visible: false,
            pointer_events: false,
            frames: 0,
            report_interval: report_interval.max(1),
        }
    }
}

impl RenderBackend for LogBackend {
    fn initialize(&mut self, width: u32, height: u32) -> BackendResult<()> {
        if width == 0 || height == 0 {
            return Err(RenderError::InitializationFailed(format!(
                "surface size {}x{} is empty",
                width, height
            )));
        }
        log::info!("Headless surface created ({}x{})", width, height);
        self.size = Some((width, height));
        Ok(())
    }

    fn render(&mut self, frame: &FrameView<'_>) -> BackendResult<()> {
        if self.size.is_none() {
            return Err(RenderError::RenderingFailed("surface not initialized".to_string()));
        }
        self.frames += 1;
        if self.frames % self.report_interval != 0 {
            return Ok(());
        }

        let draws = frame.draw_list();
        let slots: usize = draws
            .iter()
            .map(|item| item.materials.len().max(1))
            .sum();
        let p = frame.camera.position;
        log::info!(
            "Frame {}: {} meshes ({} material slots), {} lights, camera at ({:.2}, {:.2}, {:.2})",
            self.frames,
            draws.len(),
            slots,
            frame.lights().len(),
            p.x,
            p.y,
            p.z
        );
        for item in &draws {
            let t = item.world.column(3);
            log::debug!("  {:?} at ({:.2}, {:.2}, {:.2})", item.node, t.x, t.y, t.z);
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        log::info!("Surface resized to {}x{}", width, height);
        self.size = Some((width, height));
    }

    fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            log::debug!("Surface visible: {}", visible);
        }
        self.visible = visible;
    }

    fn set_pointer_events(&mut self, enabled: bool) {
        log::debug!("Pointer events: {}", enabled);
        self.pointer_events = enabled;
    }

    fn dispose(&mut self) {
        log::info!(
            "Headless surface released after {} frames (pointer events {})",
            self.frames,
            if self.pointer_events { "on" } else { "off" }
        );
        self.size = None;
        self.visible = false;
    }
}
