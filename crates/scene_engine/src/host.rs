//! Events delivered by the host window / frame loop

/// Host-side event routed through [`SceneEngine::handle_event`](crate::SceneEngine::handle_event)
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Drawing surface resized
    WindowResized {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },

    /// Host visibility changed (tab hidden, window minimized)
    VisibilityChanged {
        /// Whether the host is now hidden
        hidden: bool,
    },

    /// Pointer moved, normalized to [-1, 1]
    MouseMoved {
        /// Horizontal position
        x: f32,
        /// Vertical position
        y: f32,
    },

    /// Pointer dragged, normalized to [-1, 1]
    MouseDragged {
        /// Horizontal position
        x: f32,
        /// Vertical position
        y: f32,
    },

    /// Key pressed
    KeyPressed(String),
}
