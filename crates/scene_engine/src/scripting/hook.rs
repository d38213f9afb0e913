//! Script hook contract
//!
//! A hook is a per-scene behavior object. It declares up front which
//! callbacks it implements through [`ScriptCapabilities`]; the host only
//! calls the ones that are declared.

use bitflags::bitflags;
use thiserror::Error;

use crate::render::Camera;
use crate::scene::SceneGraph;

bitflags! {
    /// Callbacks a hook implements
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ScriptCapabilities: u8 {
        /// Per-frame `update`
        const UPDATE = 1 << 0;
        /// Pointer movement
        const MOUSE_MOVE = 1 << 1;
        /// Pointer drag
        const MOUSE_DRAGGED = 1 << 2;
        /// Key presses
        const KEY_PRESSED = 1 << 3;
    }
}

/// What a hook may see and touch while one of its callbacks runs
pub struct ScriptContext<'a> {
    /// Scene the hook is bound to
    pub scene_name: &'a str,
    /// Live scene graph
    pub graph: &'a mut SceneGraph,
    /// Active camera
    pub camera: &'a mut Camera,
}

/// Per-scene behavior object
///
/// Pointer coordinates are normalized to [-1, 1] on both axes.
pub trait ScriptHook {
    /// Callbacks this hook implements
    fn capabilities(&self) -> ScriptCapabilities;

    /// Called once per rendered frame
    fn update(&mut self, _ctx: &mut ScriptContext<'_>) {}

    /// Pointer moved
    fn on_mouse_move(&mut self, _ctx: &mut ScriptContext<'_>, _x: f32, _y: f32) {}

    /// Pointer dragged
    fn on_mouse_dragged(&mut self, _ctx: &mut ScriptContext<'_>, _x: f32, _y: f32) {}

    /// Key pressed
    fn key_pressed(&mut self, _ctx: &mut ScriptContext<'_>, _key: &str) {}
}

/// A dispatchable callback invocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptEvent<'a> {
    /// Per-frame tick
    Update,
    /// Pointer moved to normalized coordinates
    MouseMove { x: f32, y: f32 },
    /// Pointer dragged to normalized coordinates
    MouseDragged { x: f32, y: f32 },
    /// Key pressed, by key name
    KeyPressed(&'a str),
}

impl ScriptEvent<'_> {
    /// Capability a hook must declare to receive this event
    pub fn capability(&self) -> ScriptCapabilities {
        match self {
            ScriptEvent::Update => ScriptCapabilities::UPDATE,
            ScriptEvent::MouseMove { .. } => ScriptCapabilities::MOUSE_MOVE,
            ScriptEvent::MouseDragged { .. } => ScriptCapabilities::MOUSE_DRAGGED,
            ScriptEvent::KeyPressed(_) => ScriptCapabilities::KEY_PRESSED,
        }
    }
}

/// Hook construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// A node the hook depends on is not in the scene
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// Any other construction failure
    #[error("script construction failed: {0}")]
    Construction(String),
}
