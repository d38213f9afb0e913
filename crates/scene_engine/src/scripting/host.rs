//! Script registry and the host that owns the active hook

use std::collections::HashMap;

use crate::scripting::{ScriptCapabilities, ScriptContext, ScriptError, ScriptEvent, ScriptHook};

/// Constructor for a scene's hook
///
/// Runs right after the scene is built, so it can look nodes up in the
/// fresh graph.
pub type ScriptFactory = Box<dyn Fn(&mut ScriptContext<'_>) -> Result<Box<dyn ScriptHook>, ScriptError>>;

/// Hook constructors keyed by scene name
#[derive(Default)]
pub struct ScriptRegistry {
    factories: HashMap<String, ScriptFactory>,
}

impl ScriptRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the hook constructor for a scene, replacing any previous one
    pub fn register<F>(&mut self, scene_name: impl Into<String>, factory: F)
    where
        F: Fn(&mut ScriptContext<'_>) -> Result<Box<dyn ScriptHook>, ScriptError> + 'static,
    {
        self.factories.insert(scene_name.into(), Box::new(factory));
    }

    /// Builder form of [`ScriptRegistry::register`]
    pub fn with<F>(mut self, scene_name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&mut ScriptContext<'_>) -> Result<Box<dyn ScriptHook>, ScriptError> + 'static,
    {
        self.register(scene_name, factory);
        self
    }

    /// Whether a script is registered for the scene
    pub fn contains(&self, scene_name: &str) -> bool {
        self.factories.contains_key(scene_name)
    }

    /// Number of registered scripts
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// True when no script is registered
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

struct ActiveScript {
    scene_name: String,
    capabilities: ScriptCapabilities,
    hook: Box<dyn ScriptHook>,
}

/// Owns the hook bound to the current scene and routes callbacks to it
pub struct ScriptHost {
    registry: ScriptRegistry,
    active: Option<ActiveScript>,
}

impl ScriptHost {
    /// Create a host with no hook bound
    pub fn new(registry: ScriptRegistry) -> Self {
        Self { registry, active: None }
    }

    /// Bind the hook for `ctx.scene_name`, replacing the current one
    ///
    /// A missing script or a failing constructor leaves no hook bound; both
    /// are logged and neither is an error for the caller. Returns whether a
    /// hook is bound afterwards.
    pub fn bind(&mut self, ctx: &mut ScriptContext<'_>) -> bool {
        self.active = None;

        let Some(factory) = self.registry.factories.get(ctx.scene_name) else {
            log::warn!("No script found for scene: {}", ctx.scene_name);
            return false;
        };

        match factory(ctx) {
            Ok(hook) => {
                log::info!("Script loaded: {}", ctx.scene_name);
                self.active = Some(ActiveScript {
                    scene_name: ctx.scene_name.to_string(),
                    capabilities: hook.capabilities(),
                    hook,
                });
                true
            }
            Err(e) => {
                log::warn!("Script for scene '{}' failed to start: {}", ctx.scene_name, e);
                false
            }
        }
    }

    /// Drop the current hook
    pub fn unbind(&mut self) {
        self.active = None;
    }

    /// Deliver an event to the bound hook if it declares the capability
    ///
    /// Returns whether a callback ran.
    pub fn dispatch(&mut self, event: ScriptEvent<'_>, ctx: &mut ScriptContext<'_>) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if !active.capabilities.contains(event.capability()) {
            return false;
        }

        match event {
            ScriptEvent::Update => active.hook.update(ctx),
            ScriptEvent::MouseMove { x, y } => active.hook.on_mouse_move(ctx, x, y),
            ScriptEvent::MouseDragged { x, y } => active.hook.on_mouse_dragged(ctx, x, y),
            ScriptEvent::KeyPressed(key) => active.hook.key_pressed(ctx, key),
        }
        true
    }

    /// Whether a hook is bound
    pub fn is_bound(&self) -> bool {
        self.active.is_some()
    }

    /// Scene the bound hook belongs to
    pub fn bound_scene(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.scene_name.as_str())
    }

    /// Capabilities of the bound hook
    pub fn capabilities(&self) -> Option<ScriptCapabilities> {
        self.active.as_ref().map(|a| a.capabilities)
    }

    /// Registered hook constructors
    pub fn registry(&self) -> &ScriptRegistry {
        &self.registry
    }
}
