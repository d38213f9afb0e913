//! # Scene Scripting
//!
//! Each scene may have one behavior hook. The [`ScriptHost`] binds it after
//! the scene is built and is the only path through which frame and input
//! callbacks reach it.

pub mod hook;
pub mod host;

pub use hook::{ScriptCapabilities, ScriptContext, ScriptError, ScriptEvent, ScriptHook};
pub use host::{ScriptFactory, ScriptHost, ScriptRegistry};
