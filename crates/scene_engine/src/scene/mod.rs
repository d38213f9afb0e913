//! # Scene Lifecycle
//!
//! Scene descriptions are loaded by name, cached, and materialized into a
//! live [`SceneGraph`]. The [`SceneManager`] owns the graph and coordinates
//! loading, teardown, construction, and script binding.

pub mod config_cache;
pub mod description;
pub mod disposer;
pub mod instantiator;
pub mod loader;
pub mod model;
pub mod scene_graph;
pub mod scene_manager;

#[cfg(test)]
mod lifecycle_tests;

pub use config_cache::ConfigCache;
pub use description::{
    CameraSpec, ColorValue, Entry, GeometryArg, GeometrySpec, LightSpec, MaterialSpec, MeshSpec,
    ModelSpec, ObjectSpec, Placement, SceneDescription,
};
pub use disposer::{dispose, DisposeReport};
pub use loader::{Fetched, LoadError, SceneLoad, SceneLoader};
pub use model::{ModelAsset, ModelError, ModelLoad};
pub use scene_graph::{MaterialSlot, MeshNode, Node, NodeId, NodeKind, SceneGraph};
pub use scene_manager::{SceneManager, SceneState};
