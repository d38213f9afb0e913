//! Behaviours for the bundled scenes

mod box_scene;
mod ojos;

use scene_engine::scene::{Node, NodeId, SceneGraph};
use scene_engine::scripting::ScriptRegistry;

pub use box_scene::BoxScript;
pub use ojos::OjosScript;

/// Registry with a script for every bundled scene
pub fn registry() -> ScriptRegistry {
    ScriptRegistry::new()
        .with("box", BoxScript::create)
        .with("ojos", OjosScript::create)
}

/// First direct child of the root matching `predicate`
fn first_top_level(graph: &SceneGraph, predicate: impl Fn(&Node) -> bool) -> Option<NodeId> {
    graph
        .children(graph.root())
        .iter()
        .copied()
        .find(|&id| graph.get(id).is_some_and(&predicate))
}
