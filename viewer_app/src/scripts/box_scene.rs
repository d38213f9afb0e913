//! `box`: the cube follows the pointer

use scene_engine::foundation::math::Vec3;
use scene_engine::scene::NodeId;
use scene_engine::scripting::{ScriptCapabilities, ScriptContext, ScriptError, ScriptHook};

use super::first_top_level;

const FOLLOW_SCALE: f32 = 3.0;

pub struct BoxScript {
    mesh: Option<NodeId>,
    pointer: (f32, f32),
}

impl BoxScript {
    pub fn create(ctx: &mut ScriptContext<'_>) -> Result<Box<dyn ScriptHook>, ScriptError> {
        let mesh = first_top_level(ctx.graph, |node| node.as_mesh().is_some());
        if mesh.is_none() {
            log::warn!("Scene '{}' has no mesh to move", ctx.scene_name);
        }
        Ok(Box::new(Self { mesh, pointer: (0.0, 0.0) }))
    }
}

impl ScriptHook for BoxScript {
    fn capabilities(&self) -> ScriptCapabilities {
        ScriptCapabilities::UPDATE | ScriptCapabilities::MOUSE_MOVE
    }

    fn update(&mut self, ctx: &mut ScriptContext<'_>) {
        let Some(node) = self.mesh.and_then(|id| ctx.graph.get_mut(id)) else {
            return;
        };
        let (x, y) = self.pointer;
        let z = node.transform.position.z;
        node.transform.position = Vec3::new(x * FOLLOW_SCALE, -y * FOLLOW_SCALE, z);
    }

    fn on_mouse_move(&mut self, _ctx: &mut ScriptContext<'_>, x: f32, y: f32) {
        self.pointer = (x, y);
    }
}
