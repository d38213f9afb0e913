//! `ojos`: the eyes drift with the pointer and watch it

use scene_engine::foundation::math::Vec3;
use scene_engine::scene::NodeId;
use scene_engine::scripting::{ScriptCapabilities, ScriptContext, ScriptError, ScriptHook};

use super::first_top_level;

const DRIFT_SCALE: f32 = 2.5;

pub struct OjosScript {
    group: NodeId,
    initial_rotation_y: f32,
    pointer: (f32, f32),
}

impl OjosScript {
    pub fn create(ctx: &mut ScriptContext<'_>) -> Result<Box<dyn ScriptHook>, ScriptError> {
        let group = first_top_level(ctx.graph, |node| node.is_group())
            .ok_or_else(|| ScriptError::NodeNotFound("model group".to_string()))?;
        let initial_rotation_y = ctx
            .graph
            .get(group)
            .map_or(0.0, |node| node.transform.rotation.y);

        Ok(Box::new(Self { group, initial_rotation_y, pointer: (0.0, 0.0) }))
    }

    /// Point the eyes are aimed at for a pointer position
    fn gaze_target(x: f32, y: f32) -> Vec3 {
        Vec3::new(x * 10.0, -y * 8.0, 10.0)
    }
}

impl ScriptHook for OjosScript {
    fn capabilities(&self) -> ScriptCapabilities {
        ScriptCapabilities::UPDATE | ScriptCapabilities::MOUSE_MOVE
    }

    fn update(&mut self, ctx: &mut ScriptContext<'_>) {
        let Some(node) = ctx.graph.get_mut(self.group) else {
            return;
        };
        let (x, y) = self.pointer;
        let transform = &mut node.transform;
        transform.position = Vec3::new(x * DRIFT_SCALE, -y * DRIFT_SCALE, 0.0);
        transform.look_at(Self::gaze_target(x, y));
        // Added on top of the fresh aim every frame
        transform.rotation.y += self.initial_rotation_y;
    }

    fn on_mouse_move(&mut self, _ctx: &mut ScriptContext<'_>, x: f32, y: f32) {
        self.pointer = (x, y);
    }
}
