//! Backend abstraction for the render driver
//!
//! A backend owns the drawing surface. The driver hands it a read-only
//! [`FrameView`] of the current scene once per enabled frame; everything
//! else is surface management.

use thiserror::Error;

use crate::foundation::math::Mat4;
use crate::render::{Camera, Geometry, GpuResources, Light, Material};
use crate::scene::{NodeId, SceneGraph};

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Rendering backend trait
///
/// Implemented by whatever actually draws: a GPU renderer, a headless logger,
/// or a recording double in tests.
pub trait RenderBackend {
    /// Create the drawing surface
    fn initialize(&mut self, width: u32, height: u32) -> BackendResult<()>;

    /// Submit one frame
    fn render(&mut self, frame: &FrameView<'_>) -> BackendResult<()>;

    /// Resize the drawing surface
    fn resize(&mut self, width: u32, height: u32);

    /// Show or hide the drawing surface
    fn set_visible(&mut self, visible: bool);

    /// Enable or disable pointer-event capture on the surface
    fn set_pointer_events(&mut self, enabled: bool);

    /// Release the surface and any backend state
    fn dispose(&mut self);
}

/// Read-only view of everything needed to draw one frame
pub struct FrameView<'a> {
    /// Scene to draw
    pub graph: &'a SceneGraph,
    /// Viewing camera
    pub camera: &'a Camera,
    /// Resources referenced by mesh nodes
    pub resources: &'a GpuResources,
}

/// One mesh ready for submission
pub struct DrawItem<'a> {
    /// Source node
    pub node: NodeId,
    /// Model matrix
    pub world: Mat4,
    /// Geometry to draw
    pub geometry: &'a Geometry,
    /// Materials in slot order; missing keys are skipped
    pub materials: Vec<&'a Material>,
}

impl<'a> FrameView<'a> {
    /// Meshes below the root with live geometry, depth-first
    pub fn draw_list(&self) -> Vec<DrawItem<'a>> {
        let graph = self.graph;
        let resources = self.resources;
        graph
            .descendants(graph.root())
            .into_iter()
            .filter_map(|id| {
                let mesh = graph.get(id)?.as_mesh()?;
                let geometry = resources.geometry(mesh.geometry?)?;
                let materials = mesh
                    .materials
                    .keys()
                    .iter()
                    .filter_map(|&key| resources.material(key))
                    .collect();
                Some(DrawItem { node: id, world: graph.world_matrix(id), geometry, materials })
            })
            .collect()
    }

    /// Lights below the root with their world matrices
    pub fn lights(&self) -> Vec<(Mat4, &'a Light)> {
        let graph = self.graph;
        graph
            .descendants(graph.root())
            .into_iter()
            .filter_map(|id| {
                let light = graph.get(id)?.as_light()?;
                Some((graph.world_matrix(id), light))
            })
            .collect()
    }
}

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Renderer initialization failed during setup
    #[error("Renderer initialization failed: {0}")]
    InitializationFailed(String),

    /// A frame could not be submitted
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),

    /// Backend-specific error occurred
    #[error("Backend error: {0}")]
    BackendError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Geometry, StandardMaterial};
    use crate::scene::{MaterialSlot, MeshNode, Node};

    #[test]
    fn test_draw_list_skips_released_geometry() {
        let mut graph = SceneGraph::new();
        let mut resources = GpuResources::new();
        let camera = Camera::default();
        let root = graph.root();

        let live = resources.create_geometry(Geometry::unit_box());
        let released = resources.create_geometry(Geometry::unit_box());
        let material = resources.create_material(Material::Standard(StandardMaterial::default()));
        resources.release_geometry(released);

        let drawn = graph.add(root, Node::mesh(MeshNode {
            geometry: Some(live),
            materials: MaterialSlot::Single(material),
        }));
        graph.add(root, Node::mesh(MeshNode { geometry: Some(released), materials: MaterialSlot::None }));
        graph.add(root, Node::light(Light::ambient(crate::foundation::math::Vec3::new(1.0, 1.0, 1.0), 0.5)));

        let frame = FrameView { graph: &graph, camera: &camera, resources: &resources };
        let items = frame.draw_list();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].node, drawn);
        assert_eq!(items[0].materials.len(), 1);
        assert_eq!(frame.lights().len(), 1);
    }
}
