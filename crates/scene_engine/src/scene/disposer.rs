//! Scene graph teardown
//!
//! Releases every resource key held by a subtree, then detaches and removes
//! the subtree. Nodes without resources (groups, lights) are visited like any
//! other node; they simply release nothing.

use crate::render::GpuResources;
use crate::scene::{NodeId, NodeKind, SceneGraph};

/// What a dispose call released
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisposeReport {
    /// Nodes removed from the graph
    pub nodes: usize,
    /// Geometry resources released
    pub geometries: usize,
    /// Material resources released
    pub materials: usize,
}

impl DisposeReport {
    fn merge(&mut self, other: DisposeReport) {
        self.nodes += other.nodes;
        self.geometries += other.geometries;
        self.materials += other.materials;
    }
}

/// Dispose a subtree
///
/// Disposing the root clears all of its children instead, leaving the root in
/// place. Unknown ids are a no-op.
pub fn dispose(graph: &mut SceneGraph, resources: &mut GpuResources, node: NodeId) -> DisposeReport {
    if node == graph.root() {
        return clear(graph, resources);
    }
    if !graph.contains(node) {
        return DisposeReport::default();
    }

    let mut report = DisposeReport::default();
    let mut visit = graph.descendants(node);
    visit.insert(0, node);

    for id in visit {
        let Some(entry) = graph.get(id) else { continue };
        match &entry.kind {
            NodeKind::Mesh(mesh) => {
                if let Some(geometry) = mesh.geometry {
                    if resources.release_geometry(geometry) {
                        report.geometries += 1;
                    }
                }
                for &material in mesh.materials.keys() {
                    // Shared materials are released by whichever mesh gets there first
                    if resources.release_material(material) {
                        report.materials += 1;
                    }
                }
            }
            NodeKind::Light(_) | NodeKind::Group => {}
        }
    }

    report.nodes = graph.remove_subtree(node);
    report
}

/// Dispose every child of the root
pub fn clear(graph: &mut SceneGraph, resources: &mut GpuResources) -> DisposeReport {
    let mut report = DisposeReport::default();
    let children: Vec<NodeId> = graph.children(graph.root()).to_vec();
    for child in children {
        report.merge(dispose(graph, resources, child));
    }
    report
}
