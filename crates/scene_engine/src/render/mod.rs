//! # Rendering Layer
//!
//! The scene engine does not draw anything itself. It keeps GPU-backed
//! resources in a registry, exposes the live scene to a [`RenderBackend`]
//! once per frame, and leaves the actual drawing to that backend.
//!
//! - [`GpuResources`]: geometry and material registry keyed by handle
//! - [`Camera`]: perspective camera, persistent across scene swaps
//! - [`RenderDriver`]: enabled gate, frame timing, backend submission

pub mod backend;
pub mod camera;
pub mod driver;
pub mod lighting;
pub mod mesh;
pub mod resources;
pub mod stats;

pub use backend::{BackendResult, DrawItem, FrameView, RenderBackend, RenderError};
pub use camera::Camera;
pub use driver::RenderDriver;
pub use lighting::{Light, LightKind};
pub use mesh::{GeometryGroup, MeshData, Vertex};
pub use resources::{
    BasicMaterial, Geometry, GeometryKey, GpuResources, Material, MaterialKey, PhongMaterial,
    StandardMaterial,
};
pub use stats::FrameStats;
