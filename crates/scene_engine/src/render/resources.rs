//! GPU-backed resource registry
//!
//! Geometry and materials live here for as long as a scene node holds their
//! key. Releasing is explicit: the disposer hands every key back when a
//! subtree is torn down, and the live counts let callers verify that nothing
//! leaked across a scene swap.

use std::f32::consts::{PI, TAU};

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::Vec3;
use crate::render::mesh::{GeometryGroup, MeshData};

new_key_type! {
    /// Handle to a geometry resource
    pub struct GeometryKey;
    /// Handle to a material resource
    pub struct MaterialKey;
}

/// Geometry resource
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Axis-aligned box
    Box {
        width: f32,
        height: f32,
        depth: f32,
        width_segments: u32,
        height_segments: u32,
        depth_segments: u32,
    },
    /// UV sphere
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
        phi_start: f32,
        phi_length: f32,
        theta_start: f32,
        theta_length: f32,
    },
    /// Flat plane in XY
    Plane {
        width: f32,
        height: f32,
        width_segments: u32,
        height_segments: u32,
    },
    /// Cylinder or truncated cone
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
        open_ended: bool,
        theta_start: f32,
        theta_length: f32,
    },
    /// Loaded triangle mesh with optional per-material index ranges
    Mesh {
        data: MeshData,
        groups: Vec<GeometryGroup>,
    },
}

impl Geometry {
    /// Unit box
    pub fn unit_box() -> Self {
        Geometry::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
            width_segments: 1,
            height_segments: 1,
            depth_segments: 1,
        }
    }

    /// Unit sphere with the usual tessellation
    pub fn unit_sphere() -> Self {
        Geometry::Sphere {
            radius: 1.0,
            width_segments: 32,
            height_segments: 16,
            phi_start: 0.0,
            phi_length: TAU,
            theta_start: 0.0,
            theta_length: PI,
        }
    }
}

/// Physically-inspired material
#[derive(Debug, Clone, PartialEq)]
pub struct StandardMaterial {
    /// Linear RGB base color
    pub color: Vec3,
    /// 0 dielectric, 1 metal
    pub metalness: f32,
    /// 0 mirror, 1 fully diffuse
    pub roughness: f32,
    /// Alpha in [0, 1]
    pub opacity: f32,
    /// Enables alpha blending
    pub transparent: bool,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: Vec3::new(1.0, 1.0, 1.0),
            metalness: 0.0,
            roughness: 1.0,
            opacity: 1.0,
            transparent: false,
        }
    }
}

/// Unlit material
#[derive(Debug, Clone, PartialEq)]
pub struct BasicMaterial {
    /// Linear RGB color
    pub color: Vec3,
    /// Alpha in [0, 1]
    pub opacity: f32,
    /// Enables alpha blending
    pub transparent: bool,
}

/// Blinn-Phong material built from MTL data
#[derive(Debug, Clone, PartialEq)]
pub struct PhongMaterial {
    /// `newmtl` name
    pub name: String,
    /// Diffuse color (`Kd`)
    pub color: Vec3,
    /// Specular color (`Ks`)
    pub specular: Vec3,
    /// Emissive color (`Ke`)
    pub emissive: Vec3,
    /// Specular exponent (`Ns`)
    pub shininess: f32,
    /// Alpha in [0, 1]
    pub opacity: f32,
    /// Enables alpha blending
    pub transparent: bool,
    /// Texture path, carried as data only
    pub diffuse_map: Option<String>,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: Vec3::new(1.0, 1.0, 1.0),
            specular: Vec3::new(0.067, 0.067, 0.067),
            emissive: Vec3::zeros(),
            shininess: 30.0,
            opacity: 1.0,
            transparent: false,
            diffuse_map: None,
        }
    }
}

/// Material resource
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Metalness/roughness shading
    Standard(StandardMaterial),
    /// Unlit
    Basic(BasicMaterial),
    /// From an MTL library
    Phong(PhongMaterial),
}

impl Material {
    /// Base color regardless of shading model
    pub fn color(&self) -> Vec3 {
        match self {
            Material::Standard(m) => m.color,
            Material::Basic(m) => m.color,
            Material::Phong(m) => m.color,
        }
    }
}

/// Registry of live geometry and material resources
#[derive(Default)]
pub struct GpuResources {
    geometries: SlotMap<GeometryKey, Geometry>,
    materials: SlotMap<MaterialKey, Material>,
}

impl GpuResources {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a geometry resource
    pub fn create_geometry(&mut self, geometry: Geometry) -> GeometryKey {
        self.geometries.insert(geometry)
    }

    /// Allocate a material resource
    pub fn create_material(&mut self, material: Material) -> MaterialKey {
        self.materials.insert(material)
    }

    /// Release a geometry; returns false if it was already released
    pub fn release_geometry(&mut self, key: GeometryKey) -> bool {
        self.geometries.remove(key).is_some()
    }

    /// Release a material; returns false if it was already released
    pub fn release_material(&mut self, key: MaterialKey) -> bool {
        self.materials.remove(key).is_some()
    }

    /// Live geometry for `key`
    pub fn geometry(&self, key: GeometryKey) -> Option<&Geometry> {
        self.geometries.get(key)
    }

    /// Live material for `key`
    pub fn material(&self, key: MaterialKey) -> Option<&Material> {
        self.materials.get(key)
    }

    /// Number of geometries not yet released
    pub fn live_geometry_count(&self) -> usize {
        self.geometries.len()
    }

    /// Number of materials not yet released
    pub fn live_material_count(&self) -> usize {
        self.materials.len()
    }

    /// Drop everything, returning how many resources were still live
    pub fn release_all(&mut self) -> usize {
        let live = self.geometries.len() + self.materials.len();
        self.geometries.clear();
        self.materials.clear();
        live
    }
}
