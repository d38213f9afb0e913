//! Scene description to live nodes
//!
//! Pure construction: every function here builds a node (or, for models, a
//! subtree) and hands it back unattached. Unknown light and geometry kinds
//! yield `None` with a warning; unknown material kinds fall back to a
//! standard material carrying only the color.

use std::f32::consts::{PI, TAU};

use crate::foundation::math::{vec3_from_array, Transform, Vec3};
use crate::render::{
    BasicMaterial, Camera, Geometry, GpuResources, Light, Material, StandardMaterial,
};
use crate::scene::{
    CameraSpec, ColorValue, GeometrySpec, LightSpec, MaterialSlot, MaterialSpec, MeshNode,
    MeshSpec, Node, NodeId, Placement, SceneGraph,
};

const WHITE: Vec3 = Vec3::new(1.0, 1.0, 1.0);

/// Default spot cone half-angle
const SPOT_ANGLE: f32 = PI / 3.0;

/// Default physical falloff exponent
const DEFAULT_DECAY: f32 = 2.0;

/// Apply a camera pose: position first, then aim, then field of view
pub fn apply_camera(spec: &CameraSpec, camera: &mut Camera) {
    if let Some(position) = spec.position {
        camera.set_position(vec3_from_array(position));
    }
    if let Some(target) = spec.look_at {
        camera.set_target(vec3_from_array(target));
    }
    // A zero fov is treated as absent
    if let Some(fov) = spec.fov.filter(|fov| *fov > 0.0) {
        camera.set_fov_degrees(fov);
    }
}

/// Build a light node, or `None` for an unknown kind
pub fn create_light(spec: &LightSpec) -> Option<Node> {
    let color = resolve_color(spec.color.as_ref());
    let intensity = spec.intensity.unwrap_or(1.0);
    let target = spec.target.map_or_else(Vec3::zeros, vec3_from_array);
    let nonzero = |value: Option<f32>| value.filter(|v| *v != 0.0);

    let (light, default_position) = match spec.kind.as_str() {
        "AmbientLight" => (Light::ambient(color, intensity), Vec3::zeros()),
        "DirectionalLight" => (Light::directional(color, intensity, target), Vec3::y()),
        "PointLight" => (
            Light::point(
                color,
                intensity,
                spec.distance.unwrap_or(0.0),
                nonzero(spec.decay).unwrap_or(DEFAULT_DECAY),
            ),
            Vec3::zeros(),
        ),
        "SpotLight" => (
            Light::spot(
                color,
                intensity,
                spec.distance.unwrap_or(0.0),
                spec.angle.unwrap_or(SPOT_ANGLE),
                spec.penumbra.unwrap_or(0.0),
                DEFAULT_DECAY,
                target,
            ),
            Vec3::zeros(),
        ),
        other => {
            log::warn!("Unknown light type: {}", other);
            return None;
        }
    };

    let position = spec.position.map_or(default_position, vec3_from_array);
    Some(Node::light(light).with_transform(Transform::from_position(position)))
}

/// Build a primitive mesh node, or `None` for an unknown geometry kind
///
/// Resources are only allocated once the geometry kind is known to be valid.
pub fn create_mesh(spec: &MeshSpec, resources: &mut GpuResources) -> Option<Node> {
    let geometry = create_geometry(&spec.geometry)?;
    let material = create_material(&spec.material);

    let mesh = MeshNode {
        geometry: Some(resources.create_geometry(geometry)),
        materials: MaterialSlot::Single(resources.create_material(material)),
    };
    let mut node = Node::mesh(mesh);
    apply_placement(&mut node, &spec.placement);
    Some(node)
}

/// Apply optional transform parts and name to a node
pub fn apply_placement(node: &mut Node, placement: &Placement) {
    placement.apply_to(&mut node.transform);
    if let Some(name) = &placement.name {
        node.name = name.clone();
    }
}

/// Apply a placement to a node already in the graph
pub fn place(graph: &mut SceneGraph, id: NodeId, placement: &Placement) {
    if let Some(node) = graph.get_mut(id) {
        apply_placement(node, placement);
    }
}

fn create_geometry(spec: &GeometrySpec) -> Option<Geometry> {
    let geometry = match spec.kind.as_str() {
        "BoxGeometry" => Geometry::Box {
            width: spec.number(0, 1.0),
            height: spec.number(1, 1.0),
            depth: spec.number(2, 1.0),
            width_segments: spec.count(3, 1),
            height_segments: spec.count(4, 1),
            depth_segments: spec.count(5, 1),
        },
        "SphereGeometry" => Geometry::Sphere {
            radius: spec.number(0, 1.0),
            width_segments: spec.count(1, 32),
            height_segments: spec.count(2, 16),
            phi_start: spec.number(3, 0.0),
            phi_length: spec.number(4, TAU),
            theta_start: spec.number(5, 0.0),
            theta_length: spec.number(6, PI),
        },
        "PlaneGeometry" => Geometry::Plane {
            width: spec.number(0, 1.0),
            height: spec.number(1, 1.0),
            width_segments: spec.count(2, 1),
            height_segments: spec.count(3, 1),
        },
        "CylinderGeometry" => Geometry::Cylinder {
            radius_top: spec.number(0, 1.0),
            radius_bottom: spec.number(1, 1.0),
            height: spec.number(2, 1.0),
            radial_segments: spec.count(3, 32),
            height_segments: spec.count(4, 1),
            open_ended: spec.flag(5, false),
            theta_start: spec.number(6, 0.0),
            theta_length: spec.number(7, TAU),
        },
        other => {
            log::warn!("Unknown geometry type: {}", other);
            return None;
        }
    };
    Some(geometry)
}

fn create_material(spec: &MaterialSpec) -> Material {
    let color = resolve_color(spec.color.as_ref());
    let opacity = spec.opacity.unwrap_or(1.0);
    let transparent = spec.transparent.unwrap_or(false);

    match spec.kind.as_deref() {
        Some("MeshStandardMaterial") => Material::Standard(StandardMaterial {
            color,
            metalness: spec.metalness.unwrap_or(0.0),
            // Zero roughness reads as unset
            roughness: spec.roughness.filter(|r| *r != 0.0).unwrap_or(1.0),
            opacity,
            transparent,
        }),
        Some("MeshBasicMaterial") => Material::Basic(BasicMaterial { color, opacity, transparent }),
        other => {
            if let Some(kind) = other {
                log::warn!("Unknown material type: {}, using standard material", kind);
            }
            Material::Standard(StandardMaterial { color, ..StandardMaterial::default() })
        }
    }
}

fn resolve_color(color: Option<&ColorValue>) -> Vec3 {
    color.map_or(WHITE, ColorValue::to_rgb)
}
