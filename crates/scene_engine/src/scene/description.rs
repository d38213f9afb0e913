//! Scene description documents
//!
//! The declarative JSON form of a scene, deserialized with serde. Kind tags
//! for lights, geometry and materials stay plain strings here: an
//! unrecognized kind is not a parse error, the instantiator skips or defaults
//! it instead.
//!
//! `lights` and `objects` are decoded entry by entry. A malformed entry is
//! kept as [`Entry::Malformed`] and skipped at instantiation; only a document
//! that is not JSON, or whose top-level shape is wrong, fails to parse.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;

use crate::foundation::math::{vec3_from_array, Euler, Transform, Vec3};

/// A complete scene: camera pose, lights, objects, post-processing
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneDescription {
    /// Camera pose applied on load
    pub camera: Option<CameraSpec>,
    /// Lights, in declaration order
    pub lights: Vec<Entry<LightSpec>>,
    /// Meshes and external models, in declaration order
    pub objects: Vec<Entry<ObjectSpec>>,
    /// Opaque post-processing configuration
    pub post_processing: Option<serde_json::Value>,
}

impl SceneDescription {
    /// Parse a JSON document
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Number of well-formed external model objects
    pub fn model_count(&self) -> usize {
        self.objects
            .iter()
            .filter(|entry| matches!(entry, Entry::Valid(ObjectSpec::Model(_))))
            .count()
    }
}

/// One element of a list, decoded independently of its siblings
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<T> {
    /// The element decoded cleanly
    Valid(T),
    /// The element did not decode; holds the decoder's message
    Malformed(String),
}

impl<T> Entry<T> {
    /// The decoded element, or `None` after logging why it is skipped
    pub fn usable(&self, list: &str, index: usize) -> Option<&T> {
        match self {
            Entry::Valid(value) => Some(value),
            Entry::Malformed(error) => {
                log::warn!("Skipping malformed {} entry {}: {}", list, index, error);
                None
            }
        }
    }

    /// The decoded element, if any
    pub fn as_valid(&self) -> Option<&T> {
        match self {
            Entry::Valid(value) => Some(value),
            Entry::Malformed(_) => None,
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Entry<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match T::deserialize(value) {
            Ok(decoded) => Entry::Valid(decoded),
            Err(e) => Entry::Malformed(e.to_string()),
        })
    }
}

/// Camera pose; every part is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CameraSpec {
    /// Eye position
    pub position: Option<[f32; 3]>,
    /// Point the camera aims at
    pub look_at: Option<[f32; 3]>,
    /// Vertical field of view in degrees
    pub fov: Option<f32>,
}

/// Light entry; kind-specific fields are optional
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightSpec {
    /// `AmbientLight`, `DirectionalLight`, `PointLight` or `SpotLight`
    #[serde(rename = "type")]
    pub kind: String,
    /// Color; white when absent
    #[serde(default)]
    pub color: Option<ColorValue>,
    /// Intensity; 1 when absent
    #[serde(default)]
    pub intensity: Option<f32>,
    /// Position of the light node
    #[serde(default)]
    pub position: Option<[f32; 3]>,
    /// Cutoff distance for point and spot lights; 0 means unbounded
    #[serde(default)]
    pub distance: Option<f32>,
    /// Point light falloff exponent
    #[serde(default)]
    pub decay: Option<f32>,
    /// Spot cone angle in radians
    #[serde(default)]
    pub angle: Option<f32>,
    /// Spot cone edge softness in [0, 1]
    #[serde(default)]
    pub penumbra: Option<f32>,
    /// Aim point for directional and spot lights
    #[serde(default)]
    pub target: Option<[f32; 3]>,
}

/// Object entry, tagged by `type`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ObjectSpec {
    /// Primitive geometry with a material
    #[serde(rename = "mesh")]
    Mesh(MeshSpec),
    /// External OBJ/MTL model
    #[serde(rename = "model")]
    Model(ModelSpec),
    /// Anything else; skipped at instantiation
    #[serde(other)]
    Unknown,
}

/// Primitive mesh object
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MeshSpec {
    /// Geometry kind and constructor arguments
    pub geometry: GeometrySpec,
    /// Surface material; a default standard material when absent
    #[serde(default)]
    pub material: MaterialSpec,
    /// Transform and name
    #[serde(flatten)]
    pub placement: Placement,
}

/// External OBJ/MTL model object
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelSpec {
    /// Path of the `.mtl` file, relative to the asset root
    pub material: String,
    /// Path of the `.obj` file, relative to the asset root
    pub mesh: String,
    /// Transform and name applied to the model's group
    #[serde(flatten)]
    pub placement: Placement,
}

/// Optional transform and name shared by all object kinds
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Placement {
    /// Local position
    pub position: Option<[f32; 3]>,
    /// XYZ Euler angles in radians
    pub rotation: Option<[f32; 3]>,
    /// Per-axis scale
    pub scale: Option<[f32; 3]>,
    /// Node name, used for lookup by scripts
    pub name: Option<String>,
}

impl Placement {
    /// Overwrite only the parts of `transform` this placement specifies
    pub fn apply_to(&self, transform: &mut Transform) {
        if let Some(position) = self.position {
            transform.position = vec3_from_array(position);
        }
        if let Some([x, y, z]) = self.rotation {
            transform.rotation = Euler::new(x, y, z);
        }
        if let Some(scale) = self.scale {
            transform.scale = vec3_from_array(scale);
        }
    }
}

/// Geometry kind plus positional arguments
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeometrySpec {
    /// `BoxGeometry`, `SphereGeometry`, `PlaneGeometry` or `CylinderGeometry`
    #[serde(rename = "type")]
    pub kind: String,
    /// Positional constructor arguments
    #[serde(default)]
    pub args: Vec<GeometryArg>,
}

impl GeometrySpec {
    /// Numeric argument at `index`, or `default` when absent
    pub fn number(&self, index: usize, default: f32) -> f32 {
        match self.args.get(index) {
            Some(GeometryArg::Number(value)) => *value,
            _ => default,
        }
    }

    /// Integer argument at `index`, or `default` when absent
    pub fn count(&self, index: usize, default: u32) -> u32 {
        match self.args.get(index) {
            Some(GeometryArg::Number(value)) if *value >= 1.0 => *value as u32,
            _ => default,
        }
    }

    /// Boolean argument at `index`, or `default` when absent
    pub fn flag(&self, index: usize, default: bool) -> bool {
        match self.args.get(index) {
            Some(GeometryArg::Flag(value)) => *value,
            _ => default,
        }
    }
}

/// A positional geometry argument
///
/// Anything that is neither a number nor a boolean reads as absent, so the
/// parameter takes its default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GeometryArg {
    /// Numeric dimension, segment count or angle
    Number(f32),
    /// Boolean switch such as `openEnded`
    Flag(bool),
    /// Unusable value
    Other(serde_json::Value),
}

/// Material kind and parameters
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MaterialSpec {
    /// `MeshStandardMaterial`, `MeshBasicMaterial`, or anything else
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Base color; white when absent
    pub color: Option<ColorValue>,
    /// Enables alpha blending
    pub transparent: Option<bool>,
    /// Alpha in [0, 1]
    pub opacity: Option<f32>,
    /// Standard material only
    pub metalness: Option<f32>,
    /// Standard material only
    pub roughness: Option<f32>,
}

/// A color given either as a number (`0xRRGGBB`) or a hex string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// Packed `0xRRGGBB`
    Number(f64),
    /// `"#rrggbb"`, `"0xrrggbb"` or bare hex digits
    Hex(String),
}

impl ColorValue {
    /// Resolve to linear RGB in [0, 1]
    ///
    /// An unparsable string logs a warning and yields white.
    pub fn to_rgb(&self) -> Vec3 {
        let packed = match self {
            ColorValue::Number(value) if value.is_finite() && *value >= 0.0 => *value as u32,
            ColorValue::Number(value) => {
                log::warn!("Invalid numeric color {}, using white", value);
                0xFF_FF_FF
            }
            ColorValue::Hex(text) => parse_hex(text).unwrap_or_else(|| {
                log::warn!("Invalid color string '{}', using white", text);
                0xFF_FF_FF
            }),
        };
        rgb_from_packed(packed)
    }
}

fn parse_hex(text: &str) -> Option<u32> {
    let digits = text.trim();
    let digits = digits
        .strip_prefix('#')
        .or_else(|| digits.strip_prefix("0x"))
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    if digits.is_empty() || digits.len() > 6 {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Unpack `0xRRGGBB` into normalized RGB
pub fn rgb_from_packed(packed: u32) -> Vec3 {
    let channel = |shift: u32| ((packed >> shift) & 0xFF) as f32 / 255.0;
    Vec3::new(channel(16), channel(8), channel(0))
}
