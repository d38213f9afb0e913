//! Light sources
//!
//! Position and orientation of a light come from its scene node transform;
//! this type only carries the photometric parameters.

use crate::foundation::math::Vec3;

/// Light kind with its kind-specific parameters
#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    /// Uniform fill light
    Ambient,
    /// Parallel rays from the node position toward `target`
    Directional {
        /// World-space aim point
        target: Vec3,
    },
    /// Omnidirectional light with falloff
    Point {
        /// Cutoff distance, 0 for unlimited
        distance: f32,
        /// Falloff exponent
        decay: f32,
    },
    /// Cone light
    Spot {
        /// Cutoff distance, 0 for unlimited
        distance: f32,
        /// Cone half-angle in radians
        angle: f32,
        /// Fraction of the cone that is attenuated
        penumbra: f32,
        /// Falloff exponent
        decay: f32,
        /// World-space aim point
        target: Vec3,
    },
}

/// Light source
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Kind and kind-specific parameters
    pub kind: LightKind,
    /// Linear RGB color
    pub color: Vec3,
    /// Light intensity
    pub intensity: f32,
}

impl Light {
    /// Create an ambient light
    pub fn ambient(color: Vec3, intensity: f32) -> Self {
        Self { kind: LightKind::Ambient, color, intensity }
    }

    /// Create a directional light aimed at `target`
    pub fn directional(color: Vec3, intensity: f32, target: Vec3) -> Self {
        Self { kind: LightKind::Directional { target }, color, intensity }
    }

    /// Create a point light
    pub fn point(color: Vec3, intensity: f32, distance: f32, decay: f32) -> Self {
        Self { kind: LightKind::Point { distance, decay }, color, intensity }
    }

    /// Create a spot light
    pub fn spot(
        color: Vec3,
        intensity: f32,
        distance: f32,
        angle: f32,
        penumbra: f32,
        decay: f32,
        target: Vec3,
    ) -> Self {
        Self {
            kind: LightKind::Spot { distance, angle, penumbra, decay, target },
            color,
            intensity,
        }
    }

    /// Short kind label for logs and draw lists
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            LightKind::Ambient => "ambient",
            LightKind::Directional { .. } => "directional",
            LightKind::Point { .. } => "point",
            LightKind::Spot { .. } => "spot",
        }
    }
}
