//! Math utilities and types
//!
//! Provides fundamental math types for 3D scene construction.

use nalgebra::{Matrix4, Quaternion, Unit, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Build a vector from a three-element slice, as found in scene documents
pub fn vec3_from_array(values: [f32; 3]) -> Vec3 {
    Vec3::new(values[0], values[1], values[2])
}

/// Euler angles in radians, applied in X then Y then Z order (R = Rx * Ry * Rz)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Euler {
    /// Rotation around the X axis
    pub x: f32,
    /// Rotation around the Y axis
    pub y: f32,
    /// Rotation around the Z axis
    pub z: f32,
}

impl Euler {
    /// Create a new set of Euler angles
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Convert to a unit quaternion
    pub fn to_quat(self) -> Quat {
        Quat::from_axis_angle(&Vec3::x_axis(), self.x)
            * Quat::from_axis_angle(&Vec3::y_axis(), self.y)
            * Quat::from_axis_angle(&Vec3::z_axis(), self.z)
    }

    /// Decompose a rotation into XYZ-ordered Euler angles
    pub fn from_quat(rotation: &Quat) -> Self {
        let m = rotation.to_rotation_matrix().into_inner();
        let m13 = m[(0, 2)].clamp(-1.0, 1.0);
        // asin loses precision near +-pi/2; atan2 against the row norm does not
        let y = m13.atan2((m[(0, 0)].powi(2) + m[(0, 1)].powi(2)).sqrt());

        if m13.abs() < 0.999_999_9 {
            Self {
                x: (-m[(1, 2)]).atan2(m[(2, 2)]),
                y,
                z: (-m[(0, 1)]).atan2(m[(0, 0)]),
            }
        } else {
            // Gimbal lock: fold all remaining rotation into X
            Self {
                x: m[(2, 1)].atan2(m[(1, 1)]),
                y,
                z: 0.0,
            }
        }
    }
}

/// Transform representing position, rotation, and scale of a scene node
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in parent space
    pub position: Vec3,
    
    /// Rotation as XYZ Euler angles
    pub rotation: Euler,
    
    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Euler::default(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }
    
    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
    
    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_quat().to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Rotate so the local +Z axis points at `target` (Y-up)
    ///
    /// A target coincident with the position leaves the rotation unchanged.
    pub fn look_at(&mut self, target: Vec3) {
        let direction = target - self.position;
        if direction.norm_squared() <= f32::EPSILON {
            return;
        }
        let mut up = Vec3::y();
        if direction.normalize().cross(&up).norm_squared() <= f32::EPSILON {
            up = Vec3::z();
        }
        let rotation = Quat::face_towards(&direction, &up);
        self.rotation = Euler::from_quat(&rotation);
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a right-handed perspective projection matrix (OpenGL clip conventions)
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;
    
    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        nalgebra::Perspective3::new(aspect, fov_y, near, far).into_inner()
    }
    
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&eye.into(), &target.into(), &up)
    }
}
