//! Math types shared across the engine
//!
//! Thin aliases over nalgebra plus the local transform used by models
//! and cameras. Everything here is plain `f32` math.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Local position, rotation, and scale of an element.
///
/// Models keep one of these per node; the transform tree flattens them
/// into world matrices parent-before-child each pulse.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position relative to the parent (or the world for roots)
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Per-axis scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Identity transform: no translation, no rotation, unit scale.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Transform with only a position set.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Compose translation, rotation, and scale into a single matrix.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Largest scale factor across the three axes.
    ///
    /// Used to grow bounding radii conservatively under non-uniform scale.
    #[must_use]
    pub fn max_scale(&self) -> f32 {
        self.scale.x.abs().max(self.scale.y.abs()).max(self.scale.z.abs())
    }
}
