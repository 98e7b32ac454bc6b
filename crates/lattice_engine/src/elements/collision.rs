//! Collision element

use super::ElementHandle;
use crate::foundation::math::{Quat, Vec3};

/// Shape of a collision body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionShape {
    /// Sphere; radius from `size.x`
    Sphere,
    /// Axis-aligned box with `size` as half extents
    Box,
    /// Cylinder with `size` as half extents
    Cylinder,
    /// Capsule; radius from `size.x`, height from `size.y`
    Capsule,
    /// Cone; radius from `size.x`, height from `size.y`
    Cone,
}

/// Physics body that can drive exactly one model.
///
/// While attached, the owning model follows this body's transform each
/// pulse and refuses manual reparenting. The back link is maintained by
/// the relation layer together with the model's own collision slot.
#[derive(Debug)]
pub struct Collision {
    shape: CollisionShape,
    size: Vec3,
    mass: f32,
    position: Vec3,
    rotation: Quat,
    velocity: Vec3,
    parent_model: Option<ElementHandle>,
}

impl Collision {
    /// Create a body at the origin. Size and mass are factory-validated.
    #[must_use]
    pub fn new(shape: CollisionShape, size: Vec3, mass: f32) -> Self {
        Self {
            shape,
            size,
            mass,
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            velocity: Vec3::zeros(),
            parent_model: None,
        }
    }

    /// Body shape.
    #[must_use]
    pub fn shape(&self) -> CollisionShape {
        self.shape
    }

    /// Shape dimensions; meaning depends on [`CollisionShape`].
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.size
    }

    /// Body mass in kilograms; zero makes the body static.
    #[must_use]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// World-space position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Teleport the body.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// World-space rotation.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Reorient the body.
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    /// Linear velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Set the linear velocity. Static bodies ignore it.
    pub fn set_velocity(&mut self, velocity: Vec3) {
        if self.mass > 0.0 {
            self.velocity = velocity;
        }
    }

    pub(crate) fn integrate(&mut self, gravity: Vec3, dt: f32) {
        if self.mass > 0.0 {
            self.velocity += gravity * dt;
            self.position += self.velocity * dt;
        }
    }

    /// Model this body drives, if attached.
    #[must_use]
    pub fn parent_model(&self) -> Option<ElementHandle> {
        self.parent_model
    }

    pub(crate) fn set_parent_model(&mut self, model: Option<ElementHandle>) {
        self.parent_model = model;
    }
}
