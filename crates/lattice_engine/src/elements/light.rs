//! Light element

use crate::foundation::math::{Vec3, Vec4};

/// Directional light bound to a scene.
#[derive(Debug)]
pub struct Light {
    direction: Vec3,
    color: Vec4,
    params: Vec4,
}

impl Default for Light {
    fn default() -> Self {
        Self::new()
    }
}

impl Light {
    /// Create a white light shining straight down.
    #[must_use]
    pub fn new() -> Self {
        Self {
            direction: -Vec3::y(),
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            params: Vec4::zeros(),
        }
    }

    /// Light direction.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Set the light direction. Zero vectors are ignored.
    pub fn set_direction(&mut self, direction: Vec3) {
        if direction.magnitude_squared() > f32::EPSILON {
            self.direction = direction;
        }
    }

    /// RGBA color.
    #[must_use]
    pub fn color(&self) -> Vec4 {
        self.color
    }

    /// Set the RGBA color.
    pub fn set_color(&mut self, color: Vec4) {
        self.color = color;
    }

    /// Shader-defined falloff parameters.
    #[must_use]
    pub fn params(&self) -> Vec4 {
        self.params
    }

    /// Set the falloff parameters passed through to shaders.
    pub fn set_params(&mut self, params: Vec4) {
        self.params = params;
    }
}
