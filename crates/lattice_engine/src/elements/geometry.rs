//! Geometry element

use crate::assets::GeometryData;

/// Mesh data shared between any number of models.
///
/// A geometry element only ever enters the registry fully loaded;
/// asynchronous loads hold their data outside the registry until the
/// job finishes. Models therefore never observe a half-built mesh.
#[derive(Debug)]
pub struct Geometry {
    vertex_count: u32,
    triangle_count: u32,
    bone_count: u32,
    bound_radius: f32,
}

impl Geometry {
    /// Build the element from loaded mesh data.
    #[must_use]
    pub fn from_data(data: &GeometryData) -> Self {
        Self {
            vertex_count: data.vertices.len() as u32,
            triangle_count: (data.indices.len() / 3) as u32,
            bone_count: data.bones.len() as u32,
            bound_radius: data.bound_radius,
        }
    }

    /// Number of unique vertices.
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Number of indexed triangles.
    #[must_use]
    pub fn triangle_count(&self) -> u32 {
        self.triangle_count
    }

    /// Bones in the skeleton, zero for static meshes.
    #[must_use]
    pub fn bone_count(&self) -> u32 {
        self.bone_count
    }

    /// Whether the mesh carries a skeleton.
    #[must_use]
    pub fn has_skeleton(&self) -> bool {
        self.bone_count > 0
    }

    /// Radius of the model-space bounding sphere.
    #[must_use]
    pub fn bound_radius(&self) -> f32 {
        self.bound_radius
    }
}
