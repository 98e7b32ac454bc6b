//! Camera element

use crate::foundation::math::{Mat4, Point3, Vec3};
use nalgebra::{Orthographic3, Perspective3};

/// Projection style of a camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Perspective projection with a vertical field of view
    Perspective,
    /// Orthographic projection spanning the view size symmetrically
    Orthographic,
}

/// View and projection source for a scene.
///
/// Matrices are rebuilt lazily: setters only mark state dirty, and
/// [`Camera::update`] recomputes both matrices when anything changed.
#[derive(Debug)]
pub struct Camera {
    projection: Projection,
    position: Vec3,
    direction: Vec3,
    up: Vec3,
    fov_y: f32,
    aspect: f32,
    depth: (f32, f32),
    ortho_size: f32,
    view_matrix: Mat4,
    projection_matrix: Mat4,
    rebuild_view: bool,
    rebuild_projection: bool,
}

impl Camera {
    /// Create a camera at the origin looking down negative Z.
    #[must_use]
    pub fn new(projection: Projection) -> Self {
        let mut camera = Self {
            projection,
            position: Vec3::zeros(),
            direction: -Vec3::z(),
            up: Vec3::y(),
            fov_y: std::f32::consts::FRAC_PI_3,
            aspect: 16.0 / 9.0,
            depth: (0.1, 1000.0),
            ortho_size: 10.0,
            view_matrix: Mat4::identity(),
            projection_matrix: Mat4::identity(),
            rebuild_view: true,
            rebuild_projection: true,
        };
        camera.update();
        camera
    }

    /// Projection style chosen at creation.
    #[must_use]
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// World-space position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move the camera.
    pub fn set_position(&mut self, position: Vec3) {
        if self.position != position {
            self.position = position;
            self.rebuild_view = true;
        }
    }

    /// Normalized-ish view direction. Zero vectors are rejected.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Point the camera along `direction`.
    pub fn set_direction(&mut self, direction: Vec3) {
        if direction.magnitude_squared() > f32::EPSILON && self.direction != direction {
            self.direction = direction;
            self.rebuild_view = true;
        }
    }

    /// Vertical field of view in radians (perspective only).
    pub fn set_fov_y(&mut self, fov_y: f32) {
        if fov_y > 0.0 && (self.fov_y - fov_y).abs() > f32::EPSILON {
            self.fov_y = fov_y;
            self.rebuild_projection = true;
        }
    }

    /// Width over height of the output surface.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect > 0.0 && (self.aspect - aspect).abs() > f32::EPSILON {
            self.aspect = aspect;
            self.rebuild_projection = true;
        }
    }

    /// Near and far clip distances. Ignored unless `0 < near < far`.
    pub fn set_depth(&mut self, near: f32, far: f32) {
        if near > 0.0 && far > near {
            self.depth = (near, far);
            self.rebuild_projection = true;
        }
    }

    /// Half-height of the orthographic view volume.
    pub fn set_ortho_size(&mut self, size: f32) {
        if size > 0.0 {
            self.ortho_size = size;
            self.rebuild_projection = true;
        }
    }

    /// Rebuild dirty matrices. Returns true when anything was recomputed.
    pub fn update(&mut self) -> bool {
        let mut updated = false;
        if self.rebuild_view {
            let eye = Point3::from(self.position);
            let target = Point3::from(self.position + self.direction);
            self.view_matrix = Mat4::look_at_rh(&eye, &target, &self.up);
            self.rebuild_view = false;
            updated = true;
        }
        if self.rebuild_projection {
            let (near, far) = self.depth;
            self.projection_matrix = match self.projection {
                Projection::Perspective => {
                    Perspective3::new(self.aspect, self.fov_y, near, far).to_homogeneous()
                }
                Projection::Orthographic => {
                    let half_h = self.ortho_size;
                    let half_w = half_h * self.aspect;
                    Orthographic3::new(-half_w, half_w, -half_h, half_h, near, far)
                        .to_homogeneous()
                }
            };
            self.rebuild_projection = false;
            updated = true;
        }
        updated
    }

    /// View matrix from the last [`Camera::update`].
    #[must_use]
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    /// Projection matrix from the last [`Camera::update`].
    #[must_use]
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }
}
