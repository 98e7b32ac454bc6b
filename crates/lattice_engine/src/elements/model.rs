//! Model element
//!
//! A model is a placeable instance of a geometry. It carries the local
//! transform, the cached world matrix maintained by the transform tree,
//! the optional links to a parent model, an animation clip, and a
//! collision body, and a small playback controller for its clip.

use super::{ElementHandle, Geometry};
use crate::foundation::math::{Mat4, Quat, Transform, Vec3};

/// Marker for "attach to the whole model, not a specific bone".
pub const NO_BONE: i32 = -1;

/// Animation playback state of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    /// No clip started since binding
    #[default]
    Stopped,
    /// Clip is advancing
    Playing,
    /// Clip is frozen at the current time
    Paused,
}

/// Placeable instance of a geometry.
#[derive(Debug)]
pub struct Model {
    geometry: Option<ElementHandle>,
    skeleton_bones: u32,
    base_radius: f32,

    local: Transform,
    local_matrix: Mat4,
    global_matrix: Mat4,
    matrix_dirty: bool,

    parent: Option<ElementHandle>,
    parent_bone: i32,
    collision: Option<ElementHandle>,

    animation: Option<ElementHandle>,
    play_state: PlayState,
    play_speed: f32,
    play_time: f32,
}

impl Model {
    /// Create a model over `geometry`, or an empty dummy when `None`.
    ///
    /// Dummies have no mesh and no skeleton but still participate in the
    /// transform tree, which makes them useful as grouping nodes.
    #[must_use]
    pub fn new(geometry: Option<(ElementHandle, &Geometry)>) -> Self {
        let (handle, bones, radius) = match geometry {
            Some((handle, geometry)) => {
                (Some(handle), geometry.bone_count(), geometry.bound_radius())
            }
            None => (None, 0, 0.0),
        };
        Self {
            geometry: handle,
            skeleton_bones: bones,
            base_radius: radius,
            local: Transform::identity(),
            local_matrix: Mat4::identity(),
            global_matrix: Mat4::identity(),
            matrix_dirty: false,
            parent: None,
            parent_bone: NO_BONE,
            collision: None,
            animation: None,
            play_state: PlayState::Stopped,
            play_speed: 1.0,
            play_time: 0.0,
        }
    }

    /// Geometry this model instances, if any.
    #[must_use]
    pub fn geometry(&self) -> Option<ElementHandle> {
        self.geometry
    }

    /// Whether a geometry is attached.
    #[must_use]
    pub fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }

    pub(crate) fn clear_geometry(&mut self) {
        self.geometry = None;
    }

    /// Bones in the skeleton copied from the geometry at creation.
    #[must_use]
    pub fn bone_count(&self) -> u32 {
        self.skeleton_bones
    }

    /// Whether the model has a skeleton to animate.
    #[must_use]
    pub fn has_skeleton(&self) -> bool {
        self.skeleton_bones > 0
    }

    // --- transform ---

    /// Local position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.local.position
    }

    /// Set the local position.
    pub fn set_position(&mut self, position: Vec3) {
        if self.local.position != position {
            self.local.position = position;
            self.matrix_dirty = true;
        }
    }

    /// Local rotation.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.local.rotation
    }

    /// Set the local rotation.
    pub fn set_rotation(&mut self, rotation: Quat) {
        if self.local.rotation != rotation {
            self.local.rotation = rotation;
            self.matrix_dirty = true;
        }
    }

    /// Local scale.
    #[must_use]
    pub fn scale(&self) -> Vec3 {
        self.local.scale
    }

    /// Set the local scale.
    pub fn set_scale(&mut self, scale: Vec3) {
        if self.local.scale != scale {
            self.local.scale = scale;
            self.matrix_dirty = true;
        }
    }

    /// World matrix from the last transform tree pass.
    #[must_use]
    pub fn global_matrix(&self) -> &Mat4 {
        &self.global_matrix
    }

    /// World-space bounding radius, grown by the largest scale factor.
    #[must_use]
    pub fn bound_radius(&self) -> f32 {
        self.base_radius * self.local.max_scale()
    }

    /// Recompute cached matrices.
    ///
    /// Returns true when the world matrix changed so the caller can
    /// cascade the refresh into children.
    pub(crate) fn refresh_matrices(
        &mut self,
        parent_global: Option<&Mat4>,
        parent_moved: bool,
    ) -> bool {
        let local_changed = self.matrix_dirty;
        if local_changed {
            self.local_matrix = self.local.to_matrix();
            self.matrix_dirty = false;
        }
        if local_changed || parent_moved {
            self.global_matrix = match parent_global {
                Some(parent) => parent * self.local_matrix,
                None => self.local_matrix,
            };
            true
        } else {
            false
        }
    }

    // --- parenting ---

    /// Parent model in the transform tree, if attached.
    #[must_use]
    pub fn parent(&self) -> Option<ElementHandle> {
        self.parent
    }

    /// Bone index on the parent this model follows, [`NO_BONE`] for none.
    #[must_use]
    pub fn parent_bone(&self) -> i32 {
        self.parent_bone
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ElementHandle>, bone: i32) {
        self.parent = parent;
        self.parent_bone = if parent.is_some() { bone } else { NO_BONE };
        self.matrix_dirty = true;
    }

    // --- collision ---

    /// Collision body driving this model, if attached.
    #[must_use]
    pub fn collision(&self) -> Option<ElementHandle> {
        self.collision
    }

    /// Whether a collision body is attached.
    #[must_use]
    pub fn has_collision(&self) -> bool {
        self.collision.is_some()
    }

    pub(crate) fn set_collision(&mut self, collision: Option<ElementHandle>) {
        self.collision = collision;
    }

    // --- animation playback ---

    /// Animation clip bound to this model, if any.
    #[must_use]
    pub fn animation(&self) -> Option<ElementHandle> {
        self.animation
    }

    pub(crate) fn set_animation(&mut self, animation: Option<ElementHandle>) {
        self.animation = animation;
        self.play_state = PlayState::Stopped;
        self.play_time = 0.0;
    }

    /// Current playback state.
    #[must_use]
    pub fn play_state(&self) -> PlayState {
        self.play_state
    }

    /// Seconds into the bound clip.
    #[must_use]
    pub fn play_time(&self) -> f32 {
        self.play_time
    }

    /// Start or resume the bound clip. False when no clip is bound.
    pub fn play_animation(&mut self) -> bool {
        if self.animation.is_some() {
            self.play_state = PlayState::Playing;
            true
        } else {
            false
        }
    }

    /// Pause the bound clip. False unless it was playing.
    pub fn pause_animation(&mut self) -> bool {
        if self.play_state == PlayState::Playing {
            self.play_state = PlayState::Paused;
            true
        } else {
            false
        }
    }

    /// Rewind the bound clip to its start. False when no clip is bound.
    pub fn reset_animation(&mut self) -> bool {
        if self.animation.is_some() {
            self.play_time = 0.0;
            true
        } else {
            false
        }
    }

    /// Playback speed multiplier.
    #[must_use]
    pub fn play_speed(&self) -> f32 {
        self.play_speed
    }

    /// Set the playback speed multiplier. Non-positive values are ignored.
    pub fn set_play_speed(&mut self, speed: f32) {
        if speed > 0.0 {
            self.play_speed = speed;
        }
    }

    /// Advance playback, wrapping at `duration`. Called from the pulse.
    pub(crate) fn advance_animation(&mut self, dt: f32, duration: f32) {
        if self.play_state == PlayState::Playing && duration > 0.0 {
            self.play_time = (self.play_time + dt * self.play_speed) % duration;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn dummy_model_has_no_skeleton() {
        let model = Model::new(None);
        assert!(!model.has_geometry());
        assert!(!model.has_skeleton());
        assert_eq!(model.parent_bone(), NO_BONE);
    }

    #[test]
    fn play_requires_a_bound_clip() {
        let mut model = Model::new(None);
        assert!(!model.play_animation());
        assert_eq!(model.play_state(), PlayState::Stopped);
    }

    #[test]
    fn pause_only_from_playing() {
        let mut model = Model::new(None);
        assert!(!model.pause_animation());
    }

    #[test]
    fn refresh_rebuilds_only_when_dirty() {
        let mut model = Model::new(None);
        assert!(!model.refresh_matrices(None, false));
        model.set_position(Vec3::new(0.0, 1.0, 0.0));
        assert!(model.refresh_matrices(None, false));
        assert_relative_eq!(model.global_matrix().m24, 1.0);
        assert!(!model.refresh_matrices(None, false));
    }

    #[test]
    fn parent_motion_cascades_without_local_dirt() {
        let mut model = Model::new(None);
        model.refresh_matrices(None, false);
        let parent = Mat4::new_translation(&Vec3::new(5.0, 0.0, 0.0));
        assert!(model.refresh_matrices(Some(&parent), true));
        assert_relative_eq!(model.global_matrix().m14, 5.0);
    }

    #[test]
    fn advance_wraps_at_duration() {
        let mut model = Model::new(None);
        // Fake a bound clip through the crate-private setter.
        model.animation = Some(ElementHandle::default());
        assert!(model.play_animation());
        model.advance_animation(2.5, 2.0);
        assert_relative_eq!(model.play_time(), 0.5);
    }
}
