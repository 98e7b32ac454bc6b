//! Scene element

use super::ElementHandle;

/// World container holding at most one active camera and one light.
///
/// The slots are plain handles; the relation graph keeps them in sync
/// with its camera-to-scene and light-to-scene edges. Setters are
/// crate-private so nothing can bypass that bookkeeping.
#[derive(Debug, Default)]
pub struct Scene {
    camera: Option<ElementHandle>,
    light: Option<ElementHandle>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera currently bound to this scene, if any.
    #[must_use]
    pub fn camera(&self) -> Option<ElementHandle> {
        self.camera
    }

    /// Light currently bound to this scene, if any.
    #[must_use]
    pub fn light(&self) -> Option<ElementHandle> {
        self.light
    }

    pub(crate) fn set_camera(&mut self, camera: Option<ElementHandle>) {
        self.camera = camera;
    }

    pub(crate) fn set_light(&mut self, light: Option<ElementHandle>) {
        self.light = light;
    }
}
