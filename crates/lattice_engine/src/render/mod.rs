//! Render state
//!
//! The lifecycle-facing slice of the renderer: which scene, shader, and
//! render target are active, and which movies need their streams
//! advanced each pulse. Draw submission itself lives behind a graphics
//! backend and is not modeled here; what matters is that destroying an
//! element always retires it from these slots.

use crate::elements::ElementHandle;

/// Active render bindings and the registered movie list.
#[derive(Debug, Default)]
pub struct RenderState {
    active_scene: Option<ElementHandle>,
    active_shader: Option<ElementHandle>,
    active_target: Option<ElementHandle>,
    movies: Vec<ElementHandle>,
}

impl RenderState {
    /// Create an empty render state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene the next frame will draw, if any.
    #[must_use]
    pub fn active_scene(&self) -> Option<ElementHandle> {
        self.active_scene
    }

    /// Shader bound for the next draw, if any.
    #[must_use]
    pub fn active_shader(&self) -> Option<ElementHandle> {
        self.active_shader
    }

    /// Render target bound instead of the backbuffer, if any.
    #[must_use]
    pub fn active_target(&self) -> Option<ElementHandle> {
        self.active_target
    }

    pub(crate) fn set_active_scene(&mut self, scene: Option<ElementHandle>) {
        self.active_scene = scene;
    }

    pub(crate) fn set_active_shader(&mut self, shader: Option<ElementHandle>) {
        self.active_shader = shader;
    }

    pub(crate) fn set_active_target(&mut self, target: Option<ElementHandle>) {
        self.active_target = target;
    }

    /// Clear the active scene slot if it holds `scene`.
    pub(crate) fn retire_scene(&mut self, scene: ElementHandle) {
        if self.active_scene == Some(scene) {
            self.active_scene = None;
        }
    }

    /// Clear the active shader slot if it holds `shader`.
    pub(crate) fn retire_shader(&mut self, shader: ElementHandle) {
        if self.active_shader == Some(shader) {
            self.active_shader = None;
        }
    }

    /// Clear the active target slot if it holds `target`.
    pub(crate) fn retire_target(&mut self, target: ElementHandle) {
        if self.active_target == Some(target) {
            self.active_target = None;
        }
    }

    /// Register a movie for per-pulse stream advancement.
    pub(crate) fn add_movie(&mut self, movie: ElementHandle) {
        if !self.movies.contains(&movie) {
            self.movies.push(movie);
        }
    }

    /// Drop a movie from the update list.
    pub(crate) fn remove_movie(&mut self, movie: ElementHandle) -> bool {
        let before = self.movies.len();
        self.movies.retain(|&m| m != movie);
        self.movies.len() != before
    }

    /// Movies registered for per-pulse updates, in registration order.
    #[must_use]
    pub fn movies(&self) -> &[ElementHandle] {
        &self.movies
    }

    /// Drop all bindings and movies at once. Shutdown path only.
    pub(crate) fn clear(&mut self) {
        self.active_scene = None;
        self.active_shader = None;
        self.active_target = None;
        self.movies.clear();
    }
}
