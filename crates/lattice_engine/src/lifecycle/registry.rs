//! Element registry
//!
//! The single owning container for every live element. Creation moves an
//! element in and hands back a generational [`ElementHandle`]; destruction
//! moves it out and retires the handle. Because slots are versioned, a
//! handle that outlives its element keeps failing validation instead of
//! aliasing whatever reuses the slot, which is the whole defense against
//! use-after-destroy bugs in script-facing APIs.

use crate::elements::{
    Animation, Camera, Collision, Element, ElementHandle, ElementKind, FileStream, Geometry,
    Light, Model, Movie, Scene, Shader,
};
use slotmap::SlotMap;

/// Owning store of all live elements, keyed by generational handles.
#[derive(Default)]
pub struct ElementRegistry {
    elements: SlotMap<ElementHandle, Element>,
}

impl ElementRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `element` and return its handle.
    ///
    /// Crate-private: elements enter the registry through manager
    /// factories only, so registration and subsystem wiring stay paired.
    pub(crate) fn register(&mut self, element: Element) -> ElementHandle {
        let kind = element.kind();
        let handle = self.elements.insert(element);
        log::trace!("registered {kind} {handle:?}");
        handle
    }

    /// Whether `handle` refers to a live element.
    #[must_use]
    pub fn is_valid(&self, handle: ElementHandle) -> bool {
        self.elements.contains_key(handle)
    }

    /// Kind of the element behind `handle`, if it is live.
    #[must_use]
    pub fn kind_of(&self, handle: ElementHandle) -> Option<ElementKind> {
        self.elements.get(handle).map(Element::kind)
    }

    /// Borrow the element behind `handle`.
    #[must_use]
    pub fn get(&self, handle: ElementHandle) -> Option<&Element> {
        self.elements.get(handle)
    }

    /// Mutably borrow the element behind `handle`.
    #[must_use]
    pub fn get_mut(&mut self, handle: ElementHandle) -> Option<&mut Element> {
        self.elements.get_mut(handle)
    }

    /// Remove the element behind `handle` and return it.
    ///
    /// The handle is retired; the slot's next occupant gets a fresh
    /// generation. Crate-private for the same reason as `register`: the
    /// destruction cascade must run first.
    pub(crate) fn unregister(&mut self, handle: ElementHandle) -> Option<Element> {
        let removed = self.elements.remove(handle);
        if let Some(element) = &removed {
            log::trace!("unregistered {} {handle:?}", element.kind());
        }
        removed
    }

    /// Number of live elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether no elements are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate over all live elements.
    pub fn iter(&self) -> impl Iterator<Item = (ElementHandle, &Element)> {
        self.elements.iter()
    }

    /// Drop every element at once. Returns how many were dropped.
    ///
    /// Shutdown path only; no per-element detach runs here, so callers
    /// must have cleared subsystem state first.
    pub(crate) fn clear(&mut self) -> usize {
        let count = self.elements.len();
        self.elements.clear();
        count
    }

    // Typed accessors. Lookups that also match the variant; `None` covers
    // both "stale handle" and "live element of another kind".

    /// Borrow a scene.
    #[must_use]
    pub fn scene(&self, handle: ElementHandle) -> Option<&Scene> {
        match self.elements.get(handle) {
            Some(Element::Scene(scene)) => Some(scene),
            _ => None,
        }
    }

    /// Mutably borrow a scene.
    #[must_use]
    pub fn scene_mut(&mut self, handle: ElementHandle) -> Option<&mut Scene> {
        match self.elements.get_mut(handle) {
            Some(Element::Scene(scene)) => Some(scene),
            _ => None,
        }
    }

    /// Borrow a camera.
    #[must_use]
    pub fn camera(&self, handle: ElementHandle) -> Option<&Camera> {
        match self.elements.get(handle) {
            Some(Element::Camera(camera)) => Some(camera),
            _ => None,
        }
    }

    /// Mutably borrow a camera.
    #[must_use]
    pub fn camera_mut(&mut self, handle: ElementHandle) -> Option<&mut Camera> {
        match self.elements.get_mut(handle) {
            Some(Element::Camera(camera)) => Some(camera),
            _ => None,
        }
    }

    /// Borrow a light.
    #[must_use]
    pub fn light(&self, handle: ElementHandle) -> Option<&Light> {
        match self.elements.get(handle) {
            Some(Element::Light(light)) => Some(light),
            _ => None,
        }
    }

    /// Mutably borrow a light.
    #[must_use]
    pub fn light_mut(&mut self, handle: ElementHandle) -> Option<&mut Light> {
        match self.elements.get_mut(handle) {
            Some(Element::Light(light)) => Some(light),
            _ => None,
        }
    }

    /// Borrow an animation.
    #[must_use]
    pub fn animation(&self, handle: ElementHandle) -> Option<&Animation> {
        match self.elements.get(handle) {
            Some(Element::Animation(animation)) => Some(animation),
            _ => None,
        }
    }

    /// Borrow a geometry.
    #[must_use]
    pub fn geometry(&self, handle: ElementHandle) -> Option<&Geometry> {
        match self.elements.get(handle) {
            Some(Element::Geometry(geometry)) => Some(geometry),
            _ => None,
        }
    }

    /// Borrow a model.
    #[must_use]
    pub fn model(&self, handle: ElementHandle) -> Option<&Model> {
        match self.elements.get(handle) {
            Some(Element::Model(model)) => Some(model),
            _ => None,
        }
    }

    /// Mutably borrow a model.
    #[must_use]
    pub fn model_mut(&mut self, handle: ElementHandle) -> Option<&mut Model> {
        match self.elements.get_mut(handle) {
            Some(Element::Model(model)) => Some(model),
            _ => None,
        }
    }

    /// Borrow a shader.
    #[must_use]
    pub fn shader(&self, handle: ElementHandle) -> Option<&Shader> {
        match self.elements.get(handle) {
            Some(Element::Shader(shader)) => Some(shader),
            _ => None,
        }
    }

    /// Mutably borrow a shader.
    #[must_use]
    pub fn shader_mut(&mut self, handle: ElementHandle) -> Option<&mut Shader> {
        match self.elements.get_mut(handle) {
            Some(Element::Shader(shader)) => Some(shader),
            _ => None,
        }
    }

    /// Borrow a collision body.
    #[must_use]
    pub fn collision(&self, handle: ElementHandle) -> Option<&Collision> {
        match self.elements.get(handle) {
            Some(Element::Collision(collision)) => Some(collision),
            _ => None,
        }
    }

    /// Mutably borrow a collision body.
    #[must_use]
    pub fn collision_mut(&mut self, handle: ElementHandle) -> Option<&mut Collision> {
        match self.elements.get_mut(handle) {
            Some(Element::Collision(collision)) => Some(collision),
            _ => None,
        }
    }

    /// Borrow a movie element.
    #[must_use]
    pub fn movie(&self, handle: ElementHandle) -> Option<&Movie> {
        match self.elements.get(handle) {
            Some(Element::Movie(movie)) => Some(movie),
            _ => None,
        }
    }

    /// Mutably borrow a movie element.
    #[must_use]
    pub fn movie_mut(&mut self, handle: ElementHandle) -> Option<&mut Movie> {
        match self.elements.get_mut(handle) {
            Some(Element::Movie(movie)) => Some(movie),
            _ => None,
        }
    }

    /// Borrow a file element.
    #[must_use]
    pub fn file(&self, handle: ElementHandle) -> Option<&FileStream> {
        match self.elements.get(handle) {
            Some(Element::File(file)) => Some(file),
            _ => None,
        }
    }

    /// Mutably borrow a file element.
    #[must_use]
    pub fn file_mut(&mut self, handle: ElementHandle) -> Option<&mut FileStream> {
        match self.elements.get_mut(handle) {
            Some(Element::File(file)) => Some(file),
            _ => None,
        }
    }
}
