//! Physics world
//!
//! Bookkeeping side of simulation: which elements own bodies, the
//! gravity vector, and the per-pulse step that integrates dynamic
//! collision bodies and drags their attached models along. Narrow-phase
//! contact resolution belongs to a dedicated physics backend, not here.

use crate::config::PhysicsConfig;
use crate::elements::ElementHandle;
use crate::foundation::math::Vec3;
use crate::lifecycle::ElementRegistry;
use bitflags::bitflags;
use std::collections::HashMap;

bitflags! {
    /// Broad-phase collision layer mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CollisionLayers: u32 {
        /// Immobile level geometry
        const STATIC_WORLD = 1 << 0;
        /// Free-moving bodies
        const DYNAMIC = 1 << 1;
        /// Player and NPC capsules
        const CHARACTER = 1 << 2;
        /// Overlap-only volumes
        const TRIGGER = 1 << 3;
    }
}

#[derive(Debug)]
struct BodyEntry {
    filter: CollisionLayers,
}

/// Rigid body registry plus the integration step.
#[derive(Debug)]
pub struct PhysicsWorld {
    enabled: bool,
    gravity: Vec3,
    floor_enabled: bool,
    models: HashMap<ElementHandle, BodyEntry>,
    collisions: HashMap<ElementHandle, BodyEntry>,
}

impl PhysicsWorld {
    /// Build the world from configuration.
    #[must_use]
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            enabled: config.enabled,
            gravity: Vec3::new(config.gravity[0], config.gravity[1], config.gravity[2]),
            floor_enabled: config.floor_enabled,
            models: HashMap::new(),
            collisions: HashMap::new(),
        }
    }

    /// Whether stepping is active.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Pause or resume stepping.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Gravity applied to dynamic bodies.
    #[must_use]
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Replace the gravity vector.
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    pub(crate) fn add_model(&mut self, model: ElementHandle) {
        self.models.insert(
            model,
            BodyEntry {
                filter: CollisionLayers::STATIC_WORLD,
            },
        );
    }

    pub(crate) fn remove_model(&mut self, model: ElementHandle) -> bool {
        self.models.remove(&model).is_some()
    }

    pub(crate) fn add_collision(&mut self, collision: ElementHandle) {
        self.collisions.insert(
            collision,
            BodyEntry {
                filter: CollisionLayers::DYNAMIC,
            },
        );
    }

    pub(crate) fn remove_collision(&mut self, collision: ElementHandle) -> bool {
        self.collisions.remove(&collision).is_some()
    }

    /// Whether a model currently owns a static body.
    #[must_use]
    pub fn tracks_model(&self, model: ElementHandle) -> bool {
        self.models.contains_key(&model)
    }

    /// Whether a collision element currently owns a body.
    #[must_use]
    pub fn tracks_collision(&self, collision: ElementHandle) -> bool {
        self.collisions.contains_key(&collision)
    }

    /// Number of registered static model bodies.
    #[must_use]
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Number of registered collision bodies.
    #[must_use]
    pub fn collision_count(&self) -> usize {
        self.collisions.len()
    }

    /// Layer mask of a collision body.
    #[must_use]
    pub fn filter_of(&self, collision: ElementHandle) -> Option<CollisionLayers> {
        self.collisions.get(&collision).map(|entry| entry.filter)
    }

    /// Replace the layer mask of a collision body.
    pub fn set_filter(&mut self, collision: ElementHandle, filter: CollisionLayers) -> bool {
        match self.collisions.get_mut(&collision) {
            Some(entry) => {
                entry.filter = filter;
                true
            }
            None => false,
        }
    }

    /// Drop every body at once. Shutdown path only.
    pub(crate) fn clear(&mut self) {
        self.models.clear();
        self.collisions.clear();
    }

    /// Integrate dynamic bodies and sync their attached models.
    pub(crate) fn step(&mut self, elements: &mut ElementRegistry, dt: f32) {
        if !self.enabled || dt <= 0.0 {
            return;
        }
        for &handle in self.collisions.keys() {
            if let Some(body) = elements.collision_mut(handle) {
                body.integrate(self.gravity, dt);
                if self.floor_enabled && body.position().y < 0.0 {
                    let position = body.position();
                    let velocity = body.velocity();
                    body.set_position(Vec3::new(position.x, 0.0, position.z));
                    body.set_velocity(Vec3::new(velocity.x, velocity.y.max(0.0), velocity.z));
                }
            }
        }
        // Attached models follow their body, not the other way around.
        for &handle in self.collisions.keys() {
            let Some(body) = elements.collision(handle) else {
                continue;
            };
            let Some(model_handle) = body.parent_model() else {
                continue;
            };
            let (position, rotation) = (body.position(), body.rotation());
            if let Some(model) = elements.model_mut(model_handle) {
                model.set_position(position);
                model.set_rotation(rotation);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Collision, CollisionShape, Element, Model};
    use approx::assert_relative_eq;

    fn world() -> PhysicsWorld {
        PhysicsWorld::new(&PhysicsConfig::default())
    }

    #[test]
    fn step_moves_dynamic_bodies() {
        let mut elements = ElementRegistry::new();
        let mut physics = world();
        let body = elements.register(Element::Collision(Collision::new(
            CollisionShape::Sphere,
            Vec3::new(0.5, 0.0, 0.0),
            1.0,
        )));
        elements
            .collision_mut(body)
            .unwrap()
            .set_position(Vec3::new(0.0, 100.0, 0.0));
        physics.add_collision(body);

        physics.step(&mut elements, 0.5);
        assert!(elements.collision(body).unwrap().position().y < 100.0);
    }

    #[test]
    fn disabled_world_does_not_step() {
        let mut elements = ElementRegistry::new();
        let mut physics = world();
        physics.set_enabled(false);
        let body = elements.register(Element::Collision(Collision::new(
            CollisionShape::Sphere,
            Vec3::new(0.5, 0.0, 0.0),
            1.0,
        )));
        physics.add_collision(body);
        physics.step(&mut elements, 0.5);
        assert_relative_eq!(elements.collision(body).unwrap().position(), Vec3::zeros());
    }

    #[test]
    fn floor_clamps_falling_bodies() {
        let mut elements = ElementRegistry::new();
        let mut physics = world();
        let body = elements.register(Element::Collision(Collision::new(
            CollisionShape::Box,
            Vec3::new(1.0, 1.0, 1.0),
            2.0,
        )));
        physics.add_collision(body);
        for _ in 0..100 {
            physics.step(&mut elements, 0.1);
        }
        assert!(elements.collision(body).unwrap().position().y >= 0.0);
    }

    #[test]
    fn attached_model_follows_its_body() {
        let mut elements = ElementRegistry::new();
        let mut physics = world();
        let body = elements.register(Element::Collision(Collision::new(
            CollisionShape::Sphere,
            Vec3::new(0.5, 0.0, 0.0),
            1.0,
        )));
        let model = elements.register(Element::Model(Model::new(None)));
        elements
            .collision_mut(body)
            .unwrap()
            .set_parent_model(Some(model));
        physics.add_collision(body);

        physics.step(&mut elements, 0.25);
        let body_position = elements.collision(body).unwrap().position();
        assert_relative_eq!(elements.model(model).unwrap().position(), body_position);
    }

    #[test]
    fn filters_are_per_body() {
        let mut elements = ElementRegistry::new();
        let mut physics = world();
        let body = elements.register(Element::Collision(Collision::new(
            CollisionShape::Sphere,
            Vec3::new(0.5, 0.0, 0.0),
            1.0,
        )));
        physics.add_collision(body);
        assert_eq!(physics.filter_of(body), Some(CollisionLayers::DYNAMIC));
        assert!(physics.set_filter(body, CollisionLayers::CHARACTER | CollisionLayers::TRIGGER));
        assert_eq!(
            physics.filter_of(body),
            Some(CollisionLayers::CHARACTER | CollisionLayers::TRIGGER)
        );
    }
}
