//! Engine shell
//!
//! Owns every subsystem and wires them together. Script-facing code
//! talks to the [`Engine`]: factories that span subsystems live here as
//! thin wrappers that pass the right collaborators into the element
//! manager, and [`Engine::pulse`] drives the per-frame work in a fixed
//! order. Single-subsystem operations are reached through the accessor
//! pairs, the way scripts reach element state.

use crate::assets::{AsyncGeometryLoader, GeometryTicket};
use crate::config::{ConfigError, EngineConfig};
use crate::elements::{CollisionShape, ElementHandle, ElementKind};
use crate::foundation::math::Vec3;
use crate::foundation::paths;
use crate::foundation::time::PulseClock;
use crate::lifecycle::{ElementError, ElementManager, RelationError};
use crate::physics::PhysicsWorld;
use crate::prerender::TransformTree;
use crate::render::RenderState;
use std::collections::HashMap;
use thiserror::Error;

/// Engine-level failures.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration failed to load or parse.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The configured working directory could not be prepared.
    #[error("working directory {0} is unusable: {1}")]
    WorkingDir(String, std::io::Error),
}

/// The assembled engine: configuration, element manager, and the
/// collaborator subsystems the destruction cascade reaches into.
pub struct Engine {
    config: EngineConfig,
    elements: ElementManager,
    render: RenderState,
    physics: PhysicsWorld,
    tree: TransformTree,
    loader: AsyncGeometryLoader,
    clock: PulseClock,
    ready_geometry: HashMap<GeometryTicket, ElementHandle>,
}

impl Engine {
    /// Assemble an engine from configuration.
    ///
    /// The working directory is created when missing so factories have a
    /// defined root from the first pulse on.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        log::info!(
            "initializing engine, working dir {}",
            config.working_dir.display()
        );
        std::fs::create_dir_all(&config.working_dir).map_err(|source| {
            EngineError::WorkingDir(config.working_dir.display().to_string(), source)
        })?;
        let elements = ElementManager::new(config.working_dir.clone());
        let physics = PhysicsWorld::new(&config.physics);
        Ok(Self {
            config,
            elements,
            render: RenderState::new(),
            physics,
            tree: TransformTree::new(),
            loader: AsyncGeometryLoader::new(),
            clock: PulseClock::new(),
            ready_geometry: HashMap::new(),
        })
    }

    /// Assemble an engine from a TOML or RON config file.
    pub fn from_config_file(path: &str) -> Result<Self, EngineError> {
        use crate::config::Config;
        Self::new(EngineConfig::load_from_file(path)?)
    }

    /// Configuration the engine was built from.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Element manager: registry access, factories, relation operations.
    #[must_use]
    pub fn elements(&self) -> &ElementManager {
        &self.elements
    }

    /// Mutable element manager access.
    pub fn elements_mut(&mut self) -> &mut ElementManager {
        &mut self.elements
    }

    /// Active render bindings and the movie list.
    #[must_use]
    pub fn render(&self) -> &RenderState {
        &self.render
    }

    /// Physics world.
    #[must_use]
    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Mutable physics access for gravity and enable toggles.
    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    /// Transform tree over the live models.
    #[must_use]
    pub fn tree(&self) -> &TransformTree {
        &self.tree
    }

    /// Delta of the most recent pulse in seconds.
    #[must_use]
    pub fn delta_time(&self) -> f32 {
        self.clock.delta()
    }

    /// Completed pulses since construction.
    #[must_use]
    pub fn pulses(&self) -> u64 {
        self.clock.pulses()
    }

    // --- multi-subsystem factories ---

    /// Create a model over an optional geometry.
    /// See [`ElementManager::create_model`].
    pub fn create_model(
        &mut self,
        geometry: Option<ElementHandle>,
    ) -> Result<ElementHandle, ElementError> {
        self.elements
            .create_model(&mut self.tree, &mut self.physics, geometry)
    }

    /// Create a collision body. See [`ElementManager::create_collision`].
    pub fn create_collision(
        &mut self,
        shape: CollisionShape,
        size: Vec3,
        mass: f32,
    ) -> ElementHandle {
        self.elements
            .create_collision(&mut self.physics, shape, size, mass)
    }

    /// Probe and register a movie. See [`ElementManager::create_movie`].
    pub fn create_movie(&mut self, path: &str) -> Result<ElementHandle, ElementError> {
        self.elements.create_movie(&mut self.render, path)
    }

    /// Hang `model` under `parent`, optionally following a bone.
    pub fn attach_model_to_model(
        &mut self,
        model: ElementHandle,
        parent: ElementHandle,
        bone: i32,
    ) -> Result<(), RelationError> {
        self.elements
            .attach_model_to_model(&mut self.tree, model, parent, bone)
    }

    /// Detach `model` from its transform parent.
    pub fn detach_model(&mut self, model: ElementHandle) -> Result<bool, RelationError> {
        self.elements.detach_model(&mut self.tree, model)
    }

    /// Destroy an element through the full cascade.
    /// See [`ElementManager::destroy_element`].
    pub fn destroy_element(&mut self, handle: ElementHandle) -> bool {
        self.elements
            .destroy_element(&mut self.render, &mut self.physics, &mut self.tree, handle)
    }

    // --- active render bindings ---

    /// Bind `scene` as the scene the next frame draws.
    pub fn set_active_scene(&mut self, scene: ElementHandle) -> Result<(), ElementError> {
        if self.elements.registry().kind_of(scene) != Some(ElementKind::Scene) {
            return Err(ElementError::InvalidHandle);
        }
        self.render.set_active_scene(Some(scene));
        Ok(())
    }

    /// Clear the active scene binding.
    pub fn clear_active_scene(&mut self) {
        self.render.set_active_scene(None);
    }

    /// Bind `shader` for subsequent draws.
    pub fn set_active_shader(&mut self, shader: ElementHandle) -> Result<(), ElementError> {
        if self.elements.registry().kind_of(shader) != Some(ElementKind::Shader) {
            return Err(ElementError::InvalidHandle);
        }
        self.render.set_active_shader(Some(shader));
        Ok(())
    }

    /// Clear the active shader binding.
    pub fn clear_active_shader(&mut self) {
        self.render.set_active_shader(None);
    }

    /// Redirect drawing into `target` instead of the backbuffer.
    pub fn set_active_target(&mut self, target: ElementHandle) -> Result<(), ElementError> {
        if self.elements.registry().kind_of(target) != Some(ElementKind::RenderTarget) {
            return Err(ElementError::InvalidHandle);
        }
        self.render.set_active_target(Some(target));
        Ok(())
    }

    /// Return drawing to the backbuffer.
    pub fn clear_active_target(&mut self) {
        self.render.set_active_target(None);
    }

    // --- background geometry ---

    /// Queue a mesh load on the worker thread.
    ///
    /// The returned ticket resolves to a handle through
    /// [`Engine::resolve_geometry`] once a later pulse has drained the
    /// completion. Until then the mesh has no element and no handle.
    pub fn create_geometry_async(&mut self, path: &str) -> GeometryTicket {
        let resolved = paths::resolve(self.elements.working_dir(), path);
        self.loader.submit(resolved)
    }

    /// Claim the geometry element a finished background load produced.
    ///
    /// Returns the handle exactly once; later calls for the same ticket
    /// return `None`, as do calls for pending or failed loads.
    pub fn resolve_geometry(&mut self, ticket: GeometryTicket) -> Option<ElementHandle> {
        self.ready_geometry.remove(&ticket)
    }

    /// Number of background loads still in the worker or undrained.
    #[must_use]
    pub fn pending_geometry(&self) -> usize {
        self.loader.in_flight()
    }

    // --- per-frame drive ---

    /// Advance the engine one pulse and return the clamped delta.
    ///
    /// Order is fixed: drain finished background loads and register
    /// their geometry, step physics, then refresh the transform tree so
    /// draws see this pulse's matrices.
    pub fn pulse(&mut self) -> f32 {
        let dt = self.clock.tick();
        for done in self.loader.drain() {
            match done.result {
                Ok(data) => {
                    let handle = self.elements.register_geometry(&data);
                    log::debug!(
                        "background geometry {} ready as {handle:?}",
                        done.path.display()
                    );
                    self.ready_geometry.insert(done.ticket, handle);
                }
                Err(err) => {
                    log::error!("background load of {} failed: {err}", done.path.display());
                }
            }
        }
        self.physics.step(self.elements.registry_mut(), dt);
        self.tree.update(self.elements.registry_mut(), dt);
        dt
    }

    /// Tear the engine down: clear every subsystem, then drain the
    /// registry without per-element cascades.
    pub fn shutdown(&mut self) {
        self.render.clear();
        self.physics.clear();
        self.tree.clear();
        self.ready_geometry.clear();
        let dropped = self.elements.destroy_all();
        log::info!("engine shutdown, dropped {dropped} elements");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::geometry::{encode_lgm, BoneData, GeometryData, Vertex};
    use crate::elements::Projection;
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    fn workspace(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lattice-engine-{}-{tag}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn engine(tag: &str) -> Engine {
        Engine::new(EngineConfig::new(workspace(tag))).unwrap()
    }

    fn write_mesh(dir: &PathBuf, name: &str) {
        let data = GeometryData {
            vertices: vec![Vertex {
                position: [0.0, 1.0, 0.0],
                normal: [0.0, 1.0, 0.0],
                uv: [0.5, 0.5],
            }],
            indices: Vec::new(),
            bones: vec![BoneData {
                name: "root".to_owned(),
                parent: -1,
            }],
            bound_radius: 1.0,
        };
        std::fs::write(dir.join(name), encode_lgm(&data)).unwrap();
    }

    #[test]
    fn active_scene_requires_a_scene_handle() {
        let mut engine = engine("active");
        let scene = engine.elements_mut().create_scene();
        let camera = engine.elements_mut().create_camera(Projection::Perspective);

        assert!(matches!(
            engine.set_active_scene(camera),
            Err(ElementError::InvalidHandle)
        ));
        engine.set_active_scene(scene).unwrap();
        assert_eq!(engine.render().active_scene(), Some(scene));

        assert!(engine.destroy_element(scene));
        assert_eq!(engine.render().active_scene(), None);
    }

    #[test]
    fn async_geometry_resolves_exactly_once() {
        let dir = workspace("async");
        write_mesh(&dir, "pillar.lgm");
        let mut engine = Engine::new(EngineConfig::new(dir)).unwrap();

        let ticket = engine.create_geometry_async("pillar.lgm");
        assert_eq!(engine.resolve_geometry(ticket), None);

        let deadline = Instant::now() + Duration::from_secs(5);
        let handle = loop {
            assert!(Instant::now() < deadline, "background load never finished");
            engine.pulse();
            if let Some(handle) = engine.resolve_geometry(ticket) {
                break handle;
            }
            std::thread::sleep(Duration::from_millis(2));
        };

        assert_eq!(
            engine.elements().registry().kind_of(handle),
            Some(ElementKind::Geometry)
        );
        assert_eq!(engine.resolve_geometry(ticket), None);
    }

    #[test]
    fn failed_async_load_registers_nothing() {
        let mut engine = engine("async-fail");
        let ticket = engine.create_geometry_async("missing.lgm");

        let deadline = Instant::now() + Duration::from_secs(5);
        while engine.pending_geometry() > 0 {
            assert!(Instant::now() < deadline, "background load never finished");
            engine.pulse();
            std::thread::sleep(Duration::from_millis(2));
        }

        assert_eq!(engine.resolve_geometry(ticket), None);
        assert_eq!(engine.elements().registry().len(), 0);
    }

    #[test]
    fn pulse_integrates_physics() {
        let mut engine = engine("pulse");
        let body = engine.create_collision(CollisionShape::Sphere, Vec3::new(0.5, 0.0, 0.0), 1.0);
        engine
            .elements_mut()
            .registry_mut()
            .collision_mut(body)
            .unwrap()
            .set_position(Vec3::new(0.0, 50.0, 0.0));

        for _ in 0..3 {
            std::thread::sleep(Duration::from_millis(5));
            engine.pulse();
        }

        let position = engine
            .elements()
            .registry()
            .collision(body)
            .unwrap()
            .position();
        assert!(position.y < 50.0);
        assert_eq!(engine.pulses(), 3);
    }

    #[test]
    fn session_builds_wires_and_tears_down() {
        let dir = workspace("session");
        write_mesh(&dir, "rig.lgm");
        std::fs::write(
            dir.join("walk.lga"),
            crate::assets::encode_lga(&crate::assets::AnimationData {
                bone_count: 1,
                frame_count: 24,
                fps: 24.0,
            }),
        )
        .unwrap();
        let mut engine = Engine::new(EngineConfig::new(dir)).unwrap();

        let scene = engine.elements_mut().create_scene();
        let camera = engine.elements_mut().create_camera(Projection::Perspective);
        engine.elements_mut().set_scene_camera(scene, camera).unwrap();
        engine.set_active_scene(scene).unwrap();

        let ticket = engine.create_geometry_async("rig.lgm");
        let deadline = Instant::now() + Duration::from_secs(5);
        let geometry = loop {
            assert!(Instant::now() < deadline, "background load never finished");
            engine.pulse();
            if let Some(handle) = engine.resolve_geometry(ticket) {
                break handle;
            }
            std::thread::sleep(Duration::from_millis(2));
        };

        let actor = engine.create_model(Some(geometry)).unwrap();
        let prop = engine.create_model(None).unwrap();
        engine.attach_model_to_model(prop, actor, 0).unwrap();
        let clip = engine.elements_mut().create_animation("walk.lga").unwrap();
        engine.elements_mut().set_model_animation(actor, clip).unwrap();
        let body = engine.create_collision(CollisionShape::Box, Vec3::new(0.5, 0.5, 0.5), 2.0);
        engine
            .elements_mut()
            .attach_collision_to_model(body, actor)
            .unwrap();

        engine
            .elements_mut()
            .registry_mut()
            .model_mut(actor)
            .unwrap()
            .play_animation();
        for _ in 0..2 {
            std::thread::sleep(Duration::from_millis(3));
            engine.pulse();
        }
        assert!(engine.elements().registry().model(actor).unwrap().play_time() > 0.0);
        assert_eq!(engine.tree().parent_of(prop), Some(actor));

        // Destroying the actor releases everything that referenced it
        // but never takes the other elements down with it.
        assert!(engine.destroy_element(actor));
        assert!(engine.elements().is_valid(prop));
        assert_eq!(engine.tree().parent_of(prop), None);
        assert_eq!(engine.elements().registry().model(prop).unwrap().parent(), None);
        assert_eq!(
            engine
                .elements()
                .registry()
                .collision(body)
                .unwrap()
                .parent_model(),
            None
        );
        assert_eq!(engine.elements().relations().edge_count(), 1);

        engine.shutdown();
        assert!(engine.elements().registry().is_empty());
    }

    #[test]
    fn shutdown_empties_every_subsystem() {
        let mut engine = engine("shutdown");
        let scene = engine.elements_mut().create_scene();
        engine.set_active_scene(scene).unwrap();
        let model = engine.create_model(None).unwrap();
        engine.create_collision(CollisionShape::Box, Vec3::new(1.0, 1.0, 1.0), 0.0);

        engine.shutdown();
        assert_eq!(engine.elements().registry().len(), 0);
        assert_eq!(engine.render().active_scene(), None);
        assert_eq!(engine.physics().collision_count(), 0);
        assert!(!engine.tree().contains(model));
        assert!(!engine.elements().is_valid(scene));
    }
}
