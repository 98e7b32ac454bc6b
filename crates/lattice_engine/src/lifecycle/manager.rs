//! Element manager
//!
//! Factory and destruction front door for every element kind. Creation
//! resolves script-supplied paths against the working directory, loads
//! the backing asset, and registers the element only after the load
//! succeeds; a failed load leaves no trace in the registry. Destruction
//! validates the handle, runs the per-kind cascade across the relation
//! graph and the collaborating subsystems in a fixed order, then drops
//! the element. Once a handle validates, destruction always completes.

use crate::assets::{self, AssetError, GeometryData};
use crate::elements::{
    Animation, Camera, Collision, CollisionShape, Element, ElementHandle, ElementKind, FileStream,
    Filtering, Font, Geometry, Light, Model, Movie, Projection, RenderTarget, RenderTargetKind,
    Scene, Shader, Sound, Texture, TextureKind,
};
use crate::foundation::math::Vec3;
use crate::foundation::paths;
use crate::lifecycle::registry::ElementRegistry;
use crate::lifecycle::relations::{RelationError, RelationGraph};
use crate::physics::PhysicsWorld;
use crate::prerender::TransformTree;
use crate::render::RenderState;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why an element factory refused to produce an element.
#[derive(Debug, Error)]
pub enum ElementError {
    /// Handle is stale or points at an element of the wrong kind.
    #[error("element handle is stale or of the wrong kind")]
    InvalidHandle,
    /// A size argument was zero where a real extent is required.
    #[error("dimensions must be nonzero")]
    InvalidDimensions,
    /// Loading or probing the backing asset failed.
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Factories, destruction cascade, and the relation operations, bound
/// to one registry and one relation graph.
///
/// Collaborator subsystems are passed in per call rather than owned
/// here, so the engine keeps a single place where everything is wired
/// together.
pub struct ElementManager {
    elements: ElementRegistry,
    relations: RelationGraph,
    working_dir: PathBuf,
}

impl ElementManager {
    /// Create a manager rooted at `working_dir`.
    ///
    /// All script-supplied paths resolve under this directory and cannot
    /// climb out of it.
    #[must_use]
    pub fn new(working_dir: PathBuf) -> Self {
        Self {
            elements: ElementRegistry::new(),
            relations: RelationGraph::new(),
            working_dir,
        }
    }

    /// Directory all element paths resolve under.
    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Borrow the element registry for lookups and element state access.
    #[must_use]
    pub fn registry(&self) -> &ElementRegistry {
        &self.elements
    }

    /// Mutably borrow the registry.
    ///
    /// Only element state is reachable this way; registration and
    /// removal stay behind the factories and [`Self::destroy_element`].
    pub fn registry_mut(&mut self) -> &mut ElementRegistry {
        &mut self.elements
    }

    /// Borrow the relation graph for edge queries.
    #[must_use]
    pub fn relations(&self) -> &RelationGraph {
        &self.relations
    }

    /// Whether `handle` refers to a live element.
    #[must_use]
    pub fn is_valid(&self, handle: ElementHandle) -> bool {
        self.elements.is_valid(handle)
    }

    fn resolved(&self, user_path: &str) -> PathBuf {
        paths::resolve(&self.working_dir, user_path)
    }

    // --- factories ---

    /// Create an empty scene.
    pub fn create_scene(&mut self) -> ElementHandle {
        self.elements.register(Element::Scene(Scene::new()))
    }

    /// Create a camera with the given projection.
    pub fn create_camera(&mut self, projection: Projection) -> ElementHandle {
        self.elements
            .register(Element::Camera(Camera::new(projection)))
    }

    /// Create a light with default direction and color.
    pub fn create_light(&mut self) -> ElementHandle {
        self.elements.register(Element::Light(Light::new()))
    }

    /// Load an animation clip from `path`.
    pub fn create_animation(&mut self, path: &str) -> Result<ElementHandle, ElementError> {
        let data = assets::load_animation(&self.resolved(path))?;
        Ok(self
            .elements
            .register(Element::Animation(Animation::from_data(&data))))
    }

    /// Load a mesh from `path` synchronously.
    ///
    /// The background path is [`crate::engine::Engine::create_geometry_async`];
    /// either way a geometry element only ever enters the registry fully
    /// loaded.
    pub fn create_geometry(&mut self, path: &str) -> Result<ElementHandle, ElementError> {
        let data = assets::load_geometry(&self.resolved(path))?;
        Ok(self.register_geometry(&data))
    }

    /// Register an already loaded mesh. Completion half of the async
    /// geometry path.
    pub(crate) fn register_geometry(&mut self, data: &GeometryData) -> ElementHandle {
        self.elements
            .register(Element::Geometry(Geometry::from_data(data)))
    }

    /// Create a model, optionally instanced over `geometry`.
    ///
    /// A given geometry handle must be live; the new model copies its
    /// skeleton and bounds and depends on it through a relation edge.
    /// The model also joins the transform tree and the physics world.
    pub fn create_model(
        &mut self,
        tree: &mut TransformTree,
        physics: &mut PhysicsWorld,
        geometry: Option<ElementHandle>,
    ) -> Result<ElementHandle, ElementError> {
        let model = match geometry {
            Some(geometry_handle) => {
                let geometry_ref = self
                    .elements
                    .geometry(geometry_handle)
                    .ok_or(ElementError::InvalidHandle)?;
                Model::new(Some((geometry_handle, geometry_ref)))
            }
            None => Model::new(None),
        };
        let handle = self.elements.register(Element::Model(model));
        if let Some(geometry_handle) = geometry {
            self.relations.link(handle, geometry_handle);
        }
        tree.track(handle);
        physics.add_model(handle);
        Ok(handle)
    }

    /// Load a shader program and scan its sampler table.
    pub fn create_shader(
        &mut self,
        vertex: &str,
        fragment: &str,
        geometry: Option<&str>,
    ) -> Result<ElementHandle, ElementError> {
        let vertex_path = self.resolved(vertex);
        let fragment_path = self.resolved(fragment);
        let geometry_path = geometry.map(|path| self.resolved(path));
        let sources =
            assets::load_shader_program(&vertex_path, &fragment_path, geometry_path.as_deref())
                .map_err(|err| {
                    log::warn!(
                        "shader load [{vertex},{fragment},{}] failed: {err}",
                        geometry.unwrap_or("")
                    );
                    err
                })?;
        Ok(self.elements.register(Element::Shader(Shader::new(
            sources.samplers,
            sources.has_geometry_stage,
        ))))
    }

    /// Probe an audio file at `path` and create a sound element.
    pub fn create_sound(&mut self, path: &str, looped: bool) -> Result<ElementHandle, ElementError> {
        let info = assets::probe_sound(&self.resolved(path))?;
        Ok(self
            .elements
            .register(Element::Sound(Sound::from_info(&info, looped))))
    }

    /// Create an offscreen render target.
    pub fn create_render_target(
        &mut self,
        kind: RenderTargetKind,
        size: (u32, u32),
        filtering: Filtering,
    ) -> Result<ElementHandle, ElementError> {
        if size.0 == 0 || size.1 == 0 {
            return Err(ElementError::InvalidDimensions);
        }
        Ok(self.elements.register(Element::RenderTarget(
            RenderTarget::new(kind, size.0, size.1, filtering),
        )))
    }

    /// Decode an image at `path` into a flat texture.
    ///
    /// Whether the texture carries alpha comes from the decoded pixels,
    /// not from the caller.
    pub fn create_texture(
        &mut self,
        path: &str,
        filtering: Filtering,
    ) -> Result<ElementHandle, ElementError> {
        let data = assets::load_texture(&self.resolved(path))?;
        let kind = if data.has_alpha {
            TextureKind::Rgba
        } else {
            TextureKind::Rgb
        };
        Ok(self.elements.register(Element::Texture(Texture::flat(
            kind,
            data.width,
            data.height,
            filtering,
        ))))
    }

    /// Decode six face images into a cubemap texture.
    pub fn create_cubemap(
        &mut self,
        faces: &[&str; 6],
        filtering: Filtering,
    ) -> Result<ElementHandle, ElementError> {
        let resolved = faces.map(|face| self.resolved(face));
        let data = assets::load_cubemap(&[
            &resolved[0],
            &resolved[1],
            &resolved[2],
            &resolved[3],
            &resolved[4],
            &resolved[5],
        ])?;
        Ok(self.elements.register(Element::Texture(Texture::cubemap(
            data.width,
            data.height,
            filtering,
        ))))
    }

    /// Probe a font face at `path` and create a font element.
    pub fn create_font(
        &mut self,
        path: &str,
        point_size: u32,
        atlas: (u32, u32),
        filtering: Filtering,
    ) -> Result<ElementHandle, ElementError> {
        if point_size == 0 || atlas.0 == 0 || atlas.1 == 0 {
            return Err(ElementError::InvalidDimensions);
        }
        assets::probe_font(&self.resolved(path))?;
        Ok(self
            .elements
            .register(Element::Font(Font::new(point_size, atlas, filtering))))
    }

    /// Create (or truncate) a file under the working directory.
    pub fn create_file(&mut self, path: &str) -> Result<ElementHandle, ElementError> {
        let relative = paths::sanitize(path);
        let absolute = self.working_dir.join(&relative);
        let file = FileStream::create(&absolute, relative).map_err(AssetError::Io)?;
        Ok(self.elements.register(Element::File(file)))
    }

    /// Open an existing file under the working directory.
    pub fn open_file(&mut self, path: &str, read_only: bool) -> Result<ElementHandle, ElementError> {
        let relative = paths::sanitize(path);
        let absolute = self.working_dir.join(&relative);
        let file = FileStream::open(&absolute, relative, read_only).map_err(AssetError::Io)?;
        Ok(self.elements.register(Element::File(file)))
    }

    /// Create a collision body and register it with the physics world.
    ///
    /// Negative mass clamps to zero, which makes the body static.
    pub fn create_collision(
        &mut self,
        physics: &mut PhysicsWorld,
        shape: CollisionShape,
        size: Vec3,
        mass: f32,
    ) -> ElementHandle {
        let handle = self
            .elements
            .register(Element::Collision(Collision::new(shape, size, mass.max(0.0))));
        physics.add_collision(handle);
        handle
    }

    /// Probe a video container at `path` and create a movie element.
    ///
    /// The movie joins the render state's update list on success.
    pub fn create_movie(
        &mut self,
        render: &mut RenderState,
        path: &str,
    ) -> Result<ElementHandle, ElementError> {
        let info = assets::probe_movie(&self.resolved(path))?;
        let handle = self
            .elements
            .register(Element::Movie(Movie::from_info(&info)));
        render.add_movie(handle);
        Ok(handle)
    }

    // --- destruction ---

    /// Destroy the element behind `handle`.
    ///
    /// Returns false for stale handles without touching anything. For a
    /// live element the per-kind cascade detaches it from the relation
    /// graph, render state, physics world, and transform tree before the
    /// element itself is dropped, in that order, so no subsystem keeps a
    /// reference past this call.
    pub fn destroy_element(
        &mut self,
        render: &mut RenderState,
        physics: &mut PhysicsWorld,
        tree: &mut TransformTree,
        handle: ElementHandle,
    ) -> bool {
        let Some(kind) = self.elements.kind_of(handle) else {
            return false;
        };
        match kind {
            ElementKind::Scene => {
                render.retire_scene(handle);
                self.relations.unlink_all_children(&mut self.elements, handle);
            }
            ElementKind::Camera | ElementKind::Light | ElementKind::Texture => {
                self.relations.unlink_all_parents(&mut self.elements, handle);
            }
            ElementKind::RenderTarget => {
                render.retire_target(handle);
                self.relations.unlink_all_parents(&mut self.elements, handle);
            }
            ElementKind::Animation | ElementKind::Geometry => {
                self.relations.unlink_all_children(&mut self.elements, handle);
            }
            ElementKind::Model => {
                // Children first: the collision unlink must see the
                // model while it is still in the registry.
                self.relations.unlink_all_children(&mut self.elements, handle);
                self.relations.unlink_all_parents(&mut self.elements, handle);
                tree.untrack(handle);
                physics.remove_model(handle);
            }
            ElementKind::Shader => {
                render.retire_shader(handle);
                self.relations.unlink_all_children(&mut self.elements, handle);
            }
            ElementKind::Collision => {
                physics.remove_collision(handle);
                self.relations.unlink_all_parents(&mut self.elements, handle);
            }
            ElementKind::Movie => {
                render.remove_movie(handle);
                self.relations.unlink_all_parents(&mut self.elements, handle);
            }
            ElementKind::Sound | ElementKind::File | ElementKind::Font => {
                self.relations.unlink_all_parents(&mut self.elements, handle);
            }
        }
        self.elements.unregister(handle);
        log::debug!("destroyed {kind} {handle:?}");
        true
    }

    /// Drop every element and edge without running cascades.
    ///
    /// Shutdown only; the engine clears subsystem state first so nothing
    /// can observe the skipped break processing. Returns the element
    /// count dropped.
    pub(crate) fn destroy_all(&mut self) -> usize {
        self.relations.clear();
        self.elements.clear()
    }

    // --- relation operations, bound to this manager's registry ---

    /// Bind an animation clip to a skinned model.
    /// See [`RelationGraph::set_model_animation`].
    pub fn set_model_animation(
        &mut self,
        model: ElementHandle,
        animation: ElementHandle,
    ) -> Result<(), RelationError> {
        self.relations
            .set_model_animation(&mut self.elements, model, animation)
    }

    /// Unbind the model's animation clip. False when none was bound.
    pub fn remove_model_animation(&mut self, model: ElementHandle) -> Result<bool, RelationError> {
        self.relations
            .remove_model_animation(&mut self.elements, model)
    }

    /// Hang a model under another model, optionally following a bone.
    /// See [`RelationGraph::attach_model_to_model`].
    pub fn attach_model_to_model(
        &mut self,
        tree: &mut TransformTree,
        model: ElementHandle,
        parent: ElementHandle,
        bone: i32,
    ) -> Result<(), RelationError> {
        self.relations
            .attach_model_to_model(&mut self.elements, tree, model, parent, bone)
    }

    /// Detach a model from its transform parent. False when it had none.
    pub fn detach_model(
        &mut self,
        tree: &mut TransformTree,
        model: ElementHandle,
    ) -> Result<bool, RelationError> {
        self.relations.detach_model(&mut self.elements, tree, model)
    }

    /// Let a collision body take over a model's transform.
    /// See [`RelationGraph::attach_collision_to_model`].
    pub fn attach_collision_to_model(
        &mut self,
        collision: ElementHandle,
        model: ElementHandle,
    ) -> Result<(), RelationError> {
        self.relations
            .attach_collision_to_model(&mut self.elements, collision, model)
    }

    /// Detach a collision body from the model it drives.
    pub fn detach_collision(&mut self, collision: ElementHandle) -> Result<bool, RelationError> {
        self.relations.detach_collision(&mut self.elements, collision)
    }

    /// Bind a camera to a scene's camera slot.
    pub fn set_scene_camera(
        &mut self,
        scene: ElementHandle,
        camera: ElementHandle,
    ) -> Result<(), RelationError> {
        self.relations
            .set_scene_camera(&mut self.elements, scene, camera)
    }

    /// Clear a scene's camera slot. False when it was empty.
    pub fn remove_scene_camera(&mut self, scene: ElementHandle) -> Result<bool, RelationError> {
        self.relations.remove_scene_camera(&mut self.elements, scene)
    }

    /// Bind a light to a scene's light slot.
    pub fn set_scene_light(
        &mut self,
        scene: ElementHandle,
        light: ElementHandle,
    ) -> Result<(), RelationError> {
        self.relations
            .set_scene_light(&mut self.elements, scene, light)
    }

    /// Clear a scene's light slot. False when it was empty.
    pub fn remove_scene_light(&mut self, scene: ElementHandle) -> Result<bool, RelationError> {
        self.relations.remove_scene_light(&mut self.elements, scene)
    }

    /// Bind a drawable to a shader sampler uniform. Returns the texture
    /// unit taken. See [`RelationGraph::attach_drawable_to_shader`].
    pub fn attach_drawable_to_shader(
        &mut self,
        shader: ElementHandle,
        drawable: ElementHandle,
        uniform: &str,
    ) -> Result<u32, RelationError> {
        self.relations
            .attach_drawable_to_shader(&mut self.elements, shader, drawable, uniform)
    }

    /// Unbind a drawable from a shader. False when it was not bound.
    pub fn detach_drawable_from_shader(
        &mut self,
        shader: ElementHandle,
        drawable: ElementHandle,
    ) -> Result<bool, RelationError> {
        self.relations
            .detach_drawable_from_shader(&mut self.elements, shader, drawable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{encode_lga, encode_lgm, AnimationData, BoneData, Vertex};
    use crate::config::PhysicsConfig;
    use crate::elements::PlayState;

    struct Harness {
        manager: ElementManager,
        render: RenderState,
        physics: PhysicsWorld,
        tree: TransformTree,
    }

    impl Harness {
        fn new(tag: &str) -> Self {
            let dir = std::env::temp_dir()
                .join(format!("lattice-manager-{}-{tag}", std::process::id()));
            std::fs::create_dir_all(&dir).unwrap();
            Self {
                manager: ElementManager::new(dir),
                render: RenderState::new(),
                physics: PhysicsWorld::new(&PhysicsConfig::default()),
                tree: TransformTree::new(),
            }
        }

        fn write_fixture(&self, name: &str, bytes: &[u8]) {
            std::fs::write(self.manager.working_dir().join(name), bytes).unwrap();
        }

        fn destroy(&mut self, handle: ElementHandle) -> bool {
            self.manager
                .destroy_element(&mut self.render, &mut self.physics, &mut self.tree, handle)
        }
    }

    fn skinned_mesh(bones: u32) -> GeometryData {
        GeometryData {
            vertices: vec![Vertex {
                position: [0.0, 1.0, 0.0],
                normal: [0.0, 1.0, 0.0],
                uv: [0.5, 0.5],
            }],
            indices: Vec::new(),
            bones: (0..bones)
                .map(|i| BoneData {
                    name: format!("bone{i}"),
                    parent: if i == 0 { -1 } else { 0 },
                })
                .collect(),
            bound_radius: 1.0,
        }
    }

    fn clip(bones: u32) -> AnimationData {
        AnimationData {
            bone_count: bones,
            frame_count: 24,
            fps: 24.0,
        }
    }

    #[test]
    fn infallible_factories_register() {
        let mut h = Harness::new("infallible");
        let scene = h.manager.create_scene();
        let camera = h.manager.create_camera(Projection::Perspective);
        let light = h.manager.create_light();
        assert_eq!(h.manager.registry().kind_of(scene), Some(ElementKind::Scene));
        assert_eq!(
            h.manager.registry().kind_of(camera),
            Some(ElementKind::Camera)
        );
        assert_eq!(h.manager.registry().kind_of(light), Some(ElementKind::Light));
    }

    #[test]
    fn failed_load_registers_nothing() {
        let mut h = Harness::new("failed-load");
        let before = h.manager.registry().len();
        assert!(matches!(
            h.manager.create_animation("missing.lga"),
            Err(ElementError::Asset(AssetError::NotFound(_)))
        ));
        assert_eq!(h.manager.registry().len(), before);
    }

    #[test]
    fn model_factory_links_geometry() {
        let mut h = Harness::new("model-geometry");
        h.write_fixture("rig.lgm", &encode_lgm(&skinned_mesh(3)));
        let geometry = h.manager.create_geometry("rig.lgm").unwrap();
        let model = h
            .manager
            .create_model(&mut h.tree, &mut h.physics, Some(geometry))
            .unwrap();

        assert!(h.manager.relations().has_edge(model, geometry));
        assert_eq!(h.manager.registry().model(model).unwrap().bone_count(), 3);
        assert!(h.tree.contains(model));
        assert!(h.physics.tracks_model(model));
    }

    #[test]
    fn model_factory_rejects_bad_geometry_handles() {
        let mut h = Harness::new("model-bad-geometry");
        let camera = h.manager.create_camera(Projection::Perspective);
        assert!(matches!(
            h.manager
                .create_model(&mut h.tree, &mut h.physics, Some(camera)),
            Err(ElementError::InvalidHandle)
        ));
        assert!(h.tree.is_empty());
    }

    #[test]
    fn destroy_refuses_stale_handles() {
        let mut h = Harness::new("stale-destroy");
        let light = h.manager.create_light();
        assert!(h.destroy(light));
        assert!(!h.destroy(light));
        assert!(!h.manager.is_valid(light));
    }

    #[test]
    fn model_destroy_runs_the_full_cascade() {
        let mut h = Harness::new("model-cascade");
        h.write_fixture("actor.lgm", &encode_lgm(&skinned_mesh(4)));
        h.write_fixture("walk.lga", &encode_lga(&clip(4)));
        let geometry = h.manager.create_geometry("actor.lgm").unwrap();
        let animation = h.manager.create_animation("walk.lga").unwrap();
        let model = h
            .manager
            .create_model(&mut h.tree, &mut h.physics, Some(geometry))
            .unwrap();
        h.manager.set_model_animation(model, animation).unwrap();
        let body = h.manager.create_collision(
            &mut h.physics,
            CollisionShape::Sphere,
            Vec3::new(0.5, 0.5, 0.5),
            1.0,
        );
        h.manager.attach_collision_to_model(body, model).unwrap();
        assert_eq!(h.manager.relations().edge_count(), 3);

        assert!(h.destroy(model));
        assert!(!h.manager.is_valid(model));
        assert_eq!(h.manager.relations().edge_count(), 0);
        assert!(!h.tree.contains(model));
        assert!(!h.physics.tracks_model(model));
        // The body survives with its owner reference cleared.
        assert!(h.physics.tracks_collision(body));
        assert_eq!(
            h.manager.registry().collision(body).unwrap().parent_model(),
            None
        );
    }

    #[test]
    fn geometry_destroy_unlinks_dependent_models() {
        let mut h = Harness::new("geometry-destroy");
        h.write_fixture("shared.lgm", &encode_lgm(&skinned_mesh(2)));
        let geometry = h.manager.create_geometry("shared.lgm").unwrap();
        let model = h
            .manager
            .create_model(&mut h.tree, &mut h.physics, Some(geometry))
            .unwrap();

        assert!(h.destroy(geometry));
        let model_ref = h.manager.registry().model(model).unwrap();
        assert_eq!(model_ref.geometry(), None);
        assert!(!model_ref.has_skeleton());
        assert_eq!(h.manager.relations().edge_count(), 0);
    }

    #[test]
    fn scene_destroy_breaks_camera_and_light_edges() {
        let mut h = Harness::new("scene-destroy");
        let scene = h.manager.create_scene();
        let camera = h.manager.create_camera(Projection::Perspective);
        let light = h.manager.create_light();
        h.manager.set_scene_camera(scene, camera).unwrap();
        h.manager.set_scene_light(scene, light).unwrap();
        h.render.set_active_scene(Some(scene));

        assert!(h.destroy(scene));
        assert!(h.manager.is_valid(camera));
        assert!(h.manager.is_valid(light));
        assert_eq!(h.manager.relations().edge_count(), 0);
        assert_eq!(h.render.active_scene(), None);
    }

    #[test]
    fn texture_destroy_detaches_from_shader() {
        let mut h = Harness::new("texture-shader");
        h.write_fixture("flat.vert", b"void main() {}\n");
        h.write_fixture(
            "flat.frag",
            b"uniform sampler2D gColorMap;\nvoid main() {}\n",
        );
        let shader = h
            .manager
            .create_shader("flat.vert", "flat.frag", None)
            .unwrap();
        // Registered directly; the image decode path has its own tests.
        let texture = h.manager.elements.register(Element::Texture(Texture::flat(
            TextureKind::Rgb,
            4,
            4,
            Filtering::Nearest,
        )));
        let unit = h
            .manager
            .attach_drawable_to_shader(shader, texture, "gColorMap")
            .unwrap();
        assert_eq!(unit, 1);

        assert!(h.destroy(texture));
        assert!(!h
            .manager
            .registry()
            .shader(shader)
            .unwrap()
            .has_attached(texture));
        assert_eq!(h.manager.relations().edge_count(), 0);
    }

    #[test]
    fn shader_destroy_releases_its_drawables() {
        let mut h = Harness::new("shader-destroy");
        h.write_fixture("post.vert", b"void main() {}\n");
        h.write_fixture(
            "post.frag",
            b"uniform sampler2D gColorMap;\nuniform sampler2D gDepthMap;\nvoid main() {}\n",
        );
        let shader = h
            .manager
            .create_shader("post.vert", "post.frag", None)
            .unwrap();
        let texture = h.manager.elements.register(Element::Texture(Texture::flat(
            TextureKind::Rgb,
            4,
            4,
            Filtering::Nearest,
        )));
        let target = h
            .manager
            .create_render_target(RenderTargetKind::Rgba, (64, 64), Filtering::Linear)
            .unwrap();
        h.manager
            .attach_drawable_to_shader(shader, texture, "gColorMap")
            .unwrap();
        h.manager
            .attach_drawable_to_shader(shader, target, "gDepthMap")
            .unwrap();
        h.render.set_active_shader(Some(shader));

        assert!(h.destroy(shader));
        assert!(h.manager.is_valid(texture));
        assert!(h.manager.is_valid(target));
        assert_eq!(h.manager.relations().edge_count(), 0);
        assert_eq!(h.render.active_shader(), None);
    }

    #[test]
    fn movie_destroy_leaves_the_render_list() {
        let mut h = Harness::new("movie-destroy");
        h.write_fixture("intro.avi", b"RIFF\x10\x00\x00\x00AVI LIST");
        let movie = h.manager.create_movie(&mut h.render, "intro.avi").unwrap();
        assert_eq!(h.render.movies(), &[movie]);

        h.manager.registry_mut().movie_mut(movie).unwrap().play();
        assert_eq!(
            h.manager.registry().movie(movie).unwrap().play_state(),
            PlayState::Playing
        );

        assert!(h.destroy(movie));
        assert!(h.render.movies().is_empty());
        assert!(h.manager.registry().movie(movie).is_none());
    }

    #[test]
    fn render_target_requires_real_dimensions() {
        let mut h = Harness::new("target-dims");
        assert!(matches!(
            h.manager
                .create_render_target(RenderTargetKind::Rgba, (0, 256), Filtering::Linear),
            Err(ElementError::InvalidDimensions)
        ));
        let target = h
            .manager
            .create_render_target(RenderTargetKind::Shadow, (512, 512), Filtering::Nearest)
            .unwrap();
        assert!(h.manager.is_valid(target));
    }

    #[test]
    fn file_factory_stays_inside_the_working_dir() {
        let mut h = Harness::new("file-sandbox");
        let file = h.manager.create_file("../escape.txt").unwrap();
        let stored = h
            .manager
            .registry()
            .file(file)
            .unwrap()
            .path()
            .to_path_buf();
        assert_eq!(stored, PathBuf::from("escape.txt"));
        assert!(h.manager.working_dir().join("escape.txt").exists());
        std::fs::remove_file(h.manager.working_dir().join("escape.txt")).unwrap();
    }

    #[test]
    fn destroy_all_empties_registry_and_graph() {
        let mut h = Harness::new("destroy-all");
        let scene = h.manager.create_scene();
        let camera = h.manager.create_camera(Projection::Orthographic);
        h.manager.set_scene_camera(scene, camera).unwrap();

        assert_eq!(h.manager.destroy_all(), 2);
        assert!(h.manager.registry().is_empty());
        assert_eq!(h.manager.relations().edge_count(), 0);
    }
}
