//! Relation graph
//!
//! Elements form a sparse dependency graph: a model depends on its
//! geometry, a camera belongs to a scene, a texture feeds a shader
//! sampler. The graph stores every such pair as a child-to-parent edge
//! and, whenever an edge is removed, runs the break action for that
//! kind pair so neither endpoint keeps a stale back reference. Element
//! destruction leans entirely on this: drop all edges touching the
//! element and every cross reference to it is gone.
//!
//! Edges only come into existence through the typed operations below,
//! which validate handles and preconditions before wiring anything up.

use crate::elements::model::NO_BONE;
use crate::elements::shader::AttachError;
use crate::elements::{ElementHandle, ElementKind, Model};
use crate::lifecycle::registry::ElementRegistry;
use crate::prerender::TransformTree;
use std::collections::HashMap;
use thiserror::Error;

/// Why a relation operation was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelationError {
    /// Handle is stale or points at an element of the wrong kind.
    #[error("element handle is stale or of the wrong kind")]
    InvalidHandle,
    /// An edge between these kinds has no break action. The edge is
    /// still removed; the missing table entry is an engine bug.
    #[error("no break action is defined for {child} under {parent}")]
    UnhandledBreak {
        /// Kind of the child endpoint
        child: ElementKind,
        /// Kind of the parent endpoint
        parent: ElementKind,
    },
    /// Model transforms are owned by its collision body.
    #[error("model is driven by a collision body")]
    PhysicsDriven,
    /// A model cannot parent itself.
    #[error("cannot attach a model to itself")]
    SelfParent,
    /// The model already hangs under some parent.
    #[error("model already has a transform parent")]
    AlreadyParented,
    /// The requested parent is a descendant of the model.
    #[error("attachment would close a cycle in the transform tree")]
    WouldCycle,
    /// The collision body already drives some model.
    #[error("collision body already drives a model")]
    CollisionOwned,
    /// The model already has a collision body attached.
    #[error("model already has a collision body")]
    CollisionSlotTaken,
    /// Animations only bind to models with a skeleton.
    #[error("model has no skeleton")]
    NoSkeleton,
    /// Clip and skeleton disagree about the bone count.
    #[error("bone counts differ: model has {model}, animation has {animation}")]
    BoneCountMismatch {
        /// Bones in the model skeleton
        model: u32,
        /// Bones posed by the animation clip
        animation: u32,
    },
    /// Only textures, render targets, and movies can feed samplers.
    #[error("element cannot be bound to a shader sampler")]
    NotDrawable,
    /// The shader refused the bind.
    #[error(transparent)]
    Shader(#[from] AttachError),
}

/// Child-to-parent dependency edges between live elements.
#[derive(Debug, Default)]
pub struct RelationGraph {
    parents: HashMap<ElementHandle, Vec<ElementHandle>>,
    edge_count: usize,
}

impl RelationGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether the exact `child` under `parent` edge exists.
    #[must_use]
    pub fn has_edge(&self, child: ElementHandle, parent: ElementHandle) -> bool {
        self.parents
            .get(&child)
            .is_some_and(|list| list.contains(&parent))
    }

    /// Parents of `child`, in link order.
    #[must_use]
    pub fn parents_of(&self, child: ElementHandle) -> &[ElementHandle] {
        self.parents.get(&child).map_or(&[], Vec::as_slice)
    }

    /// Children depending on `parent`. Linear scan, diagnostics only.
    #[must_use]
    pub fn children_of(&self, parent: ElementHandle) -> Vec<ElementHandle> {
        let mut children: Vec<ElementHandle> = self
            .parents
            .iter()
            .filter(|(_, list)| list.contains(&parent))
            .map(|(&child, _)| child)
            .collect();
        children.sort_unstable();
        children
    }

    /// Record `child` under `parent`. Self edges and duplicates are
    /// dropped with a warning; both indicate a caller bug upstream.
    pub(crate) fn link(&mut self, child: ElementHandle, parent: ElementHandle) {
        if child == parent {
            log::warn!("ignoring self edge for {child:?}");
            return;
        }
        let list = self.parents.entry(child).or_default();
        if list.contains(&parent) {
            log::warn!("ignoring duplicate edge {child:?} under {parent:?}");
            return;
        }
        list.push(parent);
        self.edge_count += 1;
    }

    /// Remove the `child` under `parent` edge and run its break action.
    ///
    /// Missing edges are a no-op. An unhandled kind pair still removes
    /// the edge but reports [`RelationError::UnhandledBreak`].
    pub(crate) fn unlink(
        &mut self,
        elements: &mut ElementRegistry,
        child: ElementHandle,
        parent: ElementHandle,
    ) -> Result<(), RelationError> {
        let Some(list) = self.parents.get_mut(&child) else {
            return Ok(());
        };
        let Some(index) = list.iter().position(|&p| p == parent) else {
            return Ok(());
        };
        list.remove(index);
        if list.is_empty() {
            self.parents.remove(&child);
        }
        self.edge_count -= 1;
        process_break(elements, child, parent)
    }

    /// Remove every edge where `child` is the child. Returns the edge
    /// count removed. Break failures are logged, not propagated, so a
    /// destruction cascade always finishes.
    pub(crate) fn unlink_all_parents(
        &mut self,
        elements: &mut ElementRegistry,
        child: ElementHandle,
    ) -> usize {
        let Some(list) = self.parents.remove(&child) else {
            return 0;
        };
        self.edge_count -= list.len();
        let count = list.len();
        for parent in list {
            if let Err(err) = process_break(elements, child, parent) {
                log::error!("break failed while unlinking parents of {child:?}: {err}");
            }
        }
        count
    }

    /// Remove every edge where `parent` is the parent. Same contract as
    /// [`RelationGraph::unlink_all_parents`].
    pub(crate) fn unlink_all_children(
        &mut self,
        elements: &mut ElementRegistry,
        parent: ElementHandle,
    ) -> usize {
        let victims: Vec<ElementHandle> = self
            .parents
            .iter()
            .filter(|(_, list)| list.contains(&parent))
            .map(|(&child, _)| child)
            .collect();
        for &child in &victims {
            if let Some(list) = self.parents.get_mut(&child) {
                if let Some(index) = list.iter().position(|&p| p == parent) {
                    list.remove(index);
                    self.edge_count -= 1;
                }
                if list.is_empty() {
                    self.parents.remove(&child);
                }
            }
            if let Err(err) = process_break(elements, child, parent) {
                log::error!("break failed while unlinking children of {parent:?}: {err}");
            }
        }
        victims.len()
    }

    /// Drop all edges without running break actions. Shutdown path only.
    pub(crate) fn clear(&mut self) {
        self.parents.clear();
        self.edge_count = 0;
    }

    // --- typed operations ---

    /// Bind an animation clip to a skinned model.
    ///
    /// Rebinding the currently bound clip is a successful no-op. Binding
    /// a different clip replaces the old edge before adding the new one.
    pub fn set_model_animation(
        &mut self,
        elements: &mut ElementRegistry,
        model: ElementHandle,
        animation: ElementHandle,
    ) -> Result<(), RelationError> {
        let model_ref = elements.model(model).ok_or(RelationError::InvalidHandle)?;
        if !model_ref.has_skeleton() {
            return Err(RelationError::NoSkeleton);
        }
        let current = model_ref.animation();
        if current == Some(animation) {
            return Ok(());
        }
        let model_bones = model_ref.bone_count();
        let clip_bones = elements
            .animation(animation)
            .ok_or(RelationError::InvalidHandle)?
            .bone_count();
        if model_bones != clip_bones {
            return Err(RelationError::BoneCountMismatch {
                model: model_bones,
                animation: clip_bones,
            });
        }
        if let Some(old) = current {
            self.unlink(elements, model, old)?;
        }
        self.link(model, animation);
        if let Some(model_ref) = elements.model_mut(model) {
            model_ref.set_animation(Some(animation));
        }
        Ok(())
    }

    /// Unbind the model's animation clip. False when none was bound.
    pub fn remove_model_animation(
        &mut self,
        elements: &mut ElementRegistry,
        model: ElementHandle,
    ) -> Result<bool, RelationError> {
        let model_ref = elements.model(model).ok_or(RelationError::InvalidHandle)?;
        let Some(animation) = model_ref.animation() else {
            return Ok(false);
        };
        self.unlink(elements, model, animation)?;
        Ok(true)
    }

    /// Hang a model under another model, optionally following a bone.
    ///
    /// The child must be free: not driven by a collision body, not
    /// already parented, and not an ancestor of the requested parent.
    /// Bone indexes outside the parent skeleton clamp to [`NO_BONE`].
    pub fn attach_model_to_model(
        &mut self,
        elements: &mut ElementRegistry,
        tree: &mut TransformTree,
        model: ElementHandle,
        parent: ElementHandle,
        bone: i32,
    ) -> Result<(), RelationError> {
        if model == parent {
            return Err(RelationError::SelfParent);
        }
        let model_ref = elements.model(model).ok_or(RelationError::InvalidHandle)?;
        if model_ref.has_collision() {
            return Err(RelationError::PhysicsDriven);
        }
        if model_ref.parent().is_some() {
            return Err(RelationError::AlreadyParented);
        }
        let parent_ref = elements.model(parent).ok_or(RelationError::InvalidHandle)?;
        let parent_bones = parent_ref.bone_count();

        // Walk up from the requested parent; finding the child there
        // means the attachment would close a loop.
        let mut cursor = parent_ref.parent();
        while let Some(ancestor) = cursor {
            if ancestor == model {
                return Err(RelationError::WouldCycle);
            }
            cursor = elements.model(ancestor).and_then(Model::parent);
        }

        let bone = if bone >= 0 && (bone as u32) < parent_bones {
            bone
        } else {
            NO_BONE
        };
        self.link(model, parent);
        tree.attach(model, parent);
        if let Some(model_ref) = elements.model_mut(model) {
            model_ref.set_parent(Some(parent), bone);
        }
        Ok(())
    }

    /// Detach a model from its parent. False when it had none.
    pub fn detach_model(
        &mut self,
        elements: &mut ElementRegistry,
        tree: &mut TransformTree,
        model: ElementHandle,
    ) -> Result<bool, RelationError> {
        let model_ref = elements.model(model).ok_or(RelationError::InvalidHandle)?;
        let Some(parent) = model_ref.parent() else {
            return Ok(false);
        };
        self.unlink(elements, model, parent)?;
        tree.detach(model);
        Ok(true)
    }

    /// Let a collision body take over a model's transform.
    ///
    /// Both sides must be free: the body must not drive another model,
    /// and the model must have neither a body nor a transform parent.
    pub fn attach_collision_to_model(
        &mut self,
        elements: &mut ElementRegistry,
        collision: ElementHandle,
        model: ElementHandle,
    ) -> Result<(), RelationError> {
        let collision_ref = elements
            .collision(collision)
            .ok_or(RelationError::InvalidHandle)?;
        if collision_ref.parent_model().is_some() {
            return Err(RelationError::CollisionOwned);
        }
        let model_ref = elements.model(model).ok_or(RelationError::InvalidHandle)?;
        if model_ref.has_collision() {
            return Err(RelationError::CollisionSlotTaken);
        }
        if model_ref.parent().is_some() {
            return Err(RelationError::AlreadyParented);
        }
        self.link(collision, model);
        if let Some(collision_ref) = elements.collision_mut(collision) {
            collision_ref.set_parent_model(Some(model));
        }
        if let Some(model_ref) = elements.model_mut(model) {
            model_ref.set_collision(Some(collision));
        }
        Ok(())
    }

    /// Detach a collision body from the model it drives. False when it
    /// drives none. Clears both sides of the pairing.
    pub fn detach_collision(
        &mut self,
        elements: &mut ElementRegistry,
        collision: ElementHandle,
    ) -> Result<bool, RelationError> {
        let collision_ref = elements
            .collision(collision)
            .ok_or(RelationError::InvalidHandle)?;
        let Some(model) = collision_ref.parent_model() else {
            return Ok(false);
        };
        self.unlink(elements, collision, model)?;
        Ok(true)
    }

    /// Bind a camera to a scene's camera slot.
    ///
    /// Setting the already bound camera is a successful no-op. A
    /// different camera replaces the old edge first, so the slot always
    /// backs exactly one edge.
    pub fn set_scene_camera(
        &mut self,
        elements: &mut ElementRegistry,
        scene: ElementHandle,
        camera: ElementHandle,
    ) -> Result<(), RelationError> {
        let scene_ref = elements.scene(scene).ok_or(RelationError::InvalidHandle)?;
        let current = scene_ref.camera();
        if current == Some(camera) {
            return Ok(());
        }
        elements
            .camera(camera)
            .ok_or(RelationError::InvalidHandle)?;
        if let Some(old) = current {
            self.unlink(elements, old, scene)?;
        }
        self.link(camera, scene);
        if let Some(scene_ref) = elements.scene_mut(scene) {
            scene_ref.set_camera(Some(camera));
        }
        Ok(())
    }

    /// Clear a scene's camera slot. False when it was empty.
    pub fn remove_scene_camera(
        &mut self,
        elements: &mut ElementRegistry,
        scene: ElementHandle,
    ) -> Result<bool, RelationError> {
        let scene_ref = elements.scene(scene).ok_or(RelationError::InvalidHandle)?;
        let Some(camera) = scene_ref.camera() else {
            return Ok(false);
        };
        self.unlink(elements, camera, scene)?;
        Ok(true)
    }

    /// Bind a light to a scene's light slot. Same replace semantics as
    /// [`RelationGraph::set_scene_camera`].
    pub fn set_scene_light(
        &mut self,
        elements: &mut ElementRegistry,
        scene: ElementHandle,
        light: ElementHandle,
    ) -> Result<(), RelationError> {
        let scene_ref = elements.scene(scene).ok_or(RelationError::InvalidHandle)?;
        let current = scene_ref.light();
        if current == Some(light) {
            return Ok(());
        }
        elements.light(light).ok_or(RelationError::InvalidHandle)?;
        if let Some(old) = current {
            self.unlink(elements, old, scene)?;
        }
        self.link(light, scene);
        if let Some(scene_ref) = elements.scene_mut(scene) {
            scene_ref.set_light(Some(light));
        }
        Ok(())
    }

    /// Clear a scene's light slot. False when it was empty.
    pub fn remove_scene_light(
        &mut self,
        elements: &mut ElementRegistry,
        scene: ElementHandle,
    ) -> Result<bool, RelationError> {
        let scene_ref = elements.scene(scene).ok_or(RelationError::InvalidHandle)?;
        let Some(light) = scene_ref.light() else {
            return Ok(false);
        };
        self.unlink(elements, light, scene)?;
        Ok(true)
    }

    /// Bind a drawable to a shader sampler uniform.
    ///
    /// The edge is only recorded after the shader accepts the bind, so a
    /// refused bind leaves the graph untouched. Returns the texture unit
    /// the shader handed out.
    pub fn attach_drawable_to_shader(
        &mut self,
        elements: &mut ElementRegistry,
        shader: ElementHandle,
        drawable: ElementHandle,
        uniform: &str,
    ) -> Result<u32, RelationError> {
        elements.shader(shader).ok_or(RelationError::InvalidHandle)?;
        let drawable_ref = elements.get(drawable).ok_or(RelationError::InvalidHandle)?;
        if !drawable_ref.is_drawable() {
            return Err(RelationError::NotDrawable);
        }
        let cube = drawable_ref.samples_as_cube();
        let shader_ref = elements
            .shader_mut(shader)
            .ok_or(RelationError::InvalidHandle)?;
        let unit = shader_ref.attach(drawable, cube, uniform)?;
        self.link(drawable, shader);
        Ok(unit)
    }

    /// Unbind a drawable from a shader. False when it was not bound.
    pub fn detach_drawable_from_shader(
        &mut self,
        elements: &mut ElementRegistry,
        shader: ElementHandle,
        drawable: ElementHandle,
    ) -> Result<bool, RelationError> {
        let shader_ref = elements.shader(shader).ok_or(RelationError::InvalidHandle)?;
        if !shader_ref.has_attached(drawable) {
            return Ok(false);
        }
        self.unlink(elements, drawable, shader)?;
        Ok(true)
    }
}

/// Run the break action for a removed `child` under `parent` edge.
///
/// Each handled kind pair clears exactly the references that the edge
/// kept alive. Pairs without a table entry report loudly: silently
/// ignoring one would leave a dangling handle behind.
fn process_break(
    elements: &mut ElementRegistry,
    child: ElementHandle,
    parent: ElementHandle,
) -> Result<(), RelationError> {
    let (Some(child_kind), Some(parent_kind)) =
        (elements.kind_of(child), elements.kind_of(parent))
    else {
        log::warn!("edge break with a dead endpoint: {child:?} under {parent:?}");
        return Ok(());
    };
    match (child_kind, parent_kind) {
        (ElementKind::Model, ElementKind::Model) => {
            if let Some(model) = elements.model_mut(child) {
                model.set_parent(None, NO_BONE);
            }
        }
        (ElementKind::Model, ElementKind::Geometry) => {
            if let Some(model) = elements.model_mut(child) {
                model.clear_geometry();
            }
        }
        (ElementKind::Model, ElementKind::Animation) => {
            if let Some(model) = elements.model_mut(child) {
                model.set_animation(None);
            }
        }
        (ElementKind::Collision, ElementKind::Model) => {
            if let Some(collision) = elements.collision_mut(child) {
                collision.set_parent_model(None);
            }
            if let Some(model) = elements.model_mut(parent) {
                model.set_collision(None);
            }
        }
        (ElementKind::Camera, ElementKind::Scene) => {
            if let Some(scene) = elements.scene_mut(parent) {
                scene.set_camera(None);
            }
        }
        (ElementKind::Light, ElementKind::Scene) => {
            if let Some(scene) = elements.scene_mut(parent) {
                scene.set_light(None);
            }
        }
        (kind, ElementKind::Shader) if kind.is_drawable() => {
            if let Some(shader) = elements.shader_mut(parent) {
                shader.detach(child);
            }
        }
        (child_kind, parent_kind) => {
            log::error!("no break action for {child_kind} under {parent_kind}");
            return Err(RelationError::UnhandledBreak {
                child: child_kind,
                parent: parent_kind,
            });
        }
    }
    Ok(())
}
