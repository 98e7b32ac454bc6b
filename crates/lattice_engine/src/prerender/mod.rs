//! Pre-render transform tree
//!
//! Tracks every live model as a node in a parent/child forest and, once
//! per pulse, advances animation playback and refreshes cached world
//! matrices parent-before-child. Attachment edges mirror the relation
//! graph's model-to-model links; the tree never decides who may attach
//! to whom, it only walks the result.

use crate::elements::{Animation, ElementHandle, Model};
use crate::foundation::math::Mat4;
use crate::lifecycle::ElementRegistry;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct TreeNode {
    parent: Option<ElementHandle>,
    children: Vec<ElementHandle>,
}

/// Forest of model nodes refreshed each pulse.
#[derive(Debug, Default)]
pub struct TransformTree {
    nodes: HashMap<ElementHandle, TreeNode>,
}

impl TransformTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a model as a root node.
    pub(crate) fn track(&mut self, model: ElementHandle) {
        self.nodes.entry(model).or_default();
    }

    /// Stop tracking a model.
    ///
    /// Children of the removed node become roots; their element-side
    /// parent fields are cleared separately by break processing.
    pub(crate) fn untrack(&mut self, model: ElementHandle) {
        let Some(node) = self.nodes.remove(&model) else {
            return;
        };
        if let Some(parent) = node.parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|&child| child != model);
            }
        }
        for child in node.children {
            if let Some(child_node) = self.nodes.get_mut(&child) {
                child_node.parent = None;
            }
        }
    }

    /// Hang `child` under `parent`. Both must already be tracked.
    pub(crate) fn attach(&mut self, child: ElementHandle, parent: ElementHandle) {
        if child == parent || !self.nodes.contains_key(&child) {
            return;
        }
        let Some(parent_node) = self.nodes.get_mut(&parent) else {
            return;
        };
        parent_node.children.push(child);
        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.parent = Some(parent);
        }
    }

    /// Return `child` to the root set.
    pub(crate) fn detach(&mut self, child: ElementHandle) {
        let Some(node) = self.nodes.get_mut(&child) else {
            return;
        };
        let Some(parent) = node.parent.take() else {
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.retain(|&c| c != child);
        }
    }

    /// Tree parent of `model`, if it is tracked and attached.
    #[must_use]
    pub fn parent_of(&self, model: ElementHandle) -> Option<ElementHandle> {
        self.nodes.get(&model).and_then(|node| node.parent)
    }

    /// Models hanging directly under `model`.
    #[must_use]
    pub fn children_of(&self, model: ElementHandle) -> &[ElementHandle] {
        self.nodes
            .get(&model)
            .map_or(&[], |node| node.children.as_slice())
    }

    /// Whether `model` is tracked.
    #[must_use]
    pub fn contains(&self, model: ElementHandle) -> bool {
        self.nodes.contains_key(&model)
    }

    /// Number of tracked models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no models are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node at once. Shutdown path only.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Advance animation playback and refresh world matrices.
    ///
    /// Parents are visited before children so a child always combines
    /// with its parent's matrix from this pulse, not the previous one.
    pub(crate) fn update(&mut self, elements: &mut ElementRegistry, dt: f32) {
        let mut stack: Vec<(ElementHandle, bool)> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(&handle, _)| (handle, false))
            .collect();

        while let Some((handle, parent_moved)) = stack.pop() {
            if let Some(clip) = elements.model(handle).and_then(Model::animation) {
                let duration = elements.animation(clip).map_or(0.0, Animation::duration);
                if let Some(model) = elements.model_mut(handle) {
                    model.advance_animation(dt, duration);
                }
            }

            let parent_global: Option<Mat4> = self
                .nodes
                .get(&handle)
                .and_then(|node| node.parent)
                .and_then(|parent| elements.model(parent).map(|m| *m.global_matrix()));
            let moved = elements
                .model_mut(handle)
                .is_some_and(|model| model.refresh_matrices(parent_global.as_ref(), parent_moved));

            if let Some(node) = self.nodes.get(&handle) {
                for &child in &node.children {
                    stack.push((child, moved));
                }
            }
        }
    }
}
