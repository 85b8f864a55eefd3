use glam::{Affine3A, Quat, Vec3};
use kinema_animation::{ChannelTarget, LocalTransform, MorphWeightData, PropertyValue, TransformStore};
use kinema_core::NodeHandle;
use parking_lot::{RwLock, RwLockReadGuard};
use rustc_hash::FxHashSet;
use slotmap::SlotMap;

use crate::node::Node;
use crate::transform_system;

/// Node storage and hierarchy of a [`Scene`].
#[derive(Debug, Default)]
pub struct SceneGraph {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,
}

impl SceneGraph {
    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// Depth-first search for a node called `name` below (and including) `root`.
    #[must_use]
    pub fn find_in_subtree(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            if node.name == name {
                return Some(handle);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    fn apply(&mut self, target: &ChannelTarget, value: &PropertyValue) -> bool {
        let Some(node) = self.nodes.get_mut(target.node) else {
            log::trace!("Write to removed node {:?} ignored", target.node);
            return false;
        };
        match value {
            PropertyValue::Translation(v) => node.transform.position = *v,
            PropertyValue::Rotation(q) => node.transform.rotation = *q,
            PropertyValue::Scale(v) => node.transform.scale = *v,
            PropertyValue::Weights(w) => {
                node.morph_weights.clear();
                node.morph_weights.extend_from_slice(&w.weights);
            }
        }
        true
    }

    fn detach_from_parent(&mut self, handle: NodeHandle) {
        let old_parent = self.nodes.get(handle).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(parent) = self.nodes.get_mut(p)
                && let Some(i) = parent.children.iter().position(|&x| x == handle)
            {
                parent.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == handle) {
            self.root_nodes.remove(i);
        }
    }
}

/// Hierarchical transform store.
///
/// Structural edits (`create_node`, `attach`, `remove_node`, direct TRS
/// setters) take `&mut self`. Animation reads and commits go through the
/// [`TransformStore`] impl with `&self`: a commit applies all writes and
/// refreshes world matrices under one write lock, so readers never observe a
/// partially applied tick.
#[derive(Debug, Default)]
pub struct Scene {
    graph: RwLock<SceneGraph>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared read access to the graph.
    pub fn read(&self) -> RwLockReadGuard<'_, SceneGraph> {
        self.graph.read()
    }

    /// Exclusive access to the graph without locking.
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        self.graph.get_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.read().nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.read().nodes.is_empty()
    }

    // ========================================================================
    // Structure
    // ========================================================================

    /// Creates a named root node.
    pub fn create_node(&mut self, name: &str) -> NodeHandle {
        self.add_node(Node::new(name))
    }

    /// Adds a node to the scene as a root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let graph = self.graph.get_mut();
        let handle = graph.nodes.insert(node);
        graph.root_nodes.push(handle);
        handle
    }

    /// Adds a node as the last child of `parent`. A missing parent leaves the
    /// node at the root.
    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.add_node(child);
        self.attach(handle, parent);
        handle
    }

    /// Re-parents `child` under `parent`.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        let graph = self.graph.get_mut();
        if !graph.nodes.contains_key(child) {
            log::warn!("Attach of missing node {child:?} ignored");
            return;
        }
        if !graph.nodes.contains_key(parent) {
            log::error!("Parent node not found during attach!");
            return;
        }
        // Refuse cycles: parent must not sit below child
        let mut cursor = Some(parent);
        while let Some(h) = cursor {
            if h == child {
                log::warn!("Cannot attach node below its own descendant");
                return;
            }
            cursor = graph.nodes.get(h).and_then(|n| n.parent);
        }

        graph.detach_from_parent(child);
        if let Some(p) = graph.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = graph.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    /// Moves `child` back to the root level.
    pub fn detach(&mut self, child: NodeHandle) {
        let graph = self.graph.get_mut();
        if graph.nodes.get(child).and_then(|n| n.parent).is_none() {
            return;
        }
        graph.detach_from_parent(child);
        if let Some(c) = graph.nodes.get_mut(child) {
            c.parent = None;
            c.transform.mark_dirty();
        }
        graph.root_nodes.push(child);
    }

    /// Removes a node and, recursively, all of its children.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        let graph = self.graph.get_mut();
        if !graph.nodes.contains_key(handle) {
            return;
        }
        graph.detach_from_parent(handle);

        let mut stack = vec![handle];
        while let Some(h) = stack.pop() {
            if let Some(node) = graph.nodes.remove(h) {
                stack.extend(node.children);
            }
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn get_name(&self, handle: NodeHandle) -> Option<String> {
        self.graph.read().nodes.get(handle).map(|n| n.name.clone())
    }

    /// First node called `name`, searching every root subtree in order.
    #[must_use]
    pub fn find_node_by_name(&self, name: &str) -> Option<NodeHandle> {
        let graph = self.graph.read();
        graph
            .root_nodes
            .iter()
            .find_map(|&root| graph.find_in_subtree(root, name))
    }

    /// Node called `name` inside the subtree rooted at `root`.
    #[must_use]
    pub fn find_in_subtree(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        self.graph.read().find_in_subtree(root, name)
    }

    #[must_use]
    pub fn roots(&self) -> Vec<NodeHandle> {
        self.graph.read().root_nodes.clone()
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    pub fn set_position(&mut self, handle: NodeHandle, position: Vec3) {
        if let Some(node) = self.graph.get_mut().nodes.get_mut(handle) {
            node.transform.position = position;
        }
    }

    pub fn set_rotation(&mut self, handle: NodeHandle, rotation: Quat) {
        if let Some(node) = self.graph.get_mut().nodes.get_mut(handle) {
            node.transform.rotation = rotation;
        }
    }

    pub fn set_scale(&mut self, handle: NodeHandle, scale: Vec3) {
        if let Some(node) = self.graph.get_mut().nodes.get_mut(handle) {
            node.transform.scale = scale;
        }
    }

    /// Updates the world matrices of the whole scene.
    pub fn update_matrix_world(&mut self) {
        let graph = self.graph.get_mut();
        transform_system::update_hierarchy_iterative(&mut graph.nodes, &graph.root_nodes);
    }

    /// Updates the world matrices of the subtree rooted at `root`.
    pub fn update_subtree(&mut self, root: NodeHandle) {
        transform_system::update_subtree(&mut self.graph.get_mut().nodes, root);
    }
}

impl TransformStore for Scene {
    fn contains(&self, node: NodeHandle) -> bool {
        self.graph.read().nodes.contains_key(node)
    }

    fn local_transform(&self, node: NodeHandle) -> Option<LocalTransform> {
        self.graph.read().nodes.get(node).map(|n| n.transform.to_local())
    }

    fn world_matrix(&self, node: NodeHandle) -> Option<Affine3A> {
        self.graph.read().nodes.get(node).map(|n| n.transform.world_matrix)
    }

    fn morph_weights(&self, node: NodeHandle) -> Option<MorphWeightData> {
        self.graph
            .read()
            .nodes
            .get(node)
            .map(|n| MorphWeightData::from_slice(&n.morph_weights))
    }

    fn parent(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.graph.read().nodes.get(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeHandle) -> Vec<NodeHandle> {
        self.graph
            .read()
            .nodes
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn commit(&self, writes: &[(ChannelTarget, PropertyValue)]) {
        let mut graph = self.graph.write();
        let mut written = FxHashSet::default();
        for (target, value) in writes {
            if graph.apply(target, value) {
                written.insert(target.node);
            }
        }
        if !written.is_empty() {
            transform_system::update_dirty_subtrees(&mut graph.nodes, &written);
        }
    }
}
