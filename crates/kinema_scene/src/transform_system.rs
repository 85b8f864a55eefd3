//! Transform System
//!
//! World-matrix propagation over the node hierarchy. Decoupled from
//! [`Scene`](crate::Scene) so it only borrows the node map and root list.

use glam::Affine3A;
use kinema_core::NodeHandle;
use rustc_hash::FxHashSet;
use slotmap::SlotMap;

use crate::node::Node;

/// Updates the world matrices of every node reachable from `roots`.
///
/// Uses an explicit stack instead of recursion so deep hierarchies cannot
/// overflow. A node's world matrix is recomputed when its local matrix or
/// any ancestor's world matrix changed.
pub fn update_hierarchy_iterative(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    // (node, parent world matrix, parent changed)
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);
    for &root in roots.iter().rev() {
        stack.push((root, Affine3A::IDENTITY, false));
    }
    propagate(nodes, &mut stack);
}

/// Updates the subtree rooted at `root`, forcing every world matrix in it to
/// be recomputed from the current parent world matrix.
pub fn update_subtree(nodes: &mut SlotMap<NodeHandle, Node>, root: NodeHandle) {
    let Some(node) = nodes.get(root) else {
        return;
    };
    let parent_world = node
        .parent
        .and_then(|p| nodes.get(p))
        .map_or(Affine3A::IDENTITY, |p| p.transform.world_matrix);

    let mut stack = vec![(root, parent_world, true)];
    propagate(nodes, &mut stack);
}

/// Refreshes the subtrees rooted at the nodes in `dirty`, skipping nodes
/// whose ancestor is also dirty. Nodes outside those subtrees are not
/// visited. Returns the number of subtrees updated.
pub fn update_dirty_subtrees(nodes: &mut SlotMap<NodeHandle, Node>, dirty: &FxHashSet<NodeHandle>) -> usize {
    let mut updated = 0;
    for &handle in dirty {
        if has_dirty_ancestor(nodes, handle, dirty) {
            continue;
        }
        update_subtree(nodes, handle);
        updated += 1;
    }
    updated
}

fn has_dirty_ancestor(nodes: &SlotMap<NodeHandle, Node>, handle: NodeHandle, dirty: &FxHashSet<NodeHandle>) -> bool {
    let mut cursor = nodes.get(handle).and_then(|n| n.parent);
    while let Some(h) = cursor {
        if dirty.contains(&h) {
            return true;
        }
        cursor = nodes.get(h).and_then(|n| n.parent);
    }
    false
}

fn propagate(nodes: &mut SlotMap<NodeHandle, Node>, stack: &mut Vec<(NodeHandle, Affine3A, bool)>) {
    while let Some((handle, parent_world, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;
        if world_needs_update {
            let world = parent_world * *node.transform.local_matrix();
            node.transform.set_world_matrix(world);
        }

        let world = node.transform.world_matrix;
        // Reverse push keeps children in declaration order
        for &child in node.children.iter().rev() {
            stack.push((child, world, world_needs_update));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_hierarchy_update() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();

        let mut parent = Node::new("parent");
        parent.transform.position = Vec3::new(1.0, 0.0, 0.0);
        let parent_handle = nodes.insert(parent);

        let mut child = Node::new("child");
        child.transform.position = Vec3::new(0.0, 1.0, 0.0);
        child.parent = Some(parent_handle);
        let child_handle = nodes.insert(child);

        nodes.get_mut(parent_handle).unwrap().children.push(child_handle);

        update_hierarchy_iterative(&mut nodes, &[parent_handle]);

        let child_world_pos = nodes.get(child_handle).unwrap().transform.world_matrix.translation;
        assert!((child_world_pos.x - 1.0).abs() < 1e-5);
        assert!((child_world_pos.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn parent_change_propagates_to_unchanged_child() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();
        let parent_handle = nodes.insert(Node::new("parent"));
        let mut child = Node::new("child");
        child.parent = Some(parent_handle);
        let child_handle = nodes.insert(child);
        nodes[parent_handle].children.push(child_handle);

        update_hierarchy_iterative(&mut nodes, &[parent_handle]);
        nodes[parent_handle].transform.position = Vec3::new(0.0, 0.0, 3.0);
        update_hierarchy_iterative(&mut nodes, &[parent_handle]);

        let z = nodes[child_handle].transform.world_matrix.translation.z;
        assert!((z - 3.0).abs() < 1e-5);
    }

    #[test]
    fn dirty_subtrees_leave_other_branches_alone() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();
        let root = nodes.insert(Node::new("root"));
        let mut arm = Node::new("arm");
        arm.parent = Some(root);
        let arm = nodes.insert(arm);
        let mut hand = Node::new("hand");
        hand.parent = Some(arm);
        let hand = nodes.insert(hand);
        let mut leg = Node::new("leg");
        leg.parent = Some(root);
        let leg = nodes.insert(leg);
        nodes[root].children.extend([arm, leg]);
        nodes[arm].children.push(hand);
        update_hierarchy_iterative(&mut nodes, &[root]);

        nodes[arm].transform.position = Vec3::X;
        nodes[hand].transform.position = Vec3::Y;
        nodes[leg].transform.position = Vec3::Z;

        let dirty: FxHashSet<NodeHandle> = [arm, hand].into_iter().collect();
        assert_eq!(update_dirty_subtrees(&mut nodes, &dirty), 1);

        let hand_pos: Vec3 = nodes[hand].transform.world_matrix.translation.into();
        assert!((hand_pos - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
        // Not written, so not propagated
        let leg_pos: Vec3 = nodes[leg].transform.world_matrix.translation.into();
        assert_eq!(leg_pos, Vec3::ZERO);
    }
}
