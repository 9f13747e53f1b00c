// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composite operations: parenting, child ordering and content containers.
//!
//! A parent exclusively owns its ordered child list; a child only records the
//! slot index of its parent. Children are kept sorted by z-index, ties broken
//! by the order in which they were inserted. Reparenting always detaches
//! first, and a node can never become its own ancestor.

use alloc::vec::Vec;

use understory_dirty::EagerPolicy;

use super::id::{INVALID, NodeId};
use super::store::Scene;
use super::traverse::Children;
use crate::dirty;
use crate::error::ContractError;
use crate::invalidation::Invalidation;

impl Scene {
    // -- Queries --

    /// Returns the structural parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| self.id_of(p))
    }

    /// Returns the children of the node's content container, back to front.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let container = self.content_container(id);
        Children::new(self, container.idx)
    }

    /// Returns the direct children of the node itself, ignoring any content
    /// container.
    #[must_use]
    pub fn structural_children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, id.idx)
    }

    /// Returns whether `child` is a direct child of the content container of
    /// `parent`.
    #[must_use]
    pub fn has_child(&self, parent: NodeId, child: NodeId) -> bool {
        let container = self.content_container(parent);
        self.validate(child);
        self.parent[child.idx as usize] == container.idx
    }

    /// Returns whether `ancestor` is a strict ancestor of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.validate(ancestor);
        self.validate(node);
        self.is_ancestor_idx(ancestor.idx, node.idx)
    }

    pub(crate) fn is_ancestor_idx(&self, ancestor: u32, node: u32) -> bool {
        let mut current = self.parent[node as usize];
        while current != INVALID {
            if current == ancestor {
                return true;
            }
            current = self.parent[current as usize];
        }
        false
    }

    /// Returns the node that receives children added to `id`: the node
    /// itself, or the content container it delegates to (resolved
    /// transitively).
    #[must_use]
    pub fn content_container(&self, id: NodeId) -> NodeId {
        self.validate(id);
        let mut current = id;
        while let Some(next) = self.content_container[current.idx as usize] {
            if next == current || !self.is_alive(next) {
                break;
            }
            current = next;
        }
        current
    }

    // -- Content containers --

    /// Redirects [`add_child`](Self::add_child), [`children`](Self::children)
    /// and friends on `id` to `container`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `container` is neither `id`
    /// nor one of its descendants.
    pub fn set_content_container(&mut self, id: NodeId, container: NodeId) {
        if let Err(err) = self.try_set_content_container(id, container) {
            panic!("{err}");
        }
    }

    /// Fallible variant of [`set_content_container`](Self::set_content_container).
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn try_set_content_container(
        &mut self,
        id: NodeId,
        container: NodeId,
    ) -> Result<(), ContractError> {
        self.validate(id);
        self.validate(container);
        if container == id {
            self.content_container[id.idx as usize] = None;
            return Ok(());
        }
        if !self.is_ancestor_idx(id.idx, container.idx) {
            return Err(ContractError::ForeignContentContainer);
        }
        self.content_container[id.idx as usize] = Some(container);
        Ok(())
    }

    // -- Mutation --

    /// Adds `child` to the content container of `parent`, detaching it from
    /// its previous parent first.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `child` is the container or one
    /// of its ancestors, or if `child` is the scene root.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let container = self.content_container(parent);
        self.set_parent(child, Some(container));
    }

    /// Adds every node in `children` to `parent`, in order.
    ///
    /// # Panics
    ///
    /// Same conditions as [`add_child`](Self::add_child).
    pub fn add_children(&mut self, parent: NodeId, children: &[NodeId]) {
        for &child in children {
            self.add_child(parent, child);
        }
    }

    /// Removes `child` from the content container of `parent`.
    ///
    /// Returns `false` if it was not a child there.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.has_child(parent, child) {
            return false;
        }
        self.detach(child.idx, true);
        true
    }

    /// Removes every node in `children` from `parent`. Returns how many were
    /// actually removed.
    pub fn remove_children(&mut self, parent: NodeId, children: &[NodeId]) -> usize {
        children
            .iter()
            .filter(|&&child| self.remove_child(parent, child))
            .count()
    }

    /// Detaches a node from its parent. Returns `false` if it had none.
    pub fn remove_from_parent(&mut self, id: NodeId) -> bool {
        self.validate(id);
        if self.parent[id.idx as usize] == INVALID {
            return false;
        }
        self.detach(id.idx, true);
        true
    }

    /// Removes all children of the content container of `id`, disposing them
    /// if `dispose` is set.
    pub fn clear_children(&mut self, id: NodeId, dispose: bool) {
        let container = self.content_container(id);
        let snapshot: Vec<NodeId> = self.children(container).collect();
        for child in snapshot {
            if !self.is_alive(child) || self.parent[child.idx as usize] != container.idx {
                continue;
            }
            if dispose {
                self.dispose(child);
            } else {
                self.detach(child.idx, true);
            }
        }
    }

    /// Calls `f` for each child of `id`'s content container.
    ///
    /// Iterates over a snapshot taken before the first call, so `f` may add,
    /// remove or dispose nodes. Children removed or disposed by an earlier
    /// call are skipped.
    pub fn for_children(&mut self, id: NodeId, mut f: impl FnMut(&mut Self, NodeId)) {
        let container = self.content_container(id);
        let snapshot: Vec<NodeId> = self.children(container).collect();
        for child in snapshot {
            if self.is_alive(child) && self.parent[child.idx as usize] == container.idx {
                f(self, child);
            }
        }
    }

    /// Sets the structural parent of `child` (bypassing content containers).
    /// `None` detaches it.
    ///
    /// The child is detached from its previous parent first and inserted into
    /// the new parent's sorted child list. If the new parent is attached to
    /// the scene root, the child's subtree becomes attached too and any
    /// unloaded node in it is loaded.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `parent` is `child` or one of
    /// its descendants, or if `child` is the scene root.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) {
        if let Err(err) = self.try_set_parent(child, parent) {
            panic!("{err}");
        }
    }

    /// Fallible variant of [`set_parent`](Self::set_parent).
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn try_set_parent(
        &mut self,
        child: NodeId,
        parent: Option<NodeId>,
    ) -> Result<(), ContractError> {
        self.validate(child);
        let c = child.idx;
        let Some(parent) = parent else {
            if self.parent[c as usize] != INVALID {
                self.detach(c, true);
            }
            return Ok(());
        };
        self.validate(parent);
        let p = parent.idx;
        if p == c || self.is_ancestor_idx(c, p) {
            return Err(ContractError::CyclicParent);
        }
        if c == self.root {
            return Err(ContractError::ParentedRoot);
        }
        if self.parent[c as usize] == p {
            return Ok(());
        }
        let was_attached = self.attached[c as usize];
        if self.parent[c as usize] != INVALID {
            self.detach(c, false);
        }
        self.attach(c, p);
        if was_attached && !self.attached[c as usize] {
            self.forget_input_subtree(c);
        }
        Ok(())
    }

    /// Sets the z-order index and re-sorts the node among its siblings.
    pub fn set_z_index(&mut self, id: NodeId, z_index: i32) {
        self.validate(id);
        let c = id.idx;
        if self.z_index[c as usize] == z_index {
            return;
        }
        self.z_index[c as usize] = z_index;
        let p = self.parent[c as usize];
        if p == INVALID {
            return;
        }
        if let Some(pos) = self.children[p as usize].iter().position(|&s| s == c) {
            self.children[p as usize].remove(pos);
        }
        self.insert_sorted(p, c);
        if self.layout[p as usize].is_some() {
            self.mark_invalid(p, Invalidation::LAYOUT);
        }
        self.damage.mark(p, dirty::TOPOLOGY);
        self.damage.mark_with(c, dirty::PAINT, &EagerPolicy);
    }

    // -- Internals --

    fn insert_sorted(&mut self, p: u32, c: u32) {
        let key = (self.z_index[c as usize], self.insertion[c as usize]);
        let pos = self.children[p as usize]
            .partition_point(|&s| (self.z_index[s as usize], self.insertion[s as usize]) <= key);
        self.children[p as usize].insert(pos, c);
    }

    fn attach(&mut self, c: u32, p: u32) {
        self.parent[c as usize] = p;
        self.insertion[c as usize] = self.next_insertion;
        self.next_insertion += 1;
        self.insert_sorted(p, c);

        // Add dirty dependency edge: child depends on parent for PAINT.
        let _ = self.damage.add_dependency(c, p, dirty::PAINT);

        // New ancestry: size, matrix and opacity all need recomputation.
        self.mark_invalid(c, Invalidation::DRAW_SIZE | Invalidation::OPACITY);
        self.notify_parent_of_resize(c);
        self.damage.mark_with(c, dirty::PAINT, &EagerPolicy);
        self.damage.mark(p, dirty::TOPOLOGY);

        if self.attached[p as usize] {
            self.attach_subtree(c);
        }
    }

    /// Unlinks `c` from its parent. With `forget`, the subtree is also
    /// dropped from the application and from every input cache.
    pub(crate) fn detach(&mut self, c: u32, forget: bool) {
        let p = self.parent[c as usize];
        if p == INVALID {
            return;
        }
        if let Some(pos) = self.children[p as usize].iter().position(|&s| s == c) {
            self.children[p as usize].remove(pos);
        }
        self.notify_parent_of_resize(c);
        self.parent[c as usize] = INVALID;

        self.damage.remove_dependency(c, p, dirty::PAINT);
        self.mark_invalid(c, Invalidation::DRAW_SIZE | Invalidation::OPACITY);
        self.damage.mark_with(c, dirty::PAINT, &EagerPolicy);
        self.damage.mark(p, dirty::PAINT);
        self.damage.mark(p, dirty::TOPOLOGY);

        if self.attached[c as usize] {
            for idx in self.subtree(c) {
                self.attached[idx as usize] = false;
            }
        }
        if forget {
            self.forget_input_subtree(c);
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Size, Vec2};

    use super::*;

    #[test]
    fn set_parent_twice_moves_the_child() {
        let mut scene = Scene::new();
        let first = scene.create_node();
        let second = scene.create_node();
        let child = scene.create_node();

        scene.set_parent(child, Some(first));
        scene.set_parent(child, Some(second));

        assert_eq!(scene.parent(child), Some(second));
        assert_eq!(scene.children(first).count(), 0);
        assert_eq!(scene.children(second).collect::<Vec<_>>(), [child]);

        // Same parent again is a no-op, never a duplicate.
        scene.set_parent(child, Some(second));
        assert_eq!(scene.children(second).count(), 1);
    }

    #[test]
    fn add_child_reparents() {
        let mut scene = Scene::new();
        let a = scene.create_node();
        let b = scene.create_node();
        let child = scene.create_node();
        scene.add_child(a, child);
        scene.add_child(b, child);
        assert!(!scene.has_child(a, child));
        assert!(scene.has_child(b, child));
    }

    #[test]
    #[should_panic(expected = "own ancestor")]
    fn node_cannot_parent_itself() {
        let mut scene = Scene::new();
        let a = scene.create_node();
        scene.add_child(a, a);
    }

    #[test]
    fn parenting_under_a_descendant_is_rejected() {
        let mut scene = Scene::new();
        let a = scene.create_node();
        let b = scene.create_node();
        let c = scene.create_node();
        scene.add_child(a, b);
        scene.add_child(b, c);
        assert_eq!(
            scene.try_set_parent(a, Some(c)),
            Err(ContractError::CyclicParent)
        );
        assert_eq!(scene.parent(a), None);
        assert!(scene.is_ancestor(a, c));
        assert!(!scene.is_ancestor(c, a));
    }

    #[test]
    fn root_cannot_be_parented() {
        let mut scene = Scene::new();
        let root = scene.create_node();
        let other = scene.create_node();
        scene.set_root(root);
        assert_eq!(
            scene.try_set_parent(root, Some(other)),
            Err(ContractError::ParentedRoot)
        );
        assert_eq!(scene.parent(root), None);
        assert!(!scene.has_child(other, root));
        assert_eq!(scene.root(), Some(root));
        assert!(scene.is_attached(root));
    }

    #[test]
    #[should_panic(expected = "the scene root cannot have a parent")]
    fn add_child_rejects_the_root() {
        let mut scene = Scene::new();
        let root = scene.create_node();
        let other = scene.create_node();
        scene.set_root(root);
        scene.add_child(other, root);
    }

    #[test]
    fn children_sorted_by_z_index_then_insertion() {
        let mut scene = Scene::new();
        let parent = scene.create_node();
        let a = scene.create_node();
        let b = scene.create_node();
        let c = scene.create_node();
        scene.set_z_index(a, 1);
        scene.add_children(parent, &[a, b, c]);
        assert_eq!(scene.children(parent).collect::<Vec<_>>(), [b, c, a]);

        scene.set_z_index(c, 5);
        assert_eq!(scene.children(parent).collect::<Vec<_>>(), [b, a, c]);

        scene.set_z_index(b, 1);
        // Ties keep insertion order: a was inserted before b.
        assert_eq!(scene.children(parent).collect::<Vec<_>>(), [a, b, c]);
    }

    #[test]
    fn remove_child_and_remove_children() {
        let mut scene = Scene::new();
        let parent = scene.create_node();
        let a = scene.create_node();
        let b = scene.create_node();
        let stranger = scene.create_node();
        scene.add_children(parent, &[a, b]);

        assert!(!scene.remove_child(parent, stranger));
        assert_eq!(scene.remove_children(parent, &[a, b, stranger]), 2);
        assert_eq!(scene.children(parent).count(), 0);
        assert!(scene.is_alive(a), "removal does not dispose");
        assert!(!scene.remove_from_parent(a));
    }

    #[test]
    fn clear_children_with_and_without_dispose() {
        let mut scene = Scene::new();
        let parent = scene.create_node();
        let a = scene.create_node();
        let b = scene.create_node();
        scene.add_children(parent, &[a, b]);
        scene.clear_children(parent, false);
        assert!(scene.is_alive(a) && scene.is_alive(b));
        assert_eq!(scene.parent(a), None);

        scene.add_children(parent, &[a, b]);
        scene.clear_children(parent, true);
        assert!(!scene.is_alive(a));
        assert!(!scene.is_alive(b));
        assert!(scene.is_alive(parent));
    }

    #[test]
    fn for_children_tolerates_mutation() {
        let mut scene = Scene::new();
        let parent = scene.create_node();
        let a = scene.create_node();
        let b = scene.create_node();
        let c = scene.create_node();
        scene.add_children(parent, &[a, b, c]);

        let mut visited = Vec::new();
        scene.for_children(parent, |scene, child| {
            visited.push(child);
            if child == a {
                // Removing a later sibling mid-iteration skips it.
                scene.dispose(b);
                let extra = scene.create_node();
                scene.add_child(parent, extra);
            }
        });
        assert_eq!(visited, [a, c]);
        assert_eq!(scene.children(parent).count(), 3);
    }

    #[test]
    fn content_container_redirects_children() {
        let mut scene = Scene::new();
        let panel = scene.create_node();
        let inner = scene.create_node();
        scene.add_child(panel, inner);
        scene.set_content_container(panel, inner);

        let item = scene.create_node();
        scene.add_child(panel, item);
        assert_eq!(scene.parent(item), Some(inner));
        assert!(scene.has_child(panel, item));
        assert_eq!(scene.children(panel).collect::<Vec<_>>(), [item]);
        assert_eq!(
            scene.structural_children(panel).collect::<Vec<_>>(),
            [inner]
        );
        assert!(scene.remove_child(panel, item));
        assert_eq!(scene.parent(item), None);
    }

    #[test]
    fn content_container_must_be_a_descendant() {
        let mut scene = Scene::new();
        let panel = scene.create_node();
        let other = scene.create_node();
        assert_eq!(
            scene.try_set_content_container(panel, other),
            Err(ContractError::ForeignContentContainer)
        );
        assert_eq!(scene.content_container(panel), panel);
    }

    #[test]
    fn disposed_content_container_falls_back_to_self() {
        let mut scene = Scene::new();
        let panel = scene.create_node();
        let inner = scene.create_node();
        scene.add_child(panel, inner);
        scene.set_content_container(panel, inner);
        scene.dispose(inner);
        assert_eq!(scene.content_container(panel), panel);
    }

    #[test]
    fn reparenting_updates_geometry_and_sizes() {
        let mut scene = Scene::new();
        let a = scene.create_node();
        let b = scene.create_node();
        let child = scene.create_node();
        scene.set_size(a, Size::new(100.0, 100.0));
        scene.set_size(b, Size::new(40.0, 40.0));
        scene.set_relative_size_axes(child, crate::node::Axes::BOTH);
        scene.set_size(child, Size::new(1.0, 1.0));
        scene.set_anchor(child, Vec2::new(1.0, 0.0));

        scene.add_child(a, child);
        assert_eq!(scene.draw_size(child), Size::new(100.0, 100.0));
        assert_eq!(scene.world_position(child).x, 100.0);

        scene.add_child(b, child);
        assert_eq!(scene.draw_size(child), Size::new(40.0, 40.0));
        assert_eq!(scene.world_position(child).x, 40.0);
    }

    #[test]
    fn removing_child_shrinks_child_relative_parent() {
        let mut scene = Scene::new();
        let parent = scene.create_node();
        let a = scene.create_node();
        let b = scene.create_node();
        scene.set_child_relative_size_axes(parent, crate::node::Axes::BOTH);
        scene.add_children(parent, &[a, b]);
        scene.set_size(a, Size::new(10.0, 10.0));
        scene.set_size(b, Size::new(50.0, 5.0));
        assert_eq!(scene.draw_size(parent), Size::new(50.0, 10.0));

        scene.remove_child(parent, b);
        assert_eq!(scene.draw_size(parent), Size::new(10.0, 10.0));
    }
}
