// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node lifecycle: attachment to the scene root, loading, disposal and
//! observer registration.
//!
//! Nodes are created detached. A subtree becomes *attached* when it is set as
//! the scene root or parented under an attached node, and every node in it is
//! loaded exactly once. Disposal is explicit: it detaches the node, disposes
//! its children unless asked not to, drops its observers, sequences and
//! capabilities, purges it from the input caches and frees the slot.

use alloc::boxed::Box;
use alloc::vec::Vec;

use kurbo::Point;

use super::id::{INVALID, NodeId, ObserverId};
use super::store::{Derived, NodeProps, Scene};
use crate::animation::SequenceSet;
use crate::dirty;

pub(crate) enum ObserverKind {
    WorldPosition(Box<dyn FnMut(NodeId, Point)>),
    Load(Box<dyn FnMut(NodeId)>),
    Dispose(Box<dyn FnMut(NodeId)>),
}

pub(crate) struct Observer {
    pub(crate) id: ObserverId,
    pub(crate) kind: ObserverKind,
}

impl Scene {
    // -- Root --

    /// Makes `id` the scene root, attaching and loading its subtree.
    ///
    /// The previous root subtree, if any, is detached from the application
    /// and purged from the input caches, but stays alive.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node has a parent.
    pub fn set_root(&mut self, id: NodeId) {
        self.validate(id);
        assert!(
            self.parent[id.idx as usize] == INVALID,
            "root node cannot have a parent"
        );
        if self.root == id.idx {
            return;
        }
        if self.root != INVALID {
            let old = self.root;
            for idx in self.subtree(old) {
                self.attached[idx as usize] = false;
            }
            self.forget_input_subtree(old);
        }
        self.root = id.idx;
        self.attach_subtree(id.idx);
    }

    /// Returns the scene root, if one is set.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        (self.root != INVALID).then(|| self.id_of(self.root))
    }

    /// Returns whether the node is part of the root subtree.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.validate(id);
        self.attached[id.idx as usize]
    }

    /// Returns whether the node has been loaded.
    #[must_use]
    pub fn is_loaded(&self, id: NodeId) -> bool {
        self.validate(id);
        self.loaded[id.idx as usize]
    }

    pub(crate) fn attach_subtree(&mut self, idx: u32) {
        for n in self.subtree(idx) {
            self.attached[n as usize] = true;
        }
        self.load_idx(idx);
    }

    // -- Load --

    /// Loads the subtree rooted at `id`.
    ///
    /// Every node not loaded yet is marked loaded and its load observers fire,
    /// parents before children. Nodes loaded earlier are left alone, so
    /// calling this repeatedly has no further effect.
    pub fn load(&mut self, id: NodeId) {
        self.validate(id);
        self.load_idx(id.idx);
    }

    fn load_idx(&mut self, idx: u32) {
        for n in self.subtree(idx) {
            let i = n as usize;
            if self.loaded[i] {
                continue;
            }
            self.loaded[i] = true;
            let id = self.id_of(n);
            for observer in &mut self.observers[i] {
                if let ObserverKind::Load(f) = &mut observer.kind {
                    f(id);
                }
            }
        }
    }

    // -- Dispose --

    /// Disposes a node and, recursively, all of its children.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn dispose(&mut self, id: NodeId) {
        self.dispose_with(id, true);
    }

    /// Disposes a node. With `dispose_children` unset, its children are
    /// detached and left alive as parentless nodes.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn dispose_with(&mut self, id: NodeId, dispose_children: bool) {
        self.validate(id);
        let idx = id.idx;
        let i = idx as usize;

        for observer in &mut self.observers[i] {
            if let ObserverKind::Dispose(f) = &mut observer.kind {
                f(id);
            }
        }

        if self.parent[i] != INVALID {
            self.detach(idx, true);
        }
        let children = core::mem::take(&mut self.children[i]);
        // Put them back so detach can unlink them one by one.
        self.children[i] = children.clone();
        for c in children {
            let child = self.id_of(c);
            if dispose_children {
                self.dispose_with(child, true);
            } else {
                self.detach(c, true);
            }
        }

        self.forget_input(idx);
        if self.root == idx {
            self.root = INVALID;
        }
        if self.animating == idx {
            self.animating = INVALID;
        }

        // Remove dirty tracking state.
        self.damage.remove_key(idx);

        // Drop everything the node owned.
        self.observers[i].clear();
        self.sequences[i] = SequenceSet::new();
        self.paint[i] = None;
        self.handler[i] = None;
        self.layout[i] = None;
        self.children[i].clear();
        self.props[i] = NodeProps::default();
        self.derived[i] = Derived::default();
        self.attached[i] = false;
        self.loaded[i] = false;

        // Bump generation so old handles immediately fail validation.
        self.generation[i] += 1;
        self.alive[i] = false;
        self.free_list.push(idx);
        self.pending_removed.push(idx);
        self.damage.mark(idx, dirty::TOPOLOGY);
    }

    // -- Observers --

    fn add_observer(&mut self, id: NodeId, kind: ObserverKind) -> ObserverId {
        self.validate(id);
        let observer = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers[id.idx as usize].push(Observer { id: observer, kind });
        observer
    }

    /// Registers a callback fired when the node's world position is read and
    /// differs from the last value reported.
    pub fn on_world_position_changed(
        &mut self,
        id: NodeId,
        f: impl FnMut(NodeId, Point) + 'static,
    ) -> ObserverId {
        self.add_observer(id, ObserverKind::WorldPosition(Box::new(f)))
    }

    /// Registers a callback fired once when the node is loaded.
    pub fn on_load(&mut self, id: NodeId, f: impl FnMut(NodeId) + 'static) -> ObserverId {
        self.add_observer(id, ObserverKind::Load(Box::new(f)))
    }

    /// Registers a callback fired when the node is disposed.
    pub fn on_dispose(&mut self, id: NodeId, f: impl FnMut(NodeId) + 'static) -> ObserverId {
        self.add_observer(id, ObserverKind::Dispose(Box::new(f)))
    }

    /// Removes an observer. Returns `false` if it was not registered on the
    /// node.
    pub fn remove_observer(&mut self, id: NodeId, observer: ObserverId) -> bool {
        self.validate(id);
        let list = &mut self.observers[id.idx as usize];
        let before = list.len();
        list.retain(|o| o.id != observer);
        list.len() != before
    }

    /// Returns how many observers are registered on the node.
    #[must_use]
    pub fn observer_count(&self, id: NodeId) -> usize {
        self.validate(id);
        self.observers[id.idx as usize].len()
    }

    pub(crate) fn notify_world_position(&mut self, id: NodeId, position: Point) {
        for observer in &mut self.observers[id.idx as usize] {
            if let ObserverKind::WorldPosition(f) = &mut observer.kind {
                f(id, position);
            }
        }
    }
}

/// Snapshot of the attached flag for a whole scene, for tests.
#[cfg(test)]
fn attached_nodes(scene: &Scene) -> Vec<NodeId> {
    (0..scene.len)
        .filter(|&idx| scene.alive[idx as usize] && scene.attached[idx as usize])
        .map(|idx| scene.id_of(idx))
        .collect()
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::{Cell, RefCell};

    use super::*;

    fn counter() -> (Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let c = Rc::new(Cell::new(0));
        (c.clone(), c)
    }

    #[test]
    fn load_is_idempotent() {
        let mut scene = Scene::new();
        let id = scene.create_node();
        let (count, seen) = counter();
        scene.on_load(id, move |_| seen.set(seen.get() + 1));

        scene.load(id);
        scene.load(id);
        assert_eq!(count.get(), 1);
        assert!(scene.is_loaded(id));
    }

    #[test]
    fn set_root_attaches_and_loads_parents_first() {
        let mut scene = Scene::new();
        let root = scene.create_node();
        let child = scene.create_node();
        scene.add_child(root, child);

        let order = Rc::new(RefCell::new(Vec::new()));
        for node in [root, child] {
            let order = order.clone();
            scene.on_load(node, move |id| order.borrow_mut().push(id));
        }

        scene.set_root(root);
        assert_eq!(*order.borrow(), [root, child]);
        assert_eq!(attached_nodes(&scene), [root, child]);
    }

    #[test]
    fn parenting_under_attached_node_loads_subtree_once() {
        let mut scene = Scene::new();
        let root = scene.create_node();
        scene.set_root(root);

        let branch = scene.create_node();
        let leaf = scene.create_node();
        scene.add_child(branch, leaf);
        let (count, seen) = counter();
        scene.on_load(leaf, move |_| seen.set(seen.get() + 1));
        assert!(!scene.is_loaded(leaf));

        scene.add_child(root, branch);
        assert!(scene.is_attached(leaf));
        assert_eq!(count.get(), 1);

        // Moving it out and back does not reload.
        scene.remove_from_parent(branch);
        assert!(!scene.is_attached(leaf));
        scene.add_child(root, branch);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn dispose_is_recursive_and_fires_observers() {
        let mut scene = Scene::new();
        let parent = scene.create_node();
        let child = scene.create_node();
        let grandchild = scene.create_node();
        scene.add_child(parent, child);
        scene.add_child(child, grandchild);

        let disposed = Rc::new(RefCell::new(Vec::new()));
        for node in [parent, child, grandchild] {
            let disposed = disposed.clone();
            scene.on_dispose(node, move |id| disposed.borrow_mut().push(id));
        }

        scene.dispose(parent);
        assert_eq!(*disposed.borrow(), [parent, child, grandchild]);
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn dispose_without_children_orphans_them() {
        let mut scene = Scene::new();
        let root = scene.create_node();
        let parent = scene.create_node();
        let child = scene.create_node();
        scene.set_root(root);
        scene.add_child(root, parent);
        scene.add_child(parent, child);

        scene.dispose_with(parent, false);
        assert!(scene.is_alive(child));
        assert_eq!(scene.parent(child), None);
        assert!(!scene.is_attached(child));
        assert_eq!(scene.children(root).count(), 0);
    }

    #[test]
    fn dispose_detaches_from_parent() {
        let mut scene = Scene::new();
        let parent = scene.create_node();
        let child = scene.create_node();
        scene.add_child(parent, child);
        scene.dispose(child);
        assert_eq!(scene.children(parent).count(), 0);
    }

    #[test]
    fn disposing_the_root_clears_it() {
        let mut scene = Scene::new();
        let root = scene.create_node();
        scene.set_root(root);
        scene.dispose(root);
        assert_eq!(scene.root(), None);
    }

    #[test]
    fn replacing_the_root_detaches_the_old_one() {
        let mut scene = Scene::new();
        let a = scene.create_node();
        let b = scene.create_node();
        scene.set_root(a);
        scene.set_root(b);
        assert!(!scene.is_attached(a));
        assert!(scene.is_attached(b));
        assert!(scene.is_loaded(a), "loading happens once");
    }

    #[test]
    #[should_panic(expected = "root node cannot have a parent")]
    fn child_cannot_be_root() {
        let mut scene = Scene::new();
        let parent = scene.create_node();
        let child = scene.create_node();
        scene.add_child(parent, child);
        scene.set_root(child);
    }

    #[test]
    fn remove_observer_stops_notifications() {
        let mut scene = Scene::new();
        let id = scene.create_node();
        let (count, seen) = counter();
        let observer = scene.on_load(id, move |_| seen.set(seen.get() + 1));
        assert_eq!(scene.observer_count(id), 1);
        assert!(scene.remove_observer(id, observer));
        assert!(!scene.remove_observer(id, observer));
        scene.load(id);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn dispose_drops_observers() {
        let mut scene = Scene::new();
        let id = scene.create_node();
        let token = Rc::new(());
        let held = token.clone();
        scene.on_load(id, move |_| {
            let _ = &held;
        });
        assert_eq!(Rc::strong_count(&token), 2);
        scene.dispose(id);
        assert_eq!(Rc::strong_count(&token), 1);
    }
}
