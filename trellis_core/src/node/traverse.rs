// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use alloc::vec::Vec;

use super::id::{INVALID, NodeId};
use super::store::Scene;

/// An iterator over the direct children of a node, in z-order (back to
/// front).
///
/// Created by [`Scene::children`] and [`Scene::structural_children`].
#[derive(Debug)]
pub struct Children<'a> {
    scene: &'a Scene,
    slots: core::slice::Iter<'a, u32>,
}

impl<'a> Children<'a> {
    pub(crate) fn new(scene: &'a Scene, idx: u32) -> Self {
        Self {
            scene,
            slots: scene.children[idx as usize].iter(),
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let idx = *self.slots.next()?;
        Some(NodeId {
            idx,
            generation: self.scene.generation[idx as usize],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<NodeId> {
        let idx = *self.slots.next_back()?;
        Some(NodeId {
            idx,
            generation: self.scene.generation[idx as usize],
        })
    }
}

impl ExactSizeIterator for Children<'_> {}

impl Scene {
    /// Collects the subtree rooted at `idx` in depth-first pre-order.
    pub(crate) fn subtree(&self, idx: u32) -> Vec<u32> {
        let mut out = Vec::new();
        let mut stack = Vec::from([idx]);
        while let Some(next) = stack.pop() {
            out.push(next);
            // Reverse so the first child is visited first.
            stack.extend(self.children[next as usize].iter().rev());
        }
        out
    }

    /// Returns the nodes of the subtree rooted at `id` in depth-first
    /// pre-order, `id` first.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.validate(id);
        self.subtree(id.idx)
            .into_iter()
            .map(|idx| self.id_of(idx))
            .collect()
    }

    /// Returns the root-level nodes (those with no parent).
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        (0..self.len)
            .filter(|&idx| self.alive[idx as usize] && self.parent[idx as usize] == INVALID)
            .map(|idx| self.id_of(idx))
            .collect()
    }
}
