// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage evaluation for incremental presenters.
//!
//! Geometry is resolved lazily on read, so evaluation does not drive
//! recomputation on its own. Instead it drains the damage channels and makes
//! sure every reported node has current cached values:
//!
//! 1. **PAINT**: Drain affected indices (marks propagate eagerly to
//!    descendants), then resolve each node's world matrix, draw size and
//!    world opacity so that the `*_at()` accessors are current.
//! 2. **CONTENT**: Drain dirty indices (no recomputation; presenters read
//!    paint state directly from the scene).
//! 3. **TOPOLOGY**: Drain and record whether anything structural happened.
//!
//! [`FrameChanges`] uses raw slot indices (`u32`) so that presenters can index
//! straight into the scene's arrays via
//! [`matrix_at`](Scene::matrix_at) and friends without generation checks.

use alloc::vec::Vec;

use super::store::Scene;
use crate::dirty;

/// The set of changes produced by a single [`Scene::evaluate`] call.
#[derive(Clone, Debug, Default)]
pub struct FrameChanges {
    /// Nodes whose placement, size, opacity or flags changed.
    pub repaint: Vec<u32>,
    /// Nodes whose paint capability changed.
    pub content: Vec<u32>,
    /// Nodes created since the last evaluate.
    pub added: Vec<u32>,
    /// Nodes disposed since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether any node was created, disposed or reparented.
    pub topology_changed: bool,
}

impl FrameChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.repaint.clear();
        self.content.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repaint.is_empty()
            && self.content.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.topology_changed
    }
}

impl Scene {
    /// Drains the damage accumulated since the last call and returns it.
    pub fn evaluate(&mut self) -> FrameChanges {
        let mut changes = FrameChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut FrameChanges) {
        changes.clear();

        // Drain PAINT channel, then bring cached values up to date.
        let repaint: Vec<u32> = self
            .damage
            .drain(dirty::PAINT)
            .affected()
            .deterministic()
            .run()
            .collect();
        for &idx in &repaint {
            if !self.alive[idx as usize] {
                continue;
            }
            self.resolve_matrix(idx);
            self.resolve_opacity(idx);
        }
        changes.repaint = repaint;

        // Drain CONTENT channel.
        changes.content = self
            .damage
            .drain(dirty::CONTENT)
            .deterministic()
            .run()
            .collect();

        // Drain TOPOLOGY channel (only its presence matters).
        let topology: Vec<u32> = self
            .damage
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
        changes.topology_changed = !topology.is_empty();

        // Move lifecycle lists.
        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Affine, Point, Size};

    use super::*;

    #[test]
    fn evaluate_reports_new_nodes_once() {
        let mut scene = Scene::new();
        let id = scene.create_node();

        let changes = scene.evaluate();
        assert!(changes.added.contains(&id.idx));
        assert!(changes.repaint.contains(&id.idx));
        assert!(changes.topology_changed);

        let changes = scene.evaluate();
        assert!(changes.is_empty(), "second evaluate has nothing to report");
    }

    #[test]
    fn evaluate_resolves_cached_matrices() {
        let mut scene = Scene::new();
        let parent = scene.create_node();
        let child = scene.create_node();
        scene.add_child(parent, child);
        let _ = scene.evaluate();

        scene.set_position(parent, Point::new(10.0, 5.0));
        let changes = scene.evaluate();
        assert!(changes.repaint.contains(&parent.idx));
        assert!(
            changes.repaint.contains(&child.idx),
            "placement damage reaches descendants"
        );
        assert_eq!(
            scene.matrix_at(child.idx),
            Affine::translate((10.0, 5.0))
        );
    }

    #[test]
    fn evaluate_resolves_world_opacity() {
        let mut scene = Scene::new();
        let parent = scene.create_node();
        let child = scene.create_node();
        scene.add_child(parent, child);
        scene.set_opacity(parent, 0.5);
        scene.set_opacity(child, 0.5);
        let _ = scene.evaluate();
        assert!((scene.world_opacity_at(child.idx) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn paint_changes_are_content_damage() {
        use crate::paint::{Fill, Rgba};
        use alloc::boxed::Box;

        let mut scene = Scene::new();
        let id = scene.create_node();
        let _ = scene.evaluate();

        scene.set_paint(id, Some(Box::new(Fill::new(Rgba::WHITE))));
        let changes = scene.evaluate();
        assert_eq!(changes.content, [id.idx]);
        assert!(changes.repaint.is_empty());
    }

    #[test]
    fn dispose_is_reported_as_removed() {
        let mut scene = Scene::new();
        let id = scene.create_node();
        scene.set_size(id, Size::new(4.0, 4.0));
        let _ = scene.evaluate();

        scene.dispose(id);
        let changes = scene.evaluate();
        assert_eq!(changes.removed, [id.idx]);
        assert!(changes.added.is_empty());
        assert!(!changes.repaint.contains(&id.idx));
    }

    #[test]
    fn evaluate_into_reuses_buffer() {
        let mut scene = Scene::new();
        let a = scene.create_node();
        let b = scene.create_node();

        let mut changes = FrameChanges::default();
        scene.evaluate_into(&mut changes);
        assert_eq!(changes.added.len(), 2);

        scene.set_opacity(a, 0.5);
        scene.evaluate_into(&mut changes);
        assert!(changes.added.is_empty(), "added should be cleared");
        assert!(changes.repaint.contains(&a.idx));
        assert!(!changes.repaint.contains(&b.idx));
    }
}
