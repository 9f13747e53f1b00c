// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immediate-mode render traversal.

use super::id::{INVALID, NodeId};
use super::store::{NodeFlags, Scene};
use crate::backend::DrawingSurface;
use crate::paint::PaintContext;
use crate::trace::{PhaseBeginEvent, PhaseEndEvent, PhaseKind};

impl Scene {
    /// Draws the root subtree into `surface`, back to front.
    ///
    /// Inactive or invisible subtrees, and subtrees whose world opacity is
    /// zero, are skipped. Each drawn node is bracketed by `save`/`restore`;
    /// clipping nodes clip their children to their draw rectangle. The
    /// children of [`ISOLATE`](NodeFlags::ISOLATE) nodes are not drawn here,
    /// see [`render_isolated`](Self::render_isolated).
    pub fn render(&mut self, surface: &mut dyn DrawingSurface) {
        if self.root == INVALID {
            return;
        }
        self.phase_begin(PhaseKind::Render);
        self.render_node(self.root, surface);
        self.phase_end(PhaseKind::Render);
    }

    /// Draws the children of an isolated node into `surface`, typically an
    /// offscreen layer the node presents with a
    /// [`Surface`](crate::paint::Surface) paint.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn render_isolated(&mut self, id: NodeId, surface: &mut dyn DrawingSurface) {
        self.validate(id);
        let i = id.idx as usize;
        for k in 0..self.children[i].len() {
            let c = self.children[i][k];
            self.render_node(c, surface);
        }
    }

    fn render_node(&mut self, idx: u32, surface: &mut dyn DrawingSurface) {
        let i = idx as usize;
        let flags = self.flags[i];
        if !flags.contains(NodeFlags::ACTIVE | NodeFlags::VISIBLE) {
            return;
        }
        self.resolve_matrix(idx);
        self.resolve_opacity(idx);
        let derived = self.derived[i];
        if derived.world_opacity <= 0.0 {
            return;
        }

        surface.save();
        surface.set_matrix(derived.matrix);
        if let Some(paint) = self.paint[i].as_deref() {
            let mut cx = PaintContext::new(
                &mut *surface,
                derived.draw_size,
                derived.world_opacity,
                self.fonts.as_deref(),
            );
            paint.paint(&mut cx);
        }
        if !flags.contains(NodeFlags::ISOLATE) {
            if flags.contains(NodeFlags::CLIP_CHILDREN) {
                surface.clip_rect(derived.draw_size.to_rect());
            }
            for k in 0..self.children[i].len() {
                let c = self.children[i][k];
                self.render_node(c, surface);
            }
        }
        surface.restore();
    }

    pub(crate) fn phase_begin(&mut self, phase: PhaseKind) {
        let (frame_index, time) = (self.frame_index, self.time);
        self.tracer().phase_begin(&PhaseBeginEvent {
            frame_index,
            phase,
            time,
        });
    }

    pub(crate) fn phase_end(&mut self, phase: PhaseKind) {
        let (frame_index, time) = (self.frame_index, self.time);
        self.tracer().phase_end(&PhaseEndEvent {
            frame_index,
            phase,
            time,
        });
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use kurbo::{Affine, Point, Rect, Size};

    use super::*;
    use crate::backend::testing::{DrawCall, RecordingSurface};
    use crate::backend::LayerHandle;
    use crate::paint::{Fill, Rgba, Surface, Text};

    fn filled(scene: &mut Scene, size: f64) -> NodeId {
        let id = scene.create_node();
        scene.set_size(id, Size::new(size, size));
        scene.set_paint(id, Some(Box::new(Fill::new(Rgba::WHITE))));
        id
    }

    #[test]
    fn renders_back_to_front_with_matrices() {
        let mut scene = Scene::new();
        let root = filled(&mut scene, 100.0);
        let child = filled(&mut scene, 10.0);
        scene.set_root(root);
        scene.add_child(root, child);
        scene.set_position(child, Point::new(5.0, 5.0));

        let mut surface = RecordingSurface::default();
        scene.render(&mut surface);
        assert_eq!(
            surface.calls,
            [
                DrawCall::Save,
                DrawCall::SetMatrix(Affine::IDENTITY),
                DrawCall::FillRect(Rect::new(0.0, 0.0, 100.0, 100.0), 1.0),
                DrawCall::Save,
                DrawCall::SetMatrix(Affine::translate((5.0, 5.0))),
                DrawCall::FillRect(Rect::new(0.0, 0.0, 10.0, 10.0), 1.0),
                DrawCall::Restore,
                DrawCall::Restore,
            ]
        );
    }

    #[test]
    fn invisible_and_transparent_subtrees_are_skipped() {
        let mut scene = Scene::new();
        let root = filled(&mut scene, 100.0);
        let hidden = filled(&mut scene, 10.0);
        let faded = filled(&mut scene, 10.0);
        let grandchild = filled(&mut scene, 5.0);
        scene.set_root(root);
        scene.add_children(root, &[hidden, faded]);
        scene.add_child(hidden, grandchild);
        scene.set_visible(hidden, false);
        scene.set_opacity(faded, 0.0);

        let mut surface = RecordingSurface::default();
        scene.render(&mut surface);
        assert_eq!(surface.fills(), [Rect::new(0.0, 0.0, 100.0, 100.0)]);
    }

    #[test]
    fn clipping_node_clips_children() {
        let mut scene = Scene::new();
        let root = filled(&mut scene, 50.0);
        let child = filled(&mut scene, 80.0);
        scene.set_root(root);
        scene.add_child(root, child);
        scene.set_clip_children(root, true);

        let mut surface = RecordingSurface::default();
        scene.render(&mut surface);
        assert!(
            surface
                .calls
                .contains(&DrawCall::Clip(Rect::new(0.0, 0.0, 50.0, 50.0)))
        );
    }

    #[test]
    fn text_without_font_renders_nothing() {
        let mut scene = Scene::new();
        let root = scene.create_node();
        scene.set_paint(root, Some(Box::new(Text::new("hi"))));
        scene.set_root(root);

        let mut surface = RecordingSurface::default();
        scene.render(&mut surface);
        assert_eq!(
            surface.calls,
            [
                DrawCall::Save,
                DrawCall::SetMatrix(Affine::IDENTITY),
                DrawCall::Restore
            ]
        );
    }

    #[test]
    fn isolated_children_render_separately() {
        let mut scene = Scene::new();
        let root = scene.create_node();
        let panel = scene.create_node();
        let inner = filled(&mut scene, 4.0);
        scene.set_root(root);
        scene.add_child(root, panel);
        scene.add_child(panel, inner);
        scene.set_size(panel, Size::new(20.0, 20.0));
        scene.set_position(panel, Point::new(30.0, 0.0));
        scene.set_isolated(panel, true);
        scene.set_paint(
            panel,
            Some(Box::new(Surface {
                layer: Some(LayerHandle(1)),
            })),
        );

        let mut main = RecordingSurface::default();
        scene.render(&mut main);
        assert!(main.fills().is_empty(), "isolated children stay offscreen");
        assert!(
            main.calls
                .contains(&DrawCall::Layer(LayerHandle(1), Rect::new(0.0, 0.0, 20.0, 20.0)))
        );

        let mut offscreen = RecordingSurface::default();
        scene.render_isolated(panel, &mut offscreen);
        assert_eq!(offscreen.fills(), [Rect::new(0.0, 0.0, 4.0, 4.0)]);
        assert!(offscreen.calls.contains(&DrawCall::SetMatrix(Affine::IDENTITY)));
    }

    #[test]
    fn render_without_root_is_a_no_op() {
        let mut scene = Scene::new();
        let _ = filled(&mut scene, 1.0);
        let mut surface = RecordingSurface::default();
        scene.render(&mut surface);
        assert!(surface.calls.is_empty());
    }
}
