// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame driver.

use super::id::INVALID;
use super::store::{Axes, Scene};
use crate::invalidation::Invalidation;
use crate::trace::{FrameBeginEvent, FrameSummary, FrameSummaryBuilder, PhaseKind};

impl Scene {
    /// Advances the scene by `delta` seconds. Call once per host frame,
    /// before [`evaluate`](Self::evaluate) and [`render`](Self::render).
    ///
    /// Runs, in order:
    ///
    /// 1. **Animate**: every node's sequences advance by `delta`.
    /// 2. **Layout**: intrinsic sizes are re-measured and layout capabilities
    ///    run for nodes whose [`LAYOUT`](Invalidation::LAYOUT) bit is set,
    ///    descendants before ancestors, for at most
    ///    [`max_layout_passes`](crate::config::SceneConfig::max_layout_passes)
    ///    passes.
    /// 3. **Hover**: when enabled in the config, the hover pass re-runs at
    ///    the last mouse position so nodes that moved under a still cursor
    ///    receive enter and leave.
    pub fn update(&mut self, delta: f64) -> FrameSummary {
        self.frame_index += 1;
        self.time += delta;
        let begin = FrameBeginEvent {
            frame_index: self.frame_index,
            delta,
            time: self.time,
        };
        self.tracer().frame_begin(&begin);
        let mut summary = FrameSummaryBuilder::new(&begin);

        self.phase_begin(PhaseKind::Animate);
        let (advanced, finished) = self.advance_sequences(delta);
        summary.record_sequences(advanced, finished);
        self.phase_end(PhaseKind::Animate);

        self.phase_begin(PhaseKind::Layout);
        self.run_layout(&mut summary);
        self.phase_end(PhaseKind::Layout);

        if self.config.rehover_on_update
            && let Some(position) = self.input.mouse_position
        {
            self.phase_begin(PhaseKind::Hover);
            self.update_hover(position, false);
            summary.record_rehover();
            self.phase_end(PhaseKind::Hover);
        }

        let summary = summary.finish();
        self.tracer().frame_summary(&summary);
        summary
    }

    fn run_layout(&mut self, summary: &mut FrameSummaryBuilder) {
        if self.root == INVALID {
            return;
        }
        for _ in 0..self.config.max_layout_passes {
            let mut pending = false;
            let mut ran = 0;
            for idx in self.subtree(self.root).into_iter().rev() {
                let i = idx as usize;
                if !self.alive[i] || !self.invalid[i].contains(Invalidation::LAYOUT) {
                    continue;
                }
                pending = true;
                self.invalid[i].validate(Invalidation::LAYOUT);
                self.apply_intrinsic_size(idx);

                if let Some(mut layout) = self.layout[i].take() {
                    let node = self.id_of(idx);
                    layout.layout(self, node);
                    ran += 1;
                    if self.is_alive(node) && self.layout[i].is_none() {
                        self.layout[i] = Some(layout);
                    }
                }
            }
            if !pending {
                break;
            }
            summary.record_layout_pass(ran);
        }
    }

    /// Sizes the axes that are neither relative nor child-relative from the
    /// paint capability's measurement, if it has one.
    fn apply_intrinsic_size(&mut self, idx: u32) {
        let i = idx as usize;
        let Some(measured) = self.paint[i]
            .as_deref()
            .and_then(|paint| paint.measure(self.fonts.as_deref()))
        else {
            return;
        };
        let props = self.props[i];
        let sized = props.relative_axes | props.child_relative_axes;
        let mut size = props.size;
        if !sized.contains(Axes::X) {
            size.width = measured.width;
        }
        if !sized.contains(Axes::Y) {
            size.height = measured.height;
        }
        if size != props.size {
            self.props[i].size = size;
            self.size_changed(idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use kurbo::{Point, Size};

    use super::*;
    use crate::backend::FontHandle;
    use crate::backend::testing::MonoFont;
    use crate::config::SceneConfig;
    use crate::layout::Layout;
    use crate::node::NodeId;
    use crate::paint::Text;
    use crate::trace::{PhaseBeginEvent, TraceSink};

    #[test]
    fn update_advances_clock_and_frame_index() {
        let mut scene = Scene::new();
        let summary = scene.update(0.25);
        scene.update(0.25);
        assert_eq!(summary.frame_index, 1);
        assert_eq!(scene.frame_index(), 2);
        assert!((scene.time() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn text_nodes_size_themselves_from_the_measurer() {
        let mut scene = Scene::new();
        let root = scene.create_node();
        scene.set_root(root);
        let label = scene.create_node();
        scene.add_child(root, label);
        scene.set_paint(
            label,
            Some(Box::new(
                Text::new("hello").with_font(FontHandle(0)).with_font_size(10.0),
            )),
        );

        scene.update(0.0);
        assert_eq!(scene.size(label), Size::ZERO, "no measurer installed");

        scene.set_font_measure(Some(Box::new(MonoFont)));
        scene.update(0.0);
        assert_eq!(scene.draw_size(label), Size::new(25.0, 10.0));
    }

    #[test]
    fn relative_axes_keep_their_size() {
        let mut scene = Scene::new();
        scene.set_font_measure(Some(Box::new(MonoFont)));
        let root = scene.create_node();
        scene.set_size(root, Size::new(200.0, 200.0));
        scene.set_root(root);
        let label = scene.create_node();
        scene.add_child(root, label);
        scene.set_relative_size_axes(label, Axes::X);
        scene.set_size(label, Size::new(0.5, 0.0));
        scene.set_paint(
            label,
            Some(Box::new(Text::new("ab").with_font(FontHandle(0)).with_font_size(8.0))),
        );

        scene.update(0.0);
        assert_eq!(scene.draw_size(label), Size::new(100.0, 8.0));
    }

    /// Grows its node by one unit every time it runs.
    struct Grow;

    impl Layout for Grow {
        fn layout(&mut self, scene: &mut Scene, node: NodeId) {
            let size = scene.size(node);
            scene.set_size(node, Size::new(size.width + 1.0, size.height));
            scene.invalidate(node, Invalidation::LAYOUT);
        }
    }

    #[test]
    fn layout_passes_are_bounded() {
        let mut scene = Scene::with_config(SceneConfig {
            max_layout_passes: 3,
            ..SceneConfig::default()
        });
        let root = scene.create_node();
        scene.set_root(root);
        scene.set_layout(root, Some(Box::new(Grow)));

        let summary = scene.update(0.0);
        assert_eq!(summary.layout_passes, 3);
        assert_eq!(summary.layouts_run, 3);
        assert_eq!(scene.size(root).width, 3.0);
    }

    #[test]
    fn layout_runs_only_when_invalidated() {
        let mut scene = Scene::new();
        let root = scene.create_node();
        let child = scene.create_node();
        scene.set_root(root);
        scene.add_child(root, child);
        scene.set_layout(
            root,
            Some(Box::new(crate::layout::StackLayout::new(
                crate::layout::Direction::Vertical,
            ))),
        );
        assert_eq!(scene.update(0.0).layouts_run, 1);
        assert_eq!(scene.update(0.0).layouts_run, 0);

        scene.set_size(child, Size::new(5.0, 5.0));
        assert_eq!(scene.update(0.0).layouts_run, 1);
        assert_eq!(scene.position(child), Point::ORIGIN);
    }

    #[derive(Default)]
    struct Phases(Rc<RefCell<Vec<PhaseKind>>>);

    impl TraceSink for Phases {
        fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
            self.0.borrow_mut().push(e.phase);
        }
    }

    #[test]
    #[cfg_attr(not(feature = "trace"), ignore = "requires the trace feature")]
    fn phases_run_in_order() {
        let phases = Rc::new(RefCell::new(Vec::new()));
        let mut scene = Scene::new();
        let _ = scene.set_trace_sink(Some(Box::new(Phases(phases.clone()))));
        let root = scene.create_node();
        scene.set_root(root);

        scene.update(0.0);
        assert_eq!(*phases.borrow(), [PhaseKind::Animate, PhaseKind::Layout]);

        scene.mouse_move(Point::new(1.0, 1.0));
        phases.borrow_mut().clear();
        let summary = scene.update(0.0);
        assert!(summary.rehovered);
        assert_eq!(
            *phases.borrow(),
            [PhaseKind::Animate, PhaseKind::Layout, PhaseKind::Hover]
        );
    }
}
