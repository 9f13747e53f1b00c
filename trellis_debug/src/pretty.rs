// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Scene times
//! are printed in milliseconds.

use std::io::Write;

use trellis_core::input::PointerSource;
use trellis_core::node::NodeId;
use trellis_core::trace::{
    FocusChangeEvent, FrameBeginEvent, FrameSummary, InputDispatchEvent, InvalidationEvent,
    PhaseBeginEvent, PhaseEndEvent, PhaseKind, SequenceEvent, SequenceEventKind, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    show_invalidations: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("show_invalidations", &self.show_invalidations)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            show_invalidations: false,
        }
    }

    /// Also prints one line per node invalidation. Off by default; these are
    /// by far the most frequent events.
    #[must_use]
    pub fn with_invalidations(mut self, show: bool) -> Self {
        self.show_invalidations = show;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn phase_name(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::Animate => "animate",
        PhaseKind::Layout => "layout",
        PhaseKind::Hover => "hover",
        PhaseKind::Evaluate => "eval",
        PhaseKind::Render => "render",
    }
}

fn node(id: NodeId) -> String {
    format!("#{}.{}", id.index(), id.generation())
}

fn pointer(source: Option<PointerSource>) -> String {
    match source {
        Some(PointerSource::Mouse) => "mouse".into(),
        Some(PointerSource::Touch(id)) => format!("touch{id}"),
        None => "-".into(),
    }
}

fn ms(seconds: f64) -> f64 {
    seconds * 1000.0
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] frame={} delta={:.1}ms time={:.1}ms",
            e.frame_index,
            ms(e.delta),
            ms(e.time),
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {}",
            e.frame_index,
            phase_name(e.phase),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {}",
            e.frame_index,
            phase_name(e.phase),
        );
    }

    fn on_input(&mut self, e: &InputDispatchEvent) {
        let consumed = if e.consumed { "consumed" } else { "passed" };
        let _ = writeln!(
            self.writer,
            "[input] {:?} pointer={} target={} {consumed}",
            e.kind,
            pointer(e.pointer),
            node(e.target),
        );
    }

    fn on_focus_change(&mut self, e: &FocusChangeEvent) {
        let name = |id: Option<NodeId>| id.map_or_else(|| "none".into(), node);
        let _ = writeln!(
            self.writer,
            "[focus] {} -> {}",
            name(e.previous),
            name(e.next),
        );
    }

    fn on_sequence(&mut self, e: &SequenceEvent) {
        let what = match e.kind {
            SequenceEventKind::Looped { overtime } => {
                format!("looped overtime={:.1}ms", ms(overtime))
            }
            SequenceEventKind::Completed => "completed".into(),
            SequenceEventKind::Stopped => "stopped".into(),
        };
        let _ = writeln!(
            self.writer,
            "[sequence] frame={} node={} seq={} {what}",
            e.frame_index,
            node(e.node),
            e.sequence.get(),
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] frame={} sequences={}/{} layout_passes={} layouts={} rehover={}",
            s.frame_index,
            s.sequences_finished,
            s.sequences_advanced,
            s.layout_passes,
            s.layouts_run,
            s.rehovered,
        );
    }

    fn on_invalidation(&mut self, e: &InvalidationEvent) {
        if self.show_invalidations {
            let _ = writeln!(
                self.writer,
                "[invalidate] node=#{} {:?}",
                e.node_index, e.flags,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;
    use trellis_core::animation::Easing;
    use trellis_core::node::Scene;

    use super::*;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn pretty_print_frame_begin() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame_begin(&FrameBeginEvent {
            frame_index: 1,
            delta: 0.016,
            time: 0.016,
        });
        let output = output(sink);
        assert!(output.contains("[frame]"), "got: {output}");
        assert!(output.contains("frame=1"), "got: {output}");
        assert!(output.contains("delta=16.0ms"), "got: {output}");
    }

    #[test]
    fn invalidations_are_hidden_by_default() {
        let event = InvalidationEvent {
            node_index: 3,
            flags: trellis_core::invalidation::Invalidation::OPACITY,
        };
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_invalidation(&event);
        assert!(output(sink).is_empty());

        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new()).with_invalidations(true);
        sink.on_invalidation(&event);
        assert!(output(sink).contains("node=#3"));
    }

    /// Shares the written bytes with the test after the scene takes the sink.
    #[derive(Clone, Default)]
    struct Shared(std::rc::Rc<std::cell::RefCell<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn scene_update_is_printed() {
        let shared = Shared::default();
        let mut scene = Scene::new();
        let _ = scene.set_trace_sink(Some(Box::new(PrettyPrintSink::with_writer(
            shared.clone(),
        ))));
        let root = scene.create_node();
        scene.set_root(root);
        scene.animate(root, |a| {
            a.move_to(Point::new(10.0, 0.0), 0.5, Easing::Linear);
        });
        scene.update(0.5);

        let text = String::from_utf8(shared.0.borrow().clone()).unwrap();
        assert!(text.contains("[phase:begin] frame=1 animate"), "got: {text}");
        assert!(text.contains("completed"), "got: {text}");
        assert!(text.contains("[summary] frame=1 sequences=1/1"), "got: {text}");
    }
}
