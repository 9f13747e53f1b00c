// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`ChromeTraceSink`] collects scene events as they happen and
//! [`write_to`](ChromeTraceSink::write_to) writes them as
//! [Chrome Trace Event Format][spec] JSON.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use trellis_core::node::NodeId;
use trellis_core::trace::{
    FocusChangeEvent, FrameBeginEvent, FrameSummary, InputDispatchEvent, InvalidationEvent,
    PhaseBeginEvent, PhaseEndEvent, SequenceEvent, SequenceEventKind, TraceSink,
};

/// Collects trace events as Chrome Trace Event Format objects.
///
/// Timestamps are scene time in microseconds. Input and focus events happen
/// between updates and are stamped with the time of the latest update.
/// Load the output into `chrome://tracing` or
/// [Perfetto](https://ui.perfetto.dev/).
#[derive(Debug, Default)]
pub struct ChromeTraceSink {
    events: Vec<Value>,
    now_us: f64,
    invalidations: bool,
}

impl ChromeTraceSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also records per-node invalidations as instant events.
    #[must_use]
    pub fn with_invalidations(mut self, record: bool) -> Self {
        self.invalidations = record;
        self
    }

    /// The events collected so far.
    #[must_use]
    pub fn events(&self) -> &[Value] {
        &self.events
    }

    /// Writes the collected events as a JSON array.
    pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, &self.events)?;
        Ok(())
    }

    fn instant(&mut self, name: &str, cat: &str, args: Value) {
        self.events.push(json!({
            "ph": "i",
            "name": name,
            "cat": cat,
            "ts": self.now_us,
            "pid": 0,
            "tid": 0,
            "s": "t",
            "args": args,
        }));
    }
}

fn seconds_to_us(seconds: f64) -> f64 {
    seconds * 1_000_000.0
}

fn node(id: NodeId) -> Value {
    json!([id.index(), id.generation()])
}

impl TraceSink for ChromeTraceSink {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.now_us = seconds_to_us(e.time);
        self.instant(
            "FrameBegin",
            "Frame",
            json!({
                "frame_index": e.frame_index,
                "delta_us": seconds_to_us(e.delta),
            }),
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.now_us = seconds_to_us(e.time);
        self.events.push(json!({
            "ph": "B",
            "name": format!("{:?}", e.phase),
            "cat": "Frame",
            "ts": self.now_us,
            "pid": 0,
            "tid": 0,
            "args": {
                "frame_index": e.frame_index,
            }
        }));
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.now_us = seconds_to_us(e.time);
        self.events.push(json!({
            "ph": "E",
            "name": format!("{:?}", e.phase),
            "cat": "Frame",
            "ts": self.now_us,
            "pid": 0,
            "tid": 0,
            "args": {
                "frame_index": e.frame_index,
            }
        }));
    }

    fn on_input(&mut self, e: &InputDispatchEvent) {
        self.instant(
            &format!("{:?}", e.kind),
            "Input",
            json!({
                "pointer": e.pointer.map(|p| format!("{p:?}")),
                "target": node(e.target),
                "consumed": e.consumed,
            }),
        );
    }

    fn on_focus_change(&mut self, e: &FocusChangeEvent) {
        self.instant(
            "FocusChange",
            "Input",
            json!({
                "previous": e.previous.map(node),
                "next": e.next.map(node),
            }),
        );
    }

    fn on_sequence(&mut self, e: &SequenceEvent) {
        let (name, overtime_us) = match e.kind {
            SequenceEventKind::Looped { overtime } => ("SequenceLooped", seconds_to_us(overtime)),
            SequenceEventKind::Completed => ("SequenceCompleted", 0.0),
            SequenceEventKind::Stopped => ("SequenceStopped", 0.0),
        };
        self.instant(
            name,
            "Animation",
            json!({
                "frame_index": e.frame_index,
                "node": node(e.node),
                "sequence": e.sequence.get(),
                "overtime_us": overtime_us,
            }),
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.now_us = seconds_to_us(s.time);
        self.instant(
            "FrameSummary",
            "Summary",
            json!({
                "frame_index": s.frame_index,
                "sequences_advanced": s.sequences_advanced,
                "sequences_finished": s.sequences_finished,
                "layout_passes": s.layout_passes,
                "layouts_run": s.layouts_run,
                "rehovered": s.rehovered,
            }),
        );
    }

    fn on_invalidation(&mut self, e: &InvalidationEvent) {
        if self.invalidations {
            self.instant(
                "Invalidate",
                "Rich",
                json!({
                    "node_index": e.node_index,
                    "flags": format!("{:?}", e.flags),
                }),
            );
        }
    }
}
