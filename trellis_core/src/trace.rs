// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the scene.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! scene calls while updating, dispatching input and rendering. All method
//! bodies default to no-ops, so implementing only the events you care about is
//! fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`FrameSummaryBuilder`] collects counters during an
//! [`update`](crate::node::Scene::update) and produces a [`FrameSummary`] at
//! the end.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`InvalidationEvent`] and the
//!   corresponding `TraceSink` method.

use crate::animation::SequenceId;
use crate::input::PointerSource;
#[cfg(feature = "trace-rich")]
use crate::invalidation::Invalidation;
use crate::node::NodeId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of a scene update is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Advancing transform sequences.
    Animate,
    /// Running layout capabilities and intrinsic sizing.
    Layout,
    /// Re-running the hover pass at the last pointer position.
    Hover,
    /// Draining damage channels.
    Evaluate,
    /// Walking the tree into a drawing surface.
    Render,
}

/// Which kind of input was dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// Pointer moved.
    Move,
    /// Pointer entered a node.
    Enter,
    /// Pointer left a node.
    Leave,
    /// Button or touch went down.
    Down,
    /// Button or touch went up.
    Up,
    /// Down and up both landed inside the node.
    Press,
    /// Up landed outside the node that received the down.
    PressDodge,
    /// Scroll wheel.
    Scroll,
    /// Key pressed.
    KeyDown,
    /// Key released.
    KeyUp,
    /// Committed text.
    Text,
    /// Caret or selection moved.
    Caret,
}

/// What happened to a transform sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SequenceEventKind {
    /// A loop sentinel fired, carrying this much overtime into the next
    /// iteration.
    Looped {
        /// Time past the sentinel that was carried over.
        overtime: f64,
    },
    /// The sequence finished and was dropped.
    Completed,
    /// The sequence was discarded by a stop request.
    Stopped,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted at the start of [`Scene::update`](crate::node::Scene::update).
#[derive(Clone, Copy, Debug)]
pub struct FrameBeginEvent {
    /// Monotonic update counter.
    pub frame_index: u64,
    /// Seconds advanced by this update.
    pub delta: f64,
    /// Scene time after advancing.
    pub time: f64,
}

/// Marks the beginning of an update phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Update counter.
    pub frame_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
    /// Scene time.
    pub time: f64,
}

/// Marks the end of an update phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Update counter.
    pub frame_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
    /// Scene time.
    pub time: f64,
}

/// Emitted once per handler invocation during input dispatch.
#[derive(Clone, Copy, Debug)]
pub struct InputDispatchEvent {
    /// What was dispatched.
    pub kind: InputKind,
    /// Pointer that produced the event, for pointer events.
    pub pointer: Option<PointerSource>,
    /// Node whose handler was invoked.
    pub target: NodeId,
    /// Whether the handler reported the event as consumed.
    pub consumed: bool,
}

/// Emitted when keyboard focus moves.
#[derive(Clone, Copy, Debug)]
pub struct FocusChangeEvent {
    /// Previously focused node.
    pub previous: Option<NodeId>,
    /// Newly focused node.
    pub next: Option<NodeId>,
}

/// Emitted when a node's transform sequence loops, completes or is stopped.
#[derive(Clone, Copy, Debug)]
pub struct SequenceEvent {
    /// Update counter.
    pub frame_index: u64,
    /// Node that owns the sequence.
    pub node: NodeId,
    /// The sequence.
    pub sequence: SequenceId,
    /// What happened.
    pub kind: SequenceEventKind,
}

/// Per-update summary produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSummary {
    /// Update counter.
    pub frame_index: u64,
    /// Scene time at the end of the update.
    pub time: f64,
    /// Number of sequences advanced.
    pub sequences_advanced: u32,
    /// Number of sequences that finished.
    pub sequences_finished: u32,
    /// Number of layout passes run.
    pub layout_passes: u32,
    /// Number of nodes whose layout capability ran.
    pub layouts_run: u32,
    /// Whether the hover pass ran.
    pub rehovered: bool,
}

/// A single node invalidation.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct InvalidationEvent {
    /// Slot index of the invalidated node.
    pub node_index: u32,
    /// Bits that were newly set.
    pub flags: Invalidation,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the scene.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called at the start of an update.
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        _ = e;
    }

    /// Called at the beginning of an update phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of an update phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called for each input handler invocation.
    fn on_input(&mut self, e: &InputDispatchEvent) {
        _ = e;
    }

    /// Called when focus moves.
    fn on_focus_change(&mut self, e: &FocusChangeEvent) {
        _ = e;
    }

    /// Called when a node's sequence loops, completes or is stopped.
    fn on_sequence(&mut self, e: &SequenceEvent) {
        _ = e;
    }

    /// Called with a per-update summary.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }

    /// Called when a node's invalidation bits change (requires `trace-rich`
    /// feature).
    #[cfg(feature = "trace-rich")]
    fn on_invalidation(&mut self, e: &InvalidationEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameBeginEvent`].
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`InputDispatchEvent`].
    #[inline]
    pub fn input(&mut self, e: &InputDispatchEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_input(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FocusChangeEvent`].
    #[inline]
    pub fn focus_change(&mut self, e: &FocusChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_focus_change(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SequenceEvent`].
    #[inline]
    pub fn sequence(&mut self, e: &SequenceEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_sequence(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_frame_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits an [`InvalidationEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn invalidation(&mut self, e: &InvalidationEvent) {
        if let Some(s) = &mut self.sink {
            s.on_invalidation(e);
        }
    }
}

// ---------------------------------------------------------------------------
// FrameSummaryBuilder
// ---------------------------------------------------------------------------

/// Accumulates counters during an update and produces a [`FrameSummary`].
#[derive(Clone, Copy, Debug)]
pub struct FrameSummaryBuilder {
    frame_index: u64,
    time: f64,
    sequences_advanced: u32,
    sequences_finished: u32,
    layout_passes: u32,
    layouts_run: u32,
    rehovered: bool,
}

impl FrameSummaryBuilder {
    /// Starts a summary for the given update.
    #[must_use]
    pub fn new(e: &FrameBeginEvent) -> Self {
        Self {
            frame_index: e.frame_index,
            time: e.time,
            sequences_advanced: 0,
            sequences_finished: 0,
            layout_passes: 0,
            layouts_run: 0,
            rehovered: false,
        }
    }

    /// Records that `advanced` sequences were updated and `finished` of them
    /// completed.
    pub fn record_sequences(&mut self, advanced: u32, finished: u32) {
        self.sequences_advanced += advanced;
        self.sequences_finished += finished;
    }

    /// Records one layout pass that ran `layouts` layout capabilities.
    pub fn record_layout_pass(&mut self, layouts: u32) {
        self.layout_passes += 1;
        self.layouts_run += layouts;
    }

    /// Records that the hover pass ran.
    pub fn record_rehover(&mut self) {
        self.rehovered = true;
    }

    /// Consumes the builder and returns the summary.
    #[must_use]
    pub fn finish(self) -> FrameSummary {
        FrameSummary {
            frame_index: self.frame_index,
            time: self.time,
            sequences_advanced: self.sequences_advanced,
            sequences_finished: self.sequences_finished,
            layout_passes: self.layout_passes,
            layouts_run: self.layouts_run,
            rehovered: self.rehovered,
        }
    }
}
