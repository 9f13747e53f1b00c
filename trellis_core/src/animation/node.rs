// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animating scene nodes.
//!
//! Every node owns a [`SequenceSet`] that [`Scene::update`] advances once per
//! frame. [`Scene::animate`] builds a sequence through a [`NodeAnimator`]:
//!
//! ```rust,ignore
//! scene.animate(button, |a| {
//!     a.fade_to(1.0, 0.2, Easing::QuadOut)
//!         .then(0.0)
//!         .loop_point("pulse")
//!         .scale_to(Vec2::new(1.1, 1.1), 0.5, Easing::SineInOut)
//!         .then(0.0)
//!         .scale_to(Vec2::new(1.0, 1.0), 0.5, Easing::SineInOut)
//!         .looping(Loops::Infinite, Some("pulse"));
//! });
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Size, Vec2};

use super::easing::Easing;
use super::lens;
use super::sequence::{Loops, TransformSequence};
use super::set::SequenceId;
use super::tween::{Lens, Lerp, Tween};
use crate::node::{INVALID, NodeId, Scene};
use crate::trace::{SequenceEvent, SequenceEventKind};

/// Builds one transform sequence on one node.
#[derive(Debug)]
pub struct NodeAnimator {
    node: NodeId,
    sequence: TransformSequence<Scene>,
}

impl NodeAnimator {
    /// Starts an empty sequence on `node`.
    #[must_use]
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            sequence: TransformSequence::new(),
        }
    }

    /// Returns the node being animated.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Returns the sequence under construction.
    pub fn sequence_mut(&mut self) -> &mut TransformSequence<Scene> {
        &mut self.sequence
    }

    /// Finishes building and returns the sequence.
    #[must_use]
    pub fn into_sequence(self) -> TransformSequence<Scene> {
        self.sequence
    }

    /// Tweens any lens to `value`.
    ///
    /// # Panics
    ///
    /// Panics if `duration` is negative.
    pub fn tween<V: Lerp + 'static>(
        &mut self,
        lens: Lens<Scene, V>,
        value: V,
        duration: f64,
        easing: Easing,
    ) -> &mut Self {
        self.sequence.push(Tween::to(lens, value), duration, easing);
        self
    }

    /// Moves the node to `position`.
    pub fn move_to(&mut self, position: Point, duration: f64, easing: Easing) -> &mut Self {
        self.tween(lens::position(self.node), position, duration, easing)
    }

    /// Moves the node by `delta` from wherever it is when the move starts.
    pub fn move_by(&mut self, delta: Vec2, duration: f64, easing: Easing) -> &mut Self {
        let tween = Tween::with_end(lens::position(self.node), move |from| from + delta);
        self.sequence.push(tween, duration, easing);
        self
    }

    /// Fades the node's local opacity to `opacity`.
    pub fn fade_to(&mut self, opacity: f64, duration: f64, easing: Easing) -> &mut Self {
        self.tween(lens::opacity(self.node), opacity, duration, easing)
    }

    /// Rotates the node to `degrees`.
    pub fn rotate_to(&mut self, degrees: f64, duration: f64, easing: Easing) -> &mut Self {
        self.tween(lens::rotation(self.node), degrees, duration, easing)
    }

    /// Scales the node to `scale`.
    pub fn scale_to(&mut self, scale: Vec2, duration: f64, easing: Easing) -> &mut Self {
        self.tween(lens::scale(self.node), scale, duration, easing)
    }

    /// Resizes the node to `size`.
    pub fn resize_to(&mut self, size: Size, duration: f64, easing: Easing) -> &mut Self {
        self.tween(lens::size(self.node), size, duration, easing)
    }

    /// Runs what follows after everything so far, plus `delay`.
    pub fn then(&mut self, delay: f64) -> &mut Self {
        self.sequence.then(delay);
        self
    }

    /// Records a named checkpoint at the cursor.
    pub fn loop_point(&mut self, name: impl Into<String>) -> &mut Self {
        self.sequence.set_loop_point(name);
        self
    }

    /// Loops back to a checkpoint (`None` is the start).
    ///
    /// # Panics
    ///
    /// Panics if `point` names no recorded checkpoint.
    pub fn looping(&mut self, count: Loops, point: Option<&str>) -> &mut Self {
        self.sequence.loop_to(count, point);
        self
    }
}

impl Scene {
    /// Builds a sequence on `node` and starts it at the current frame.
    ///
    /// The sequence is advanced by zero immediately, so transforms starting
    /// at time zero capture their start values and zero-duration ones apply
    /// right away. A sequence that is already finished is not kept.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, or if `build` violates a sequence
    /// contract.
    pub fn animate(
        &mut self,
        node: NodeId,
        build: impl FnOnce(&mut NodeAnimator),
    ) -> SequenceId {
        self.validate(node);
        let mut animator = NodeAnimator::new(node);
        build(&mut animator);
        self.start_sequence(node, animator.into_sequence())
    }

    /// Starts a prebuilt sequence on `node`. See [`animate`](Self::animate).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn start_sequence(
        &mut self,
        node: NodeId,
        mut sequence: TransformSequence<Self>,
    ) -> SequenceId {
        self.validate(node);
        let tick = sequence.update(self, 0.0);
        let set = &mut self.sequences[node.idx as usize];
        let id = set.insert(sequence);
        if tick.finished {
            set.remove(id);
        }
        id
    }

    /// Stops the sequences on `node` touching any of the named properties
    /// (see [`lens`](super::lens) for the names), or all of them when `names`
    /// is empty. Values stay where the sequences left them.
    ///
    /// Called from inside the node's own update, the stop also applies to
    /// the sequences being advanced, once they finish this frame's step.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn stop_animations(&mut self, node: NodeId, names: &[&str]) {
        self.validate(node);
        if self.animating == node.idx {
            let names: Vec<String> = names.iter().map(|&n| String::from(n)).collect();
            self.deferred_stops.push((node.idx, names));
        }
        let stopped = self.sequences[node.idx as usize].stop(names);
        self.trace_stopped(node, &stopped);
    }

    /// Returns whether `node` has running sequences.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn is_animating(&self, node: NodeId) -> bool {
        self.validate(node);
        self.animating == node.idx || !self.sequences[node.idx as usize].is_empty()
    }

    /// Returns the number of running sequences on `node`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn animation_count(&self, node: NodeId) -> usize {
        self.validate(node);
        self.sequences[node.idx as usize].len()
    }

    /// Returns a running sequence.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn sequence(&self, node: NodeId, id: SequenceId) -> Option<&TransformSequence<Self>> {
        self.validate(node);
        self.sequences[node.idx as usize].get(id)
    }

    /// Advances the sequences of every live node by `delta`. Returns the
    /// number of sequences advanced and the number that finished.
    pub(crate) fn advance_sequences(&mut self, delta: f64) -> (u32, u32) {
        let (mut advanced, mut finished) = (0, 0);
        for idx in 0..self.len {
            let i = idx as usize;
            if !self.alive[i] || self.sequences[i].is_empty() {
                continue;
            }
            let node = self.id_of(idx);
            let mut running = self.sequences[i].take_running();
            let mut events = Vec::new();
            self.animating = idx;
            running.update(self, delta, |sequence, tick| {
                advanced += 1;
                if let Some(overtime) = tick.overtime {
                    events.push((sequence, SequenceEventKind::Looped { overtime }));
                }
                if tick.finished {
                    finished += 1;
                    events.push((sequence, SequenceEventKind::Completed));
                }
            });
            self.animating = INVALID;
            let deferred = core::mem::take(&mut self.deferred_stops);

            if !self.is_alive(node) {
                // Disposed by one of its own sequences.
                continue;
            }
            let added = core::mem::take(&mut self.sequences[i]);
            running.merge(added);
            self.sequences[i] = running;

            for (_, names) in deferred {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                let stopped = self.sequences[i].stop(&names);
                self.trace_stopped(node, &stopped);
            }

            let frame_index = self.frame_index;
            for (sequence, kind) in events {
                self.tracer().sequence(&SequenceEvent {
                    frame_index,
                    node,
                    sequence,
                    kind,
                });
            }
        }
        (advanced, finished)
    }

    fn trace_stopped(&mut self, node: NodeId, stopped: &[SequenceId]) {
        let frame_index = self.frame_index;
        for &sequence in stopped {
            self.tracer().sequence(&SequenceEvent {
                frame_index,
                node,
                sequence,
                kind: SequenceEventKind::Stopped,
            });
        }
    }
}
