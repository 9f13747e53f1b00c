// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-addressable sequences of property mutations.
//!
//! A [`TransformSequence`] is an ordered list of timed transforms plus loop
//! sentinels. Each transform owns a [`TransformOp`] that writes one property
//! of the target, and moves through [`TransformState`]:
//!
//! ```text
//!   Pending ──(time reaches start)──► Active ──(time passes end)──► Completed
//!      ▲                                                                │
//!      └──────────────────────(loop reset / seek back)──────────────────┘
//! ```
//!
//! Sequences are built by appending at a cursor, `base_time`.
//! [`then`](TransformSequence::then) moves the cursor past everything
//! appended so far, so chained calls run one after another; transforms
//! appended without `then` run in parallel.
//!
//! Loops are sentinels placed at the end of the sequence so far. When the
//! sequence time reaches a sentinel, time is carried back to the loop point
//! together with the overtime, and the transforms of the loop body are reset
//! to pending.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use super::easing::Easing;
use crate::error::ContractError;

/// A value-producing operation bound to one property of `T`.
pub trait TransformOp<T: ?Sized> {
    /// Name of the property this operation writes.
    fn name(&self) -> &str;

    /// Called when the transform becomes active; captures the start value.
    fn begin(&mut self, target: &mut T);

    /// Writes the value at eased `progress`.
    fn apply(&mut self, target: &mut T, progress: f64);

    /// Writes back the value captured by [`begin`](Self::begin).
    fn restore(&mut self, target: &mut T);
}

/// Lifecycle of a single transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransformState {
    /// Sequence time has not reached the start yet.
    Pending,
    /// Sequence time is inside the window.
    Active,
    /// The end value has been applied.
    Completed,
}

/// How many times a loop sentinel fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Loops {
    /// Fire this many times, then let the sequence run past the sentinel.
    Times(u32),
    /// Fire forever; the sequence never finishes on its own.
    Infinite,
}

impl Loops {
    fn is_exhausted(self) -> bool {
        self == Self::Times(0)
    }

    fn decrement(&mut self) {
        if let Self::Times(n) = self {
            *n = n.saturating_sub(1);
        }
    }
}

/// A named checkpoint a sequence can loop back to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopPoint {
    /// Sequence time of the checkpoint.
    pub time: f64,
    /// Number of entries in the sequence when the checkpoint was recorded.
    pub index: usize,
}

impl LoopPoint {
    /// The beginning of the sequence.
    pub const START: Self = Self {
        time: 0.0,
        index: 0,
    };
}

/// What happened during one [`TransformSequence::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SequenceTick {
    /// Loop sentinels fired.
    pub loops_fired: u32,
    /// Overtime carried by the last loop fired.
    pub overtime: Option<f64>,
    /// Whether the sequence has nothing left to do.
    pub finished: bool,
}

struct Transform<T: ?Sized> {
    start: f64,
    duration: f64,
    easing: Easing,
    op: Box<dyn TransformOp<T>>,
    state: TransformState,
}

impl<T: ?Sized> Transform<T> {
    fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Brings the transform to `time`. Overrunning the window applies the
    /// end value exactly once.
    fn advance(&mut self, target: &mut T, time: f64) {
        if self.state == TransformState::Completed || time < self.start {
            return;
        }
        if self.state == TransformState::Pending {
            self.op.begin(target);
            self.state = TransformState::Active;
        }
        if self.duration <= 0.0 || time >= self.end() {
            self.op.apply(target, 1.0);
            self.state = TransformState::Completed;
        } else {
            let progress = (time - self.start) / self.duration;
            self.op.apply(target, self.easing.apply(progress));
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct LoopSentinel {
    time: f64,
    point: LoopPoint,
    count: Loops,
    remaining: Loops,
}

enum Entry<T: ?Sized> {
    Transform(Transform<T>),
    Loop(LoopSentinel),
}

/// An ordered, time-seekable list of property mutations on one target.
pub struct TransformSequence<T: ?Sized> {
    entries: Vec<Entry<T>>,
    loop_points: Vec<(String, LoopPoint)>,
    base_time: f64,
    time: f64,
}

impl<T: ?Sized> fmt::Debug for TransformSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformSequence")
            .field("entries", &self.entries.len())
            .field("base_time", &self.base_time)
            .field("time", &self.time)
            .field("end_time", &self.end_time())
            .finish_non_exhaustive()
    }
}

impl<T: ?Sized> Default for TransformSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> TransformSequence<T> {
    /// Creates an empty sequence at time zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            loop_points: Vec::new(),
            base_time: 0.0,
            time: 0.0,
        }
    }

    // -- Building --

    /// Appends a transform starting at the cursor.
    ///
    /// # Panics
    ///
    /// Panics if `duration` is negative.
    pub fn push(
        &mut self,
        op: impl TransformOp<T> + 'static,
        duration: f64,
        easing: Easing,
    ) -> &mut Self {
        let start = self.base_time;
        self.push_at(start, op, duration, easing)
    }

    /// Appends a transform starting at the cursor, or reports why it cannot
    /// be appended.
    pub fn try_push(
        &mut self,
        op: impl TransformOp<T> + 'static,
        duration: f64,
        easing: Easing,
    ) -> Result<&mut Self, ContractError> {
        let start = self.base_time;
        self.try_push_at(start, op, duration, easing)
    }

    /// Appends a transform at an explicit start time.
    ///
    /// # Panics
    ///
    /// Panics if `start` or `duration` is negative.
    pub fn push_at(
        &mut self,
        start: f64,
        op: impl TransformOp<T> + 'static,
        duration: f64,
        easing: Easing,
    ) -> &mut Self {
        match self.try_push_at(start, op, duration, easing) {
            Ok(this) => this,
            Err(err) => panic!("{err}"),
        }
    }

    /// Appends a transform at an explicit start time, or reports why it
    /// cannot be appended.
    pub fn try_push_at(
        &mut self,
        start: f64,
        op: impl TransformOp<T> + 'static,
        duration: f64,
        easing: Easing,
    ) -> Result<&mut Self, ContractError> {
        if duration < 0.0 || duration.is_nan() {
            return Err(ContractError::NegativeDuration(duration));
        }
        if start < 0.0 || start.is_nan() {
            return Err(ContractError::NegativeStartTime(start));
        }
        self.entries.push(Entry::Transform(Transform {
            start,
            duration,
            easing,
            op: Box::new(op),
            state: TransformState::Pending,
        }));
        Ok(self)
    }

    /// Moves the cursor to the end of everything appended so far plus
    /// `delay`.
    pub fn then(&mut self, delay: f64) -> &mut Self {
        self.base_time = self.end_time() + delay;
        self
    }

    /// Records the cursor and entry count as a named checkpoint. Recording a
    /// name twice replaces the earlier checkpoint.
    pub fn set_loop_point(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        let point = LoopPoint {
            time: self.base_time,
            index: self.entries.len(),
        };
        if let Some(slot) = self.loop_points.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = point;
        } else {
            self.loop_points.push((name, point));
        }
        self
    }

    /// Appends a loop sentinel at the current end time. `point` names a
    /// checkpoint; `None` loops back to the start. The cursor moves to the
    /// sentinel.
    ///
    /// # Panics
    ///
    /// Panics if `point` names no recorded checkpoint.
    pub fn loop_to(&mut self, count: Loops, point: Option<&str>) -> &mut Self {
        match self.try_loop_to(count, point) {
            Ok(this) => this,
            Err(err) => panic!("{err}"),
        }
    }

    /// Appends a loop sentinel, or reports an unknown checkpoint.
    pub fn try_loop_to(
        &mut self,
        count: Loops,
        point: Option<&str>,
    ) -> Result<&mut Self, ContractError> {
        let point = self.resolve_point(point)?;
        let time = self.end_time();
        self.entries.push(Entry::Loop(LoopSentinel {
            time,
            point,
            count,
            remaining: count,
        }));
        self.base_time = time;
        Ok(self)
    }

    fn resolve_point(&self, name: Option<&str>) -> Result<LoopPoint, ContractError> {
        match name {
            None => Ok(LoopPoint::START),
            Some(name) => self
                .loop_point(name)
                .ok_or_else(|| ContractError::UnknownLoopPoint(name.to_string())),
        }
    }

    // -- Queries --

    /// Returns the time at which the last transform or sentinel ends.
    #[must_use]
    pub fn end_time(&self) -> f64 {
        self.entries
            .iter()
            .map(|entry| match entry {
                Entry::Transform(t) => t.end(),
                Entry::Loop(s) => s.time,
            })
            .fold(0.0, f64::max)
    }

    /// Returns the current sequence time.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Returns the append cursor.
    #[must_use]
    pub fn base_time(&self) -> f64 {
        self.base_time
    }

    /// Returns a recorded checkpoint.
    #[must_use]
    pub fn loop_point(&self, name: &str) -> Option<LoopPoint> {
        self.loop_points
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, point)| *point)
    }

    /// Returns the number of transforms, not counting loop sentinels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms().count()
    }

    /// Returns whether the sequence holds no transforms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the state of each transform in append order.
    pub fn states(&self) -> impl Iterator<Item = TransformState> + '_ {
        self.transforms().map(|t| t.state)
    }

    /// Returns whether every transform has completed and every loop has run
    /// out.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.entries.iter().all(|entry| match entry {
            Entry::Transform(t) => t.state == TransformState::Completed,
            Entry::Loop(s) => s.remaining.is_exhausted(),
        })
    }

    /// Returns whether any transform writes the named property.
    #[must_use]
    pub fn touches(&self, name: &str) -> bool {
        self.transforms().any(|t| t.op.name() == name)
    }

    fn transforms(&self) -> impl Iterator<Item = &Transform<T>> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Transform(t) => Some(t),
            Entry::Loop(_) => None,
        })
    }

    /// Transform indices ordered by start time, then append order.
    fn chronological(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.entries.len())
            .filter(|&k| matches!(self.entries[k], Entry::Transform(_)))
            .collect();
        order.sort_by(|&a, &b| {
            self.start_of(a)
                .total_cmp(&self.start_of(b))
                .then(a.cmp(&b))
        });
        order
    }

    fn start_of(&self, k: usize) -> f64 {
        match &self.entries[k] {
            Entry::Transform(t) => t.start,
            Entry::Loop(s) => s.time,
        }
    }

    // -- Playback --

    /// Advances time by `delta` and applies every transform whose window has
    /// been reached.
    ///
    /// Each loop sentinel fires at most once per call. When one fires, time
    /// becomes `point.time + (time - sentinel.time)` and the scan restarts.
    pub fn update(&mut self, target: &mut T, delta: f64) -> SequenceTick {
        self.time += delta;
        let mut tick = SequenceTick::default();
        let mut fired: Vec<usize> = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            let time = self.time;
            let looped = match &mut self.entries[i] {
                Entry::Transform(t) => {
                    t.advance(target, time);
                    None
                }
                Entry::Loop(s) => {
                    if time >= s.time && !s.remaining.is_exhausted() && !fired.contains(&i) {
                        s.remaining.decrement();
                        Some((s.point, time - s.time))
                    } else {
                        None
                    }
                }
            };
            if let Some((point, overtime)) = looped {
                fired.push(i);
                self.rewind(target, point, point.time + overtime, Some(i));
                tick.loops_fired += 1;
                tick.overtime = Some(overtime);
                i = 0;
                continue;
            }
            i += 1;
        }
        tick.finished = self.is_finished();
        tick
    }

    /// Moves time back to a checkpoint (`None` is the start), resetting the
    /// transforms after it.
    ///
    /// # Panics
    ///
    /// Panics if `point` names no recorded checkpoint.
    pub fn reset_to(&mut self, target: &mut T, point: Option<&str>) {
        if let Err(err) = self.try_reset_to(target, point) {
            panic!("{err}");
        }
    }

    /// Moves time back to a checkpoint, or reports an unknown checkpoint.
    pub fn try_reset_to(
        &mut self,
        target: &mut T,
        point: Option<&str>,
    ) -> Result<(), ContractError> {
        let point = self.resolve_point(point)?;
        self.rewind(target, point, point.time, None);
        Ok(())
    }

    /// Resets the loop body after `point` and sets time to `time`.
    ///
    /// Started transforms in the body return to pending; only the earliest
    /// one per property restores its start value so stacked transforms on
    /// one property reset once. Transforms before the point whose window
    /// contains the new time are re-opened. Sentinels inside the body other
    /// than `firing` are re-armed.
    fn rewind(&mut self, target: &mut T, point: LoopPoint, time: f64, firing: Option<usize>) {
        let mut restored: Vec<String> = Vec::new();
        for k in self.chronological() {
            let Entry::Transform(t) = &mut self.entries[k] else {
                continue;
            };
            if k >= point.index {
                if t.state == TransformState::Pending {
                    continue;
                }
                let name = t.op.name();
                if !restored.iter().any(|n| n == name) {
                    restored.push(name.to_string());
                    t.op.restore(target);
                }
                t.state = TransformState::Pending;
            } else if t.state == TransformState::Completed && t.start < point.time && t.end() > time
            {
                t.state = TransformState::Active;
            }
        }
        for (k, entry) in self.entries.iter_mut().enumerate().skip(point.index) {
            if let Entry::Loop(s) = entry
                && Some(k) != firing
            {
                s.remaining = s.count;
            }
        }
        self.time = time;
    }

    /// Jumps to `time`, forwards or backwards, leaving every transform in the
    /// state it has at that time.
    ///
    /// Transforms that have not started by `time` restore their start values,
    /// latest first; the others are re-applied in start order. Loop sentinels
    /// do not fire while seeking: one that was jumped over fires on the next
    /// [`update`](Self::update), and those after `time` are re-armed.
    pub fn seek(&mut self, target: &mut T, time: f64) {
        let time = time.max(0.0);
        let order = self.chronological();
        for &k in order.iter().rev() {
            if let Entry::Transform(t) = &mut self.entries[k]
                && time < t.start
                && t.state != TransformState::Pending
            {
                t.op.restore(target);
                t.state = TransformState::Pending;
            }
        }
        for &k in &order {
            if let Entry::Transform(t) = &mut self.entries[k] {
                if t.state == TransformState::Completed && time < t.end() {
                    t.state = TransformState::Active;
                }
                t.advance(target, time);
            }
        }
        for entry in &mut self.entries {
            if let Entry::Loop(s) = entry
                && s.time > time
            {
                s.remaining = s.count;
            }
        }
        self.time = time;
    }
}
