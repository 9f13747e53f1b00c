// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The active-sequence collection of one animation target.

use alloc::vec::Vec;
use core::fmt;

use super::sequence::{SequenceTick, TransformSequence};

/// Identifies a sequence within its [`SequenceSet`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceId(pub(crate) u64);

impl SequenceId {
    /// Returns the raw id (for diagnostics).
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SequenceId({})", self.0)
    }
}

/// The sequences currently running on one target.
///
/// Finished sequences are dropped by [`update`](Self::update).
pub struct SequenceSet<T: ?Sized> {
    entries: Vec<(SequenceId, TransformSequence<T>)>,
    next_id: u64,
}

impl<T: ?Sized> fmt::Debug for SequenceSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(id, _)| id))
            .finish()
    }
}

impl<T: ?Sized> Default for SequenceSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> SequenceSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Adds a sequence and returns its id.
    pub fn insert(&mut self, sequence: TransformSequence<T>) -> SequenceId {
        let id = SequenceId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, sequence));
        id
    }

    /// Removes a sequence.
    pub fn remove(&mut self, id: SequenceId) -> Option<TransformSequence<T>> {
        let pos = self.entries.iter().position(|(i, _)| *i == id)?;
        Some(self.entries.remove(pos).1)
    }

    /// Returns a sequence.
    #[must_use]
    pub fn get(&self, id: SequenceId) -> Option<&TransformSequence<T>> {
        self.entries
            .iter()
            .find(|(i, _)| *i == id)
            .map(|(_, sequence)| sequence)
    }

    /// Returns a sequence for mutation.
    pub fn get_mut(&mut self, id: SequenceId) -> Option<&mut TransformSequence<T>> {
        self.entries
            .iter_mut()
            .find(|(i, _)| *i == id)
            .map(|(_, sequence)| sequence)
    }

    /// Returns the ids of the running sequences in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = SequenceId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    /// Returns the number of running sequences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no sequence is running.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Advances every sequence by `delta`, reporting each tick, then drops the
    /// finished ones.
    pub fn update(
        &mut self,
        target: &mut T,
        delta: f64,
        mut on_tick: impl FnMut(SequenceId, &SequenceTick),
    ) {
        for (id, sequence) in &mut self.entries {
            let tick = sequence.update(target, delta);
            on_tick(*id, &tick);
        }
        self.entries.retain(|(_, sequence)| !sequence.is_finished());
    }

    /// Discards the sequences touching any of the named properties, or every
    /// sequence when `names` is empty. Returns the discarded ids.
    pub fn stop(&mut self, names: &[&str]) -> Vec<SequenceId> {
        let mut stopped = Vec::new();
        self.entries.retain(|(id, sequence)| {
            let hit = names.is_empty() || names.iter().any(|name| sequence.touches(name));
            if hit {
                stopped.push(*id);
            }
            !hit
        });
        stopped
    }

    /// Moves the running sequences out, leaving this set empty but keeping
    /// its id counter so sequences inserted meanwhile get fresh ids.
    pub(crate) fn take_running(&mut self) -> Self {
        Self {
            entries: core::mem::take(&mut self.entries),
            next_id: self.next_id,
        }
    }

    /// Appends the sequences of `other`, keeping ids unique.
    pub(crate) fn merge(&mut self, other: Self) {
        self.entries.extend(other.entries);
        self.next_id = self.next_id.max(other.next_id);
    }
}
