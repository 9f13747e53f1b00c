// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identity types.

use core::fmt;

/// Sentinel value indicating "no node" in index fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to a node in a [`Scene`](super::Scene).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a node is disposed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    /// Slot index into the scene's arrays.
    pub(crate) idx: u32,
    /// Generation counter; must match the scene's generation for this slot.
    pub(crate) generation: u32,
}

impl NodeId {
    /// Returns the raw slot index (for diagnostics and raw accessors).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}@gen{})", self.idx, self.generation)
    }
}

/// Identifies an observer registered on a node.
///
/// Returned by the `on_*` registration methods of [`Scene`](super::Scene) and
/// accepted by [`Scene::remove_observer`](super::Scene::remove_observer).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u64);

impl fmt::Debug for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObserverId({})", self.0)
    }
}
