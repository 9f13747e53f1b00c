// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node invalidation state.
//!
//! An [`Invalidation`] records *what* is stale on a node, never *when* it is
//! recomputed. Setters on [`Scene`](crate::node::Scene) invalidate bits;
//! getters of derived values (draw size, matrix, world opacity) check the bit,
//! recompute if needed and validate it again. This is a pull model: nothing is
//! recomputed until somebody asks.

use bitflags::bitflags;

bitflags! {
    /// Bitset of derived node values that must be recomputed before they are
    /// read again.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Invalidation: u8 {
        /// World matrix, world position and bounds.
        const GEOMETRY = 1 << 0;
        /// Draw size.
        const SIZE = 1 << 1;
        /// Draw size and everything computed from it.
        const DRAW_SIZE = Self::SIZE.bits() | Self::GEOMETRY.bits();
        /// Arrangement of children by a layout capability, and intrinsic
        /// sizing of paint content.
        const LAYOUT = 1 << 2;
        /// World opacity.
        const OPACITY = 1 << 3;
        /// Everything.
        const ALL = Self::DRAW_SIZE.bits() | Self::LAYOUT.bits() | Self::OPACITY.bits();
    }
}

impl Default for Invalidation {
    fn default() -> Self {
        Self::ALL
    }
}

impl Invalidation {
    /// Marks `flags` stale. Returns whether any bit was newly set.
    #[inline]
    pub fn invalidate(&mut self, flags: Self) -> bool {
        let before = *self;
        self.insert(flags);
        before != *self
    }

    /// Marks `flags` up to date. Returns whether any bit was cleared.
    #[inline]
    pub fn validate(&mut self, flags: Self) -> bool {
        let before = *self;
        self.remove(flags);
        before != *self
    }

    /// Clears every bit.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::empty();
    }

    /// Returns whether none of `flags` is stale.
    #[inline]
    #[must_use]
    pub const fn is_valid(self, flags: Self) -> bool {
        !self.intersects(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_fully_invalid() {
        let state = Invalidation::default();
        assert!(state.contains(Invalidation::ALL));
        assert!(!state.is_valid(Invalidation::GEOMETRY));
    }

    #[test]
    fn draw_size_covers_size_and_geometry() {
        assert!(Invalidation::DRAW_SIZE.contains(Invalidation::SIZE));
        assert!(Invalidation::DRAW_SIZE.contains(Invalidation::GEOMETRY));
        assert!(!Invalidation::DRAW_SIZE.contains(Invalidation::OPACITY));
    }

    #[test]
    fn validate_and_invalidate_report_changes() {
        let mut state = Invalidation::empty();
        assert!(state.invalidate(Invalidation::SIZE));
        assert!(!state.invalidate(Invalidation::SIZE), "already set");
        assert!(state.validate(Invalidation::DRAW_SIZE));
        assert!(state.is_valid(Invalidation::ALL));
        assert!(!state.validate(Invalidation::SIZE), "already clear");
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = Invalidation::ALL;
        state.reset();
        assert!(state.is_empty());
    }
}
