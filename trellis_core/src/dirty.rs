// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage-tracking channel constants.
//!
//! Alongside the per-node [`Invalidation`](crate::invalidation::Invalidation)
//! bits (which drive lazy recomputation), the scene records *damage* through
//! [`understory_dirty`] so that retained presenters can repaint only what
//! changed since the last [`Scene::evaluate`](crate::node::Scene::evaluate).
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`PAINT`] uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and has dependency edges
//!   from child to parent. Geometry, opacity and visibility are inherited, so
//!   marking a node marks its whole subtree.
//! - **Local-only**: [`CONTENT`] is marked with the default policy when a
//!   node's paint capability changes.
//! - **Structural**: [`TOPOLOGY`] is marked on the parent when children are
//!   added, removed or re-sorted, and on nodes that are created or disposed.

use understory_dirty::Channel;

/// Geometry, opacity or visibility changed; the node and its descendants
/// must be repainted.
pub const PAINT: Channel = Channel::new(0);

/// Paint content of a single node changed.
pub const CONTENT: Channel = Channel::new(1);

/// Child list changed.
pub const TOPOLOGY: Channel = Channel::new(2);
