// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The node tree.
//!
//! A *node* is an element of the scene tree. Each node has:
//!
//! - An identity ([`NodeId`]), a generational handle that becomes stale when
//!   the node is disposed, so use-after-dispose is caught at the API level.
//! - Topology: a parent index and an owned child list kept sorted by
//!   [`z_index`](Scene::set_z_index), plus an optional
//!   [content container](Scene::set_content_container) that `add_child` and
//!   `children` redirect to.
//! - **Local properties** set by the caller: position, anchor, offset,
//!   margin, rotation, scale, size, relative-size axes, opacity, child
//!   offset and [`NodeFlags`].
//! - **Derived values** resolved lazily on read: draw size, world matrix,
//!   world position, world opacity and [bounds](Quad). Setters record what
//!   went stale in the node's [`Invalidation`](crate::invalidation::Invalidation)
//!   bits; getters recompute only what is stale, sizes before geometry.
//! - **Capabilities**: optional [`Paint`](crate::paint::Paint),
//!   [`InputHandler`](crate::input::InputHandler) and
//!   [`Layout`](crate::layout::Layout) trait objects.
//! - **Lifecycle**: nodes start detached; [`set_root`](Scene::set_root)
//!   attaches and loads a subtree; [`dispose`](Scene::dispose) frees the slot
//!   and drops everything the node owned.
//!
//! Nodes are stored in struct-of-arrays layout with index-based handles.
//!
//! # Damage tracking
//!
//! Alongside invalidation, mutations mark [`dirty`](crate::dirty) channels
//! so that [`evaluate`](Scene::evaluate) can report the [`FrameChanges`]
//! since the previous frame to a retained presenter.

mod evaluate;
mod frame;
mod geometry;
mod id;
mod lifecycle;
mod render;
mod store;
mod topology;
mod traverse;

pub use evaluate::FrameChanges;
pub use geometry::Quad;
pub use id::{INVALID, NodeId, ObserverId};
pub use store::{Axes, NodeFlags, Scene};
pub use traverse::Children;
