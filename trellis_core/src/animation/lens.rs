// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lenses over the animatable properties of a scene node.
//!
//! Each lens is named after the property it writes; those names are what
//! [`Scene::stop_animations`](crate::node::Scene::stop_animations) matches.

use kurbo::{Point, Size, Vec2};

use super::tween::Lens;
use crate::node::{NodeId, Scene};

/// The node's position.
#[must_use]
pub fn position(node: NodeId) -> Lens<Scene, Point> {
    Lens::new(
        "position",
        move |s: &Scene| s.position(node),
        move |s: &mut Scene, v| s.set_position(node, v),
    )
}

/// The node's anchor.
#[must_use]
pub fn anchor(node: NodeId) -> Lens<Scene, Vec2> {
    Lens::new(
        "anchor",
        move |s: &Scene| s.anchor(node),
        move |s: &mut Scene, v| s.set_anchor(node, v),
    )
}

/// The node's offset.
#[must_use]
pub fn offset(node: NodeId) -> Lens<Scene, Vec2> {
    Lens::new(
        "offset",
        move |s: &Scene| s.offset(node),
        move |s: &mut Scene, v| s.set_offset(node, v),
    )
}

/// The node's margin.
#[must_use]
pub fn margin(node: NodeId) -> Lens<Scene, Vec2> {
    Lens::new(
        "margin",
        move |s: &Scene| s.margin(node),
        move |s: &mut Scene, v| s.set_margin(node, v),
    )
}

/// The node's rotation in degrees.
#[must_use]
pub fn rotation(node: NodeId) -> Lens<Scene, f64> {
    Lens::new(
        "rotation",
        move |s: &Scene| s.rotation(node),
        move |s: &mut Scene, v| s.set_rotation(node, v),
    )
}

/// The node's scale.
#[must_use]
pub fn scale(node: NodeId) -> Lens<Scene, Vec2> {
    Lens::new(
        "scale",
        move |s: &Scene| s.scale(node),
        move |s: &mut Scene, v| s.set_scale(node, v),
    )
}

/// The node's explicit size.
///
/// Writes are dropped while the node is fully relative on both axes (see
/// [`Scene::try_set_size`]), so such a tween runs to completion without
/// effect.
#[must_use]
pub fn size(node: NodeId) -> Lens<Scene, Size> {
    Lens::new(
        "size",
        move |s: &Scene| s.size(node),
        move |s: &mut Scene, v| {
            let _ = s.try_set_size(node, v);
        },
    )
}

/// The node's local opacity.
#[must_use]
pub fn opacity(node: NodeId) -> Lens<Scene, f64> {
    Lens::new(
        "opacity",
        move |s: &Scene| s.opacity(node),
        move |s: &mut Scene, v| s.set_opacity(node, v),
    )
}

/// The translation applied to the node's children.
#[must_use]
pub fn child_offset(node: NodeId) -> Lens<Scene, Vec2> {
    Lens::new(
        "child_offset",
        move |s: &Scene| s.child_offset(node),
        move |s: &mut Scene, v| s.set_child_offset(node, v),
    )
}
