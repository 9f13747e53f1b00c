// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout capability.
//!
//! A node carrying a [`Layout`] has it run during the layout phase of
//! [`Scene::update`](crate::node::Scene::update) whenever the node's
//! [`LAYOUT`](crate::invalidation::Invalidation::LAYOUT) bit is set. Adding,
//! removing, showing, hiding or resizing a child sets that bit on the parent.
//!
//! Layouts position children; they do not solve constraints. Sizing stays
//! with the geometry model (explicit, relative or child-relative axes).

use alloc::vec::Vec;

use kurbo::{Point, Size};

use crate::node::{NodeId, Scene};

/// Positions the children of a node.
pub trait Layout {
    /// Arranges the layout children of `node`.
    ///
    /// The capability is taken out of the node while it runs, so the scene
    /// may be mutated freely.
    fn layout(&mut self, scene: &mut Scene, node: NodeId);
}

/// A child taking part in layout, with its resolved size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutChild {
    /// The child.
    pub id: NodeId,
    /// Draw size scaled by the child's scale.
    pub size: Size,
}

impl Scene {
    /// Returns the active, visible children of a node in z-order together
    /// with their scaled draw sizes.
    pub fn layout_children(&mut self, id: NodeId) -> Vec<LayoutChild> {
        let ids: Vec<NodeId> = self
            .children(id)
            .filter(|&c| self.is_active(c) && self.is_visible(c))
            .collect();
        ids.into_iter()
            .map(|c| {
                let size = self.draw_size(c);
                let scale = self.scale(c);
                LayoutChild {
                    id: c,
                    size: Size::new(size.width * scale.x, size.height * scale.y),
                }
            })
            .collect()
    }
}

/// Stacking direction of a [`StackLayout`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Left to right.
    #[default]
    Horizontal,
    /// Top to bottom.
    Vertical,
}

/// Places children one after another along an axis.
///
/// Children keep their own cross-axis position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StackLayout {
    /// Stacking direction.
    pub direction: Direction,
    /// Gap between consecutive children.
    pub spacing: f64,
    /// Space before the first child.
    pub padding: f64,
}

impl StackLayout {
    /// Creates a stack with no spacing or padding.
    #[must_use]
    pub const fn new(direction: Direction) -> Self {
        Self {
            direction,
            spacing: 0.0,
            padding: 0.0,
        }
    }

    /// Sets the gap between children.
    #[must_use]
    pub const fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Sets the leading padding.
    #[must_use]
    pub const fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }
}

impl Layout for StackLayout {
    fn layout(&mut self, scene: &mut Scene, node: NodeId) {
        let mut cursor = self.padding;
        for child in scene.layout_children(node) {
            let current = scene.position(child.id);
            let (position, extent) = match self.direction {
                Direction::Horizontal => (Point::new(cursor, current.y), child.size.width),
                Direction::Vertical => (Point::new(current.x, cursor), child.size.height),
            };
            scene.set_position(child.id, position);
            cursor += extent + self.spacing;
        }
    }
}
