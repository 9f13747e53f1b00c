// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazily resolved geometry: draw size, world matrix, world position, world
//! opacity and bounds.
//!
//! Every getter here first resolves pending invalidation, walking up the
//! ancestors (and down into the children of child-relative nodes) so that
//! the value returned is always current. A recomputed value that differs from
//! the cache ripples one hop further: children see their parent-dependent
//! bits set, and a child-relative parent sees its size bit set. Repeated reads
//! carry the ripple as far as it needs to go.
//!
//! Child rotation is ignored when computing a child-relative span.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use understory_dirty::EagerPolicy;

use super::id::{INVALID, NodeId};
use super::store::{Axes, NodeFlags, Scene};
use crate::dirty;
use crate::invalidation::Invalidation;

/// The four world-space corners of a node's draw rectangle, in the order
/// top-left, top-right, bottom-right, bottom-left (in local space).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    /// The mapped corners.
    pub points: [Point; 4],
}

impl Quad {
    /// Maps the rectangle `(0, 0, size)` through `matrix`.
    #[must_use]
    pub fn from_size(size: Size, matrix: Affine) -> Self {
        Self {
            points: [
                matrix * Point::ORIGIN,
                matrix * Point::new(size.width, 0.0),
                matrix * Point::new(size.width, size.height),
                matrix * Point::new(0.0, size.height),
            ],
        }
    }

    /// Returns whether the quad contains `point`, edges included.
    ///
    /// A degenerate quad (zero area) contains nothing.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        let mut positive = false;
        let mut negative = false;
        for k in 0..4 {
            let a = self.points[k];
            let b = self.points[(k + 1) % 4];
            let cross = (b - a).cross(point - a);
            if cross > 0.0 {
                positive = true;
            } else if cross < 0.0 {
                negative = true;
            }
            if positive && negative {
                return false;
            }
        }
        self.area() != 0.0
    }

    /// Returns the signed area (positive for clockwise corners in a y-down
    /// space).
    #[must_use]
    pub fn area(&self) -> f64 {
        let mut sum = 0.0;
        for k in 0..4 {
            let a = self.points[k];
            let b = self.points[(k + 1) % 4];
            sum += a.x * b.y - b.x * a.y;
        }
        sum * 0.5
    }

    /// Returns the smallest axis-aligned rectangle enclosing the quad.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        let mut rect = Rect::from_points(self.points[0], self.points[1]);
        rect = rect.union_pt(self.points[2]);
        rect.union_pt(self.points[3])
    }
}

fn resolve_axis(
    explicit: f64,
    relative: bool,
    child_relative: bool,
    parent: f64,
    span: f64,
    margin: f64,
    scale: f64,
) -> f64 {
    let value = if child_relative {
        span
    } else if relative {
        if scale == 0.0 {
            0.0
        } else {
            (parent * explicit - 2.0 * margin) / scale
        }
    } else {
        explicit
    };
    value.max(0.0)
}

impl Scene {
    // -- Public getters --

    /// Returns the resolved draw size.
    pub fn draw_size(&mut self, id: NodeId) -> Size {
        self.validate(id);
        self.resolve_draw_size(id.idx);
        self.derived[id.idx as usize].draw_size
    }

    /// Returns the world matrix.
    pub fn matrix(&mut self, id: NodeId) -> Affine {
        self.validate(id);
        self.resolve_matrix(id.idx);
        self.derived[id.idx as usize].matrix
    }

    /// Returns the matrix children of this node are placed in.
    pub fn child_matrix(&mut self, id: NodeId) -> Affine {
        self.validate(id);
        self.resolve_matrix(id.idx);
        self.child_access_matrix(id.idx)
    }

    /// Returns the world position (the matrix applied to the local origin).
    ///
    /// World-position observers registered with
    /// [`on_world_position_changed`](Self::on_world_position_changed) fire
    /// from here when the value differs from the last one reported.
    pub fn world_position(&mut self, id: NodeId) -> Point {
        self.validate(id);
        self.resolve_world_position(id.idx)
    }

    /// Returns the product of the opacities of the node and its ancestors.
    pub fn world_opacity(&mut self, id: NodeId) -> f64 {
        self.validate(id);
        self.resolve_opacity(id.idx);
        self.derived[id.idx as usize].world_opacity
    }

    /// Returns the world-space corners of the draw rectangle.
    pub fn bounds(&mut self, id: NodeId) -> Quad {
        self.validate(id);
        self.resolve_matrix(id.idx);
        let d = self.derived[id.idx as usize];
        Quad::from_size(d.draw_size, d.matrix)
    }

    /// Returns whether the node's bounds contain the world-space `point`.
    pub fn contains_point(&mut self, id: NodeId, point: Point) -> bool {
        self.validate(id);
        self.contains_point_at(id.idx, point)
    }

    /// Maps a world-space point into the node's local space.
    ///
    /// Returns `None` when the matrix is singular (for example a zero scale).
    pub fn to_local(&mut self, id: NodeId, point: Point) -> Option<Point> {
        let m = self.matrix(id);
        if m.determinant() == 0.0 {
            return None;
        }
        Some(m.inverse() * point)
    }

    // -- Resolution --

    pub(crate) fn contains_point_at(&mut self, idx: u32, point: Point) -> bool {
        self.resolve_matrix(idx);
        let d = self.derived[idx as usize];
        Quad::from_size(d.draw_size, d.matrix).contains(point)
    }

    pub(crate) fn child_access_matrix(&self, idx: u32) -> Affine {
        let i = idx as usize;
        self.derived[i].matrix * Affine::translate(self.props[i].child_offset)
    }

    pub(crate) fn resolve_draw_size(&mut self, idx: u32) {
        let i = idx as usize;
        if self.resolving[i] {
            return;
        }
        let props = self.props[i];
        let p = self.parent[i];

        // Inputs first, so that their ripples land before our own bit is
        // checked.
        if p != INVALID && !props.relative_axes.is_empty() {
            self.resolve_draw_size(p);
        }
        if !props.child_relative_axes.is_empty() {
            self.resolving[i] = true;
            for k in 0..self.children[i].len() {
                let c = self.children[i][k];
                self.resolve_draw_size(c);
            }
            self.resolving[i] = false;
        }

        if self.invalid[i].is_valid(Invalidation::SIZE) {
            return;
        }
        self.resolving[i] = true;
        self.invalid[i].validate(Invalidation::SIZE);

        let parent_size = if p != INVALID {
            self.derived[p as usize].draw_size
        } else {
            Size::ZERO
        };
        let span = if props.child_relative_axes.is_empty() {
            Size::ZERO
        } else {
            self.child_span(idx)
        };
        let relative = props.relative_axes;
        let child_relative = props.child_relative_axes;
        let size = Size::new(
            resolve_axis(
                props.size.width,
                relative.contains(Axes::X),
                child_relative.contains(Axes::X),
                parent_size.width,
                span.width,
                props.margin.x,
                props.scale.x,
            ),
            resolve_axis(
                props.size.height,
                relative.contains(Axes::Y),
                child_relative.contains(Axes::Y),
                parent_size.height,
                span.height,
                props.margin.y,
                props.scale.y,
            ),
        );
        self.resolving[i] = false;

        if self.derived[i].draw_size != size {
            self.derived[i].draw_size = size;
            self.draw_size_rippled(idx);
        }
    }

    /// Bounding span of the children on the node's child-relative axes,
    /// skipping children that are themselves relative on an axis.
    fn child_span(&self, idx: u32) -> Size {
        let i = idx as usize;
        let axes = self.props[i].child_relative_axes;
        let own = self.props[i].size;
        let mut span = Size::ZERO;
        for &c in &self.children[i] {
            let cp = &self.props[c as usize];
            let cs = self.derived[c as usize].draw_size;
            let scaled = Size::new(cs.width * cp.scale.x, cs.height * cp.scale.y);
            if axes.contains(Axes::X) && !cp.relative_axes.contains(Axes::X) {
                let extent = cp.anchor.x * own.width
                    + cp.offset.x * scaled.width
                    + cp.position.x
                    + scaled.width;
                span.width = span.width.max(extent);
            }
            if axes.contains(Axes::Y) && !cp.relative_axes.contains(Axes::Y) {
                let extent = cp.anchor.y * own.height
                    + cp.offset.y * scaled.height
                    + cp.position.y
                    + scaled.height;
                span.height = span.height.max(extent);
            }
        }
        span
    }

    /// One-hop ripple after the draw size of `idx` changed.
    fn draw_size_rippled(&mut self, idx: u32) {
        let i = idx as usize;
        self.mark_invalid(idx, Invalidation::GEOMETRY);
        if self.layout[i].is_some() || self.paint[i].is_some() {
            self.mark_invalid(idx, Invalidation::LAYOUT);
        }
        for k in 0..self.children[i].len() {
            let c = self.children[i][k];
            if self.props[c as usize].relative_axes.is_empty() {
                self.mark_invalid(c, Invalidation::GEOMETRY);
            } else {
                self.mark_invalid(c, Invalidation::DRAW_SIZE);
            }
        }
        self.notify_parent_of_resize(idx);
        self.damage.mark_with(idx, dirty::PAINT, &EagerPolicy);
    }

    pub(crate) fn resolve_matrix(&mut self, idx: u32) {
        let i = idx as usize;
        let p = self.parent[i];
        if p != INVALID {
            self.resolve_matrix(p);
        }
        self.resolve_draw_size(idx);
        if self.invalid[i].is_valid(Invalidation::GEOMETRY) {
            return;
        }
        self.invalid[i].validate(Invalidation::GEOMETRY);

        let (base, parent_size) = if p == INVALID {
            (Affine::IDENTITY, Size::ZERO)
        } else if self.flags[i].contains(NodeFlags::ISOLATE) {
            (Affine::IDENTITY, self.derived[p as usize].draw_size)
        } else {
            (
                self.child_access_matrix(p),
                self.derived[p as usize].draw_size,
            )
        };

        let props = self.props[i];
        let draw = self.derived[i].draw_size;
        let translation = Vec2::new(
            -props.offset.x * draw.width
                + props.position.x
                + props.anchor.x * parent_size.width
                + props.margin.x,
            -props.offset.y * draw.height
                + props.position.y
                + props.anchor.y * parent_size.height
                + props.margin.y,
        );
        let pivot = Vec2::new(
            props.offset.x * draw.width - props.margin.x,
            props.offset.y * draw.height - props.margin.y,
        );

        let mut matrix = base * Affine::translate(translation);
        if props.rotation != 0.0 {
            let radians = props.rotation * (core::f64::consts::PI / 180.0);
            matrix = matrix
                * Affine::translate(pivot)
                * Affine::rotate(radians)
                * Affine::translate(-pivot);
        }
        if props.scale != Vec2::new(1.0, 1.0) {
            matrix = matrix
                * Affine::translate(pivot)
                * Affine::scale_non_uniform(props.scale.x, props.scale.y)
                * Affine::translate(-pivot);
        }

        if self.derived[i].matrix != matrix {
            self.derived[i].matrix = matrix;
            for k in 0..self.children[i].len() {
                let c = self.children[i][k];
                self.mark_invalid(c, Invalidation::GEOMETRY);
            }
        }
    }

    pub(crate) fn resolve_world_position(&mut self, idx: u32) -> Point {
        self.resolve_matrix(idx);
        let i = idx as usize;
        let position = self.derived[i].matrix * Point::ORIGIN;
        if position != self.derived[i].world_position {
            self.derived[i].world_position = position;
            let id = self.id_of(idx);
            self.notify_world_position(id, position);
        }
        position
    }

    pub(crate) fn resolve_opacity(&mut self, idx: u32) {
        let i = idx as usize;
        let p = self.parent[i];
        if p != INVALID {
            self.resolve_opacity(p);
        }
        if self.invalid[i].is_valid(Invalidation::OPACITY) {
            return;
        }
        self.invalid[i].validate(Invalidation::OPACITY);
        let parent_opacity = if p == INVALID {
            1.0
        } else {
            self.derived[p as usize].world_opacity
        };
        let opacity = parent_opacity * self.props[i].opacity;
        if self.derived[i].world_opacity != opacity {
            self.derived[i].world_opacity = opacity;
            for k in 0..self.children[i].len() {
                let c = self.children[i][k];
                self.mark_invalid(c, Invalidation::OPACITY);
            }
        }
    }
}
