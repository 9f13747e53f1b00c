// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The hover pass.
//!
//! Each pass compares the positional candidates at the pointer with the
//! previous pass. Nodes no longer under the pointer receive a leave. The
//! remaining candidates are walked front to back: new ones receive an enter,
//! hovered ones a move. A node that consumes its enter (or a move) blocks
//! everything beneath it, and stays blocking while it remains hovered; the
//! blocked nodes receive a leave if they were hovered and nothing else until
//! they are uncovered.

use alloc::vec::Vec;

use kurbo::Point;

use super::event::{HoverState, PointerSource};
use crate::node::{NodeId, Scene};
use crate::trace::InputKind;

impl Scene {
    /// Runs the hover pass at `position`. With `send_moves` unset, already
    /// hovered nodes keep their state and only enters and leaves are sent.
    pub(crate) fn update_hover(&mut self, position: Point, send_moves: bool) {
        let candidates = self.positional_candidates(position);

        let gone: Vec<NodeId> = self
            .input
            .hover
            .keys()
            .filter(|n| !candidates.contains(n))
            .copied()
            .collect();
        for node in gone {
            if self
                .input
                .hover
                .remove(&node)
                .is_some_and(HoverState::is_hovered)
            {
                self.send_leave(node, position);
            }
        }

        let mut blocked = false;
        for node in candidates {
            if !self.is_alive(node) {
                continue;
            }
            let previous = self.input.hover.get(&node).copied().unwrap_or_default();
            let next = if blocked {
                if previous.is_hovered() {
                    self.send_leave(node, position);
                }
                HoverState::Blocked
            } else if previous.is_hovered() {
                let consumed = send_moves && self.send_hover(node, InputKind::Move, position);
                if previous.is_blocking() || consumed {
                    HoverState::OverBlock
                } else {
                    HoverState::Over
                }
            } else if self.send_hover(node, InputKind::Enter, position) {
                HoverState::Blocking
            } else {
                HoverState::Over
            };
            blocked |= next.is_blocking();
            if self.is_alive(node) {
                self.input.hover.insert(node, next);
            }
        }
    }

    fn send_hover(&mut self, node: NodeId, kind: InputKind, position: Point) -> bool {
        self.deliver_pointer(
            node,
            kind,
            PointerSource::Mouse,
            None,
            position,
            |h, cx, e| match kind {
                InputKind::Enter => h.on_enter(cx, e),
                _ => h.on_move(cx, e),
            },
        )
    }

    pub(crate) fn send_leave(&mut self, node: NodeId, position: Point) {
        self.deliver_pointer(
            node,
            InputKind::Leave,
            PointerSource::Mouse,
            None,
            position,
            |h, cx, e| {
                h.on_leave(cx, e);
                false
            },
        );
    }

    /// Returns the hover state of a node from the last hover pass.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn hover_state(&self, id: NodeId) -> HoverState {
        self.validate(id);
        self.input.hover.get(&id).copied().unwrap_or_default()
    }

    /// Returns whether the node received an enter and no leave since.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn is_hovered(&self, id: NodeId) -> bool {
        self.hover_state(id).is_hovered()
    }
}
