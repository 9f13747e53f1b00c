// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input event payloads.

use bitflags::bitflags;
use kurbo::{Point, Vec2};

/// A mouse button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Wheel button.
    Middle,
    /// Secondary button.
    Right,
    /// Back side button.
    Back,
    /// Forward side button.
    Forward,
}

/// The pointer that produced an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PointerSource {
    /// The mouse cursor.
    Mouse,
    /// A touch contact, by platform touch id.
    Touch(u64),
}

bitflags! {
    /// Keyboard modifiers held while an event was produced.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 1 << 0;
        /// Control.
        const CONTROL = 1 << 1;
        /// Alt / Option.
        const ALT = 1 << 2;
        /// Meta / Command / Super.
        const META = 1 << 3;
    }
}

/// A pointer event delivered to one node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// The pointer.
    pub source: PointerSource,
    /// The button, for mouse down and up.
    pub button: Option<MouseButton>,
    /// Position in scene space.
    pub position: Point,
    /// Position in the receiving node's local space (its draw rectangle
    /// spans `0..width`, `0..height`).
    pub local_position: Point,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

/// A scroll-wheel event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollEvent {
    /// Cursor position in scene space.
    pub position: Point,
    /// Scroll amount. Positive `y` scrolls content up.
    pub delta: Vec2,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

/// A key that is not a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[expect(missing_docs, reason = "key names are self-describing")]
pub enum NamedKey {
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Space,
    Function(u8),
}

/// A logical key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A named key.
    Named(NamedKey),
    /// A key producing a character.
    Character(char),
}

/// A key press or release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key.
    pub key: Key,
    /// Modifiers held.
    pub modifiers: Modifiers,
    /// Whether this press is an auto-repeat.
    pub repeat: bool,
}

impl KeyEvent {
    /// A fresh press of `key` without modifiers.
    #[must_use]
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
            repeat: false,
        }
    }
}

/// The text caret or selection moved, in character offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaretEvent {
    /// Selection start.
    pub start: usize,
    /// Selection end (equal to `start` for a plain caret).
    pub end: usize,
}

/// Hover status of a node under the mouse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HoverState {
    /// Not under the pointer.
    #[default]
    None,
    /// Under the pointer and receiving moves.
    Over,
    /// Entered during this pass and consumed the enter, hiding the nodes
    /// beneath it.
    Blocking,
    /// Under the pointer but beneath a blocking node; receives nothing.
    Blocked,
    /// Already hovered and consuming moves, hiding the nodes beneath it.
    OverBlock,
}

impl HoverState {
    /// Returns whether the node counts as hovered (it received an enter and
    /// no leave since).
    #[must_use]
    pub fn is_hovered(self) -> bool {
        matches!(self, Self::Over | Self::Blocking | Self::OverBlock)
    }

    /// Returns whether the node hides the nodes beneath it.
    #[must_use]
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Blocking | Self::OverBlock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_state_predicates() {
        assert!(!HoverState::None.is_hovered());
        assert!(!HoverState::Blocked.is_hovered());
        assert!(HoverState::Over.is_hovered());
        assert!(!HoverState::Over.is_blocking());
        assert!(HoverState::Blocking.is_blocking());
        assert!(HoverState::OverBlock.is_blocking());
    }

    #[test]
    fn key_event_defaults() {
        let e = KeyEvent::new(Key::Character('a'));
        assert!(e.modifiers.is_empty());
        assert!(!e.repeat);
    }
}
