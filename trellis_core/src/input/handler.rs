// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The input capability.

use alloc::boxed::Box;
use core::fmt;

use super::event::{CaretEvent, KeyEvent, PointerEvent, ScrollEvent};
use crate::backend::PlatformSurface;
use crate::node::{NodeId, Scene};

/// What a handler gets besides the event: the scene it lives in and its own
/// node.
///
/// The scene may be mutated freely, including disposing the node itself.
/// The node's own handler is detached from the scene for the duration of the
/// call, so it is not re-entered.
pub struct EventContext<'a> {
    scene: &'a mut Scene,
    node: NodeId,
}

impl fmt::Debug for EventContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventContext")
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

impl<'a> EventContext<'a> {
    pub(crate) fn new(scene: &'a mut Scene, node: NodeId) -> Self {
        Self { scene, node }
    }

    /// Returns the scene.
    pub fn scene(&mut self) -> &mut Scene {
        self.scene
    }

    /// Returns the node receiving the event.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Returns the platform surface, if the host installed one.
    pub fn platform(&mut self) -> Option<&mut (dyn PlatformSurface + 'static)> {
        self.scene.platform()
    }
}

/// Receives input for one node.
///
/// Methods returning `bool` report whether the event was consumed. Every
/// method defaults to ignoring the event.
#[expect(unused_variables, reason = "default methods ignore their arguments")]
pub trait InputHandler {
    /// Whether a consumed press moves keyboard focus here.
    fn accepts_focus(&self) -> bool {
        false
    }

    /// The pointer entered the node. Consuming blocks hover for the nodes
    /// beneath it.
    fn on_enter(&mut self, cx: &mut EventContext<'_>, event: &PointerEvent) -> bool {
        false
    }

    /// The pointer left the node, or the node became blocked.
    fn on_leave(&mut self, cx: &mut EventContext<'_>, event: &PointerEvent) {}

    /// The pointer moved over the node. Consuming blocks hover for the nodes
    /// beneath it.
    fn on_move(&mut self, cx: &mut EventContext<'_>, event: &PointerEvent) -> bool {
        false
    }

    /// A button or touch went down on the node.
    fn on_down(&mut self, cx: &mut EventContext<'_>, event: &PointerEvent) -> bool {
        false
    }

    /// The button or touch that went down here was released.
    fn on_up(&mut self, cx: &mut EventContext<'_>, event: &PointerEvent) {}

    /// Released inside the node after going down on it.
    fn on_press(&mut self, cx: &mut EventContext<'_>, event: &PointerEvent) {}

    /// Released outside the node after going down on it.
    fn on_press_dodge(&mut self, cx: &mut EventContext<'_>, event: &PointerEvent) {}

    /// A pointer that went down here moved (a drag).
    fn on_drag(&mut self, cx: &mut EventContext<'_>, event: &PointerEvent) {}

    /// The scroll wheel moved over the node.
    fn on_scroll(&mut self, cx: &mut EventContext<'_>, event: &ScrollEvent) -> bool {
        false
    }

    /// A key was pressed.
    fn on_key_down(&mut self, cx: &mut EventContext<'_>, event: &KeyEvent) -> bool {
        false
    }

    /// A key was released.
    fn on_key_up(&mut self, cx: &mut EventContext<'_>, event: &KeyEvent) -> bool {
        false
    }

    /// Text was committed.
    fn on_text(&mut self, cx: &mut EventContext<'_>, text: &str) -> bool {
        false
    }

    /// The caret or selection moved.
    fn on_caret(&mut self, cx: &mut EventContext<'_>, event: &CaretEvent) -> bool {
        false
    }

    /// The node gained keyboard focus.
    fn on_focus(&mut self, cx: &mut EventContext<'_>) {}

    /// The node lost keyboard focus.
    fn on_blur(&mut self, cx: &mut EventContext<'_>) {}
}

type PointerFn = Box<dyn FnMut(&mut EventContext<'_>, &PointerEvent) -> bool>;
type PointerNotifyFn = Box<dyn FnMut(&mut EventContext<'_>, &PointerEvent)>;
type ScrollFn = Box<dyn FnMut(&mut EventContext<'_>, &ScrollEvent) -> bool>;
type KeyFn = Box<dyn FnMut(&mut EventContext<'_>, &KeyEvent) -> bool>;
type TextFn = Box<dyn FnMut(&mut EventContext<'_>, &str) -> bool>;
type FocusFn = Box<dyn FnMut(&mut EventContext<'_>)>;

/// An [`InputHandler`] assembled from closures.
///
/// ```rust,ignore
/// scene.set_input_handler(
///     button,
///     Some(Box::new(
///         InputHandlers::new()
///             .focusable(true)
///             .down(|_, _| true)
///             .press(|cx, _| clicked(cx.node())),
///     )),
/// );
/// ```
#[derive(Default)]
pub struct InputHandlers {
    focusable: bool,
    enter: Option<PointerFn>,
    leave: Option<PointerNotifyFn>,
    moved: Option<PointerFn>,
    down: Option<PointerFn>,
    up: Option<PointerNotifyFn>,
    press: Option<PointerNotifyFn>,
    press_dodge: Option<PointerNotifyFn>,
    drag: Option<PointerNotifyFn>,
    scroll: Option<ScrollFn>,
    key_down: Option<KeyFn>,
    key_up: Option<KeyFn>,
    text: Option<TextFn>,
    focus: Option<FocusFn>,
    blur: Option<FocusFn>,
}

impl fmt::Debug for InputHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputHandlers")
            .field("focusable", &self.focusable)
            .field("enter", &self.enter.is_some())
            .field("down", &self.down.is_some())
            .field("press", &self.press.is_some())
            .field("key_down", &self.key_down.is_some())
            .finish_non_exhaustive()
    }
}

impl InputHandlers {
    /// Creates a handler that ignores everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether consumed presses move focus here.
    #[must_use]
    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    /// Handles pointer enter.
    #[must_use]
    pub fn enter(
        mut self,
        f: impl FnMut(&mut EventContext<'_>, &PointerEvent) -> bool + 'static,
    ) -> Self {
        self.enter = Some(Box::new(f));
        self
    }

    /// Handles pointer leave.
    #[must_use]
    pub fn leave(mut self, f: impl FnMut(&mut EventContext<'_>, &PointerEvent) + 'static) -> Self {
        self.leave = Some(Box::new(f));
        self
    }

    /// Handles pointer moves.
    #[must_use]
    pub fn moved(
        mut self,
        f: impl FnMut(&mut EventContext<'_>, &PointerEvent) -> bool + 'static,
    ) -> Self {
        self.moved = Some(Box::new(f));
        self
    }

    /// Handles button or touch down.
    #[must_use]
    pub fn down(
        mut self,
        f: impl FnMut(&mut EventContext<'_>, &PointerEvent) -> bool + 'static,
    ) -> Self {
        self.down = Some(Box::new(f));
        self
    }

    /// Handles release.
    #[must_use]
    pub fn up(mut self, f: impl FnMut(&mut EventContext<'_>, &PointerEvent) + 'static) -> Self {
        self.up = Some(Box::new(f));
        self
    }

    /// Handles a completed press.
    #[must_use]
    pub fn press(mut self, f: impl FnMut(&mut EventContext<'_>, &PointerEvent) + 'static) -> Self {
        self.press = Some(Box::new(f));
        self
    }

    /// Handles a release outside the node.
    #[must_use]
    pub fn press_dodge(
        mut self,
        f: impl FnMut(&mut EventContext<'_>, &PointerEvent) + 'static,
    ) -> Self {
        self.press_dodge = Some(Box::new(f));
        self
    }

    /// Handles drags.
    #[must_use]
    pub fn drag(mut self, f: impl FnMut(&mut EventContext<'_>, &PointerEvent) + 'static) -> Self {
        self.drag = Some(Box::new(f));
        self
    }

    /// Handles the scroll wheel.
    #[must_use]
    pub fn scroll(
        mut self,
        f: impl FnMut(&mut EventContext<'_>, &ScrollEvent) -> bool + 'static,
    ) -> Self {
        self.scroll = Some(Box::new(f));
        self
    }

    /// Handles key presses.
    #[must_use]
    pub fn key_down(
        mut self,
        f: impl FnMut(&mut EventContext<'_>, &KeyEvent) -> bool + 'static,
    ) -> Self {
        self.key_down = Some(Box::new(f));
        self
    }

    /// Handles key releases.
    #[must_use]
    pub fn key_up(
        mut self,
        f: impl FnMut(&mut EventContext<'_>, &KeyEvent) -> bool + 'static,
    ) -> Self {
        self.key_up = Some(Box::new(f));
        self
    }

    /// Handles committed text.
    #[must_use]
    pub fn text(mut self, f: impl FnMut(&mut EventContext<'_>, &str) -> bool + 'static) -> Self {
        self.text = Some(Box::new(f));
        self
    }

    /// Handles focus gain.
    #[must_use]
    pub fn focus(mut self, f: impl FnMut(&mut EventContext<'_>) + 'static) -> Self {
        self.focus = Some(Box::new(f));
        self
    }

    /// Handles focus loss.
    #[must_use]
    pub fn blur(mut self, f: impl FnMut(&mut EventContext<'_>) + 'static) -> Self {
        self.blur = Some(Box::new(f));
        self
    }
}

impl InputHandler for InputHandlers {
    fn accepts_focus(&self) -> bool {
        self.focusable
    }

    fn on_enter(&mut self, cx: &mut EventContext<'_>, event: &PointerEvent) -> bool {
        self.enter.as_mut().is_some_and(|f| f(cx, event))
    }

    fn on_leave(&mut self, cx: &mut EventContext<'_>, event: &PointerEvent) {
        if let Some(f) = &mut self.leave {
            f(cx, event);
        }
    }

    fn on_move(&mut self, cx: &mut EventContext<'_>, event: &PointerEvent) -> bool {
        self.moved.as_mut().is_some_and(|f| f(cx, event))
    }

    fn on_down(&mut self, cx: &mut EventContext<'_>, event: &PointerEvent) -> bool {
        self.down.as_mut().is_some_and(|f| f(cx, event))
    }

    fn on_up(&mut self, cx: &mut EventContext<'_>, event: &PointerEvent) {
        if let Some(f) = &mut self.up {
            f(cx, event);
        }
    }

    fn on_press(&mut self, cx: &mut EventContext<'_>, event: &PointerEvent) {
        if let Some(f) = &mut self.press {
            f(cx, event);
        }
    }

    fn on_press_dodge(&mut self, cx: &mut EventContext<'_>, event: &PointerEvent) {
        if let Some(f) = &mut self.press_dodge {
            f(cx, event);
        }
    }

    fn on_drag(&mut self, cx: &mut EventContext<'_>, event: &PointerEvent) {
        if let Some(f) = &mut self.drag {
            f(cx, event);
        }
    }

    fn on_scroll(&mut self, cx: &mut EventContext<'_>, event: &ScrollEvent) -> bool {
        self.scroll.as_mut().is_some_and(|f| f(cx, event))
    }

    fn on_key_down(&mut self, cx: &mut EventContext<'_>, event: &KeyEvent) -> bool {
        self.key_down.as_mut().is_some_and(|f| f(cx, event))
    }

    fn on_key_up(&mut self, cx: &mut EventContext<'_>, event: &KeyEvent) -> bool {
        self.key_up.as_mut().is_some_and(|f| f(cx, event))
    }

    fn on_text(&mut self, cx: &mut EventContext<'_>, text: &str) -> bool {
        self.text.as_mut().is_some_and(|f| f(cx, text))
    }

    fn on_focus(&mut self, cx: &mut EventContext<'_>) {
        if let Some(f) = &mut self.focus {
            f(cx);
        }
    }

    fn on_blur(&mut self, cx: &mut EventContext<'_>) {
        if let Some(f) = &mut self.blur {
            f(cx);
        }
    }
}
