// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Routing host input to node handlers.
//!
//! Pointer input is positional: candidates are collected by a depth-first
//! walk from the root in reverse child order, so children come before their
//! parent and later siblings (drawn on top) before earlier ones. Nodes
//! flagged [`GLOBAL_INPUT`](crate::node::NodeFlags::GLOBAL_INPUT) are not
//! positional; they see every event first. Keyboard, text and caret events
//! go to the globals and then to the focused node.
//!
//! Every cache here holds [`NodeId`]s and is purged when a node is disposed,
//! deactivated or leaves the root tree. Handlers may mutate the scene,
//! including disposing nodes that are still queued for the current event;
//! those are skipped.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use super::event::{
    CaretEvent, HoverState, KeyEvent, Modifiers, MouseButton, PointerEvent, PointerSource,
    ScrollEvent,
};
use super::handler::{EventContext, InputHandler};
use crate::node::{INVALID, NodeFlags, NodeId, Scene};
use crate::trace::{FocusChangeEvent, InputDispatchEvent, InputKind};

/// What a pressed-node list is keyed by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum PressKey {
    Mouse(MouseButton),
    Touch(u64),
}

impl PressKey {
    fn source(self) -> PointerSource {
        match self {
            Self::Mouse(_) => PointerSource::Mouse,
            Self::Touch(id) => PointerSource::Touch(id),
        }
    }

    fn button(self) -> Option<MouseButton> {
        match self {
            Self::Mouse(button) => Some(button),
            Self::Touch(_) => None,
        }
    }
}

/// Dispatch caches owned by the scene.
#[derive(Debug, Default)]
pub(crate) struct InputState {
    pub(crate) hover: BTreeMap<NodeId, HoverState>,
    pub(crate) pressed: BTreeMap<PressKey, Vec<NodeId>>,
    pub(crate) focused: Option<NodeId>,
    pub(crate) mouse_position: Option<Point>,
    pub(crate) touches: BTreeMap<u64, Point>,
    pub(crate) modifiers: Modifiers,
}

impl Scene {
    // -- Cache maintenance --

    /// Drops a node from every dispatch cache.
    pub(crate) fn forget_input(&mut self, idx: u32) {
        let node = self.id_of(idx);
        self.input.hover.remove(&node);
        for nodes in self.input.pressed.values_mut() {
            nodes.retain(|&n| n != node);
        }
        self.input.pressed.retain(|_, nodes| !nodes.is_empty());
        if self.input.focused == Some(node) {
            self.input.focused = None;
            self.tracer().focus_change(&FocusChangeEvent {
                previous: Some(node),
                next: None,
            });
        }
    }

    /// Drops a whole subtree from every dispatch cache.
    pub(crate) fn forget_input_subtree(&mut self, idx: u32) {
        for n in self.subtree(idx) {
            self.forget_input(n);
        }
    }

    // -- Delivery --

    /// Runs `f` against the node's handler. The handler is taken out of the
    /// scene for the call and put back afterwards unless the node was
    /// disposed or given a new handler meanwhile.
    ///
    /// Returns `None` if the node is gone or has no handler.
    fn with_handler<R>(
        &mut self,
        node: NodeId,
        f: impl FnOnce(&mut dyn InputHandler, &mut EventContext<'_>) -> R,
    ) -> Option<R> {
        if !self.is_alive(node) {
            return None;
        }
        let i = node.idx as usize;
        let mut handler = self.handler[i].take()?;
        let result = {
            let mut cx = EventContext::new(self, node);
            f(handler.as_mut(), &mut cx)
        };
        if self.is_alive(node) && self.handler[i].is_none() {
            self.handler[i] = Some(handler);
        }
        Some(result)
    }

    fn deliver(
        &mut self,
        node: NodeId,
        kind: InputKind,
        pointer: Option<PointerSource>,
        f: impl FnOnce(&mut dyn InputHandler, &mut EventContext<'_>) -> bool,
    ) -> bool {
        let Some(consumed) = self.with_handler(node, f) else {
            return false;
        };
        self.tracer().input(&InputDispatchEvent {
            kind,
            pointer,
            target: node,
            consumed,
        });
        consumed
    }

    pub(crate) fn deliver_pointer(
        &mut self,
        node: NodeId,
        kind: InputKind,
        source: PointerSource,
        button: Option<MouseButton>,
        position: Point,
        f: impl FnOnce(&mut dyn InputHandler, &mut EventContext<'_>, &PointerEvent) -> bool,
    ) -> bool {
        if !self.is_alive(node) {
            return false;
        }
        let local_position = self.to_local(node, position).unwrap_or(position);
        let event = PointerEvent {
            source,
            button,
            position,
            local_position,
            modifiers: self.input.modifiers,
        };
        self.deliver(node, kind, Some(source), |h, cx| f(h, cx, &event))
    }

    // -- Candidates --

    /// Nodes under `position` that accept positional input, front to back.
    pub(crate) fn positional_candidates(&mut self, position: Point) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.root != INVALID {
            self.collect_positional(self.root, position, &mut out);
        }
        out
    }

    fn collect_positional(&mut self, idx: u32, position: Point, out: &mut Vec<NodeId>) {
        let i = idx as usize;
        let flags = self.flags[i];
        if !flags.contains(NodeFlags::ACTIVE | NodeFlags::VISIBLE)
            || flags.contains(NodeFlags::BLOCK_POSITIONAL_INPUT)
        {
            return;
        }
        let clipped =
            flags.contains(NodeFlags::CLIP_CHILDREN) && !self.contains_point_at(idx, position);
        if !clipped {
            let children = self.children[i].clone();
            for &c in children.iter().rev() {
                self.collect_positional(c, position, out);
            }
        }
        if self.handler[i].is_some()
            && !flags.contains(NodeFlags::GLOBAL_INPUT)
            && self.contains_point_at(idx, position)
        {
            out.push(self.id_of(idx));
        }
    }

    /// Active nodes that receive every event, in tree order.
    pub(crate) fn global_candidates(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.root == INVALID {
            return out;
        }
        let mut stack = alloc::vec![self.root];
        while let Some(idx) = stack.pop() {
            let i = idx as usize;
            if !self.flags[i].contains(NodeFlags::ACTIVE) {
                continue;
            }
            if self.flags[i].contains(NodeFlags::GLOBAL_INPUT) && self.handler[i].is_some() {
                out.push(self.id_of(idx));
            }
            stack.extend(self.children[i].iter().rev());
        }
        out
    }

    // -- Mouse --

    /// The mouse moved to `position` (scene space).
    ///
    /// Runs the hover pass and sends drags to the nodes holding a mouse
    /// press.
    pub fn mouse_move(&mut self, position: Point) {
        self.input.mouse_position = Some(position);
        self.update_hover(position, true);

        let held: Vec<(PressKey, Vec<NodeId>)> = self
            .input
            .pressed
            .iter()
            .filter(|(key, _)| matches!(key, PressKey::Mouse(_)))
            .map(|(key, nodes)| (*key, nodes.clone()))
            .collect();
        for (key, nodes) in held {
            for node in nodes {
                self.deliver_pointer(
                    node,
                    InputKind::Move,
                    key.source(),
                    key.button(),
                    position,
                    |h, cx, e| {
                        h.on_drag(cx, e);
                        false
                    },
                );
            }
        }
    }

    /// The mouse left the window. Every hovered node receives a leave.
    pub fn mouse_exit(&mut self) {
        let Some(position) = self.input.mouse_position.take() else {
            return;
        };
        let hovered = core::mem::take(&mut self.input.hover);
        for (node, state) in hovered {
            if state.is_hovered() {
                self.send_leave(node, position);
            }
        }
    }

    /// A mouse button went down at `position`.
    ///
    /// The hover pass runs first. Globals see the press, and the first to
    /// consume it ends dispatch. Otherwise positional candidates see it front
    /// to back until one consumes it. A consuming node that accepts focus
    /// becomes focused when `button` is the configured focus button; a press
    /// nobody consumes clears focus unless configured otherwise.
    ///
    /// Returns whether a node consumed the press.
    pub fn mouse_down(&mut self, button: MouseButton, position: Point) -> bool {
        self.input.mouse_position = Some(position);
        self.update_hover(position, false);
        let moves_focus = button == self.config.focus_button;
        self.press(PressKey::Mouse(button), position, moves_focus)
    }

    /// A mouse button was released at `position`.
    ///
    /// Every node that saw the matching down receives an up, then a press
    /// if `position` is still inside it or a press-dodge if not.
    pub fn mouse_up(&mut self, button: MouseButton, position: Point) {
        self.input.mouse_position = Some(position);
        self.release(PressKey::Mouse(button), position);
    }

    /// The scroll wheel moved with the cursor at `position`.
    ///
    /// Globals see it first, then positional candidates front to back, until
    /// one consumes it. Returns whether one did.
    pub fn scroll(&mut self, position: Point, delta: Vec2) -> bool {
        let event = ScrollEvent {
            position,
            delta,
            modifiers: self.input.modifiers,
        };
        let mut targets = self.global_candidates();
        targets.extend(self.positional_candidates(position));
        for node in targets {
            let consumed = self.deliver(
                node,
                InputKind::Scroll,
                Some(PointerSource::Mouse),
                |h, cx| h.on_scroll(cx, &event),
            );
            if consumed {
                return true;
            }
        }
        false
    }

    // -- Touch --

    /// A touch contact went down. Same rules as
    /// [`mouse_down`](Self::mouse_down) with the touch treated as the focus
    /// button; concurrent touches are tracked independently by `id`.
    pub fn touch_down(&mut self, id: u64, position: Point) -> bool {
        self.input.touches.insert(id, position);
        self.press(PressKey::Touch(id), position, true)
    }

    /// A touch contact moved. The nodes that saw its down receive a drag.
    pub fn touch_move(&mut self, id: u64, position: Point) {
        self.input.touches.insert(id, position);
        let key = PressKey::Touch(id);
        let nodes = self.input.pressed.get(&key).cloned().unwrap_or_default();
        for node in nodes {
            self.deliver_pointer(
                node,
                InputKind::Move,
                key.source(),
                None,
                position,
                |h, cx, e| {
                    h.on_drag(cx, e);
                    false
                },
            );
        }
    }

    /// A touch contact lifted. See [`mouse_up`](Self::mouse_up).
    pub fn touch_up(&mut self, id: u64, position: Point) {
        self.input.touches.remove(&id);
        self.release(PressKey::Touch(id), position);
    }

    /// Returns the last known position of a touch contact.
    #[must_use]
    pub fn touch_position(&self, id: u64) -> Option<Point> {
        self.input.touches.get(&id).copied()
    }

    fn press(&mut self, key: PressKey, position: Point, moves_focus: bool) -> bool {
        let (source, button) = (key.source(), key.button());
        let mut pressed = Vec::new();

        for node in self.global_candidates() {
            let consumed = self.deliver_pointer(
                node,
                InputKind::Down,
                source,
                button,
                position,
                |h, cx, e| h.on_down(cx, e),
            );
            pressed.push(node);
            if consumed {
                self.input.pressed.insert(key, pressed);
                return true;
            }
        }

        let mut target = None;
        for node in self.positional_candidates(position) {
            let consumed = self.deliver_pointer(
                node,
                InputKind::Down,
                source,
                button,
                position,
                |h, cx, e| h.on_down(cx, e),
            );
            pressed.push(node);
            if consumed {
                target = Some(node);
                break;
            }
        }
        pressed.retain(|&n| self.is_alive(n));
        if pressed.is_empty() {
            self.input.pressed.remove(&key);
        } else {
            self.input.pressed.insert(key, pressed);
        }

        if moves_focus {
            match target {
                Some(node) if self.accepts_focus(node) => self.set_focus(Some(node)),
                Some(_) => {}
                None if self.config.clear_focus_on_miss => self.set_focus(None),
                None => {}
            }
        }
        target.is_some()
    }

    fn release(&mut self, key: PressKey, position: Point) {
        let (source, button) = (key.source(), key.button());
        let nodes = self.input.pressed.remove(&key).unwrap_or_default();
        for node in nodes {
            self.deliver_pointer(node, InputKind::Up, source, button, position, |h, cx, e| {
                h.on_up(cx, e);
                false
            });
            if !self.is_alive(node) {
                continue;
            }
            if self.contains_point_at(node.idx, position) {
                self.deliver_pointer(
                    node,
                    InputKind::Press,
                    source,
                    button,
                    position,
                    |h, cx, e| {
                        h.on_press(cx, e);
                        false
                    },
                );
            } else {
                self.deliver_pointer(
                    node,
                    InputKind::PressDodge,
                    source,
                    button,
                    position,
                    |h, cx, e| {
                        h.on_press_dodge(cx, e);
                        false
                    },
                );
            }
        }
    }

    // -- Keyboard --

    /// Sends `f` to every global, then to the focused node if it is not a
    /// global itself. Returns whether anyone consumed the event.
    fn broadcast(
        &mut self,
        kind: InputKind,
        mut f: impl FnMut(&mut dyn InputHandler, &mut EventContext<'_>) -> bool,
    ) -> bool {
        let globals = self.global_candidates();
        let mut consumed = false;
        for &node in &globals {
            consumed |= self.deliver(node, kind, None, &mut f);
        }
        if let Some(focused) = self.focused()
            && !globals.contains(&focused)
        {
            consumed |= self.deliver(focused, kind, None, &mut f);
        }
        consumed
    }

    /// A key was pressed.
    pub fn key_down(&mut self, event: &KeyEvent) -> bool {
        self.input.modifiers = event.modifiers;
        self.broadcast(InputKind::KeyDown, |h, cx| h.on_key_down(cx, event))
    }

    /// A key was released.
    pub fn key_up(&mut self, event: &KeyEvent) -> bool {
        self.input.modifiers = event.modifiers;
        self.broadcast(InputKind::KeyUp, |h, cx| h.on_key_up(cx, event))
    }

    /// Text was committed by the platform (typing or an input method).
    pub fn text_input(&mut self, text: &str) -> bool {
        self.broadcast(InputKind::Text, |h, cx| h.on_text(cx, text))
    }

    /// The platform moved the caret or selection.
    pub fn caret_moved(&mut self, event: &CaretEvent) -> bool {
        self.broadcast(InputKind::Caret, |h, cx| h.on_caret(cx, event))
    }

    /// Records the modifiers currently held; they are stamped on pointer and
    /// scroll events.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.input.modifiers = modifiers;
    }

    /// Returns the modifiers currently held.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.input.modifiers
    }

    // -- Focus --

    /// Moves keyboard focus. The previous node is blurred before the new one
    /// is focused.
    ///
    /// # Panics
    ///
    /// Panics if `node` is a stale handle.
    pub fn set_focus(&mut self, node: Option<NodeId>) {
        if let Some(n) = node {
            self.validate(n);
        }
        let previous = self.focused();
        if previous == node {
            return;
        }
        self.input.focused = node;
        self.tracer().focus_change(&FocusChangeEvent {
            previous,
            next: node,
        });
        if let Some(prev) = previous {
            self.with_handler(prev, |h, cx| h.on_blur(cx));
        }
        if let Some(next) = node
            && self.input.focused == Some(next)
        {
            self.with_handler(next, |h, cx| h.on_focus(cx));
        }
    }

    /// Returns the focused node.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.input.focused.filter(|&n| self.is_alive(n))
    }

    fn accepts_focus(&self, node: NodeId) -> bool {
        self.is_alive(node)
            && self.handler[node.idx as usize]
                .as_ref()
                .is_some_and(|h| h.accepts_focus())
    }

    /// Returns the last position reported by [`mouse_move`](Self::mouse_move),
    /// [`mouse_down`](Self::mouse_down) or [`mouse_up`](Self::mouse_up).
    #[must_use]
    pub fn mouse_position(&self) -> Option<Point> {
        self.input.mouse_position
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::string::{String, ToString};
    use core::cell::RefCell;

    use kurbo::Size;

    use super::*;
    use crate::input::{InputHandlers, Key, NamedKey};

    type Log = Rc<RefCell<Vec<String>>>;

    fn entry(log: &Log, name: &str, what: &str) {
        log.borrow_mut().push(alloc::format!("{name}:{what}"));
    }

    /// A handler that logs every call and consumes downs when `consume` is set.
    fn logging(
        log: &Log,
        name: &'static str,
        consume: bool,
        focusable: bool,
    ) -> Box<InputHandlers> {
        let (l1, l2, l3, l4, l5, l6, l7, l8) = (
            log.clone(),
            log.clone(),
            log.clone(),
            log.clone(),
            log.clone(),
            log.clone(),
            log.clone(),
            log.clone(),
        );
        Box::new(
            InputHandlers::new()
                .focusable(focusable)
                .down(move |_, _| {
                    entry(&l1, name, "down");
                    consume
                })
                .up(move |_, _| entry(&l2, name, "up"))
                .press(move |_, _| entry(&l3, name, "press"))
                .press_dodge(move |_, _| entry(&l4, name, "dodge"))
                .focus(move |_| entry(&l5, name, "focus"))
                .blur(move |_| entry(&l6, name, "blur"))
                .key_down(move |_, _| {
                    entry(&l7, name, "key");
                    false
                })
                .leave(move |_, _| entry(&l8, name, "leave")),
        )
    }

    /// A 100x100 root with a node covering `rect` (origin and size).
    fn scene_with_child(origin: Point, size: Size) -> (Scene, NodeId, NodeId) {
        let mut scene = Scene::new();
        let root = scene.create_node();
        scene.set_size(root, Size::new(100.0, 100.0));
        scene.set_root(root);
        let child = scene.create_node();
        scene.set_position(child, origin);
        scene.set_size(child, size);
        scene.add_child(root, child);
        (scene, root, child)
    }

    fn take(log: &Log) -> Vec<String> {
        core::mem::take(&mut *log.borrow_mut())
    }

    #[test]
    fn consumed_press_focuses_and_click_completes() {
        let log = Log::default();
        let (mut scene, _, field) = scene_with_child(Point::ORIGIN, Size::new(50.0, 50.0));
        scene.set_input_handler(field, Some(logging(&log, "field", true, true)));

        assert!(scene.mouse_down(MouseButton::Left, Point::new(10.0, 10.0)));
        assert_eq!(scene.focused(), Some(field));
        scene.mouse_up(MouseButton::Left, Point::new(12.0, 12.0));
        assert_eq!(take(&log), ["field:down", "field:focus", "field:up", "field:press"]);
    }

    #[test]
    fn release_outside_is_a_press_dodge() {
        let log = Log::default();
        let (mut scene, _, button) = scene_with_child(Point::ORIGIN, Size::new(50.0, 50.0));
        scene.set_input_handler(button, Some(logging(&log, "button", true, false)));

        scene.mouse_down(MouseButton::Left, Point::new(10.0, 10.0));
        scene.mouse_up(MouseButton::Left, Point::new(80.0, 80.0));
        assert_eq!(take(&log), ["button:down", "button:up", "button:dodge"]);
        assert_eq!(scene.focused(), None, "not focusable");
    }

    #[test]
    fn miss_clears_focus_unless_sticky() {
        let log = Log::default();
        let (mut scene, _, field) = scene_with_child(Point::ORIGIN, Size::new(50.0, 50.0));
        scene.set_input_handler(field, Some(logging(&log, "field", true, true)));
        scene.set_focus(Some(field));
        take(&log);

        scene.set_config(crate::config::SceneConfig::sticky_focus());
        assert!(!scene.mouse_down(MouseButton::Left, Point::new(80.0, 80.0)));
        assert_eq!(scene.focused(), Some(field));

        scene.set_config(crate::config::SceneConfig::desktop());
        scene.mouse_down(MouseButton::Left, Point::new(80.0, 80.0));
        assert_eq!(scene.focused(), None);
        assert_eq!(take(&log), ["field:blur"]);
    }

    #[test]
    fn non_focus_button_leaves_focus_alone() {
        let log = Log::default();
        let (mut scene, _, field) = scene_with_child(Point::ORIGIN, Size::new(50.0, 50.0));
        scene.set_input_handler(field, Some(logging(&log, "field", true, true)));
        scene.mouse_down(MouseButton::Right, Point::new(10.0, 10.0));
        assert_eq!(scene.focused(), None);
    }

    #[test]
    fn topmost_sibling_gets_the_press_first() {
        let log = Log::default();
        let (mut scene, root, below) = scene_with_child(Point::ORIGIN, Size::new(50.0, 50.0));
        let above = scene.create_node();
        scene.set_size(above, Size::new(50.0, 50.0));
        scene.add_child(root, above);
        scene.set_input_handler(below, Some(logging(&log, "below", true, false)));
        scene.set_input_handler(above, Some(logging(&log, "above", true, false)));

        scene.mouse_down(MouseButton::Left, Point::new(5.0, 5.0));
        assert_eq!(take(&log), ["above:down"]);

        scene.set_z_index(below, 1);
        scene.mouse_down(MouseButton::Middle, Point::new(5.0, 5.0));
        assert_eq!(take(&log), ["below:down"]);
    }

    #[test]
    fn unconsumed_down_falls_through_and_every_receiver_gets_up() {
        let log = Log::default();
        let (mut scene, root, below) = scene_with_child(Point::ORIGIN, Size::new(50.0, 50.0));
        let above = scene.create_node();
        scene.set_size(above, Size::new(50.0, 50.0));
        scene.add_child(root, above);
        scene.set_input_handler(below, Some(logging(&log, "below", true, false)));
        scene.set_input_handler(above, Some(logging(&log, "above", false, false)));

        scene.mouse_down(MouseButton::Left, Point::new(5.0, 5.0));
        scene.mouse_up(MouseButton::Left, Point::new(5.0, 5.0));
        assert_eq!(
            take(&log),
            ["above:down", "below:down", "above:up", "above:press", "below:up", "below:press"]
        );
    }

    #[test]
    fn children_come_before_their_parent() {
        let log = Log::default();
        let (mut scene, root, child) = scene_with_child(Point::ORIGIN, Size::new(50.0, 50.0));
        scene.set_input_handler(root, Some(logging(&log, "root", false, false)));
        scene.set_input_handler(child, Some(logging(&log, "child", false, false)));
        scene.mouse_down(MouseButton::Left, Point::new(5.0, 5.0));
        assert_eq!(take(&log), ["child:down", "root:down"]);
    }

    #[test]
    fn blocked_subtree_receives_no_positional_input() {
        let log = Log::default();
        let (mut scene, _, panel) = scene_with_child(Point::ORIGIN, Size::new(50.0, 50.0));
        let inner = scene.create_node();
        scene.set_size(inner, Size::new(50.0, 50.0));
        scene.add_child(panel, inner);
        scene.set_input_handler(inner, Some(logging(&log, "inner", true, false)));
        scene.set_block_positional_input(panel, true);

        assert!(!scene.mouse_down(MouseButton::Left, Point::new(5.0, 5.0)));
        assert!(take(&log).is_empty());
    }

    #[test]
    fn globals_see_presses_first_regardless_of_position() {
        let log = Log::default();
        let (mut scene, root, target) = scene_with_child(Point::ORIGIN, Size::new(50.0, 50.0));
        let shortcut = scene.create_node();
        scene.add_child(root, shortcut);
        scene.set_global_input(shortcut, true);
        scene.set_input_handler(shortcut, Some(logging(&log, "global", false, false)));
        scene.set_input_handler(target, Some(logging(&log, "target", true, false)));

        scene.mouse_down(MouseButton::Left, Point::new(5.0, 5.0));
        assert_eq!(take(&log), ["global:down", "target:down"]);
    }

    #[test]
    fn keys_go_to_globals_then_the_focused_node() {
        let log = Log::default();
        let (mut scene, root, field) = scene_with_child(Point::ORIGIN, Size::new(50.0, 50.0));
        let shortcut = scene.create_node();
        scene.add_child(root, shortcut);
        scene.set_global_input(shortcut, true);
        scene.set_input_handler(shortcut, Some(logging(&log, "global", false, false)));
        scene.set_input_handler(field, Some(logging(&log, "field", true, true)));

        scene.key_down(&KeyEvent::new(Key::Named(NamedKey::Enter)));
        assert_eq!(take(&log), ["global:key"]);

        scene.set_focus(Some(field));
        take(&log);
        scene.key_down(&KeyEvent::new(Key::Character('x')));
        assert_eq!(take(&log), ["global:key", "field:key"]);
    }

    #[test]
    fn focus_change_blurs_before_focusing() {
        let log = Log::default();
        let (mut scene, root, a) = scene_with_child(Point::ORIGIN, Size::new(50.0, 50.0));
        let b = scene.create_node();
        scene.add_child(root, b);
        scene.set_input_handler(a, Some(logging(&log, "a", true, true)));
        scene.set_input_handler(b, Some(logging(&log, "b", true, true)));

        scene.set_focus(Some(a));
        scene.set_focus(Some(a));
        scene.set_focus(Some(b));
        assert_eq!(take(&log), ["a:focus", "a:blur", "b:focus"]);
    }

    #[test]
    fn disposing_purges_focus_hover_and_presses() {
        let log = Log::default();
        let (mut scene, _, field) = scene_with_child(Point::ORIGIN, Size::new(50.0, 50.0));
        scene.set_input_handler(field, Some(logging(&log, "field", true, true)));
        scene.mouse_move(Point::new(5.0, 5.0));
        scene.mouse_down(MouseButton::Left, Point::new(5.0, 5.0));
        assert_eq!(scene.hover_state(field), HoverState::Over);

        scene.dispose(field);
        assert_eq!(scene.focused(), None);
        assert!(scene.input.hover.is_empty());
        assert!(scene.input.pressed.is_empty());
        scene.mouse_up(MouseButton::Left, Point::new(5.0, 5.0));
        assert_eq!(take(&log), ["field:down", "field:focus"]);
    }

    #[test]
    fn deactivating_purges_the_subtree() {
        let log = Log::default();
        let (mut scene, root, field) = scene_with_child(Point::ORIGIN, Size::new(50.0, 50.0));
        scene.set_input_handler(field, Some(logging(&log, "field", true, true)));
        scene.mouse_down(MouseButton::Left, Point::new(5.0, 5.0));
        scene.set_active(root, false);
        assert_eq!(scene.focused(), None);
        assert!(scene.input.pressed.is_empty());
    }

    #[test]
    fn handler_may_dispose_its_own_node() {
        let (mut scene, _, button) = scene_with_child(Point::ORIGIN, Size::new(50.0, 50.0));
        scene.set_input_handler(
            button,
            Some(Box::new(InputHandlers::new().down(|cx, _| {
                let node = cx.node();
                cx.scene().dispose(node);
                true
            }))),
        );
        assert!(scene.mouse_down(MouseButton::Left, Point::new(5.0, 5.0)));
        assert!(!scene.is_alive(button));
        scene.mouse_up(MouseButton::Left, Point::new(5.0, 5.0));
    }

    #[test]
    fn touches_are_tracked_independently() {
        let log = Log::default();
        let (mut scene, root, left) = scene_with_child(Point::ORIGIN, Size::new(50.0, 100.0));
        let right = scene.create_node();
        scene.set_position(right, Point::new(50.0, 0.0));
        scene.set_size(right, Size::new(50.0, 100.0));
        scene.add_child(root, right);
        scene.set_input_handler(left, Some(logging(&log, "left", true, false)));
        scene.set_input_handler(right, Some(logging(&log, "right", true, false)));

        scene.touch_down(1, Point::new(10.0, 10.0));
        scene.touch_down(2, Point::new(60.0, 10.0));
        scene.touch_up(2, Point::new(60.0, 10.0));
        assert_eq!(
            take(&log),
            ["left:down", "right:down", "right:up", "right:press"]
        );
        assert_eq!(scene.touch_position(1), Some(Point::new(10.0, 10.0)));
        assert_eq!(scene.touch_position(2), None);

        scene.touch_up(1, Point::new(60.0, 10.0));
        assert_eq!(take(&log), ["left:up", "left:dodge"]);
    }

    #[test]
    fn drags_reach_the_pressed_node() {
        let drags = Rc::new(RefCell::new(Vec::new()));
        let (mut scene, _, handle) = scene_with_child(Point::ORIGIN, Size::new(10.0, 10.0));
        let seen = drags.clone();
        scene.set_input_handler(
            handle,
            Some(Box::new(
                InputHandlers::new()
                    .down(|_, _| true)
                    .drag(move |_, e| seen.borrow_mut().push(e.position)),
            )),
        );
        scene.mouse_down(MouseButton::Left, Point::new(5.0, 5.0));
        scene.mouse_move(Point::new(40.0, 40.0));
        scene.mouse_up(MouseButton::Left, Point::new(40.0, 40.0));
        scene.mouse_move(Point::new(45.0, 45.0));
        assert_eq!(*drags.borrow(), [Point::new(40.0, 40.0)]);
    }

    #[test]
    fn scroll_stops_at_the_first_consumer() {
        let (mut scene, root, list) = scene_with_child(Point::ORIGIN, Size::new(50.0, 50.0));
        let hits = Rc::new(RefCell::new(Vec::new()));
        let (h1, h2) = (hits.clone(), hits.clone());
        scene.set_input_handler(
            list,
            Some(Box::new(InputHandlers::new().scroll(move |_, e| {
                h1.borrow_mut().push(("list", e.delta));
                true
            }))),
        );
        scene.set_input_handler(
            root,
            Some(Box::new(InputHandlers::new().scroll(move |_, e| {
                h2.borrow_mut().push(("root", e.delta));
                true
            }))),
        );
        assert!(scene.scroll(Point::new(5.0, 5.0), Vec2::new(0.0, 3.0)));
        assert!(scene.scroll(Point::new(80.0, 80.0), Vec2::new(0.0, 1.0)));
        assert_eq!(
            *hits.borrow(),
            [("list", Vec2::new(0.0, 3.0)), ("root", Vec2::new(0.0, 1.0))]
        );
    }

    #[test]
    fn local_position_is_in_node_space() {
        let (mut scene, _, node) = scene_with_child(Point::new(20.0, 30.0), Size::new(10.0, 10.0));
        let seen = Rc::new(RefCell::new(None));
        let out = seen.clone();
        scene.set_input_handler(
            node,
            Some(Box::new(InputHandlers::new().down(move |_, e| {
                *out.borrow_mut() = Some(e.local_position);
                true
            }))),
        );
        scene.mouse_down(MouseButton::Left, Point::new(25.0, 33.0));
        let local = seen.borrow().unwrap_or(Point::new(f64::NAN, f64::NAN));
        assert!((local.x - 5.0).abs() < 1e-9 && (local.y - 3.0).abs() < 1e-9);
    }

    #[test]
    fn text_reaches_the_focused_node() {
        let (mut scene, _, field) = scene_with_child(Point::ORIGIN, Size::new(50.0, 50.0));
        let typed = Rc::new(RefCell::new(String::new()));
        let out = typed.clone();
        scene.set_input_handler(
            field,
            Some(Box::new(InputHandlers::new().text(move |_, text| {
                out.borrow_mut().push_str(text);
                true
            }))),
        );
        assert!(!scene.text_input("lost"));
        scene.set_focus(Some(field));
        assert!(scene.text_input("ab"));
        assert!(scene.text_input("c"));
        assert_eq!(*typed.borrow(), "abc".to_string());
    }
}
