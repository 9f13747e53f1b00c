// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input hit-testing and dispatch.
//!
//! The host forwards raw input to the scene ([`Scene::mouse_move`],
//! [`Scene::mouse_down`], [`Scene::touch_down`], [`Scene::key_down`] and
//! friends), which routes it to the [`InputHandler`] capability of the nodes
//! involved and keeps the hover, press and focus state between events.
//!
//! [`Scene::mouse_move`]: crate::node::Scene::mouse_move
//! [`Scene::mouse_down`]: crate::node::Scene::mouse_down
//! [`Scene::touch_down`]: crate::node::Scene::touch_down
//! [`Scene::key_down`]: crate::node::Scene::key_down

mod dispatch;
mod event;
mod handler;
mod hover;

pub(crate) use dispatch::InputState;
pub use event::{
    CaretEvent, HoverState, Key, KeyEvent, Modifiers, MouseButton, NamedKey, PointerEvent,
    PointerSource, ScrollEvent,
};
pub use handler::{EventContext, InputHandler, InputHandlers};
