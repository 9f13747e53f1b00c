// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained-mode 2D scene graph.
//!
//! `trellis_core` keeps a tree of positioned, sized and painted nodes,
//! recomputes their geometry lazily, animates their properties with
//! composable transform sequences, and routes pointer, touch, keyboard and
//! text input to them. It is `no_std` compatible (with `alloc`) and stores
//! nodes in struct-of-arrays layout behind generational handles.
//!
//! # Architecture
//!
//! The host drives the scene once per frame:
//!
//! ```text
//!   Host input ──► Scene::mouse_move / mouse_down / key_down / …
//!                          │ (hover, press and focus state machines)
//!                          ▼
//!   Frame tick ──► Scene::update(delta)
//!                    ├─ animate: TransformSequence::update per node
//!                    ├─ layout:  Layout capabilities, intrinsic sizes
//!                    └─ hover:   re-run at the last pointer position
//!                          │
//!                          ▼
//!                  Scene::evaluate() ──► FrameChanges ──► Presenter::apply()
//!                          or
//!                  Scene::render(&mut dyn DrawingSurface)
//! ```
//!
//! **[`node`]**: The [`Scene`](node::Scene) arena and its
//! [`NodeId`](node::NodeId) handles. Local properties are set by the caller;
//! draw size, world matrix, world opacity and bounds are resolved on read
//! from per-node [`invalidation`] bits.
//!
//! **[`animation`]**: Time-addressable sequences of typed property
//! mutations with easing, named loop points and seeking, generic over their
//! target, plus the node integration ([`Scene::animate`](node::Scene::animate)).
//!
//! **[`input`]**: Hit-testing and dispatch to the
//! [`InputHandler`](input::InputHandler) capability.
//!
//! **[`paint`]** and **[`layout`]**: The other two node capabilities, with
//! built-in fills, text, images, nested surfaces and a stack layout.
//!
//! **[`backend`]**: The traits the host implements: drawing surface, font
//! measurement, platform surface and retained presenter.
//!
//! **[`dirty`]**: Damage channels backing [`FrameChanges`](node::FrameChanges).
//!
//! **[`config`]** and **[`error`]**: [`SceneConfig`](config::SceneConfig)
//! presets and the [`ContractError`](error::ContractError) returned by the
//! `try_*` methods.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-node
//!   invalidation events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod animation;
pub mod backend;
pub mod config;
pub mod dirty;
pub mod error;
pub mod input;
pub mod invalidation;
pub mod layout;
pub mod node;
pub mod paint;
pub mod trace;
