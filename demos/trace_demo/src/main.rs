// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated frame loop that exercises the tracing and diagnostics pipeline.
//!
//! Builds a small scene, runs 60 synthetic frames of animation with a few
//! scripted pointer and keyboard events in between, and renders every frame
//! into a counting surface. Events go to both a
//! [`PrettyPrintSink`](trellis_debug::pretty::PrettyPrintSink) on stderr and
//! a [`ChromeTraceSink`](trellis_debug::chrome::ChromeTraceSink), which is
//! exported to `trace.json` at the end.

use std::cell::RefCell;
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use kurbo::{Affine, BezPath, Point, Rect, RoundedRect, Size, Vec2};
use trellis_core::animation::{Easing, Loops};
use trellis_core::backend::{DrawingSurface, FontHandle, ImageHandle, LayerHandle};
use trellis_core::config::SceneConfig;
use trellis_core::input::{InputHandlers, Key, KeyEvent, MouseButton, NamedKey};
use trellis_core::node::Scene;
use trellis_core::paint::{Fill, PaintStyle, Rgba};
use trellis_core::trace::{
    FocusChangeEvent, FrameBeginEvent, FrameSummary, InputDispatchEvent, InvalidationEvent,
    PhaseBeginEvent, PhaseEndEvent, SequenceEvent, TraceSink,
};

use trellis_debug::chrome::ChromeTraceSink;
use trellis_debug::pretty::PrettyPrintSink;

const FRAME_COUNT: u64 = 60;
/// 60 Hz frame interval in seconds.
const FRAME_INTERVAL: f64 = 1.0 / 60.0;

/// Forwards every event to the pretty printer and the Chrome collector.
#[derive(Debug)]
struct Fanout {
    pretty: PrettyPrintSink,
    chrome: Rc<RefCell<ChromeTraceSink>>,
}

impl TraceSink for Fanout {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.pretty.on_frame_begin(e);
        self.chrome.borrow_mut().on_frame_begin(e);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.pretty.on_phase_begin(e);
        self.chrome.borrow_mut().on_phase_begin(e);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.pretty.on_phase_end(e);
        self.chrome.borrow_mut().on_phase_end(e);
    }

    fn on_input(&mut self, e: &InputDispatchEvent) {
        self.pretty.on_input(e);
        self.chrome.borrow_mut().on_input(e);
    }

    fn on_focus_change(&mut self, e: &FocusChangeEvent) {
        self.pretty.on_focus_change(e);
        self.chrome.borrow_mut().on_focus_change(e);
    }

    fn on_sequence(&mut self, e: &SequenceEvent) {
        self.pretty.on_sequence(e);
        self.chrome.borrow_mut().on_sequence(e);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.pretty.on_frame_summary(s);
        self.chrome.borrow_mut().on_frame_summary(s);
    }

    fn on_invalidation(&mut self, e: &InvalidationEvent) {
        self.pretty.on_invalidation(e);
        self.chrome.borrow_mut().on_invalidation(e);
    }
}

/// A drawing surface that only counts what it is asked to draw.
#[derive(Debug, Default)]
struct CountingSurface {
    fills: usize,
    texts: usize,
}

impl DrawingSurface for CountingSurface {
    fn save(&mut self) {}

    fn restore(&mut self) {}

    fn set_matrix(&mut self, _matrix: Affine) {}

    fn clip_rect(&mut self, _rect: Rect) {}

    fn fill_rect(&mut self, _rect: Rect, _style: &PaintStyle) {
        self.fills += 1;
    }

    fn fill_rounded_rect(&mut self, _rect: RoundedRect, _style: &PaintStyle) {
        self.fills += 1;
    }

    fn fill_path(&mut self, _path: &BezPath, _style: &PaintStyle) {
        self.fills += 1;
    }

    fn stroke_path(&mut self, _path: &BezPath, _width: f64, _style: &PaintStyle) {}

    fn draw_text(
        &mut self,
        _text: &str,
        _font: FontHandle,
        _font_size: f64,
        _origin: Point,
        _style: &PaintStyle,
    ) {
        self.texts += 1;
    }

    fn draw_image(&mut self, _image: ImageHandle, _rect: Rect, _opacity: f64) {}

    fn draw_layer(&mut self, _layer: LayerHandle, _rect: Rect, _opacity: f64) {}
}

fn main() {
    // -- sinks -------------------------------------------------------------
    let chrome = Rc::new(RefCell::new(ChromeTraceSink::new()));
    let fanout = Fanout {
        pretty: PrettyPrintSink::stderr(),
        chrome: chrome.clone(),
    };

    // -- scene -------------------------------------------------------------
    let mut scene = Scene::with_config(SceneConfig::desktop());
    let _ = scene.set_trace_sink(Some(Box::new(fanout)));

    let root = scene.create_node();
    scene.set_size(root, Size::new(400.0, 300.0));
    scene.set_paint(root, Some(Box::new(Fill::new(Rgba::from_rgb8(24, 24, 32)))));
    scene.set_root(root);

    let button = scene.create_node();
    scene.set_position(button, Point::new(20.0, 20.0));
    scene.set_size(button, Size::new(120.0, 40.0));
    scene.set_paint(
        button,
        Some(Box::new(
            Fill::new(Rgba::from_rgb8(70, 130, 220)).with_corner_radius(6.0),
        )),
    );
    scene.set_input_handler(
        button,
        Some(Box::new(
            InputHandlers::new()
                .focusable(true)
                .enter(|_, _| true)
                .down(|_, _| true)
                .press(|cx, _| {
                    let node = cx.node();
                    cx.scene().animate(node, |a| {
                        a.scale_to(Vec2::new(1.1, 1.1), 0.1, Easing::QuadOut)
                            .then(0.0)
                            .scale_to(Vec2::new(1.0, 1.0), 0.1, Easing::QuadIn);
                    });
                })
                .key_down(|_, event| event.key == Key::Named(NamedKey::Enter)),
        )),
    );
    scene.add_child(root, button);

    let pulse = scene.create_node();
    scene.set_position(pulse, Point::new(200.0, 150.0));
    scene.set_size(pulse, Size::new(40.0, 40.0));
    scene.set_paint(pulse, Some(Box::new(Fill::new(Rgba::WHITE))));
    scene.add_child(root, pulse);
    scene.animate(pulse, |a| {
        a.loop_point("pulse")
            .fade_to(0.2, 0.25, Easing::CubicInOut)
            .then(0.0)
            .fade_to(1.0, 0.25, Easing::CubicInOut)
            .then(0.0)
            .looping(Loops::Times(1), Some("pulse"));
    });
    scene.animate(pulse, |a| {
        a.move_by(Vec2::new(100.0, 0.0), 0.5, Easing::Linear);
    });

    // -- simulated loop ----------------------------------------------------
    let mut surface = CountingSurface::default();
    for frame_index in 0..FRAME_COUNT {
        match frame_index {
            5 => scene.mouse_move(Point::new(40.0, 30.0)),
            10 => {
                scene.mouse_down(MouseButton::Left, Point::new(40.0, 30.0));
            }
            12 => scene.mouse_up(MouseButton::Left, Point::new(42.0, 31.0)),
            20 => {
                scene.key_down(&KeyEvent::new(Key::Named(NamedKey::Enter)));
            }
            30 => scene.mouse_move(Point::new(300.0, 250.0)),
            _ => {}
        }

        scene.update(FRAME_INTERVAL);
        scene.render(&mut surface);
    }

    println!(
        "Rendered {FRAME_COUNT} frames: {} fills, {} text runs",
        surface.fills, surface.texts
    );

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    chrome
        .borrow()
        .write_to(&mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({} events)", chrome.borrow().events().len());
}
