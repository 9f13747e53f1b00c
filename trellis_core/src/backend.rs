// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contracts for the collaborators the scene consumes but does not implement.
//!
//! The scene owns the node tree, geometry, animation and input dispatch.
//! Everything platform-specific is reached through a narrow trait:
//!
//! - **[`DrawingSurface`]**: Primitive draw and clip calls. The scene calls
//!   [`set_matrix`](DrawingSurface::set_matrix) before drawing each node and
//!   brackets every node with [`save`](DrawingSurface::save) /
//!   [`restore`](DrawingSurface::restore) so clips stay scoped.
//!
//! - **[`FontMeasure`]**: Text measurement, used to size text nodes during
//!   the layout phase of [`Scene::update`].
//!
//! - **[`PlatformSurface`]**: A property bag for cursor, clipboard, software
//!   keyboard and caret reporting, handed to input handlers.
//!
//! - **[`Presenter`]**: Applies a [`FrameChanges`] set to a retained backend
//!   tree, for backends that mirror the scene instead of redrawing it.
//!
//! Resources such as fonts, images and offscreen layers are loaded elsewhere
//! and referenced by opaque handles.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_frame(delta: f64) {
//!     // Animate, lay out and re-hover.
//!     scene.update(delta);
//!
//!     // Immediate-mode backends redraw the tree...
//!     scene.render(&mut surface);
//!
//!     // ...retained backends apply incremental damage instead.
//!     let changes = scene.evaluate();
//!     presenter.apply(&scene, &changes);
//! }
//! ```

use core::fmt;

use kurbo::{Affine, BezPath, Point, Rect, RoundedRect, Size};

use crate::node::{FrameChanges, Scene};
use crate::paint::PaintStyle;

/// An opaque reference to a font loaded by the host.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontHandle(pub u32);

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FontHandle({})", self.0)
    }
}

/// An opaque reference to an image loaded by the host.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u32);

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageHandle({})", self.0)
    }
}

/// An opaque reference to an offscreen surface owned by the host.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerHandle(pub u32);

impl fmt::Debug for LayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerHandle({})", self.0)
    }
}

/// Immediate-mode drawing target.
///
/// Coordinates passed to the draw calls are in the local space of the node
/// being drawn; the current matrix maps them to the surface.
pub trait DrawingSurface {
    /// Pushes the current matrix and clip.
    fn save(&mut self);

    /// Pops the matrix and clip pushed by the matching [`save`](Self::save).
    fn restore(&mut self);

    /// Replaces the current matrix.
    fn set_matrix(&mut self, matrix: Affine);

    /// Intersects the current clip with a rectangle.
    fn clip_rect(&mut self, rect: Rect);

    /// Fills a rectangle.
    fn fill_rect(&mut self, rect: Rect, style: &PaintStyle);

    /// Fills a rounded rectangle.
    fn fill_rounded_rect(&mut self, rect: RoundedRect, style: &PaintStyle);

    /// Fills a path.
    fn fill_path(&mut self, path: &BezPath, style: &PaintStyle);

    /// Strokes a path.
    fn stroke_path(&mut self, path: &BezPath, width: f64, style: &PaintStyle);

    /// Draws a run of text with its baseline origin at `origin`.
    fn draw_text(
        &mut self,
        text: &str,
        font: FontHandle,
        font_size: f64,
        origin: Point,
        style: &PaintStyle,
    );

    /// Draws an image stretched into `rect`.
    fn draw_image(&mut self, image: ImageHandle, rect: Rect, opacity: f64);

    /// Draws a nested offscreen surface into `rect`.
    fn draw_layer(&mut self, layer: LayerHandle, rect: Rect, opacity: f64);
}

/// Text measurement.
pub trait FontMeasure {
    /// Returns the size of `text` set in `font` at `font_size`.
    fn measure(&self, text: &str, font: FontHandle, font_size: f64) -> Size;
}

/// Mouse cursor shapes a platform may show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CursorIcon {
    /// The platform default arrow.
    #[default]
    Default,
    /// A hand, for links and buttons.
    Pointer,
    /// An I-beam, for editable text.
    Text,
    /// Dragging in progress.
    Grabbing,
    /// The action is not available.
    NotAllowed,
}

/// Window and text-input services provided by the host platform.
///
/// Every method has a no-op default so hosts implement only what they have.
pub trait PlatformSurface {
    /// Changes the mouse cursor.
    fn set_cursor(&mut self, cursor: CursorIcon) {
        _ = cursor;
    }

    /// Reads the clipboard as text.
    fn clipboard_text(&mut self) -> Option<alloc::string::String> {
        None
    }

    /// Replaces the clipboard contents.
    fn set_clipboard_text(&mut self, text: &str) {
        _ = text;
    }

    /// Shows or hides the software keyboard.
    fn set_keyboard_visible(&mut self, visible: bool) {
        _ = visible;
    }

    /// Reports the caret range of the focused text input, in bytes, so the
    /// platform can position IME candidate windows.
    fn set_caret_range(&mut self, start: usize, end: usize) {
        _ = (start, end);
    }

    /// Returns the size of the window in scene units.
    fn window_size(&self) -> Size {
        Size::ZERO
    }
}

/// Applies evaluated frame changes to a retained presentation tree.
///
/// Presenters read current values from the scene with the raw `*_at()`
/// accessors, which are up to date for every index in `changes`.
pub trait Presenter {
    /// Applies the given [`FrameChanges`] to the backing tree.
    fn apply(&mut self, scene: &Scene, changes: &FrameChanges);
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording doubles shared by the crate's tests.

    use alloc::string::{String, ToString};
    use alloc::vec::Vec;

    use super::*;

    /// One recorded drawing call.
    #[derive(Clone, Debug, PartialEq)]
    pub(crate) enum DrawCall {
        Save,
        Restore,
        SetMatrix(Affine),
        Clip(Rect),
        FillRect(Rect, f64),
        FillRoundedRect(RoundedRect),
        FillPath,
        StrokePath(f64),
        Text(String, FontHandle),
        Image(ImageHandle, Rect),
        Layer(LayerHandle, Rect),
    }

    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub(crate) calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        pub(crate) fn fills(&self) -> Vec<Rect> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    DrawCall::FillRect(r, _) => Some(*r),
                    _ => None,
                })
                .collect()
        }
    }

    impl DrawingSurface for RecordingSurface {
        fn save(&mut self) {
            self.calls.push(DrawCall::Save);
        }

        fn restore(&mut self) {
            self.calls.push(DrawCall::Restore);
        }

        fn set_matrix(&mut self, matrix: Affine) {
            self.calls.push(DrawCall::SetMatrix(matrix));
        }

        fn clip_rect(&mut self, rect: Rect) {
            self.calls.push(DrawCall::Clip(rect));
        }

        fn fill_rect(&mut self, rect: Rect, style: &PaintStyle) {
            self.calls.push(DrawCall::FillRect(rect, style.opacity));
        }

        fn fill_rounded_rect(&mut self, rect: RoundedRect, _style: &PaintStyle) {
            self.calls.push(DrawCall::FillRoundedRect(rect));
        }

        fn fill_path(&mut self, _path: &BezPath, _style: &PaintStyle) {
            self.calls.push(DrawCall::FillPath);
        }

        fn stroke_path(&mut self, _path: &BezPath, width: f64, _style: &PaintStyle) {
            self.calls.push(DrawCall::StrokePath(width));
        }

        fn draw_text(
            &mut self,
            text: &str,
            font: FontHandle,
            _font_size: f64,
            _origin: Point,
            _style: &PaintStyle,
        ) {
            self.calls.push(DrawCall::Text(text.to_string(), font));
        }

        fn draw_image(&mut self, image: ImageHandle, rect: Rect, _opacity: f64) {
            self.calls.push(DrawCall::Image(image, rect));
        }

        fn draw_layer(&mut self, layer: LayerHandle, rect: Rect, _opacity: f64) {
            self.calls.push(DrawCall::Layer(layer, rect));
        }
    }

    /// Measures every glyph as `font_size / 2` wide and `font_size` tall.
    #[derive(Debug)]
    pub(crate) struct MonoFont;

    impl FontMeasure for MonoFont {
        fn measure(&self, text: &str, _font: FontHandle, font_size: f64) -> Size {
            let glyphs = text.chars().count() as f64;
            Size::new(glyphs * font_size / 2.0, font_size)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CursorOnly(Option<CursorIcon>);

    impl PlatformSurface for CursorOnly {
        fn set_cursor(&mut self, cursor: CursorIcon) {
            self.0 = Some(cursor);
        }
    }

    #[test]
    fn platform_defaults_are_no_ops() {
        let mut platform = CursorOnly::default();
        platform.set_keyboard_visible(true);
        platform.set_caret_range(0, 3);
        assert_eq!(platform.clipboard_text(), None);
        assert_eq!(platform.window_size(), Size::ZERO);
        platform.set_cursor(CursorIcon::Text);
        assert_eq!(platform.0, Some(CursorIcon::Text));
    }

    #[test]
    fn handle_debug_format() {
        assert_eq!(alloc::format!("{:?}", FontHandle(3)), "FontHandle(3)");
        assert_eq!(alloc::format!("{:?}", ImageHandle(4)), "ImageHandle(4)");
        assert_eq!(alloc::format!("{:?}", LayerHandle(5)), "LayerHandle(5)");
    }
}
