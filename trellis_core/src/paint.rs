// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The paint capability and the built-in paints.
//!
//! A node becomes visible by carrying a [`Paint`]. During
//! [`Scene::render`](crate::node::Scene::render) the scene sets the node's
//! world matrix on the surface and hands the paint a [`PaintContext`] sized to
//! the node's draw size. Paints may also report an intrinsic size, which the
//! layout phase of [`Scene::update`](crate::node::Scene::update) applies to
//! the node's explicitly sized axes.
//!
//! The built-in paints render nothing while the resource they need (a font,
//! an image, an offscreen layer) is unset.

use alloc::string::String;
use core::any::Any;

use kurbo::{Point, Rect, RoundedRect, Size};

use crate::animation::Lerp;
use crate::backend::{DrawingSurface, FontHandle, FontMeasure, ImageHandle, LayerHandle};

/// A straight-alpha RGBA color with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Rgba {
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from its components.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from 8-bit components.
    #[must_use]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        )
    }

    /// Returns the color with its alpha multiplied by `opacity`.
    #[must_use]
    pub fn with_opacity(self, opacity: f64) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "opacity is in 0..=1 and f32 precision is plenty"
        )]
        let opacity = opacity as f32;
        Self {
            a: self.a * opacity,
            ..self
        }
    }
}

impl Lerp for Rgba {
    fn lerp(self, to: Self, t: f64) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "progress is in 0..=1 and f32 precision is plenty"
        )]
        let t = t as f32;
        Self {
            r: self.r + (to.r - self.r) * t,
            g: self.g + (to.g - self.g) * t,
            b: self.b + (to.b - self.b) * t,
            a: self.a + (to.a - self.a) * t,
        }
    }
}

/// Paint description passed to the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintStyle {
    /// Fill or stroke color.
    pub color: Rgba,
    /// World opacity of the node being drawn.
    pub opacity: f64,
}

/// What a paint sees while drawing.
pub struct PaintContext<'a> {
    surface: &'a mut dyn DrawingSurface,
    size: Size,
    opacity: f64,
    fonts: Option<&'a dyn FontMeasure>,
}

impl core::fmt::Debug for PaintContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PaintContext")
            .field("size", &self.size)
            .field("opacity", &self.opacity)
            .field("fonts", &self.fonts.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a> PaintContext<'a> {
    /// Creates a context for drawing a node of the given draw size and world
    /// opacity.
    pub fn new(
        surface: &'a mut dyn DrawingSurface,
        size: Size,
        opacity: f64,
        fonts: Option<&'a dyn FontMeasure>,
    ) -> Self {
        Self {
            surface,
            size,
            opacity,
            fonts,
        }
    }

    /// Returns the drawing surface, already set to the node's matrix.
    pub fn surface(&mut self) -> &mut dyn DrawingSurface {
        &mut *self.surface
    }

    /// Returns the node's draw size.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the node's local draw rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.size.to_rect()
    }

    /// Returns the node's world opacity.
    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Returns the font measurer, if one is installed.
    #[must_use]
    pub fn fonts(&self) -> Option<&'a dyn FontMeasure> {
        self.fonts
    }

    /// Returns a style for `color` at the node's world opacity.
    #[must_use]
    pub fn style(&self, color: Rgba) -> PaintStyle {
        PaintStyle {
            color,
            opacity: self.opacity,
        }
    }
}

/// The paint capability.
pub trait Paint: Any {
    /// Draws the node in its local space.
    fn paint(&self, cx: &mut PaintContext<'_>);

    /// Returns the intrinsic size of the content, if it has one.
    fn measure(&self, fonts: Option<&dyn FontMeasure>) -> Option<Size> {
        _ = fonts;
        None
    }
}

// -- Built-in paints --

/// A solid, optionally rounded rectangle covering the draw rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fill {
    /// Fill color.
    pub color: Rgba,
    /// Corner radius; zero draws a plain rectangle.
    pub corner_radius: f64,
}

impl Fill {
    /// Creates a square-cornered fill.
    #[must_use]
    pub const fn new(color: Rgba) -> Self {
        Self {
            color,
            corner_radius: 0.0,
        }
    }

    /// Sets the corner radius.
    #[must_use]
    pub const fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }
}

impl Paint for Fill {
    fn paint(&self, cx: &mut PaintContext<'_>) {
        let style = cx.style(self.color);
        let rect = cx.rect();
        if self.corner_radius > 0.0 {
            cx.surface()
                .fill_rounded_rect(RoundedRect::from_rect(rect, self.corner_radius), &style);
        } else {
            cx.surface().fill_rect(rect, &style);
        }
    }
}

/// A single run of text.
#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    /// The text to draw.
    pub text: String,
    /// Font to draw with. Nothing is drawn or measured while unset.
    pub font: Option<FontHandle>,
    /// Font size in scene units.
    pub font_size: f64,
    /// Text color.
    pub color: Rgba,
}

impl Text {
    /// Creates black text at 16 units with no font assigned.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: None,
            font_size: 16.0,
            color: Rgba::BLACK,
        }
    }

    /// Assigns the font.
    #[must_use]
    pub fn with_font(mut self, font: FontHandle) -> Self {
        self.font = Some(font);
        self
    }

    /// Sets the font size.
    #[must_use]
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }
}

impl Paint for Text {
    fn paint(&self, cx: &mut PaintContext<'_>) {
        let Some(font) = self.font else {
            return;
        };
        let style = cx.style(self.color);
        let origin = Point::new(0.0, self.font_size);
        cx.surface()
            .draw_text(&self.text, font, self.font_size, origin, &style);
    }

    fn measure(&self, fonts: Option<&dyn FontMeasure>) -> Option<Size> {
        let font = self.font?;
        Some(fonts?.measure(&self.text, font, self.font_size))
    }
}

/// An image stretched over the draw rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Image {
    /// Image to draw. Nothing is drawn while unset.
    pub image: Option<ImageHandle>,
}

impl Paint for Image {
    fn paint(&self, cx: &mut PaintContext<'_>) {
        if let Some(image) = self.image {
            let (rect, opacity) = (cx.rect(), cx.opacity());
            cx.surface().draw_image(image, rect, opacity);
        }
    }
}

/// An offscreen surface presented over the draw rectangle.
///
/// Typically carried by a node flagged
/// [`ISOLATE`](crate::node::NodeFlags::ISOLATE), whose children the host
/// renders into the layer with
/// [`Scene::render_isolated`](crate::node::Scene::render_isolated).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Surface {
    /// Backing layer. Nothing is drawn while unset.
    pub layer: Option<LayerHandle>,
}

impl Paint for Surface {
    fn paint(&self, cx: &mut PaintContext<'_>) {
        if let Some(layer) = self.layer {
            let (rect, opacity) = (cx.rect(), cx.opacity());
            cx.surface().draw_layer(layer, rect, opacity);
        }
    }
}
