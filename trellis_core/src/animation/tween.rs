// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed property access and interpolation.
//!
//! A [`Lens`] names one animatable property of a target and carries a
//! statically typed getter/setter pair for it. A [`Tween`] interpolates a
//! lens from the value it finds when it starts to an end value.

use alloc::boxed::Box;
use core::fmt;

use kurbo::{Point, Size, Vec2};

use super::sequence::TransformOp;

/// Linear interpolation between two values.
pub trait Lerp: Copy {
    /// Returns the value `t` of the way from `self` to `to`.
    fn lerp(self, to: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, to: Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Point {
    fn lerp(self, to: Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(self, to: Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Size {
    fn lerp(self, to: Self, t: f64) -> Self {
        Self::new(
            self.width + (to.width - self.width) * t,
            self.height + (to.height - self.height) * t,
        )
    }
}

/// A named getter/setter pair for one property of `T`.
pub struct Lens<T: ?Sized, V> {
    name: &'static str,
    get: Box<dyn Fn(&T) -> V>,
    set: Box<dyn Fn(&mut T, V)>,
}

impl<T: ?Sized, V> fmt::Debug for Lens<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lens")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<T: ?Sized, V> Lens<T, V> {
    /// Creates a lens. `name` identifies the property when stopping
    /// sequences and when deduplicating resets on loop.
    pub fn new(
        name: &'static str,
        get: impl Fn(&T) -> V + 'static,
        set: impl Fn(&mut T, V) + 'static,
    ) -> Self {
        Self {
            name,
            get: Box::new(get),
            set: Box::new(set),
        }
    }

    /// Returns the property name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Reads the property.
    pub fn get(&self, target: &T) -> V {
        (self.get)(target)
    }

    /// Writes the property.
    pub fn set(&self, target: &mut T, value: V) {
        (self.set)(target, value);
    }
}

/// Interpolates a property from its value at start to an end value.
///
/// The end value is computed from the start value when the tween begins, so
/// relative tweens (`by`) follow wherever the property is at that moment.
pub struct Tween<T: ?Sized, V> {
    lens: Lens<T, V>,
    end: Box<dyn Fn(V) -> V>,
    from: Option<V>,
    to: Option<V>,
}

impl<T: ?Sized, V: fmt::Debug> fmt::Debug for Tween<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("lens", &self.lens)
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}

impl<T: ?Sized, V: Lerp + 'static> Tween<T, V> {
    /// Tweens to an absolute value.
    pub fn to(lens: Lens<T, V>, value: V) -> Self {
        Self::with_end(lens, move |_| value)
    }

    /// Tweens to a value derived from the start value.
    pub fn with_end(lens: Lens<T, V>, end: impl Fn(V) -> V + 'static) -> Self {
        Self {
            lens,
            end: Box::new(end),
            from: None,
            to: None,
        }
    }
}

impl<T: ?Sized, V: Lerp> TransformOp<T> for Tween<T, V> {
    fn name(&self) -> &str {
        self.lens.name
    }

    fn begin(&mut self, target: &mut T) {
        let from = self.lens.get(target);
        self.from = Some(from);
        self.to = Some((self.end)(from));
    }

    fn apply(&mut self, target: &mut T, progress: f64) {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            self.lens.set(target, from.lerp(to, progress));
        }
    }

    fn restore(&mut self, target: &mut T) {
        if let Some(from) = self.from {
            self.lens.set(target, from);
        }
    }
}
