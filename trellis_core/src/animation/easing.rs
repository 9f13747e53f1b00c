// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing curves.

use core::f64::consts::PI;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Maps linear progress in `0.0..=1.0` to eased progress.
///
/// The named curves are the Penner set: each family comes in an `In`
/// (accelerating), `Out` (decelerating) and `InOut` variant. Every named
/// curve maps `0.0` to `0.0` and `1.0` to `1.0`; `Back` and `Elastic`
/// overshoot in between.
#[derive(Clone, Copy, Debug, Default)]
pub enum Easing {
    /// No easing.
    #[default]
    Linear,
    /// Quadratic, accelerating.
    QuadIn,
    /// Quadratic, decelerating.
    QuadOut,
    /// Quadratic, both.
    QuadInOut,
    /// Cubic, accelerating.
    CubicIn,
    /// Cubic, decelerating.
    CubicOut,
    /// Cubic, both.
    CubicInOut,
    /// Quartic, accelerating.
    QuartIn,
    /// Quartic, decelerating.
    QuartOut,
    /// Quartic, both.
    QuartInOut,
    /// Quintic, accelerating.
    QuintIn,
    /// Quintic, decelerating.
    QuintOut,
    /// Quintic, both.
    QuintInOut,
    /// Sinusoidal, accelerating.
    SineIn,
    /// Sinusoidal, decelerating.
    SineOut,
    /// Sinusoidal, both.
    SineInOut,
    /// Exponential, accelerating.
    ExpoIn,
    /// Exponential, decelerating.
    ExpoOut,
    /// Exponential, both.
    ExpoInOut,
    /// Circular, accelerating.
    CircIn,
    /// Circular, decelerating.
    CircOut,
    /// Circular, both.
    CircInOut,
    /// Pulls back before accelerating.
    BackIn,
    /// Overshoots before settling.
    BackOut,
    /// Pulls back and overshoots.
    BackInOut,
    /// Spring wind-up.
    ElasticIn,
    /// Spring release.
    ElasticOut,
    /// Spring, both.
    ElasticInOut,
    /// Bounces before leaving.
    BounceIn,
    /// Bounces on arrival.
    BounceOut,
    /// Bounces at both ends.
    BounceInOut,
    /// A caller-supplied curve.
    Custom(fn(f64) -> f64),
}

const BACK: f64 = 1.70158;
const BACK_IN_OUT: f64 = BACK * 1.525;
const ELASTIC: f64 = 2.0 * PI / 3.0;
const ELASTIC_IN_OUT: f64 = 2.0 * PI / 4.5;

fn power_in(t: f64, n: i32) -> f64 {
    t.powi(n)
}

fn power_out(t: f64, n: i32) -> f64 {
    1.0 - (1.0 - t).powi(n)
}

fn power_in_out(t: f64, n: i32) -> f64 {
    if t < 0.5 {
        2_f64.powi(n - 1) * t.powi(n)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(n) / 2.0
    }
}

fn bounce_out(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

impl Easing {
    /// Applies the curve to `t`, which is clamped to `0.0..=1.0` first.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadIn => power_in(t, 2),
            Self::QuadOut => power_out(t, 2),
            Self::QuadInOut => power_in_out(t, 2),
            Self::CubicIn => power_in(t, 3),
            Self::CubicOut => power_out(t, 3),
            Self::CubicInOut => power_in_out(t, 3),
            Self::QuartIn => power_in(t, 4),
            Self::QuartOut => power_out(t, 4),
            Self::QuartInOut => power_in_out(t, 4),
            Self::QuintIn => power_in(t, 5),
            Self::QuintOut => power_out(t, 5),
            Self::QuintInOut => power_in_out(t, 5),
            Self::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Self::SineOut => (t * PI / 2.0).sin(),
            Self::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Self::ExpoIn => {
                if t == 0.0 {
                    0.0
                } else {
                    2_f64.powf(10.0 * t - 10.0)
                }
            }
            Self::ExpoOut => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2_f64.powf(-10.0 * t)
                }
            }
            Self::ExpoInOut => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    2_f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2_f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Self::CircIn => 1.0 - (1.0 - t * t).sqrt(),
            Self::CircOut => (1.0 - (t - 1.0) * (t - 1.0)).sqrt(),
            Self::CircInOut => {
                if t < 0.5 {
                    (1.0 - (1.0 - 4.0 * t * t).sqrt()) / 2.0
                } else {
                    let u = -2.0 * t + 2.0;
                    ((1.0 - u * u).sqrt() + 1.0) / 2.0
                }
            }
            Self::BackIn => (BACK + 1.0) * t * t * t - BACK * t * t,
            Self::BackOut => {
                let u = t - 1.0;
                1.0 + (BACK + 1.0) * u * u * u + BACK * u * u
            }
            Self::BackInOut => {
                if t < 0.5 {
                    let u = 2.0 * t;
                    u * u * ((BACK_IN_OUT + 1.0) * u - BACK_IN_OUT) / 2.0
                } else {
                    let u = 2.0 * t - 2.0;
                    (u * u * ((BACK_IN_OUT + 1.0) * u + BACK_IN_OUT) + 2.0) / 2.0
                }
            }
            Self::ElasticIn => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    -(2_f64.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * ELASTIC).sin()
                }
            }
            Self::ElasticOut => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    2_f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * ELASTIC).sin() + 1.0
                }
            }
            Self::ElasticInOut => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    -(2_f64.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * ELASTIC_IN_OUT).sin())
                        / 2.0
                } else {
                    2_f64.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * ELASTIC_IN_OUT).sin()
                        / 2.0
                        + 1.0
                }
            }
            Self::BounceIn => 1.0 - bounce_out(1.0 - t),
            Self::BounceOut => bounce_out(t),
            Self::BounceInOut => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }
            Self::Custom(f) => f(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    const NAMED: [Easing; 31] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::QuartIn,
        Easing::QuartOut,
        Easing::QuartInOut,
        Easing::QuintIn,
        Easing::QuintOut,
        Easing::QuintInOut,
        Easing::SineIn,
        Easing::SineOut,
        Easing::SineInOut,
        Easing::ExpoIn,
        Easing::ExpoOut,
        Easing::ExpoInOut,
        Easing::CircIn,
        Easing::CircOut,
        Easing::CircInOut,
        Easing::BackIn,
        Easing::BackOut,
        Easing::BackInOut,
        Easing::ElasticIn,
        Easing::ElasticOut,
        Easing::ElasticInOut,
        Easing::BounceIn,
        Easing::BounceOut,
        Easing::BounceInOut,
    ];

    #[test]
    fn named_curves_hit_both_endpoints() {
        for easing in NAMED {
            assert!(easing.apply(0.0).abs() < EPS, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < EPS, "{easing:?} at 1");
        }
    }

    #[test]
    fn in_out_curves_are_symmetric_at_midpoint() {
        for easing in [
            Easing::QuadInOut,
            Easing::CubicInOut,
            Easing::SineInOut,
            Easing::CircInOut,
            Easing::BounceInOut,
        ] {
            assert!((easing.apply(0.5) - 0.5).abs() < EPS, "{easing:?}");
        }
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
        assert_eq!(Easing::QuadIn.apply(0.5), 0.25);
    }

    #[test]
    fn back_overshoots() {
        assert!(Easing::BackIn.apply(0.2) < 0.0);
        assert!(Easing::BackOut.apply(0.8) > 1.0);
    }

    #[test]
    fn custom_curve_is_called() {
        fn step(t: f64) -> f64 {
            if t < 0.5 { 0.0 } else { 1.0 }
        }
        let easing = Easing::Custom(step);
        assert_eq!(easing.apply(0.4), 0.0);
        assert_eq!(easing.apply(0.6), 1.0);
    }
}
