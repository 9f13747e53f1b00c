// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-based property animation.
//!
//! A [`TransformSequence`] is an ordered list of [`TransformOp`]s on one
//! target, each with a start time, a duration and an [`Easing`], plus loop
//! sentinels that jump back to named [`LoopPoint`]s. Sequences are generic
//! over their target; the scene animates nodes through the lenses in
//! [`lens`] and the [`NodeAnimator`] builder.

mod easing;
pub mod lens;
mod node;
mod sequence;
mod set;
mod tween;

pub use easing::Easing;
pub use node::NodeAnimator;
pub use sequence::{
    LoopPoint, Loops, SequenceTick, TransformOp, TransformSequence, TransformState,
};
pub use set::{SequenceId, SequenceSet};
pub use tween::{Lens, Lerp, Tween};
