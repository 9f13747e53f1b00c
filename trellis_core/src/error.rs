// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract violations.
//!
//! Misuse of the scene API panics at the call site, with the condition
//! documented under `# Panics`. The `try_*` variants of those methods return
//! a [`ContractError`] instead, for callers that build scenes from untrusted
//! descriptions.

use alloc::string::String;
use core::fmt;

/// A violated API contract.
#[derive(Clone, Debug, PartialEq)]
pub enum ContractError {
    /// An explicit size was set on a node whose size is fully derived from
    /// its parent and its children on both axes.
    SizeFullyRelative,
    /// A loop referenced a loop point that was never recorded.
    UnknownLoopPoint(String),
    /// A transform was given a negative duration.
    NegativeDuration(f64),
    /// A transform was given a negative start time.
    NegativeStartTime(f64),
    /// The requested parent is the node itself or one of its descendants.
    CyclicParent,
    /// The scene root was given a parent.
    ParentedRoot,
    /// A content container must be the node itself or one of its descendants.
    ForeignContentContainer,
}

impl fmt::Display for ContractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeFullyRelative => {
                f.write_str("cannot set an explicit size on a node that is fully relative")
            }
            Self::UnknownLoopPoint(name) => write!(f, "unknown loop point `{name}`"),
            Self::NegativeDuration(d) => write!(f, "negative transform duration: {d}"),
            Self::NegativeStartTime(t) => write!(f, "negative transform start time: {t}"),
            Self::CyclicParent => f.write_str("a node cannot become its own ancestor"),
            Self::ParentedRoot => f.write_str("the scene root cannot have a parent"),
            Self::ForeignContentContainer => {
                f.write_str("content container must be the node itself or a descendant")
            }
        }
    }
}

impl core::error::Error for ContractError {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_names_the_loop_point() {
        let err = ContractError::UnknownLoopPoint("spin".into());
        assert_eq!(err.to_string(), "unknown loop point `spin`");
    }

    #[test]
    fn display_includes_offending_value() {
        assert_eq!(
            ContractError::NegativeDuration(-2.5).to_string(),
            "negative transform duration: -2.5"
        );
    }
}
