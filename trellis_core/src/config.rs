// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene-wide configuration.

use crate::input::MouseButton;

/// Configuration for a [`Scene`](crate::node::Scene).
///
/// Use one of the presets and adjust individual fields as needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneConfig {
    /// Mouse button whose press moves keyboard focus.
    pub focus_button: MouseButton,
    /// Whether a focus-button press that no node consumes clears focus.
    pub clear_focus_on_miss: bool,
    /// Whether [`Scene::update`](crate::node::Scene::update) re-runs the hover
    /// pass at the last known pointer position, so nodes moving under a
    /// stationary cursor receive enter and leave events.
    pub rehover_on_update: bool,
    /// Upper bound on layout passes per update. A pass may resize nodes
    /// and invalidate layout again; further passes are deferred to the next
    /// update once this bound is hit.
    pub max_layout_passes: u32,
}

impl SceneConfig {
    /// Preset for pointer-driven desktop applications.
    #[must_use]
    pub const fn desktop() -> Self {
        Self {
            focus_button: MouseButton::Left,
            clear_focus_on_miss: true,
            rehover_on_update: true,
            max_layout_passes: 4,
        }
    }

    /// Preset for touch-first applications: there is no persistent cursor,
    /// so hover is not re-evaluated on update.
    #[must_use]
    pub const fn touch() -> Self {
        Self {
            focus_button: MouseButton::Left,
            clear_focus_on_miss: true,
            rehover_on_update: false,
            max_layout_passes: 4,
        }
    }

    /// Preset for embedded editors where focus should stick to the last
    /// focused widget when the user clicks empty space.
    #[must_use]
    pub const fn sticky_focus() -> Self {
        Self {
            clear_focus_on_miss: false,
            ..Self::desktop()
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_desktop() {
        assert_eq!(SceneConfig::default(), SceneConfig::desktop());
    }

    #[test]
    fn presets_differ_where_expected() {
        assert!(!SceneConfig::touch().rehover_on_update);
        assert!(!SceneConfig::sticky_focus().clear_focus_on_miss);
        assert_eq!(
            SceneConfig::sticky_focus().focus_button,
            SceneConfig::desktop().focus_button
        );
    }
}
