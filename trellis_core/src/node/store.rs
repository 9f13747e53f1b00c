// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation and property management.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use bitflags::bitflags;
use kurbo::{Affine, Point, Size, Vec2};
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::id::{INVALID, NodeId};
use super::lifecycle::Observer;
use crate::animation::SequenceSet;
use crate::backend::{FontMeasure, PlatformSurface};
use crate::config::SceneConfig;
use crate::dirty;
use crate::error::ContractError;
use crate::input::{InputHandler, InputState};
use crate::invalidation::Invalidation;
use crate::layout::Layout;
use crate::paint::Paint;
use crate::trace::{TraceSink, Tracer};

bitflags! {
    /// Per-axis selector used by relative sizing.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Axes: u8 {
        /// Horizontal axis.
        const X = 1 << 0;
        /// Vertical axis.
        const Y = 1 << 1;
        /// Both axes.
        const BOTH = Self::X.bits() | Self::Y.bits();
    }
}

impl Axes {
    /// Neither axis.
    pub const NONE: Self = Self::empty();
}

bitflags! {
    /// Per-node boolean flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// The node takes part in input and layout. Inactive subtrees are
        /// skipped by hit-testing and rendering.
        const ACTIVE = 1 << 0;
        /// The node and its subtree are drawn.
        const VISIBLE = 1 << 1;
        /// Children are placed relative to an identity matrix instead of the
        /// parent's world matrix (offscreen or nested surfaces).
        const ISOLATE = 1 << 2;
        /// Drawing of children is clipped to the node's draw rectangle, and
        /// hit-testing of children is limited to it.
        const CLIP_CHILDREN = 1 << 3;
        /// The subtree rooted here receives no positional input.
        const BLOCK_POSITIONAL_INPUT = 1 << 4;
        /// The node receives every input event regardless of position.
        const GLOBAL_INPUT = 1 << 5;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::ACTIVE | Self::VISIBLE
    }
}

/// Local geometry properties of a node, as set by callers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct NodeProps {
    pub(crate) position: Point,
    pub(crate) anchor: Vec2,
    pub(crate) offset: Vec2,
    pub(crate) margin: Vec2,
    pub(crate) rotation: f64,
    pub(crate) scale: Vec2,
    pub(crate) size: Size,
    pub(crate) relative_axes: Axes,
    pub(crate) child_relative_axes: Axes,
    pub(crate) opacity: f64,
    pub(crate) child_offset: Vec2,
}

impl Default for NodeProps {
    fn default() -> Self {
        Self {
            position: Point::ORIGIN,
            anchor: Vec2::ZERO,
            offset: Vec2::ZERO,
            margin: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            size: Size::ZERO,
            relative_axes: Axes::NONE,
            child_relative_axes: Axes::NONE,
            opacity: 1.0,
            child_offset: Vec2::ZERO,
        }
    }
}

/// Cached values derived from local properties and ancestry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Derived {
    pub(crate) draw_size: Size,
    pub(crate) matrix: Affine,
    pub(crate) world_position: Point,
    pub(crate) world_opacity: f64,
}

impl Default for Derived {
    fn default() -> Self {
        Self {
            draw_size: Size::ZERO,
            matrix: Affine::IDENTITY,
            world_position: Point::ORIGIN,
            world_opacity: 1.0,
        }
    }
}

/// Struct-of-arrays storage for all nodes, plus the application state that
/// drives them (root, input dispatch caches, animation clock).
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node occupies
/// a slot in parallel arrays. Disposed nodes are recycled via a free list,
/// and generation counters prevent stale handle access.
pub struct Scene {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) children: Vec<Vec<u32>>,
    pub(crate) content_container: Vec<Option<NodeId>>,
    pub(crate) z_index: Vec<i32>,
    pub(crate) insertion: Vec<u64>,
    pub(crate) next_insertion: u64,

    // -- Local properties (set by callers) --
    pub(crate) props: Vec<NodeProps>,
    pub(crate) flags: Vec<NodeFlags>,

    // -- Derived values (resolved on read) --
    pub(crate) invalid: Vec<Invalidation>,
    pub(crate) derived: Vec<Derived>,
    pub(crate) resolving: Vec<bool>,

    // -- Capabilities --
    pub(crate) paint: Vec<Option<Box<dyn Paint>>>,
    pub(crate) handler: Vec<Option<Box<dyn InputHandler>>>,
    pub(crate) layout: Vec<Option<Box<dyn Layout>>>,

    // -- Lifecycle --
    pub(crate) attached: Vec<bool>,
    pub(crate) loaded: Vec<bool>,
    pub(crate) observers: Vec<Vec<Observer>>,
    pub(crate) next_observer: u64,

    // -- Animation --
    pub(crate) sequences: Vec<SequenceSet<Self>>,
    pub(crate) animating: u32,
    pub(crate) deferred_stops: Vec<(u32, Vec<String>)>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) alive: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Damage tracking --
    pub(crate) damage: DirtyTracker<u32>,
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,

    // -- Application --
    pub(crate) root: u32,
    pub(crate) config: SceneConfig,
    pub(crate) input: InputState,
    pub(crate) time: f64,
    pub(crate) frame_index: u64,
    pub(crate) fonts: Option<Box<dyn FontMeasure>>,
    pub(crate) platform: Option<Box<dyn PlatformSurface>>,
    pub(crate) trace_sink: Option<Box<dyn TraceSink>>,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("len", &self.len)
            .field("free", &self.free_list.len())
            .field("root", &self.root)
            .field("time", &self.time)
            .field("frame_index", &self.frame_index)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates an empty scene with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Creates an empty scene with the given configuration.
    #[must_use]
    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            parent: Vec::new(),
            children: Vec::new(),
            content_container: Vec::new(),
            z_index: Vec::new(),
            insertion: Vec::new(),
            next_insertion: 0,
            props: Vec::new(),
            flags: Vec::new(),
            invalid: Vec::new(),
            derived: Vec::new(),
            resolving: Vec::new(),
            paint: Vec::new(),
            handler: Vec::new(),
            layout: Vec::new(),
            attached: Vec::new(),
            loaded: Vec::new(),
            observers: Vec::new(),
            next_observer: 0,
            sequences: Vec::new(),
            animating: INVALID,
            deferred_stops: Vec::new(),
            generation: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            damage: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
            root: INVALID,
            config,
            input: InputState::default(),
            time: 0.0,
            frame_index: 0,
            fonts: None,
            platform: None,
            trace_sink: None,
        }
    }

    /// Returns the scene configuration.
    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Replaces the scene configuration.
    pub fn set_config(&mut self, config: SceneConfig) {
        self.config = config;
    }

    /// Installs a trace sink, returning the previous one.
    pub fn set_trace_sink(
        &mut self,
        sink: Option<Box<dyn TraceSink>>,
    ) -> Option<Box<dyn TraceSink>> {
        core::mem::replace(&mut self.trace_sink, sink)
    }

    /// Installs the font measurer used to size text content.
    pub fn set_font_measure(&mut self, fonts: Option<Box<dyn FontMeasure>>) {
        self.fonts = fonts;
        // Intrinsic sizes may change with the measurer.
        for idx in 0..self.len {
            if self.alive[idx as usize] && self.paint[idx as usize].is_some() {
                self.mark_invalid(idx, Invalidation::LAYOUT);
            }
        }
    }

    /// Installs the platform surface handed to input handlers.
    pub fn set_platform(&mut self, platform: Option<Box<dyn PlatformSurface>>) {
        self.platform = platform;
    }

    /// Returns the platform surface, if one is installed.
    pub fn platform(&mut self) -> Option<&mut (dyn PlatformSurface + 'static)> {
        self.platform.as_deref_mut()
    }

    /// Returns the accumulated scene time in seconds.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Returns the number of completed [`update`](Self::update) calls.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub(crate) fn tracer(&mut self) -> Tracer<'_> {
        match self.trace_sink.as_deref_mut() {
            Some(sink) => Tracer::new(sink),
            None => Tracer::none(),
        }
    }

    // -- Allocation API --

    /// Creates a new node and returns its handle.
    ///
    /// The node starts detached, active and visible, at the origin with zero
    /// size, unit scale, full opacity and no capabilities.
    pub fn create_node(&mut self) -> NodeId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot; the generation was bumped on dispose.
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.children[i].clear();
            self.content_container[i] = None;
            self.z_index[i] = 0;
            self.insertion[i] = 0;
            self.props[i] = NodeProps::default();
            self.flags[i] = NodeFlags::default();
            self.invalid[i] = Invalidation::ALL;
            self.derived[i] = Derived::default();
            self.resolving[i] = false;
            self.attached[i] = false;
            self.loaded[i] = false;
            self.alive[i] = true;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.children.push(Vec::new());
            self.content_container.push(None);
            self.z_index.push(0);
            self.insertion.push(0);
            self.props.push(NodeProps::default());
            self.flags.push(NodeFlags::default());
            self.invalid.push(Invalidation::ALL);
            self.derived.push(Derived::default());
            self.resolving.push(false);
            self.paint.push(None);
            self.handler.push(None);
            self.layout.push(None);
            self.attached.push(false);
            self.loaded.push(false);
            self.observers.push(Vec::new());
            self.sequences.push(SequenceSet::new());
            self.generation.push(0);
            self.alive.push(true);
            idx
        };

        self.pending_added.push(idx);
        self.damage.mark(idx, dirty::TOPOLOGY);
        self.damage.mark(idx, dirty::PAINT);

        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        (id.idx < self.len)
            && self.alive[id.idx as usize]
            && self.generation[id.idx as usize] == id.generation
    }

    /// Returns the number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    /// Returns the live handle for a raw slot index.
    #[must_use]
    pub fn id_at(&self, idx: u32) -> Option<NodeId> {
        (idx < self.len && self.alive[idx as usize]).then(|| NodeId {
            idx,
            generation: self.generation[idx as usize],
        })
    }

    pub(crate) fn id_of(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Panics if the handle is stale.
    #[inline]
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            self.is_alive(id),
            "stale NodeId: idx={}, gen={}",
            id.idx,
            id.generation
        );
    }

    // -- Invalidation --

    /// Returns the pending invalidation bits of a node.
    #[must_use]
    pub fn invalidation(&self, id: NodeId) -> Invalidation {
        self.validate(id);
        self.invalid[id.idx as usize]
    }

    /// Marks derived values of a node stale, forcing recomputation on the
    /// next read.
    pub fn invalidate(&mut self, id: NodeId, flags: Invalidation) {
        self.validate(id);
        self.mark_invalid(id.idx, flags);
        self.damage.mark_with(id.idx, dirty::PAINT, &EagerPolicy);
    }

    pub(crate) fn mark_invalid(&mut self, idx: u32, flags: Invalidation) {
        let before = self.invalid[idx as usize];
        if self.invalid[idx as usize].invalidate(flags) {
            #[cfg(feature = "trace-rich")]
            {
                let added = self.invalid[idx as usize].difference(before);
                self.tracer()
                    .invalidation(&crate::trace::InvalidationEvent {
                        node_index: idx,
                        flags: added,
                    });
            }
            #[cfg(not(feature = "trace-rich"))]
            {
                _ = before;
            }
        }
    }

    /// Position, anchor or offset changed. The node's own matrix is stale,
    /// and so is the span of a child-relative parent.
    fn placement_changed(&mut self, idx: u32) {
        self.mark_invalid(idx, Invalidation::GEOMETRY);
        let p = self.parent[idx as usize];
        if p != INVALID && !self.props[p as usize].child_relative_axes.is_empty() {
            self.mark_invalid(p, Invalidation::SIZE);
        }
        self.damage.mark_with(idx, dirty::PAINT, &EagerPolicy);
    }

    /// Something feeding the draw size of `idx` changed. Invalidates the node,
    /// the children sized relative to it, and a parent that sizes itself from
    /// its children or lays them out.
    pub(crate) fn size_changed(&mut self, idx: u32) {
        self.mark_invalid(idx, Invalidation::DRAW_SIZE);
        for k in 0..self.children[idx as usize].len() {
            let c = self.children[idx as usize][k];
            if !self.props[c as usize].relative_axes.is_empty() {
                self.mark_invalid(c, Invalidation::DRAW_SIZE);
            }
        }
        self.notify_parent_of_resize(idx);
        self.damage.mark_with(idx, dirty::PAINT, &EagerPolicy);
    }

    pub(crate) fn notify_parent_of_resize(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        if p == INVALID {
            return;
        }
        if !self.props[p as usize].child_relative_axes.is_empty() {
            self.mark_invalid(p, Invalidation::SIZE);
        }
        if self.layout[p as usize].is_some() {
            self.mark_invalid(p, Invalidation::LAYOUT);
        }
    }

    // -- Property getters --

    /// Returns the position of a node in its parent's child space.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Point {
        self.validate(id);
        self.props[id.idx as usize].position
    }

    /// Returns the anchor, a point in the parent's draw size normalized to
    /// `0..=1` that the node's position is relative to.
    #[must_use]
    pub fn anchor(&self, id: NodeId) -> Vec2 {
        self.validate(id);
        self.props[id.idx as usize].anchor
    }

    /// Returns the offset, a point in the node's own draw size normalized to
    /// `0..=1` that is placed at the position. Rotation and scale pivot
    /// around it.
    #[must_use]
    pub fn offset(&self, id: NodeId) -> Vec2 {
        self.validate(id);
        self.props[id.idx as usize].offset
    }

    /// Returns the margin.
    #[must_use]
    pub fn margin(&self, id: NodeId) -> Vec2 {
        self.validate(id);
        self.props[id.idx as usize].margin
    }

    /// Returns the rotation in degrees, in `0.0..360.0`.
    #[must_use]
    pub fn rotation(&self, id: NodeId) -> f64 {
        self.validate(id);
        self.props[id.idx as usize].rotation
    }

    /// Returns the scale.
    #[must_use]
    pub fn scale(&self, id: NodeId) -> Vec2 {
        self.validate(id);
        self.props[id.idx as usize].scale
    }

    /// Returns the explicit size.
    ///
    /// On relative axes this is the fraction of the parent's draw size.
    #[must_use]
    pub fn size(&self, id: NodeId) -> Size {
        self.validate(id);
        self.props[id.idx as usize].size
    }

    /// Returns the axes sized relative to the parent.
    #[must_use]
    pub fn relative_size_axes(&self, id: NodeId) -> Axes {
        self.validate(id);
        self.props[id.idx as usize].relative_axes
    }

    /// Returns the axes sized from the span of the children.
    #[must_use]
    pub fn child_relative_size_axes(&self, id: NodeId) -> Axes {
        self.validate(id);
        self.props[id.idx as usize].child_relative_axes
    }

    /// Returns the local opacity.
    #[must_use]
    pub fn opacity(&self, id: NodeId) -> f64 {
        self.validate(id);
        self.props[id.idx as usize].opacity
    }

    /// Returns the translation applied to all children (scroll position).
    #[must_use]
    pub fn child_offset(&self, id: NodeId) -> Vec2 {
        self.validate(id);
        self.props[id.idx as usize].child_offset
    }

    /// Returns the z-order index among siblings.
    #[must_use]
    pub fn z_index(&self, id: NodeId) -> i32 {
        self.validate(id);
        self.z_index[id.idx as usize]
    }

    /// Returns the node flags.
    #[must_use]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.validate(id);
        self.flags[id.idx as usize]
    }

    /// Returns whether the node is active.
    #[must_use]
    pub fn is_active(&self, id: NodeId) -> bool {
        self.flags(id).contains(NodeFlags::ACTIVE)
    }

    /// Returns whether the node is visible.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.flags(id).contains(NodeFlags::VISIBLE)
    }

    // -- Mutation API (auto-invalidates) --

    /// Sets the position.
    pub fn set_position(&mut self, id: NodeId, position: Point) {
        self.validate(id);
        let i = id.idx as usize;
        if self.props[i].position == position {
            return;
        }
        self.props[i].position = position;
        self.placement_changed(id.idx);
    }

    /// Sets the anchor.
    pub fn set_anchor(&mut self, id: NodeId, anchor: Vec2) {
        self.validate(id);
        let i = id.idx as usize;
        if self.props[i].anchor == anchor {
            return;
        }
        self.props[i].anchor = anchor;
        self.placement_changed(id.idx);
    }

    /// Sets the offset.
    pub fn set_offset(&mut self, id: NodeId, offset: Vec2) {
        self.validate(id);
        let i = id.idx as usize;
        if self.props[i].offset == offset {
            return;
        }
        self.props[i].offset = offset;
        self.placement_changed(id.idx);
    }

    /// Sets the margin.
    pub fn set_margin(&mut self, id: NodeId, margin: Vec2) {
        self.validate(id);
        let i = id.idx as usize;
        if self.props[i].margin == margin {
            return;
        }
        self.props[i].margin = margin;
        self.size_changed(id.idx);
    }

    /// Sets the rotation in degrees. The value is normalized to `0.0..360.0`.
    pub fn set_rotation(&mut self, id: NodeId, degrees: f64) {
        self.validate(id);
        let mut degrees = degrees % 360.0;
        if degrees < 0.0 {
            degrees += 360.0;
        }
        let i = id.idx as usize;
        if self.props[i].rotation == degrees {
            return;
        }
        self.props[i].rotation = degrees;
        self.mark_invalid(id.idx, Invalidation::GEOMETRY);
        self.damage.mark_with(id.idx, dirty::PAINT, &EagerPolicy);
    }

    /// Sets the scale.
    pub fn set_scale(&mut self, id: NodeId, scale: Vec2) {
        self.validate(id);
        let i = id.idx as usize;
        if self.props[i].scale == scale {
            return;
        }
        self.props[i].scale = scale;
        self.size_changed(id.idx);
    }

    /// Sets the explicit size.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, or if the node is sized relative to
    /// both its parent and its children on both axes.
    pub fn set_size(&mut self, id: NodeId, size: Size) {
        if let Err(err) = self.try_set_size(id, size) {
            panic!("{err}");
        }
    }

    /// Sets the explicit size, or reports why it cannot be set.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn try_set_size(&mut self, id: NodeId, size: Size) -> Result<(), ContractError> {
        self.validate(id);
        let i = id.idx as usize;
        let props = &self.props[i];
        if props.relative_axes == Axes::BOTH && props.child_relative_axes == Axes::BOTH {
            return Err(ContractError::SizeFullyRelative);
        }
        if props.size != size {
            self.props[i].size = size;
            self.size_changed(id.idx);
        }
        Ok(())
    }

    /// Sets which axes are sized relative to the parent's draw size.
    pub fn set_relative_size_axes(&mut self, id: NodeId, axes: Axes) {
        self.validate(id);
        let i = id.idx as usize;
        if self.props[i].relative_axes == axes {
            return;
        }
        self.props[i].relative_axes = axes;
        self.size_changed(id.idx);
    }

    /// Sets which axes are sized from the span of the children.
    pub fn set_child_relative_size_axes(&mut self, id: NodeId, axes: Axes) {
        self.validate(id);
        let i = id.idx as usize;
        if self.props[i].child_relative_axes == axes {
            return;
        }
        self.props[i].child_relative_axes = axes;
        self.size_changed(id.idx);
    }

    /// Sets the local opacity.
    pub fn set_opacity(&mut self, id: NodeId, opacity: f64) {
        self.validate(id);
        let i = id.idx as usize;
        if self.props[i].opacity == opacity {
            return;
        }
        self.props[i].opacity = opacity;
        self.mark_invalid(id.idx, Invalidation::OPACITY);
        self.damage.mark_with(id.idx, dirty::PAINT, &EagerPolicy);
    }

    /// Sets the translation applied to all children.
    pub fn set_child_offset(&mut self, id: NodeId, child_offset: Vec2) {
        self.validate(id);
        let i = id.idx as usize;
        if self.props[i].child_offset == child_offset {
            return;
        }
        self.props[i].child_offset = child_offset;
        for k in 0..self.children[i].len() {
            let c = self.children[i][k];
            self.mark_invalid(c, Invalidation::GEOMETRY);
        }
        self.damage.mark_with(id.idx, dirty::PAINT, &EagerPolicy);
    }

    /// Replaces all node flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        self.validate(id);
        let i = id.idx as usize;
        let old = self.flags[i];
        if old == flags {
            return;
        }
        self.flags[i] = flags;
        if old.contains(NodeFlags::ISOLATE) != flags.contains(NodeFlags::ISOLATE) {
            for k in 0..self.children[i].len() {
                let c = self.children[i][k];
                self.mark_invalid(c, Invalidation::GEOMETRY);
            }
        }
        if old.contains(NodeFlags::ACTIVE | NodeFlags::VISIBLE)
            != flags.contains(NodeFlags::ACTIVE | NodeFlags::VISIBLE)
        {
            let p = self.parent[i];
            if p != INVALID && self.layout[p as usize].is_some() {
                self.mark_invalid(p, Invalidation::LAYOUT);
            }
        }
        if !flags.contains(NodeFlags::ACTIVE) {
            self.forget_input_subtree(id.idx);
        }
        self.damage.mark_with(id.idx, dirty::PAINT, &EagerPolicy);
    }

    fn update_flag(&mut self, id: NodeId, flag: NodeFlags, on: bool) {
        let mut flags = self.flags(id);
        flags.set(flag, on);
        self.set_flags(id, flags);
    }

    /// Sets whether the node is active.
    pub fn set_active(&mut self, id: NodeId, active: bool) {
        self.update_flag(id, NodeFlags::ACTIVE, active);
    }

    /// Sets whether the node is visible.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.update_flag(id, NodeFlags::VISIBLE, visible);
    }

    /// Makes the node a render-isolation boundary.
    pub fn set_isolated(&mut self, id: NodeId, isolated: bool) {
        self.update_flag(id, NodeFlags::ISOLATE, isolated);
    }

    /// Clips children to the node's draw rectangle.
    pub fn set_clip_children(&mut self, id: NodeId, clip: bool) {
        self.update_flag(id, NodeFlags::CLIP_CHILDREN, clip);
    }

    /// Stops positional input from reaching the subtree rooted at the node.
    pub fn set_block_positional_input(&mut self, id: NodeId, block: bool) {
        self.update_flag(id, NodeFlags::BLOCK_POSITIONAL_INPUT, block);
    }

    /// Makes the node receive every input event regardless of position.
    pub fn set_global_input(&mut self, id: NodeId, global: bool) {
        self.update_flag(id, NodeFlags::GLOBAL_INPUT, global);
    }

    // -- Capabilities --

    /// Attaches or removes the paint capability.
    pub fn set_paint(&mut self, id: NodeId, paint: Option<Box<dyn Paint>>) {
        self.validate(id);
        self.paint[id.idx as usize] = paint;
        self.mark_invalid(id.idx, Invalidation::LAYOUT);
        self.damage.mark(id.idx, dirty::CONTENT);
    }

    /// Returns the paint capability, if any.
    #[must_use]
    pub fn paint(&self, id: NodeId) -> Option<&dyn Paint> {
        self.validate(id);
        self.paint[id.idx as usize].as_deref()
    }

    /// Returns the paint capability for mutation. Marks the node's content
    /// damaged and its intrinsic size stale.
    pub fn paint_mut(&mut self, id: NodeId) -> Option<&mut (dyn Paint + 'static)> {
        self.validate(id);
        self.mark_invalid(id.idx, Invalidation::LAYOUT);
        self.damage.mark(id.idx, dirty::CONTENT);
        self.paint[id.idx as usize].as_deref_mut()
    }

    /// Attaches or removes the input capability.
    pub fn set_input_handler(&mut self, id: NodeId, handler: Option<Box<dyn InputHandler>>) {
        self.validate(id);
        if handler.is_none() {
            self.forget_input(id.idx);
        }
        self.handler[id.idx as usize] = handler;
    }

    /// Returns whether the node has an input capability.
    #[must_use]
    pub fn has_input_handler(&self, id: NodeId) -> bool {
        self.validate(id);
        self.handler[id.idx as usize].is_some()
    }

    /// Attaches or removes the layout capability.
    pub fn set_layout(&mut self, id: NodeId, layout: Option<Box<dyn Layout>>) {
        self.validate(id);
        self.layout[id.idx as usize] = layout;
        self.mark_invalid(id.idx, Invalidation::LAYOUT);
    }

    // -- Raw index accessors (for presenters, no generation check) --

    /// Returns the cached world matrix by raw slot index.
    ///
    /// Current for every index reported by [`evaluate`](Self::evaluate).
    #[must_use]
    pub fn matrix_at(&self, idx: u32) -> Affine {
        self.derived[idx as usize].matrix
    }

    /// Returns the cached draw size by raw slot index.
    #[must_use]
    pub fn draw_size_at(&self, idx: u32) -> Size {
        self.derived[idx as usize].draw_size
    }

    /// Returns the cached world opacity by raw slot index.
    #[must_use]
    pub fn world_opacity_at(&self, idx: u32) -> f64 {
        self.derived[idx as usize].world_opacity
    }

    /// Returns the flags by raw slot index.
    #[must_use]
    pub fn flags_at(&self, idx: u32) -> NodeFlags {
        self.flags[idx as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_is_alive() {
        let mut scene = Scene::new();
        let id = scene.create_node();
        assert!(scene.is_alive(id));
        assert_eq!(scene.node_count(), 1);
    }

    #[test]
    fn new_node_defaults() {
        let mut scene = Scene::new();
        let id = scene.create_node();
        assert_eq!(scene.position(id), Point::ORIGIN);
        assert_eq!(scene.scale(id), Vec2::new(1.0, 1.0));
        assert_eq!(scene.opacity(id), 1.0);
        assert!(scene.is_active(id));
        assert!(scene.is_visible(id));
        assert_eq!(scene.invalidation(id), Invalidation::ALL);
        assert_eq!(scene.parent(id), None);
    }

    #[test]
    fn slot_reuse_bumps_generation() {
        let mut scene = Scene::new();
        let a = scene.create_node();
        scene.dispose(a);
        assert!(!scene.is_alive(a));

        let b = scene.create_node();
        assert_eq!(a.idx, b.idx);
        assert_ne!(a.generation, b.generation);
        assert!(scene.is_alive(b));
        assert!(!scene.is_alive(a));
    }

    #[test]
    fn reused_slot_is_reset() {
        let mut scene = Scene::new();
        let a = scene.create_node();
        scene.set_position(a, Point::new(3.0, 4.0));
        scene.set_opacity(a, 0.2);
        scene.dispose(a);

        let b = scene.create_node();
        assert_eq!(scene.position(b), Point::ORIGIN);
        assert_eq!(scene.opacity(b), 1.0);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn stale_handle_panics() {
        let mut scene = Scene::new();
        let id = scene.create_node();
        scene.dispose(id);
        let _ = scene.position(id);
    }

    #[test]
    fn rotation_is_normalized() {
        let mut scene = Scene::new();
        let id = scene.create_node();
        scene.set_rotation(id, 370.0);
        assert!((scene.rotation(id) - 10.0).abs() < 1e-9);
        scene.set_rotation(id, -90.0);
        assert!((scene.rotation(id) - 270.0).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "fully relative")]
    fn set_size_on_fully_relative_node_panics() {
        let mut scene = Scene::new();
        let id = scene.create_node();
        scene.set_relative_size_axes(id, Axes::BOTH);
        scene.set_child_relative_size_axes(id, Axes::BOTH);
        scene.set_size(id, Size::new(10.0, 10.0));
    }

    #[test]
    fn try_set_size_reports_contract_error() {
        let mut scene = Scene::new();
        let id = scene.create_node();
        scene.set_relative_size_axes(id, Axes::BOTH);
        assert_eq!(scene.try_set_size(id, Size::new(0.5, 0.5)), Ok(()));
        scene.set_child_relative_size_axes(id, Axes::BOTH);
        assert_eq!(
            scene.try_set_size(id, Size::new(1.0, 1.0)),
            Err(ContractError::SizeFullyRelative)
        );
        assert_eq!(scene.size(id), Size::new(0.5, 0.5));
    }

    #[test]
    fn setters_invalidate_expected_bits() {
        let mut scene = Scene::new();
        let parent = scene.create_node();
        let child = scene.create_node();
        scene.add_child(parent, child);
        scene.set_relative_size_axes(child, Axes::X);
        let _ = scene.draw_size(child);
        let _ = scene.matrix(child);
        let _ = scene.world_opacity(child);
        let resolved = Invalidation::DRAW_SIZE | Invalidation::OPACITY;
        assert!(scene.invalidation(child).is_valid(resolved));
        assert!(scene.invalidation(parent).is_valid(Invalidation::DRAW_SIZE));

        scene.set_opacity(child, 0.5);
        assert!(scene.invalidation(child).contains(Invalidation::OPACITY));
        assert!(scene.invalidation(child).is_valid(Invalidation::DRAW_SIZE));

        scene.set_size(parent, Size::new(10.0, 10.0));
        assert!(scene.invalidation(parent).contains(Invalidation::DRAW_SIZE));
        assert!(
            scene.invalidation(child).contains(Invalidation::DRAW_SIZE),
            "relative child is invalidated one hop down"
        );
    }

    #[test]
    fn unchanged_value_does_not_invalidate() {
        let mut scene = Scene::new();
        let id = scene.create_node();
        let _ = scene.matrix(id);
        scene.set_position(id, Point::ORIGIN);
        assert!(scene.invalidation(id).is_valid(Invalidation::GEOMETRY));
    }

    #[test]
    fn flag_helpers_round_trip() {
        let mut scene = Scene::new();
        let id = scene.create_node();
        scene.set_visible(id, false);
        scene.set_global_input(id, true);
        let flags = scene.flags(id);
        assert!(!flags.contains(NodeFlags::VISIBLE));
        assert!(flags.contains(NodeFlags::GLOBAL_INPUT));
        assert!(flags.contains(NodeFlags::ACTIVE));
    }

    #[test]
    fn id_at_maps_live_slots() {
        let mut scene = Scene::new();
        let a = scene.create_node();
        assert_eq!(scene.id_at(a.idx), Some(a));
        scene.dispose(a);
        assert_eq!(scene.id_at(a.idx), None);
        assert_eq!(scene.id_at(99), None);
    }
}
