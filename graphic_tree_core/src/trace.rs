// Copyright 2026 the Graphic Tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for document mutations.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`Document`](crate::Document) calls whenever it recombines a transform
//! collection, updates projection matrices, rebuilds a view mirror, or
//! destroys a node. All method bodies default to no-ops, so implementing only
//! the events you care about is fine.
//!
//! [`Tracer`] owns an optional boxed sink. When the `trace` feature is
//! **off**, every `Tracer` method compiles to nothing and installing a sink
//! has no effect. When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) gates [`NotifyEvent`], which is emitted
//!   once per notification and is therefore much chattier.

use alloc::boxed::Box;

use crate::id::{GraphicId, PresentationId, ViewId};
#[cfg(feature = "trace-rich")]
use crate::observe::Topic;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which family of node an event refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A node of the authoritative document tree.
    Graphic,
    /// A mirrored node owned by a view.
    Presentation,
    /// A view.
    View,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a transform collection recombined its matrices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformCombineEvent {
    /// The graphic node owning the collection.
    pub node: GraphicId,
    /// Number of member transforms.
    pub members: u32,
    /// Revision counter of the collection after the change.
    pub revision: u64,
    /// Whether the combined matrix was singular and the previous inverse
    /// was kept.
    pub inverse_retained: bool,
}

/// Emitted after projection matrices were recomputed for a subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectionUpdateEvent {
    /// The presentation node the update started from.
    pub root: PresentationId,
    /// Number of presentation nodes that were recomputed.
    pub nodes: u32,
}

/// Emitted after a view rebuilt its presentation mirror.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MirrorRebuildEvent {
    /// The view that was rebuilt.
    pub view: ViewId,
    /// The mounted anchor graphic node.
    pub anchor: GraphicId,
    /// Number of presentation nodes in the new mirror.
    pub nodes: u32,
    /// Mirror generation after the rebuild.
    pub generation: u64,
}

/// Emitted when a node or view is destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeDestroyedEvent {
    /// Which family the destroyed entity belongs to.
    pub kind: NodeKind,
    /// Slot index of the destroyed handle.
    pub index: u32,
    /// Generation of the destroyed handle.
    pub generation: u32,
}

/// Emitted once per notification delivered on a topic.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotifyEvent {
    /// The topic that fired.
    pub topic: Topic,
    /// Number of subscribers that were registered at the time.
    pub subscribers: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from a document.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a transform collection recombined.
    fn on_transform_combine(&mut self, e: &TransformCombineEvent) {
        _ = e;
    }

    /// Called after projection matrices were recomputed.
    fn on_projection_update(&mut self, e: &ProjectionUpdateEvent) {
        _ = e;
    }

    /// Called after a view rebuilt its mirror.
    fn on_mirror_rebuild(&mut self, e: &MirrorRebuildEvent) {
        _ = e;
    }

    /// Called when a node or view is destroyed.
    fn on_node_destroyed(&mut self, e: &NodeDestroyedEvent) {
        _ = e;
    }

    /// Called for every delivered notification (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    fn on_notify(&mut self, e: &NotifyEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin owner of an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
#[derive(Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        let mut tracer = Self::none();
        tracer.set_sink(Some(sink));
        tracer
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self {
            #[cfg(feature = "trace")]
            sink: None,
        }
    }

    /// Replaces the installed sink, returning the previous one.
    pub fn set_sink(&mut self, sink: Option<Box<dyn TraceSink>>) -> Option<Box<dyn TraceSink>> {
        #[cfg(feature = "trace")]
        {
            core::mem::replace(&mut self.sink, sink)
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            None
        }
    }

    /// Whether a sink is installed and events are being delivered.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    /// Emits a [`TransformCombineEvent`].
    #[inline]
    pub fn transform_combine(&mut self, e: &TransformCombineEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transform_combine(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ProjectionUpdateEvent`].
    #[inline]
    pub fn projection_update(&mut self, e: &ProjectionUpdateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_projection_update(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`MirrorRebuildEvent`].
    #[inline]
    pub fn mirror_rebuild(&mut self, e: &MirrorRebuildEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_mirror_rebuild(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`NodeDestroyedEvent`].
    #[inline]
    pub fn node_destroyed(&mut self, e: &NodeDestroyedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_node_destroyed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`NotifyEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn notify(&mut self, e: &NotifyEvent) {
        if let Some(s) = &mut self.sink {
            s.on_notify(e);
        }
    }
}

/// Saturating conversion for event counters.
pub(crate) fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Handle;

    fn sample_destroyed() -> NodeDestroyedEvent {
        NodeDestroyedEvent {
            kind: NodeKind::Graphic,
            index: 4,
            generation: 1,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_node_destroyed(&sample_destroyed());
        sink.on_projection_update(&ProjectionUpdateEvent {
            root: PresentationId::from_parts(0, 0),
            nodes: 3,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        assert!(!tracer.is_active());
        tracer.node_destroyed(&sample_destroyed());
        tracer.mirror_rebuild(&MirrorRebuildEvent {
            view: ViewId::from_parts(0, 0),
            anchor: GraphicId::from_parts(1, 0),
            nodes: 2,
            generation: 1,
        });
    }

    #[test]
    fn count_saturates() {
        assert_eq!(count(7), 7);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::rc::Rc;
        use alloc::vec::Vec;
        use core::cell::RefCell;

        struct RecordingSink {
            destroyed: Rc<RefCell<Vec<u32>>>,
        }
        impl TraceSink for RecordingSink {
            fn on_node_destroyed(&mut self, e: &NodeDestroyedEvent) {
                self.destroyed.borrow_mut().push(e.index);
            }
        }

        let destroyed = Rc::new(RefCell::new(Vec::new()));
        let mut tracer = Tracer::new(Box::new(RecordingSink {
            destroyed: Rc::clone(&destroyed),
        }));
        assert!(tracer.is_active());
        tracer.node_destroyed(&sample_destroyed());

        let previous = tracer.set_sink(None);
        assert!(previous.is_some(), "the recording sink is handed back");
        tracer.node_destroyed(&sample_destroyed());

        assert_eq!(*destroyed.borrow(), &[4]);
    }
}
