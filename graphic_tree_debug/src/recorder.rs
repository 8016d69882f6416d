// Copyright 2026 the Graphic Tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a shared
//! byte buffer as fixed-size little-endian records. Because a
//! [`Document`](graphic_tree_core::Document) takes ownership of its sink,
//! the recorder is cheaply cloneable: install one clone and keep another to
//! read the recording. [`decode`] reads bytes back as an iterator of
//! [`RecordedEvent`].

use std::cell::RefCell;
use std::rc::Rc;

use graphic_tree_core::id::Handle;
use graphic_tree_core::observe::Topic;
use graphic_tree_core::trace::{
    MirrorRebuildEvent, NodeDestroyedEvent, NodeKind, NotifyEvent, ProjectionUpdateEvent,
    TraceSink, TransformCombineEvent,
};
use graphic_tree_core::{GraphicId, PresentationId, ViewId};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_TRANSFORM_COMBINE: u8 = 1;
const TAG_PROJECTION_UPDATE: u8 = 2;
const TAG_MIRROR_REBUILD: u8 = 3;
const TAG_NODE_DESTROYED: u8 = 4;
const TAG_NOTIFY: u8 = 5;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
///
/// Clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct RecorderSink {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded bytes.
    #[must_use]
    pub fn bytes(&self) -> Vec<u8> {
        self.buf.borrow().clone()
    }

    /// Decodes everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<RecordedEvent> {
        decode(&self.buf.borrow()).collect()
    }

    /// Discards the recording.
    pub fn clear(&self) {
        self.buf.borrow_mut().clear();
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&self, v: u8) {
        self.buf.borrow_mut().push(v);
    }

    fn write_u32(&self, v: u32) {
        self.buf.borrow_mut().extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&self, v: u64) {
        self.buf.borrow_mut().extend_from_slice(&v.to_le_bytes());
    }

    fn write_handle(&self, id: impl Handle) {
        self.write_u32(id.index());
        self.write_u32(id.generation());
    }

    fn write_kind(&self, kind: NodeKind) {
        self.write_u8(match kind {
            NodeKind::Graphic => 0,
            NodeKind::Presentation => 1,
            NodeKind::View => 2,
        });
    }

    fn write_topic(&self, topic: Topic) {
        match topic {
            Topic::Node(id) => {
                self.write_u8(0);
                self.write_handle(id);
            }
            Topic::Transform(id) => {
                self.write_u8(1);
                self.write_handle(id);
            }
            Topic::Presentation(id) => {
                self.write_u8(2);
                self.write_handle(id);
            }
        }
    }
}

impl TraceSink for RecorderSink {
    fn on_transform_combine(&mut self, e: &TransformCombineEvent) {
        self.write_u8(TAG_TRANSFORM_COMBINE);
        self.write_handle(e.node);
        self.write_u32(e.members);
        self.write_u64(e.revision);
        self.write_u8(u8::from(e.inverse_retained));
    }

    fn on_projection_update(&mut self, e: &ProjectionUpdateEvent) {
        self.write_u8(TAG_PROJECTION_UPDATE);
        self.write_handle(e.root);
        self.write_u32(e.nodes);
    }

    fn on_mirror_rebuild(&mut self, e: &MirrorRebuildEvent) {
        self.write_u8(TAG_MIRROR_REBUILD);
        self.write_handle(e.view);
        self.write_handle(e.anchor);
        self.write_u32(e.nodes);
        self.write_u64(e.generation);
    }

    fn on_node_destroyed(&mut self, e: &NodeDestroyedEvent) {
        self.write_u8(TAG_NODE_DESTROYED);
        self.write_kind(e.kind);
        self.write_u32(e.index);
        self.write_u32(e.generation);
    }

    fn on_notify(&mut self, e: &NotifyEvent) {
        self.write_u8(TAG_NOTIFY);
        self.write_topic(e.topic);
        self.write_u32(e.subscribers);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`TransformCombineEvent`].
    TransformCombine(TransformCombineEvent),
    /// A [`ProjectionUpdateEvent`].
    ProjectionUpdate(ProjectionUpdateEvent),
    /// A [`MirrorRebuildEvent`].
    MirrorRebuild(MirrorRebuildEvent),
    /// A [`NodeDestroyedEvent`].
    NodeDestroyed(NodeDestroyedEvent),
    /// A [`NotifyEvent`].
    Notify(NotifyEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_handle<I: Handle>(&mut self) -> Option<I> {
        let idx = self.read_u32()?;
        let generation = self.read_u32()?;
        Some(I::from_parts(idx, generation))
    }

    fn read_kind(&mut self) -> Option<NodeKind> {
        Some(match self.read_u8()? {
            0 => NodeKind::Graphic,
            1 => NodeKind::Presentation,
            _ => NodeKind::View,
        })
    }

    fn read_topic(&mut self) -> Option<Topic> {
        Some(match self.read_u8()? {
            0 => Topic::Node(self.read_handle::<GraphicId>()?),
            1 => Topic::Transform(self.read_handle::<GraphicId>()?),
            _ => Topic::Presentation(self.read_handle::<PresentationId>()?),
        })
    }

    fn decode_transform_combine(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TransformCombine(TransformCombineEvent {
            node: self.read_handle()?,
            members: self.read_u32()?,
            revision: self.read_u64()?,
            inverse_retained: self.read_u8()? != 0,
        }))
    }

    fn decode_projection_update(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ProjectionUpdate(ProjectionUpdateEvent {
            root: self.read_handle()?,
            nodes: self.read_u32()?,
        }))
    }

    fn decode_mirror_rebuild(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::MirrorRebuild(MirrorRebuildEvent {
            view: self.read_handle::<ViewId>()?,
            anchor: self.read_handle()?,
            nodes: self.read_u32()?,
            generation: self.read_u64()?,
        }))
    }

    fn decode_node_destroyed(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::NodeDestroyed(NodeDestroyedEvent {
            kind: self.read_kind()?,
            index: self.read_u32()?,
            generation: self.read_u32()?,
        }))
    }

    fn decode_notify(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Notify(NotifyEvent {
            topic: self.read_topic()?,
            subscribers: self.read_u32()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_TRANSFORM_COMBINE => self.decode_transform_combine(),
            TAG_PROJECTION_UPDATE => self.decode_projection_update(),
            TAG_MIRROR_REBUILD => self.decode_mirror_rebuild(),
            TAG_NODE_DESTROYED => self.decode_node_destroyed(),
            TAG_NOTIFY => self.decode_notify(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
