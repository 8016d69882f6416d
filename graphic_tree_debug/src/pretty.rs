// Copyright 2026 the Graphic Tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use graphic_tree_core::observe::Topic;
use graphic_tree_core::trace::{
    MirrorRebuildEvent, NodeDestroyedEvent, NodeKind, NotifyEvent, ProjectionUpdateEvent,
    TraceSink, TransformCombineEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn kind_name(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Graphic => "graphic",
        NodeKind::Presentation => "presentation",
        NodeKind::View => "view",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_transform_combine(&mut self, e: &TransformCombineEvent) {
        let retained = if e.inverse_retained { " SINGULAR" } else { "" };
        let _ = writeln!(
            self.writer,
            "[combine] node={:?} members={} rev={}{retained}",
            e.node, e.members, e.revision,
        );
    }

    fn on_projection_update(&mut self, e: &ProjectionUpdateEvent) {
        let _ = writeln!(
            self.writer,
            "[project] root={:?} nodes={}",
            e.root, e.nodes,
        );
    }

    fn on_mirror_rebuild(&mut self, e: &MirrorRebuildEvent) {
        let _ = writeln!(
            self.writer,
            "[rebuild] view={:?} anchor={:?} nodes={} gen={}",
            e.view, e.anchor, e.nodes, e.generation,
        );
    }

    fn on_node_destroyed(&mut self, e: &NodeDestroyedEvent) {
        let _ = writeln!(
            self.writer,
            "[destroy] {} {}@gen{}",
            kind_name(e.kind),
            e.index,
            e.generation,
        );
    }

    fn on_notify(&mut self, e: &NotifyEvent) {
        let topic = match e.topic {
            Topic::Node(id) => format!("node {id:?}"),
            Topic::Transform(id) => format!("transform {id:?}"),
            Topic::Presentation(id) => format!("presentation {id:?}"),
        };
        let _ = writeln!(
            self.writer,
            "[notify] {topic} subscribers={}",
            e.subscribers,
        );
    }
}
