// Copyright 2026 the Graphic Tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The document: graphic nodes, presentation mirrors, views, and the
//! subscriptions that keep them in sync.
//!
//! A [`Document`] is the single owner of every entity. Entities refer to
//! each other through generational handles, so there are no owning cycles
//! and teardown order is controlled by the `destroy_*` methods.
//!
//! Change flows in two directions:
//!
//! - **Structure** edits on a graphic node (append, remove, clear) notify the
//!   node and every strict ancestor. A view whose anchor is on that path
//!   rebuilds its presentation mirror from scratch.
//! - **Transform** edits through [`Document::edit_transform`] notify only the
//!   edited node's transform topic. Every presentation node mirroring that
//!   node recomputes the projection matrices of its subtree; no mirror is
//!   rebuilt.
//!
//! Everything happens synchronously, before the mutating call returns.

mod presentation;
mod view;

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::arena::Arena;
use crate::error::Result;
use crate::id::{GraphicId, Handle, PresentationId, SubscriptionId, ViewId};
use crate::observe::{Subscriber, Subscriptions, Topic};
use crate::trace::{self, NodeDestroyedEvent, NodeKind, TraceSink, TransformCombineEvent, Tracer};
use crate::transform::TransformCollection;
use crate::tree::Tree;

use presentation::PresentationData;
use view::ViewData;

/// Payload of a graphic node.
#[derive(Debug, Default)]
pub(crate) struct GraphicData {
    pub(crate) transform: TransformCollection,
    /// Presentation nodes mirroring this node, in registration order.
    pub(crate) presentation_nodes: Vec<PresentationId>,
}

/// Owner of a graphic document and its views.
#[derive(Debug)]
pub struct Document {
    graphics: Tree<GraphicId, GraphicData>,
    presentations: Tree<PresentationId, PresentationData>,
    views: Arena<ViewId, ViewData>,
    subscriptions: Subscriptions,
    tracer: Tracer,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graphics: Tree::new(),
            presentations: Tree::new(),
            views: Arena::new(),
            subscriptions: Subscriptions::new(),
            tracer: Tracer::none(),
        }
    }

    /// Installs a trace sink, returning the previous one.
    ///
    /// Events are only delivered when the `trace` feature is enabled.
    pub fn set_trace_sink(&mut self, sink: Option<Box<dyn TraceSink>>) -> Option<Box<dyn TraceSink>> {
        self.tracer.set_sink(sink)
    }

    // -- Graphic node lifecycle --

    /// Creates a detached graphic node with an empty transform collection.
    pub fn create_node(&mut self) -> GraphicId {
        self.graphics.insert(GraphicData::default())
    }

    /// Whether `node` refers to a live graphic node.
    #[must_use]
    pub fn is_alive(&self, node: GraphicId) -> bool {
        self.graphics.is_alive(node)
    }

    /// Number of live graphic nodes, including the backing nodes of views.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graphics.len()
    }

    /// Destroys a graphic node.
    ///
    /// The node's children are detached (not destroyed), the node is
    /// detached from its parent, and every subscription on the node is
    /// released. Views anchored on the node are unmounted, remaining
    /// presentation nodes mirroring it are destroyed, and if the node backs
    /// a view that view is destroyed as well.
    ///
    /// Does nothing if the handle is already stale.
    pub fn destroy_node(&mut self, node: GraphicId) {
        if !self.graphics.is_alive(node) {
            return;
        }

        if !self.graphics.children(node).is_empty() {
            self.clear_children(node);
        }
        self.remove_from_parent(node);

        let views: Vec<ViewId> = self.views.ids().collect();
        for view in views {
            let Some(data) = self.views.try_get(view) else {
                continue;
            };
            let backs = data.node == node;
            if backs || data.anchor == Some(node) {
                self.unmount(view);
            }
            if backs {
                self.views.remove(view);
                self.trace_destroyed(NodeKind::View, view);
            }
        }

        let mirrors = self.graphics.data(node).presentation_nodes.clone();
        for presentation in mirrors {
            self.destroy_presentation_node(presentation);
        }

        self.subscriptions.clear_topic(Topic::Node(node));
        self.subscriptions.clear_topic(Topic::Transform(node));
        self.graphics.remove(node);
        self.trace_destroyed(NodeKind::Graphic, node);
    }

    /// Destroys a node and then, in order, every node of its former subtree.
    ///
    /// Does nothing if the handle is already stale.
    pub fn destroy_recursive(&mut self, node: GraphicId) {
        let mut stack = Vec::new();
        stack.push(node);
        while let Some(next) = stack.pop() {
            if !self.graphics.is_alive(next) {
                continue;
            }
            let children = self.graphics.children(next).to_vec();
            self.destroy_node(next);
            stack.extend(children.into_iter().rev());
        }
    }

    // -- Graphic node topology --

    /// Returns the parent of `node`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale (this holds for all node accessors).
    #[must_use]
    #[track_caller]
    pub fn parent(&self, node: GraphicId) -> Option<GraphicId> {
        self.graphics.parent(node)
    }

    /// Returns the children of `node` in order.
    #[must_use]
    #[track_caller]
    pub fn children(&self, node: GraphicId) -> &[GraphicId] {
        self.graphics.children(node)
    }

    /// Returns the name `node` was appended under, if any.
    #[must_use]
    #[track_caller]
    pub fn mapping_name(&self, node: GraphicId) -> Option<&str> {
        self.graphics.mapping_name(node)
    }

    /// Looks up a child of `parent` by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NameNotFound`](crate::Error::NameNotFound) if no
    /// child is bound to `name`.
    #[track_caller]
    pub fn child_by_name(&self, parent: GraphicId, name: &str) -> Result<GraphicId> {
        self.graphics.child_by_name(parent, name)
    }

    /// Iterates over the strict ancestors of `node`, nearest first.
    #[must_use]
    #[track_caller]
    pub fn ancestors(&self, node: GraphicId) -> impl Iterator<Item = GraphicId> + '_ {
        self.graphics.ancestors(node)
    }

    /// Appends `child` as the last child of `parent`.
    ///
    /// A child that already has a parent is moved. Both the old and the new
    /// parent chain are notified.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is `child` or one of its descendants.
    #[track_caller]
    pub fn append_child(&mut self, parent: GraphicId, child: GraphicId) {
        let attached = self.attach(parent, child, None);
        debug_assert!(attached.is_ok(), "an unnamed append cannot collide");
    }

    /// Appends `child` under `name`, which must be unique among the
    /// children of `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`](crate::Error::DuplicateName) if the
    /// name is taken. Nothing changes and nobody is notified in that case.
    #[track_caller]
    pub fn append_named_child(
        &mut self,
        parent: GraphicId,
        child: GraphicId,
        name: &str,
    ) -> Result<()> {
        self.attach(parent, child, Some(name))
    }

    /// Removes `child` from `parent`. Returns `false` and does nothing if
    /// `child` is not a child of `parent`.
    #[track_caller]
    pub fn remove_child(&mut self, parent: GraphicId, child: GraphicId) -> bool {
        let removed = self.graphics.remove_child(parent, child);
        if removed {
            self.notify_graphic_structure(parent);
        }
        removed
    }

    /// Detaches every child of `parent` and notifies once.
    #[track_caller]
    pub fn clear_children(&mut self, parent: GraphicId) -> Vec<GraphicId> {
        let former = self.graphics.clear_children(parent);
        self.notify_graphic_structure(parent);
        former
    }

    /// Detaches `node` from its parent, returning the former parent.
    #[track_caller]
    pub fn remove_from_parent(&mut self, node: GraphicId) -> Option<GraphicId> {
        let parent = self.graphics.remove_from_parent(node)?;
        self.notify_graphic_structure(parent);
        Some(parent)
    }

    #[track_caller]
    fn attach(&mut self, parent: GraphicId, child: GraphicId, name: Option<&str>) -> Result<()> {
        let previous = self.graphics.append_child(parent, child, name)?;
        if let Some(previous) = previous {
            self.notify_graphic_structure(previous);
        }
        self.notify_graphic_structure(parent);
        Ok(())
    }

    // -- Transforms --

    /// The transform collection of `node`.
    #[must_use]
    #[track_caller]
    pub fn transform(&self, node: GraphicId) -> &TransformCollection {
        &self.graphics.data(node).transform
    }

    /// Edits the transform collection of `node`.
    ///
    /// If the closure changed the collection, the node's transform topic is
    /// notified once after it returns, which updates the projections of
    /// every presentation node mirroring `node`.
    #[track_caller]
    pub fn edit_transform<R>(
        &mut self,
        node: GraphicId,
        f: impl FnOnce(&mut TransformCollection) -> R,
    ) -> R {
        let transform = &mut self.graphics.data_mut(node).transform;
        let before = transform.revision();
        let result = f(transform);
        if transform.revision() != before {
            let event = TransformCombineEvent {
                node,
                members: trace::count(transform.len()),
                revision: transform.revision(),
                inverse_retained: transform.inverse_retained(),
            };
            self.tracer.transform_combine(&event);
            self.dispatch(Topic::Transform(node));
        }
        result
    }

    // -- Presentation back-references --

    /// Presentation nodes currently mirroring `node`.
    #[must_use]
    #[track_caller]
    pub fn presentation_nodes(&self, node: GraphicId) -> &[PresentationId] {
        &self.graphics.data(node).presentation_nodes
    }

    /// Records `presentation` as a mirror of `node`.
    #[track_caller]
    pub fn register_presentation_node(&mut self, node: GraphicId, presentation: PresentationId) {
        self.graphics
            .data_mut(node)
            .presentation_nodes
            .push(presentation);
    }

    /// Forgets `presentation` as a mirror of `node`. Does nothing if it was
    /// not registered.
    #[track_caller]
    pub fn remove_presentation_node(&mut self, node: GraphicId, presentation: PresentationId) {
        let list = &mut self.graphics.data_mut(node).presentation_nodes;
        if let Some(pos) = list.iter().position(|&p| p == presentation) {
            list.remove(pos);
        }
    }

    // -- Observers --

    /// Calls `callback` whenever the structure at or below `node` changes.
    #[track_caller]
    pub fn subscribe_to_node(
        &mut self,
        node: GraphicId,
        callback: impl FnMut(Topic) + 'static,
    ) -> SubscriptionId {
        let _ = self.graphics.data(node);
        self.subscriptions
            .subscribe(Topic::Node(node), Subscriber::Callback(Box::new(callback)))
    }

    /// Calls `callback` whenever the transform collection of `node` changes.
    #[track_caller]
    pub fn subscribe_to_transform(
        &mut self,
        node: GraphicId,
        callback: impl FnMut(Topic) + 'static,
    ) -> SubscriptionId {
        let _ = self.graphics.data(node);
        self.subscriptions.subscribe(
            Topic::Transform(node),
            Subscriber::Callback(Box::new(callback)),
        )
    }

    /// Calls `callback` whenever the structure at or below `presentation`
    /// changes.
    #[track_caller]
    pub fn subscribe_to_presentation(
        &mut self,
        presentation: PresentationId,
        callback: impl FnMut(Topic) + 'static,
    ) -> SubscriptionId {
        let _ = self.presentations.data(presentation);
        self.subscriptions.subscribe(
            Topic::Presentation(presentation),
            Subscriber::Callback(Box::new(callback)),
        )
    }

    /// Releases a subscription. Returns whether it was still live.
    pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
        self.subscriptions.unsubscribe(subscription)
    }

    /// Number of live subscriptions, internal ones included.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Number of live subscriptions on `topic`, internal ones included.
    #[must_use]
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.subscriptions.count(topic)
    }

    // -- Notification --

    fn notify_graphic_structure(&mut self, node: GraphicId) {
        for id in self.graphics.propagation_path(node) {
            self.dispatch(Topic::Node(id));
        }
    }

    fn notify_presentation_structure(&mut self, node: PresentationId) {
        for id in self.presentations.propagation_path(node) {
            self.dispatch(Topic::Presentation(id));
        }
    }

    /// Delivers one notification on `topic`.
    ///
    /// The subscriber list is snapshotted first; subscriptions released by an
    /// earlier subscriber in the same dispatch are skipped.
    fn dispatch(&mut self, topic: Topic) {
        let ids = self.subscriptions.snapshot(topic);
        #[cfg(feature = "trace-rich")]
        self.tracer.notify(&trace::NotifyEvent {
            topic,
            subscribers: trace::count(ids.len()),
        });
        for id in ids {
            let reaction = match self.subscriptions.get_mut(id) {
                None => continue,
                Some(Subscriber::Callback(callback)) => {
                    callback(topic);
                    continue;
                }
                Some(Subscriber::Projection(presentation)) => Reaction::Project(*presentation),
                Some(Subscriber::Mirror(view)) => Reaction::Rebuild(*view),
            };
            match reaction {
                Reaction::Project(presentation) => self.update_projection_matrices(presentation),
                Reaction::Rebuild(view) => self.replicate_document_tree(view),
            }
        }
    }

    fn trace_destroyed(&mut self, kind: NodeKind, id: impl Handle) {
        self.tracer.node_destroyed(&NodeDestroyedEvent {
            kind,
            index: id.index(),
            generation: id.generation(),
        });
    }
}

/// Internal subscriber work, copied out of the registry before it runs.
enum Reaction {
    Project(PresentationId),
    Rebuild(ViewId),
}
