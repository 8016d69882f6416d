// Copyright 2026 the Graphic Tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation nodes and projection matrices.
//!
//! A presentation node mirrors one graphic node (its *source*) and holds the
//! matrices that place the source in view space:
//!
//! - `project_node_to_view` maps node coordinates to view coordinates. It is
//!   the parent's projection multiplied with the source's transform matrix,
//!   so the node's own transform acts on points first.
//! - `project_view_to_node` is its inverse. A singular projection keeps the
//!   previous inverse.
//! - `project_node_to_view_non_native` is the same composition over the
//!   non-native matrices only, for renderers that emit native SVG commands.
//!
//! Projections are recomputed for a whole subtree in pre-order with an
//! explicit stack, so deep mirrors cannot overflow the call stack.

use alloc::vec::Vec;

use kurbo::Affine;

use super::Document;
use crate::id::{GraphicId, PresentationId, SubscriptionId, ViewId};
use crate::observe::{Subscriber, Topic};
use crate::trace::{self, NodeKind, ProjectionUpdateEvent};
use crate::transform::invert;

/// Payload of a presentation node.
#[derive(Debug)]
pub(crate) struct PresentationData {
    pub(crate) source: Option<GraphicId>,
    pub(crate) view: Option<ViewId>,
    pub(crate) project_view_to_node: Affine,
    pub(crate) project_node_to_view: Affine,
    pub(crate) project_node_to_view_non_native: Affine,
    /// Subscription on the source's transform topic.
    pub(crate) source_subscription: Option<SubscriptionId>,
}

impl Document {
    /// Creates a presentation node mirroring `source`, optionally owned by
    /// `view`.
    ///
    /// The node registers itself with its source and follows the source's
    /// transform edits. Its projections start as identity until the first
    /// [`update_projection_matrices`](Self::update_projection_matrices).
    ///
    /// # Panics
    ///
    /// Panics if `source` is stale.
    #[track_caller]
    pub fn create_presentation_node(
        &mut self,
        view: Option<ViewId>,
        source: GraphicId,
    ) -> PresentationId {
        let _ = self.graphics.data(source);
        let presentation = self.presentations.insert(PresentationData {
            source: Some(source),
            view,
            project_view_to_node: Affine::IDENTITY,
            project_node_to_view: Affine::IDENTITY,
            project_node_to_view_non_native: Affine::IDENTITY,
            source_subscription: None,
        });
        self.register_presentation_node(source, presentation);
        let subscription = self.subscriptions.subscribe(
            Topic::Transform(source),
            Subscriber::Projection(presentation),
        );
        self.presentations.data_mut(presentation).source_subscription = Some(subscription);
        presentation
    }

    /// Whether `presentation` refers to a live presentation node.
    #[must_use]
    pub fn is_presentation_alive(&self, presentation: PresentationId) -> bool {
        self.presentations.is_alive(presentation)
    }

    /// Number of live presentation nodes across all views.
    #[must_use]
    pub fn presentation_count(&self) -> usize {
        self.presentations.len()
    }

    /// The graphic node `presentation` mirrors.
    #[must_use]
    #[track_caller]
    pub fn source_node(&self, presentation: PresentationId) -> Option<GraphicId> {
        self.presentations.data(presentation).source
    }

    /// The view owning `presentation`, if any.
    #[must_use]
    #[track_caller]
    pub fn presentation_view(&self, presentation: PresentationId) -> Option<ViewId> {
        self.presentations.data(presentation).view
    }

    /// Maps node coordinates of `presentation` to view coordinates.
    #[must_use]
    #[track_caller]
    pub fn project_node_to_view(&self, presentation: PresentationId) -> Affine {
        self.presentations.data(presentation).project_node_to_view
    }

    /// Maps view coordinates to node coordinates of `presentation`.
    #[must_use]
    #[track_caller]
    pub fn project_view_to_node(&self, presentation: PresentationId) -> Affine {
        self.presentations.data(presentation).project_view_to_node
    }

    /// Like [`project_node_to_view`](Self::project_node_to_view), but
    /// composed only from non-native transforms.
    #[must_use]
    #[track_caller]
    pub fn project_node_to_view_non_native(&self, presentation: PresentationId) -> Affine {
        self.presentations
            .data(presentation)
            .project_node_to_view_non_native
    }

    // -- Presentation topology --

    /// Returns the parent of `presentation`.
    #[must_use]
    #[track_caller]
    pub fn presentation_parent(&self, presentation: PresentationId) -> Option<PresentationId> {
        self.presentations.parent(presentation)
    }

    /// Returns the children of `presentation` in order.
    #[must_use]
    #[track_caller]
    pub fn presentation_children(&self, presentation: PresentationId) -> &[PresentationId] {
        self.presentations.children(presentation)
    }

    /// Appends `child` as the last child of `parent`, moving it if needed.
    ///
    /// Mirrors owned by a view are rebuilt from the document on the next
    /// structural change, which discards edits made here.
    #[track_caller]
    pub fn append_presentation_child(&mut self, parent: PresentationId, child: PresentationId) {
        let attached = self.presentations.append_child(parent, child, None);
        debug_assert!(attached.is_ok(), "an unnamed append cannot collide");
        if let Ok(Some(previous)) = attached {
            self.notify_presentation_structure(previous);
        }
        self.notify_presentation_structure(parent);
    }

    /// Removes `child` from `parent`. Returns `false` if it was not a child.
    #[track_caller]
    pub fn remove_presentation_child(
        &mut self,
        parent: PresentationId,
        child: PresentationId,
    ) -> bool {
        let removed = self.presentations.remove_child(parent, child);
        if removed {
            self.notify_presentation_structure(parent);
        }
        removed
    }

    // -- Projection --

    /// Recomputes the projection matrices of `presentation` and its whole
    /// subtree, parents before children.
    ///
    /// Nodes without a source are skipped together with their subtree.
    #[track_caller]
    pub fn update_projection_matrices(&mut self, presentation: PresentationId) {
        let mut visited: usize = 0;
        let mut stack = Vec::new();
        stack.push(presentation);

        while let Some(node) = stack.pop() {
            let Some(source) = self.presentations.data(node).source else {
                continue;
            };
            let transform = &self.graphics.data(source).transform;
            let (forward, non_native) = match self.presentations.parent(node) {
                Some(parent) => {
                    let parent = self.presentations.data(parent);
                    (
                        parent.project_node_to_view * transform.transform_matrix(),
                        parent.project_node_to_view_non_native
                            * transform.transform_matrix_non_native(),
                    )
                }
                None => (
                    transform.transform_matrix(),
                    transform.transform_matrix_non_native(),
                ),
            };

            let data = self.presentations.data_mut(node);
            data.project_node_to_view = forward;
            data.project_node_to_view_non_native = non_native;
            if let Some(inverse) = invert(forward) {
                data.project_view_to_node = inverse;
            }
            visited += 1;

            stack.extend(self.presentations.children(node).iter().rev().copied());
        }

        self.tracer.projection_update(&ProjectionUpdateEvent {
            root: presentation,
            nodes: trace::count(visited),
        });
    }

    // -- Destruction --

    /// Destroys a presentation node.
    ///
    /// Its children are detached, it is detached from its parent, its source
    /// subscription and registration are released, and so are subscriptions
    /// made on it. Does nothing if the handle is already stale.
    pub fn destroy_presentation_node(&mut self, presentation: PresentationId) {
        if !self.presentations.is_alive(presentation) {
            return;
        }

        if !self.presentations.children(presentation).is_empty() {
            self.presentations.clear_children(presentation);
            self.notify_presentation_structure(presentation);
        }
        if let Some(parent) = self.presentations.remove_from_parent(presentation) {
            self.notify_presentation_structure(parent);
        }

        let data = self.presentations.data_mut(presentation);
        let subscription = data.source_subscription.take();
        let source = data.source.take();
        data.view = None;

        if let Some(subscription) = subscription {
            self.subscriptions.unsubscribe(subscription);
        }
        if let Some(source) = source.filter(|&s| self.graphics.is_alive(s)) {
            self.remove_presentation_node(source, presentation);
        }
        self.subscriptions
            .clear_topic(Topic::Presentation(presentation));
        self.presentations.remove(presentation);
        self.trace_destroyed(NodeKind::Presentation, presentation);
    }

    /// Destroys `presentation` and then, in order, every node of its former
    /// subtree. Does nothing if the handle is already stale.
    pub fn destroy_presentation_recursive(&mut self, presentation: PresentationId) {
        let mut stack = Vec::new();
        stack.push(presentation);
        while let Some(next) = stack.pop() {
            if !self.presentations.is_alive(next) {
                continue;
            }
            let children = self.presentations.children(next).to_vec();
            self.destroy_presentation_node(next);
            stack.extend(children.into_iter().rev());
        }
    }
}
