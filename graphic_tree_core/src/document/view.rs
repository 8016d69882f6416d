// Copyright 2026 the Graphic Tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Views and presentation mirrors.
//!
//! A view mounts an anchor graphic node and owns a presentation tree that
//! mirrors the anchor's subtree one-to-one. Any structural change at or
//! below the anchor rebuilds the whole mirror; transform edits only update
//! projections.

use alloc::vec::Vec;

use super::Document;
use crate::id::{GraphicId, PresentationId, SubscriptionId, ViewId};
use crate::observe::{Subscriber, Topic};
use crate::trace::{self, MirrorRebuildEvent};

/// State of one view.
#[derive(Debug)]
pub(crate) struct ViewData {
    /// Backing graphic node, so the view can be placed in a document.
    pub(crate) node: GraphicId,
    pub(crate) anchor: Option<GraphicId>,
    pub(crate) root: Option<PresentationId>,
    /// Subscription on the anchor's structure topic.
    pub(crate) anchor_subscription: Option<SubscriptionId>,
    pub(crate) mirror_generation: u64,
}

impl Document {
    /// Creates a view with its own backing graphic node and nothing mounted.
    pub fn create_view(&mut self) -> ViewId {
        let node = self.create_node();
        self.views.insert(ViewData {
            node,
            anchor: None,
            root: None,
            anchor_subscription: None,
            mirror_generation: 0,
        })
    }

    /// Whether `view` refers to a live view.
    #[must_use]
    pub fn is_view_alive(&self, view: ViewId) -> bool {
        self.views.is_alive(view)
    }

    /// The graphic node backing `view`.
    #[must_use]
    #[track_caller]
    pub fn view_node(&self, view: ViewId) -> GraphicId {
        self.views.get(view).node
    }

    /// The mounted anchor of `view`.
    #[must_use]
    #[track_caller]
    pub fn anchor_node(&self, view: ViewId) -> Option<GraphicId> {
        self.views.get(view).anchor
    }

    /// The root of the presentation mirror of `view`.
    #[must_use]
    #[track_caller]
    pub fn view_presentation_node(&self, view: ViewId) -> Option<PresentationId> {
        self.views
            .get(view)
            .root
            .filter(|&root| self.presentations.is_alive(root))
    }

    /// How many times the mirror of `view` has been built.
    #[must_use]
    #[track_caller]
    pub fn mirror_generation(&self, view: ViewId) -> u64 {
        self.views.get(view).mirror_generation
    }

    /// Mounts `anchor` in `view` and builds the mirror of its subtree.
    ///
    /// A previously mounted anchor is released first.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    #[track_caller]
    pub fn mount_node(&mut self, view: ViewId, anchor: GraphicId) {
        let _ = self.graphics.data(anchor);
        let previous = self.views.get_mut(view).anchor_subscription.take();
        if let Some(previous) = previous {
            self.subscriptions.unsubscribe(previous);
        }

        let subscription = self
            .subscriptions
            .subscribe(Topic::Node(anchor), Subscriber::Mirror(view));
        let data = self.views.get_mut(view);
        data.anchor = Some(anchor);
        data.anchor_subscription = Some(subscription);

        self.replicate_document_tree(view);
    }

    /// Releases the anchor of `view` and destroys its mirror.
    #[track_caller]
    pub fn unmount(&mut self, view: ViewId) {
        let data = self.views.get_mut(view);
        data.anchor = None;
        if let Some(subscription) = data.anchor_subscription.take() {
            self.subscriptions.unsubscribe(subscription);
        }
        self.destroy_document_tree(view);
    }

    /// Unmounts `view` and destroys it together with its backing node.
    ///
    /// Does nothing if the handle is already stale.
    pub fn destroy_view(&mut self, view: ViewId) {
        if let Some(node) = self.views.try_get(view).map(|data| data.node) {
            // Destroying the backing node tears the view down.
            self.destroy_node(node);
        }
    }

    /// Rebuilds the mirror of `view` from its anchor.
    pub(super) fn replicate_document_tree(&mut self, view: ViewId) {
        self.destroy_document_tree(view);
        let Some(anchor) = self.views.try_get(view).and_then(|data| data.anchor) else {
            return;
        };

        let root = self.create_presentation_node(Some(view), anchor);
        let mut nodes: usize = 1;
        let mut stack: Vec<(GraphicId, PresentationId)> = Vec::new();
        stack.push((anchor, root));
        while let Some((source, mirror)) = stack.pop() {
            let children = self.graphics.children(source).to_vec();
            for child in children {
                let child_mirror = self.create_presentation_node(Some(view), child);
                let attached = self.presentations.append_child(mirror, child_mirror, None);
                debug_assert!(attached.is_ok(), "an unnamed append cannot collide");
                stack.push((child, child_mirror));
                nodes += 1;
            }
        }

        self.update_projection_matrices(root);

        let data = self.views.get_mut(view);
        data.root = Some(root);
        data.mirror_generation += 1;
        let generation = data.mirror_generation;
        self.tracer.mirror_rebuild(&MirrorRebuildEvent {
            view,
            anchor,
            nodes: trace::count(nodes),
            generation,
        });
    }

    fn destroy_document_tree(&mut self, view: ViewId) {
        let Some(data) = self.views.try_get_mut(view) else {
            return;
        };
        if let Some(root) = data.root.take() {
            self.destroy_presentation_recursive(root);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::{Affine, Point};

    use super::*;
    use crate::transform::Transform;

    /// anchor -> [a -> [a1], b]
    fn document() -> (Document, GraphicId, [GraphicId; 3]) {
        let mut doc = Document::new();
        let anchor = doc.create_node();
        let a = doc.create_node();
        let a1 = doc.create_node();
        let b = doc.create_node();
        doc.append_child(anchor, a);
        doc.append_child(a, a1);
        doc.append_child(anchor, b);
        (doc, anchor, [a, a1, b])
    }

    #[test]
    fn mirror_matches_source_tree() {
        let (mut doc, anchor, [a, a1, b]) = document();
        let view = doc.create_view();
        doc.mount_node(view, anchor);

        let root = doc.view_presentation_node(view).unwrap();
        assert_eq!(doc.source_node(root), Some(anchor));
        assert_eq!(doc.presentation_view(root), Some(view));

        let children = doc.presentation_children(root).to_vec();
        let sources: Vec<_> = children.iter().map(|&p| doc.source_node(p)).collect();
        assert_eq!(sources, vec![Some(a), Some(b)]);

        let grandchildren = doc.presentation_children(children[0]);
        assert_eq!(grandchildren.len(), 1);
        assert_eq!(doc.source_node(grandchildren[0]), Some(a1));
        assert!(doc.presentation_children(children[1]).is_empty());

        for node in [anchor, a, a1, b] {
            assert_eq!(doc.presentation_nodes(node).len(), 1);
        }
        assert_eq!(doc.mirror_generation(view), 1);
    }

    #[test]
    fn anchor_with_one_child() {
        let mut doc = Document::new();
        let anchor = doc.create_node();
        let child = doc.create_node();
        doc.append_child(anchor, child);
        let view = doc.create_view();
        doc.mount_node(view, anchor);

        let root = doc.view_presentation_node(view).unwrap();
        let children = doc.presentation_children(root);
        assert_eq!(children.len(), 1);
        assert_eq!(doc.source_node(children[0]), Some(child));
    }

    #[test]
    fn transform_edit_updates_projection_without_rebuild() {
        let (mut doc, anchor, [a, a1, _]) = document();
        let view = doc.create_view();
        doc.mount_node(view, anchor);
        let mirror = doc.presentation_nodes(a1)[0];

        doc.edit_transform(a, |t| t.push(Transform::translation(2.0, 3.0)));

        assert_eq!(doc.mirror_generation(view), 1, "no rebuild");
        assert_eq!(doc.presentation_nodes(a1), &[mirror], "same mirror node");
        assert_eq!(
            doc.project_node_to_view(mirror) * Point::ORIGIN,
            Point::new(2.0, 3.0)
        );
    }

    #[test]
    fn adding_a_child_rebuilds_once() {
        let (mut doc, anchor, [_, a1, _]) = document();
        let view = doc.create_view();
        doc.mount_node(view, anchor);
        let before = doc.presentation_count();

        let extra = doc.create_node();
        doc.append_child(a1, extra);

        assert_eq!(doc.mirror_generation(view), 2);
        assert_eq!(doc.presentation_count(), before + 1);
        assert_eq!(doc.presentation_nodes(extra).len(), 1);
    }

    #[test]
    fn rebuild_does_not_leak() {
        let (mut doc, anchor, [a, a1, b]) = document();
        let view = doc.create_view();
        doc.mount_node(view, anchor);
        let subscriptions = doc.subscription_count();

        for _ in 0..3 {
            let extra = doc.create_node();
            doc.append_child(b, extra);
            doc.destroy_node(extra);
        }

        assert_eq!(doc.presentation_count(), 4);
        assert_eq!(doc.subscription_count(), subscriptions);
        for node in [anchor, a, a1, b] {
            assert_eq!(doc.presentation_nodes(node).len(), 1);
        }
    }

    #[test]
    fn remount_releases_previous_anchor() {
        let (mut doc, anchor, [a, _, b]) = document();
        let view = doc.create_view();
        doc.mount_node(view, anchor);
        doc.mount_node(view, b);

        assert_eq!(doc.anchor_node(view), Some(b));
        assert_eq!(doc.subscriber_count(Topic::Node(anchor)), 0);
        assert!(doc.presentation_nodes(anchor).is_empty());
        assert_eq!(doc.presentation_count(), 1);

        // Edits under the old anchor no longer rebuild.
        let generation = doc.mirror_generation(view);
        let extra = doc.create_node();
        doc.append_child(a, extra);
        assert_eq!(doc.mirror_generation(view), generation);
    }

    #[test]
    fn two_views_mirror_independently() {
        let (mut doc, anchor, [a, _, _]) = document();
        let v1 = doc.create_view();
        let v2 = doc.create_view();
        doc.mount_node(v1, anchor);
        doc.mount_node(v2, a);
        doc.edit_transform(anchor, |t| t.push(Affine::scale(2.0)));

        let mirrors = doc.presentation_nodes(a).to_vec();
        assert_eq!(mirrors.len(), 2);
        let in_v1 = mirrors
            .iter()
            .copied()
            .find(|&p| doc.presentation_view(p) == Some(v1))
            .unwrap();
        let in_v2 = mirrors
            .iter()
            .copied()
            .find(|&p| doc.presentation_view(p) == Some(v2))
            .unwrap();

        assert_eq!(doc.project_node_to_view(in_v1), Affine::scale(2.0));
        assert_eq!(doc.project_node_to_view(in_v2), Affine::IDENTITY);
    }

    #[test]
    fn unmount_and_destroy_view() {
        let (mut doc, anchor, _) = document();
        let view = doc.create_view();
        let backing = doc.view_node(view);
        doc.mount_node(view, anchor);

        doc.unmount(view);
        assert_eq!(doc.anchor_node(view), None);
        assert_eq!(doc.view_presentation_node(view), None);
        assert_eq!(doc.presentation_count(), 0);
        assert_eq!(doc.subscription_count(), 0);

        doc.mount_node(view, anchor);
        doc.destroy_view(view);
        assert!(!doc.is_view_alive(view));
        assert!(!doc.is_alive(backing));
        assert_eq!(doc.presentation_count(), 0);
        assert_eq!(doc.subscription_count(), 0);
        doc.destroy_view(view);
    }

    #[test]
    fn destroying_the_anchor_unmounts() {
        let (mut doc, anchor, _) = document();
        let view = doc.create_view();
        doc.mount_node(view, anchor);

        doc.destroy_recursive(anchor);

        assert!(doc.is_view_alive(view));
        assert_eq!(doc.anchor_node(view), None);
        assert_eq!(doc.presentation_count(), 0);
        assert_eq!(doc.subscription_count(), 0);
    }

    #[test]
    fn view_node_can_be_placed_in_a_document() {
        let (mut doc, anchor, _) = document();
        let view = doc.create_view();
        let backing = doc.view_node(view);
        doc.mount_node(view, anchor);

        let generation = doc.mirror_generation(view);
        doc.append_child(anchor, backing);

        assert_eq!(doc.parent(backing), Some(anchor));
        assert_eq!(doc.mirror_generation(view), generation + 1);
        assert_eq!(doc.presentation_nodes(backing).len(), 1);
    }
}
