// Copyright 2026 the Graphic Tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end usage of a document, its transforms, and a mounted view.

use std::cell::Cell;
use std::rc::Rc;

use graphic_tree_core::kurbo::{Affine, Point};
use graphic_tree_core::observe::Topic;
use graphic_tree_core::transform::Transform;
use graphic_tree_core::{Document, Error};

fn approx(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn scaled_root_projects_child_into_view() {
    let mut doc = Document::new();
    let root = doc.create_node();
    let child = doc.create_node();
    doc.append_child(root, child);
    doc.edit_transform(root, |t| t.push(Transform::scaling(3.0, 3.0)));

    let view = doc.create_view();
    doc.mount_node(view, root);

    let mirror = doc.presentation_nodes(child)[0];
    assert_eq!(
        doc.project_node_to_view(mirror) * Point::new(1.0, 2.0),
        Point::new(3.0, 6.0)
    );
    assert!(approx(
        doc.project_view_to_node(mirror) * Point::new(3.0, 6.0),
        Point::new(1.0, 2.0)
    ));
}

#[test]
fn combined_transforms_apply_own_members_then_ancestors() {
    let mut doc = Document::new();
    let root = doc.create_node();
    let child = doc.create_node();
    doc.append_child(root, child);
    doc.edit_transform(root, |t| t.push(Transform::translation(10.0, 0.0)));
    doc.edit_transform(child, |t| {
        t.push(Transform::scaling(2.0, 2.0));
        t.push(Transform::translation(1.0, 1.0));
    });

    assert_eq!(
        doc.transform(child).native_svg_transform(),
        Some("translate(1, 1), scale(2, 2)")
    );

    let view = doc.create_view();
    doc.mount_node(view, root);
    let mirror = doc.presentation_nodes(child)[0];

    // (1, 2) scaled to (2, 4), translated to (3, 5), then by the root to (13, 5).
    assert!(approx(
        doc.project_node_to_view(mirror) * Point::new(1.0, 2.0),
        Point::new(13.0, 5.0)
    ));
    assert!(approx(
        doc.project_view_to_node(mirror) * Point::new(13.0, 5.0),
        Point::new(1.0, 2.0)
    ));
    assert_eq!(doc.project_node_to_view_non_native(mirror), Affine::IDENTITY);
}

#[test]
fn non_native_projection_keeps_only_matrix_members() {
    let mut doc = Document::new();
    let root = doc.create_node();
    let child = doc.create_node();
    doc.append_child(root, child);
    doc.edit_transform(root, |t| {
        t.push(Affine::skew(0.5, 0.0));
        t.push(Transform::translation(4.0, 4.0));
    });
    doc.edit_transform(child, |t| t.push(Transform::rotation(90.0, Point::ORIGIN)));

    let view = doc.create_view();
    doc.mount_node(view, root);
    let mirror = doc.presentation_nodes(child)[0];

    assert_eq!(
        doc.project_node_to_view_non_native(mirror),
        Affine::skew(0.5, 0.0)
    );
    assert_eq!(doc.transform(child).native_svg_transform(), Some("rotate(90)"));
    assert_eq!(doc.transform(root).native_svg_transform(), Some("translate(4, 4)"));
}

#[test]
fn editing_a_transform_updates_mirrors_without_rebuilding() {
    let mut doc = Document::new();
    let root = doc.create_node();
    let child = doc.create_node();
    doc.append_child(root, child);
    let view = doc.create_view();
    doc.mount_node(view, root);
    let generation = doc.mirror_generation(view);
    let mirror = doc.presentation_nodes(child)[0];

    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    doc.subscribe_to_transform(root, move |topic| {
        assert_eq!(topic, Topic::Transform(root), "unexpected topic");
        counter.set(counter.get() + 1);
    });

    doc.edit_transform(root, |t| t.push(Transform::translation(5.0, 6.0)));
    assert_eq!(hits.get(), 1);
    assert_eq!(doc.mirror_generation(view), generation);
    assert_eq!(doc.presentation_nodes(child), &[mirror]);
    assert_eq!(
        doc.project_node_to_view(mirror) * Point::ORIGIN,
        Point::new(5.0, 6.0)
    );

    // A no-op edit does not notify.
    doc.edit_transform(root, |t| t.len());
    assert_eq!(hits.get(), 1);
}

#[test]
fn structural_change_rebuilds_the_mirror() {
    let mut doc = Document::new();
    let root = doc.create_node();
    let view = doc.create_view();
    doc.mount_node(view, root);
    let generation = doc.mirror_generation(view);

    let child = doc.create_node();
    doc.append_child(root, child);

    assert_eq!(doc.mirror_generation(view), generation + 1);
    let Some(mirror_root) = doc.view_presentation_node(view) else {
        panic!("view should be mounted");
    };
    assert_eq!(doc.presentation_children(mirror_root).len(), 1);
    assert_eq!(doc.presentation_nodes(child).len(), 1);
}

#[test]
fn named_children_and_named_members() {
    let mut doc = Document::new();
    let root = doc.create_node();
    let label = doc.create_node();
    doc.append_named_child(root, label, "label").unwrap();
    assert_eq!(doc.child_by_name(root, "label").unwrap(), label);
    assert_eq!(doc.mapping_name(label), Some("label"));

    let other = doc.create_node();
    assert!(matches!(
        doc.append_named_child(root, other, "label"),
        Err(Error::DuplicateName { .. })
    ));
    assert!(matches!(
        doc.child_by_name(root, "missing"),
        Err(Error::NameNotFound { .. })
    ));

    doc.edit_transform(label, |t| {
        t.append(Transform::translation(0.0, 0.0), Some("offset"))
    })
    .unwrap();
    doc.edit_transform(label, |t| {
        t.update_by_name("offset", |m| *m = Transform::translation(2.0, 0.0))
    })
    .unwrap();
    assert_eq!(
        doc.transform(label).native_svg_transform(),
        Some("translate(2, 0)")
    );
}

#[test]
fn destroying_a_view_releases_its_mirror() {
    let mut doc = Document::new();
    let root = doc.create_node();
    let child = doc.create_node();
    doc.append_child(root, child);
    let view = doc.create_view();
    doc.mount_node(view, root);
    assert!(doc.presentation_count() > 0);

    doc.destroy_view(view);
    assert!(!doc.is_view_alive(view));
    assert_eq!(doc.presentation_count(), 0);
    assert!(doc.presentation_nodes(child).is_empty());
    assert!(doc.presentation_nodes(root).is_empty());
}
