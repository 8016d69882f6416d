// Copyright 2026 the Graphic Tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON snapshots of a view's presentation mirror.
//!
//! [`snapshot`] walks the mirror of a view and produces a nested JSON value
//! with, for every presentation node, its handle, its source graphic node,
//! the source's native SVG transform, and the three projection matrices as
//! `[a, b, c, d, e, f]` coefficient arrays. [`export`] writes the same value
//! to a writer.

use std::io::{self, Write};

use kurbo::Affine;
use graphic_tree_core::{Document, PresentationId, ViewId};
use serde_json::{Value, json};

/// Builds a JSON snapshot of the mirror of `view`.
///
/// The `"root"` field is `null` when nothing is mounted.
#[must_use]
pub fn snapshot(doc: &Document, view: ViewId) -> Value {
    let root = doc
        .view_presentation_node(view)
        .map_or(Value::Null, |root| node_json(doc, root));
    json!({
        "view": format!("{view:?}"),
        "anchor": doc.anchor_node(view).map(|a| format!("{a:?}")),
        "generation": doc.mirror_generation(view),
        "root": root,
    })
}

/// Writes the snapshot of `view` as pretty-printed JSON.
pub fn export(doc: &Document, view: ViewId, writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &snapshot(doc, view))?;
    writeln!(writer)
}

fn node_json(doc: &Document, node: PresentationId) -> Value {
    let source = doc.source_node(node);
    let children: Vec<Value> = doc
        .presentation_children(node)
        .iter()
        .map(|&child| node_json(doc, child))
        .collect();
    json!({
        "node": format!("{node:?}"),
        "source": source.map(|s| format!("{s:?}")),
        "name": source.and_then(|s| doc.mapping_name(s)),
        "svg_transform": source.and_then(|s| doc.transform(s).native_svg_transform()),
        "node_to_view": coeffs(doc.project_node_to_view(node)),
        "view_to_node": coeffs(doc.project_view_to_node(node)),
        "node_to_view_non_native": coeffs(doc.project_node_to_view_non_native(node)),
        "children": children,
    })
}

fn coeffs(matrix: Affine) -> Value {
    json!(matrix.as_coeffs())
}
