// Copyright 2026 the Graphic Tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graphic document trees with live presentation mirrors.
//!
//! `graphic_tree_core` maintains a hierarchical 2-D document and, for every
//! view that mounts part of it, a mirrored presentation tree whose nodes
//! carry the matrices that place each document node in view space. It is
//! `no_std` compatible (with `alloc`) and stores every entity in arenas
//! addressed by generational handles.
//!
//! # Architecture
//!
//! ```text
//!   Document
//!   ├── graphic nodes ──── TransformCollection per node
//!   │        │ structure / transform notifications
//!   │        ▼
//!   ├── views ──────────── rebuild mirror on structural change
//!   │        │
//!   │        ▼
//!   └── presentation nodes ── projection matrices, recomputed on
//!                             transform change
//! ```
//!
//! **[`tree`]**: Generic parent/child topology with name-keyed children,
//! used for both graphic and presentation nodes.
//!
//! **[`transform`]**: The four [`Transform`](transform::Transform) variants
//! and the ordered [`TransformCollection`](transform::TransformCollection)
//! that combines them into forward, inverse, and non-native matrices plus an
//! SVG `transform` attribute.
//!
//! **[`document`]**: The [`Document`] that owns graphic nodes, presentation
//! nodes, views, and subscriptions, and runs change propagation.
//!
//! **[`observe`]**: Notification [`Topic`](observe::Topic)s.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! instrumentation, with a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Example
//!
//! ```
//! use graphic_tree_core::Document;
//! use graphic_tree_core::kurbo::{Affine, Point};
//!
//! let mut doc = Document::new();
//! let root = doc.create_node();
//! let child = doc.create_node();
//! doc.append_child(root, child);
//! doc.edit_transform(root, |t| t.push(Affine::scale(3.0)));
//!
//! let view = doc.create_view();
//! doc.mount_node(view, root);
//!
//! let mirror = doc.presentation_nodes(child)[0];
//! let p = doc.project_node_to_view(mirror) * Point::new(1.0, 2.0);
//! assert_eq!(p, Point::new(3.0, 6.0));
//! ```
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Adds a notification
//!   event per delivered topic.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

mod arena;

pub mod document;
pub mod error;
pub mod id;
pub mod observe;
pub mod trace;
pub mod transform;
pub mod tree;

pub use document::Document;
pub use error::{Error, Result};
pub use id::{GraphicId, PresentationId, SubscriptionId, ViewId};
pub use kurbo;
