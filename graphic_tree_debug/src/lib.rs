// Copyright 2026 the Graphic Tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and JSON snapshots for graphic_tree
//! diagnostics.
//!
//! This crate provides [`TraceSink`](graphic_tree_core::trace::TraceSink)
//! implementations and inspection helpers for development:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`snapshot::snapshot`]: the presentation mirror of a view, with its
//!   projection matrices, as a JSON value.

pub mod pretty;
pub mod recorder;
pub mod snapshot;
