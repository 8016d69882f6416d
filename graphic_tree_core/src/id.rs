// Copyright 2026 the Graphic Tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handle types for graphic nodes, presentation nodes, views, and
//! subscriptions.
//!
//! Node and view handles are generational: they contain both a slot index and
//! a generation counter so that a handle kept past the destruction of its
//! entity is detected instead of silently addressing whatever reuses the
//! slot.

use core::fmt;

/// A generational handle into an arena owned by a [`Document`](crate::Document)
/// or a [`Tree`](crate::tree::Tree).
pub trait Handle: Copy + Eq + Ord + fmt::Debug {
    /// Short name used in diagnostics, e.g. `"GraphicId"`.
    const KIND: &'static str;

    /// Builds a handle from a slot index and a generation.
    fn from_parts(idx: u32, generation: u32) -> Self;

    /// Returns the raw slot index (for diagnostics only).
    fn index(self) -> u32;

    /// Returns the generation counter.
    fn generation(self) -> u32;
}

macro_rules! generational_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name {
            /// Slot index into the owning arena.
            pub(crate) idx: u32,
            /// Generation counter, must match the arena's generation for this slot.
            pub(crate) generation: u32,
        }

        impl Handle for $name {
            const KIND: &'static str = stringify!($name);

            #[inline]
            fn from_parts(idx: u32, generation: u32) -> Self {
                Self { idx, generation }
            }

            #[inline]
            fn index(self) -> u32 {
                self.idx
            }

            #[inline]
            fn generation(self) -> u32 {
                self.generation
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}@gen{})", stringify!($name), self.idx, self.generation)
            }
        }
    };
}

generational_handle!(
    /// A handle to a graphic node, a node of the authoritative document tree.
    GraphicId
);

generational_handle!(
    /// A handle to a presentation node, a mirrored copy of one graphic node
    /// that carries projection matrices.
    PresentationId
);

generational_handle!(
    /// A handle to a view, which mounts an anchor graphic node and owns the
    /// presentation mirror of its subtree.
    ViewId
);

/// Identifies one live subscription.
///
/// Subscription ids are never reused within a document, so releasing an id
/// twice is harmless.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub(crate) u64);

impl fmt::Debug for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriptionId({})", self.0)
    }
}
