// Copyright 2026 the Graphic Tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recoverable errors raised by name-keyed lookups.
//!
//! Only the name mappings of tree nodes and transform collections can fail in
//! a way the caller is expected to handle. Contract violations such as using
//! a stale handle or creating a cycle panic instead, and a singular transform
//! matrix is never an error (the previous inverse is retained).

use alloc::string::String;

/// Errors returned by name-keyed child and collection operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A child or collection item is already bound under this name.
    #[error("name is not unique: {name:?}")]
    DuplicateName {
        /// The name that was already bound.
        name: String,
    },
    /// No child or collection item is bound under this name.
    #[error("nothing is registered under the name {name:?}")]
    NameNotFound {
        /// The name that was looked up.
        name: String,
    },
}

impl Error {
    pub(crate) fn duplicate(name: &str) -> Self {
        Self::DuplicateName {
            name: String::from(name),
        }
    }

    pub(crate) fn not_found(name: &str) -> Self {
        Self::NameNotFound {
            name: String::from(name),
        }
    }
}

/// Shorthand for results carrying an [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;
