// Copyright 2026 the Graphic Tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generic parent/child topology with optional name-keyed children.
//!
//! A [`Tree`] owns every node of one kind together with a per-node payload
//! `T`. Nodes are addressed by generational handles and linked by
//! non-owning parent references and ordered child lists:
//!
//! - A node appears in at most one child list, and `parent(n) == Some(p)`
//!   holds exactly when `n` is in `children(p)`.
//! - A child appended under a name is reachable through
//!   [`child_by_name`](Tree::child_by_name); names are unique per parent.
//!
//! The tree itself does not notify anybody. Mutations report what changed
//! (for example the previous parent of a moved node) and callers walk
//! [`propagation_path`](Tree::propagation_path) to inform observers of the
//! node and all of its ancestors.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::arena::Arena;
use crate::error::{Error, Result};
use crate::id::Handle;

#[derive(Debug)]
struct Node<I, T> {
    parent: Option<I>,
    children: Vec<I>,
    mapping_name: Option<String>,
    named: BTreeMap<String, I>,
    data: T,
}

/// Storage and topology for one family of tree nodes.
#[derive(Debug)]
pub struct Tree<I, T> {
    nodes: Arena<I, Node<I, T>>,
}

impl<I: Handle, T> Default for Tree<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Handle, T> Tree<I, T> {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
        }
    }

    // -- Allocation API --

    /// Creates a detached node carrying `data` and returns its handle.
    pub fn insert(&mut self, data: T) -> I {
        self.nodes.insert(Node {
            parent: None,
            children: Vec::new(),
            mapping_name: None,
            named: BTreeMap::new(),
            data,
        })
    }

    /// Frees the slot of a detached, childless node and returns its payload.
    ///
    /// Returns `None` if the handle is already stale.
    ///
    /// # Panics
    ///
    /// Panics if the node still has a parent or children.
    pub fn remove(&mut self, id: I) -> Option<T> {
        let node = self.nodes.try_get(id)?;
        assert!(node.parent.is_none(), "cannot free a node that has a parent");
        assert!(
            node.children.is_empty(),
            "cannot free a node that has children"
        );
        self.nodes.remove(id).map(|node| node.data)
    }

    /// Returns whether the handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: I) -> bool {
        self.nodes.is_alive(id)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Handles of all live nodes, in slot order.
    pub fn ids(&self) -> impl Iterator<Item = I> + '_ {
        self.nodes.ids()
    }

    // -- Payload --

    /// Returns the payload of a node.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    #[track_caller]
    pub fn data(&self, id: I) -> &T {
        &self.nodes.get(id).data
    }

    /// Returns the payload of a node mutably.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[track_caller]
    pub fn data_mut(&mut self, id: I) -> &mut T {
        &mut self.nodes.get_mut(id).data
    }

    /// Returns the payload of a node, or `None` if the handle is stale.
    #[must_use]
    pub fn try_data(&self, id: I) -> Option<&T> {
        self.nodes.try_get(id).map(|node| &node.data)
    }

    // -- Topology queries --

    /// Returns the parent of a node, if any.
    #[must_use]
    #[track_caller]
    pub fn parent(&self, id: I) -> Option<I> {
        self.nodes.get(id).parent
    }

    /// Returns the children of a node in insertion order.
    #[must_use]
    #[track_caller]
    pub fn children(&self, id: I) -> &[I] {
        &self.nodes.get(id).children
    }

    /// Returns the name under which the node is registered in its parent.
    #[must_use]
    #[track_caller]
    pub fn mapping_name(&self, id: I) -> Option<&str> {
        self.nodes.get(id).mapping_name.as_deref()
    }

    /// Looks up a child of `parent` by its mapping name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NameNotFound`] if no child is registered under `name`.
    #[track_caller]
    pub fn child_by_name(&self, parent: I, name: &str) -> Result<I> {
        self.nodes
            .get(parent)
            .named
            .get(name)
            .copied()
            .ok_or_else(|| Error::not_found(name))
    }

    /// Returns an iterator over the strict ancestors of a node, nearest first.
    #[must_use]
    #[track_caller]
    pub fn ancestors(&self, id: I) -> Ancestors<'_, I, T> {
        Ancestors {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Returns the node followed by every strict ancestor up to the root.
    ///
    /// This is the order in which a structural change at `id` is announced.
    #[must_use]
    #[track_caller]
    pub fn propagation_path(&self, id: I) -> Vec<I> {
        let mut path = Vec::new();
        path.push(id);
        path.extend(self.ancestors(id));
        path
    }

    /// Returns whether `ancestor` is `id` itself or one of its ancestors.
    #[must_use]
    #[track_caller]
    pub fn is_ancestor_or_self(&self, ancestor: I, id: I) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Returns the subtree rooted at `id` in depth-first pre-order.
    #[must_use]
    #[track_caller]
    pub fn descendants_inclusive(&self, id: I) -> Vec<I> {
        let mut order = Vec::new();
        let mut stack = Vec::new();
        stack.push(id);
        while let Some(next) = stack.pop() {
            order.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        order
    }

    // -- Topology mutation --

    /// Appends `child` as the last child of `parent`, optionally under a name.
    ///
    /// If `child` already has a parent it is detached from it first. Returns
    /// that previous parent so the caller can announce the removal too.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] if `name` is already bound among the
    /// children of `parent`. Nothing is modified in that case.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `parent` is `child` or one of
    /// its descendants.
    #[track_caller]
    pub fn append_child(&mut self, parent: I, child: I, name: Option<&str>) -> Result<Option<I>> {
        let _ = self.nodes.get(child);
        assert!(
            !self.is_ancestor_or_self(child, parent),
            "cannot append a node to its own subtree"
        );
        if let Some(name) = name {
            if self.nodes.get(parent).named.contains_key(name) {
                return Err(Error::duplicate(name));
            }
        }

        let previous = self.remove_from_parent(child);

        let node = self.nodes.get_mut(child);
        node.parent = Some(parent);
        node.mapping_name = name.map(String::from);

        let parent_node = self.nodes.get_mut(parent);
        parent_node.children.push(child);
        if let Some(name) = name {
            parent_node.named.insert(String::from(name), child);
        }
        Ok(previous)
    }

    /// Removes `child` from the children of `parent`.
    ///
    /// Returns `false` without touching anything if `child` is not currently
    /// a child of `parent`.
    #[track_caller]
    pub fn remove_child(&mut self, parent: I, child: I) -> bool {
        let parent_node = self.nodes.get_mut(parent);
        let Some(pos) = parent_node.children.iter().position(|&c| c == child) else {
            return false;
        };
        parent_node.children.remove(pos);

        let node = self.nodes.get_mut(child);
        node.parent = None;
        if let Some(name) = node.mapping_name.take() {
            self.nodes.get_mut(parent).named.remove(&name);
        }
        true
    }

    /// Detaches all children of `parent` and clears its name mapping.
    ///
    /// Returns the former children in their previous order.
    #[track_caller]
    pub fn clear_children(&mut self, parent: I) -> Vec<I> {
        let parent_node = self.nodes.get_mut(parent);
        parent_node.named.clear();
        let children = core::mem::take(&mut parent_node.children);
        for &child in &children {
            let node = self.nodes.get_mut(child);
            node.parent = None;
            node.mapping_name = None;
        }
        children
    }

    /// Detaches `child` from its parent, returning the former parent.
    ///
    /// Does nothing and returns `None` if the node has no parent.
    #[track_caller]
    pub fn remove_from_parent(&mut self, child: I) -> Option<I> {
        let parent = self.parent(child)?;
        self.remove_child(parent, child);
        Some(parent)
    }
}

/// Iterator over the strict ancestors of a node.
///
/// Created by [`Tree::ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a, I, T> {
    tree: &'a Tree<I, T>,
    current: Option<I>,
}

impl<I: Handle, T> Iterator for Ancestors<'_, I, T> {
    type Item = I;

    fn next(&mut self) -> Option<I> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}
