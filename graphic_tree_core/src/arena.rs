// Copyright 2026 the Graphic Tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot storage with generational handles and a free list.

use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::id::Handle;

/// Values addressed by generational handles.
///
/// Removed slots are recycled via a free list; the generation counter is
/// bumped on removal so old handles immediately fail validation.
#[derive(Debug)]
pub(crate) struct Arena<I, T> {
    values: Vec<Option<T>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
    _handle: PhantomData<fn() -> I>,
}

impl<I: Handle, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Handle, T> Arena<I, T> {
    pub(crate) fn new() -> Self {
        Self {
            values: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            _handle: PhantomData,
        }
    }

    /// Stores `value` and returns its handle.
    pub(crate) fn insert(&mut self, value: T) -> I {
        if let Some(idx) = self.free_list.pop() {
            // The generation was already bumped on removal.
            self.values[idx as usize] = Some(value);
            I::from_parts(idx, self.generation[idx as usize])
        } else {
            let idx = u32::try_from(self.values.len()).unwrap_or(u32::MAX);
            assert!(idx != u32::MAX, "arena is full");
            self.values.push(Some(value));
            self.generation.push(0);
            I::from_parts(idx, 0)
        }
    }

    /// Removes the value behind `id`, returning `None` if the handle is stale.
    pub(crate) fn remove(&mut self, id: I) -> Option<T> {
        if !self.is_alive(id) {
            return None;
        }
        let idx = id.index();
        let value = self.values[idx as usize].take();
        self.generation[idx as usize] = self.generation[idx as usize].wrapping_add(1);
        self.free_list.push(idx);
        value
    }

    pub(crate) fn is_alive(&self, id: I) -> bool {
        let idx = id.index() as usize;
        idx < self.values.len()
            && self.generation[idx] == id.generation()
            && self.values[idx].is_some()
    }

    pub(crate) fn try_get(&self, id: I) -> Option<&T> {
        if self.is_alive(id) {
            self.values[id.index() as usize].as_ref()
        } else {
            None
        }
    }

    pub(crate) fn try_get_mut(&mut self, id: I) -> Option<&mut T> {
        if self.is_alive(id) {
            self.values[id.index() as usize].as_mut()
        } else {
            None
        }
    }

    /// Returns the value behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[track_caller]
    pub(crate) fn get(&self, id: I) -> &T {
        match self.try_get(id) {
            Some(value) => value,
            None => self.stale(id),
        }
    }

    /// Returns the value behind `id` mutably.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[track_caller]
    pub(crate) fn get_mut(&mut self, id: I) -> &mut T {
        if !self.is_alive(id) {
            self.stale(id);
        }
        match self.values[id.index() as usize].as_mut() {
            Some(value) => value,
            None => unreachable!("live slot without a value"),
        }
    }

    /// Number of live values.
    pub(crate) fn len(&self) -> usize {
        self.values.len() - self.free_list.len()
    }

    /// Handles of all live values, in slot order.
    pub(crate) fn ids(&self) -> impl Iterator<Item = I> + '_ {
        self.values
            .iter()
            .zip(&self.generation)
            .enumerate()
            .filter(|(_, (value, _))| value.is_some())
            .map(|(idx, (_, &generation))| {
                I::from_parts(u32::try_from(idx).unwrap_or(u32::MAX), generation)
            })
    }

    #[track_caller]
    fn stale(&self, id: I) -> ! {
        let current = self
            .generation
            .get(id.index() as usize)
            .copied()
            .unwrap_or(u32::MAX);
        panic!("stale {}: {id:?} (current gen: {current})", I::KIND);
    }
}
