// Copyright 2026 the Graphic Tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change notification topics and the subscription registry.
//!
//! Every observable thing in a [`Document`](crate::Document) is a [`Topic`].
//! A subscription binds one [`Subscriber`] to one topic and is identified by
//! a [`SubscriptionId`] that stays valid until it is released. The registry
//! only stores subscriptions; delivering a notification is up to the
//! document, which needs mutable access to itself to run internal
//! subscribers such as projection updates and mirror rebuilds.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use crate::id::{GraphicId, PresentationId, SubscriptionId, ViewId};

/// Something that can change and be observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Topic {
    /// Structure of a graphic node or anything below it.
    Node(GraphicId),
    /// The transform collection of a graphic node.
    Transform(GraphicId),
    /// Structure of a presentation node or anything below it.
    Presentation(PresentationId),
}

/// User callback invoked with the topic that fired.
pub type Callback = Box<dyn FnMut(Topic)>;

/// What happens when a topic fires.
pub(crate) enum Subscriber {
    /// Invoke a user callback.
    Callback(Callback),
    /// Recompute the projection matrices of a presentation subtree.
    Projection(PresentationId),
    /// Rebuild the presentation mirror of a view.
    Mirror(ViewId),
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("Callback"),
            Self::Projection(p) => f.debug_tuple("Projection").field(p).finish(),
            Self::Mirror(v) => f.debug_tuple("Mirror").field(v).finish(),
        }
    }
}

#[derive(Debug)]
struct Entry {
    topic: Topic,
    subscriber: Subscriber,
}

/// Registry of live subscriptions, indexed by id and by topic.
#[derive(Debug, Default)]
pub(crate) struct Subscriptions {
    next_id: u64,
    entries: BTreeMap<SubscriptionId, Entry>,
    by_topic: BTreeMap<Topic, Vec<SubscriptionId>>,
}

impl Subscriptions {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers `subscriber` on `topic`. Ids are never reused.
    pub(crate) fn subscribe(&mut self, topic: Topic, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, Entry { topic, subscriber });
        self.by_topic.entry(topic).or_default().push(id);
        id
    }

    /// Releases a subscription. Returns `false` if it was already released.
    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let Some(entry) = self.entries.remove(&id) else {
            return false;
        };
        if let Some(ids) = self.by_topic.get_mut(&entry.topic) {
            ids.retain(|&other| other != id);
            if ids.is_empty() {
                self.by_topic.remove(&entry.topic);
            }
        }
        true
    }

    /// Releases every subscription on `topic`, returning how many there were.
    pub(crate) fn clear_topic(&mut self, topic: Topic) -> usize {
        let ids = self.by_topic.remove(&topic).unwrap_or_default();
        for id in &ids {
            self.entries.remove(id);
        }
        ids.len()
    }

    /// The ids subscribed to `topic`, in subscription order.
    pub(crate) fn snapshot(&self, topic: Topic) -> Vec<SubscriptionId> {
        self.by_topic.get(&topic).cloned().unwrap_or_default()
    }

    pub(crate) fn get_mut(&mut self, id: SubscriptionId) -> Option<&mut Subscriber> {
        self.entries.get_mut(&id).map(|entry| &mut entry.subscriber)
    }

    /// Number of subscriptions on `topic`.
    pub(crate) fn count(&self, topic: Topic) -> usize {
        self.by_topic.get(&topic).map_or(0, Vec::len)
    }

    /// Number of live subscriptions.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
