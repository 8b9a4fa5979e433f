//! Facade-level player events and their subscriber lists.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{IdAllocator, SubscriptionId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerEvent {
    Ready,
    Complete,
    Frame,
    Refresh,
}

impl PlayerEvent {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Complete => "complete",
            Self::Frame => "frame",
            Self::Refresh => "refresh",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ready" => Some(Self::Ready),
            "complete" => Some(Self::Complete),
            "frame" => Some(Self::Frame),
            "refresh" => Some(Self::Refresh),
            _ => None,
        }
    }
}

pub type Callback = Box<dyn FnMut(PlayerEvent)>;

struct Subscriber {
    id: SubscriptionId,
    event: PlayerEvent,
    callback: Callback,
}

/// Subscriber lists plus an optional outbox drained by the host wiring.
///
/// The outbox is off by default; a bus nobody drains queues nothing.
#[derive(Default)]
pub struct EventBus {
    ids: IdAllocator,
    subscribers: Vec<Subscriber>,
    queueing: bool,
    outbox: VecDeque<PlayerEvent>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("queueing", &self.queueing)
            .field("outbox", &self.outbox)
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn the outbox on or off. Turning it off drops anything queued.
    pub fn set_queueing(&mut self, on: bool) {
        self.queueing = on;
        if !on {
            self.outbox.clear();
        }
    }

    pub fn is_queueing(&self) -> bool {
        self.queueing
    }

    pub fn queued(&self) -> usize {
        self.outbox.len()
    }

    /// Register a callback for one event. Many callbacks per event are allowed.
    pub fn subscribe(&mut self, event: PlayerEvent, callback: Callback) -> SubscriptionId {
        let id = self.ids.alloc_subscription();
        self.subscribers.push(Subscriber {
            id,
            event,
            callback,
        });
        id
    }

    /// Remove one callback, or every callback for `event` when `id` is `None`.
    pub fn unsubscribe(&mut self, event: PlayerEvent, id: Option<SubscriptionId>) {
        self.subscribers
            .retain(|s| s.event != event || id.is_some_and(|id| s.id != id));
    }

    pub fn subscriber_count(&self, event: PlayerEvent) -> usize {
        self.subscribers.iter().filter(|s| s.event == event).count()
    }

    /// Move the subscribers and the id sequence into `next`, a bus that has
    /// handed out no ids yet. Existing ids stay valid on `next`.
    pub(crate) fn hand_over(&mut self, next: &mut EventBus) {
        debug_assert!(next.subscribers.is_empty());
        next.ids = std::mem::take(&mut self.ids);
        next.subscribers = std::mem::take(&mut self.subscribers);
    }

    /// Invoke subscribers in registration order, then queue the event if
    /// the outbox is on.
    pub fn emit(&mut self, event: PlayerEvent) {
        for s in self.subscribers.iter_mut().filter(|s| s.event == event) {
            (s.callback)(event);
        }
        if self.queueing {
            self.outbox.push_back(event);
        }
    }

    /// Next queued event, oldest first.
    pub fn take(&mut self) -> Option<PlayerEvent> {
        self.outbox.pop_front()
    }

    pub fn is_queued(&self, event: PlayerEvent) -> bool {
        self.outbox.contains(&event)
    }

    pub fn clear_outbox(&mut self) {
        self.outbox.clear();
    }
}
