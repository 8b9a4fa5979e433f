//! Narrow contract with the host element and the target it listens on.
//!
//! The host owns attributes; the target receives pointer events and is the
//! node watched for viewport intersection. Both may be the same element.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    PointerDown,
    PointerEnter,
    PointerLeave,
    TouchStart,
}

impl EventKind {
    /// DOM event type name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PointerDown => "pointerdown",
            Self::PointerEnter => "pointerenter",
            Self::PointerLeave => "pointerleave",
            Self::TouchStart => "touchstart",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pointerdown" | "mousedown" => Some(Self::PointerDown),
            "pointerenter" | "mouseenter" => Some(Self::PointerEnter),
            "pointerleave" | "mouseleave" => Some(Self::PointerLeave),
            "touchstart" => Some(Self::TouchStart),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    pub passive: bool,
}

/// An interaction delivered from the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetEvent {
    /// `button` 0 is the primary button.
    PointerDown { button: i16 },
    PointerEnter,
    PointerLeave,
    TouchStart,
}

impl TargetEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PointerDown { .. } => EventKind::PointerDown,
            Self::PointerEnter => EventKind::PointerEnter,
            Self::PointerLeave => EventKind::PointerLeave,
            Self::TouchStart => EventKind::TouchStart,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObserverKind {
    /// Viewport intersection of the target.
    Intersection,
    /// Attribute mutations on the host.
    Attributes,
}

/// A DOM-like node. Implementations forward registrations to the real node
/// and later feed the resulting notifications back through the element.
pub trait Element {
    fn attribute(&self, name: &str) -> Option<String>;
    fn add_event_listener(&self, kind: EventKind, options: ListenerOptions);
    fn remove_event_listener(&self, kind: EventKind);
    fn observe(&self, kind: ObserverKind);
    fn unobserve(&self, kind: ObserverKind);
}

/// Every listener and observer a trigger registered and has not removed.
#[derive(Debug, Default)]
pub struct ListenerLedger {
    listeners: Vec<EventKind>,
    observers: Vec<ObserverKind>,
}

impl ListenerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if `kind` was already registered.
    pub fn add_listener(&mut self, kind: EventKind) -> bool {
        if self.listeners.contains(&kind) {
            return false;
        }
        self.listeners.push(kind);
        true
    }

    pub fn remove_listener(&mut self, kind: EventKind) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|k| *k != kind);
        before != self.listeners.len()
    }

    pub fn has_listener(&self, kind: EventKind) -> bool {
        self.listeners.contains(&kind)
    }

    pub fn add_observer(&mut self, kind: ObserverKind) -> bool {
        if self.observers.contains(&kind) {
            return false;
        }
        self.observers.push(kind);
        true
    }

    pub fn remove_observer(&mut self, kind: ObserverKind) -> bool {
        let before = self.observers.len();
        self.observers.retain(|k| *k != kind);
        before != self.observers.len()
    }

    pub fn has_observer(&self, kind: ObserverKind) -> bool {
        self.observers.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty() && self.observers.is_empty()
    }

    pub fn take_listeners(&mut self) -> Vec<EventKind> {
        std::mem::take(&mut self.listeners)
    }

    pub fn take_observers(&mut self) -> Vec<ObserverKind> {
        std::mem::take(&mut self.observers)
    }
}
