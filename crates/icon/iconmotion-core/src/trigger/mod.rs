//! Trigger protocol: pluggable interaction policies driving a [`Player`].
//!
//! A trigger is a plain struct implementing [`Trigger`]; every hook is
//! optional. Hooks never keep references to the player or the host. They get
//! a [`TriggerContext`] for the duration of the call, and everything they
//! register through it (listeners, observers, timers) is recorded so the host
//! wiring can undo it when the trigger is discarded.

use std::rc::Rc;

use crate::error::{IconError, Result};
use crate::host::{Element, EventKind, ListenerLedger, ListenerOptions, ObserverKind, TargetEvent};
use crate::ids::TimerId;
use crate::player::Player;
use crate::timers::{Scheduler, TimerLedger};

mod boomerang;
mod click;
mod hover;
mod in_view;
mod loop_on_hover;
mod looping;
mod morph;
mod sequence;

pub use boomerang::Boomerang;
pub use click::Click;
pub use hover::Hover;
pub use in_view::InView;
pub use loop_on_hover::LoopOnHover;
pub use looping::Loop;
pub use morph::Morph;
pub use sequence::{parse_script, Sequence, Step};

/// Constructs a fresh trigger each time one is installed.
pub type TriggerFactory = Rc<dyn Fn() -> Box<dyn Trigger>>;

/// Lifecycle hooks, invoked by the host wiring.
///
/// `on_connected` runs once after construction and `on_disconnected` once
/// before the trigger is dropped. The rest fire zero or more times in
/// between.
pub trait Trigger {
    fn on_connected(&mut self, _cx: &mut TriggerContext<'_>) -> Result<()> {
        Ok(())
    }

    fn on_disconnected(&mut self, _cx: &mut TriggerContext<'_>) -> Result<()> {
        Ok(())
    }

    fn on_ready(&mut self, _cx: &mut TriggerContext<'_>) -> Result<()> {
        Ok(())
    }

    fn on_complete(&mut self, _cx: &mut TriggerContext<'_>) -> Result<()> {
        Ok(())
    }

    fn on_frame(&mut self, _cx: &mut TriggerContext<'_>) -> Result<()> {
        Ok(())
    }

    fn on_refresh(&mut self, _cx: &mut TriggerContext<'_>) -> Result<()> {
        Ok(())
    }

    /// A target event for a kind this trigger listens to.
    fn on_event(&mut self, _cx: &mut TriggerContext<'_>, _event: &TargetEvent) -> Result<()> {
        Ok(())
    }

    /// One of this trigger's timers came due.
    fn on_timer(&mut self, _cx: &mut TriggerContext<'_>, _id: TimerId) -> Result<()> {
        Ok(())
    }

    fn on_intersection(&mut self, _cx: &mut TriggerContext<'_>, _visible: bool) -> Result<()> {
        Ok(())
    }

    fn on_attribute_changed(&mut self, _cx: &mut TriggerContext<'_>, _name: &str) -> Result<()> {
        Ok(())
    }
}

/// What a trigger may touch during one hook call.
pub struct TriggerContext<'a> {
    pub(crate) player: &'a mut Player,
    pub(crate) host: &'a dyn Element,
    pub(crate) target: &'a dyn Element,
    pub(crate) scheduler: &'a dyn Scheduler,
    pub(crate) timers: &'a mut TimerLedger,
    pub(crate) listeners: &'a mut ListenerLedger,
}

impl<'a> TriggerContext<'a> {
    pub fn player(&mut self) -> &mut Player {
        &mut *self.player
    }

    pub fn is_connected(&self) -> bool {
        self.player.is_connected()
    }

    /// Host attribute value.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.host.attribute(name)
    }

    pub fn listen(&mut self, kind: EventKind, options: ListenerOptions) {
        if self.listeners.add_listener(kind) {
            self.target.add_event_listener(kind, options);
        }
    }

    pub fn unlisten(&mut self, kind: EventKind) {
        if self.listeners.remove_listener(kind) {
            self.target.remove_event_listener(kind);
        }
    }

    pub fn set_timeout(&mut self, delay_ms: u32) -> TimerId {
        self.timers.start(self.scheduler, delay_ms)
    }

    pub fn clear_timeout(&mut self, id: TimerId) {
        self.timers.cancel(self.scheduler, id);
    }

    pub fn observe(&mut self, kind: ObserverKind) {
        if self.listeners.add_observer(kind) {
            observed_node(kind, self.host, self.target).observe(kind);
        }
    }

    pub fn unobserve(&mut self, kind: ObserverKind) {
        if self.listeners.remove_observer(kind) {
            observed_node(kind, self.host, self.target).unobserve(kind);
        }
    }
}

/// Intersection is watched on the target, attribute mutations on the host.
pub(crate) fn observed_node<'e>(
    kind: ObserverKind,
    host: &'e dyn Element,
    target: &'e dyn Element,
) -> &'e dyn Element {
    match kind {
        ObserverKind::Intersection => target,
        ObserverKind::Attributes => host,
    }
}

/// Attribute holding a replay delay in milliseconds.
pub const DELAY_ATTRIBUTE: &str = "delay";

/// Parse a `delay` attribute: absent or blank is 0, otherwise a
/// non-negative integer.
pub fn parse_delay(raw: Option<&str>) -> Result<u32> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(0);
    };
    raw.parse::<u32>().map_err(|_| IconError::InvalidAttribute {
        name: DELAY_ATTRIBUTE.to_string(),
        value: raw.to_string(),
    })
}

/// Read and parse the host's `delay` attribute.
pub(crate) fn delay_from(cx: &TriggerContext<'_>) -> Result<u32> {
    parse_delay(cx.attribute(DELAY_ATTRIBUTE).as_deref())
}

/// Replay from frame 0, after `delay_ms` if positive. Returns the pending
/// timer, if one was started.
pub(crate) fn replay(cx: &mut TriggerContext<'_>, delay_ms: u32) -> Result<Option<TimerId>> {
    if delay_ms > 0 {
        return Ok(Some(cx.set_timeout(delay_ms)));
    }
    cx.player().play_from_beginning()?;
    Ok(None)
}

/// Built-in triggers under their registry names.
pub fn builtins() -> Vec<(&'static str, TriggerFactory)> {
    fn factory<T: Trigger + Default + 'static>() -> TriggerFactory {
        Rc::new(|| Box::new(T::default()) as Box<dyn Trigger>)
    }
    vec![
        ("click", factory::<Click>()),
        ("hover", factory::<Hover>()),
        ("loop", factory::<Loop>()),
        ("loop-on-hover", factory::<LoopOnHover>()),
        ("morph", factory::<Morph>()),
        ("boomerang", factory::<Boomerang>()),
        ("sequence", factory::<Sequence>()),
        ("in", factory::<InView>()),
    ]
}
