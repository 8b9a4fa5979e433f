//! Host wiring: one player, at most one live trigger, and the ledgers that
//! keep the trigger's side effects undoable.
//!
//! The element is engine- and DOM-agnostic. A host (browser glue, headless
//! driver, test) forwards engine events, target events, fired timers,
//! intersection changes and attribute mutations; the element routes each to
//! the player and the trigger and drains the player's event outbox into
//! trigger hooks.

use std::fmt;
use std::rc::Rc;

use serde_json::Value as JsonValue;

use crate::bundle::PropertyBundle;
use crate::config::RenderOptions;
use crate::context::IconContext;
use crate::engine::{EngineEvent, MountSurface};
use crate::error::{IconError, Result};
use crate::events::PlayerEvent;
use crate::host::{Element, ListenerLedger, ObserverKind, TargetEvent};
use crate::ids::TimerId;
use crate::player::Player;
use crate::timers::{Scheduler, TimerLedger};
use crate::trigger::{observed_node, Trigger, TriggerContext};

/// Where a description comes from.
#[derive(Clone, Debug)]
pub enum IconSource {
    /// Registered in the context under this name.
    Named(String),
    /// Supplied directly.
    Inline(Rc<JsonValue>),
}

pub struct IconElement {
    context: Rc<IconContext>,
    host: Rc<dyn Element>,
    target: Rc<dyn Element>,
    surface: Rc<dyn MountSurface>,
    scheduler: Rc<dyn Scheduler>,
    options: RenderOptions,
    connected: bool,
    player: Option<Player>,
    trigger_name: Option<String>,
    trigger: Option<Box<dyn Trigger>>,
    timers: TimerLedger,
    listeners: ListenerLedger,
    pending: PropertyBundle,
}

impl fmt::Debug for IconElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconElement")
            .field("connected", &self.connected)
            .field("player", &self.player)
            .field("trigger", &self.trigger_name)
            .field("timers", &self.timers)
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl IconElement {
    /// The host is also the target until [`IconElement::with_target`].
    pub fn new(
        context: Rc<IconContext>,
        host: Rc<dyn Element>,
        surface: Rc<dyn MountSurface>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self {
            context,
            target: Rc::clone(&host),
            host,
            surface,
            scheduler,
            options: RenderOptions::default(),
            connected: false,
            player: None,
            trigger_name: None,
            trigger: None,
            timers: TimerLedger::new(),
            listeners: ListenerLedger::new(),
            pending: PropertyBundle::default(),
        }
    }

    pub fn with_target(mut self, target: Rc<dyn Element>) -> Self {
        self.target = target;
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    /// The player, or `NoPlayer` before an icon is loaded.
    pub fn require_player(&mut self) -> Result<&mut Player> {
        self.player.as_mut().ok_or(IconError::NoPlayer)
    }

    pub fn trigger_name(&self) -> Option<&str> {
        self.trigger_name.as_deref()
    }

    pub fn has_live_trigger(&self) -> bool {
        self.trigger.is_some()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn properties(&self) -> &PropertyBundle {
        &self.pending
    }

    // ---- lifecycle -----------------------------------------------------

    /// Replace the description. Any previous player is torn down first; when
    /// connected, the new one is connected right away. Subscribers of the
    /// previous player carry over.
    pub fn load(&mut self, source: IconSource) -> Result<()> {
        let description = match source {
            IconSource::Named(name) => self.context.icon(&name)?,
            IconSource::Inline(description) => description,
        };
        let engine = self.context.loader()?;
        let mut player = Player::new(
            engine,
            Rc::clone(&self.surface),
            &description,
            self.options.clone(),
        )
        .with_queue();
        if let Some(old) = self.player.as_mut() {
            old.hand_over_subscribers(&mut player);
        }
        self.teardown()?;
        self.player = Some(player);
        if self.connected {
            self.start_or_rollback()?;
        }
        Ok(())
    }

    /// Drop the player (and its trigger) without loading another.
    pub fn unload(&mut self) -> Result<()> {
        self.teardown()
    }

    pub fn connect(&mut self) -> Result<()> {
        if self.connected {
            return Err(IconError::AlreadyConnected);
        }
        self.connected = true;
        if self.player.is_some() {
            self.start_or_rollback()?;
        }
        Ok(())
    }

    pub fn disconnect(&mut self) -> Result<()> {
        if !self.connected {
            return Err(IconError::NotConnected);
        }
        self.connected = false;
        self.stop_player()
    }

    /// Connect the player, install the trigger and deliver queued events.
    fn start(&mut self) -> Result<()> {
        if let Some(player) = self.player.as_mut() {
            player.connect()?;
        }
        self.install_trigger()?;
        self.pump()
    }

    /// Start, or leave the element disconnected with the engine destroyed.
    fn start_or_rollback(&mut self) -> Result<()> {
        let Err(err) = self.start() else {
            return Ok(());
        };
        if let Err(e) = self.stop_player() {
            log::warn!("rollback after failed start: {e}");
        }
        self.connected = false;
        Err(err)
    }

    fn stop_player(&mut self) -> Result<()> {
        let result = self.uninstall_trigger();
        if let Some(player) = self.player.as_mut() {
            if player.is_connected() {
                player.disconnect()?;
            }
        }
        result
    }

    fn teardown(&mut self) -> Result<()> {
        let result = self.stop_player();
        self.player = None;
        result
    }

    // ---- trigger -------------------------------------------------------

    /// Select a trigger by registry name (`None` removes it). The name is
    /// validated immediately; the live instance is swapped when connected.
    pub fn set_trigger(&mut self, name: Option<&str>) -> Result<()> {
        if let Some(name) = name {
            if !self.context.has_trigger(name) {
                return Err(IconError::UnregisteredTrigger(name.to_string()));
            }
        }
        self.uninstall_trigger()?;
        self.trigger_name = name.map(str::to_string);
        self.install_trigger()?;
        self.pump()
    }

    fn install_trigger(&mut self) -> Result<()> {
        let Some(name) = self.trigger_name.clone() else {
            return Ok(());
        };
        let ready = match self.player.as_ref() {
            Some(player) if self.connected && player.is_connected() => player.is_ready(),
            _ => return Ok(()),
        };
        self.trigger = Some(self.context.trigger(&name)?);
        log::debug!("trigger '{name}' installed");
        if let Err(err) = self.with_trigger(|t, cx| t.on_connected(cx)) {
            log::warn!("trigger '{name}' failed to connect: {err}");
            self.trigger = None;
            self.cleanup();
            return Err(err);
        }
        // A player that was already ready does not emit Ready again.
        if ready && !self.ready_queued() {
            self.with_trigger(|t, cx| t.on_ready(cx))?;
        }
        Ok(())
    }

    fn ready_queued(&self) -> bool {
        self.player
            .as_ref()
            .is_some_and(|p| p.has_queued(PlayerEvent::Ready))
    }

    fn uninstall_trigger(&mut self) -> Result<()> {
        if self.trigger.is_none() {
            return Ok(());
        }
        let result = self.with_trigger(|t, cx| t.on_disconnected(cx));
        self.trigger = None;
        self.cleanup();
        log::debug!("trigger '{}' removed", self.trigger_name.as_deref().unwrap_or(""));
        result
    }

    /// Undo whatever the trigger left registered.
    fn cleanup(&mut self) {
        let timers = self.timers.clear_all(self.scheduler.as_ref());
        let listeners = self.listeners.take_listeners();
        let observers = self.listeners.take_observers();
        if timers + listeners.len() + observers.len() > 0 {
            log::debug!(
                "cleanup: {timers} timer(s), {} listener(s), {} observer(s)",
                listeners.len(),
                observers.len()
            );
        }
        for kind in listeners {
            self.target.remove_event_listener(kind);
        }
        for kind in observers {
            observed_node(kind, self.host.as_ref(), self.target.as_ref()).unobserve(kind);
        }
    }

    fn with_trigger<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut dyn Trigger, &mut TriggerContext<'_>) -> Result<()>,
    {
        let (Some(trigger), Some(player)) = (self.trigger.as_mut(), self.player.as_mut()) else {
            return Ok(());
        };
        let mut cx = TriggerContext {
            player,
            host: self.host.as_ref(),
            target: self.target.as_ref(),
            scheduler: self.scheduler.as_ref(),
            timers: &mut self.timers,
            listeners: &mut self.listeners,
        };
        f(trigger.as_mut(), &mut cx)
    }

    // ---- properties ----------------------------------------------------

    /// Replace the declarative property set. Applied immediately when the
    /// player is ready, otherwise on ready.
    pub fn set_properties(&mut self, properties: PropertyBundle) -> Result<()> {
        self.pending = properties;
        match self.player.as_mut() {
            Some(player) if player.is_ready() => {
                player.reset_properties(&self.pending)?;
                self.pump()
            }
            _ => Ok(()),
        }
    }

    // ---- notifications -------------------------------------------------

    /// Late engine events for a player that is gone or disconnected are
    /// dropped.
    pub fn handle_engine_event(&mut self, event: EngineEvent) -> Result<()> {
        match self.player.as_mut() {
            Some(player) if player.is_connected() => player.handle_engine_event(event)?,
            _ => {
                log::trace!("ignoring engine event {event:?} without a connected player");
                return Ok(());
            }
        }
        self.pump()
    }

    /// Deliver a target event. Kinds nobody listens to are dropped.
    pub fn dispatch(&mut self, event: TargetEvent) -> Result<()> {
        if !self.listeners.has_listener(event.kind()) {
            return Ok(());
        }
        self.with_trigger(|t, cx| t.on_event(cx, &event))?;
        self.pump()
    }

    /// Deliver a fired timer. Returns false if it was not pending here.
    pub fn fire_timer(&mut self, id: TimerId) -> Result<bool> {
        if !self.timers.fire(id) {
            log::trace!("ignoring stale timer {id:?}");
            return Ok(false);
        }
        self.with_trigger(|t, cx| t.on_timer(cx, id))?;
        self.pump()?;
        Ok(true)
    }

    pub fn intersection(&mut self, visible: bool) -> Result<()> {
        if !self.listeners.has_observer(ObserverKind::Intersection) {
            return Ok(());
        }
        self.with_trigger(|t, cx| t.on_intersection(cx, visible))?;
        self.pump()
    }

    pub fn attribute_changed(&mut self, name: &str) -> Result<()> {
        if !self.listeners.has_observer(ObserverKind::Attributes) {
            return Ok(());
        }
        self.with_trigger(|t, cx| t.on_attribute_changed(cx, name))?;
        self.pump()
    }

    /// Drain player events into trigger hooks, in emission order. Hooks may
    /// queue further events; those are delivered in the same call.
    fn pump(&mut self) -> Result<()> {
        while let Some(event) = self.player.as_mut().and_then(Player::take_event) {
            if event == PlayerEvent::Ready && !self.pending.is_empty() {
                if let Some(player) = self.player.as_mut() {
                    player.reset_properties(&self.pending)?;
                }
            }
            let delivered = self.with_trigger(|t, cx| match event {
                PlayerEvent::Ready => t.on_ready(cx),
                PlayerEvent::Complete => t.on_complete(cx),
                PlayerEvent::Frame => t.on_frame(cx),
                PlayerEvent::Refresh => t.on_refresh(cx),
            });
            if let Err(err) = delivered {
                log::warn!("trigger hook for '{}' failed: {err}", event.name());
                return Err(err);
            }
        }
        Ok(())
    }
}
