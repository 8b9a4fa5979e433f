//! Player: engine-independent playback facade.
//!
//! Owns one engine instance (while connected) and the property catalogue of
//! its description. Lifecycle:
//!   Unconnected -> connect() -> Connected(not ready) -> ready -> Connected(ready)
//!   Connected(*) -> disconnect() -> Unconnected
//! Engine notifications come in through [`Player::handle_engine_event`] and
//! are re-emitted as [`PlayerEvent`]s.

use std::fmt;
use std::rc::Rc;

use serde_json::Value as JsonValue;

use iconmotion_props::{
    descriptor::named, palette_of, scan, ColorInput, Palette, PathFlavor, PropertyDescriptor,
    PropertyKind, SCALE, STROKE,
};

use crate::bundle::{self, Point, PropertyBundle};
use crate::config::RenderOptions;
use crate::engine::{AnimationEngine, Direction, EngineEvent, EngineInstance, LoadConfig, MountSurface};
use crate::error::{IconError, Result};
use crate::events::{Callback, EventBus, PlayerEvent};
use crate::ids::SubscriptionId;

pub struct Player {
    engine: Rc<dyn AnimationEngine>,
    surface: Rc<dyn MountSurface>,
    description: JsonValue,
    options: RenderOptions,
    instance: Option<Box<dyn EngineInstance>>,
    ready: bool,
    /// Bound catalogue, computed on first use while connected.
    properties: Option<Vec<PropertyDescriptor>>,
    /// Set by any customization; disables the first-apply fast path.
    customized: bool,
    direction: Direction,
    looping: bool,
    speed: f64,
    events: EventBus,
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("connected", &self.instance.is_some())
            .field("ready", &self.ready)
            .field("direction", &self.direction)
            .field("looping", &self.looping)
            .field("speed", &self.speed)
            .field("events", &self.events)
            .finish()
    }
}

impl Player {
    /// Create an unconnected player. The description is deep-copied so the
    /// caller's (or registry's) original stays untouched.
    pub fn new(
        engine: Rc<dyn AnimationEngine>,
        surface: Rc<dyn MountSurface>,
        description: &JsonValue,
        options: RenderOptions,
    ) -> Self {
        Self {
            engine,
            surface,
            description: description.clone(),
            looping: options.loop_playback,
            options,
            instance: None,
            ready: false,
            properties: None,
            customized: false,
            direction: Direction::Forward,
            speed: 1.0,
            events: EventBus::new(),
        }
    }

    /// Instantiate the engine. Fails if already connected.
    pub fn connect(&mut self) -> Result<()> {
        if self.instance.is_some() {
            return Err(IconError::AlreadyConnected);
        }
        let mut instance = self.engine.load(LoadConfig {
            surface: self.surface.as_ref(),
            description: &self.description,
            options: &self.options,
        })?;
        instance.set_direction(self.direction);
        instance.set_speed(self.speed);
        instance.set_loop(self.looping);
        let loaded = instance.is_loaded();
        self.instance = Some(instance);
        self.ready = false;
        self.customized = false;
        log::debug!("player connected (loaded={loaded})");
        if loaded {
            self.mark_ready();
        }
        Ok(())
    }

    /// Destroy the engine instance and drop cached catalogue state.
    pub fn disconnect(&mut self) -> Result<()> {
        let mut instance = self.instance.take().ok_or(IconError::NotConnected)?;
        instance.destroy();
        self.ready = false;
        self.properties = None;
        self.customized = false;
        self.events.clear_outbox();
        log::debug!("player disconnected");
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.instance.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    fn mark_ready(&mut self) {
        if !self.ready {
            self.ready = true;
            self.events.emit(PlayerEvent::Ready);
        }
    }

    /// Translate a native engine notification into facade events.
    pub fn handle_engine_event(&mut self, event: EngineEvent) -> Result<()> {
        if self.instance.is_none() {
            return Err(IconError::NotConnected);
        }
        match event {
            EngineEvent::ConfigReady => self.mark_ready(),
            EngineEvent::Complete => self.events.emit(PlayerEvent::Complete),
            EngineEvent::EnterFrame => self.events.emit(PlayerEvent::Frame),
        }
        Ok(())
    }

    // ---- events --------------------------------------------------------

    /// Queue emitted events for [`Player::take_event`]. Off by default, so a
    /// standalone player only notifies subscribers.
    pub fn with_queue(mut self) -> Self {
        self.events.set_queueing(true);
        self
    }

    /// Give this player's subscribers to `next`, a player nobody has
    /// subscribed to yet.
    pub(crate) fn hand_over_subscribers(&mut self, next: &mut Player) {
        self.events.hand_over(&mut next.events);
    }

    /// Number of events waiting in the outbox.
    pub fn queued_events(&self) -> usize {
        self.events.queued()
    }

    pub fn subscribe(&mut self, event: PlayerEvent, callback: Callback) -> SubscriptionId {
        self.events.subscribe(event, callback)
    }

    pub fn unsubscribe(&mut self, event: PlayerEvent, id: Option<SubscriptionId>) {
        self.events.unsubscribe(event, id);
    }

    /// Next event queued for the host wiring.
    pub fn take_event(&mut self) -> Option<PlayerEvent> {
        self.events.take()
    }

    /// True if `event` is waiting in the outbox.
    pub fn has_queued(&self, event: PlayerEvent) -> bool {
        self.events.is_queued(event)
    }

    // ---- playback ------------------------------------------------------

    fn instance_mut(&mut self) -> Result<&mut Box<dyn EngineInstance>> {
        self.instance.as_mut().ok_or(IconError::NotConnected)
    }

    fn instance(&self) -> Result<&dyn EngineInstance> {
        self.instance.as_deref().ok_or(IconError::NotConnected)
    }

    pub fn play(&mut self) -> Result<()> {
        self.instance_mut()?.play();
        Ok(())
    }

    /// Seek to frame 0 and play.
    pub fn play_from_beginning(&mut self) -> Result<()> {
        self.instance_mut()?.go_to_and_play(0.0, true);
        Ok(())
    }

    pub fn stop(&mut self) -> Result<()> {
        self.instance_mut()?.stop();
        Ok(())
    }

    pub fn go_to_frame(&mut self, frame: f64) -> Result<()> {
        self.instance_mut()?.go_to_and_stop(frame.max(0.0), true);
        Ok(())
    }

    pub fn go_to_first_frame(&mut self) -> Result<()> {
        self.go_to_frame(0.0)
    }

    /// Seek to the last renderable frame, `max(0, duration - 1)`.
    pub fn go_to_last_frame(&mut self) -> Result<()> {
        let duration = self.instance()?.duration(true);
        self.go_to_frame((duration - 1.0).max(0.0))
    }

    pub fn set_direction(&mut self, direction: Direction) -> Result<()> {
        self.instance_mut()?.set_direction(direction);
        self.direction = direction;
        Ok(())
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_loop(&mut self, looping: bool) -> Result<()> {
        self.instance_mut()?.set_loop(looping);
        self.looping = looping;
        Ok(())
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        self.instance_mut()?.set_speed(speed);
        self.speed = speed;
        Ok(())
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// True while the engine is advancing frames.
    pub fn is_playing(&self) -> bool {
        self.instance
            .as_deref()
            .is_some_and(|i| !i.is_paused())
    }

    pub fn frame(&self) -> Result<f64> {
        Ok(self.instance()?.current_frame())
    }

    /// Duration in frames.
    pub fn duration(&self) -> Result<f64> {
        Ok(self.instance()?.duration(true))
    }

    /// Re-render the current frame and emit `Refresh`.
    pub fn refresh(&mut self) -> Result<()> {
        self.instance_mut()?.render_current_frame();
        self.events.emit(PlayerEvent::Refresh);
        Ok(())
    }

    // ---- customization -------------------------------------------------

    /// The bound property catalogue (computed once per connection).
    pub fn properties(&mut self) -> Result<&[PropertyDescriptor]> {
        if self.instance.is_none() {
            return Err(IconError::NotConnected);
        }
        let description = &self.description;
        Ok(self
            .properties
            .get_or_insert_with(|| scan(description, PathFlavor::Bound))
            .as_slice())
    }

    /// Run a write against the live tree with the catalogue, then refresh.
    fn customize<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut dyn iconmotion_props::PropertyStore, &[PropertyDescriptor], f64) -> Result<()>,
    {
        self.properties()?;
        let scale = self.options.property_scale;
        let (Some(instance), Some(properties)) = (self.instance.as_mut(), self.properties.as_ref())
        else {
            return Err(IconError::NotConnected);
        };
        f(instance.properties_mut(), properties, scale)?;
        self.customized = true;
        self.refresh()
    }

    /// Read from the live tree with the catalogue.
    fn inspect<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn iconmotion_props::PropertyStore, &[PropertyDescriptor], f64) -> T,
    {
        self.properties()?;
        let scale = self.options.property_scale;
        let (Some(instance), Some(properties)) = (self.instance.as_ref(), self.properties.as_ref())
        else {
            return Err(IconError::NotConnected);
        };
        Ok(f(instance.properties(), properties, scale))
    }

    /// Live color of a slot as `#rrggbb`.
    pub fn get_color(&mut self, name: &str) -> Result<Option<String>> {
        let name = name.to_lowercase();
        self.inspect(|store, props, _| {
            named(props, &name)
                .find(|d| d.kind == PropertyKind::Color)
                .and_then(|d| iconmotion_props::mutate::read_color(store, d))
        })
    }

    pub fn set_color(&mut self, name: &str, value: impl Into<ColorInput>) -> Result<()> {
        let value = value.into();
        self.customize(|store, props, _| Ok(bundle::set_color(store, props, name, &value)?))
    }

    /// Restore a slot's default color.
    pub fn delete_color(&mut self, name: &str) -> Result<()> {
        let name = name.to_lowercase();
        self.customize(|store, props, _| {
            Ok(iconmotion_props::reset(
                store,
                named(props, &name).filter(|d| d.kind == PropertyKind::Color),
            )?)
        })
    }

    /// Color slot names, catalogue order, no duplicates.
    pub fn color_names(&mut self) -> Result<Vec<String>> {
        self.inspect(|_, props, _| {
            let mut out: Vec<String> = Vec::new();
            for d in props.iter().filter(|d| d.kind == PropertyKind::Color) {
                if !out.contains(&d.name) {
                    out.push(d.name.clone());
                }
            }
            out
        })
    }

    pub fn palette(&mut self) -> Result<Palette> {
        self.inspect(|store, props, _| palette_of(store, props))
    }

    /// Reset every color, then apply `palette`.
    pub fn set_palette(&mut self, palette: &Palette) -> Result<()> {
        self.customize(|store, props, _| {
            for token in palette.values() {
                iconmotion_props::hex_to_internal(token)?;
            }
            bundle::reset_colors(store, props)?;
            Ok(bundle::set_palette(store, props, palette)?)
        })
    }

    pub fn stroke(&mut self) -> Result<Option<f64>> {
        self.inspect(|store, props, scale| bundle::get_scaled(store, props, STROKE, scale))
    }

    /// `None` restores the default stroke.
    pub fn set_stroke(&mut self, value: Option<f64>) -> Result<()> {
        self.set_scaled(STROKE, value)
    }

    pub fn scale(&mut self) -> Result<Option<f64>> {
        self.inspect(|store, props, scale| bundle::get_scaled(store, props, SCALE, scale))
    }

    pub fn set_scale(&mut self, value: Option<f64>) -> Result<()> {
        self.set_scaled(SCALE, value)
    }

    fn set_scaled(&mut self, name: &str, value: Option<f64>) -> Result<()> {
        self.customize(|store, props, scale| {
            match value {
                Some(v) => bundle::set_scaled(store, props, name, v, scale)?,
                None => bundle::reset_named(store, props, name)?,
            }
            Ok(())
        })
    }

    pub fn axis(&mut self) -> Result<Option<Point>> {
        self.inspect(|store, props, scale| bundle::get_axis(store, props, scale))
    }

    pub fn set_axis(&mut self, value: Option<Point>) -> Result<()> {
        self.customize(|store, props, scale| {
            match value {
                Some(p) => bundle::set_axis(store, props, p, scale)?,
                None => bundle::reset_named(store, props, iconmotion_props::AXIS)?,
            }
            Ok(())
        })
    }

    /// Active state name, if any.
    pub fn state(&mut self) -> Result<Option<String>> {
        self.inspect(|store, props, _| bundle::read_state(store, props))
    }

    /// Activate one state; `None` deactivates all.
    pub fn set_state(&mut self, state: Option<&str>) -> Result<()> {
        self.customize(|store, props, _| Ok(bundle::set_state(store, props, state)?))
    }

    pub fn available_states(&mut self) -> Result<Vec<String>> {
        self.inspect(|_, props, _| bundle::state_names(props))
    }

    /// Apply a bundle (colors, state, stroke, scale, axis).
    ///
    /// The first call on an uncustomized player writes only what the bundle
    /// sets; later calls reset each axis before applying it.
    pub fn reset_properties(&mut self, properties: &PropertyBundle) -> Result<()> {
        let reset_first = self.customized;
        self.customize(|store, props, scale| {
            Ok(bundle::apply(store, props, properties, reset_first, scale)?)
        })
    }
}
