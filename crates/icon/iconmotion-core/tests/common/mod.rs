#![allow(dead_code)]

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use iconmotion_core::{
    Element, EventKind, HeadlessEngine, HeadlessHandle, IconContext, IconElement, IconSource,
    ListenerOptions, ManualScheduler, MountSurface, ObserverKind, Player, RenderOptions,
};
use iconmotion_test_fixtures::icons;

/// Records every registration so tests can assert on cleanup.
#[derive(Default)]
pub struct FakeElement {
    attributes: RefCell<HashMap<String, String>>,
    listeners: RefCell<Vec<(EventKind, ListenerOptions)>>,
    observers: RefCell<Vec<ObserverKind>>,
}

impl FakeElement {
    pub fn with_attributes(attrs: &[(&str, &str)]) -> Rc<Self> {
        let el = Self::default();
        for (k, v) in attrs {
            el.set_attribute(k, v);
        }
        Rc::new(el)
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    pub fn listeners(&self) -> Vec<EventKind> {
        self.listeners.borrow().iter().map(|(k, _)| *k).collect()
    }

    pub fn options(&self, kind: EventKind) -> Option<ListenerOptions> {
        self.listeners
            .borrow()
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, o)| *o)
    }

    pub fn observers(&self) -> Vec<ObserverKind> {
        self.observers.borrow().clone()
    }
}

impl Element for FakeElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    fn add_event_listener(&self, kind: EventKind, options: ListenerOptions) {
        self.listeners.borrow_mut().push((kind, options));
    }

    fn remove_event_listener(&self, kind: EventKind) {
        self.listeners.borrow_mut().retain(|(k, _)| *k != kind);
    }

    fn observe(&self, kind: ObserverKind) {
        self.observers.borrow_mut().push(kind);
    }

    fn unobserve(&self, kind: ObserverKind) {
        self.observers.borrow_mut().retain(|k| *k != kind);
    }
}

pub struct Surface;

impl MountSurface for Surface {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn context_with(engine: &HeadlessEngine) -> Rc<IconContext> {
    let cx = IconContext::with_builtin_triggers();
    for name in icons::keys() {
        cx.register_icon(&name, icons::value(&name).expect("fixture"));
    }
    cx.set_loader(Rc::new(engine.clone()));
    Rc::new(cx)
}

/// A standalone connected player over a fixture icon.
pub fn connected_player(engine: &HeadlessEngine, icon: &str) -> Player {
    let description = icons::value(icon).expect("fixture");
    let mut player = Player::new(
        Rc::new(engine.clone()),
        Rc::new(Surface),
        &description,
        RenderOptions::default(),
    )
    .with_queue();
    player.connect().expect("connect");
    player
}

/// Element, engine, scheduler and host wired together.
pub struct Rig {
    pub engine: HeadlessEngine,
    pub scheduler: Rc<ManualScheduler>,
    pub context: Rc<IconContext>,
    pub host: Rc<FakeElement>,
    pub element: IconElement,
}

impl Rig {
    pub fn new(icon: &str, trigger: Option<&str>, attrs: &[(&str, &str)]) -> Self {
        Self::with_engine(HeadlessEngine::new(), icon, trigger, attrs)
    }

    pub fn with_engine(
        engine: HeadlessEngine,
        icon: &str,
        trigger: Option<&str>,
        attrs: &[(&str, &str)],
    ) -> Self {
        let scheduler = Rc::new(ManualScheduler::new());
        let context = context_with(&engine);
        let host = FakeElement::with_attributes(attrs);
        let mut element = IconElement::new(
            Rc::clone(&context),
            host.clone(),
            Rc::new(Surface),
            scheduler.clone(),
        );
        element.load(IconSource::Named(icon.to_string())).expect("load");
        element.set_trigger(trigger).expect("trigger");
        element.connect().expect("connect");
        Self {
            engine,
            scheduler,
            context,
            host,
            element,
        }
    }

    pub fn handle(&self) -> HeadlessHandle {
        self.engine.last().expect("engine instance")
    }

    /// Step the engine and deliver its events.
    pub fn advance(&mut self, frames: u32) {
        for event in self.handle().advance(frames) {
            self.element.handle_engine_event(event).expect("engine event");
        }
    }

    /// Move the virtual clock and fire due timers.
    pub fn tick(&mut self, ms: u64) {
        for id in self.scheduler.advance(ms) {
            self.element.fire_timer(id).expect("timer");
        }
    }

    pub fn plays(&self) -> usize {
        self.handle().play_count()
    }
}
