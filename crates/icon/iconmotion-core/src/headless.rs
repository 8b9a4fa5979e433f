//! In-process engine without a renderer.
//!
//! Keeps a frame cursor and a JSON mirror of the engine's effect tree so bound
//! property paths resolve exactly as they do against a live engine. Time only
//! moves when the host calls [`HeadlessHandle::advance`]; the returned events
//! are fed back through the element. Every control call is logged for
//! inspection.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{json, Map, Value as JsonValue};

use iconmotion_props::{AccessPath, PropertyStore, PropsError};

use crate::engine::{AnimationEngine, Direction, EngineEvent, EngineInstance, LoadConfig};
use crate::error::Result;

/// A control call received by a headless instance.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineCall {
    Play,
    Stop,
    GoToAndPlay(f64),
    GoToAndStop(f64),
    SetDirection(Direction),
    SetSpeed(f64),
    SetLoop(bool),
    Render,
    Destroy,
}

#[derive(Debug)]
struct HeadlessState {
    tree: JsonValue,
    total_frames: f64,
    frame_rate: f64,
    frame: f64,
    paused: bool,
    direction: Direction,
    speed: f64,
    looping: bool,
    loaded: bool,
    destroyed: bool,
    calls: Vec<EngineCall>,
}

impl HeadlessState {
    fn last_frame(&self) -> f64 {
        (self.total_frames - 1.0).max(0.0)
    }

    fn seek(&mut self, frame: f64) {
        self.frame = frame.clamp(0.0, self.last_frame());
    }
}

/// Build the `renderer.elements[l].effectsManager.effectElements[e]` mirror
/// from the description's effect values.
fn render_tree(description: &JsonValue) -> JsonValue {
    let layers = description
        .get("layers")
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let elements: Vec<JsonValue> = layers
        .iter()
        .map(|layer| {
            let effects = layer
                .get("ef")
                .and_then(JsonValue::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let effect_elements: Vec<JsonValue> = effects
                .iter()
                .map(|effect| {
                    let value = effect
                        .pointer("/ef/0/v/k")
                        .cloned()
                        .unwrap_or(JsonValue::Null);
                    json!({ "effectElements": [ { "p": { "v": value } } ] })
                })
                .collect();
            let mut element = Map::new();
            element.insert(
                "effectsManager".to_string(),
                json!({ "effectElements": effect_elements }),
            );
            JsonValue::Object(element)
        })
        .collect();
    json!({ "renderer": { "elements": elements } })
}

/// Engine factory. Instances it loads stay reachable through handles.
#[derive(Clone, Debug)]
pub struct HeadlessEngine {
    instances: Rc<RefCell<Vec<Rc<RefCell<HeadlessState>>>>>,
    ready_on_load: bool,
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessEngine {
    /// Instances report loaded immediately.
    pub fn new() -> Self {
        Self {
            instances: Rc::default(),
            ready_on_load: true,
        }
    }

    /// Instances stay unloaded until [`HeadlessHandle::finish_loading`].
    pub fn deferred() -> Self {
        Self {
            instances: Rc::default(),
            ready_on_load: false,
        }
    }

    pub fn instance_count(&self) -> usize {
        self.instances.borrow().len()
    }

    pub fn handle(&self, index: usize) -> Option<HeadlessHandle> {
        self.instances
            .borrow()
            .get(index)
            .cloned()
            .map(HeadlessHandle)
    }

    /// Most recently loaded instance.
    pub fn last(&self) -> Option<HeadlessHandle> {
        self.instances.borrow().last().cloned().map(HeadlessHandle)
    }
}

impl AnimationEngine for HeadlessEngine {
    fn load(&self, config: LoadConfig<'_>) -> Result<Box<dyn EngineInstance>> {
        let description = config.description;
        let number = |key: &str| description.get(key).and_then(JsonValue::as_f64);
        let total_frames = (number("op").unwrap_or(0.0) - number("ip").unwrap_or(0.0)).max(0.0);
        let state = Rc::new(RefCell::new(HeadlessState {
            tree: render_tree(description),
            total_frames,
            frame_rate: number("fr").filter(|fr| *fr > 0.0).unwrap_or(60.0),
            frame: 0.0,
            paused: !config.options.autoplay,
            direction: Direction::Forward,
            speed: 1.0,
            looping: config.options.loop_playback,
            loaded: self.ready_on_load,
            destroyed: false,
            calls: Vec::new(),
        }));
        self.instances.borrow_mut().push(Rc::clone(&state));
        log::trace!("headless instance loaded ({total_frames} frames)");
        Ok(Box::new(HeadlessInstance { state }))
    }
}

/// Test/host view of one loaded instance.
#[derive(Clone, Debug)]
pub struct HeadlessHandle(Rc<RefCell<HeadlessState>>);

impl HeadlessHandle {
    /// Step the timeline `frames` times. Returns an `EnterFrame` per step and
    /// a `Complete` when a non-looping run reaches its end.
    pub fn advance(&self, frames: u32) -> Vec<EngineEvent> {
        let mut s = self.0.borrow_mut();
        let mut events = Vec::new();
        if s.paused || s.destroyed || !s.loaded {
            return events;
        }
        let last = s.last_frame();
        for _ in 0..frames {
            let next = s.frame + f64::from(s.direction.as_i32()) * s.speed;
            events.push(EngineEvent::EnterFrame);
            let past_end = match s.direction {
                Direction::Forward => next >= last,
                Direction::Reverse => next <= 0.0,
            };
            if !past_end {
                s.frame = next;
                continue;
            }
            if s.looping {
                s.frame = match s.direction {
                    Direction::Forward => 0.0,
                    Direction::Reverse => last,
                };
                continue;
            }
            s.frame = match s.direction {
                Direction::Forward => last,
                Direction::Reverse => 0.0,
            };
            s.paused = true;
            events.push(EngineEvent::Complete);
            break;
        }
        events
    }

    /// Finish a deferred load. Returns the event to deliver.
    pub fn finish_loading(&self) -> EngineEvent {
        self.0.borrow_mut().loaded = true;
        EngineEvent::ConfigReady
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.0.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.0.borrow_mut().calls.clear();
    }

    /// How many calls started playback (`play` or `go_to_and_play`).
    pub fn play_count(&self) -> usize {
        self.0
            .borrow()
            .calls
            .iter()
            .filter(|c| matches!(c, EngineCall::Play | EngineCall::GoToAndPlay(_)))
            .count()
    }

    pub fn frame(&self) -> f64 {
        self.0.borrow().frame
    }

    pub fn is_paused(&self) -> bool {
        self.0.borrow().paused
    }

    pub fn direction(&self) -> Direction {
        self.0.borrow().direction
    }

    pub fn is_destroyed(&self) -> bool {
        self.0.borrow().destroyed
    }

    /// Read the live tree at a dotted bound path.
    pub fn read(&self, path: &str) -> Option<JsonValue> {
        let path = AccessPath::parse(path).ok()?;
        self.0.borrow().tree.read(&path)
    }
}

struct HeadlessInstance {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessInstance {
    fn record(&self, call: EngineCall) -> std::cell::RefMut<'_, HeadlessState> {
        let mut s = self.state.borrow_mut();
        s.calls.push(call);
        s
    }
}

impl EngineInstance for HeadlessInstance {
    fn play(&mut self) {
        self.record(EngineCall::Play).paused = false;
    }

    fn stop(&mut self) {
        let mut s = self.record(EngineCall::Stop);
        s.paused = true;
        s.frame = 0.0;
    }

    fn go_to_and_play(&mut self, frame: f64, is_frame: bool) {
        let mut s = self.record(EngineCall::GoToAndPlay(frame));
        let frame = if is_frame { frame } else { frame * s.frame_rate };
        s.seek(frame);
        s.paused = false;
    }

    fn go_to_and_stop(&mut self, frame: f64, is_frame: bool) {
        let mut s = self.record(EngineCall::GoToAndStop(frame));
        let frame = if is_frame { frame } else { frame * s.frame_rate };
        s.seek(frame);
        s.paused = true;
    }

    fn set_direction(&mut self, direction: Direction) {
        self.record(EngineCall::SetDirection(direction)).direction = direction;
    }

    fn set_speed(&mut self, speed: f64) {
        self.record(EngineCall::SetSpeed(speed)).speed = speed;
    }

    fn set_loop(&mut self, looping: bool) {
        self.record(EngineCall::SetLoop(looping)).looping = looping;
    }

    fn duration(&self, in_frames: bool) -> f64 {
        let s = self.state.borrow();
        if in_frames {
            s.total_frames
        } else {
            s.total_frames / s.frame_rate
        }
    }

    fn current_frame(&self) -> f64 {
        self.state.borrow().frame
    }

    fn is_loaded(&self) -> bool {
        self.state.borrow().loaded
    }

    fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    fn render_current_frame(&mut self) {
        self.record(EngineCall::Render);
    }

    fn destroy(&mut self) {
        let mut s = self.record(EngineCall::Destroy);
        s.destroyed = true;
        s.paused = true;
    }

    fn properties(&self) -> &dyn PropertyStore {
        self
    }

    fn properties_mut(&mut self) -> &mut dyn PropertyStore {
        self
    }
}

impl PropertyStore for HeadlessInstance {
    fn read(&self, path: &AccessPath) -> Option<JsonValue> {
        self.state.borrow().tree.read(path)
    }

    fn write(&mut self, path: &AccessPath, value: JsonValue) -> std::result::Result<(), PropsError> {
        self.state.borrow_mut().tree.write(path, value)
    }
}
