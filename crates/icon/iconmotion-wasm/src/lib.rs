use std::rc::Rc;

use js_sys::Function;
use serde_json::Value as JsonValue;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use iconmotion_core::{
    Direction, EngineEvent, IconContext, IconElement, IconSource, Player, PlayerEvent, Point,
    PropertyBundle, RenderOptions, SubscriptionId, TargetEvent, TimerId,
};
use iconmotion_props::{hex_to_internal, internal_to_hex, normalize_color, parse_palette};

mod engine;
mod host;

pub use engine::{JsEngine, JsInstance, JsSurface};
pub use host::JsHost;

use engine::to_js;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn js_err(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// Icons, triggers and the engine loader shared by every controller created
/// from it.
#[wasm_bindgen]
pub struct IconRegistry {
    context: Rc<IconContext>,
}

impl Default for IconRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl IconRegistry {
    /// A registry with the built-in triggers and no icons.
    #[wasm_bindgen(constructor)]
    pub fn new() -> IconRegistry {
        console_error_panic_hook::set_once();
        IconRegistry {
            context: Rc::new(IconContext::with_builtin_triggers()),
        }
    }

    /// Register a parsed description object under `name`. Last write wins.
    #[wasm_bindgen(js_name = registerIcon)]
    pub fn register_icon(&self, name: String, data: JsValue) -> Result<(), JsError> {
        if jsvalue_is_undefined_or_null(&data) {
            return Err(JsError::new("registerIcon: data is null/undefined"));
        }
        let description: JsonValue = swb::from_value(data)
            .map_err(|e| JsError::new(&format!("registerIcon parse error: {e}")))?;
        self.context.register_icon(&name, description);
        Ok(())
    }

    /// Register a description from JSON text.
    #[wasm_bindgen(js_name = registerIconJson)]
    pub fn register_icon_json(&self, name: String, json: String) -> Result<(), JsError> {
        self.context.register_icon_json(&name, &json).map_err(js_err)
    }

    #[wasm_bindgen(js_name = hasIcon)]
    pub fn has_icon(&self, name: String) -> bool {
        self.context.has_icon(&name)
    }

    #[wasm_bindgen(js_name = hasTrigger)]
    pub fn has_trigger(&self, name: String) -> bool {
        self.context.has_trigger(&name)
    }

    /// Set the engine loader, called as `loader(params) -> animation`.
    #[wasm_bindgen(js_name = setLoader)]
    pub fn set_loader(&self, loader: Function) {
        self.context.set_loader(Rc::new(JsEngine::new(loader)));
    }

    /// A copy of the named description with `properties` baked in.
    #[wasm_bindgen(js_name = prepareDescription)]
    pub fn prepare_description(&self, name: String, properties: JsValue) -> Result<JsValue, JsError> {
        let bundle = parse_bundle(properties)?;
        let description = self
            .context
            .prepare_description(&name, &bundle)
            .map_err(js_err)?;
        to_js(&description).map_err(js_err)
    }
}

fn parse_bundle(value: JsValue) -> Result<PropertyBundle, JsError> {
    if jsvalue_is_undefined_or_null(&value) {
        return Ok(PropertyBundle::default());
    }
    swb::from_value(value).map_err(|e| JsError::new(&format!("properties error: {e}")))
}

fn parse_player_event(name: &str) -> Result<PlayerEvent, JsError> {
    PlayerEvent::from_name(name).ok_or_else(|| JsError::new(&format!("unknown event '{name}'")))
}

/// One icon element: player, trigger and host bridge.
///
/// Event callbacks run synchronously inside controller calls and must not
/// call back into the same controller.
#[wasm_bindgen]
pub struct IconController {
    element: IconElement,
}

impl IconController {
    fn player(&mut self) -> Result<&mut Player, JsError> {
        self.element.require_player().map_err(js_err)
    }
}

#[wasm_bindgen]
impl IconController {
    /// `host` is the bridge object (see [`JsHost`]); `target`, when given,
    /// receives listeners instead of the host. `options` is optional
    /// [`RenderOptions`] JSON.
    #[wasm_bindgen(constructor)]
    pub fn new(
        registry: &IconRegistry,
        host: JsValue,
        container: JsValue,
        target: JsValue,
        options: JsValue,
    ) -> Result<IconController, JsError> {
        console_error_panic_hook::set_once();
        let options: RenderOptions = if jsvalue_is_undefined_or_null(&options) {
            RenderOptions::default()
        } else {
            swb::from_value(options).map_err(|e| JsError::new(&format!("options error: {e}")))?
        };
        let host = Rc::new(JsHost::new(host));
        let mut element = IconElement::new(
            Rc::clone(&registry.context),
            host.clone(),
            Rc::new(JsSurface { container }),
            host,
        )
        .with_options(options);
        if !jsvalue_is_undefined_or_null(&target) {
            element = element.with_target(Rc::new(JsHost::new(target)));
        }
        Ok(IconController { element })
    }

    // ---- lifecycle -----------------------------------------------------

    /// Load a registered icon by name.
    pub fn load(&mut self, name: String) -> Result<(), JsError> {
        self.element.load(IconSource::Named(name)).map_err(js_err)
    }

    /// Load a description object directly.
    #[wasm_bindgen(js_name = loadData)]
    pub fn load_data(&mut self, data: JsValue) -> Result<(), JsError> {
        let description: JsonValue = swb::from_value(data)
            .map_err(|e| JsError::new(&format!("loadData parse error: {e}")))?;
        self.element
            .load(IconSource::Inline(Rc::new(description)))
            .map_err(js_err)
    }

    pub fn unload(&mut self) -> Result<(), JsError> {
        self.element.unload().map_err(js_err)
    }

    pub fn connect(&mut self) -> Result<(), JsError> {
        self.element.connect().map_err(js_err)
    }

    pub fn disconnect(&mut self) -> Result<(), JsError> {
        self.element.disconnect().map_err(js_err)
    }

    #[wasm_bindgen(getter)]
    pub fn connected(&self) -> bool {
        self.element.is_connected()
    }

    /// Select a trigger by name; `null` removes it.
    #[wasm_bindgen(js_name = setTrigger)]
    pub fn set_trigger(&mut self, name: Option<String>) -> Result<(), JsError> {
        self.element.set_trigger(name.as_deref()).map_err(js_err)
    }

    #[wasm_bindgen(getter)]
    pub fn trigger(&self) -> Option<String> {
        self.element.trigger_name().map(str::to_string)
    }

    #[wasm_bindgen(js_name = setProperties)]
    pub fn set_properties(&mut self, properties: JsValue) -> Result<(), JsError> {
        let bundle = parse_bundle(properties)?;
        self.element.set_properties(bundle).map_err(js_err)
    }

    // ---- notifications -------------------------------------------------

    /// Forward an engine event by its native name. Unknown names are ignored.
    #[wasm_bindgen(js_name = engineEvent)]
    pub fn engine_event(&mut self, name: &str) -> Result<(), JsError> {
        match EngineEvent::from_name(name) {
            Some(event) => self.element.handle_engine_event(event).map_err(js_err),
            None => Ok(()),
        }
    }

    /// Forward a target event (`pointerdown`, `pointerenter`, `pointerleave`,
    /// `touchstart`). `button` only matters for pointer-down.
    pub fn dispatch(&mut self, kind: &str, button: Option<i16>) -> Result<(), JsError> {
        let event = match kind {
            "pointerdown" | "mousedown" => TargetEvent::PointerDown {
                button: button.unwrap_or(0),
            },
            "pointerenter" | "mouseenter" => TargetEvent::PointerEnter,
            "pointerleave" | "mouseleave" => TargetEvent::PointerLeave,
            "touchstart" => TargetEvent::TouchStart,
            other => return Err(JsError::new(&format!("unknown target event '{other}'"))),
        };
        self.element.dispatch(event).map_err(js_err)
    }

    /// Deliver a fired timer. Returns false for stale ids.
    #[wasm_bindgen(js_name = fireTimer)]
    pub fn fire_timer(&mut self, id: u32) -> Result<bool, JsError> {
        self.element.fire_timer(TimerId(id)).map_err(js_err)
    }

    pub fn intersection(&mut self, visible: bool) -> Result<(), JsError> {
        self.element.intersection(visible).map_err(js_err)
    }

    #[wasm_bindgen(js_name = attributeChanged)]
    pub fn attribute_changed(&mut self, name: String) -> Result<(), JsError> {
        self.element.attribute_changed(&name).map_err(js_err)
    }

    /// Subscribe `callback(eventName)` to a player event. Returns the id.
    /// Subscriptions carry over `load`/`loadData`; `unload` drops them.
    pub fn on(&mut self, event: &str, callback: Function) -> Result<u32, JsError> {
        let event = parse_player_event(event)?;
        let id = self.player()?.subscribe(
            event,
            Box::new(move |e: PlayerEvent| {
                if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(e.name())) {
                    log::warn!("'{}' callback threw: {err:?}", e.name());
                }
            }),
        );
        Ok(id.0)
    }

    /// Remove one subscription, or all for the event when `id` is omitted.
    pub fn off(&mut self, event: &str, id: Option<u32>) -> Result<(), JsError> {
        let event = parse_player_event(event)?;
        self.player()?.unsubscribe(event, id.map(SubscriptionId));
        Ok(())
    }

    // ---- playback ------------------------------------------------------

    pub fn play(&mut self) -> Result<(), JsError> {
        self.player()?.play().map_err(js_err)
    }

    #[wasm_bindgen(js_name = playFromBeginning)]
    pub fn play_from_beginning(&mut self) -> Result<(), JsError> {
        self.player()?.play_from_beginning().map_err(js_err)
    }

    pub fn stop(&mut self) -> Result<(), JsError> {
        self.player()?.stop().map_err(js_err)
    }

    #[wasm_bindgen(js_name = goToFrame)]
    pub fn go_to_frame(&mut self, frame: f64) -> Result<(), JsError> {
        self.player()?.go_to_frame(frame).map_err(js_err)
    }

    #[wasm_bindgen(js_name = goToFirstFrame)]
    pub fn go_to_first_frame(&mut self) -> Result<(), JsError> {
        self.player()?.go_to_first_frame().map_err(js_err)
    }

    #[wasm_bindgen(js_name = goToLastFrame)]
    pub fn go_to_last_frame(&mut self) -> Result<(), JsError> {
        self.player()?.go_to_last_frame().map_err(js_err)
    }

    /// `1` forward, `-1` reverse.
    #[wasm_bindgen(js_name = setDirection)]
    pub fn set_direction(&mut self, direction: i32) -> Result<(), JsError> {
        self.player()?
            .set_direction(Direction::from_sign(direction))
            .map_err(js_err)
    }

    pub fn direction(&mut self) -> Result<i32, JsError> {
        Ok(self.player()?.direction().as_i32())
    }

    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&mut self, speed: f64) -> Result<(), JsError> {
        self.player()?.set_speed(speed).map_err(js_err)
    }

    #[wasm_bindgen(js_name = setLoop)]
    pub fn set_loop(&mut self, looping: bool) -> Result<(), JsError> {
        self.player()?.set_loop(looping).map_err(js_err)
    }

    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.element.player().is_some_and(Player::is_playing)
    }

    #[wasm_bindgen(js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.element.player().is_some_and(Player::is_ready)
    }

    pub fn frame(&mut self) -> Result<f64, JsError> {
        self.player()?.frame().map_err(js_err)
    }

    pub fn duration(&mut self) -> Result<f64, JsError> {
        self.player()?.duration().map_err(js_err)
    }

    pub fn refresh(&mut self) -> Result<(), JsError> {
        self.player()?.refresh().map_err(js_err)
    }

    // ---- customization -------------------------------------------------

    /// Discovered property descriptors.
    pub fn properties(&mut self) -> Result<JsValue, JsError> {
        let descriptors = self.player()?.properties().map_err(js_err)?;
        to_js(descriptors).map_err(js_err)
    }

    #[wasm_bindgen(js_name = getColor)]
    pub fn get_color(&mut self, name: String) -> Result<Option<String>, JsError> {
        self.player()?.get_color(&name).map_err(js_err)
    }

    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&mut self, name: String, value: String) -> Result<(), JsError> {
        self.player()?.set_color(&name, value).map_err(js_err)
    }

    #[wasm_bindgen(js_name = deleteColor)]
    pub fn delete_color(&mut self, name: String) -> Result<(), JsError> {
        self.player()?.delete_color(&name).map_err(js_err)
    }

    /// Current palette as `{ name: "#rrggbb" }`.
    pub fn colors(&mut self) -> Result<JsValue, JsError> {
        let palette = self.player()?.palette().map_err(js_err)?;
        to_js(&palette).map_err(js_err)
    }

    /// Apply a `name:value,...` color attribute.
    #[wasm_bindgen(js_name = setPalette)]
    pub fn set_palette(&mut self, attr: &str) -> Result<(), JsError> {
        let palette = parse_palette(attr).map_err(js_err)?;
        self.player()?.set_palette(&palette).map_err(js_err)
    }

    pub fn stroke(&mut self) -> Result<Option<f64>, JsError> {
        self.player()?.stroke().map_err(js_err)
    }

    #[wasm_bindgen(js_name = setStroke)]
    pub fn set_stroke(&mut self, value: Option<f64>) -> Result<(), JsError> {
        self.player()?.set_stroke(value).map_err(js_err)
    }

    pub fn scale(&mut self) -> Result<Option<f64>, JsError> {
        self.player()?.scale().map_err(js_err)
    }

    #[wasm_bindgen(js_name = setScale)]
    pub fn set_scale(&mut self, value: Option<f64>) -> Result<(), JsError> {
        self.player()?.set_scale(value).map_err(js_err)
    }

    /// `{ x, y }` or `null`.
    pub fn axis(&mut self) -> Result<JsValue, JsError> {
        let axis = self.player()?.axis().map_err(js_err)?;
        to_js(&axis).map_err(js_err)
    }

    /// Both coordinates or neither; a missing one restores the default.
    #[wasm_bindgen(js_name = setAxis)]
    pub fn set_axis(&mut self, x: Option<f64>, y: Option<f64>) -> Result<(), JsError> {
        let point = x.zip(y).map(|(x, y)| Point { x, y });
        self.player()?.set_axis(point).map_err(js_err)
    }

    pub fn state(&mut self) -> Result<Option<String>, JsError> {
        self.player()?.state().map_err(js_err)
    }

    #[wasm_bindgen(js_name = setState)]
    pub fn set_state(&mut self, state: Option<String>) -> Result<(), JsError> {
        self.player()?.set_state(state.as_deref()).map_err(js_err)
    }

    #[wasm_bindgen(js_name = availableStates)]
    pub fn available_states(&mut self) -> Result<Vec<String>, JsError> {
        self.player()?.available_states().map_err(js_err)
    }
}

/// `#rgb`, `#rrggbb` or a CSS color name to the engine's float triple.
#[wasm_bindgen(js_name = hexToInternal)]
pub fn hex_to_internal_js(hex: &str) -> Result<Vec<f64>, JsError> {
    hex_to_internal(hex).map(|c| c.to_vec()).map_err(js_err)
}

#[wasm_bindgen(js_name = internalToHex)]
pub fn internal_to_hex_js(color: Vec<f64>) -> String {
    internal_to_hex(&color)
}

#[wasm_bindgen(js_name = normalizeColor)]
pub fn normalize_color_js(token: &str) -> Result<String, JsError> {
    normalize_color(token).map_err(js_err)
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
