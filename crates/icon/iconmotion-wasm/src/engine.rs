//! Adapter from the engine traits to a lottie-web style `loadAnimation`.

use std::any::Any;

use js_sys::{Array, Function, Object, Reflect};
use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_wasm_bindgen as swb;
use wasm_bindgen::{JsCast, JsValue};

use iconmotion_core::{
    AnimationEngine, Direction, EngineInstance, IconError, LoadConfig, MountSurface, Result,
};
use iconmotion_props::{AccessPath, PathSegment, PropertyStore, PropsError};

/// The container node the engine renders into.
pub struct JsSurface {
    pub container: JsValue,
}

impl MountSurface for JsSurface {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> std::result::Result<JsValue, swb::Error> {
    value.serialize(&swb::Serializer::json_compatible())
}

fn engine_err(e: JsValue) -> IconError {
    IconError::Engine(format!("{e:?}"))
}

fn set(obj: &Object, key: &str, value: &JsValue) -> Result<()> {
    Reflect::set(obj, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(engine_err)
}

/// Calls `loader(params)` and wraps the returned animation object.
pub struct JsEngine {
    loader: Function,
}

impl JsEngine {
    pub fn new(loader: Function) -> Self {
        Self { loader }
    }
}

impl AnimationEngine for JsEngine {
    fn load(&self, config: LoadConfig<'_>) -> Result<Box<dyn EngineInstance>> {
        let container = config
            .surface
            .as_any()
            .downcast_ref::<JsSurface>()
            .map(|s| s.container.clone())
            .unwrap_or(JsValue::UNDEFINED);
        let data = to_js(config.description).map_err(|e| IconError::Engine(e.to_string()))?;

        let settings = Object::new();
        set(
            &settings,
            "preserveAspectRatio",
            &JsValue::from_str(&config.options.aspect_ratio),
        )?;
        let params = Object::new();
        set(&params, "container", &container)?;
        set(
            &params,
            "renderer",
            &JsValue::from_str(config.options.renderer.name()),
        )?;
        set(&params, "loop", &JsValue::from_bool(config.options.loop_playback))?;
        set(&params, "autoplay", &JsValue::from_bool(config.options.autoplay))?;
        set(&params, "animationData", &data)?;
        set(&params, "rendererSettings", &settings)?;

        let anim = self
            .loader
            .call1(&JsValue::UNDEFINED, &params)
            .map_err(engine_err)?;
        if anim.is_undefined() || anim.is_null() {
            return Err(IconError::Engine("loader returned no animation".to_string()));
        }
        Ok(Box::new(JsInstance { anim }))
    }
}

/// One animation object. Its render tree is the property store.
pub struct JsInstance {
    anim: JsValue,
}

impl JsInstance {
    fn get(&self, key: &str) -> JsValue {
        Reflect::get(&self.anim, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
    }

    fn call_on(target: &JsValue, method: &str, args: &[JsValue]) -> Option<JsValue> {
        let f = Reflect::get(target, &JsValue::from_str(method))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;
        let args: Array = args.iter().collect();
        match f.apply(target, &args) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("animation.{method} threw: {e:?}");
                None
            }
        }
    }

    fn call(&self, method: &str, args: &[JsValue]) -> Option<JsValue> {
        Self::call_on(&self.anim, method, args)
    }

    fn node(&self, segments: &[PathSegment]) -> Option<JsValue> {
        segments.iter().try_fold(self.anim.clone(), |node, seg| {
            let next = Reflect::get(&node, &segment_key(seg)).ok()?;
            (!next.is_undefined() && !next.is_null()).then_some(next)
        })
    }
}

fn segment_key(seg: &PathSegment) -> JsValue {
    match seg {
        PathSegment::Key(k) => JsValue::from_str(k),
        PathSegment::Index(i) => JsValue::from_f64(*i as f64),
    }
}

impl EngineInstance for JsInstance {
    fn play(&mut self) {
        self.call("play", &[]);
    }

    fn stop(&mut self) {
        self.call("stop", &[]);
    }

    fn go_to_and_play(&mut self, frame: f64, is_frame: bool) {
        self.call("goToAndPlay", &[frame.into(), is_frame.into()]);
    }

    fn go_to_and_stop(&mut self, frame: f64, is_frame: bool) {
        self.call("goToAndStop", &[frame.into(), is_frame.into()]);
    }

    fn set_direction(&mut self, direction: Direction) {
        self.call("setDirection", &[direction.as_i32().into()]);
    }

    fn set_speed(&mut self, speed: f64) {
        self.call("setSpeed", &[speed.into()]);
    }

    fn set_loop(&mut self, looping: bool) {
        self.call("setLoop", &[looping.into()]);
    }

    fn duration(&self, in_frames: bool) -> f64 {
        self.call("getDuration", &[in_frames.into()])
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn current_frame(&self) -> f64 {
        self.get("currentFrame").as_f64().unwrap_or(0.0)
    }

    fn is_loaded(&self) -> bool {
        self.get("isLoaded").as_bool().unwrap_or(false)
    }

    fn is_paused(&self) -> bool {
        self.get("isPaused").as_bool().unwrap_or(true)
    }

    fn render_current_frame(&mut self) {
        let renderer = self.get("renderer");
        if renderer.is_undefined() || renderer.is_null() {
            return;
        }
        Self::call_on(&renderer, "renderFrame", &[JsValue::NULL]);
    }

    fn destroy(&mut self) {
        self.call("destroy", &[]);
    }

    fn properties(&self) -> &dyn PropertyStore {
        self
    }

    fn properties_mut(&mut self) -> &mut dyn PropertyStore {
        self
    }
}

impl PropertyStore for JsInstance {
    fn read(&self, path: &AccessPath) -> Option<JsonValue> {
        self.node(path.segments())
            .and_then(|v| swb::from_value(v).ok())
    }

    fn write(&mut self, path: &AccessPath, value: JsonValue) -> std::result::Result<(), PropsError> {
        let (last, parents) = path
            .split_last()
            .ok_or_else(|| PropsError::InvalidPath("empty path".to_string()))?;
        let parent = self
            .node(parents)
            .ok_or_else(|| PropsError::PathNotFound(path.to_string()))?;
        let value = to_js(&value).map_err(|e| PropsError::InvalidPath(e.to_string()))?;
        match Reflect::set(&parent, &segment_key(last), &value) {
            Ok(true) => Ok(()),
            _ => Err(PropsError::PathNotFound(path.to_string())),
        }
    }
}
