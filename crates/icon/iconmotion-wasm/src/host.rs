//! Host bridge: a plain JS object that owns the DOM side.
//!
//! Expected shape:
//! `{ getAttribute(name), listen(kind, passive), unlisten(kind), observe(kind),
//!    unobserve(kind), setTimeout(id, ms), clearTimeout(id) }`.
//! The glue forwards the resulting notifications to the controller.

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use iconmotion_core::{Element, EventKind, ListenerOptions, ObserverKind, Scheduler, TimerId};

pub struct JsHost {
    bridge: JsValue,
}

impl JsHost {
    pub fn new(bridge: JsValue) -> Self {
        Self { bridge }
    }

    fn call(&self, method: &str, args: &[JsValue]) -> Option<JsValue> {
        let Some(f) = Reflect::get(&self.bridge, &JsValue::from_str(method))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
        else {
            log::warn!("host bridge has no '{method}'");
            return None;
        };
        let args: Array = args.iter().collect();
        f.apply(&self.bridge, &args)
            .map_err(|e| log::warn!("host.{method} threw: {e:?}"))
            .ok()
    }
}

fn observer_name(kind: ObserverKind) -> &'static str {
    match kind {
        ObserverKind::Intersection => "intersection",
        ObserverKind::Attributes => "attributes",
    }
}

impl Element for JsHost {
    fn attribute(&self, name: &str) -> Option<String> {
        self.call("getAttribute", &[JsValue::from_str(name)])
            .and_then(|v| v.as_string())
    }

    fn add_event_listener(&self, kind: EventKind, options: ListenerOptions) {
        self.call(
            "listen",
            &[JsValue::from_str(kind.name()), options.passive.into()],
        );
    }

    fn remove_event_listener(&self, kind: EventKind) {
        self.call("unlisten", &[JsValue::from_str(kind.name())]);
    }

    fn observe(&self, kind: ObserverKind) {
        self.call("observe", &[JsValue::from_str(observer_name(kind))]);
    }

    fn unobserve(&self, kind: ObserverKind) {
        self.call("unobserve", &[JsValue::from_str(observer_name(kind))]);
    }
}

impl Scheduler for JsHost {
    fn schedule(&self, id: TimerId, delay_ms: u32) {
        self.call("setTimeout", &[id.0.into(), delay_ms.into()]);
    }

    fn cancel(&self, id: TimerId) {
        self.call("clearTimeout", &[id.0.into()]);
    }
}
