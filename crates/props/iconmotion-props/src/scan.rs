//! Property scanner: discovers customizable effect controls.
//!
//! A layer qualifies when its display name contains "change"
//! (case-insensitive) and it carries an effects list. Each recognized effect
//! control becomes one descriptor; output order is layer order, then effect
//! order. Callers locate "the stroke descriptor" or "the Nth state"
//! positionally, so the order is part of the contract.

use serde_json::Value as JsonValue;

use crate::descriptor::{PropertyDescriptor, PropertyKind, PropertyValue, STATE_PREFIX};
use crate::path::{AccessPath, PathFlavor, PathSegment};
use crate::store::lookup;

/// Scan a description and build its property catalogue.
pub fn scan(description: &JsonValue, flavor: PathFlavor) -> Vec<PropertyDescriptor> {
    let mut out = Vec::new();
    let layers = match description.get("layers").and_then(JsonValue::as_array) {
        Some(l) => l,
        None => return out,
    };
    // The value slot, relative to an effect node.
    let value_slot = AccessPath::new(vec![
        PathSegment::Key("ef".into()),
        PathSegment::Index(0),
        PathSegment::Key("v".into()),
        PathSegment::Key("k".into()),
    ]);

    for (layer_idx, layer) in layers.iter().enumerate() {
        let layer_name = layer.get("nm").and_then(JsonValue::as_str).unwrap_or("");
        if !layer_name.to_lowercase().contains("change") {
            continue;
        }
        let effects = match layer.get("ef").and_then(JsonValue::as_array) {
            Some(e) => e,
            None => continue,
        };

        for (effect_idx, effect) in effects.iter().enumerate() {
            let tag = effect.get("mn").and_then(JsonValue::as_str).unwrap_or("");
            let Some(mut kind) = PropertyKind::from_control_tag(tag) else {
                log::trace!("layer {layer_idx} effect {effect_idx}: skipping control '{tag}'");
                continue;
            };
            let name = effect
                .get("nm")
                .and_then(JsonValue::as_str)
                .unwrap_or("")
                .to_lowercase();
            let Some(default_value) = lookup(effect, &value_slot).and_then(PropertyValue::from_json)
            else {
                log::trace!("layer {layer_idx} effect {effect_idx} ('{name}'): no static value");
                continue;
            };
            if kind.is_scalar() && name.starts_with(STATE_PREFIX) {
                kind = PropertyKind::State;
            }
            out.push(PropertyDescriptor {
                name,
                path: AccessPath::effect_value(flavor, layer_idx, effect_idx),
                default_value,
                kind,
            });
        }
    }
    out
}
