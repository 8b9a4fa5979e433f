//! Declarative property sets and the per-axis writes that realize them.
//!
//! The helpers here work against any [`PropertyStore`] so the same code bakes
//! a bundle into a raw description (static paths) and into a live engine
//! (bound paths). Axis order is fixed: colors, state, stroke, scale, axis.

use serde::{Deserialize, Serialize};

use iconmotion_props::{
    descriptor::{named, of_kind},
    hex_to_internal,
    mutate::{self, read, read_scaled, read_scaled_point},
    ColorInput, Palette, PropertyDescriptor, PropertyInput, PropertyKind, PropertyStore,
    PropsError, AXIS, SCALE, STATE_PREFIX, STROKE,
};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Customization applied in one go (e.g. from element attributes).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyBundle {
    pub colors: Option<Palette>,
    pub state: Option<String>,
    pub stroke: Option<f64>,
    pub scale: Option<f64>,
    pub axis: Option<Point>,
}

impl PropertyBundle {
    pub fn is_empty(&self) -> bool {
        self.colors.is_none()
            && self.state.is_none()
            && self.stroke.is_none()
            && self.scale.is_none()
            && self.axis.is_none()
    }
}

/// Write one color slot. Unknown slots are a no-op.
pub fn set_color(
    store: &mut dyn PropertyStore,
    descriptors: &[PropertyDescriptor],
    name: &str,
    value: &ColorInput,
) -> Result<(), PropsError> {
    let name = name.to_lowercase();
    let targets = named(descriptors, &name).filter(|d| d.kind == PropertyKind::Color);
    mutate::update(store, targets, &PropertyInput::Color(value.clone()), None)
}

/// Write a whole palette. Every token is validated before the first write.
pub fn set_palette(
    store: &mut dyn PropertyStore,
    descriptors: &[PropertyDescriptor],
    palette: &Palette,
) -> Result<(), PropsError> {
    let resolved = palette
        .iter()
        .map(|(name, token)| Ok((name.to_lowercase(), hex_to_internal(token)?)))
        .collect::<Result<Vec<_>, PropsError>>()?;
    for (name, color) in resolved {
        let input = ColorInput::Internal(color.to_vec());
        set_color(store, descriptors, &name, &input)?;
    }
    Ok(())
}

pub fn reset_colors(
    store: &mut dyn PropertyStore,
    descriptors: &[PropertyDescriptor],
) -> Result<(), PropsError> {
    mutate::reset(store, of_kind(descriptors, PropertyKind::Color))
}

/// Activate exactly one state (or none).
pub fn set_state(
    store: &mut dyn PropertyStore,
    descriptors: &[PropertyDescriptor],
    state: Option<&str>,
) -> Result<(), PropsError> {
    mutate::update(
        store,
        of_kind(descriptors, PropertyKind::State),
        &PropertyInput::Scalar(0.0),
        None,
    )?;
    if let Some(state) = state {
        let name = format!("{STATE_PREFIX}{}", state.to_lowercase());
        let targets = named(descriptors, &name).filter(|d| d.kind == PropertyKind::State);
        mutate::update(store, targets, &PropertyInput::Scalar(1.0), None)?;
    }
    Ok(())
}

/// First state whose live value is truthy, in catalogue order.
pub fn read_state(store: &dyn PropertyStore, descriptors: &[PropertyDescriptor]) -> Option<String> {
    of_kind(descriptors, PropertyKind::State)
        .find(|d| read(store, d).is_some_and(|v| v.as_scalar() != 0.0))
        .and_then(|d| d.state_name().map(str::to_string))
}

/// State names in catalogue order, without duplicates.
pub fn state_names(descriptors: &[PropertyDescriptor]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in of_kind(descriptors, PropertyKind::State).filter_map(|d| d.state_name()) {
        if !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}

pub fn reset_named(
    store: &mut dyn PropertyStore,
    descriptors: &[PropertyDescriptor],
    name: &str,
) -> Result<(), PropsError> {
    mutate::reset(store, named(descriptors, name))
}

pub fn reset_states(
    store: &mut dyn PropertyStore,
    descriptors: &[PropertyDescriptor],
) -> Result<(), PropsError> {
    mutate::reset(store, of_kind(descriptors, PropertyKind::State))
}

/// Write a normalized scalar (`stroke`, `scale`) to every matching descriptor.
pub fn set_scaled(
    store: &mut dyn PropertyStore,
    descriptors: &[PropertyDescriptor],
    name: &str,
    value: f64,
    scale: f64,
) -> Result<(), PropsError> {
    mutate::update(
        store,
        named(descriptors, name),
        &PropertyInput::Scalar(value),
        Some(scale),
    )
}

pub fn get_scaled(
    store: &dyn PropertyStore,
    descriptors: &[PropertyDescriptor],
    name: &str,
    scale: f64,
) -> Option<f64> {
    named(descriptors, name)
        .next()
        .and_then(|d| read_scaled(store, d, scale))
}

pub fn set_axis(
    store: &mut dyn PropertyStore,
    descriptors: &[PropertyDescriptor],
    point: Point,
    scale: f64,
) -> Result<(), PropsError> {
    mutate::update(
        store,
        named(descriptors, AXIS).filter(|d| d.kind == PropertyKind::Point),
        &PropertyInput::Point {
            x: point.x,
            y: point.y,
        },
        Some(scale),
    )
}

pub fn get_axis(
    store: &dyn PropertyStore,
    descriptors: &[PropertyDescriptor],
    scale: f64,
) -> Option<Point> {
    named(descriptors, AXIS)
        .find(|d| d.kind == PropertyKind::Point)
        .and_then(|d| read_scaled_point(store, d, scale))
        .map(|(x, y)| Point { x, y })
}

/// Apply a bundle axis by axis. With `reset_first`, each axis is restored to
/// its defaults before the bundle's value (if any) is written.
pub fn apply(
    store: &mut dyn PropertyStore,
    descriptors: &[PropertyDescriptor],
    bundle: &PropertyBundle,
    reset_first: bool,
    scale: f64,
) -> Result<(), PropsError> {
    // colors
    if let Some(palette) = &bundle.colors {
        // Validate before touching the axis.
        for token in palette.values() {
            hex_to_internal(token)?;
        }
    }
    if reset_first {
        reset_colors(store, descriptors)?;
    }
    if let Some(palette) = &bundle.colors {
        set_palette(store, descriptors, palette)?;
    }

    // state
    if reset_first {
        reset_states(store, descriptors)?;
    }
    if let Some(state) = &bundle.state {
        set_state(store, descriptors, Some(state))?;
    }

    // stroke, scale
    for (name, value) in [(STROKE, bundle.stroke), (SCALE, bundle.scale)] {
        if reset_first {
            reset_named(store, descriptors, name)?;
        }
        if let Some(v) = value {
            set_scaled(store, descriptors, name, v, scale)?;
        }
    }

    // axis
    if reset_first {
        reset_named(store, descriptors, AXIS)?;
    }
    if let Some(p) = bundle.axis {
        set_axis(store, descriptors, p, scale)?;
    }
    Ok(())
}
