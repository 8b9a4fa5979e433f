//! Property mutator: applies or resets values at descriptor paths.
//!
//! Every call validates its input against all target descriptors before the
//! first write, so a rejected input leaves the store untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::color::{hex_to_internal, internal_to_hex, rgb_to_internal};
use crate::descriptor::{PropertyDescriptor, PropertyKind, PropertyValue};
use crate::error::PropsError;
use crate::path::AccessPath;
use crate::store::PropertyStore;

/// Color input shapes accepted by [`update`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorInput {
    /// Channels in 0–255.
    Rgb { r: f64, g: f64, b: f64 },
    /// Engine floats, 3 (rgb) or 4 (rgba) long.
    Internal(Vec<f64>),
    /// Hex (`#rrggbb`, `#rgb`) or CSS color name.
    Token(String),
}

impl From<&str> for ColorInput {
    fn from(v: &str) -> Self {
        Self::Token(v.to_string())
    }
}

impl From<String> for ColorInput {
    fn from(v: String) -> Self {
        Self::Token(v)
    }
}

/// Value written by [`update`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyInput {
    Scalar(f64),
    Point { x: f64, y: f64 },
    Color(ColorInput),
}

impl From<f64> for PropertyInput {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<bool> for PropertyInput {
    fn from(v: bool) -> Self {
        Self::Scalar(if v { 1.0 } else { 0.0 })
    }
}

impl From<&str> for PropertyInput {
    fn from(v: &str) -> Self {
        Self::Color(ColorInput::Token(v.to_string()))
    }
}

impl From<ColorInput> for PropertyInput {
    fn from(v: ColorInput) -> Self {
        Self::Color(v)
    }
}

impl PropertyInput {
    fn describe(&self) -> String {
        match self {
            Self::Scalar(v) => format!("scalar {v}"),
            Self::Point { x, y } => format!("point ({x}, {y})"),
            Self::Color(c) => format!("color {c:?}"),
        }
    }
}

/// One planned write.
struct Write {
    path: AccessPath,
    value: JsonValue,
}

/// Resolve a color input to the float list to write.
fn color_components(input: &ColorInput) -> Result<Vec<f64>, PropsError> {
    match input {
        ColorInput::Rgb { r, g, b } => Ok(rgb_to_internal(*r, *g, *b).to_vec()),
        ColorInput::Internal(v) if v.len() == 3 || v.len() == 4 => Ok(v.clone()),
        ColorInput::Internal(v) => Err(PropsError::InvalidColor(format!("{v:?}"))),
        ColorInput::Token(t) => Ok(hex_to_internal(t)?.to_vec()),
    }
}

fn plan(
    descriptor: &PropertyDescriptor,
    input: &PropertyInput,
    scale: Option<f64>,
) -> Result<Vec<Write>, PropsError> {
    let mismatch = || PropsError::MismatchedInput {
        kind: descriptor.kind,
        input: input.describe(),
    };
    match descriptor.kind {
        PropertyKind::Color => {
            let PropertyInput::Color(color) = input else {
                return Err(mismatch());
            };
            Ok(vec![Write {
                path: descriptor.path.clone(),
                value: JsonValue::from(color_components(color)?),
            }])
        }
        PropertyKind::Point => {
            let (x, y) = match input {
                PropertyInput::Point { x, y } => (*x, *y),
                PropertyInput::Color(ColorInput::Internal(v)) if v.len() == 2 => (v[0], v[1]),
                _ => return Err(mismatch()),
            };
            let ratio = match scale {
                Some(s) => {
                    let d = descriptor.default_value.components();
                    let magnitude =
                        (d.first().copied().unwrap_or(0.0) + d.get(1).copied().unwrap_or(0.0)) / 2.0;
                    magnitude / s
                }
                None => 1.0,
            };
            Ok(vec![
                Write {
                    path: descriptor.path.child_index(0),
                    value: JsonValue::from(x * ratio),
                },
                Write {
                    path: descriptor.path.child_index(1),
                    value: JsonValue::from(y * ratio),
                },
            ])
        }
        PropertyKind::Slider | PropertyKind::Checkbox | PropertyKind::State => {
            let PropertyInput::Scalar(v) = input else {
                return Err(mismatch());
            };
            let ratio = match scale {
                Some(s) => descriptor.default_value.as_scalar() / s,
                None => 1.0,
            };
            Ok(vec![Write {
                path: descriptor.path.clone(),
                value: JsonValue::from(v * ratio),
            }])
        }
    }
}

/// Write `input` to every descriptor. An empty set is a no-op.
pub fn update<'a, I>(
    store: &mut dyn PropertyStore,
    descriptors: I,
    input: &PropertyInput,
    scale: Option<f64>,
) -> Result<(), PropsError>
where
    I: IntoIterator<Item = &'a PropertyDescriptor>,
{
    if let Some(s) = scale {
        if s == 0.0 || !s.is_finite() {
            return Err(PropsError::MissingArgument("non-zero scale"));
        }
    }
    let mut writes = Vec::new();
    for d in descriptors {
        writes.extend(plan(d, input, scale)?);
    }
    for w in writes {
        store.write(&w.path, w.value)?;
    }
    Ok(())
}

/// Restore each descriptor's default value.
pub fn reset<'a, I>(store: &mut dyn PropertyStore, descriptors: I) -> Result<(), PropsError>
where
    I: IntoIterator<Item = &'a PropertyDescriptor>,
{
    for d in descriptors {
        store.write(&d.path, d.default_value.to_json())?;
    }
    Ok(())
}

/// Live value of a descriptor, if readable.
pub fn read(store: &dyn PropertyStore, descriptor: &PropertyDescriptor) -> Option<PropertyValue> {
    store
        .read(&descriptor.path)
        .as_ref()
        .and_then(PropertyValue::from_json)
}

/// Live color of a descriptor as `#rrggbb`.
pub fn read_color(store: &dyn PropertyStore, descriptor: &PropertyDescriptor) -> Option<String> {
    read(store, descriptor).map(|v| internal_to_hex(&v.components()))
}

/// Inverse of a scaled scalar write: live value back in the caller's range.
pub fn read_scaled(
    store: &dyn PropertyStore,
    descriptor: &PropertyDescriptor,
    scale: f64,
) -> Option<f64> {
    let live = read(store, descriptor)?.as_scalar();
    let default = descriptor.default_value.as_scalar();
    if default == 0.0 {
        return Some(live);
    }
    Some(live / default * scale)
}

/// Inverse of a scaled point write.
pub fn read_scaled_point(
    store: &dyn PropertyStore,
    descriptor: &PropertyDescriptor,
    scale: f64,
) -> Option<(f64, f64)> {
    let live = read(store, descriptor)?.components();
    let d = descriptor.default_value.components();
    let magnitude = (d.first().copied().unwrap_or(0.0) + d.get(1).copied().unwrap_or(0.0)) / 2.0;
    let x = live.first().copied().unwrap_or(0.0);
    let y = live.get(1).copied().unwrap_or(0.0);
    if magnitude == 0.0 {
        return Some((x, y));
    }
    Some((x / magnitude * scale, y / magnitude * scale))
}
