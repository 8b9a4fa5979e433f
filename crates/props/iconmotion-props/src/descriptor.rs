//! Property descriptors produced by the scanner.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::path::AccessPath;

/// Normalization constant for `stroke`, `scale` and `axis`: user input in a
/// 0–100 range maps onto the descriptor's own default magnitude.
pub const PROPERTY_SCALE: f64 = 50.0;

/// Reserved name prefix of state switches.
pub const STATE_PREFIX: &str = "state-";

pub const STROKE: &str = "stroke";
pub const SCALE: &str = "scale";
pub const AXIS: &str = "axis";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Color,
    Slider,
    Point,
    Checkbox,
    State,
}

impl PropertyKind {
    /// Classify an effect control tag. The Lottie `mn` vendor prefix is ignored.
    pub fn from_control_tag(tag: &str) -> Option<Self> {
        let tag = tag.strip_prefix("ADBE ").unwrap_or(tag);
        match tag {
            "Color Control" => Some(Self::Color),
            "Slider Control" => Some(Self::Slider),
            "Point Control" => Some(Self::Point),
            "Checkbox Control" => Some(Self::Checkbox),
            _ => None,
        }
    }

    /// Scalar kinds are written as a single number.
    #[inline]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Slider | Self::Checkbox | Self::State)
    }
}

/// A numeric value as stored by the engine: one number or a vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl PropertyValue {
    /// Read a number or an array of numbers; anything else is rejected.
    pub fn from_json(v: &JsonValue) -> Option<Self> {
        match v {
            JsonValue::Number(n) => n.as_f64().map(Self::Scalar),
            JsonValue::Bool(b) => Some(Self::Scalar(if *b { 1.0 } else { 0.0 })),
            JsonValue::Array(items) => items
                .iter()
                .map(JsonValue::as_f64)
                .collect::<Option<Vec<_>>>()
                .map(Self::Vector),
            _ => None,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Scalar(f) => JsonValue::from(*f),
            Self::Vector(v) => JsonValue::from(v.clone()),
        }
    }

    /// First component for vectors.
    pub fn as_scalar(&self) -> f64 {
        match self {
            Self::Scalar(f) => *f,
            Self::Vector(v) => v.first().copied().unwrap_or(0.0),
        }
    }

    /// Components of a vector; a scalar reads as one component.
    pub fn components(&self) -> Vec<f64> {
        match self {
            Self::Scalar(f) => vec![*f],
            Self::Vector(v) => v.clone(),
        }
    }
}

/// A discovered customizable parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Lower-cased effect name. Not unique.
    pub name: String,
    pub path: AccessPath,
    pub default_value: PropertyValue,
    pub kind: PropertyKind,
}

impl PropertyDescriptor {
    /// State name without the reserved prefix, for `State` descriptors.
    pub fn state_name(&self) -> Option<&str> {
        if self.kind == PropertyKind::State {
            self.name.strip_prefix(STATE_PREFIX)
        } else {
            None
        }
    }
}

/// Descriptors named `name`, in catalogue order.
pub fn named<'a>(
    descriptors: &'a [PropertyDescriptor],
    name: &'a str,
) -> impl Iterator<Item = &'a PropertyDescriptor> + 'a {
    descriptors.iter().filter(move |d| d.name == name)
}

/// Descriptors of `kind`, in catalogue order.
pub fn of_kind(
    descriptors: &[PropertyDescriptor],
    kind: PropertyKind,
) -> impl Iterator<Item = &PropertyDescriptor> {
    descriptors.iter().filter(move |d| d.kind == kind)
}
