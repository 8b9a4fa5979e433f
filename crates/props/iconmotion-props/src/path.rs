//! AccessPath parsing and formatting.
//!
//! Grammar (dotted, engine-agnostic):
//!   segment(.segment)*
//! - a segment made only of ASCII digits is an array index
//! - anything else is an object key
//!   Examples:
//!   "layers.0.ef.1.ef.0.v.k" -> [Key(layers), Index(0), Key(ef), Index(1), ...]
//!   "renderer.elements.2.effectsManager.effectElements.0.effectElements.0.p.v"
//!
//! Two flavors are produced by the scanner: static paths index the raw
//! description, bound paths index a live engine's render-tree mirror.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::PropsError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => f.write_str(k),
            PathSegment::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Which tree a path addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathFlavor {
    /// Indexes into the raw animation description.
    Static,
    /// Indexes into a live engine instance's render-tree mirror.
    Bound,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AccessPath {
    segments: Vec<PathSegment>,
}

impl AccessPath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Parse a dotted path string.
    pub fn parse(s: &str) -> Result<Self, PropsError> {
        if s.is_empty() {
            return Err(PropsError::InvalidPath("empty path".to_string()));
        }
        let mut segments = Vec::new();
        for part in s.split('.') {
            if part.is_empty() {
                return Err(PropsError::InvalidPath(format!(
                    "empty segment in '{s}'"
                )));
            }
            if part.chars().any(char::is_whitespace) {
                return Err(PropsError::InvalidPath(format!(
                    "segment '{part}' contains whitespace"
                )));
            }
            if part.bytes().all(|b| b.is_ascii_digit()) {
                let idx = part
                    .parse::<usize>()
                    .map_err(|e| PropsError::InvalidPath(format!("{part}: {e}")))?;
                segments.push(PathSegment::Index(idx));
            } else {
                segments.push(PathSegment::Key(part.to_string()));
            }
        }
        Ok(Self { segments })
    }

    /// Path to an effect control's value slot for the given flavor.
    pub fn effect_value(flavor: PathFlavor, layer: usize, effect: usize) -> Self {
        use PathSegment::{Index, Key};
        let segments = match flavor {
            PathFlavor::Static => vec![
                Key("layers".into()),
                Index(layer),
                Key("ef".into()),
                Index(effect),
                Key("ef".into()),
                Index(0),
                Key("v".into()),
                Key("k".into()),
            ],
            PathFlavor::Bound => vec![
                Key("renderer".into()),
                Key("elements".into()),
                Index(layer),
                Key("effectsManager".into()),
                Key("effectElements".into()),
                Index(effect),
                Key("effectElements".into()),
                Index(0),
                Key("p".into()),
                Key("v".into()),
            ],
        };
        Self { segments }
    }

    /// Return a new path with an index appended (used for vector components).
    pub fn child_index(&self, idx: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(idx));
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Split into (parent segments, last segment). `None` for an empty path.
    pub fn split_last(&self) -> Option<(&PathSegment, &[PathSegment])> {
        self.segments.split_last()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

impl FromStr for AccessPath {
    type Err = PropsError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccessPath::parse(s)
    }
}

// Serde support: serialize as string, deserialize from string
impl Serialize for AccessPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccessPath {
    fn deserialize<D>(deserializer: D) -> Result<AccessPath, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AccessPath::parse(&s).map_err(de::Error::custom)
    }
}
