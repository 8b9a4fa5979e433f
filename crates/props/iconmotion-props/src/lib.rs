//! iconmotion-props: property discovery and rewriting for vector icon
//! animations (engine-agnostic).
//!
//! The scanner walks a description's "change" layers and catalogues their
//! effect controls; the mutator writes colors, scalars and points back through
//! any [`PropertyStore`], which is either the raw description or a live
//! engine's render tree.

pub mod color;
pub mod descriptor;
pub mod error;
pub mod mutate;
pub mod palette;
pub mod path;
pub mod scan;
pub mod store;

pub use color::{hex_to_internal, internal_to_hex, normalize_color, InternalColor};
pub use descriptor::{
    PropertyDescriptor, PropertyKind, PropertyValue, AXIS, PROPERTY_SCALE, SCALE, STATE_PREFIX,
    STROKE,
};
pub use error::PropsError;
pub use mutate::{reset, update, ColorInput, PropertyInput};
pub use palette::{format_palette, palette_of, parse_palette, Palette};
pub use path::{AccessPath, PathFlavor, PathSegment};
pub use scan::scan;
pub use store::PropertyStore;
