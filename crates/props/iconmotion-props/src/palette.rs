//! Palettes: color slot name -> `#rrggbb`.
//!
//! Attribute grammar: `name:value[,name:value]*`, where `value` is any token
//! accepted by [`normalize_color`]. Whitespace around names and values is
//! ignored; names are lower-cased.

use indexmap::IndexMap;

use crate::color::normalize_color;
use crate::descriptor::{PropertyDescriptor, PropertyKind};
use crate::error::PropsError;
use crate::mutate::read_color;
use crate::store::PropertyStore;

pub type Palette = IndexMap<String, String>;

/// Parse a color attribute into a normalized palette.
pub fn parse_palette(attr: &str) -> Result<Palette, PropsError> {
    let mut out = Palette::new();
    for entry in attr.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (name, value) = entry
            .split_once(':')
            .ok_or_else(|| PropsError::InvalidPalette(entry.to_string()))?;
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Err(PropsError::InvalidPalette(entry.to_string()));
        }
        out.insert(name, normalize_color(value)?);
    }
    Ok(out)
}

/// Format a palette back into attribute form.
pub fn format_palette(palette: &Palette) -> String {
    palette
        .iter()
        .map(|(k, v)| format!("{k}:{v}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Read the live palette: first descriptor per color name wins.
pub fn palette_of(store: &dyn PropertyStore, descriptors: &[PropertyDescriptor]) -> Palette {
    let mut out = Palette::new();
    for d in descriptors.iter().filter(|d| d.kind == PropertyKind::Color) {
        if out.contains_key(&d.name) {
            continue;
        }
        if let Some(hex) = read_color(store, d) {
            out.insert(d.name.clone(), hex);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mixed_tokens() {
        let p = parse_palette(" primary : #F00 , secondary:blue,accent:00ff7f").unwrap();
        assert_eq!(
            p.iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect::<Vec<_>>(),
            vec![
                ("primary", "#ff0000"),
                ("secondary", "#0000ff"),
                ("accent", "#00ff7f"),
            ]
        );
        assert_eq!(
            format_palette(&p),
            "primary:#ff0000,secondary:#0000ff,accent:#00ff7f"
        );
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            parse_palette("primary"),
            Err(PropsError::InvalidPalette(_))
        ));
        assert!(matches!(
            parse_palette("primary:nope"),
            Err(PropsError::InvalidColor(_))
        ));
        assert!(parse_palette("").unwrap().is_empty());
    }
}
