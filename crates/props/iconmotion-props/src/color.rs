//! Color codec between hex strings and the engine's normalized float triples.
//!
//! The engine stores colors as `[r, g, b(, a)]` floats in `[0, 1]`. Conversion
//! to floats is quantized to three decimals, so a round trip may drift by one
//! unit per channel.

use crate::error::PropsError;

/// Engine-side color triple.
pub type InternalColor = [f64; 3];

/// Normalize a color token to `#rrggbb`.
///
/// Accepts `#rrggbb`, `#rgb`, the same without `#`, and CSS color names
/// (case-insensitive).
pub fn normalize_color(token: &str) -> Result<String, PropsError> {
    let t = token.trim();
    if t.is_empty() {
        return Err(PropsError::InvalidColor(token.to_string()));
    }
    let digits = t.strip_prefix('#').unwrap_or(t);
    if digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        match digits.len() {
            6 => return Ok(format!("#{}", digits.to_ascii_lowercase())),
            3 => {
                let mut out = String::with_capacity(7);
                out.push('#');
                for c in digits.chars() {
                    let c = c.to_ascii_lowercase();
                    out.push(c);
                    out.push(c);
                }
                return Ok(out);
            }
            _ => {}
        }
    }
    if t.starts_with('#') {
        return Err(PropsError::InvalidColor(token.to_string()));
    }
    let named = palette::named::from_str(&t.to_ascii_lowercase())
        .ok_or_else(|| PropsError::InvalidColor(token.to_string()))?;
    Ok(format!(
        "#{:02x}{:02x}{:02x}",
        named.red, named.green, named.blue
    ))
}

/// Parse `#rrggbb` into its three byte channels.
fn parse_hex6(hex: &str) -> Result<[u8; 3], PropsError> {
    let digits = hex
        .strip_prefix('#')
        .filter(|d| d.len() == 6)
        .ok_or_else(|| PropsError::InvalidColor(hex.to_string()))?;
    let mut out = [0u8; 3];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
            .map_err(|_| PropsError::InvalidColor(hex.to_string()))?;
    }
    Ok(out)
}

/// Convert any accepted color token to the engine's float triple.
pub fn hex_to_internal(hex: &str) -> Result<InternalColor, PropsError> {
    let normalized = normalize_color(hex)?;
    let bytes = parse_hex6(&normalized)?;
    Ok(bytes.map(|n| (n as f64 / 255.0 * 1000.0).round() / 1000.0))
}

/// Convert the first three floats of an engine color to `#rrggbb`.
/// Missing channels read as zero.
pub fn internal_to_hex(color: &[f64]) -> String {
    let channel = |i: usize| -> u8 {
        let v = color.get(i).copied().unwrap_or(0.0);
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };
    format!("#{:02x}{:02x}{:02x}", channel(0), channel(1), channel(2))
}

/// Convert 0–255 channels to the engine's float triple (no quantization).
pub fn rgb_to_internal(r: f64, g: f64, b: f64) -> InternalColor {
    [r / 255.0, g / 255.0, b / 255.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_and_bare_hex() {
        assert_eq!(normalize_color("#F0a").unwrap(), "#ff00aa");
        assert_eq!(normalize_color("00FF00").unwrap(), "#00ff00");
        assert_eq!(normalize_color(" #123456 ").unwrap(), "#123456");
    }

    #[test]
    fn named_colors() {
        assert_eq!(normalize_color("red").unwrap(), "#ff0000");
        assert_eq!(normalize_color("RebeccaPurple").unwrap(), "#663399");
    }

    #[test]
    fn rejects_garbage() {
        assert!(normalize_color("").is_err());
        assert!(normalize_color("#12345").is_err());
        assert!(normalize_color("#ggg").is_err());
        assert!(normalize_color("not-a-color").is_err());
    }
}
