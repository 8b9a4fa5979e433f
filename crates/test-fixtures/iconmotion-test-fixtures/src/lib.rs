//! Shared icon fixtures for iconmotion tests.
//!
//! Icons are listed by name in `fixtures/manifest.json` at the workspace
//! root; each entry points at a description file under `fixtures/`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    icons: BTreeMap<String, String>,
}

pub mod icons {
    use super::*;

    /// Registered icon names, sorted.
    pub fn keys() -> Vec<String> {
        MANIFEST.icons.keys().cloned().collect()
    }

    /// Raw JSON text of an icon description.
    pub fn json(name: &str) -> Result<String> {
        let rel = MANIFEST
            .icons
            .get(name)
            .ok_or_else(|| anyhow!("no icon fixture named '{name}'"))?;
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(rel);
        fs::read_to_string(&path)
            .with_context(|| format!("reading icon fixture {}", path.display()))
    }

    /// Parsed icon description.
    pub fn value(name: &str) -> Result<serde_json::Value> {
        let text = json(name)?;
        serde_json::from_str(&text).with_context(|| format!("parsing icon fixture '{name}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::icons;

    #[test]
    fn every_listed_icon_parses() {
        let keys = icons::keys();
        assert!(keys.contains(&"lock".to_string()));
        for name in keys {
            let value = icons::value(&name).unwrap();
            assert!(value.get("layers").is_some(), "{name} has no layers");
        }
    }

    #[test]
    fn unknown_icon_is_an_error() {
        assert!(icons::json("nope").is_err());
    }
}
