//! Rendering options passed to the engine on load.

use serde::{Deserialize, Serialize};

use iconmotion_props::PROPERTY_SCALE;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Renderer {
    #[default]
    Svg,
    Canvas,
    Html,
}

impl Renderer {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Canvas => "canvas",
            Self::Html => "html",
        }
    }
}

/// Options forwarded to the engine and the property normalization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub renderer: Renderer,
    /// Engine-level looping. Triggers normally drive replays themselves.
    pub loop_playback: bool,
    pub autoplay: bool,
    /// Aspect-fit mode (`preserveAspectRatio` in SVG terms).
    pub aspect_ratio: String,
    /// Range that `stroke`, `scale` and `axis` inputs are expressed in.
    pub property_scale: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            renderer: Renderer::Svg,
            loop_playback: false,
            autoplay: false,
            aspect_ratio: "xMidYMid meet".to_string(),
            property_scale: PROPERTY_SCALE,
        }
    }
}
