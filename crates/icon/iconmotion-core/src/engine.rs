//! Contract with the external animation engine.
//!
//! The engine renders a description onto a mount surface and exposes timeline
//! control. Adapters (wasm, headless) implement [`AnimationEngine`] and
//! [`EngineInstance`]; the live render tree is reached through the
//! instance's [`PropertyStore`] view using bound paths.

use std::any::Any;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use iconmotion_props::PropertyStore;

use crate::config::RenderOptions;
use crate::error::Result;

/// Playback direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    #[inline]
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Forward => 1,
            Self::Reverse => -1,
        }
    }

    /// Negative values mean reverse; anything else is forward.
    #[inline]
    pub fn from_sign(v: i32) -> Self {
        if v < 0 {
            Self::Reverse
        } else {
            Self::Forward
        }
    }

    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

/// Native engine notifications, delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineEvent {
    /// Configuration parsed; the instance can render.
    ConfigReady,
    /// A non-looping play reached the end (or the start when reversed).
    Complete,
    /// A frame was rendered while playing.
    EnterFrame,
}

impl EngineEvent {
    /// Engine-native event names (lottie-web style).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "config_ready" | "DOMLoaded" | "data_ready" => Some(Self::ConfigReady),
            "complete" => Some(Self::Complete),
            "enterFrame" | "enter_frame" => Some(Self::EnterFrame),
            _ => None,
        }
    }
}

/// Opaque surface the engine renders into. Engines downcast to their own type.
pub trait MountSurface {
    fn as_any(&self) -> &dyn Any;
}

/// Everything an engine needs to instantiate an animation.
pub struct LoadConfig<'a> {
    pub surface: &'a dyn MountSurface,
    pub description: &'a JsonValue,
    pub options: &'a RenderOptions,
}

/// Factory for engine instances (the "loader" function).
pub trait AnimationEngine {
    fn load(&self, config: LoadConfig<'_>) -> Result<Box<dyn EngineInstance>>;
}

/// One running animation.
pub trait EngineInstance {
    fn play(&mut self);
    fn stop(&mut self);
    fn go_to_and_play(&mut self, frame: f64, is_frame: bool);
    fn go_to_and_stop(&mut self, frame: f64, is_frame: bool);
    fn set_direction(&mut self, direction: Direction);
    fn set_speed(&mut self, speed: f64);
    fn set_loop(&mut self, looping: bool);
    /// Total duration, in frames or in seconds.
    fn duration(&self, in_frames: bool) -> f64;
    fn current_frame(&self) -> f64;
    fn is_loaded(&self) -> bool;
    fn is_paused(&self) -> bool;
    /// Re-render the current frame without advancing time.
    fn render_current_frame(&mut self);
    fn destroy(&mut self);

    /// Live render tree, addressed with bound paths.
    fn properties(&self) -> &dyn PropertyStore;
    fn properties_mut(&mut self) -> &mut dyn PropertyStore;
}
