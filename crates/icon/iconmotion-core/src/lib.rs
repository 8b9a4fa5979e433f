//! iconmotion core (engine-agnostic)
//!
//! Turns a Lottie-style description into an interactive icon: a [`Player`]
//! wraps one engine instance and exposes playback plus property
//! customization, a [`Trigger`] decides when to play, and an [`IconElement`]
//! owns both and routes host notifications to them. Engines and hosts plug in
//! through the traits in [`engine`], [`host`] and [`timers`].

pub mod bundle;
pub mod config;
pub mod context;
pub mod element;
pub mod engine;
pub mod error;
pub mod events;
pub mod headless;
pub mod host;
pub mod ids;
pub mod player;
pub mod timers;
pub mod trigger;

// Re-exports for hosts and adapters
pub use bundle::{Point, PropertyBundle};
pub use config::{RenderOptions, Renderer};
pub use context::IconContext;
pub use element::{IconElement, IconSource};
pub use engine::{AnimationEngine, Direction, EngineEvent, EngineInstance, LoadConfig, MountSurface};
pub use error::{ErrorCategory, IconError, Result};
pub use events::{Callback, EventBus, PlayerEvent};
pub use headless::{EngineCall, HeadlessEngine, HeadlessHandle};
pub use host::{Element, EventKind, ListenerOptions, ObserverKind, TargetEvent};
pub use ids::{SubscriptionId, TimerId};
pub use player::Player;
pub use timers::{ManualScheduler, Scheduler};
pub use trigger::{Trigger, TriggerContext, TriggerFactory};

pub use iconmotion_props::{ColorInput, Palette, PropertyDescriptor, PropertyKind};
