//! Registry of icons, trigger factories and the engine loader.
//!
//! One context is shared (behind `Rc`) by every element of an "element
//! universe". Independent contexts do not see each other's registrations.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use hashbrown::HashMap;
use serde_json::Value as JsonValue;

use iconmotion_props::{scan, PathFlavor, PROPERTY_SCALE};

use crate::bundle::{self, PropertyBundle};
use crate::engine::AnimationEngine;
use crate::error::{IconError, Result};
use crate::trigger::{self, Trigger, TriggerFactory};

#[derive(Default)]
pub struct IconContext {
    icons: RefCell<HashMap<String, Rc<JsonValue>>>,
    triggers: RefCell<HashMap<String, TriggerFactory>>,
    loader: RefCell<Option<Rc<dyn AnimationEngine>>>,
}

impl fmt::Debug for IconContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut triggers: Vec<String> = self.triggers.borrow().keys().cloned().collect();
        triggers.sort();
        f.debug_struct("IconContext")
            .field("icons", &self.icons.borrow().len())
            .field("triggers", &triggers)
            .field("loader", &self.loader.borrow().is_some())
            .finish()
    }
}

impl IconContext {
    /// Empty context: no icons, no triggers, no loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context with the eight built-in triggers registered.
    pub fn with_builtin_triggers() -> Self {
        let cx = Self::new();
        for (name, factory) in trigger::builtins() {
            cx.triggers.borrow_mut().insert(name.to_string(), factory);
        }
        cx
    }

    // ---- icons ---------------------------------------------------------

    /// Register (or replace) a named description.
    pub fn register_icon(&self, name: &str, description: JsonValue) {
        log::debug!("register icon '{name}'");
        self.icons
            .borrow_mut()
            .insert(name.to_string(), Rc::new(description));
    }

    pub fn register_icon_json(&self, name: &str, json: &str) -> Result<()> {
        let description: JsonValue = serde_json::from_str(json)?;
        self.register_icon(name, description);
        Ok(())
    }

    pub fn has_icon(&self, name: &str) -> bool {
        self.icons.borrow().contains_key(name)
    }

    pub fn icon(&self, name: &str) -> Result<Rc<JsonValue>> {
        self.icons
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| IconError::UnknownIcon(name.to_string()))
    }

    /// Deep copy of a registered icon with `properties` baked in at static
    /// paths. The registered original is left untouched.
    pub fn prepare_description(&self, name: &str, properties: &PropertyBundle) -> Result<JsonValue> {
        let mut description = self.icon(name)?.as_ref().clone();
        let descriptors = scan(&description, PathFlavor::Static);
        bundle::apply(&mut description, &descriptors, properties, false, PROPERTY_SCALE)?;
        Ok(description)
    }

    // ---- triggers ------------------------------------------------------

    pub fn register_trigger<F>(&self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn Trigger> + 'static,
    {
        log::debug!("register trigger '{name}'");
        self.triggers
            .borrow_mut()
            .insert(name.to_string(), Rc::new(factory));
    }

    pub fn has_trigger(&self, name: &str) -> bool {
        self.triggers.borrow().contains_key(name)
    }

    /// Construct a fresh trigger by name.
    pub fn trigger(&self, name: &str) -> Result<Box<dyn Trigger>> {
        let factory = self
            .triggers
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| IconError::UnregisteredTrigger(name.to_string()))?;
        Ok(factory())
    }

    // ---- loader --------------------------------------------------------

    pub fn set_loader(&self, engine: Rc<dyn AnimationEngine>) {
        *self.loader.borrow_mut() = Some(engine);
    }

    pub fn loader(&self) -> Result<Rc<dyn AnimationEngine>> {
        self.loader.borrow().clone().ok_or(IconError::MissingLoader)
    }
}
