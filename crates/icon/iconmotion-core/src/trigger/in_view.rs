use crate::error::Result;
use crate::host::ObserverKind;
use crate::ids::TimerId;

use super::{delay_from, replay, Trigger, TriggerContext};

/// Host attribute meaning "treat as already visible".
pub const LOADING_ATTRIBUTE: &str = "loading";

/// Plays once, the first time the target is visible and the player is ready.
#[derive(Debug, Default)]
pub struct InView {
    delay: u32,
    visible: bool,
    played: bool,
    timer: Option<TimerId>,
}

impl InView {
    fn try_play(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        if self.played || !self.visible || !cx.player().is_ready() {
            return Ok(());
        }
        self.played = true;
        self.timer = replay(cx, self.delay)?;
        Ok(())
    }
}

impl Trigger for InView {
    fn on_connected(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        self.delay = delay_from(cx)?;
        if cx.attribute(LOADING_ATTRIBUTE).is_some() {
            self.visible = true;
        } else {
            cx.observe(ObserverKind::Intersection);
        }
        Ok(())
    }

    fn on_disconnected(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        if let Some(id) = self.timer.take() {
            cx.clear_timeout(id);
        }
        cx.unobserve(ObserverKind::Intersection);
        Ok(())
    }

    fn on_ready(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        self.try_play(cx)
    }

    fn on_intersection(&mut self, cx: &mut TriggerContext<'_>, visible: bool) -> Result<()> {
        if !visible || self.visible {
            return Ok(());
        }
        self.visible = true;
        cx.unobserve(ObserverKind::Intersection);
        self.try_play(cx)
    }

    fn on_timer(&mut self, cx: &mut TriggerContext<'_>, id: TimerId) -> Result<()> {
        if self.timer != Some(id) {
            return Ok(());
        }
        self.timer = None;
        cx.player().play_from_beginning()
    }
}
