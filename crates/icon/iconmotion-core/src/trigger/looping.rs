use crate::error::Result;
use crate::ids::TimerId;

use super::{delay_from, replay, Trigger, TriggerContext};

/// Plays once ready, then replays after every completion (optionally after
/// the `delay` attribute's milliseconds).
#[derive(Debug, Default)]
pub struct Loop {
    delay: u32,
    timer: Option<TimerId>,
}

impl Trigger for Loop {
    fn on_connected(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        self.delay = delay_from(cx)?;
        Ok(())
    }

    fn on_disconnected(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        if let Some(id) = self.timer.take() {
            cx.clear_timeout(id);
        }
        Ok(())
    }

    fn on_ready(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        cx.player().play_from_beginning()
    }

    fn on_complete(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        if let Some(id) = self.timer.take() {
            cx.clear_timeout(id);
        }
        self.timer = replay(cx, self.delay)?;
        Ok(())
    }

    fn on_timer(&mut self, cx: &mut TriggerContext<'_>, id: TimerId) -> Result<()> {
        if self.timer != Some(id) {
            return Ok(());
        }
        self.timer = None;
        cx.player().play_from_beginning()
    }
}
