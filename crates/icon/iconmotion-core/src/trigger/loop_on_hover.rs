use crate::error::Result;
use crate::host::{EventKind, ListenerOptions, TargetEvent};
use crate::ids::TimerId;

use super::{delay_from, replay, Trigger, TriggerContext};

/// Loops while the pointer stays over the target.
///
/// Leaving does not stop the current run; it only prevents the next replay.
#[derive(Debug, Default)]
pub struct LoopOnHover {
    delay: u32,
    active: bool,
    timer: Option<TimerId>,
}

impl LoopOnHover {
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Trigger for LoopOnHover {
    fn on_connected(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        self.delay = delay_from(cx)?;
        cx.listen(EventKind::PointerEnter, ListenerOptions::default());
        cx.listen(EventKind::PointerLeave, ListenerOptions::default());
        Ok(())
    }

    fn on_disconnected(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        self.active = false;
        if let Some(id) = self.timer.take() {
            cx.clear_timeout(id);
        }
        cx.unlisten(EventKind::PointerEnter);
        cx.unlisten(EventKind::PointerLeave);
        Ok(())
    }

    fn on_event(&mut self, cx: &mut TriggerContext<'_>, event: &TargetEvent) -> Result<()> {
        match event {
            TargetEvent::PointerEnter => {
                self.active = true;
                if !cx.player().is_playing() && self.timer.is_none() {
                    cx.player().play_from_beginning()?;
                }
            }
            TargetEvent::PointerLeave => self.active = false,
            _ => {}
        }
        Ok(())
    }

    fn on_complete(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        if !self.active || !cx.is_connected() || self.timer.is_some() {
            return Ok(());
        }
        self.timer = replay(cx, self.delay)?;
        Ok(())
    }

    fn on_timer(&mut self, cx: &mut TriggerContext<'_>, id: TimerId) -> Result<()> {
        if self.timer != Some(id) {
            return Ok(());
        }
        self.timer = None;
        if self.active {
            cx.player().play_from_beginning()?;
        }
        Ok(())
    }
}
