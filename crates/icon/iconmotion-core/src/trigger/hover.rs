use crate::error::Result;
use crate::host::{EventKind, ListenerOptions, TargetEvent};

use super::{Trigger, TriggerContext};

/// Plays from the beginning when the pointer enters the target.
#[derive(Debug, Default)]
pub struct Hover;

impl Trigger for Hover {
    fn on_connected(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        cx.listen(EventKind::PointerEnter, ListenerOptions::default());
        Ok(())
    }

    fn on_disconnected(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        cx.unlisten(EventKind::PointerEnter);
        Ok(())
    }

    fn on_event(&mut self, cx: &mut TriggerContext<'_>, event: &TargetEvent) -> Result<()> {
        if *event != TargetEvent::PointerEnter {
            return Ok(());
        }
        let player = cx.player();
        if !player.is_playing() {
            player.play_from_beginning()?;
        }
        Ok(())
    }
}
