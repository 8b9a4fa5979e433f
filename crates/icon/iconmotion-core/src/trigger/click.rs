use crate::error::Result;
use crate::host::{EventKind, ListenerOptions, TargetEvent};

use super::{Trigger, TriggerContext};

/// Plays from the beginning on a primary pointer-down or a touch-start,
/// unless already playing.
#[derive(Debug, Default)]
pub struct Click;

impl Trigger for Click {
    fn on_connected(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        cx.listen(EventKind::PointerDown, ListenerOptions::default());
        cx.listen(EventKind::TouchStart, ListenerOptions { passive: true });
        Ok(())
    }

    fn on_disconnected(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        cx.unlisten(EventKind::PointerDown);
        cx.unlisten(EventKind::TouchStart);
        Ok(())
    }

    fn on_event(&mut self, cx: &mut TriggerContext<'_>, event: &TargetEvent) -> Result<()> {
        match event {
            TargetEvent::PointerDown { button: 0 } | TargetEvent::TouchStart => {}
            _ => return Ok(()),
        }
        let player = cx.player();
        if !player.is_playing() {
            player.play_from_beginning()?;
        }
        Ok(())
    }
}
