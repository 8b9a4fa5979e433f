use crate::engine::Direction;
use crate::error::Result;
use crate::host::{EventKind, ListenerOptions, TargetEvent};

use super::{Trigger, TriggerContext};

/// On enter, plays forward once and then back to the start.
///
/// The return leg is driven by the animation's own completion, so further
/// enter events while it runs are ignored.
#[derive(Debug, Default)]
pub struct Boomerang;

impl Trigger for Boomerang {
    fn on_connected(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        cx.listen(EventKind::PointerEnter, ListenerOptions::default());
        Ok(())
    }

    fn on_disconnected(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        cx.unlisten(EventKind::PointerEnter);
        if cx.is_connected() {
            cx.player().set_direction(Direction::Forward)?;
        }
        Ok(())
    }

    fn on_event(&mut self, cx: &mut TriggerContext<'_>, event: &TargetEvent) -> Result<()> {
        if *event != TargetEvent::PointerEnter {
            return Ok(());
        }
        let player = cx.player();
        if player.is_playing() {
            return Ok(());
        }
        player.set_direction(Direction::Forward)?;
        player.play_from_beginning()
    }

    fn on_complete(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        let player = cx.player();
        match player.direction() {
            Direction::Forward => {
                player.set_direction(Direction::Reverse)?;
                player.play()
            }
            // Back at the start: ready for the next enter.
            Direction::Reverse => player.set_direction(Direction::Forward),
        }
    }
}
