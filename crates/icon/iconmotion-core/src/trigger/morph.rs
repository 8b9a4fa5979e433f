use crate::engine::Direction;
use crate::error::Result;
use crate::host::{EventKind, ListenerOptions, TargetEvent};

use super::{Trigger, TriggerContext};

/// Plays forward on enter and backward on leave, from wherever the timeline is.
#[derive(Debug, Default)]
pub struct Morph;

impl Morph {
    fn run(cx: &mut TriggerContext<'_>, direction: Direction) -> Result<()> {
        let player = cx.player();
        player.set_direction(direction)?;
        player.play()
    }
}

impl Trigger for Morph {
    fn on_connected(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        cx.listen(EventKind::PointerEnter, ListenerOptions::default());
        cx.listen(EventKind::PointerLeave, ListenerOptions::default());
        Ok(())
    }

    fn on_disconnected(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        cx.unlisten(EventKind::PointerEnter);
        cx.unlisten(EventKind::PointerLeave);
        if cx.is_connected() {
            cx.player().set_direction(Direction::Forward)?;
        }
        Ok(())
    }

    fn on_event(&mut self, cx: &mut TriggerContext<'_>, event: &TargetEvent) -> Result<()> {
        match event {
            TargetEvent::PointerEnter => Self::run(cx, Direction::Forward),
            TargetEvent::PointerLeave => Self::run(cx, Direction::Reverse),
            _ => Ok(()),
        }
    }
}
