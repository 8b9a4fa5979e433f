//! Script-driven trigger.
//!
//! The host's `sequence` attribute holds comma-separated steps
//! `action[:param]*`:
//!
//! | step | effect |
//! |---|---|
//! | `play[:reverse]` | play in the given direction, wait for completion |
//! | `frame[:n]` | seek to frame `n` (default 0), continue |
//! | `state:<name>` | activate a state (no name deactivates all), continue |
//! | `delay:<ms>[:first][:last]` | wait `ms` if positive, otherwise continue |
//! | `idle` | stop here until the script is restarted |
//!
//! `first` limits a delay to the first pass through the script, `last` to
//! every later pass. The cursor wraps, so a script without `idle` runs
//! forever. Changing the attribute restarts from step 0.

use crate::engine::Direction;
use crate::error::{IconError, Result};
use crate::host::ObserverKind;
use crate::ids::TimerId;

use super::{Trigger, TriggerContext};

pub const SEQUENCE_ATTRIBUTE: &str = "sequence";

#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Play { reverse: bool },
    Frame(f64),
    State(Option<String>),
    Delay { ms: f64, first: bool, last: bool },
    Idle,
}

fn parse_step(raw: &str) -> Result<Step> {
    let mut parts = raw.split(':').map(str::trim);
    let action = parts.next().unwrap_or_default();
    let params: Vec<&str> = parts.collect();
    let number = |i: usize| {
        params
            .get(i)
            .and_then(|p| p.parse::<f64>().ok())
            .filter(|n| n.is_finite())
            .unwrap_or(0.0)
    };
    let step = match action {
        "play" => Step::Play {
            reverse: params.contains(&"reverse"),
        },
        "frame" => Step::Frame(number(0).max(0.0)),
        "state" => Step::State(
            params
                .first()
                .filter(|name| !name.is_empty())
                .map(|name| name.to_string()),
        ),
        "delay" => Step::Delay {
            ms: number(0),
            first: params.iter().skip(1).any(|p| *p == "first"),
            last: params.iter().skip(1).any(|p| *p == "last"),
        },
        "idle" => Step::Idle,
        other => return Err(IconError::InvalidSequenceAction(other.to_string())),
    };
    Ok(step)
}

/// Parse a whole script. The first unknown action rejects the script.
pub fn parse_script(script: &str) -> Result<Vec<Step>> {
    script
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_step)
        .collect()
}

fn delay_applies(first: bool, last: bool, pass: u32) -> bool {
    match (first, last) {
        (true, false) => pass == 0,
        (false, true) => pass > 0,
        _ => true,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Waiting {
    #[default]
    No,
    ForComplete,
    ForTimer,
    Parked,
}

#[derive(Debug, Default)]
pub struct Sequence {
    steps: Vec<Step>,
    cursor: usize,
    pass: u32,
    waiting: Waiting,
    timer: Option<TimerId>,
}

impl Sequence {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn load(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        if let Some(id) = self.timer.take() {
            cx.clear_timeout(id);
        }
        self.steps.clear();
        self.cursor = 0;
        self.pass = 0;
        self.waiting = Waiting::No;
        let script = cx.attribute(SEQUENCE_ATTRIBUTE).unwrap_or_default();
        self.steps = parse_script(&script)?;
        Ok(())
    }

    fn next_step(&mut self) -> Option<(Step, u32)> {
        let step = self.steps.get(self.cursor)?.clone();
        let pass = self.pass;
        self.cursor += 1;
        if self.cursor >= self.steps.len() {
            self.cursor = 0;
            self.pass = self.pass.saturating_add(1);
        }
        Some((step, pass))
    }

    /// Run steps until one has to wait. At most one script length of
    /// immediate steps runs per call.
    fn step(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        self.waiting = Waiting::No;
        for _ in 0..self.steps.len() {
            let Some((step, pass)) = self.next_step() else {
                return Ok(());
            };
            log::trace!("sequence step {step:?} (pass {pass})");
            match step {
                Step::State(name) => cx.player().set_state(name.as_deref())?,
                Step::Frame(frame) => cx.player().go_to_frame(frame)?,
                Step::Delay { ms, first, last } => {
                    if ms > 0.0 && delay_applies(first, last, pass) {
                        self.timer = Some(cx.set_timeout(ms.round() as u32));
                        self.waiting = Waiting::ForTimer;
                        return Ok(());
                    }
                }
                Step::Play { reverse } => {
                    play(cx, reverse)?;
                    self.waiting = Waiting::ForComplete;
                    return Ok(());
                }
                Step::Idle => {
                    self.waiting = Waiting::Parked;
                    return Ok(());
                }
            }
        }
        if !self.steps.is_empty() {
            log::warn!("sequence made a full pass without waiting; pausing the script");
        }
        Ok(())
    }
}

/// Resume in `direction`, restarting from the far end when the timeline is
/// already at its end for that direction.
fn play(cx: &mut TriggerContext<'_>, reverse: bool) -> Result<()> {
    let player = cx.player();
    let direction = if reverse {
        Direction::Reverse
    } else {
        Direction::Forward
    };
    player.set_direction(direction)?;
    let frame = player.frame()?;
    let last = (player.duration()? - 1.0).max(0.0);
    match direction {
        Direction::Forward if frame >= last => player.play_from_beginning(),
        Direction::Reverse if frame <= 0.0 => {
            player.go_to_last_frame()?;
            player.play()
        }
        _ => player.play(),
    }
}

impl Trigger for Sequence {
    fn on_connected(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        cx.observe(ObserverKind::Attributes);
        self.load(cx)
    }

    fn on_disconnected(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        if let Some(id) = self.timer.take() {
            cx.clear_timeout(id);
        }
        cx.unobserve(ObserverKind::Attributes);
        Ok(())
    }

    fn on_ready(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        self.step(cx)
    }

    fn on_complete(&mut self, cx: &mut TriggerContext<'_>) -> Result<()> {
        if self.waiting != Waiting::ForComplete {
            return Ok(());
        }
        self.step(cx)
    }

    fn on_timer(&mut self, cx: &mut TriggerContext<'_>, id: TimerId) -> Result<()> {
        if self.timer != Some(id) {
            return Ok(());
        }
        self.timer = None;
        self.step(cx)
    }

    fn on_attribute_changed(&mut self, cx: &mut TriggerContext<'_>, name: &str) -> Result<()> {
        if name != SEQUENCE_ATTRIBUTE {
            return Ok(());
        }
        self.load(cx)?;
        if cx.player().is_ready() {
            self.step(cx)?;
        }
        Ok(())
    }
}
