mod common;

use std::rc::Rc;

use common::{FakeElement, Rig, Surface};
use iconmotion_core::{
    Direction, EngineCall, EngineEvent, ErrorCategory, EventKind, HeadlessEngine, IconElement, IconError,
    IconSource, ListenerOptions, ManualScheduler, ObserverKind, TargetEvent, TimerId, Trigger,
    TriggerContext,
};

const LOCK_RUN: u32 = 59;

#[test]
fn click_plays_on_primary_button_only() {
    let mut rig = Rig::new("lock", Some("click"), &[]);
    assert_eq!(
        rig.host.listeners(),
        vec![EventKind::PointerDown, EventKind::TouchStart]
    );
    assert_eq!(
        rig.host.options(EventKind::TouchStart),
        Some(ListenerOptions { passive: true })
    );
    assert_eq!(rig.plays(), 0);

    rig.element
        .dispatch(TargetEvent::PointerDown { button: 2 })
        .unwrap();
    assert_eq!(rig.plays(), 0);

    rig.element
        .dispatch(TargetEvent::PointerDown { button: 0 })
        .unwrap();
    assert_eq!(rig.plays(), 1);
    assert_eq!(rig.handle().calls().last(), Some(&EngineCall::GoToAndPlay(0.0)));

    // Mid-animation clicks are ignored.
    rig.advance(10);
    rig.element.dispatch(TargetEvent::TouchStart).unwrap();
    assert_eq!(rig.plays(), 1);

    rig.advance(LOCK_RUN);
    rig.element.dispatch(TargetEvent::TouchStart).unwrap();
    assert_eq!(rig.plays(), 2);

    // Not listened to: dropped.
    rig.element.dispatch(TargetEvent::PointerEnter).unwrap();
    assert_eq!(rig.plays(), 2);

    rig.element.disconnect().unwrap();
    assert!(rig.host.listeners().is_empty());
}

#[test]
fn hover_plays_when_idle() {
    let mut rig = Rig::new("lock", Some("hover"), &[]);
    rig.element.dispatch(TargetEvent::PointerEnter).unwrap();
    rig.element.dispatch(TargetEvent::PointerEnter).unwrap();
    assert_eq!(rig.plays(), 1);
    rig.advance(LOCK_RUN);
    rig.element.dispatch(TargetEvent::PointerEnter).unwrap();
    assert_eq!(rig.plays(), 2);
}

#[test]
fn loop_replays_after_each_completion() {
    let mut rig = Rig::new("lock", Some("loop"), &[]);
    assert_eq!(rig.plays(), 1);
    rig.advance(LOCK_RUN);
    assert_eq!(rig.plays(), 2);
    rig.advance(LOCK_RUN);
    assert_eq!(rig.plays(), 3);
}

#[test]
fn loop_delay_is_timed_and_cancelled_on_disconnect() {
    let mut rig = Rig::new("lock", Some("loop"), &[("delay", "100")]);
    rig.advance(LOCK_RUN);
    assert_eq!(rig.plays(), 1);
    assert_eq!(rig.element.pending_timers(), 1);

    rig.tick(99);
    assert_eq!(rig.plays(), 1);
    rig.tick(1);
    assert_eq!(rig.plays(), 2);

    rig.advance(LOCK_RUN);
    assert_eq!(rig.scheduler.pending(), 1);
    rig.element.disconnect().unwrap();
    assert_eq!(rig.scheduler.pending(), 0);
    assert_eq!(rig.element.pending_timers(), 0);
    assert!(!rig.element.fire_timer(TimerId(1)).unwrap());
}

#[test]
fn malformed_delay_is_rejected() {
    let engine = HeadlessEngine::new();
    let context = common::context_with(&engine);
    let host = FakeElement::with_attributes(&[("delay", "soon")]);
    let mut element = IconElement::new(
        context,
        host.clone(),
        Rc::new(Surface),
        Rc::new(ManualScheduler::new()),
    );
    element.load(IconSource::Named("lock".into())).unwrap();
    element.set_trigger(Some("loop")).unwrap();
    let err = element.connect().unwrap_err();
    assert!(matches!(err, IconError::InvalidAttribute { ref name, .. } if name == "delay"));
    assert_eq!(err.category(), ErrorCategory::Data);
    assert!(!element.has_live_trigger());
}

#[test]
fn failed_connect_rolls_back_and_can_be_retried() {
    let engine = HeadlessEngine::new();
    let context = common::context_with(&engine);
    let host = FakeElement::with_attributes(&[("delay", "soon")]);
    let mut element = IconElement::new(
        context,
        host.clone(),
        Rc::new(Surface),
        Rc::new(ManualScheduler::new()),
    );
    element.load(IconSource::Named("lock".into())).unwrap();
    element.set_trigger(Some("loop")).unwrap();

    assert!(element.connect().is_err());
    assert!(!element.is_connected());
    assert!(!element.player().unwrap().is_connected());
    assert!(engine.last().unwrap().is_destroyed());
    assert!(host.listeners().is_empty());

    host.set_attribute("delay", "250");
    element.connect().unwrap();
    assert!(element.is_connected());
    assert!(element.has_live_trigger());
    assert_eq!(engine.instance_count(), 2);
    assert_eq!(engine.last().unwrap().play_count(), 1);
}

#[test]
fn failed_load_while_connected_leaves_element_disconnected() {
    let mut rig = Rig::new("lock", Some("loop"), &[]);
    let first = rig.handle();
    rig.host.set_attribute("delay", "soon");

    assert!(rig.element.load(IconSource::Named("lock".into())).is_err());
    assert!(first.is_destroyed());
    assert!(rig.handle().is_destroyed());
    assert!(!rig.element.is_connected());
    assert!(!rig.element.has_live_trigger());
    assert!(matches!(
        rig.element.disconnect(),
        Err(IconError::NotConnected)
    ));
}

#[test]
fn loop_on_hover_stops_after_leave() {
    let mut rig = Rig::new("lock", Some("loop-on-hover"), &[]);
    assert_eq!(rig.plays(), 0);

    rig.element.dispatch(TargetEvent::PointerEnter).unwrap();
    assert_eq!(rig.plays(), 1);
    rig.advance(20);
    rig.element.dispatch(TargetEvent::PointerLeave).unwrap();
    rig.advance(LOCK_RUN);
    assert_eq!(rig.plays(), 1);
    assert_eq!(rig.element.pending_timers(), 0);
}

#[test]
fn loop_on_hover_loops_while_inside() {
    let mut rig = Rig::new("lock", Some("loop-on-hover"), &[]);
    rig.element.dispatch(TargetEvent::PointerEnter).unwrap();
    rig.advance(LOCK_RUN);
    rig.advance(LOCK_RUN);
    assert_eq!(rig.plays(), 3);
}

#[test]
fn loop_on_hover_delay_checks_hover_again() {
    let mut rig = Rig::new("lock", Some("loop-on-hover"), &[("delay", "50")]);
    rig.element.dispatch(TargetEvent::PointerEnter).unwrap();
    rig.advance(LOCK_RUN);
    assert_eq!(rig.element.pending_timers(), 1);
    rig.element.dispatch(TargetEvent::PointerLeave).unwrap();
    rig.tick(50);
    assert_eq!(rig.plays(), 1);
}

#[test]
fn morph_follows_the_pointer() {
    let mut rig = Rig::new("lock", Some("morph"), &[]);
    let handle = rig.handle();
    handle.clear_calls();

    rig.element.dispatch(TargetEvent::PointerEnter).unwrap();
    rig.advance(10);
    rig.element.dispatch(TargetEvent::PointerLeave).unwrap();
    assert_eq!(
        handle.calls(),
        vec![
            EngineCall::SetDirection(Direction::Forward),
            EngineCall::Play,
            EngineCall::SetDirection(Direction::Reverse),
            EngineCall::Play,
        ]
    );

    rig.advance(LOCK_RUN);
    assert_eq!(handle.frame(), 0.0);

    handle.clear_calls();
    rig.element.disconnect().unwrap();
    assert_eq!(
        handle.calls(),
        vec![EngineCall::SetDirection(Direction::Forward), EngineCall::Destroy]
    );
}

#[test]
fn boomerang_returns_to_start_on_its_own() {
    let mut rig = Rig::new("lock", Some("boomerang"), &[]);
    let handle = rig.handle();

    rig.element.dispatch(TargetEvent::PointerEnter).unwrap();
    rig.advance(LOCK_RUN);
    assert_eq!(handle.direction(), Direction::Reverse);
    assert!(!handle.is_paused());

    // Ignored while the return leg runs.
    rig.element.dispatch(TargetEvent::PointerEnter).unwrap();
    assert_eq!(rig.plays(), 2);

    rig.advance(LOCK_RUN);
    assert_eq!(handle.frame(), 0.0);
    assert!(handle.is_paused());
    assert_eq!(handle.direction(), Direction::Forward);
    assert_eq!(rig.plays(), 2);
}

#[test]
fn in_view_waits_for_intersection() {
    let mut rig = Rig::new("lock", Some("in"), &[]);
    assert_eq!(rig.host.observers(), vec![ObserverKind::Intersection]);
    assert_eq!(rig.plays(), 0);

    rig.element.intersection(false).unwrap();
    assert_eq!(rig.plays(), 0);
    rig.element.intersection(true).unwrap();
    assert_eq!(rig.plays(), 1);
    assert!(rig.host.observers().is_empty());

    rig.advance(LOCK_RUN);
    rig.element.intersection(true).unwrap();
    assert_eq!(rig.plays(), 1);
}

#[test]
fn in_view_loading_flag_plays_at_ready() {
    let rig = Rig::new("lock", Some("in"), &[("loading", "")]);
    assert!(rig.host.observers().is_empty());
    assert_eq!(rig.plays(), 1);
}

#[test]
fn in_view_visible_before_ready_waits_for_ready() {
    let mut rig = Rig::with_engine(
        HeadlessEngine::deferred(),
        "lock",
        Some("in"),
        &[("delay", "30")],
    );
    rig.element.intersection(true).unwrap();
    assert_eq!(rig.plays(), 0);

    let ready = rig.handle().finish_loading();
    rig.element.handle_engine_event(ready).unwrap();
    assert_eq!(rig.plays(), 0);
    rig.tick(30);
    assert_eq!(rig.plays(), 1);
}

#[test]
fn swapping_triggers_cleans_up_the_old_one() {
    let mut rig = Rig::new("lock", Some("click"), &[]);
    rig.element.set_trigger(Some("hover")).unwrap();
    assert_eq!(rig.host.listeners(), vec![EventKind::PointerEnter]);
    assert_eq!(rig.element.trigger_name(), Some("hover"));

    // A ready player gets on_ready straight away.
    rig.element.set_trigger(Some("loop")).unwrap();
    assert!(rig.host.listeners().is_empty());
    assert_eq!(rig.plays(), 1);

    rig.element.set_trigger(None).unwrap();
    assert!(!rig.element.has_live_trigger());
}

#[test]
fn unknown_trigger_fails_loudly() {
    let mut rig = Rig::new("lock", Some("click"), &[]);
    let err = rig.element.set_trigger(Some("wiggle")).unwrap_err();
    assert!(matches!(err, IconError::UnregisteredTrigger(ref n) if n == "wiggle"));
    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert_eq!(rig.element.trigger_name(), Some("click"));
}

/// Registers everything and cleans up nothing.
struct Leaky;

impl Trigger for Leaky {
    fn on_connected(&mut self, cx: &mut TriggerContext<'_>) -> iconmotion_core::Result<()> {
        cx.listen(EventKind::PointerEnter, ListenerOptions::default());
        cx.listen(EventKind::PointerLeave, ListenerOptions::default());
        cx.observe(ObserverKind::Intersection);
        cx.observe(ObserverKind::Attributes);
        cx.set_timeout(1_000);
        Ok(())
    }
}

#[test]
fn late_engine_events_after_disconnect_are_dropped() {
    let mut rig = Rig::new("lock", Some("loop"), &[]);
    rig.element.disconnect().unwrap();
    rig.element
        .handle_engine_event(EngineEvent::Complete)
        .unwrap();
    rig.element
        .handle_engine_event(EngineEvent::EnterFrame)
        .unwrap();
    assert_eq!(rig.plays(), 1);

    rig.element.unload().unwrap();
    rig.element
        .handle_engine_event(EngineEvent::ConfigReady)
        .unwrap();
}

#[test]
fn disconnect_undoes_forgotten_registrations() {
    let mut rig = Rig::new("lock", None, &[]);
    rig.context
        .register_trigger("leaky", || Box::new(Leaky) as Box<dyn Trigger>);
    rig.element.set_trigger(Some("leaky")).unwrap();
    assert_eq!(rig.host.listeners().len(), 2);
    assert_eq!(rig.host.observers().len(), 2);
    assert_eq!(rig.scheduler.pending(), 1);

    rig.element.disconnect().unwrap();
    assert!(rig.host.listeners().is_empty());
    assert!(rig.host.observers().is_empty());
    assert_eq!(rig.scheduler.pending(), 0);

    // Timers that fire after teardown are ignored.
    assert!(!rig.element.fire_timer(TimerId(0)).unwrap());
}

#[test]
fn target_can_differ_from_host() {
    let engine = HeadlessEngine::new();
    let context = common::context_with(&engine);
    let host = FakeElement::with_attributes(&[("delay", "10")]);
    let target = FakeElement::with_attributes(&[]);
    let mut element = IconElement::new(
        context,
        host.clone(),
        Rc::new(Surface),
        Rc::new(ManualScheduler::new()),
    )
    .with_target(target.clone());
    element.load(IconSource::Named("lock".into())).unwrap();
    element.set_trigger(Some("loop-on-hover")).unwrap();
    element.connect().unwrap();

    assert!(host.listeners().is_empty());
    assert_eq!(
        target.listeners(),
        vec![EventKind::PointerEnter, EventKind::PointerLeave]
    );
}
