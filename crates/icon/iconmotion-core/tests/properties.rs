mod common;

use common::connected_player;
use iconmotion_core::{
    ColorInput, EngineCall, HeadlessEngine, HeadlessHandle, IconError, Palette, Player,
    PlayerEvent, Point, PropertyBundle,
};
use iconmotion_props::PropsError;
use serde_json::Value;

const PRIMARY: &str = "renderer.elements.0.effectsManager.effectElements.0.effectElements.0.p.v";
const STROKE_A: &str = "renderer.elements.0.effectsManager.effectElements.2.effectElements.0.p.v";
const STROKE_B: &str = "renderer.elements.2.effectsManager.effectElements.3.effectElements.0.p.v";
const AXIS: &str = "renderer.elements.0.effectsManager.effectElements.4.effectElements.0.p.v";

fn lock() -> (HeadlessEngine, Player, HeadlessHandle) {
    let engine = HeadlessEngine::new();
    let player = connected_player(&engine, "lock");
    let handle = engine.last().unwrap();
    (engine, player, handle)
}

/// Numbers at `path`, ignoring the integer/float distinction.
fn live(handle: &HeadlessHandle, path: &str) -> Vec<f64> {
    match handle.read(path) {
        Some(Value::Number(n)) => n.as_f64().into_iter().collect(),
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_f64).collect(),
        _ => Vec::new(),
    }
}

/// Live value of every catalogued property.
fn snapshot(player: &mut Player, handle: &HeadlessHandle) -> Vec<Vec<f64>> {
    let paths: Vec<String> = player
        .properties()
        .unwrap()
        .iter()
        .map(|d| d.path.to_string())
        .collect();
    paths.iter().map(|p| live(handle, p)).collect()
}

#[test]
fn colors_get_set_delete() {
    let (_engine, mut player, handle) = lock();
    assert_eq!(player.get_color("primary").unwrap().as_deref(), Some("#121331"));
    assert_eq!(player.get_color("Secondary").unwrap().as_deref(), Some("#08a841"));
    assert_eq!(player.get_color("missing").unwrap(), None);
    assert_eq!(player.color_names().unwrap(), vec!["primary", "secondary"]);

    player.set_color("primary", "red").unwrap();
    assert_eq!(live(&handle, PRIMARY), vec![1.0, 0.0, 0.0]);
    assert_eq!(player.get_color("primary").unwrap().as_deref(), Some("#ff0000"));

    player
        .set_color("primary", ColorInput::Rgb { r: 0.0, g: 255.0, b: 0.0 })
        .unwrap();
    assert_eq!(player.get_color("primary").unwrap().as_deref(), Some("#00ff00"));

    player.delete_color("primary").unwrap();
    assert_eq!(live(&handle, PRIMARY), vec![0.071, 0.075, 0.192, 1.0]);
}

#[test]
fn invalid_color_leaves_tree_untouched() {
    let (_engine, mut player, handle) = lock();
    let err = player.set_color("primary", "not-a-color").unwrap_err();
    assert!(matches!(err, IconError::Props(PropsError::InvalidColor(_))));
    assert_eq!(player.get_color("primary").unwrap().as_deref(), Some("#121331"));
    assert_eq!(live(&handle, PRIMARY), vec![0.071, 0.075, 0.192, 1.0]);
}

#[test]
fn palette_replaces_every_slot() {
    let (_engine, mut player, _handle) = lock();
    player.set_color("secondary", "#000").unwrap();

    let mut palette = Palette::new();
    palette.insert("primary".into(), "#ffffff".into());
    player.set_palette(&palette).unwrap();

    let live = player.palette().unwrap();
    assert_eq!(
        live.iter().collect::<Vec<_>>(),
        vec![
            (&"primary".to_string(), &"#ffffff".to_string()),
            (&"secondary".to_string(), &"#08a841".to_string()),
        ]
    );
}

#[test]
fn stroke_scales_against_each_default() {
    let (_engine, mut player, handle) = lock();
    assert_eq!(player.stroke().unwrap(), Some(50.0));

    player.set_stroke(Some(100.0)).unwrap();
    assert_eq!(live(&handle, STROKE_A), vec![4.0]);
    assert_eq!(live(&handle, STROKE_B), vec![6.0]);
    assert_eq!(player.stroke().unwrap(), Some(100.0));

    player.set_stroke(None).unwrap();
    assert_eq!(live(&handle, STROKE_A), vec![2.0]);
    assert_eq!(live(&handle, STROKE_B), vec![3.0]);
}

#[test]
fn scale_and_axis() {
    let (_engine, mut player, handle) = lock();
    assert_eq!(player.scale().unwrap(), Some(50.0));
    player.set_scale(Some(25.0)).unwrap();
    assert_eq!(player.scale().unwrap(), Some(25.0));

    assert_eq!(player.axis().unwrap(), Some(Point { x: 50.0, y: 50.0 }));
    player.set_axis(Some(Point { x: 50.0, y: 100.0 })).unwrap();
    assert_eq!(live(&handle, AXIS), vec![215.0, 430.0]);
    player.set_axis(None).unwrap();
    assert_eq!(live(&handle, AXIS), vec![215.0, 215.0]);
}

#[test]
fn state_round_trips() {
    let (_engine, mut player, _handle) = lock();
    assert_eq!(player.available_states().unwrap(), vec!["intro", "hover", "loop"]);
    assert_eq!(player.state().unwrap().as_deref(), Some("intro"));

    player.set_state(Some("Loop")).unwrap();
    assert_eq!(player.state().unwrap().as_deref(), Some("loop"));

    player.set_state(Some("hover")).unwrap();
    assert_eq!(player.state().unwrap().as_deref(), Some("hover"));

    player.set_state(None).unwrap();
    assert_eq!(player.state().unwrap(), None);

    // Unknown names deactivate everything.
    player.set_state(Some("outro")).unwrap();
    assert_eq!(player.state().unwrap(), None);
}

#[test]
fn every_mutation_refreshes() {
    let (_engine, mut player, handle) = lock();
    while player.take_event().is_some() {}
    handle.clear_calls();

    player.set_stroke(Some(10.0)).unwrap();
    player.set_state(Some("hover")).unwrap();
    assert_eq!(handle.calls(), vec![EngineCall::Render, EngineCall::Render]);
    assert_eq!(player.take_event(), Some(PlayerEvent::Refresh));
    assert_eq!(player.take_event(), Some(PlayerEvent::Refresh));
    assert_eq!(player.take_event(), None);
}

fn bundle() -> PropertyBundle {
    let mut colors = Palette::new();
    colors.insert("primary".into(), "red".into());
    PropertyBundle {
        colors: Some(colors),
        stroke: Some(80.0),
        axis: Some(Point { x: 40.0, y: 60.0 }),
        ..Default::default()
    }
}

#[test]
fn first_apply_fast_path_matches_full_reset() {
    let (_ea, mut fresh, fresh_handle) = lock();
    let (_eb, mut used, used_handle) = lock();

    used.set_color("secondary", "#123456").unwrap();
    used.set_state(Some("hover")).unwrap();
    used.set_scale(Some(10.0)).unwrap();
    used.set_stroke(Some(5.0)).unwrap();

    fresh.reset_properties(&bundle()).unwrap();
    used.reset_properties(&bundle()).unwrap();
    assert_eq!(
        snapshot(&mut fresh, &fresh_handle),
        snapshot(&mut used, &used_handle)
    );

    // A second bulk apply with a smaller bundle resets what the first set.
    let only_state = PropertyBundle {
        state: Some("loop".into()),
        ..Default::default()
    };
    fresh.reset_properties(&only_state).unwrap();
    let (_ec, mut other, other_handle) = lock();
    other.reset_properties(&only_state).unwrap();
    assert_eq!(
        snapshot(&mut fresh, &fresh_handle),
        snapshot(&mut other, &other_handle)
    );
    assert_eq!(fresh.state().unwrap().as_deref(), Some("loop"));
}

#[test]
fn bulk_apply_rejects_bad_colors_before_writing() {
    let (_engine, mut player, handle) = lock();
    let before = snapshot(&mut player, &handle);
    let mut colors = Palette::new();
    colors.insert("primary".into(), "#zzzzzz".into());
    let bad = PropertyBundle {
        colors: Some(colors),
        stroke: Some(90.0),
        ..Default::default()
    };
    assert!(player.reset_properties(&bad).is_err());
    assert_eq!(snapshot(&mut player, &handle), before);
}

#[test]
fn players_do_not_share_catalogues() {
    let engine = HeadlessEngine::new();
    let mut a = connected_player(&engine, "lock");
    let handle_a = engine.last().unwrap();
    let mut b = connected_player(&engine, "lock");
    let handle_b = engine.last().unwrap();

    a.set_stroke(Some(100.0)).unwrap();
    assert_eq!(live(&handle_a, STROKE_A), vec![4.0]);
    assert_eq!(live(&handle_b, STROKE_A), vec![2.0]);
    assert_eq!(b.stroke().unwrap(), Some(50.0));
}

#[test]
fn icon_without_change_layers_is_inert() {
    let engine = HeadlessEngine::new();
    let mut player = connected_player(&engine, "plain");
    assert!(player.properties().unwrap().is_empty());
    assert_eq!(player.stroke().unwrap(), None);
    assert_eq!(player.state().unwrap(), None);
    player.set_stroke(Some(10.0)).unwrap();
    player.set_color("primary", "red").unwrap();
    assert!(player.palette().unwrap().is_empty());
}
