// Host-side tests for pure browser input helpers.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use gallery_core::{LoadStage, PointerKind};
use glam::Vec2;
use input::*;
use instant::Instant;
use std::time::Duration;

#[test]
fn key_codes_map_to_actions() {
    for code in ["KeyW", "KeyA", "KeyS", "KeyD"] {
        assert_eq!(key_action(code), KeyAction::Move);
    }
    assert_eq!(key_action("KeyV"), KeyAction::ToggleView);
    assert_eq!(key_action("Space"), KeyAction::Ignore);
    assert_eq!(key_action("ArrowUp"), KeyAction::Ignore);
}

#[test]
fn form_fields_swallow_keys() {
    assert!(is_text_entry("INPUT"));
    assert!(is_text_entry("textarea"));
    assert!(!is_text_entry("CANVAS"));
    assert!(!is_text_entry("DIV"));
}

#[test]
fn pen_and_touch_use_touch_sensitivity() {
    assert_eq!(pointer_kind("touch"), PointerKind::Touch);
    assert_eq!(pointer_kind("pen"), PointerKind::Touch);
    assert_eq!(pointer_kind("mouse"), PointerKind::Mouse);
    assert_eq!(pointer_kind(""), PointerKind::Mouse);
}

#[test]
fn ndc_corners_and_center() {
    let ndc = |x, y| client_to_ndc(Vec2::new(x, y), 10.0, 20.0, 200.0, 100.0).unwrap();
    assert_eq!(ndc(110.0, 70.0), Vec2::ZERO);
    assert_eq!(ndc(10.0, 20.0), Vec2::new(-1.0, 1.0));
    assert_eq!(ndc(210.0, 120.0), Vec2::new(1.0, -1.0));
    assert!(client_to_ndc(Vec2::ZERO, 0.0, 0.0, 0.0, 100.0).is_none());
}

#[test]
fn stick_input_is_sanitized() {
    assert_eq!(stick_input(0.5, 0.5, 3.0), (Vec2::new(0.5, 0.5), 1.0));
    assert_eq!(stick_input(f32::NAN, 1.0, 0.5), (Vec2::ZERO, 0.0));
    assert_eq!(stick_input(0.0, 1.0, f32::INFINITY), (Vec2::ZERO, 0.0));
}

#[test]
fn stage_names() {
    assert_eq!(load_stage("environment"), Some(LoadStage::Environment));
    assert_eq!(load_stage("finalize"), Some(LoadStage::Finalize));
    assert_eq!(load_stage("Model"), None);
}

#[test]
fn tracker_reports_deltas_only_while_pressed() {
    let mut t = PointerTracker::default();
    assert_eq!(t.moved(Vec2::new(5.0, 5.0)), None);
    t.down(Vec2::new(10.0, 10.0));
    assert!(t.is_down());
    assert_eq!(t.moved(Vec2::new(14.0, 7.0)), Some(Vec2::new(4.0, -3.0)));
    assert_eq!(t.moved(Vec2::new(15.0, 7.0)), Some(Vec2::new(1.0, 0.0)));
    assert!(t.up());
    assert!(!t.up());
    assert_eq!(t.moved(Vec2::new(20.0, 20.0)), None);
}

#[test]
fn hover_picks_are_throttled() {
    let t0 = Instant::now();
    let interval = Duration::from_millis(50);
    let mut t = PointerTracker::default();
    assert!(t.hover_due(t0, interval));
    assert!(!t.hover_due(t0 + Duration::from_millis(20), interval));
    assert!(t.hover_due(t0 + Duration::from_millis(50), interval));
}
