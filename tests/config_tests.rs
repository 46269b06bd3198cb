// Host-side tests for config documents, scene documents and viewing poses.

mod common;

use common::{approx, approx_vec3};
use gallery_core::config::ViewingConfig;
use gallery_core::error::{ConfigError, SceneError};
use gallery_core::scene::{Painting, Scene, SceneIndex};
use gallery_core::viewing::{fitting_distance, viewing_pose};
use gallery_core::GalleryConfig;
use glam::Vec3;

#[test]
fn empty_document_is_the_default_config() {
    let cfg = GalleryConfig::from_json("{}").unwrap();
    let def = GalleryConfig::default();
    assert_eq!(cfg.movement.move_speed, def.movement.move_speed);
    assert_eq!(cfg.collision.camera_safety, 1.5);
    assert_eq!(cfg.collision.avatar_safety, 2.0);
    assert_eq!(cfg.transitions.fly_duration().as_millis(), 1000);
    assert_eq!(cfg.movement.key_release_debounce().as_millis(), 50);
}

#[test]
fn vectors_read_as_arrays() {
    let cfg = GalleryConfig::from_json(
        r#"{ "movement": { "initial_position": [1.0, 2.5, -4.0] },
             "map_points": [
               { "id": "lobby", "label": "Lobby",
                 "position": [0.0, 2.5, 0.0], "look_at": [0.0, 2.5, -1.0],
                 "map": [10.0, 20.0] } ] }"#,
    )
    .unwrap();
    assert_eq!(cfg.movement.initial_position, Vec3::new(1.0, 2.5, -4.0));
    assert_eq!(cfg.map_points.iter().count(), 1);
    assert!(cfg.map_points.get("lobby").is_some());
    assert!(cfg.map_points.get("leisure-area").is_none());
}

#[test]
fn malformed_documents_are_rejected() {
    assert!(matches!(
        GalleryConfig::from_json("{ movement: 1 }"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        GalleryConfig::from_json(r#"{ "collision": { "camera_safety": 0.0 } }"#),
        Err(ConfigError::OutOfRange { field: "collision.camera_safety", .. })
    ));
    assert!(matches!(
        GalleryConfig::from_json(r#"{ "viewing": { "fov_degrees": 180.0 } }"#),
        Err(ConfigError::OutOfRange { field: "viewing.fov_degrees", .. })
    ));
    assert!(matches!(
        GalleryConfig::from_json(r#"{ "movement": { "third_person_pitch": [1.0, -1.0] } }"#),
        Err(ConfigError::PitchRange { mode: "third person", .. })
    ));
}

#[test]
fn absurd_durations_are_rejected() {
    let err = GalleryConfig::from_json(
        r#"{ "movement": { "key_release_debounce_ms": 18446744073709551615 } }"#,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::DurationTooLong { field: "movement.key_release_debounce_ms", .. }
    ));

    let err = GalleryConfig::from_json(r#"{ "transitions": { "fade_duration_ms": 600000 } }"#)
        .unwrap_err();
    assert!(matches!(err, ConfigError::DurationTooLong { value: 600000, .. }));

    let cfg = GalleryConfig::from_json(r#"{ "transitions": { "fly_duration_ms": 60000 } }"#)
        .unwrap();
    assert_eq!(cfg.transitions.fly_duration_ms, 60_000);
}

#[test]
fn duplicate_map_points_are_rejected() {
    let point =
        r#"{ "id": "a", "label": "A", "position": [0,0,0], "look_at": [0,0,1], "map": [0,0] }"#;
    let doc = format!(r#"{{ "map_points": [{point}, {point}] }}"#);
    let err = GalleryConfig::from_json(&doc).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateMapPoint(id) if id == "a"));
}

#[test]
fn scene_document_parses_and_checks_bounds() {
    let scene = Scene::from_json(
        r#"{ "objects": [
            { "name": "floor003", "bounds": { "min": [-5,-0.1,-5], "max": [5,0,5] },
              "position": [0,0,0] },
            { "name": "pic07", "bounds": { "min": [-0.8,1.9,-6.05], "max": [0.8,3.1,-6.0] },
              "position": [0,2.5,-6.0], "forward": [0,0,1] } ] }"#,
    )
    .unwrap();
    let index = SceneIndex::build(&scene, &GalleryConfig::default().scene);
    assert_eq!(index.floor_count, 1);
    let p = index.painting("pic07").unwrap();
    assert!(approx(p.size.x, 1.6, 1e-5));

    let bad = Scene::from_json(
        r#"{ "objects": [ { "name": "x", "bounds": { "min": [1,0,0], "max": [0,1,1] },
             "position": [0,0,0] } ] }"#,
    );
    assert!(matches!(bad, Err(SceneError::InvertedBounds(name)) if name == "x"));
}

fn hung(forward: Vec3, size: Vec3) -> Painting {
    Painting {
        id: "pic20".into(),
        center: Vec3::new(4.0, 2.0, -6.0),
        size,
        forward,
    }
}

#[test]
fn viewing_distance_grows_with_size_and_caps() {
    let cfg = ViewingConfig::default();
    let small = fitting_distance(0.5, &cfg);
    let large = fitting_distance(2.5, &cfg);
    assert!(small < large);
    assert_eq!(fitting_distance(50.0, &cfg), cfg.max_distance);
}

#[test]
fn viewing_pose_stands_in_front_at_eye_height() {
    let cfg = ViewingConfig::default();
    let p = hung(Vec3::X, Vec3::new(0.05, 1.2, 1.6));
    let pose = viewing_pose(&p, &cfg, 2.5, false);
    assert!(pose.position.x > p.center.x);
    assert!(approx(pose.position.z, p.center.z, 1e-5));
    assert!(approx(pose.position.y, 2.5, 1e-6));
    let look = (pose.look_at - pose.position).normalize();
    assert!(approx_vec3(look, Vec3::NEG_X, 1e-5));

    let back = viewing_pose(&p, &cfg, 2.5, true);
    assert!(back.position.x < p.center.x);
}

#[test]
fn compact_viewport_backs_off_further() {
    let p = hung(Vec3::Z, Vec3::new(1.6, 1.2, 0.05));
    let wide = viewing_pose(&p, &ViewingConfig::default(), 2.5, false);
    let compact_cfg = ViewingConfig {
        compact_viewport: true,
        ..ViewingConfig::default()
    };
    let compact = viewing_pose(&p, &compact_cfg, 2.5, false);
    assert!(approx(compact.position.z - wide.position.z, 1.5, 1e-4));
}
