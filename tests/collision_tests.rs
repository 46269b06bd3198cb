// Host-side tests for probe collision and safe relocation.

mod common;

use common::{approx_vec3, wall_at_z};
use gallery_core::collision::{
    find_nearest_safe_position, is_movement_allowed, resolve_displacement, Collider, Displacement,
};
use gallery_core::config::{CollisionConfig, SceneRules};
use gallery_core::scene::{Aabb, Scene};
use gallery_core::{CollidableSet, Raycast, SafetyProfile};
use glam::Vec3;

fn single_wall(z: f32) -> CollidableSet {
    let scene = Scene {
        objects: vec![wall_at_z("north_wall", z)],
    };
    let rules = SceneRules::default();
    CollidableSet::from_scene(&scene, |n| rules.is_collidable(n), |n| rules.is_thin(n))
}

#[test]
fn closer_than_safety_is_blocked_far_enough_is_allowed() {
    let profile = SafetyProfile::camera(&CollisionConfig::default());
    let s = profile.distance;
    let origin = Vec3::new(0.0, 2.5, 0.0);
    let step = 0.05;
    for i in 1..40 {
        let d = i as f32 * 0.1;
        let set = single_wall(-d);
        let allowed = is_movement_allowed(origin, origin + Vec3::NEG_Z * step, &set, &profile);
        if d < s {
            assert!(!allowed, "wall at {d} should block");
        }
        if d >= step + s {
            assert!(allowed, "wall at {d} should not block");
        }
    }
}

#[test]
fn tiny_moves_are_not_probed() {
    let profile = SafetyProfile::camera(&CollisionConfig::default());
    let set = single_wall(-0.2);
    let origin = Vec3::new(0.0, 2.5, 0.0);
    assert!(is_movement_allowed(
        origin,
        origin + Vec3::new(0.0, 0.0, -0.0005),
        &set,
        &profile
    ));
}

#[test]
fn empty_set_allows_everything() {
    let profile = SafetyProfile::avatar(&CollisionConfig::default());
    let set = CollidableSet::default();
    assert!(set.is_empty());
    assert!(is_movement_allowed(Vec3::ZERO, Vec3::new(0.0, 0.0, -100.0), &set, &profile));
    let target = Vec3::new(3.0, 2.5, 3.0);
    assert_eq!(find_nearest_safe_position(Vec3::ZERO, target, &set, 1.5), target);
}

#[test]
fn moving_away_from_a_close_wall_is_allowed() {
    let profile = SafetyProfile::camera(&CollisionConfig::default());
    let set = single_wall(-1.0);
    let origin = Vec3::new(0.0, 2.5, 0.0);
    assert!(!is_movement_allowed(origin, origin + Vec3::NEG_Z * 0.1, &set, &profile));
    assert!(is_movement_allowed(origin, origin + Vec3::Z * 0.1, &set, &profile));
}

#[test]
fn thin_obstacles_keep_a_wider_berth() {
    let cfg = CollisionConfig::default();
    let camera = SafetyProfile::camera(&cfg);
    let thin: CollidableSet = std::iter::once(Collider {
        name: "C-组件#1_1".into(),
        bounds: Aabb::new(Vec3::new(-5.0, 0.0, -2.05), Vec3::new(5.0, 4.0, -2.0)),
        thin: true,
    })
    .collect();
    let origin = Vec3::new(0.0, 2.5, 0.0);
    let target = origin + Vec3::NEG_Z * 0.05;
    // 2.0 away clears the camera's own distance but not the thin-obstacle one
    assert!(!is_movement_allowed(origin, target, &thin, &camera));

    let thick = single_wall(-2.0);
    assert!(is_movement_allowed(origin, target, &thick, &camera));
}

#[test]
fn thin_flag_comes_from_rules() {
    let scene = Scene {
        objects: vec![
            gallery_core::SceneObject::new(
                "C-组件#1_1",
                Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0)),
            ),
            gallery_core::SceneObject::new(
                "sofa",
                Aabb::new(Vec3::new(3.0, 0.0, 0.0), Vec3::new(4.0, 1.0, 1.0)),
            ),
        ],
    };
    let rules = SceneRules::default();
    let set = CollidableSet::from_scene(&scene, |n| rules.is_collidable(n), |n| rules.is_thin(n));
    assert_eq!(set.len(), 1);
    assert!(set.iter().all(|c| c.thin));
}

#[test]
fn blocked_push_with_fresh_impulse_away_resumes() {
    let profile = SafetyProfile::camera(&CollisionConfig::default());
    let set = single_wall(-1.4);
    let origin = Vec3::new(0.0, 2.5, 0.0);
    let residual = Vec3::new(0.0, 0.0, -0.03);
    let away = Vec3::new(0.0, 0.0, 0.0125);
    assert_eq!(
        resolve_displacement(origin, residual, Vec3::NEG_Z * 0.0125, &set, &profile),
        Displacement::Blocked
    );
    assert_eq!(
        resolve_displacement(origin, residual + away, away, &set, &profile),
        Displacement::Partial(away)
    );
}

#[test]
fn safe_position_clamps_before_wall() {
    let set = single_wall(-4.0);
    let current = Vec3::new(0.0, 2.5, 0.0);
    let safe = find_nearest_safe_position(current, Vec3::new(0.0, 2.5, -3.5), &set, 1.5);
    assert!(approx_vec3(safe, Vec3::new(0.0, 2.5, -2.5), 1e-4), "{safe:?}");
}

#[test]
fn safe_position_never_goes_backwards() {
    let set = single_wall(-1.0);
    let current = Vec3::new(0.0, 2.5, 0.0);
    let safe = find_nearest_safe_position(current, Vec3::new(0.0, 2.5, -3.0), &set, 1.5);
    // clamped to the start, then nudged off the wall it is too close to
    assert!(safe.z >= 0.0 - 1e-4);
    assert!(safe.z <= 0.5 + 1e-4);
}

#[test]
fn raycast_reports_nearest_first() {
    let scene = Scene {
        objects: vec![wall_at_z("far_wall", -8.0), wall_at_z("near_wall", -3.0)],
    };
    let rules = SceneRules::default();
    let set = CollidableSet::from_scene(&scene, |n| rules.is_collidable(n), |_| false);
    let hit = set
        .raycast(Vec3::new(0.0, 2.5, 0.0), Vec3::NEG_Z, 100.0)
        .unwrap();
    assert_eq!(hit.collider.name, "near_wall");
    assert!((hit.distance - 3.0).abs() < 1e-4);
    assert_eq!(
        set.raycast_all(Vec3::new(0.0, 2.5, 0.0), Vec3::NEG_Z, 100.0).len(),
        2
    );
}
