// Shared fixtures for the host-side walkthrough tests.

#![allow(dead_code)]

use gallery_core::scene::{Aabb, Scene, SceneObject};
use gallery_core::{ArtworkCatalog, ArtworkMetadata, Gallery, GalleryConfig};
use glam::Vec3;
use instant::Instant;
use std::time::Duration;

pub fn at(t0: Instant, ms: u64) -> Instant {
    t0 + Duration::from_millis(ms)
}

pub fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

pub fn approx_vec3(a: Vec3, b: Vec3, eps: f32) -> bool {
    a.abs_diff_eq(b, eps)
}

pub fn floor() -> SceneObject {
    SceneObject::new(
        "floor003",
        Aabb::new(Vec3::new(-50.0, -0.1, -50.0), Vec3::new(50.0, 0.0, 50.0)),
    )
}

/// Wall spanning x, facing +Z, whose near face sits at `z`.
pub fn wall_at_z(name: &str, z: f32) -> SceneObject {
    SceneObject::new(
        name,
        Aabb::new(Vec3::new(-20.0, 0.0, z - 0.3), Vec3::new(20.0, 5.0, z)),
    )
}

/// Painting hung on a wall, front face towards +Z.
pub fn painting(name: &str, center: Vec3, size: Vec3) -> SceneObject {
    SceneObject::new(name, Aabb::from_center_size(center, size)).with_forward(Vec3::Z)
}

pub fn metadata(id: &str) -> ArtworkMetadata {
    ArtworkMetadata {
        id: id.into(),
        title: format!("{id} title"),
        author: "A. Painter".into(),
        description: "oil on canvas".into(),
        image: format!("/img/{id}.jpg"),
        owner: None,
    }
}

pub fn open_room() -> Scene {
    Scene {
        objects: vec![
            floor(),
            painting("pic07", Vec3::new(0.0, 2.5, -12.0), Vec3::new(1.6, 1.2, 0.05)),
            painting("pic08", Vec3::new(6.0, 2.5, -12.0), Vec3::new(1.6, 1.2, 0.05)),
        ],
    }
}

/// Gallery with the scene installed and a catalog holding pic07 remotely
/// and pic08 as an empty booth.
pub fn gallery(scene: &Scene) -> Gallery<ArtworkCatalog> {
    let mut catalog = ArtworkCatalog::new();
    catalog.set_remote([metadata("pic07")]);
    let mut g = Gallery::new(GalleryConfig::default(), catalog);
    g.install_scene(scene).expect("scene installs");
    let ids: Vec<String> = g.painting_ids().map(str::to_string).collect();
    g.provider_mut()
        .register_positions(ids.iter().map(String::as_str));
    g
}

/// Ticks at 60 Hz from `start` for `frames` frames, returning the last time.
pub fn run_frames(g: &mut Gallery<ArtworkCatalog>, start: Instant, frames: u32) -> Instant {
    let mut now = start;
    for _ in 0..frames {
        now += Duration::from_micros(16_667);
        g.tick(now);
    }
    now
}
