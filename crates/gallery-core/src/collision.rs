//! Probe-based collision against the static level geometry.
//!
//! Bodies are points moving in the horizontal plane. A move is tested with a
//! short ray (three rays for the wide avatar) and refused when any collider
//! sits closer than the body's safety distance.

use crate::config::CollisionConfig;
use crate::constants::MIN_MOVE_DISTANCE;
use crate::scene::{Aabb, Scene};
use glam::{Quat, Vec3};
use smallvec::SmallVec;

#[derive(Clone, Debug)]
pub struct Collider {
    pub name: String,
    pub bounds: Aabb,
    /// Thin geometry that is easy to clip through gets a larger clearance.
    pub thin: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct RayHit<'a> {
    pub distance: f32,
    pub collider: &'a Collider,
}

pub type Hits<'a> = SmallVec<[RayHit<'a>; 4]>;

/// Ray queries over a set of colliders. `dir` must be unit length.
pub trait Raycast {
    /// Every hit closer than `max_distance`, nearest first.
    fn raycast_all(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Hits<'_>;

    fn raycast(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<RayHit<'_>> {
        self.raycast_all(origin, dir, max_distance).into_iter().next()
    }

    fn is_empty(&self) -> bool;
}

/// Colliders registered once after the level loads.
#[derive(Clone, Debug, Default)]
pub struct CollidableSet {
    colliders: Vec<Collider>,
}

impl CollidableSet {
    pub fn from_scene(
        scene: &Scene,
        include: impl Fn(&str) -> bool,
        thin: impl Fn(&str) -> bool,
    ) -> Self {
        scene
            .objects
            .iter()
            .filter(|o| include(&o.name))
            .map(|o| Collider {
                name: o.name.clone(),
                bounds: o.bounds,
                thin: thin(&o.name),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collider> {
        self.colliders.iter()
    }
}

impl FromIterator<Collider> for CollidableSet {
    fn from_iter<T: IntoIterator<Item = Collider>>(iter: T) -> Self {
        Self {
            colliders: iter.into_iter().collect(),
        }
    }
}

impl Raycast for CollidableSet {
    fn raycast_all(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Hits<'_> {
        let mut hits: Hits<'_> = self
            .colliders
            .iter()
            .filter_map(|c| {
                c.bounds
                    .ray_entry(origin, dir)
                    .filter(|t| *t < max_distance)
                    .map(|distance| RayHit {
                        distance,
                        collider: c,
                    })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

/// Clearance rules for one kind of moving body.
#[derive(Clone, Copy, Debug)]
pub struct SafetyProfile {
    pub distance: f32,
    pub thin_distance: f32,
    /// Angle of the extra left/right probes, if the body is wide.
    pub side_probe_angle: Option<f32>,
}

impl SafetyProfile {
    pub fn camera(cfg: &CollisionConfig) -> Self {
        Self {
            distance: cfg.camera_safety,
            thin_distance: cfg.thin_obstacle_safety,
            side_probe_angle: None,
        }
    }

    pub fn avatar(cfg: &CollisionConfig) -> Self {
        Self {
            distance: cfg.avatar_safety,
            thin_distance: cfg.thin_obstacle_safety,
            side_probe_angle: Some(cfg.side_probe_angle),
        }
    }

    pub fn distance_for(&self, collider: &Collider) -> f32 {
        if collider.thin {
            self.distance.max(self.thin_distance)
        } else {
            self.distance
        }
    }

    fn reach(&self) -> f32 {
        self.distance.max(self.thin_distance)
    }

    fn probes(&self, dir: Vec3) -> SmallVec<[Vec3; 3]> {
        let mut probes = SmallVec::new();
        probes.push(dir);
        if let Some(angle) = self.side_probe_angle {
            probes.push(Quat::from_rotation_y(angle) * dir);
            probes.push(Quat::from_rotation_y(-angle) * dir);
        }
        probes
    }
}

pub fn is_movement_allowed(
    current: Vec3,
    target: Vec3,
    world: &impl Raycast,
    profile: &SafetyProfile,
) -> bool {
    let delta = target - current;
    let dist = delta.length();
    if dist < MIN_MOVE_DISTANCE || world.is_empty() {
        return true;
    }
    let dir = delta / dist;
    for probe in profile.probes(dir) {
        for hit in world.raycast_all(current, probe, profile.reach()) {
            if hit.distance < profile.distance_for(hit.collider) {
                log::debug!(
                    "[collision] blocked by {} at {:.2}",
                    hit.collider.name,
                    hit.distance
                );
                return false;
            }
        }
    }
    true
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Displacement {
    Full(Vec3),
    Partial(Vec3),
    Blocked,
}

impl Displacement {
    pub fn offset(&self) -> Option<Vec3> {
        match *self {
            Displacement::Full(v) | Displacement::Partial(v) => Some(v),
            Displacement::Blocked => None,
        }
    }
}

/// Resolves one frame of movement. Falls back, in order, to the frame's fresh
/// input impulse alone and then to each horizontal axis of the displacement,
/// so a body pressed against a wall can still steer away or slide along it.
pub fn resolve_displacement(
    current: Vec3,
    displacement: Vec3,
    impulse: Vec3,
    world: &impl Raycast,
    profile: &SafetyProfile,
) -> Displacement {
    if is_movement_allowed(current, current + displacement, world, profile) {
        return Displacement::Full(displacement);
    }
    let along_x = Vec3::new(displacement.x, 0.0, 0.0);
    let along_z = Vec3::new(0.0, 0.0, displacement.z);
    let (major, minor) = if along_x.length_squared() >= along_z.length_squared() {
        (along_x, along_z)
    } else {
        (along_z, along_x)
    };
    for candidate in [impulse, major, minor] {
        if candidate.length() < MIN_MOVE_DISTANCE {
            continue;
        }
        if is_movement_allowed(current, current + candidate, world, profile) {
            return Displacement::Partial(candidate);
        }
    }
    Displacement::Blocked
}

/// Pulls a relocation target back so it keeps `safety` clearance from
/// anything on the way, then nudges it off nearby walls.
pub fn find_nearest_safe_position(
    current: Vec3,
    target: Vec3,
    world: &impl Raycast,
    safety: f32,
) -> Vec3 {
    if world.is_empty() {
        return target;
    }
    let mut safe = target;
    let delta = target - current;
    let dist = delta.length();
    if dist >= MIN_MOVE_DISTANCE {
        let dir = delta / dist;
        if let Some(hit) = world.raycast(current, dir, dist + safety) {
            let reach = (hit.distance - safety).max(0.0);
            log::debug!(
                "[collision] clamp {:.2} -> {:.2} before {}",
                dist,
                reach,
                hit.collider.name
            );
            safe = current + dir * reach;
        }
    }
    for axis in [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z] {
        if let Some(hit) = world.raycast(safe, axis, safety) {
            safe -= axis * (safety - hit.distance);
        }
    }
    safe
}
