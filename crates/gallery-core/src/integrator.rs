//! Per-frame free movement: damped velocity, collision-checked displacement,
//! and avatar turning/animation in third person.

use crate::collision::{resolve_displacement, Displacement, Raycast, SafetyProfile};
use crate::config::GalleryConfig;
use crate::constants::VELOCITY_EPSILON;
use crate::input::InputIntent;
use crate::rig::{shortest_arc, AvatarPose, CameraRig, ViewMode};
use glam::{Vec2, Vec3};
use instant::Instant;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    #[default]
    Idle,
    Moving,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepOutcome {
    pub moved: bool,
    pub blocked: bool,
    /// Set on the frame the avatar animation changes.
    pub animation: Option<AnimationState>,
}

#[derive(Clone, Debug, Default)]
pub struct MotionIntegrator {
    /// `x` is right, `y` is forward, in units per frame.
    velocity: Vec2,
    animation: AnimationState,
    last_moved: Option<Instant>,
}

impl MotionIntegrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn animation(&self) -> AnimationState {
        self.animation
    }

    /// Drops residual velocity, e.g. when a scripted transition takes over.
    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    /// Keeps the avatar in its moving animation while something else drives
    /// it. Returns the new state on the frame it changes.
    pub fn mark_moving(&mut self, now: Instant) -> Option<AnimationState> {
        self.last_moved = Some(now);
        if self.animation == AnimationState::Moving {
            return None;
        }
        self.animation = AnimationState::Moving;
        Some(AnimationState::Moving)
    }

    pub fn step(
        &mut self,
        intent: &InputIntent,
        rig: &mut CameraRig,
        world: &impl Raycast,
        cfg: &GalleryConfig,
        now: Instant,
    ) -> StepOutcome {
        let mut out = StepOutcome::default();
        let Some(position) = rig.body_position() else {
            return out;
        };

        if !intent.active && self.velocity.length() < VELOCITY_EPSILON {
            self.velocity = Vec2::ZERO;
            out.animation = self.settle(rig.mode(), cfg, now);
            return out;
        }

        let push = if intent.active {
            intent.direction() * cfg.movement.move_speed
        } else {
            Vec2::ZERO
        };
        self.velocity = self.velocity * cfg.movement.damping + push;
        if !intent.active && self.velocity.length() < VELOCITY_EPSILON {
            self.velocity = Vec2::ZERO;
        }

        // basis is read before any pose change this frame
        let (forward, right) = rig.movement_basis();
        let to_world = |v: Vec2| right * v.x + forward * v.y;
        let displacement = to_world(self.velocity);
        let impulse = to_world(push);

        let mode = rig.mode();
        let profile = match mode {
            ViewMode::FirstPerson => SafetyProfile::camera(&cfg.collision),
            ViewMode::ThirdPerson => SafetyProfile::avatar(&cfg.collision),
        };

        match resolve_displacement(position, displacement, impulse, world, &profile) {
            Displacement::Blocked => {
                out.blocked = true;
            }
            resolved => {
                if let Some(offset) = resolved.offset() {
                    rig.translate_body(offset);
                    out.moved = true;
                    if mode == ViewMode::ThirdPerson {
                        out.animation = self.turn_avatar(rig, offset, cfg, now);
                    }
                }
            }
        }

        if out.animation.is_none() {
            out.animation = self.settle(mode, cfg, now);
        }
        out
    }

    fn turn_avatar(
        &mut self,
        rig: &mut CameraRig,
        offset: Vec3,
        cfg: &GalleryConfig,
        now: Instant,
    ) -> Option<AnimationState> {
        if let Some(avatar) = rig.avatar_pose() {
            let target = AvatarPose::yaw_towards(offset);
            let turn = shortest_arc(avatar.yaw, target) * cfg.movement.avatar_turn_rate;
            rig.set_avatar_yaw(avatar.yaw + turn);
        }
        self.mark_moving(now)
    }

    /// Falls back to idle once nothing has moved for the idle timeout.
    fn settle(
        &mut self,
        mode: ViewMode,
        cfg: &GalleryConfig,
        now: Instant,
    ) -> Option<AnimationState> {
        if self.animation != AnimationState::Moving {
            return None;
        }
        let idle = match (mode, self.last_moved) {
            (ViewMode::ThirdPerson, Some(t)) => now >= t + cfg.movement.avatar_idle_timeout(),
            _ => true,
        };
        if idle {
            self.animation = AnimationState::Idle;
            return Some(AnimationState::Idle);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::CollidableSet;
    use crate::input::IntentSource;
    use crate::rig::Orientation;

    fn forward_intent() -> InputIntent {
        InputIntent {
            move_forward: 1.0,
            move_right: 0.0,
            source: IntentSource::Keyboard,
            active: true,
        }
    }

    #[test]
    fn forward_follows_look_direction() {
        let cfg = GalleryConfig::default();
        let mut rig = CameraRig::new(&cfg.movement);
        rig.init_camera(Vec3::ZERO, Orientation::new(std::f32::consts::FRAC_PI_2, 0.0));
        let mut m = MotionIntegrator::new();
        m.step(&forward_intent(), &mut rig, &CollidableSet::default(), &cfg, Instant::now());
        let p = rig.camera_pose().unwrap().position;
        // yaw +90 degrees looks down -X
        assert!(p.x < 0.0);
        assert!(p.z.abs() < 1e-6);
    }

    #[test]
    fn velocity_decays_to_rest() {
        let cfg = GalleryConfig::default();
        let mut rig = CameraRig::new(&cfg.movement);
        rig.init_camera(Vec3::ZERO, Orientation::default());
        let mut m = MotionIntegrator::new();
        let world = CollidableSet::default();
        let now = Instant::now();
        m.step(&forward_intent(), &mut rig, &world, &cfg, now);
        for _ in 0..200 {
            m.step(&InputIntent::IDLE, &mut rig, &world, &cfg, now);
        }
        assert_eq!(m.velocity(), Vec2::ZERO);
    }

    #[test]
    fn uninitialized_rig_is_a_no_op() {
        let cfg = GalleryConfig::default();
        let mut rig = CameraRig::new(&cfg.movement);
        let mut m = MotionIntegrator::new();
        let world = CollidableSet::default();
        let out = m.step(&forward_intent(), &mut rig, &world, &cfg, Instant::now());
        assert_eq!(out, StepOutcome::default());
        assert_eq!(m.velocity(), Vec2::ZERO);
    }
}
