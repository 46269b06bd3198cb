//! Scripted camera transitions. While a tween runs it is the only writer of
//! the rig's poses.

use crate::rig::{wrap_angle, AvatarPose, CameraRig, Orientation, ViewMode};
use glam::Vec3;
use instant::Instant;
use std::f32::consts::PI;
use std::fmt;
use std::time::Duration;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    SineInOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => t * (2.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 2.0 * t - 2.0;
                    0.5 * u * u * u + 1.0
                }
            }
            Easing::SineInOut => 0.5 * (1.0 - (PI * t).cos()),
        }
    }
}

/// Parameters of a fly-to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlyTo {
    pub position: Vec3,
    pub look_at: Vec3,
    pub duration: Duration,
    pub easing: Easing,
    /// Turn the final heading half a turn for assets authored back to front.
    pub flip_facing: bool,
}

impl FlyTo {
    pub fn new(position: Vec3, look_at: Vec3, duration: Duration) -> Self {
        Self {
            position,
            look_at,
            duration,
            easing: Easing::Linear,
            flip_facing: false,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_flip(mut self, flip: bool) -> Self {
        self.flip_facing = flip;
        self
    }
}

/// What a transition was started for; handed back when it finishes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TweenPurpose {
    FloorMove,
    ViewArtwork(String),
    Teleport(String),
    Scripted,
}

type Hook = Box<dyn FnOnce()>;

/// Optional callbacks. `on_start` runs when the transition begins, `on_done`
/// only if it completes; a cancelled transition drops both silently.
#[derive(Default)]
pub struct TweenHooks {
    on_start: Option<Hook>,
    on_done: Option<Hook>,
}

impl TweenHooks {
    pub fn on_start(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_start = Some(Box::new(f));
        self
    }

    pub fn on_done(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_done = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for TweenHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenHooks")
            .field("on_start", &self.on_start.is_some())
            .field("on_done", &self.on_done.is_some())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Keyframe {
    Camera {
        position: Vec3,
        orientation: Orientation,
    },
    Avatar {
        position: Vec3,
        yaw: f32,
        orbit_yaw: f32,
    },
}

impl Keyframe {
    fn current(rig: &CameraRig) -> Option<Self> {
        match rig.mode() {
            ViewMode::FirstPerson => rig.camera_pose().map(|c| Keyframe::Camera {
                position: c.position,
                orientation: c.orientation,
            }),
            ViewMode::ThirdPerson => rig.avatar_pose().map(|a| Keyframe::Avatar {
                position: a.position,
                yaw: a.yaw,
                orbit_yaw: rig.orbit().yaw,
            }),
        }
    }

    /// Target pose for `rig`'s current mode, computed once at start.
    fn target(rig: &CameraRig, position: Vec3, look_at: Vec3, flip: bool) -> Self {
        match rig.mode() {
            ViewMode::FirstPerson => {
                let position = Vec3::new(position.x, rig.eye_height(), position.z);
                let mut orientation = Orientation::looking(position, look_at);
                if flip {
                    orientation = orientation.reversed();
                }
                Keyframe::Camera {
                    position,
                    orientation,
                }
            }
            ViewMode::ThirdPerson => {
                let mut dir = look_at - position;
                dir.y = 0.0;
                let mut yaw = AvatarPose::yaw_towards(dir);
                if flip {
                    yaw += PI;
                }
                let yaw = wrap_angle(yaw);
                Keyframe::Avatar {
                    position: Vec3::new(position.x, rig.avatar_height(), position.z),
                    yaw,
                    orbit_yaw: wrap_angle(yaw + PI),
                }
            }
        }
    }

    fn apply(rig: &mut CameraRig, from: &Keyframe, to: &Keyframe, k: f32) {
        match (from, to) {
            (
                Keyframe::Camera {
                    position: p0,
                    orientation: o0,
                },
                Keyframe::Camera {
                    position: p1,
                    orientation: o1,
                },
            ) => rig.set_camera(p0.lerp(*p1, k), o0.lerp(*o1, k)),
            (
                Keyframe::Avatar {
                    position: p0,
                    yaw: y0,
                    orbit_yaw: r0,
                },
                Keyframe::Avatar {
                    position: p1,
                    yaw: y1,
                    orbit_yaw: r1,
                },
            ) => {
                let yaw = Orientation::new(*y0, 0.0).lerp(Orientation::new(*y1, 0.0), k).yaw;
                rig.set_avatar(p0.lerp(*p1, k), yaw);
                let mut orbit = rig.orbit();
                orbit.yaw = Orientation::new(*r0, 0.0).lerp(Orientation::new(*r1, 0.0), k).yaw;
                rig.set_orbit(orbit);
            }
            // mode changed under the tween; the toggle cancels tweens first
            _ => {}
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Flying {
        from: Keyframe,
        to: Keyframe,
        started: Instant,
        duration: Duration,
        easing: Easing,
    },
    FadingOut {
        until: Instant,
        position: Vec3,
        look_at: Vec3,
    },
    FadingIn {
        until: Instant,
    },
}

struct Active {
    purpose: TweenPurpose,
    phase: Phase,
    on_done: Option<Hook>,
}

/// Reported by `TweenDirector::update`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TweenEvent {
    /// The fade overlay should become opaque (`true`) or clear (`false`).
    Fade(bool),
    Finished(TweenPurpose),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TeleportStart {
    Faded,
    Immediate,
}

/// `Idle -> Tweening -> Idle`; starting a transition replaces any running one.
#[derive(Default)]
pub struct TweenDirector {
    active: Option<Active>,
    fade_duration: Duration,
}

impl TweenDirector {
    pub fn new(fade_duration: Duration) -> Self {
        Self {
            active: None,
            fade_duration,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_flying(&self) -> bool {
        matches!(
            self.active,
            Some(Active {
                phase: Phase::Flying { .. },
                ..
            })
        )
    }

    pub fn purpose(&self) -> Option<&TweenPurpose> {
        self.active.as_ref().map(|a| &a.purpose)
    }

    pub fn cancel(&mut self) {
        if let Some(a) = self.active.take() {
            log::debug!("[tween] cancelled {:?}", a.purpose);
        }
    }

    /// Starts an eased transition from the current pose. Returns false (and
    /// runs no hooks) when the rig has no pose yet.
    pub fn fly_to(
        &mut self,
        rig: &mut CameraRig,
        fly: FlyTo,
        purpose: TweenPurpose,
        hooks: TweenHooks,
        now: Instant,
    ) -> bool {
        let Some(from) = Keyframe::current(rig) else {
            return false;
        };
        self.cancel();
        let to = Keyframe::target(rig, fly.position, fly.look_at, fly.flip_facing);
        log::info!(
            "[tween] fly {:?} -> ({:.2},{:.2},{:.2}) in {}ms",
            purpose,
            fly.position.x,
            fly.position.y,
            fly.position.z,
            fly.duration.as_millis()
        );
        rig.set_controls_enabled(false);
        let TweenHooks { on_start, on_done } = hooks;
        self.active = Some(Active {
            purpose,
            phase: Phase::Flying {
                from,
                to,
                started: now,
                duration: fly.duration,
                easing: fly.easing,
            },
            on_done,
        });
        if let Some(f) = on_start {
            f();
        }
        true
    }

    /// Relocates behind a fade. Without a fade overlay the move is immediate
    /// and the hooks run before returning.
    #[allow(clippy::too_many_arguments)]
    pub fn teleport_to(
        &mut self,
        rig: &mut CameraRig,
        position: Vec3,
        look_at: Vec3,
        fade_available: bool,
        purpose: TweenPurpose,
        hooks: TweenHooks,
        now: Instant,
    ) -> Option<TeleportStart> {
        if !rig.is_ready() {
            return None;
        }
        self.cancel();
        let TweenHooks { on_start, on_done } = hooks;
        if let Some(f) = on_start {
            f();
        }
        if !fade_available {
            log::info!("[tween] teleport {:?} without fade", purpose);
            relocate(rig, position, look_at);
            if let Some(f) = on_done {
                f();
            }
            return Some(TeleportStart::Immediate);
        }
        log::info!("[tween] teleport {:?}", purpose);
        rig.set_controls_enabled(false);
        self.active = Some(Active {
            purpose,
            phase: Phase::FadingOut {
                until: now + self.fade_duration,
                position,
                look_at,
            },
            on_done,
        });
        Some(TeleportStart::Faded)
    }

    pub fn update(&mut self, rig: &mut CameraRig, now: Instant) -> Option<TweenEvent> {
        let active = self.active.as_mut()?;
        let phase = active.phase;
        match phase {
            Phase::Flying {
                from,
                to,
                started,
                duration,
                easing,
            } => {
                let t = if duration.is_zero() {
                    1.0
                } else if now <= started {
                    0.0
                } else {
                    (now.duration_since(started).as_secs_f32() / duration.as_secs_f32()).min(1.0)
                };
                Keyframe::apply(rig, &from, &to, easing.apply(t));
                if t >= 1.0 {
                    return Some(self.finish(rig));
                }
                None
            }
            Phase::FadingOut {
                until,
                position,
                look_at,
            } => {
                if now < until {
                    return None;
                }
                relocate(rig, position, look_at);
                active.phase = Phase::FadingIn {
                    until: now + self.fade_duration,
                };
                Some(TweenEvent::Fade(false))
            }
            Phase::FadingIn { until } => {
                if now < until {
                    return None;
                }
                Some(self.finish(rig))
            }
        }
    }

    fn finish(&mut self, rig: &mut CameraRig) -> TweenEvent {
        rig.set_controls_enabled(true);
        match self.active.take() {
            Some(a) => {
                log::info!("[tween] done {:?}", a.purpose);
                if let Some(f) = a.on_done {
                    f();
                }
                TweenEvent::Finished(a.purpose)
            }
            None => TweenEvent::Finished(TweenPurpose::Scripted),
        }
    }
}

/// Instant move of whichever body the current mode drives.
fn relocate(rig: &mut CameraRig, position: Vec3, look_at: Vec3) {
    match Keyframe::target(rig, position, look_at, false) {
        Keyframe::Camera {
            position,
            orientation,
        } => rig.set_camera(position, orientation),
        Keyframe::Avatar {
            position,
            yaw,
            orbit_yaw,
        } => {
            rig.set_avatar(position, yaw);
            let mut orbit = rig.orbit();
            orbit.yaw = orbit_yaw;
            rig.set_orbit(orbit);
        }
    }
}
