//! Camera and companion-avatar poses and the two control schemes.
//!
//! Orientation is stored as yaw/pitch and composed in `EulerRot::YXZ`
//! (yaw about world up first, then pitch), so there is never any roll.
//! Cameras look down their local -Z axis; the avatar model faces its local +Z.

use crate::config::MovementConfig;
use glam::{EulerRot, Quat, Vec3};
use serde::Serialize;
use std::f32::consts::{PI, TAU};

/// Wraps an angle into `(-PI, PI]`.
#[inline]
pub fn wrap_angle(a: f32) -> f32 {
    let w = (a + PI).rem_euclid(TAU) - PI;
    if w <= -PI {
        w + TAU
    } else {
        w
    }
}

/// Signed shortest rotation from `from` to `to`.
#[inline]
pub fn shortest_arc(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Orientation {
    pub yaw: f32,
    pub pitch: f32,
}

impl Orientation {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    /// Orientation of a camera at `from` looking at `to`.
    pub fn looking(from: Vec3, to: Vec3) -> Self {
        let d = (to - from).normalize_or_zero();
        if d == Vec3::ZERO {
            return Self::default();
        }
        Self {
            yaw: (-d.x).atan2(-d.z),
            pitch: d.y.clamp(-1.0, 1.0).asin(),
        }
    }

    #[inline]
    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.quat() * Vec3::NEG_Z
    }

    /// Forward projected onto the ground plane, unit length.
    #[inline]
    pub fn horizontal_forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Looking the opposite way.
    pub fn reversed(self) -> Self {
        Self {
            yaw: wrap_angle(self.yaw + PI),
            pitch: -self.pitch,
        }
    }

    pub fn lerp(self, to: Orientation, t: f32) -> Self {
        Self {
            yaw: self.yaw + shortest_arc(self.yaw, to.yaw) * t,
            pitch: self.pitch + (to.pitch - self.pitch) * t,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub orientation: Orientation,
}

/// Companion avatar root. The model faces `(sin yaw, 0, cos yaw)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AvatarPose {
    pub position: Vec3,
    pub yaw: f32,
}

impl AvatarPose {
    pub fn facing(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    /// Yaw that makes the model face along `dir`.
    pub fn yaw_towards(dir: Vec3) -> f32 {
        dir.x.atan2(dir.z)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    FirstPerson,
    ThirdPerson,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Shared surface of the first- and third-person control schemes.
pub trait ControlScheme {
    fn enabled(&self) -> bool;
    fn set_enabled(&mut self, on: bool);
    fn orientation(&self) -> Orientation;
    fn set_orientation(&mut self, o: Orientation);
    fn pitch_range(&self) -> [f32; 2];
    /// Levels the pitch, keeping the heading.
    fn reset(&mut self);

    /// Drag right turns right, drag down looks down.
    fn look(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        if !self.enabled() {
            return;
        }
        let [lo, hi] = self.pitch_range();
        let mut o = self.orientation();
        o.yaw = wrap_angle(o.yaw - dx * sensitivity);
        o.pitch = (o.pitch - dy * sensitivity).clamp(lo, hi);
        self.set_orientation(o);
    }
}

#[derive(Clone, Debug)]
pub struct FirstPersonControls {
    orientation: Orientation,
    pitch_range: [f32; 2],
    enabled: bool,
}

impl FirstPersonControls {
    pub fn new(pitch_range: [f32; 2]) -> Self {
        Self {
            orientation: Orientation::default(),
            pitch_range,
            enabled: true,
        }
    }
}

impl ControlScheme for FirstPersonControls {
    fn enabled(&self) -> bool {
        self.enabled
    }
    fn set_enabled(&mut self, on: bool) {
        self.enabled = on;
    }
    fn orientation(&self) -> Orientation {
        self.orientation
    }
    fn set_orientation(&mut self, o: Orientation) {
        let [lo, hi] = self.pitch_range;
        self.orientation = Orientation::new(o.yaw, o.pitch.clamp(lo, hi));
    }
    fn pitch_range(&self) -> [f32; 2] {
        self.pitch_range
    }
    fn reset(&mut self) {
        self.orientation.pitch = 0.0;
    }
}

/// Orbit around the avatar. The orbit yaw/pitch rotate the camera offset.
#[derive(Clone, Debug)]
pub struct ThirdPersonControls {
    orbit: Orientation,
    pitch_range: [f32; 2],
    enabled: bool,
}

impl ThirdPersonControls {
    pub fn new(pitch_range: [f32; 2]) -> Self {
        Self {
            orbit: Orientation::default(),
            pitch_range,
            enabled: false,
        }
    }
}

impl ControlScheme for ThirdPersonControls {
    fn enabled(&self) -> bool {
        self.enabled
    }
    fn set_enabled(&mut self, on: bool) {
        self.enabled = on;
    }
    fn orientation(&self) -> Orientation {
        self.orbit
    }
    fn set_orientation(&mut self, o: Orientation) {
        let [lo, hi] = self.pitch_range;
        self.orbit = Orientation::new(o.yaw, o.pitch.clamp(lo, hi));
    }
    fn pitch_range(&self) -> [f32; 2] {
        self.pitch_range
    }
    fn reset(&mut self) {
        self.orbit.pitch = 0.0;
    }
}

/// Owner of every pose. Before `init_camera` every mutation is a no-op.
#[derive(Clone, Debug)]
pub struct CameraRig {
    mode: ViewMode,
    camera: Option<Vec3>,
    avatar: Option<AvatarPose>,
    first: FirstPersonControls,
    third: ThirdPersonControls,
    eye_height: f32,
    avatar_height: f32,
    min_camera_height: f32,
    offset: Vec3,
    mouse_sensitivity: f32,
    touch_sensitivity: f32,
}

impl CameraRig {
    pub fn new(cfg: &MovementConfig) -> Self {
        Self {
            mode: ViewMode::FirstPerson,
            camera: None,
            avatar: None,
            first: FirstPersonControls::new(cfg.first_person_pitch),
            third: ThirdPersonControls::new(cfg.third_person_pitch),
            eye_height: cfg.eye_height,
            avatar_height: cfg.avatar_height,
            min_camera_height: cfg.min_camera_height,
            offset: cfg.third_person_offset,
            mouse_sensitivity: cfg.mouse_sensitivity,
            touch_sensitivity: cfg.touch_sensitivity,
        }
    }

    pub fn init_camera(&mut self, position: Vec3, orientation: Orientation) {
        self.camera = Some(Vec3::new(position.x, self.eye_height, position.z));
        self.first.set_orientation(orientation);
    }

    /// Registers the companion avatar once its model is available.
    pub fn attach_avatar(&mut self, yaw: f32) {
        let Some(cam) = self.camera else {
            log::warn!("[rig] avatar attached before camera");
            return;
        };
        self.avatar = Some(AvatarPose {
            position: Vec3::new(cam.x, self.avatar_height, cam.z),
            yaw,
        });
    }

    pub fn is_ready(&self) -> bool {
        self.camera.is_some()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn eye_height(&self) -> f32 {
        self.eye_height
    }

    pub fn avatar_height(&self) -> f32 {
        self.avatar_height
    }

    pub fn camera_pose(&self) -> Option<CameraPose> {
        self.camera.map(|position| CameraPose {
            position,
            orientation: self.first.orientation(),
        })
    }

    pub fn avatar_pose(&self) -> Option<AvatarPose> {
        self.avatar
    }

    pub fn orbit(&self) -> Orientation {
        self.third.orientation()
    }

    pub fn controls(&self) -> &dyn ControlScheme {
        match self.mode {
            ViewMode::FirstPerson => &self.first,
            ViewMode::ThirdPerson => &self.third,
        }
    }

    pub fn controls_mut(&mut self) -> &mut dyn ControlScheme {
        match self.mode {
            ViewMode::FirstPerson => &mut self.first,
            ViewMode::ThirdPerson => &mut self.third,
        }
    }

    pub fn set_controls_enabled(&mut self, on: bool) {
        self.controls_mut().set_enabled(on);
    }

    pub fn apply_look(&mut self, dx: f32, dy: f32, kind: PointerKind) {
        if !self.is_ready() {
            return;
        }
        let sensitivity = match kind {
            PointerKind::Mouse => self.mouse_sensitivity,
            PointerKind::Touch => self.touch_sensitivity,
        };
        self.controls_mut().look(dx, dy, sensitivity);
    }

    /// The pose the renderer should use this frame.
    pub fn view_pose(&self) -> Option<CameraPose> {
        match self.mode {
            ViewMode::FirstPerson => self.camera_pose(),
            ViewMode::ThirdPerson => self.avatar.map(|a| self.orbit_camera(&a)),
        }
    }

    fn orbit_camera(&self, avatar: &AvatarPose) -> CameraPose {
        let mut position = avatar.position + self.third.orientation().quat() * self.offset;
        position.y = position.y.max(self.min_camera_height);
        CameraPose {
            position,
            orientation: Orientation::looking(position, avatar.position),
        }
    }

    /// Ground-plane `(forward, right)` that free movement is resolved in.
    pub fn movement_basis(&self) -> (Vec3, Vec3) {
        let forward = self.controls().orientation().horizontal_forward();
        (forward, forward.cross(Vec3::Y))
    }

    /// Position of whichever body free movement drives.
    pub fn body_position(&self) -> Option<Vec3> {
        match self.mode {
            ViewMode::FirstPerson => self.camera,
            ViewMode::ThirdPerson => self.avatar.map(|a| a.position),
        }
    }

    pub fn translate_body(&mut self, offset: Vec3) {
        let flat = Vec3::new(offset.x, 0.0, offset.z);
        match self.mode {
            ViewMode::FirstPerson => {
                if let Some(cam) = self.camera.as_mut() {
                    *cam += flat;
                }
            }
            ViewMode::ThirdPerson => {
                if let Some(a) = self.avatar.as_mut() {
                    a.position += flat;
                }
            }
        }
    }

    /// The camera height is pinned to eye level whatever `position.y` says.
    pub fn set_camera(&mut self, position: Vec3, orientation: Orientation) {
        if self.camera.is_none() {
            return;
        }
        self.camera = Some(Vec3::new(position.x, self.eye_height, position.z));
        self.first.set_orientation(orientation);
    }

    pub fn set_avatar(&mut self, position: Vec3, yaw: f32) {
        if let Some(a) = self.avatar.as_mut() {
            a.position = position;
            a.yaw = wrap_angle(yaw);
        }
    }

    pub fn set_avatar_yaw(&mut self, yaw: f32) {
        if let Some(a) = self.avatar.as_mut() {
            a.yaw = wrap_angle(yaw);
        }
    }

    pub fn set_orbit(&mut self, orbit: Orientation) {
        self.third.set_orientation(orbit);
    }

    /// Swaps the authoritative control scheme. Without an avatar the rig
    /// stays in first person.
    pub fn toggle_mode(&mut self) -> ViewMode {
        let Some(cam) = self.camera else {
            return self.mode;
        };
        match self.mode {
            ViewMode::FirstPerson => {
                let Some(avatar) = self.avatar.as_mut() else {
                    log::warn!("[rig] third person unavailable: no avatar");
                    return self.mode;
                };
                avatar.position = Vec3::new(cam.x, self.avatar_height, cam.z);
                self.third.set_orientation(self.first.orientation());
                self.third.reset();
                self.first.set_enabled(false);
                self.third.set_enabled(true);
                self.mode = ViewMode::ThirdPerson;
            }
            ViewMode::ThirdPerson => {
                if let Some(avatar) = self.avatar {
                    self.camera = Some(Vec3::new(
                        avatar.position.x,
                        self.eye_height,
                        avatar.position.z,
                    ));
                }
                self.third.set_enabled(false);
                self.first.set_enabled(true);
                self.mode = ViewMode::FirstPerson;
            }
        }
        log::info!("[rig] mode -> {:?}", self.mode);
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looking_matches_forward() {
        let from = Vec3::new(1.0, 2.5, 1.0);
        let to = Vec3::new(-3.0, 4.0, 2.0);
        let o = Orientation::looking(from, to);
        let expected = (to - from).normalize();
        assert!(o.forward().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn wrap_angle_stays_in_range() {
        for a in [-7.0_f32, -PI, 0.0, PI, 4.0, 12.0] {
            let w = wrap_angle(a);
            assert!(w > -PI - 1e-6 && w <= PI + 1e-6, "{a} -> {w}");
        }
        assert!((shortest_arc(3.0, -3.0) - (TAU - 6.0)).abs() < 1e-5);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut rig = CameraRig::new(&MovementConfig::default());
        rig.init_camera(Vec3::ZERO, Orientation::default());
        rig.apply_look(0.0, -10_000.0, PointerKind::Mouse);
        let o = rig.camera_pose().unwrap().orientation;
        assert!((o.pitch - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn entering_third_person_levels_the_orbit() {
        let mut rig = CameraRig::new(&MovementConfig::default());
        rig.init_camera(Vec3::ZERO, Orientation::new(0.7, 0.0));
        rig.attach_avatar(0.0);
        rig.apply_look(0.0, 200.0, PointerKind::Mouse);
        assert!(rig.controls().orientation().pitch < -0.1);

        rig.toggle_mode();
        let orbit = rig.orbit();
        assert_eq!(orbit.pitch, 0.0);
        assert!((orbit.yaw - 0.7).abs() < 1e-6);
        // the first-person look survives for the way back
        rig.toggle_mode();
        assert!(rig.controls().orientation().pitch < -0.1);
    }

    #[test]
    fn reset_keeps_heading() {
        let mut rig = CameraRig::new(&MovementConfig::default());
        rig.init_camera(Vec3::ZERO, Orientation::new(1.2, 0.4));
        rig.controls_mut().reset();
        let o = rig.camera_pose().unwrap().orientation;
        assert_eq!(o, Orientation::new(1.2, 0.0));
    }

    #[test]
    fn camera_height_is_pinned_to_eye_level() {
        let mut rig = CameraRig::new(&MovementConfig::default());
        rig.init_camera(Vec3::ZERO, Orientation::default());
        rig.set_camera(Vec3::new(1.0, 9.0, -2.0), Orientation::default());
        let p = rig.camera_pose().unwrap().position;
        assert_eq!(p, Vec3::new(1.0, rig.eye_height(), -2.0));
    }

    #[test]
    fn orbit_camera_sits_behind_and_above() {
        let mut rig = CameraRig::new(&MovementConfig::default());
        rig.init_camera(Vec3::ZERO, Orientation::default());
        rig.attach_avatar(0.0);
        rig.toggle_mode();
        let view = rig.view_pose().unwrap();
        let avatar = rig.avatar_pose().unwrap();
        assert!(view.position.z > avatar.position.z);
        assert!(view.position.y > avatar.position.y);
        let aim = (avatar.position - view.position).normalize();
        assert!(view.orientation.forward().abs_diff_eq(aim, 1e-5));
    }
}
