//! Keyboard and virtual-joystick aggregation.
//!
//! Event handlers write here between frames; the frame tick polls the
//! debounce deadline and takes one `InputIntent` snapshot.

use crate::config::MovementConfig;
use crate::debounce::deadline_passed;
use glam::Vec2;
use instant::Instant;
use serde::Serialize;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKey {
    Forward,
    Backward,
    Left,
    Right,
}

impl MoveKey {
    /// Maps a physical `KeyboardEvent.code`, so layouts other than QWERTY
    /// still use the WASD positions.
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" => Some(MoveKey::Forward),
            "KeyS" => Some(MoveKey::Backward),
            "KeyA" => Some(MoveKey::Left),
            "KeyD" => Some(MoveKey::Right),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentSource {
    Keyboard,
    Joystick,
    None,
}

/// Movement request for one frame. `(move_right, move_forward)` has length 1
/// or 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputIntent {
    pub move_forward: f32,
    pub move_right: f32,
    pub source: IntentSource,
    pub active: bool,
}

impl InputIntent {
    pub const IDLE: InputIntent = InputIntent {
        move_forward: 0.0,
        move_right: 0.0,
        source: IntentSource::None,
        active: false,
    };

    /// `x` is right, `y` is forward.
    #[inline]
    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.move_right, self.move_forward)
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct HeldKeys {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
}

impl HeldKeys {
    fn slot(&mut self, key: MoveKey) -> &mut bool {
        match key {
            MoveKey::Forward => &mut self.forward,
            MoveKey::Backward => &mut self.backward,
            MoveKey::Left => &mut self.left,
            MoveKey::Right => &mut self.right,
        }
    }

    fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    fn axis(&self) -> Vec2 {
        let f = |on: bool| if on { 1.0 } else { 0.0 };
        Vec2::new(
            f(self.right) - f(self.left),
            f(self.forward) - f(self.backward),
        )
    }
}

#[derive(Clone, Debug)]
pub struct InputState {
    keys: HeldKeys,
    joystick: Vec2,
    joystick_active: bool,
    moving: bool,
    stop_deadline: Option<Instant>,
    key_debounce: Duration,
    joystick_debounce: Duration,
    dead_zone: f32,
}

impl InputState {
    pub fn new(cfg: &MovementConfig) -> Self {
        Self {
            keys: HeldKeys::default(),
            joystick: Vec2::ZERO,
            joystick_active: false,
            moving: false,
            stop_deadline: None,
            key_debounce: cfg.key_release_debounce(),
            joystick_debounce: cfg.joystick_release_debounce(),
            dead_zone: cfg.joystick_dead_zone,
        }
    }

    /// Returns false for auto-repeat of an already held key.
    pub fn on_key_down(&mut self, key: MoveKey) -> bool {
        let slot = self.keys.slot(key);
        if *slot {
            return false;
        }
        *slot = true;
        self.moving = true;
        self.stop_deadline = None;
        true
    }

    pub fn on_key_up(&mut self, key: MoveKey, now: Instant) -> bool {
        let slot = self.keys.slot(key);
        if !*slot {
            return false;
        }
        *slot = false;
        if !self.keys.any() {
            self.stop_deadline = Some(now + self.key_debounce);
        }
        true
    }

    /// Activation waits for the first move past the dead zone.
    pub fn on_joystick_start(&mut self) {
        self.joystick = Vec2::ZERO;
        self.joystick_active = false;
    }

    /// `vector.x` is right, `vector.y` is forward.
    pub fn on_joystick_move(&mut self, vector: Vec2, distance: f32) {
        if distance > self.dead_zone {
            self.joystick = vector;
            self.joystick_active = true;
            self.moving = true;
            self.stop_deadline = None;
        } else {
            self.joystick = Vec2::ZERO;
            self.joystick_active = false;
        }
    }

    pub fn on_joystick_end(&mut self, now: Instant) {
        self.joystick = Vec2::ZERO;
        self.joystick_active = false;
        if !self.keys.any() {
            self.stop_deadline = Some(now + self.joystick_debounce);
        }
    }

    /// Fires a due movement-stop. The stop is dropped if a source became
    /// active again in the meantime.
    pub fn poll(&mut self, now: Instant) {
        let Some(deadline) = self.stop_deadline else {
            return;
        };
        if !deadline_passed(deadline, now) {
            return;
        }
        self.stop_deadline = None;
        if !self.keys.any() && !self.joystick_active {
            self.moving = false;
            log::debug!("[input] movement stopped");
        }
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn has_pending_stop(&self) -> bool {
        self.stop_deadline.is_some()
    }

    pub fn joystick_active(&self) -> bool {
        self.joystick_active
    }

    pub fn any_key_held(&self) -> bool {
        self.keys.any()
    }

    /// Joystick wins over keyboard while active; the two are never summed.
    pub fn intent(&self) -> InputIntent {
        let (raw, source) = if self.joystick_active {
            (self.joystick, IntentSource::Joystick)
        } else if self.keys.any() {
            (self.keys.axis(), IntentSource::Keyboard)
        } else {
            return InputIntent::IDLE;
        };
        let dir = raw.normalize_or_zero();
        InputIntent {
            move_forward: dir.y,
            move_right: dir.x,
            source,
            active: dir != Vec2::ZERO,
        }
    }

    pub fn reset_all(&mut self) {
        self.keys = HeldKeys::default();
        self.joystick = Vec2::ZERO;
        self.joystick_active = false;
        self.moving = false;
        self.stop_deadline = None;
    }
}
