use gallery_core::{LoadStage, PointerKind};
use glam::Vec2;
use instant::Instant;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Move,
    ToggleView,
    Ignore,
}

/// Physical key code to gallery action. Layout independent, so WASD works on
/// AZERTY keyboards too.
#[inline]
pub fn key_action(code: &str) -> KeyAction {
    match code {
        "KeyW" | "KeyA" | "KeyS" | "KeyD" => KeyAction::Move,
        "KeyV" => KeyAction::ToggleView,
        _ => KeyAction::Ignore,
    }
}

/// Keys typed into form fields (the upload form) must not walk the camera.
#[inline]
pub fn is_text_entry(tag_name: &str) -> bool {
    ["input", "textarea", "select"]
        .iter()
        .any(|t| tag_name.eq_ignore_ascii_case(t))
}

#[inline]
pub fn pointer_kind(pointer_type: &str) -> PointerKind {
    match pointer_type {
        "touch" | "pen" => PointerKind::Touch,
        _ => PointerKind::Mouse,
    }
}

/// Client coordinates to normalized device coordinates of a rect, +Y up.
#[inline]
pub fn client_to_ndc(client: Vec2, left: f32, top: f32, width: f32, height: f32) -> Option<Vec2> {
    if !(width > 0.0 && height > 0.0) {
        return None;
    }
    let u = (client.x - left) / width;
    let v = (client.y - top) / height;
    Some(Vec2::new(u * 2.0 - 1.0, 1.0 - v * 2.0))
}

/// Sanitizes joystick widget output before it reaches the input state.
#[inline]
pub fn stick_input(x: f32, y: f32, distance: f32) -> (Vec2, f32) {
    let v = Vec2::new(x, y);
    if !v.is_finite() || !distance.is_finite() {
        return (Vec2::ZERO, 0.0);
    }
    (v, distance.clamp(0.0, 1.0))
}

#[inline]
pub fn load_stage(name: &str) -> Option<LoadStage> {
    match name {
        "environment" => Some(LoadStage::Environment),
        "model" => Some(LoadStage::Model),
        "skybox" => Some(LoadStage::Skybox),
        "finalize" => Some(LoadStage::Finalize),
        _ => None,
    }
}

/// Pressed-pointer bookkeeping: turns absolute pointer positions into look
/// deltas and throttles hover picking.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerTracker {
    last: Option<Vec2>,
    last_hover: Option<Instant>,
}

impl PointerTracker {
    pub fn down(&mut self, at: Vec2) {
        self.last = Some(at);
    }

    pub fn is_down(&self) -> bool {
        self.last.is_some()
    }

    /// Movement since the previous event, only while pressed.
    pub fn moved(&mut self, at: Vec2) -> Option<Vec2> {
        let prev = self.last?;
        self.last = Some(at);
        Some(at - prev)
    }

    /// Returns whether a press was in progress.
    pub fn up(&mut self) -> bool {
        self.last.take().is_some()
    }

    pub fn hover_due(&mut self, now: Instant, interval: Duration) -> bool {
        match self.last_hover {
            Some(t) if now >= t && now - t < interval => false,
            _ => {
                self.last_hover = Some(now);
                true
            }
        }
    }
}
