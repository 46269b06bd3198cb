//! Functions the page calls directly: the on-screen joystick, the minimap,
//! upload results and loading milestones.

use crate::input;
use crate::{SharedCatalog, APP};
use gallery_core::{ArtworkMetadata, FlyTo, Gallery, TweenHooks};
use glam::Vec3;
use instant::Instant;
use std::time::Duration;
use wasm_bindgen::prelude::*;

/// Runs `f` against the live gallery. `None` before init or when called
/// re-entrantly from inside a gallery event handler.
fn with_gallery<R>(f: impl FnOnce(&mut Gallery<SharedCatalog>) -> R) -> Option<R> {
    APP.with(|app| {
        let app = app.borrow();
        let gallery = app.as_ref()?;
        match gallery.try_borrow_mut() {
            Ok(mut g) => Some(f(&mut g)),
            Err(_) => {
                log::warn!("[exports] gallery busy, call dropped");
                None
            }
        }
    })
}

#[wasm_bindgen]
pub fn joystick_start() {
    with_gallery(|g| g.on_joystick_start());
}

/// `x` is right, `y` is forward; `distance` is the stick deflection in 0..1.
#[wasm_bindgen]
pub fn joystick_move(x: f32, y: f32, distance: f32) {
    let (vector, distance) = input::stick_input(x, y, distance);
    with_gallery(|g| g.on_joystick_move(vector, distance));
}

#[wasm_bindgen]
pub fn joystick_end() {
    with_gallery(|g| g.on_joystick_end(Instant::now()));
}

/// Returns the active mode, `"first_person"` or `"third_person"`.
#[wasm_bindgen]
pub fn toggle_view_mode() -> Option<String> {
    let mode = with_gallery(|g| g.toggle_mode())?;
    serde_json::to_value(mode)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
}

#[wasm_bindgen]
pub fn attach_avatar(yaw: f32) {
    with_gallery(|g| g.attach_avatar(yaw));
}

/// Minimap teleport. Errors on an unknown map point id.
#[wasm_bindgen]
pub fn teleport(id: &str) -> Result<bool, JsValue> {
    match with_gallery(|g| g.teleport_to_map_point(id, Instant::now())) {
        Some(Ok(start)) => Ok(start.is_some()),
        Some(Err(e)) => Err(JsValue::from_str(&e.to_string())),
        None => Ok(false),
    }
}

#[allow(clippy::too_many_arguments)]
#[wasm_bindgen]
pub fn fly_to(
    x: f32,
    y: f32,
    z: f32,
    look_x: f32,
    look_y: f32,
    look_z: f32,
    duration_ms: u32,
) -> bool {
    let fly = FlyTo::new(
        Vec3::new(x, y, z),
        Vec3::new(look_x, look_y, look_z),
        Duration::from_millis(duration_ms as u64),
    );
    with_gallery(|g| g.fly_to(fly, TweenHooks::default(), Instant::now())).unwrap_or(false)
}

#[wasm_bindgen]
pub fn report_progress(stage: &str, fraction: f32) {
    match input::load_stage(stage) {
        Some(stage) => {
            with_gallery(|g| g.report_progress(stage, fraction));
        }
        None => log::warn!("[exports] unknown load stage {}", stage),
    }
}

/// Stores an uploaded artwork (`ArtworkMetadata` JSON) in its booth.
#[wasm_bindgen]
pub fn add_custom_artwork(json: &str) -> Result<bool, JsValue> {
    let artwork: ArtworkMetadata =
        serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(with_gallery(|g| g.provider().borrow_mut().add_custom(artwork)).unwrap_or(false))
}

#[wasm_bindgen]
pub fn remove_custom_artwork(id: &str) -> bool {
    with_gallery(|g| g.provider().borrow_mut().remove_custom(id)).unwrap_or(false)
}

/// Catalog summary as JSON.
#[wasm_bindgen]
pub fn gallery_status() -> Option<String> {
    with_gallery(|g| g.provider().borrow().status())
        .and_then(|status| serde_json::to_string(&status).ok())
}
