//! Bridge to the page that owns the 3D scene.
//!
//! The page installs `window.galleryHost` before the module starts. It
//! resolves the loaded level, answers raycasts, applies poses to its camera
//! and avatar, and receives every gallery event as JSON.

use crate::constants::HOST_GLOBAL;
use anyhow::{anyhow, bail};
use gallery_core::{CameraPose, GalleryEvent, PickHit, Scene};
use glam::Vec2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

#[wasm_bindgen]
extern "C" {
    pub type HostBridge;

    /// Resolves to the scene description as a JSON string.
    #[wasm_bindgen(method, js_name = sceneReady)]
    fn scene_ready(this: &HostBridge) -> js_sys::Promise;

    /// Optional; resolves to the artwork feed document.
    #[wasm_bindgen(method, catch, js_name = artworkFeed)]
    fn artwork_feed(this: &HostBridge) -> Result<js_sys::Promise, JsValue>;

    /// Nearest hit under the NDC point as `{ name, point }` JSON, or null.
    #[wasm_bindgen(method, js_name = pick)]
    fn pick_json(this: &HostBridge, ndc_x: f32, ndc_y: f32) -> JsValue;

    #[wasm_bindgen(method, js_name = applyView)]
    fn apply_view(this: &HostBridge, x: f32, y: f32, z: f32, yaw: f32, pitch: f32);

    #[wasm_bindgen(method, js_name = applyAvatar)]
    fn apply_avatar_raw(this: &HostBridge, x: f32, y: f32, z: f32, yaw: f32);

    #[wasm_bindgen(method, js_name = emit)]
    fn emit_json(this: &HostBridge, json: &str);
}

pub fn host() -> anyhow::Result<HostBridge> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(HOST_GLOBAL))
        .map_err(|e| anyhow!("reading window.{}: {:?}", HOST_GLOBAL, e))?;
    if !value.is_object() {
        bail!("missing window.{}", HOST_GLOBAL);
    }
    Ok(value.unchecked_into())
}

impl HostBridge {
    pub async fn load_scene(&self) -> anyhow::Result<Scene> {
        let value = JsFuture::from(self.scene_ready())
            .await
            .map_err(|e| anyhow!("sceneReady rejected: {:?}", e))?;
        let text = value
            .as_string()
            .ok_or_else(|| anyhow!("sceneReady must resolve to a JSON string"))?;
        Ok(Scene::from_json(&text)?)
    }

    /// `None` when the page has no feed or it failed to load.
    pub async fn load_artwork_feed(&self) -> Option<String> {
        let promise = match self.artwork_feed() {
            Ok(p) => p,
            Err(_) => {
                log::info!("[host] no artworkFeed(), booths only");
                return None;
            }
        };
        match JsFuture::from(promise).await {
            Ok(v) => v.as_string(),
            Err(e) => {
                log::warn!("[host] artwork feed failed: {:?}", e);
                None
            }
        }
    }

    pub fn pick(&self, ndc: Vec2) -> Option<PickHit> {
        let text = self.pick_json(ndc.x, ndc.y).as_string()?;
        match serde_json::from_str::<PickHit>(&text) {
            Ok(hit) => Some(hit),
            Err(e) => {
                log::warn!("[host] bad pick result: {}", e);
                None
            }
        }
    }

    pub fn apply_pose(&self, pose: &CameraPose) {
        let p = pose.position;
        self.apply_view(p.x, p.y, p.z, pose.orientation.yaw, pose.orientation.pitch);
    }

    pub fn apply_avatar(&self, position: glam::Vec3, yaw: f32) {
        self.apply_avatar_raw(position.x, position.y, position.z, yaw);
    }

    pub fn emit(&self, event: &GalleryEvent) {
        match serde_json::to_string(event) {
            Ok(json) => self.emit_json(&json),
            Err(e) => log::warn!("[host] event not serializable: {}", e),
        }
    }
}
