use crate::constants::{COMPACT_VIEWPORT_MAX_WIDTH, CONFIG_SCRIPT_ID};
use crate::input;
use anyhow::anyhow;
use gallery_core::GalleryConfig;
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn canvas(document: &web::Document, id: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow!("missing #{}", id))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow!("#{} is not a canvas: {:?}", id, e))
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Pointer position in the canvas' normalized device coordinates.
pub fn canvas_ndc(canvas: &web::HtmlCanvasElement, client_x: i32, client_y: i32) -> Option<Vec2> {
    let rect = canvas.get_bounding_client_rect();
    input::client_to_ndc(
        Vec2::new(client_x as f32, client_y as f32),
        rect.left() as f32,
        rect.top() as f32,
        rect.width() as f32,
        rect.height() as f32,
    )
}

/// Reads the optional `<script id="gallery-config" type="application/json">`
/// block. A missing block means defaults; a broken one is an error.
pub fn read_config(document: &web::Document) -> anyhow::Result<GalleryConfig> {
    let Some(el) = document.get_element_by_id(CONFIG_SCRIPT_ID) else {
        log::info!("[config] no #{}, using defaults", CONFIG_SCRIPT_ID);
        return Ok(GalleryConfig::default());
    };
    let text = el.text_content().unwrap_or_default();
    if text.trim().is_empty() {
        return Ok(GalleryConfig::default());
    }
    let cfg = GalleryConfig::from_json(&text)?;
    log::info!("[config] loaded #{}", CONFIG_SCRIPT_ID);
    Ok(cfg)
}

pub fn is_compact_viewport(window: &web::Window) -> bool {
    window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .map(|w| w <= COMPACT_VIEWPORT_MAX_WIDTH)
        .unwrap_or(false)
}
