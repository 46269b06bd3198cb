use crate::constants::{FADE_OVERLAY_ID, LOADING_SCREEN_ID, PROGRESS_BAR_ID};
use web_sys as web;

#[inline]
fn show(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        _ = el.class_list().remove_1("hidden");
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
    }
}

#[inline]
fn hide(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        _ = el.class_list().add_1("hidden");
        // fallback
        _ = el.set_attribute("style", "display:none");
    }
}

/// Teleports fade through this element when the page provides one.
#[inline]
pub fn has_fade(document: &web::Document) -> bool {
    document.get_element_by_id(FADE_OVERLAY_ID).is_some()
}

pub fn set_fade(document: &web::Document, visible: bool) {
    if visible {
        show(document, FADE_OVERLAY_ID);
    } else {
        hide(document, FADE_OVERLAY_ID);
    }
}

pub fn set_progress(document: &web::Document, percent: u8) {
    if let Some(el) = document.get_element_by_id(PROGRESS_BAR_ID) {
        _ = el.set_attribute("style", &format!("width:{}%", percent.min(100)));
        el.set_text_content(Some(&format!("{}%", percent)));
    }
    if percent >= 100 {
        hide(document, LOADING_SCREEN_ID);
    }
}
