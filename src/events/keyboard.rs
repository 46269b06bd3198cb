use crate::dom;
use crate::input::{self, KeyAction};
use crate::SharedGallery;
use instant::Instant;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

fn typing_into_form(ev: &web::KeyboardEvent) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web::Element>().ok())
        .map(|el| input::is_text_entry(&el.tag_name()))
        .unwrap_or(false)
}

fn handle_keydown(ev: &web::KeyboardEvent, gallery: &SharedGallery) {
    if typing_into_form(ev) {
        return;
    }
    let code = ev.code();
    match input::key_action(&code) {
        KeyAction::Move => {
            gallery.borrow_mut().on_key_down(&code);
            ev.prevent_default();
        }
        KeyAction::ToggleView => {
            if ev.repeat() {
                return;
            }
            let mode = gallery.borrow_mut().toggle_mode();
            log::info!("[keys] view mode {:?}", mode);
        }
        KeyAction::Ignore => {}
    }
}

pub fn wire_keyboard(gallery: SharedGallery) {
    let Some(window) = web::window() else {
        return;
    };

    let g = gallery.clone();
    let keydown = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        handle_keydown(&ev, &g);
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref());
    keydown.forget();

    // key-ups are always delivered, even from form fields, so nothing stays held
    let g = gallery.clone();
    let keyup = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        if input::key_action(&ev.code()) == KeyAction::Move {
            g.borrow_mut().on_key_up(&ev.code(), Instant::now());
        }
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref());
    keyup.forget();

    wire_focus_loss(&window, gallery);
}

/// Key-ups are lost when the window loses focus mid-press.
fn wire_focus_loss(window: &web::Window, gallery: SharedGallery) {
    let g = gallery.clone();
    let blur = Closure::wrap(Box::new(move || {
        g.borrow_mut().on_focus_lost();
    }) as Box<dyn FnMut()>);
    _ = window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref());
    blur.forget();

    if let Some(document) = dom::window_document() {
        let doc = document.clone();
        let visibility = Closure::wrap(Box::new(move || {
            if doc.hidden() {
                gallery.borrow_mut().on_focus_lost();
            }
        }) as Box<dyn FnMut()>);
        _ = document.add_event_listener_with_callback(
            "visibilitychange",
            visibility.as_ref().unchecked_ref(),
        );
        visibility.forget();
    }
}
