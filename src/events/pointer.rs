use crate::constants::HOVER_PICK_INTERVAL_MS;
use crate::dom;
use crate::host::HostBridge;
use crate::input::{self, PointerTracker};
use crate::SharedGallery;
use glam::Vec2;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct PointerWiring {
    pub canvas: web::HtmlCanvasElement,
    pub gallery: SharedGallery,
    pub host: HostBridge,
    pub tracker: Rc<RefCell<PointerTracker>>,
}

pub fn wire_pointer_handlers(w: PointerWiring) {
    wire_pointerdown(&w);
    wire_pointermove(&w);
    wire_pointerup(&w);
    wire_click(&w);
}

#[inline]
fn client_pos(ev: &web::MouseEvent) -> Vec2 {
    Vec2::new(ev.client_x() as f32, ev.client_y() as f32)
}

fn wire_pointerdown(w: &PointerWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        w.tracker.borrow_mut().down(client_pos(&ev));
        w.gallery.borrow_mut().on_pointer_down();
        _ = w.canvas.set_pointer_capture(ev.pointer_id());
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointermove(w: &PointerWiring) {
    let w = w.clone();
    let hover_interval = Duration::from_millis(HOVER_PICK_INTERVAL_MS);

    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let now = Instant::now();
        let delta = w.tracker.borrow_mut().moved(client_pos(&ev));
        if let Some(d) = delta {
            let kind = input::pointer_kind(&ev.pointer_type());
            w.gallery.borrow_mut().on_pointer_move(d.x, d.y, kind, now);
            return;
        }
        // floor marker only follows a real mouse
        if ev.pointer_type() != "mouse" || !w.tracker.borrow_mut().hover_due(now, hover_interval) {
            return;
        }
        let hit = dom::canvas_ndc(&w.canvas, ev.client_x(), ev.client_y())
            .and_then(|ndc| w.host.pick(ndc));
        w.gallery.borrow_mut().on_hover(hit.as_ref());
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_pointerup(w: &PointerWiring) {
    let w = w.clone();

    let closure = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        if w.tracker.borrow_mut().up() {
            w.gallery.borrow_mut().on_pointer_up(Instant::now());
        }
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        for name in ["pointerup", "pointercancel"] {
            _ = wnd.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        }
    }
    closure.forget();
}

fn wire_click(w: &PointerWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        let now = Instant::now();
        let hit = dom::canvas_ndc(&w.canvas, ev.client_x(), ev.client_y())
            .and_then(|ndc| w.host.pick(ndc));
        let outcome = w.gallery.borrow_mut().on_click(hit.as_ref(), now);
        log::info!("[click] {:?}", outcome);
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}
