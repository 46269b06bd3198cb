use crate::host::HostBridge;
use crate::SharedGallery;
use gallery_core::{GalleryEvent, ViewMode};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub gallery: SharedGallery,
    pub host: HostBridge,
    /// Set by the catalog observer; the status is pushed on the next frame.
    pub catalog_dirty: Rc<Cell<bool>>,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let Ok(mut g) = self.gallery.try_borrow_mut() else {
            log::debug!("[frame] gallery busy, skipping");
            return;
        };
        if self.catalog_dirty.replace(false) {
            let status = g.provider().borrow().status();
            g.events_mut().emit(GalleryEvent::CatalogStatus { status });
        }
        let Some(pose) = g.tick(now) else {
            return;
        };
        self.host.apply_pose(&pose);
        if g.rig().mode() == ViewMode::ThirdPerson {
            if let Some(avatar) = g.rig().avatar_pose() {
                self.host.apply_avatar(avatar.position, avatar.yaw);
            }
        }
    }
}

fn request_frame(tick: &Closure<dyn FnMut()>) {
    if let Some(w) = web::window() {
        _ = w.request_animation_frame(tick.as_ref().unchecked_ref());
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        if let Some(t) = tick_clone.borrow().as_ref() {
            request_frame(t);
        }
    }) as Box<dyn FnMut()>));
    if let Some(t) = tick.borrow().as_ref() {
        request_frame(t);
    }
}
