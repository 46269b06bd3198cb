#![cfg(target_arch = "wasm32")]
use anyhow::anyhow;
use gallery_core::{ArtworkCatalog, EventKind, Gallery, GalleryEvent};
use host::HostBridge;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod exports;
mod frame;
mod host;
mod input;
mod overlay;

pub(crate) type SharedCatalog = Rc<RefCell<ArtworkCatalog>>;
pub(crate) type SharedGallery = Rc<RefCell<Gallery<SharedCatalog>>>;

thread_local! {
    // Reached by the exported functions the page calls (joystick, minimap, uploads)
    pub(crate) static APP: RefCell<Option<SharedGallery>> = const { RefCell::new(None) };
}

// Everything except fades goes straight to the page; fades are only requested
// when an overlay exists, so teleports without one stay instant.
const FORWARDED: [EventKind; 7] = [
    EventKind::ShowArtworkDetail,
    EventKind::ShowUploadForm,
    EventKind::LoadingProgress,
    EventKind::FloorMarker,
    EventKind::ModeChanged,
    EventKind::AvatarAnimation,
    EventKind::CatalogStatus,
];

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

fn wire_gallery_events(gallery: &SharedGallery, host: &HostBridge, document: &web::Document) {
    let mut g = gallery.borrow_mut();
    let bus = g.events_mut();
    for kind in FORWARDED {
        let host = host.clone();
        bus.on(kind, move |e| host.emit(e));
    }

    let doc = document.clone();
    bus.on(EventKind::LoadingProgress, move |e| {
        if let GalleryEvent::LoadingProgress { percent } = e {
            overlay::set_progress(&doc, *percent);
        }
    });

    if overlay::has_fade(document) {
        let doc = document.clone();
        let host = host.clone();
        bus.on(EventKind::ToggleFade, move |e| {
            if let GalleryEvent::ToggleFade { visible } = e {
                overlay::set_fade(&doc, *visible);
            }
            host.emit(e);
        });
    } else {
        log::info!("[overlay] no fade overlay, teleports are instant");
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("gallery-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow!("no document"))?;

    let canvas = dom::canvas(&document, constants::CANVAS_ID)?;
    wire_canvas_resize(&canvas);

    let mut config = dom::read_config(&document)?;
    if dom::is_compact_viewport(&window) {
        config.viewing.compact_viewport = true;
    }
    let host = host::host()?;

    let catalog: SharedCatalog = Rc::new(RefCell::new(ArtworkCatalog::new()));
    let gallery: SharedGallery = Rc::new(RefCell::new(Gallery::new(config, catalog.clone())));
    wire_gallery_events(&gallery, &host, &document);
    APP.with(|app| *app.borrow_mut() = Some(gallery.clone()));

    // Input is wired up front; every handler is a no-op until the scene lands
    events::wire_keyboard(gallery.clone());
    events::wire_pointer_handlers(events::PointerWiring {
        canvas: canvas.clone(),
        gallery: gallery.clone(),
        host: host.clone(),
        tracker: Rc::new(RefCell::new(input::PointerTracker::default())),
    });

    let scene = host.load_scene().await?;
    gallery.borrow_mut().install_scene(&scene)?;

    let catalog_dirty = Rc::new(Cell::new(true));
    {
        let dirty = catalog_dirty.clone();
        catalog.borrow_mut().subscribe(move |change| {
            log::debug!("[catalog] {:?}", change);
            dirty.set(true);
        });
    }
    let ids: Vec<String> = gallery.borrow().painting_ids().map(str::to_string).collect();
    catalog
        .borrow_mut()
        .register_positions(ids.iter().map(String::as_str));
    if let Some(feed) = host.load_artwork_feed().await {
        match catalog.borrow_mut().load_remote_json(&feed) {
            Ok(n) => log::info!("[catalog] {} remote artworks", n),
            Err(e) => log::warn!("[catalog] feed ignored: {}", e),
        }
    }

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        gallery,
        host,
        catalog_dirty,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
