//! Typed notifications for the UI layer.

use crate::catalog::{ArtworkMetadata, GalleryStatus};
use crate::integrator::AnimationState;
use crate::rig::ViewMode;
use glam::Vec3;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GalleryEvent {
    ShowArtworkDetail { artwork: ArtworkMetadata },
    ShowUploadForm { booth: String },
    ToggleFade { visible: bool },
    LoadingProgress { percent: u8 },
    FloorMarker { position: Option<Vec3> },
    ModeChanged { mode: ViewMode },
    AvatarAnimation { state: AnimationState },
    CatalogStatus { status: GalleryStatus },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    ShowArtworkDetail,
    ShowUploadForm,
    ToggleFade,
    LoadingProgress,
    FloorMarker,
    ModeChanged,
    AvatarAnimation,
    CatalogStatus,
}

impl GalleryEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GalleryEvent::ShowArtworkDetail { .. } => EventKind::ShowArtworkDetail,
            GalleryEvent::ShowUploadForm { .. } => EventKind::ShowUploadForm,
            GalleryEvent::ToggleFade { .. } => EventKind::ToggleFade,
            GalleryEvent::LoadingProgress { .. } => EventKind::LoadingProgress,
            GalleryEvent::FloorMarker { .. } => EventKind::FloorMarker,
            GalleryEvent::ModeChanged { .. } => EventKind::ModeChanged,
            GalleryEvent::AvatarAnimation { .. } => EventKind::AvatarAnimation,
            GalleryEvent::CatalogStatus { .. } => EventKind::CatalogStatus,
        }
    }
}

type Listener = Box<dyn FnMut(&GalleryEvent)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListenerId(u32);

/// Dispatches events to listeners registered per kind (or for every kind).
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Option<EventKind>, Listener)>,
    next_id: u32,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, kind: EventKind, f: impl FnMut(&GalleryEvent) + 'static) -> ListenerId {
        self.add(Some(kind), Box::new(f))
    }

    pub fn on_any(&mut self, f: impl FnMut(&GalleryEvent) + 'static) -> ListenerId {
        self.add(None, Box::new(f))
    }

    fn add(&mut self, kind: Option<EventKind>, f: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, kind, f));
        id
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _, _)| *lid != id);
        before != self.listeners.len()
    }

    pub fn has_listener(&self, kind: EventKind) -> bool {
        self.listeners
            .iter()
            .any(|(_, k, _)| k.map_or(true, |k| k == kind))
    }

    pub fn emit(&mut self, event: GalleryEvent) {
        let kind = event.kind();
        log::debug!("[events] {:?}", kind);
        for (_, k, f) in self.listeners.iter_mut() {
            if k.map_or(true, |k| k == kind) {
                f(&event);
            }
        }
    }
}
