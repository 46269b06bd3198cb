//! Artwork metadata: remote feed entries, user uploads and the booth
//! positions found in the scene.

use crate::error::CatalogError;
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkMetadata {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub owner: Option<String>,
}

/// Entry as served by the artwork feed.
#[derive(Debug, Deserialize)]
struct FeedItem {
    name: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    intro: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    userid: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Feed {
    Wrapped { data: Vec<FeedItem> },
    Bare(Vec<FeedItem>),
}

impl From<FeedItem> for ArtworkMetadata {
    fn from(item: FeedItem) -> Self {
        Self {
            id: item.name,
            title: item.title,
            author: item.author,
            description: item.intro,
            image: item.url,
            owner: item.userid.map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArtworkLookup {
    Remote(ArtworkMetadata),
    Custom(ArtworkMetadata),
    /// A booth with nothing in it yet.
    OpenBooth { id: String },
}

/// Read side used by click handling.
pub trait ArtworkProvider {
    /// `None` means there is nothing to show for `id`.
    fn lookup(&self, id: &str) -> Option<ArtworkLookup>;
}

impl<T: ArtworkProvider> ArtworkProvider for Rc<RefCell<T>> {
    fn lookup(&self, id: &str) -> Option<ArtworkLookup> {
        self.borrow().lookup(id)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GalleryStatus {
    pub total: usize,
    pub with_remote: usize,
    pub booths: usize,
    pub booths_filled: usize,
    pub booths_available: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogChange {
    RemoteLoaded(usize),
    PositionsRegistered(usize),
    CustomAdded(String),
    CustomRemoved(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

type Observer = Box<dyn FnMut(&CatalogChange)>;

#[derive(Default)]
pub struct ArtworkCatalog {
    remote: FnvHashMap<String, ArtworkMetadata>,
    custom: FnvHashMap<String, ArtworkMetadata>,
    positions: Vec<String>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: u32,
}

impl ArtworkCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces remote entries from a feed document, either a bare array or
    /// `{ "data": [...] }`.
    pub fn load_remote_json(&mut self, text: &str) -> Result<usize, CatalogError> {
        let items = match serde_json::from_str::<Feed>(text)? {
            Feed::Wrapped { data } => data,
            Feed::Bare(items) => items,
        };
        if items.iter().any(|i| i.name.is_empty()) {
            return Err(CatalogError::MissingName);
        }
        self.set_remote(items.into_iter().map(ArtworkMetadata::from));
        Ok(self.remote.len())
    }

    pub fn set_remote(&mut self, items: impl IntoIterator<Item = ArtworkMetadata>) {
        self.remote = items.into_iter().map(|m| (m.id.clone(), m)).collect();
        log::info!("[catalog] remote artworks: {}", self.remote.len());
        self.notify(CatalogChange::RemoteLoaded(self.remote.len()));
    }

    /// Records every painting slot present in the scene.
    pub fn register_positions<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            if !self.positions.iter().any(|p| p == id) {
                self.positions.push(id.to_string());
            }
        }
        self.positions.sort();
        self.notify(CatalogChange::PositionsRegistered(self.positions.len()));
    }

    pub fn is_booth(&self, id: &str) -> bool {
        !self.remote.contains_key(id) && self.positions.iter().any(|p| p == id)
    }

    /// Booths that can still take an upload.
    pub fn open_booths(&self) -> Vec<&str> {
        self.positions
            .iter()
            .filter(|p| self.is_booth(p) && !self.custom.contains_key(p.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Stores an upload. Only booths accept uploads.
    pub fn add_custom(&mut self, artwork: ArtworkMetadata) -> bool {
        if !self.is_booth(&artwork.id) {
            log::warn!("[catalog] {} is not an open booth", artwork.id);
            return false;
        }
        let id = artwork.id.clone();
        self.custom.insert(id.clone(), artwork);
        self.notify(CatalogChange::CustomAdded(id));
        true
    }

    pub fn remove_custom(&mut self, id: &str) -> bool {
        if self.custom.remove(id).is_none() {
            return false;
        }
        self.notify(CatalogChange::CustomRemoved(id.to_string()));
        true
    }

    pub fn status(&self) -> GalleryStatus {
        let booths = self.positions.iter().filter(|p| self.is_booth(p)).count();
        let booths_filled = self
            .positions
            .iter()
            .filter(|p| self.is_booth(p) && self.custom.contains_key(p.as_str()))
            .count();
        GalleryStatus {
            total: self.positions.len(),
            with_remote: self.remote.len(),
            booths,
            booths_filled,
            booths_available: booths - booths_filled,
        }
    }

    pub fn subscribe(&mut self, f: impl FnMut(&CatalogChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(f)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    fn notify(&mut self, change: CatalogChange) {
        for (_, f) in self.observers.iter_mut() {
            f(&change);
        }
    }
}

impl ArtworkProvider for ArtworkCatalog {
    fn lookup(&self, id: &str) -> Option<ArtworkLookup> {
        if let Some(m) = self.remote.get(id) {
            return Some(ArtworkLookup::Remote(m.clone()));
        }
        if let Some(m) = self.custom.get(id) {
            return Some(ArtworkLookup::Custom(m.clone()));
        }
        if self.positions.iter().any(|p| p == id) {
            return Some(ArtworkLookup::OpenBooth { id: id.to_string() });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_accepts_wrapped_and_bare() {
        let mut c = ArtworkCatalog::new();
        let feed = r#"{"data":[
            {"name":"pic01","title":"Dawn","intro":"oil","url":"a.jpg","userid":7}
        ]}"#;
        let n = c.load_remote_json(feed).unwrap();
        assert_eq!(n, 1);
        match c.lookup("pic01") {
            Some(ArtworkLookup::Remote(m)) => {
                assert_eq!(m.description, "oil");
                assert_eq!(m.owner.as_deref(), Some("7"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(c.load_remote_json(r#"[{"name":"pic02"}]"#).unwrap(), 1);
        assert!(c.lookup("pic01").is_none());
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut c = ArtworkCatalog::new();
        assert!(matches!(
            c.load_remote_json(r#"[{"name":""}]"#),
            Err(CatalogError::MissingName)
        ));
    }
}
