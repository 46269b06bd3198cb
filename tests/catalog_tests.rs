// Host-side tests for artwork lookup, booth accounting and observers.

mod common;

use common::metadata;
use gallery_core::catalog::{ArtworkLookup, CatalogChange};
use gallery_core::error::CatalogError;
use gallery_core::{ArtworkCatalog, ArtworkProvider, GalleryStatus};
use std::cell::RefCell;
use std::rc::Rc;

fn catalog() -> ArtworkCatalog {
    let mut c = ArtworkCatalog::new();
    c.set_remote([metadata("pic01"), metadata("pic02")]);
    c.register_positions(["pic03", "pic01", "pic02", "pic04", "pic03"]);
    c
}

#[test]
fn feed_accepts_wrapped_and_bare_documents() {
    let mut c = ArtworkCatalog::new();
    let n = c
        .load_remote_json(
            r#"{ "data": [ { "name": "pic01", "title": "Dawn", "author": "Li",
                             "intro": "ink", "url": "/a.jpg", "userid": 42 } ] }"#,
        )
        .unwrap();
    assert_eq!(n, 1);
    match c.lookup("pic01") {
        Some(ArtworkLookup::Remote(m)) => {
            assert_eq!(m.title, "Dawn");
            assert_eq!(m.description, "ink");
            assert_eq!(m.owner.as_deref(), Some("42"));
        }
        other => panic!("unexpected {other:?}"),
    }

    let n = c
        .load_remote_json(r#"[ { "name": "pic05" }, { "name": "pic06" } ]"#)
        .unwrap();
    assert_eq!(n, 2);
    // a new feed replaces the old one
    assert!(c.lookup("pic01").is_none());
}

#[test]
fn feed_errors() {
    let mut c = ArtworkCatalog::new();
    assert!(matches!(
        c.load_remote_json("not json"),
        Err(CatalogError::Parse(_))
    ));
    assert!(matches!(
        c.load_remote_json(r#"[ { "name": "" } ]"#),
        Err(CatalogError::MissingName)
    ));
}

#[test]
fn lookup_prefers_remote_then_custom_then_booth() {
    let mut c = catalog();
    assert!(matches!(c.lookup("pic01"), Some(ArtworkLookup::Remote(_))));
    assert_eq!(
        c.lookup("pic03"),
        Some(ArtworkLookup::OpenBooth { id: "pic03".into() })
    );
    assert!(c.add_custom(metadata("pic03")));
    assert!(matches!(c.lookup("pic03"), Some(ArtworkLookup::Custom(_))));
    assert_eq!(c.lookup("pic99"), None);
}

#[test]
fn only_booths_take_uploads() {
    let mut c = catalog();
    assert!(!c.add_custom(metadata("pic01")));
    assert!(!c.add_custom(metadata("pic99")));
    assert!(c.add_custom(metadata("pic04")));
    assert_eq!(c.open_booths(), vec!["pic03"]);
    assert!(c.remove_custom("pic04"));
    assert!(!c.remove_custom("pic04"));
    assert_eq!(c.open_booths(), vec!["pic03", "pic04"]);
}

#[test]
fn status_counts_booths() {
    let mut c = catalog();
    c.add_custom(metadata("pic04"));
    assert_eq!(
        c.status(),
        GalleryStatus {
            total: 4,
            with_remote: 2,
            booths: 2,
            booths_filled: 1,
            booths_available: 1,
        }
    );
}

#[test]
fn observers_see_changes_until_unsubscribed() {
    let mut c = ArtworkCatalog::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let id = c.subscribe(move |change| sink.borrow_mut().push(change.clone()));

    c.register_positions(["pic01", "pic02"]);
    c.add_custom(metadata("pic02"));
    assert!(c.unsubscribe(id));
    assert!(!c.unsubscribe(id));
    c.remove_custom("pic02");

    assert_eq!(
        *seen.borrow(),
        vec![
            CatalogChange::PositionsRegistered(2),
            CatalogChange::CustomAdded("pic02".into()),
        ]
    );
}

#[test]
fn shared_catalog_is_a_provider() {
    let shared = Rc::new(RefCell::new(catalog()));
    shared.borrow_mut().add_custom(metadata("pic03"));
    assert!(matches!(
        shared.lookup("pic03"),
        Some(ArtworkLookup::Custom(_))
    ));
}
