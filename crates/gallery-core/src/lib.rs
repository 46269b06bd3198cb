//! Movement and camera core of the gallery walkthrough.
//!
//! Nothing in this crate touches the browser. The web front-end feeds it
//! input events and timestamps and renders whatever pose `Gallery::tick`
//! returns, which keeps every rule here testable on the host.

pub mod catalog;
pub mod collision;
pub mod config;
pub mod constants;
pub mod debounce;
pub mod error;
pub mod events;
pub mod gallery;
pub mod input;
pub mod integrator;
pub mod rig;
pub mod scene;
pub mod tween;
pub mod viewing;

pub use catalog::{ArtworkCatalog, ArtworkLookup, ArtworkMetadata, ArtworkProvider, GalleryStatus};
pub use collision::{CollidableSet, Raycast, SafetyProfile};
pub use config::GalleryConfig;
pub use error::{CatalogError, ConfigError, GalleryError, SceneError};
pub use events::{EventBus, EventKind, GalleryEvent};
pub use gallery::{ClickOutcome, Gallery, PickHit};
pub use input::{InputIntent, InputState, IntentSource, MoveKey};
pub use rig::{CameraPose, CameraRig, Orientation, PointerKind, ViewMode};
pub use scene::{Aabb, LoadStage, Scene, SceneObject};
pub use tween::{Easing, FlyTo, TweenDirector, TweenHooks, TweenPurpose};
