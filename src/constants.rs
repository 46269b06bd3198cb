/// DOM ids and browser-side tuning for the web front-end.
///
/// Movement tuning lives in `gallery_core::constants`; only values that exist
/// because of the page layout or the browser event model belong here.

// Element ids expected in the host page
pub const CANVAS_ID: &str = "gallery-canvas";
pub const CONFIG_SCRIPT_ID: &str = "gallery-config";
pub const FADE_OVERLAY_ID: &str = "fade-overlay";
pub const LOADING_SCREEN_ID: &str = "loading-screen";
pub const PROGRESS_BAR_ID: &str = "loading-progress";

// Global object installed by the page that owns the 3D scene
pub const HOST_GLOBAL: &str = "galleryHost";

// Phone-sized layouts get the compact viewing distance
pub const COMPACT_VIEWPORT_MAX_WIDTH: f64 = 768.0;

// Hover picking is a full scene raycast; cap it per pointer stream
pub const HOVER_PICK_INTERVAL_MS: u64 = 50;
