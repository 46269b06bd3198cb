use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

// Default tuning shared by the core and the web front-end.
// Every value here can be overridden through `GalleryConfig`.

// Heights
pub const EYE_HEIGHT: f32 = 2.5; // first-person camera height
pub const AVATAR_HEIGHT: f32 = 1.8; // companion avatar root height
pub const MIN_CAMERA_HEIGHT: f32 = 0.2; // third-person camera never dips below this

// Free movement
pub const MOVE_SPEED: f32 = 0.0125; // impulse added per frame at full input
pub const DAMPING: f32 = 0.8; // per-frame velocity retention
pub const VELOCITY_EPSILON: f32 = 1e-5; // residual velocity treated as rest
pub const MIN_MOVE_DISTANCE: f32 = 0.001; // displacements below this skip probing

// Input
pub const KEY_RELEASE_DEBOUNCE_MS: u64 = 50;
pub const JOYSTICK_RELEASE_DEBOUNCE_MS: u64 = 50;
pub const JOYSTICK_DEAD_ZONE: f32 = 0.05;
pub const DRAG_CLICK_GUARD_MS: u64 = 100;

// Look
pub const MOUSE_SENSITIVITY: f32 = 0.002; // radians per pixel
pub const TOUCH_SENSITIVITY: f32 = 0.003;
pub const FIRST_PERSON_PITCH_MIN: f32 = -FRAC_PI_2;
pub const FIRST_PERSON_PITCH_MAX: f32 = FRAC_PI_2;
pub const THIRD_PERSON_PITCH_MIN: f32 = -FRAC_PI_3;
pub const THIRD_PERSON_PITCH_MAX: f32 = FRAC_PI_3;

// Third-person orbit, expressed in the orbit frame (orbit camera looks down -Z)
pub const THIRD_PERSON_OFFSET: [f32; 3] = [0.0, 0.6, 1.9];
pub const AVATAR_TURN_RATE: f32 = 0.1; // fraction of the yaw gap closed per frame
pub const AVATAR_IDLE_TIMEOUT_MS: u64 = 500;

// Collision
pub const CAMERA_SAFETY_DISTANCE: f32 = 1.5;
pub const AVATAR_SAFETY_DISTANCE: f32 = 2.0;
pub const THIN_OBSTACLE_SAFETY_DISTANCE: f32 = 2.5;
pub const FLOOR_CLICK_SAFETY_DISTANCE: f32 = 1.5;
pub const SIDE_PROBE_ANGLE: f32 = 0.2; // radians either side of the main probe

// Scripted transitions
pub const FLY_DURATION_MS: u64 = 1000;
pub const FADE_DURATION_MS: u64 = 400;
/// Upper bound for every configured duration.
pub const MAX_CONFIG_DURATION_MS: u64 = 60_000;
pub const FLOOR_LOOK_AHEAD: f32 = 5.0; // floor moves keep facing this far ahead

// Artwork viewing pose
pub const VIEW_FOV_DEGREES: f32 = 45.0;
pub const VIEW_MAX_DISTANCE: f32 = 8.0;
pub const VIEW_SIZE_THRESHOLD: f32 = 3.0; // paintings smaller than this get pulled back
pub const VIEW_SMALL_EXTRA: f32 = 0.5;
pub const VIEW_LARGE_EXTRA: f32 = -0.5;
pub const VIEW_COMPACT_EXTRA: f32 = 1.5; // narrow viewports stand further back
pub const VIEW_APPROACH_OFFSET: f32 = -0.5;
pub const VIEW_MIN_MARGIN: f32 = 1.0;
pub const VIEW_MARGIN_RATIO: f32 = 0.3;

// Viewpoint regions
pub const REGION_AXIS_STEP: f32 = 0.1;
pub const REGION_PULLBACK: f32 = 100.0;

// Floor marker
pub const MARKER_LIFT: f32 = 0.01;

pub const INITIAL_CAMERA_POSITION: [f32; 3] = [0.0, EYE_HEIGHT, 0.0];

#[inline]
pub fn third_person_offset_vec3() -> Vec3 {
    Vec3::from_array(THIRD_PERSON_OFFSET)
}

#[inline]
pub fn initial_camera_position_vec3() -> Vec3 {
    Vec3::from_array(INITIAL_CAMERA_POSITION)
}
