//! Runtime configuration.
//!
//! Every section deserializes with defaults from `constants.rs`, so a host
//! page only needs to ship the values it wants to change.

use crate::constants::*;
use crate::error::ConfigError;
use fnv::FnvHashSet;
use glam::Vec3;
use serde::Deserialize;
use std::time::Duration;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub movement: MovementConfig,
    pub collision: CollisionConfig,
    pub viewing: ViewingConfig,
    pub transitions: TransitionConfig,
    pub scene: SceneRules,
    pub map_points: MapPoints,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub eye_height: f32,
    pub avatar_height: f32,
    pub min_camera_height: f32,
    pub initial_position: Vec3,
    pub move_speed: f32,
    pub damping: f32,
    pub key_release_debounce_ms: u64,
    pub joystick_release_debounce_ms: u64,
    pub joystick_dead_zone: f32,
    pub drag_click_guard_ms: u64,
    pub mouse_sensitivity: f32,
    pub touch_sensitivity: f32,
    /// `[min, max]` pitch in radians.
    pub first_person_pitch: [f32; 2],
    pub third_person_pitch: [f32; 2],
    /// Camera offset from the avatar in the orbit frame.
    pub third_person_offset: Vec3,
    pub avatar_turn_rate: f32,
    pub avatar_idle_timeout_ms: u64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            eye_height: EYE_HEIGHT,
            avatar_height: AVATAR_HEIGHT,
            min_camera_height: MIN_CAMERA_HEIGHT,
            initial_position: initial_camera_position_vec3(),
            move_speed: MOVE_SPEED,
            damping: DAMPING,
            key_release_debounce_ms: KEY_RELEASE_DEBOUNCE_MS,
            joystick_release_debounce_ms: JOYSTICK_RELEASE_DEBOUNCE_MS,
            joystick_dead_zone: JOYSTICK_DEAD_ZONE,
            drag_click_guard_ms: DRAG_CLICK_GUARD_MS,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            touch_sensitivity: TOUCH_SENSITIVITY,
            first_person_pitch: [FIRST_PERSON_PITCH_MIN, FIRST_PERSON_PITCH_MAX],
            third_person_pitch: [THIRD_PERSON_PITCH_MIN, THIRD_PERSON_PITCH_MAX],
            third_person_offset: third_person_offset_vec3(),
            avatar_turn_rate: AVATAR_TURN_RATE,
            avatar_idle_timeout_ms: AVATAR_IDLE_TIMEOUT_MS,
        }
    }
}

impl MovementConfig {
    pub fn key_release_debounce(&self) -> Duration {
        Duration::from_millis(self.key_release_debounce_ms)
    }
    pub fn joystick_release_debounce(&self) -> Duration {
        Duration::from_millis(self.joystick_release_debounce_ms)
    }
    pub fn drag_click_guard(&self) -> Duration {
        Duration::from_millis(self.drag_click_guard_ms)
    }
    pub fn avatar_idle_timeout(&self) -> Duration {
        Duration::from_millis(self.avatar_idle_timeout_ms)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub camera_safety: f32,
    pub avatar_safety: f32,
    pub thin_obstacle_safety: f32,
    pub floor_click_safety: f32,
    pub side_probe_angle: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            camera_safety: CAMERA_SAFETY_DISTANCE,
            avatar_safety: AVATAR_SAFETY_DISTANCE,
            thin_obstacle_safety: THIN_OBSTACLE_SAFETY_DISTANCE,
            floor_click_safety: FLOOR_CLICK_SAFETY_DISTANCE,
            side_probe_angle: SIDE_PROBE_ANGLE,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ViewingConfig {
    pub fov_degrees: f32,
    pub max_distance: f32,
    pub size_threshold: f32,
    pub small_extra: f32,
    pub large_extra: f32,
    pub compact_extra: f32,
    pub approach_offset: f32,
    pub min_margin: f32,
    pub margin_ratio: f32,
    pub floor_look_ahead: f32,
    /// Set by the front-end for phone-sized viewports.
    pub compact_viewport: bool,
}

impl Default for ViewingConfig {
    fn default() -> Self {
        Self {
            fov_degrees: VIEW_FOV_DEGREES,
            max_distance: VIEW_MAX_DISTANCE,
            size_threshold: VIEW_SIZE_THRESHOLD,
            small_extra: VIEW_SMALL_EXTRA,
            large_extra: VIEW_LARGE_EXTRA,
            compact_extra: VIEW_COMPACT_EXTRA,
            approach_offset: VIEW_APPROACH_OFFSET,
            min_margin: VIEW_MIN_MARGIN,
            margin_ratio: VIEW_MARGIN_RATIO,
            floor_look_ahead: FLOOR_LOOK_AHEAD,
            compact_viewport: false,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub fly_duration_ms: u64,
    pub fade_duration_ms: u64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            fly_duration_ms: FLY_DURATION_MS,
            fade_duration_ms: FADE_DURATION_MS,
        }
    }
}

impl TransitionConfig {
    pub fn fly_duration(&self) -> Duration {
        Duration::from_millis(self.fly_duration_ms)
    }
    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }
}

/// Name-based rules that classify scene objects.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SceneRules {
    /// Floor objects match by equality or substring.
    pub floor_names: Vec<String>,
    pub painting_marker: String,
    pub region_prefix: String,
    pub collidable_names: Vec<String>,
    /// Substrings that make any object collidable.
    pub collidable_patterns: Vec<String>,
    /// Collidables that get the thin-obstacle safety distance.
    pub thin_obstacles: Vec<String>,
    /// Extra obstacles honoured only when placing the camera after a floor click.
    pub placement_obstacles: Vec<String>,
    /// Paintings viewed from their back side.
    pub reverse_view_side: Vec<String>,
    /// Paintings whose authored front face is rotated half a turn.
    pub flip_facing: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for SceneRules {
    fn default() -> Self {
        Self {
            floor_names: strings(&[
                "地板",
                "floor",
                "Floor",
                "floor003",
                "ground",
                "Ground",
                "G-Object_1",
            ]),
            painting_marker: "pic".into(),
            region_prefix: "helperBox".into(),
            collidable_names: strings(&[
                "G-Object353_1",
                "G-Object353_3",
                "G-Object353",
                "C-组件#1",
                "C-组件#1_1",
                "C-组件#1_2",
                "G-Object002_2",
                "墙004",
            ]),
            collidable_patterns: strings(&["wall", "Wall"]),
            thin_obstacles: strings(&["C-组件#1_1"]),
            placement_obstacles: strings(&[
                "沙发",
                "中间屏",
                "天窗栅栏",
                "房顶",
                "G-Object240",
            ]),
            reverse_view_side: strings(&["pic20", "pic21", "pic24", "pic25", "pic26"]),
            flip_facing: strings(&["pic27"]),
        }
    }
}

impl SceneRules {
    pub fn is_floor(&self, name: &str) -> bool {
        self.floor_names
            .iter()
            .any(|f| name == f || name.contains(f.as_str()))
    }

    pub fn is_painting(&self, name: &str) -> bool {
        !self.painting_marker.is_empty() && name.contains(self.painting_marker.as_str())
    }

    pub fn is_region(&self, name: &str) -> bool {
        !self.region_prefix.is_empty() && name.starts_with(self.region_prefix.as_str())
    }

    pub fn is_collidable(&self, name: &str) -> bool {
        self.collidable_names.iter().any(|n| n == name)
            || self
                .collidable_patterns
                .iter()
                .any(|p| name.contains(p.as_str()))
    }

    pub fn is_placement_obstacle(&self, name: &str) -> bool {
        self.is_collidable(name) || self.placement_obstacles.iter().any(|n| n == name)
    }

    pub fn is_thin(&self, name: &str) -> bool {
        self.thin_obstacles.iter().any(|n| n == name)
    }

    pub fn views_from_back(&self, name: &str) -> bool {
        self.reverse_view_side.iter().any(|n| n == name)
    }

    pub fn flips_facing(&self, name: &str) -> bool {
        self.flip_facing.iter().any(|n| n == name)
    }
}

/// A named teleport destination shown on the minimap.
#[derive(Clone, Debug, Deserialize)]
pub struct MapPoint {
    pub id: String,
    pub label: String,
    pub position: Vec3,
    pub look_at: Vec3,
    /// Marker position on the minimap image, in pixels.
    pub map: [f32; 2],
}

#[derive(Clone, Debug, Deserialize)]
#[serde(transparent)]
pub struct MapPoints(pub Vec<MapPoint>);

impl Default for MapPoints {
    fn default() -> Self {
        Self(vec![
            MapPoint {
                id: "main-exhibition".into(),
                label: "Main exhibition".into(),
                position: Vec3::new(2.3, EYE_HEIGHT, -6.35),
                look_at: Vec3::new(0.68, EYE_HEIGHT, -7.52),
                map: [85.0, 45.0],
            },
            MapPoint {
                id: "leisure-area".into(),
                label: "Leisure area".into(),
                position: Vec3::new(6.8, EYE_HEIGHT, 6.4),
                look_at: Vec3::new(31.8, EYE_HEIGHT, 6.4),
                map: [110.0, 120.0],
            },
            MapPoint {
                id: "secondary-exhibition".into(),
                label: "Secondary exhibition".into(),
                position: Vec3::new(-0.4, EYE_HEIGHT, 12.35),
                look_at: Vec3::new(-5.1, EYE_HEIGHT, 14.06),
                map: [70.0, 155.0],
            },
        ])
    }
}

impl MapPoints {
    pub fn get(&self, id: &str) -> Option<&MapPoint> {
        self.0.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MapPoint> {
        self.0.iter()
    }
}

impl GalleryConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: GalleryConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.movement;
        positive("movement.move_speed", m.move_speed)?;
        positive("movement.eye_height", m.eye_height)?;
        positive("movement.avatar_height", m.avatar_height)?;
        if !(0.0..1.0).contains(&m.damping) {
            return Err(ConfigError::OutOfRange {
                field: "movement.damping",
                expected: "in [0, 1)",
                value: m.damping,
            });
        }
        if !(0.0..=1.0).contains(&m.avatar_turn_rate) {
            return Err(ConfigError::OutOfRange {
                field: "movement.avatar_turn_rate",
                expected: "in [0, 1]",
                value: m.avatar_turn_rate,
            });
        }
        pitch_range("first person", m.first_person_pitch)?;
        pitch_range("third person", m.third_person_pitch)?;

        let c = &self.collision;
        positive("collision.camera_safety", c.camera_safety)?;
        positive("collision.avatar_safety", c.avatar_safety)?;
        positive("collision.thin_obstacle_safety", c.thin_obstacle_safety)?;
        positive("collision.floor_click_safety", c.floor_click_safety)?;

        let v = &self.viewing;
        if !(v.fov_degrees > 0.0 && v.fov_degrees < 180.0) {
            return Err(ConfigError::OutOfRange {
                field: "viewing.fov_degrees",
                expected: "in (0, 180)",
                value: v.fov_degrees,
            });
        }
        positive("viewing.max_distance", v.max_distance)?;

        for (field, value) in [
            ("movement.key_release_debounce_ms", m.key_release_debounce_ms),
            ("movement.joystick_release_debounce_ms", m.joystick_release_debounce_ms),
            ("movement.drag_click_guard_ms", m.drag_click_guard_ms),
            ("movement.avatar_idle_timeout_ms", m.avatar_idle_timeout_ms),
            ("transitions.fly_duration_ms", self.transitions.fly_duration_ms),
            ("transitions.fade_duration_ms", self.transitions.fade_duration_ms),
        ] {
            bounded_ms(field, value)?;
        }

        let mut seen = FnvHashSet::default();
        for p in self.map_points.iter() {
            if !seen.insert(p.id.as_str()) {
                return Err(ConfigError::DuplicateMapPoint(p.id.clone()));
            }
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            expected: "> 0",
            value,
        })
    }
}

fn bounded_ms(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value > MAX_CONFIG_DURATION_MS {
        return Err(ConfigError::DurationTooLong {
            field,
            max: MAX_CONFIG_DURATION_MS,
            value,
        });
    }
    Ok(())
}

fn pitch_range(mode: &'static str, [min, max]: [f32; 2]) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::PitchRange { mode, min, max });
    }
    Ok(())
}
