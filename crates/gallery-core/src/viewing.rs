//! Where to stand in front of a painting, and which painting the user has
//! already arrived at.

use crate::config::ViewingConfig;
use crate::scene::Painting;
use glam::Vec3;

/// Cleared only when a new click, teleport or scripted fly starts. Walking
/// away with the keys or the joystick leaves it set, so a later click on the
/// same painting still opens its detail.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewingSession {
    active_picture: Option<String>,
    in_viewing_position: bool,
}

impl ViewingSession {
    pub fn reset(&mut self) {
        self.active_picture = None;
        self.in_viewing_position = false;
    }

    pub fn arrive(&mut self, id: impl Into<String>) {
        self.active_picture = Some(id.into());
        self.in_viewing_position = true;
    }

    pub fn active_picture(&self) -> Option<&str> {
        self.active_picture.as_deref()
    }

    pub fn in_viewing_position(&self) -> bool {
        self.in_viewing_position
    }

    /// True when `id` was reached by a completed fly-to.
    pub fn is_viewing(&self, id: &str) -> bool {
        self.in_viewing_position && self.active_picture.as_deref() == Some(id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewingPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

/// Camera distance that fits the painting's largest dimension in the field
/// of view, plus a margin, capped at `max_distance`.
pub fn fitting_distance(max_dimension: f32, cfg: &ViewingConfig) -> f32 {
    let half_fov = cfg.fov_degrees.to_radians() * 0.5;
    let ideal = (max_dimension * 0.5) / half_fov.tan();
    let margin = cfg.min_margin.max(max_dimension * cfg.margin_ratio);
    (ideal + margin).min(cfg.max_distance)
}

pub fn viewing_pose(
    painting: &Painting,
    cfg: &ViewingConfig,
    eye_height: f32,
    from_back: bool,
) -> ViewingPose {
    let max_dimension = painting.size.max_element();
    let mut extra = if max_dimension < cfg.size_threshold {
        cfg.small_extra
    } else {
        cfg.large_extra
    };
    if cfg.compact_viewport {
        extra += cfg.compact_extra;
    }
    let distance = fitting_distance(max_dimension, cfg) + extra + cfg.approach_offset;

    let mut view_dir = Vec3::new(painting.forward.x, 0.0, painting.forward.z).normalize_or_zero();
    if view_dir == Vec3::ZERO {
        view_dir = Vec3::Z;
    }
    if from_back {
        view_dir = -view_dir;
    }

    let mut position = painting.center + view_dir * distance;
    position.y = eye_height;
    let target = Vec3::new(painting.center.x, eye_height, painting.center.z);
    let look = (target - position).normalize_or_zero();
    ViewingPose {
        position,
        look_at: position + look * cfg.floor_look_ahead,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn painting(size: Vec3) -> Painting {
        Painting {
            id: "pic07".into(),
            center: Vec3::new(0.0, 2.0, -6.0),
            size,
            forward: Vec3::Z,
        }
    }

    #[test]
    fn small_painting_pose() {
        let cfg = ViewingConfig::default();
        let pose = viewing_pose(&painting(Vec3::new(1.2, 0.9, 0.05)), &cfg, 2.5, false);
        // margin 1.0 dominates; small paintings get +0.5, clicks -0.5
        let expected = fitting_distance(1.2, &cfg);
        assert!((pose.position.z - (-6.0 + expected)).abs() < 1e-4);
        assert_eq!(pose.position.y, 2.5);
        assert!(pose.look_at.z < pose.position.z);
    }

    #[test]
    fn distance_is_capped() {
        let cfg = ViewingConfig::default();
        assert_eq!(fitting_distance(40.0, &cfg), cfg.max_distance);
    }

    #[test]
    fn back_side_and_compact_viewport() {
        let mut cfg = ViewingConfig::default();
        cfg.compact_viewport = true;
        let p = painting(Vec3::new(4.0, 3.0, 0.1));
        let pose = viewing_pose(&p, &cfg, 2.5, true);
        let expected = fitting_distance(4.0, &cfg) - 0.5 + 1.5 - 0.5;
        assert!((pose.position.z - (-6.0 - expected)).abs() < 1e-4);
    }

    #[test]
    fn session_tracks_arrival() {
        let mut s = ViewingSession::default();
        assert!(!s.is_viewing("pic07"));
        s.arrive("pic07");
        assert!(s.is_viewing("pic07"));
        assert!(!s.is_viewing("pic08"));
        s.reset();
        assert_eq!(s.active_picture(), None);
    }
}
