//! Scene description handed over by the host once loading finishes, and the
//! classification of its objects into floors, paintings and viewpoint regions.

use crate::config::SceneRules;
use crate::constants::{REGION_AXIS_STEP, REGION_PULLBACK};
use crate::error::SceneError;
use fnv::FnvHashMap;
use glam::Vec3;
use serde::Deserialize;

/// Axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Slab test. Returns the entry distance along `dir` (unit length), or
    /// `None` when the ray misses or starts inside the box.
    pub fn ray_entry(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        if self.contains(origin) {
            return None;
        }
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < 1e-8 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

fn default_forward() -> Vec3 {
    Vec3::Z
}

/// One named object of the loaded level, in world space.
#[derive(Clone, Debug, Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub bounds: Aabb,
    pub position: Vec3,
    /// World direction of the object's local +Z axis.
    #[serde(default = "default_forward")]
    pub forward: Vec3,
    /// World position of the first child, used by viewpoint regions.
    #[serde(default)]
    pub anchor: Option<Vec3>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, bounds: Aabb) -> Self {
        Self {
            name: name.into(),
            position: bounds.center(),
            bounds,
            forward: Vec3::Z,
            anchor: None,
        }
    }

    pub fn with_forward(mut self, forward: Vec3) -> Self {
        self.forward = forward;
        self
    }

    pub fn with_anchor(mut self, anchor: Vec3) -> Self {
        self.anchor = Some(anchor);
        self
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
}

impl Scene {
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        let scene: Scene = serde_json::from_str(text)?;
        for obj in &scene.objects {
            if obj.bounds.min.cmpgt(obj.bounds.max).any() {
                return Err(SceneError::InvertedBounds(obj.name.clone()));
            }
        }
        Ok(scene)
    }
}

#[derive(Clone, Debug)]
pub struct Painting {
    pub id: String,
    pub center: Vec3,
    pub size: Vec3,
    pub forward: Vec3,
}

/// Floor area that snaps a floor click to an authored viewpoint.
#[derive(Clone, Debug)]
pub struct ViewpointRegion {
    pub name: String,
    pub bounds: Aabb,
    pub position: Vec3,
    pub look_at: Vec3,
}

impl ViewpointRegion {
    /// The viewpoint stands behind the region's origin, opposite its anchor,
    /// along whichever horizontal axis dominates.
    pub fn from_object(obj: &SceneObject) -> Option<Self> {
        let anchor = obj.anchor?;
        let towards = (anchor - obj.position).normalize_or_zero();
        let step = if towards.x.abs() > towards.z.abs() {
            Vec3::new(REGION_AXIS_STEP.copysign(towards.x), 0.0, 0.0)
        } else {
            Vec3::new(0.0, 0.0, REGION_AXIS_STEP.copysign(towards.z))
        };
        let mut position = obj.position - step * REGION_PULLBACK;
        position.y = anchor.y;
        Some(Self {
            name: obj.name.clone(),
            bounds: obj.bounds,
            position,
            look_at: position + step,
        })
    }
}

/// Lookup tables built once from the scene.
#[derive(Clone, Debug, Default)]
pub struct SceneIndex {
    pub paintings: FnvHashMap<String, Painting>,
    pub regions: Vec<ViewpointRegion>,
    pub floor_count: usize,
}

impl SceneIndex {
    pub fn build(scene: &Scene, rules: &SceneRules) -> Self {
        let mut index = SceneIndex::default();
        for obj in &scene.objects {
            if rules.is_region(&obj.name) {
                match ViewpointRegion::from_object(obj) {
                    Some(region) => index.regions.push(region),
                    None => log::warn!("[scene] region {} has no anchor", obj.name),
                }
            } else if rules.is_painting(&obj.name) {
                index.paintings.insert(
                    obj.name.clone(),
                    Painting {
                        id: obj.name.clone(),
                        center: obj.position,
                        size: obj.bounds.size(),
                        forward: obj.forward.normalize_or_zero(),
                    },
                );
            } else if rules.is_floor(&obj.name) {
                index.floor_count += 1;
            }
        }
        log::info!(
            "[scene] paintings={} regions={} floors={}",
            index.paintings.len(),
            index.regions.len(),
            index.floor_count
        );
        index
    }

    pub fn painting(&self, id: &str) -> Option<&Painting> {
        self.paintings.get(id)
    }

    /// Last region containing `point` wins, matching authoring order.
    pub fn region_at(&self, point: Vec3) -> Option<&ViewpointRegion> {
        self.regions.iter().rev().find(|r| r.bounds.contains(point))
    }
}

/// Weighted loading stages reported to the progress bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStage {
    Environment,
    Model,
    Skybox,
    Finalize,
}

impl LoadStage {
    /// Cumulative percentage reached once the stage completes.
    pub fn completed_percent(self) -> u8 {
        match self {
            LoadStage::Environment => 30,
            LoadStage::Model => 70,
            LoadStage::Skybox => 90,
            LoadStage::Finalize => 100,
        }
    }

    fn started_percent(self) -> u8 {
        match self {
            LoadStage::Environment => 0,
            LoadStage::Model => 30,
            LoadStage::Skybox => 70,
            LoadStage::Finalize => 90,
        }
    }
}

/// Loading progress that never moves backwards, whatever order the host
/// reports stages in.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoadProgress {
    reported: u8,
}

impl LoadProgress {
    pub fn percent(&self) -> u8 {
        self.reported
    }

    /// Returns the new percentage when it advanced.
    pub fn stage(&mut self, stage: LoadStage, fraction: f32) -> Option<u8> {
        let lo = stage.started_percent() as f32;
        let hi = stage.completed_percent() as f32;
        let value = (lo + (hi - lo) * fraction.clamp(0.0, 1.0)).round() as u8;
        self.advance(value)
    }

    pub fn advance(&mut self, percent: u8) -> Option<u8> {
        let percent = percent.min(100);
        if percent > self.reported {
            self.reported = percent;
            Some(percent)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_entry_hits_front_face() {
        let b = Aabb::new(Vec3::new(-1.0, 0.0, -5.0), Vec3::new(1.0, 3.0, -4.0));
        let t = b.ray_entry(Vec3::new(0.0, 2.5, 0.0), Vec3::NEG_Z).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
        assert!(b.ray_entry(Vec3::new(0.0, 2.5, 0.0), Vec3::Z).is_none());
    }

    #[test]
    fn ray_from_inside_is_ignored() {
        let b = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert!(b.ray_entry(Vec3::ZERO, Vec3::X).is_none());
    }

    #[test]
    fn region_viewpoint_backs_away_from_anchor() {
        let obj = SceneObject::new(
            "helperBox01",
            Aabb::new(Vec3::new(-2.0, -1.0, -2.0), Vec3::new(2.0, 1.0, 2.0)),
        )
        .with_anchor(Vec3::new(0.0, 2.5, 1.0));
        let r = ViewpointRegion::from_object(&obj).unwrap();
        assert!((r.position.z + 10.0).abs() < 1e-4);
        assert_eq!(r.position.y, 2.5);
        assert!(r.look_at.z > r.position.z);
    }

    #[test]
    fn progress_is_monotonic() {
        let mut p = LoadProgress::default();
        assert_eq!(p.stage(LoadStage::Model, 1.0), Some(70));
        assert_eq!(p.stage(LoadStage::Environment, 1.0), None);
        assert_eq!(p.percent(), 70);
        assert_eq!(p.stage(LoadStage::Finalize, 1.0), Some(100));
    }
}
