//! Frame orchestration and click handling.
//!
//! `Gallery` owns every movement component. Event handlers call the `on_*`
//! methods between frames; `tick` runs once per display refresh and either
//! advances the running transition or steps free movement, never both.

use crate::catalog::{ArtworkLookup, ArtworkProvider};
use crate::collision::{find_nearest_safe_position, CollidableSet};
use crate::config::GalleryConfig;
use crate::constants::MARKER_LIFT;
use crate::debounce::DragState;
use crate::error::GalleryError;
use crate::events::{EventBus, EventKind, GalleryEvent};
use crate::input::{InputState, MoveKey};
use crate::integrator::MotionIntegrator;
use crate::rig::{CameraPose, CameraRig, Orientation, PointerKind, ViewMode};
use crate::scene::{LoadProgress, LoadStage, Scene, SceneIndex};
use crate::tween::{FlyTo, TeleportStart, TweenDirector, TweenEvent, TweenHooks, TweenPurpose};
use crate::viewing::{viewing_pose, ViewingSession};
use glam::{Vec2, Vec3};
use instant::Instant;
use serde::Deserialize;

/// Nearest object under the pointer, as reported by the host raycaster.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PickHit {
    pub name: String,
    pub point: Vec3,
}

impl PickHit {
    pub fn new(name: impl Into<String>, point: Vec3) -> Self {
        Self {
            name: name.into(),
            point,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClickOutcome {
    /// Discarded as the tail of a drag gesture.
    Suppressed,
    Ignored,
    FloorMove(Vec3),
    ApproachArtwork(String),
    ShowDetail(String),
    ShowUploadForm(String),
    /// Painting without metadata or without scene geometry.
    NoData(String),
}

pub struct Gallery<P> {
    config: GalleryConfig,
    input: InputState,
    drag: DragState,
    rig: CameraRig,
    integrator: MotionIntegrator,
    tweens: TweenDirector,
    viewing: ViewingSession,
    colliders: CollidableSet,
    placement: CollidableSet,
    index: SceneIndex,
    progress: LoadProgress,
    events: EventBus,
    provider: P,
    scene_installed: bool,
    marker: Option<Vec3>,
    marker_hidden: bool,
}

impl<P: ArtworkProvider> Gallery<P> {
    pub fn new(config: GalleryConfig, provider: P) -> Self {
        Self {
            input: InputState::new(&config.movement),
            drag: DragState::default(),
            rig: CameraRig::new(&config.movement),
            integrator: MotionIntegrator::new(),
            tweens: TweenDirector::new(config.transitions.fade_duration()),
            viewing: ViewingSession::default(),
            colliders: CollidableSet::default(),
            placement: CollidableSet::default(),
            index: SceneIndex::default(),
            progress: LoadProgress::default(),
            events: EventBus::new(),
            provider,
            scene_installed: false,
            marker: None,
            marker_hidden: false,
            config,
        }
    }

    /// Registers level geometry and places the camera. Only the first scene
    /// is accepted; colliders are fixed from then on.
    pub fn install_scene(&mut self, scene: &Scene) -> Result<(), GalleryError> {
        if self.scene_installed {
            return Err(GalleryError::SceneAlreadyInstalled);
        }
        let rules = &self.config.scene;
        self.colliders =
            CollidableSet::from_scene(scene, |n| rules.is_collidable(n), |n| rules.is_thin(n));
        self.placement = CollidableSet::from_scene(
            scene,
            |n| rules.is_placement_obstacle(n),
            |n| rules.is_thin(n),
        );
        self.index = SceneIndex::build(scene, rules);
        self.rig
            .init_camera(self.config.movement.initial_position, Orientation::default());
        self.scene_installed = true;
        log::info!(
            "[gallery] scene installed: colliders={} placement={}",
            self.colliders.len(),
            self.placement.len()
        );
        Ok(())
    }

    pub fn attach_avatar(&mut self, yaw: f32) {
        self.rig.attach_avatar(yaw);
    }

    pub fn painting_ids(&self) -> impl Iterator<Item = &str> {
        self.index.paintings.keys().map(String::as_str)
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn integrator(&self) -> &MotionIntegrator {
        &self.integrator
    }

    pub fn viewing(&self) -> &ViewingSession {
        &self.viewing
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn is_transitioning(&self) -> bool {
        self.tweens.is_active()
    }

    pub fn view_pose(&self) -> Option<CameraPose> {
        self.rig.view_pose()
    }

    // ---------------- Input ----------------

    pub fn on_key_down(&mut self, code: &str) -> bool {
        match MoveKey::from_code(code) {
            Some(key) => {
                self.input.on_key_down(key);
                true
            }
            None => false,
        }
    }

    pub fn on_key_up(&mut self, code: &str, now: Instant) -> bool {
        match MoveKey::from_code(code) {
            Some(key) => {
                self.input.on_key_up(key, now);
                true
            }
            None => false,
        }
    }

    pub fn on_joystick_start(&mut self) {
        self.input.on_joystick_start();
    }

    pub fn on_joystick_move(&mut self, vector: Vec2, distance: f32) {
        self.input.on_joystick_move(vector, distance);
    }

    pub fn on_joystick_end(&mut self, now: Instant) {
        self.input.on_joystick_end(now);
    }

    /// Window blur or tab switch: key-up events may never arrive.
    pub fn on_focus_lost(&mut self) {
        self.input.reset_all();
        self.drag.cancel();
        log::info!("[gallery] focus lost, input reset");
    }

    pub fn on_pointer_down(&mut self) {
        self.drag.begin();
    }

    pub fn on_pointer_move(&mut self, dx: f32, dy: f32, kind: PointerKind, now: Instant) {
        if self.drag.moved(now) {
            self.rig.apply_look(dx, dy, kind);
        }
    }

    pub fn on_pointer_up(&mut self, now: Instant) {
        self.drag.end(now);
    }

    pub fn on_hover(&mut self, hit: Option<&PickHit>) {
        if self.marker_hidden {
            return;
        }
        let marker = hit
            .filter(|h| self.config.scene.is_floor(&h.name))
            .map(|h| h.point + Vec3::Y * MARKER_LIFT);
        if marker != self.marker {
            self.marker = marker;
            self.events.emit(GalleryEvent::FloorMarker { position: marker });
        }
    }

    // ---------------- Clicks ----------------

    pub fn on_click(&mut self, hit: Option<&PickHit>, now: Instant) -> ClickOutcome {
        if !self
            .drag
            .click_allowed(now, self.config.movement.drag_click_guard())
        {
            log::debug!("[gallery] click suppressed after drag");
            return ClickOutcome::Suppressed;
        }
        let Some(hit) = hit else {
            return ClickOutcome::Ignored;
        };
        if !self.rig.is_ready() {
            return ClickOutcome::Ignored;
        }
        if self.config.scene.is_painting(&hit.name) {
            self.click_painting(&hit.name, now)
        } else if self.config.scene.is_floor(&hit.name) {
            self.click_floor(hit.point, now)
        } else {
            ClickOutcome::Ignored
        }
    }

    fn click_floor(&mut self, point: Vec3, now: Instant) -> ClickOutcome {
        let (Some(current), Some(view)) = (self.rig.body_position(), self.rig.view_pose()) else {
            return ClickOutcome::Ignored;
        };
        let target = Vec3::new(point.x, current.y, point.z);
        let safe = find_nearest_safe_position(
            current,
            target,
            &self.placement,
            self.config.collision.floor_click_safety,
        );
        let probe = Vec3::new(safe.x, point.y, safe.z);
        let (position, look_at) = match self.index.region_at(probe) {
            Some(region) => {
                log::info!("[gallery] floor click in region {}", region.name);
                let position = Vec3::new(region.position.x, current.y, region.position.z);
                (position, position + (region.look_at - region.position))
            }
            None => (
                safe,
                safe + view.orientation.forward() * self.config.viewing.floor_look_ahead,
            ),
        };

        self.marker = Some(point + Vec3::Y * MARKER_LIFT);
        self.begin_transition();
        let fly = FlyTo::new(position, look_at, self.config.transitions.fly_duration());
        if !self
            .tweens
            .fly_to(&mut self.rig, fly, TweenPurpose::FloorMove, TweenHooks::default(), now)
        {
            return ClickOutcome::Ignored;
        }
        self.marker_hidden = true;
        self.events.emit(GalleryEvent::FloorMarker { position: None });
        ClickOutcome::FloorMove(position)
    }

    fn click_painting(&mut self, id: &str, now: Instant) -> ClickOutcome {
        let Some(lookup) = self.provider.lookup(id) else {
            log::info!("[gallery] {} has no data, skipping", id);
            return ClickOutcome::NoData(id.to_string());
        };

        if self.viewing.is_viewing(id) {
            return match lookup {
                ArtworkLookup::Remote(artwork) | ArtworkLookup::Custom(artwork) => {
                    self.events.emit(GalleryEvent::ShowArtworkDetail { artwork });
                    ClickOutcome::ShowDetail(id.to_string())
                }
                ArtworkLookup::OpenBooth { id: booth } => {
                    self.events.emit(GalleryEvent::ShowUploadForm {
                        booth: booth.clone(),
                    });
                    ClickOutcome::ShowUploadForm(booth)
                }
            };
        }

        let Some(painting) = self.index.painting(id) else {
            log::warn!("[gallery] {} not in scene", id);
            return ClickOutcome::NoData(id.to_string());
        };
        let rules = &self.config.scene;
        let pose = viewing_pose(
            painting,
            &self.config.viewing,
            self.rig.eye_height(),
            rules.views_from_back(id),
        );
        let fly = FlyTo::new(pose.position, pose.look_at, self.config.transitions.fly_duration())
            .with_flip(rules.flips_facing(id));
        self.begin_transition();
        let purpose = TweenPurpose::ViewArtwork(id.to_string());
        if !self
            .tweens
            .fly_to(&mut self.rig, fly, purpose, TweenHooks::default(), now)
        {
            return ClickOutcome::Ignored;
        }
        ClickOutcome::ApproachArtwork(id.to_string())
    }

    fn begin_transition(&mut self) {
        self.viewing.reset();
        self.integrator.stop();
    }

    // ---------------- Transitions ----------------

    /// Scripted fly-to for host-driven tours.
    pub fn fly_to(&mut self, fly: FlyTo, hooks: TweenHooks, now: Instant) -> bool {
        self.begin_transition();
        self.tweens
            .fly_to(&mut self.rig, fly, TweenPurpose::Scripted, hooks, now)
    }

    pub fn teleport_to(
        &mut self,
        label: &str,
        position: Vec3,
        look_at: Vec3,
        now: Instant,
    ) -> Option<TeleportStart> {
        self.input.reset_all();
        self.begin_transition();
        let fade = self.events.has_listener(EventKind::ToggleFade);
        let purpose = TweenPurpose::Teleport(label.to_string());
        let start = self.tweens.teleport_to(
            &mut self.rig,
            position,
            look_at,
            fade,
            purpose.clone(),
            TweenHooks::default(),
            now,
        )?;
        match start {
            TeleportStart::Faded => self.events.emit(GalleryEvent::ToggleFade { visible: true }),
            TeleportStart::Immediate => self.transition_done(purpose),
        }
        Some(start)
    }

    pub fn teleport_to_map_point(
        &mut self,
        id: &str,
        now: Instant,
    ) -> Result<Option<TeleportStart>, GalleryError> {
        let point = self
            .config
            .map_points
            .get(id)
            .ok_or_else(|| GalleryError::UnknownMapPoint(id.to_string()))?;
        let (position, look_at) = (point.position, point.look_at);
        Ok(self.teleport_to(id, position, look_at, now))
    }

    /// Resets input and any running transition, then swaps view mode.
    pub fn toggle_mode(&mut self) -> ViewMode {
        self.input.reset_all();
        self.tweens.cancel();
        self.integrator.stop();
        self.marker_hidden = false;
        self.rig.set_controls_enabled(true);
        let before = self.rig.mode();
        let mode = self.rig.toggle_mode();
        if mode != before {
            self.events.emit(GalleryEvent::ModeChanged { mode });
        }
        mode
    }

    fn transition_done(&mut self, purpose: TweenPurpose) {
        match purpose {
            TweenPurpose::FloorMove => {
                self.marker_hidden = false;
                self.events.emit(GalleryEvent::FloorMarker {
                    position: self.marker,
                });
            }
            TweenPurpose::ViewArtwork(id) => self.viewing.arrive(id),
            TweenPurpose::Teleport(_) => self.input.reset_all(),
            TweenPurpose::Scripted => {}
        }
    }

    // ---------------- Loading ----------------

    pub fn report_progress(&mut self, stage: LoadStage, fraction: f32) {
        if let Some(percent) = self.progress.stage(stage, fraction) {
            self.events.emit(GalleryEvent::LoadingProgress { percent });
        }
    }

    // ---------------- Frame ----------------

    /// One simulation step. Returns the pose to render, if any.
    pub fn tick(&mut self, now: Instant) -> Option<CameraPose> {
        self.input.poll(now);
        let intent = self.input.intent();

        if self.tweens.is_active() {
            if self.rig.mode() == ViewMode::ThirdPerson && self.tweens.is_flying() {
                if let Some(state) = self.integrator.mark_moving(now) {
                    self.events.emit(GalleryEvent::AvatarAnimation { state });
                }
            }
            match self.tweens.update(&mut self.rig, now) {
                Some(TweenEvent::Fade(visible)) => {
                    self.events.emit(GalleryEvent::ToggleFade { visible })
                }
                Some(TweenEvent::Finished(purpose)) => self.transition_done(purpose),
                None => {}
            }
        } else {
            let out = self
                .integrator
                .step(&intent, &mut self.rig, &self.colliders, &self.config, now);
            if let Some(state) = out.animation {
                self.events.emit(GalleryEvent::AvatarAnimation { state });
            }
        }
        self.rig.view_pose()
    }
}
