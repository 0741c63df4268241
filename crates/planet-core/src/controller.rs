//! The per-scene driver composing settings, camera director and scene builder.
//!
//! Typical usage from a frontend:
//! - construct with `PlanetScene::new(seed)` and call `start(&patch)`
//! - call `frame(now_sec)` once per display refresh and apply the output
//! - forward user input to `set_camera_params`, `orbit_drag`, `zoom`
//! - report texture loads back through `texture_loaded`

use std::sync::Arc;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::cinematic::CinematicOptions;
use crate::director::{CameraDirector, CameraMode, CameraParams};
use crate::error::TextureError;
use crate::pose::CameraPose;
use crate::scene::{spin, LightLevels, ObjectSpin, SceneBuilder, SceneRebuild, SignalList};
use crate::settings::coerce::{finite_or, non_negative};
use crate::settings::{SceneSettings, SettingsPatch, SettingsStore};
use crate::textures::{TextureHandle, TextureOutcome};

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOutput {
    pub pose: CameraPose,
    pub eye: Vec3,
    pub target: Vec3,
    pub mode: CameraMode,
    pub fov_deg: f32,
    pub spin: ObjectSpin,
    pub lights: LightLevels,
    /// Present on the first frame after start and after each settings update.
    pub rebuild: Option<SceneRebuild>,
}

pub struct PlanetScene {
    store: SettingsStore,
    director: CameraDirector,
    builder: SceneBuilder,
    rng: StdRng,
    running: bool,
    needs_rebuild: bool,
    started_at: Option<f64>,
}

impl PlanetScene {
    pub fn new(seed: u64) -> Self {
        let store = SettingsStore::new();
        let director = CameraDirector::new(&store.snapshot().camera);
        Self {
            store,
            director,
            builder: SceneBuilder::new(),
            rng: StdRng::seed_from_u64(seed),
            running: false,
            needs_rebuild: true,
            started_at: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn settings(&self) -> Arc<SceneSettings> {
        self.store.snapshot()
    }

    pub fn director(&self) -> &CameraDirector {
        &self.director
    }

    pub fn generation(&self) -> u64 {
        self.builder.generation()
    }

    /// Apply `patch` and begin producing frames. Calling it while running
    /// only applies the settings.
    pub fn start(&mut self, patch: &SettingsPatch) {
        self.set_settings(patch);
        if self.running {
            return;
        }
        self.running = true;
        log::info!("[scene] started");
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        log::info!("[scene] stopped");
    }

    pub fn set_settings(&mut self, patch: &SettingsPatch) {
        let snapshot = self.store.replace(patch);
        self.director.configure(&snapshot.camera);
        self.needs_rebuild = true;
    }

    pub fn set_camera_params(&mut self, params: CameraParams) -> bool {
        self.director.set_params(params)
    }

    pub fn orbit_drag(&mut self, dx_px: f32, dy_px: f32) -> bool {
        self.director.orbit_drag(dx_px, dy_px)
    }

    pub fn zoom(&mut self, notches: f32) -> bool {
        self.director.zoom(notches)
    }

    pub fn start_cinematic(&mut self, opts: &CinematicOptions) {
        self.director.start_cinematic(opts);
    }

    pub fn stop_cinematic(&mut self) {
        self.director.stop_cinematic();
    }

    pub fn texture_loaded(
        &mut self,
        handle: &TextureHandle,
        result: Result<(), TextureError>,
    ) -> TextureOutcome {
        self.builder.complete_texture(handle, result)
    }

    /// Advance to `now_sec`. `None` while stopped.
    pub fn frame(&mut self, now_sec: f64) -> Option<FrameOutput> {
        if !self.running {
            return None;
        }
        let settings = self.store.snapshot();
        let pose = self.director.tick(now_sec);

        let rebuild = if self.needs_rebuild {
            self.needs_rebuild = false;
            Some(self.builder.rebuild(&settings, &mut self.rng))
        } else {
            None
        };

        if self.started_at.is_none() && now_sec.is_finite() {
            self.started_at = Some(now_sec);
        }
        let elapsed = match self.started_at {
            Some(started) if now_sec.is_finite() => (now_sec - started).max(0.0) as f32,
            _ => 0.0,
        };

        Some(FrameOutput {
            pose,
            eye: pose.position(),
            target: Vec3::ZERO,
            mode: self.director.mode(),
            fov_deg: finite_or(settings.camera.fov, 70.0).clamp(1.0, 179.0),
            spin: spin(&settings, elapsed),
            lights: LightLevels {
                point: non_negative(settings.lights.point),
                ambient: non_negative(settings.lights.ambient),
            },
            rebuild,
        })
    }

    /// Stop and retire the current scene generation. Texture completions that
    /// arrive afterwards are dropped.
    pub fn teardown(&mut self) -> SignalList {
        self.stop();
        self.needs_rebuild = true;
        self.builder.teardown()
    }
}
