//! Camera director: decides which motion source owns the camera each tick.
//!
//! Exactly one mode is authoritative per tick, with precedence
//! Cinematic > FlyCam > Manual:
//! - Manual returns the baseline pose, mutated only by `set_params`, the drag
//!   and zoom helpers, auto-rotate, or the end of a cinematic session
//! - FlyCam samples [`FlyCamConfig`] on its own timeline
//! - Cinematic samples the active [`CinematicSession`] until progress hits 1,
//!   then snaps, persists the final pose and hands back in the same tick
//!
//! Any non-finite intermediate falls back to the baseline; nothing here fails.

use serde::{Deserialize, Serialize};

use crate::cinematic::{CinematicOptions, CinematicSession};
use crate::constants::{
    AUTO_ROTATE_DEG_PER_SEC_PER_UNIT, DRAG_DEG_PER_PX, MAX_FRAME_DELTA_SEC, ZOOM_STEP,
};
use crate::motion::FlyCamConfig;
use crate::pose::{wrap_deg, CameraPose, DistanceLimits};
use crate::settings::coerce::finite_or;
use crate::settings::CameraSettings;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CameraMode {
    Manual,
    FlyCam,
    Cinematic,
}

/// Absolute adjustments to the manual pose; absent or non-finite fields are
/// left alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraParams {
    pub azimuth_deg: Option<f32>,
    pub polar_deg: Option<f32>,
    pub distance: Option<f32>,
}

#[derive(Clone, Copy, Debug)]
struct FlyClock {
    start: f64,
    base_azimuth_deg: f32,
}

pub struct CameraDirector {
    limits: DistanceLimits,
    fly: FlyCamConfig,
    fly_enabled: bool,
    fly_clock: Option<FlyClock>,
    auto_rotate_deg_per_sec: Option<f32>,
    invert_y: bool,
    configured_pose: CameraPose,
    baseline: CameraPose,
    current: CameraPose,
    session: Option<CinematicSession>,
    /// Fly flag changed by a settings update while a session ran; wins over
    /// `resume_fly_after` when the session ends.
    fly_from_settings: Option<bool>,
    intro_armed: bool,
    intro_played: bool,
    last_now: Option<f64>,
}

fn settings_pose(camera: &CameraSettings) -> CameraPose {
    CameraPose::new(camera.azimuth_deg, camera.polar_deg, camera.distance)
}

impl CameraDirector {
    pub fn new(camera: &CameraSettings) -> Self {
        let limits = DistanceLimits::new(camera.min_distance, camera.max_distance);
        let fallback = settings_pose(&CameraSettings::default()).sanitized_or(
            limits,
            CameraPose::new(0.0, 90.0, limits.min),
        );
        let baseline = settings_pose(camera).sanitized_or(limits, fallback);
        let mut director = Self {
            limits,
            fly: camera.fly.clone(),
            fly_enabled: false,
            fly_clock: None,
            auto_rotate_deg_per_sec: None,
            invert_y: camera.invert_y,
            configured_pose: settings_pose(camera),
            baseline,
            current: baseline,
            session: None,
            fly_from_settings: None,
            intro_armed: false,
            intro_played: false,
            last_now: None,
        };
        director.configure(camera);
        director
    }

    /// Adopt a new camera settings group.
    ///
    /// The manual baseline is reset only when the configured distance,
    /// azimuth or polar changed, so unrelated settings updates keep the
    /// user's orbit.
    pub fn configure(&mut self, camera: &CameraSettings) {
        self.limits = DistanceLimits::new(camera.min_distance, camera.max_distance);
        self.fly = camera.fly.clone();
        self.invert_y = camera.invert_y;
        self.auto_rotate_deg_per_sec = camera
            .auto_rotate
            .then(|| finite_or(camera.auto_rotate_speed, 2.0) * AUTO_ROTATE_DEG_PER_SEC_PER_UNIT);

        // fly toggle first: disabling hands the fly pose to the baseline,
        // which a changed configured pose then overrides
        match self.session.as_mut() {
            Some(session) => {
                if session.saved_fly_enabled != Some(camera.fly.enabled) {
                    self.fly_from_settings = Some(camera.fly.enabled);
                }
                session.saved_fly_enabled = Some(camera.fly.enabled);
            }
            None => self.set_fly_enabled(camera.fly.enabled),
        }

        let configured = settings_pose(camera);
        if configured != self.configured_pose {
            self.configured_pose = configured;
            self.baseline = configured.sanitized_or(self.limits, self.baseline);
            log::debug!(
                "[camera] baseline reset to az={:.1} polar={:.1} dist={:.1}",
                self.baseline.azimuth_deg,
                self.baseline.polar_deg,
                self.baseline.distance
            );
        } else {
            self.baseline = self.baseline.sanitized_or(self.limits, self.baseline);
        }
        if self.mode() == CameraMode::Manual {
            self.current = self.baseline;
        }

        self.intro_armed = camera.fly.sequence.enabled && !self.intro_played;
    }

    fn set_fly_enabled(&mut self, on: bool) {
        if on == self.fly_enabled {
            return;
        }
        if !on {
            // hand the last fly pose to manual control without a jump
            self.baseline = self.current;
        }
        self.fly_enabled = on;
        self.fly_clock = None;
        log::info!("[camera] fly-cam {}", if on { "enabled" } else { "disabled" });
    }

    pub fn mode(&self) -> CameraMode {
        if self.session.is_some() {
            CameraMode::Cinematic
        } else if self.fly_enabled {
            CameraMode::FlyCam
        } else {
            CameraMode::Manual
        }
    }

    /// Last pose returned by `tick` (the baseline before the first tick).
    pub fn pose(&self) -> CameraPose {
        self.current
    }

    pub fn baseline(&self) -> CameraPose {
        self.baseline
    }

    pub fn limits(&self) -> DistanceLimits {
        self.limits
    }

    pub fn fly_enabled(&self) -> bool {
        self.fly_enabled
    }

    pub fn is_cinematic_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&CinematicSession> {
        self.session.as_ref()
    }

    pub fn tick(&mut self, now: f64) -> CameraPose {
        if !now.is_finite() {
            return self.current;
        }
        let dt = self
            .last_now
            .map(|prev| (now - prev).clamp(0.0, MAX_FRAME_DELTA_SEC))
            .unwrap_or(0.0);
        self.last_now = Some(now);

        if self.intro_armed {
            self.intro_armed = false;
            self.intro_played = true;
            let intro = CinematicSession::from_sequence(&self.fly.sequence, self.current, self.limits);
            log::info!("[camera] intro sequence ({:.1}s)", intro.duration_sec);
            self.begin_session(intro);
        }

        let pose = match self.mode() {
            CameraMode::Cinematic => self.tick_cinematic(now),
            CameraMode::FlyCam => self.tick_fly(now),
            CameraMode::Manual => self.tick_manual(dt),
        };
        self.current = pose;
        pose
    }

    fn tick_manual(&mut self, dt: f64) -> CameraPose {
        if let Some(rate) = self.auto_rotate_deg_per_sec {
            if dt > 0.0 {
                self.baseline.azimuth_deg = wrap_deg(self.baseline.azimuth_deg + rate * dt as f32);
            }
        }
        self.baseline
    }

    fn tick_fly(&mut self, now: f64) -> CameraPose {
        let clock = *self.fly_clock.get_or_insert(FlyClock {
            start: now,
            base_azimuth_deg: self.current.azimuth_deg,
        });
        let elapsed = (now - clock.start).max(0.0) as f32;
        let raw = self.fly.sample(clock.base_azimuth_deg, elapsed);
        if !raw.is_finite() {
            log::debug!("[camera] non-finite fly pose at t={:.2}; holding baseline", elapsed);
            return self.baseline;
        }
        raw.sanitized_or(self.limits, self.baseline)
    }

    fn tick_cinematic(&mut self, now: f64) -> CameraPose {
        let Some(mut session) = self.session.take() else {
            return self.baseline;
        };
        let start = *session.start_time.get_or_insert(now);
        let elapsed = (now - start).max(0.0) as f32;
        let p = session.progress(now);

        if p >= 1.0 {
            let end = session.final_pose(&self.fly);
            if !end.is_finite() {
                return self.abort_session(&session);
            }
            let end = end.sanitized_or(self.limits, self.baseline);
            self.baseline = end;
            let resume = match self.fly_from_settings.take() {
                Some(on) => on,
                None => session.resume_fly_after && session.saved_fly_enabled == Some(true),
            };
            if resume {
                self.fly_enabled = true;
                self.fly_clock = Some(FlyClock {
                    start: now,
                    base_azimuth_deg: end.azimuth_deg,
                });
            }
            log::info!(
                "[camera] cinematic finished az={:.1} polar={:.1} dist={:.1} fly={}",
                end.azimuth_deg,
                end.polar_deg,
                end.distance,
                self.fly_enabled
            );
            return end;
        }

        let raw = session.sample(p, elapsed, &self.fly);
        if !raw.is_finite() {
            return self.abort_session(&session);
        }
        self.session = Some(session);
        raw.sanitized_or(self.limits, self.baseline)
    }

    fn abort_session(&mut self, session: &CinematicSession) -> CameraPose {
        log::warn!("[camera] cinematic produced a non-finite pose; reverting to manual baseline");
        self.restore_fly(session.saved_fly_enabled);
        self.baseline
    }

    fn restore_fly(&mut self, saved: Option<bool>) {
        self.fly_from_settings = None;
        if let Some(enabled) = saved {
            self.fly_enabled = enabled;
            self.fly_clock = None;
        }
    }

    fn begin_session(&mut self, mut session: CinematicSession) {
        // a replaced session keeps the flag captured before the first one
        session.saved_fly_enabled = match self.session.take() {
            Some(previous) => previous.saved_fly_enabled,
            None => Some(self.fly_enabled),
        };
        self.fly_enabled = false;
        self.fly_clock = None;
        log::info!(
            "[camera] cinematic start az={:.1} rotate={:.1} over {:.2}s",
            session.base_azimuth_deg,
            session.rotate_deg,
            session.duration_sec
        );
        self.session = Some(session);
    }

    pub fn start_cinematic(&mut self, opts: &CinematicOptions) {
        let session = CinematicSession::from_options(opts, self.current, self.limits);
        self.begin_session(session);
    }

    /// Abort the active session where it stands. No-op when idle.
    pub fn stop_cinematic(&mut self) {
        match self.session.take() {
            Some(session) => {
                self.baseline = self.current;
                self.restore_fly(session.saved_fly_enabled);
                log::info!("[camera] cinematic stopped");
            }
            None => log::debug!("[camera] stop_cinematic with no active session"),
        }
    }

    /// Merge absolute pose fields into the manual baseline. Ignored unless
    /// the director is in manual mode.
    pub fn set_params(&mut self, params: CameraParams) -> bool {
        if self.mode() != CameraMode::Manual {
            log::debug!("[camera] set_params ignored in {:?} mode", self.mode());
            return false;
        }
        let mut next = self.baseline;
        if let Some(az) = params.azimuth_deg.filter(|v| v.is_finite()) {
            next.azimuth_deg = az;
        }
        if let Some(polar) = params.polar_deg.filter(|v| v.is_finite()) {
            next.polar_deg = polar;
        }
        if let Some(d) = params.distance.filter(|v| v.is_finite()) {
            next.distance = d;
        }
        self.apply_manual(next);
        true
    }

    /// Basic drag-to-orbit for hosts without an orbit-control capability.
    pub fn orbit_drag(&mut self, dx_px: f32, dy_px: f32) -> bool {
        if self.mode() != CameraMode::Manual || !dx_px.is_finite() || !dy_px.is_finite() {
            return false;
        }
        let dy = if self.invert_y { -dy_px } else { dy_px };
        let mut next = self.baseline;
        next.azimuth_deg -= dx_px * DRAG_DEG_PER_PX;
        next.polar_deg -= dy * DRAG_DEG_PER_PX;
        self.apply_manual(next);
        true
    }

    /// Dolly by wheel notches; positive moves away from the target.
    pub fn zoom(&mut self, notches: f32) -> bool {
        if self.mode() != CameraMode::Manual || !notches.is_finite() {
            return false;
        }
        let mut next = self.baseline;
        next.distance *= ZOOM_STEP.powf(-notches);
        self.apply_manual(next);
        true
    }

    fn apply_manual(&mut self, next: CameraPose) {
        self.baseline = next.sanitized_or(self.limits, self.baseline);
        self.current = self.baseline;
    }
}
