//! One-shot scripted camera sessions.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CINEMATIC_DURATION_SEC, DEFAULT_CINEMATIC_ROTATE_DEG, DEFAULT_DOLLY_NEAR_RATIO,
    MAX_CINEMATIC_DURATION_SEC, MIN_CINEMATIC_DURATION_SEC,
};
use crate::motion::{ease_cos, lerp, FlyCamConfig, Oscillation, Sequence};
use crate::pose::{wrap_deg, CameraPose, DistanceLimits};

/// Request for a cinematic session. Every field is optional; see
/// [`CinematicSession::from_options`] for how gaps are filled.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CinematicOptions {
    pub start_time: Option<f64>,
    pub duration_sec: Option<f32>,
    pub start_azimuth_deg: Option<f32>,
    pub end_azimuth_deg: Option<f32>,
    pub rotate_deg: Option<f32>,
    pub start_distance: Option<f32>,
    pub end_distance: Option<f32>,
    pub keep_distance: bool,
    pub near_distance: Option<f32>,
    pub far_distance: Option<f32>,
    pub distance_bob: Option<Oscillation>,
    pub start_polar_deg: Option<f32>,
    pub end_polar_deg: Option<f32>,
    pub keep_polar: bool,
    pub polar_bob: Option<Oscillation>,
    pub resume_fly_after: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum DistanceMode {
    /// far -> near over `[0, in_end]`, near held until `out_start`, near -> far after.
    #[serde(rename_all = "camelCase")]
    InOut {
        near: f32,
        far: f32,
        in_end: f32,
        out_start: f32,
    },
    Hold { value: f32 },
    Path {
        from: f32,
        to: f32,
        bob: Option<Oscillation>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum PolarMode {
    /// Fly-cam polar oscillation around its center.
    Bob,
    Hold { value: f32 },
    Path {
        from: f32,
        to: f32,
        bob: Option<Oscillation>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CinematicSession {
    pub start_time: Option<f64>,
    pub duration_sec: f32,
    pub base_azimuth_deg: f32,
    pub rotate_deg: f32,
    pub distance: DistanceMode,
    pub polar: PolarMode,
    pub resume_fly_after: bool,
    pub saved_fly_enabled: Option<bool>,
}

#[inline]
fn finite(v: Option<f32>) -> Option<f32> {
    v.filter(|x| x.is_finite())
}

impl CinematicSession {
    /// Resolve `opts` against the pose the camera currently shows.
    ///
    /// Precedence for distance and polar: explicit endpoints (path), then the
    /// keep flag (hold), then the mode default (in-out dolly, fly bob).
    pub fn from_options(opts: &CinematicOptions, current: CameraPose, limits: DistanceLimits) -> Self {
        let base = finite(opts.start_azimuth_deg).unwrap_or(current.azimuth_deg);
        let rotate = match (finite(opts.end_azimuth_deg), finite(opts.rotate_deg)) {
            (Some(end), _) => end - base,
            (None, Some(r)) => r,
            (None, None) => DEFAULT_CINEMATIC_ROTATE_DEG,
        };

        let start_d = finite(opts.start_distance);
        let end_d = finite(opts.end_distance);
        let distance = if start_d.is_some() || end_d.is_some() {
            DistanceMode::Path {
                from: limits.clamp(start_d.unwrap_or(current.distance)),
                to: limits.clamp(end_d.unwrap_or(current.distance)),
                bob: opts.distance_bob,
            }
        } else if opts.keep_distance {
            DistanceMode::Hold {
                value: current.distance,
            }
        } else {
            let far = limits.clamp(finite(opts.far_distance).unwrap_or(current.distance));
            let near =
                limits.clamp(finite(opts.near_distance).unwrap_or(far * DEFAULT_DOLLY_NEAR_RATIO));
            DistanceMode::InOut {
                near,
                far,
                in_end: 0.5,
                out_start: 0.5,
            }
        };

        let start_p = finite(opts.start_polar_deg);
        let end_p = finite(opts.end_polar_deg);
        let polar = if start_p.is_some() || end_p.is_some() {
            PolarMode::Path {
                from: start_p.unwrap_or(current.polar_deg),
                to: end_p.unwrap_or(current.polar_deg),
                bob: opts.polar_bob,
            }
        } else if opts.keep_polar {
            PolarMode::Hold {
                value: current.polar_deg,
            }
        } else {
            PolarMode::Bob
        };

        Self {
            start_time: opts.start_time.filter(|t| t.is_finite()),
            duration_sec: clamp_duration(opts.duration_sec),
            base_azimuth_deg: base,
            rotate_deg: rotate,
            distance,
            polar,
            resume_fly_after: opts.resume_fly_after.unwrap_or(true),
            saved_fly_enabled: None,
        }
    }

    /// Session for the intro sequence; the near plateau spans the rotate phase.
    pub fn from_sequence(seq: &Sequence, current: CameraPose, limits: DistanceLimits) -> Self {
        let [dolly_in, rotate, _] = seq.phases();
        let total = seq.total_sec();
        let duration_sec = clamp_duration(Some(total));
        let (in_end, out_start) = if total > 0.0 {
            (dolly_in / total, (dolly_in + rotate) / total)
        } else {
            (0.5, 0.5)
        };
        let far = limits.clamp(seq.far_distance);
        let near = limits.clamp(seq.near_distance);
        Self {
            start_time: None,
            duration_sec,
            base_azimuth_deg: current.azimuth_deg,
            rotate_deg: if seq.rotate_deg.is_finite() {
                seq.rotate_deg
            } else {
                DEFAULT_CINEMATIC_ROTATE_DEG
            },
            distance: DistanceMode::InOut {
                near,
                far,
                in_end,
                out_start,
            },
            polar: PolarMode::Bob,
            resume_fly_after: true,
            saved_fly_enabled: None,
        }
    }

    /// Progress in `[0, 1]` at `now`; `0` until the start time is stamped.
    pub fn progress(&self, now: f64) -> f32 {
        match self.start_time {
            Some(start) => {
                let elapsed = (now - start).max(0.0) as f32;
                (elapsed / self.duration_sec).clamp(0.0, 1.0)
            }
            None => 0.0,
        }
    }

    /// Raw pose at progress `p` (seconds `elapsed` drive the bobs).
    pub fn sample(&self, p: f32, elapsed: f32, fly: &FlyCamConfig) -> CameraPose {
        let p = p.clamp(0.0, 1.0);
        let envelope = (PI * p).sin();
        let azimuth = wrap_deg(self.base_azimuth_deg + self.rotate_deg * p);
        let distance = match self.distance {
            DistanceMode::InOut {
                near,
                far,
                in_end,
                out_start,
            } => in_out(near, far, in_end, out_start, p),
            DistanceMode::Hold { value } => value,
            DistanceMode::Path { from, to, bob } => {
                lerp(from, to, ease_cos(p)) + bob.map_or(0.0, |b| b.value(elapsed) * envelope)
            }
        };
        let polar = match self.polar {
            PolarMode::Bob => fly.polar_center_deg + fly.polar_bob(elapsed),
            PolarMode::Hold { value } => value,
            PolarMode::Path { from, to, bob } => {
                lerp(from, to, ease_cos(p)) + bob.map_or(0.0, |b| b.value(elapsed) * envelope)
            }
        };
        CameraPose::new(azimuth, polar, distance)
    }

    /// Exact end pose: no bob residual.
    pub fn final_pose(&self, fly: &FlyCamConfig) -> CameraPose {
        let distance = match self.distance {
            DistanceMode::InOut { far, .. } => far,
            DistanceMode::Hold { value } => value,
            DistanceMode::Path { to, .. } => to,
        };
        let polar = match self.polar {
            PolarMode::Bob => fly.polar_center_deg,
            PolarMode::Hold { value } => value,
            PolarMode::Path { to, .. } => to,
        };
        CameraPose::new(
            wrap_deg(self.base_azimuth_deg + self.rotate_deg),
            polar,
            distance,
        )
    }
}

fn clamp_duration(d: Option<f32>) -> f32 {
    match finite(d) {
        Some(d) if d > 0.0 => d.clamp(MIN_CINEMATIC_DURATION_SEC, MAX_CINEMATIC_DURATION_SEC),
        _ => DEFAULT_CINEMATIC_DURATION_SEC,
    }
}

fn in_out(near: f32, far: f32, in_end: f32, out_start: f32, p: f32) -> f32 {
    if p <= in_end {
        if in_end > 0.0 {
            lerp(far, near, ease_cos(p / in_end))
        } else {
            near
        }
    } else if p < out_start {
        near
    } else if out_start < 1.0 {
        lerp(near, far, ease_cos((p - out_start) / (1.0 - out_start)))
    } else {
        far
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current() -> CameraPose {
        CameraPose::new(30.0, 60.0, 150.0)
    }

    #[test]
    fn end_azimuth_beats_rotate() {
        let opts = CinematicOptions {
            start_azimuth_deg: Some(10.0),
            end_azimuth_deg: Some(100.0),
            rotate_deg: Some(720.0),
            ..Default::default()
        };
        let s = CinematicSession::from_options(&opts, current(), DistanceLimits::default());
        assert_eq!(s.rotate_deg, 90.0);
        assert_eq!(s.base_azimuth_deg, 10.0);
    }

    #[test]
    fn path_wins_over_keep() {
        let opts = CinematicOptions {
            end_distance: Some(80.0),
            keep_distance: true,
            keep_polar: true,
            ..Default::default()
        };
        let s = CinematicSession::from_options(&opts, current(), DistanceLimits::default());
        assert!(matches!(s.distance, DistanceMode::Path { from, to, .. } if from == 150.0 && to == 80.0));
        assert_eq!(s.polar, PolarMode::Hold { value: 60.0 });
    }

    #[test]
    fn in_out_reaches_near_at_midpoint() {
        let s = CinematicSession::from_options(
            &CinematicOptions::default(),
            current(),
            DistanceLimits::default(),
        );
        let fly = FlyCamConfig::default();
        assert!((s.sample(0.0, 0.0, &fly).distance - 150.0).abs() < 1e-3);
        assert!((s.sample(0.5, 5.0, &fly).distance - 75.0).abs() < 1e-3);
        assert!((s.sample(1.0, 10.0, &fly).distance - 150.0).abs() < 1e-3);
    }

    #[test]
    fn sequence_holds_near_during_rotate_phase() {
        let seq = Sequence::default();
        let s = CinematicSession::from_sequence(&seq, current(), DistanceLimits::default());
        let fly = FlyCamConfig::default();
        assert_eq!(s.duration_sec, 10.0);
        for p in [0.3, 0.5, 0.7] {
            assert!((s.sample(p, p * 10.0, &fly).distance - seq.near_distance).abs() < 1e-3);
        }
    }
}
