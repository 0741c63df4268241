//! Parametric camera motion: easing, oscillations, fly-cam and the intro sequence.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};

use crate::pose::CameraPose;
use crate::settings::coerce::{finite_or, non_negative};
use crate::settings::pick;

/// Cosine ease on `[0, 1]`: `0.5 - 0.5 cos(pi x)`.
#[inline]
pub fn ease_cos(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    0.5 - 0.5 * (PI * x).cos()
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Additive sinusoid `amplitude * sin(2 pi f t)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Oscillation {
    pub amplitude: f32,
    pub frequency_hz: f32,
}

impl Oscillation {
    #[inline]
    pub fn value(&self, t: f32) -> f32 {
        self.amplitude * (TAU * self.frequency_hz * t).sin()
    }
}

/// Scripted intro: dolly in, rotate, dolly out. Played once as a cinematic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sequence {
    pub enabled: bool,
    pub dolly_in_sec: f32,
    pub rotate_sec: f32,
    pub dolly_out_sec: f32,
    pub rotate_deg: f32,
    pub near_distance: f32,
    pub far_distance: f32,
}

impl Default for Sequence {
    fn default() -> Self {
        Self {
            enabled: false,
            dolly_in_sec: 2.5,
            rotate_sec: 5.0,
            dolly_out_sec: 2.5,
            rotate_deg: 360.0,
            near_distance: 60.0,
            far_distance: 150.0,
        }
    }
}

impl Sequence {
    /// Phase durations with negatives and NaN flattened to zero.
    pub fn phases(&self) -> [f32; 3] {
        [
            non_negative(self.dolly_in_sec),
            non_negative(self.rotate_sec),
            non_negative(self.dolly_out_sec),
        ]
    }

    pub fn total_sec(&self) -> f32 {
        self.phases().iter().sum()
    }
}

/// Autonomous camera motion: linear azimuth sweep, sinusoidal polar and
/// distance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlyCamConfig {
    pub enabled: bool,
    pub speed: f32,
    pub azimuth_rate_deg: f32,
    pub polar_center_deg: f32,
    pub polar_amplitude_deg: f32,
    pub polar_frequency_hz: f32,
    pub distance_base: f32,
    pub distance_amplitude: f32,
    pub distance_frequency_hz: f32,
    pub sequence: Sequence,
}

impl Default for FlyCamConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            speed: 1.0,
            azimuth_rate_deg: 6.0,
            polar_center_deg: 65.0,
            polar_amplitude_deg: 10.0,
            polar_frequency_hz: 0.05,
            distance_base: 120.0,
            distance_amplitude: 60.0,
            distance_frequency_hz: 0.03,
            sequence: Sequence::default(),
        }
    }
}

impl FlyCamConfig {
    /// Raw fly-cam pose `elapsed` seconds into the timeline. The caller
    /// sanitizes it and falls back when any component is non-finite.
    pub fn sample(&self, base_azimuth_deg: f32, elapsed: f32) -> CameraPose {
        let s = finite_or(self.speed, 1.0);
        let azimuth = base_azimuth_deg + self.azimuth_rate_deg * s * elapsed;
        let polar = self.polar_center_deg + self.polar_bob(elapsed);
        let distance = self.distance_base
            + self.distance_amplitude
                * (0.5 + 0.5 * (TAU * self.distance_frequency_hz * s * elapsed + FRAC_PI_2).sin());
        CameraPose::new(azimuth, polar, distance)
    }

    /// Polar offset from `polar_center_deg`; shared with cinematic bob mode.
    #[inline]
    pub fn polar_bob(&self, elapsed: f32) -> f32 {
        let s = finite_or(self.speed, 1.0);
        self.polar_amplitude_deg * (TAU * self.polar_frequency_hz * s * elapsed).sin()
    }

    pub(crate) fn merged(&self, p: &FlyCamPatch) -> Self {
        Self {
            enabled: pick(&self.enabled, &p.enabled),
            speed: pick(&self.speed, &p.speed),
            azimuth_rate_deg: pick(&self.azimuth_rate_deg, &p.azimuth_rate_deg),
            polar_center_deg: pick(&self.polar_center_deg, &p.polar_center_deg),
            polar_amplitude_deg: pick(&self.polar_amplitude_deg, &p.polar_amplitude_deg),
            polar_frequency_hz: pick(&self.polar_frequency_hz, &p.polar_frequency_hz),
            distance_base: pick(&self.distance_base, &p.distance_base),
            distance_amplitude: pick(&self.distance_amplitude, &p.distance_amplitude),
            distance_frequency_hz: pick(&self.distance_frequency_hz, &p.distance_frequency_hz),
            sequence: match &p.sequence {
                Some(sp) => self.sequence.merged(sp),
                None => self.sequence.clone(),
            },
        }
    }
}

impl Sequence {
    fn merged(&self, p: &SequencePatch) -> Self {
        Self {
            enabled: pick(&self.enabled, &p.enabled),
            dolly_in_sec: pick(&self.dolly_in_sec, &p.dolly_in_sec),
            rotate_sec: pick(&self.rotate_sec, &p.rotate_sec),
            dolly_out_sec: pick(&self.dolly_out_sec, &p.dolly_out_sec),
            rotate_deg: pick(&self.rotate_deg, &p.rotate_deg),
            near_distance: pick(&self.near_distance, &p.near_distance),
            far_distance: pick(&self.far_distance, &p.far_distance),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlyCamPatch {
    pub enabled: Option<bool>,
    pub speed: Option<f32>,
    pub azimuth_rate_deg: Option<f32>,
    pub polar_center_deg: Option<f32>,
    pub polar_amplitude_deg: Option<f32>,
    pub polar_frequency_hz: Option<f32>,
    pub distance_base: Option<f32>,
    pub distance_amplitude: Option<f32>,
    pub distance_frequency_hz: Option<f32>,
    pub sequence: Option<SequencePatch>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SequencePatch {
    pub enabled: Option<bool>,
    pub dolly_in_sec: Option<f32>,
    pub rotate_sec: Option<f32>,
    pub dolly_out_sec: Option<f32>,
    pub rotate_deg: Option<f32>,
    pub near_distance: Option<f32>,
    pub far_distance: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_endpoints_and_midpoint() {
        assert_eq!(ease_cos(0.0), 0.0);
        assert!((ease_cos(1.0) - 1.0).abs() < 1e-6);
        assert!((ease_cos(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn fly_distance_starts_at_peak() {
        let fly = FlyCamConfig::default();
        let pose = fly.sample(0.0, 0.0);
        assert!((pose.distance - (fly.distance_base + fly.distance_amplitude)).abs() < 1e-4);
        assert!((pose.polar_deg - fly.polar_center_deg).abs() < 1e-4);
    }
}
