//! Spherical camera pose around the origin.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_DISTANCE, DEFAULT_MIN_DISTANCE, POLAR_MAX_DEG, POLAR_MIN_DEG};

/// Camera placement as spherical coordinates around the look-at target.
///
/// - `azimuth_deg`: rotation about +Y, normalized to `[0, 360)`
/// - `polar_deg`: angle from the +Y pole, clamped to `[5, 175]`
/// - `distance`: eye-to-target distance, clamped to the active [`DistanceLimits`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraPose {
    pub azimuth_deg: f32,
    pub polar_deg: f32,
    pub distance: f32,
}

impl CameraPose {
    pub fn new(azimuth_deg: f32, polar_deg: f32, distance: f32) -> Self {
        Self {
            azimuth_deg,
            polar_deg,
            distance,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.azimuth_deg.is_finite() && self.polar_deg.is_finite() && self.distance.is_finite()
    }

    /// Normalize azimuth, clamp polar and distance. Non-finite fields are
    /// taken from `fallback` (which must itself be sanitized).
    pub fn sanitized_or(self, limits: DistanceLimits, fallback: CameraPose) -> CameraPose {
        let az = if self.azimuth_deg.is_finite() {
            self.azimuth_deg
        } else {
            fallback.azimuth_deg
        };
        let polar = if self.polar_deg.is_finite() {
            self.polar_deg
        } else {
            fallback.polar_deg
        };
        let dist = if self.distance.is_finite() {
            self.distance
        } else {
            fallback.distance
        };
        CameraPose {
            azimuth_deg: wrap_deg(az),
            polar_deg: clamp_polar(polar),
            distance: limits.clamp(dist),
        }
    }

    /// World-space eye position around the origin (Y up).
    pub fn position(&self) -> Vec3 {
        let theta = self.polar_deg.to_radians();
        let phi = self.azimuth_deg.to_radians();
        let (sin_t, cos_t) = theta.sin_cos();
        let (sin_p, cos_p) = phi.sin_cos();
        Vec3::new(
            self.distance * sin_t * sin_p,
            self.distance * cos_t,
            self.distance * sin_t * cos_p,
        )
    }
}

/// Zoom range for the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceLimits {
    pub min: f32,
    pub max: f32,
}

impl Default for DistanceLimits {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_DISTANCE,
            max: DEFAULT_MAX_DISTANCE,
        }
    }
}

impl DistanceLimits {
    /// Build limits from unchecked settings values.
    pub fn new(min: f32, max: f32) -> Self {
        let min = if min.is_finite() && min > 0.0 {
            min
        } else {
            DEFAULT_MIN_DISTANCE
        };
        let max = if max.is_finite() {
            max
        } else {
            DEFAULT_MAX_DISTANCE
        };
        Self {
            min,
            max: max.max(min),
        }
    }

    #[inline]
    pub fn clamp(&self, distance: f32) -> f32 {
        if distance.is_nan() {
            return self.min;
        }
        distance.clamp(self.min, self.max)
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
#[inline]
pub fn wrap_deg(deg: f32) -> f32 {
    if !deg.is_finite() {
        return 0.0;
    }
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

#[inline]
pub fn clamp_polar(deg: f32) -> f32 {
    if deg.is_nan() {
        return 90.0;
    }
    deg.clamp(POLAR_MIN_DEG, POLAR_MAX_DEG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_handles_tiny_negative() {
        let w = wrap_deg(-1e-7);
        assert!((0.0..360.0).contains(&w));
    }

    #[test]
    fn limits_fix_inverted_range() {
        let l = DistanceLimits::new(50.0, 10.0);
        assert_eq!(l.min, 50.0);
        assert_eq!(l.max, 50.0);
        assert_eq!(l.clamp(5.0), 50.0);
    }

    #[test]
    fn position_on_equator_faces_plus_z() {
        let p = CameraPose::new(0.0, 90.0, 10.0).position();
        assert!(p.x.abs() < 1e-4);
        assert!(p.y.abs() < 1e-4);
        assert!((p.z - 10.0).abs() < 1e-4);
    }
}
