//! Scene settings: the default tree, partial patches and the resolver.
//!
//! A [`SettingsPatch`] mirrors the settings tree with every key optional. It is
//! merged group by group over a fresh copy of the defaults by [`resolve`]. The
//! resolver never validates ranges; consumers clamp at the point of use with
//! the helpers in [`coerce`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_DISTANCE, DEFAULT_MIN_DISTANCE};
use crate::error::SettingsError;
use crate::motion::{FlyCamConfig, FlyCamPatch};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSettings {
    pub stars: StarsSettings,
    pub planet: PlanetSettings,
    pub ring: RingSettings,
    pub speed: SpeedSettings,
    pub camera: CameraSettings,
    pub lights: LightsSettings,
    pub text_rings: TextRingsSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StarsSettings {
    pub count: f32,
}

impl Default for StarsSettings {
    fn default() -> Self {
        Self { count: 2000.0 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetSettings {
    pub radius: f32,
    pub texture_url: String,
}

impl Default for PlanetSettings {
    fn default() -> Self {
        Self {
            radius: 20.0,
            texture_url: "https://i.imgur.com/UYb5hMP.jpg".to_string(),
        }
    }
}

/// Glow halo drawn around every ring member.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlowSettings {
    pub enabled: bool,
    pub intensity: f32,
}

impl Default for GlowSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            intensity: 0.6,
        }
    }
}

/// Rounded-box geometry for ring members.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundedSettings {
    pub enabled: bool,
    pub radius: f32,
    pub segments: f32,
}

impl Default for RoundedSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            radius: 0.2,
            segments: 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RingSettings {
    pub count: f32,
    pub radius: f32,
    pub spread: f32,
    pub height: f32,
    pub box_size: f32,
    pub glow: GlowSettings,
    pub rounded: RoundedSettings,
    pub image_urls: Vec<String>,
}

impl Default for RingSettings {
    fn default() -> Self {
        Self {
            count: 800.0,
            radius: 60.0,
            spread: 20.0,
            height: 10.0,
            box_size: 1.0,
            glow: GlowSettings::default(),
            rounded: RoundedSettings::default(),
            image_urls: Vec::new(),
        }
    }
}

/// Per-object spin rates in radians per frame at 60 Hz.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedSettings {
    pub planet: f32,
    pub ring: f32,
    pub stars: f32,
}

impl Default for SpeedSettings {
    fn default() -> Self {
        Self {
            planet: 0.002,
            ring: 0.004,
            stars: 0.0005,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraSettings {
    pub distance: f32,
    pub azimuth_deg: f32,
    pub polar_deg: f32,
    pub fov: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    pub invert_y: bool,
    pub fly: FlyCamConfig,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            distance: 150.0,
            azimuth_deg: 30.0,
            polar_deg: 60.0,
            fov: 70.0,
            min_distance: DEFAULT_MIN_DISTANCE,
            max_distance: DEFAULT_MAX_DISTANCE,
            auto_rotate: false,
            auto_rotate_speed: 2.0,
            invert_y: false,
            fly: FlyCamConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightsSettings {
    pub point: f32,
    pub ambient: f32,
}

impl Default for LightsSettings {
    fn default() -> Self {
        Self {
            point: 2.0,
            ambient: 0.25,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRingSettings {
    pub text: String,
    pub radius: f32,
    pub tilt_deg: f32,
    pub speed: f32,
    pub size: f32,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextRingsSettings {
    pub a: TextRingSettings,
    pub b: TextRingSettings,
}

impl Default for TextRingsSettings {
    fn default() -> Self {
        Self {
            a: TextRingSettings {
                text: "PLANET SCENE".to_string(),
                radius: 34.0,
                tilt_deg: 18.0,
                speed: 0.003,
                size: 2.0,
                color: "#ffffff".to_string(),
            },
            b: TextRingSettings {
                text: "ORBIT \u{b7} DOLLY \u{b7} BOB".to_string(),
                radius: 44.0,
                tilt_deg: -12.0,
                speed: -0.002,
                size: 1.6,
                color: "#8fd3ff".to_string(),
            },
        }
    }
}

// ---------------- Patches ----------------

/// Partial settings as supplied by a page or a settings file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPatch {
    pub stars: Option<StarsPatch>,
    pub planet: Option<PlanetPatch>,
    pub ring: Option<RingPatch>,
    pub speed: Option<SpeedPatch>,
    pub camera: Option<CameraPatch>,
    pub lights: Option<LightsPatch>,
    pub text_rings: Option<TextRingsPatch>,
}

impl SettingsPatch {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StarsPatch {
    pub count: Option<f32>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanetPatch {
    pub radius: Option<f32>,
    pub texture_url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GlowPatch {
    pub enabled: Option<bool>,
    pub intensity: Option<f32>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoundedPatch {
    pub enabled: Option<bool>,
    pub radius: Option<f32>,
    pub segments: Option<f32>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RingPatch {
    pub count: Option<f32>,
    pub radius: Option<f32>,
    pub spread: Option<f32>,
    pub height: Option<f32>,
    pub box_size: Option<f32>,
    pub glow: Option<GlowPatch>,
    pub rounded: Option<RoundedPatch>,
    pub image_urls: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeedPatch {
    pub planet: Option<f32>,
    pub ring: Option<f32>,
    pub stars: Option<f32>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraPatch {
    pub distance: Option<f32>,
    pub azimuth_deg: Option<f32>,
    pub polar_deg: Option<f32>,
    pub fov: Option<f32>,
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub auto_rotate: Option<bool>,
    pub auto_rotate_speed: Option<f32>,
    pub invert_y: Option<bool>,
    pub fly: Option<FlyCamPatch>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightsPatch {
    pub point: Option<f32>,
    pub ambient: Option<f32>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextRingPatch {
    pub text: Option<String>,
    pub radius: Option<f32>,
    pub tilt_deg: Option<f32>,
    pub speed: Option<f32>,
    pub size: Option<f32>,
    pub color: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextRingsPatch {
    pub a: Option<TextRingPatch>,
    pub b: Option<TextRingPatch>,
}

// ---------------- Merge ----------------

#[inline]
pub(crate) fn pick<T: Clone>(base: &T, over: &Option<T>) -> T {
    over.as_ref().unwrap_or(base).clone()
}

#[inline]
fn merge_group<S: Clone, P>(base: &S, patch: &Option<P>, merge: impl Fn(&S, &P) -> S) -> S {
    match patch {
        Some(p) => merge(base, p),
        None => base.clone(),
    }
}

impl StarsSettings {
    fn merged(&self, p: &StarsPatch) -> Self {
        Self {
            count: pick(&self.count, &p.count),
        }
    }
}

impl PlanetSettings {
    fn merged(&self, p: &PlanetPatch) -> Self {
        Self {
            radius: pick(&self.radius, &p.radius),
            texture_url: pick(&self.texture_url, &p.texture_url),
        }
    }
}

impl RingSettings {
    fn merged(&self, p: &RingPatch) -> Self {
        Self {
            count: pick(&self.count, &p.count),
            radius: pick(&self.radius, &p.radius),
            spread: pick(&self.spread, &p.spread),
            height: pick(&self.height, &p.height),
            box_size: pick(&self.box_size, &p.box_size),
            glow: merge_group(&self.glow, &p.glow, |g, gp| GlowSettings {
                enabled: pick(&g.enabled, &gp.enabled),
                intensity: pick(&g.intensity, &gp.intensity),
            }),
            rounded: merge_group(&self.rounded, &p.rounded, |r, rp| RoundedSettings {
                enabled: pick(&r.enabled, &rp.enabled),
                radius: pick(&r.radius, &rp.radius),
                segments: pick(&r.segments, &rp.segments),
            }),
            image_urls: pick(&self.image_urls, &p.image_urls),
        }
    }
}

impl SpeedSettings {
    fn merged(&self, p: &SpeedPatch) -> Self {
        Self {
            planet: pick(&self.planet, &p.planet),
            ring: pick(&self.ring, &p.ring),
            stars: pick(&self.stars, &p.stars),
        }
    }
}

impl CameraSettings {
    fn merged(&self, p: &CameraPatch) -> Self {
        Self {
            distance: pick(&self.distance, &p.distance),
            azimuth_deg: pick(&self.azimuth_deg, &p.azimuth_deg),
            polar_deg: pick(&self.polar_deg, &p.polar_deg),
            fov: pick(&self.fov, &p.fov),
            min_distance: pick(&self.min_distance, &p.min_distance),
            max_distance: pick(&self.max_distance, &p.max_distance),
            auto_rotate: pick(&self.auto_rotate, &p.auto_rotate),
            auto_rotate_speed: pick(&self.auto_rotate_speed, &p.auto_rotate_speed),
            invert_y: pick(&self.invert_y, &p.invert_y),
            fly: merge_group(&self.fly, &p.fly, FlyCamConfig::merged),
        }
    }
}

impl LightsSettings {
    fn merged(&self, p: &LightsPatch) -> Self {
        Self {
            point: pick(&self.point, &p.point),
            ambient: pick(&self.ambient, &p.ambient),
        }
    }
}

impl TextRingSettings {
    fn merged(&self, p: &TextRingPatch) -> Self {
        Self {
            text: pick(&self.text, &p.text),
            radius: pick(&self.radius, &p.radius),
            tilt_deg: pick(&self.tilt_deg, &p.tilt_deg),
            speed: pick(&self.speed, &p.speed),
            size: pick(&self.size, &p.size),
            color: pick(&self.color, &p.color),
        }
    }
}

/// Merge `patch` over a fresh default tree.
///
/// Pure: the result shares nothing with earlier snapshots, and groups or keys
/// absent from the patch keep their defaults.
pub fn resolve(patch: &SettingsPatch) -> SceneSettings {
    let d = SceneSettings::default();
    let (ring_a, ring_b) = match &patch.text_rings {
        Some(tr) => (
            merge_group(&d.text_rings.a, &tr.a, TextRingSettings::merged),
            merge_group(&d.text_rings.b, &tr.b, TextRingSettings::merged),
        ),
        None => (d.text_rings.a.clone(), d.text_rings.b.clone()),
    };
    SceneSettings {
        stars: merge_group(&d.stars, &patch.stars, StarsSettings::merged),
        planet: merge_group(&d.planet, &patch.planet, PlanetSettings::merged),
        ring: merge_group(&d.ring, &patch.ring, RingSettings::merged),
        speed: merge_group(&d.speed, &patch.speed, SpeedSettings::merged),
        camera: merge_group(&d.camera, &patch.camera, CameraSettings::merged),
        lights: merge_group(&d.lights, &patch.lights, LightsSettings::merged),
        text_rings: TextRingsSettings {
            a: ring_a,
            b: ring_b,
        },
    }
}

/// Holder of the canonical settings snapshot.
///
/// Each update resolves a complete new tree and swaps it in whole; snapshots
/// handed out earlier stay valid and unchanged.
#[derive(Clone, Debug, Default)]
pub struct SettingsStore {
    current: Arc<SceneSettings>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<SceneSettings> {
        Arc::clone(&self.current)
    }

    pub fn replace(&mut self, patch: &SettingsPatch) -> Arc<SceneSettings> {
        self.current = Arc::new(resolve(patch));
        log::debug!("[settings] snapshot replaced");
        self.snapshot()
    }
}

/// Point-of-use coercion for values that came through a patch unchecked.
pub mod coerce {
    #[inline]
    pub fn finite_or(value: f32, fallback: f32) -> f32 {
        if value.is_finite() {
            value
        } else {
            fallback
        }
    }

    /// Strictly positive finite value, else `fallback`.
    #[inline]
    pub fn positive_or(value: f32, fallback: f32) -> f32 {
        if value.is_finite() && value > 0.0 {
            value
        } else {
            fallback
        }
    }

    #[inline]
    pub fn non_negative(value: f32) -> f32 {
        if value.is_finite() {
            value.max(0.0)
        } else {
            0.0
        }
    }

    /// Truncating integer count, `0` for negative or non-finite input.
    #[inline]
    pub fn count(value: f32, max: usize) -> usize {
        if !value.is_finite() || value <= 0.0 {
            return 0;
        }
        (value.trunc() as usize).min(max)
    }
}
