//! Scene builder: turns a settings snapshot into decorative object placements.
//!
//! Every rebuild produces a complete new generation. The previous generation
//! is signalled for removal and disposal, never patched in place; the renderer
//! owns the actual GPU resources behind each signal.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;
use serde::Serialize;
use smallvec::SmallVec;

use crate::constants::{MAX_RING_MEMBERS, MAX_STARS, REFERENCE_FPS, STAR_FIELD_HALF_EXTENT};
use crate::error::TextureError;
use crate::settings::coerce::{count, finite_or, non_negative, positive_or};
use crate::settings::{PlanetSettings, RingSettings, SceneSettings};
use crate::text_ring::{layout_text_ring, TextRingLayout};
use crate::textures::{TextureHandle, TextureOutcome, TextureRegistry};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ObjectKind {
    Stars,
    Planet,
    Ring,
    TextRingA,
    TextRingB,
}

pub const OBJECT_KINDS: [ObjectKind; 5] = [
    ObjectKind::Stars,
    ObjectKind::Planet,
    ObjectKind::Ring,
    ObjectKind::TextRingA,
    ObjectKind::TextRingB,
];

/// Instruction to the renderer about one object collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum SceneSignal {
    Remove { kind: ObjectKind, generation: u64 },
    Dispose { kind: ObjectKind, generation: u64 },
    Add { kind: ObjectKind, generation: u64 },
}

pub type SignalList = SmallVec<[SceneSignal; 16]>;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlanetDesc {
    pub radius: f32,
    pub texture: Option<TextureHandle>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RingStyle {
    pub box_size: f32,
    pub rounded: bool,
    pub corner_radius: f32,
    pub corner_segments: u32,
    pub glow: bool,
    pub glow_intensity: f32,
    pub images: Vec<TextureHandle>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RingMember {
    pub position: Vec3,
    pub hue_deg: f32,
    /// Index into [`RingStyle::images`] when images are configured.
    pub image_index: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LightLevels {
    pub point: f32,
    pub ambient: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDescription {
    pub generation: u64,
    pub stars: Vec<Vec3>,
    pub planet: PlanetDesc,
    pub ring_style: RingStyle,
    pub ring: Vec<RingMember>,
    pub text_a: TextRingLayout,
    pub text_b: TextRingLayout,
    pub lights: LightLevels,
}

impl SceneDescription {
    /// Star positions as a flat `[x, y, z, ...]` buffer for a points geometry.
    pub fn star_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.stars)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneRebuild {
    pub description: SceneDescription,
    pub signals: SignalList,
    pub texture_requests: Vec<TextureHandle>,
}

/// Accumulated spin angles (radians) for the rotating objects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSpin {
    pub planet: f32,
    pub ring: f32,
    pub stars: f32,
    pub text_a: f32,
    pub text_b: f32,
}

/// Spin after `elapsed_sec`; rates are radians per frame at 60 Hz.
pub fn spin(settings: &SceneSettings, elapsed_sec: f32) -> ObjectSpin {
    let frames = REFERENCE_FPS * elapsed_sec.max(0.0);
    let angle = |rate: f32| finite_or(rate, 0.0) * frames;
    ObjectSpin {
        planet: angle(settings.speed.planet),
        ring: angle(settings.speed.ring),
        stars: angle(settings.speed.stars),
        text_a: angle(settings.text_rings.a.speed),
        text_b: angle(settings.text_rings.b.speed),
    }
}

#[derive(Debug, Default)]
pub struct SceneBuilder {
    generation: u64,
    textures: TextureRegistry,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation of the objects currently in the scene; `0` before the first
    /// rebuild.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    pub fn rebuild<R: Rng + ?Sized>(&mut self, settings: &SceneSettings, rng: &mut R) -> SceneRebuild {
        let mut signals = self.retire_current();
        self.generation += 1;
        let generation = self.generation;
        self.textures.begin_generation(generation);

        let stars = build_stars(count(settings.stars.count, MAX_STARS), rng);
        let planet = self.build_planet(&settings.planet);
        let ring_style = self.build_ring_style(&settings.ring);
        let ring = build_ring(&settings.ring, ring_style.images.len(), rng);
        let text_a = layout_text_ring(&settings.text_rings.a);
        let text_b = layout_text_ring(&settings.text_rings.b);

        let mut texture_requests = Vec::with_capacity(ring_style.images.len() + 1);
        texture_requests.extend(planet.texture.iter().cloned());
        texture_requests.extend(ring_style.images.iter().cloned());

        signals.extend(
            OBJECT_KINDS
                .iter()
                .map(|&kind| SceneSignal::Add { kind, generation }),
        );

        log::info!(
            "[scene] generation {}: stars={} ring={} glyphs={}+{} textures={}",
            generation,
            stars.len(),
            ring.len(),
            text_a.glyphs.len(),
            text_b.glyphs.len(),
            texture_requests.len()
        );

        SceneRebuild {
            description: SceneDescription {
                generation,
                stars,
                planet,
                ring_style,
                ring,
                text_a,
                text_b,
                lights: LightLevels {
                    point: non_negative(settings.lights.point),
                    ambient: non_negative(settings.lights.ambient),
                },
            },
            signals,
            texture_requests,
        }
    }

    /// Remove and dispose the current generation; late texture completions
    /// are ignored from here on.
    pub fn teardown(&mut self) -> SignalList {
        let signals = self.retire_current();
        self.textures.shutdown();
        signals
    }

    pub fn complete_texture(
        &mut self,
        handle: &TextureHandle,
        result: Result<(), TextureError>,
    ) -> TextureOutcome {
        self.textures.complete(handle, result)
    }

    fn retire_current(&self) -> SignalList {
        let mut signals = SignalList::new();
        if self.generation == 0 || !self.textures.is_live() {
            return signals;
        }
        let generation = self.generation;
        for &kind in OBJECT_KINDS.iter() {
            signals.push(SceneSignal::Remove { kind, generation });
            signals.push(SceneSignal::Dispose { kind, generation });
        }
        signals
    }

    fn build_planet(&mut self, planet: &PlanetSettings) -> PlanetDesc {
        let url = planet.texture_url.trim();
        PlanetDesc {
            radius: positive_or(planet.radius, PlanetSettings::default().radius),
            texture: (!url.is_empty()).then(|| self.textures.request(url)),
        }
    }

    fn build_ring_style(&mut self, ring: &RingSettings) -> RingStyle {
        let box_size = positive_or(ring.box_size, 1.0);
        let images = ring
            .image_urls
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .map(|u| self.textures.request(u))
            .collect();
        RingStyle {
            box_size,
            rounded: ring.rounded.enabled,
            corner_radius: non_negative(ring.rounded.radius).min(box_size * 0.5),
            corner_segments: count(ring.rounded.segments, 16).max(1) as u32,
            glow: ring.glow.enabled,
            glow_intensity: non_negative(ring.glow.intensity).min(4.0),
            images,
        }
    }
}

fn build_stars<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<Vec3> {
    let extent = 2.0 * STAR_FIELD_HALF_EXTENT;
    (0..n)
        .map(|_| {
            Vec3::new(
                (rng.gen::<f32>() - 0.5) * extent,
                (rng.gen::<f32>() - 0.5) * extent,
                (rng.gen::<f32>() - 0.5) * extent,
            )
        })
        .collect()
}

fn build_ring<R: Rng + ?Sized>(ring: &RingSettings, image_count: usize, rng: &mut R) -> Vec<RingMember> {
    let n = count(ring.count, MAX_RING_MEMBERS);
    let base = non_negative(ring.radius);
    let spread = non_negative(ring.spread);
    let height = non_negative(ring.height);
    (0..n)
        .map(|_| {
            let angle = rng.gen::<f32>() * TAU;
            let radius = (base - spread * 0.5 + rng.gen::<f32>() * spread).max(0.0);
            let y = (rng.gen::<f32>() - 0.5) * height;
            let hue_deg = rng.gen::<f32>() * 360.0;
            let image_index = (image_count > 0).then(|| rng.gen_range(0..image_count));
            RingMember {
                position: Vec3::new(angle.cos() * radius, y, angle.sin() * radius),
                hue_deg,
                image_index,
            }
        })
        .collect()
}
