//! Glyph layout for the text rings circling the planet.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use serde::Serialize;

use crate::constants::{EMPTY_TEXT_PLACEHOLDER, GLYPH_SPACING_FACTOR, MAX_RING_GLYPHS};
use crate::settings::coerce::{finite_or, non_negative, positive_or};
use crate::settings::TextRingSettings;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Glyph {
    pub ch: char,
    pub position: Vec3,
    /// Angle around the ring before tilt; negative runs in reading direction.
    pub angle_rad: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRingLayout {
    pub text: String,
    pub radius: f32,
    pub tilt_rad: f32,
    pub speed: f32,
    pub size: f32,
    pub color: String,
    pub glyphs: Vec<Glyph>,
}

/// Collapse runs of whitespace and trim; empty text becomes the placeholder.
pub fn normalize_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        EMPTY_TEXT_PLACEHOLDER.to_string()
    } else {
        collapsed
    }
}

/// Glyphs needed to wrap a ring of `radius` with glyphs of `size`, never
/// fewer than the text length and never more than 600.
pub fn glyph_count(text_len: usize, radius: f32, size: f32) -> usize {
    let spacing = GLYPH_SPACING_FACTOR * size;
    let circumference = TAU * radius;
    let fit = (circumference / spacing).ceil();
    let fit = if fit.is_finite() && fit > 0.0 {
        fit as usize
    } else {
        0
    };
    fit.max(text_len).min(MAX_RING_GLYPHS)
}

pub fn layout_text_ring(cfg: &TextRingSettings) -> TextRingLayout {
    let text = normalize_text(&cfg.text);
    let chars = text.chars().collect::<Vec<_>>();
    let radius = non_negative(cfg.radius);
    let size = positive_or(cfg.size, 1.0);
    let tilt_rad = finite_or(cfg.tilt_deg, 0.0).to_radians();
    let needed = glyph_count(chars.len(), radius, size);

    // ring lies in XZ; tilt rotates it about the forward (Z) axis
    let tilt = Quat::from_rotation_z(tilt_rad);
    let glyphs = (0..needed)
        .map(|i| {
            let angle = -(i as f32 / needed as f32) * TAU;
            let flat = Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius);
            Glyph {
                ch: chars[i % chars.len()],
                position: tilt * flat,
                angle_rad: angle,
            }
        })
        .collect();

    TextRingLayout {
        text,
        radius,
        tilt_rad,
        speed: finite_or(cfg.speed, 0.0),
        size,
        color: if cfg.color.trim().is_empty() {
            "#ffffff".to_string()
        } else {
            cfg.color.clone()
        },
        glyphs,
    }
}
