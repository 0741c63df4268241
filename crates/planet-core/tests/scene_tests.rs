// Host-side tests for the scene builder, text-ring layout and texture handles.

use std::f32::consts::TAU;

use planet_core::settings::TextRingSettings;
use planet_core::{
    glyph_count, layout_text_ring, normalize_text, resolve, ObjectKind, SceneBuilder,
    SceneSettings, SceneSignal, SettingsPatch, TextureError, TextureOutcome, TextureStatus,
    EMPTY_TEXT_PLACEHOLDER, STAR_FIELD_HALF_EXTENT,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn settings(json: &str) -> SceneSettings {
    resolve(&SettingsPatch::from_json(json).expect("valid patch json"))
}

fn ring_cfg(text: &str, radius: f32, size: f32) -> TextRingSettings {
    TextRingSettings {
        text: text.to_string(),
        radius,
        tilt_deg: 0.0,
        speed: 0.0,
        size,
        color: "#fff".to_string(),
    }
}

#[test]
fn star_field_matches_count_and_extent() {
    let s = settings(r#"{"stars":{"count":500}}"#);
    let mut rng = StdRng::seed_from_u64(7);
    let out = SceneBuilder::new().rebuild(&s, &mut rng);
    let stars = &out.description.stars;
    assert_eq!(stars.len(), 500);
    for p in stars {
        for c in [p.x, p.y, p.z] {
            assert!(c.abs() <= STAR_FIELD_HALF_EXTENT);
        }
    }
    assert_eq!(out.description.star_buffer().len(), 1500);
    assert_eq!(out.description.star_buffer()[0], stars[0].x);
}

#[test]
fn ring_members_stay_inside_the_band() {
    let s = settings(r#"{"ring":{"count":1000,"radius":60,"spread":20,"height":8}}"#);
    let mut rng = StdRng::seed_from_u64(11);
    let out = SceneBuilder::new().rebuild(&s, &mut rng);
    assert_eq!(out.description.ring.len(), 1000);
    for m in &out.description.ring {
        let r = (m.position.x * m.position.x + m.position.z * m.position.z).sqrt();
        assert!(r >= 50.0 - 1e-3 && r <= 70.0 + 1e-3, "radius {r}");
        assert!(m.position.y.abs() <= 4.0);
        assert!(m.hue_deg >= 0.0 && m.hue_deg < 360.0);
        assert!(m.image_index.is_none());
    }
}

#[test]
fn negative_and_fractional_counts_are_coerced() {
    let s = settings(r#"{"stars":{"count":-10},"ring":{"count":3.9,"spread":-4,"height":-1}}"#);
    let mut rng = StdRng::seed_from_u64(1);
    let out = SceneBuilder::new().rebuild(&s, &mut rng);
    assert!(out.description.stars.is_empty());
    assert_eq!(out.description.ring.len(), 3);
    for m in &out.description.ring {
        assert_eq!(m.position.y, 0.0);
    }
}

#[test]
fn planet_radius_and_texture_fall_back_safely() {
    let s = settings(r#"{"planet":{"radius":-3,"textureUrl":"  "}}"#);
    let mut rng = StdRng::seed_from_u64(1);
    let out = SceneBuilder::new().rebuild(&s, &mut rng);
    assert_eq!(out.description.planet.radius, 20.0);
    assert!(out.description.planet.texture.is_none());
    assert!(out.texture_requests.is_empty());
}

#[test]
fn ring_images_are_requested_and_indexed() {
    let s = settings(r#"{"ring":{"count":50,"imageUrls":["a.png","","b.png"]}}"#);
    let mut rng = StdRng::seed_from_u64(3);
    let out = SceneBuilder::new().rebuild(&s, &mut rng);
    assert_eq!(out.description.ring_style.images.len(), 2);
    // planet texture + two images
    assert_eq!(out.texture_requests.len(), 3);
    for m in &out.description.ring {
        assert!(matches!(m.image_index, Some(i) if i < 2));
    }
}

#[test]
fn same_seed_builds_the_same_scene() {
    let s = SceneSettings::default();
    let a = SceneBuilder::new().rebuild(&s, &mut StdRng::seed_from_u64(42));
    let b = SceneBuilder::new().rebuild(&s, &mut StdRng::seed_from_u64(42));
    assert_eq!(a.description, b.description);
}

#[test]
fn rebuild_retires_the_previous_generation() {
    let s = SceneSettings::default();
    let mut rng = StdRng::seed_from_u64(5);
    let mut builder = SceneBuilder::new();

    let first = builder.rebuild(&s, &mut rng);
    assert_eq!(first.description.generation, 1);
    assert_eq!(first.signals.len(), 5);
    assert!(first
        .signals
        .iter()
        .all(|sig| matches!(sig, SceneSignal::Add { generation: 1, .. })));

    let second = builder.rebuild(&s, &mut rng);
    assert_eq!(second.description.generation, 2);
    assert_eq!(second.signals.len(), 15);
    assert_eq!(
        second.signals[0],
        SceneSignal::Remove {
            kind: ObjectKind::Stars,
            generation: 1
        }
    );
    assert_eq!(
        second.signals[1],
        SceneSignal::Dispose {
            kind: ObjectKind::Stars,
            generation: 1
        }
    );
    assert!(second.signals[10..]
        .iter()
        .all(|sig| matches!(sig, SceneSignal::Add { generation: 2, .. })));
}

#[test]
fn late_texture_from_old_generation_is_dropped() {
    let s = SceneSettings::default();
    let mut rng = StdRng::seed_from_u64(5);
    let mut builder = SceneBuilder::new();
    let first = builder.rebuild(&s, &mut rng);
    let old = first.description.planet.texture.expect("planet texture");
    let second = builder.rebuild(&s, &mut rng);
    let new = second.description.planet.texture.expect("planet texture");

    assert_eq!(builder.complete_texture(&old, Ok(())), TextureOutcome::Stale);
    assert_eq!(builder.textures().status(&new), Some(TextureStatus::Pending));
    assert_eq!(builder.complete_texture(&new, Ok(())), TextureOutcome::Applied);
    assert_eq!(builder.textures().status(&new), Some(TextureStatus::Ready));
}

#[test]
fn failed_texture_degrades_to_placeholder() {
    let mut builder = SceneBuilder::new();
    let out = builder.rebuild(&SceneSettings::default(), &mut StdRng::seed_from_u64(1));
    let handle = out.texture_requests[0].clone();
    let outcome = builder.complete_texture(
        &handle,
        Err(TextureError::LoadFailed {
            url: handle.url.clone(),
            reason: "404".to_string(),
        }),
    );
    assert_eq!(outcome, TextureOutcome::Degraded);
    assert_eq!(builder.textures().status(&handle), Some(TextureStatus::Failed));
}

#[test]
fn teardown_signals_disposal_and_ignores_late_loads() {
    let mut builder = SceneBuilder::new();
    let out = builder.rebuild(&SceneSettings::default(), &mut StdRng::seed_from_u64(1));
    let signals = builder.teardown();
    assert_eq!(signals.len(), 10);
    assert_eq!(
        builder.complete_texture(&out.texture_requests[0], Ok(())),
        TextureOutcome::Stale
    );
    // a second teardown has nothing left to retire
    assert!(builder.teardown().is_empty());
}

#[test]
fn glyph_count_follows_ring_capacity() {
    for (text, radius, size) in [("AB", 10.0_f32, 1.0_f32), ("HELLO", 34.0, 2.0), ("X", 3.0, 0.5)] {
        let expected = ((TAU * radius) / (0.9 * size)).ceil() as usize;
        let expected = expected.max(text.chars().count()).min(600);
        let layout = layout_text_ring(&ring_cfg(text, radius, size));
        assert_eq!(layout.glyphs.len(), expected, "text {text}");
        assert_eq!(glyph_count(text.chars().count(), radius, size), expected);
    }
}

#[test]
fn glyph_count_is_capped_and_never_below_text_length() {
    assert_eq!(glyph_count(3, 10_000.0, 1.0), 600);
    assert_eq!(glyph_count(40, 1.0, 1.0), 40);
    assert_eq!(glyph_count(700, 1.0, 1.0), 600);
    assert_eq!(glyph_count(4, 0.0, 1.0), 4);
}

#[test]
fn text_is_collapsed_and_empty_text_gets_placeholder() {
    assert_eq!(normalize_text("  PLANET \n\t SCENE "), "PLANET SCENE");
    assert_eq!(normalize_text("   "), EMPTY_TEXT_PLACEHOLDER);
    let layout = layout_text_ring(&ring_cfg("", 5.0, 1.0));
    assert_eq!(layout.text, EMPTY_TEXT_PLACEHOLDER);
    assert!(!layout.glyphs.is_empty());
}

#[test]
fn glyphs_run_in_reading_direction_and_repeat() {
    let layout = layout_text_ring(&ring_cfg("ABC", 10.0, 1.0));
    let n = layout.glyphs.len();
    assert_eq!(layout.glyphs[0].angle_rad, 0.0);
    assert!(layout.glyphs[1].angle_rad < 0.0);
    assert!((layout.glyphs[1].angle_rad + TAU / n as f32).abs() < 1e-5);
    let text = layout.glyphs.iter().take(6).map(|g| g.ch).collect::<String>();
    assert_eq!(text, "ABCABC");
    for g in &layout.glyphs {
        assert!((g.position.length() - 10.0).abs() < 1e-3);
        assert!(g.position.y.abs() < 1e-4);
    }
}

#[test]
fn tilt_rotates_the_ring_about_the_forward_axis() {
    let mut cfg = ring_cfg("TILT", 10.0, 1.0);
    cfg.tilt_deg = 90.0;
    let layout = layout_text_ring(&cfg);
    for g in &layout.glyphs {
        assert!(g.position.x.abs() < 1e-3);
        assert!((g.position.length() - 10.0).abs() < 1e-3);
    }
}
