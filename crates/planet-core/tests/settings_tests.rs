// Host-side tests for the settings resolver and snapshot store.

use planet_core::settings::{CameraPatch, SettingsStore};
use planet_core::{resolve, SceneSettings, SettingsPatch};

fn patch(json: &str) -> SettingsPatch {
    SettingsPatch::from_json(json).expect("valid patch json")
}

#[test]
fn empty_patch_resolves_to_defaults_every_time() {
    let a = resolve(&SettingsPatch::default());
    let b = resolve(&patch("{}"));
    assert_eq!(a, b);
    assert_eq!(a, SceneSettings::default());
}

#[test]
fn camera_distance_patch_keeps_other_camera_defaults() {
    let s = resolve(&patch(r#"{"camera":{"distance":50}}"#));
    assert_eq!(s.camera.distance, 50.0);
    assert_eq!(s.camera.azimuth_deg, 30.0);
    assert_eq!(s.camera.polar_deg, 60.0);
    assert_eq!(s.camera.fov, 70.0);
    assert_eq!(s.camera.min_distance, 20.0);
    assert_eq!(s.camera.max_distance, 1000.0);
    // untouched groups are the defaults
    assert_eq!(s.ring, SceneSettings::default().ring);
    assert_eq!(s.text_rings, SceneSettings::default().text_rings);
}

#[test]
fn nested_fly_and_sequence_merge_key_by_key() {
    let s = resolve(&patch(
        r#"{"camera":{"fly":{"enabled":true,"azimuthRateDeg":12,"sequence":{"rotateDeg":180}}}}"#,
    ));
    let d = SceneSettings::default();
    assert!(s.camera.fly.enabled);
    assert_eq!(s.camera.fly.azimuth_rate_deg, 12.0);
    assert_eq!(s.camera.fly.speed, d.camera.fly.speed);
    assert_eq!(s.camera.fly.distance_base, d.camera.fly.distance_base);
    assert_eq!(s.camera.fly.sequence.rotate_deg, 180.0);
    assert!(!s.camera.fly.sequence.enabled);
    assert_eq!(
        s.camera.fly.sequence.dolly_in_sec,
        d.camera.fly.sequence.dolly_in_sec
    );
}

#[test]
fn text_ring_b_patch_leaves_ring_a_alone() {
    let s = resolve(&patch(r#"{"textRings":{"b":{"text":"HELLO","tiltDeg":45}}}"#));
    let d = SceneSettings::default();
    assert_eq!(s.text_rings.a, d.text_rings.a);
    assert_eq!(s.text_rings.b.text, "HELLO");
    assert_eq!(s.text_rings.b.tilt_deg, 45.0);
    assert_eq!(s.text_rings.b.radius, d.text_rings.b.radius);
}

#[test]
fn out_of_range_values_pass_through_unvalidated() {
    let s = resolve(&patch(
        r#"{"stars":{"count":-5},"planet":{"radius":0},"ring":{"spread":-3}}"#,
    ));
    assert_eq!(s.stars.count, -5.0);
    assert_eq!(s.planet.radius, 0.0);
    assert_eq!(s.ring.spread, -3.0);
}

#[test]
fn unknown_keys_are_ignored_and_null_means_default() {
    let s = resolve(&patch(r#"{"bogus":1,"lights":{"point":null,"ambient":0.5}}"#));
    assert_eq!(s.lights.point, 2.0);
    assert_eq!(s.lights.ambient, 0.5);
}

#[test]
fn malformed_json_is_an_error() {
    assert!(SettingsPatch::from_json("{ not json").is_err());
    assert!(SettingsPatch::from_json(r#"{"stars":{"count":"many"}}"#).is_err());
}

#[test]
fn replacing_the_snapshot_never_touches_earlier_ones() {
    let mut store = SettingsStore::new();
    let before = store.snapshot();
    let after = store.replace(&SettingsPatch {
        camera: Some(CameraPatch {
            distance: Some(75.0),
            ..Default::default()
        }),
        ..Default::default()
    });
    assert_eq!(before.camera.distance, 150.0);
    assert_eq!(after.camera.distance, 75.0);
    assert_eq!(*before, SceneSettings::default());
}

#[test]
fn each_update_resolves_over_defaults_not_the_previous_snapshot() {
    let mut store = SettingsStore::new();
    store.replace(&patch(r#"{"stars":{"count":10}}"#));
    let s = store.replace(&patch(r#"{"ring":{"count":3}}"#));
    assert_eq!(s.ring.count, 3.0);
    assert_eq!(s.stars.count, 2000.0);
}
