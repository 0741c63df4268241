// Host-side tests for the frame driver.

use planet_core::{
    CameraMode, CameraParams, CinematicOptions, PlanetScene, SceneSignal, SettingsPatch,
    TextureOutcome,
};

fn patch(json: &str) -> SettingsPatch {
    SettingsPatch::from_json(json).expect("valid patch json")
}

#[test]
fn no_frames_before_start_or_after_stop() {
    let mut scene = PlanetScene::new(1);
    assert!(scene.frame(0.0).is_none());
    scene.start(&SettingsPatch::default());
    assert!(scene.frame(0.0).is_some());
    scene.stop();
    assert!(!scene.is_running());
    assert!(scene.frame(1.0).is_none());
}

#[test]
fn scene_is_rebuilt_on_first_frame_and_after_settings_change() {
    let mut scene = PlanetScene::new(1);
    scene.start(&SettingsPatch::default());

    let first = scene.frame(0.0).expect("running");
    let rebuild = first.rebuild.expect("initial build");
    assert_eq!(rebuild.description.generation, 1);
    assert!(scene.frame(0.016).expect("running").rebuild.is_none());

    scene.set_settings(&patch(r#"{"stars":{"count":10}}"#));
    let next = scene.frame(0.032).expect("running");
    let rebuild = next.rebuild.expect("rebuild after update");
    assert_eq!(rebuild.description.generation, 2);
    assert_eq!(rebuild.description.stars.len(), 10);
    assert!(rebuild.signals.contains(&SceneSignal::Remove {
        kind: planet_core::ObjectKind::Ring,
        generation: 1
    }));
    assert_eq!(scene.generation(), 2);
}

#[test]
fn start_places_camera_at_configured_distance() {
    let mut scene = PlanetScene::new(9);
    scene.start(&patch(r#"{"camera":{"distance":50}}"#));
    let out = scene.frame(0.0).expect("running");
    assert_eq!(out.pose.distance, 50.0);
    assert_eq!(out.pose.azimuth_deg, 30.0);
    assert_eq!(out.pose.polar_deg, 60.0);
    assert!((out.eye.length() - 50.0).abs() < 1e-3);
    assert_eq!(out.mode, CameraMode::Manual);
    assert_eq!(out.fov_deg, 70.0);
}

#[test]
fn camera_params_flow_through_to_frames() {
    let mut scene = PlanetScene::new(9);
    scene.start(&SettingsPatch::default());
    scene.frame(0.0);
    assert!(scene.set_camera_params(CameraParams {
        distance: Some(90.0),
        ..Default::default()
    }));
    let out = scene.frame(0.1).expect("running");
    assert_eq!(out.pose.distance, 90.0);
}

#[test]
fn cinematic_runs_through_the_driver() {
    let mut scene = PlanetScene::new(9);
    scene.start(&SettingsPatch::default());
    scene.frame(0.0);
    scene.start_cinematic(&CinematicOptions {
        duration_sec: Some(2.0),
        rotate_deg: Some(90.0),
        end_distance: Some(300.0),
        ..Default::default()
    });
    assert_eq!(scene.frame(1.0).expect("running").mode, CameraMode::Cinematic);
    let end = scene.frame(3.0).expect("running");
    assert_eq!(end.mode, CameraMode::Manual);
    assert_eq!(end.pose.distance, 300.0);
    assert_eq!(end.pose.azimuth_deg, 120.0);
}

#[test]
fn spin_accumulates_per_reference_frame() {
    let mut scene = PlanetScene::new(3);
    scene.start(&patch(
        r#"{"speed":{"planet":0.01,"ring":-0.002},"textRings":{"a":{"speed":0.005}}}"#,
    ));
    let first = scene.frame(10.0).expect("running");
    assert_eq!(first.spin.planet, 0.0);
    let later = scene.frame(11.0).expect("running");
    assert!((later.spin.planet - 0.6).abs() < 1e-5);
    assert!((later.spin.ring + 0.12).abs() < 1e-5);
    assert!((later.spin.text_a - 0.3).abs() < 1e-5);
}

#[test]
fn teardown_retires_scene_and_drops_late_textures() {
    let mut scene = PlanetScene::new(4);
    scene.start(&SettingsPatch::default());
    let rebuild = scene
        .frame(0.0)
        .and_then(|f| f.rebuild)
        .expect("initial build");
    let handle = rebuild.texture_requests[0].clone();

    let signals = scene.teardown();
    assert_eq!(signals.len(), 10);
    assert!(!scene.is_running());
    assert_eq!(scene.texture_loaded(&handle, Ok(())), TextureOutcome::Stale);
}

#[test]
fn restart_after_teardown_builds_a_fresh_generation() {
    let mut scene = PlanetScene::new(4);
    scene.start(&SettingsPatch::default());
    scene.frame(0.0);
    scene.teardown();
    scene.start(&SettingsPatch::default());
    let rebuild = scene
        .frame(1.0)
        .and_then(|f| f.rebuild)
        .expect("rebuild after restart");
    assert_eq!(rebuild.description.generation, 2);
    assert!(rebuild
        .signals
        .iter()
        .all(|s| matches!(s, SceneSignal::Add { .. })));
}

#[test]
fn non_finite_first_frame_does_not_freeze_spin() {
    let mut scene = PlanetScene::new(3);
    scene.start(&SettingsPatch::default());
    assert!(scene.frame(f64::NAN).is_some());
    let a = scene.frame(10.0).expect("running");
    let b = scene.frame(20.0).expect("running");
    assert_eq!(a.spin.planet, 0.0);
    assert!(b.spin.planet > a.spin.planet);
    assert!((b.spin.planet - 0.002 * 60.0 * 10.0).abs() < 1e-4);
}
