//! Headless preview: runs the scene driver on a simulated 60 Hz clock and
//! logs the camera once per second.
//!
//! Usage: `planet-native [settings.json] [seconds]`

use anyhow::Context;
use planet_core::{CinematicOptions, PlanetScene, SettingsPatch};

const FPS: f64 = 60.0;
const DEFAULT_SECONDS: f64 = 20.0;

fn load_patch(path: Option<&str>) -> anyhow::Result<SettingsPatch> {
    let Some(path) = path else {
        return Ok(SettingsPatch::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    SettingsPatch::from_json(&text).with_context(|| format!("parsing {}", path))
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let patch = load_patch(args.first().map(String::as_str))?;
    let seconds = match args.get(1) {
        Some(s) => s
            .parse::<f64>()
            .with_context(|| format!("bad duration {:?}", s))?,
        None => DEFAULT_SECONDS,
    };

    let mut scene = PlanetScene::new(42);
    scene.start(&patch);

    let total = (seconds.max(0.0) * FPS).round() as u64;
    let cinematic_at = total / 2;
    for i in 0..=total {
        let now = i as f64 / FPS;
        if i == cinematic_at {
            log::info!("[camera] starting cinematic at {:.2}s", now);
            scene.start_cinematic(&CinematicOptions {
                duration_sec: Some((seconds / 4.0).max(1.0) as f32),
                ..Default::default()
            });
        }
        let Some(out) = scene.frame(now) else {
            break;
        };
        if let Some(rebuild) = &out.rebuild {
            let d = &rebuild.description;
            log::info!(
                "[scene] gen {} stars={} ring={} text={:?}/{:?}",
                d.generation,
                d.stars.len(),
                d.ring.len(),
                d.text_a.text,
                d.text_b.text
            );
        }
        if i % FPS as u64 == 0 {
            log::info!(
                "[camera] t={:>5.1}s {:?} az={:>6.1} polar={:>5.1} dist={:>6.1} eye=({:.1},{:.1},{:.1})",
                now,
                out.mode,
                out.pose.azimuth_deg,
                out.pose.polar_deg,
                out.pose.distance,
                out.eye.x,
                out.eye.y,
                out.eye.z
            );
        }
    }

    let signals = scene.teardown();
    log::info!("[scene] teardown: {} signals", signals.len());
    Ok(())
}
