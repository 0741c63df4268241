#![cfg(target_arch = "wasm32")]
use instant::Instant;
use planet_core::{
    CameraParams, CinematicOptions, PlanetScene, SettingsPatch, TextureError, TextureHandle,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;

mod bridge;
mod frame;

use bridge::{from_js, js_err, to_js};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("planet-web ready");
    Ok(())
}

fn random_seed() -> u64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(e) => {
            log::warn!("[scene] no entropy ({}); using seed 0", e);
            0
        }
    }
}

/// JS-facing handle for one planet scene. The host page owns the renderer;
/// every animation frame it receives `onFrame(frame, stars)` with the camera
/// pose, spin angles and, after a settings change, the rebuilt scene.
#[wasm_bindgen]
pub struct PlanetSceneHandle {
    scene: Rc<RefCell<PlanetScene>>,
    epoch: Instant,
    loop_token: Rc<Cell<u32>>,
}

#[wasm_bindgen]
impl PlanetSceneHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<f64>) -> PlanetSceneHandle {
        let seed = seed
            .filter(|s| s.is_finite() && *s >= 0.0)
            .map(|s| s as u64)
            .unwrap_or_else(random_seed);
        PlanetSceneHandle {
            scene: Rc::new(RefCell::new(PlanetScene::new(seed))),
            epoch: Instant::now(),
            loop_token: Rc::new(Cell::new(0)),
        }
    }

    /// Apply `settings` and start delivering frames to `on_frame`. Calling it
    /// again swaps the callback and re-applies settings.
    pub fn start(&mut self, settings: JsValue, on_frame: js_sys::Function) -> Result<(), JsValue> {
        let patch: SettingsPatch = from_js(&settings).map_err(js_err)?;
        self.scene.borrow_mut().start(&patch);
        self.retire_loop();
        let ctx = Rc::new(frame::FrameContext {
            scene: self.scene.clone(),
            on_frame,
            epoch: self.epoch,
        });
        frame::start_loop(ctx, self.loop_token.clone());
        Ok(())
    }

    pub fn stop(&mut self) {
        self.retire_loop();
        self.scene.borrow_mut().stop();
    }

    #[wasm_bindgen(js_name = setSettings)]
    pub fn set_settings(&mut self, settings: JsValue) -> Result<(), JsValue> {
        let patch: SettingsPatch = from_js(&settings).map_err(js_err)?;
        self.scene.borrow_mut().set_settings(&patch);
        Ok(())
    }

    /// Returns whether the params were applied; ignored while a fly-cam or
    /// cinematic drives the camera.
    #[wasm_bindgen(js_name = setCameraParams)]
    pub fn set_camera_params(&mut self, params: JsValue) -> Result<bool, JsValue> {
        let params: CameraParams = from_js(&params).map_err(js_err)?;
        Ok(self.scene.borrow_mut().set_camera_params(params))
    }

    #[wasm_bindgen(js_name = orbitDrag)]
    pub fn orbit_drag(&mut self, dx_px: f32, dy_px: f32) -> bool {
        self.scene.borrow_mut().orbit_drag(dx_px, dy_px)
    }

    pub fn zoom(&mut self, notches: f32) -> bool {
        self.scene.borrow_mut().zoom(notches)
    }

    #[wasm_bindgen(js_name = startCinematic)]
    pub fn start_cinematic(&mut self, opts: JsValue) -> Result<(), JsValue> {
        let opts: CinematicOptions = from_js(&opts).map_err(js_err)?;
        self.scene.borrow_mut().start_cinematic(&opts);
        Ok(())
    }

    #[wasm_bindgen(js_name = stopCinematic)]
    pub fn stop_cinematic(&mut self) {
        self.scene.borrow_mut().stop_cinematic();
    }

    /// Report a finished texture load for a handle from `textureRequests`.
    /// Pass an error message when the load failed. Returns `"Applied"`,
    /// `"Degraded"` or `"Stale"`.
    #[wasm_bindgen(js_name = textureLoaded)]
    pub fn texture_loaded(&mut self, handle: JsValue, error: Option<String>) -> Result<String, JsValue> {
        let handle: TextureHandle = from_js(&handle).map_err(js_err)?;
        let result = match error {
            None => Ok(()),
            Some(reason) => Err(TextureError::LoadFailed {
                url: handle.url.clone(),
                reason,
            }),
        };
        let outcome = self.scene.borrow_mut().texture_loaded(&handle, result);
        Ok(format!("{:?}", outcome))
    }

    /// Stop and return the remove/dispose signals for the live objects.
    pub fn teardown(&mut self) -> Result<JsValue, JsValue> {
        self.retire_loop();
        let signals = self.scene.borrow_mut().teardown();
        to_js(&signals).map_err(js_err)
    }

    pub fn mode(&self) -> String {
        format!("{:?}", self.scene.borrow().director().mode())
    }
}

impl PlanetSceneHandle {
    fn retire_loop(&self) {
        self.loop_token.set(self.loop_token.get().wrapping_add(1));
    }
}
