use crate::bridge;
use instant::Instant;
use js_sys::Float32Array;
use planet_core::PlanetScene;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub struct FrameContext {
    pub scene: Rc<RefCell<PlanetScene>>,
    pub on_frame: js_sys::Function,
    pub epoch: Instant,
}

impl FrameContext {
    /// Advance the scene and hand the frame to JS as `onFrame(frame, stars)`.
    /// `stars` is a `Float32Array` on frames that rebuild the scene and
    /// `undefined` otherwise.
    pub fn frame(&self) -> anyhow::Result<()> {
        let now = self.epoch.elapsed().as_secs_f64();
        // scene borrow ends here so onFrame may call back into the handle
        let Some(out) = self.scene.borrow_mut().frame(now) else {
            return Ok(());
        };
        let stars = match out.rebuild.as_ref() {
            Some(r) => Float32Array::from(r.description.star_buffer()).into(),
            None => JsValue::UNDEFINED,
        };
        let payload = bridge::to_js(&out)?;
        self.on_frame
            .call2(&JsValue::NULL, &payload, &stars)
            .map_err(|e| anyhow::anyhow!("onFrame threw: {:?}", e))?;
        Ok(())
    }
}

/// Drive `ctx` from requestAnimationFrame until `token` moves past the value
/// it had when the loop started.
pub fn start_loop(ctx: Rc<FrameContext>, token: Rc<Cell<u32>>) {
    let id = token.get();
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if token.get() != id {
            log::debug!("[frame] loop {} retired", id);
            // break the self-reference; freed once this call returns
            drop(tick_clone.borrow_mut().take());
            return;
        }
        if let Err(e) = ctx.frame() {
            log::error!("[frame] {:#}", e);
        }
        if let Some(cb) = tick_clone.borrow().as_ref() {
            request_frame(cb);
        }
    }) as Box<dyn FnMut()>));
    if let Some(cb) = tick.borrow().as_ref() {
        request_frame(cb);
    }
}

fn request_frame(cb: &Closure<dyn FnMut()>) {
    if let Some(w) = web::window() {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
