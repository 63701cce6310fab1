// web/ - Browser binding
//
// JS owns the canvas lifecycle and the requestAnimationFrame loop; it calls
// `frame(timestamp)` once per display frame and forwards control changes.

mod canvas;
mod timers;

use std::rc::Rc;

use rand_chacha::ChaCha8Rng;
use wasm_bindgen::prelude::*;

use crate::config::SceneConfig;
use crate::error::StormError;
use crate::render::Surface;
use crate::sim::{Storm, ThunderSink, VolumeHook};

use canvas::CanvasSurface;
use timers::BrowserTimers;

/// Non-fatal browser failures go straight to the devtools console; nothing
/// subscribes to `tracing` in the browser build.
pub(crate) fn report(err: StormError) {
    web_sys::console::warn_1(&err.warning().into());
}

#[wasm_bindgen]
pub struct StormScene {
    storm: Storm<ChaCha8Rng>,
    surface: CanvasSurface,
}

#[wasm_bindgen]
impl StormScene {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<StormScene, JsValue> {
        console_error_panic_hook::set_once();

        let surface = CanvasSurface::from_id(canvas_id).map_err(|err| {
            web_sys::console::error_1(&err.to_string().into());
            err
        })?;
        let window = web_sys::window()
            .ok_or_else(|| StormError::SurfaceUnavailable("no window".into()))?;

        let (w, h) = surface.size();
        let storm = Storm::with_entropy(w, h, SceneConfig::default(), Box::new(BrowserTimers::new(window)));
        Ok(Self { storm, surface })
    }

    pub fn frame(&mut self, timestamp: f64) {
        self.storm.frame(timestamp, &mut self.surface);
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        self.surface.set_size(w, h);
        self.storm.resize(w as f32, h as f32);
    }

    pub fn set_rain_enabled(&mut self, enabled: bool) {
        self.storm.set_rain_enabled(enabled);
    }

    pub fn set_lightning_enabled(&mut self, enabled: bool) {
        self.storm.set_lightning_enabled(enabled);
    }

    pub fn set_intensity(&mut self, level: u8) {
        self.storm.set_intensity(level);
    }

    pub fn trigger_lightning(&mut self) {
        self.storm.trigger_lightning();
    }

    /// `callback()` plays one thunder clap. Pass `undefined` for silent lightning.
    pub fn set_thunder_callback(&mut self, callback: Option<js_sys::Function>) {
        let sink = callback.map(|f| {
            Rc::new(move || {
                if let Err(e) = f.call0(&JsValue::NULL) {
                    report(StormError::Callback(format!("thunder: {:?}", e)));
                }
            }) as ThunderSink
        });
        self.storm.set_thunder(sink);
    }

    /// `callback(volume)` receives rain volume in [0, 1].
    pub fn set_volume_callback(&mut self, callback: Option<js_sys::Function>) {
        let hook = callback.map(|f| {
            Rc::new(move |volume: f32| {
                if let Err(e) = f.call1(&JsValue::NULL, &JsValue::from_f64(volume as f64)) {
                    report(StormError::Callback(format!("volume: {:?}", e)));
                }
            }) as VolumeHook
        });
        self.storm.set_volume_hook(hook);
    }

    /// Stop rendering and cancel thunder still waiting on its timer.
    pub fn destroy(&mut self) {
        self.storm.teardown();
    }

    // Accessors for JS
    pub fn drop_count(&self) -> usize { self.storm.stats().drops }
    pub fn splash_count(&self) -> usize { self.storm.stats().splashes }
    pub fn ripple_count(&self) -> usize { self.storm.stats().ripples }
    pub fn flash_intensity(&self) -> f32 { self.storm.stats().flash }
    pub fn is_running(&self) -> bool { self.storm.is_running() }
}
