// timers.rs - `Timers` over window.setTimeout / clearTimeout

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::error::StormError;
use crate::timer::{Task, TimerId, Timers};

use super::report;

pub struct BrowserTimers {
    window: Window,
}

impl BrowserTimers {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Timers for BrowserTimers {
    fn set_timeout(&mut self, delay_ms: f64, task: Task) -> Result<TimerId, StormError> {
        let callback = Closure::once_into_js(move || task());
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay_ms.round() as i32,
            )
            .map(TimerId)
            .map_err(|e| {
                let err = StormError::Timer(format!("setTimeout: {:?}", e));
                report(err.clone());
                err
            })
    }

    fn clear_timeout(&mut self, id: TimerId) -> Result<(), StormError> {
        self.window.clear_timeout_with_handle(id.0);
        Ok(())
    }
}
