// error.rs - Failure taxonomy
//
// Frames never fail. The only errors come from the host: a missing canvas at
// startup (fatal), and timer/draw/callback failures the browser reports
// (logged, skipped).

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum StormError {
    /// Canvas element or its 2D context could not be obtained.
    SurfaceUnavailable(String),
    /// The host refused to schedule or cancel a timeout.
    Timer(String),
    /// A drawing primitive reported an error.
    Draw(String),
    /// A host callback (thunder, volume) threw.
    Callback(String),
}

impl StormError {
    /// Single console line for a failure the frame carries on past.
    pub fn warning(&self) -> String {
        format!("storm-engine: {}", self)
    }
}

impl fmt::Display for StormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StormError::SurfaceUnavailable(msg) => write!(f, "rendering surface unavailable: {}", msg),
            StormError::Timer(msg) => write!(f, "timer error: {}", msg),
            StormError::Draw(msg) => write!(f, "draw error: {}", msg),
            StormError::Callback(msg) => write!(f, "callback threw: {}", msg),
        }
    }
}

impl std::error::Error for StormError {}

impl From<StormError> for wasm_bindgen::JsValue {
    fn from(err: StormError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
