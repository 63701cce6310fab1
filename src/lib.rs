// storm-engine - Rain, puddles and lightning for a 2D canvas
//
// Layout:
//   sim/     simulation core (drops, ground, puddles, splashes, lightning)
//   render   drawing seam (`Surface`) and a headless recorder
//   timer    host timer seam for delayed thunder
//   config   values coming from the control layer
//   web/     browser binding (wasm32 only)

pub mod config;
pub mod error;
pub mod render;
pub mod sim;
pub mod timer;

#[cfg(target_arch = "wasm32")]
mod web;

pub use config::SceneConfig;
pub use error::StormError;
pub use render::{RecordingSurface, Surface};
pub use sim::{Stats, Storm};
pub use timer::{ManualTimers, Timers};

#[cfg(target_arch = "wasm32")]
pub use web::StormScene;
