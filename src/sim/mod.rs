// sim/ - Storm simulation
//
// `Storm` owns the raindrop population, the ground (puddles + splashes) and
// the lightning generator. Each frame runs in a fixed order:
//   drops -> impacts -> ground pools -> lightning -> render
// Rendering is back to front: sky, rain, ground, bolts, flash.

mod ground;
mod lightning;
mod puddle;
mod raindrop;
mod splash;

pub use ground::{Ground, Impact};
pub use lightning::{Branch, Lightning, ThunderSink, MAX_DURATION_MS, THUNDER_MAX_MS, THUNDER_MIN_MS};
pub use puddle::{Puddle, PuddleShape, Ripple, Span, MAX_RIPPLES};
pub use raindrop::{Raindrop, MAX_LENGTH};
pub use splash::{SplashParticle, Splashes};

use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::SceneConfig;
use crate::render::{Paint, Rgba, Sprite, Surface};
use crate::timer::Timers;

// Capacity limits
pub const MAX_SPLASHES: usize = 200;
pub const SPLASH_TRIM: usize = 150;

/// Longest step the simulation takes; larger gaps (tab switch) are clamped.
const MAX_FRAME_MS: f64 = 100.0;
const FLASH_ALPHA: f32 = 0.3;

const SKY_TOP: Rgba = Rgba::opaque(8, 10, 22);
const SKY_BOTTOM: Rgba = Rgba::opaque(30, 36, 56);
const FLASH: Rgba = Rgba::opaque(255, 255, 255);

pub type VolumeHook = Rc<dyn Fn(f32)>;

/// Snapshot of pool sizes for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stats {
    pub drops: usize,
    pub splashes: usize,
    pub ripples: usize,
    pub puddles: usize,
    pub strikes: u64,
    pub pending_thunder: usize,
    pub flash: f32,
}

pub struct Storm<R: Rng> {
    w: f32,
    h: f32,
    config: SceneConfig,

    // Entities
    drops: Vec<Raindrop>,
    ground: Ground,
    lightning: Lightning,

    rng: R,
    timers: Box<dyn Timers>,
    volume: Option<VolumeHook>,

    last_frame: Option<f64>,
    running: bool,
}

impl Storm<ChaCha8Rng> {
    /// Production scene seeded from OS/browser entropy.
    pub fn with_entropy(w: f32, h: f32, config: SceneConfig, timers: Box<dyn Timers>) -> Self {
        Self::new(w, h, config, ChaCha8Rng::from_entropy(), timers)
    }
}

impl<R: Rng> Storm<R> {
    pub fn new(w: f32, h: f32, config: SceneConfig, mut rng: R, timers: Box<dyn Timers>) -> Self {
        let ground = Ground::new(w, h, &mut rng);
        let lightning = Lightning::new(&mut rng);
        let mut storm = Self {
            w,
            h,
            config,
            drops: Vec::new(),
            ground,
            lightning,
            rng,
            timers,
            volume: None,
            last_frame: None,
            running: true,
        };
        storm.resize_population();
        storm
    }

    /// One host frame: derive `dt` from the timestamp, advance, render.
    pub fn frame(&mut self, timestamp_ms: f64, surface: &mut dyn Surface) {
        if !self.running {
            return;
        }
        let dt = match self.last_frame {
            Some(last) => (timestamp_ms - last).clamp(0.0, MAX_FRAME_MS),
            None => 0.0,
        };
        self.last_frame = Some(timestamp_ms);

        self.update(dt as f32);
        self.render(surface);
    }

    /// Advance the whole scene by `dt_ms`.
    pub fn update(&mut self, dt_ms: f32) {
        if self.config.rain_enabled {
            self.update_drops();
        }

        self.ground.update(dt_ms);

        if self.config.lightning_enabled {
            self.lightning.update(dt_ms, self.w, self.h, &mut self.rng, self.timers.as_mut());
        }
    }

    /// A drop impacts on the frame its tip crosses the ground line, then keeps
    /// falling behind the ground layer until it leaves the canvas.
    fn update_drops(&mut self) {
        let ground_y = self.ground.ground_y();
        let floor = self.ground.impact_floor();

        for drop in &mut self.drops {
            let before = drop.tip();
            drop.update(self.h);

            let tip = drop.tip();
            if before <= ground_y && tip > ground_y {
                // Fast drops can overshoot the puddle band in one frame
                self.ground.add_splash(drop.x, tip.min(floor), &mut self.rng);
            }
            if drop.is_out_of_bounds(self.h) {
                drop.reset(self.w, &mut self.rng);
            }
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        let sky = [(0.0, SKY_TOP), (1.0, SKY_BOTTOM)];
        surface.set_fill(Paint::Linear { from: (0.0, 0.0), to: (0.0, self.h), stops: &sky });
        surface.fill_rect(0.0, 0.0, self.w, self.h);

        if self.config.rain_enabled {
            for drop in &self.drops {
                drop.draw(surface);
            }
        }

        self.ground.render(surface);

        if self.config.lightning_enabled {
            self.lightning.render(surface);

            let flash = self.lightning.flash_intensity();
            if flash > 0.0 {
                surface.set_fill(Paint::Solid(FLASH.with_alpha(flash * FLASH_ALPHA)));
                surface.fill_rect(0.0, 0.0, self.w, self.h);
            }
        }
    }

    /// New canvas size: puddles are re-laid out and the rain repopulated.
    pub fn resize(&mut self, w: f32, h: f32) {
        self.w = w;
        self.h = h;
        self.ground.on_canvas_resize(w, h, &mut self.rng);
        self.drops.clear();
        self.resize_population();
        tracing::info!(w, h, "scene resized");
    }

    pub fn set_intensity(&mut self, level: u8) {
        self.config.set_intensity(level);
        self.resize_population();
        self.notify_volume();
    }

    pub fn set_rain_enabled(&mut self, enabled: bool) {
        self.config.rain_enabled = enabled;
        self.notify_volume();
    }

    /// Disabling also ends a flash in progress so it cannot resume later.
    pub fn set_lightning_enabled(&mut self, enabled: bool) {
        self.config.lightning_enabled = enabled;
        if !enabled {
            self.lightning.set_idle();
        }
    }

    /// Strike now, regardless of the autonomous schedule. Ignored while
    /// lightning is disabled.
    pub fn trigger_lightning(&mut self) {
        if !self.config.lightning_enabled {
            tracing::debug!("lightning disabled, trigger ignored");
            return;
        }
        self.lightning.strike(self.w, self.h, &mut self.rng, self.timers.as_mut());
    }

    pub fn set_thunder(&mut self, sink: Option<ThunderSink>) {
        self.lightning.set_thunder(sink);
    }

    /// Install the rain-volume hook; it is called right away with the current volume.
    pub fn set_volume_hook(&mut self, hook: Option<VolumeHook>) {
        self.volume = hook;
        self.notify_volume();
    }

    /// Stop the loop and cancel any thunder still in flight.
    pub fn teardown(&mut self) {
        self.running = false;
        self.lightning.cancel_thunder(self.timers.as_mut());
    }

    /// Grow with fresh drops or truncate the tail to match the intensity level.
    fn resize_population(&mut self) {
        let target = self.config.drop_count();
        if self.drops.len() > target {
            self.drops.truncate(target);
        } else {
            let (w, h) = (self.w, self.h);
            let rng = &mut self.rng;
            self.drops.extend((self.drops.len()..target).map(|_| Raindrop::new(w, h, rng)));
        }
        tracing::info!(drops = target, level = self.config.intensity(), "rain population");
    }

    fn notify_volume(&self) {
        if let Some(hook) = &self.volume {
            hook(self.config.rain_volume());
        }
    }

    pub fn drops(&self) -> &[Raindrop] { &self.drops }
    pub fn ground(&self) -> &Ground { &self.ground }
    pub fn lightning(&self) -> &Lightning { &self.lightning }
    pub fn config(&self) -> &SceneConfig { &self.config }
    pub fn is_running(&self) -> bool { self.running }
    pub fn size(&self) -> (f32, f32) { (self.w, self.h) }

    pub fn stats(&self) -> Stats {
        Stats {
            drops: self.drops.len(),
            splashes: self.ground.splash_count(),
            ripples: self.ground.ripple_count(),
            puddles: self.ground.puddles().len(),
            strikes: self.lightning.strikes(),
            pending_thunder: self.lightning.pending_thunder(),
            flash: self.lightning.flash_intensity(),
        }
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 { a + (b - a) * t }
