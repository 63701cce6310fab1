// lightning.rs - Lightning strikes and thunder scheduling
//
// Two states: idle and flashing. Timing is driven only by the `dt` handed to
// `update`; thunder is scheduled on the host timer and can be cancelled on
// teardown.

use std::cell::Cell;
use std::rc::Rc;

use rand::Rng;

use crate::render::{Paint, Rgba, Sprite, Surface};
use crate::timer::{TimerId, Timers};

use super::lerp;

pub type ThunderSink = Rc<dyn Fn()>;

pub const MAX_DURATION_MS: f32 = 200.0;
const STRIKE_CHANCE: f32 = 0.3;
const DELAY_MIN_MS: f32 = 2_000.0;
const DELAY_MAX_MS: f32 = 10_000.0;
pub const THUNDER_MIN_MS: f32 = 100.0;
pub const THUNDER_MAX_MS: f32 = 400.0;

const INTENSITY_MIN: f32 = 0.2;
const INTENSITY_MAX: f32 = 1.0;
const BRANCHES_MIN: usize = 2;
const BRANCHES_MAX: usize = 5;
const SEGMENTS_MIN: usize = 8;
const SEGMENTS_MAX: usize = 16;
/// Total horizontal jitter band around the straight line (px).
const JITTER: f32 = 40.0;
/// Envelope peak as a fraction of the flash.
const ATTACK: f32 = 0.1;

const BOLT_GLOW: Rgba = Rgba::opaque(170, 190, 255);
const BOLT_CORE: Rgba = Rgba::opaque(240, 245, 255);

/// One jittered polyline from the top edge down into the sky.
#[derive(Clone, Debug)]
pub struct Branch {
    pub start: (f32, f32),
    pub end: (f32, f32),
    pub path: Vec<(f32, f32)>,
}

impl Branch {
    pub fn generate(width: f32, height: f32, rng: &mut impl Rng) -> Self {
        let start = (rng.r#gen::<f32>() * width, 0.0);
        let end = (
            start.0 + (rng.r#gen::<f32>() - 0.5) * width * 0.4,
            height * rng.gen_range(0.2..0.8),
        );
        let segments = rng.gen_range(SEGMENTS_MIN..=SEGMENTS_MAX);

        let path = (0..=segments)
            .map(|i| {
                if i == 0 {
                    return start;
                }
                if i == segments {
                    return end;
                }
                let t = i as f32 / segments as f32;
                let jitter = (rng.r#gen::<f32>() - 0.5) * JITTER;
                (lerp(start.0, end.0, t) + jitter, lerp(start.1, end.1, t))
            })
            .collect();

        Self { start, end, path }
    }

    pub fn segments(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

impl Sprite for Branch {
    fn draw(&self, surface: &mut dyn Surface) {
        let Some((&(x0, y0), rest)) = self.path.split_first() else {
            return;
        };
        surface.begin_path();
        surface.move_to(x0, y0);
        for &(x, y) in rest {
            surface.line_to(x, y);
        }
        surface.stroke();
    }
}

struct PendingThunder {
    id: TimerId,
    fired: Rc<Cell<bool>>,
}

pub struct Lightning {
    active: bool,
    duration: f32,
    intensity: f32,
    since_last_strike: f32,
    next_delay: f32,
    branches: Vec<Branch>,
    thunder: Option<ThunderSink>,
    pending: Vec<PendingThunder>,
    strikes: u64,
}

impl Lightning {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            active: false,
            duration: 0.0,
            intensity: 0.0,
            since_last_strike: 0.0,
            next_delay: rng.gen_range(DELAY_MIN_MS..DELAY_MAX_MS),
            branches: Vec::new(),
            thunder: None,
            pending: Vec::new(),
            strikes: 0,
        }
    }

    /// Install or remove the thunder callback. `None` means silent lightning.
    pub fn set_thunder(&mut self, sink: Option<ThunderSink>) {
        self.thunder = sink;
    }

    /// Advance by `dt_ms`. While idle and past the delay window, each tick
    /// strikes with a fixed chance.
    pub fn update(
        &mut self,
        dt_ms: f32,
        width: f32,
        height: f32,
        rng: &mut impl Rng,
        timers: &mut dyn Timers,
    ) {
        self.pending.retain(|p| !p.fired.get());
        self.since_last_strike += dt_ms;

        if self.active {
            self.duration += dt_ms;
            if self.duration >= MAX_DURATION_MS {
                self.active = false;
            }
        } else if self.since_last_strike > self.next_delay && rng.r#gen::<f32>() < STRIKE_CHANCE {
            self.strike(width, height, rng, timers);
        }
    }

    /// Start a strike now: fresh intensity, branches and delay window, and
    /// thunder scheduled after the light.
    pub fn strike(&mut self, width: f32, height: f32, rng: &mut impl Rng, timers: &mut dyn Timers) {
        self.active = true;
        self.duration = 0.0;
        self.intensity = rng.gen_range(INTENSITY_MIN..=INTENSITY_MAX);
        self.since_last_strike = 0.0;
        self.next_delay = rng.gen_range(DELAY_MIN_MS..DELAY_MAX_MS);
        self.strikes += 1;

        let count = rng.gen_range(BRANCHES_MIN..=BRANCHES_MAX);
        self.branches = (0..count).map(|_| Branch::generate(width, height, rng)).collect();

        tracing::debug!(intensity = self.intensity, branches = count, "lightning strike");

        let Some(sink) = self.thunder.clone() else {
            return;
        };
        let delay = rng.gen_range(THUNDER_MIN_MS..=THUNDER_MAX_MS);
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let task = Box::new(move || {
            flag.set(true);
            sink();
        });

        match timers.set_timeout(delay as f64, task) {
            Ok(id) => self.pending.push(PendingThunder { id, fired }),
            Err(err) => tracing::warn!(%err, "thunder not scheduled"),
        }
    }

    /// End any flash in progress. Thunder already scheduled still plays.
    pub fn set_idle(&mut self) {
        self.active = false;
        self.duration = 0.0;
    }

    /// Cancel every thunder callback that has not fired yet.
    pub fn cancel_thunder(&mut self, timers: &mut dyn Timers) {
        for p in self.pending.drain(..) {
            if p.fired.get() {
                continue;
            }
            if let Err(err) = timers.clear_timeout(p.id) {
                tracing::warn!(%err, "thunder not cancelled");
            }
        }
    }

    /// Current flash strength: fast attack to the strike intensity, then a
    /// linear release to zero over the rest of the flash.
    pub fn flash_intensity(&self) -> f32 {
        if !self.active {
            return 0.0;
        }
        let p = (self.duration / MAX_DURATION_MS).clamp(0.0, 1.0);
        if p < ATTACK {
            self.intensity * (p / ATTACK)
        } else {
            self.intensity * (1.0 - (p - ATTACK) / (1.0 - ATTACK))
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        let flash = self.flash_intensity();
        if flash <= 0.0 {
            return;
        }

        surface.save();
        surface.set_glow(20.0 * flash, BOLT_GLOW.with_alpha(flash));
        surface.set_stroke(Paint::Solid(BOLT_GLOW.with_alpha(flash)), 1.0 + 3.0 * flash);
        for b in &self.branches {
            b.draw(surface);
        }

        surface.set_glow(0.0, BOLT_CORE);
        surface.set_stroke(Paint::Solid(BOLT_CORE.with_alpha(flash)), 1.0);
        for b in &self.branches {
            b.draw(surface);
        }
        surface.restore();
    }

    pub fn is_active(&self) -> bool { self.active }
    pub fn intensity(&self) -> f32 { self.intensity }
    pub fn branches(&self) -> &[Branch] { &self.branches }
    pub fn strikes(&self) -> u64 { self.strikes }
    pub fn pending_thunder(&self) -> usize { self.pending.len() }
}
