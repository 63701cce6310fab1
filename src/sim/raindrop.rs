// raindrop.rs - Falling rain particles
//
// Each drop carries its own physics constants, derived once per lifetime from
// a randomized mass. Drops are recycled at the top instead of destroyed.

use rand::Rng;

use crate::render::{Paint, Rgba, Sprite, Surface};

// Size ranges (px)
const WIDTH_MIN: f32 = 1.0;
const WIDTH_MAX: f32 = 2.5;
const LENGTH_MIN: f32 = 10.0;
const LENGTH_MAX: f32 = 30.0;
const OPACITY_MIN: f32 = 0.2;
const OPACITY_MAX: f32 = 0.6;

// Physics constants
const MASS_FACTOR: f32 = 0.1;
const TERMINAL_BASE: f32 = 8.0;
const TERMINAL_PER_MASS: f32 = 2.0;
const ACCEL_BASE: f32 = 0.2;
const ACCEL_PER_MASS: f32 = 0.05;
const DRAG: f32 = 0.02;

const RAIN_COLOR: Rgba = Rgba::opaque(174, 194, 224);

/// Longest a drop can ever be; lower bound of any drop's y is `-MAX_LENGTH`.
pub const MAX_LENGTH: f32 = LENGTH_MAX;

#[derive(Clone, Debug)]
pub struct Raindrop {
    pub x: f32,
    pub y: f32,
    pub velocity: f32,
    acceleration: f32,
    terminal_velocity: f32,
    mass: f32,
    width: f32,
    length: f32,
    opacity: f32,
}

impl Raindrop {
    /// Fresh drop somewhere in the column `[-length, canvas_height)` so a new
    /// population is already raining on its first frame.
    pub fn new(canvas_width: f32, canvas_height: f32, rng: &mut impl Rng) -> Self {
        let mut drop = Self::seeded(canvas_width, rng);
        drop.y = -drop.length + rng.r#gen::<f32>() * (canvas_height.max(0.0) + drop.length);
        drop
    }

    fn seeded(canvas_width: f32, rng: &mut impl Rng) -> Self {
        let width = rng.gen_range(WIDTH_MIN..WIDTH_MAX);
        let length = rng.gen_range(LENGTH_MIN..LENGTH_MAX);
        let mass = width * length * MASS_FACTOR;
        let terminal_velocity = TERMINAL_BASE + mass * TERMINAL_PER_MASS;

        Self {
            x: rng.r#gen::<f32>() * canvas_width.max(0.0),
            y: -length,
            velocity: terminal_velocity * rng.gen_range(0.3..0.6),
            acceleration: ACCEL_BASE + mass * ACCEL_PER_MASS,
            terminal_velocity,
            mass,
            width,
            length,
            opacity: rng.gen_range(OPACITY_MIN..OPACITY_MAX),
        }
    }

    /// Advance one frame of motion.
    pub fn update(&mut self, _canvas_height: f32) {
        if self.velocity < self.terminal_velocity {
            self.velocity += self.acceleration;
            self.velocity -= self.velocity * DRAG;
            self.velocity = self.velocity.min(self.terminal_velocity);
        }

        self.y += self.velocity;
        self.x += wind(self.y);
    }

    pub fn is_out_of_bounds(&self, canvas_height: f32) -> bool {
        self.y > canvas_height + self.length
    }

    /// Re-seed at the top edge with fresh size and physics.
    pub fn reset(&mut self, canvas_width: f32, rng: &mut impl Rng) {
        *self = Self::seeded(canvas_width, rng);
    }

    /// Bottom end of the streak, where the drop meets the ground.
    pub fn tip(&self) -> f32 {
        self.y + self.length
    }

    pub fn length(&self) -> f32 { self.length }
    pub fn mass(&self) -> f32 { self.mass }
    pub fn terminal_velocity(&self) -> f32 { self.terminal_velocity }
}

/// Horizontal drift as a pure function of height.
#[inline]
fn wind(y: f32) -> f32 {
    (y * 0.01).sin() * 0.3 + (y * 0.03).sin() * 0.15
}

impl Sprite for Raindrop {
    fn draw(&self, surface: &mut dyn Surface) {
        let tip = self.tip();
        let stops = [
            (0.0, RAIN_COLOR.with_alpha(0.0)),
            (1.0, RAIN_COLOR.with_alpha(self.opacity)),
        ];

        surface.set_stroke(
            Paint::Linear { from: (self.x, self.y), to: (self.x, tip), stops: &stops },
            self.width,
        );
        surface.begin_path();
        surface.move_to(self.x, self.y);
        surface.line_to(self.x, tip);
        surface.stroke();

        // Droplet cap
        surface.set_fill(Paint::Solid(RAIN_COLOR.with_alpha(self.opacity * 1.2)));
        surface.begin_path();
        surface.arc(self.x, tip, self.width * 0.8);
        surface.fill();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Op, RecordingSurface};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn velocity_never_exceeds_terminal() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let mut drop = Raindrop::new(800.0, 600.0, &mut rng);
            for _ in 0..500 {
                drop.update(600.0);
                assert!(drop.velocity <= drop.terminal_velocity());
            }
        }
    }

    #[test]
    fn velocity_rises_toward_terminal() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut drop = Raindrop::new(800.0, 600.0, &mut rng);
        let mut last = drop.velocity;
        for _ in 0..200 {
            drop.update(600.0);
            assert!(drop.velocity >= last);
            last = drop.velocity;
        }
        assert!((drop.velocity - drop.terminal_velocity()).abs() < 1e-3);
    }

    #[test]
    fn heavier_drops_fall_faster() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let drop = Raindrop::new(800.0, 600.0, &mut rng);
            let expected = 8.0 + drop.mass() * 2.0;
            assert!((drop.terminal_velocity() - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn reset_places_drop_just_above_top() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut drop = Raindrop::new(800.0, 600.0, &mut rng);
        while !drop.is_out_of_bounds(600.0) {
            drop.update(600.0);
        }

        drop.reset(800.0, &mut rng);
        assert_eq!(drop.y, -drop.length());
        assert!(drop.x >= 0.0 && drop.x < 800.0);
        assert!(!drop.is_out_of_bounds(600.0));
    }

    #[test]
    fn wind_depends_only_on_height() {
        assert_eq!(wind(123.0), wind(123.0));
        assert!(wind(0.0).abs() < 1e-6);
        assert!(wind(50.0).abs() <= 0.45);
    }

    #[test]
    fn draw_emits_streak_and_cap() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let drop = Raindrop::new(100.0, 100.0, &mut rng);
        let mut surface = RecordingSurface::new(100.0, 100.0);
        drop.draw(&mut surface);

        assert_eq!(surface.count(|op| matches!(op, Op::StrokePath)), 1);
        assert_eq!(surface.count(|op| matches!(op, Op::Arc { .. })), 1);
    }
}
