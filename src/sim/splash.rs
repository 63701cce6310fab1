// splash.rs - Water splash effects
//
// Short-lived droplets thrown up on impact. They fly under gravity and die
// when their life runs out or they fall back to where they struck.

use rand::Rng;

use crate::render::{Paint, Rgba, Sprite, Surface};

use super::{MAX_SPLASHES, SPLASH_TRIM};

const GRAVITY: f32 = 980.0; // px/s^2
const DAMPING_X: f32 = 0.98;
const DAMPING_Y: f32 = 0.995;
const BURST_MIN: usize = 3;
const BURST_MAX: usize = 6;

const SPLASH_COLOR: Rgba = Rgba::opaque(200, 215, 235);

#[derive(Clone, Debug)]
pub struct SplashParticle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Remaining life fraction, 1 -> 0.
    pub life: f32,
    max_life: f32,
    size: f32,
    impact_y: f32,
}

impl SplashParticle {
    pub fn spawn(x: f32, y: f32, rng: &mut impl Rng) -> Self {
        Self {
            x: x + (rng.r#gen::<f32>() - 0.5) * 6.0,
            // Start just above the impact so the particle is alive on its first tick
            y: y - rng.gen_range(0.5..2.0),
            vx: (rng.r#gen::<f32>() - 0.5) * 120.0,
            vy: -rng.gen_range(60.0..180.0),
            life: 1.0,
            max_life: rng.gen_range(0.3..0.6),
            size: rng.gen_range(0.8..2.0),
            impact_y: y,
        }
    }

    /// Advance by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.vy += GRAVITY * dt;
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.vx *= DAMPING_X;
        self.vy *= DAMPING_Y;
        self.life -= dt / self.max_life;
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0 || self.y >= self.impact_y
    }

    pub fn impact_y(&self) -> f32 {
        self.impact_y
    }
}

impl Sprite for SplashParticle {
    fn draw(&self, surface: &mut dyn Surface) {
        let life = self.life.max(0.0);
        surface.set_fill(Paint::Solid(SPLASH_COLOR.with_alpha(life * 0.8)));
        surface.begin_path();
        surface.arc(self.x, self.y, self.size * (0.5 + life * 0.5));
        surface.fill();
    }
}

/// Pool of live splash particles, oldest first.
#[derive(Default)]
pub struct Splashes {
    items: Vec<SplashParticle>,
}

impl Splashes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SplashParticle> {
        self.items.iter()
    }

    /// Spawn a 3–6 particle burst at an impact point. Returns the burst size.
    pub fn burst(&mut self, x: f32, y: f32, rng: &mut impl Rng) -> usize {
        let count = rng.gen_range(BURST_MIN..=BURST_MAX);
        for _ in 0..count {
            self.items.push(SplashParticle::spawn(x, y, rng));
        }

        if self.items.len() > MAX_SPLASHES {
            let excess = self.items.len() - SPLASH_TRIM;
            self.items.drain(..excess);
        }
        count
    }

    /// Advance all particles by `dt` seconds, dropping finished ones.
    pub fn update(&mut self, dt: f32) {
        for p in &mut self.items {
            p.update(dt);
        }
        self.items.retain(|p| !p.is_dead());
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for p in &self.items {
            p.draw(surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn burst_size_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut pool = Splashes::new();
        for _ in 0..20 {
            let before = pool.len();
            let n = pool.burst(100.0, 500.0, &mut rng);
            assert!((3..=6).contains(&n));
            assert_eq!(pool.len(), before + n);
            pool.clear();
        }
    }

    #[test]
    fn pool_is_trimmed_to_most_recent() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut pool = Splashes::new();
        for i in 0..100 {
            pool.burst(i as f32, 500.0, &mut rng);
            assert!(pool.len() <= MAX_SPLASHES);
        }
        // Newest burst survives the trim
        let last = pool.iter().last().unwrap();
        assert!((last.x - 99.0).abs() <= 3.0);
    }

    #[test]
    fn particle_rises_then_dies() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut p = SplashParticle::spawn(50.0, 400.0, &mut rng);
        assert!(!p.is_dead());

        p.update(0.016);
        assert!(p.y < p.impact_y());
        let mut last_life = p.life;

        let mut ticks = 0;
        while !p.is_dead() {
            p.update(0.016);
            assert!(p.life < last_life);
            last_life = p.life;
            ticks += 1;
            assert!(ticks < 100, "splash particle never died");
        }
    }

    #[test]
    fn particles_never_linger_below_impact() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut pool = Splashes::new();
        for _ in 0..10 {
            pool.burst(200.0, 450.0, &mut rng);
        }
        for _ in 0..60 {
            pool.update(0.016);
            assert!(pool.iter().all(|p| p.y < p.impact_y() && p.life > 0.0));
        }
        assert!(pool.is_empty());
    }
}
