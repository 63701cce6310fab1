// ground.rs - Ground plane and impact resolution
//
// Owns the puddle layout and the splash pool. Impacts resolve in two tiers:
//   - inside a puddle's span and depth: ripple on that puddle + splash
//   - anywhere else below the ground line: splash only

use rand::Rng;

use crate::render::{Paint, Rgba, Sprite, Surface};

use super::puddle::{Puddle, HIT_MARGIN};
use super::splash::Splashes;

/// Ground line as a fraction of canvas height.
const GROUND_LEVEL: f32 = 0.82;
/// One puddle per this many px of canvas width.
const PUDDLE_SPACING: f32 = 220.0;
const MAX_PUDDLES: usize = 6;

const GROUND_TOP: Rgba = Rgba::opaque(28, 30, 38);
const GROUND_BOTTOM: Rgba = Rgba::opaque(12, 13, 18);

/// How an impact was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Impact {
    /// Landed in the puddle at this index: one ripple and a splash burst.
    Puddle(usize),
    /// Below the ground line but outside every puddle: splash burst only.
    Dry,
    /// Not below the ground line; nothing spawned.
    Miss,
}

pub struct Ground {
    width: f32,
    height: f32,
    ground_y: f32,
    puddles: Vec<Puddle>,
    splashes: Splashes,
}

impl Ground {
    pub fn new(width: f32, height: f32, rng: &mut impl Rng) -> Self {
        let mut ground = Self {
            width,
            height,
            ground_y: height * GROUND_LEVEL,
            puddles: Vec::new(),
            splashes: Splashes::new(),
        };
        ground.layout_puddles(rng);
        ground
    }

    /// Replace the puddle set for a new canvas size. Ripples go with it.
    pub fn on_canvas_resize(&mut self, width: f32, height: f32, rng: &mut impl Rng) {
        self.width = width;
        self.height = height;
        self.ground_y = height * GROUND_LEVEL;
        self.splashes.clear();
        self.layout_puddles(rng);
    }

    fn layout_puddles(&mut self, rng: &mut impl Rng) {
        let count = ((self.width / PUDDLE_SPACING) as usize).min(MAX_PUDDLES);
        self.puddles = (0..count)
            .filter_map(|_| Puddle::generate(self.width, self.ground_y, rng))
            .collect();
        tracing::debug!(count = self.puddles.len(), width = self.width, "puddle layout");
    }

    /// Register an impact at (x, y). The first puddle hit in layout order wins.
    pub fn add_splash(&mut self, x: f32, y: f32, rng: &mut impl Rng) -> Impact {
        if y <= self.ground_y {
            return Impact::Miss;
        }

        let hit = self.puddles.iter().position(|p| p.hit(x, y));
        if let Some(i) = hit {
            self.puddles[i].add_ripple(x, y);
        }
        self.splashes.burst(x, y, rng);

        match hit {
            Some(i) => Impact::Puddle(i),
            None => Impact::Dry,
        }
    }

    /// Advance splashes and ripples by `dt_ms` milliseconds.
    pub fn update(&mut self, dt_ms: f32) {
        let dt = dt_ms / 1000.0;
        self.splashes.update(dt);
        for p in &mut self.puddles {
            p.update(dt);
        }
    }

    /// Ground, then puddles with their ripples, then splashes.
    pub fn render(&self, surface: &mut dyn Surface) {
        let stops = [(0.0, GROUND_TOP), (1.0, GROUND_BOTTOM)];
        surface.set_fill(Paint::Linear {
            from: (0.0, self.ground_y),
            to: (0.0, self.height),
            stops: &stops,
        });
        surface.fill_rect(0.0, self.ground_y, self.width, self.height - self.ground_y);

        for p in &self.puddles {
            p.draw(surface);
        }
        self.splashes.draw(surface);
    }

    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    /// Depth of the deepest puddle lobe; 0 with no puddles.
    pub fn max_puddle_height(&self) -> f32 {
        self.puddles.iter().map(Puddle::depth).fold(0.0, f32::max)
    }

    /// Deepest y an impact can still register at.
    pub fn impact_floor(&self) -> f32 {
        self.ground_y + self.max_puddle_height() + HIT_MARGIN
    }

    pub fn puddles(&self) -> &[Puddle] {
        &self.puddles
    }

    pub fn splash_count(&self) -> usize {
        self.splashes.len()
    }

    pub fn ripple_count(&self) -> usize {
        self.puddles.iter().map(Puddle::ripple_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Op, RecordingSurface};
    use crate::sim::puddle::PuddleShape;
    use crate::sim::MAX_SPLASHES;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ground() -> (Ground, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        (Ground::new(2000.0, 600.0, &mut rng), rng)
    }

    #[test]
    fn puddle_hit_spawns_ripple_and_splash() {
        let (mut g, mut rng) = ground();
        assert!(!g.puddles().is_empty());
        let (cx, _) = g.puddles()[0].center();
        let y = g.ground_y() + 1.0;

        let before = g.splash_count();
        let impact = g.add_splash(cx, y, &mut rng);

        let spawned = g.splash_count() - before;
        assert!((3..=6).contains(&spawned));
        assert!(matches!(impact, Impact::Puddle(_)));
        let Impact::Puddle(i) = impact else { unreachable!() };
        assert_eq!(g.puddles()[i].ripple_count(), 1);
        assert_eq!(g.ripple_count(), 1);
    }

    #[test]
    fn dry_ground_spawns_splash_only() {
        let (mut g, mut rng) = ground();
        let y = g.ground_y() + 1.0;
        let dry_x = (0..2000)
            .map(|x| x as f32)
            .find(|&x| !g.puddles().iter().any(|p| p.hit(x, y)))
            .expect("some dry ground");

        assert_eq!(g.add_splash(dry_x, y, &mut rng), Impact::Dry);
        assert!((3..=6).contains(&g.splash_count()));
        assert_eq!(g.ripple_count(), 0);
    }

    #[test]
    fn impacts_above_ground_are_ignored() {
        let (mut g, mut rng) = ground();
        let y = g.ground_y();
        assert_eq!(g.add_splash(100.0, y, &mut rng), Impact::Miss);
        assert_eq!(g.splash_count(), 0);
    }

    #[test]
    fn first_puddle_in_layout_order_wins() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut g = Ground::new(800.0, 600.0, &mut rng);
        let span = crate::sim::puddle::Span { left: 100.0, width: 100.0, depth: 10.0 };
        g.puddles = vec![
            Puddle::new(PuddleShape::Simple(span), g.ground_y()),
            Puddle::new(PuddleShape::Simple(span), g.ground_y()),
        ];

        let impact = g.add_splash(150.0, g.ground_y() + 2.0, &mut rng);
        assert_eq!(impact, Impact::Puddle(0));
        assert_eq!(g.puddles()[0].ripple_count(), 1);
        assert_eq!(g.puddles()[1].ripple_count(), 0);
    }

    #[test]
    fn secondary_lobe_hits_and_wins_over_later_puddles() {
        use crate::sim::puddle::Span;

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut g = Ground::new(800.0, 600.0, &mut rng);
        let gy = g.ground_y();
        let primary = Span { left: 100.0, width: 80.0, depth: 10.0 };
        let secondary = Span { left: 170.0, width: 40.0, depth: 6.0 };
        let neighbour = Span { left: 190.0, width: 60.0, depth: 10.0 };
        g.puddles = vec![
            Puddle::new(PuddleShape::Compound { primary, secondary, offset: 0.0 }, gy),
            Puddle::new(PuddleShape::Simple(neighbour), gy),
        ];

        // x = 200 is past the primary lobe, inside the secondary and the neighbour
        assert_eq!(g.add_splash(200.0, gy + 3.0, &mut rng), Impact::Puddle(0));
        assert_eq!(g.puddles()[0].ripple_count(), 1);
        assert_eq!(g.puddles()[1].ripple_count(), 0);

        // Deeper than the secondary lobe reaches: falls through to the neighbour
        assert_eq!(g.add_splash(200.0, gy + 13.0, &mut rng), Impact::Puddle(1));
        assert_eq!(g.puddles()[0].ripple_count(), 1);
        assert_eq!(g.puddles()[1].ripple_count(), 1);
    }

    #[test]
    fn no_puddles_degrades_to_dry_splashes() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut g = Ground::new(50.0, 400.0, &mut rng);
        assert!(g.puddles().is_empty());
        assert_eq!(g.max_puddle_height(), 0.0);
        assert_eq!(g.add_splash(25.0, g.ground_y() + 3.0, &mut rng), Impact::Dry);
    }

    #[test]
    fn splash_pool_capped_under_sustained_impacts() {
        let (mut g, mut rng) = ground();
        for i in 0..500 {
            let x = (i * 37 % 1200) as f32;
            g.add_splash(x, g.ground_y() + 2.0, &mut rng);
            assert!(g.splash_count() <= MAX_SPLASHES);
        }
    }

    #[test]
    fn resize_regenerates_layout() {
        let (mut g, mut rng) = ground();
        let (cx, _) = g.puddles()[0].center();
        g.add_splash(cx, g.ground_y() + 1.0, &mut rng);

        g.on_canvas_resize(400.0, 300.0, &mut rng);
        assert_eq!(g.ground_y(), 300.0 * GROUND_LEVEL);
        assert_eq!(g.ripple_count(), 0);
        for p in g.puddles() {
            assert!(p.primary().left >= 0.0 && p.primary().right() <= 400.0 + 1e-3);
        }
    }

    #[test]
    fn render_order_is_ground_puddles_splashes() {
        let (mut g, mut rng) = ground();
        let (cx, _) = g.puddles()[0].center();
        g.add_splash(cx, g.ground_y() + 1.0, &mut rng);

        let mut surface = RecordingSurface::new(2000.0, 600.0);
        g.render(&mut surface);
        let ops = surface.ops();
        let rect = ops.iter().position(|op| matches!(op, Op::FillRect { .. })).unwrap();
        let first_ellipse = ops.iter().position(|op| matches!(op, Op::Ellipse { .. })).unwrap();
        let first_arc = ops.iter().position(|op| matches!(op, Op::Arc { .. })).unwrap();
        assert!(rect < first_ellipse && first_ellipse < first_arc);
    }
}
