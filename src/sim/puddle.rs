// puddle.rs - Puddles and their ripples
//
// A puddle is either one elliptical body of water or a compound of two
// overlapping lobes sharing a single ripple pool. Ripples are anchored to the
// puddle centre, never to global coordinates.

use std::collections::VecDeque;

use rand::Rng;

use crate::render::{Paint, Rgba, Sprite, Surface};

pub const MAX_RIPPLES: usize = 6;
/// Extra depth below a lobe that still counts as hitting it.
pub const HIT_MARGIN: f32 = 5.0;

const RIPPLE_START_RADIUS: f32 = 2.0;
const RIPPLE_GROWTH: f32 = 20.0; // px/s
const RIPPLE_FADE: f32 = 0.8; // s
const RIPPLE_START_OPACITY: f32 = 0.6;

const WATER_TOP: Rgba = Rgba::new(40, 55, 80, 0.85);
const WATER_BOTTOM: Rgba = Rgba::new(20, 28, 45, 0.9);
const RIPPLE_COLOR: Rgba = Rgba::opaque(170, 190, 220);

/// Horizontal extent plus depth of one elliptical lobe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub left: f32,
    pub width: f32,
    pub depth: f32,
}

impl Span {
    pub fn center_x(&self) -> f32 {
        self.left + self.width * 0.5
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    fn contains(&self, x: f32, y: f32, ground_y: f32) -> bool {
        x >= self.left && x <= self.right() && y > ground_y && y <= ground_y + self.depth + HIT_MARGIN
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PuddleShape {
    Simple(Span),
    Compound {
        primary: Span,
        secondary: Span,
        /// Vertical offset of the secondary lobe's centre from the primary's.
        offset: f32,
    },
}

#[derive(Clone, Debug)]
pub struct Ripple {
    /// Origin relative to the owning puddle's centre.
    pub offset: (f32, f32),
    pub radius: f32,
    pub opacity: f32,
    max_radius: f32,
    elapsed: f32,
}

impl Ripple {
    fn new(offset: (f32, f32), max_radius: f32) -> Self {
        Self {
            offset,
            radius: RIPPLE_START_RADIUS,
            opacity: RIPPLE_START_OPACITY,
            max_radius,
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        self.radius = RIPPLE_START_RADIUS + RIPPLE_GROWTH * self.elapsed;
        self.opacity = (RIPPLE_START_OPACITY * (1.0 - self.elapsed / RIPPLE_FADE)).max(0.0);
    }

    pub fn is_done(&self) -> bool {
        self.radius >= self.max_radius || self.opacity <= 0.0
    }

    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }
}

#[derive(Clone, Debug)]
pub struct Puddle {
    shape: PuddleShape,
    ground_y: f32,
    ripples: VecDeque<Ripple>,
}

impl Puddle {
    pub fn new(shape: PuddleShape, ground_y: f32) -> Self {
        Self { shape, ground_y, ripples: VecDeque::with_capacity(MAX_RIPPLES) }
    }

    /// Random puddle fully inside `[0, canvas_width]`, or `None` if the
    /// canvas is too narrow to hold one.
    pub fn generate(canvas_width: f32, ground_y: f32, rng: &mut impl Rng) -> Option<Self> {
        const MIN_WIDTH: f32 = 60.0;
        const MAX_WIDTH: f32 = 160.0;
        const COMPOUND_CHANCE: f32 = 0.4;

        if canvas_width < MIN_WIDTH {
            return None;
        }

        let width = rng.gen_range(MIN_WIDTH..MAX_WIDTH).min(canvas_width);
        let primary = Span {
            left: rng.r#gen::<f32>() * (canvas_width - width),
            width,
            depth: rng.gen_range(8.0..16.0),
        };

        if rng.r#gen::<f32>() >= COMPOUND_CHANCE {
            return Some(Self::new(PuddleShape::Simple(primary), ground_y));
        }

        let sw = primary.width * rng.gen_range(0.4..0.7);
        let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let cx = primary.center_x() + side * primary.width * rng.gen_range(0.3..0.5);
        let secondary = Span {
            left: (cx - sw * 0.5).clamp(0.0, canvas_width - sw),
            width: sw,
            depth: primary.depth * rng.gen_range(0.6..0.9),
        };
        let offset = primary.depth * rng.gen_range(-0.3..0.3);

        Some(Self::new(PuddleShape::Compound { primary, secondary, offset }, ground_y))
    }

    pub fn shape(&self) -> &PuddleShape {
        &self.shape
    }

    pub fn primary(&self) -> &Span {
        match &self.shape {
            PuddleShape::Simple(span) => span,
            PuddleShape::Compound { primary, .. } => primary,
        }
    }

    /// Centre of the primary lobe.
    pub fn center(&self) -> (f32, f32) {
        let p = self.primary();
        (p.center_x(), self.ground_y + p.depth * 0.5)
    }

    /// Deepest lobe depth.
    pub fn depth(&self) -> f32 {
        match &self.shape {
            PuddleShape::Simple(span) => span.depth,
            PuddleShape::Compound { primary, secondary, .. } => primary.depth.max(secondary.depth),
        }
    }

    pub fn ripples(&self) -> impl Iterator<Item = &Ripple> {
        self.ripples.iter()
    }

    pub fn ripple_count(&self) -> usize {
        self.ripples.len()
    }

    /// Whether an impact at (x, y) lands in this puddle. Each lobe is tested
    /// against its own span and depth.
    pub fn hit(&self, x: f32, y: f32) -> bool {
        match &self.shape {
            PuddleShape::Simple(span) => span.contains(x, y, self.ground_y),
            PuddleShape::Compound { primary, secondary, .. } => {
                primary.contains(x, y, self.ground_y) || secondary.contains(x, y, self.ground_y)
            }
        }
    }

    /// Start a ripple at an impact point, evicting the oldest past the cap.
    pub fn add_ripple(&mut self, x: f32, y: f32) {
        let (cx, cy) = self.center();
        let p = self.primary();
        let max_radius = (p.width * 0.3).min(p.depth * 1.5);

        if self.ripples.len() >= MAX_RIPPLES {
            self.ripples.pop_front();
        }
        self.ripples.push_back(Ripple::new((x - cx, y - cy), max_radius));
    }

    /// Advance ripples by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        for r in &mut self.ripples {
            r.update(dt);
        }
        self.ripples.retain(|r| !r.is_done());
    }

    fn secondary_center(&self) -> Option<((f32, f32), &Span)> {
        match &self.shape {
            PuddleShape::Simple(_) => None,
            PuddleShape::Compound { primary, secondary, offset } => {
                let cy = self.ground_y + primary.depth * 0.5 + offset;
                Some(((secondary.center_x(), cy), secondary))
            }
        }
    }

    fn draw_lobe(surface: &mut dyn Surface, cx: f32, cy: f32, span: &Span) {
        let (rx, ry) = (span.width * 0.5, span.depth * 0.5);
        let stops = [(0.0, WATER_TOP), (1.0, WATER_BOTTOM)];

        surface.set_fill(Paint::Linear { from: (cx, cy - ry), to: (cx, cy + ry), stops: &stops });
        surface.begin_path();
        surface.ellipse(cx, cy, rx, ry);
        surface.fill();

        // Rim highlight
        surface.set_stroke(Paint::Solid(RIPPLE_COLOR.with_alpha(0.15)), 1.0);
        surface.begin_path();
        surface.ellipse(cx, cy, rx, ry);
        surface.stroke();
    }

    fn draw_ripple(surface: &mut dyn Surface, x: f32, y: f32, radius: f32, aspect: f32, opacity: f32) {
        surface.set_stroke(Paint::Solid(RIPPLE_COLOR.with_alpha(opacity)), 1.0);
        surface.begin_path();
        surface.ellipse(x, y, radius, radius * aspect);
        surface.stroke();
    }
}

impl Sprite for Puddle {
    fn draw(&self, surface: &mut dyn Surface) {
        let (cx, cy) = self.center();
        let primary = *self.primary();
        let secondary = self.secondary_center().map(|(c, s)| (c, *s));

        if let Some(((sx, sy), span)) = secondary {
            Self::draw_lobe(surface, sx, sy, &span);
        }
        Self::draw_lobe(surface, cx, cy, &primary);

        // Ripples are squashed to the puddle's aspect so they sit in the water
        let aspect = primary.depth / primary.width;
        for r in &self.ripples {
            let (ox, oy) = (cx + r.offset.0, cy + r.offset.1);
            Self::draw_ripple(surface, ox, oy, r.radius, aspect, r.opacity);

            if let Some(((sx, sy), span)) = secondary {
                let to_secondary = (ox - sx).hypot(oy - sy);
                let to_primary = (ox - cx).hypot(oy - cy);
                if to_secondary < to_primary {
                    let scale = span.width / primary.width;
                    Self::draw_ripple(
                        surface,
                        sx + r.offset.0 * scale,
                        sy + r.offset.1 * scale,
                        r.radius * scale,
                        span.depth / span.width,
                        r.opacity,
                    );
                }
            }
        }
    }
}
