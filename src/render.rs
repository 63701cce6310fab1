// render.rs - Drawing seam between the simulation and a 2D surface
//
// The simulation never talks to a canvas directly. Everything it paints goes
// through `Surface`, which mirrors the subset of the 2D canvas API we need:
//   - path building (move/line/ellipse/arc)
//   - solid and linear-gradient paints
//   - glow (shadow blur), save/restore
//
// `RecordingSurface` is a headless implementation used by the native binary
// and by tests.

/// Colour with straight (non-premultiplied) alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    /// CSS `rgba(...)` form.
    pub fn css(&self) -> String {
        format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
    }
}

/// Gradient colour stop: (offset in [0, 1], colour).
pub type Stop = (f32, Rgba);

#[derive(Clone, Copy, Debug)]
pub enum Paint<'a> {
    Solid(Rgba),
    Linear {
        from: (f32, f32),
        to: (f32, f32),
        stops: &'a [Stop],
    },
}

pub trait Surface {
    fn size(&self) -> (f32, f32);

    fn save(&mut self);
    fn restore(&mut self);

    fn set_fill(&mut self, paint: Paint<'_>);
    fn set_stroke(&mut self, paint: Paint<'_>, width: f32);
    /// Shadow-blur glow applied to subsequent fills/strokes. `blur == 0` disables it.
    fn set_glow(&mut self, blur: f32, color: Rgba);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32);
    fn arc(&mut self, cx: f32, cy: f32, r: f32);

    fn fill(&mut self);
    fn stroke(&mut self);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
}

/// Anything that can paint itself onto a `Surface` without mutating.
pub trait Sprite {
    fn draw(&self, surface: &mut dyn Surface);
}

/// Drawing call captured by `RecordingSurface`.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Save,
    Restore,
    Fill(Rgba),
    FillGradient(usize),
    Stroke(Rgba, f32),
    StrokeGradient(usize, f32),
    Glow(f32),
    BeginPath,
    MoveTo(f32, f32),
    LineTo(f32, f32),
    Ellipse { cx: f32, cy: f32, rx: f32, ry: f32 },
    Arc { cx: f32, cy: f32, r: f32 },
    FillPath,
    StrokePath,
    FillRect { x: f32, y: f32, w: f32, h: f32 },
}

/// Headless surface that records every call instead of drawing.
pub struct RecordingSurface {
    w: f32,
    h: f32,
    ops: Vec<Op>,
}

impl RecordingSurface {
    pub fn new(w: f32, h: f32) -> Self {
        Self { w, h, ops: Vec::new() }
    }

    pub fn resize(&mut self, w: f32, h: f32) {
        self.w = w;
        self.h = h;
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl Paint<'_> {
    fn record_fill(&self) -> Op {
        match self {
            Paint::Solid(c) => Op::Fill(*c),
            Paint::Linear { stops, .. } => Op::FillGradient(stops.len()),
        }
    }

    fn record_stroke(&self, width: f32) -> Op {
        match self {
            Paint::Solid(c) => Op::Stroke(*c, width),
            Paint::Linear { stops, .. } => Op::StrokeGradient(stops.len(), width),
        }
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f32, f32) { (self.w, self.h) }

    fn save(&mut self) { self.ops.push(Op::Save); }
    fn restore(&mut self) { self.ops.push(Op::Restore); }

    fn set_fill(&mut self, paint: Paint<'_>) {
        self.ops.push(paint.record_fill());
    }

    fn set_stroke(&mut self, paint: Paint<'_>, width: f32) {
        self.ops.push(paint.record_stroke(width));
    }

    fn set_glow(&mut self, blur: f32, _color: Rgba) { self.ops.push(Op::Glow(blur)); }

    fn begin_path(&mut self) { self.ops.push(Op::BeginPath); }
    fn move_to(&mut self, x: f32, y: f32) { self.ops.push(Op::MoveTo(x, y)); }
    fn line_to(&mut self, x: f32, y: f32) { self.ops.push(Op::LineTo(x, y)); }

    fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        self.ops.push(Op::Ellipse { cx, cy, rx, ry });
    }

    fn arc(&mut self, cx: f32, cy: f32, r: f32) {
        self.ops.push(Op::Arc { cx, cy, r });
    }

    fn fill(&mut self) { self.ops.push(Op::FillPath); }
    fn stroke(&mut self) { self.ops.push(Op::StrokePath); }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ops.push(Op::FillRect { x, y, w, h });
    }
}
