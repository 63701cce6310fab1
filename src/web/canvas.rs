// canvas.rs - `Surface` over a browser 2D canvas context

use wasm_bindgen::JsCast;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::StormError;
use crate::render::{Paint, Rgba, Stop, Surface};

use super::report;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Look up `<canvas id=...>` and its 2D context.
    pub fn from_id(id: &str) -> Result<Self, StormError> {
        let unavailable = |msg: String| StormError::SurfaceUnavailable(msg);

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| unavailable("no document".into()))?;
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| unavailable(format!("no element #{}", id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| unavailable(format!("#{} is not a canvas", id)))?;
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| unavailable(format!("getContext failed: {:?}", e)))?
            .ok_or_else(|| unavailable("2d context not supported".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| unavailable("unexpected context type".into()))?;

        ctx.set_line_cap("round");
        Ok(Self { canvas, ctx })
    }

    pub fn set_size(&self, w: u32, h: u32) {
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        // Resizing resets context state
        self.ctx.set_line_cap("round");
    }

    fn gradient(&self, from: (f32, f32), to: (f32, f32), stops: &[Stop]) -> CanvasGradient {
        let g = self.ctx.create_linear_gradient(from.0 as f64, from.1 as f64, to.0 as f64, to.1 as f64);
        for (offset, color) in stops {
            if let Err(e) = g.add_color_stop(*offset, &color.css()) {
                report(StormError::Draw(format!("color stop: {:?}", e)));
            }
        }
        g
    }
}


impl Surface for CanvasSurface {
    fn size(&self) -> (f32, f32) {
        (self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn save(&mut self) { self.ctx.save(); }
    fn restore(&mut self) { self.ctx.restore(); }

    fn set_fill(&mut self, paint: Paint<'_>) {
        match paint {
            Paint::Solid(c) => self.ctx.set_fill_style_str(&c.css()),
            Paint::Linear { from, to, stops } => {
                let g = self.gradient(from, to, stops);
                self.ctx.set_fill_style_canvas_gradient(&g);
            }
        }
    }

    fn set_stroke(&mut self, paint: Paint<'_>, width: f32) {
        match paint {
            Paint::Solid(c) => self.ctx.set_stroke_style_str(&c.css()),
            Paint::Linear { from, to, stops } => {
                let g = self.gradient(from, to, stops);
                self.ctx.set_stroke_style_canvas_gradient(&g);
            }
        }
        self.ctx.set_line_width(width as f64);
    }

    fn set_glow(&mut self, blur: f32, color: Rgba) {
        self.ctx.set_shadow_blur(blur as f64);
        self.ctx.set_shadow_color(&color.css());
    }

    fn begin_path(&mut self) { self.ctx.begin_path(); }
    fn move_to(&mut self, x: f32, y: f32) { self.ctx.move_to(x as f64, y as f64); }
    fn line_to(&mut self, x: f32, y: f32) { self.ctx.line_to(x as f64, y as f64); }

    fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        // Negative radii throw IndexSizeError
        let (rx, ry) = (rx.max(0.0) as f64, ry.max(0.0) as f64);
        if let Err(e) = self.ctx.ellipse(cx as f64, cy as f64, rx, ry, 0.0, 0.0, std::f64::consts::TAU) {
            report(StormError::Draw(format!("ellipse: {:?}", e)));
        }
    }

    fn arc(&mut self, cx: f32, cy: f32, r: f32) {
        if let Err(e) = self.ctx.arc(cx as f64, cy as f64, r.max(0.0) as f64, 0.0, std::f64::consts::TAU) {
            report(StormError::Draw(format!("arc: {:?}", e)));
        }
    }

    fn fill(&mut self) { self.ctx.fill(); }
    fn stroke(&mut self) { self.ctx.stroke(); }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }
}
