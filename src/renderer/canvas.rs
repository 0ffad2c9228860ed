//! Canvas 2D surface (browser only)

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Color, Surface, css_color};

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    size: Vec2,
}

impl CanvasSurface {
    /// Wrap a canvas' 2D context. Returns `None` if the context is
    /// unavailable.
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        ctx.set_font("14px sans-serif");
        Some(Self {
            ctx,
            size: Vec2::new(canvas.width() as f32, canvas.height() as f32),
        })
    }

    /// Pick up a new canvas size after the element was resized
    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = Vec2::new(width as f32, height as f32);
    }

    fn arc(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        if let Err(e) = self.ctx.arc(
            f64::from(center.x),
            f64::from(center.y),
            f64::from(radius.max(0.0)),
            0.0,
            TAU,
        ) {
            log::warn!("canvas arc failed: {:?}", e);
        }
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx
            .fill_rect(0.0, 0.0, f64::from(self.size.x), f64::from(self.size.y));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.arc(center, radius);
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        self.arc(center, radius);
        self.ctx.set_stroke_style_str(&css_color(color));
        self.ctx.set_line_width(f64::from(width));
        self.ctx.stroke();
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.ctx.begin_path();
        self.ctx.move_to(f64::from(from.x), f64::from(from.y));
        self.ctx.line_to(f64::from(to.x), f64::from(to.y));
        self.ctx.set_stroke_style_str(&css_color(color));
        self.ctx.set_line_width(f64::from(width));
        self.ctx.stroke();
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx.fill_rect(
            f64::from(origin.x),
            f64::from(origin.y),
            f64::from(size.x),
            f64::from(size.y),
        );
    }

    fn text(&mut self, position: Vec2, text: &str, color: Color) {
        self.ctx.set_fill_style_str(&css_color(color));
        if let Err(e) = self
            .ctx
            .fill_text(text, f64::from(position.x), f64::from(position.y))
        {
            log::warn!("canvas text failed: {:?}", e);
        }
    }
}
