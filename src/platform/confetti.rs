//! Confetti overlay on a full-screen 2D canvas

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::view::ConfettiView;
use crate::{PageError, Result};

pub struct ConfettiCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dpr: f64,
    /// Skip clears while nothing is drawn
    dirty: bool,
}

impl ConfettiCanvas {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(PageError::MissingElement("canvas 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| PageError::Js("not a 2d context".into()))?;
        Ok(Self {
            canvas,
            ctx,
            dpr: 1.0,
            dirty: true,
        })
    }

    /// Match the backing store to the CSS size
    pub fn resize(&mut self, width: f32, height: f32, dpr: f64) {
        self.dpr = dpr;
        self.canvas.set_width((width as f64 * dpr) as u32);
        self.canvas.set_height((height as f64 * dpr) as u32);
        self.dirty = true;
    }

    pub fn draw(&mut self, particles: &[ConfettiView]) {
        if particles.is_empty() && !self.dirty {
            return;
        }
        let ctx = &self.ctx;
        let _ = ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
        ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64 / self.dpr,
            self.canvas.height() as f64 / self.dpr,
        );

        for p in particles {
            let half = p.size as f64 * 0.5;
            ctx.save();
            let _ = ctx.translate(p.x as f64, p.y as f64);
            let _ = ctx.rotate(p.angle as f64);
            ctx.set_global_alpha(p.alpha as f64);
            ctx.set_fill_style_str(p.color);
            ctx.fill_rect(-half, -half * 0.6, p.size as f64, p.size as f64 * 0.6);
            ctx.restore();
        }
        self.dirty = !particles.is_empty();
    }
}
