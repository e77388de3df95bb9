//! Canvas2D renderer
//!
//! Draws the asteroid field, the target reticle, and the screen shake from a
//! [`RenderSnapshot`]. Drawing failures degrade to a blank frame; the next
//! tick simply draws again.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::RETICLE_RADIUS;
use crate::sim::{Asteroid, RenderSnapshot};

/// Maximum shake displacement per axis (pixels)
const SHAKE_AMPLITUDE: f64 = 20.0;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    /// Wrap a canvas element. Returns `None` when the 2D context is
    /// unavailable; the caller retries on a later frame.
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        })
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn clear(&self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    /// Draw one frame from a snapshot
    pub fn render(&self, snapshot: &RenderSnapshot) {
        self.clear();

        let shaking = snapshot.shake_frames >= 0;
        if shaking {
            self.ctx.save();
            let dx = js_sys::Math::random() * SHAKE_AMPLITUDE;
            let dy = js_sys::Math::random() * SHAKE_AMPLITUDE;
            let _ = self.ctx.translate(dx, dy);
        }

        for asteroid in &snapshot.asteroids {
            self.draw_asteroid(asteroid);
        }

        if let Some(target) = snapshot.asteroids.first() {
            self.draw_target_reticle(target, snapshot.answer_locked);
        }

        if shaking {
            self.ctx.restore();
        }
    }

    /// Filled circle with a cratered outline standing in for the sprite
    pub fn draw_asteroid(&self, asteroid: &Asteroid) {
        let center = asteroid.center();
        let radius = (asteroid.size / 2.0) as f64;

        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius, 0.0, TAU);
        self.ctx.set_fill_style_str("#6b6b6b");
        self.ctx.fill();
        self.ctx.set_line_width(3.0);
        self.ctx.set_stroke_style_str("#3d3d3d");
        self.ctx.stroke();

        // A couple of craters for texture
        for (fx, fy, fr) in [(-0.3, -0.2, 0.18), (0.25, 0.3, 0.12)] {
            self.ctx.begin_path();
            let _ = self.ctx.arc(
                center.x as f64 + radius * fx,
                center.y as f64 + radius * fy,
                radius * fr,
                0.0,
                TAU,
            );
            self.ctx.set_fill_style_str("#4f4f4f");
            self.ctx.fill();
        }
    }

    /// Aim overlay on the target asteroid; red while the answer lock holds
    pub fn draw_target_reticle(&self, target: &Asteroid, locked: bool) {
        let center = target.center();
        let x = center.x as f64;
        let y = center.y as f64;

        self.ctx.begin_path();
        let _ = self.ctx.arc(x, y, RETICLE_RADIUS, 0.0, TAU);
        if locked {
            self.ctx.set_fill_style_str("rgba(200,0,0,0.25)");
            self.ctx.set_stroke_style_str("red");
        } else {
            self.ctx.set_fill_style_str("rgba(0,100,0,0.25)");
            self.ctx.set_stroke_style_str("green");
        }
        self.ctx.fill();

        // Tick marks at the four compass points
        self.ctx.set_line_width(5.0);
        let outer = RETICLE_RADIUS;
        let inner = RETICLE_RADIUS - 15.0;
        self.ctx.move_to(x - outer, y);
        self.ctx.line_to(x - inner, y);
        self.ctx.move_to(x + outer, y);
        self.ctx.line_to(x + inner, y);
        self.ctx.move_to(x, y - outer);
        self.ctx.line_to(x, y - inner);
        self.ctx.move_to(x, y + outer);
        self.ctx.line_to(x, y + inner);
        self.ctx.stroke();

        // The problem, split over two lines inside the reticle
        let (line1, line2) = target.problem.display_lines();
        self.ctx
            .set_font(&format!("bold {}px 'Courier New'", RETICLE_RADIUS / 2.0));
        self.ctx
            .set_fill_style_str(if locked { "DarkRed" } else { "DarkGreen" });
        let _ = self.ctx.fill_text(&line1, x - 30.0, y);
        let _ = self.ctx.fill_text(&line2, x - 30.0, y + 25.0);
    }
}

/// Paint the static star background once onto its own canvas
pub fn paint_starfield(canvas: &HtmlCanvasElement) {
    let Some(ctx) = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
    else {
        log::warn!("No 2D context for starfield canvas");
        return;
    };
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    ctx.clear_rect(0.0, 0.0, width, height);
    ctx.set_fill_style_str("rgba(255, 255, 255, 0.8)");
    for _ in 0..200 {
        ctx.fill_rect(
            js_sys::Math::random() * width,
            js_sys::Math::random() * height,
            1.0,
            1.0,
        );
    }
}
