//! Canvas-2D render sink
//!
//! Draws a read-only snapshot of the simulation once per frame. Nothing in
//! here may mutate game state.

use std::f64::consts::PI;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::sim::{Evolution, GameState, PowerupKind};

const TAU: f64 = 2.0 * PI;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    /// Draw the whole frame, back to front
    pub fn render(&self, state: &GameState) {
        let w = state.width as f64;
        let h = state.height as f64;
        self.ctx.clear_rect(0.0, 0.0, w, h);

        self.draw_background(w, h);
        self.draw_obstacles(state);
        self.draw_collectibles(state);
        self.draw_powerups(state);
        self.draw_tail(state);
        self.draw_dragon(state);
        self.draw_fire_breaths(state);
        if state.abilities.shield.active {
            self.draw_shield(state);
        }
    }

    fn draw_background(&self, w: f64, h: f64) {
        let gradient = self.ctx.create_linear_gradient(0.0, 0.0, 0.0, h);
        let _ = gradient.add_color_stop(0.0, "#87CEEB");
        let _ = gradient.add_color_stop(0.5, "#E0F6FF");
        let _ = gradient.add_color_stop(1.0, "#FFE5B4");
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill_rect(0.0, 0.0, w, h);
    }

    fn draw_obstacles(&self, state: &GameState) {
        let h = state.height as f64;
        for obstacle in &state.obstacles {
            let x = obstacle.x as f64;
            let gap_y = obstacle.gap_y as f64;
            let gap_bottom = (obstacle.gap_y + obstacle.gap_size) as f64;
            let w = crate::consts::OBSTACLE_WIDTH as f64;

            self.ctx.set_fill_style_str("#696969");
            self.ctx.fill_rect(x, 0.0, w, gap_y);
            self.ctx.fill_rect(x, gap_bottom, w, h - gap_bottom);

            self.ctx.set_stroke_style_str("#404040");
            self.ctx.set_line_width(3.0);
            self.ctx.stroke_rect(x, 0.0, w, gap_y);
            self.ctx.stroke_rect(x, gap_bottom, w, h - gap_bottom);
        }
    }

    fn draw_collectibles(&self, state: &GameState) {
        for collectible in &state.collectibles {
            self.ctx.save();
            let _ = self
                .ctx
                .translate(collectible.pos.x as f64, collectible.pos.y as f64);
            let _ = self.ctx.rotate(collectible.rotation as f64 * PI / 180.0);

            let half = collectible.size as f64 / 2.0;
            let third = collectible.size as f64 / 3.0;

            self.ctx.set_fill_style_str("#FF1493");
            self.ctx.begin_path();
            self.ctx.move_to(0.0, -half);
            self.ctx.line_to(third, 0.0);
            self.ctx.line_to(0.0, half);
            self.ctx.line_to(-third, 0.0);
            self.ctx.close_path();
            self.ctx.fill();

            self.ctx.set_shadow_blur(15.0);
            self.ctx.set_shadow_color("#FFD700");
            self.ctx.set_stroke_style_str("#FFD700");
            self.ctx.set_line_width(3.0);
            self.ctx.stroke();

            self.ctx.restore();
        }
    }

    fn draw_powerups(&self, state: &GameState) {
        for powerup in &state.powerups {
            self.ctx.save();
            let _ = self
                .ctx
                .translate(powerup.pos.x as f64, powerup.pos.y as f64);

            let pulse_size =
                crate::consts::POWERUP_SIZE as f64 + (powerup.pulse as f64).sin() * 5.0;
            let radius = pulse_size / 2.0;

            let fill = match powerup.kind {
                PowerupKind::Shield => "#00CED1",
                PowerupKind::Slowmo => "#9370DB",
            };
            self.ctx.set_fill_style_str(fill);
            self.ctx.begin_path();
            let _ = self.ctx.arc(0.0, 0.0, radius, 0.0, TAU);
            self.ctx.fill();

            self.ctx.set_stroke_style_str("#FFD700");
            self.ctx.set_line_width(4.0);
            self.ctx.stroke();

            if powerup.kind == PowerupKind::Slowmo {
                // Clock hand
                self.ctx.set_stroke_style_str("white");
                self.ctx.set_line_width(2.0);
                self.ctx.begin_path();
                self.ctx.move_to(0.0, 0.0);
                self.ctx.line_to(0.0, -pulse_size / 3.0);
                self.ctx.stroke();
            }

            self.ctx.restore();
        }
    }

    fn draw_tail(&self, state: &GameState) {
        let color = match state.dragon.evolution {
            Evolution::Baby => "#FF6B6B",
            Evolution::Fire => "#FF4500",
            Evolution::Phoenix => "#FF1493",
            Evolution::Mythical => "#9370DB",
        };

        for (i, segment) in state.tail.iter().enumerate().rev() {
            let alpha = 1.0 - (i as f64 / state.tail.len().max(1) as f64) * 0.3;
            self.ctx.set_fill_style_str(color);
            self.ctx.set_global_alpha(alpha);

            self.ctx.begin_path();
            let _ = self.ctx.arc(
                segment.pos.x as f64,
                segment.pos.y as f64,
                segment.size as f64 / 2.0,
                0.0,
                TAU,
            );
            self.ctx.fill();

            self.ctx.set_stroke_style_str("#FFD700");
            self.ctx.set_line_width(2.0);
            self.ctx.stroke();
        }

        self.ctx.set_global_alpha(1.0);
    }

    fn draw_dragon(&self, state: &GameState) {
        let dragon = &state.dragon;
        self.ctx.save();
        let _ = self.ctx.translate(dragon.pos.x as f64, dragon.pos.y as f64);
        let _ = self.ctx.rotate(dragon.rotation as f64 * PI / 180.0);

        let color = match dragon.evolution {
            Evolution::Baby => "#FF6B6B",
            Evolution::Fire => "#FF4500",
            Evolution::Phoenix => "#FF1493",
            Evolution::Mythical => "#9370DB",
        };
        if dragon.evolution == Evolution::Mythical {
            self.ctx.set_shadow_blur(20.0);
            self.ctx.set_shadow_color("#FFD700");
        }

        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        let _ = self.ctx.ellipse(
            0.0,
            0.0,
            dragon.width as f64 / 2.0,
            dragon.height as f64 / 2.0,
            0.0,
            0.0,
            TAU,
        );
        self.ctx.fill();

        self.ctx.set_shadow_blur(0.0);
        self.ctx.restore();
    }

    fn draw_fire_breaths(&self, state: &GameState) {
        for fire in &state.fire_breaths {
            self.ctx.set_shadow_blur(20.0);
            self.ctx.set_shadow_color("#FF4500");

            self.ctx.set_fill_style_str("#FFA500");
            self.ctx.begin_path();
            let _ = self.ctx.arc(
                fire.pos.x as f64,
                fire.pos.y as f64,
                fire.size as f64,
                0.0,
                TAU,
            );
            self.ctx.fill();

            // Inner flame
            self.ctx.set_fill_style_str("#FF4500");
            self.ctx.begin_path();
            let _ = self.ctx.arc(
                fire.pos.x as f64,
                fire.pos.y as f64,
                fire.size as f64 / 2.0,
                0.0,
                TAU,
            );
            self.ctx.fill();
        }

        self.ctx.set_shadow_blur(0.0);
    }

    fn draw_shield(&self, state: &GameState) {
        self.ctx.save();
        self.ctx.set_stroke_style_str("#00CED1");
        self.ctx.set_line_width(4.0);
        self.ctx.set_shadow_blur(25.0);
        self.ctx.set_shadow_color("#00CED1");

        self.ctx.begin_path();
        let _ = self.ctx.arc(
            state.dragon.pos.x as f64,
            state.dragon.pos.y as f64,
            (state.dragon.width + 10.0) as f64,
            0.0,
            TAU,
        );
        self.ctx.stroke();

        self.ctx.restore();
    }
}
