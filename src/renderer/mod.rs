//! Canvas 2D rendering
//!
//! Draws the simulation entities straight from `GameState` and everything
//! else from the `ui` label model. Works in CSS pixels; the backing store is
//! scaled by the device pixel ratio.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::emoji::glyph;
use crate::game::Game;
use crate::sim::{GamePhase, GameState};
use crate::ui::{self, Align, COLOR_DIM, Label, Rect};

/// Emoji font size at full scale (px)
const TARGET_FONT_PX: f32 = 64.0;
/// Projectile dot radius (px)
const PROJECTILE_RADIUS: f64 = 6.0;
const BACKGROUND: &str = "#000000";
const WEAPON_COLOR: &str = "#cccccc";
const PROJECTILE_COLOR: &str = "#ffdd33";
const FONT_FAMILY: &str = "'Segoe UI Emoji', 'Apple Color Emoji', 'Noto Color Emoji', sans-serif";

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dpr: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        Ok(Self {
            canvas,
            ctx,
            dpr: 1.0,
        })
    }

    /// Match the backing store to the CSS size
    pub fn resize(&mut self, css_width: f32, css_height: f32, dpr: f64) {
        self.dpr = dpr.max(1.0);
        self.canvas.set_width((css_width as f64 * self.dpr) as u32);
        self.canvas.set_height((css_height as f64 * self.dpr) as u32);
        log::info!("Canvas resized to {}x{} @{}x", css_width, css_height, self.dpr);
    }

    pub fn render(&self, game: &Game) {
        let ctx = &self.ctx;
        let state = &game.state;
        let (w, h) = (state.screen.width as f64, state.screen.height as f64);

        let _ = ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, w, h);

        if state.phase == GamePhase::Playing {
            self.draw_long_shot_line(state);
            self.draw_targets(state);
            self.draw_projectiles(state);
            self.draw_weapon(state);
        }

        if game.red_pulse > 0.0 {
            ctx.set_global_alpha((game.red_pulse * 0.4) as f64);
            ctx.set_fill_style_str(ui::COLOR_RED);
            ctx.fill_rect(0.0, 0.0, w, h);
            ctx.set_global_alpha(1.0);
        }

        let layout = game.layout();
        self.draw_button(&layout.music_button, COLOR_DIM);
        match state.phase {
            GamePhase::Intro => self.draw_button(&layout.leaderboard_button, ui::COLOR_YELLOW),
            GamePhase::Leaderboard => {
                self.draw_button(&layout.play_again_button, ui::COLOR_GREEN);
                self.draw_button(&layout.main_menu_button, ui::COLOR_BLUE);
            }
            _ => {}
        }

        for label in ui::labels(game) {
            self.draw_label(&label);
        }
    }

    fn draw_long_shot_line(&self, state: &GameState) {
        let ctx = &self.ctx;
        let y = (state.screen.height * state.tuning.long_shot_fraction) as f64;
        ctx.set_global_alpha(0.15);
        ctx.set_stroke_style_str(COLOR_DIM);
        ctx.set_line_width(1.0);
        ctx.begin_path();
        ctx.move_to(0.0, y);
        ctx.line_to(state.screen.width as f64, y);
        ctx.stroke();
        ctx.set_global_alpha(1.0);
    }

    fn draw_targets(&self, state: &GameState) {
        let ctx = &self.ctx;
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        for target in &state.targets {
            let size = TARGET_FONT_PX * target.scale();
            ctx.set_font(&format!("{size}px {FONT_FAMILY}"));
            ctx.set_global_alpha(target.alpha() as f64);
            let _ = ctx.fill_text(glyph(target.emoji), target.pos.x as f64, target.pos.y as f64);
        }
        ctx.set_global_alpha(1.0);
    }

    fn draw_projectiles(&self, state: &GameState) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(PROJECTILE_COLOR);
        for p in &state.projectiles {
            ctx.begin_path();
            let _ = ctx.arc(
                p.pos.x as f64,
                p.pos.y as f64,
                PROJECTILE_RADIUS,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
        }
    }

    fn draw_weapon(&self, state: &GameState) {
        let ctx = &self.ctx;
        let pos = state.weapon_pos();
        let half = state.tuning.weapon_half_width as f64;
        ctx.set_fill_style_str(WEAPON_COLOR);
        // Base and barrel
        ctx.fill_rect(pos.x as f64 - half, pos.y as f64, half * 2.0, 16.0);
        ctx.fill_rect(pos.x as f64 - 5.0, pos.y as f64 - 24.0, 10.0, 24.0);
    }

    fn draw_button(&self, rect: &Rect, color: &str) {
        let ctx = &self.ctx;
        ctx.set_global_alpha(0.2);
        ctx.set_fill_style_str(color);
        ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
        ctx.set_global_alpha(1.0);
        ctx.set_stroke_style_str(color);
        ctx.set_line_width(2.0);
        ctx.stroke_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn draw_label(&self, label: &Label) {
        let ctx = &self.ctx;
        let weight = if label.bold { "bold " } else { "" };
        ctx.set_font(&format!("{weight}{}px {FONT_FAMILY}", label.size));
        ctx.set_text_align(match label.align {
            Align::Left => "left",
            Align::Center => "center",
        });
        ctx.set_text_baseline(match label.align {
            Align::Left => "top",
            Align::Center => "middle",
        });
        ctx.set_fill_style_str(label.color);
        let _ = ctx.fill_text(&label.text, label.x as f64, label.y as f64);
    }
}
