//! Pong against a lagging AI paddle, first to seven

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::Simulation;
use super::collision::{Rect, circle_rect_overlap};
use super::input::{Control, ControlEvent};
use crate::clamp_coins;
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::renderer::{Canvas, palette};
use crate::settings::PongTuning;

pub const PADDLE_SIZE: Vec2 = Vec2::new(14.0, 90.0);
/// Gap between each paddle and its side wall
pub const PADDLE_INSET: f32 = 26.0;
pub const BALL_RADIUS: f32 = 9.0;
/// Serve vertical speed is drawn from +/- this
pub const SERVE_VY: f32 = 110.0;
/// Horizontal and vertical speed-up per paddle return
pub const RETURN_SPEEDUP: Vec2 = Vec2::new(1.03, 1.02);
pub const WIN_BONUS: u64 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Ai,
}

/// Pong state
#[derive(Debug, Clone)]
pub struct Pong {
    pub tuning: PongTuning,
    pub player: Rect,
    pub ai: Rect,
    pub player_vy: f32,
    pub pointer_y: Option<f32>,
    pub ball_pos: Vec2,
    pub ball_vel: Vec2,
    pub score_you: u32,
    pub score_ai: u32,
    rng: Pcg32,
}

impl Pong {
    pub fn new(tuning: PongTuning) -> Self {
        let mid = FIELD_HEIGHT / 2.0 - PADDLE_SIZE.y / 2.0;
        let mut game = Self {
            tuning,
            player: Rect::new(PADDLE_INSET, mid, PADDLE_SIZE.x, PADDLE_SIZE.y),
            ai: Rect::new(
                FIELD_WIDTH - PADDLE_INSET - PADDLE_SIZE.x,
                mid,
                PADDLE_SIZE.x,
                PADDLE_SIZE.y,
            ),
            player_vy: 0.0,
            pointer_y: None,
            ball_pos: Vec2::ZERO,
            ball_vel: Vec2::ZERO,
            score_you: 0,
            score_ai: 0,
            rng: Pcg32::seed_from_u64(0),
        };
        game.reset(0);
        game
    }

    /// Who reached the goal, if anyone
    pub fn winner(&self) -> Option<Side> {
        if self.score_you >= self.tuning.goal {
            Some(Side::Player)
        } else if self.score_ai >= self.tuning.goal {
            Some(Side::Ai)
        } else {
            None
        }
    }

    /// Put the ball back in the middle heading toward `toward`
    fn serve(&mut self, toward: Side) {
        let dir = match toward {
            Side::Ai => 1.0,
            Side::Player => -1.0,
        };
        self.ball_pos = Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0);
        self.ball_vel = Vec2::new(
            self.tuning.serve_speed * dir,
            self.rng.random_range(-SERVE_VY..SERVE_VY),
        );
    }

    fn reflect(&mut self, side: Side) {
        let paddle = match side {
            Side::Player => self.player,
            Side::Ai => self.ai,
        };
        let half = paddle.size.y / 2.0;
        let hit = (self.ball_pos.y - paddle.center().y) / half;
        let max_vy = self.tuning.max_vy;

        self.ball_vel.x = -self.ball_vel.x;
        self.ball_vel.y = (self.ball_vel.y + hit * self.tuning.spin).clamp(-max_vy, max_vy);
        self.ball_vel *= RETURN_SPEEDUP;

        // Push clear of the paddle so the next frame does not re-collide
        self.ball_pos.x = match side {
            Side::Player => paddle.pos.x + paddle.size.x + BALL_RADIUS + 0.5,
            Side::Ai => paddle.pos.x - BALL_RADIUS - 0.5,
        };
    }

    fn apply(&mut self, event: &ControlEvent) {
        let speed = self.tuning.player_speed;
        match *event {
            ControlEvent::Press(Control::Up) => self.player_vy = -speed,
            ControlEvent::Press(Control::Down) => self.player_vy = speed,
            ControlEvent::Release(Control::Up | Control::Down) => self.player_vy = 0.0,
            ControlEvent::PointerDown(pos) | ControlEvent::PointerMove(pos) => {
                self.pointer_y = Some(pos.y)
            }
            ControlEvent::PointerUp => self.pointer_y = None,
            _ => {}
        }
    }

    fn step(&mut self, dt: f32) {
        let max_y = FIELD_HEIGHT - PADDLE_SIZE.y;
        self.player.pos.y = match self.pointer_y {
            Some(py) => (py - PADDLE_SIZE.y / 2.0).clamp(0.0, max_y),
            None => (self.player.pos.y + self.player_vy * dt).clamp(0.0, max_y),
        };

        let target = self.ball_pos.y - PADDLE_SIZE.y / 2.0;
        let ai_step = self.tuning.ai_speed * dt;
        if self.ai.pos.y < target {
            self.ai.pos.y += ai_step;
        } else if self.ai.pos.y > target {
            self.ai.pos.y -= ai_step;
        }
        self.ai.pos.y = self.ai.pos.y.clamp(0.0, max_y);

        self.ball_pos += self.ball_vel * dt;

        let r = BALL_RADIUS;
        if self.ball_pos.y - r < 0.0 {
            self.ball_pos.y = r;
            self.ball_vel.y = -self.ball_vel.y;
        }
        if self.ball_pos.y + r > FIELD_HEIGHT {
            self.ball_pos.y = FIELD_HEIGHT - r;
            self.ball_vel.y = -self.ball_vel.y;
        }

        if circle_rect_overlap(self.ball_pos, r, &self.player) {
            self.reflect(Side::Player);
        } else if circle_rect_overlap(self.ball_pos, r, &self.ai) {
            self.reflect(Side::Ai);
        }

        if self.ball_pos.x + r < 0.0 {
            self.score_ai += 1;
            if self.winner().is_none() {
                self.serve(Side::Player);
            }
        } else if self.ball_pos.x - r > FIELD_WIDTH {
            self.score_you += 1;
            if self.winner().is_none() {
                self.serve(Side::Ai);
            }
        }
    }
}

impl Simulation for Pong {
    fn game_key(&self) -> &'static str {
        "pong"
    }

    fn reset(&mut self, seed: u64) {
        self.rng = Pcg32::seed_from_u64(seed);
        let mid = FIELD_HEIGHT / 2.0 - PADDLE_SIZE.y / 2.0;
        self.player.pos.y = mid;
        self.ai.pos.y = mid;
        self.player_vy = 0.0;
        self.pointer_y = None;
        self.score_you = 0;
        self.score_ai = 0;
        self.serve(Side::Ai);
    }

    fn update(&mut self, dt: f32, inputs: &[ControlEvent]) {
        if self.winner().is_some() {
            return;
        }
        for event in inputs {
            self.apply(event);
        }
        self.step(dt);
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.clear(palette::BACKGROUND);

        // Dashed center line
        let x = FIELD_WIDTH / 2.0;
        let mut y = 0.0;
        while y < FIELD_HEIGHT {
            canvas.line(Vec2::new(x, y), Vec2::new(x, y + 10.0), palette::GRID.with_alpha(0.35));
            y += 22.0;
        }

        canvas.fill_rect(self.player.pos, self.player.size, palette::TEXT);
        canvas.fill_rect(self.ai.pos, self.ai.size, palette::ACCENT);
        canvas.fill_circle(self.ball_pos, BALL_RADIUS, palette::MUTED);

        canvas.text(
            Vec2::new(FIELD_WIDTH / 2.0 - 60.0, 40.0),
            &format!("{}", self.score_you),
            palette::TEXT,
        );
        canvas.text(
            Vec2::new(FIELD_WIDTH / 2.0 + 40.0, 40.0),
            &format!("{}", self.score_ai),
            palette::TEXT,
        );
    }

    fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }

    fn score(&self) -> u64 {
        self.score_you as u64
    }

    fn coins(&self) -> u32 {
        let bonus = if self.winner() == Some(Side::Player) { WIN_BONUS } else { 0 };
        clamp_coins(self.score_you as u64 * 10 + bonus)
    }

    fn end_reason(&self) -> &'static str {
        match self.winner() {
            Some(Side::Player) => "pong_win",
            _ => "pong_game_over",
        }
    }

    fn end_title(&self) -> &'static str {
        match self.winner() {
            Some(Side::Player) => "You Win!",
            _ => "Game Over",
        }
    }

    fn hint(&self) -> &'static str {
        "Controls: W/S or ↑ ↓, or drag on the canvas"
    }

    fn score_label(&self) -> String {
        format!("{}-{}", self.score_you, self.score_ai)
    }
}
