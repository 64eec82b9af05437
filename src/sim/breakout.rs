//! Neon breakout
//!
//! One ball, a 10x5 brick wall and three lives. Clearing the wall is a win;
//! losing the last ball is a loss.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::Simulation;
use super::collision::{Rect, bounce_off_rect, circle_rect_overlap};
use super::input::{Control, ControlEvent};
use crate::clamp_coins;
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::renderer::{Canvas, palette};
use crate::settings::BreakoutTuning;

pub const PADDLE_SIZE: Vec2 = Vec2::new(120.0, 14.0);
pub const BALL_RADIUS: f32 = 8.0;

/// Brick wall layout
pub const BRICK_COLS: usize = 10;
pub const BRICK_ROWS: usize = 5;
pub const BRICK_SIZE: Vec2 = Vec2::new(72.0, 18.0);
pub const BRICK_PAD: f32 = 10.0;
pub const BRICK_TOP: f32 = 70.0;
pub const BRICK_LEFT: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brick {
    pub rect: Rect,
    pub alive: bool,
}

/// Breakout state
#[derive(Debug, Clone)]
pub struct Breakout {
    pub tuning: BreakoutTuning,
    pub paddle: Rect,
    /// Keyboard paddle velocity (px/s)
    pub paddle_vx: f32,
    /// Pointer x in field coordinates while dragging
    pub pointer_x: Option<f32>,
    pub ball_pos: Vec2,
    pub ball_vel: Vec2,
    pub bricks: Vec<Brick>,
    pub score: u64,
    pub lives: u32,
    won: bool,
    lost: bool,
    rng: Pcg32,
}

impl Breakout {
    pub fn new(tuning: BreakoutTuning) -> Self {
        let mut game = Self {
            lives: tuning.lives,
            tuning,
            paddle: Rect::new(0.0, 0.0, PADDLE_SIZE.x, PADDLE_SIZE.y),
            paddle_vx: 0.0,
            pointer_x: None,
            ball_pos: Vec2::ZERO,
            ball_vel: Vec2::ZERO,
            bricks: Vec::with_capacity(BRICK_COLS * BRICK_ROWS),
            score: 0,
            won: false,
            lost: false,
            rng: Pcg32::seed_from_u64(0),
        };
        game.reset(0);
        game
    }

    pub fn bricks_left(&self) -> usize {
        self.bricks.iter().filter(|b| b.alive).count()
    }

    pub fn won(&self) -> bool {
        self.won
    }

    fn serve(&mut self, dir_x: f32) {
        let speed = self.tuning.ball_speed;
        self.ball_pos = Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - 60.0);
        self.ball_vel = Vec2::new(speed * dir_x, -speed);
    }

    fn build_wall(&mut self) {
        self.bricks.clear();
        for row in 0..BRICK_ROWS {
            for col in 0..BRICK_COLS {
                let x = BRICK_LEFT + col as f32 * (BRICK_SIZE.x + BRICK_PAD);
                let y = BRICK_TOP + row as f32 * (BRICK_SIZE.y + BRICK_PAD);
                self.bricks.push(Brick {
                    rect: Rect::new(x, y, BRICK_SIZE.x, BRICK_SIZE.y),
                    alive: true,
                });
            }
        }
    }

    fn apply(&mut self, event: &ControlEvent) {
        let speed = self.tuning.paddle_speed;
        match *event {
            ControlEvent::Press(Control::Left) => self.paddle_vx = -speed,
            ControlEvent::Press(Control::Right) => self.paddle_vx = speed,
            ControlEvent::Release(Control::Left | Control::Right) => self.paddle_vx = 0.0,
            ControlEvent::PointerDown(pos) | ControlEvent::PointerMove(pos) => {
                self.pointer_x = Some(pos.x)
            }
            ControlEvent::PointerUp => self.pointer_x = None,
            _ => {}
        }
    }

    fn step(&mut self, dt: f32) {
        let max_x = FIELD_WIDTH - self.paddle.size.x;
        self.paddle.pos.x = match self.pointer_x {
            Some(px) => (px - self.paddle.size.x / 2.0).clamp(0.0, max_x),
            None => (self.paddle.pos.x + self.paddle_vx * dt).clamp(0.0, max_x),
        };

        self.ball_pos += self.ball_vel * dt;

        let r = BALL_RADIUS;
        if self.ball_pos.x - r < 0.0 {
            self.ball_pos.x = r;
            self.ball_vel.x = -self.ball_vel.x;
        }
        if self.ball_pos.x + r > FIELD_WIDTH {
            self.ball_pos.x = FIELD_WIDTH - r;
            self.ball_vel.x = -self.ball_vel.x;
        }
        if self.ball_pos.y - r < 0.0 {
            self.ball_pos.y = r;
            self.ball_vel.y = -self.ball_vel.y;
        }

        if self.ball_pos.y - r > FIELD_HEIGHT {
            self.lives = self.lives.saturating_sub(1);
            log::debug!("Ball lost, {} lives left", self.lives);
            if self.lives == 0 {
                self.lost = true;
                return;
            }
            let dir = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
            self.serve(dir);
        }

        if circle_rect_overlap(self.ball_pos, r, &self.paddle) {
            let half = self.paddle.size.x / 2.0;
            let hit = (self.ball_pos.x - self.paddle.center().x) / half;
            self.ball_vel.x = self.tuning.paddle_english * hit;
            self.ball_vel.y = -self.ball_vel.y.abs();
            self.ball_pos.y = self.paddle.pos.y - r - 0.5;
        }

        // At most one brick per frame
        let mut alive = 0;
        for brick in self.bricks.iter_mut().filter(|b| b.alive) {
            alive += 1;
            if circle_rect_overlap(self.ball_pos, r, &brick.rect) {
                brick.alive = false;
                self.score += self.tuning.points_per_brick;
                self.ball_vel = bounce_off_rect(self.ball_pos, self.ball_vel, &brick.rect)
                    * self.tuning.brick_speedup;
                break;
            }
        }
        if alive == 0 {
            self.won = true;
        }
    }
}

impl Simulation for Breakout {
    fn game_key(&self) -> &'static str {
        "breakout"
    }

    fn reset(&mut self, seed: u64) {
        self.rng = Pcg32::seed_from_u64(seed);
        self.score = 0;
        self.lives = self.tuning.lives;
        self.paddle = Rect::new(
            FIELD_WIDTH / 2.0 - PADDLE_SIZE.x / 2.0,
            FIELD_HEIGHT - 30.0,
            PADDLE_SIZE.x,
            PADDLE_SIZE.y,
        );
        self.paddle_vx = 0.0;
        self.pointer_x = None;
        self.won = false;
        self.lost = false;
        self.build_wall();
        self.serve(1.0);
    }

    fn update(&mut self, dt: f32, inputs: &[ControlEvent]) {
        if self.is_terminal() {
            return;
        }
        for event in inputs {
            self.apply(event);
        }
        self.step(dt);
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.clear(palette::BACKGROUND);
        canvas.grid(60.0, palette::GRID.with_alpha(0.18));

        for brick in self.bricks.iter().filter(|b| b.alive) {
            canvas.fill_rect(brick.rect.pos, brick.rect.size, palette::ACCENT.with_alpha(0.9));
        }
        canvas.fill_rect(self.paddle.pos, self.paddle.size, palette::TEXT);
        canvas.fill_circle(self.ball_pos, BALL_RADIUS, palette::MUTED);

        canvas.text(Vec2::new(12.0, 22.0), &format!("Score: {}", self.score), palette::TEXT);
        canvas.text(Vec2::new(12.0, 44.0), &format!("Lives: {}", self.lives), palette::MUTED);
        canvas.text(
            Vec2::new(12.0, 66.0),
            &format!("Bricks: {}", self.bricks_left()),
            palette::MUTED,
        );
    }

    fn is_terminal(&self) -> bool {
        self.won || self.lost
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn coins(&self) -> u32 {
        clamp_coins(self.score / 10)
    }

    fn end_reason(&self) -> &'static str {
        if self.won { "breakout_win" } else { "breakout_game_over" }
    }

    fn end_title(&self) -> &'static str {
        if self.won { "You Win!" } else { "Game Over" }
    }

    fn hint(&self) -> &'static str {
        "Controls: Mouse / Touch drag / A-D or ← →"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Breakout {
        let mut g = Breakout::new(BreakoutTuning::default());
        g.reset(5);
        g
    }

    #[test]
    fn test_wall_layout() {
        let g = game();
        assert_eq!(g.bricks.len(), 50);
        assert_eq!(g.bricks[0].rect.pos, Vec2::new(60.0, 70.0));
        assert_eq!(g.bricks[11].rect.pos, Vec2::new(142.0, 98.0));
        assert_eq!(g.ball_vel, Vec2::new(280.0, -280.0));
    }

    #[test]
    fn test_brick_hit_scores_and_speeds_up() {
        let mut g = game();
        let brick = g.bricks[0].rect;
        // Just below the brick, moving up
        g.ball_pos = Vec2::new(brick.center().x, brick.pos.y + brick.size.y + BALL_RADIUS + 1.0);
        g.ball_vel = Vec2::new(0.0, -200.0);
        g.update(0.01, &[]);
        assert!(!g.bricks[0].alive);
        assert_eq!(g.score, 10);
        assert!((g.ball_vel.y - 202.0).abs() < 1e-3);
        assert_eq!(g.bricks_left(), 49);
    }

    #[test]
    fn test_one_brick_per_frame() {
        let mut g = game();
        // Ball straddling the gap between two bricks
        let a = g.bricks[0].rect;
        g.ball_pos = Vec2::new(a.pos.x + a.size.x + BRICK_PAD / 2.0, a.center().y);
        g.ball_vel = Vec2::ZERO;
        g.update(0.0, &[]);
        assert_eq!(g.bricks_left(), 49);
    }

    #[test]
    fn test_paddle_english() {
        let mut g = game();
        let paddle = g.paddle;
        g.ball_pos = Vec2::new(paddle.pos.x + paddle.size.x, paddle.pos.y - 2.0);
        g.ball_vel = Vec2::new(0.0, 100.0);
        g.update(0.0, &[]);
        assert!((g.ball_vel.x - 360.0).abs() < 1e-3);
        assert!(g.ball_vel.y < 0.0);
    }

    #[test]
    fn test_losing_all_lives() {
        let mut g = game();
        for expected in [2, 1] {
            g.ball_pos = Vec2::new(100.0, FIELD_HEIGHT + 20.0);
            g.ball_vel = Vec2::new(0.0, 10.0);
            g.update(0.0, &[]);
            assert_eq!(g.lives, expected);
            assert!(!g.is_terminal());
            assert_eq!(g.ball_pos, Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - 60.0));
            assert_eq!(g.ball_vel.x.abs(), 280.0);
        }
        g.ball_pos = Vec2::new(100.0, FIELD_HEIGHT + 20.0);
        g.update(0.0, &[]);
        assert!(g.is_terminal());
        assert_eq!(g.end_reason(), "breakout_game_over");
    }

    #[test]
    fn test_empty_wall_wins() {
        let mut g = game();
        for brick in &mut g.bricks {
            brick.alive = false;
        }
        g.score = 500;
        g.update(0.016, &[]);
        assert!(g.won());
        assert_eq!(g.end_reason(), "breakout_win");
        assert_eq!(g.coins(), 50);
    }

    #[test]
    fn test_pointer_drives_paddle() {
        let mut g = game();
        g.update(0.0, &[ControlEvent::PointerDown(Vec2::new(10.0, 400.0))]);
        assert_eq!(g.paddle.pos.x, 0.0);
        g.update(0.0, &[ControlEvent::PointerMove(Vec2::new(500.0, 400.0))]);
        assert_eq!(g.paddle.pos.x, 440.0);
        g.update(0.0, &[ControlEvent::PointerUp, ControlEvent::Press(Control::Right)]);
        g.update(0.5, &[]);
        assert_eq!(g.paddle.pos.x, 700.0);
    }

    proptest::proptest! {
        #[test]
        fn prop_coins_clamped_and_monotonic(score in 0u64..1_000_000, extra in 0u64..10_000) {
            let mut g = game();
            g.score = score;
            let c = g.coins();
            proptest::prop_assert!(c <= crate::consts::MAX_COINS);
            g.score = score + extra;
            proptest::prop_assert!(g.coins() >= c);
        }
    }
}
