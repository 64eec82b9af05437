//! Inbox invaders
//!
//! A timed catch/avoid run: sweep up falling mail, dodge spam. Consecutive
//! catches build a combo multiplier that decays if nothing is caught for a
//! moment.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::Simulation;
use super::input::{Control, ControlEvent};
use crate::clamp_coins;
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::renderer::{Canvas, palette};
use crate::settings::InboxTuning;

pub const COMBO_STEP: f32 = 0.15;
pub const COMBO_MAX: f32 = 5.0;
/// Cursor stays this far from either side wall
pub const CURSOR_MARGIN: f32 = 30.0;
/// Items spawn at least this far from either side wall
pub const SPAWN_MARGIN: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Mail,
    Spam,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item {
    pub pos: Vec2,
    pub vy: f32,
    pub kind: ItemKind,
}

/// Inbox run state
#[derive(Debug, Clone)]
pub struct Inbox {
    pub tuning: InboxTuning,
    pub remaining: f32,
    pub lives: u32,
    pub score: u64,
    pub combo: f32,
    pub combo_timer: f32,
    pub items: Vec<Item>,
    pub cursor: Vec2,
    pub cursor_vx: f32,
    dragging: bool,
    spawn_acc: f32,
    rng: Pcg32,
}

impl Inbox {
    pub fn new(tuning: InboxTuning) -> Self {
        let mut game = Self {
            remaining: tuning.run_seconds,
            lives: tuning.lives,
            tuning,
            score: 0,
            combo: 1.0,
            combo_timer: 0.0,
            items: Vec::new(),
            cursor: Vec2::ZERO,
            cursor_vx: 0.0,
            dragging: false,
            spawn_acc: 0.0,
            rng: Pcg32::seed_from_u64(0),
        };
        game.reset(0);
        game
    }

    fn spawn_item(&mut self) {
        let kind = if self.rng.random_bool(self.tuning.spam_chance) {
            ItemKind::Spam
        } else {
            ItemKind::Mail
        };
        let x = self.rng.random_range(SPAWN_MARGIN..FIELD_WIDTH - SPAWN_MARGIN);
        let vy = self
            .rng
            .random_range(self.tuning.speed_min..=self.tuning.speed_max);
        self.items.push(Item {
            pos: Vec2::new(x, -20.0),
            vy,
            kind,
        });
    }

    fn catch_mail(&mut self) {
        self.score += (10.0 * self.combo).round() as u64;
        self.combo_timer = self.tuning.combo_window;
        self.combo = (self.combo + COMBO_STEP).clamp(1.0, COMBO_MAX);
    }

    fn catch_spam(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.combo = 1.0;
        self.combo_timer = 0.0;
    }

    fn apply(&mut self, event: &ControlEvent) {
        let speed = self.tuning.cursor_speed;
        match *event {
            ControlEvent::Press(Control::Left) => self.cursor_vx = -speed,
            ControlEvent::Press(Control::Right) => self.cursor_vx = speed,
            ControlEvent::Release(Control::Left | Control::Right) => self.cursor_vx = 0.0,
            ControlEvent::PointerDown(_) => self.dragging = true,
            ControlEvent::PointerMove(pos) if self.dragging => {
                self.cursor.x = pos.x.clamp(CURSOR_MARGIN, FIELD_WIDTH - CURSOR_MARGIN);
            }
            ControlEvent::PointerUp => self.dragging = false,
            _ => {}
        }
    }

    fn step(&mut self, dt: f32) {
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            return;
        }

        if self.combo_timer > 0.0 {
            self.combo_timer -= dt;
            if self.combo_timer <= 0.0 {
                self.combo = 1.0;
                self.combo_timer = 0.0;
            }
        }

        self.spawn_acc += dt * self.tuning.spawn_per_second;
        while self.spawn_acc >= 1.0 {
            self.spawn_item();
            self.spawn_acc -= 1.0;
        }

        self.cursor.x = (self.cursor.x + self.cursor_vx * dt)
            .clamp(CURSOR_MARGIN, FIELD_WIDTH - CURSOR_MARGIN);

        let r2 = self.tuning.pickup_radius * self.tuning.pickup_radius;
        let mut items = std::mem::take(&mut self.items);
        items.retain_mut(|item| {
            if self.lives == 0 {
                return true;
            }
            item.pos.y += item.vy * dt;
            if item.pos.y > FIELD_HEIGHT + 40.0 {
                return false;
            }
            if item.pos.distance_squared(self.cursor) <= r2 {
                match item.kind {
                    ItemKind::Mail => self.catch_mail(),
                    ItemKind::Spam => self.catch_spam(),
                }
                return false;
            }
            true
        });
        self.items = items;
    }
}

impl Simulation for Inbox {
    fn game_key(&self) -> &'static str {
        "inbox_invaders"
    }

    fn view_id(&self) -> &'static str {
        "inbox"
    }

    fn reset(&mut self, seed: u64) {
        self.rng = Pcg32::seed_from_u64(seed);
        self.remaining = self.tuning.run_seconds;
        self.lives = self.tuning.lives;
        self.score = 0;
        self.combo = 1.0;
        self.combo_timer = 0.0;
        self.items.clear();
        self.cursor = Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - 60.0);
        self.cursor_vx = 0.0;
        self.dragging = false;
        self.spawn_acc = 0.0;
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

        for item in &self.items {
            let color = match item.kind {
                ItemKind::Mail => palette::GOOD,
                ItemKind::Spam => palette::DANGER,
            };
            canvas.fill_circle(item.pos, 12.0, color);
        }
        canvas.fill_circle(self.cursor, 16.0, palette::ACCENT);

        let hud = [
            format!("Score: {}", self.score),
            format!("Lives: {}", self.lives),
            format!("Time: {}", self.remaining.max(0.0).ceil() as u32),
            format!("Combo: x{}", (self.combo * 10.0).round() / 10.0),
        ];
        for (i, line) in hud.iter().enumerate() {
            canvas.text(Vec2::new(12.0, 22.0 + i as f32 * 22.0), line, palette::TEXT);
        }
    }

    fn is_terminal(&self) -> bool {
        self.remaining <= 0.0 || self.lives == 0
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn coins(&self) -> u32 {
        clamp_coins(self.score / 8)
    }

    fn end_reason(&self) -> &'static str {
        "run_end"
    }

    fn hint(&self) -> &'static str {
        "Move with Arrow keys/A-D or drag on mobile. Collect mail and avoid spam."
    }
}
