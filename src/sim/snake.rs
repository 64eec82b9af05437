//! Neon snake
//!
//! Wrap-around walls, several food pellets on the board at once and a step
//! rate that climbs with the score.

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::Simulation;
use super::input::{Control, ControlEvent};
use crate::clamp_coins;
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::renderer::{Canvas, palette};
use crate::settings::SnakeTuning;

/// Minimum pointer travel before a swipe turns the snake
pub const SWIPE_THRESHOLD: f32 = 18.0;

/// Snake state
#[derive(Debug, Clone)]
pub struct Snake {
    pub tuning: SnakeTuning,
    pub cols: i32,
    pub rows: i32,
    /// Head first
    pub body: Vec<IVec2>,
    pub foods: Vec<IVec2>,
    /// Direction used by the last step
    pub dir: IVec2,
    /// Direction the next step will take
    pub next_dir: IVec2,
    pub score: u64,
    pub speed: u32,
    step_acc: f32,
    food_acc: f32,
    swipe: Option<Vec2>,
    dead: bool,
    rng: Pcg32,
}

impl Snake {
    pub fn new(tuning: SnakeTuning) -> Self {
        let cols = (FIELD_WIDTH / tuning.cell).floor() as i32;
        let rows = (FIELD_HEIGHT / tuning.cell).floor() as i32;
        let mut snake = Self {
            tuning,
            cols,
            rows,
            body: Vec::new(),
            foods: Vec::new(),
            dir: IVec2::X,
            next_dir: IVec2::X,
            score: 0,
            speed: 1,
            step_acc: 0.0,
            food_acc: 0.0,
            swipe: None,
            dead: false,
            rng: Pcg32::seed_from_u64(0),
        };
        snake.reset(0);
        snake
    }

    /// Seconds between steps at the current speed
    pub fn step_interval(&self) -> f32 {
        let t = &self.tuning;
        let interval = t.base_step - (self.speed - 1) as f32 * t.step_per_level;
        interval.clamp(t.min_step, t.base_step)
    }

    /// Queue a turn; reversing onto the neck is ignored
    pub fn turn(&mut self, dir: IVec2) {
        if dir == -self.dir {
            return;
        }
        self.next_dir = dir;
    }

    /// Place one pellet on a random empty cell, false if the board is full
    pub fn spawn_food(&mut self) -> bool {
        let mut empty = Vec::new();
        for y in 0..self.rows {
            for x in 0..self.cols {
                let cell = IVec2::new(x, y);
                if !self.body.contains(&cell) && !self.foods.contains(&cell) {
                    empty.push(cell);
                }
            }
        }
        if empty.is_empty() {
            return false;
        }
        let pick = self.rng.random_range(0..empty.len());
        self.foods.push(empty[pick]);
        true
    }

    fn ensure_food(&mut self) {
        if self.foods.is_empty() {
            self.spawn_food();
        }
    }

    /// Advance one cell
    pub fn step(&mut self) {
        if self.dead {
            return;
        }
        self.dir = self.next_dir;

        let Some(&head) = self.body.first() else {
            return;
        };
        let mut next = head + self.dir;
        next.x = next.x.rem_euclid(self.cols);
        next.y = next.y.rem_euclid(self.rows);

        if self.body.contains(&next) {
            log::debug!("Snake bit itself at {next} with length {}", self.body.len());
            self.dead = true;
            return;
        }

        self.body.insert(0, next);

        if let Some(i) = self.foods.iter().position(|&f| f == next) {
            self.foods.swap_remove(i);
            self.score += 1;
            let speed = 1 + self.score / self.tuning.points_per_speed.max(1);
            self.speed = speed.clamp(1, self.tuning.max_speed as u64) as u32;
        } else {
            self.body.pop();
        }

        self.ensure_food();
    }

    fn apply(&mut self, event: &ControlEvent) {
        match *event {
            ControlEvent::Press(Control::Up) => self.turn(IVec2::NEG_Y),
            ControlEvent::Press(Control::Down) => self.turn(IVec2::Y),
            ControlEvent::Press(Control::Left) => self.turn(IVec2::NEG_X),
            ControlEvent::Press(Control::Right) => self.turn(IVec2::X),
            ControlEvent::PointerDown(pos) => self.swipe = Some(pos),
            ControlEvent::PointerMove(pos) => {
                let Some(origin) = self.swipe else {
                    return;
                };
                let d = pos - origin;
                if d.x.abs() < SWIPE_THRESHOLD && d.y.abs() < SWIPE_THRESHOLD {
                    return;
                }
                if d.x.abs() > d.y.abs() {
                    self.turn(IVec2::new(d.x.signum() as i32, 0));
                } else {
                    self.turn(IVec2::new(0, d.y.signum() as i32));
                }
                self.swipe = Some(pos);
            }
            ControlEvent::PointerUp => self.swipe = None,
            _ => {}
        }
    }
}

impl Simulation for Snake {
    fn game_key(&self) -> &'static str {
        "snake"
    }

    fn reset(&mut self, seed: u64) {
        let center = IVec2::new(self.cols / 2, self.rows / 2);
        self.body = vec![center, center - IVec2::X, center - IVec2::X * 2];
        self.foods.clear();
        self.dir = IVec2::X;
        self.next_dir = IVec2::X;
        self.score = 0;
        self.speed = 1;
        self.step_acc = 0.0;
        self.food_acc = 0.0;
        self.swipe = None;
        self.dead = false;
        self.rng = Pcg32::seed_from_u64(seed);
        self.spawn_food();
    }

    fn update(&mut self, dt: f32, inputs: &[ControlEvent]) {
        if self.dead {
            return;
        }
        for event in inputs {
            self.apply(event);
        }

        self.ensure_food();
        self.food_acc += dt;
        let every = self.tuning.food_spawn_every;
        if self.food_acc >= every {
            self.food_acc %= every;
            if self.foods.len() < self.tuning.max_food {
                self.spawn_food();
            }
        }

        self.step_acc += dt;
        let interval = self.step_interval();
        while self.step_acc >= interval {
            self.step_acc -= interval;
            self.step();
            if self.dead {
                return;
            }
        }
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        let cell = self.tuning.cell;
        canvas.clear(palette::BACKGROUND);
        canvas.grid(60.0, palette::GRID.with_alpha(0.18));

        for food in &self.foods {
            let center = food.as_vec2() * cell + Vec2::splat(cell / 2.0);
            canvas.fill_circle(center, cell / 3.0, palette::GOOD);
        }

        for (i, part) in self.body.iter().enumerate() {
            let alpha = if i == 0 { 0.95 } else { 0.75 };
            canvas.fill_rect(
                part.as_vec2() * cell + Vec2::splat(2.0),
                Vec2::splat(cell - 4.0),
                palette::ACCENT.with_alpha(alpha),
            );
        }

        if let Some(head) = self.body.first() {
            let eyes = head.as_vec2() * cell + Vec2::splat(cell / 2.0) + self.dir.as_vec2() * 4.0;
            canvas.fill_circle(eyes + Vec2::new(-4.0, -2.0), 2.0, palette::SHADE);
            canvas.fill_circle(eyes + Vec2::new(4.0, -2.0), 2.0, palette::SHADE);
        }

        canvas.text(Vec2::new(12.0, 22.0), &format!("Score: {}", self.score), palette::TEXT);
        canvas.text(Vec2::new(12.0, 44.0), &format!("Speed: {}", self.speed), palette::MUTED);
    }

    fn is_terminal(&self) -> bool {
        self.dead
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn coins(&self) -> u32 {
        clamp_coins(self.score * 2)
    }

    fn end_reason(&self) -> &'static str {
        "snake_game_over"
    }

    fn hint(&self) -> &'static str {
        "Controls: Arrow keys / WASD. On mobile: swipe to turn."
    }
}
