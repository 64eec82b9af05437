//! Falling-block puzzle
//!
//! A 10x20 well fed by a 7-bag randomizer. Rotation is clockwise with a
//! simple horizontal wall kick; gravity speeds up every ten cleared lines.
//! The run ends on top-out: a piece that cannot spawn, or a piece that locks
//! with any cell above the visible board.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::Simulation;
use super::input::{Control, ControlEvent};
use crate::clamp_coins;
use crate::renderer::{Canvas, Color, palette};
use crate::settings::TetrisTuning;

pub const COLS: usize = 10;
pub const ROWS: usize = 20;

/// Base points for clearing 0..=4 lines at once (multiplied by level)
pub const LINE_SCORES: [u64; 5] = [0, 100, 300, 500, 800];

/// Horizontal offsets tried, in order, when a rotation collides
pub const KICK_OFFSETS: [i32; 5] = [0, -1, 1, -2, 2];

/// The bag is topped up with a fresh shuffled set below this many pieces
pub const BAG_LOW_WATER: usize = 3;

/// Matrix top row of a freshly spawned piece
pub const SPAWN_ROW: i32 = -2;

/// Points per cell of hard drop distance
pub const HARD_DROP_POINTS: u64 = 2;

/// Piece types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Spawn orientation
    pub fn shape(self) -> Vec<Vec<bool>> {
        let rows: &[&[u8]] = match self {
            PieceKind::I => &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            PieceKind::O => &[&[1, 1], &[1, 1]],
            PieceKind::T => &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]],
            PieceKind::S => &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
            PieceKind::Z => &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
            PieceKind::J => &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]],
            PieceKind::L => &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]],
        };
        rows.iter()
            .map(|r| r.iter().map(|&c| c != 0).collect())
            .collect()
    }

    pub fn color(self) -> Color {
        match self {
            PieceKind::I => Color::hex(0x6aa7ff),
            PieceKind::O => Color::hex(0xffd86a),
            PieceKind::T => Color::hex(0xc78cff),
            PieceKind::S => Color::hex(0x78ffb4),
            PieceKind::Z => Color::hex(0xff6a6a),
            PieceKind::J => Color::hex(0x6a7cff),
            PieceKind::L => Color::hex(0xff9c6a),
        }
    }
}

/// Rotate a piece matrix 90 degrees clockwise (transpose + reverse rows)
pub fn rotate_cw(mat: &[Vec<bool>]) -> Vec<Vec<bool>> {
    let h = mat.len();
    let w = mat.first().map(|r| r.len()).unwrap_or(0);
    let mut out = vec![vec![false; h]; w];
    for (y, row) in mat.iter().enumerate() {
        for (x, &filled) in row.iter().enumerate() {
            out[x][h - 1 - y] = filled;
        }
    }
    out
}

/// The falling piece
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub kind: PieceKind,
    pub cells: Vec<Vec<bool>>,
    /// Board column of the matrix's left edge
    pub x: i32,
    /// Board row of the matrix's top edge (negative = above the board)
    pub y: i32,
}

impl Piece {
    /// A piece centered horizontally with its matrix top at `SPAWN_ROW`
    pub fn spawn(kind: PieceKind) -> Self {
        let cells = kind.shape();
        let w = cells.first().map(|r| r.len()).unwrap_or(0) as i32;
        Self {
            kind,
            cells,
            x: (COLS as i32 - w) / 2,
            y: SPAWN_ROW,
        }
    }

    /// Board coordinates of every filled cell
    pub fn blocks(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().enumerate().flat_map(move |(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(x, _)| (self.x + x as i32, self.y + y as i32))
        })
    }
}

/// The well
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    rows: Vec<[Option<PieceKind>; COLS]>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            rows: vec![[None; COLS]; ROWS],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<PieceKind> {
        self.rows.get(y).and_then(|r| r[x])
    }

    pub fn set(&mut self, x: usize, y: usize, kind: Option<PieceKind>) {
        self.rows[y][x] = kind;
    }

    pub fn filled_cells(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Would `cells` placed at (x, y) hit a wall, the floor, or a settled block?
    ///
    /// Cells above the board only collide with the side walls.
    pub fn collides(&self, cells: &[Vec<bool>], x: i32, y: i32) -> bool {
        for (cy, row) in cells.iter().enumerate() {
            for (cx, &filled) in row.iter().enumerate() {
                if !filled {
                    continue;
                }
                let bx = x + cx as i32;
                let by = y + cy as i32;
                if bx < 0 || bx >= COLS as i32 || by >= ROWS as i32 {
                    return true;
                }
                if by < 0 {
                    continue;
                }
                if self.rows[by as usize][bx as usize].is_some() {
                    return true;
                }
            }
        }
        false
    }

    /// Write the piece's visible cells into the board
    pub fn merge(&mut self, piece: &Piece) {
        for (bx, by) in piece.blocks() {
            if (0..COLS as i32).contains(&bx) && (0..ROWS as i32).contains(&by) {
                self.rows[by as usize][bx as usize] = Some(piece.kind);
            }
        }
    }

    /// Remove full rows bottom-up, returning how many were cleared
    pub fn clear_lines(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = ROWS;
        while y > 0 {
            let row = y - 1;
            if self.rows[row].iter().all(|c| c.is_some()) {
                self.rows.remove(row);
                self.rows.insert(0, [None; COLS]);
                cleared += 1;
                // Same index again: everything above shifted down
            } else {
                y -= 1;
            }
        }
        cleared
    }
}

/// 7-bag piece supply
#[derive(Debug, Clone)]
pub struct PieceBag {
    queue: VecDeque<PieceKind>,
    rng: Pcg32,
}

impl PieceBag {
    pub fn new(seed: u64) -> Self {
        let mut bag = Self {
            queue: VecDeque::with_capacity(14),
            rng: Pcg32::seed_from_u64(seed),
        };
        bag.refill();
        bag
    }

    fn refill(&mut self) {
        let mut set = PieceKind::ALL;
        set.shuffle(&mut self.rng);
        self.queue.extend(set);
    }

    /// Draw the next piece type
    pub fn next(&mut self) -> PieceKind {
        if self.queue.len() < BAG_LOW_WATER {
            self.refill();
        }
        // Refill leaves at least BAG_LOW_WATER + 7 - 1 pieces queued
        self.queue.pop_front().unwrap_or(PieceKind::I)
    }

    /// Upcoming pieces without drawing
    pub fn preview(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.iter().copied()
    }
}

/// Base score for a clear, scaled by level
pub fn score_for_lines(lines: u32, level: u32) -> u64 {
    LINE_SCORES.get(lines as usize).copied().unwrap_or(0) * level as u64
}

/// Gravity interval in seconds for `level`
pub fn drop_interval(tuning: &TetrisTuning, level: u32) -> f32 {
    let interval = tuning.base_drop - (level.saturating_sub(1)) as f32 * tuning.level_step;
    interval.clamp(tuning.min_drop, tuning.base_drop)
}

/// Coin reward: a coin per 120 points plus two per line
pub fn coins_from(score: u64, lines: u32) -> u32 {
    clamp_coins(score / 120 + lines as u64 * 2)
}

/// Falling-block puzzle state
#[derive(Debug, Clone)]
pub struct Tetris {
    pub tuning: TetrisTuning,
    pub board: Board,
    pub piece: Option<Piece>,
    pub bag: PieceBag,
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    /// Current gravity interval (seconds)
    pub drop_interval: f32,
    drop_acc: f32,
    soft_drop: bool,
    topped_out: bool,
    merges: u64,
}

impl Tetris {
    pub fn new(tuning: TetrisTuning) -> Self {
        let drop = drop_interval(&tuning, 1);
        let mut game = Self {
            tuning,
            board: Board::new(),
            piece: None,
            bag: PieceBag::new(0),
            score: 0,
            lines: 0,
            level: 1,
            drop_interval: drop,
            drop_acc: 0.0,
            soft_drop: false,
            topped_out: false,
            merges: 0,
        };
        game.reset(0);
        game
    }

    /// Number of pieces merged into the board this run
    pub fn merge_count(&self) -> u64 {
        self.merges
    }

    pub fn topped_out(&self) -> bool {
        self.topped_out
    }

    /// Bring in the next piece; a blocked spawn is a top-out
    ///
    /// At `SPAWN_ROW` every filled cell starts above the board, where
    /// `collides` ignores it, so in play top-out happens in `lock_piece`.
    /// The check only fires for spawn rows inside the board.
    pub fn spawn(&mut self) {
        let piece = Piece::spawn(self.bag.next());
        if self.board.collides(&piece.cells, piece.x, piece.y) {
            log::debug!("Spawn of {:?} blocked - top out", piece.kind);
            self.topped_out = true;
        }
        self.piece = Some(piece);
    }

    /// Shift the piece sideways if there is room
    pub fn move_by(&mut self, dx: i32) -> bool {
        let Some(piece) = self.piece.as_mut() else {
            return false;
        };
        if self.board.collides(&piece.cells, piece.x + dx, piece.y) {
            return false;
        }
        piece.x += dx;
        true
    }

    /// Rotate clockwise with wall kicks, returning the kick offset used
    pub fn rotate(&mut self) -> Option<i32> {
        let piece = self.piece.as_mut()?;
        let rotated = rotate_cw(&piece.cells);
        let kick = KICK_OFFSETS
            .iter()
            .copied()
            .find(|&k| !self.board.collides(&rotated, piece.x + k, piece.y))?;
        piece.cells = rotated;
        piece.x += kick;
        Some(kick)
    }

    pub fn set_soft_drop(&mut self, on: bool) {
        self.soft_drop = on;
    }

    /// One gravity step: fall a row or lock in place
    pub fn step_down(&mut self) {
        let Some(piece) = self.piece.as_mut() else {
            return;
        };
        if !self.board.collides(&piece.cells, piece.x, piece.y + 1) {
            piece.y += 1;
            if self.soft_drop {
                self.score += 1;
            }
            return;
        }
        self.lock_piece();
    }

    /// Drop straight to the floor and lock
    pub fn hard_drop(&mut self) {
        let Some(piece) = self.piece.as_mut() else {
            return;
        };
        let mut distance = 0;
        while !self.board.collides(&piece.cells, piece.x, piece.y + 1) {
            piece.y += 1;
            distance += 1;
        }
        self.score += distance * HARD_DROP_POINTS;
        self.lock_piece();
    }

    /// Settle the current piece, clear lines and spawn the next one
    pub fn lock_piece(&mut self) {
        let Some(piece) = self.piece.take() else {
            return;
        };

        // Top-out is decided before anything is written to the board
        if piece.blocks().any(|(_, by)| by < 0) {
            log::debug!("{:?} locked above the board - top out", piece.kind);
            self.topped_out = true;
            self.piece = Some(piece);
            return;
        }

        self.board.merge(&piece);
        self.merges += 1;

        let cleared = self.board.clear_lines();
        if cleared > 0 {
            self.lines += cleared;
            self.score += score_for_lines(cleared, self.level);

            let level = self.lines / self.tuning.lines_per_level.max(1) + 1;
            if level != self.level {
                self.level = level;
                self.drop_interval = drop_interval(&self.tuning, level);
            }
        }

        self.spawn();
    }

    fn apply(&mut self, event: &ControlEvent) {
        match event {
            ControlEvent::Press(Control::Left) => {
                self.move_by(-1);
            }
            ControlEvent::Press(Control::Right) => {
                self.move_by(1);
            }
            ControlEvent::Press(Control::Up) => {
                self.rotate();
            }
            ControlEvent::Press(Control::Down) => self.set_soft_drop(true),
            ControlEvent::Release(Control::Down) => self.set_soft_drop(false),
            ControlEvent::Press(Control::Action) => self.hard_drop(),
            _ => {}
        }
    }
}

impl Simulation for Tetris {
    fn game_key(&self) -> &'static str {
        "tetris"
    }

    fn reset(&mut self, seed: u64) {
        self.board = Board::new();
        self.piece = None;
        self.bag = PieceBag::new(seed);
        self.score = 0;
        self.lines = 0;
        self.level = 1;
        self.drop_interval = drop_interval(&self.tuning, 1);
        self.drop_acc = 0.0;
        self.soft_drop = false;
        self.topped_out = false;
        self.merges = 0;
        self.spawn();
    }

    fn update(&mut self, dt: f32, inputs: &[ControlEvent]) {
        if self.topped_out {
            return;
        }

        for event in inputs {
            self.apply(event);
            if self.topped_out {
                return;
            }
        }

        let interval = if self.soft_drop {
            self.tuning.soft_drop
        } else {
            self.drop_interval
        };
        self.drop_acc += dt;
        while self.drop_acc >= interval {
            self.drop_acc -= interval;
            self.step_down();
            if self.topped_out {
                return;
            }
        }
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        let size = canvas.size();
        canvas.clear(palette::BACKGROUND);

        let panel_w = (size.x * 0.35).floor();
        let board_w = size.x - panel_w;
        let cell = (board_w / COLS as f32).min(size.y / ROWS as f32).floor();
        let grid = Vec2::new(cell * COLS as f32, cell * ROWS as f32);
        let origin = Vec2::new(((board_w - grid.x) / 2.0).floor(), ((size.y - grid.y) / 2.0).floor());

        let grid_color = palette::GRID.with_alpha(0.18);
        for x in 0..=COLS {
            let px = origin.x + x as f32 * cell;
            canvas.line(Vec2::new(px, origin.y), Vec2::new(px, origin.y + grid.y), grid_color);
        }
        for y in 0..=ROWS {
            let py = origin.y + y as f32 * cell;
            canvas.line(Vec2::new(origin.x, py), Vec2::new(origin.x + grid.x, py), grid_color);
        }

        let cell_rect = |bx: i32, by: i32| {
            (
                origin + Vec2::new(bx as f32 * cell + 1.0, by as f32 * cell + 1.0),
                Vec2::splat(cell - 2.0),
            )
        };

        for y in 0..ROWS {
            for x in 0..COLS {
                if let Some(kind) = self.board.get(x, y) {
                    let (pos, sz) = cell_rect(x as i32, y as i32);
                    canvas.fill_rect(pos, sz, kind.color());
                }
            }
        }

        if let Some(piece) = &self.piece {
            for (bx, by) in piece.blocks().filter(|&(_, by)| by >= 0) {
                let (pos, sz) = cell_rect(bx, by);
                canvas.fill_rect(pos, sz, piece.kind.color());
            }
        }

        // Side panel
        let px = board_w;
        canvas.fill_rect(Vec2::new(px, 0.0), Vec2::new(panel_w, size.y), palette::SHADE.with_alpha(0.25));
        canvas.text(Vec2::new(px + 20.0, 40.0), "TETRIS", palette::TEXT);
        canvas.text(Vec2::new(px + 20.0, 80.0), &format!("Score: {}", self.score), palette::TEXT);
        canvas.text(Vec2::new(px + 20.0, 105.0), &format!("Lines: {}", self.lines), palette::TEXT);
        canvas.text(Vec2::new(px + 20.0, 130.0), &format!("Level: {}", self.level), palette::TEXT);
        if let Some(next) = self.bag.preview().next() {
            canvas.text(Vec2::new(px + 20.0, 155.0), &format!("Next: {:?}", next), palette::MUTED);
        }
        for (i, line) in ["Controls:", "← → move", "↑ rotate", "↓ soft drop", "Space hard drop", "P pause"]
            .iter()
            .enumerate()
        {
            canvas.text(Vec2::new(px + 20.0, 180.0 + i as f32 * 25.0), line, palette::MUTED);
        }
    }

    fn is_terminal(&self) -> bool {
        self.topped_out
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn coins(&self) -> u32 {
        coins_from(self.score, self.lines)
    }

    fn end_reason(&self) -> &'static str {
        "game_over"
    }

    fn pausable(&self) -> bool {
        true
    }

    fn hint(&self) -> &'static str {
        "Controls: ← → move, ↓ soft drop, ↑ rotate, Space hard drop, P pause"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawList;
    use proptest::prelude::*;

    fn game(seed: u64) -> Tetris {
        let mut game = Tetris::new(TetrisTuning::default());
        game.reset(seed);
        game
    }

    /// A vertical I piece occupying column `col`, rows `top..top + 4`
    fn vertical_i(col: i32, top: i32) -> Piece {
        let mut piece = Piece::spawn(PieceKind::I);
        piece.cells = rotate_cw(&piece.cells);
        // The vertical I sits in matrix column 2
        piece.x = col - 2;
        piece.y = top;
        piece
    }

    #[test]
    fn test_rotate_cw_matches_transpose_reverse() {
        let t = PieceKind::T.shape();
        let r = rotate_cw(&t);
        // [010]      [010]
        // [111]  ->  [011]
        // [000]      [010]
        assert_eq!(
            r,
            vec![
                vec![false, true, false],
                vec![false, true, true],
                vec![false, true, false],
            ]
        );
        let full_turn = rotate_cw(&rotate_cw(&rotate_cw(&r)));
        assert_eq!(full_turn, t);
    }

    #[test]
    fn test_bag_aligned_windows_are_permutations() {
        let mut bag = PieceBag::new(7);
        for _ in 0..20 {
            let mut window: Vec<PieceKind> = (0..7).map(|_| bag.next()).collect();
            window.sort_by_key(|k| *k as u8);
            assert_eq!(window, PieceKind::ALL.to_vec());
        }
    }

    #[test]
    fn test_bag_refills_below_three() {
        let mut bag = PieceBag::new(1);
        for _ in 0..5 {
            bag.next();
        }
        assert_eq!(bag.preview().count(), 2);
        bag.next();
        // Refilled before the draw: 2 + 7 - 1
        assert_eq!(bag.preview().count(), 8);
    }

    #[test]
    fn test_wall_kick_off_left_wall() {
        let mut game = game(1);
        game.piece = Some(vertical_i(0, 5));
        // Horizontal at offset 0 would span columns -2..=1
        assert_eq!(game.rotate(), Some(2));
        let piece = game.piece.as_ref().unwrap();
        let cols: Vec<i32> = piece.blocks().map(|(x, _)| x).collect();
        assert_eq!(cols, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_wall_kick_prefers_minus_one_over_minus_two() {
        let mut game = game(1);
        game.piece = Some(vertical_i(6, 5));
        // Horizontal lands on row 7, columns 4..=7 at offset 0
        game.board.set(7, 7, Some(PieceKind::O));
        assert_eq!(game.rotate(), Some(-1));
    }

    #[test]
    fn test_wall_kick_prefers_plus_one_over_plus_two() {
        let mut game = game(1);
        game.piece = Some(vertical_i(6, 5));
        game.board.set(3, 7, Some(PieceKind::O));
        game.board.set(4, 7, Some(PieceKind::O));
        assert_eq!(game.rotate(), Some(1));
    }

    #[test]
    fn test_rotation_rejected_when_every_kick_collides() {
        let mut game = game(1);
        game.piece = Some(vertical_i(6, 5));
        for x in (0..COLS).filter(|&x| x != 6) {
            game.board.set(x, 7, Some(PieceKind::Z));
        }
        let board_before = game.board.clone();
        let piece_before = game.piece.clone();

        assert_eq!(game.rotate(), None);
        assert_eq!(game.board, board_before);
        assert_eq!(game.piece, piece_before);
    }

    #[test]
    fn test_two_lines_at_level_three() {
        assert_eq!(score_for_lines(2, 3), 900);

        let mut game = game(3);
        game.level = 3;
        game.lines = 20;
        for y in [18, 19] {
            for x in 1..COLS {
                game.board.set(x, y, Some(PieceKind::S));
            }
        }
        game.piece = Some(vertical_i(0, 16));
        game.lock_piece();

        assert_eq!(game.score, 900);
        assert_eq!(game.lines, 22);
        assert_eq!(game.level, 3);
        // The two leftover I cells fell into the bottom rows
        assert_eq!(game.board.get(0, 19), Some(PieceKind::I));
        assert_eq!(game.board.get(0, 18), Some(PieceKind::I));
        assert_eq!(game.board.filled_cells(), 2);
    }

    #[test]
    fn test_clear_rechecks_same_row() {
        let mut board = Board::new();
        for y in [17, 18, 19] {
            for x in 0..COLS {
                board.set(x, y, Some(PieceKind::L));
            }
        }
        board.set(4, 16, Some(PieceKind::T));
        assert_eq!(board.clear_lines(), 3);
        assert_eq!(board.get(4, 19), Some(PieceKind::T));
        assert_eq!(board.filled_cells(), 1);
    }

    #[test]
    fn test_level_up_tightens_gravity() {
        let mut game = game(5);
        game.lines = 9;
        for x in 1..COLS {
            game.board.set(x, 19, Some(PieceKind::J));
        }
        game.piece = Some(vertical_i(0, 16));
        game.lock_piece();
        assert_eq!(game.level, 2);
        assert!((game.drop_interval - 0.74).abs() < 1e-5);
    }

    #[test]
    fn test_drop_interval_clamped() {
        let tuning = TetrisTuning::default();
        assert_eq!(drop_interval(&tuning, 1), 0.8);
        assert_eq!(drop_interval(&tuning, 50), tuning.min_drop);
        let mut prev = drop_interval(&tuning, 1);
        for level in 2..30 {
            let next = drop_interval(&tuning, level);
            assert!(next <= prev);
            prev = next;
        }
    }

    #[test]
    fn test_lock_above_full_stack_tops_out_without_merge() {
        let mut game = game(9);
        let merges = game.merge_count();
        // Stack to the ceiling, one column short of any full line
        for y in 0..ROWS {
            for x in 0..COLS - 1 {
                game.board.set(x, y, Some(PieceKind::O));
            }
        }
        let board_before = game.board.clone();

        // The new piece fits above the board; its first gravity step locks it there
        game.spawn();
        assert!(!game.is_terminal());
        game.update(0.8, &[]);

        assert!(game.is_terminal());
        assert_eq!(game.merge_count(), merges);
        assert_eq!(game.board, board_before);
    }

    #[test]
    fn test_spawn_position() {
        let piece = Piece::spawn(PieceKind::I);
        assert_eq!((piece.x, piece.y), (3, SPAWN_ROW));
        let piece = Piece::spawn(PieceKind::O);
        assert_eq!((piece.x, piece.y), (4, SPAWN_ROW));
        let piece = Piece::spawn(PieceKind::T);
        assert_eq!((piece.x, piece.y), (3, SPAWN_ROW));
    }

    #[test]
    fn test_lock_above_board_tops_out_without_merge() {
        let mut game = game(2);
        let piece = vertical_i(4, -2);
        for y in 2..ROWS {
            game.board.set(4, y, Some(PieceKind::Z));
        }
        game.piece = Some(piece);
        let filled = game.board.filled_cells();

        game.lock_piece();

        assert!(game.is_terminal());
        assert_eq!(game.board.filled_cells(), filled);
        assert_eq!(game.merge_count(), 0);
    }

    #[test]
    fn test_hard_drop_awards_distance_bonus() {
        let mut game = game(4);
        game.piece = Some(vertical_i(0, 0));
        game.hard_drop();
        // Falls from rows 0..4 to 16..20: 16 cells
        assert_eq!(game.score, 32);
        assert_eq!(game.board.get(0, 19), Some(PieceKind::I));
        assert_eq!(game.merge_count(), 1);
    }

    #[test]
    fn test_gravity_accumulates() {
        let mut game = game(11);
        let y0 = game.piece.as_ref().unwrap().y;
        game.update(0.5, &[]);
        assert_eq!(game.piece.as_ref().unwrap().y, y0);
        game.update(0.35, &[]);
        assert_eq!(game.piece.as_ref().unwrap().y, y0 + 1);
    }

    #[test]
    fn test_soft_drop_scores_per_row() {
        let mut game = game(11);
        let y0 = game.piece.as_ref().unwrap().y;
        game.update(0.0, &[ControlEvent::Press(Control::Down)]);
        game.update(0.13, &[]);
        assert_eq!(game.piece.as_ref().unwrap().y, y0 + 2);
        assert_eq!(game.score, 2);
        game.update(0.0, &[ControlEvent::Release(Control::Down)]);
        game.update(0.13, &[]);
        assert_eq!(game.score, 2);
    }

    #[test]
    fn test_render_does_not_mutate() {
        let mut game = game(21);
        game.update(0.0, &[ControlEvent::Press(Control::Action)]);
        let score = game.score;
        let board = game.board.clone();
        let piece = game.piece.clone();

        let mut canvas = DrawList::new(640.0, 640.0);
        for _ in 0..3 {
            game.render(&mut canvas);
        }

        assert_eq!(game.score, score);
        assert_eq!(game.board, board);
        assert_eq!(game.piece, piece);
        assert!(canvas.texts().any(|t| t == format!("Score: {}", score)));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut game = game(8);
        game.update(0.0, &[ControlEvent::Press(Control::Action)]);
        assert!(game.board.filled_cells() > 0);
        game.reset(8);
        assert_eq!(game.board.filled_cells(), 0);
        assert_eq!(game.score, 0);
        assert_eq!(game.level, 1);
        assert!(!game.is_terminal());
    }

    #[test]
    fn test_same_seed_same_pieces() {
        let mut a = PieceBag::new(42);
        let mut b = PieceBag::new(42);
        for _ in 0..30 {
            assert_eq!(a.next(), b.next());
        }
    }

    proptest! {
        #[test]
        fn prop_coins_clamped_and_monotonic(score in 0u64..10_000_000, lines in 0u32..5_000, extra in 0u64..100_000) {
            let c = coins_from(score, lines);
            prop_assert!(c <= crate::consts::MAX_COINS);
            prop_assert!(coins_from(score + extra, lines) >= c);
        }

        #[test]
        fn prop_bag_windows(seed in any::<u64>()) {
            let mut bag = PieceBag::new(seed);
            for _ in 0..4 {
                let mut window: Vec<u8> = (0..7).map(|_| bag.next() as u8).collect();
                window.sort_unstable();
                prop_assert_eq!(window, vec![0, 1, 2, 3, 4, 5, 6]);
            }
        }
    }
}
