//! Deterministic simulations
//!
//! Every game is a `Simulation`. The rules for all of them:
//! - `update` is a pure function of (state, dt, buffered inputs)
//! - Seeded RNG only, reseeded on `reset`
//! - No wall-clock reads, no rendering side effects on state
//! - `render` takes `&self`

pub mod breakout;
pub mod collision;
pub mod inbox;
pub mod input;
pub mod pong;
pub mod snake;
pub mod tetris;

pub use breakout::Breakout;
pub use collision::{Rect, circle_rect_overlap};
pub use inbox::Inbox;
pub use input::{Control, ControlEvent, InputQueue};
pub use pong::Pong;
pub use snake::Snake;
pub use tetris::Tetris;

use crate::renderer::Canvas;

/// The contract every game satisfies
pub trait Simulation {
    /// Key the ledger knows this game by
    fn game_key(&self) -> &'static str;

    /// View (and registry id) the game lives in
    fn view_id(&self) -> &'static str {
        self.game_key()
    }

    /// Build a fresh board, zero the score and reseed the randomizer
    fn reset(&mut self, seed: u64);

    /// Advance by `dt` seconds after applying `inputs` in order
    fn update(&mut self, dt: f32, inputs: &[ControlEvent]);

    /// Draw the current state
    fn render(&self, canvas: &mut dyn Canvas);

    /// Checked after every update
    fn is_terminal(&self) -> bool;

    fn score(&self) -> u64;

    /// Coin reward for the current state, within `[0, MAX_COINS]`
    fn coins(&self) -> u32;

    /// Reason string sent with the award
    fn end_reason(&self) -> &'static str;

    /// Whether the run can be paused
    fn pausable(&self) -> bool {
        false
    }

    /// Controls hint shown before a run
    fn hint(&self) -> &'static str;

    /// Banner title once the run is over
    fn end_title(&self) -> &'static str {
        "Game Over"
    }

    /// Score as shown on the game-over banner
    fn score_label(&self) -> String {
        self.score().to_string()
    }
}

/// Build every simulation the portal ships with
pub fn all_games(settings: &crate::Settings) -> Vec<Box<dyn Simulation>> {
    vec![
        Box::new(Inbox::new(settings.inbox.clone())),
        Box::new(Tetris::new(settings.tetris.clone())),
        Box::new(Snake::new(settings.snake.clone())),
        Box::new(Breakout::new(settings.breakout.clone())),
        Box::new(Pong::new(settings.pong.clone())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::renderer::DrawList;

    #[test]
    fn test_render_never_changes_state() {
        for mut game in all_games(&Settings::default()) {
            game.reset(42);
            game.update(0.0, &[ControlEvent::Press(Control::Action)]);
            for _ in 0..30 {
                game.update(1.0 / 60.0, &[]);
            }

            let before = (game.score(), game.coins(), game.is_terminal(), game.score_label());
            let mut first = DrawList::new(900.0, 520.0);
            game.render(&mut first);
            for _ in 0..5 {
                let mut again = DrawList::new(900.0, 520.0);
                game.render(&mut again);
                assert_eq!(again.commands, first.commands, "{} render drifted", game.game_key());
            }
            let after = (game.score(), game.coins(), game.is_terminal(), game.score_label());
            assert_eq!(before, after, "{} state changed by render", game.game_key());
        }
    }

    #[test]
    fn test_every_game_has_distinct_view() {
        let games = all_games(&Settings::default());
        let mut views: Vec<_> = games.iter().map(|g| g.view_id()).collect();
        views.sort_unstable();
        views.dedup();
        assert_eq!(views.len(), games.len());
    }
}
