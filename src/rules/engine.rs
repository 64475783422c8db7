//! The per-game rule set.
//!
//! A game plugs into the generic [`Board`](crate::board::Board) by
//! implementing `RuleSet`: its state table, its board layout, how its moves
//! change the cells, how it generates moves and how it scores positions.
//! The board owns everything else (turn order, the pick/drop protocol, undo,
//! digests), so a rule set never touches undo bookkeeping directly. All
//! mutation goes through [`Effects`], which journals each primitive.
//!
//! ## Implementation Notes
//!
//! - `apply` and `on_drop` must be deterministic; replay and search depend
//!   on it
//! - `generate_moves` must return moves in a deterministic order; walk
//!   `CellId`s in ascending order
//! - `outcome` is asked after every confirmed move, before the turn passes
//! - `check_pick` and `check_drop` run before the board touches a cell, so
//!   a veto needs no rollback

use serde::{Deserialize, Serialize};

use super::machine::StateTable;
use crate::board::{BoardState, Cells, Effects};
use crate::core::{CellGraph, CellId, EngineError, GameInit, GameRng, PieceRegistry, PlayerId};
use crate::moves::Move;

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no winner).
    Draw,
    /// Multiple winners (team games, shared victory, resignation in
    /// multiplayer).
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
            GameResult::Draw => false,
        }
    }

    /// Everyone but `loser` wins.
    #[must_use]
    pub fn all_but(loser: PlayerId, player_count: usize) -> Self {
        let mut winners: Vec<PlayerId> = loser.others(player_count).collect();
        match winners.len() {
            0 => GameResult::Draw,
            1 => GameResult::Winner(winners.remove(0)),
            _ => GameResult::Winners(winners),
        }
    }
}

/// Shape of a board, produced by the rule set from the game-init string.
#[derive(Clone, Debug)]
pub struct BoardLayout {
    pub graph: CellGraph,
    /// Numeric counters per player (captures, score, ...).
    pub counters: usize,
    /// Non-removable levels at the bottom of every board cell.
    pub base_level: usize,
}

/// Game rules, supplied to the board by composition.
pub trait RuleSet: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn states(&self) -> &StateTable;

    fn registry(&self) -> &PieceRegistry;

    /// Board shape for `init`. Fails on an unknown variant or player count.
    fn layout(&self, init: &GameInit) -> Result<BoardLayout, EngineError>;

    /// Opening position. Called on empty cells; not journaled.
    fn setup(&self, cells: &mut Cells, init: &GameInit, rng: &mut GameRng)
        -> Result<(), EngineError>;

    /// Apply a one-step move (`place`, `move`, `line`, `pass`). The board has
    /// already checked the transition and turn order.
    fn apply(&self, fx: &mut Effects<'_>, mv: &Move) -> Result<(), EngineError>;

    /// Side effects of a confirmed staged move, `from` being where the piece
    /// was first picked and `to` where it was last dropped.
    fn on_drop(
        &self,
        _fx: &mut Effects<'_>,
        _from: CellId,
        _to: CellId,
        _player: PlayerId,
    ) -> Result<(), EngineError> {
        Ok(())
    }

    /// Veto lifting the top piece of `cell`. Not asked in puzzle states, or
    /// when the pick takes back the drop just made.
    fn check_pick(
        &self,
        _board: &BoardState,
        _mv: &Move,
        _cell: CellId,
    ) -> Result<(), EngineError> {
        Ok(())
    }

    /// Veto dropping the picked piece on `cell`. Not asked in puzzle states,
    /// or when the piece goes back where it was just picked from.
    fn check_drop(
        &self,
        _board: &BoardState,
        _mv: &Move,
        _cell: CellId,
    ) -> Result<(), EngineError> {
        Ok(())
    }

    /// Every legal move for `player`, in a fixed order.
    fn generate_moves(&self, board: &BoardState, player: PlayerId) -> Vec<Move>;

    /// `Some` once the position just confirmed ends the game.
    fn outcome(&self, board: &BoardState) -> Option<GameResult>;

    /// Heuristic value for `player` in `[-1, 1]`. Only called on
    /// unfinished games.
    fn evaluate(&self, board: &BoardState, player: PlayerId) -> f64;

    /// Fast biased sample for playouts. May skip full legality checks; the
    /// board rejects structurally impossible samples and the caller
    /// resamples.
    fn random_move(&self, board: &BoardState, player: PlayerId, rng: &mut GameRng) -> Option<Move> {
        let moves = self.generate_moves(board, player);
        rng.choose(&moves).cloned()
    }

    fn next_player(&self, board: &BoardState, player: PlayerId) -> PlayerId {
        player.next(board.player_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Winner(PlayerId::new(1));
        assert!(!result.is_winner(PlayerId::new(0)));
        assert!(result.is_winner(PlayerId::new(1)));

        let draw = GameResult::Draw;
        assert!(!draw.is_winner(PlayerId::new(0)));

        let team = GameResult::Winners(vec![PlayerId::new(0), PlayerId::new(2)]);
        assert!(team.is_winner(PlayerId::new(0)));
        assert!(!team.is_winner(PlayerId::new(1)));
        assert!(team.is_winner(PlayerId::new(2)));
    }

    #[test]
    fn test_all_but() {
        assert_eq!(
            GameResult::all_but(PlayerId::new(0), 2),
            GameResult::Winner(PlayerId::new(1))
        );
        assert_eq!(
            GameResult::all_but(PlayerId::new(1), 3),
            GameResult::Winners(vec![PlayerId::new(0), PlayerId::new(2)])
        );
        assert_eq!(GameResult::all_but(PlayerId::new(0), 1), GameResult::Draw);
    }
}
